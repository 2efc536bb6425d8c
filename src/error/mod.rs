//! Error types for authbridge.

use thiserror::Error;

/// Primary error type carried by faulted envelopes and returned by fallible setup code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Identity provider detached")]
    Detached,

    #[error("Task abandoned before completion")]
    Abandoned,

    #[error("Operation canceled")]
    Canceled,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Provider,
    Response,
    Configuration,
    Cancellation,
    State,
}

impl AuthError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Provider(_) | Self::Abandoned => ErrorCategory::Provider,
            Self::InvalidResponse(_) => ErrorCategory::Response,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Canceled => ErrorCategory::Cancellation,
            Self::Detached | Self::InvalidState(_) => ErrorCategory::State,
        }
    }

    /// Whether repeating the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Transport | ErrorCategory::Provider | ErrorCategory::Cancellation
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidResponse(error.to_string())
    }
}

impl From<url::ParseError> for AuthError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidResponse(format!("invalid URL: {error}"))
    }
}

impl From<toml::de::Error> for AuthError {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration(error.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, AuthError>;
