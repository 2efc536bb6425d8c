//! Three-way outcome wrapper delivered to every continuation.

use strum::Display;

use crate::error::AuthError;

/// Outcome tag of a [`ResultEnvelope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Success,
    Faulted,
    Canceled,
}

/// Result of one asynchronous operation.
///
/// A value is only carried by `Success` and an error only by `Faulted`, so the
/// two can never be read together. Callers inspect the tag before the payload.
///
/// # Example
/// ```
/// use authbridge::types::{Outcome, ResultEnvelope};
///
/// let envelope = ResultEnvelope::success(7);
/// assert_eq!(envelope.outcome(), Outcome::Success);
/// assert_eq!(envelope.value(), Some(&7));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ResultEnvelope<T> {
    Success(T),
    Faulted(AuthError),
    Canceled,
}

impl<T> ResultEnvelope<T> {
    pub fn success(value: T) -> Self {
        Self::Success(value)
    }

    pub fn faulted(error: impl Into<AuthError>) -> Self {
        Self::Faulted(error.into())
    }

    pub fn canceled() -> Self {
        Self::Canceled
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::Success(_) => Outcome::Success,
            Self::Faulted(_) => Outcome::Faulted,
            Self::Canceled => Outcome::Canceled,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn is_faulted(&self) -> bool {
        matches!(self, Self::Faulted(_))
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// The success payload, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// The fault, if any.
    pub fn error(&self) -> Option<&AuthError> {
        match self {
            Self::Faulted(error) => Some(error),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Transform the success payload, leaving faults and cancellation untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResultEnvelope<U> {
        match self {
            Self::Success(value) => ResultEnvelope::Success(f(value)),
            Self::Faulted(error) => ResultEnvelope::Faulted(error),
            Self::Canceled => ResultEnvelope::Canceled,
        }
    }

    /// Collapse into a `Result`; cancellation becomes [`AuthError::Canceled`].
    pub fn into_result(self) -> Result<T, AuthError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Faulted(error) => Err(error),
            Self::Canceled => Err(AuthError::Canceled),
        }
    }
}
