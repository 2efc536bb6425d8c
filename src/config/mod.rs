//! Configuration (layered: code > env > TOML file).

use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AuthError;
use crate::platform::{RuntimeEnvironment, RuntimePlatform};

pub const SERVICE_URL_ENV: &str = "AUTHBRIDGE_SERVICE_URL";
pub const PLATFORM_ENV: &str = "AUTHBRIDGE_PLATFORM";
pub const EDITOR_ENV: &str = "AUTHBRIDGE_EDITOR";

/// Orchestrator settings.
///
/// # Example
/// ```
/// use authbridge::config::AuthConfig;
/// use authbridge::platform::RuntimePlatform;
///
/// let config = AuthConfig::from_toml_str(
///     r#"
///     service_url = "https://auth.example.com/api"
///     platform = "android"
///     is_editor = true
///     "#,
/// )?;
/// assert_eq!(config.platform, RuntimePlatform::Android);
/// # Ok::<(), authbridge::error::AuthError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    pub service_url: String,
    #[serde(default = "RuntimePlatform::current")]
    pub platform: RuntimePlatform,
    #[serde(default)]
    pub is_editor: bool,
}

impl AuthConfig {
    /// Config for the compilation target's platform, outside any editor.
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            platform: RuntimePlatform::current(),
            is_editor: false,
        }
    }

    pub fn with_platform(mut self, platform: RuntimePlatform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_editor(mut self, is_editor: bool) -> Self {
        self.is_editor = is_editor;
        self
    }

    /// Load from environment variables (a `.env` file is honored if present).
    ///
    /// `AUTHBRIDGE_SERVICE_URL` is required; `AUTHBRIDGE_PLATFORM` and
    /// `AUTHBRIDGE_EDITOR` are optional.
    pub fn from_env() -> Result<Self, AuthError> {
        let _ = dotenvy::dotenv();
        let service_url = std::env::var(SERVICE_URL_ENV)
            .map_err(|_| AuthError::Configuration(format!("{SERVICE_URL_ENV} not set")))?;
        let mut config = Self::new(service_url);
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, AuthError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file, then let environment variables override it.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AuthError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config: Self = toml::from_str(&raw)?;
        if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
            config.service_url = url;
        }
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), AuthError> {
        if let Ok(raw) = std::env::var(PLATFORM_ENV) {
            self.platform = raw.trim().parse().map_err(|_| {
                AuthError::Configuration(format!("{PLATFORM_ENV}: unknown platform {raw:?}"))
            })?;
        }
        if let Ok(raw) = std::env::var(EDITOR_ENV) {
            self.is_editor = parse_flag(&raw).ok_or_else(|| {
                AuthError::Configuration(format!("{EDITOR_ENV}: expected a boolean, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    /// The service URL must be an absolute http(s) address.
    pub fn validate(&self) -> Result<(), AuthError> {
        let url = Url::parse(&self.service_url).map_err(|e| {
            AuthError::Configuration(format!("service_url {:?}: {e}", self.service_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AuthError::Configuration(format!(
                "service_url must use http or https, got {}",
                url.scheme()
            )));
        }
        Ok(())
    }

    /// Runtime environment used as the default platform capability.
    pub fn environment(&self) -> RuntimeEnvironment {
        RuntimeEnvironment::new(self.platform, self.is_editor)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_defaults_editor_to_false() {
        let config =
            AuthConfig::from_toml_str("service_url = \"http://localhost:5000\"\nplatform = \"linux_player\"")
                .unwrap();
        assert!(!config.is_editor);
        assert_eq!(config.platform, RuntimePlatform::LinuxPlayer);
    }

    #[test]
    fn relative_service_url_is_rejected() {
        let err = AuthConfig::from_toml_str("service_url = \"/auth\"").unwrap_err();
        assert!(matches!(err, AuthError::Configuration(_)));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err = AuthConfig::new("ftp://files.example.com").validate().unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn flags_parse_common_spellings() {
        assert_eq!(parse_flag("YES"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn environment_reflects_fields() {
        let env = AuthConfig::new("https://a.example")
            .with_platform(RuntimePlatform::IphonePlayer)
            .with_editor(true)
            .environment();
        assert_eq!(env, RuntimeEnvironment::new(RuntimePlatform::IphonePlayer, true));
    }
}
