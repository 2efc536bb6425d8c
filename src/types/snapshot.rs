//! Point-in-time copies of provider user and token state.

use serde::Serialize;
use url::Url;

use crate::error::AuthError;
use crate::provider::ProviderUser;

/// Copy of an authenticated user, decoupled from the live provider object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSnapshot {
    pub user_id: String,
    pub display_name: Option<String>,
    pub photo_url: Option<Url>,
    pub email: Option<String>,
    pub is_email_verified: bool,
    pub is_anonymous: bool,
}

impl UserSnapshot {
    /// Copy the current state of a provider user handle.
    pub fn capture(user: &dyn ProviderUser) -> Self {
        Self {
            user_id: user.user_id(),
            display_name: user.display_name(),
            photo_url: user.photo_url(),
            email: user.email(),
            is_email_verified: user.is_email_verified(),
            is_anonymous: user.is_anonymous(),
        }
    }
}

/// Cached access token. Carries no expiry; refresh is requested explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSnapshot {
    pub access_token: String,
}

impl TokenSnapshot {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Parse an optional photo URL. Missing and empty strings are both absent.
pub(crate) fn parse_photo_url(raw: Option<&str>) -> Result<Option<Url>, AuthError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Ok(Some(Url::parse(text)?)),
    }
}
