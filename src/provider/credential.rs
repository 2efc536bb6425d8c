use serde::Serialize;
use strum::Display;

/// Identity providers that issue third-party credentials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CredentialIssuer {
    Facebook,
    Github,
    Google,
    Twitter,
}

/// Third-party credential passed straight through to
/// [`IdentityProvider::sign_in_with_credential`](super::IdentityProvider::sign_in_with_credential).
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Access-token based issuers (Facebook, GitHub).
    AccessToken {
        issuer: CredentialIssuer,
        access_token: String,
    },
    /// Google: id token plus access token.
    IdToken {
        id_token: String,
        access_token: String,
    },
    /// Twitter: token plus secret.
    TokenSecret { token: String, secret: String },
}

impl Credential {
    pub fn facebook(access_token: impl Into<String>) -> Self {
        Self::AccessToken {
            issuer: CredentialIssuer::Facebook,
            access_token: access_token.into(),
        }
    }

    pub fn github(access_token: impl Into<String>) -> Self {
        Self::AccessToken {
            issuer: CredentialIssuer::Github,
            access_token: access_token.into(),
        }
    }

    pub fn google(id_token: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::IdToken {
            id_token: id_token.into(),
            access_token: access_token.into(),
        }
    }

    pub fn twitter(token: impl Into<String>, secret: impl Into<String>) -> Self {
        Self::TokenSecret {
            token: token.into(),
            secret: secret.into(),
        }
    }

    pub fn issuer(&self) -> CredentialIssuer {
        match self {
            Self::AccessToken { issuer, .. } => *issuer,
            Self::IdToken { .. } => CredentialIssuer::Google,
            Self::TokenSecret { .. } => CredentialIssuer::Twitter,
        }
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("issuer", &self.issuer())
            .finish_non_exhaustive()
    }
}
