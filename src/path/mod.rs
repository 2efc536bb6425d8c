//! Credential paths: the native SDK path and the REST fallback path.
//!
//! Both implement [`CredentialPath`], so the orchestrator picks one per
//! operation and never branches on the platform anywhere else.

pub mod http;
pub mod native;
pub mod web;

pub use native::NativePath;
pub use web::WebPath;

use async_trait::async_trait;
use strum::Display;

use crate::types::UserEnvelope;

/// Which path served an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PathKind {
    Native,
    Web,
}

/// One credential operation with its parameters.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthRequest {
    CreateAccount { email: String, password: String },
    EmailPassword { email: String, password: String },
    Facebook { access_token: String },
    Github { access_token: String },
    Google { id_token: String, access_token: String },
    Twitter { token: String, secret: String },
    Anonymous,
}

impl AuthRequest {
    /// Operation name, also the fallback endpoint path segment.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::CreateAccount { .. } => "createUserWithEmailAndPassword",
            Self::EmailPassword { .. } => "signInWithEmailAndPassword",
            Self::Facebook { .. } => "signInWithFacebook",
            Self::Github { .. } => "signInWithGithub",
            Self::Google { .. } => "signInWithGoogle",
            Self::Twitter { .. } => "signInWithTwitter",
            Self::Anonymous => "signInAnonymously",
        }
    }

    /// Form fields posted to the fallback service.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            Self::CreateAccount { email, password } | Self::EmailPassword { email, password } => {
                vec![("email", email.as_str()), ("password", password.as_str())]
            }
            Self::Facebook { access_token } | Self::Github { access_token } => {
                vec![("access_token", access_token.as_str())]
            }
            Self::Google {
                id_token,
                access_token,
            } => vec![
                ("id_token", id_token.as_str()),
                ("access_token", access_token.as_str()),
            ],
            Self::Twitter { token, secret } => {
                vec![("token", token.as_str()), ("secret", secret.as_str())]
            }
            Self::Anonymous => Vec::new(),
        }
    }

    /// Route the request to the matching [`CredentialPath`] method.
    pub async fn run(&self, path: &dyn CredentialPath) -> UserEnvelope {
        match self {
            Self::CreateAccount { email, password } => {
                path.create_user_with_email_and_password(email, password).await
            }
            Self::EmailPassword { email, password } => {
                path.sign_in_with_email_and_password(email, password).await
            }
            Self::Facebook { access_token } => path.sign_in_with_facebook(access_token).await,
            Self::Github { access_token } => path.sign_in_with_github(access_token).await,
            Self::Google {
                id_token,
                access_token,
            } => path.sign_in_with_google(id_token, access_token).await,
            Self::Twitter { token, secret } => path.sign_in_with_twitter(token, secret).await,
            Self::Anonymous => path.sign_in_anonymously().await,
        }
    }
}

impl std::fmt::Debug for AuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.operation())
    }
}

/// A way of turning credentials into an authenticated user.
///
/// Each method resolves once the underlying unit of work has fully completed
/// and has already written its result into the session.
#[async_trait]
pub trait CredentialPath: Send + Sync {
    fn kind(&self) -> PathKind;

    async fn create_user_with_email_and_password(&self, email: &str, password: &str)
        -> UserEnvelope;

    async fn sign_in_with_email_and_password(&self, email: &str, password: &str) -> UserEnvelope;

    async fn sign_in_with_facebook(&self, access_token: &str) -> UserEnvelope;

    async fn sign_in_with_github(&self, access_token: &str) -> UserEnvelope;

    async fn sign_in_with_google(&self, id_token: &str, access_token: &str) -> UserEnvelope;

    async fn sign_in_with_twitter(&self, token: &str, secret: &str) -> UserEnvelope;

    async fn sign_in_anonymously(&self) -> UserEnvelope;
}
