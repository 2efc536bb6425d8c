//! REST fallback path used when the native SDK is unavailable.

use async_trait::async_trait;
use serde::Deserialize;

use super::http::{endpoint_url, shared_client, status_error_message};
use super::{AuthRequest, CredentialPath, PathKind};
use crate::error::AuthError;
use crate::session::{SharedSession, TokenManager};
use crate::types::snapshot::parse_photo_url;
use crate::types::{ResultEnvelope, UserEnvelope, UserSnapshot};

/// Posts form-encoded credentials to `<service_url>/<operation>`.
///
/// Any failure (connection error, non-success status, malformed body) clears
/// the whole session before the faulted envelope is returned.
#[derive(Debug, Clone)]
pub struct WebPath {
    client: reqwest::Client,
    service_url: String,
    session: SharedSession,
}

impl WebPath {
    pub fn new(service_url: impl Into<String>, session: SharedSession) -> Self {
        Self {
            client: shared_client().clone(),
            service_url: service_url.into(),
            session,
        }
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Submit one request and fold the response into the session.
    pub async fn submit(&self, request: &AuthRequest) -> UserEnvelope {
        let url = endpoint_url(&self.service_url, request.operation());
        let outcome = match self.post(&url, &request.form_fields()).await {
            Ok(body) => parse_account(&body),
            Err(error) => Err(error),
        };
        match outcome {
            Ok((user, token_manager)) => {
                tracing::debug!(endpoint = %url, user_id = %user.user_id, "fallback sign-in succeeded");
                self.session.establish(user.clone(), token_manager);
                ResultEnvelope::Success(user)
            }
            Err(error) => {
                tracing::warn!(endpoint = %url, error = %error, "fallback sign-in failed; session cleared");
                self.session.clear();
                ResultEnvelope::Faulted(error)
            }
        }
    }

    async fn post(&self, url: &str, form: &[(&str, &str)]) -> Result<String, AuthError> {
        let response = self.client.post(url).form(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Transport(status_error_message(status, &body)));
        }
        Ok(body)
    }
}

#[async_trait]
impl CredentialPath for WebPath {
    fn kind(&self) -> PathKind {
        PathKind::Web
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> UserEnvelope {
        self.submit(&AuthRequest::CreateAccount {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    async fn sign_in_with_email_and_password(&self, email: &str, password: &str) -> UserEnvelope {
        self.submit(&AuthRequest::EmailPassword {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await
    }

    async fn sign_in_with_facebook(&self, access_token: &str) -> UserEnvelope {
        self.submit(&AuthRequest::Facebook {
            access_token: access_token.to_string(),
        })
        .await
    }

    async fn sign_in_with_github(&self, access_token: &str) -> UserEnvelope {
        self.submit(&AuthRequest::Github {
            access_token: access_token.to_string(),
        })
        .await
    }

    async fn sign_in_with_google(&self, id_token: &str, access_token: &str) -> UserEnvelope {
        self.submit(&AuthRequest::Google {
            id_token: id_token.to_string(),
            access_token: access_token.to_string(),
        })
        .await
    }

    async fn sign_in_with_twitter(&self, token: &str, secret: &str) -> UserEnvelope {
        self.submit(&AuthRequest::Twitter {
            token: token.to_string(),
            secret: secret.to_string(),
        })
        .await
    }

    async fn sign_in_anonymously(&self) -> UserEnvelope {
        self.submit(&AuthRequest::Anonymous).await
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    uid: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default, rename = "photoURL")]
    photo_url: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: bool,
    #[serde(default)]
    is_anonymous: bool,
    sts_token_manager: TokenManager,
}

fn parse_account(body: &str) -> Result<(UserSnapshot, TokenManager), AuthError> {
    let account: AccountResponse = serde_json::from_str(body)?;
    if account.uid.is_empty() {
        return Err(AuthError::InvalidResponse("empty uid".to_string()));
    }
    let user = UserSnapshot {
        photo_url: parse_photo_url(account.photo_url.as_deref())?,
        user_id: account.uid,
        display_name: account.display_name,
        email: account.email,
        is_email_verified: account.email_verified,
        is_anonymous: account.is_anonymous,
    };
    Ok((user, account.sts_token_manager))
}
