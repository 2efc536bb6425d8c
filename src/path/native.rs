//! Native SDK path: provider tasks awaited until they finish.

use std::sync::Arc;

use async_trait::async_trait;

use super::{CredentialPath, PathKind};
use crate::error::AuthError;
use crate::provider::{Credential, IdentityProvider, UserHandle};
use crate::session::SharedSession;
use crate::task::PendingTask;
use crate::types::{ResultEnvelope, TokenEnvelope, TokenSnapshot, UserEnvelope, UserSnapshot};

/// Drives provider SDK operations and records their results in the session.
///
/// Faults and cancellations leave the session untouched.
#[derive(Clone)]
pub struct NativePath {
    provider: Arc<dyn IdentityProvider>,
    session: SharedSession,
}

impl NativePath {
    pub fn new(provider: Arc<dyn IdentityProvider>, session: SharedSession) -> Self {
        Self { provider, session }
    }

    async fn await_user(&self, operation: &'static str, task: PendingTask<UserHandle>) -> UserEnvelope {
        match task.wait().await {
            ResultEnvelope::Success(handle) => {
                let current = self.provider.current_user().unwrap_or(handle);
                let user = UserSnapshot::capture(current.as_ref());
                if user.user_id.is_empty() {
                    let error =
                        AuthError::InvalidResponse("provider user has an empty id".to_string());
                    tracing::warn!(operation, error = %error, "native sign-in rejected");
                    return ResultEnvelope::Faulted(error);
                }
                tracing::debug!(operation, user_id = %user.user_id, "native sign-in succeeded");
                self.session.set_user(user.clone());
                ResultEnvelope::Success(user)
            }
            ResultEnvelope::Faulted(error) => {
                tracing::warn!(operation, error = %error, "native sign-in faulted");
                ResultEnvelope::Faulted(error)
            }
            ResultEnvelope::Canceled => {
                tracing::debug!(operation, "native sign-in canceled");
                ResultEnvelope::Canceled
            }
        }
    }

    /// Fetch a token for `user` and cache it on success.
    pub async fn refresh_token(&self, user: &UserHandle, force_refresh: bool) -> TokenEnvelope {
        let envelope = self.provider.fetch_token(user, force_refresh).wait().await;
        match envelope {
            ResultEnvelope::Success(access_token) => {
                let token = TokenSnapshot::new(access_token);
                self.session.set_token(token.clone());
                ResultEnvelope::Success(Some(token))
            }
            ResultEnvelope::Faulted(error) => {
                tracing::warn!(force_refresh, error = %error, "token refresh faulted");
                ResultEnvelope::Faulted(error)
            }
            ResultEnvelope::Canceled => ResultEnvelope::Canceled,
        }
    }
}

#[async_trait]
impl CredentialPath for NativePath {
    fn kind(&self) -> PathKind {
        PathKind::Native
    }

    async fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> UserEnvelope {
        let task = self
            .provider
            .create_user_with_email_and_password(email, password);
        self.await_user("createUserWithEmailAndPassword", task).await
    }

    async fn sign_in_with_email_and_password(&self, email: &str, password: &str) -> UserEnvelope {
        let task = self.provider.sign_in_with_email_and_password(email, password);
        self.await_user("signInWithEmailAndPassword", task).await
    }

    async fn sign_in_with_facebook(&self, access_token: &str) -> UserEnvelope {
        let task = self
            .provider
            .sign_in_with_credential(Credential::facebook(access_token));
        self.await_user("signInWithFacebook", task).await
    }

    async fn sign_in_with_github(&self, access_token: &str) -> UserEnvelope {
        let task = self
            .provider
            .sign_in_with_credential(Credential::github(access_token));
        self.await_user("signInWithGithub", task).await
    }

    async fn sign_in_with_google(&self, id_token: &str, access_token: &str) -> UserEnvelope {
        let task = self
            .provider
            .sign_in_with_credential(Credential::google(id_token, access_token));
        self.await_user("signInWithGoogle", task).await
    }

    async fn sign_in_with_twitter(&self, token: &str, secret: &str) -> UserEnvelope {
        let task = self
            .provider
            .sign_in_with_credential(Credential::twitter(token, secret));
        self.await_user("signInWithTwitter", task).await
    }

    async fn sign_in_anonymously(&self) -> UserEnvelope {
        let task = self.provider.sign_in_anonymously();
        self.await_user("signInAnonymously", task).await
    }
}
