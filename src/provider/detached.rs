use super::{Credential, IdentityProvider, StateListener, Subscription, UserHandle};
use crate::error::AuthError;
use crate::task::PendingTask;

/// Provider for hosts that ship without a native SDK.
///
/// There is never a current user, notifications never fire, and every native
/// operation faults. Pair it with a platform capability that selects the
/// fallback path.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedProvider;

impl DetachedProvider {
    pub fn new() -> Self {
        Self
    }

    fn unavailable<T: Clone>(operation: &str) -> PendingTask<T> {
        PendingTask::faulted(AuthError::Provider(format!(
            "{operation} requires a native identity SDK"
        )))
    }
}

impl IdentityProvider for DetachedProvider {
    fn current_user(&self) -> Option<UserHandle> {
        None
    }

    fn subscribe(&self, _listener: StateListener) -> Subscription {
        Subscription::detached()
    }

    fn create_user_with_email_and_password(&self, _: &str, _: &str) -> PendingTask<UserHandle> {
        Self::unavailable("createUserWithEmailAndPassword")
    }

    fn sign_in_with_email_and_password(&self, _: &str, _: &str) -> PendingTask<UserHandle> {
        Self::unavailable("signInWithEmailAndPassword")
    }

    fn sign_in_with_credential(&self, credential: Credential) -> PendingTask<UserHandle> {
        Self::unavailable(&format!("signInWithCredential({})", credential.issuer()))
    }

    fn sign_in_anonymously(&self) -> PendingTask<UserHandle> {
        Self::unavailable("signInAnonymously")
    }

    fn sign_out(&self) {}

    fn fetch_token(&self, _user: &UserHandle, _force_refresh: bool) -> PendingTask<String> {
        Self::unavailable("fetchToken")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn native_calls_fault() {
        let provider = DetachedProvider::new();
        assert!(provider.current_user().is_none());
        let envelope = provider.sign_in_anonymously().wait().await;
        assert!(matches!(envelope.error(), Some(AuthError::Provider(msg)) if msg.contains("signInAnonymously")));
    }
}
