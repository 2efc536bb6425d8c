//! Boundary to the native identity SDK.
//!
//! The orchestrator only sees the capability contract below: a current-user
//! accessor, a change notification, and asynchronous operations that hand back
//! [`PendingTask`]s. Concrete SDK bindings live outside this crate.

pub mod credential;
pub mod detached;

pub use credential::Credential;
pub use detached::DetachedProvider;

use std::fmt;
use std::sync::{Arc, Mutex};

use url::Url;

use crate::task::PendingTask;

/// Live user object owned by the provider.
pub trait ProviderUser: Send + Sync {
    fn user_id(&self) -> String;
    fn display_name(&self) -> Option<String>;
    fn photo_url(&self) -> Option<Url>;
    fn email(&self) -> Option<String>;
    fn is_email_verified(&self) -> bool;
    fn is_anonymous(&self) -> bool;
}

/// Opaque handle to the provider's current user. Identity is pointer identity.
pub type UserHandle = Arc<dyn ProviderUser>;

/// Callback fired whenever the provider's current user may have changed.
pub type StateListener = Arc<dyn Fn() + Send + Sync>;

/// Whether two optional handles refer to the same provider user object.
pub fn same_user(a: Option<&UserHandle>, b: Option<&UserHandle>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

/// Native identity SDK capability contract.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<UserHandle>;

    /// Register a change listener. Dropping or releasing the returned
    /// [`Subscription`] unregisters it.
    fn subscribe(&self, listener: StateListener) -> Subscription;

    fn create_user_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> PendingTask<UserHandle>;

    fn sign_in_with_email_and_password(&self, email: &str, password: &str)
        -> PendingTask<UserHandle>;

    fn sign_in_with_credential(&self, credential: Credential) -> PendingTask<UserHandle>;

    fn sign_in_anonymously(&self) -> PendingTask<UserHandle>;

    fn sign_out(&self);

    /// Fetch an access token for `user`, bypassing the SDK cache when forced.
    fn fetch_token(&self, user: &UserHandle, force_refresh: bool) -> PendingTask<String>;
}

type Unsubscribe = Box<dyn FnOnce() + Send>;

/// Disposable registration of a [`StateListener`].
pub struct Subscription {
    release: Mutex<Option<Unsubscribe>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Mutex::new(Some(Box::new(release))),
        }
    }

    /// A subscription with nothing to release.
    pub fn detached() -> Self {
        Self {
            release: Mutex::new(None),
        }
    }

    /// Unregister the listener. Later calls do nothing.
    pub fn unsubscribe(&self) {
        let release = self
            .release
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(release) = release {
            release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.release
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unsubscribe_runs_release_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let subscription = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(subscription.is_active());
        subscription.unsubscribe();
        subscription.unsubscribe();
        drop(subscription);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_subscription() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        drop(Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
