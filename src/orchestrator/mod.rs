//! The authentication-session orchestrator.
//!
//! [`AuthOrchestrator`] is the single entry point for credential operations
//! and the single writer of the session. Each operation picks a credential
//! path through the injected [`PlatformCapability`], runs it on the scheduler
//! handle, and hands exactly one [`ResultEnvelope`] to the caller's
//! continuation.
//!
//! ```text
//! caller ──→ select path ──→ NativePath (provider task, awaited)
//!                   └──────→ WebPath    (HTTP POST, awaited)
//!                                 │
//!                                 ▼
//!                      update session ──→ continuation(envelope)
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::path::{AuthRequest, CredentialPath, NativePath, WebPath};
use crate::platform::{PlatformCapability, RuntimeEnvironment};
use crate::provider::{same_user, IdentityProvider, StateListener, Subscription, UserHandle};
use crate::session::{SessionState, SharedSession};
use crate::types::{
    ResultEnvelope, TokenEnvelope, TokenSnapshot, UserEnvelope, UserSnapshot,
};

/// Orchestrates sign-in, token retrieval and sign-out over two credential paths.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use authbridge::orchestrator::AuthOrchestrator;
/// use authbridge::provider::DetachedProvider;
///
/// # async fn example() {
/// let auth = AuthOrchestrator::new(
///     "https://auth.example.com",
///     tokio::runtime::Handle::current(),
///     Arc::new(DetachedProvider::new()),
/// );
/// auth.sign_in_anonymously(|envelope| {
///     if let Some(user) = envelope.value() {
///         println!("signed in as {}", user.user_id);
///     }
/// });
/// # }
/// ```
#[derive(Clone)]
pub struct AuthOrchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    runtime: Handle,
    session: SharedSession,
    web: WebPath,
    platform: Arc<dyn PlatformCapability>,
    link: Mutex<ProviderLink>,
}

/// Everything tied to the provider's lifetime; emptied by teardown.
#[derive(Default)]
struct ProviderLink {
    provider: Option<Arc<dyn IdentityProvider>>,
    user: Option<UserHandle>,
    subscription: Option<Subscription>,
}

/// What a change notification means for the remembered user handle.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Transition {
    SignedIn(String),
    SignedOut(String),
    Unchanged,
}

impl Transition {
    /// Signed in when the handle changed to a present user. Otherwise a
    /// previously remembered user counts as signed out, even the same handle.
    fn between(previous: Option<&UserHandle>, current: Option<&UserHandle>) -> Self {
        match current {
            Some(user) if !same_user(previous, current) => Self::SignedIn(user.user_id()),
            _ => match previous {
                Some(user) => Self::SignedOut(user.user_id()),
                None => Self::Unchanged,
            },
        }
    }
}

enum TokenPlan {
    Cached(TokenSnapshot),
    Refresh(NativePath, UserHandle),
    Unavailable(Option<TokenSnapshot>),
}

/// Builder for [`AuthOrchestrator`].
pub struct OrchestratorBuilder {
    service_url: String,
    provider: Arc<dyn IdentityProvider>,
    runtime: Option<Handle>,
    platform: Option<Arc<dyn PlatformCapability>>,
    client: Option<reqwest::Client>,
}

impl OrchestratorBuilder {
    pub fn runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn platform(mut self, platform: impl PlatformCapability + 'static) -> Self {
        self.platform = Some(Arc::new(platform));
        self
    }

    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Subscribe to the provider and synchronize initial state.
    ///
    /// Without an explicit runtime the current tokio runtime is used.
    pub fn build(self) -> Result<AuthOrchestrator, AuthError> {
        let runtime = match self.runtime {
            Some(runtime) => runtime,
            None => Handle::try_current().map_err(|e| {
                AuthError::Configuration(format!("no scheduler handle available: {e}"))
            })?,
        };
        let platform = self
            .platform
            .unwrap_or_else(|| Arc::new(RuntimeEnvironment::detect()));
        let session = SharedSession::new();
        let mut web = WebPath::new(self.service_url, session.clone());
        if let Some(client) = self.client {
            web = web.with_client(client);
        }
        Ok(AuthOrchestrator::assemble(
            runtime,
            session,
            web,
            platform,
            self.provider,
        ))
    }
}

impl AuthOrchestrator {
    /// Create an orchestrator for the compilation target's platform.
    pub fn new(
        service_url: impl Into<String>,
        runtime: Handle,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let session = SharedSession::new();
        let web = WebPath::new(service_url, session.clone());
        let platform: Arc<dyn PlatformCapability> = Arc::new(RuntimeEnvironment::detect());
        Self::assemble(runtime, session, web, platform, provider)
    }

    pub fn builder(
        service_url: impl Into<String>,
        provider: Arc<dyn IdentityProvider>,
    ) -> OrchestratorBuilder {
        OrchestratorBuilder {
            service_url: service_url.into(),
            provider,
            runtime: None,
            platform: None,
            client: None,
        }
    }

    /// Create an orchestrator from a resolved [`AuthConfig`].
    pub fn from_config(
        config: &AuthConfig,
        runtime: Handle,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let session = SharedSession::new();
        let web = WebPath::new(config.service_url.clone(), session.clone());
        let platform: Arc<dyn PlatformCapability> = Arc::new(config.environment());
        Self::assemble(runtime, session, web, platform, provider)
    }

    fn assemble(
        runtime: Handle,
        session: SharedSession,
        web: WebPath,
        platform: Arc<dyn PlatformCapability>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let inner = Arc::new(Inner {
            runtime,
            session,
            web,
            platform,
            link: Mutex::new(ProviderLink {
                provider: Some(provider.clone()),
                ..ProviderLink::default()
            }),
        });

        let weak = Arc::downgrade(&inner);
        let listener: StateListener = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.on_provider_state_changed();
            }
        });
        let subscription = provider.subscribe(listener);
        inner.link().subscription = Some(subscription);
        inner.on_provider_state_changed();

        Self { inner }
    }

    /// Whether a user session is established. Pure read.
    pub fn is_authenticated(&self) -> bool {
        self.inner.session.is_authenticated()
    }

    pub fn current_user(&self) -> Option<UserSnapshot> {
        self.inner.session.current_user()
    }

    pub fn current_token(&self) -> Option<TokenSnapshot> {
        self.inner.session.current_token()
    }

    /// Copy of the whole session.
    pub fn session(&self) -> SessionState {
        self.inner.session.snapshot()
    }

    pub fn service_url(&self) -> &str {
        self.inner.web.service_url()
    }

    /// Run one credential operation to completion on the selected path.
    pub async fn authenticate(&self, request: AuthRequest) -> UserEnvelope {
        self.inner.authenticate(request).await
    }

    /// Spawn `request` on the scheduler and deliver its envelope to `continuation`.
    pub fn submit(
        &self,
        request: AuthRequest,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let inner = self.inner.clone();
        self.inner.runtime.spawn(async move {
            let envelope = inner.authenticate(request).await;
            continuation(envelope);
        });
    }

    pub fn create_user_with_email_and_password(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::CreateAccount {
            email: email.into(),
            password: password.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_with_email_and_password(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::EmailPassword {
            email: email.into(),
            password: password.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_with_facebook(
        &self,
        access_token: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::Facebook {
            access_token: access_token.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_with_github(
        &self,
        access_token: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::Github {
            access_token: access_token.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_with_google(
        &self,
        id_token: impl Into<String>,
        access_token: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::Google {
            id_token: id_token.into(),
            access_token: access_token.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_with_twitter(
        &self,
        token: impl Into<String>,
        secret: impl Into<String>,
        continuation: impl FnOnce(UserEnvelope) + Send + 'static,
    ) {
        let request = AuthRequest::Twitter {
            token: token.into(),
            secret: secret.into(),
        };
        self.submit(request, continuation);
    }

    pub fn sign_in_anonymously(&self, continuation: impl FnOnce(UserEnvelope) + Send + 'static) {
        self.submit(AuthRequest::Anonymous, continuation);
    }

    /// Resolve an access token.
    ///
    /// A cached token is returned as-is unless `force_refresh` is set. Without
    /// a cache hit the provider is asked for a fresh token for the current
    /// user; with no user either, the (possibly empty) cache is returned.
    pub async fn access_token(&self, force_refresh: bool) -> TokenEnvelope {
        match self.inner.token_plan(force_refresh) {
            TokenPlan::Cached(token) => ResultEnvelope::Success(Some(token)),
            TokenPlan::Unavailable(cached) => ResultEnvelope::Success(cached),
            TokenPlan::Refresh(path, user) => path.refresh_token(&user, force_refresh).await,
        }
    }

    /// Continuation form of [`access_token`](Self::access_token).
    ///
    /// Cache hits and the no-user case invoke `continuation` before this call
    /// returns; only a provider fetch is deferred to the scheduler.
    pub fn get_access_token(
        &self,
        force_refresh: bool,
        continuation: impl FnOnce(TokenEnvelope) + Send + 'static,
    ) {
        match self.inner.token_plan(force_refresh) {
            TokenPlan::Cached(token) => continuation(ResultEnvelope::Success(Some(token))),
            TokenPlan::Unavailable(cached) => continuation(ResultEnvelope::Success(cached)),
            TokenPlan::Refresh(path, user) => {
                self.inner.runtime.spawn(async move {
                    let envelope = path.refresh_token(&user, force_refresh).await;
                    continuation(envelope);
                });
            }
        }
    }

    /// Sign out of the provider and clear the session. Idempotent.
    pub fn sign_out(&self) {
        let provider = self.inner.link().provider.clone();
        if let Some(provider) = provider {
            provider.sign_out();
        }
        self.inner.session.clear();
        tracing::debug!("session cleared by sign-out");
    }

    /// Release the provider subscription and handle. Later calls do nothing.
    ///
    /// The fallback path stays usable; native operations fault with
    /// [`AuthError::Detached`]. A native operation already in flight keeps
    /// its own provider handle and still records its user when it finishes.
    pub fn teardown(&self) {
        let subscription = {
            let mut link = self.inner.link();
            link.provider = None;
            link.user = None;
            link.subscription.take()
        };
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            self.inner.session.clear_user();
            tracing::debug!("orchestrator detached from provider");
        }
    }
}

impl fmt::Debug for AuthOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthOrchestrator")
            .field("service_url", &self.inner.web.service_url())
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Inner {
    fn link(&self) -> MutexGuard<'_, ProviderLink> {
        self.link
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reconcile the remembered user handle with the provider's current one.
    ///
    /// A bare notification refreshes an established session but never
    /// establishes one; that only happens on an operation's success path.
    fn on_provider_state_changed(&self) {
        let Some(provider) = self.link().provider.clone() else {
            return;
        };
        let current = provider.current_user();
        let previous = std::mem::replace(&mut self.link().user, current.clone());

        let transition = Transition::between(previous.as_ref(), current.as_ref());
        if let Transition::SignedOut(user_id) = &transition {
            tracing::info!(user_id = %user_id, "signed out");
        }

        self.session.refresh_user(
            current
                .as_ref()
                .map(|user| UserSnapshot::capture(user.as_ref())),
        );

        if let Transition::SignedIn(user_id) = &transition {
            tracing::info!(user_id = %user_id, "signed in");
        }
    }

    fn select_path(&self) -> Result<Arc<dyn CredentialPath>, AuthError> {
        if self.platform.supports_native_sdk() {
            let provider = self.link().provider.clone().ok_or(AuthError::Detached)?;
            Ok(Arc::new(NativePath::new(provider, self.session.clone())))
        } else {
            Ok(Arc::new(self.web.clone()))
        }
    }

    async fn authenticate(&self, request: AuthRequest) -> UserEnvelope {
        match self.select_path() {
            Ok(path) => {
                tracing::debug!(operation = request.operation(), path = %path.kind(), "dispatching");
                request.run(path.as_ref()).await
            }
            Err(error) => {
                tracing::warn!(operation = request.operation(), error = %error, "no usable credential path");
                ResultEnvelope::Faulted(error)
            }
        }
    }

    fn token_plan(&self, force_refresh: bool) -> TokenPlan {
        let cached = self.session.current_token();
        if !force_refresh {
            if let Some(token) = cached {
                tracing::debug!("serving cached access token");
                return TokenPlan::Cached(token);
            }
        }
        let link = self.link();
        match (&link.provider, &link.user) {
            (Some(provider), Some(user)) => TokenPlan::Refresh(
                NativePath::new(provider.clone(), self.session.clone()),
                user.clone(),
            ),
            _ => TokenPlan::Unavailable(cached),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderUser;
    use url::Url;

    struct StubUser(&'static str);

    impl ProviderUser for StubUser {
        fn user_id(&self) -> String {
            self.0.to_string()
        }
        fn display_name(&self) -> Option<String> {
            None
        }
        fn photo_url(&self) -> Option<Url> {
            None
        }
        fn email(&self) -> Option<String> {
            None
        }
        fn is_email_verified(&self) -> bool {
            false
        }
        fn is_anonymous(&self) -> bool {
            true
        }
    }

    fn handle(id: &'static str) -> UserHandle {
        Arc::new(StubUser(id))
    }

    #[test]
    fn new_user_is_signed_in() {
        let user = handle("u1");
        assert_eq!(
            Transition::between(None, Some(&user)),
            Transition::SignedIn("u1".to_string())
        );
    }

    #[test]
    fn losing_the_user_is_signed_out() {
        let user = handle("u1");
        assert_eq!(
            Transition::between(Some(&user), None),
            Transition::SignedOut("u1".to_string())
        );
    }

    #[test]
    fn same_handle_again_counts_as_signed_out() {
        let user = handle("u1");
        assert_eq!(
            Transition::between(Some(&user), Some(&user)),
            Transition::SignedOut("u1".to_string())
        );
    }

    #[test]
    fn switching_users_signs_in_the_new_one() {
        let before = handle("u1");
        let after = handle("u2");
        assert_eq!(
            Transition::between(Some(&before), Some(&after)),
            Transition::SignedIn("u2".to_string())
        );
    }

    #[test]
    fn handles_compare_by_identity_not_id() {
        let first = handle("u1");
        let second = handle("u1");
        assert_eq!(
            Transition::between(Some(&first), Some(&second)),
            Transition::SignedIn("u1".to_string())
        );
    }

    #[test]
    fn nothing_before_or_after_is_unchanged() {
        assert_eq!(Transition::between(None, None), Transition::Unchanged);
    }
}
