//! Latest known user and token, readable synchronously.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Deserialize;

use crate::types::{TokenSnapshot, UserSnapshot};

/// Token-manager structure returned by the fallback service alongside a user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenManager {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expiration_time: Option<i64>,
}

/// Current session contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub current_user: Option<UserSnapshot>,
    pub current_token: Option<TokenSnapshot>,
    pub token_manager: Option<TokenManager>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Shared handle to the session. Only the orchestrator and its paths write.
///
/// The lock is held for plain field updates only, never across a suspend
/// point or a provider call.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> SessionState {
        self.lock().clone()
    }

    pub fn current_user(&self) -> Option<UserSnapshot> {
        self.lock().current_user.clone()
    }

    pub fn current_token(&self) -> Option<TokenSnapshot> {
        self.lock().current_token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    pub(crate) fn set_user(&self, user: UserSnapshot) {
        self.lock().current_user = Some(user);
    }

    pub(crate) fn set_token(&self, token: TokenSnapshot) {
        self.lock().current_token = Some(token);
    }

    /// Store a fallback-service sign-in result in one step.
    pub(crate) fn establish(&self, user: UserSnapshot, token_manager: TokenManager) {
        let mut state = self.lock();
        state.current_token = Some(TokenSnapshot::new(token_manager.access_token.clone()));
        state.token_manager = Some(token_manager);
        state.current_user = Some(user);
    }

    /// Replace the user only when a session is already established.
    /// An empty session stays empty; losing the user clears everything.
    pub(crate) fn refresh_user(&self, user: Option<UserSnapshot>) {
        let mut state = self.lock();
        if state.current_user.is_none() {
            return;
        }
        match user {
            Some(user) => state.current_user = Some(user),
            None => state.clear(),
        }
    }

    pub(crate) fn clear_user(&self) {
        self.lock().current_user = None;
    }

    pub(crate) fn clear(&self) {
        self.lock().clear();
    }
}
