#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use authbridge::error::AuthError;
use authbridge::orchestrator::AuthOrchestrator;
use authbridge::provider::{
    Credential, IdentityProvider, ProviderUser, StateListener, Subscription, UserHandle,
};
use authbridge::task::{self, PendingTask, TaskCompleter};
use url::Url;

#[derive(Debug, Clone)]
pub struct FakeUser {
    pub id: String,
    pub display_name: Option<String>,
    pub photo_url: Option<Url>,
    pub email: Option<String>,
    pub verified: bool,
    pub anonymous: bool,
}

impl FakeUser {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: None,
            photo_url: None,
            email: None,
            verified: false,
            anonymous: false,
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.display_name = Some(name.to_string());
        self
    }

    pub fn handle(self) -> UserHandle {
        Arc::new(self)
    }
}

impl ProviderUser for FakeUser {
    fn user_id(&self) -> String {
        self.id.clone()
    }

    fn display_name(&self) -> Option<String> {
        self.display_name.clone()
    }

    fn photo_url(&self) -> Option<Url> {
        self.photo_url.clone()
    }

    fn email(&self) -> Option<String> {
        self.email.clone()
    }

    fn is_email_verified(&self) -> bool {
        self.verified
    }

    fn is_anonymous(&self) -> bool {
        self.anonymous
    }
}

/// How the next provider task finishes.
#[derive(Debug, Clone)]
pub enum Script {
    Succeed,
    Fault(String),
    Cancel,
    /// Stay running until the test releases it.
    Hold,
}

type Listeners = Arc<Mutex<Vec<(usize, StateListener)>>>;

/// Scripted in-memory identity provider.
pub struct FakeProvider {
    current: Mutex<Option<UserHandle>>,
    listeners: Listeners,
    next_listener: AtomicUsize,
    calls: Mutex<Vec<String>>,
    sign_in_script: Mutex<Script>,
    next_user: Mutex<FakeUser>,
    held_sign_in: Mutex<Option<(TaskCompleter<UserHandle>, UserHandle)>>,
    token_script: Mutex<Script>,
    token_value: Mutex<String>,
    held_token: Mutex<Option<TaskCompleter<String>>>,
    token_fetches: AtomicUsize,
    last_force_refresh: Mutex<Option<bool>>,
    sign_outs: AtomicUsize,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            current: Mutex::new(None),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            sign_in_script: Mutex::new(Script::Succeed),
            next_user: Mutex::new(FakeUser::new("native-user")),
            held_sign_in: Mutex::new(None),
            token_script: Mutex::new(Script::Succeed),
            token_value: Mutex::new("native-token".to_string()),
            held_token: Mutex::new(None),
            token_fetches: AtomicUsize::new(0),
            last_force_refresh: Mutex::new(None),
            sign_outs: AtomicUsize::new(0),
        }
    }
}

impl FakeProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script_sign_in(&self, script: Script) {
        *self.sign_in_script.lock().unwrap() = script;
    }

    pub fn script_token(&self, script: Script) {
        *self.token_script.lock().unwrap() = script;
    }

    pub fn set_next_user(&self, user: FakeUser) {
        *self.next_user.lock().unwrap() = user;
    }

    pub fn set_token_value(&self, token: &str) {
        *self.token_value.lock().unwrap() = token.to_string();
    }

    /// Change the current user without notifying.
    pub fn set_current(&self, user: Option<UserHandle>) {
        *self.current.lock().unwrap() = user;
    }

    /// Fire the change notification to every listener.
    pub fn notify(&self) {
        let listeners: Vec<StateListener> = self
            .listeners
            .lock()
            .unwrap()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn token_fetches(&self) -> usize {
        self.token_fetches.load(Ordering::SeqCst)
    }

    pub fn last_force_refresh(&self) -> Option<bool> {
        *self.last_force_refresh.lock().unwrap()
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }

    /// Finish a held sign-in: publish the user, notify, then complete.
    pub fn release_sign_in(&self) {
        let held = self.held_sign_in.lock().unwrap().take();
        if let Some((completer, user)) = held {
            self.set_current(Some(user.clone()));
            self.notify();
            completer.complete(user);
        }
    }

    pub fn release_token(&self) {
        let held = self.held_token.lock().unwrap().take();
        if let Some(completer) = held {
            completer.complete(self.token_value.lock().unwrap().clone());
        }
    }

    fn user_task(&self, call: String) -> PendingTask<UserHandle> {
        self.calls.lock().unwrap().push(call);
        let user = self.next_user.lock().unwrap().clone().handle();
        let script = self.sign_in_script.lock().unwrap().clone();
        match script {
            Script::Succeed => {
                self.set_current(Some(user.clone()));
                self.notify();
                PendingTask::completed(user)
            }
            Script::Fault(message) => PendingTask::faulted(AuthError::Provider(message)),
            Script::Cancel => PendingTask::canceled(),
            Script::Hold => {
                let (completer, pending) = task::pending();
                *self.held_sign_in.lock().unwrap() = Some((completer, user));
                pending
            }
        }
    }
}

impl IdentityProvider for FakeProvider {
    fn current_user(&self) -> Option<UserHandle> {
        self.current.lock().unwrap().clone()
    }

    fn subscribe(&self, listener: StateListener) -> Subscription {
        let id = self.next_listener.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().unwrap().push((id, listener));
        let listeners = self.listeners.clone();
        Subscription::new(move || {
            listeners.lock().unwrap().retain(|(other, _)| *other != id);
        })
    }

    fn create_user_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> PendingTask<UserHandle> {
        self.user_task(format!("create:{email}"))
    }

    fn sign_in_with_email_and_password(
        &self,
        email: &str,
        _password: &str,
    ) -> PendingTask<UserHandle> {
        self.user_task(format!("email:{email}"))
    }

    fn sign_in_with_credential(&self, credential: Credential) -> PendingTask<UserHandle> {
        self.user_task(format!("credential:{}", credential.issuer()))
    }

    fn sign_in_anonymously(&self) -> PendingTask<UserHandle> {
        self.user_task("anonymous".to_string())
    }

    fn sign_out(&self) {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        self.set_current(None);
        self.notify();
    }

    fn fetch_token(&self, _user: &UserHandle, force_refresh: bool) -> PendingTask<String> {
        self.token_fetches.fetch_add(1, Ordering::SeqCst);
        *self.last_force_refresh.lock().unwrap() = Some(force_refresh);
        let script = self.token_script.lock().unwrap().clone();
        match script {
            Script::Succeed => PendingTask::completed(self.token_value.lock().unwrap().clone()),
            Script::Fault(message) => PendingTask::faulted(AuthError::Provider(message)),
            Script::Cancel => PendingTask::canceled(),
            Script::Hold => {
                let (completer, pending) = task::pending();
                *self.held_token.lock().unwrap() = Some(completer);
                pending
            }
        }
    }
}

/// Orchestrator that always selects the native path.
pub fn native_orchestrator(provider: &Arc<FakeProvider>) -> AuthOrchestrator {
    AuthOrchestrator::builder("http://127.0.0.1:9", provider.clone())
        .platform(|| true)
        .build()
        .expect("build orchestrator")
}

/// Orchestrator that always selects the fallback path.
pub fn web_orchestrator(provider: &Arc<FakeProvider>, service_url: &str) -> AuthOrchestrator {
    AuthOrchestrator::builder(service_url, provider.clone())
        .platform(|| false)
        .build()
        .expect("build orchestrator")
}
