//! Provider change notifications, sign-out and lifecycle.

mod auth_support;

use auth_support::{native_orchestrator, web_orchestrator, FakeProvider, FakeUser};
use authbridge::path::AuthRequest;
use authbridge::session::SessionState;
use authbridge::types::TokenSnapshot;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn construction_subscribes_and_remembers_the_provider_user() {
    let provider = FakeProvider::new();
    provider.set_current(Some(FakeUser::new("existing").handle()));

    let auth = native_orchestrator(&provider);

    assert_eq!(provider.listener_count(), 1);
    assert!(!auth.is_authenticated());

    let token = auth.access_token(false).await;
    assert!(token.is_success());
    assert_eq!(provider.token_fetches(), 1);
}

#[tokio::test]
async fn notification_alone_never_establishes_a_session() {
    let provider = FakeProvider::new();
    let auth = native_orchestrator(&provider);

    provider.set_current(Some(FakeUser::new("someone").handle()));
    provider.notify();

    assert!(!auth.is_authenticated());
    assert!(auth.current_user().is_none());
}

#[tokio::test]
async fn notification_refreshes_an_established_session() {
    let provider = FakeProvider::new();
    provider.set_next_user(FakeUser::new("u1").named("Before"));
    let auth = native_orchestrator(&provider);
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());

    provider.set_current(Some(FakeUser::new("u1").named("After").handle()));
    provider.notify();

    let user = auth.current_user().expect("still signed in");
    assert_eq!(user.display_name.as_deref(), Some("After"));
}

#[tokio::test]
async fn provider_sign_out_notification_drops_the_user() {
    let provider = FakeProvider::new();
    let auth = native_orchestrator(&provider);
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());

    provider.set_current(None);
    provider.notify();

    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn provider_sign_out_notification_discards_the_cached_token() {
    let provider = FakeProvider::new();
    provider.set_token_value("t-old");
    let auth = native_orchestrator(&provider);
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());
    auth.access_token(false).await;
    assert_eq!(auth.current_token(), Some(TokenSnapshot::new("t-old")));

    provider.set_current(None);
    provider.notify();

    assert_eq!(auth.session(), SessionState::default());
    let served = auth.access_token(false).await;
    assert_eq!(served.value(), Some(&None));
    assert_eq!(provider.token_fetches(), 1);
}

#[tokio::test]
async fn sign_out_clears_everything_and_is_idempotent() {
    let provider = FakeProvider::new();
    let auth = native_orchestrator(&provider);
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());
    auth.access_token(false).await;
    assert!(auth.current_token().is_some());

    auth.sign_out();
    assert_eq!(auth.session(), SessionState::default());

    auth.sign_out();
    assert_eq!(auth.session(), SessionState::default());
    assert_eq!(provider.sign_outs(), 2);
}

#[tokio::test]
async fn sign_out_clears_a_fallback_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signInAnonymously"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uid": "anon",
            "isAnonymous": true,
            "stsTokenManager": { "accessToken": "tok" }
        })))
        .mount(&server)
        .await;

    let provider = FakeProvider::new();
    let auth = web_orchestrator(&provider, &server.uri());
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());
    assert_eq!(auth.current_token(), Some(TokenSnapshot::new("tok")));

    auth.sign_out();

    assert!(!auth.is_authenticated());
    assert!(auth.current_token().is_none());
}

#[tokio::test]
async fn teardown_keeps_the_fallback_path_usable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signInAnonymously"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "uid": "anon",
            "stsTokenManager": { "accessToken": "tok" }
        })))
        .mount(&server)
        .await;

    let provider = FakeProvider::new();
    let auth = web_orchestrator(&provider, &server.uri());
    auth.teardown();
    auth.teardown();

    assert_eq!(provider.listener_count(), 0);
    assert!(auth.authenticate(AuthRequest::Anonymous).await.is_success());
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn dropping_the_orchestrator_releases_the_listener() {
    let provider = FakeProvider::new();
    let auth = native_orchestrator(&provider);
    assert_eq!(provider.listener_count(), 1);

    drop(auth);

    assert_eq!(provider.listener_count(), 0);
    provider.notify();
}
