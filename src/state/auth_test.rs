use super::*;
use crate::net::http::SessionEvent;
use crate::state::storage::MemoryStorage;
use crate::test_helpers::{MockBackend, MockRoute, route, sample_user, user_json};

use axum::http::Method;

async fn signed_out(routes: Vec<MockRoute>) -> (AuthSession, MemoryStorage, MockBackend) {
    let backend = MockBackend::spawn(routes).await;
    let storage = MemoryStorage::new();
    let store = Arc::new(SessionStore::hydrate(storage.clone()));
    (AuthSession::new(backend.client_with(store)), storage, backend)
}

async fn signed_in(routes: Vec<MockRoute>) -> (AuthSession, MemoryStorage, MockBackend) {
    let (auth, storage, backend) = signed_out(routes).await;
    auth.session().establish("tok-1".to_owned(), sample_user("u-1")).unwrap();
    (auth, storage, backend)
}

fn login_ok(user_id: &str) -> MockRoute {
    route(
        Method::POST,
        "/auth/login",
        200,
        serde_json::json!({ "access_token": "jwt-new", "token_type": "bearer", "user": user_json(user_id) }),
    )
}

fn credentials() -> LoginRequest {
    LoginRequest { email: "ana@example.com".to_owned(), password: "Secret123".to_owned() }
}

fn registration() -> RegisterRequest {
    RegisterRequest {
        email: "ana@example.com".to_owned(),
        password: "Secret123".to_owned(),
        full_name: "Ana Ruiz".to_owned(),
        phone_number: None,
        role: None,
        area_id: None,
    }
}

// =============================================================
// Login / logout
// =============================================================

#[tokio::test]
async fn login_stores_token_and_user() {
    let (auth, storage, _backend) = signed_out(vec![login_ok("u-1")]).await;

    auth.login(&credentials()).await.unwrap();

    assert!(auth.is_authenticated());
    assert_eq!(auth.session().token().as_deref(), Some("jwt-new"));
    assert_eq!(auth.user().unwrap().id, "u-1");

    let reloaded = SessionStore::hydrate(storage);
    assert!(reloaded.is_authenticated(), "login survives a restart");
}

#[tokio::test]
async fn failed_login_leaves_session_empty() {
    let (auth, storage, _backend) = signed_out(vec![route(
        Method::POST,
        "/auth/login",
        401,
        serde_json::json!({ "detail": "Incorrect email or password" }),
    )])
    .await;

    let err = auth.login(&credentials()).await.unwrap_err();

    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(!auth.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn logout_is_local_and_idempotent() {
    let (auth, storage, backend) = signed_in(vec![]).await;

    auth.logout();
    assert!(!auth.is_authenticated());
    assert!(auth.session().token().is_none());
    assert!(storage.is_empty());

    auth.logout();
    assert!(!auth.is_authenticated());
    assert!(backend.requests().is_empty());
}

// =============================================================
// Registration
// =============================================================

#[tokio::test]
async fn register_then_logs_in() {
    let (auth, _storage, backend) =
        signed_out(vec![route(Method::POST, "/auth/register", 201, user_json("u-5")), login_ok("u-5")]).await;

    auth.register(&registration(), Some("Secret123")).await.unwrap();

    assert_eq!(auth.user().unwrap().id, "u-5");
    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/auth/register", "/auth/login"]);
    assert_eq!(
        backend.last_request().body.unwrap(),
        serde_json::json!({ "email": "ana@example.com", "password": "Secret123" })
    );
}

#[tokio::test]
async fn register_fails_loud_when_auto_login_fails() {
    let (auth, _storage, _backend) = signed_out(vec![
        route(Method::POST, "/auth/register", 201, user_json("u-5")),
        route(Method::POST, "/auth/login", 403, serde_json::json!({ "detail": "Account disabled" })),
    ])
    .await;

    let err = auth.register(&registration(), None).await.unwrap_err();

    assert_eq!(err.user_message(), "Account disabled");
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn register_rejects_mismatched_confirmation_locally() {
    let (auth, _storage, backend) = signed_out(vec![]).await;

    let err = auth.register(&registration(), Some("Secret124")).await.unwrap_err();

    match err {
        ApiError::Validation(errors) => assert_eq!(errors.get("confirm_password"), Some("Passwords do not match")),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn duplicate_email_message_passes_through() {
    let (auth, _storage, _backend) = signed_out(vec![route(
        Method::POST,
        "/auth/register",
        400,
        serde_json::json!({ "detail": "Email already registered" }),
    )])
    .await;

    let err = auth.register(&registration(), None).await.unwrap_err();
    assert_eq!(err.user_message(), "Email already registered");
}

// =============================================================
// Refresh and user replacement
// =============================================================

#[tokio::test]
async fn refresh_replaces_cached_user() {
    let mut fresh = user_json("u-1");
    fresh["full_name"] = "Ana Ruiz-Gomez".into();
    let (auth, storage, _backend) = signed_in(vec![route(Method::GET, "/users/me", 200, fresh)]).await;

    let user = auth.refresh_user().await.unwrap();

    assert_eq!(user.full_name, "Ana Ruiz-Gomez");
    assert_eq!(auth.user().unwrap().full_name, "Ana Ruiz-Gomez");
    assert_eq!(SessionStore::hydrate(storage).user().unwrap().full_name, "Ana Ruiz-Gomez");
}

#[tokio::test]
async fn refresh_failure_signs_out() {
    let (auth, storage, _backend) =
        signed_in(vec![route(Method::GET, "/users/me", 500, serde_json::json!({ "detail": "db down" }))]).await;

    let err = auth.refresh_user().await.unwrap_err();

    assert_eq!(err.user_message(), "db down");
    assert!(!auth.is_authenticated());
    assert!(storage.is_empty());
}

#[tokio::test]
async fn refresh_rejected_token_emits_one_event() {
    let (auth, _storage, _backend) = signed_in(vec![route(
        Method::GET,
        "/users/me",
        401,
        serde_json::json!({ "detail": "Could not validate credentials" }),
    )])
    .await;
    let mut events = auth.http().subscribe();

    let err = auth.refresh_user().await.unwrap_err();

    assert!(matches!(err, ApiError::Unauthorized));
    assert!(!auth.is_authenticated());
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Unauthorized);
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn refresh_without_session_skips_network() {
    let (auth, _storage, backend) = signed_out(vec![]).await;

    assert!(matches!(auth.refresh_user().await, Err(ApiError::NoSession)));
    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn update_user_survives_reload() {
    let (auth, storage, _backend) = signed_in(vec![]).await;
    let mut user = sample_user("u-1");
    user.phone_number = Some("+34 600 000 000".to_owned());

    auth.update_user(user.clone()).unwrap();

    assert_eq!(auth.user(), Some(user.clone()));
    assert_eq!(SessionStore::hydrate(storage).user(), Some(user));
}

#[tokio::test]
async fn update_user_requires_session() {
    let (auth, _storage, _backend) = signed_out(vec![]).await;
    assert!(matches!(auth.update_user(sample_user("u-1")), Err(ApiError::NoSession)));
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn update_profile_caches_response() {
    let mut stored = user_json("u-1");
    stored["phone_number"] = "555-0100".into();
    let (auth, _storage, backend) = signed_in(vec![route(Method::PUT, "/users/me", 200, stored)]).await;

    let update = UserUpdate { phone_number: Some("555-0100".to_owned()), ..UserUpdate::default() };
    auth.update_profile(&update).await.unwrap();

    assert_eq!(auth.user().unwrap().phone_number.as_deref(), Some("555-0100"));
    assert_eq!(backend.last_request().authorization.as_deref(), Some("Bearer tok-1"));
}
