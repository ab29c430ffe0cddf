use super::*;
use crate::test_helpers::{MockBackend, route, user_json};

use axum::http::Method;

#[tokio::test]
async fn login_posts_credentials_and_decodes_token() {
    let backend = MockBackend::spawn(vec![route(
        Method::POST,
        "/auth/login",
        200,
        serde_json::json!({ "access_token": "jwt", "user": user_json("u-1") }),
    )])
    .await;
    let http = backend.anonymous_client();

    let credentials = LoginRequest { email: "ana@example.com".to_owned(), password: "Secret123".to_owned() };
    let response = login(&http, &credentials).await.unwrap();

    assert_eq!(response.access_token, "jwt");
    assert_eq!(response.token_type, "bearer");
    assert_eq!(response.user.id, "u-1");

    let request = backend.last_request();
    assert_eq!(request.authorization, None);
    assert_eq!(
        request.body.unwrap(),
        serde_json::json!({ "email": "ana@example.com", "password": "Secret123" })
    );
}

#[tokio::test]
async fn wrong_password_keeps_backend_message() {
    let backend = MockBackend::spawn(vec![route(
        Method::POST,
        "/auth/login",
        401,
        serde_json::json!({ "detail": "Incorrect email or password" }),
    )])
    .await;
    let http = backend.anonymous_client();
    let mut events = http.subscribe();

    let credentials = LoginRequest { email: "ana@example.com".to_owned(), password: "nope".to_owned() };
    let err = login(&http, &credentials).await.unwrap_err();

    assert_eq!(err.user_message(), "Incorrect email or password");
    assert!(events.try_recv().is_err(), "no session existed, so nothing to announce");
}

#[tokio::test]
async fn register_returns_created_user() {
    let backend =
        MockBackend::spawn(vec![route(Method::POST, "/auth/register", 201, user_json("u-9"))]).await;
    let http = backend.anonymous_client();

    let request = RegisterRequest {
        email: "new@example.com".to_owned(),
        password: "Secret123".to_owned(),
        full_name: "New User".to_owned(),
        phone_number: None,
        role: None,
        area_id: None,
    };
    let user = register(&http, &request).await.unwrap();
    assert_eq!(user.id, "u-9");

    let body = backend.last_request().body.unwrap();
    assert_eq!(body["full_name"], "New User");
    assert!(body.get("role").is_none());
}
