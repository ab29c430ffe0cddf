//! Credential endpoints. Session bookkeeping lives in `state::auth`.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{LoginRequest, LoginResponse, RegisterRequest, User};

/// `POST /auth/login`.
pub async fn login(http: &HttpClient, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
    http.post("/auth/login", credentials).await
}

/// `POST /auth/register`. Does not log in; see `AuthSession::register`.
pub async fn register(http: &HttpClient, request: &RegisterRequest) -> Result<User, ApiError> {
    http.post("/auth/register", request).await
}
