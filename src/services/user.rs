//! Account endpoints under `/users`.

#[cfg(test)]
#[path = "user_test.rs"]
mod user_test;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{ChangePasswordRequest, User, UserUpdate};
use crate::validate;

/// `GET /users/me`.
pub async fn me(http: &HttpClient) -> Result<User, ApiError> {
    http.get("/users/me").await
}

/// `PUT /users/me`. Returns the stored record.
pub async fn update_me(http: &HttpClient, update: &UserUpdate) -> Result<User, ApiError> {
    http.put("/users/me", update).await
}

/// `POST /users/me/change-password`, after checking the new password locally.
pub async fn change_password(http: &HttpClient, request: &ChangePasswordRequest) -> Result<(), ApiError> {
    validate::validate_password_change(request).map_err(ApiError::Validation)?;
    http.post_unit("/users/me/change-password", request).await
}

/// `GET /users`.
pub async fn list_users(http: &HttpClient) -> Result<Vec<User>, ApiError> {
    http.get("/users").await
}

/// `GET /users/{id}`.
pub async fn get_user(http: &HttpClient, user_id: &str) -> Result<User, ApiError> {
    http.get(&format!("/users/{user_id}")).await
}
