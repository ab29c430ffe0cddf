//! Chat notification linking under `/users/me/telegram`.
//!
//! A link code is generated here and then sent to the bot from the chat app;
//! the backend completes the link on its side.

#[cfg(test)]
#[path = "telegram_test.rs"]
mod telegram_test;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{TelegramLinkCode, TelegramStatus};

pub async fn generate_link_code(http: &HttpClient) -> Result<TelegramLinkCode, ApiError> {
    http.post_empty("/users/me/telegram/generate-code").await
}

pub async fn link_status(http: &HttpClient) -> Result<TelegramStatus, ApiError> {
    http.get("/users/me/telegram/status").await
}

pub async fn unlink(http: &HttpClient) -> Result<(), ApiError> {
    http.delete("/users/me/telegram/unlink").await
}
