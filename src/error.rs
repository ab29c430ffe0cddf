//! Error taxonomy shared by every layer of the client.
//!
//! DESIGN
//! ======
//! Four failure classes reach callers: validation (caught before any network
//! call), authorization (401, handled globally by the HTTP wrapper), backend
//! business errors (the server's `detail` message), and transport failures.
//! Nothing is retried; callers surface `user_message()` in their error banner.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::validate::FieldErrors;

/// Message shown when the backend did not supply one.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Grepable error code for structured output.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

/// Errors produced by session, transport and service operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Input rejected client-side; keyed by form field.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// The backend answered 401. The session has already been torn down.
    #[error("unauthorized: session expired or invalid")]
    Unauthorized,

    /// An operation that needs a session was called without one.
    #[error("no active session")]
    NoSession,

    /// The backend answered with a non-success status.
    #[error("backend error (status {status}): {message}")]
    Backend { status: u16, message: String },

    /// The request never produced a response (connect failure, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// A response body could not be decoded into the expected type.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// Persisted session state could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    Config(String),
}

impl ApiError {
    /// Single human-readable message suitable for an error banner.
    ///
    /// Backend errors carry the server's own message; validation errors list
    /// their field messages; everything else falls back to the generic text.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Backend { message, .. } => message.clone(),
            Self::Validation(errors) => errors.to_string(),
            Self::Unauthorized | Self::NoSession => "Please log in again.".to_owned(),
            Self::Network(_)
            | Self::Decode(_)
            | Self::HttpClientBuild(_)
            | Self::Storage(_)
            | Self::Config(_) => GENERIC_ERROR_MESSAGE.to_owned(),
        }
    }

    /// Whether this error means the caller must authenticate again.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::NoSession | Self::Backend { status: 401, .. })
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Unauthorized => "E_UNAUTHORIZED",
            Self::NoSession => "E_NO_SESSION",
            Self::Backend { .. } => "E_BACKEND",
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Storage(_) => "E_STORAGE",
            Self::Config(_) => "E_CONFIG",
        }
    }
}
