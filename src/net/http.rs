//! Authenticated JSON transport over `reqwest`.
//!
//! ARCHITECTURE
//! ============
//! Every request picks up the bearer token from the shared `SessionStore`.
//! A 401 tears the session down and is announced on a broadcast channel as
//! `SessionEvent::Unauthorized`; the transport never navigates anywhere
//! itself. The application shell subscribes and decides what "go back to
//! login" means for it.
//!
//! ERROR HANDLING
//! ==============
//! Nothing is retried. Non-2xx responses carry the backend's `detail` message
//! when one is present and the generic fallback otherwise.

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::config::ClientConfig;
use crate::error::{ApiError, GENERIC_ERROR_MESSAGE};
use crate::state::session::SessionStore;

const EVENT_CAPACITY: usize = 16;

/// Session lifecycle notifications emitted by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The backend rejected the stored token and the session was cleared.
    Unauthorized,
}

/// Query parameters as sent on the wire.
pub type Query = Vec<(&'static str, String)>;

#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    session: Arc<SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeouts.request())
            .connect_timeout(config.timeouts.connect())
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self { http, base_url: Arc::from(config.api_base()), session, events })
    }

    /// Receive session events from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &Query::new()).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T, ApiError> {
        let text = self.execute(Method::GET, path, query, None).await?;
        decode(&text)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(Method::POST, path, &Query::new(), Some(encode(body)?)).await?;
        decode(&text)
    }

    /// POST with no request body.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.execute(Method::POST, path, &Query::new(), None).await?;
        decode(&text)
    }

    /// POST whose response body is irrelevant.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.execute(Method::POST, path, &Query::new(), Some(encode(body)?)).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(Method::PUT, path, &Query::new(), Some(encode(body)?)).await?;
        decode(&text)
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let text = self.execute(Method::PATCH, path, &Query::new(), Some(encode(body)?)).await?;
        decode(&text)
    }

    /// PATCH a sub-resource action (`/archive`, `/complete`, ...) with no body.
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.execute(Method::PATCH, path, &Query::new(), None).await?;
        decode(&text)
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, &Query::new(), None).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<serde_json::Value>,
    ) -> Result<String, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        tracing::debug!(%method, path, "api request");
        let response = request.send().await.map_err(|e| {
            tracing::debug!(%method, path, error = %e, "api request failed");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        tracing::debug!(%method, path, status, "api response");

        if status == 401 {
            return Err(self.handle_unauthorized(path, &text));
        }
        if !(200..300).contains(&status) {
            let message = extract_error_message(&text).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned());
            return Err(ApiError::Backend { status, message });
        }
        Ok(text)
    }

    /// Clear the session and announce the teardown, once per session.
    ///
    /// A 401 without a session (wrong credentials at login, or a second
    /// concurrent 401 after the first one already cleared it) is reported as
    /// a plain backend error so the caller sees the server's message.
    fn handle_unauthorized(&self, path: &str, body: &str) -> ApiError {
        if self.session.clear() {
            tracing::warn!(path, "backend rejected session token; signing out");
            if self.events.send(SessionEvent::Unauthorized).is_err() {
                tracing::debug!("no session listeners subscribed");
            }
            return ApiError::Unauthorized;
        }
        ApiError::Backend {
            status: 401,
            message: extract_error_message(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_owned()),
        }
    }
}

/// Pull the human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}`, a validation list
/// `{"detail": [{"msg": "..."}]}`, or `{"message": "..."}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = match value.get("detail") {
        Some(serde_json::Value::String(detail)) => Some(detail.clone()),
        Some(serde_json::Value::Array(items)) => items
            .first()
            .and_then(|item| item.get("msg"))
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned),
        _ => value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned),
    };
    message.filter(|m| !m.trim().is_empty())
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("request body: {e}")))
}

fn decode<T: DeserializeOwned>(text: &str) -> Result<T, ApiError> {
    // Bodyless 2xx answers decode as JSON null so `()` and `Option<_>` work.
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| ApiError::Decode(e.to_string()))
}
