//! Application-level entry point.
//!
//! DESIGN
//! ======
//! `TaskDeskClient` owns the one session of a process: it hydrates the
//! session store, builds the transport around it and hands out the auth
//! manager. Shells subscribe to `SessionEvent`s here and decide what a
//! forced sign-out means for them.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::net::http::{HttpClient, SessionEvent};
use crate::state::auth::AuthSession;
use crate::state::session::SessionStore;
use crate::state::storage::{FileStorage, KeyValueStorage};
use crate::views::dashboard::DashboardSummary;
use crate::views::tasks::{TaskViewFilters, TasksView};

pub struct TaskDeskClient {
    config: ClientConfig,
    auth: AuthSession,
}

impl TaskDeskClient {
    /// Hydrate the session from `storage` and wire the transport to it.
    ///
    /// No network call is made.
    pub fn new(config: ClientConfig, storage: impl KeyValueStorage + 'static) -> Result<Self, ApiError> {
        let session = Arc::new(SessionStore::hydrate(storage));
        let http = HttpClient::new(&config, session)?;
        Ok(Self { config, auth: AuthSession::new(http) })
    }

    /// Client persisting its session under `config.session_dir`.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let storage = FileStorage::new(config.session_dir.clone());
        Self::new(config, storage)
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_config(ClientConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn auth(&self) -> &AuthSession {
        &self.auth
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        self.auth.http()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.http().subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Fail fast with `NoSession` instead of sending an anonymous request.
    pub fn require_session(&self) -> Result<(), ApiError> {
        if self.is_authenticated() { Ok(()) } else { Err(ApiError::NoSession) }
    }

    /// Dashboard as of now (UTC).
    pub async fn dashboard(&self, cancel: &CancellationToken) -> Result<Option<DashboardSummary>, ApiError> {
        DashboardSummary::load(self.http(), cancel, OffsetDateTime::now_utc()).await
    }

    /// Tasks page loaded once with `filters`.
    ///
    /// Returns `Ok(None)` when cancelled.
    pub async fn tasks_view(
        &self,
        filters: TaskViewFilters,
        cancel: &CancellationToken,
    ) -> Result<Option<TasksView>, ApiError> {
        let mut view = TasksView::new(filters);
        let loaded = view.load(self.http(), cancel).await?;
        Ok(loaded.then_some(view))
    }
}
