//! Fixture builders and a recording mock backend shared by unit tests.

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use time::OffsetDateTime;
use time::macros::datetime;

use crate::config::{API_PREFIX, ClientConfig};
use crate::net::http::HttpClient;
use crate::net::types::{Project, Task, TaskPriority, TaskStatus, User, UserRole};
use crate::state::session::SessionStore;
use crate::state::storage::MemoryStorage;

pub(crate) const EPOCH: OffsetDateTime = datetime!(2024-01-01 00:00:00 UTC);

pub(crate) fn sample_user(id: &str) -> User {
    User {
        id: id.to_owned(),
        email: format!("{id}@example.com"),
        full_name: "Ana Ruiz".to_owned(),
        phone_number: None,
        role: UserRole::Analyst,
        area_id: None,
        telegram_chat_id: None,
        is_active: true,
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

pub(crate) fn sample_project(id: &str, created_at: OffsetDateTime, is_archived: bool) -> Project {
    Project {
        id: id.to_owned(),
        name: format!("Project {id}"),
        description: None,
        emoji_icon: None,
        area_id: None,
        owner_id: "u-1".to_owned(),
        is_archived,
        created_at,
        updated_at: created_at,
    }
}

pub(crate) fn sample_task(id: &str, status: TaskStatus, deadline: Option<OffsetDateTime>) -> Task {
    Task {
        id: id.to_owned(),
        project_id: "p-1".to_owned(),
        title: format!("Task {id}"),
        description: None,
        status,
        priority: TaskPriority::Medium,
        responsible_id: None,
        deadline,
        reminder_hours_before: Some(24),
        completed_at: None,
        is_archived: false,
        created_by: "u-1".to_owned(),
        created_at: EPOCH,
        updated_at: EPOCH,
    }
}

// =============================================================================
// MOCK BACKEND
// =============================================================================

pub(crate) const TEST_TOKEN: &str = "test-token";

/// One request as seen by [`MockBackend`].
#[derive(Clone, Debug)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    /// Path below the API prefix, e.g. `/tasks/t-1/status`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// Canned reply for one method + path.
pub(crate) struct MockRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: serde_json::Value,
}

pub(crate) fn route(method: Method, path: &str, status: u16, body: serde_json::Value) -> MockRoute {
    MockRoute {
        method,
        path: path.to_owned(),
        status: StatusCode::from_u16(status).unwrap(),
        body,
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<MockRoute>>,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Throwaway backend that answers from a route table and records every call.
pub(crate) struct MockBackend {
    pub url: String,
    log: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub(crate) async fn spawn(routes: Vec<MockRoute>) -> Self {
        let log = Arc::new(Mutex::new(Vec::new()));
        let state = MockState { routes: Arc::new(routes), log: log.clone() };
        let app = axum::Router::new().fallback(answer).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { url: format!("http://{addr}"), log }
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.log.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// Client whose session holds [`TEST_TOKEN`] for `sample_user("u-1")`.
    pub(crate) fn client(&self) -> HttpClient {
        let session = Arc::new(SessionStore::hydrate(MemoryStorage::new()));
        session.establish(TEST_TOKEN.to_owned(), sample_user("u-1")).unwrap();
        self.client_with(session)
    }

    pub(crate) fn anonymous_client(&self) -> HttpClient {
        self.client_with(Arc::new(SessionStore::hydrate(MemoryStorage::new())))
    }

    pub(crate) fn client_with(&self, session: Arc<SessionStore>) -> HttpClient {
        let config = ClientConfig::for_api_url(&self.url, "/unused").unwrap();
        HttpClient::new(&config, session).unwrap()
    }
}

async fn answer(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    let path = uri.path().strip_prefix(API_PREFIX).unwrap_or(uri.path()).to_owned();
    state.log.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(ToOwned::to_owned),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned),
        body: serde_json::from_str(&body).ok(),
    });

    match state.routes.iter().find(|r| r.method == method && r.path == path) {
        Some(r) => (r.status, Json(r.body.clone())),
        None => (StatusCode::NOT_FOUND, Json(serde_json::json!({ "detail": "Not Found" }))),
    }
}

pub(crate) fn user_json(id: &str) -> serde_json::Value {
    serde_json::to_value(sample_user(id)).unwrap()
}

pub(crate) fn project_json(id: &str) -> serde_json::Value {
    serde_json::to_value(sample_project(id, EPOCH, false)).unwrap()
}

pub(crate) fn task_json(id: &str, status: TaskStatus) -> serde_json::Value {
    serde_json::to_value(sample_task(id, status, None)).unwrap()
}
