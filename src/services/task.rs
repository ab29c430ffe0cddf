//! Tasks under `/tasks`.
//!
//! DESIGN
//! ======
//! Listing filters travel as query parameters and only the filters that are
//! set are sent. Status changes go through `PATCH /tasks/{id}/status`; any
//! status may follow any other. `complete` is a convenience action after
//! which the backend stamps `completed_at`. Archiving is orthogonal to
//! status.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use crate::error::ApiError;
use crate::net::http::{HttpClient, Query};
use crate::net::types::{Task, TaskCreate, TaskPriority, TaskStatus, TaskStatusUpdate, TaskUpdate};
use crate::validate;

/// Server-side filters for [`list_tasks`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub responsible_id: Option<String>,
    pub include_archived: Option<bool>,
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl TaskFilters {
    /// Query parameters for the filters that are set, in a stable order.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut query = Query::new();
        if let Some(project_id) = &self.project_id {
            query.push(("project_id", project_id.clone()));
        }
        if let Some(status) = self.status {
            query.push(("status", status.as_str().to_owned()));
        }
        if let Some(priority) = self.priority {
            query.push(("priority", priority.as_str().to_owned()));
        }
        if let Some(responsible_id) = &self.responsible_id {
            query.push(("responsible_id", responsible_id.clone()));
        }
        if let Some(include_archived) = self.include_archived {
            query.push(("include_archived", include_archived.to_string()));
        }
        if let Some(skip) = self.skip {
            query.push(("skip", skip.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

fn task_path(task_id: &str) -> String {
    format!("/tasks/{task_id}")
}

fn task_action_path(task_id: &str, action: &str) -> String {
    format!("/tasks/{task_id}/{action}")
}

pub async fn list_tasks(http: &HttpClient, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
    http.get_with_query("/tasks", &filters.to_query()).await
}

pub async fn get_task(http: &HttpClient, task_id: &str) -> Result<Task, ApiError> {
    http.get(&task_path(task_id)).await
}

pub async fn create_task(http: &HttpClient, request: &TaskCreate) -> Result<Task, ApiError> {
    validate::validate_task_create(request).map_err(ApiError::Validation)?;
    http.post("/tasks", request).await
}

pub async fn update_task(http: &HttpClient, task_id: &str, request: &TaskUpdate) -> Result<Task, ApiError> {
    validate::validate_task_update(request).map_err(ApiError::Validation)?;
    http.put(&task_path(task_id), request).await
}

pub async fn delete_task(http: &HttpClient, task_id: &str) -> Result<(), ApiError> {
    http.delete(&task_path(task_id)).await
}

pub async fn update_task_status(http: &HttpClient, task_id: &str, status: TaskStatus) -> Result<Task, ApiError> {
    http.patch(&task_action_path(task_id, "status"), &TaskStatusUpdate { status }).await
}

pub async fn complete_task(http: &HttpClient, task_id: &str) -> Result<Task, ApiError> {
    http.patch_empty(&task_action_path(task_id, "complete")).await
}

pub async fn archive_task(http: &HttpClient, task_id: &str) -> Result<Task, ApiError> {
    http.patch_empty(&task_action_path(task_id, "archive")).await
}

pub async fn unarchive_task(http: &HttpClient, task_id: &str) -> Result<Task, ApiError> {
    http.patch_empty(&task_action_path(task_id, "unarchive")).await
}
