//! Projects under `/projects`.
//!
//! Archived projects are excluded from listings unless asked for. Archive
//! and unarchive are sub-resource PATCHes, not field updates.

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use crate::error::ApiError;
use crate::net::http::{HttpClient, Query};
use crate::net::types::{Project, ProjectCreate, ProjectUpdate, ProjectWithStats};
use crate::validate;

fn archived_query(include_archived: bool) -> Query {
    vec![("include_archived", include_archived.to_string())]
}

fn project_path(project_id: &str) -> String {
    format!("/projects/{project_id}")
}

pub async fn list_projects(http: &HttpClient, include_archived: bool) -> Result<Vec<Project>, ApiError> {
    http.get_with_query("/projects", &archived_query(include_archived)).await
}

/// Projects with backend-computed task counts.
pub async fn list_projects_with_stats(
    http: &HttpClient,
    include_archived: bool,
) -> Result<Vec<ProjectWithStats>, ApiError> {
    http.get_with_query("/projects/with-stats", &archived_query(include_archived)).await
}

pub async fn get_project(http: &HttpClient, project_id: &str) -> Result<Project, ApiError> {
    http.get(&project_path(project_id)).await
}

pub async fn create_project(http: &HttpClient, request: &ProjectCreate) -> Result<Project, ApiError> {
    validate::validate_project_create(request).map_err(ApiError::Validation)?;
    http.post("/projects", request).await
}

pub async fn update_project(http: &HttpClient, project_id: &str, request: &ProjectUpdate) -> Result<Project, ApiError> {
    validate::validate_project_update(request).map_err(ApiError::Validation)?;
    http.put(&project_path(project_id), request).await
}

pub async fn delete_project(http: &HttpClient, project_id: &str) -> Result<(), ApiError> {
    http.delete(&project_path(project_id)).await
}

pub async fn archive_project(http: &HttpClient, project_id: &str) -> Result<Project, ApiError> {
    http.patch_empty(&format!("{}/archive", project_path(project_id))).await
}

pub async fn unarchive_project(http: &HttpClient, project_id: &str) -> Result<Project, ApiError> {
    http.patch_empty(&format!("{}/unarchive", project_path(project_id))).await
}
