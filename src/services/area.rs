//! Organizational areas under `/areas`.

#[cfg(test)]
#[path = "area_test.rs"]
mod area_test;

use crate::error::ApiError;
use crate::net::http::{HttpClient, Query};
use crate::net::types::{Area, AreaCreate, AreaUpdate, AreaWithStats};
use crate::validate;

fn active_query(is_active: Option<bool>) -> Query {
    is_active.map(|active| ("is_active", active.to_string())).into_iter().collect()
}

/// `GET /areas`, optionally restricted by active flag.
pub async fn list_areas(http: &HttpClient, is_active: Option<bool>) -> Result<Vec<Area>, ApiError> {
    http.get_with_query("/areas", &active_query(is_active)).await
}

/// Best-effort variant of [`list_areas`] for pickers and labels.
///
/// Failures are logged and degrade to an empty list; nothing is surfaced.
pub async fn list_areas_or_empty(http: &HttpClient, is_active: Option<bool>) -> Vec<Area> {
    match list_areas(http, is_active).await {
        Ok(areas) => areas,
        Err(e) => {
            tracing::warn!(error = %e, "could not load areas; continuing without them");
            Vec::new()
        }
    }
}

/// `GET /areas/with-stats`.
pub async fn list_areas_with_stats(http: &HttpClient, is_active: Option<bool>) -> Result<Vec<AreaWithStats>, ApiError> {
    http.get_with_query("/areas/with-stats", &active_query(is_active)).await
}

pub async fn get_area(http: &HttpClient, area_id: &str) -> Result<Area, ApiError> {
    http.get(&format!("/areas/{area_id}")).await
}

pub async fn create_area(http: &HttpClient, request: &AreaCreate) -> Result<Area, ApiError> {
    validate::validate_area_create(request).map_err(ApiError::Validation)?;
    http.post("/areas", request).await
}

pub async fn update_area(http: &HttpClient, area_id: &str, request: &AreaUpdate) -> Result<Area, ApiError> {
    validate::validate_area_update(request).map_err(ApiError::Validation)?;
    http.put(&format!("/areas/{area_id}"), request).await
}

pub async fn delete_area(http: &HttpClient, area_id: &str) -> Result<(), ApiError> {
    http.delete(&format!("/areas/{area_id}")).await
}
