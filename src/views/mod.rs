//! Aggregation views: raw collections in, derived counts and groupings out.
//!
//! ARCHITECTURE
//! ============
//! Each view splits into a pure `compute`-style half, which takes
//! collections plus an explicit `now` and is tested directly, and an async
//! `load` half that fetches through the services. Loads are tied to a
//! `CancellationToken`: once it fires, in-flight requests are dropped and the
//! load yields `Ok(None)` so stale results are never applied.

pub mod dashboard;
pub mod deadline;
pub mod projects;
pub mod tasks;
pub mod users;


use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

/// Drive `fut` unless `cancel` fires first.
///
/// Returns `Ok(None)` when cancelled, before or during the fetch.
pub async fn run_cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<Option<T>, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    if cancel.is_cancelled() {
        return Ok(None);
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            tracing::debug!("view load cancelled; discarding results");
            Ok(None)
        }
        result = fut => result.map(Some),
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}
