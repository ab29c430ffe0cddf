//! Dashboard summary.
//!
//! DESIGN
//! ======
//! Projects and tasks are fetched concurrently, then everything else is
//! derived locally: status counts, the overdue set, recent projects, and
//! the upcoming and overdue shortlists. Nothing is updated incrementally;
//! callers reload after a mutation.
//!
//! Sorts are stable, so equal keys keep fetch order. Only tasks that have a
//! deadline enter the deadline-sorted lists, which keeps the comparators
//! total.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use serde::Serialize;
use time::OffsetDateTime;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{Project, Task, TaskStatus};
use crate::services::project::list_projects;
use crate::services::task::{TaskFilters, list_tasks};

use super::run_cancellable;

/// Length of each dashboard shortlist.
pub const SHORTLIST_LEN: usize = 5;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Non-archived projects.
    pub active_projects: usize,
    pub total_tasks: usize,
    pub not_started: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub stats: DashboardStats,
    /// Newest non-archived projects first.
    pub recent_projects: Vec<Project>,
    /// Incomplete, soonest deadline first; undated tasks trail.
    pub upcoming_tasks: Vec<Task>,
    /// Overdue, oldest deadline first.
    pub overdue_tasks: Vec<Task>,
}

impl DashboardSummary {
    /// Derive the summary from already-fetched collections.
    #[must_use]
    pub fn compute(projects: &[Project], tasks: &[Task], now: OffsetDateTime) -> Self {
        let mut stats = DashboardStats {
            active_projects: projects.iter().filter(|p| !p.is_archived).count(),
            total_tasks: tasks.len(),
            ..DashboardStats::default()
        };
        for task in tasks {
            match task.status {
                TaskStatus::NotStarted => stats.not_started += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
            }
        }

        let overdue: Vec<&Task> = tasks.iter().filter(|t| t.is_overdue(now)).collect();
        stats.overdue = overdue.len();

        Self {
            stats,
            recent_projects: recent_projects(projects),
            upcoming_tasks: upcoming_tasks(tasks),
            overdue_tasks: by_deadline(overdue),
        }
    }

    /// Fetch projects and tasks concurrently and summarize them.
    ///
    /// Returns `Ok(None)` if `cancel` fires first. Either fetch failing
    /// fails the whole load.
    pub async fn load(
        http: &HttpClient,
        cancel: &CancellationToken,
        now: OffsetDateTime,
    ) -> Result<Option<Self>, ApiError> {
        let filters = TaskFilters::default();
        let fetch = async { tokio::try_join!(list_projects(http, false), list_tasks(http, &filters)) };
        let loaded = run_cancellable(cancel, fetch).await?;
        Ok(loaded.map(|(projects, tasks)| {
            tracing::debug!(projects = projects.len(), tasks = tasks.len(), "dashboard loaded");
            Self::compute(&projects, &tasks, now)
        }))
    }
}

fn recent_projects(projects: &[Project]) -> Vec<Project> {
    let mut active: Vec<&Project> = projects.iter().filter(|p| !p.is_archived).collect();
    active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    active.into_iter().take(SHORTLIST_LEN).cloned().collect()
}

fn upcoming_tasks(tasks: &[Task]) -> Vec<Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.is_completed()).collect();
    // Dated first, soonest first; undated keep fetch order at the end.
    pending.sort_by_key(|t| (t.deadline.is_none(), t.deadline));
    pending.into_iter().take(SHORTLIST_LEN).cloned().collect()
}

/// Earliest deadline first, truncated to the shortlist.
fn by_deadline(mut tasks: Vec<&Task>) -> Vec<Task> {
    tasks.sort_by_key(|t| t.deadline);
    tasks.into_iter().take(SHORTLIST_LEN).cloned().collect()
}
