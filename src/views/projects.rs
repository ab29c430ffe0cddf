//! Client-side project statistics and area filtering.
//!
//! Stats are derived from whatever task collection the caller already has,
//! which is how the dashboard avoids a second `/projects/with-stats` call.
//! Archived tasks are not counted.

#[cfg(test)]
#[path = "projects_test.rs"]
mod projects_test;

use std::collections::HashMap;

use time::OffsetDateTime;

use crate::net::types::{Project, ProjectStats, ProjectWithStats, Task, TaskStatus};

/// Counts for one project over `tasks`; tasks of other projects are ignored.
#[must_use]
pub fn project_stats(project_id: &str, tasks: &[Task], now: OffsetDateTime) -> ProjectStats {
    tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .fold(ProjectStats::default(), |stats, task| tally(stats, task, now))
}

/// Pair every project with its stats in one pass over `tasks`.
#[must_use]
pub fn with_stats(projects: Vec<Project>, tasks: &[Task], now: OffsetDateTime) -> Vec<ProjectWithStats> {
    let mut by_project: HashMap<&str, ProjectStats> = HashMap::new();
    for task in tasks {
        let entry = by_project.entry(task.project_id.as_str()).or_default();
        *entry = tally(*entry, task, now);
    }
    projects
        .into_iter()
        .map(|project| {
            let stats = by_project.get(project.id.as_str()).copied().unwrap_or_default();
            ProjectWithStats { project, stats }
        })
        .collect()
}

fn tally(mut stats: ProjectStats, task: &Task, now: OffsetDateTime) -> ProjectStats {
    if task.is_archived {
        return stats;
    }
    stats.total_tasks += 1;
    match task.status {
        TaskStatus::NotStarted => stats.pending_tasks += 1,
        TaskStatus::InProgress => stats.in_progress_tasks += 1,
        TaskStatus::Completed => stats.completed_tasks += 1,
    }
    if task.is_overdue(now) {
        stats.overdue_tasks += 1;
    }
    stats
}

/// Completed share of a project's tasks, 0..=100. Zero when it has none.
#[must_use]
pub fn completion_percent(stats: &ProjectStats) -> u8 {
    if stats.total_tasks == 0 {
        return 0;
    }
    let percent = u64::from(stats.completed_tasks) * 100 / u64::from(stats.total_tasks);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

/// Area selector of the projects page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AreaFilter {
    #[default]
    All,
    /// Projects that belong to no area.
    Unassigned,
    Area(String),
}

impl AreaFilter {
    #[must_use]
    pub fn matches(&self, project: &Project) -> bool {
        match self {
            Self::All => true,
            Self::Unassigned => project.area_id.is_none(),
            Self::Area(id) => project.area_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Keep the projects `filter` selects, in input order.
#[must_use]
pub fn filter_by_area(projects: &[ProjectWithStats], filter: &AreaFilter) -> Vec<ProjectWithStats> {
    projects.iter().filter(|p| filter.matches(&p.project)).cloned().collect()
}
