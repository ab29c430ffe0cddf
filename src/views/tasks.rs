//! Tasks page: server-side filters, client-side search, list or kanban.
//!
//! DESIGN
//! ======
//! Project, status and priority filters are sent to the backend as query
//! parameters and trigger a reload when changed. Free-text search runs
//! locally over what was fetched (title and description, case-insensitive)
//! and never hits the network. Kanban columns are a partition of the
//! filtered and searched collection by status, in fetch order.

#[cfg(test)]
#[path = "tasks_test.rs"]
mod tasks_test;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{Task, TaskPriority, TaskStatus};
use crate::services::task::{TaskFilters, list_tasks};

use super::{contains_ignore_case, run_cancellable};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    #[default]
    List,
    Kanban,
}

/// The three filter dimensions of the tasks page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskViewFilters {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskViewFilters {
    #[must_use]
    pub fn to_task_filters(&self) -> TaskFilters {
        TaskFilters {
            project_id: self.project_id.clone(),
            status: self.status,
            priority: self.priority,
            ..TaskFilters::default()
        }
    }
}

/// Tasks whose title or description contains `term`, ignoring case.
///
/// A blank term keeps everything. Order is preserved.
#[must_use]
pub fn apply_search<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    let needle = if term.trim().is_empty() { String::new() } else { term.to_lowercase() };
    tasks
        .iter()
        .filter(|task| {
            contains_ignore_case(&task.title, &needle)
                || task.description.as_deref().is_some_and(|d| contains_ignore_case(d, &needle))
        })
        .collect()
}

/// Status columns, each in fetch order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct KanbanBoard {
    pub not_started: Vec<Task>,
    pub in_progress: Vec<Task>,
    pub completed: Vec<Task>,
}

impl KanbanBoard {
    #[must_use]
    pub fn partition<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            board.column_mut(task.status).push(task.clone());
        }
        board
    }

    #[must_use]
    pub fn column(&self, status: TaskStatus) -> &[Task] {
        match status {
            TaskStatus::NotStarted => &self.not_started,
            TaskStatus::InProgress => &self.in_progress,
            TaskStatus::Completed => &self.completed,
        }
    }

    fn column_mut(&mut self, status: TaskStatus) -> &mut Vec<Task> {
        match status {
            TaskStatus::NotStarted => &mut self.not_started,
            TaskStatus::InProgress => &mut self.in_progress,
            TaskStatus::Completed => &mut self.completed,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.not_started.len() + self.in_progress.len() + self.completed.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What the page renders for the current mode.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "tasks")]
pub enum TaskDisplay {
    List(Vec<Task>),
    Kanban(KanbanBoard),
}

/// State of the tasks page between reloads.
#[derive(Clone, Debug, Default)]
pub struct TasksView {
    filters: TaskViewFilters,
    search: String,
    mode: DisplayMode,
    tasks: Vec<Task>,
}

impl TasksView {
    #[must_use]
    pub fn new(filters: TaskViewFilters) -> Self {
        Self { filters, ..Self::default() }
    }

    #[must_use]
    pub fn filters(&self) -> &TaskViewFilters {
        &self.filters
    }

    /// Replace the server-side filters. Returns whether they changed, i.e.
    /// whether the caller must reload.
    pub fn set_filters(&mut self, filters: TaskViewFilters) -> bool {
        if self.filters == filters {
            return false;
        }
        self.filters = filters;
        true
    }

    /// Local only; no reload needed.
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    #[must_use]
    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Everything fetched by the last completed load.
    #[must_use]
    pub fn loaded(&self) -> &[Task] {
        &self.tasks
    }

    /// Replace the collection with the backend's answer for the current
    /// filters.
    ///
    /// Returns `Ok(false)` when cancelled; the previous collection is kept.
    pub async fn load(&mut self, http: &HttpClient, cancel: &CancellationToken) -> Result<bool, ApiError> {
        let query = self.filters.to_task_filters();
        match run_cancellable(cancel, list_tasks(http, &query)).await? {
            Some(tasks) => {
                tracing::debug!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Fetched tasks narrowed by the search term.
    #[must_use]
    pub fn visible(&self) -> Vec<&Task> {
        apply_search(&self.tasks, &self.search)
    }

    #[must_use]
    pub fn kanban(&self) -> KanbanBoard {
        KanbanBoard::partition(self.visible())
    }

    #[must_use]
    pub fn display(&self) -> TaskDisplay {
        match self.mode {
            DisplayMode::List => TaskDisplay::List(self.visible().into_iter().cloned().collect()),
            DisplayMode::Kanban => TaskDisplay::Kanban(self.kanban()),
        }
    }
}
