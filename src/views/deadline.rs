//! Deadline urgency relative to "now".
//!
//! "Now" and the day boundary are both UTC. Overdue means strictly past; the
//! remaining classes count calendar days between the two UTC dates.

#[cfg(test)]
#[path = "deadline_test.rs"]
mod deadline_test;

use std::fmt;

use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::net::types::Task;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum DeadlineUrgency {
    Overdue,
    Today,
    Tomorrow,
    /// Two or three days out.
    Soon(u8),
    Later,
}

impl DeadlineUrgency {
    #[must_use]
    pub fn classify(deadline: OffsetDateTime, now: OffsetDateTime) -> Self {
        if deadline < now {
            return Self::Overdue;
        }
        let days = (deadline.to_offset(UtcOffset::UTC).date() - now.to_offset(UtcOffset::UTC).date()).whole_days();
        match days {
            0 => Self::Today,
            1 => Self::Tomorrow,
            2 => Self::Soon(2),
            3 => Self::Soon(3),
            _ => Self::Later,
        }
    }

    /// Urgency of a task's deadline, `None` when it has none.
    #[must_use]
    pub fn for_task(task: &Task, now: OffsetDateTime) -> Option<Self> {
        task.deadline.map(|deadline| Self::classify(deadline, now))
    }

    /// Due within a day, or already late.
    #[must_use]
    pub fn is_pressing(self) -> bool {
        matches!(self, Self::Overdue | Self::Today | Self::Tomorrow)
    }
}

impl fmt::Display for DeadlineUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue => f.write_str("overdue"),
            Self::Today => f.write_str("today"),
            Self::Tomorrow => f.write_str("tomorrow"),
            Self::Soon(days) => write!(f, "in {days} days"),
            Self::Later => f.write_str("later"),
        }
    }
}
