//! Wire DTOs for the `/api/v1` boundary.
//!
//! DESIGN
//! ======
//! These types mirror backend response schemas so serde round-trips stay
//! lossless. Enum variants carry the backend's wire names via `rename`;
//! timestamps without an offset are read as UTC. Update payloads skip absent
//! fields so a partial update never clears server-side values by accident.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

// =============================================================================
// ENUMS
// =============================================================================

/// Rejected textual value for one of the wire enums.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

/// Lifecycle state of a task. Any state may be set to any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "sin_empezar")]
    NotStarted,
    #[serde(rename = "en_curso")]
    InProgress,
    #[serde(rename = "completado")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Completed];

    /// Backend wire value, as sent in query strings.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "sin_empezar",
            Self::InProgress => "en_curso",
            Self::Completed => "completado",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "not-started" | "todo" | "sin-empezar" => Ok(Self::NotStarted),
            "in-progress" | "doing" | "en-curso" => Ok(Self::InProgress),
            "completed" | "done" | "completado" => Ok(Self::Completed),
            _ => Err(ParseEnumError {
                kind: "status",
                value: s.to_owned(),
                expected: "not-started, in-progress, completed",
            }),
        }
    }
}

/// Task priority. The backend defaults new tasks to `Medium`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskPriority {
    #[serde(rename = "baja")]
    Low,
    #[default]
    #[serde(rename = "media")]
    Medium,
    #[serde(rename = "alta")]
    High,
}

impl TaskPriority {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskPriority {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "baja" => Ok(Self::Low),
            "medium" | "media" => Ok(Self::Medium),
            "high" | "alta" => Ok(Self::High),
            _ => Err(ParseEnumError { kind: "priority", value: s.to_owned(), expected: "low, medium, high" }),
        }
    }
}

/// Role of a user account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "supervisor")]
    Supervisor,
    #[default]
    #[serde(rename = "analista")]
    Analyst,
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "administrator" | "admin" | "administrador" => Ok(Self::Administrator),
            "supervisor" => Ok(Self::Supervisor),
            "analyst" | "analista" => Ok(Self::Analyst),
            _ => Err(ParseEnumError {
                kind: "role",
                value: s.to_owned(),
                expected: "administrator, supervisor, analyst",
            }),
        }
    }
}

// =============================================================================
// USERS & AUTH
// =============================================================================

/// An account as returned by `/users/me`, `/users` and `/auth/login`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier (UUID string).
    pub id: String,
    pub email: String,
    /// Display name.
    pub full_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// Area the user belongs to, if any.
    #[serde(default)]
    pub area_id: Option<String>,
    /// Linked notification chat, if the account has been linked.
    #[serde(default)]
    pub telegram_chat_id: Option<i64>,
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
}

impl RegisterRequest {
    /// Credentials used for the automatic login that follows registration.
    #[must_use]
    pub fn credentials(&self) -> LoginRequest {
        LoginRequest { email: self.email.clone(), password: self.password.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Partial profile update for `PUT /users/me`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_chat_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
}

/// One-time code used to link a chat account for notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelegramLinkCode {
    pub code: String,
    #[serde(with = "timestamp")]
    pub expires_at: OffsetDateTime,
    #[serde(default)]
    pub bot_username: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelegramStatus {
    pub is_linked: bool,
    #[serde(default, alias = "telegram_chat_id")]
    pub chat_id: Option<i64>,
}

// =============================================================================
// AREAS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Hex color (`#RRGGBB`).
    #[serde(default = "default_area_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

/// An area with backend-computed membership and task counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AreaWithStats {
    #[serde(flatten)]
    pub area: Area,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_users: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_projects: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_tasks: u32,
    #[serde(default, rename = "tasks_sin_empezar", deserialize_with = "deserialize_count")]
    pub tasks_not_started: u32,
    #[serde(default, rename = "tasks_en_curso", deserialize_with = "deserialize_count")]
    pub tasks_in_progress: u32,
    #[serde(default, rename = "tasks_completado", deserialize_with = "deserialize_count")]
    pub tasks_completed: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

fn default_area_color() -> String {
    "#3B82F6".to_owned()
}

fn default_icon() -> String {
    "📁".to_owned()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// PROJECTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub emoji_icon: Option<String>,
    #[serde(default)]
    pub area_id: Option<String>,
    /// Owning user (UUID string).
    pub owner_id: String,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

/// Task counts for a single project.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStats {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub total_tasks: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub completed_tasks: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub in_progress_tasks: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub pending_tasks: u32,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub overdue_tasks: u32,
}

/// A project paired with its task counts, from `/projects/with-stats` or
/// computed client-side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectWithStats {
    #[serde(flatten)]
    pub project: Project,
    #[serde(flatten)]
    pub stats: ProjectStats,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

// =============================================================================
// TASKS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Owning project (UUID string). Always present.
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    /// Assigned user (UUID string), if any.
    #[serde(default)]
    pub responsible_id: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub deadline: Option<OffsetDateTime>,
    /// Lead time in hours for the deadline reminder.
    #[serde(default)]
    pub reminder_hours_before: Option<u32>,
    /// Stamped server-side when the task is completed.
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub is_archived: bool,
    pub created_by: String,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
}

impl Task {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Incomplete with a deadline strictly before `now`. Tasks without a
    /// deadline are never overdue; completed tasks never are either.
    #[must_use]
    pub fn is_overdue(&self, now: OffsetDateTime) -> bool {
        !self.is_completed() && self.deadline.is_some_and(|deadline| deadline < now)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCreate {
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub deadline: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_hours_before: Option<u32>,
}

impl TaskCreate {
    #[must_use]
    pub fn new(project_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            responsible_id: None,
            deadline: None,
            reminder_hours_before: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responsible_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "timestamp::option")]
    pub deadline: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_hours_before: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_u64() {
                return u32::try_from(int).map_err(|_| D::Error::custom(format!("count {int} out of range")));
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= 0.0
                && float <= f64::from(u32::MAX)
            {
                return Ok(float as u32);
            }
            Err(D::Error::custom("expected non-negative integer count"))
        }
        _ => Err(D::Error::custom("expected number")),
    }
}

/// RFC 3339 on the way out; RFC 3339 or offset-less ISO 8601 (read as UTC)
/// on the way in.
pub mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::{Iso8601, Rfc3339};
    use time::{OffsetDateTime, PrimitiveDateTime};

    /// Parse a backend timestamp.
    pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        let raw = raw.trim();
        OffsetDateTime::parse(raw, &Rfc3339)
            .or_else(|_| PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc))
    }

    pub fn serialize<S>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::OffsetDateTime;

        #[allow(clippy::ref_option)]
        pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(value) => super::serialize(value, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw = Option::<String>::deserialize(deserializer)?;
            match raw.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) => super::parse(raw).map(Some).map_err(serde::de::Error::custom),
            }
        }
    }
}
