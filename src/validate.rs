//! Client-side form validation.
//!
//! Runs before any network call so field problems come back keyed by field
//! name instead of as a single backend message. Limits mirror what the
//! backend enforces; lengths count characters, not bytes.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::net::types::{
    AreaCreate, AreaUpdate, ChangePasswordRequest, ProjectCreate, ProjectUpdate, RegisterRequest, TaskCreate,
    TaskUpdate,
};

pub const MIN_PASSWORD_CHARS: usize = 8;
pub const MAX_PASSWORD_CHARS: usize = 100;
pub const MAX_FULL_NAME_CHARS: usize = 255;
pub const MAX_PHONE_CHARS: usize = 20;
pub const MIN_PROJECT_NAME_CHARS: usize = 3;
pub const MAX_PROJECT_NAME_CHARS: usize = 255;
pub const MAX_TASK_TITLE_CHARS: usize = 500;
pub const MAX_AREA_NAME_CHARS: usize = 100;
pub const MAX_AREA_DESCRIPTION_CHARS: usize = 500;
pub const MAX_ICON_CHARS: usize = 10;
pub const REMINDER_HOURS_RANGE: std::ops::RangeInclusive<u32> = 1..=168;

/// Field name -> first problem found for that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    /// Record a problem; the first message per field wins.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

// =============================================================================
// ACCOUNTS
// =============================================================================

/// Validate a sign-up form. `confirm_password`, when given, must match.
pub fn validate_registration(req: &RegisterRequest, confirm_password: Option<&str>) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let name = req.full_name.trim();
    if name.is_empty() {
        errors.insert("full_name", "Full name is required");
    } else if char_len(name) > MAX_FULL_NAME_CHARS {
        errors.insert("full_name", format!("Full name cannot exceed {MAX_FULL_NAME_CHARS} characters"));
    }

    if !looks_like_email(&req.email) {
        errors.insert("email", "Enter a valid email address");
    }

    if let Some(problem) = password_problem(&req.password) {
        errors.insert("password", problem);
    }
    if confirm_password.is_some_and(|confirm| confirm != req.password) {
        errors.insert("confirm_password", "Passwords do not match");
    }

    if req.phone_number.as_deref().is_some_and(|p| char_len(p) > MAX_PHONE_CHARS) {
        errors.insert("phone_number", format!("Phone number cannot exceed {MAX_PHONE_CHARS} characters"));
    }
    if req.area_id.as_deref().is_some_and(|id| !is_uuid(id)) {
        errors.insert("area_id", "Area must be a valid id");
    }

    errors.into_result()
}

pub fn validate_password_change(req: &ChangePasswordRequest) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if req.current_password.is_empty() {
        errors.insert("current_password", "Current password is required");
    }
    if let Some(problem) = password_problem(&req.new_password) {
        errors.insert("new_password", problem);
    }
    errors.into_result()
}

/// First rule `password` breaks, if any.
#[must_use]
pub fn password_problem(password: &str) -> Option<String> {
    let len = char_len(password);
    if len < MIN_PASSWORD_CHARS {
        return Some(format!("Password must be at least {MIN_PASSWORD_CHARS} characters"));
    }
    if len > MAX_PASSWORD_CHARS {
        return Some(format!("Password cannot exceed {MAX_PASSWORD_CHARS} characters"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number".to_owned());
    }
    if !password.chars().any(char::is_uppercase) {
        return Some("Password must contain at least one uppercase letter".to_owned());
    }
    None
}

// =============================================================================
// PROJECTS
// =============================================================================

pub fn validate_project_create(req: &ProjectCreate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_project_name(&mut errors, &req.name);
    check_icon(&mut errors, "emoji_icon", req.emoji_icon.as_deref());
    check_optional_uuid(&mut errors, "area_id", req.area_id.as_deref());
    errors.into_result()
}

pub fn validate_project_update(req: &ProjectUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if let Some(name) = &req.name {
        check_project_name(&mut errors, name);
    }
    check_icon(&mut errors, "emoji_icon", req.emoji_icon.as_deref());
    check_optional_uuid(&mut errors, "area_id", req.area_id.as_deref());
    errors.into_result()
}

fn check_project_name(errors: &mut FieldErrors, name: &str) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.insert("name", "Project name is required");
    } else if char_len(trimmed) < MIN_PROJECT_NAME_CHARS {
        errors.insert("name", format!("Name must be at least {MIN_PROJECT_NAME_CHARS} characters"));
    } else if char_len(name) > MAX_PROJECT_NAME_CHARS {
        errors.insert("name", format!("Name cannot exceed {MAX_PROJECT_NAME_CHARS} characters"));
    }
}

// =============================================================================
// TASKS
// =============================================================================

pub fn validate_task_create(req: &TaskCreate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_task_title(&mut errors, &req.title);
    if req.project_id.trim().is_empty() {
        errors.insert("project_id", "A project must be selected");
    } else if !is_uuid(&req.project_id) {
        errors.insert("project_id", "Project must be a valid id");
    }
    check_optional_uuid(&mut errors, "responsible_id", req.responsible_id.as_deref());
    check_reminder(&mut errors, req.reminder_hours_before);
    errors.into_result()
}

pub fn validate_task_update(req: &TaskUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if let Some(title) = &req.title {
        check_task_title(&mut errors, title);
    }
    check_optional_uuid(&mut errors, "responsible_id", req.responsible_id.as_deref());
    check_reminder(&mut errors, req.reminder_hours_before);
    errors.into_result()
}

fn check_task_title(errors: &mut FieldErrors, title: &str) {
    if title.trim().is_empty() {
        errors.insert("title", "Title is required");
    } else if char_len(title) > MAX_TASK_TITLE_CHARS {
        errors.insert("title", format!("Title cannot exceed {MAX_TASK_TITLE_CHARS} characters"));
    }
}

fn check_reminder(errors: &mut FieldErrors, hours: Option<u32>) {
    if hours.is_some_and(|h| !REMINDER_HOURS_RANGE.contains(&h)) {
        errors.insert(
            "reminder_hours_before",
            format!(
                "Reminder must be between {} and {} hours",
                REMINDER_HOURS_RANGE.start(),
                REMINDER_HOURS_RANGE.end()
            ),
        );
    }
}

// =============================================================================
// AREAS
// =============================================================================

pub fn validate_area_create(req: &AreaCreate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    check_area_name(&mut errors, &req.name);
    check_area_description(&mut errors, req.description.as_deref());
    check_color(&mut errors, req.color.as_deref());
    check_icon(&mut errors, "icon", req.icon.as_deref());
    errors.into_result()
}

pub fn validate_area_update(req: &AreaUpdate) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    if let Some(name) = &req.name {
        check_area_name(&mut errors, name);
    }
    check_area_description(&mut errors, req.description.as_deref());
    check_color(&mut errors, req.color.as_deref());
    check_icon(&mut errors, "icon", req.icon.as_deref());
    errors.into_result()
}

fn check_area_name(errors: &mut FieldErrors, name: &str) {
    if name.trim().is_empty() {
        errors.insert("name", "Name is required");
    } else if char_len(name) > MAX_AREA_NAME_CHARS {
        errors.insert("name", format!("Name cannot exceed {MAX_AREA_NAME_CHARS} characters"));
    }
}

fn check_area_description(errors: &mut FieldErrors, description: Option<&str>) {
    if description.is_some_and(|d| char_len(d) > MAX_AREA_DESCRIPTION_CHARS) {
        errors.insert(
            "description",
            format!("Description cannot exceed {MAX_AREA_DESCRIPTION_CHARS} characters"),
        );
    }
}

fn check_color(errors: &mut FieldErrors, color: Option<&str>) {
    let Some(color) = color else { return };
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if !valid {
        errors.insert("color", "Color must be a hex value like #3B82F6");
    }
}

// =============================================================================
// SHARED
// =============================================================================

fn check_icon(errors: &mut FieldErrors, field: &'static str, icon: Option<&str>) {
    if icon.is_some_and(|i| char_len(i) > MAX_ICON_CHARS) {
        errors.insert(field, format!("Icon cannot exceed {MAX_ICON_CHARS} characters"));
    }
}

fn check_optional_uuid(errors: &mut FieldErrors, field: &'static str, value: Option<&str>) {
    if value.is_some_and(|v| !is_uuid(v)) {
        errors.insert(field, "Must be a valid id");
    }
}

fn is_uuid(value: &str) -> bool {
    uuid::Uuid::parse_str(value.trim()).is_ok()
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
