use super::*;

const PROJECT_ID: &str = "6f1c2a9e-3b4d-4e5f-8a7b-1c2d3e4f5a6b";

fn registration() -> RegisterRequest {
    RegisterRequest {
        email: "ana@example.com".to_owned(),
        password: "Secret123".to_owned(),
        full_name: "Ana Ruiz".to_owned(),
        phone_number: None,
        role: None,
        area_id: None,
    }
}

// =============================================================
// FieldErrors
// =============================================================

#[test]
fn first_error_per_field_wins() {
    let mut errors = FieldErrors::default();
    errors.insert("name", "first");
    errors.insert("name", "second");
    errors.insert("color", "bad");
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("name"), Some("first"));
    assert_eq!(errors.to_string(), "color: bad; name: first");
}

#[test]
fn field_errors_serialize_as_map() {
    let mut errors = FieldErrors::default();
    errors.insert("title", "Title is required");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "title": "Title is required" }));
}

// =============================================================
// Accounts
// =============================================================

#[test]
fn valid_registration_passes() {
    assert!(validate_registration(&registration(), Some("Secret123")).is_ok());
    assert!(validate_registration(&registration(), None).is_ok());
}

#[test]
fn registration_collects_every_bad_field() {
    let req = RegisterRequest {
        email: "not-an-email".to_owned(),
        password: "short".to_owned(),
        full_name: "   ".to_owned(),
        phone_number: Some("1".repeat(21)),
        role: None,
        area_id: Some("nope".to_owned()),
    };
    let errors = validate_registration(&req, Some("different")).unwrap_err();
    for field in ["email", "password", "full_name", "phone_number", "area_id", "confirm_password"] {
        assert!(errors.get(field).is_some(), "missing error for {field}");
    }
}

#[test]
fn password_rules_report_first_failure() {
    assert!(password_problem("Abc1").unwrap().contains("at least 8"));
    assert!(password_problem("Abcdefgh").unwrap().contains("number"));
    assert!(password_problem("abcdefg1").unwrap().contains("uppercase"));
    assert!(password_problem(&format!("A1{}", "x".repeat(99))).unwrap().contains("exceed"));
    assert_eq!(password_problem("Abcdefg1"), None);
}

#[test]
fn email_shape_is_checked_loosely() {
    let mut req = registration();
    for bad in ["ana", "@example.com", "ana@example", "ana@.com", "ana@example.", "a b@example.com", "a@b@c.com"] {
        req.email = bad.to_owned();
        assert!(validate_registration(&req, None).is_err(), "{bad} accepted");
    }
    req.email = "ana.ruiz+work@mail.example.co".to_owned();
    assert!(validate_registration(&req, None).is_ok());
}

#[test]
fn password_change_requires_current_and_strong_new() {
    let req = ChangePasswordRequest { current_password: String::new(), new_password: "weak".to_owned() };
    let errors = validate_password_change(&req).unwrap_err();
    assert!(errors.get("current_password").is_some());
    assert!(errors.get("new_password").is_some());

    let ok = ChangePasswordRequest { current_password: "old".to_owned(), new_password: "Newpass99".to_owned() };
    assert!(validate_password_change(&ok).is_ok());
}

// =============================================================
// Projects
// =============================================================

#[test]
fn project_name_bounds() {
    let mut req = ProjectCreate { name: "ab".to_owned(), ..ProjectCreate::default() };
    assert!(validate_project_create(&req).unwrap_err().get("name").unwrap().contains("at least 3"));

    req.name = "x".repeat(256);
    assert!(validate_project_create(&req).unwrap_err().get("name").unwrap().contains("exceed"));

    req.name = "Website".to_owned();
    assert!(validate_project_create(&req).is_ok());
}

#[test]
fn project_emoji_counts_characters() {
    let req = ProjectCreate {
        name: "Website".to_owned(),
        emoji_icon: Some("🚀🚀🚀".to_owned()),
        ..ProjectCreate::default()
    };
    assert!(validate_project_create(&req).is_ok());

    let too_long = ProjectUpdate { emoji_icon: Some("🚀".repeat(11)), ..ProjectUpdate::default() };
    assert!(validate_project_update(&too_long).unwrap_err().get("emoji_icon").is_some());
}

#[test]
fn project_update_skips_absent_fields() {
    assert!(validate_project_update(&ProjectUpdate::default()).is_ok());
}

// =============================================================
// Tasks
// =============================================================

#[test]
fn task_requires_title_and_project() {
    let errors = validate_task_create(&TaskCreate::new("", "  ")).unwrap_err();
    assert_eq!(errors.get("title"), Some("Title is required"));
    assert_eq!(errors.get("project_id"), Some("A project must be selected"));
}

#[test]
fn task_project_must_be_uuid() {
    let errors = validate_task_create(&TaskCreate::new("p-1", "Write docs")).unwrap_err();
    assert!(errors.get("project_id").is_some());
    assert!(validate_task_create(&TaskCreate::new(PROJECT_ID, "Write docs")).is_ok());
}

#[test]
fn task_reminder_range() {
    let mut req = TaskCreate::new(PROJECT_ID, "Write docs");
    req.reminder_hours_before = Some(0);
    assert!(validate_task_create(&req).is_err());
    req.reminder_hours_before = Some(169);
    assert!(validate_task_create(&req).is_err());
    req.reminder_hours_before = Some(168);
    assert!(validate_task_create(&req).is_ok());
}

#[test]
fn task_update_checks_present_fields_only() {
    assert!(validate_task_update(&TaskUpdate::default()).is_ok());

    let blank = TaskUpdate { title: Some(" ".to_owned()), ..TaskUpdate::default() };
    assert!(validate_task_update(&blank).is_err());

    let bad_assignee = TaskUpdate { responsible_id: Some("bob".to_owned()), ..TaskUpdate::default() };
    assert!(validate_task_update(&bad_assignee).unwrap_err().get("responsible_id").is_some());
}

#[test]
fn task_title_limit() {
    let req = TaskCreate::new(PROJECT_ID, "t".repeat(501));
    assert!(validate_task_create(&req).unwrap_err().get("title").unwrap().contains("500"));
}

// =============================================================
// Areas
// =============================================================

#[test]
fn area_color_must_be_hex() {
    let mut req = AreaCreate { name: "Marketing".to_owned(), ..AreaCreate::default() };
    for bad in ["3B82F6", "#3B82F", "#3B82FG", "#3B82F6FF"] {
        req.color = Some(bad.to_owned());
        assert!(validate_area_create(&req).is_err(), "{bad} accepted");
    }
    req.color = Some("#3b82f6".to_owned());
    assert!(validate_area_create(&req).is_ok());
}

#[test]
fn area_name_and_description_limits() {
    let req = AreaCreate {
        name: String::new(),
        description: Some("d".repeat(501)),
        ..AreaCreate::default()
    };
    let errors = validate_area_create(&req).unwrap_err();
    assert!(errors.get("name").is_some());
    assert!(errors.get("description").is_some());

    let update = AreaUpdate { name: Some("n".repeat(101)), ..AreaUpdate::default() };
    assert!(validate_area_update(&update).is_err());
}
