//! Assignee lookup for the responsible-user picker.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use crate::net::types::User;

use super::contains_ignore_case;

/// Users whose name or email contains `term`, ignoring case.
///
/// A blank term matches everyone. Order is preserved.
#[must_use]
pub fn search_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    let needle = if term.trim().is_empty() { String::new() } else { term.to_lowercase() };
    users
        .iter()
        .filter(|user| contains_ignore_case(&user.full_name, &needle) || contains_ignore_case(&user.email, &needle))
        .collect()
}
