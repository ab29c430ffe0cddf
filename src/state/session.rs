//! Persisted session: the access token plus the cached user record.
//!
//! DESIGN
//! ======
//! Token and user are either both present or both absent. Every mutation
//! holds the lock across the storage write so a concurrent teardown (a 401
//! arriving on another request) can never interleave with a login and leave
//! one half behind.
//!
//! Hydration is synchronous and never touches the network, so callers can
//! decide access before doing anything else.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Mutex, PoisonError};

use crate::error::ApiError;
use crate::net::types::User;

use super::storage::{KeyValueStorage, load_json, save_json};

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

/// Point-in-time view of the session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// True iff a user record is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Shared owner of the session, used by both the auth manager and the HTTP
/// wrapper.
pub struct SessionStore {
    storage: Box<dyn KeyValueStorage>,
    current: Mutex<Session>,
}

impl SessionStore {
    /// Build the store from whatever `storage` already holds.
    ///
    /// A lone token, a lone user, or a user record that no longer parses all
    /// hydrate as an empty session, and the stray half is removed.
    pub fn hydrate(storage: impl KeyValueStorage + 'static) -> Self {
        let token = storage.get_item(ACCESS_TOKEN_KEY).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not read stored token");
            None
        });
        let user: Option<User> = load_json(&storage, USER_KEY);

        let current = match (token, user) {
            (Some(token), Some(user)) if !token.is_empty() => {
                tracing::debug!(user_id = %user.id, "session restored");
                Session { token: Some(token), user: Some(user) }
            }
            (None, None) => Session::default(),
            _ => {
                tracing::warn!("discarding incomplete stored session");
                remove_keys(&storage);
                Session::default()
            }
        };

        Self { storage: Box::new(storage), current: Mutex::new(current) }
    }

    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.lock().clone()
    }

    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.lock().token.clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().user.clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_authenticated()
    }

    /// Persist and adopt a fresh token + user pair.
    pub fn establish(&self, token: String, user: User) -> Result<(), ApiError> {
        let mut current = self.lock();
        if let Err(e) = self
            .storage
            .set_item(ACCESS_TOKEN_KEY, &token)
            .and_then(|()| save_json(self.storage.as_ref(), USER_KEY, &user))
        {
            remove_keys(self.storage.as_ref());
            *current = Session::default();
            return Err(e);
        }
        *current = Session { token: Some(token), user: Some(user) };
        Ok(())
    }

    /// Replace the cached user of the active session.
    pub fn replace_user(&self, user: User) -> Result<(), ApiError> {
        let mut current = self.lock();
        if current.token.is_none() {
            return Err(ApiError::NoSession);
        }
        save_json(self.storage.as_ref(), USER_KEY, &user)?;
        current.user = Some(user);
        Ok(())
    }

    /// Drop the session from memory and storage.
    ///
    /// Storage is cleared unconditionally. Returns `true` only when an
    /// in-memory session was actually torn down, so concurrent callers can
    /// tell which one of them ended it.
    pub fn clear(&self) -> bool {
        let mut current = self.lock();
        let had_session = current.token.is_some() || current.user.is_some();
        *current = Session::default();
        remove_keys(self.storage.as_ref());
        had_session
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Session> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn remove_keys(storage: &dyn KeyValueStorage) {
    for key in [ACCESS_TOKEN_KEY, USER_KEY] {
        if let Err(e) = storage.remove_item(key) {
            tracing::warn!(key, error = %e, "could not remove stored session key");
        }
    }
}
