//! Auth session manager.
//!
//! DESIGN
//! ======
//! `AuthSession` is an explicit object owned by the application shell, not a
//! global. Its state is the shared `SessionStore`, hydrated synchronously from
//! storage before the manager exists, so `is_authenticated` is answerable
//! without a network call.
//!
//! ERROR HANDLING
//! ==============
//! Backend messages pass through unchanged. `register` fails loudly when
//! either the registration or the follow-up login fails. `refresh_user` signs
//! the session out on any failure.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use tracing::info;

use crate::error::ApiError;
use crate::net::http::HttpClient;
use crate::net::types::{ChangePasswordRequest, LoginRequest, RegisterRequest, User, UserUpdate};
use crate::services;
use crate::validate;

use super::session::SessionStore;

#[derive(Clone)]
pub struct AuthSession {
    http: HttpClient,
}

impl AuthSession {
    /// Wrap the transport; the session is the one the transport already uses.
    #[must_use]
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionStore> {
        self.http.session()
    }

    #[must_use]
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session().user()
    }

    /// True iff a user record is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    /// Exchange credentials for a token and store the pair.
    ///
    /// # Errors
    ///
    /// Propagates the backend's rejection (e.g. "Incorrect email or
    /// password") unchanged; the session is left untouched on failure.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<(), ApiError> {
        let response = services::auth::login(&self.http, credentials).await?;
        let user_id = response.user.id.clone();
        self.session().establish(response.access_token, response.user)?;
        info!(%user_id, "logged in");
        Ok(())
    }

    /// Create an account, then log into it with the same credentials.
    ///
    /// `confirm_password`, when given, must match the password.
    ///
    /// # Errors
    ///
    /// `Validation` before any network call; otherwise whichever of the two
    /// requests failed first.
    pub async fn register(&self, request: &RegisterRequest, confirm_password: Option<&str>) -> Result<(), ApiError> {
        validate::validate_registration(request, confirm_password).map_err(ApiError::Validation)?;
        let created = services::auth::register(&self.http, request).await?;
        info!(user_id = %created.id, "account registered");
        self.login(&request.credentials()).await
    }

    /// Drop the session locally. No network call; safe to repeat.
    pub fn logout(&self) {
        if self.session().clear() {
            info!("logged out");
        }
    }

    /// Re-fetch the current user and replace the cached copy.
    ///
    /// # Errors
    ///
    /// Any failure signs the session out before it is returned.
    pub async fn refresh_user(&self) -> Result<User, ApiError> {
        if self.session().token().is_none() {
            self.logout();
            return Err(ApiError::NoSession);
        }
        let refreshed = match services::user::me(&self.http).await {
            Ok(user) => self.session().replace_user(user.clone()).map(|()| user),
            Err(e) => Err(e),
        };
        if let Err(e) = &refreshed {
            tracing::warn!(error = %e, "user refresh failed; signing out");
            self.logout();
        }
        refreshed
    }

    /// Replace the cached user without a network round trip.
    ///
    /// # Errors
    ///
    /// `NoSession` when nobody is logged in; a user without a token would
    /// break the session invariant.
    pub fn update_user(&self, user: User) -> Result<(), ApiError> {
        self.session().replace_user(user)
    }

    /// Save profile changes and cache the stored result.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ApiError> {
        let user = services::user::update_me(&self.http, update).await?;
        self.update_user(user.clone())?;
        Ok(user)
    }

    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<(), ApiError> {
        services::user::change_password(&self.http, request).await
    }
}
