//! Client-side session state.
//!
//! ARCHITECTURE
//! ============
//! `storage` is the persistence seam (file-backed in the CLI, in-memory in
//! tests). `session` owns the token + user pair on top of it and is shared
//! with the HTTP transport. `auth` is the manager callers talk to.

pub mod auth;
pub mod session;
pub mod storage;

pub use auth::AuthSession;
pub use session::{Session, SessionStore};
