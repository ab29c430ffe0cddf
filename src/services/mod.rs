//! Typed wrappers over the backend's REST resources.
//!
//! ARCHITECTURE
//! ============
//! One module per entity. Each operation is a thin async function over
//! `HttpClient`: no caching, no retries, no deduplication. Create and update
//! operations validate their payload first and never touch the network when
//! validation fails.

pub mod area;
pub mod auth;
pub mod project;
pub mod task;
pub mod telegram;
pub mod user;
