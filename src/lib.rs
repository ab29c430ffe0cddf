//! # taskdesk
//!
//! Client library for the TaskDesk task and project management backend.
//!
//! This crate contains the persisted session and auth manager, an
//! authenticated JSON transport, typed services for every backend resource,
//! form validation, and the client-side aggregation behind the dashboard and
//! tasks views. The `taskdesk` binary in `cli/` is one shell built on it.

pub mod client;
pub mod config;
pub mod error;
pub mod net;
pub mod services;
pub mod state;
pub mod validate;
pub mod views;

#[cfg(test)]
mod test_helpers;

pub use client::TaskDeskClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorCode};
