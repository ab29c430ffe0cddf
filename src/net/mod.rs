//! Network layer: wire types and the authenticated transport.
//!
//! ARCHITECTURE
//! ============
//! `types` mirrors the backend's JSON payloads, wire names included, so the
//! rest of the crate works with typed values. `http` is the only place that
//! talks to the network; services build on it.

pub mod http;
pub mod types;
