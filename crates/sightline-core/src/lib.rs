//! sightline-core: domain model and collaborator interfaces for the
//! Sightline trace viewer.
//!
//! This crate holds everything the view engines share: the immutable
//! trace-event record, payload classification, dashboard aggregates, the
//! consumed query/notification interfaces, viewer configuration, and an
//! in-memory event source for tests and embedding callers.

pub mod config;
pub mod event;
pub mod memory;
pub mod payload;
pub mod query;
pub mod stats;

/// Crate identity label used by bootstrap smoke tests.
pub fn crate_label() -> &'static str {
    "sightline-core"
}
