//! Interfaces to the collaborators this core consumes.
//!
//! The backing store and its transport live outside this workspace. Views
//! only ever see two things: an [`EventSource`] they can re-query, and
//! opaque [`ChangeSignal`]s telling them that *something* changed.

use crate::event::TraceEvent;
use crate::stats::DashboardStats;

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("event store unavailable: {0}")]
    Unavailable(String),
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Read-only access to stored events. Implementations must be idempotent
/// and side-effect free; the core never retries a failed call and leaves
/// the previously rendered view intact on error.
pub trait EventSource {
    /// All events for one session, ascending by timestamp.
    fn session_events(&self, session_id: &str) -> Result<Vec<TraceEvent>, QueryError>;

    /// Dashboard aggregates across all sessions.
    fn stats(&self) -> Result<DashboardStats, QueryError>;
}

/// A change notification from the push stream.
///
/// The optional session hint is advisory only; the stream makes no
/// guarantee about signal content, so consumers must re-query instead of
/// acting on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSignal {
    pub session_hint: Option<String>,
}

impl ChangeSignal {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn for_session(session_id: &str) -> Self {
        Self {
            session_hint: Some(session_id.to_owned()),
        }
    }
}
