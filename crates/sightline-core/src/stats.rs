//! Aggregate counters served by the query interface for the dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One session as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: String,
    pub project_id: String,
    pub source_app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_type: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_count: u64,
}

/// Dashboard aggregates. `events_by_type` is keyed by the raw event type
/// string; `recent_sessions` is newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_events: u64,
    pub total_sessions: u64,
    pub total_projects: u64,
    pub events_today: u64,
    #[serde(default)]
    pub events_by_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub recent_sessions: Vec<SessionSummary>,
}

impl DashboardStats {
    /// Highest single-type count, used to scale histogram rows.
    #[must_use]
    pub fn max_type_count(&self) -> u64 {
        self.events_by_type.values().copied().max().unwrap_or(0)
    }
}
