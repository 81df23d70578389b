//! In-process [`EventSource`] backed by a plain `Vec`.
//!
//! Persistence proper lives outside this workspace; this store exists for
//! tests and for embedding callers that already hold the events in memory.
//! All sessions it creates on the fly belong to the single `local`
//! project.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::event::{TraceEvent, EVENT_TYPE_SESSION_END};
use crate::query::{EventSource, QueryError};
use crate::stats::{DashboardStats, SessionSummary};

const LOCAL_PROJECT_ID: &str = "local";
const RECENT_SESSION_LIMIT: usize = 10;

#[derive(Debug, Clone, Default)]
pub struct MemoryEventSource {
    events: Vec<TraceEvent>,
    sessions: BTreeMap<String, SessionSummary>,
    today: Option<NaiveDate>,
}

impl MemoryEventSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the calendar day used for `events_today`. Unset, the current
    /// UTC day applies.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = Some(today);
    }

    /// Register a session with full metadata. Sessions are otherwise
    /// created implicitly by the first event observed for them.
    pub fn register_session(&mut self, session: SessionSummary) {
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn push(&mut self, event: TraceEvent) {
        let session = self
            .sessions
            .entry(event.session_id.clone())
            .or_insert_with(|| SessionSummary {
                id: event.session_id.clone(),
                project_id: LOCAL_PROJECT_ID.to_owned(),
                source_app: String::new(),
                model: None,
                agent_type: None,
                started_at: event.timestamp,
                ended_at: None,
                event_count: 0,
            });
        session.started_at = session.started_at.min(event.timestamp);
        session.event_count += 1;
        if event.event_type == EVENT_TYPE_SESSION_END {
            session.ended_at = Some(event.timestamp);
        }
        self.events.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = TraceEvent>) {
        for event in events {
            self.push(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for MemoryEventSource {
    fn session_events(&self, session_id: &str) -> Result<Vec<TraceEvent>, QueryError> {
        if !self.sessions.contains_key(session_id) {
            return Err(QueryError::UnknownSession(session_id.to_owned()));
        }
        let mut events = self
            .events
            .iter()
            .filter(|event| event.session_id == session_id)
            .cloned()
            .collect::<Vec<_>>();
        events.sort_by_key(TraceEvent::timestamp_ms);
        Ok(events)
    }

    fn stats(&self) -> Result<DashboardStats, QueryError> {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());

        let mut events_by_type: BTreeMap<String, u64> = BTreeMap::new();
        let mut events_today = 0u64;
        for event in &self.events {
            *events_by_type.entry(event.event_type.clone()).or_insert(0) += 1;
            if event.timestamp.date_naive() == today {
                events_today += 1;
            }
        }

        let mut recent = self.sessions.values().cloned().collect::<Vec<_>>();
        recent.sort_by(|a, b| b.started_at.cmp(&a.started_at).then(a.id.cmp(&b.id)));
        recent.truncate(RECENT_SESSION_LIMIT);

        let mut project_ids = self
            .sessions
            .values()
            .map(|session| session.project_id.as_str())
            .filter(|id| !id.is_empty())
            .collect::<Vec<_>>();
        project_ids.sort_unstable();
        project_ids.dedup();

        Ok(DashboardStats {
            total_events: self.events.len() as u64,
            total_sessions: self.sessions.len() as u64,
            total_projects: project_ids.len() as u64,
            events_today,
            events_by_type,
            recent_sessions: recent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::MemoryEventSource;
    use crate::event::{TraceEvent, EVENT_TYPE_SESSION_END, EVENT_TYPE_STOP};
    use crate::query::{EventSource, QueryError};
    use chrono::{Duration, NaiveDate, TimeZone, Utc};

    fn source_with_session() -> MemoryEventSource {
        let base = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let mut source = MemoryEventSource::new();
        source.push(TraceEvent::new("e2", "sess-1", EVENT_TYPE_STOP, base + Duration::seconds(5)));
        source.push(TraceEvent::new("e1", "sess-1", "PreToolUse", base));
        source.push(TraceEvent::new(
            "e3",
            "sess-1",
            EVENT_TYPE_SESSION_END,
            base + Duration::seconds(9),
        ));
        source
    }

    #[test]
    fn session_events_sorted_ascending() {
        let source = source_with_session();
        let events = source.session_events("sess-1").unwrap_or_default();
        let ids = events.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["e1", "e2", "e3"]);
    }

    #[test]
    fn unknown_session_is_an_error() {
        let source = source_with_session();
        assert!(matches!(
            source.session_events("nope"),
            Err(QueryError::UnknownSession(_))
        ));
    }

    #[test]
    fn stats_count_events_sessions_and_today() {
        let mut source = source_with_session();
        source.set_today(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap_or_default());
        let stats = source.stats().unwrap_or_default();
        assert_eq!(stats.total_events, 3);
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_projects, 1);
        assert_eq!(stats.events_today, 3);
        assert_eq!(stats.events_by_type.get("PreToolUse"), Some(&1));
        assert_eq!(stats.recent_sessions.len(), 1);
        assert_eq!(stats.recent_sessions[0].event_count, 3);
        assert!(stats.recent_sessions[0].ended_at.is_some());
    }

    #[test]
    fn first_event_fixes_session_start() {
        let source = source_with_session();
        let stats = source.stats().unwrap_or_default();
        // "e1" is the earliest event even though it was pushed second.
        assert_eq!(
            stats.recent_sessions[0].started_at.timestamp_millis(),
            Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
                .single()
                .unwrap_or_default()
                .timestamp_millis()
        );
    }
}
