//! Trace event records emitted by the instrumented agent runtime.
//!
//! An event is immutable once received. `span_id` is shared by the events
//! that make up one logical unit of work (e.g. a tool-use start/finish
//! pair) and is therefore not unique; `id` is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const EVENT_TYPE_SESSION_START: &str = "SessionStart";
pub const EVENT_TYPE_SESSION_END: &str = "SessionEnd";
pub const EVENT_TYPE_USER_PROMPT_SUBMIT: &str = "UserPromptSubmit";
pub const EVENT_TYPE_PRE_TOOL_USE: &str = "PreToolUse";
pub const EVENT_TYPE_POST_TOOL_USE: &str = "PostToolUse";
pub const EVENT_TYPE_POST_TOOL_USE_FAILURE: &str = "PostToolUseFailure";
pub const EVENT_TYPE_PERMISSION_REQUEST: &str = "PermissionRequest";
pub const EVENT_TYPE_NOTIFICATION: &str = "Notification";
pub const EVENT_TYPE_SUBAGENT_START: &str = "SubagentStart";
pub const EVENT_TYPE_SUBAGENT_STOP: &str = "SubagentStop";
pub const EVENT_TYPE_STOP: &str = "Stop";
pub const EVENT_TYPE_PRE_COMPACT: &str = "PreCompact";

/// Severity attached by the emitting hook. Serialized uppercase to match
/// the runtime's wire format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventLevel {
    #[default]
    Default,
    Debug,
    Warning,
    Error,
}

/// One instrumentation record for a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_span_id: Option<String>,
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub level: EventLevel,
}

impl TraceEvent {
    /// Minimal event with everything optional left unset.
    #[must_use]
    pub fn new(id: &str, session_id: &str, event_type: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.to_owned(),
            session_id: session_id.to_owned(),
            span_id: None,
            parent_span_id: None,
            event_type: event_type.to_owned(),
            name: None,
            timestamp,
            duration_ms: None,
            input: None,
            output: None,
            metadata: None,
            level: EventLevel::Default,
        }
    }

    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Instant at which the event's interval ends. Point events (no
    /// duration, or a negative one from a skewed clock) end where they start.
    #[must_use]
    pub fn end_ms(&self) -> i64 {
        self.timestamp_ms()
            .saturating_add(self.duration_ms.unwrap_or(0).max(0))
    }

    /// Human-facing label: the event's name when present, its type otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.event_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventLevel, TraceEvent, EVENT_TYPE_PRE_TOOL_USE};
    use chrono::{TimeZone, Utc};

    fn event(id: &str) -> TraceEvent {
        let ts = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).single();
        TraceEvent::new(
            id,
            "sess-1",
            EVENT_TYPE_PRE_TOOL_USE,
            ts.unwrap_or_default(),
        )
    }

    #[test]
    fn end_ms_ignores_negative_durations() {
        let mut e = event("e1");
        assert_eq!(e.end_ms(), e.timestamp_ms());
        e.duration_ms = Some(-50);
        assert_eq!(e.end_ms(), e.timestamp_ms());
        e.duration_ms = Some(125);
        assert_eq!(e.end_ms(), e.timestamp_ms() + 125);
    }

    #[test]
    fn label_prefers_nonblank_name() {
        let mut e = event("e1");
        assert_eq!(e.label(), EVENT_TYPE_PRE_TOOL_USE);
        e.name = Some("   ".to_owned());
        assert_eq!(e.label(), EVENT_TYPE_PRE_TOOL_USE);
        e.name = Some("Bash".to_owned());
        assert_eq!(e.label(), "Bash");
    }

    #[test]
    fn level_serializes_uppercase_and_defaults() {
        let e = event("e1");
        let text = serde_json::to_string(&e).unwrap_or_default();
        assert!(text.contains("\"level\":\"DEFAULT\""));

        let parsed: Result<TraceEvent, _> = serde_json::from_str(
            r#"{"id":"x","session_id":"s","event_type":"Stop","timestamp":"2026-03-14T09:26:53Z","level":"ERROR"}"#,
        );
        match parsed {
            Ok(e) => assert_eq!(e.level, EventLevel::Error),
            Err(err) => panic!("parse failed: {err}"),
        }
    }

    #[test]
    fn omitted_level_parses_as_default() {
        let parsed: Result<TraceEvent, _> = serde_json::from_str(
            r#"{"id":"x","session_id":"s","event_type":"Stop","timestamp":"2026-03-14T09:26:53Z"}"#,
        );
        match parsed {
            Ok(e) => assert_eq!(e.level, EventLevel::Default),
            Err(err) => panic!("parse failed: {err}"),
        }
    }
}
