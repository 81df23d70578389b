//! One-line human-readable summaries of event payloads.

use serde_json::Value;

use sightline_core::config::PreviewConfig;
use sightline_core::event::TraceEvent;
use sightline_core::payload::EventPayload;

/// Derive a short summary for one event. Pure and total: events with
/// nothing extractable yield the empty string. Whitespace runs collapse
/// to single spaces before truncation.
#[must_use]
pub fn event_preview(event: &TraceEvent, config: &PreviewConfig) -> String {
    let raw = match EventPayload::classify(event) {
        EventPayload::Prompt(text) => text,
        EventPayload::ToolCall { tool, detail } => match detail {
            Some(detail) => format!("{tool}: {detail}"),
            None => tool,
        },
        EventPayload::ToolResponse(value) | EventPayload::Opaque(value) => scalar_summary(&value),
        EventPayload::Failure(message) => message,
        EventPayload::Notice { title, message } => {
            join_nonempty(&title, &message)
        }
        EventPayload::Lifecycle(context) => context,
        EventPayload::Empty => String::new(),
    };
    compact(&raw, config.max_chars)
}

/// First scalar reachable at the top level of `value`, stringified.
/// Objects yield the value of their first scalar-valued key; arrays the
/// first scalar element. Purely structural values summarize to nothing.
fn scalar_summary(value: &Value) -> String {
    match value {
        Value::Object(map) => map.values().find_map(scalar_text).unwrap_or_default(),
        Value::Array(items) => items.iter().find_map(scalar_text).unwrap_or_default(),
        other => scalar_text(other).unwrap_or_default(),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn join_nonempty(left: &str, right: &str) -> String {
    match (left.is_empty(), right.is_empty()) {
        (true, _) => right.to_owned(),
        (_, true) => left.to_owned(),
        _ => format!("{left}: {right}"),
    }
}

/// Collapse whitespace runs, then truncate to `max_chars` with an
/// ellipsis marker.
fn compact(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if max_chars == 0 {
        return String::new();
    }
    let chars = collapsed.chars().collect::<Vec<_>>();
    if chars.len() <= max_chars {
        return collapsed;
    }
    let mut out = chars
        .into_iter()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}
