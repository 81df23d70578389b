//! Classification of event payloads into the shapes the runtime is known
//! to emit.
//!
//! Hooks attach `input`/`output`/`metadata` values whose structure varies
//! by event type and is not guaranteed. Views never reach into those
//! fields directly; they classify the event first and handle the
//! `Opaque`/`Empty` fallbacks like any other variant.

use serde_json::Value;

use crate::event::{self, TraceEvent};

/// Preferred `input` keys for tool invocations, most descriptive first.
const TOOL_DETAIL_KEYS: [&str; 5] = ["file_path", "command", "pattern", "url", "description"];

#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    /// Prompt text submitted by the user.
    Prompt(String),
    /// Tool invocation (or permission request for one): tool name plus the
    /// most descriptive argument, when one of the known keys is present.
    ToolCall { tool: String, detail: Option<String> },
    /// Raw tool response value.
    ToolResponse(Value),
    /// Failure message attached to an errored tool use.
    Failure(String),
    /// Runtime notification title/message pair.
    Notice { title: String, message: String },
    /// Session lifecycle marker with a short context string.
    Lifecycle(String),
    /// Structured payload that matches no known shape.
    Opaque(Value),
    /// Event carried no payload at all.
    Empty,
}

impl EventPayload {
    /// Total classification; malformed payloads land in `Opaque`/`Empty`
    /// rather than failing.
    #[must_use]
    pub fn classify(event: &TraceEvent) -> Self {
        match event.event_type.as_str() {
            event::EVENT_TYPE_USER_PROMPT_SUBMIT => {
                match str_field(event.input.as_ref(), "prompt") {
                    Some(prompt) => Self::Prompt(prompt),
                    None => fallback(event),
                }
            }
            event::EVENT_TYPE_PRE_TOOL_USE | event::EVENT_TYPE_PERMISSION_REQUEST => {
                let tool = event.label().to_owned();
                let detail = TOOL_DETAIL_KEYS
                    .iter()
                    .find_map(|key| str_field(event.input.as_ref(), key));
                Self::ToolCall { tool, detail }
            }
            event::EVENT_TYPE_POST_TOOL_USE => match &event.output {
                Some(output) => Self::ToolResponse(output.clone()),
                None => fallback(event),
            },
            event::EVENT_TYPE_POST_TOOL_USE_FAILURE => str_field(event.metadata.as_ref(), "error")
                .or_else(|| str_field(event.output.as_ref(), "error"))
                .map_or_else(|| fallback(event), Self::Failure),
            event::EVENT_TYPE_NOTIFICATION => {
                let title = str_field(event.metadata.as_ref(), "title")
                    .or_else(|| event.name.clone())
                    .unwrap_or_default();
                let message = str_field(event.metadata.as_ref(), "message").unwrap_or_default();
                if title.is_empty() && message.is_empty() {
                    fallback(event)
                } else {
                    Self::Notice { title, message }
                }
            }
            event::EVENT_TYPE_SESSION_START => {
                lifecycle(event, &["source", "model", "agent_type"])
            }
            event::EVENT_TYPE_SESSION_END => lifecycle(event, &["reason"]),
            event::EVENT_TYPE_SUBAGENT_START | event::EVENT_TYPE_SUBAGENT_STOP => {
                lifecycle(event, &["agent_type"])
            }
            event::EVENT_TYPE_PRE_COMPACT => lifecycle(event, &["trigger"]),
            event::EVENT_TYPE_STOP => Self::Lifecycle(event.label().to_owned()),
            _ => fallback(event),
        }
    }
}

/// Lifecycle summary: the first non-empty metadata value among `keys`,
/// falling back to the event label.
fn lifecycle(event: &TraceEvent, keys: &[&str]) -> EventPayload {
    let context = keys
        .iter()
        .find_map(|key| str_field(event.metadata.as_ref(), key))
        .unwrap_or_else(|| event.label().to_owned());
    EventPayload::Lifecycle(context)
}

/// Shape-agnostic fallback: the first payload field that is present at
/// all, in input/output/metadata order.
fn fallback(event: &TraceEvent) -> EventPayload {
    for value in [&event.input, &event.output, &event.metadata]
        .into_iter()
        .flatten()
    {
        if !value.is_null() {
            return EventPayload::Opaque(value.clone());
        }
    }
    EventPayload::Empty
}

fn str_field(value: Option<&Value>, key: &str) -> Option<String> {
    let text = value?.get(key)?.as_str()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}
