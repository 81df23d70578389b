//! Bridge from trace events to the generic table engine: the row model
//! and column descriptors behind the event list page.

use sightline_core::config::PreviewConfig;
use sightline_core::event::TraceEvent;

use crate::preview::event_preview;
use crate::table::{CellValue, TableColumn, TableRow};

/// One event projected as a table row. Cells are precomputed so the
/// engine can re-sort and re-filter without touching the event again.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRow {
    pub id: String,
    pub time: String,
    pub event_type: String,
    pub name: String,
    pub duration_ms: Option<i64>,
    pub preview: String,
}

impl TableRow for EventRow {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "time" => CellValue::Text(self.time.clone()),
            "type" => CellValue::Text(self.event_type.clone()),
            "name" => CellValue::Text(self.name.clone()),
            "duration" => self
                .duration_ms
                .map_or(CellValue::Missing, |ms| CellValue::Number(ms as f64)),
            "preview" => CellValue::Text(self.preview.clone()),
            _ => CellValue::Missing,
        }
    }
}

/// Standard event list columns.
#[must_use]
pub fn event_columns() -> Vec<TableColumn> {
    vec![
        TableColumn::new("time", "Time"),
        TableColumn::new("type", "Type"),
        TableColumn::new("name", "Name"),
        TableColumn::with_format("duration", "Duration", duration_cell),
        TableColumn::new("preview", "Preview"),
    ]
}

#[must_use]
pub fn build_event_rows(events: &[TraceEvent], config: &PreviewConfig) -> Vec<EventRow> {
    events
        .iter()
        .map(|event| EventRow {
            id: event.id.clone(),
            time: event.timestamp.format("%H:%M:%S").to_string(),
            event_type: event.event_type.clone(),
            name: event.name.clone().unwrap_or_default(),
            duration_ms: event.duration_ms,
            preview: event_preview(event, config),
        })
        .collect()
}

fn duration_cell(value: &CellValue) -> String {
    match value {
        CellValue::Number(ms) => format!("{ms}ms"),
        CellValue::Text(_) | CellValue::Missing => String::new(),
    }
}
