//! Time-proportional bar layout for a flat event collection.
//!
//! Output is purely derived: no state, recomputed on every call. All
//! geometry is expressed as fractions of the trace duration so the
//! presentation layer can scale it to any surface.

use serde::Serialize;
use sightline_core::config::TimelineConfig;
use sightline_core::event::TraceEvent;

/// One tick on the time scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleMarker {
    /// Offset from trace start.
    pub offset_ms: i64,
    /// Fractional position in `[0, 1]`.
    pub position: f64,
}

/// Geometry for one event's bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineBar {
    pub event_id: String,
    /// Fraction of total duration left of the bar.
    pub left: f64,
    /// Fraction of total duration covered; floored at the configured
    /// minimum so zero-duration events stay visible and clickable.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub markers: Vec<ScaleMarker>,
    /// Bars ascending by timestamp; ties keep input order.
    pub bars: Vec<TimelineBar>,
    /// Never below 1, so positions stay finite for single-instant traces.
    pub total_duration_ms: i64,
}

#[must_use]
pub fn layout_timeline(events: &[TraceEvent], config: &TimelineConfig) -> TimelineLayout {
    let intervals = config.scale_intervals.max(1);
    let min_visible = if config.min_visible_fraction > 0.0 && config.min_visible_fraction < 1.0 {
        config.min_visible_fraction
    } else {
        TimelineConfig::default().min_visible_fraction
    };

    let mut order = (0..events.len()).collect::<Vec<_>>();
    order.sort_by_key(|idx| events[*idx].timestamp_ms());

    let start = order
        .first()
        .map(|idx| events[*idx].timestamp_ms())
        .unwrap_or(0);
    let latest = order
        .last()
        .map(|idx| events[*idx].timestamp_ms())
        .unwrap_or(start);
    let end = events
        .iter()
        .map(TraceEvent::end_ms)
        .fold(latest, i64::max);
    let total = (end - start).max(1);

    let markers = (0..=intervals)
        .map(|tick| ScaleMarker {
            offset_ms: (total * tick as i64) / intervals as i64,
            position: tick as f64 / intervals as f64,
        })
        .collect();

    let bars = order
        .iter()
        .map(|idx| {
            let event = &events[*idx];
            let duration = event.duration_ms.unwrap_or(0).max(0);
            TimelineBar {
                event_id: event.id.clone(),
                left: (event.timestamp_ms() - start) as f64 / total as f64,
                width: (duration as f64 / total as f64).max(min_visible).min(1.0),
            }
        })
        .collect();

    TimelineLayout {
        markers,
        bars,
        total_duration_ms: total,
    }
}

/// Text rendering: a ruler line followed by one row per bar.
#[must_use]
pub fn render_timeline(layout: &TimelineLayout, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    const LABEL_WIDTH: usize = 10;
    let track = width.saturating_sub(LABEL_WIDTH + 3).max(8);

    let mut lines = vec![fit_width(
        &format!(
            "TIMELINE span:{}ms bars:{}",
            layout.total_duration_ms,
            layout.bars.len()
        ),
        width,
    )];

    let mut ruler = vec!['-'; track];
    for marker in &layout.markers {
        let col = position_to_col(marker.position, track);
        ruler[col.min(track - 1)] = '+';
    }
    lines.push(fit_width(
        &format!("{:LABEL_WIDTH$} |{}|", "", ruler.iter().collect::<String>()),
        width,
    ));

    if layout.bars.is_empty() {
        lines.push(fit_width("no events in trace", width));
        lines.truncate(height);
        return lines;
    }

    for bar in &layout.bars {
        if lines.len() >= height {
            break;
        }
        let mut row = vec!['.'; track];
        let start_col = position_to_col(bar.left, track);
        let span_cols = ((bar.width * track as f64).ceil() as usize).max(1);
        for cell in row.iter_mut().skip(start_col).take(span_cols) {
            *cell = '=';
        }
        lines.push(fit_width(
            &format!(
                "{:LABEL_WIDTH$} |{}|",
                trim_label(&bar.event_id, LABEL_WIDTH),
                row.iter().collect::<String>()
            ),
            width,
        ));
    }

    lines.truncate(height);
    lines
}

fn position_to_col(position: f64, track: usize) -> usize {
    let col = (position.clamp(0.0, 1.0) * track as f64).floor() as usize;
    col.min(track.saturating_sub(1))
}

fn trim_label(label: &str, max_len: usize) -> String {
    label.chars().take(max_len).collect()
}

fn fit_width(value: &str, width: usize) -> String {
    if value.len() <= width {
        value.to_owned()
    } else {
        value.chars().take(width).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{layout_timeline, render_timeline};
    use chrono::{Duration, TimeZone, Utc};
    use sightline_core::config::TimelineConfig;
    use sightline_core::event::TraceEvent;

    fn event(id: &str, offset_ms: i64, duration_ms: Option<i64>) -> TraceEvent {
        let base = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let mut e = TraceEvent::new(id, "sess-1", "PreToolUse", base + Duration::milliseconds(offset_ms));
        e.duration_ms = duration_ms;
        e
    }

    #[test]
    fn single_instant_trace_has_unit_duration() {
        let layout = layout_timeline(&[event("1", 0, None)], &TimelineConfig::default());
        assert_eq!(layout.total_duration_ms, 1);
        assert_eq!(layout.bars.len(), 1);
        assert!((layout.bars[0].left - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bars_stay_within_trace_bounds() {
        let config = TimelineConfig::default();
        let layout = layout_timeline(
            &[
                event("1", 0, Some(400)),
                event("2", 100, Some(900)),
                event("3", 1_000, None),
            ],
            &config,
        );
        assert_eq!(layout.total_duration_ms, 1_000);
        for bar in &layout.bars {
            assert!(bar.left + bar.width <= 1.0 + config.min_visible_fraction + 1e-9);
        }
    }

    #[test]
    fn trailing_duration_extends_the_trace_end() {
        let layout = layout_timeline(
            &[event("1", 0, Some(5_000)), event("2", 1_000, None)],
            &TimelineConfig::default(),
        );
        assert_eq!(layout.total_duration_ms, 5_000);
    }

    #[test]
    fn zero_duration_events_get_the_minimum_width() {
        let config = TimelineConfig::default();
        let layout = layout_timeline(
            &[event("1", 0, Some(10_000)), event("2", 5_000, None)],
            &config,
        );
        let zero_bar = layout
            .bars
            .iter()
            .find(|bar| bar.event_id == "2")
            .cloned();
        match zero_bar {
            Some(bar) => {
                assert!((bar.width - config.min_visible_fraction).abs() < f64::EPSILON);
            }
            None => panic!("bar for event 2 missing"),
        }
    }

    #[test]
    fn sort_is_stable_for_timestamp_ties() {
        let layout = layout_timeline(
            &[event("b", 50, None), event("a", 50, None), event("c", 0, None)],
            &TimelineConfig::default(),
        );
        let ids = layout
            .bars
            .iter()
            .map(|bar| bar.event_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn marker_count_and_extremes() {
        let layout = layout_timeline(
            &[event("1", 0, None), event("2", 600, None)],
            &TimelineConfig::default(),
        );
        assert_eq!(layout.markers.len(), 7);
        assert!((layout.markers[0].position - 0.0).abs() < f64::EPSILON);
        assert!((layout.markers[6].position - 1.0).abs() < f64::EPSILON);
        assert_eq!(layout.markers[0].offset_ms, 0);
        assert_eq!(layout.markers[6].offset_ms, 600);
        let offsets = layout.markers.iter().map(|m| m.offset_ms).collect::<Vec<_>>();
        let mut sorted = offsets.clone();
        sorted.sort_unstable();
        assert_eq!(offsets, sorted);
    }

    #[test]
    fn render_shows_ruler_and_bar_rows() {
        let layout = layout_timeline(
            &[event("tool-1", 0, Some(500)), event("tool-2", 500, Some(500))],
            &TimelineConfig::default(),
        );
        let lines = render_timeline(&layout, 60, 10);
        assert!(lines[0].contains("TIMELINE"));
        assert!(lines[1].contains('+'));
        assert!(lines.iter().any(|line| line.contains("tool-1")));
        assert!(lines.iter().any(|line| line.contains('=')));
        assert!(render_timeline(&layout, 60, 2).len() <= 2);
    }
}
