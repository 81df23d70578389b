//! Dashboard projection of the aggregate counters.

use sightline_core::stats::DashboardStats;

const TYPE_LABEL_WIDTH: usize = 22;
const HISTOGRAM_WIDTH: usize = 24;

/// Headline counters, an events-by-type histogram, and the recent
/// session list as fixed-width lines.
#[must_use]
pub fn render_stats(stats: &DashboardStats, width: usize, height: usize) -> Vec<String> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let mut lines = vec![
        fit_width("DASHBOARD", width),
        fit_width(
            &format!(
                "events:{} sessions:{} projects:{} today:{}",
                stats.total_events, stats.total_sessions, stats.total_projects, stats.events_today
            ),
            width,
        ),
    ];

    let max_count = stats.max_type_count();
    for (event_type, count) in &stats.events_by_type {
        if lines.len() >= height {
            break;
        }
        let filled = if max_count == 0 {
            0
        } else {
            ((count * HISTOGRAM_WIDTH as u64) / max_count).max(1) as usize
        };
        let bar = "#".repeat(filled.min(HISTOGRAM_WIDTH));
        lines.push(fit_width(
            &format!(
                "{:TYPE_LABEL_WIDTH$} {bar:HISTOGRAM_WIDTH$} {count}",
                trim_label(event_type, TYPE_LABEL_WIDTH)
            ),
            width,
        ));
    }

    if !stats.recent_sessions.is_empty() && lines.len() < height {
        lines.push(fit_width("RECENT SESSIONS", width));
        for session in &stats.recent_sessions {
            if lines.len() >= height {
                break;
            }
            let mut line = format!(
                "{} {} events:{}",
                session.started_at.format("%m-%d %H:%M"),
                trim_label(&session.id, 16),
                session.event_count
            );
            if session.ended_at.is_none() {
                line.push_str(" (active)");
            }
            lines.push(fit_width(&line, width));
        }
    }

    lines.truncate(height);
    lines
}

fn trim_label(label: &str, max_len: usize) -> String {
    label.chars().take(max_len).collect()
}

fn fit_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_owned()
    } else {
        value.chars().take(width).collect()
    }
}
