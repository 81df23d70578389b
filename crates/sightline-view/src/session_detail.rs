//! Composed session trace view: the span forest rendered as indented,
//! collapsible lines with per-node previews.

use std::collections::BTreeSet;

use sightline_core::config::ViewConfig;

use crate::preview::event_preview;
use crate::span_tree::{SpanForest, SpanNode};

/// Per-instance collapse state for a session trace. Paths are the span
/// forest's identity paths, so state survives re-renders while the
/// session keeps growing.
#[derive(Debug, Clone, Default)]
pub struct SessionDetailView {
    collapsed: BTreeSet<String>,
}

impl SessionDetailView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, path: &str) {
        if !self.collapsed.remove(path) {
            self.collapsed.insert(path.to_owned());
        }
    }

    #[must_use]
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// Project the forest to lines. Collapsed subtrees show how many
    /// descendants they hide.
    #[must_use]
    pub fn render(&self, forest: &SpanForest, config: &ViewConfig, width: usize) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }
        let mut lines = vec![fit_width(
            &format!(
                "SESSION TRACE events:{} roots:{}",
                forest.node_count,
                forest.roots.len()
            ),
            width,
        )];
        if forest.cycle_breaks > 0 {
            lines.push(fit_width(
                &format!("({} malformed parent links ignored)", forest.cycle_breaks),
                width,
            ));
        }
        if forest.roots.is_empty() {
            lines.push(fit_width("no events yet", width));
            return lines;
        }
        for root in &forest.roots {
            self.walk(root, 0, "", config, width, &mut lines);
        }
        lines
    }

    fn walk(
        &self,
        node: &SpanNode,
        depth: usize,
        prefix: &str,
        config: &ViewConfig,
        width: usize,
        lines: &mut Vec<String>,
    ) {
        let path = if prefix.is_empty() {
            node.event.id.clone()
        } else {
            format!("{prefix}/{}", node.event.id)
        };
        let collapsed = self.is_collapsed(&path);

        let marker = if node.children.is_empty() {
            "   "
        } else if collapsed {
            "[+]"
        } else {
            "[-]"
        };
        let mut line = format!(
            "{}{} {} {}",
            "  ".repeat(depth),
            marker,
            node.event.timestamp.format("%H:%M:%S"),
            node.event.label()
        );
        if let Some(duration) = node.event.duration_ms {
            if duration >= 0 {
                line.push_str(&format!(" ({duration}ms)"));
            }
        }
        let preview = event_preview(&node.event, &config.preview);
        if !preview.is_empty() {
            line.push_str("  ");
            line.push_str(&preview);
        }
        if collapsed {
            line.push_str(&format!("  (+{} hidden)", node.descendant_count()));
        }
        lines.push(fit_width(&line, width));

        if !collapsed {
            for child in &node.children {
                self.walk(child, depth + 1, &path, config, width, lines);
            }
        }
    }
}

fn fit_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_owned()
    } else {
        value.chars().take(width).collect()
    }
}
