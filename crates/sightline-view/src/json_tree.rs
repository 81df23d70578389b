//! Collapsible structural tree over an arbitrary nested value.
//!
//! Every node is keyed by a structural path (`$`, then `.key` / `[index]`
//! per descent) and the view tracks which paths are collapsed. The
//! underlying value is never modified: long string leaves are truncated
//! for display only, with the original reachable via [`full_string_at`].

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;

use sightline_core::config::JsonTreeConfig;

/// One row of the rendered tree, depth-first order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonTreeRow {
    pub path: String,
    pub depth: usize,
    /// Key or `[index]` under the parent; empty at the root.
    pub label: String,
    pub display: String,
    /// Non-empty composites only; empty `{}`/`[]` render atomically.
    pub collapsible: bool,
    pub collapsed: bool,
    /// Display was shortened; the full value is still intact.
    pub truncated: bool,
}

/// Per-view-instance collapse state. Created empty, persists across
/// re-renders of the same instance, dropped with the view.
#[derive(Debug, Clone, Default)]
pub struct JsonTreeView {
    collapsed: BTreeSet<String>,
    string_truncate_chars: usize,
}

impl JsonTreeView {
    #[must_use]
    pub fn new(config: &JsonTreeConfig) -> Self {
        Self {
            collapsed: BTreeSet::new(),
            string_truncate_chars: config.string_truncate_chars.max(2),
        }
    }

    /// Flip one path's collapse state; all other paths keep theirs.
    pub fn toggle(&mut self, path: &str) {
        if !self.collapsed.remove(path) {
            self.collapsed.insert(path.to_owned());
        }
    }

    #[must_use]
    pub fn is_collapsed(&self, path: &str) -> bool {
        self.collapsed.contains(path)
    }

    /// Project the value as rows. Pure with respect to `value`; the same
    /// view renders consistently until toggled.
    #[must_use]
    pub fn render(&self, value: &Value) -> Vec<JsonTreeRow> {
        let mut rows = Vec::new();
        self.walk(value, "$", 0, "", &mut rows);
        rows
    }

    fn walk(&self, value: &Value, path: &str, depth: usize, label: &str, out: &mut Vec<JsonTreeRow>) {
        match value {
            Value::Object(map) if map.is_empty() => {
                out.push(leaf_row(path, depth, label, "{}".to_owned(), false));
            }
            Value::Array(items) if items.is_empty() => {
                out.push(leaf_row(path, depth, label, "[]".to_owned(), false));
            }
            Value::Object(map) => {
                let collapsed = self.is_collapsed(path);
                out.push(JsonTreeRow {
                    path: path.to_owned(),
                    depth,
                    label: label.to_owned(),
                    display: format!("{{{} keys}}", map.len()),
                    collapsible: true,
                    collapsed,
                    truncated: false,
                });
                if !collapsed {
                    for (key, child) in map {
                        let child_path = format!("{path}.{key}");
                        self.walk(child, &child_path, depth + 1, key, out);
                    }
                }
            }
            Value::Array(items) => {
                let collapsed = self.is_collapsed(path);
                out.push(JsonTreeRow {
                    path: path.to_owned(),
                    depth,
                    label: label.to_owned(),
                    display: format!("[{} items]", items.len()),
                    collapsible: true,
                    collapsed,
                    truncated: false,
                });
                if !collapsed {
                    for (index, child) in items.iter().enumerate() {
                        let child_path = format!("{path}[{index}]");
                        self.walk(child, &child_path, depth + 1, &format!("[{index}]"), out);
                    }
                }
            }
            Value::String(text) => {
                let (display, truncated) = self.string_display(text);
                out.push(JsonTreeRow {
                    path: path.to_owned(),
                    depth,
                    label: label.to_owned(),
                    display,
                    collapsible: false,
                    collapsed: false,
                    truncated,
                });
            }
            Value::Number(number) => {
                out.push(leaf_row(path, depth, label, number.to_string(), false));
            }
            Value::Bool(flag) => {
                out.push(leaf_row(path, depth, label, flag.to_string(), false));
            }
            Value::Null => {
                out.push(leaf_row(path, depth, label, "null".to_owned(), false));
            }
        }
    }

    fn string_display(&self, text: &str) -> (String, bool) {
        let chars = text.chars().count();
        if chars <= self.string_truncate_chars {
            return (format!("\"{text}\""), false);
        }
        let head = text
            .chars()
            .take(self.string_truncate_chars.saturating_sub(1))
            .collect::<String>();
        (format!("\"{head}…\""), true)
    }
}

fn leaf_row(path: &str, depth: usize, label: &str, display: String, truncated: bool) -> JsonTreeRow {
    JsonTreeRow {
        path: path.to_owned(),
        depth,
        label: label.to_owned(),
        display,
        collapsible: false,
        collapsed: false,
        truncated,
    }
}

/// Resolve a structural path back to the value it names.
#[must_use]
pub fn value_at<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut rest = path.strip_prefix('$')?;
    let mut current = value;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('.') {
            let end = after
                .find(|c| c == '.' || c == '[')
                .unwrap_or(after.len());
            current = current.get(&after[..end])?;
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']')?;
            let index: usize = after[..end].parse().ok()?;
            current = current.get(index)?;
            rest = &after[end + 1..];
        } else {
            return None;
        }
    }
    Some(current)
}

/// Copy affordance for truncated string leaves: the untruncated original.
#[must_use]
pub fn full_string_at<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    value_at(value, path)?.as_str()
}

/// Indented text rendering with `[+]`/`[-]` affordance markers.
#[must_use]
pub fn render_json_tree_lines(view: &JsonTreeView, value: &Value, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    view.render(value)
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            let marker = if row.collapsible {
                if row.collapsed {
                    "[+] "
                } else {
                    "[-] "
                }
            } else {
                ""
            };
            let line = if row.label.is_empty() {
                format!("{indent}{marker}{}", row.display)
            } else {
                format!("{indent}{marker}{}: {}", row.label, row.display)
            };
            fit_width(&line, width)
        })
        .collect()
}

fn fit_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_owned()
    } else {
        value.chars().take(width).collect()
    }
}
