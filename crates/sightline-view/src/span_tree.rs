//! Span forest construction from a flat, unordered event collection.
//!
//! Linkage is explicit: events share a `span_id` per logical unit of work
//! and point at their parent via `parent_span_id`. Construction is total:
//! malformed linkage degrades to extra roots, never to an error.

use std::collections::HashMap;

use serde::Serialize;
use sightline_core::event::TraceEvent;

/// One event wrapped as a tree node. Children are in discovery order
/// (input order of the child events), not temporal order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanNode {
    pub event: TraceEvent,
    pub children: Vec<SpanNode>,
}

impl SpanNode {
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }
}

/// A forest of span trees plus construction counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanForest {
    /// Roots in input order.
    pub roots: Vec<SpanNode>,
    /// Always equals the number of input events.
    pub node_count: usize,
    /// Parent links refused because they would have made a node its own
    /// ancestor.
    pub cycle_breaks: usize,
}

/// One node of the depth-first flattening, with its structural path.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatSpan<'a> {
    pub node: &'a SpanNode,
    pub depth: usize,
    /// Event ids joined with `/`. Identity-based, so collapse state keyed
    /// on it survives re-renders over a grown event set.
    pub path: String,
}

impl SpanForest {
    /// Depth-first traversal of all trees, roots in order.
    #[must_use]
    pub fn flatten(&self) -> Vec<FlatSpan<'_>> {
        let mut out = Vec::with_capacity(self.node_count);
        for root in &self.roots {
            flatten_into(root, 0, "", &mut out);
        }
        out
    }
}

/// Build the forest. Deterministic and total.
///
/// The canonical event for a span is the first event in input order that
/// declares that `span_id`; later events sharing the id still become
/// independent nodes. A `parent_span_id` that resolves to the node's own
/// event, to no canonical span, or to an ancestor chain that would loop
/// back to the node leaves the node a root.
#[must_use]
pub fn build_span_forest(events: &[TraceEvent]) -> SpanForest {
    let count = events.len();

    let mut canonical: HashMap<&str, usize> = HashMap::new();
    for (idx, event) in events.iter().enumerate() {
        if let Some(span_id) = event.span_id.as_deref() {
            if !span_id.is_empty() {
                canonical.entry(span_id).or_insert(idx);
            }
        }
    }

    let mut parent: Vec<Option<usize>> = vec![None; count];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut cycle_breaks = 0usize;

    for (idx, event) in events.iter().enumerate() {
        let Some(parent_span) = event.parent_span_id.as_deref() else {
            continue;
        };
        let Some(&candidate) = canonical.get(parent_span) else {
            continue;
        };
        if events[candidate].id == event.id {
            // Self-parenting.
            continue;
        }
        if would_cycle(&parent, idx, candidate) {
            cycle_breaks += 1;
            continue;
        }
        parent[idx] = Some(candidate);
        children[candidate].push(idx);
    }

    let roots = (0..count)
        .filter(|idx| parent[*idx].is_none())
        .map(|idx| assemble(idx, events, &children))
        .collect();

    SpanForest {
        roots,
        node_count: count,
        cycle_breaks,
    }
}

/// Would attaching `node` under `candidate` make `node` its own ancestor?
/// The step bound keeps the walk finite even if the parent table were ever
/// inconsistent.
fn would_cycle(parent: &[Option<usize>], node: usize, candidate: usize) -> bool {
    let mut cursor = Some(candidate);
    let mut steps = 0usize;
    while let Some(current) = cursor {
        if current == node {
            return true;
        }
        steps += 1;
        if steps > parent.len() {
            return true;
        }
        cursor = parent[current];
    }
    false
}

fn assemble(idx: usize, events: &[TraceEvent], children: &[Vec<usize>]) -> SpanNode {
    SpanNode {
        event: events[idx].clone(),
        children: children[idx]
            .iter()
            .map(|child| assemble(*child, events, children))
            .collect(),
    }
}

fn flatten_into<'a>(node: &'a SpanNode, depth: usize, prefix: &str, out: &mut Vec<FlatSpan<'a>>) {
    let path = if prefix.is_empty() {
        node.event.id.clone()
    } else {
        format!("{prefix}/{}", node.event.id)
    };
    out.push(FlatSpan {
        node,
        depth,
        path: path.clone(),
    });
    for child in &node.children {
        flatten_into(child, depth + 1, &path, out);
    }
}

#[cfg(test)]
mod tests {
    use super::{build_span_forest, SpanForest};
    use chrono::{Duration, TimeZone, Utc};
    use sightline_core::event::TraceEvent;

    fn event(id: &str, span: Option<&str>, parent: Option<&str>, offset_ms: i64) -> TraceEvent {
        let base = Utc
            .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let mut e = TraceEvent::new(id, "sess-1", "PreToolUse", base + Duration::milliseconds(offset_ms));
        e.span_id = span.map(str::to_owned);
        e.parent_span_id = parent.map(str::to_owned);
        e
    }

    fn root_ids(forest: &SpanForest) -> Vec<&str> {
        forest
            .roots
            .iter()
            .map(|root| root.event.id.as_str())
            .collect()
    }

    #[test]
    fn resolves_parent_and_leaves_dangling_as_root() {
        let events = [
            event("1", Some("a"), None, 0),
            event("2", Some("b"), Some("a"), 10),
            event("3", None, Some("missing"), 20),
        ];
        let forest = build_span_forest(&events);
        assert_eq!(root_ids(&forest), ["1", "3"]);
        assert_eq!(forest.roots[0].children.len(), 1);
        assert_eq!(forest.roots[0].children[0].event.id, "2");
        assert_eq!(forest.node_count, 3);
        assert_eq!(forest.cycle_breaks, 0);
    }

    #[test]
    fn every_event_becomes_exactly_one_node() {
        let events = [
            event("1", Some("a"), None, 0),
            event("2", Some("a"), None, 5),
            event("3", Some("b"), Some("a"), 10),
            event("4", None, None, 15),
        ];
        let forest = build_span_forest(&events);
        assert_eq!(forest.flatten().len(), events.len());
        let total: usize = forest
            .roots
            .iter()
            .map(|root| 1 + root.descendant_count())
            .sum();
        assert_eq!(total, events.len());
    }

    #[test]
    fn duplicate_span_ids_attach_to_first_declaration() {
        let events = [
            event("1", Some("a"), None, 0),
            event("2", Some("a"), None, 5),
            event("3", None, Some("a"), 10),
        ];
        let forest = build_span_forest(&events);
        // "2" shares span "a" but the canonical entry stays "1".
        assert_eq!(root_ids(&forest), ["1", "2"]);
        assert_eq!(forest.roots[0].children[0].event.id, "3");
    }

    #[test]
    fn self_parenting_event_stays_a_root() {
        let events = [event("1", Some("a"), Some("a"), 0)];
        let forest = build_span_forest(&events);
        assert_eq!(root_ids(&forest), ["1"]);
        assert!(forest.roots[0].children.is_empty());
    }

    #[test]
    fn two_hop_cycle_is_broken_not_looped() {
        let events = [
            event("1", Some("a"), Some("b"), 0),
            event("2", Some("b"), Some("a"), 10),
        ];
        let forest = build_span_forest(&events);
        assert_eq!(forest.cycle_breaks, 1);
        assert_eq!(forest.node_count, 2);
        // The refused link leaves "2" a root with "1" underneath it.
        assert_eq!(root_ids(&forest), ["2"]);
        assert_eq!(forest.roots[0].children[0].event.id, "1");
        assert_eq!(forest.flatten().len(), 2);
    }

    #[test]
    fn no_span_ids_degenerates_to_singleton_roots() {
        let events = [
            event("1", None, None, 0),
            event("2", None, None, 10),
            event("3", None, None, 20),
        ];
        let forest = build_span_forest(&events);
        assert_eq!(root_ids(&forest), ["1", "2", "3"]);
        assert!(forest.roots.iter().all(|root| root.children.is_empty()));
    }

    #[test]
    fn flatten_paths_chain_event_ids() {
        let events = [
            event("1", Some("a"), None, 0),
            event("2", Some("b"), Some("a"), 10),
            event("3", None, Some("b"), 20),
        ];
        let forest = build_span_forest(&events);
        let flat = forest.flatten();
        let paths = flat.iter().map(|f| f.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, ["1", "1/2", "1/2/3"]);
        assert_eq!(flat[2].depth, 2);
    }
}
