//! Path resolution over `serde_json` documents.
//!
//! Paths are resolved stage by stage: every candidate node of the current
//! stage is mapped through the next segment to zero or more nodes of the
//! following stage. Array candidates are transparent, so `profile.address.state`
//! reaches into `address` whether it holds one object or a list of them.
//! Anything that does not match (a missing key, a scalar where an object was
//! expected, an index past the end) simply contributes nothing.

use crate::ast::{Path, Segment, SegmentKind};
use crate::predicate::test;
use serde_json::Value;

/// Resolves `path` against a set of context nodes, returning every matched
/// node in document order. An empty path yields the context set itself.
pub fn resolve<'v>(path: &Path, context: &[&'v Value]) -> Vec<&'v Value> {
    resolve_segments(&path.segments, context)
}

/// Resolves a slice of segments against a set of context nodes.
pub fn resolve_segments<'v>(segments: &[Segment], context: &[&'v Value]) -> Vec<&'v Value> {
    let mut current = context.to_vec();
    for segment in segments {
        if current.is_empty() {
            break;
        }
        let mut next = Vec::new();
        for node in current {
            apply_segment(segment, node, &mut next);
        }
        current = next;
    }
    current
}

fn apply_segment<'v>(segment: &Segment, node: &'v Value, output: &mut Vec<&'v Value>) {
    match node {
        Value::Array(items) => {
            for item in items {
                apply_segment(segment, item, output);
            }
        }
        Value::Object(map) => {
            let Some(field) = map.get(&segment.name) else {
                return;
            };
            match (&segment.kind, field) {
                (SegmentKind::Plain, _) => output.push(field),
                (SegmentKind::Expand, Value::Array(items)) => output.extend(items.iter()),
                (SegmentKind::Index(n), Value::Array(items)) => output.extend(items.get(*n)),
                (SegmentKind::Filter(predicate), Value::Array(items)) => {
                    output.extend(items.iter().filter(|item| test(predicate, item)))
                }
                // Bracketed segments on non-array fields drop the branch.
                _ => {}
            }
        }
        _ => {}
    }
}

/// Walks `segments` from `node` with the same rules as [`resolve`], calling
/// `visit` with mutable access to every reached node.
///
/// Predicate segments are tested against each element before descending into
/// it, so `visit` never observes a node whose selection depended on its own
/// mutation.
pub fn for_each_mut(segments: &[Segment], node: &mut Value, visit: &mut dyn FnMut(&mut Value)) {
    let Some((segment, rest)) = segments.split_first() else {
        visit(node);
        return;
    };
    match node {
        Value::Array(items) => {
            for item in items.iter_mut() {
                for_each_mut(segments, item, visit);
            }
        }
        Value::Object(map) => {
            let Some(field) = map.get_mut(&segment.name) else {
                return;
            };
            match &segment.kind {
                SegmentKind::Plain => for_each_mut(rest, field, visit),
                SegmentKind::Expand => {
                    if let Value::Array(items) = field {
                        for item in items.iter_mut() {
                            for_each_mut(rest, item, visit);
                        }
                    }
                }
                SegmentKind::Index(n) => {
                    if let Some(item) = field.as_array_mut().and_then(|items| items.get_mut(*n)) {
                        for_each_mut(rest, item, visit);
                    }
                }
                SegmentKind::Filter(predicate) => {
                    if let Value::Array(items) = field {
                        for item in items.iter_mut() {
                            if test(predicate, item) {
                                for_each_mut(rest, item, visit);
                            }
                        }
                    }
                }
            }
        }
        _ => {}
    }
}
