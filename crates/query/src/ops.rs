//! The mutating operations behind each statement kind.
//!
//! Every operation finishes all fallible work (type checks, value
//! evaluation) before it touches the document, so a failed statement leaves
//! the document exactly as it found it.

use crate::ast::{Expression, Path, Predicate, Segment, SegmentKind};
use crate::config::NonFiniteNumbers;
use crate::error::{QueryError, type_name};
use crate::predicate::test;
use crate::resolver::for_each_mut;
use crate::value::evaluate;
use serde_json::{Map, Value};

/// Keeps the elements of an array document for which `predicate` holds.
///
/// Prune clauses inside the predicate narrow the arrays they address within
/// each element, and count as satisfied.
pub fn filter(document: &mut Value, predicate: &Predicate) -> Result<(), QueryError> {
    let items = match document {
        Value::Array(items) => items,
        other => {
            return Err(QueryError::StructuralMismatch {
                operation: "filter",
                found: type_name(other),
            });
        }
    };
    if items.is_empty() {
        return Ok(());
    }

    let before = items.len();
    let kept: Vec<Value> = std::mem::take(items)
        .into_iter()
        .filter_map(|mut item| test_and_prune(predicate, &mut item).then_some(item))
        .collect();
    log::trace!("filter kept {} of {} element(s)", kept.len(), before);
    *items = kept;
    Ok(())
}

fn test_and_prune(predicate: &Predicate, element: &mut Value) -> bool {
    match predicate {
        Predicate::And(left, right) => {
            test_and_prune(left, element) && test_and_prune(right, element)
        }
        Predicate::Or(left, right) => {
            test_and_prune(left, element) || test_and_prune(right, element)
        }
        Predicate::Group(inner) => test_and_prune(inner, element),
        Predicate::Prune(path) => {
            prune(path, element);
            true
        }
        Predicate::Comparison { .. } => test(predicate, element),
    }
}

/// Narrows every array addressed by `path` in place. The last segment decides
/// what survives: `name[n]` keeps the single element at `n` (nothing when out
/// of bounds), `name[predicate]` keeps the matching elements.
pub fn prune(path: &Path, node: &mut Value) {
    let Some((last, prefix)) = path.split_last() else {
        return;
    };
    for_each_container(prefix, node, &mut |container| narrow(last, container));
}

fn narrow(segment: &Segment, container: &mut Map<String, Value>) {
    let Some(Value::Array(items)) = container.get_mut(&segment.name) else {
        return;
    };
    match &segment.kind {
        SegmentKind::Index(n) => {
            let kept: Vec<Value> = items.drain(..).nth(*n).into_iter().collect();
            *items = kept;
        }
        // Nested prune clauses narrow the surviving elements too.
        SegmentKind::Filter(predicate) => {
            items.retain_mut(|item| test_and_prune(predicate, item))
        }
        SegmentKind::Plain | SegmentKind::Expand => {}
    }
}

/// Walks `segments` from `node` and calls `visit` on every object reached.
/// Arrays at the end of the walk are transparent, as they are when reading.
fn for_each_container(
    segments: &[Segment],
    node: &mut Value,
    visit: &mut dyn FnMut(&mut Map<String, Value>),
) {
    for_each_mut(segments, node, &mut |reached| visit_objects(reached, visit));
}

fn visit_objects(node: &mut Value, visit: &mut dyn FnMut(&mut Map<String, Value>)) {
    match node {
        Value::Object(map) => visit(map),
        Value::Array(items) => {
            for item in items.iter_mut() {
                visit_objects(item, visit);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    Overwrite,
    KeepExisting,
}

/// `map`: sets the field named by the last segment of `target` on every
/// container the rest of the path resolves to. A `null` value removes the
/// field instead.
pub fn assign(
    document: &mut Value,
    target: &Path,
    value: &Expression,
    policy: NonFiniteNumbers,
) -> Result<(), QueryError> {
    write(document, target, value, policy, WriteMode::Overwrite)
}

/// `append`: like [`assign`], but containers that already hold the field
/// are left untouched.
pub fn append(
    document: &mut Value,
    target: &Path,
    value: &Expression,
    policy: NonFiniteNumbers,
) -> Result<(), QueryError> {
    write(document, target, value, policy, WriteMode::KeepExisting)
}

fn write(
    document: &mut Value,
    target: &Path,
    value: &Expression,
    policy: NonFiniteNumbers,
    mode: WriteMode,
) -> Result<(), QueryError> {
    let Some((field, prefix)) = target.split_last() else {
        return Ok(());
    };

    // Evaluate against every instance first; `None` means "remove the field".
    let values = instances(document)
        .into_iter()
        .map(|instance| {
            let operand = evaluate(value, instance);
            if operand.is_null() {
                return Ok(None);
            }
            operand
                .into_value(policy)
                .map(Some)
                .map_err(|v| QueryError::NonFiniteNumber {
                    field: target.to_string(),
                    value: v,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut touched = 0usize;
    for (instance, value) in instances_mut(document).into_iter().zip(values) {
        for_each_container(prefix, instance, &mut |map| {
            touched += 1;
            match (&value, mode) {
                (None, WriteMode::Overwrite) => {
                    map.remove(&field.name);
                }
                (None, WriteMode::KeepExisting) => {}
                (Some(_), WriteMode::KeepExisting) if map.contains_key(&field.name) => {}
                (Some(v), _) => {
                    map.insert(field.name.clone(), v.clone());
                }
            }
        });
    }
    log::trace!("'{}' reached {} container(s)", target, touched);
    Ok(())
}

/// `rename`: moves the field named by the last segment of `source` to the
/// field named by the last segment of `target`, within every container
/// resolved from `target`'s prefix.
pub fn rename(document: &mut Value, target: &Path, source: &Path) -> Result<(), QueryError> {
    let (Some((new_field, prefix)), Some((old_field, _))) =
        (target.split_last(), source.split_last())
    else {
        return Ok(());
    };
    if new_field.name == old_field.name {
        return Ok(());
    }

    for instance in instances_mut(document) {
        for_each_container(prefix, instance, &mut |map| {
            if let Some(moved) = map.remove(&old_field.name) {
                map.insert(new_field.name.clone(), moved);
            }
        });
    }
    Ok(())
}

/// The units an assignment applies to: each element of an array document, or
/// the document itself.
fn instances(document: &Value) -> Vec<&Value> {
    match document {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn instances_mut(document: &mut Value) -> Vec<&mut Value> {
    match document {
        Value::Array(items) => items.iter_mut().collect(),
        other => vec![other],
    }
}
