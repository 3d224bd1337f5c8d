//! Array cardinality and uniqueness checks

use serde_json::Value;

use super::report;
use crate::node::{json_equal, SchemaNode};
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Emit TooFewItems / TooManyItems for an array value
pub(crate) fn check_cardinality(
    node: &SchemaNode,
    items: &[Value],
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    if let Some(min) = node.min_items {
        if items.len() < min {
            report(out, path, ConstraintKind::TooFewItems, format!("at least {} items", min), value);
        }
    }
    if let Some(max) = node.max_items {
        if items.len() > max {
            report(out, path, ConstraintKind::TooManyItems, format!("at most {} items", max), value);
        }
    }
}

/// Emit one DuplicateItem per element equal to an earlier element.
/// Numbers compare by value.
pub(crate) fn check_duplicates(
    node: &SchemaNode,
    items: &[Value],
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    if !node.unique_items {
        return;
    }
    for (index, item) in items.iter().enumerate() {
        if let Some(first) = items[..index].iter().position(|earlier| json_equal(earlier, item)) {
            let mut at = path.clone();
            at.push_index(index);
            report(
                out,
                &at,
                ConstraintKind::DuplicateItem,
                format!("unique item (same as index {})", first),
                item,
            );
        }
    }
}
