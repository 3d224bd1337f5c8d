//! String length and pattern checks

use serde_json::Value;

use super::report;
use crate::node::SchemaNode;
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Emit TooShort, TooLong and PatternMismatch for a string value.
///
/// Lengths count Unicode scalar values. Patterns are unanchored, as in
/// draft-04; schemas anchor them explicitly with `^...$`.
pub(crate) fn check(
    node: &SchemaNode,
    text: &str,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    let length = text.chars().count();

    if let Some(min) = node.min_length {
        if length < min {
            report(out, path, ConstraintKind::TooShort, format!("at least {} characters", min), value);
        }
    }
    if let Some(max) = node.max_length {
        if length > max {
            report(out, path, ConstraintKind::TooLong, format!("at most {} characters", max), value);
        }
    }
    if let Some(pattern) = &node.pattern {
        if !pattern.is_match(text) {
            report(
                out,
                path,
                ConstraintKind::PatternMismatch,
                format!("match of /{}/", pattern.as_str()),
                value,
            );
        }
    }
}
