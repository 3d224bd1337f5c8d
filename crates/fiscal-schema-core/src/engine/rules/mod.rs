//! Constraint rules
//!
//! Each rule inspects one keyword family of a [`SchemaNode`](crate::SchemaNode) against a
//! payload value and appends violations to the caller's buffer. Rules never
//! stop the traversal and never fail.

pub(crate) mod bounds;
pub(crate) mod enum_check;
pub(crate) mod pattern;
pub(crate) mod required;
pub(crate) mod type_check;
pub(crate) mod unique;

use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};
use serde_json::Value;

/// Record a violation that carries the offending value
pub(crate) fn report(
    out: &mut Vec<ValidationViolation>,
    path: &FieldPath,
    kind: ConstraintKind,
    expected: impl Into<String>,
    actual: &Value,
) {
    out.push(ValidationViolation::new(path.clone(), kind, expected).with_actual(actual.clone()));
}
