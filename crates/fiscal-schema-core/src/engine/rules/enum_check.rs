//! Allowed literal checks

use serde_json::Value;

use super::report;
use crate::node::{json_equal, SchemaNode};
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Human readable form of a literal set, e.g. `one of [0,1]`
pub(crate) fn describe(values: &[Value]) -> String {
    format!("one of {}", Value::Array(values.to_vec()))
}

/// Emit NotInEnum when the value equals none of the node's literals.
/// Numbers compare by value.
pub(crate) fn check(
    node: &SchemaNode,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    let Some(values) = &node.enum_values else {
        return;
    };
    if !values.iter().any(|allowed| json_equal(allowed, value)) {
        report(out, path, ConstraintKind::NotInEnum, describe(values), value);
    }
}
