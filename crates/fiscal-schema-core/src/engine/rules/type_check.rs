//! JSON type checks

use serde_json::Value;

use super::report;
use crate::node::NodeKind;
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Check if a value has the JSON type a node kind demands
pub(crate) fn matches(kind: NodeKind, value: &Value) -> bool {
    match kind {
        NodeKind::Object => value.is_object(),
        NodeKind::Array => value.is_array(),
        // 5.0 is a float, not an integer
        NodeKind::Integer => value.is_i64() || value.is_u64(),
        NodeKind::Number => value.is_number(),
        NodeKind::String => value.is_string(),
        NodeKind::Boolean => value.is_boolean(),
        NodeKind::Enum | NodeKind::Any => true,
    }
}

/// Emit a TypeMismatch and return false when the value has the wrong type
pub(crate) fn check(
    kind: NodeKind,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) -> bool {
    if matches(kind, value) {
        return true;
    }
    report(out, path, ConstraintKind::TypeMismatch, kind.to_string(), value);
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_accepts_only_json_integers() {
        assert!(matches(NodeKind::Integer, &json!(5)));
        assert!(matches(NodeKind::Integer, &json!(u64::MAX)));
        assert!(matches(NodeKind::Integer, &json!(-3)));
        assert!(!matches(NodeKind::Integer, &json!(5.0)));
        assert!(!matches(NodeKind::Integer, &json!("5")));
        assert!(matches(NodeKind::Number, &json!(5.5)));
    }

    #[test]
    fn test_mismatch_reports_kind_and_value() {
        let mut out = Vec::new();
        let path = FieldPath::from_keys(["closeShift"]);
        assert!(!check(NodeKind::Object, &json!([1]), &path, &mut out));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].constraint_kind, ConstraintKind::TypeMismatch);
        assert_eq!(out[0].expected, "object");
        assert_eq!(out[0].actual, Some(json!([1])));
    }

    #[test]
    fn test_untyped_kinds_accept_everything() {
        let mut out = Vec::new();
        assert!(check(NodeKind::Any, &json!(null), &FieldPath::root(), &mut out));
        assert!(check(NodeKind::Enum, &json!({"a": 1}), &FieldPath::root(), &mut out));
        assert!(out.is_empty());
    }
}
