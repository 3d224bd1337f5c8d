//! Numeric range checks

use serde_json::Value;

use super::report;
use crate::node::{RangeCheck, SchemaNode};
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Emit OutOfRange when a number falls outside the node's range.
///
/// Returns true when the value is within bounds (or the node has none), so
/// the caller can decide whether the enum check still applies.
pub(crate) fn check(
    node: &SchemaNode,
    value: &Value,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) -> bool {
    let (Some(range), Value::Number(number)) = (&node.range, value) else {
        return true;
    };

    match range.check(number) {
        RangeCheck::WithinBounds => true,
        RangeCheck::BelowMinimum | RangeCheck::AboveMaximum => {
            report(out, path, ConstraintKind::OutOfRange, range.describe(), value);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, NumericRange};
    use serde_json::json;

    fn uint32() -> SchemaNode {
        let mut node = SchemaNode::new(NodeKind::Integer);
        node.range = Some(NumericRange::inclusive(0, 4_294_967_295));
        node
    }

    #[test]
    fn test_out_of_range_reports_interval() {
        let mut out = Vec::new();
        let path = FieldPath::from_keys(["closeShift", "receiptsQuantity"]);
        assert!(!check(&uint32(), &json!(-1), &path, &mut out));
        assert_eq!(out[0].constraint_kind, ConstraintKind::OutOfRange);
        assert_eq!(out[0].expected, "[0,4294967295]");
        assert_eq!(out[0].actual, Some(json!(-1)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let mut out = Vec::new();
        assert!(check(&uint32(), &json!(0), &FieldPath::root(), &mut out));
        assert!(check(&uint32(), &json!(4_294_967_295u64), &FieldPath::root(), &mut out));
        assert!(!check(&uint32(), &json!(4_294_967_296u64), &FieldPath::root(), &mut out));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_no_range_passes() {
        let mut out = Vec::new();
        let node = SchemaNode::new(NodeKind::Integer);
        assert!(check(&node, &json!(i64::MIN), &FieldPath::root(), &mut out));
        assert!(out.is_empty());
    }
}
