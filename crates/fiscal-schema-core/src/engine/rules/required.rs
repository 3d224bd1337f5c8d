//! Required field checks

use serde_json::{Map, Value};

use crate::node::SchemaNode;
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Emit one MissingRequired per absent required field, in declared order
pub(crate) fn check(
    node: &SchemaNode,
    object: &Map<String, Value>,
    path: &FieldPath,
    out: &mut Vec<ValidationViolation>,
) {
    for field in &node.required_fields {
        if !object.contains_key(field) {
            out.push(ValidationViolation::new(
                path.child(field.as_str()),
                ConstraintKind::MissingRequired,
                "field present",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeKind;
    use serde_json::json;

    #[test]
    fn test_missing_fields_in_declared_order() {
        let mut node = SchemaNode::new(NodeKind::Object);
        node.required_fields = vec!["code".into(), "shiftNumber".into(), "user".into()];

        let payload = json!({"shiftNumber": 1});
        let mut out = Vec::new();
        check(&node, payload.as_object().unwrap(), &FieldPath::from_keys(["closeShift"]), &mut out);

        let paths: Vec<String> = out.iter().map(|v| v.field_path.to_pointer()).collect();
        assert_eq!(paths, vec!["/closeShift/code", "/closeShift/user"]);
        assert!(out.iter().all(|v| v.actual.is_none()));
    }

    #[test]
    fn test_null_counts_as_present() {
        let mut node = SchemaNode::new(NodeKind::Object);
        node.required_fields = vec!["user".into()];
        let payload = json!({"user": null});
        let mut out = Vec::new();
        check(&node, payload.as_object().unwrap(), &FieldPath::root(), &mut out);
        assert!(out.is_empty());
    }
}
