//! Constraint validation engine
//!
//! Walks a resolved [`SchemaNode`] tree alongside a JSON payload and
//! collects every constraint failure. Data problems are never errors: the
//! walk always visits every declared field and array element, and emits
//! violations in schema-declared order.
//!
//! Per node kind:
//!
//! | Kind      | Checks (in order)                                          |
//! |-----------|------------------------------------------------------------|
//! | object    | type, required fields, then each present declared property |
//! | array     | type, min/max items, uniqueness, then every element        |
//! | integer   | type, then range, else enum                                |
//! | number    | type, then range, else enum                                |
//! | string    | type, length, pattern, enum                                |
//! | boolean   | type, enum                                                 |
//! | enum      | membership                                                 |
//! | any       | nothing                                                    |

pub(crate) mod rules;

use serde_json::Value;

use crate::node::{NodeKind, SchemaNode};
use crate::violation::{FieldPath, ValidationViolation};
use rules::{bounds, enum_check, pattern, required, type_check, unique};

/// Validate a payload value against a resolved schema node.
///
/// `path` is the location of `payload` within the whole document and
/// prefixes every reported field path.
///
/// # Example
///
/// ```rust
/// use fiscal_schema_core::{validate, ConstraintKind, FieldPath, NodeKind, SchemaNode};
/// use serde_json::json;
///
/// let schema = SchemaNode::new(NodeKind::Integer);
/// let violations = validate(&schema, &json!("five"), &FieldPath::root());
/// assert_eq!(violations[0].constraint_kind, ConstraintKind::TypeMismatch);
/// ```
pub fn validate(schema: &SchemaNode, payload: &Value, path: &FieldPath) -> Vec<ValidationViolation> {
    let mut walker = Walker {
        path: path.clone(),
        violations: Vec::new(),
    };
    walker.visit(schema, payload);
    walker.violations
}

struct Walker {
    path: FieldPath,
    violations: Vec<ValidationViolation>,
}

impl Walker {
    fn visit(&mut self, node: &SchemaNode, value: &Value) {
        if !type_check::check(node.kind, value, &self.path, &mut self.violations) {
            return;
        }

        match (node.kind, value) {
            (NodeKind::Object, Value::Object(object)) => {
                required::check(node, object, &self.path, &mut self.violations);
                for (key, child) in &node.properties {
                    if let Some(field) = object.get(key) {
                        self.path.push_key(key.as_str());
                        self.visit(child, field);
                        self.path.pop();
                    }
                }
            }
            (NodeKind::Array, Value::Array(items)) => {
                unique::check_cardinality(node, items, value, &self.path, &mut self.violations);
                unique::check_duplicates(node, items, &self.path, &mut self.violations);
                if let Some(item_schema) = &node.items {
                    for (index, item) in items.iter().enumerate() {
                        self.path.push_index(index);
                        self.visit(item_schema, item);
                        self.path.pop();
                    }
                }
            }
            (NodeKind::Integer | NodeKind::Number, _) => {
                if bounds::check(node, value, &self.path, &mut self.violations) {
                    enum_check::check(node, value, &self.path, &mut self.violations);
                }
            }
            (NodeKind::String, Value::String(text)) => {
                pattern::check(node, text, value, &self.path, &mut self.violations);
                enum_check::check(node, value, &self.path, &mut self.violations);
            }
            (NodeKind::Boolean | NodeKind::Enum, _) => {
                enum_check::check(node, value, &self.path, &mut self.violations);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NumericRange;
    use crate::violation::ConstraintKind;
    use serde_json::json;
    use std::sync::Arc;

    fn close_shift() -> SchemaNode {
        let mut quantity = SchemaNode::new(NodeKind::Integer);
        quantity.range = Some(NumericRange::inclusive(0, 4_294_967_295));
        let quantity = Arc::new(quantity);

        let mut code = SchemaNode::new(NodeKind::Integer);
        code.enum_values = Some(vec![json!(5)]);

        let mut codes = SchemaNode::new(NodeKind::Array);
        codes.items = Some(Arc::clone(&quantity));
        codes.unique_items = true;

        let mut body = SchemaNode::new(NodeKind::Object);
        body.properties = vec![
            ("code".to_string(), Arc::new(code)),
            ("shiftNumber".to_string(), Arc::clone(&quantity)),
            ("receiptsQuantity".to_string(), Arc::clone(&quantity)),
            ("codes".to_string(), Arc::new(codes)),
        ];
        body.required_fields = vec!["code".into(), "shiftNumber".into(), "receiptsQuantity".into()];

        let mut root = SchemaNode::new(NodeKind::Object);
        root.properties = vec![("closeShift".to_string(), Arc::new(body))];
        root.required_fields = vec!["closeShift".into()];
        root
    }

    #[test]
    fn test_valid_payload_has_no_violations() {
        let payload = json!({"closeShift": {"code": 5, "shiftNumber": 1, "receiptsQuantity": 10}});
        assert!(validate(&close_shift(), &payload, &FieldPath::root()).is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let payload = json!({"closeShift": {"code": 5, "shiftNumber": 1, "receiptsQuantity": 0, "extra": true}, "x": 1});
        assert!(validate(&close_shift(), &payload, &FieldPath::root()).is_empty());
    }

    #[test]
    fn test_all_violations_in_declared_order() {
        let payload = json!({"closeShift": {
            "codes": [1, "two", 1],
            "receiptsQuantity": -1,
            "code": 6
        }});
        let violations = validate(&close_shift(), &payload, &FieldPath::root());
        let found: Vec<(ConstraintKind, String)> = violations
            .iter()
            .map(|v| (v.constraint_kind, v.field_path.to_pointer()))
            .collect();
        assert_eq!(
            found,
            vec![
                (ConstraintKind::MissingRequired, "/closeShift/shiftNumber".to_string()),
                (ConstraintKind::NotInEnum, "/closeShift/code".to_string()),
                (ConstraintKind::OutOfRange, "/closeShift/receiptsQuantity".to_string()),
                (ConstraintKind::DuplicateItem, "/closeShift/codes/2".to_string()),
                (ConstraintKind::TypeMismatch, "/closeShift/codes/1".to_string()),
            ]
        );
    }

    #[test]
    fn test_range_and_enum_are_exclusive() {
        let mut node = SchemaNode::new(NodeKind::Integer);
        node.range = Some(NumericRange::inclusive(0, 1));
        node.enum_values = Some(vec![json!(0), json!(1)]);

        let violations = validate(&node, &json!(7), &FieldPath::root());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_kind, ConstraintKind::OutOfRange);
    }

    #[test]
    fn test_float_is_not_an_integer() {
        let payload = json!({"closeShift": {"code": 5.0, "shiftNumber": 1, "receiptsQuantity": 1}});
        let violations = validate(&close_shift(), &payload, &FieldPath::root());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].constraint_kind, ConstraintKind::TypeMismatch);
        assert_eq!(violations[0].expected, "integer");
    }

    #[test]
    fn test_wrong_root_type_stops_that_branch_only() {
        let violations = validate(&close_shift(), &json!({"closeShift": "nope"}), &FieldPath::root());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field_path, FieldPath::from_keys(["closeShift"]));
    }

    #[test]
    fn test_path_prefix_is_kept() {
        let node = SchemaNode::new(NodeKind::String);
        let prefix = FieldPath::from_keys(["document", "closeShift", "user"]);
        let violations = validate(&node, &json!(1), &prefix);
        assert_eq!(violations[0].field_path, prefix);
    }
}
