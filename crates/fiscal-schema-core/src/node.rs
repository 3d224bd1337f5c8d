//! Resolved schema nodes
//!
//! A [`SchemaNode`] is a reference-free schema fragment. Children are held
//! behind `Arc` so that a dictionary definition referenced from many
//! documents is built once and shared by every referrer.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Kind of value a node accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Object,
    Array,
    Integer,
    Number,
    String,
    Boolean,
    /// Literal set without a declared `type`
    Enum,
    /// No type constraint at all
    Any,
}

impl NodeKind {
    /// JSON Schema `type` keyword for this kind, if it has one
    pub fn type_keyword(&self) -> Option<&'static str> {
        match self {
            NodeKind::Object => Some("object"),
            NodeKind::Array => Some("array"),
            NodeKind::Integer => Some("integer"),
            NodeKind::Number => Some("number"),
            NodeKind::String => Some("string"),
            NodeKind::Boolean => Some("boolean"),
            NodeKind::Enum | NodeKind::Any => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Enum => write!(f, "enum"),
            NodeKind::Any => write!(f, "any"),
            other => write!(f, "{}", other.type_keyword().unwrap_or("any")),
        }
    }
}

/// Numeric bounds of an integer or number node
#[derive(Debug, Clone, PartialEq)]
pub struct NumericRange {
    /// Minimum value
    pub min: Option<Number>,
    /// Maximum value
    pub max: Option<Number>,
    /// Whether min is exclusive
    pub min_exclusive: bool,
    /// Whether max is exclusive
    pub max_exclusive: bool,
}

/// Result of a range check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeCheck {
    WithinBounds,
    BelowMinimum,
    AboveMaximum,
}

impl NumericRange {
    /// Inclusive range between two integers
    pub fn inclusive(min: i64, max: i64) -> Self {
        Self {
            min: Some(Number::from(min)),
            max: Some(Number::from(max)),
            min_exclusive: false,
            max_exclusive: false,
        }
    }

    /// Check if a value is within bounds
    pub fn check(&self, value: &Number) -> RangeCheck {
        if let Some(min) = &self.min {
            let too_low = match compare_numbers(value, min) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => self.min_exclusive,
                _ => false,
            };
            if too_low {
                return RangeCheck::BelowMinimum;
            }
        }

        if let Some(max) = &self.max {
            let too_high = match compare_numbers(value, max) {
                Some(Ordering::Greater) => true,
                Some(Ordering::Equal) => self.max_exclusive,
                _ => false,
            };
            if too_high {
                return RangeCheck::AboveMaximum;
            }
        }

        RangeCheck::WithinBounds
    }

    /// Get a description of the bounds, e.g. `[0,4294967295]`
    pub fn describe(&self) -> String {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => {
                let min_bracket = if self.min_exclusive { "(" } else { "[" };
                let max_bracket = if self.max_exclusive { ")" } else { "]" };
                format!("{}{},{}{}", min_bracket, min, max, max_bracket)
            }
            (Some(min), None) => {
                if self.min_exclusive {
                    format!("> {}", min)
                } else {
                    format!(">= {}", min)
                }
            }
            (None, Some(max)) => {
                if self.max_exclusive {
                    format!("< {}", max)
                } else {
                    format!("<= {}", max)
                }
            }
            (None, None) => "unbounded".to_string(),
        }
    }
}

/// Compare two JSON numbers exactly when both are integers
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    match (as_i128(a), as_i128(b)) {
        (Some(x), Some(y)) => Some(x.cmp(&y)),
        _ => a.as_f64()?.partial_cmp(&b.as_f64()?),
    }
}

/// JSON equality with numbers compared by value, so `1` equals `1.0`
pub(crate) fn json_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Some(Ordering::Equal),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).map_or(false, |y| json_equal(x, y)))
        }
        _ => a == b,
    }
}

fn as_i128(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// A resolved, reference-free schema fragment
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub kind: NodeKind,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Declared properties, in schema order
    pub properties: Vec<(String, Arc<SchemaNode>)>,
    /// Required field names, deduplicated, in schema order
    pub required_fields: Vec<String>,
    pub range: Option<NumericRange>,
    pub enum_values: Option<Vec<Value>>,
    pub items: Option<Arc<SchemaNode>>,
    pub unique_items: bool,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Regex>,
}

impl SchemaNode {
    /// Create an unconstrained node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            title: None,
            description: None,
            properties: Vec::new(),
            required_fields: Vec::new(),
            range: None,
            enum_values: None,
            items: None,
            unique_items: false,
            min_items: None,
            max_items: None,
            min_length: None,
            max_length: None,
            pattern: None,
        }
    }

    /// Look up a declared property
    pub fn property(&self, name: &str) -> Option<&Arc<SchemaNode>> {
        self.properties
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Follow a chain of property names
    pub fn descendant(&self, path: &[&str]) -> Option<&SchemaNode> {
        let mut node = self;
        for key in path {
            node = node.property(key)?.as_ref();
        }
        Some(node)
    }

    /// Whether `name` is in the required set
    pub fn is_required(&self, name: &str) -> bool {
        self.required_fields.iter().any(|f| f == name)
    }

    /// The single integer literal this node is pinned to, if any
    pub fn integer_literal(&self) -> Option<i64> {
        if !matches!(self.kind, NodeKind::Integer | NodeKind::Enum) {
            return None;
        }
        match self.enum_values.as_deref() {
            Some([Value::Number(n)]) => n.as_i64(),
            _ => None,
        }
    }

    /// Number of nodes reachable from here, counting shared nodes per path
    pub fn node_count(&self) -> usize {
        1 + self
            .properties
            .iter()
            .map(|(_, child)| child.node_count())
            .sum::<usize>()
            + self.items.as_ref().map_or(0, |items| items.node_count())
    }

    /// Render the node back into draft-04 JSON, fully inlined
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        if let Some(keyword) = self.kind.type_keyword() {
            out.insert("type".to_string(), Value::String(keyword.to_string()));
        }
        if let Some(title) = &self.title {
            out.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &self.description {
            out.insert("description".to_string(), Value::String(description.clone()));
        }
        if !self.properties.is_empty() {
            let props: Map<String, Value> = self
                .properties
                .iter()
                .map(|(key, child)| (key.clone(), child.to_json()))
                .collect();
            out.insert("properties".to_string(), Value::Object(props));
        }
        if !self.required_fields.is_empty() {
            let required = self
                .required_fields
                .iter()
                .map(|f| Value::String(f.clone()))
                .collect();
            out.insert("required".to_string(), Value::Array(required));
        }
        if let Some(range) = &self.range {
            if let Some(min) = &range.min {
                out.insert("minimum".to_string(), Value::Number(min.clone()));
                if range.min_exclusive {
                    out.insert("exclusiveMinimum".to_string(), Value::Bool(true));
                }
            }
            if let Some(max) = &range.max {
                out.insert("maximum".to_string(), Value::Number(max.clone()));
                if range.max_exclusive {
                    out.insert("exclusiveMaximum".to_string(), Value::Bool(true));
                }
            }
        }
        if let Some(values) = &self.enum_values {
            out.insert("enum".to_string(), Value::Array(values.clone()));
        }
        if let Some(items) = &self.items {
            out.insert("items".to_string(), items.to_json());
        }
        if self.unique_items {
            out.insert("uniqueItems".to_string(), Value::Bool(true));
        }
        for (keyword, value) in [
            ("minItems", self.min_items),
            ("maxItems", self.max_items),
            ("minLength", self.min_length),
            ("maxLength", self.max_length),
        ] {
            if let Some(v) = value {
                out.insert(keyword.to_string(), Value::Number(Number::from(v as u64)));
            }
        }
        if let Some(pattern) = &self.pattern {
            out.insert("pattern".to_string(), Value::String(pattern.as_str().to_string()));
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_check_inclusive() {
        let range = NumericRange::inclusive(0, 4294967295);
        assert_eq!(range.check(&Number::from(0)), RangeCheck::WithinBounds);
        assert_eq!(range.check(&Number::from(4294967295u64)), RangeCheck::WithinBounds);
        assert_eq!(range.check(&Number::from(-1)), RangeCheck::BelowMinimum);
        assert_eq!(range.check(&Number::from(4294967296u64)), RangeCheck::AboveMaximum);
    }

    #[test]
    fn test_range_check_exclusive() {
        let range = NumericRange {
            min: Some(Number::from(0)),
            max: Some(Number::from(10)),
            min_exclusive: true,
            max_exclusive: true,
        };
        assert_eq!(range.check(&Number::from(0)), RangeCheck::BelowMinimum);
        assert_eq!(range.check(&Number::from(10)), RangeCheck::AboveMaximum);
        assert_eq!(range.check(&Number::from(5)), RangeCheck::WithinBounds);
        assert_eq!(range.describe(), "(0,10)");
    }

    #[test]
    fn test_range_is_exact_at_u64_extremes() {
        let range = NumericRange {
            min: None,
            max: Some(Number::from(u64::MAX - 1)),
            min_exclusive: false,
            max_exclusive: false,
        };
        assert_eq!(range.check(&Number::from(u64::MAX)), RangeCheck::AboveMaximum);
        assert_eq!(range.check(&Number::from(i64::MIN)), RangeCheck::WithinBounds);
    }

    #[test]
    fn test_range_describe() {
        assert_eq!(NumericRange::inclusive(0, 4294967295).describe(), "[0,4294967295]");
        let half = NumericRange {
            min: Some(Number::from(1)),
            max: None,
            min_exclusive: false,
            max_exclusive: false,
        };
        assert_eq!(half.describe(), ">= 1");
    }

    #[test]
    fn test_integer_literal() {
        let mut code = SchemaNode::new(NodeKind::Integer);
        code.enum_values = Some(vec![json!(5)]);
        assert_eq!(code.integer_literal(), Some(5));

        code.enum_values = Some(vec![json!(5), json!(6)]);
        assert_eq!(code.integer_literal(), None);

        let mut text = SchemaNode::new(NodeKind::String);
        text.enum_values = Some(vec![json!(5)]);
        assert_eq!(text.integer_literal(), None);
    }

    #[test]
    fn test_to_json_inlines_children() {
        let mut inn = SchemaNode::new(NodeKind::String);
        inn.max_length = Some(12);
        let mut root = SchemaNode::new(NodeKind::Object);
        root.properties.push(("userInn".to_string(), Arc::new(inn)));
        root.required_fields.push("userInn".to_string());

        assert_eq!(
            root.to_json(),
            json!({
                "type": "object",
                "properties": {"userInn": {"type": "string", "maxLength": 12}},
                "required": ["userInn"]
            })
        );
        assert_eq!(root.node_count(), 2);
        assert!(root.descendant(&["userInn"]).is_some());
    }
}
