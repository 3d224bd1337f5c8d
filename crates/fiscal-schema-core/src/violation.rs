//! Validation violations and payload paths

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// One step from a JSON value into a child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // JSON Pointer escaping (RFC 6901)
            PathSegment::Key(key) => write!(f, "{}", key.replace('~', "~0").replace('/', "~1")),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Ordered keys and indices from the payload root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    /// The payload root
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Build a path from object keys only
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(|k| PathSegment::Key(k.into())).collect())
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push_key(&mut self, key: impl Into<String>) {
        self.0.push(PathSegment::Key(key.into()));
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// A copy of this path extended by one key
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push_key(key);
        path
    }

    /// JSON Pointer form, e.g. `/closeShift/shiftNumber`
    pub fn to_pointer(&self) -> String {
        self.0.iter().map(|s| format!("/{}", s)).collect()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "(root)")
        } else {
            write!(f, "{}", self.to_pointer())
        }
    }
}

/// Constraint a payload value failed to satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// A required field is absent
    MissingRequired,
    /// The value has the wrong JSON type
    TypeMismatch,
    /// A number lies outside its declared range
    OutOfRange,
    /// The value is not one of the allowed literals
    NotInEnum,
    /// An array with `uniqueItems` repeats an element
    DuplicateItem,
    /// An array is shorter than `minItems`
    TooFewItems,
    /// An array is longer than `maxItems`
    TooManyItems,
    /// A string is shorter than `minLength`
    TooShort,
    /// A string is longer than `maxLength`
    TooLong,
    /// A string does not match `pattern`
    PatternMismatch,
    /// The payload could not be matched to a document variant
    UnknownDiscriminant,
}

impl ConstraintKind {
    /// Stable identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequired => "MissingRequired",
            Self::TypeMismatch => "TypeMismatch",
            Self::OutOfRange => "OutOfRange",
            Self::NotInEnum => "NotInEnum",
            Self::DuplicateItem => "DuplicateItem",
            Self::TooFewItems => "TooFewItems",
            Self::TooManyItems => "TooManyItems",
            Self::TooShort => "TooShort",
            Self::TooLong => "TooLong",
            Self::PatternMismatch => "PatternMismatch",
            Self::UnknownDiscriminant => "UnknownDiscriminant",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One failed constraint instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationViolation {
    /// Where in the payload the constraint failed
    pub field_path: FieldPath,
    /// Which constraint failed
    pub constraint_kind: ConstraintKind,
    /// Description of the constraint, e.g. `[0,4294967295]`
    pub expected: String,
    /// Offending value; `None` when the value is absent. A JSON `null`
    /// value is `Some(Value::Null)` and survives a serde round trip.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_value"
    )]
    pub actual: Option<Value>,
}

/// A present `actual` key is a value, even when that value is `null`
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ValidationViolation {
    /// Create a new violation with no actual value
    pub fn new(field_path: FieldPath, constraint_kind: ConstraintKind, expected: impl Into<String>) -> Self {
        Self {
            field_path,
            constraint_kind,
            expected: expected.into(),
            actual: None,
        }
    }

    /// Set the actual value found
    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }
}

impl fmt::Display for ValidationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: expected {}",
            self.constraint_kind, self.field_path, self.expected
        )?;
        match &self.actual {
            Some(actual) => write!(f, ", got {}", actual),
            None => write!(f, ", got nothing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_path_pointer_and_display() {
        let mut path = FieldPath::from_keys(["closeShift", "items"]);
        path.push_index(2);
        assert_eq!(path.to_pointer(), "/closeShift/items/2");
        assert_eq!(FieldPath::root().to_string(), "(root)");
        assert_eq!(FieldPath::from_keys(["a/b"]).to_pointer(), "/a~1b");
    }

    #[test]
    fn test_path_serializes_as_mixed_array() {
        let mut path = FieldPath::from_keys(["closeShift"]);
        path.push_index(0);
        assert_eq!(serde_json::to_value(&path).unwrap(), json!(["closeShift", 0]));

        let back: FieldPath = serde_json::from_value(json!(["closeShift", 0])).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_violation_serialization() {
        let violation = ValidationViolation::new(
            FieldPath::from_keys(["closeShift", "receiptsQuantity"]),
            ConstraintKind::OutOfRange,
            "[0,4294967295]",
        )
        .with_actual(json!(-1));

        assert_eq!(
            serde_json::to_value(&violation).unwrap(),
            json!({
                "fieldPath": ["closeShift", "receiptsQuantity"],
                "constraintKind": "OutOfRange",
                "expected": "[0,4294967295]",
                "actual": -1
            })
        );
    }

    #[test]
    fn test_null_actual_round_trips() {
        let violation = ValidationViolation::new(
            FieldPath::from_keys(["closeShift", "shiftNumber"]),
            ConstraintKind::TypeMismatch,
            "integer",
        )
        .with_actual(Value::Null);

        let json = serde_json::to_value(&violation).unwrap();
        assert_eq!(json["actual"], Value::Null);
        let back: ValidationViolation = serde_json::from_value(json).unwrap();
        assert_eq!(back.actual, Some(Value::Null));
        assert_eq!(back, violation);

        let absent = ValidationViolation::new(
            FieldPath::from_keys(["closeShift", "code"]),
            ConstraintKind::MissingRequired,
            "field present",
        );
        let json = serde_json::to_value(&absent).unwrap();
        assert!(json.get("actual").is_none());
        let back: ValidationViolation = serde_json::from_value(json).unwrap();
        assert_eq!(back.actual, None);
    }

    #[test]
    fn test_violation_display() {
        let missing = ValidationViolation::new(
            FieldPath::from_keys(["closeShift", "shiftNumber"]),
            ConstraintKind::MissingRequired,
            "field present",
        );
        assert_eq!(
            missing.to_string(),
            "[MissingRequired] /closeShift/shiftNumber: expected field present, got nothing"
        );
    }
}
