//! Document variant identification
//!
//! A payload is matched against the variant table of one snapshot by key
//! path presence, then confirmed by the literal `code` inside the body.

use serde_json::Value;

use crate::document::DocumentVariant;
use crate::error::{Result, SchemaError};
use crate::registry::{DocumentEntry, RegistrySnapshot, SchemaRegistry};

impl RegistrySnapshot {
    /// Identify the document variant a payload belongs to
    pub fn identify(&self, payload: &Value) -> Result<DocumentVariant> {
        self.identify_entry(payload).map(|entry| entry.variant.clone())
    }

    /// Identify the registered document a payload belongs to
    pub(crate) fn identify_entry(&self, payload: &Value) -> Result<&DocumentEntry> {
        let candidates: Vec<&DocumentEntry> = self
            .documents()
            .iter()
            .filter(|entry| lookup(payload, &entry.variant.key_path).is_some())
            .collect();

        let entry = match candidates.as_slice() {
            [] => {
                return Err(SchemaError::unidentified(
                    self.version().label(),
                    "no known document key path present in payload",
                ))
            }
            [entry] => *entry,
            several => {
                let names: Vec<String> = several.iter().map(|e| e.variant.dotted_path()).collect();
                return Err(SchemaError::unidentified(
                    self.version().label(),
                    format!("several document key paths present: {}", names.join(", ")),
                ));
            }
        };

        let variant = &entry.variant;
        let field = self.discriminant_field();
        let body = lookup(payload, &variant.key_path)
            .and_then(Value::as_object)
            .ok_or_else(|| {
                SchemaError::unidentified(
                    self.version().label(),
                    format!("'{}' is not an object", variant.dotted_path()),
                )
            })?;

        let code = match body.get(field) {
            None => {
                return Err(SchemaError::unidentified(
                    self.version().label(),
                    format!("'{}' carries no '{}'", variant.dotted_path(), field),
                ))
            }
            Some(value) => value.as_i64().ok_or_else(|| {
                SchemaError::unidentified(
                    self.version().label(),
                    format!("'{}.{}' is not an integer: {}", variant.dotted_path(), field, value),
                )
            })?,
        };

        if code != variant.code {
            let owner = self
                .variants()
                .find(|v| v.code == code)
                .map(|v| format!(" (code of '{}')", v.name))
                .unwrap_or_default();
            return Err(SchemaError::unidentified(
                self.version().label(),
                format!(
                    "'{}' expects {} {}, got {}{}",
                    variant.dotted_path(),
                    field,
                    variant.code,
                    code,
                    owner
                ),
            ));
        }

        tracing::debug!(version = %self.version(), variant = %variant, "document identified");
        Ok(entry)
    }
}

impl SchemaRegistry {
    /// Identify the document variant of a payload under a version
    pub fn identify(&self, version: &str, payload: &Value) -> Result<DocumentVariant> {
        self.select_snapshot(version)?.identify(payload)
    }
}

fn lookup<'a>(payload: &'a Value, key_path: &[String]) -> Option<&'a Value> {
    key_path
        .iter()
        .try_fold(payload, |value, key| value.as_object()?.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaSource;
    use serde_json::json;

    fn source(name: &str, code: i64) -> SchemaSource {
        SchemaSource::new(
            format!("{}.schema.json", name),
            json!({"properties": {name: {
                "type": "object",
                "properties": {"code": {"type": "integer", "enum": [code]}}
            }}}),
        )
    }

    fn registry() -> SchemaRegistry {
        SchemaRegistry::builder()
            .add_version(
                "1.0",
                vec![source("openShift", 2), source("closeShift", 5), source("closeArchive", 6)],
            )
            .build()
            .unwrap()
    }

    fn reason(err: SchemaError) -> String {
        match err {
            SchemaError::AmbiguousOrUnknownDocument { reason, .. } => reason,
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_identify_by_key_path_and_code() {
        let variant = registry()
            .identify("1.0", &json!({"closeShift": {"code": 5, "shiftNumber": 3}}))
            .unwrap();
        assert_eq!(variant.name, "closeShift");
        assert_eq!(variant.code, 5);
    }

    #[test]
    fn test_wrong_code_names_its_owner() {
        let err = registry()
            .identify("1.0", &json!({"closeShift": {"code": 6}}))
            .unwrap_err();
        let reason = reason(err);
        assert!(reason.contains("expects code 5, got 6"));
        assert!(reason.contains("closeArchive"));
    }

    #[test]
    fn test_zero_or_several_candidates() {
        let registry = registry();
        let none = reason(registry.identify("1.0", &json!({"receipt": {"code": 3}})).unwrap_err());
        assert!(none.contains("no known document"));

        let several = reason(
            registry
                .identify("1.0", &json!({"openShift": {"code": 2}, "closeShift": {"code": 5}}))
                .unwrap_err(),
        );
        assert!(several.contains("closeShift"));
        assert!(several.contains("openShift"));
    }

    #[test]
    fn test_malformed_discriminant() {
        let registry = registry();
        assert!(reason(registry.identify("1.0", &json!({"closeShift": {}})).unwrap_err())
            .contains("carries no 'code'"));
        assert!(reason(registry.identify("1.0", &json!({"closeShift": {"code": "5"}})).unwrap_err())
            .contains("is not an integer"));
        assert!(reason(registry.identify("1.0", &json!({"closeShift": {"code": 5.0}})).unwrap_err())
            .contains("is not an integer"));
        assert!(reason(registry.identify("1.0", &json!({"closeShift": [5]})).unwrap_err())
            .contains("is not an object"));
        assert!(reason(registry.identify("1.0", &json!("closeShift")).unwrap_err())
            .contains("no known document"));
    }

    #[test]
    fn test_identified_entry_is_the_registered_document() {
        let registry = registry();
        let snapshot = registry.select_snapshot("1.0").unwrap();
        let entry = snapshot
            .identify_entry(&json!({"closeArchive": {"code": 6}}))
            .unwrap();
        let registered = snapshot.document("closeArchive").unwrap();
        assert_eq!(entry.variant, registered.variant);
        assert!(std::sync::Arc::ptr_eq(&entry.root, &registered.root));
    }

    #[test]
    fn test_unsupported_version() {
        assert!(matches!(
            registry().identify("9.9", &json!({"closeShift": {"code": 5}})),
            Err(SchemaError::UnsupportedVersion { .. })
        ));
    }
}
