//! Validation results and reports
//!
//! [`ValidationResult`] is the raw outcome of checking one payload;
//! [`summarize`] turns it into a [`ValidationReport`] with a status, counts
//! per constraint kind and a printable summary.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::document::DocumentVariant;
use crate::violation::{ConstraintKind, ValidationViolation};

/// Outcome of validating one payload against one schema version
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Label of the schema version used
    pub version: String,
    /// Identified document variant; `None` when identification failed
    pub variant: Option<DocumentVariant>,
    /// Violations in schema-declared order
    pub violations: Vec<ValidationViolation>,
    /// Advisory format version carried by the payload, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_format_version: Option<Value>,
    /// SHA-256 of the serialized payload, hex encoded
    pub payload_digest: String,
}

impl ValidationResult {
    /// True when the payload was identified and has no violations
    pub fn is_valid(&self) -> bool {
        self.variant.is_some() && self.violations.is_empty()
    }
}

/// Compute the hex SHA-256 digest of a payload's compact JSON form
pub fn payload_digest(payload: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Overall report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Valid,
    Invalid,
    /// The payload matched no document variant
    Unidentified,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportStatus::Valid => write!(f, "valid"),
            ReportStatus::Invalid => write!(f, "invalid"),
            ReportStatus::Unidentified => write!(f, "unidentified"),
        }
    }
}

/// Presentation of a validation result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid: bool,
    pub status: ReportStatus,
    /// Document type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Document code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    /// Official title of the document kind, when the code is a known one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
    pub violations: Vec<ValidationViolation>,
    /// Number of violations per constraint kind
    pub counts: BTreeMap<ConstraintKind, usize>,
    /// One-line summary message
    pub summary: String,
    pub payload_digest: String,
}

/// Build a report from a validation result
pub fn summarize(result: &ValidationResult) -> ValidationReport {
    let status = if result.variant.is_none() {
        ReportStatus::Unidentified
    } else if result.violations.is_empty() {
        ReportStatus::Valid
    } else {
        ReportStatus::Invalid
    };

    let mut counts = BTreeMap::new();
    for violation in &result.violations {
        *counts.entry(violation.constraint_kind).or_insert(0) += 1;
    }

    let subject = match &result.variant {
        Some(variant) => format!("Document {}", variant),
        None => "Document".to_string(),
    };
    let summary = match status {
        ReportStatus::Valid => format!("{} is valid against schema {}", subject, result.version),
        ReportStatus::Invalid => format!(
            "{} has {} violation(s) against schema {}",
            subject,
            result.violations.len(),
            result.version
        ),
        ReportStatus::Unidentified => format!(
            "Document could not be identified against schema {}",
            result.version
        ),
    };

    ValidationReport {
        valid: status == ReportStatus::Valid,
        status,
        document: result.variant.as_ref().map(|v| v.name.clone()),
        code: result.variant.as_ref().map(|v| v.code),
        description: result
            .variant
            .as_ref()
            .and_then(|v| v.kind())
            .map(|kind| kind.description().to_string()),
        version: result.version.clone(),
        violations: result.violations.clone(),
        counts,
        summary,
        payload_digest: result.payload_digest.clone(),
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary)?;
        if let Some(description) = &self.description {
            write!(f, " ({})", description)?;
        }
        writeln!(f)?;

        if !self.counts.is_empty() {
            let counts: Vec<String> = self
                .counts
                .iter()
                .map(|(kind, count)| format!("{}: {}", kind, count))
                .collect();
            writeln!(f, "  {}", counts.join(", "))?;
        }
        for violation in &self.violations {
            writeln!(f, "  - {}", violation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::FieldPath;
    use serde_json::json;

    fn result(violations: Vec<ValidationViolation>) -> ValidationResult {
        let payload = json!({"closeShift": {"code": 5}});
        ValidationResult {
            version: "1.0".to_string(),
            variant: Some(DocumentVariant::new("closeShift", vec!["closeShift".into()], 5)),
            violations,
            declared_format_version: None,
            payload_digest: payload_digest(&payload),
        }
    }

    fn missing(field: &str) -> ValidationViolation {
        ValidationViolation::new(
            FieldPath::from_keys(["closeShift", field]),
            ConstraintKind::MissingRequired,
            "field present",
        )
    }

    #[test]
    fn test_valid_report() {
        let report = summarize(&result(vec![]));
        assert!(report.valid);
        assert_eq!(report.status, ReportStatus::Valid);
        assert_eq!(report.summary, "Document closeShift(5) is valid against schema 1.0");
        assert_eq!(report.description.as_deref(), Some("Отчёт о закрытии смены"));
        assert!(report.counts.is_empty());
    }

    #[test]
    fn test_invalid_report_counts_and_display() {
        let violation = ValidationViolation::new(
            FieldPath::from_keys(["closeShift", "receiptsQuantity"]),
            ConstraintKind::OutOfRange,
            "[0,4294967295]",
        )
        .with_actual(json!(-1));
        let report = summarize(&result(vec![missing("shiftNumber"), missing("user"), violation]));

        assert!(!report.valid);
        assert_eq!(report.status, ReportStatus::Invalid);
        assert_eq!(report.counts[&ConstraintKind::MissingRequired], 2);
        assert_eq!(report.counts[&ConstraintKind::OutOfRange], 1);

        let text = report.to_string();
        assert!(text.starts_with("Document closeShift(5) has 3 violation(s) against schema 1.0"));
        assert!(text.contains("MissingRequired: 2, OutOfRange: 1"));
        assert!(text.contains("  - [OutOfRange] /closeShift/receiptsQuantity: expected [0,4294967295], got -1"));
    }

    #[test]
    fn test_unidentified_report_is_not_valid() {
        let mut unidentified = result(vec![]);
        unidentified.variant = None;
        let report = summarize(&unidentified);
        assert!(!report.valid);
        assert_eq!(report.status, ReportStatus::Unidentified);
        assert!(report.document.is_none());
    }

    #[test]
    fn test_report_serialization() {
        let report = summarize(&result(vec![missing("shiftNumber")]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "invalid");
        assert_eq!(json["document"], "closeShift");
        assert_eq!(json["counts"]["MissingRequired"], 1);
        assert_eq!(json["violations"][0]["fieldPath"], json!(["closeShift", "shiftNumber"]));
        assert_eq!(json["violations"][0]["constraintKind"], "MissingRequired");
        assert!(json["violations"][0].get("actual").is_none());
        assert_eq!(json["payloadDigest"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn test_digest_is_stable() {
        let a = payload_digest(&json!({"closeShift": {"code": 5}}));
        let b = payload_digest(&json!({"closeShift": {"code": 5}}));
        let c = payload_digest(&json!({"closeShift": {"code": 6}}));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
