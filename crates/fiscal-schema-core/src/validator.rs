//! Validation facade
//!
//! [`FiscalValidator`] ties the pieces together for one payload: select the
//! version snapshot, identify the document variant, walk the resolved
//! schema and package the outcome.

use rayon::prelude::*;
use serde_json::Value;
use std::sync::Arc;

use crate::engine;
use crate::error::{Result, SchemaError};
use crate::registry::{RegistrySnapshot, SchemaRegistry};
use crate::report::{payload_digest, summarize, ValidationReport, ValidationResult};
use crate::violation::{ConstraintKind, FieldPath, ValidationViolation};

/// Validates fiscal document payloads against a shared registry
#[derive(Debug, Clone)]
pub struct FiscalValidator {
    registry: Arc<SchemaRegistry>,
}

impl FiscalValidator {
    /// Create a new validator over a built registry
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Validate one payload against a version.
    ///
    /// Fails only when the version is not supported. A payload that matches
    /// no document variant yields a result without a variant and a single
    /// `UnknownDiscriminant` violation.
    pub fn check(&self, version: &str, payload: &Value) -> Result<ValidationResult> {
        let snapshot = self.registry.select_snapshot(version)?;
        Ok(self.evaluate(&snapshot, payload))
    }

    /// Validate one payload and summarize the outcome
    pub fn report(&self, version: &str, payload: &Value) -> Result<ValidationReport> {
        self.check(version, payload).map(|result| summarize(&result))
    }

    /// Validate many payloads against one version, results in input order.
    ///
    /// Payloads run on a pool of `batch_parallelism` workers (0 counts as 1).
    pub fn check_batch(&self, version: &str, payloads: &[Value]) -> Result<Vec<ValidationResult>> {
        let snapshot = self.registry.select_snapshot(version)?;
        let snapshot: &RegistrySnapshot = &snapshot;
        let parallelism = self.registry.config().batch_parallelism.max(1);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(|index| format!("fiscal-batch-{}", index))
            .build()
            .map_err(|err| SchemaError::BatchPool {
                reason: err.to_string(),
            })?;
        let results: Vec<ValidationResult> = pool.install(|| {
            payloads
                .par_iter()
                .map(|payload| self.evaluate(snapshot, payload))
                .collect()
        });

        tracing::info!(
            version = %snapshot.version(),
            payloads = payloads.len(),
            invalid = results.iter().filter(|r| !r.is_valid()).count(),
            "batch validated"
        );
        Ok(results)
    }

    fn evaluate(&self, snapshot: &RegistrySnapshot, payload: &Value) -> ValidationResult {
        let version = snapshot.version().label().to_string();
        let digest = payload_digest(payload);

        let entry = match snapshot.identify_entry(payload) {
            Ok(entry) => entry,
            Err(err) => {
                let reason = match err {
                    SchemaError::AmbiguousOrUnknownDocument { reason, .. } => reason,
                    other => other.to_string(),
                };
                tracing::debug!(version = %version, reason = %reason, "payload not identified");
                return ValidationResult {
                    version,
                    variant: None,
                    violations: vec![ValidationViolation::new(
                        FieldPath::root(),
                        ConstraintKind::UnknownDiscriminant,
                        reason,
                    )],
                    declared_format_version: None,
                    payload_digest: digest,
                };
            }
        };
        let variant = &entry.variant;

        let format_field = &self.registry.config().format_version_field;
        let declared_format_version = variant
            .key_path
            .iter()
            .try_fold(payload, |value, key| value.get(key))
            .and_then(|body| body.get(format_field))
            .cloned();
        if let Some(declared) = &declared_format_version {
            tracing::debug!(
                version = %version,
                document = %variant,
                declared = %declared,
                "payload declares a format version"
            );
        }

        let violations = engine::validate(&entry.root, payload, &FieldPath::root());

        ValidationResult {
            version,
            variant: Some(variant.clone()),
            violations,
            declared_format_version,
            payload_digest: digest,
        }
    }
}
