//! Version selection and cross-version comparison
//!
//! Maps a requested version identifier onto a registered snapshot and
//! compares the required-field sets of a document type between versions.

use serde::Serialize;
use std::sync::Arc;

use crate::error::{Result, SchemaError};
use crate::registry::{RegistrySnapshot, SchemaRegistry};
use crate::version::SchemaVersion;

/// Difference in required fields of one document body between two versions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSetDelta {
    /// Document type compared
    pub document: String,
    /// Version compared from
    pub from: SchemaVersion,
    /// Version compared to
    pub to: SchemaVersion,
    /// Fields required in `to` but not in `from`
    pub added: Vec<String>,
    /// Fields required in `from` but not in `to`
    pub removed: Vec<String>,
}

impl FieldSetDelta {
    /// True when `to` only tightens `from` by adding requirements
    pub fn is_additive(&self) -> bool {
        self.removed.is_empty()
    }

    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

impl SchemaRegistry {
    /// Snapshot registered for exactly this version
    pub fn select_snapshot(&self, version: &str) -> Result<Arc<RegistrySnapshot>> {
        version
            .parse::<SchemaVersion>()
            .ok()
            .and_then(|parsed| self.snapshots.get(&parsed))
            .map(Arc::clone)
            .ok_or_else(|| SchemaError::UnsupportedVersion {
                version: version.to_string(),
                supported: self.supported_versions().iter().map(|v| v.to_string()).collect(),
            })
    }

    /// Registered versions in ascending order
    pub fn supported_versions(&self) -> Vec<SchemaVersion> {
        self.snapshots.keys().cloned().collect()
    }

    /// Highest registered version
    pub fn latest(&self) -> Option<Arc<RegistrySnapshot>> {
        self.snapshots.values().next_back().map(Arc::clone)
    }

    /// Compare the required fields of a document body between two versions
    pub fn required_field_delta(
        &self,
        from: &str,
        to: &str,
        document_type: &str,
    ) -> Result<FieldSetDelta> {
        let from_snapshot = self.select_snapshot(from)?;
        let to_snapshot = self.select_snapshot(to)?;

        let before = required_of(&from_snapshot, document_type)?;
        let after = required_of(&to_snapshot, document_type)?;

        let added: Vec<String> = after
            .iter()
            .filter(|field| !before.contains(field))
            .cloned()
            .collect();
        let removed: Vec<String> = before
            .iter()
            .filter(|field| !after.contains(field))
            .cloned()
            .collect();

        if !removed.is_empty() {
            tracing::info!(
                document = document_type,
                from,
                to,
                removed = ?removed,
                "required fields dropped between versions"
            );
        }

        Ok(FieldSetDelta {
            document: document_type.to_string(),
            from: from_snapshot.version().clone(),
            to: to_snapshot.version().clone(),
            added,
            removed,
        })
    }
}

fn required_of(snapshot: &RegistrySnapshot, document_type: &str) -> Result<Vec<String>> {
    snapshot
        .document(document_type)
        .map(|entry| entry.body.required_fields.clone())
        .ok_or_else(|| SchemaError::UnknownDocumentType {
            version: snapshot.version().to_string(),
            document: document_type.to_string(),
        })
}
