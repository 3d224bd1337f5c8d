//! Schema registry
//!
//! Builds one immutable [`RegistrySnapshot`] per schema version from raw
//! schema sources. Construction resolves every `$ref` eagerly, derives each
//! document's variant (nesting key path plus `code` literal) and audits the
//! result. Either every version builds or the whole registry fails; there is
//! no partially usable registry.
//!
//! ## Example
//!
//! ```rust
//! use fiscal_schema_core::{SchemaRegistry, SchemaSource};
//! use serde_json::json;
//!
//! let registry = SchemaRegistry::builder()
//!     .add_version("1.0", vec![
//!         SchemaSource::new("dictionary.schema.json", json!({
//!             "definitions": {"shiftNumber": {"type": "integer", "minimum": 0}}
//!         })),
//!         SchemaSource::new("openShift.schema.json", json!({
//!             "type": "object",
//!             "properties": {"openShift": {
//!                 "type": "object",
//!                 "properties": {
//!                     "code": {"type": "integer", "enum": [2]},
//!                     "shiftNumber": {"$ref": "dictionary.schema.json#/definitions/shiftNumber"}
//!                 },
//!                 "required": ["code", "shiftNumber"]
//!             }}
//!         })),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let root = registry.resolve("1.0", "openShift").unwrap();
//! assert!(root.descendant(&["openShift", "shiftNumber"]).is_some());
//! ```

pub mod audit;
mod resolver;

pub use audit::{IssueKind, SchemaIssue};

use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::document::DocumentVariant;
use crate::error::{Result, SchemaError};
use crate::node::{NodeKind, SchemaNode};
use crate::version::SchemaVersion;
use resolver::RefResolver;

/// A raw, already parsed schema file
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaSource {
    /// File name used in `$ref`s, e.g. `dictionary.schema.json`
    pub file_name: String,
    /// Parsed schema document
    pub document: Value,
}

impl SchemaSource {
    /// Create a new schema source
    pub fn new(file_name: impl Into<String>, document: Value) -> Self {
        Self {
            file_name: file_name.into(),
            document,
        }
    }
}

/// A registered document type with its resolved schema
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub variant: DocumentVariant,
    /// Resolved root schema of the document file
    pub root: Arc<SchemaNode>,
    /// The nested object that carries the discriminant
    pub body: Arc<SchemaNode>,
}

/// Immutable resolved schema set of one version
#[derive(Debug)]
pub struct RegistrySnapshot {
    version: SchemaVersion,
    discriminant_field: String,
    documents: Vec<DocumentEntry>,
    issues: Vec<SchemaIssue>,
    resolved_targets: usize,
}

impl RegistrySnapshot {
    pub fn version(&self) -> &SchemaVersion {
        &self.version
    }

    /// Field holding the discriminant inside document bodies
    pub fn discriminant_field(&self) -> &str {
        &self.discriminant_field
    }

    /// All documents, sorted by type name
    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    /// Look up a document entry by type name
    pub fn document(&self, document_type: &str) -> Option<&DocumentEntry> {
        self.documents
            .iter()
            .find(|entry| entry.variant.name == document_type)
    }

    /// Resolved root schema of a document type
    pub fn resolve(&self, document_type: &str) -> Result<Arc<SchemaNode>> {
        self.document(document_type)
            .map(|entry| Arc::clone(&entry.root))
            .ok_or_else(|| SchemaError::UnknownDocumentType {
                version: self.version.to_string(),
                document: document_type.to_string(),
            })
    }

    pub fn variants(&self) -> impl Iterator<Item = &DocumentVariant> {
        self.documents.iter().map(|entry| &entry.variant)
    }

    /// Authoring issues found while building this version
    pub fn issues(&self) -> &[SchemaIssue] {
        &self.issues
    }

    /// Number of distinct reference targets and roots that were resolved
    pub fn resolved_targets(&self) -> usize {
        self.resolved_targets
    }
}

/// Resolved schema sets for every supported version
#[derive(Debug)]
pub struct SchemaRegistry {
    pub(crate) snapshots: BTreeMap<SchemaVersion, Arc<RegistrySnapshot>>,
    config: EngineConfig,
}

impl SchemaRegistry {
    /// Start building a registry
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::new()
    }

    /// Configuration the registry was built with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolved root schema for a document type in a version
    pub fn resolve(&self, version: &str, document_type: &str) -> Result<Arc<SchemaNode>> {
        let parsed: SchemaVersion =
            version
                .parse()
                .map_err(|reason| SchemaError::UnknownVersion {
                    version: version.to_string(),
                    reason,
                })?;
        let snapshot = self
            .snapshots
            .get(&parsed)
            .ok_or_else(|| SchemaError::UnknownVersion {
                version: version.to_string(),
                reason: "no schema set registered".to_string(),
            })?;
        snapshot.resolve(document_type)
    }
}

/// Builder for SchemaRegistry
pub struct SchemaRegistryBuilder {
    config: EngineConfig,
    versions: Vec<(String, Vec<SchemaSource>)>,
}

impl SchemaRegistryBuilder {
    /// Create a new builder with the default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            versions: Vec::new(),
        }
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the sources of one version
    pub fn add_version(mut self, version: impl Into<String>, sources: Vec<SchemaSource>) -> Self {
        let version = version.into();
        match self.versions.iter_mut().find(|(label, _)| *label == version) {
            Some((_, existing)) => existing.extend(sources),
            None => self.versions.push((version, sources)),
        }
        self
    }

    /// Register a single source under a version
    pub fn add_source(self, version: impl Into<String>, source: SchemaSource) -> Self {
        self.add_version(version, vec![source])
    }

    /// Resolve every version; fails as a whole on the first construction error
    pub fn build(self) -> Result<SchemaRegistry> {
        let mut snapshots: BTreeMap<SchemaVersion, Arc<RegistrySnapshot>> = BTreeMap::new();

        for (label, sources) in self.versions {
            let snapshot = build_snapshot(&self.config, &label, sources)?;
            if let Some(existing) = snapshots.get(&snapshot.version) {
                return Err(SchemaError::UnknownVersion {
                    version: label,
                    reason: format!("duplicates version {}", existing.version),
                });
            }
            snapshots.insert(snapshot.version.clone(), Arc::new(snapshot));
        }

        tracing::info!(versions = snapshots.len(), "schema registry built");
        Ok(SchemaRegistry {
            snapshots,
            config: self.config,
        })
    }
}

impl Default for SchemaRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn build_snapshot(
    config: &EngineConfig,
    label: &str,
    sources: Vec<SchemaSource>,
) -> Result<RegistrySnapshot> {
    let version: SchemaVersion = label.parse().map_err(|reason| SchemaError::UnknownVersion {
        version: label.to_string(),
        reason,
    })?;
    if sources.is_empty() {
        return Err(SchemaError::EmptyVersion {
            version: label.to_string(),
        });
    }

    let mut files: BTreeMap<String, Value> = BTreeMap::new();
    for source in sources {
        if files.contains_key(&source.file_name) {
            return Err(SchemaError::DuplicateSource {
                version: label.to_string(),
                file: source.file_name,
            });
        }
        files.insert(source.file_name, source.document);
    }

    let mut resolver = RefResolver::new(label, &files);
    let mut documents = Vec::new();
    let mut issues = Vec::new();

    for file in files.keys() {
        resolver.resolve_definitions(file)?;
    }

    for file in files.keys() {
        let Some(name) = config.document_name(file) else {
            continue;
        };

        let root = resolver.resolve_root(file)?;
        let (key_path, code, body) =
            derive_variant(label, file, &root, &config.discriminant_field)?;

        issues.extend(audit::audit_document(&name, &root));
        documents.push(DocumentEntry {
            variant: DocumentVariant::new(name, key_path, code),
            root,
            body,
        });
    }
    let resolved_targets = resolver.resolved_count();
    documents.sort_by(|a, b| a.variant.name.cmp(&b.variant.name));

    for (i, first) in documents.iter().enumerate() {
        for second in &documents[i + 1..] {
            if first.variant.code == second.variant.code
                || first.variant.key_path == second.variant.key_path
            {
                return Err(SchemaError::DuplicateDiscriminant {
                    version: label.to_string(),
                    first: first.variant.name.clone(),
                    second: second.variant.name.clone(),
                });
            }
        }
    }

    for issue in &issues {
        tracing::warn!(version = label, "schema authoring issue: {}", issue);
    }
    if config.strict_authoring {
        if let Some(first) = issues.first() {
            return Err(SchemaError::InconsistentSchema {
                version: label.to_string(),
                count: issues.len(),
                first: first.to_string(),
            });
        }
    }

    tracing::info!(
        version = label,
        documents = documents.len(),
        resolved_targets,
        issues = issues.len(),
        "schema snapshot built"
    );

    Ok(RegistrySnapshot {
        version,
        discriminant_field: config.discriminant_field.clone(),
        documents,
        issues,
        resolved_targets,
    })
}

/// Key path, code and node of a discriminated document body
type Body = (Vec<String>, i64, Arc<SchemaNode>);

fn derive_variant(label: &str, file: &str, root: &Arc<SchemaNode>, field: &str) -> Result<Body> {
    let mut bodies = Vec::new();
    collect_bodies(root, field, &mut Vec::new(), &mut bodies);

    let mut bodies = bodies.into_iter();
    match (bodies.next(), bodies.next()) {
        (Some(body), None) => Ok(body),
        (None, _) => Err(SchemaError::MissingDiscriminant {
            version: label.to_string(),
            file: file.to_string(),
            field: field.to_string(),
        }),
        (Some(first), Some(second)) => Err(SchemaError::DuplicateDiscriminant {
            version: label.to_string(),
            first: format!("{}#{}", file, first.0.join(".")),
            second: format!("{}#{}", file, second.0.join(".")),
        }),
    }
}

/// Collect object descendants that pin the discriminant field to one
/// integer literal. The search does not descend into a body.
fn collect_bodies(node: &SchemaNode, field: &str, path: &mut Vec<String>, bodies: &mut Vec<Body>) {
    for (key, child) in &node.properties {
        if child.kind != NodeKind::Object {
            continue;
        }
        path.push(key.clone());
        match child.property(field).and_then(|c| c.integer_literal()) {
            Some(code) => bodies.push((path.clone(), code, Arc::clone(child))),
            None => collect_bodies(child, field, path, bodies),
        }
        path.pop();
    }
}
