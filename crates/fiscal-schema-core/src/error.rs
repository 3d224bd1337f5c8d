//! Error types for the fiscal schema engine
//!
//! Hard failures only: the registry could not be built, or a payload could
//! not be matched to a schema set or document variant. Data-level defects in
//! a payload are never errors; they are reported as
//! [`ValidationViolation`](crate::ValidationViolation)s.

use thiserror::Error;

/// Main error type for registry construction and resolution
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Version identifier is malformed or not present in the registry
    #[error("Unknown schema version '{version}': {reason}")]
    UnknownVersion { version: String, reason: String },

    /// A version was registered without any schema sources
    #[error("Schema version {version} has no sources")]
    EmptyVersion { version: String },

    /// Two sources with the same file name in one version
    #[error("Duplicate schema source '{file}' in version {version}")]
    DuplicateSource { version: String, file: String },

    /// A `$ref` points at a file or definition that does not exist
    #[error("Unresolvable reference '{reference}' in {file} (version {version})")]
    UnresolvableReference {
        version: String,
        file: String,
        reference: String,
    },

    /// The `$ref` graph loops back on itself
    #[error("Cyclic reference in version {version}: {}", .chain.join(" -> "))]
    CyclicReference { version: String, chain: Vec<String> },

    /// A schema node uses an unsupported construct or breaks a node invariant
    #[error("Malformed schema at {file}#{pointer} (version {version}): {reason}")]
    MalformedSchema {
        version: String,
        file: String,
        pointer: String,
        reason: String,
    },

    /// A document schema has no single-literal discriminant field
    #[error("Document schema {file} (version {version}) declares no single-literal '{field}' discriminant")]
    MissingDiscriminant {
        version: String,
        file: String,
        field: String,
    },

    /// Two document schemas in one version claim the same code or key path
    #[error("Documents '{first}' and '{second}' share a discriminant in version {version}")]
    DuplicateDiscriminant {
        version: String,
        first: String,
        second: String,
    },

    /// The authoring audit found issues and strict authoring is enabled
    #[error("Inconsistent schema set for version {version}: {count} issue(s), first: {first}")]
    InconsistentSchema {
        version: String,
        count: usize,
        first: String,
    },

    /// No schema registered under this document type name
    #[error("Unknown document type '{document}' in version {version}")]
    UnknownDocumentType { version: String, document: String },

    /// Zero or several variants match, or the discriminant value is wrong
    #[error("Cannot identify document for version {version}: {reason}")]
    AmbiguousOrUnknownDocument { version: String, reason: String },

    /// The requested version has no registered schema set
    #[error("Unsupported schema version '{version}' (supported: {})", .supported.join(", "))]
    UnsupportedVersion {
        version: String,
        supported: Vec<String>,
    },

    /// The worker pool for a batch could not be started
    #[error("Cannot start batch worker pool: {reason}")]
    BatchPool { reason: String },
}

impl SchemaError {
    /// Create a malformed schema error
    pub fn malformed(
        version: impl Into<String>,
        file: impl Into<String>,
        pointer: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        SchemaError::MalformedSchema {
            version: version.into(),
            file: file.into(),
            pointer: pointer.into(),
            reason: reason.into(),
        }
    }

    /// Create an identification failure
    pub fn unidentified(version: impl Into<String>, reason: impl Into<String>) -> Self {
        SchemaError::AmbiguousOrUnknownDocument {
            version: version.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error aborts registry construction
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            SchemaError::UnknownVersion { .. }
                | SchemaError::EmptyVersion { .. }
                | SchemaError::DuplicateSource { .. }
                | SchemaError::UnresolvableReference { .. }
                | SchemaError::CyclicReference { .. }
                | SchemaError::MalformedSchema { .. }
                | SchemaError::MissingDiscriminant { .. }
                | SchemaError::DuplicateDiscriminant { .. }
                | SchemaError::InconsistentSchema { .. }
        )
    }

    /// Check if this error is a lookup failure against a built registry
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            SchemaError::UnknownDocumentType { .. }
                | SchemaError::AmbiguousOrUnknownDocument { .. }
                | SchemaError::UnsupportedVersion { .. }
        )
    }
}

/// Errors raised while loading an [`EngineConfig`](crate::EngineConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed into a configuration
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A value is syntactically fine but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type alias for registry and resolution operations
pub type Result<T> = std::result::Result<T, SchemaError>;
