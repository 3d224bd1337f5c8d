//! Fiscal Schema Core
//!
//! Schema-driven validation for fiscal cash-register (ККТ) documents. Each
//! supported fiscal data format version ships a set of JSON Schema
//! (draft-04) files: one per document type plus a shared dictionary of
//! reusable definitions. This crate resolves those sets into immutable,
//! reference-free trees once, identifies which document a payload is, and
//! reports every constraint the payload violates.
//!
//! ## Features
//!
//! - **Eager resolution**: every `$ref` is dereferenced at build time, each
//!   target once, and shared between referrers
//! - **Fail-fast construction**: cycles, dangling references and malformed
//!   schemas reject the whole registry
//! - **Discriminated documents**: variants are dispatched by nesting key path
//!   and the literal `code` field
//! - **Exhaustive validation**: data problems are violations, never errors,
//!   and the walk never stops early
//! - **Versioned snapshots**: each format version is independent
//! - **Reports**: serde-serializable results, status and per-kind counts
//!
//! ## Architecture
//!
//! 1. **Registry** (`registry/`): builds one [`RegistrySnapshot`] per version
//!    from [`SchemaSource`]s and audits schema authoring.
//!
//! 2. **Discriminator** (`discriminator`): matches a payload to a
//!    [`DocumentVariant`].
//!
//! 3. **Engine** (`engine/`): walks a [`SchemaNode`] tree and collects
//!    [`ValidationViolation`]s.
//!
//! 4. **Compatibility** (`compatibility`): version selection and
//!    required-field deltas between versions.
//!
//! 5. **Report** (`report`): [`ValidationResult`] and [`ValidationReport`].
//!
//! ## Example
//!
//! ```rust
//! use fiscal_schema_core::{FiscalValidator, SchemaRegistry, SchemaSource};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let registry = SchemaRegistry::builder()
//!     .add_version("1.0", vec![
//!         SchemaSource::new("dictionary.schema.json", json!({
//!             "definitions": {
//!                 "uint32": {"type": "integer", "minimum": 0, "maximum": 4294967295u64}
//!             }
//!         })),
//!         SchemaSource::new("closeShift.schema.json", json!({
//!             "type": "object",
//!             "properties": {"closeShift": {
//!                 "type": "object",
//!                 "properties": {
//!                     "code": {"type": "integer", "enum": [5]},
//!                     "receiptsQuantity": {"$ref": "dictionary.schema.json#/definitions/uint32"}
//!                 },
//!                 "required": ["code", "receiptsQuantity"]
//!             }}
//!         })),
//!     ])
//!     .build()
//!     .unwrap();
//!
//! let validator = FiscalValidator::new(Arc::new(registry));
//! let report = validator
//!     .report("1.0", &json!({"closeShift": {"code": 5, "receiptsQuantity": -1}}))
//!     .unwrap();
//!
//! assert!(!report.valid);
//! assert_eq!(report.violations[0].expected, "[0,4294967295]");
//! ```

pub mod compatibility;
pub mod config;
mod discriminator;
pub mod document;
pub mod engine;
pub mod error;
pub mod node;
pub mod registry;
pub mod report;
pub mod validator;
pub mod version;
pub mod violation;

pub use compatibility::FieldSetDelta;
pub use config::EngineConfig;
pub use document::{DocumentKind, DocumentVariant};
pub use engine::validate;
pub use error::{ConfigError, Result, SchemaError};
pub use node::{NodeKind, NumericRange, RangeCheck, SchemaNode};
pub use registry::{
    DocumentEntry, IssueKind, RegistrySnapshot, SchemaIssue, SchemaRegistry,
    SchemaRegistryBuilder, SchemaSource,
};
pub use report::{payload_digest, summarize, ReportStatus, ValidationReport, ValidationResult};
pub use validator::FiscalValidator;
pub use version::SchemaVersion;
pub use violation::{ConstraintKind, FieldPath, PathSegment, ValidationViolation};

/// Crate version (from Cargo.toml)
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
