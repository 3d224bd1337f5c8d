//! Engine configuration
//!
//! Settings shared by registry construction and validation. Values can come
//! from defaults, a builder, environment variables or a TOML fragment.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default file name of the shared dictionary schema
pub const DEFAULT_DICTIONARY_FILE: &str = "dictionary.schema.json";

/// Default suffix stripped from source file names to get document type names
pub const DEFAULT_SCHEMA_SUFFIX: &str = ".schema.json";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// File name of the shared dictionary schema in every version
    pub dictionary_file: String,

    /// Suffix stripped from file names to derive document type names
    pub schema_suffix: String,

    /// Field carrying the variant discriminant inside a document body
    pub discriminant_field: String,

    /// Advisory format version field inside a document body
    pub format_version_field: String,

    /// Fail registry construction on authoring inconsistencies
    pub strict_authoring: bool,

    /// Number of payloads validated concurrently by `check_batch`
    pub batch_parallelism: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dictionary_file: DEFAULT_DICTIONARY_FILE.to_string(),
            schema_suffix: DEFAULT_SCHEMA_SUFFIX.to_string(),
            discriminant_field: "code".to_string(),
            format_version_field: "fiscalDocumentFormatVer".to_string(),
            strict_authoring: false,
            batch_parallelism: 4,
        }
    }
}

impl EngineConfig {
    /// Create a new config builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Create config from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            dictionary_file: std::env::var("FISCAL_SCHEMA_DICTIONARY_FILE")
                .unwrap_or(defaults.dictionary_file),
            schema_suffix: std::env::var("FISCAL_SCHEMA_SUFFIX").unwrap_or(defaults.schema_suffix),
            discriminant_field: std::env::var("FISCAL_SCHEMA_DISCRIMINANT_FIELD")
                .unwrap_or(defaults.discriminant_field),
            format_version_field: std::env::var("FISCAL_SCHEMA_FORMAT_VERSION_FIELD")
                .unwrap_or(defaults.format_version_field),
            strict_authoring: std::env::var("FISCAL_SCHEMA_STRICT_AUTHORING")
                .map(|v| v.parse().unwrap_or(defaults.strict_authoring))
                .unwrap_or(defaults.strict_authoring),
            batch_parallelism: std::env::var("FISCAL_SCHEMA_BATCH_PARALLELISM")
                .map(|v| v.parse().unwrap_or(defaults.batch_parallelism))
                .unwrap_or(defaults.batch_parallelism),
        }
    }

    /// Parse a TOML fragment; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dictionary_file.trim().is_empty() {
            return Err(ConfigError::Invalid("dictionary_file must not be empty".to_string()));
        }
        if self.discriminant_field.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "discriminant_field must not be empty".to_string(),
            ));
        }
        if self.batch_parallelism == 0 {
            return Err(ConfigError::Invalid(
                "batch_parallelism must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Document type name for a source file, or `None` for the dictionary
    pub fn document_name(&self, file_name: &str) -> Option<String> {
        if file_name == self.dictionary_file {
            return None;
        }
        let name = file_name
            .strip_suffix(self.schema_suffix.as_str())
            .or_else(|| file_name.strip_suffix(".json"))
            .unwrap_or(file_name);
        Some(name.to_string())
    }
}

/// Builder for EngineConfig
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the dictionary file name
    pub fn dictionary_file(mut self, name: impl Into<String>) -> Self {
        self.config.dictionary_file = name.into();
        self
    }

    /// Set the schema file suffix
    pub fn schema_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.schema_suffix = suffix.into();
        self
    }

    /// Set the discriminant field name
    pub fn discriminant_field(mut self, field: impl Into<String>) -> Self {
        self.config.discriminant_field = field.into();
        self
    }

    /// Set the advisory format version field name
    pub fn format_version_field(mut self, field: impl Into<String>) -> Self {
        self.config.format_version_field = field.into();
        self
    }

    /// Enable or disable strict authoring
    pub fn strict_authoring(mut self, strict: bool) -> Self {
        self.config.strict_authoring = strict;
        self
    }

    /// Set batch parallelism
    pub fn batch_parallelism(mut self, parallelism: usize) -> Self {
        self.config.batch_parallelism = parallelism;
        self
    }

    /// Build the configuration
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.dictionary_file, "dictionary.schema.json");
        assert_eq!(config.discriminant_field, "code");
        assert_eq!(config.format_version_field, "fiscalDocumentFormatVer");
        assert!(!config.strict_authoring);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EngineConfig::builder()
            .dictionary_file("dict.json")
            .schema_suffix(".json")
            .strict_authoring(true)
            .batch_parallelism(8)
            .build();

        assert_eq!(config.dictionary_file, "dict.json");
        assert_eq!(config.schema_suffix, ".json");
        assert!(config.strict_authoring);
        assert_eq!(config.batch_parallelism, 8);
    }

    #[test]
    fn test_from_toml_keeps_defaults_for_missing_keys() {
        let config = EngineConfig::from_toml_str("strict_authoring = true\n").unwrap();
        assert!(config.strict_authoring);
        assert_eq!(config.dictionary_file, DEFAULT_DICTIONARY_FILE);
    }

    #[test]
    fn test_from_toml_rejects_invalid_values() {
        let err = EngineConfig::from_toml_str("batch_parallelism = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EngineConfig::from_toml_str("strict_authoring = \"maybe\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_document_name() {
        let config = EngineConfig::default();
        assert_eq!(config.document_name("closeShift.schema.json").as_deref(), Some("closeShift"));
        assert_eq!(config.document_name("receipt.json").as_deref(), Some("receipt"));
        assert_eq!(config.document_name("dictionary.schema.json"), None);
    }
}
