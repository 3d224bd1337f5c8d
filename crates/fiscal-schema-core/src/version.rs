//! Schema version identifiers
//!
//! Versions are labelled like the schema directories ("1.0", "1.1") and are
//! totally ordered by their (major, minor) pair.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A parsed schema version
#[derive(Debug, Clone)]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
    label: String,
}

impl SchemaVersion {
    /// Create a version from its components
    pub fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            label: format!("{}.{}", major, minor),
        }
    }

    /// Major component
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// The label the version was registered under
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for SchemaVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        if label.is_empty() {
            return Err("version identifier is empty".to_string());
        }

        let mut parts = label.split('.');
        let major = parse_component(parts.next(), label)?;
        let minor = match parts.next() {
            Some(part) => parse_component(Some(part), label)?,
            None => 0,
        };
        if parts.next().is_some() {
            return Err(format!("'{}' has more than two components", label));
        }

        Ok(Self {
            major,
            minor,
            label: label.to_string(),
        })
    }
}

fn parse_component(part: Option<&str>, label: &str) -> Result<u32, String> {
    match part {
        Some(p) if !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) => p
            .parse()
            .map_err(|_| format!("component '{}' of '{}' is out of range", p, label)),
        _ => Err(format!("'{}' is not a major.minor version", label)),
    }
}

impl PartialEq for SchemaVersion {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major && self.minor == other.minor
    }
}

impl Eq for SchemaVersion {}

impl PartialOrd for SchemaVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl std::hash::Hash for SchemaVersion {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

impl Serialize for SchemaVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        let v: SchemaVersion = "1.1".parse().unwrap();
        assert_eq!((v.major(), v.minor()), (1, 1));
        assert_eq!(v.label(), "1.1");

        let v: SchemaVersion = "2".parse().unwrap();
        assert_eq!((v.major(), v.minor()), (2, 0));
    }

    #[test]
    fn test_reject_malformed_versions() {
        for bad in ["", "v1.0", "1.", "1.0.3", "a.b", "-1.0"] {
            assert!(bad.parse::<SchemaVersion>().is_err(), "accepted '{}'", bad);
        }
    }

    #[test]
    fn test_versions_are_ordered_by_major_minor() {
        let mut versions: Vec<SchemaVersion> = ["1.1", "2.0", "1.0", "1.10"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        versions.sort();
        let labels: Vec<&str> = versions.iter().map(|v| v.label()).collect();
        assert_eq!(labels, vec!["1.0", "1.1", "1.10", "2.0"]);
    }

    #[test]
    fn test_equality_ignores_label_spelling() {
        let a: SchemaVersion = "1.01".parse().unwrap();
        assert_eq!(a, SchemaVersion::new(1, 1));
    }
}
