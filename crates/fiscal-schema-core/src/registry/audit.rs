//! Authoring audit for resolved document schemas
//!
//! Flags schema-authoring inconsistencies that validation alone would paper
//! over, such as a field listed in `required` but missing from the
//! `properties` of the same object.

use serde::Serialize;
use std::fmt;

use crate::node::SchemaNode;
use crate::violation::FieldPath;

/// Kind of authoring inconsistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    /// A required field is not among the declared properties
    RequiredNotDeclared,
}

/// One authoring inconsistency found while building a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaIssue {
    /// Document type the issue was found in
    pub document: String,
    /// Path of the offending object within the document
    pub path: FieldPath,
    /// Field the issue concerns
    pub field: String,
    pub kind: IssueKind,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            IssueKind::RequiredNotDeclared => write!(
                f,
                "{}: '{}' is required at {} but not declared in its properties",
                self.document, self.field, self.path
            ),
        }
    }
}

/// Audit a resolved document root
pub(crate) fn audit_document(document: &str, root: &SchemaNode) -> Vec<SchemaIssue> {
    let mut issues = Vec::new();
    let mut path = FieldPath::root();
    walk(document, root, &mut path, &mut issues);
    issues
}

fn walk(document: &str, node: &SchemaNode, path: &mut FieldPath, issues: &mut Vec<SchemaIssue>) {
    // Objects without a property list accept any fields
    if !node.properties.is_empty() {
        for field in &node.required_fields {
            if node.property(field).is_none() {
                issues.push(SchemaIssue {
                    document: document.to_string(),
                    path: path.clone(),
                    field: field.clone(),
                    kind: IssueKind::RequiredNotDeclared,
                });
            }
        }
    }

    for (key, child) in &node.properties {
        path.push_key(key.clone());
        walk(document, child, path, issues);
        path.pop();
    }

    if let Some(items) = &node.items {
        path.push_index(0);
        walk(document, items, path, issues);
        path.pop();
    }
}
