//! `$ref` dereferencing for one schema version
//!
//! Every distinct reference target is built once and cached; later
//! referrers receive the same `Arc`. Targets currently being built sit on
//! an in-progress stack, and meeting one of them again is a cycle.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::error::{Result, SchemaError};
use crate::node::{NodeKind, NumericRange, SchemaNode};

pub(crate) struct RefResolver<'a> {
    version: &'a str,
    sources: &'a BTreeMap<String, Value>,
    cache: HashMap<String, Arc<SchemaNode>>,
    in_progress: Vec<String>,
}

impl<'a> RefResolver<'a> {
    pub(crate) fn new(version: &'a str, sources: &'a BTreeMap<String, Value>) -> Self {
        Self {
            version,
            sources,
            cache: HashMap::new(),
            in_progress: Vec::new(),
        }
    }

    /// Number of distinct targets resolved so far
    pub(crate) fn resolved_count(&self) -> usize {
        self.cache.len()
    }

    /// Resolve the root schema of a source file
    pub(crate) fn resolve_root(&mut self, file: &str) -> Result<Arc<SchemaNode>> {
        self.resolve_target(file, file, "")
    }

    /// Resolve every entry under `definitions` of a source file
    pub(crate) fn resolve_definitions(&mut self, file: &str) -> Result<usize> {
        let names: Vec<String> = self
            .sources
            .get(file)
            .and_then(|doc| doc.get("definitions"))
            .and_then(Value::as_object)
            .map(|defs| defs.keys().cloned().collect())
            .unwrap_or_default();

        for name in &names {
            let fragment = format!("/definitions/{}", escape_pointer(name));
            self.resolve_target(file, file, &fragment)?;
        }
        Ok(names.len())
    }

    fn resolve_ref(&mut self, current_file: &str, reference: &str) -> Result<Arc<SchemaNode>> {
        let (file_part, fragment) = match reference.split_once('#') {
            Some((file, fragment)) => (file, fragment),
            None => (reference, ""),
        };
        let target_file = if file_part.is_empty() {
            current_file
        } else {
            file_part
        };

        if !target_file.is_empty() && !self.sources.contains_key(target_file) {
            return Err(self.unresolvable(current_file, reference));
        }
        if !fragment.is_empty() && !fragment.starts_with('/') {
            return Err(self.unresolvable(current_file, reference));
        }

        let target_file = target_file.to_string();
        self.resolve_target(current_file, &target_file, fragment)
    }

    fn resolve_target(
        &mut self,
        referrer: &str,
        file: &str,
        fragment: &str,
    ) -> Result<Arc<SchemaNode>> {
        let key = format!("{}#{}", file, fragment);
        if let Some(node) = self.cache.get(&key) {
            return Ok(Arc::clone(node));
        }

        if let Some(pos) = self.in_progress.iter().position(|k| *k == key) {
            let mut chain = self.in_progress[pos..].to_vec();
            chain.push(key);
            return Err(SchemaError::CyclicReference {
                version: self.version.to_string(),
                chain,
            });
        }

        let sources = self.sources;
        let raw = sources
            .get(file)
            .and_then(|doc| if fragment.is_empty() { Some(doc) } else { doc.pointer(fragment) })
            .ok_or_else(|| self.unresolvable(referrer, &key))?;

        self.in_progress.push(key.clone());
        let built = self.build_node(file, fragment, raw);
        self.in_progress.pop();

        let node = built?;
        tracing::debug!(version = self.version, target = %key, "resolved schema reference");
        self.cache.insert(key, Arc::clone(&node));
        Ok(node)
    }

    fn build_node(&mut self, file: &str, pointer: &str, raw: &Value) -> Result<Arc<SchemaNode>> {
        let obj = raw
            .as_object()
            .ok_or_else(|| self.malformed(file, pointer, "schema node must be a JSON object"))?;

        // Draft-04: siblings of `$ref` are ignored
        if let Some(reference) = obj.get("$ref") {
            let reference = reference
                .as_str()
                .ok_or_else(|| self.malformed(file, pointer, "'$ref' must be a string"))?;
            return self.resolve_ref(file, reference);
        }

        let kind = match obj.get("type") {
            Some(Value::String(t)) => match t.as_str() {
                "object" => NodeKind::Object,
                "array" => NodeKind::Array,
                "integer" => NodeKind::Integer,
                "number" => NodeKind::Number,
                "string" => NodeKind::String,
                "boolean" => NodeKind::Boolean,
                other => {
                    return Err(self.malformed(file, pointer, format!("unsupported type '{}'", other)))
                }
            },
            Some(_) => {
                return Err(self.malformed(file, pointer, "'type' must be a single type name"));
            }
            None if obj.contains_key("enum") => NodeKind::Enum,
            None if obj.contains_key("properties") => NodeKind::Object,
            None => NodeKind::Any,
        };

        let mut node = SchemaNode::new(kind);
        node.title = obj.get("title").and_then(Value::as_str).map(str::to_string);
        node.description = obj
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        if let Some(props) = obj.get("properties") {
            let props = props
                .as_object()
                .ok_or_else(|| self.malformed(file, pointer, "'properties' must be an object"))?;
            for (name, child) in props {
                let child_pointer = format!("{}/properties/{}", pointer, escape_pointer(name));
                let child = self.build_node(file, &child_pointer, child)?;
                node.properties.push((name.clone(), child));
            }
        }

        if let Some(required) = obj.get("required") {
            let required = required
                .as_array()
                .ok_or_else(|| self.malformed(file, pointer, "'required' must be an array"))?;
            for entry in required {
                let name = entry.as_str().ok_or_else(|| {
                    self.malformed(file, pointer, "'required' entries must be strings")
                })?;
                if !node.is_required(name) {
                    node.required_fields.push(name.to_string());
                }
            }
        }

        node.range = self.range(file, pointer, obj)?;

        if let Some(values) = obj.get("enum") {
            let values = values
                .as_array()
                .ok_or_else(|| self.malformed(file, pointer, "'enum' must be an array"))?;
            if values.is_empty() {
                return Err(self.malformed(file, pointer, "'enum' must not be empty"));
            }
            node.enum_values = Some(values.clone());
        }

        if let Some(items) = obj.get("items") {
            if !items.is_object() {
                return Err(self.malformed(file, pointer, "tuple-form 'items' is not supported"));
            }
            let items_pointer = format!("{}/items", pointer);
            node.items = Some(self.build_node(file, &items_pointer, items)?);
        }

        node.unique_items = self.bool_keyword(file, pointer, obj, "uniqueItems")?;
        node.min_items = self.usize_keyword(file, pointer, obj, "minItems")?;
        node.max_items = self.usize_keyword(file, pointer, obj, "maxItems")?;
        node.min_length = self.usize_keyword(file, pointer, obj, "minLength")?;
        node.max_length = self.usize_keyword(file, pointer, obj, "maxLength")?;

        if let Some(pattern) = obj.get("pattern") {
            let pattern = pattern
                .as_str()
                .ok_or_else(|| self.malformed(file, pointer, "'pattern' must be a string"))?;
            let compiled = Regex::new(pattern).map_err(|e| {
                self.malformed(file, pointer, format!("invalid pattern '{}': {}", pattern, e))
            })?;
            node.pattern = Some(compiled);
        }

        self.check_invariants(file, pointer, &node)?;
        Ok(Arc::new(node))
    }

    fn check_invariants(&self, file: &str, pointer: &str, node: &SchemaNode) -> Result<()> {
        match node.kind {
            NodeKind::Object if node.range.is_some() || node.enum_values.is_some() => Err(
                self.malformed(file, pointer, "object nodes cannot declare a range or enum"),
            ),
            NodeKind::Array if node.items.is_none() => {
                Err(self.malformed(file, pointer, "array nodes must declare 'items'"))
            }
            _ => Ok(()),
        }
    }

    fn range(
        &self,
        file: &str,
        pointer: &str,
        obj: &Map<String, Value>,
    ) -> Result<Option<NumericRange>> {
        let number = |keyword: &str| -> Result<Option<serde_json::Number>> {
            match obj.get(keyword) {
                None => Ok(None),
                Some(Value::Number(n)) => Ok(Some(n.clone())),
                Some(_) => Err(self.malformed(file, pointer, format!("'{}' must be a number", keyword))),
            }
        };
        let min = number("minimum")?;
        let max = number("maximum")?;
        if min.is_none() && max.is_none() {
            return Ok(None);
        }
        Ok(Some(NumericRange {
            min,
            max,
            min_exclusive: self.bool_keyword(file, pointer, obj, "exclusiveMinimum")?,
            max_exclusive: self.bool_keyword(file, pointer, obj, "exclusiveMaximum")?,
        }))
    }

    fn bool_keyword(
        &self,
        file: &str,
        pointer: &str,
        obj: &Map<String, Value>,
        keyword: &str,
    ) -> Result<bool> {
        match obj.get(keyword) {
            None => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(self.malformed(file, pointer, format!("'{}' must be a boolean", keyword))),
        }
    }

    fn usize_keyword(
        &self,
        file: &str,
        pointer: &str,
        obj: &Map<String, Value>,
        keyword: &str,
    ) -> Result<Option<usize>> {
        match obj.get(keyword) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    self.malformed(
                        file,
                        pointer,
                        format!("'{}' must be a non-negative integer", keyword),
                    )
                }),
        }
    }

    fn malformed(&self, file: &str, pointer: &str, reason: impl Into<String>) -> SchemaError {
        SchemaError::malformed(self.version, file, pointer, reason)
    }

    fn unresolvable(&self, file: &str, reference: &str) -> SchemaError {
        SchemaError::UnresolvableReference {
            version: self.version.to_string(),
            file: file.to_string(),
            reference: reference.to_string(),
        }
    }
}

fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}
