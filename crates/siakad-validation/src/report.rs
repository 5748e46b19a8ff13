//! Validation issues and structural field analysis.

use serde_json::Value;

use crate::schema::Schema;

/// A single validation failure at a field path.
///
/// `path` is dot-joined for nested structures (`address.city`). The empty
/// path means the input root itself; callers re-key it to the input source
/// name before it reaches a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Re-root this issue under a parent field name.
    pub(crate) fn under(self, parent: &str) -> Self {
        let path = if self.path.is_empty() {
            parent.to_owned()
        } else {
            format!("{parent}.{}", self.path)
        };
        Self { path, ..self }
    }
}

/// Ordered list of validation failures, as produced by [`Schema::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("validation failed with {} issue(s)", .0.len())]
pub struct Issues(pub Vec<Issue>);

/// Structural diff of a raw input's top-level keys against a schema's
/// declared shape. Computed independently of why validation failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldReport {
    /// Every key the schema declares, in declaration order.
    pub expected: Vec<String>,
    /// Required keys the input lacks.
    pub missing: Vec<String>,
    /// Input keys the schema does not declare.
    pub unexpected: Vec<String>,
}

impl FieldReport {
    /// Compare `raw`'s own keys with the schema shape. A non-object `raw`
    /// contributes no keys, so every required field reports as missing.
    pub fn analyze(raw: &Value, schema: &Schema) -> Self {
        let shape = schema.describe();
        let keys: Vec<&str> = raw
            .as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default();

        let missing = shape
            .required
            .iter()
            .filter(|f| !keys.iter().any(|k| k == *f))
            .map(|f| (*f).to_owned())
            .collect();
        let unexpected = keys
            .iter()
            .filter(|k| !shape.expected.iter().any(|f| f == *k))
            .map(|k| (*k).to_owned())
            .collect();

        Self {
            expected: shape.expected.iter().map(|f| (*f).to_owned()).collect(),
            missing,
            unexpected,
        }
    }

    /// True when the input shape itself is wrong (missing or extra keys).
    pub fn is_structural(&self) -> bool {
        !self.missing.is_empty() || !self.unexpected.is_empty()
    }
}
