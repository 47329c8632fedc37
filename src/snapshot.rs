//! Data-file loading and typed reads over the dynamic document.
//!
//! The snapshot is read again on every request. Accessors are total: a
//! missing key or a value of the wrong shape yields `None` (or an empty
//! collection) instead of an error.

use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, ServerError};

/// Root mapping of the first document of a data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    root: Mapping,
}

impl Snapshot {
    /// Read and parse `path`. JSON is chosen by a `.json` extension,
    /// anything else is parsed as YAML.
    pub async fn load(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ServerError::io(path, err))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }

    /// Parse YAML text, keeping only its first document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let document = serde_yaml::Deserializer::from_str(text)
            .next()
            .ok_or(ServerError::EmptyDocument)?;
        Self::from_value(Value::deserialize(document)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(serde_yaml::to_value(value)?)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Null => Err(ServerError::EmptyDocument),
            _ => Err(ServerError::NotAMapping),
        }
    }

    /// The `post` mapping, empty when absent.
    pub fn post(&self) -> Mapping {
        mapping(&self.root, "post").cloned().unwrap_or_default()
    }

    /// Raw author records: the root `authors` key, then `post.authors`.
    pub fn authors(&self) -> Mapping {
        mapping(&self.root, "authors")
            .or_else(|| {
                mapping(&self.root, "post")
                    .and_then(|post| mapping(post, "authors"))
            })
            .cloned()
            .unwrap_or_default()
    }
}

/// Scalar rendered as text. Sequences, mappings and null have none.
pub fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// `key` as text, if present and scalar.
pub fn string(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar)
}

/// `key` as a list; any other shape reads as empty.
pub fn list<'a>(map: &'a Mapping, key: &str) -> &'a [Value] {
    match map.get(key) {
        Some(Value::Sequence(items)) => items,
        _ => &[],
    }
}

/// `key` as a mapping, if it is one.
pub fn mapping<'a>(map: &'a Mapping, key: &str) -> Option<&'a Mapping> {
    map.get(key).and_then(Value::as_mapping)
}

/// `key` as a boolean; only a real YAML boolean `true` counts.
pub fn flag(map: &Mapping, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}
