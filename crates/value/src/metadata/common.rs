//! Description and custom annotations shared by every metadata type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueResult};

/// String-to-string annotations attached to a variable declaration
///
/// Keys are unique and iteration order is the key order, which carries no
/// meaning. Only strings are accepted; [`CustomMetadata::from_json`] rejects
/// other JSON values instead of stringifying them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomMetadata {
    entries: BTreeMap<String, String>,
}

impl CustomMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object whose values are all strings
    pub fn from_json(json: serde_json::Value) -> ValueResult<Self> {
        let serde_json::Value::Object(map) = json else {
            return Err(ValueError::invalid_argument(
                "custom metadata must be a JSON object",
            ));
        };

        let mut entries = BTreeMap::new();
        for (key, value) in map {
            match value {
                serde_json::Value::String(text) => {
                    entries.insert(key, text);
                }
                other => {
                    return Err(ValueError::invalid_argument(format!(
                        "custom metadata '{key}' must be a string, got {other}"
                    )));
                }
            }
        }
        Ok(Self { entries })
    }

    /// JSON object form
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                .collect(),
        )
    }

    /// Insert or replace an entry, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CustomMetadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Fields every metadata type carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonMetadata {
    pub description: String,
    #[serde(rename = "customMetadata")]
    pub custom: CustomMetadata,
}

impl CommonMetadata {
    pub fn with_description(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            custom: CustomMetadata::new(),
        }
    }
}
