//! String, boolean and file metadata

use serde::{Deserialize, Serialize};

use super::common::CommonMetadata;
use super::numeric::Enumeration;
use crate::error::{ValueError, ValueResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BooleanMetadata {
    pub common: CommonMetadata,
}

impl BooleanMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.common.description = description.into();
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringMetadata {
    pub common: CommonMetadata,
    enumeration: Enumeration<String>,
}

impl StringMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.common.description = description.into();
        self
    }

    pub fn with_enumeration(mut self, enumeration: Enumeration<String>) -> Self {
        self.enumeration = enumeration;
        self
    }

    pub fn enumeration(&self) -> &Enumeration<String> {
        &self.enumeration
    }

    /// Empty string unless an enumeration excludes it, then the first value
    pub fn default_value(&self) -> String {
        let empty = String::new();
        if self.enumeration.contains(&empty) {
            return empty;
        }
        self.enumeration
            .values()
            .first()
            .cloned()
            .unwrap_or(empty)
    }

    pub fn check(&self, value: &str) -> ValueResult<()> {
        if !self.enumeration.is_empty() && !self.enumeration.values().iter().any(|v| v == value) {
            return Err(ValueError::invalid_argument(format!(
                "{value:?} is not an enumerated value"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMetadata {
    pub common: CommonMetadata,
    /// Expected MIME type; empty when any content is acceptable
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

impl FileMetadata {
    pub fn new(mime_type: impl Into<String>) -> Self {
        Self {
            common: CommonMetadata::default(),
            mime_type: mime_type.into(),
        }
    }
}
