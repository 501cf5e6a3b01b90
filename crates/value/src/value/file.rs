//! File references
//!
//! A [`FileValue`] carries only the identity of its content and a MIME type
//! hint. The bytes themselves live in a content store keyed by [`ContentId`];
//! the value never holds a handle into that store.

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValueError;

/// SHA-256 digest identifying file content
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; ContentId::LEN]);

impl ContentId {
    /// Digest width in bytes
    pub const LEN: usize = 32;

    /// Wrap a raw digest
    pub const fn from_bytes(bytes: [u8; Self::LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes
    pub const fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// Lower-case hex form
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First `len` hex characters, for log lines and display strings
    pub fn short(&self, len: usize) -> String {
        let mut text = self.to_hex();
        text.truncate(len);
        text
    }
}

impl Display for ContentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.short(12))
    }
}

impl FromStr for ContentId {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; Self::LEN];
        hex::decode_to_slice(s.trim(), &mut bytes).map_err(|e| {
            ValueError::invalid_argument(format!("invalid content id '{}': {e}", s.trim()))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Reference to content held by a content store
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileValue {
    #[serde(rename = "contents")]
    id: ContentId,
    #[serde(rename = "mimeType", default, skip_serializing_if = "String::is_empty")]
    mime_type: String,
}

impl FileValue {
    /// MIME type for content of unknown structure
    pub const BINARY_MIME_TYPE: &'static str = "application/octet-stream";

    /// MIME type for plain text content
    pub const TEXT_MIME_TYPE: &'static str = "text/plain";

    /// Create a reference to stored content
    pub fn new(id: ContentId, mime_type: impl Into<String>) -> Self {
        Self {
            id,
            mime_type: mime_type.into(),
        }
    }

    /// Content identity
    #[inline]
    pub const fn id(&self) -> &ContentId {
        &self.id
    }

    /// MIME type hint; empty when unknown
    #[inline]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Same content under a different MIME type
    pub fn with_mime_type(&self, mime_type: impl Into<String>) -> Self {
        Self::new(self.id, mime_type)
    }

    /// Whether the MIME type marks the content as text
    pub fn is_text_based(&self) -> bool {
        let mime = self.mime_type.to_ascii_lowercase();
        mime.starts_with("text/") || mime.starts_with("application/json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_id() -> ContentId {
        let mut bytes = [0u8; ContentId::LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        ContentId::from_bytes(bytes)
    }

    #[test]
    fn test_content_id_hex_round_trip() {
        let id = sample_id();
        let text = id.to_string();
        assert_eq!(text.len(), 64);
        assert!(text.starts_with("000102"));
        assert_eq!(text.parse::<ContentId>().unwrap(), id);
        assert_eq!(id.short(6), "000102");
    }

    #[test]
    fn test_content_id_rejects_bad_text() {
        assert!("abc".parse::<ContentId>().is_err());
        assert!("zz".repeat(32).parse::<ContentId>().is_err());
    }

    #[test]
    fn test_equality_covers_mime_type() {
        let a = FileValue::new(sample_id(), FileValue::TEXT_MIME_TYPE);
        let b = a.with_mime_type(FileValue::BINARY_MIME_TYPE);
        assert_ne!(a, b);
        assert_eq!(a.id(), b.id());
    }

    #[test]
    fn test_is_text_based() {
        assert!(FileValue::new(sample_id(), "text/csv").is_text_based());
        assert!(FileValue::new(sample_id(), "Application/JSON").is_text_based());
        assert!(!FileValue::new(sample_id(), FileValue::BINARY_MIME_TYPE).is_text_based());
        assert!(!FileValue::new(sample_id(), "").is_text_based());
    }
}
