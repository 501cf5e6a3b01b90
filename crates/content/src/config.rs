//! Content store configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ContentError, Result};

/// Content store configuration
///
/// ```rust
/// use std::time::Duration;
/// use varinterop_content::ContentStoreConfig;
///
/// let config = ContentStoreConfig::default()
///     .with_prefix("session-")
///     .with_io_timeout(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStoreConfig {
    /// Directory that will hold the store's private temp directory.
    /// `None` uses the system temp directory.
    pub root: Option<PathBuf>,

    /// Name prefix of the private temp directory. Must not contain path
    /// separators.
    pub prefix: String,

    /// Upper bound for every backing read or write
    pub io_timeout: Option<Duration>,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self {
            root: None,
            prefix: "varinterop-content-".to_string(),
            io_timeout: None,
        }
    }
}

impl ContentStoreConfig {
    /// Place the temp directory under `root`
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Set the temp directory name prefix
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Bound backing I/O
    pub fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = Some(timeout);
        self
    }

    /// Directory the temp directory is created in
    pub fn resolved_root(&self) -> PathBuf {
        self.root.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Check the configuration without touching the filesystem
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(ContentError::invalid_config("prefix", "must not be empty"));
        }

        if self.prefix.contains('/') || self.prefix.contains('\\') {
            return Err(ContentError::invalid_config(
                "prefix",
                "must not contain path separators ('/' or '\\')",
            ));
        }

        if self.io_timeout.is_some_and(|t| t.is_zero()) {
            return Err(ContentError::invalid_config(
                "io_timeout",
                "must be greater than zero",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ContentStoreConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolved_root(), std::env::temp_dir());
    }

    #[test]
    fn test_rejects_bad_prefix() {
        for prefix in ["", "a/b", "a\\b"] {
            let err = ContentStoreConfig::default()
                .with_prefix(prefix)
                .validate()
                .unwrap_err();
            assert!(
                matches!(err, ContentError::InvalidConfig { field: "prefix", .. }),
                "{prefix:?}"
            );
        }
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let err = ContentStoreConfig::default()
            .with_io_timeout(Duration::ZERO)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidConfig { field: "io_timeout", .. }));
    }

    #[test]
    fn test_serde_defaults() {
        let config: ContentStoreConfig =
            serde_json::from_str(r#"{"root":"/var/tmp"}"#).unwrap();
        assert_eq!(config.root, Some(PathBuf::from("/var/tmp")));
        assert_eq!(config.prefix, "varinterop-content-");
        assert_eq!(config.io_timeout, None);
    }
}
