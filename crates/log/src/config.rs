//! Logger configuration and presets

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Primary level variable
pub const LEVEL_ENV: &str = "VARINTEROP_LOG";
/// Fallback level variable
pub const RUST_LOG_ENV: &str = "RUST_LOG";
/// Output format variable
pub const FORMAT_ENV: &str = "VARINTEROP_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Filter directive (e.g. "info", "debug,varinterop_content=trace")
    pub level: String,

    /// Output format
    pub format: Format,

    /// Emit ANSI colors
    pub ansi: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Human-readable, multi-line
    Pretty,
    /// Single-line
    #[default]
    Compact,
    /// Structured JSON, one object per line
    Json,
}

impl FromStr for Format {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`Format::Compact`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "json" => Self::Json,
            _ => Self::Compact,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Compact,
            ansi: true,
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    ///
    /// The level comes from `VARINTEROP_LOG`, then `RUST_LOG`; the format from
    /// `VARINTEROP_LOG_FORMAT`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(level) = lookup(LEVEL_ENV).or_else(|| lookup(RUST_LOG_ENV)) {
            if !level.trim().is_empty() {
                config.level = level;
            }
        }

        if let Some(format) = lookup(FORMAT_ENV) {
            config.format = format.parse().unwrap_or_default();
            config.ansi = config.format != Format::Json;
        }

        config
    }

    /// Development configuration (pretty, debug level)
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            format: Format::Pretty,
            ansi: true,
        }
    }

    /// Production configuration (JSON, info level)
    #[must_use]
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Json,
            ansi: false,
        }
    }

    /// Set the filter directive
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn test_level_precedence() {
        let config = Config::from_lookup(lookup(&[
            (LEVEL_ENV, "trace"),
            (RUST_LOG_ENV, "warn"),
        ]));
        assert_eq!(config.level, "trace");

        let config = Config::from_lookup(lookup(&[(RUST_LOG_ENV, "warn")]));
        assert_eq!(config.level, "warn");

        let config = Config::from_lookup(lookup(&[(LEVEL_ENV, "  ")]));
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_format_from_env() {
        let config = Config::from_lookup(lookup(&[(FORMAT_ENV, "JSON")]));
        assert_eq!(config.format, Format::Json);
        assert!(!config.ansi);

        let config = Config::from_lookup(lookup(&[(FORMAT_ENV, "logfmt")]));
        assert_eq!(config.format, Format::Compact);
    }

    #[test]
    fn test_presets() {
        assert_eq!(Config::development().format, Format::Pretty);
        assert_eq!(Config::production().format, Format::Json);
        assert_eq!(Config::production().with_level("warn").level, "warn");
    }
}
