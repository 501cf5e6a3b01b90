//! Logger builder

use std::sync::Once;

use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, Format};
use crate::error::{LogError, LogResult};

/// Logger builder
#[derive(Debug)]
pub struct LoggerBuilder {
    config: Config,
}

/// Returned by [`LoggerBuilder::build`]; holds the active filter directive.
#[derive(Debug)]
pub struct LoggerGuard {
    level: String,
    format: Format,
}

impl LoggerGuard {
    /// Filter directive the subscriber was installed with
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Output format of the installed subscriber
    pub fn format(&self) -> Format {
        self.format
    }
}

/// Installs `Registry + filter + fmt` as the global default.
macro_rules! init_subscriber {
    ($filter:expr, $fmt_layer:expr) => {
        Registry::default()
            .with($filter)
            .with($fmt_layer)
            .try_init()
            .map_err(|e| LogError::AlreadyInitialized(e.to_string()))
    };
}

impl LoggerBuilder {
    /// Create builder from config
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Parse the filter without installing anything
    pub fn filter(&self) -> LogResult<EnvFilter> {
        EnvFilter::try_new(&self.config.level)
            .map_err(|e| LogError::filter(&self.config.level, e.to_string()))
    }

    /// Build and install the global subscriber
    ///
    /// Fails with [`LogError::Filter`] when the level directive does not parse
    /// and [`LogError::AlreadyInitialized`] when another subscriber is active.
    pub fn build(self) -> LogResult<LoggerGuard> {
        let filter = self.filter()?;
        let ansi = self.config.ansi;

        match self.config.format {
            Format::Pretty => {
                let layer = fmt::layer()
                    .pretty()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr);
                init_subscriber!(filter, layer)?;
            }
            Format::Compact => {
                let layer = fmt::layer()
                    .compact()
                    .with_ansi(ansi)
                    .with_writer(std::io::stderr);
                init_subscriber!(filter, layer)?;
            }
            Format::Json => {
                let layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr);
                init_subscriber!(filter, layer)?;
            }
        }

        Ok(LoggerGuard {
            level: self.config.level,
            format: self.config.format,
        })
    }
}

/// Install a subscriber configured from the environment
pub fn init() -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(Config::from_env()).build()
}

/// Install a test-writer subscriber once per process
///
/// Safe to call from every test. Output goes through the libtest capture, and
/// the level follows `VARINTEROP_LOG`/`RUST_LOG` (default `debug`). If some
/// other subscriber is already installed it is left in place.
pub fn init_test() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let config = Config::from_env();
        let level = if std::env::var_os(crate::config::LEVEL_ENV).is_some()
            || std::env::var_os(crate::config::RUST_LOG_ENV).is_some()
        {
            config.level
        } else {
            "debug".to_string()
        };
        let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("debug"));

        let layer = fmt::layer().compact().with_ansi(false).with_test_writer();
        let _ = init_subscriber!(filter, layer);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter() {
        let err = LoggerBuilder::from_config(Config::default().with_level("varinterop=loud"))
            .build()
            .unwrap_err();
        assert!(matches!(err, LogError::Filter { .. }));
        assert!(err.to_string().contains("varinterop=loud"));
    }

    #[test]
    fn test_valid_filter_parses() {
        let builder = LoggerBuilder::from_config(
            Config::default().with_level("info,varinterop_content=trace"),
        );
        assert!(builder.filter().is_ok());
    }

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
        tracing::debug!(target: "varinterop_log", "Still alive");
    }
}
