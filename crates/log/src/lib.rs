//! # varinterop-log
//!
//! Subscriber bootstrap for binaries and tests. Library crates in this
//! workspace only emit `tracing` events; installing a subscriber is left to the
//! process that owns `main` (or to the test harness).
//!
//! ```rust,no_run
//! use varinterop_log::{Config, LoggerBuilder};
//!
//! let _guard = LoggerBuilder::from_config(Config::development()).build()?;
//! tracing::info!(kind = "real", "Logger ready");
//! # Ok::<(), varinterop_log::LogError>(())
//! ```

mod builder;
mod config;
mod error;

pub use builder::{LoggerBuilder, LoggerGuard, init, init_test};
pub use config::{Config, Format};
pub use error::{LogError, LogResult};

// Re-export tracing macros
pub use tracing::{debug, error, info, trace, warn};
