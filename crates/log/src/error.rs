//! Error types for logger setup

use thiserror::Error;

/// Result type for logger operations
pub type LogResult<T> = Result<T, LogError>;

/// Logger setup failures
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LogError {
    /// The filter directive could not be parsed
    #[error("Invalid filter '{filter}': {reason}")]
    Filter {
        /// The directive as given
        filter: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed
    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

impl LogError {
    /// Create a filter error
    pub fn filter(filter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Filter {
            filter: filter.into(),
            reason: reason.into(),
        }
    }
}
