//! Content store errors

use std::time::Duration;

use thiserror::Error;
use varinterop_value::ContentId;

/// Result type for content store operations
pub type Result<T> = std::result::Result<T, ContentError>;

/// Content store errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    // ========================================================================
    // Lookup
    // ========================================================================
    /// No backing content for this identity (never stored, released, or the
    /// temp file was removed underneath the store)
    #[error("Content unavailable: {id}")]
    ContentUnavailable {
        /// Identity that failed to resolve
        id: ContentId,
    },

    // ========================================================================
    // I/O
    // ========================================================================
    /// Backing storage failed
    #[error("I/O error during {operation}: {source}")]
    Io {
        /// Operation that failed
        operation: &'static str,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A backing read or write exceeded `io_timeout`
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        /// Operation that timed out
        operation: &'static str,
        /// Configured limit
        after: Duration,
    },

    /// The caller's cancellation token fired first
    #[error("{operation} cancelled")]
    Cancelled {
        /// Operation that was abandoned
        operation: &'static str,
    },

    // ========================================================================
    // Configuration
    // ========================================================================
    /// Invalid store configuration
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

impl ContentError {
    /// Create an I/O error
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    /// Create a configuration error
    pub fn invalid_config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Timeout { .. } | Self::Cancelled { .. })
    }
}
