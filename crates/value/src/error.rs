//! Value error types
//!
//! Every operation in this crate reports failures through [`ValueError`].
//! Variants map one-to-one onto the interchange error taxonomy; array
//! operations wrap the first failing element in [`ValueError::ArrayElement`].

use thiserror::Error;

use crate::kind::ValueKind;

/// Result type alias for value operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Value errors
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// Bad constructor input (shape mismatch, misaligned enumeration, ...)
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Malformed API string input
    #[error("Invalid {kind} format: {input:?}")]
    Format {
        kind: ValueKind,
        input: String,
        position: Option<usize>,
    },

    /// Numeric conversion or parse outside the representable range
    #[error("Numeric overflow converting {value} to {target}")]
    Overflow { value: String, target: ValueKind },

    /// The requested conversion or visitor path does not exist
    #[error("Operation '{operation}' not supported for {kind}")]
    UnsupportedVariant {
        operation: String,
        kind: ValueKind,
    },

    /// Truncated, over-long or corrupt binary block
    #[error("Malformed {kind} binary block at offset {offset}: {reason}")]
    MalformedBinary {
        kind: ValueKind,
        offset: usize,
        reason: String,
    },

    /// Only an explicit (lossy or fallible) conversion path exists
    #[error("Conversion from {from} to {to} is lossy; explicit conversion required")]
    DisallowedLossyConversion { from: ValueKind, to: ValueKind },

    /// An array element failed; carries the element's row-major index
    #[error("Array element {index}: {source}")]
    ArrayElement {
        index: usize,
        #[source]
        source: Box<ValueError>,
    },
}

/// Coarse error category, looking through array element wrappers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InvalidArgument,
    Format,
    Overflow,
    UnsupportedVariant,
    MalformedBinary,
    DisallowedLossyConversion,
}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValueError {
    /// Create an invalid argument error
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Create a format error
    pub fn format(kind: ValueKind, input: impl Into<String>) -> Self {
        Self::Format {
            kind,
            input: input.into(),
            position: None,
        }
    }

    /// Create a format error pointing at a byte position of the input
    pub fn format_at(kind: ValueKind, input: impl Into<String>, position: usize) -> Self {
        Self::Format {
            kind,
            input: input.into(),
            position: Some(position),
        }
    }

    /// Create an overflow error
    pub fn overflow(value: impl ToString, target: ValueKind) -> Self {
        Self::Overflow {
            value: value.to_string(),
            target,
        }
    }

    /// Create an unsupported variant error
    pub fn unsupported(operation: impl Into<String>, kind: ValueKind) -> Self {
        Self::UnsupportedVariant {
            operation: operation.into(),
            kind,
        }
    }

    /// Create a malformed binary error
    pub fn malformed_binary(kind: ValueKind, offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedBinary {
            kind,
            offset,
            reason: reason.into(),
        }
    }

    /// Create a disallowed lossy conversion error
    pub fn disallowed_lossy(from: ValueKind, to: ValueKind) -> Self {
        Self::DisallowedLossyConversion { from, to }
    }

    /// Wrap an element failure with its flat index
    pub fn at_element(index: usize, source: ValueError) -> Self {
        Self::ArrayElement {
            index,
            source: Box::new(source),
        }
    }

    /// Error category, looking through [`ValueError::ArrayElement`]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument { .. } => ErrorCategory::InvalidArgument,
            Self::Format { .. } => ErrorCategory::Format,
            Self::Overflow { .. } => ErrorCategory::Overflow,
            Self::UnsupportedVariant { .. } => ErrorCategory::UnsupportedVariant,
            Self::MalformedBinary { .. } => ErrorCategory::MalformedBinary,
            Self::DisallowedLossyConversion { .. } => ErrorCategory::DisallowedLossyConversion,
            Self::ArrayElement { source, .. } => source.category(),
        }
    }

    /// Index of the failing array element, if any
    pub fn element_index(&self) -> Option<usize> {
        match self {
            Self::ArrayElement { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Innermost error, skipping array element wrappers
    pub fn root(&self) -> &ValueError {
        match self {
            Self::ArrayElement { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether a caller may reasonably retry with different input or mode.
    ///
    /// Invalid constructor arguments and unsupported variants are programming
    /// errors; everything else is recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self.category(),
            ErrorCategory::InvalidArgument | ErrorCategory::UnsupportedVariant
        )
    }
}
