//! A value paired with its validity flag

use super::Value;
use crate::error::{ValueError, ValueResult};
use crate::metadata::Metadata;

/// A variable's value together with whether it is currently valid
///
/// An invalid state still carries the last value it held; callers that need
/// something usable go through [`VariableState::safe_value`].
#[derive(Debug, Clone, PartialEq)]
pub struct VariableState {
    value: Value,
    is_valid: bool,
}

impl VariableState {
    pub fn new(value: impl Into<Value>, is_valid: bool) -> Self {
        Self {
            value: value.into(),
            is_valid,
        }
    }

    pub fn valid(value: impl Into<Value>) -> Self {
        Self::new(value, true)
    }

    pub fn invalid(value: impl Into<Value>) -> Self {
        Self::new(value, false)
    }

    /// The held value, valid or not
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub const fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// The value if valid, otherwise the metadata's default
    ///
    /// Fails with [`ValueError::UnsupportedVariant`] when `metadata` describes
    /// another kind, and with [`ValueError::InvalidArgument`] when the state is
    /// invalid and the kind has no default (files).
    pub fn safe_value(&self, metadata: &Metadata) -> ValueResult<Value> {
        if metadata.kind() != self.value.kind() {
            return Err(ValueError::unsupported("safe_value", metadata.kind()));
        }
        if self.is_valid {
            return Ok(self.value.clone());
        }
        metadata.default_value().ok_or_else(|| {
            ValueError::invalid_argument(format!(
                "invalid {} state has no default value",
                self.value.kind()
            ))
        })
    }
}
