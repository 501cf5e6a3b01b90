//! The closed value variant set
//!
//! [`Value`] is a sum type over the nine interchange kinds. Values are
//! immutable: every operation in this crate takes `&Value` and returns a new
//! one. Equality is per variant with IEEE-754 semantics for reals, so
//! `Real(NaN) != Real(NaN)`; use [`Value::identical`] where NaN must match
//! itself.

mod array;
mod file;
mod state;

pub use array::{Array, Shape};
pub(crate) use array::element_count;
pub use file::{ContentId, FileValue};
pub use state::VariableState;

use std::cmp::Ordering;
use std::fmt;

use crate::kind::ValueKind;
use crate::visitor::ValueVisitor;

/// Interchange value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 64-bit IEEE-754 double
    Real(f64),

    /// 64-bit two's-complement integer
    Integer(i64),

    Boolean(bool),

    /// UTF-8 text
    String(String),

    /// Reference to stored file content
    File(FileValue),

    RealArray(Array<f64>),
    IntegerArray(Array<i64>),
    BooleanArray(Array<bool>),
    StringArray(Array<String>),
}

impl Value {
    // ==================== Constructors ====================

    /// Create a real value
    pub const fn real(v: f64) -> Self {
        Self::Real(v)
    }

    /// Create an integer value
    pub const fn integer(v: i64) -> Self {
        Self::Integer(v)
    }

    /// Create a boolean value
    pub const fn boolean(v: bool) -> Self {
        Self::Boolean(v)
    }

    /// Create a string value from String or &str
    pub fn string(v: impl Into<String>) -> Self {
        Self::String(v.into())
    }

    // ==================== Type queries ====================

    /// Kind of this value
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Real(_) => ValueKind::Real,
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::String(_) => ValueKind::String,
            Self::File(_) => ValueKind::File,
            Self::RealArray(_) => ValueKind::RealArray,
            Self::IntegerArray(_) => ValueKind::IntegerArray,
            Self::BooleanArray(_) => ValueKind::BooleanArray,
            Self::StringArray(_) => ValueKind::StringArray,
        }
    }

    /// Check if this value is an array
    pub const fn is_array(&self) -> bool {
        self.kind().is_array()
    }

    /// Shape of an array value; `None` for scalars
    pub fn shape(&self) -> Option<&[usize]> {
        match self {
            Self::RealArray(a) => Some(a.shape()),
            Self::IntegerArray(a) => Some(a.shape()),
            Self::BooleanArray(a) => Some(a.shape()),
            Self::StringArray(a) => Some(a.shape()),
            _ => None,
        }
    }

    // ==================== Dispatch ====================

    /// Call the visitor method matching this value's variant
    pub fn accept<V: ValueVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Real(v) => visitor.visit_real(*v),
            Self::Integer(v) => visitor.visit_integer(*v),
            Self::Boolean(v) => visitor.visit_boolean(*v),
            Self::String(v) => visitor.visit_string(v),
            Self::File(v) => visitor.visit_file(v),
            Self::RealArray(v) => visitor.visit_real_array(v),
            Self::IntegerArray(v) => visitor.visit_integer_array(v),
            Self::BooleanArray(v) => visitor.visit_boolean_array(v),
            Self::StringArray(v) => visitor.visit_string_array(v),
        }
    }

    // ==================== Comparison ====================

    /// Variant equality where NaN equals NaN
    ///
    /// This is the equality of the codec round-trip law. Everything else
    /// compares like `==`.
    pub fn identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => reals_identical(*a, *b),
            (Self::RealArray(a), Self::RealArray(b)) => {
                a.shape() == b.shape()
                    && a.iter().zip(b.iter()).all(|(x, y)| reals_identical(*x, *y))
            }
            _ => self == other,
        }
    }

    // ==================== Accessors ====================

    /// Get as real if this is a Real value
    pub const fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as integer if this is an Integer value
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as boolean if this is a Boolean value
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_file(&self) -> Option<&FileValue> {
        match self {
            Self::File(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_real_array(&self) -> Option<&Array<f64>> {
        match self {
            Self::RealArray(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_integer_array(&self) -> Option<&Array<i64>> {
        match self {
            Self::IntegerArray(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_boolean_array(&self) -> Option<&Array<bool>> {
        match self {
            Self::BooleanArray(v) => Some(v),
            _ => None,
        }
    }

    pub const fn as_string_array(&self) -> Option<&Array<String>> {
        match self {
            Self::StringArray(v) => Some(v),
            _ => None,
        }
    }
}

fn reals_identical(a: f64, b: f64) -> bool {
    (a.is_nan() && b.is_nan()) || a == b
}

impl PartialOrd for Value {
    /// Ordering exists only between values of the same variant.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Real(a), Self::Real(b)) => a.partial_cmp(b),
            (Self::Integer(a), Self::Integer(b)) => a.partial_cmp(b),
            (Self::Boolean(a), Self::Boolean(b)) => a.partial_cmp(b),
            (Self::String(a), Self::String(b)) => a.partial_cmp(b),
            (Self::File(a), Self::File(b)) => a.partial_cmp(b),
            (Self::RealArray(a), Self::RealArray(b)) => a.partial_cmp(b),
            (Self::IntegerArray(a), Self::IntegerArray(b)) => a.partial_cmp(b),
            (Self::BooleanArray(a), Self::BooleanArray(b)) => a.partial_cmp(b),
            (Self::StringArray(a), Self::StringArray(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Formats as the API string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::codec::api::to_api_string(self))
    }
}

// ==================== From impls ====================

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<FileValue> for Value {
    fn from(v: FileValue) -> Self {
        Self::File(v)
    }
}

impl From<Array<f64>> for Value {
    fn from(v: Array<f64>) -> Self {
        Self::RealArray(v)
    }
}

impl From<Array<i64>> for Value {
    fn from(v: Array<i64>) -> Self {
        Self::IntegerArray(v)
    }
}

impl From<Array<bool>> for Value {
    fn from(v: Array<bool>) -> Self {
        Self::BooleanArray(v)
    }
}

impl From<Array<String>> for Value {
    fn from(v: Array<String>) -> Self {
        Self::StringArray(v)
    }
}
