//! Metadata variant set
//!
//! One metadata type per value kind. Array kinds reuse the metadata of their
//! element kind, so a `RealArray` declaration carries a [`RealMetadata`].
//!
//! Metadata is descriptive only. It is consulted by display formatting and by
//! external validators through [`Metadata::check`]; conversions never look at
//! it.

mod common;
mod numeric;
mod scalar;

pub use common::{CommonMetadata, CustomMetadata};
pub use numeric::{Enumeration, IntegerMetadata, NumericElement, NumericMetadata, RealMetadata};
pub use scalar::{BooleanMetadata, FileMetadata, StringMetadata};

use serde::{Deserialize, Serialize};

use crate::convert::{ConversionMode, convert};
use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::{Array, Value};

/// Per-variant callbacks over a [`Metadata`]
pub trait MetadataVisitor {
    type Output;

    fn visit_real(&mut self, metadata: &RealMetadata) -> Self::Output;
    fn visit_integer(&mut self, metadata: &IntegerMetadata) -> Self::Output;
    fn visit_boolean(&mut self, metadata: &BooleanMetadata) -> Self::Output;
    fn visit_string(&mut self, metadata: &StringMetadata) -> Self::Output;
    fn visit_file(&mut self, metadata: &FileMetadata) -> Self::Output;
    fn visit_real_array(&mut self, metadata: &RealMetadata) -> Self::Output;
    fn visit_integer_array(&mut self, metadata: &IntegerMetadata) -> Self::Output;
    fn visit_boolean_array(&mut self, metadata: &BooleanMetadata) -> Self::Output;
    fn visit_string_array(&mut self, metadata: &StringMetadata) -> Self::Output;
}

/// Metadata attached to a variable declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Metadata {
    Real(RealMetadata),
    Integer(IntegerMetadata),
    Boolean(BooleanMetadata),
    String(StringMetadata),
    File(FileMetadata),
    RealArray(RealMetadata),
    IntegerArray(IntegerMetadata),
    BooleanArray(BooleanMetadata),
    StringArray(StringMetadata),
}

impl Metadata {
    /// Empty metadata for a kind
    pub fn for_kind(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Real => Self::Real(RealMetadata::new()),
            ValueKind::Integer => Self::Integer(IntegerMetadata::new()),
            ValueKind::Boolean => Self::Boolean(BooleanMetadata::new()),
            ValueKind::String => Self::String(StringMetadata::new()),
            ValueKind::File => Self::File(FileMetadata::default()),
            ValueKind::RealArray => Self::RealArray(RealMetadata::new()),
            ValueKind::IntegerArray => Self::IntegerArray(IntegerMetadata::new()),
            ValueKind::BooleanArray => Self::BooleanArray(BooleanMetadata::new()),
            ValueKind::StringArray => Self::StringArray(StringMetadata::new()),
        }
    }

    /// Kind of value this metadata describes
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

    /// Description and custom annotations
    pub const fn common(&self) -> &CommonMetadata {
        match self {
            Self::Real(m) | Self::RealArray(m) => &m.common,
            Self::Integer(m) | Self::IntegerArray(m) => &m.common,
            Self::Boolean(m) | Self::BooleanArray(m) => &m.common,
            Self::String(m) | Self::StringArray(m) => &m.common,
            Self::File(m) => &m.common,
        }
    }

    pub fn common_mut(&mut self) -> &mut CommonMetadata {
        match self {
            Self::Real(m) | Self::RealArray(m) => &mut m.common,
            Self::Integer(m) | Self::IntegerArray(m) => &mut m.common,
            Self::Boolean(m) | Self::BooleanArray(m) => &mut m.common,
            Self::String(m) | Self::StringArray(m) => &mut m.common,
            Self::File(m) => &mut m.common,
        }
    }

    /// Call the visitor method matching this metadata's variant
    pub fn accept<V: MetadataVisitor + ?Sized>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Real(m) => visitor.visit_real(m),
            Self::Integer(m) => visitor.visit_integer(m),
            Self::Boolean(m) => visitor.visit_boolean(m),
            Self::String(m) => visitor.visit_string(m),
            Self::File(m) => visitor.visit_file(m),
            Self::RealArray(m) => visitor.visit_real_array(m),
            Self::IntegerArray(m) => visitor.visit_integer_array(m),
            Self::BooleanArray(m) => visitor.visit_boolean_array(m),
            Self::StringArray(m) => visitor.visit_string_array(m),
        }
    }

    /// Default value satisfying this metadata where one exists
    ///
    /// Files have no default. Arrays default to an empty one-dimensional
    /// array.
    pub fn default_value(&self) -> Option<Value> {
        self.accept(&mut DefaultValue)
    }

    /// Convert `value` to this metadata's kind, allowing explicit edges
    pub fn runtime_convert(&self, value: &Value) -> ValueResult<Value> {
        convert(value, self.kind(), ConversionMode::AllowExplicit)
    }

    /// Advisory bounds and enumeration check
    ///
    /// Fails with [`ValueError::UnsupportedVariant`] when the value's kind
    /// differs from the metadata's, and with [`ValueError::InvalidArgument`]
    /// when a constraint is violated. Array elements are checked one by one.
    pub fn check(&self, value: &Value) -> ValueResult<()> {
        match (self, value) {
            (Self::Real(m), Value::Real(v)) => m.check(*v),
            (Self::Integer(m), Value::Integer(v)) => m.check(*v),
            (Self::String(m), Value::String(v)) => m.check(v),
            (Self::Boolean(_), Value::Boolean(_)) | (Self::File(_), Value::File(_)) => Ok(()),
            (Self::RealArray(m), Value::RealArray(a)) => check_elements(a, |v| m.check(*v)),
            (Self::IntegerArray(m), Value::IntegerArray(a)) => check_elements(a, |v| m.check(*v)),
            (Self::StringArray(m), Value::StringArray(a)) => check_elements(a, |v| m.check(v)),
            (Self::BooleanArray(_), Value::BooleanArray(_)) => Ok(()),
            _ => Err(ValueError::unsupported(
                format!("check against {} metadata", self.kind()),
                value.kind(),
            )),
        }
    }
}

fn check_elements<T>(
    array: &Array<T>,
    mut check: impl FnMut(&T) -> ValueResult<()>,
) -> ValueResult<()> {
    for (index, element) in array.iter().enumerate() {
        check(element).map_err(|e| ValueError::at_element(index, e))?;
    }
    Ok(())
}

impl From<RealMetadata> for Metadata {
    fn from(m: RealMetadata) -> Self {
        Self::Real(m)
    }
}

impl From<IntegerMetadata> for Metadata {
    fn from(m: IntegerMetadata) -> Self {
        Self::Integer(m)
    }
}

impl From<BooleanMetadata> for Metadata {
    fn from(m: BooleanMetadata) -> Self {
        Self::Boolean(m)
    }
}

impl From<StringMetadata> for Metadata {
    fn from(m: StringMetadata) -> Self {
        Self::String(m)
    }
}

impl From<FileMetadata> for Metadata {
    fn from(m: FileMetadata) -> Self {
        Self::File(m)
    }
}

/// Computes [`Metadata::default_value`]
struct DefaultValue;

impl MetadataVisitor for DefaultValue {
    type Output = Option<Value>;

    fn visit_real(&mut self, metadata: &RealMetadata) -> Self::Output {
        Some(Value::Real(metadata.default_value()))
    }

    fn visit_integer(&mut self, metadata: &IntegerMetadata) -> Self::Output {
        Some(Value::Integer(metadata.default_value()))
    }

    fn visit_boolean(&mut self, _: &BooleanMetadata) -> Self::Output {
        Some(Value::Boolean(false))
    }

    fn visit_string(&mut self, metadata: &StringMetadata) -> Self::Output {
        Some(Value::String(metadata.default_value()))
    }

    fn visit_file(&mut self, _: &FileMetadata) -> Self::Output {
        None
    }

    fn visit_real_array(&mut self, _: &RealMetadata) -> Self::Output {
        Some(Value::RealArray(Array::empty()))
    }

    fn visit_integer_array(&mut self, _: &IntegerMetadata) -> Self::Output {
        Some(Value::IntegerArray(Array::empty()))
    }

    fn visit_boolean_array(&mut self, _: &BooleanMetadata) -> Self::Output {
        Some(Value::BooleanArray(Array::empty()))
    }

    fn visit_string_array(&mut self, _: &StringMetadata) -> Self::Output {
        Some(Value::StringArray(Array::empty()))
    }
}
