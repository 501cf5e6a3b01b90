//! Conversion engine
//!
//! [`convert`] moves a value to a target kind along the edges published by
//! [`ConversionEdge`]. Implicit edges are always taken; explicit edges need
//! [`ConversionMode::AllowExplicit`]. Array conversions run element-wise,
//! keep the shape, and stop at the first failing element.
//!
//! ```rust
//! use varinterop_value::{ConversionMode, Value, ValueKind, convert};
//!
//! let v = convert(&Value::Real(3.9), ValueKind::Integer, ConversionMode::AllowExplicit)?;
//! assert_eq!(v, Value::Integer(3));
//!
//! let err = convert(&Value::Real(3.9), ValueKind::Integer, ConversionMode::ImplicitOnly);
//! assert!(err.is_err());
//! # Ok::<(), varinterop_value::ValueError>(())
//! ```

mod rules;
mod scalar;

pub use rules::{ConversionEdge, TypeCompatibility, linking_rules};
pub use scalar::{
    boolean_to_integer, boolean_to_real, integer_to_boolean, integer_to_real, real_to_boolean,
    real_to_integer,
};

use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::{Array, FileValue, Value};
use crate::visitor::ValueVisitor;

/// Which edges a conversion may take
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConversionMode {
    /// Only lossless, total edges
    #[default]
    ImplicitOnly,
    /// Lossy or fallible edges too
    AllowExplicit,
}

/// Convert `value` to `target`
///
/// Fails with [`ValueError::UnsupportedVariant`] when no edge exists, with
/// [`ValueError::DisallowedLossyConversion`] when only an explicit edge exists
/// and `mode` is [`ConversionMode::ImplicitOnly`], and with the edge's own
/// error (format, overflow) when the conversion itself fails.
pub fn convert(value: &Value, target: ValueKind, mode: ConversionMode) -> ValueResult<Value> {
    let source = value.kind();
    match ConversionEdge::between(source, target) {
        ConversionEdge::Identity => return Ok(value.clone()),
        ConversionEdge::Unsupported => {
            return Err(ValueError::unsupported(format!("convert to {target}"), source));
        }
        ConversionEdge::Explicit if mode == ConversionMode::ImplicitOnly => {
            tracing::debug!(from = %source, to = %target, "Explicit conversion refused");
            return Err(ValueError::disallowed_lossy(source, target));
        }
        ConversionEdge::Implicit | ConversionEdge::Explicit => {}
    }

    value.accept(&mut Converter { target }).inspect_err(|e| {
        tracing::debug!(from = %source, to = %target, error = %e, "Conversion failed");
    })
}

/// Convenience for [`convert`] with [`ConversionMode::ImplicitOnly`]
pub fn convert_implicit(value: &Value, target: ValueKind) -> ValueResult<Value> {
    convert(value, target, ConversionMode::ImplicitOnly)
}

/// Performs a conversion whose edge has already been checked
struct Converter {
    target: ValueKind,
}

impl Converter {
    fn unsupported(&self, source: ValueKind) -> ValueError {
        ValueError::unsupported(format!("convert to {}", self.target), source)
    }
}

impl ValueVisitor for Converter {
    type Output = ValueResult<Value>;

    fn visit_real(&mut self, value: f64) -> Self::Output {
        match self.target {
            ValueKind::Integer => real_to_integer(value).map(Value::Integer),
            ValueKind::Boolean => Ok(Value::Boolean(real_to_boolean(value))),
            ValueKind::String => Ok(Value::String(scalar::real_to_string(value))),
            _ => Err(self.unsupported(ValueKind::Real)),
        }
    }

    fn visit_integer(&mut self, value: i64) -> Self::Output {
        match self.target {
            ValueKind::Real => Ok(Value::Real(integer_to_real(value))),
            ValueKind::Boolean => Ok(Value::Boolean(integer_to_boolean(value))),
            ValueKind::String => Ok(Value::String(value.to_string())),
            _ => Err(self.unsupported(ValueKind::Integer)),
        }
    }

    fn visit_boolean(&mut self, value: bool) -> Self::Output {
        match self.target {
            ValueKind::Real => Ok(Value::Real(boolean_to_real(value))),
            ValueKind::Integer => Ok(Value::Integer(boolean_to_integer(value))),
            ValueKind::String => Ok(Value::String(scalar::boolean_to_string(value))),
            _ => Err(self.unsupported(ValueKind::Boolean)),
        }
    }

    fn visit_string(&mut self, value: &str) -> Self::Output {
        match self.target {
            ValueKind::Real => scalar::string_to_real(value).map(Value::Real),
            ValueKind::Integer => scalar::string_to_integer(value).map(Value::Integer),
            ValueKind::Boolean => scalar::string_to_boolean(value).map(Value::Boolean),
            _ => Err(self.unsupported(ValueKind::String)),
        }
    }

    fn visit_file(&mut self, _: &FileValue) -> Self::Output {
        Err(self.unsupported(ValueKind::File))
    }

    fn visit_real_array(&mut self, value: &Array<f64>) -> Self::Output {
        match self.target {
            ValueKind::IntegerArray => value.try_map(|v| real_to_integer(*v)).map(Value::from),
            ValueKind::BooleanArray => Ok(Value::from(value.map(|v| real_to_boolean(*v)))),
            ValueKind::StringArray => Ok(Value::from(value.map(|v| scalar::real_to_string(*v)))),
            _ => Err(self.unsupported(ValueKind::RealArray)),
        }
    }

    fn visit_integer_array(&mut self, value: &Array<i64>) -> Self::Output {
        match self.target {
            ValueKind::RealArray => Ok(Value::from(value.map(|v| integer_to_real(*v)))),
            ValueKind::BooleanArray => Ok(Value::from(value.map(|v| integer_to_boolean(*v)))),
            ValueKind::StringArray => Ok(Value::from(value.map(ToString::to_string))),
            _ => Err(self.unsupported(ValueKind::IntegerArray)),
        }
    }

    fn visit_boolean_array(&mut self, value: &Array<bool>) -> Self::Output {
        match self.target {
            ValueKind::RealArray => Ok(Value::from(value.map(|v| boolean_to_real(*v)))),
            ValueKind::IntegerArray => Ok(Value::from(value.map(|v| boolean_to_integer(*v)))),
            ValueKind::StringArray => {
                Ok(Value::from(value.map(|v| scalar::boolean_to_string(*v))))
            }
            _ => Err(self.unsupported(ValueKind::BooleanArray)),
        }
    }

    fn visit_string_array(&mut self, value: &Array<String>) -> Self::Output {
        match self.target {
            ValueKind::RealArray => value.try_map(|v| scalar::string_to_real(v)).map(Value::from),
            ValueKind::IntegerArray => {
                value.try_map(|v| scalar::string_to_integer(v)).map(Value::from)
            }
            ValueKind::BooleanArray => {
                value.try_map(|v| scalar::string_to_boolean(v)).map(Value::from)
            }
            _ => Err(self.unsupported(ValueKind::StringArray)),
        }
    }
}
