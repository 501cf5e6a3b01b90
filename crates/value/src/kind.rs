//! Value kinds
//!
//! `ValueKind` is a lightweight classification of [`Value`](crate::Value)
//! variants. It is the target parameter of conversions and decoders and has its
//! own dispatch point, [`ValueKind::accept`], for operations that are driven by
//! a kind rather than by a value (decoding, default construction).
//!
//! ```rust
//! use varinterop_value::ValueKind;
//!
//! let kind: ValueKind = "double[]".parse().unwrap();
//! assert_eq!(kind, ValueKind::RealArray);
//! assert_eq!(kind.element_kind(), ValueKind::Real);
//! assert!(kind.is_array());
//! ```

use core::fmt::{self, Display, Formatter};
use core::str::FromStr;

use crate::error::ValueError;
use crate::visitor::KindVisitor;

/// Represents the kind of a Value
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Real,
    Integer,
    Boolean,
    String,
    File,
    RealArray,
    IntegerArray,
    BooleanArray,
    StringArray,
}

impl ValueKind {
    /// All kinds, scalars first
    pub const ALL: [ValueKind; 9] = [
        Self::Real,
        Self::Integer,
        Self::Boolean,
        Self::String,
        Self::File,
        Self::RealArray,
        Self::IntegerArray,
        Self::BooleanArray,
        Self::StringArray,
    ];

    /// Check if this kind is an array kind
    pub const fn is_array(&self) -> bool {
        matches!(
            self,
            Self::RealArray | Self::IntegerArray | Self::BooleanArray | Self::StringArray
        )
    }

    /// Check if this kind is numeric (Boolean widens to Integer and Real)
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Real | Self::Integer | Self::Boolean)
    }

    /// Element kind of an array kind; scalars return themselves
    pub const fn element_kind(&self) -> Self {
        match self {
            Self::RealArray => Self::Real,
            Self::IntegerArray => Self::Integer,
            Self::BooleanArray => Self::Boolean,
            Self::StringArray => Self::String,
            other => *other,
        }
    }

    /// Array kind holding elements of this kind.
    ///
    /// Returns `None` for `File` (file arrays are not part of the variant set)
    /// and for kinds that already are arrays.
    pub const fn array_of(&self) -> Option<Self> {
        match self {
            Self::Real => Some(Self::RealArray),
            Self::Integer => Some(Self::IntegerArray),
            Self::Boolean => Some(Self::BooleanArray),
            Self::String => Some(Self::StringArray),
            _ => None,
        }
    }

    /// Get a descriptive name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::File => "file",
            Self::RealArray => "real[]",
            Self::IntegerArray => "integer[]",
            Self::BooleanArray => "boolean[]",
            Self::StringArray => "string[]",
        }
    }

    /// Fixed encoded size of one binary element, if the kind has one
    pub const fn binary_size_hint(&self) -> Option<usize> {
        match self {
            Self::Boolean => Some(1),
            Self::Integer | Self::Real => Some(8),
            _ => None,
        }
    }

    /// Dispatch on this kind
    pub fn accept<V: KindVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Self::Real => visitor.visit_real(),
            Self::Integer => visitor.visit_integer(),
            Self::Boolean => visitor.visit_boolean(),
            Self::String => visitor.visit_string(),
            Self::File => visitor.visit_file(),
            Self::RealArray => visitor.visit_real_array(),
            Self::IntegerArray => visitor.visit_integer_array(),
            Self::BooleanArray => visitor.visit_boolean_array(),
            Self::StringArray => visitor.visit_string_array(),
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let kind = match normalized.as_str() {
            "int" | "integer" | "long" => Self::Integer,
            "real" | "double" | "float" => Self::Real,
            "bool" | "boolean" => Self::Boolean,
            "str" | "string" => Self::String,
            "file" => Self::File,
            "int[]" | "integer[]" | "long[]" => Self::IntegerArray,
            "real[]" | "double[]" | "float[]" => Self::RealArray,
            "bool[]" | "boolean[]" => Self::BooleanArray,
            "str[]" | "string[]" => Self::StringArray,
            "file[]" => {
                return Err(ValueError::unsupported("file array", Self::File));
            }
            _ => {
                return Err(ValueError::invalid_argument(format!(
                    "unknown value kind '{}'",
                    s.trim()
                )));
            }
        };
        Ok(kind)
    }
}
