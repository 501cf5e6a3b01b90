//! Double dispatch over the closed variant set
//!
//! New cross-cutting operations (conversions, codecs, comparisons) are written
//! as a type implementing [`ValueVisitor`] and run with
//! [`Value::accept`](crate::Value::accept). The variant definitions never
//! change when an operation is added. Adding a variant is the breaking
//! direction: every visitor gains a method.
//!
//! A visitor that has no meaningful answer for a variant returns
//! [`ValueError::UnsupportedVariant`](crate::ValueError::UnsupportedVariant)
//! from that method instead of guessing.
//!
//! ```rust
//! use varinterop_value::{Array, FileValue, Value, ValueVisitor};
//!
//! /// Counts scalar cells: 1 for scalars, element count for arrays.
//! struct CellCount;
//!
//! impl ValueVisitor for CellCount {
//!     type Output = usize;
//!
//!     fn visit_real(&mut self, _: f64) -> usize { 1 }
//!     fn visit_integer(&mut self, _: i64) -> usize { 1 }
//!     fn visit_boolean(&mut self, _: bool) -> usize { 1 }
//!     fn visit_string(&mut self, _: &str) -> usize { 1 }
//!     fn visit_file(&mut self, _: &FileValue) -> usize { 1 }
//!     fn visit_real_array(&mut self, a: &Array<f64>) -> usize { a.len() }
//!     fn visit_integer_array(&mut self, a: &Array<i64>) -> usize { a.len() }
//!     fn visit_boolean_array(&mut self, a: &Array<bool>) -> usize { a.len() }
//!     fn visit_string_array(&mut self, a: &Array<String>) -> usize { a.len() }
//! }
//!
//! let v = Value::from(Array::from_vec(vec![1_i64, 2, 3]));
//! assert_eq!(v.accept(&mut CellCount), 3);
//! ```

use crate::value::{Array, FileValue};

/// Per-variant callbacks over a [`Value`](crate::Value)
pub trait ValueVisitor {
    /// Result of visiting a value
    type Output;

    fn visit_real(&mut self, value: f64) -> Self::Output;
    fn visit_integer(&mut self, value: i64) -> Self::Output;
    fn visit_boolean(&mut self, value: bool) -> Self::Output;
    fn visit_string(&mut self, value: &str) -> Self::Output;
    fn visit_file(&mut self, value: &FileValue) -> Self::Output;
    fn visit_real_array(&mut self, value: &Array<f64>) -> Self::Output;
    fn visit_integer_array(&mut self, value: &Array<i64>) -> Self::Output;
    fn visit_boolean_array(&mut self, value: &Array<bool>) -> Self::Output;
    fn visit_string_array(&mut self, value: &Array<String>) -> Self::Output;
}

/// Per-kind callbacks over a [`ValueKind`](crate::ValueKind)
///
/// Used where an operation is selected by a target kind and there is no value
/// yet, e.g. decoders.
pub trait KindVisitor {
    /// Result of visiting a kind
    type Output;

    fn visit_real(&mut self) -> Self::Output;
    fn visit_integer(&mut self) -> Self::Output;
    fn visit_boolean(&mut self) -> Self::Output;
    fn visit_string(&mut self) -> Self::Output;
    fn visit_file(&mut self) -> Self::Output;
    fn visit_real_array(&mut self) -> Self::Output;
    fn visit_integer_array(&mut self) -> Self::Output;
    fn visit_boolean_array(&mut self) -> Self::Output;
    fn visit_string_array(&mut self) -> Self::Output;
}
