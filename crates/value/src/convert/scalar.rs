//! Scalar conversion primitives

use crate::codec::text;
use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;

/// 2^63, the first double above `i64::MAX`
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

/// Truncate toward zero
///
/// Fails with [`ValueError::Overflow`] for NaN, infinities and values whose
/// integral part lies outside the `i64` range.
pub fn real_to_integer(value: f64) -> ValueResult<i64> {
    let truncated = value.trunc();
    if !truncated.is_finite() || truncated < -TWO_POW_63 || truncated >= TWO_POW_63 {
        return Err(ValueError::overflow(
            text::format_real(value),
            ValueKind::Integer,
        ));
    }
    Ok(truncated as i64)
}

/// Nearest double; exact up to 2^53 in magnitude
pub const fn integer_to_real(value: i64) -> f64 {
    value as f64
}

pub const fn integer_to_boolean(value: i64) -> bool {
    value != 0
}

pub const fn boolean_to_integer(value: bool) -> i64 {
    value as i64
}

pub const fn boolean_to_real(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

/// Zero is false; everything else, NaN included, is true
pub fn real_to_boolean(value: f64) -> bool {
    value != 0.0
}

pub(crate) fn real_to_string(value: f64) -> String {
    text::format_real(value)
}

pub(crate) fn boolean_to_string(value: bool) -> String {
    text::format_boolean(value).to_owned()
}

pub(crate) fn string_to_real(value: &str) -> ValueResult<f64> {
    text::parse_real(value)
}

pub(crate) fn string_to_integer(value: &str) -> ValueResult<i64> {
    text::parse_integer(value)
}

pub(crate) fn string_to_boolean(value: &str) -> ValueResult<bool> {
    text::parse_boolean(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_to_integer_range_edges() {
        assert_eq!(real_to_integer(-TWO_POW_63).unwrap(), i64::MIN);
        assert!(real_to_integer(TWO_POW_63).is_err());
        assert_eq!(
            real_to_integer(9_223_372_036_854_774_784.0).unwrap(),
            9_223_372_036_854_774_784
        );
        assert_eq!(real_to_integer(-0.99).unwrap(), 0);
        assert!(real_to_integer(f64::NAN).is_err());
        assert!(real_to_integer(f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_integer_to_real_rounds_to_nearest() {
        assert_eq!(integer_to_real(1 << 53), 9_007_199_254_740_992.0);
        assert_eq!(integer_to_real((1 << 53) + 1), 9_007_199_254_740_992.0);
        assert_eq!(integer_to_real(i64::MAX), TWO_POW_63);
    }

    #[test]
    fn test_boolean_edges() {
        assert!(real_to_boolean(f64::NAN));
        assert!(!real_to_boolean(-0.0));
        assert!(integer_to_boolean(-1));
        assert_eq!(boolean_to_integer(true), 1);
        assert_eq!(boolean_to_real(false), 0.0);
    }
}
