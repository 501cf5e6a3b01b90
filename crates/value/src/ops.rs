//! Arithmetic on scalar numeric values
//!
//! Operands widen along the implicit edges `Boolean -> Integer -> Real`. Two
//! integer-like operands stay integers with checked arithmetic; anything
//! involving a real is computed in `f64`.

use crate::convert::{boolean_to_integer, integer_to_real};
use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::Value;

#[derive(Copy, Clone, Debug)]
enum Operand {
    Integer(i64),
    Real(f64),
}

impl Operand {
    fn of(value: &Value, operation: &str) -> ValueResult<Self> {
        match value {
            Value::Integer(v) => Ok(Self::Integer(*v)),
            Value::Boolean(v) => Ok(Self::Integer(boolean_to_integer(*v))),
            Value::Real(v) => Ok(Self::Real(*v)),
            other => Err(ValueError::unsupported(operation, other.kind())),
        }
    }

    const fn real(self) -> f64 {
        match self {
            Self::Integer(v) => integer_to_real(v),
            Self::Real(v) => v,
        }
    }
}

fn binary(
    lhs: &Value,
    rhs: &Value,
    operation: &str,
    symbol: char,
    integer: fn(i64, i64) -> Option<i64>,
    real: fn(f64, f64) -> f64,
) -> ValueResult<Value> {
    let a = Operand::of(lhs, operation)?;
    let b = Operand::of(rhs, operation)?;

    match (a, b) {
        (Operand::Integer(x), Operand::Integer(y)) => integer(x, y)
            .map(Value::Integer)
            .ok_or_else(|| ValueError::overflow(format!("{x} {symbol} {y}"), ValueKind::Integer)),
        _ => Ok(Value::Real(real(a.real(), b.real()))),
    }
}

/// `lhs + rhs`
pub fn add(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    binary(lhs, rhs, "add", '+', i64::checked_add, |x, y| x + y)
}

/// `lhs - rhs`
pub fn sub(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    binary(lhs, rhs, "subtract", '-', i64::checked_sub, |x, y| x - y)
}

/// `lhs * rhs`
pub fn mul(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    binary(lhs, rhs, "multiply", '*', i64::checked_mul, |x, y| x * y)
}

/// `lhs / rhs`
///
/// Integer division truncates toward zero; dividing an integer by zero fails
/// with [`ValueError::Overflow`]. Real division follows IEEE-754.
pub fn div(lhs: &Value, rhs: &Value) -> ValueResult<Value> {
    binary(lhs, rhs, "divide", '/', i64::checked_div, |x, y| x / y)
}

/// `-value`
pub fn neg(value: &Value) -> ValueResult<Value> {
    match Operand::of(value, "negate")? {
        Operand::Integer(v) => v
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| ValueError::overflow(format!("-({v})"), ValueKind::Integer)),
        Operand::Real(v) => Ok(Value::Real(-v)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_widening() {
        assert_eq!(add(&Value::Integer(2), &Value::Integer(3)).unwrap(), Value::Integer(5));
        assert_eq!(add(&Value::Boolean(true), &Value::Boolean(true)).unwrap(), Value::Integer(2));
        assert_eq!(add(&Value::Integer(1), &Value::Real(0.5)).unwrap(), Value::Real(1.5));
        assert_eq!(mul(&Value::Boolean(true), &Value::Real(2.5)).unwrap(), Value::Real(2.5));
        assert_eq!(sub(&Value::Real(1.0), &Value::Integer(3)).unwrap(), Value::Real(-2.0));
    }

    #[test]
    fn test_integer_overflow_and_division_by_zero() {
        let err = add(&Value::Integer(i64::MAX), &Value::Integer(1)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Overflow);

        let err = div(&Value::Integer(1), &Value::Integer(0)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Overflow);

        let err = neg(&Value::Integer(i64::MIN)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Overflow);

        assert_eq!(div(&Value::Integer(-7), &Value::Integer(2)).unwrap(), Value::Integer(-3));
        assert_eq!(
            div(&Value::Real(1.0), &Value::Integer(0)).unwrap(),
            Value::Real(f64::INFINITY)
        );
    }

    #[test]
    fn test_non_numeric_operands() {
        let err = add(&Value::from("1"), &Value::Integer(1)).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::UnsupportedVariant);
        assert_eq!(neg(&Value::Boolean(true)).unwrap(), Value::Integer(-1));
    }
}
