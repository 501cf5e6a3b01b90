//! Locale-invariant scalar text
//!
//! Formatting and parsing of the scalar API-string forms. Reals use the
//! shortest digit string that reads back to the same double, in positional
//! notation for decimal exponents in `[-4, 16)` and `d.ddde+XX` otherwise.

use std::num::IntErrorKind;

use crate::convert::real_to_integer;
use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;

pub const NAN_TOKEN: &str = "NaN";
pub const INFINITY_TOKEN: &str = "Infinity";
pub const NEG_INFINITY_TOKEN: &str = "-Infinity";

pub const TRUE_TOKEN: &str = "True";
pub const FALSE_TOKEN: &str = "False";

/// Smallest and largest decimal exponents written positionally
const POSITIONAL_EXPONENTS: std::ops::Range<i32> = -4..16;

// ============================================================================
// FORMATTING
// ============================================================================

/// Format a real with round-trip precision
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return NAN_TOKEN.to_owned();
    }
    if value.is_infinite() {
        let token = if value > 0.0 {
            INFINITY_TOKEN
        } else {
            NEG_INFINITY_TOKEN
        };
        return token.to_owned();
    }

    // `{:e}` yields the shortest round-trip digits, e.g. "-1.25e-7"
    let scientific = format!("{value:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut out = String::with_capacity(digits.len() + 8);
    out.push_str(sign);
    if POSITIONAL_EXPONENTS.contains(&exponent) {
        push_positional(&mut out, &digits, exponent);
    } else {
        push_scientific(&mut out, &digits, exponent);
    }
    out
}

fn push_positional(out: &mut String, digits: &str, exponent: i32) {
    if exponent < 0 {
        out.push_str("0.");
        for _ in 0..exponent.unsigned_abs() - 1 {
            out.push('0');
        }
        out.push_str(digits);
        return;
    }

    let integral_len = exponent as usize + 1;
    if digits.len() <= integral_len {
        out.push_str(digits);
        for _ in digits.len()..integral_len {
            out.push('0');
        }
        out.push_str(".0");
    } else {
        let (integral, fraction) = digits.split_at(integral_len);
        out.push_str(integral);
        out.push('.');
        out.push_str(fraction);
    }
}

fn push_scientific(out: &mut String, digits: &str, exponent: i32) {
    let (first, rest) = digits.split_at(1.min(digits.len()));
    out.push_str(first);
    if !rest.is_empty() {
        out.push('.');
        out.push_str(rest);
    }
    out.push('e');
    out.push(if exponent < 0 { '-' } else { '+' });
    out.push_str(&format!("{:02}", exponent.unsigned_abs()));
}

pub const fn format_boolean(value: bool) -> &'static str {
    if value { TRUE_TOKEN } else { FALSE_TOKEN }
}

// ============================================================================
// PARSING
// ============================================================================

/// Parse a real
///
/// Accepts decimal and scientific notation plus the special tokens
/// (`NaN`, `Infinity`, `-Infinity`, `inf`, ...) in any case. Finite-looking
/// text beyond the double range fails with [`ValueError::Overflow`].
pub fn parse_real(text: &str) -> ValueResult<f64> {
    let trimmed = text.trim();
    if let Some(special) = special_real(trimmed) {
        return Ok(special);
    }

    let well_formed = !trimmed.is_empty()
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !well_formed {
        return Err(ValueError::format(ValueKind::Real, text));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| ValueError::format(ValueKind::Real, text))?;
    if value.is_infinite() {
        return Err(ValueError::overflow(trimmed, ValueKind::Real));
    }
    Ok(value)
}

fn special_real(text: &str) -> Option<f64> {
    match text.to_ascii_lowercase().as_str() {
        "nan" | "+nan" | "-nan" => Some(f64::NAN),
        "inf" | "+inf" | "infinity" | "+infinity" => Some(f64::INFINITY),
        "-inf" | "-infinity" => Some(f64::NEG_INFINITY),
        _ => None,
    }
}

/// Parse an integer
///
/// Text that reads as a real (a decimal point, an exponent or a special
/// token) is parsed as a real and truncated toward zero.
pub fn parse_integer(text: &str) -> ValueResult<i64> {
    let trimmed = text.trim();

    if looks_real(trimmed) {
        let real = parse_real(trimmed).map_err(|e| as_integer_error(e, text))?;
        return real_to_integer(real);
    }

    trimmed.parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ValueError::overflow(trimmed, ValueKind::Integer)
        }
        _ => ValueError::format(ValueKind::Integer, text),
    })
}

fn looks_real(text: &str) -> bool {
    text.contains(['.', 'e', 'E']) || special_real(text).is_some()
}

fn as_integer_error(error: ValueError, text: &str) -> ValueError {
    match error {
        ValueError::Format { .. } => ValueError::format(ValueKind::Integer, text),
        ValueError::Overflow { value, .. } => ValueError::overflow(value, ValueKind::Integer),
        other => other,
    }
}

/// Parse a boolean
///
/// Accepts `true`/`yes`/`y` and `false`/`no`/`n` in any case, otherwise
/// numeric text where any non-zero value is true.
pub fn parse_boolean(text: &str) -> ValueResult<bool> {
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Ok(true),
        "false" | "no" | "n" => Ok(false),
        _ => parse_real(trimmed)
            .map(|v| v != 0.0)
            .map_err(|_| ValueError::format(ValueKind::Boolean, text)),
    }
}
