//! Display strings
//!
//! Text for people, not for parsing back. Reals default to `%.15G`. When
//! metadata of the value's kind is supplied, its `display_format`, `units` and
//! enumeration aliases are honored; metadata of another kind is ignored.
//! A [`DisplayLocale`] swaps the decimal separator and can group integer
//! digits; the API string is never localized.

use super::array_text;
use super::text;
use crate::error::{ValueError, ValueResult};
use crate::metadata::{IntegerMetadata, Metadata, RealMetadata, StringMetadata};
use crate::value::{Array, FileValue, Value};
use crate::visitor::ValueVisitor;

/// Hex digits of the content id shown for files
const FILE_ID_DIGITS: usize = 12;

/// Largest precision a display format may request
pub const MAX_PRECISION: usize = 64;

/// Render a value for presentation
pub fn to_display_string(value: &Value, metadata: Option<&Metadata>) -> String {
    value.accept(&mut DisplayFormatter::new(metadata))
}

/// Render a value for presentation in `locale`
pub fn to_localized_display_string(
    value: &Value,
    metadata: Option<&Metadata>,
    locale: DisplayLocale,
) -> String {
    value.accept(&mut DisplayFormatter::new(metadata).with_locale(locale))
}

/// Number punctuation for display strings
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DisplayLocale {
    decimal_separator: char,
    grouping_separator: char,
    grouping: bool,
}

impl Default for DisplayLocale {
    fn default() -> Self {
        Self::INVARIANT
    }
}

impl DisplayLocale {
    /// `1234.5`
    pub const INVARIANT: Self = Self::new('.', ',');

    /// Decimal and thousands separators; grouping starts disabled
    pub const fn new(decimal_separator: char, grouping_separator: char) -> Self {
        Self {
            decimal_separator,
            grouping_separator,
            grouping: false,
        }
    }

    /// Look up a POSIX-style locale name such as `de_DE.UTF-8` or `fr-FR`
    ///
    /// Only the language part is consulted. Unknown languages are
    /// [`ValueError::InvalidArgument`].
    pub fn from_name(name: &str) -> ValueResult<Self> {
        let trimmed = name.trim();
        let language = trimmed
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let (decimal, grouping) = match language.as_str() {
            "" | "c" | "posix" | "en" | "ja" | "ko" | "zh" | "he" | "th" => ('.', ','),
            "de" | "it" | "es" | "nl" | "pt" | "da" | "id" | "tr" | "el" => (',', '.'),
            "fr" | "ru" | "pl" | "cs" | "sk" | "fi" | "sv" | "nb" | "uk" | "hu" => {
                (',', '\u{a0}')
            }
            _ => {
                return Err(ValueError::invalid_argument(format!(
                    "unknown locale '{trimmed}'"
                )));
            }
        };
        Ok(Self::new(decimal, grouping))
    }

    /// Enable or disable digit grouping of the integral part
    pub const fn with_grouping(mut self, grouping: bool) -> Self {
        self.grouping = grouping;
        self
    }

    pub const fn decimal_separator(&self) -> char {
        self.decimal_separator
    }

    pub const fn grouping_separator(&self) -> char {
        self.grouping_separator
    }

    pub const fn is_grouping(&self) -> bool {
        self.grouping
    }

    /// Re-punctuate a number produced by [`NumberFormat`]
    ///
    /// Text that does not start with a digit after its sign (`NaN`,
    /// `Infinity`) is returned unchanged.
    pub fn apply(&self, number: &str) -> String {
        if *self == Self::INVARIANT {
            return number.to_owned();
        }

        let (sign, unsigned) = match number.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", number),
        };
        if !unsigned.starts_with(|c: char| c.is_ascii_digit()) {
            return number.to_owned();
        }

        let split = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        let (integral, rest) = unsigned.split_at(split);

        let mut out = String::with_capacity(number.len() + integral.len() / 3);
        out.push_str(sign);
        if self.grouping {
            for (i, digit) in integral.chars().enumerate() {
                if i > 0 && (integral.len() - i) % 3 == 0 {
                    out.push(self.grouping_separator);
                }
                out.push(digit);
            }
        } else {
            out.push_str(integral);
        }
        match rest.strip_prefix('.') {
            Some(fraction) => {
                out.push(self.decimal_separator);
                out.push_str(fraction);
            }
            None => out.push_str(rest),
        }
        out
    }
}

/// printf-style numeric format
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NumberFormat {
    /// `%.<n>f`
    Fixed(usize),
    /// `%.<n>e` / `%.<n>E`
    Exponent { precision: usize, upper: bool },
    /// `%.<n>g` / `%.<n>G`
    General { precision: usize, upper: bool },
    /// `%d`
    Integer,
}

impl NumberFormat {
    /// `%.15G`
    pub const DEFAULT_REAL: Self = Self::General {
        precision: 15,
        upper: true,
    };

    /// Parse a format such as `%.3f`
    ///
    /// `None` when the conversion is unsupported or the precision exceeds
    /// [`MAX_PRECISION`].
    pub fn parse(spec: &str) -> Option<Self> {
        let body = spec.trim().strip_prefix('%')?;
        let (precision, conversion) = match body.strip_prefix('.') {
            Some(rest) => {
                let digits =
                    rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
                let (digits, conversion) = rest.split_at(digits);
                let precision = if digits.is_empty() {
                    0
                } else {
                    digits.parse::<usize>().ok()?
                };
                if precision > MAX_PRECISION {
                    return None;
                }
                (Some(precision), conversion)
            }
            None => (None, body),
        };
        let precision_or_default = precision.unwrap_or(6);

        match conversion {
            "f" | "F" => Some(Self::Fixed(precision_or_default)),
            "e" | "E" => Some(Self::Exponent {
                precision: precision_or_default,
                upper: conversion == "E",
            }),
            "g" | "G" => Some(Self::General {
                precision: precision_or_default,
                upper: conversion == "G",
            }),
            "d" | "i" if precision.is_none() => Some(Self::Integer),
            _ => None,
        }
    }

    /// Format a real; precisions above [`MAX_PRECISION`] are clamped
    pub fn format_real(self, value: f64) -> String {
        if !value.is_finite() {
            return text::format_real(value);
        }

        match self.clamped() {
            Self::Fixed(precision) => format!("{value:.precision$}"),
            Self::Exponent { precision, upper } => {
                c_exponent(&format!("{value:.precision$e}"), upper)
            }
            Self::General { precision, upper } => format_general(value, precision, upper),
            Self::Integer => format!("{value:.0}"),
        }
    }

    /// Same format with its precision capped at [`MAX_PRECISION`]
    pub const fn clamped(self) -> Self {
        const fn cap(precision: usize) -> usize {
            if precision > MAX_PRECISION {
                MAX_PRECISION
            } else {
                precision
            }
        }

        match self {
            Self::Fixed(precision) => Self::Fixed(cap(precision)),
            Self::Exponent { precision, upper } => Self::Exponent {
                precision: cap(precision),
                upper,
            },
            Self::General { precision, upper } => Self::General {
                precision: cap(precision),
                upper,
            },
            Self::Integer => Self::Integer,
        }
    }

    pub fn format_integer(self, value: i64) -> String {
        match self {
            Self::Integer => value.to_string(),
            other => other.format_real(value as f64),
        }
    }
}

/// C `%g`: shortest of `%e`/`%f` at `precision` significant digits, trailing
/// zeros removed
fn format_general(value: f64, precision: usize, upper: bool) -> String {
    let precision = precision.max(1);
    let significant = precision - 1;
    let scientific = format!("{value:.significant$e}");
    let exponent = scientific
        .split_once('e')
        .and_then(|(_, exp)| exp.parse::<i64>().ok())
        .unwrap_or(0);

    if exponent >= -4 && exponent < precision as i64 {
        let decimals = (precision as i64 - 1 - exponent).max(0) as usize;
        strip_fraction_zeros(&format!("{value:.decimals$}")).to_owned()
    } else {
        let (mantissa, exp) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        c_exponent(&format!("{}e{exp}", strip_fraction_zeros(mantissa)), upper)
    }
}

fn strip_fraction_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Rewrite Rust's `1.5e2` as C's `1.5e+02`
fn c_exponent(scientific: &str, upper: bool) -> String {
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific.to_owned();
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    let marker = if upper { 'E' } else { 'e' };
    let padding = if digits.len() < 2 { "0" } else { "" };
    format!("{mantissa}{marker}{sign}{padding}{digits}")
}

fn with_units(text: String, units: &str) -> String {
    if units.is_empty() {
        text
    } else {
        format!("{text} {units}")
    }
}

/// Renders values as display strings
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayFormatter<'m> {
    metadata: Option<&'m Metadata>,
    locale: DisplayLocale,
}

impl<'m> DisplayFormatter<'m> {
    pub const fn new(metadata: Option<&'m Metadata>) -> Self {
        Self {
            metadata,
            locale: DisplayLocale::INVARIANT,
        }
    }

    pub const fn with_locale(mut self, locale: DisplayLocale) -> Self {
        self.locale = locale;
        self
    }

    fn real_metadata(&self) -> Option<&'m RealMetadata> {
        match self.metadata {
            Some(Metadata::Real(m) | Metadata::RealArray(m)) => Some(m),
            _ => None,
        }
    }

    fn integer_metadata(&self) -> Option<&'m IntegerMetadata> {
        match self.metadata {
            Some(Metadata::Integer(m) | Metadata::IntegerArray(m)) => Some(m),
            _ => None,
        }
    }

    fn string_metadata(&self) -> Option<&'m StringMetadata> {
        match self.metadata {
            Some(Metadata::String(m) | Metadata::StringArray(m)) => Some(m),
            _ => None,
        }
    }

    /// Alias or formatted number, without units
    fn real_element(&self, value: f64) -> String {
        let meta = self.real_metadata();
        if let Some(alias) = meta.and_then(|m| m.enumeration().alias_for(&value)) {
            return alias.to_owned();
        }
        let text = meta
            .and_then(|m| NumberFormat::parse(m.display_format()))
            .unwrap_or(NumberFormat::DEFAULT_REAL)
            .format_real(value);
        self.locale.apply(&text)
    }

    fn integer_element(&self, value: i64) -> String {
        let meta = self.integer_metadata();
        if let Some(alias) = meta.and_then(|m| m.enumeration().alias_for(&value)) {
            return alias.to_owned();
        }
        let text = meta
            .and_then(|m| NumberFormat::parse(m.display_format()))
            .unwrap_or(NumberFormat::Integer)
            .format_integer(value);
        self.locale.apply(&text)
    }

    fn string_alias(&self, value: &str) -> Option<&'m str> {
        self.string_metadata()
            .and_then(|m| m.enumeration().alias_for(&value.to_owned()))
    }
}

impl ValueVisitor for DisplayFormatter<'_> {
    type Output = String;

    fn visit_real(&mut self, value: f64) -> String {
        let meta = self.real_metadata();
        if let Some(alias) = meta.and_then(|m| m.enumeration().alias_for(&value)) {
            return alias.to_owned();
        }
        with_units(self.real_element(value), meta.map_or("", RealMetadata::units))
    }

    fn visit_integer(&mut self, value: i64) -> String {
        let meta = self.integer_metadata();
        if let Some(alias) = meta.and_then(|m| m.enumeration().alias_for(&value)) {
            return alias.to_owned();
        }
        with_units(self.integer_element(value), meta.map_or("", IntegerMetadata::units))
    }

    fn visit_boolean(&mut self, value: bool) -> String {
        text::format_boolean(value).to_owned()
    }

    fn visit_string(&mut self, value: &str) -> String {
        self.string_alias(value).unwrap_or(value).to_owned()
    }

    fn visit_file(&mut self, value: &FileValue) -> String {
        let id = value.id().short(FILE_ID_DIGITS);
        if value.mime_type().is_empty() {
            format!("<file content {id}>")
        } else {
            format!("<file content {id} ({})>", value.mime_type())
        }
    }

    fn visit_real_array(&mut self, value: &Array<f64>) -> String {
        let body = array_text::encode(value, ", ", |v| self.real_element(*v));
        with_units(body, self.real_metadata().map_or("", RealMetadata::units))
    }

    fn visit_integer_array(&mut self, value: &Array<i64>) -> String {
        let body = array_text::encode(value, ", ", |v| self.integer_element(*v));
        with_units(body, self.integer_metadata().map_or("", IntegerMetadata::units))
    }

    fn visit_boolean_array(&mut self, value: &Array<bool>) -> String {
        array_text::encode(value, ", ", |v| text::format_boolean(*v).to_owned())
    }

    fn visit_string_array(&mut self, value: &Array<String>) -> String {
        array_text::encode(value, ", ", |v| match self.string_alias(v) {
            Some(alias) => alias.to_owned(),
            None => array_text::quote(v),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Enumeration;
    use crate::value::ContentId;

    #[test]
    fn test_parse_formats() {
        assert_eq!(NumberFormat::parse("%.3f"), Some(NumberFormat::Fixed(3)));
        assert_eq!(NumberFormat::parse("%f"), Some(NumberFormat::Fixed(6)));
        assert_eq!(
            NumberFormat::parse("%.2E"),
            Some(NumberFormat::Exponent { precision: 2, upper: true })
        );
        assert_eq!(NumberFormat::parse("%d"), Some(NumberFormat::Integer));
        assert_eq!(NumberFormat::parse("%.2d"), None);
        assert_eq!(NumberFormat::parse("%x"), None);
        assert_eq!(NumberFormat::parse("%.f"), Some(NumberFormat::Fixed(0)));
        assert_eq!(NumberFormat::parse("0.00"), None);
        assert_eq!(NumberFormat::parse(""), None);
    }

    #[test]
    fn test_oversized_precision() {
        assert_eq!(NumberFormat::parse("%.64f"), Some(NumberFormat::Fixed(64)));
        assert_eq!(NumberFormat::parse("%.65f"), None);
        assert_eq!(NumberFormat::parse("%.70000f"), None);
        assert_eq!(NumberFormat::parse("%.99999999999999999999999g"), None);

        let meta = Metadata::from(RealMetadata::new().with_display_format("%.70000f"));
        assert_eq!(to_display_string(&Value::Real(1.5), Some(&meta)), "1.5");

        let wide = NumberFormat::Fixed(70_000).format_real(1.5);
        assert_eq!(wide.len(), 2 + MAX_PRECISION);
        let wide = NumberFormat::General { precision: usize::MAX, upper: true };
        assert_eq!(wide.format_real(0.5), "0.5");
    }

    #[test]
    fn test_general_format_matches_c() {
        let g = NumberFormat::DEFAULT_REAL;
        assert_eq!(g.format_real(0.1), "0.1");
        assert_eq!(g.format_real(1.0 / 3.0), "0.333333333333333");
        assert_eq!(g.format_real(1234.5), "1234.5");
        assert_eq!(g.format_real(1e20), "1E+20");
        assert_eq!(g.format_real(0.0), "0");
        assert_eq!(g.format_real(0.00001234), "1.234E-05");
        assert_eq!(g.format_real(f64::NAN), "NaN");

        let g3 = NumberFormat::General { precision: 3, upper: false };
        assert_eq!(g3.format_real(1234.5), "1.23e+03");
        assert_eq!(g3.format_real(0.0001), "0.0001");
    }

    #[test]
    fn test_fixed_and_exponent() {
        assert_eq!(NumberFormat::Fixed(2).format_real(3.14159), "3.14");
        assert_eq!(
            NumberFormat::Exponent { precision: 2, upper: false }.format_real(1234.5),
            "1.23e+03"
        );
        assert_eq!(NumberFormat::Fixed(1).format_integer(7), "7.0");
        assert_eq!(NumberFormat::Integer.format_real(2.7), "3");
    }

    #[test]
    fn test_display_without_metadata() {
        assert_eq!(to_display_string(&Value::Real(2.0), None), "2");
        assert_eq!(to_display_string(&Value::Integer(-3), None), "-3");
        assert_eq!(to_display_string(&Value::Boolean(true), None), "True");
        assert_eq!(to_display_string(&Value::from("hi"), None), "hi");

        let file = FileValue::new(ContentId::from_bytes([0x1f; 32]), "text/plain");
        assert_eq!(
            to_display_string(&Value::from(file), None),
            "<file content 1f1f1f1f1f1f (text/plain)>"
        );
    }

    #[test]
    fn test_display_with_units_and_format() {
        let meta = Metadata::from(
            RealMetadata::new()
                .with_units("mm")
                .with_display_format("%.2f"),
        );
        assert_eq!(to_display_string(&Value::Real(1.0 / 3.0), Some(&meta)), "0.33 mm");

        let array = Value::from(Array::from_vec(vec![1.0, 2.5]));
        let meta = Metadata::RealArray(RealMetadata::new().with_units("kg"));
        assert_eq!(to_display_string(&array, Some(&meta)), "1, 2.5 kg");
    }

    #[test]
    fn test_display_uses_aliases() {
        let enumeration =
            Enumeration::new(vec![1_i64, 2], vec!["low".to_owned(), "high".to_owned()]).unwrap();
        let meta = Metadata::from(
            IntegerMetadata::new()
                .with_enumeration(enumeration)
                .with_units("lvl"),
        );
        assert_eq!(to_display_string(&Value::Integer(2), Some(&meta)), "high");
        assert_eq!(to_display_string(&Value::Integer(3), Some(&meta)), "3 lvl");
    }

    #[test]
    fn test_mismatched_metadata_is_ignored() {
        let meta = Metadata::from(RealMetadata::new().with_units("mm"));
        assert_eq!(to_display_string(&Value::Integer(5), Some(&meta)), "5");
    }

    #[test]
    fn test_locale_lookup() {
        assert_eq!(DisplayLocale::from_name("C").unwrap(), DisplayLocale::INVARIANT);
        assert_eq!(DisplayLocale::from_name("en_US.UTF-8").unwrap(), DisplayLocale::INVARIANT);
        assert_eq!(DisplayLocale::from_name("de-DE").unwrap().decimal_separator(), ',');
        assert_eq!(DisplayLocale::from_name("fr_FR@euro").unwrap().grouping_separator(), '\u{a0}');
        assert!(DisplayLocale::from_name("xx_YY").is_err());
    }

    #[test]
    fn test_locale_apply() {
        let de = DisplayLocale::from_name("de_DE").unwrap();
        assert_eq!(de.apply("1234.5"), "1234,5");
        assert_eq!(de.apply("-1.5E+20"), "-1,5E+20");
        assert_eq!(de.apply("NaN"), "NaN");
        assert_eq!(de.apply("-Infinity"), "-Infinity");

        let grouped = de.with_grouping(true);
        assert_eq!(grouped.apply("1234567.25"), "1.234.567,25");
        assert_eq!(grouped.apply("-123"), "-123");
        assert_eq!(grouped.apply("-1234"), "-1.234");
    }

    #[test]
    fn test_comma_decimal_display() {
        let de = DisplayLocale::from_name("de_DE.UTF-8").unwrap();
        let meta = Metadata::from(RealMetadata::new().with_units("m/s"));

        assert_eq!(
            to_localized_display_string(&Value::Real(9.81), Some(&meta), de),
            "9,81 m/s"
        );
        assert_eq!(
            to_localized_display_string(&Value::Integer(1_500_000), None, de.with_grouping(true)),
            "1.500.000"
        );
        assert_eq!(
            to_localized_display_string(&Value::from(Array::from_vec(vec![0.5, 2.0])), None, de),
            "0,5, 2"
        );
        assert_eq!(to_localized_display_string(&Value::from("1.5"), None, de), "1.5");
        assert_eq!(to_display_string(&Value::Real(9.81), Some(&meta)), "9.81 m/s");
    }

    #[test]
    fn test_multi_dimensional_display() {
        let grid = Value::from(
            Array::from_shape(&[2, 2], vec!["a".to_owned(), "b".into(), "c".into(), "d".into()])
                .unwrap(),
        );
        assert_eq!(
            to_display_string(&grid, None),
            "bounds[2,2]{\"a\", \"b\", \"c\", \"d\"}"
        );
    }
}
