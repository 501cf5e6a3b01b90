//! Real and integer metadata

use std::fmt;

use serde::{Deserialize, Serialize};

use super::common::CommonMetadata;
use crate::error::{ValueError, ValueResult};

mod sealed {
    pub trait Sealed {}
    impl Sealed for f64 {}
    impl Sealed for i64 {}
}

/// Element types numeric metadata can constrain
pub trait NumericElement:
    sealed::Sealed + Copy + PartialOrd + Default + fmt::Display + fmt::Debug
{
    fn is_nan(self) -> bool;
}

impl NumericElement for f64 {
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }
}

impl NumericElement for i64 {
    fn is_nan(self) -> bool {
        false
    }
}

/// Ordered permitted values with optional index-aligned display aliases
///
/// Deserialization goes through the same length check as [`Enumeration::new`];
/// an absent or empty alias list is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "EnumerationRaw<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Enumeration<T> {
    values: Vec<T>,
    #[serde(default)]
    aliases: Vec<String>,
}

impl<T> Enumeration<T> {
    /// Create an enumeration; every value needs exactly one alias
    pub fn new(values: Vec<T>, aliases: Vec<String>) -> ValueResult<Self> {
        if values.len() != aliases.len() {
            return Err(ValueError::invalid_argument(format!(
                "enumeration has {} values but {} aliases",
                values.len(),
                aliases.len()
            )));
        }
        Ok(Self { values, aliases })
    }

    /// Create an enumeration without aliases
    pub fn from_values(values: Vec<T>) -> Self {
        Self {
            values,
            aliases: Vec::new(),
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether `value` is one of the permitted values
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.values.iter().any(|v| v == value)
    }

    /// Non-empty alias of the first entry equal to `value`
    pub fn alias_for(&self, value: &T) -> Option<&str>
    where
        T: PartialEq,
    {
        let index = self.values.iter().position(|v| v == value)?;
        self.aliases
            .get(index)
            .map(String::as_str)
            .filter(|alias| !alias.is_empty())
    }
}

#[derive(Deserialize)]
struct EnumerationRaw<T> {
    values: Vec<T>,
    #[serde(default)]
    aliases: Vec<String>,
}

impl<T> TryFrom<EnumerationRaw<T>> for Enumeration<T> {
    type Error = ValueError;

    fn try_from(raw: EnumerationRaw<T>) -> ValueResult<Self> {
        if raw.aliases.is_empty() {
            Ok(Self::from_values(raw.values))
        } else {
            Self::new(raw.values, raw.aliases)
        }
    }
}

impl<T> Default for Enumeration<T> {
    fn default() -> Self {
        Self::from_values(Vec::new())
    }
}

/// Constraints and presentation hints for real or integer variables
///
/// Deserialized bounds are validated like [`NumericMetadata::with_bounds`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "NumericMetadataRaw<T>",
    bound(deserialize = "T: NumericElement + Deserialize<'de>")
)]
pub struct NumericMetadata<T> {
    pub common: CommonMetadata,
    units: String,
    #[serde(rename = "displayFormat")]
    display_format: String,
    #[serde(rename = "lowerBound")]
    lower_bound: Option<T>,
    #[serde(rename = "upperBound")]
    upper_bound: Option<T>,
    enumeration: Enumeration<T>,
}

/// Metadata for real variables
pub type RealMetadata = NumericMetadata<f64>;

/// Metadata for integer variables
pub type IntegerMetadata = NumericMetadata<i64>;

impl<T> Default for NumericMetadata<T> {
    fn default() -> Self {
        Self {
            common: CommonMetadata::default(),
            units: String::new(),
            display_format: String::new(),
            lower_bound: None,
            upper_bound: None,
            enumeration: Enumeration::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
struct NumericMetadataRaw<T> {
    common: CommonMetadata,
    units: String,
    #[serde(rename = "displayFormat")]
    display_format: String,
    #[serde(rename = "lowerBound")]
    lower_bound: Option<T>,
    #[serde(rename = "upperBound")]
    upper_bound: Option<T>,
    enumeration: Enumeration<T>,
}

impl<T> Default for NumericMetadataRaw<T> {
    fn default() -> Self {
        Self {
            common: CommonMetadata::default(),
            units: String::new(),
            display_format: String::new(),
            lower_bound: None,
            upper_bound: None,
            enumeration: Enumeration::default(),
        }
    }
}

impl<T: NumericElement> TryFrom<NumericMetadataRaw<T>> for NumericMetadata<T> {
    type Error = ValueError;

    fn try_from(raw: NumericMetadataRaw<T>) -> ValueResult<Self> {
        let mut meta = Self::new()
            .with_units(raw.units)
            .with_display_format(raw.display_format)
            .with_enumeration(raw.enumeration)
            .with_bounds(raw.lower_bound, raw.upper_bound)?;
        meta.common = raw.common;
        Ok(meta)
    }
}

impl<T: NumericElement> NumericMetadata<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.common.description = description.into();
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Set a printf-style display format such as `%.3f`
    pub fn with_display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = format.into();
        self
    }

    /// Set the bounds, either of which may be absent
    ///
    /// Fails with [`ValueError::InvalidArgument`] when a bound is NaN or the
    /// lower bound exceeds the upper bound.
    pub fn with_bounds(mut self, lower: Option<T>, upper: Option<T>) -> ValueResult<Self> {
        if lower.is_some_and(NumericElement::is_nan) || upper.is_some_and(NumericElement::is_nan)
        {
            return Err(ValueError::invalid_argument("bounds must not be NaN"));
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo > hi {
                return Err(ValueError::invalid_argument(format!(
                    "lower bound {lo} exceeds upper bound {hi}"
                )));
            }
        }

        self.lower_bound = lower;
        self.upper_bound = upper;
        Ok(self)
    }

    pub fn with_enumeration(mut self, enumeration: Enumeration<T>) -> Self {
        self.enumeration = enumeration;
        self
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn display_format(&self) -> &str {
        &self.display_format
    }

    pub fn lower_bound(&self) -> Option<T> {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> Option<T> {
        self.upper_bound
    }

    pub fn enumeration(&self) -> &Enumeration<T> {
        &self.enumeration
    }

    /// Whether `value` lies within the bounds; NaN is outside any bound
    pub fn in_bounds(&self, value: T) -> bool {
        if value.is_nan() {
            return self.lower_bound.is_none() && self.upper_bound.is_none();
        }
        self.lower_bound.is_none_or(|lo| lo <= value)
            && self.upper_bound.is_none_or(|hi| value <= hi)
    }

    /// Advisory check of bounds and enumeration
    pub fn check(&self, value: T) -> ValueResult<()> {
        if !self.in_bounds(value) {
            return Err(ValueError::invalid_argument(format!(
                "{value} is outside [{}, {}]",
                bound_text(self.lower_bound),
                bound_text(self.upper_bound)
            )));
        }
        if !self.enumeration.is_empty() && !self.enumeration.contains(&value) {
            return Err(ValueError::invalid_argument(format!(
                "{value} is not an enumerated value"
            )));
        }
        Ok(())
    }

    /// Preferred default value
    ///
    /// The type's zero when it is valid; otherwise the first enumerated value
    /// within bounds; otherwise the lower bound, else the upper bound. Falls
    /// back to zero when nothing fits.
    pub fn default_value(&self) -> T {
        let zero = T::default();

        if !self.enumeration.is_empty() {
            if self.enumeration.contains(&zero) && self.in_bounds(zero) {
                return zero;
            }
            return self
                .enumeration
                .values()
                .iter()
                .copied()
                .find(|v| self.in_bounds(*v))
                .unwrap_or(zero);
        }

        if self.in_bounds(zero) {
            return zero;
        }
        match (self.lower_bound, self.upper_bound) {
            (Some(lo), Some(hi)) if lo <= hi => lo,
            (Some(lo), None) => lo,
            (None, Some(hi)) => hi,
            _ => zero,
        }
    }
}

fn bound_text<T: fmt::Display>(bound: Option<T>) -> String {
    bound.map_or_else(|| "unbounded".to_owned(), |b| b.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumeration_requires_aligned_aliases() {
        let err = Enumeration::new(vec![1_i64, 2], vec!["one".into()]).unwrap_err();
        assert!(matches!(err, ValueError::InvalidArgument { .. }));

        let e = Enumeration::new(vec![1_i64, 2], vec!["one".into(), String::new()]).unwrap();
        assert_eq!(e.alias_for(&1), Some("one"));
        assert_eq!(e.alias_for(&2), None);
        assert_eq!(e.alias_for(&3), None);
    }

    #[test]
    fn test_with_bounds_rejects_inverted_and_nan() {
        assert!(RealMetadata::new().with_bounds(Some(2.0), Some(1.0)).is_err());
        assert!(RealMetadata::new().with_bounds(Some(f64::NAN), None).is_err());
        assert!(IntegerMetadata::new().with_bounds(Some(1), Some(1)).is_ok());
    }

    #[test]
    fn test_deserialize_validates_enumeration() {
        let err = serde_json::from_str::<Enumeration<i64>>(
            r#"{"values":[1,2,3],"aliases":["one"]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("3 values but 1 aliases"), "{err}");

        let e: Enumeration<i64> = serde_json::from_str(r#"{"values":[1,2]}"#).unwrap();
        assert_eq!(e.values(), &[1, 2]);
        assert!(e.aliases().is_empty());
    }

    #[test]
    fn test_deserialize_validates_bounds() {
        let err =
            serde_json::from_str::<IntegerMetadata>(r#"{"lowerBound":10,"upperBound":1}"#)
                .unwrap_err();
        assert!(err.to_string().contains("exceeds upper bound"), "{err}");

        let meta: RealMetadata = serde_json::from_str(
            r#"{"units":"m","lowerBound":0.5,"upperBound":2.0}"#,
        )
        .unwrap();
        assert_eq!(meta.units(), "m");
        assert_eq!(meta.lower_bound(), Some(0.5));
        assert_eq!(meta.upper_bound(), Some(2.0));
    }

    #[test]
    fn test_serialized_metadata_reads_back() {
        let meta = IntegerMetadata::new()
            .with_units("rpm")
            .with_bounds(Some(0), Some(9000))
            .unwrap()
            .with_enumeration(
                Enumeration::new(vec![0, 3000], vec!["off".into(), "idle".into()]).unwrap(),
            );
        let json = serde_json::to_string(&meta).unwrap();
        assert_eq!(serde_json::from_str::<IntegerMetadata>(&json).unwrap(), meta);
    }

    #[test]
    fn test_default_value_zero_when_valid() {
        assert_eq!(RealMetadata::new().default_value(), 0.0);
        let meta = IntegerMetadata::new().with_bounds(Some(-5), Some(5)).unwrap();
        assert_eq!(meta.default_value(), 0);
    }

    #[test]
    fn test_default_value_falls_back_to_bounds() {
        let meta = IntegerMetadata::new().with_bounds(Some(3), None).unwrap();
        assert_eq!(meta.default_value(), 3);

        let meta = IntegerMetadata::new().with_bounds(None, Some(-2)).unwrap();
        assert_eq!(meta.default_value(), -2);

        let meta = RealMetadata::new().with_bounds(Some(1.5), Some(9.0)).unwrap();
        assert_eq!(meta.default_value(), 1.5);
    }

    #[test]
    fn test_default_value_prefers_enumerated_within_bounds() {
        let meta = IntegerMetadata::new()
            .with_bounds(Some(5), None)
            .unwrap()
            .with_enumeration(Enumeration::from_values(vec![1, 7, 9]));
        assert_eq!(meta.default_value(), 7);

        let meta = IntegerMetadata::new()
            .with_enumeration(Enumeration::from_values(vec![4, 0]));
        assert_eq!(meta.default_value(), 0);

        let meta = IntegerMetadata::new()
            .with_bounds(Some(100), None)
            .unwrap()
            .with_enumeration(Enumeration::from_values(vec![1, 2]));
        assert_eq!(meta.default_value(), 0);
    }

    #[test]
    fn test_check() {
        let meta = RealMetadata::new().with_bounds(Some(0.0), Some(1.0)).unwrap();
        assert!(meta.check(0.5).is_ok());
        assert!(meta.check(1.5).is_err());
        assert!(meta.check(f64::NAN).is_err());
        assert!(RealMetadata::new().check(f64::NAN).is_ok());

        let meta = IntegerMetadata::new().with_enumeration(Enumeration::from_values(vec![2, 4]));
        assert!(meta.check(4).is_ok());
        assert!(meta.check(3).is_err());
    }
}
