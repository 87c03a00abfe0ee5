//! Loose value coercions.
//!
//! Several operations need to look at values without knowing their concrete
//! type:
//!
//! - [`Truthy`] decides whether a value counts as "set" for the default
//!   predicate of `filter_truthy`.
//! - [`Scalar`] converts a value to text (for `join` and string-mode
//!   deduplication) or to a number (for numeric-mode deduplication).
//!
//! Both follow the usual loose rules of dynamically typed collection
//! libraries: `0`, `""`, `"0"`, empty containers and missing values are
//! falsy, `true` prints as `"1"` and `false` as an empty string, and strings
//! convert to numbers through their leading numeric prefix.
//!
//! # Examples
//!
//! ```rust
//! use keyed_sets::{Scalar, Truthy};
//!
//! assert!(!"0".is_truthy());
//! assert!("0.0".is_truthy());
//! assert_eq!(true.to_text(), "1");
//! assert_eq!("12 apples".to_number(), 12.0);
//! assert_eq!(2.5_f64.to_text(), "2.5");
//! ```

use std::collections::{BTreeMap, HashMap};

use indexmap::IndexMap;
use serde_json::Value;

use crate::Key;

/// Number of significant digits used when printing floats.
const FLOAT_PRECISION: usize = 14;

// =============================================================================
// Truthy
// =============================================================================

/// Loose boolean interpretation of a value.
pub trait Truthy {
    /// Returns `false` for "empty" values and `true` otherwise.
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

macro_rules! impl_truthy_for_integers {
    ($($integer:ty),* $(,)?) => {
        $(
            impl Truthy for $integer {
                fn is_truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_truthy_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Truthy for f32 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0
    }
}

impl Truthy for str {
    fn is_truthy(&self) -> bool {
        !(self.is_empty() || self == "0")
    }
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        self.as_str().is_truthy()
    }
}

impl Truthy for Key {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Int(value) => value.is_truthy(),
            Self::Str(value) => value.is_truthy(),
        }
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

impl<T> Truthy for Vec<T> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V, S> Truthy for IndexMap<K, V, S> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Truthy for BTreeMap<K, V> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V, S> Truthy for HashMap<K, V, S> {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::String(value) => value.is_truthy(),
            Self::Array(values) => !values.is_empty(),
            Self::Object(fields) => !fields.is_empty(),
        }
    }
}

// =============================================================================
// Scalar
// =============================================================================

/// String and numeric coercion of a value.
pub trait Scalar {
    /// Returns the string form of the value.
    fn to_text(&self) -> String;

    /// Returns the numeric form of the value.
    fn to_number(&self) -> f64;
}

macro_rules! impl_scalar_for_integers {
    ($($integer:ty),* $(,)?) => {
        $(
            impl Scalar for $integer {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn to_number(&self) -> f64 {
                    *self as f64
                }
            }
        )*
    };
}

impl_scalar_for_integers!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Scalar for f64 {
    fn to_text(&self) -> String {
        format_float(*self)
    }

    fn to_number(&self) -> f64 {
        *self
    }
}

impl Scalar for f32 {
    fn to_text(&self) -> String {
        format_float(f64::from(*self))
    }

    fn to_number(&self) -> f64 {
        f64::from(*self)
    }
}

impl Scalar for bool {
    fn to_text(&self) -> String {
        if *self { "1".to_string() } else { String::new() }
    }

    fn to_number(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

impl Scalar for str {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn to_number(&self) -> f64 {
        leading_number(self)
    }
}

impl Scalar for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn to_number(&self) -> f64 {
        leading_number(self)
    }
}

impl Scalar for Key {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn to_number(&self) -> f64 {
        match self {
            Self::Int(value) => value.to_number(),
            Self::Str(value) => leading_number(value),
        }
    }
}

impl<T: Scalar + ?Sized> Scalar for &T {
    fn to_text(&self) -> String {
        (**self).to_text()
    }

    fn to_number(&self) -> f64 {
        (**self).to_number()
    }
}

impl<T: Scalar> Scalar for Option<T> {
    fn to_text(&self) -> String {
        self.as_ref().map_or_else(String::new, Scalar::to_text)
    }

    fn to_number(&self) -> f64 {
        self.as_ref().map_or(0.0, Scalar::to_number)
    }
}

impl Scalar for Value {
    fn to_text(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(value) => value.to_text(),
            Self::Number(number) => number
                .as_i64()
                .map(|value| value.to_string())
                .or_else(|| number.as_u64().map(|value| value.to_string()))
                .unwrap_or_else(|| format_float(number.as_f64().unwrap_or(0.0))),
            Self::String(value) => value.clone(),
            Self::Array(_) | Self::Object(_) => "Array".to_string(),
        }
    }

    fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(value) => value.to_number(),
            Self::Number(number) => number.as_f64().unwrap_or(0.0),
            Self::String(value) => leading_number(value),
            Self::Array(values) => (!values.is_empty()).to_number(),
            Self::Object(fields) => (!fields.is_empty()).to_number(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Prints a float with 14 significant digits, trailing zeros removed.
///
/// Exponential notation (`1.0E+20`, `1.5E-7`) is used when the decimal
/// exponent is below -4 or at least the precision.
pub(crate) fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "NAN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "INF" } else { "-INF" }.to_string();
    }

    let scientific = format!("{:.*e}", FLOAT_PRECISION - 1, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    let precision = FLOAT_PRECISION as i32;

    if exponent < -4 || exponent >= precision {
        let mantissa = trim_fraction(mantissa);
        let mantissa = if mantissa.contains('.') {
            mantissa.to_string()
        } else {
            format!("{mantissa}.0")
        };
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{}", exponent.unsigned_abs());
    }

    let decimals = usize::try_from(precision - 1 - exponent).unwrap_or(0);
    trim_fraction(&format!("{value:.decimals$}")).to_string()
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Parses the leading numeric prefix of `text`, `0.0` when there is none.
///
/// Leading whitespace is skipped; the prefix is an optional sign, digits with
/// an optional fraction, and an optional exponent.
pub(crate) fn leading_number(text: &str) -> f64 {
    let trimmed = text.trim_start_matches([' ', '\t', '\n', '\r', '\x0b', '\x0c']);
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let integer_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - integer_start;
    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while bytes.get(fraction_end).is_some_and(u8::is_ascii_digit) {
            fraction_end += 1;
        }
        digits += fraction_end - fraction_start;
        if digits > 0 {
            end = fraction_end;
        }
    }
    if digits == 0 {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes.get(exponent_end).is_some_and(u8::is_ascii_digit) {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }

    trimmed[..end].parse().unwrap_or(0.0)
}
