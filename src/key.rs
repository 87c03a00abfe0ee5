//! Keys of an ordered collection.
//!
//! A key is either an integer or a string. String keys that spell a
//! canonical decimal integer are normalised to integer keys, so `"5"` and
//! `5` address the same entry:
//!
//! ```rust
//! use keyed_sets::Key;
//!
//! assert_eq!(Key::from("5"), Key::Int(5));
//! assert_eq!(Key::from("05"), Key::Str("05".to_string()));
//! assert_eq!(Key::from("-0"), Key::Str("-0".to_string()));
//! ```

use std::fmt;

/// The key of a single entry in a [`Collection`](crate::Collection) or
/// [`DataSet`](crate::DataSet).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// An integer key. Reindexed collections use `0..n`.
    Int(i64),
    /// A string key that is not a canonical decimal integer.
    Str(String),
}

impl Key {
    /// Returns the integer value if this is an integer key.
    #[inline]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Returns the string value if this is a string key.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Int(_) => None,
            Self::Str(value) => Some(value),
        }
    }

    /// Returns `true` for integer keys.
    #[inline]
    pub const fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    /// Returns `true` for string keys.
    #[inline]
    pub const fn is_str(&self) -> bool {
        matches!(self, Self::Str(_))
    }
}

/// Parses `text` as a canonical decimal integer.
///
/// Rejects leading zeros, a leading `+`, `-0`, surrounding whitespace and
/// anything outside the `i64` range.
fn canonical_integer(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let bytes = digits.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes[0] == b'0' && (bytes.len() > 1 || digits.len() != text.len()) {
        return None;
    }
    text.parse().ok()
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Key {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        canonical_integer(value).map_or_else(|| Self::Str(value.to_string()), Self::Int)
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        canonical_integer(&value).map_or(Self::Str(value), Self::Int)
    }
}

impl From<&String> for Key {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&Self> for Key {
    fn from(value: &Self) -> Self {
        value.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Str(value) => formatter.write_str(value),
        }
    }
}
