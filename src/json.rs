//! JSON encoding.
//!
//! Collections serialize as a JSON array when their keys are exactly
//! `0..n` in order, and as a JSON object with stringified keys otherwise.
//! [`JsonFlags`] tweak the text output of
//! [`DataSet::json_encode`](crate::DataSet::json_encode):
//!
//! | Flag               | Effect                                                  |
//! |--------------------|---------------------------------------------------------|
//! | `PRETTY_PRINT`     | Multi-line output indented with four spaces             |
//! | `FORCE_OBJECT`     | Every array, nested ones included, becomes an object    |
//! | `ESCAPE_SLASHES`   | `/` is written as `\/`                                  |
//! | `ESCAPE_UNICODE`   | Non-ASCII characters are written as `\uXXXX` escapes    |
//!
//! # Examples
//!
//! ```rust
//! use keyed_sets::{DataSet, JsonFlags};
//!
//! let data = DataSet::from(vec!["a/b", "é"]);
//! assert_eq!(data.json_encode(JsonFlags::NONE, 512).unwrap(), r#"["a/b","é"]"#);
//! assert_eq!(
//!     data.json_encode(JsonFlags::ESCAPE_SLASHES | JsonFlags::ESCAPE_UNICODE, 512).unwrap(),
//!     r#"["a\/b","\u00e9"]"#
//! );
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitOr, BitOrAssign};

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserializer, Serialize, Serializer};
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

use crate::CollectionError;
use crate::Key;
use crate::entries::{self, Entries};

/// Nesting limit used when no other limit is given.
pub const DEFAULT_DEPTH: usize = 512;

/// Options for JSON text output.
///
/// Flags combine with `|`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct JsonFlags(u32);

impl JsonFlags {
    /// Compact output, no extra escaping.
    pub const NONE: Self = Self(0);
    /// Multi-line output indented with four spaces.
    pub const PRETTY_PRINT: Self = Self(1);
    /// Encode every array as an object keyed by position.
    pub const FORCE_OBJECT: Self = Self(1 << 1);
    /// Escape `/` as `\/`.
    pub const ESCAPE_SLASHES: Self = Self(1 << 2);
    /// Escape non-ASCII characters as `\uXXXX`.
    pub const ESCAPE_UNICODE: Self = Self(1 << 3);

    const ALL: u32 = 0b1111;

    /// Returns the raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Builds flags from raw bits, ignoring unknown ones.
    #[inline]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    /// Returns `true` if every flag in `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of both flag sets.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl BitOr for JsonFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        self.union(other)
    }
}

impl BitOrAssign for JsonFlags {
    fn bitor_assign(&mut self, other: Self) {
        *self = self.union(other);
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Encodes `value` as JSON text.
///
/// `depth` is clamped to at least 1. Each array or object level counts one.
pub(crate) fn encode<S>(value: &S, flags: JsonFlags, depth: usize) -> Result<String, CollectionError>
where
    S: Serialize + ?Sized,
{
    let limit = depth.max(1);
    let mut tree = serde_json::to_value(value)?;

    let found = nesting_depth(&tree);
    if found > limit {
        tracing::debug!(limit, found, "json nesting too deep");
        return Err(CollectionError::DepthExceeded { limit, found });
    }

    if flags.contains(JsonFlags::FORCE_OBJECT) {
        tree = force_object(tree);
    }

    let text = if flags.contains(JsonFlags::PRETTY_PRINT) {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        tree.serialize(&mut serializer)?;
        String::from_utf8(buffer).map_err(|error| CollectionError::Json(error.to_string()))?
    } else {
        serde_json::to_string(&tree)?
    };

    tracing::trace!(bytes = text.len(), depth = found, "encoded json");
    Ok(escape(text, flags))
}

/// Returns how many array/object levels `value` nests.
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut pending = vec![(value, 0_usize)];
    while let Some((current, depth)) = pending.pop() {
        let children: Box<dyn Iterator<Item = &Value>> = match current {
            Value::Array(values) => Box::new(values.iter()),
            Value::Object(fields) => Box::new(fields.values()),
            _ => continue,
        };
        let depth = depth + 1;
        deepest = deepest.max(depth);
        pending.extend(children.map(|child| (child, depth)));
    }
    deepest
}

fn force_object(value: Value) -> Value {
    match value {
        Value::Array(values) => Value::Object(
            values
                .into_iter()
                .enumerate()
                .map(|(index, child)| (index.to_string(), force_object(child)))
                .collect(),
        ),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, child)| (name, force_object(child)))
                .collect(),
        ),
        scalar => scalar,
    }
}

/// Applies the escaping flags to already encoded JSON text.
///
/// Structural JSON is pure ASCII without `/`, so both escapes only ever hit
/// string contents.
fn escape(text: String, flags: JsonFlags) -> String {
    let slashes = flags.contains(JsonFlags::ESCAPE_SLASHES);
    let unicode = flags.contains(JsonFlags::ESCAPE_UNICODE);
    if !slashes && !unicode {
        return text;
    }

    let mut escaped = String::with_capacity(text.len());
    let mut units = [0_u16; 2];
    for character in text.chars() {
        if slashes && character == '/' {
            escaped.push_str("\\/");
        } else if unicode && !character.is_ascii() {
            for unit in character.encode_utf16(&mut units) {
                escaped.push_str(&format!("\\u{unit:04x}"));
            }
        } else {
            escaped.push(character);
        }
    }
    escaped
}

// =============================================================================
// Serde helpers
// =============================================================================

/// Serializes entries as a sequence when they form a list, as a map
/// otherwise.
pub(crate) fn serialize_entries<T, S>(entries: &Entries<T>, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Serialize,
    S: Serializer,
{
    if entries::is_list(entries) {
        let mut sequence = serializer.serialize_seq(Some(entries.len()))?;
        for value in entries.values() {
            sequence.serialize_element(value)?;
        }
        sequence.end()
    } else {
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Deserializes entries from either a sequence (keys `0..n`) or a map
/// (keys normalised through [`Key`]).
pub(crate) fn deserialize_entries<'de, T, D>(deserializer: D) -> Result<Entries<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(EntriesVisitor {
        marker: PhantomData,
    })
}

struct EntriesVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for EntriesVisitor<T>
where
    T: serde::Deserialize<'de>,
{
    type Value = Entries<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence or a map")
    }

    fn visit_seq<A>(self, mut sequence: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        const MAX_PREALLOCATE: usize = 4096;
        let capacity = sequence.size_hint().unwrap_or(0).min(MAX_PREALLOCATE);
        let mut values = Vec::with_capacity(capacity);
        while let Some(value) = sequence.next_element()? {
            values.push(value);
        }
        Ok(entries::reindex(values))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs: Vec<(Key, T)> = Vec::new();
        while let Some((name, value)) = map.next_entry::<String, T>()? {
            pairs.push((Key::from(name), value));
        }
        Ok(entries::from_pairs(pairs))
    }
}
