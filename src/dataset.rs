//! Immutable insertion-ordered data set with aggregate operations.
//!
//! [`DataSet`] stores the same kind of snapshot as
//! [`Collection`](crate::Collection) and adds appending, membership,
//! aggregation (`min`, `max`, `reduce`, `join`), deduplication, column
//! extraction and JSON encoding.
//!
//! Two accessors deliberately differ from `Collection`:
//!
//! - [`DataSet::first`] and [`DataSet::last`] look up the integer keys `0`
//!   and `count - 1`, not the first and last pairs in stored order.
//! - [`DataSet::flatten`] skips values that are not mappings and keeps the
//!   nested keys, instead of failing and renumbering.
//!
//! # Examples
//!
//! ```rust
//! use keyed_sets::DataSet;
//!
//! let scores = DataSet::from(vec![7, 3, 9]);
//! assert_eq!(scores.max(), Some(9));
//! assert_eq!(scores.reduce(|total, score| total + score, 0), 19);
//! assert_eq!(scores.add_item(1).join(", "), "7, 3, 9, 1");
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::coerce::{Scalar, Truthy};
use crate::entries::{self, Entries};
use crate::iter::{IntoIter, Iter};
use crate::json::{self, JsonFlags};
use crate::nested::{Nested, Record};
use crate::{CollectionError, Key};

/// How [`DataSet::deduplicate_with`] decides that two values are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DedupMode {
    /// Compare the string forms ([`Scalar::to_text`]). `"1"` and `1` are
    /// equal, `"1"` and `"1.0"` are not.
    #[default]
    String,
    /// Compare the numeric forms ([`Scalar::to_number`]). `"1"`, `1` and
    /// `"1.0"` are all equal; non-numeric strings count as `0`.
    Numeric,
}

/// An immutable, insertion-ordered mapping from [`Key`]s to values with
/// aggregate operations.
///
/// # Examples
///
/// ```rust
/// use keyed_sets::{DataSet, Key};
///
/// let tags = DataSet::from(vec!["a", "b", "a"]).deduplicate();
/// assert_eq!(tags.count(), 2);
/// assert!(tags.contains(&"b"));
/// assert_eq!(tags.get(&Key::Int(1)), Some(&"b"));
/// ```
#[derive(Clone)]
pub struct DataSet<T> {
    items: Entries<T>,
}

impl<T> DataSet<T> {
    /// Creates an empty data set.
    #[inline]
    pub fn empty() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Creates a data set keyed `0..n` from `values`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            items: entries::reindex(values),
        }
    }

    /// Creates a data set from explicit pairs.
    ///
    /// A repeated key keeps the position of its first occurrence and the
    /// value of its last.
    pub fn from_entries<K, I>(pairs: I) -> Self
    where
        K: Into<Key>,
        I: IntoIterator<Item = (K, T)>,
    {
        Self {
            items: entries::from_pairs(pairs),
        }
    }

    /// Returns an iterator over `(key, value)` pairs in stored order.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.items.iter())
    }

    /// Returns the keys in stored order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> + '_ {
        self.items.keys()
    }

    /// Returns the values in stored order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.items.values()
    }

    /// Returns the value stored under `key`.
    #[inline]
    pub fn get(&self, key: &Key) -> Option<&T> {
        self.items.get(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    pub fn contains_key(&self, key: &Key) -> bool {
        self.items.contains_key(key)
    }

    /// Returns the value under the integer key `0`.
    ///
    /// This is a key lookup, not a positional one:
    ///
    /// ```rust
    /// use keyed_sets::DataSet;
    ///
    /// let data = DataSet::from_entries([(1, "one"), (0, "zero")]);
    /// assert_eq!(data.first(), Some(&"zero"));
    /// assert_eq!(data.last(), Some(&"one"));
    ///
    /// let named = DataSet::from_entries([("a", 1)]);
    /// assert_eq!(named.first(), None);
    /// ```
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.items.get(&Key::Int(0))
    }

    /// Returns the value under the integer key `count - 1`.
    pub fn last(&self) -> Option<&T> {
        let count = i64::try_from(self.items.len()).ok()?;
        self.items.get(&Key::Int(count - 1))
    }

    /// Returns the number of pairs.
    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the data set holds no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the data set holds at least one pair.
    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    /// Consumes the data set and returns its backing map.
    #[inline]
    pub fn into_array(self) -> IndexMap<Key, T> {
        self.items
    }

    /// Returns `true` if any value equals `value` (same type, same value).
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.values().any(|item| item == value)
    }

    /// Left-folds the values in order, starting from `initial`.
    pub fn reduce<A, F>(&self, function: F, initial: A) -> A
    where
        F: FnMut(A, &T) -> A,
    {
        self.items.values().fold(initial, function)
    }

    /// Returns `true` as soon as `predicate` holds for a value.
    pub fn some<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.items.values().any(predicate)
    }

    /// Returns `false` as soon as `predicate` fails for a value.
    pub fn every<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&T) -> bool,
    {
        self.items.values().all(predicate)
    }

    /// Joins the string forms of all values with `delimiter`.
    pub fn join(&self, delimiter: &str) -> String
    where
        T: Scalar,
    {
        self.items
            .values()
            .map(Scalar::to_text)
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// Applies `function` to every value.
    ///
    /// With `preserve_keys` keys are unchanged; otherwise the result is
    /// reindexed to `0..n`.
    pub fn map<U, F>(&self, mut function: F, preserve_keys: bool) -> DataSet<U>
    where
        F: FnMut(&T) -> U,
    {
        let items = if preserve_keys {
            self.items
                .iter()
                .map(|(key, value)| (key.clone(), function(value)))
                .collect()
        } else {
            entries::reindex(self.items.values().map(function))
        };
        DataSet { items }
    }

    /// Serializes the pairs to JSON text.
    ///
    /// A data set keyed exactly `0..n` in order becomes a JSON array,
    /// anything else an object. `depth` is clamped to at least 1.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DepthExceeded`] when the value nests deeper
    /// than `depth`, or [`CollectionError::Json`] when a value fails to
    /// serialize.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, JsonFlags};
    ///
    /// let list = DataSet::from(vec![1, 2]);
    /// assert_eq!(list.json_encode(JsonFlags::NONE, 512).unwrap(), "[1,2]");
    ///
    /// let map = DataSet::from_entries([(1, 1), (0, 2)]);
    /// assert_eq!(map.json_encode(JsonFlags::NONE, 512).unwrap(), r#"{"1":1,"0":2}"#);
    /// ```
    pub fn json_encode(&self, flags: JsonFlags, depth: usize) -> Result<String, CollectionError>
    where
        T: Serialize,
    {
        json::encode(self, flags, depth)
    }

    /// Serializes the pairs to compact JSON text with the default depth
    /// limit.
    ///
    /// # Errors
    ///
    /// See [`DataSet::json_encode`].
    pub fn to_json(&self) -> Result<String, CollectionError>
    where
        T: Serialize,
    {
        self.json_encode(JsonFlags::NONE, json::DEFAULT_DEPTH)
    }
}

impl<T: Clone> DataSet<T> {
    /// Returns a copy of the backing map in stored order.
    #[inline]
    pub fn to_array(&self) -> IndexMap<Key, T> {
        self.items.clone()
    }

    /// Appends `value` under the next integer key.
    ///
    /// Appending goes through the same merge as [`DataSet::add_items`], so
    /// existing integer keys are renumbered from 0.
    pub fn add_item(&self, value: T) -> Self {
        self.merged(std::iter::once((Key::Int(0), value)))
    }

    /// Adds `value` under `key`.
    ///
    /// A string key overwrites an existing entry in place. A numeric key
    /// (including a numeric string such as `"5"`) is renumbered like any other
    /// integer key and therefore appends.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, Key};
    ///
    /// let data = DataSet::from_entries([("name", "old")]);
    /// let renamed = data.add_item_with_key("new", "name");
    /// assert_eq!(renamed.get(&Key::from("name")), Some(&"new"));
    /// assert_eq!(renamed.count(), 1);
    ///
    /// let appended = data.add_item_with_key("five", "5");
    /// assert_eq!(appended.get(&Key::Int(0)), Some(&"five"));
    /// ```
    pub fn add_item_with_key(&self, value: T, key: impl Into<Key>) -> Self {
        self.merged(std::iter::once((key.into(), value)))
    }

    /// Merges `items` after the current pairs.
    ///
    /// Integer-keyed values of both sides are renumbered from 0, the added
    /// ones following the current ones. String keys in `items` overwrite
    /// matching current keys in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, Key};
    ///
    /// let data = DataSet::from_entries([(Key::Int(3), 1), (Key::from("k"), 2)]);
    /// let merged = data.add_items(DataSet::from_entries([(Key::Int(3), 9), (Key::from("k"), 8)]));
    /// let pairs: Vec<_> = merged.into_iter().collect();
    /// assert_eq!(pairs, vec![(Key::Int(0), 1), (Key::from("k"), 8), (Key::Int(1), 9)]);
    /// ```
    pub fn add_items(&self, items: impl Into<Self>) -> Self {
        self.merged(items.into().items)
    }

    fn merged(&self, added: impl IntoIterator<Item = (Key, T)>) -> Self {
        let current = self
            .items
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()));
        Self {
            items: entries::merge(current.chain(added)),
        }
    }

    /// Returns the smallest value, or `None` when empty.
    ///
    /// The first of several equal minima is returned.
    pub fn min(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.items
            .values()
            .fold(None, |smallest: Option<&T>, value| match smallest {
                None => Some(value),
                Some(current) if value < current => Some(value),
                kept => kept,
            })
            .cloned()
    }

    /// Returns the largest value, or `None` when empty.
    ///
    /// The first of several equal maxima is returned.
    pub fn max(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.items
            .values()
            .fold(None, |largest: Option<&T>, value| match largest {
                None => Some(value),
                Some(current) if value > current => Some(value),
                kept => kept,
            })
            .cloned()
    }

    /// Returns a contiguous range of pairs.
    ///
    /// Same rules as [`Collection::slice`](crate::Collection::slice).
    pub fn slice(&self, offset: isize, length: Option<isize>, preserve_keys: bool) -> Self {
        Self {
            items: entries::slice(&self.items, offset, length, preserve_keys),
        }
    }

    /// Removes repeated values in [`DedupMode::String`] mode.
    pub fn deduplicate(&self) -> Self
    where
        T: Scalar,
    {
        self.deduplicate_with(DedupMode::default())
    }

    /// Removes repeated values, keeping the first occurrence and its key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, DedupMode};
    /// use serde_json::json;
    ///
    /// let data = DataSet::from(vec![json!("1"), json!(1), json!("1.0")]);
    /// assert_eq!(data.deduplicate_with(DedupMode::String).count(), 2);
    /// assert_eq!(data.deduplicate_with(DedupMode::Numeric).count(), 1);
    /// ```
    pub fn deduplicate_with(&self, mode: DedupMode) -> Self
    where
        T: Scalar,
    {
        let items = match mode {
            DedupMode::String => {
                let mut seen = HashSet::new();
                self.retain_clones(|value| seen.insert(value.to_text()))
            }
            DedupMode::Numeric => {
                let mut seen = HashSet::new();
                self.retain_clones(|value| {
                    let number = value.to_number();
                    // Both zeros share one slot.
                    let number = if number == 0.0 { 0.0 } else { number };
                    number.is_nan() || seen.insert(number.to_bits())
                })
            }
        };
        Self { items }
    }

    fn retain_clones<F>(&self, mut keep: F) -> Entries<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .filter(|&(_, value)| keep(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns the values in reverse order.
    ///
    /// Unlike every other transformation this yields a plain `Vec`: keys are
    /// dropped.
    pub fn reverse(&self) -> Vec<T> {
        self.items.values().rev().cloned().collect()
    }

    /// Keeps the values for which `predicate` returns `true`.
    ///
    /// With `preserve_keys` the surviving pairs keep their keys; otherwise
    /// they are reindexed to `0..n`.
    pub fn filter<F>(&self, mut predicate: F, preserve_keys: bool) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        let kept = self.retain_clones(|value| predicate(value));
        let items = if preserve_keys {
            kept
        } else {
            entries::reindex(kept.into_values())
        };
        Self { items }
    }

    /// Keeps the truthy values (see [`Truthy`]).
    pub fn filter_truthy(&self, preserve_keys: bool) -> Self
    where
        T: Truthy,
    {
        self.filter(|value| value.is_truthy(), preserve_keys)
    }

    /// Extracts the field `name` from every value.
    ///
    /// Values without the field are skipped. Without `preserve_keys` the
    /// result is reindexed to `0..n`; with it each extracted value keeps the
    /// key of the record it came from.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, Key};
    /// use serde_json::json;
    ///
    /// let rows = DataSet::from_entries([
    ///     ("a", json!({"x": 1})),
    ///     ("b", json!({"y": 2})),
    ///     ("c", json!({"x": 3})),
    /// ]);
    ///
    /// let column = rows.column("x", false);
    /// assert_eq!(column, DataSet::from(vec![json!(1), json!(3)]));
    ///
    /// let keyed = rows.column("x", true);
    /// assert_eq!(keyed.get(&Key::from("c")), Some(&json!(3)));
    /// ```
    pub fn column(&self, name: impl Into<Key>, preserve_keys: bool) -> DataSet<T::Field>
    where
        T: Record,
    {
        let name = name.into();
        let extracted = self
            .items
            .iter()
            .filter_map(|(key, value)| value.field(&name).map(|field| (key, field)));
        let items = if preserve_keys {
            extracted.map(|(key, field)| (key.clone(), field)).collect()
        } else {
            entries::reindex(extracted.map(|(_, field)| field))
        };
        DataSet { items }
    }

    /// Sorts values in their natural order and reindexes them to `0..n`.
    ///
    /// The sort is stable. Incomparable values are treated as equal.
    pub fn sort(&self) -> Self
    where
        T: PartialOrd,
    {
        Self {
            items: entries::sort_natural(&self.items),
        }
    }

    /// Sorts values with `comparator`.
    ///
    /// The sort is stable. With `preserve_keys` every value keeps its key;
    /// otherwise the result is reindexed to `0..n`.
    pub fn sort_by<F>(&self, comparator: F, preserve_keys: bool) -> Self
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        Self {
            items: entries::sort_with(&self.items, comparator, preserve_keys),
        }
    }

    /// Merges the pairs of every nested mapping into one data set.
    ///
    /// Nested keys are kept as they are; a later pair overwrites the value of
    /// an earlier one with the same key. Values that are not mappings are
    /// skipped, and an empty data set flattens to an empty one.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{DataSet, Key};
    /// use serde_json::json;
    ///
    /// let data = DataSet::from(vec![json!(["a", "b"]), json!(5), json!(["c"])]);
    /// let flat = data.flatten();
    /// assert_eq!(flat.count(), 2);
    /// assert_eq!(flat.get(&Key::Int(0)), Some(&json!("c")));
    /// assert_eq!(flat.get(&Key::Int(1)), Some(&json!("b")));
    /// ```
    pub fn flatten(&self) -> DataSet<T::Item>
    where
        T: Nested,
    {
        let mut items = IndexMap::new();
        let mut skipped = 0_usize;
        for value in self.items.values() {
            match value.nested_entries() {
                Some(nested) => items.extend(nested),
                None => skipped += 1,
            }
        }
        tracing::trace!(flattened = items.len(), skipped, "flattened data set");
        DataSet { items }
    }
}

impl DataSet<String> {
    /// Splits `input` on `separator` into a data set keyed `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] when `separator` is empty.
    pub fn from_string(input: &str, separator: &str) -> Result<Self, CollectionError> {
        Self::from_string_with_limit(input, separator, i64::MAX)
    }

    /// Splits `input` on `separator` into at most `limit` fragments.
    ///
    /// See [`Collection::from_string_with_limit`](crate::Collection::from_string_with_limit)
    /// for the meaning of `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] when `separator` is empty.
    pub fn from_string_with_limit(input: &str, separator: &str, limit: i64) -> Result<Self, CollectionError> {
        entries::split(input, separator, limit).map(Self::from_values)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for DataSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for DataSet<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T, const N: usize> From<[T; N]> for DataSet<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_values(values)
    }
}

impl<T> From<IndexMap<Key, T>> for DataSet<T> {
    fn from(items: IndexMap<Key, T>) -> Self {
        Self { items }
    }
}

/// Copies the current pairs of another data set.
impl<T: Clone> From<&DataSet<T>> for DataSet<T> {
    fn from(other: &Self) -> Self {
        other.clone()
    }
}

impl<K: Into<Key>, T> FromIterator<(K, T)> for DataSet<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<T> IntoIterator for DataSet<T> {
    type Item = (Key, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.items.into_iter())
    }
}

impl<'a, T> IntoIterator for &'a DataSet<T> {
    type Item = (&'a Key, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two data sets are equal when they hold the same pairs in the same order.
impl<T: PartialEq> PartialEq for DataSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for DataSet<T> {}

impl<T: fmt::Debug> fmt::Debug for DataSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for DataSet<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

impl<T> Truthy for DataSet<T> {
    fn is_truthy(&self) -> bool {
        self.is_not_empty()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

impl<T: Serialize> Serialize for DataSet<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        json::serialize_entries(&self.items, serializer)
    }
}

impl<'de, T> Deserialize<'de> for DataSet<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        json::deserialize_entries(deserializer).map(Self::from)
    }
}

// =============================================================================
// Tests
// =============================================================================
