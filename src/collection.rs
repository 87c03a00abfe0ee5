//! Immutable insertion-ordered collection.
//!
//! This module provides [`Collection`], a snapshot of key/value pairs with a
//! small fluent API. Every transformation returns a new instance; the
//! receiver is never modified.
//!
//! # Keys
//!
//! Keys are [`Key`]s: integers or strings. Operations either keep keys or
//! *reindex* them to `0..n`:
//!
//! | Operation            | Keys                                                   |
//! |----------------------|--------------------------------------------------------|
//! | `map`                | kept                                                   |
//! | `filter`             | kept, or reindexed without `preserve_keys`             |
//! | `sort`               | reindexed                                              |
//! | `sort_by`            | kept, or reindexed without `preserve_keys`             |
//! | `slice`              | integer keys renumbered without `preserve_keys`        |
//! | `flatten`            | integer keys renumbered, string keys merged            |
//!
//! # Examples
//!
//! ```rust
//! use keyed_sets::Collection;
//!
//! let words = Collection::from_string("pear,apple,fig", ",").unwrap();
//! let sorted = words.sort();
//! assert_eq!(sorted.first().map(String::as_str), Some("apple"));
//!
//! // The source is untouched
//! assert_eq!(words.first().map(String::as_str), Some("pear"));
//! ```

use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::coerce::Truthy;
use crate::entries::{self, Entries};
use crate::iter::{IntoIter, Iter};
use crate::json;
use crate::nested::Nested;
use crate::{CollectionError, Key};

/// An immutable, insertion-ordered mapping from [`Key`]s to values.
///
/// # Type Parameters
///
/// * `T` - The value type. Operations that copy values out require `Clone`.
///
/// # Examples
///
/// ```rust
/// use keyed_sets::{Collection, Key};
///
/// let prices = Collection::from_entries([("tea", 3), ("cake", 5), ("water", 0)]);
///
/// let paid = prices.filter(|price| *price > 0, true);
/// assert_eq!(paid.count(), 2);
/// assert_eq!(paid.get(&Key::from("cake")), Some(&5));
///
/// let doubled = prices.map(|price| price * 2);
/// assert_eq!(doubled.last(), Some(&0));
/// ```
#[derive(Clone)]
pub struct Collection<T> {
    items: Entries<T>,
}

impl<T> Collection<T> {
    /// Creates an empty collection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let collection: Collection<i32> = Collection::empty();
    /// assert!(collection.is_empty());
    /// assert_eq!(collection.count(), 0);
    /// ```
    #[inline]
    pub fn empty() -> Self {
        Self {
            items: IndexMap::new(),
        }
    }

    /// Creates a collection keyed `0..n` from `values`.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            items: entries::reindex(values),
        }
    }

    /// Creates a collection from explicit pairs.
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

    /// Returns the first value in stored order, whatever its key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let collection = Collection::from_entries([(5, "five"), (1, "one")]);
    /// assert_eq!(collection.first(), Some(&"five"));
    /// assert_eq!(collection.last(), Some(&"one"));
    /// ```
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.items.first().map(|(_, value)| value)
    }

    /// Returns the last value in stored order, whatever its key.
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.items.last().map(|(_, value)| value)
    }

    /// Returns `true` if the collection holds no pairs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns `true` if the collection holds at least one pair.
    #[inline]
    pub fn is_not_empty(&self) -> bool {
        !self.items.is_empty()
    }

    /// Returns the number of pairs.
    #[inline]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Consumes the collection and returns its backing map.
    #[inline]
    pub fn into_array(self) -> IndexMap<Key, T> {
        self.items
    }

    /// Applies `function` to every value. Keys and order are unchanged.
    pub fn map<U, F>(&self, mut function: F) -> Collection<U>
    where
        F: FnMut(&T) -> U,
    {
        Collection {
            items: self
                .items
                .iter()
                .map(|(key, value)| (key.clone(), function(value)))
                .collect(),
        }
    }
}

impl<T: Clone> Collection<T> {
    /// Returns a copy of the backing map in stored order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use indexmap::IndexMap;
    /// use keyed_sets::{Collection, Key};
    ///
    /// let map: IndexMap<Key, i32> = [(Key::from("b"), 2), (Key::from("a"), 1)].into_iter().collect();
    /// assert_eq!(Collection::from(map.clone()).to_array(), map);
    /// ```
    #[inline]
    pub fn to_array(&self) -> IndexMap<Key, T> {
        self.items.clone()
    }

    /// Keeps the values for which `predicate` returns `true`.
    ///
    /// With `preserve_keys` the surviving pairs keep their keys; otherwise
    /// they are reindexed to `0..n`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::{Collection, Key};
    ///
    /// let collection = Collection::from_entries([("a", 1), ("b", 2)]);
    ///
    /// let kept = collection.filter(|value| *value == 2, true);
    /// assert_eq!(kept.get(&Key::from("b")), Some(&2));
    ///
    /// let reindexed = collection.filter(|value| *value == 2, false);
    /// assert_eq!(reindexed.get(&Key::Int(0)), Some(&2));
    /// ```
    pub fn filter<F>(&self, mut predicate: F, preserve_keys: bool) -> Self
    where
        F: FnMut(&T) -> bool,
    {
        let kept = self.items.iter().filter(|&(_, value)| predicate(value));
        let items = if preserve_keys {
            kept.map(|(key, value)| (key.clone(), value.clone())).collect()
        } else {
            entries::reindex(kept.map(|(_, value)| value.clone()))
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

    /// Returns a contiguous range of pairs.
    ///
    /// A negative `offset` counts from the end. `length` of `None` runs to
    /// the end, a negative `length` stops that many pairs before it. Without
    /// `preserve_keys` integer keys are renumbered from 0; string keys are
    /// always kept.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let collection = Collection::from(vec![1, 2, 3, 4, 5]);
    /// let middle = collection.slice(1, Some(-1), false);
    /// assert_eq!(middle.values().copied().collect::<Vec<_>>(), vec![2, 3, 4]);
    /// ```
    pub fn slice(&self, offset: isize, length: Option<isize>, preserve_keys: bool) -> Self {
        Self {
            items: entries::slice(&self.items, offset, length, preserve_keys),
        }
    }

    /// Concatenates nested mappings into one collection.
    ///
    /// Integer keys are renumbered in order; a string key appearing in more
    /// than one nested mapping takes the last value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::Type`] when the collection is empty or when
    /// any value is not a mapping.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let nested = Collection::from(vec![vec![1, 2], vec![3]]);
    /// let flat = nested.flatten().unwrap();
    /// assert_eq!(flat, Collection::from(vec![1, 2, 3]));
    ///
    /// assert!(Collection::<Vec<i32>>::empty().flatten().is_err());
    /// ```
    pub fn flatten(&self) -> Result<Collection<T::Item>, CollectionError>
    where
        T: Nested,
    {
        if self.items.is_empty() {
            tracing::debug!("flatten called on an empty collection");
            return Err(CollectionError::type_error(
                "flatten",
                "at least one nested mapping is required",
            ));
        }

        let mut pairs = Vec::new();
        for (key, value) in &self.items {
            let Some(nested) = value.nested_entries() else {
                tracing::debug!(%key, "flatten found a value that is not a mapping");
                return Err(CollectionError::type_error(
                    "flatten",
                    format!("value at key {key} is not a mapping"),
                ));
            };
            pairs.extend(nested);
        }

        Ok(Collection {
            items: entries::merge(pairs),
        })
    }
}

impl Collection<String> {
    /// Splits `input` on `separator` into a collection keyed `0..n`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] when `separator` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let parts = Collection::from_string("a,b,c", ",").unwrap();
    /// assert_eq!(parts.count(), 3);
    /// ```
    pub fn from_string(input: &str, separator: &str) -> Result<Self, CollectionError> {
        Self::from_string_with_limit(input, separator, i64::MAX)
    }

    /// Splits `input` on `separator` into at most `limit` fragments.
    ///
    /// - `limit > 0`: the last fragment holds the unsplit rest.
    /// - `limit == 0`: treated as 1.
    /// - `limit < 0`: all fragments except the last `|limit|`.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidArgument`] when `separator` is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keyed_sets::Collection;
    ///
    /// let parts = Collection::from_string_with_limit("a,b,c", ",", 2).unwrap();
    /// assert_eq!(parts, Collection::from(vec!["a".to_string(), "b,c".to_string()]));
    /// ```
    pub fn from_string_with_limit(input: &str, separator: &str, limit: i64) -> Result<Self, CollectionError> {
        entries::split(input, separator, limit).map(Self::from_values)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_values(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Collection<T> {
    fn from(values: [T; N]) -> Self {
        Self::from_values(values)
    }
}

impl<T> From<IndexMap<Key, T>> for Collection<T> {
    fn from(items: IndexMap<Key, T>) -> Self {
        Self { items }
    }
}

impl<K: Into<Key>, T> FromIterator<(K, T)> for Collection<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<T> IntoIterator for Collection<T> {
    type Item = (Key, T);
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.items.into_iter())
    }
}

impl<'a, T> IntoIterator for &'a Collection<T> {
    type Item = (&'a Key, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Two collections are equal when they hold the same pairs in the same order.
impl<T: PartialEq> PartialEq for Collection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count() == other.count() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Collection<T> {}

impl<T: fmt::Debug> fmt::Debug for Collection<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display> fmt::Display for Collection<T> {
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

impl<T> Truthy for Collection<T> {
    fn is_truthy(&self) -> bool {
        self.is_not_empty()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

impl<T: Serialize> Serialize for Collection<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        json::serialize_entries(&self.items, serializer)
    }
}

impl<'de, T> Deserialize<'de> for Collection<T>
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
