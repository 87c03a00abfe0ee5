//! Values that contain other keyed values.
//!
//! - [`Nested`] is implemented by values that are themselves ordered
//!   mappings. It drives `flatten`.
//! - [`Record`] is implemented by values with named fields. It drives
//!   `DataSet::column`.
//!
//! Dynamically shaped values such as [`serde_json::Value`] implement both and
//! report `None` when the shape does not fit.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::Value;

use crate::{Collection, DataSet, Key};

// =============================================================================
// Nested
// =============================================================================

/// A value that may itself be an ordered mapping.
///
/// # Examples
///
/// ```rust
/// use keyed_sets::{Key, Nested};
/// use serde_json::json;
///
/// let entries = json!({"a": 1, "b": 2}).nested_entries().unwrap();
/// assert_eq!(entries[1], (Key::from("b"), json!(2)));
/// assert!(json!(3).nested_entries().is_none());
/// ```
pub trait Nested {
    /// The type of the contained values.
    type Item;

    /// Returns the contained pairs in order, or `None` when the value is not
    /// a mapping.
    fn nested_entries(&self) -> Option<Vec<(Key, Self::Item)>>;
}

/// Pairs each element with its position.
fn indexed<T: Clone>(values: &[T]) -> Vec<(Key, T)> {
    (0_i64..)
        .zip(values)
        .map(|(index, value)| (Key::Int(index), value.clone()))
        .collect()
}

impl<T: Clone> Nested for Vec<T> {
    type Item = T;

    fn nested_entries(&self) -> Option<Vec<(Key, T)>> {
        Some(indexed(self))
    }
}

impl<T: Clone, const N: usize> Nested for [T; N] {
    type Item = T;

    fn nested_entries(&self) -> Option<Vec<(Key, T)>> {
        Some(indexed(self))
    }
}

impl<K, V, S> Nested for IndexMap<K, V, S>
where
    K: Clone + Into<Key>,
    V: Clone,
{
    type Item = V;

    fn nested_entries(&self) -> Option<Vec<(Key, V)>> {
        Some(
            self.iter()
                .map(|(key, value)| (key.clone().into(), value.clone()))
                .collect(),
        )
    }
}

impl<K, V> Nested for BTreeMap<K, V>
where
    K: Clone + Into<Key>,
    V: Clone,
{
    type Item = V;

    fn nested_entries(&self) -> Option<Vec<(Key, V)>> {
        Some(
            self.iter()
                .map(|(key, value)| (key.clone().into(), value.clone()))
                .collect(),
        )
    }
}

impl<T: Nested> Nested for Option<T> {
    type Item = T::Item;

    fn nested_entries(&self) -> Option<Vec<(Key, T::Item)>> {
        self.as_ref().and_then(Nested::nested_entries)
    }
}

impl<T: Clone> Nested for Collection<T> {
    type Item = T;

    fn nested_entries(&self) -> Option<Vec<(Key, T)>> {
        Some(
            self.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

impl<T: Clone> Nested for DataSet<T> {
    type Item = T;

    fn nested_entries(&self) -> Option<Vec<(Key, T)>> {
        Some(
            self.iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }
}

impl Nested for Value {
    type Item = Self;

    fn nested_entries(&self) -> Option<Vec<(Key, Self)>> {
        match self {
            Self::Array(values) => Some(indexed(values)),
            Self::Object(fields) => Some(
                fields
                    .iter()
                    .map(|(name, value)| (Key::from(name.as_str()), value.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }
}

// =============================================================================
// Record
// =============================================================================

/// A value with named fields.
///
/// # Examples
///
/// ```rust
/// use keyed_sets::{Key, Record};
/// use serde_json::json;
///
/// let row = json!({"id": 7, "name": "seven"});
/// assert_eq!(row.field(&Key::from("id")), Some(json!(7)));
/// assert_eq!(row.field(&Key::from("missing")), None);
/// ```
pub trait Record {
    /// The type of a field value.
    type Field;

    /// Returns the field called `name`, or `None` if there is none.
    fn field(&self, name: &Key) -> Option<Self::Field>;
}

impl<V: Clone, S: BuildHasher> Record for IndexMap<Key, V, S> {
    type Field = V;

    fn field(&self, name: &Key) -> Option<V> {
        self.get(name).cloned()
    }
}

impl<V: Clone> Record for BTreeMap<String, V> {
    type Field = V;

    fn field(&self, name: &Key) -> Option<V> {
        self.get(&name.to_string()).cloned()
    }
}

impl<V: Clone, S: BuildHasher> Record for HashMap<String, V, S> {
    type Field = V;

    fn field(&self, name: &Key) -> Option<V> {
        self.get(&name.to_string()).cloned()
    }
}

impl<T: Clone> Record for Vec<T> {
    type Field = T;

    fn field(&self, name: &Key) -> Option<T> {
        let index = usize::try_from(name.as_int()?).ok()?;
        self.get(index).cloned()
    }
}

impl<T: Clone> Record for Collection<T> {
    type Field = T;

    fn field(&self, name: &Key) -> Option<T> {
        self.get(name).cloned()
    }
}

impl<T: Clone> Record for DataSet<T> {
    type Field = T;

    fn field(&self, name: &Key) -> Option<T> {
        self.get(name).cloned()
    }
}

impl Record for Value {
    type Field = Self;

    fn field(&self, name: &Key) -> Option<Self> {
        match self {
            Self::Object(fields) => fields.get(&name.to_string()).cloned(),
            Self::Array(values) => {
                let index = usize::try_from(name.as_int()?).ok()?;
                values.get(index).cloned()
            }
            _ => None,
        }
    }
}
