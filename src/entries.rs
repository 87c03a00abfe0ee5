//! Algorithms over the backing map shared by both collection types.
//!
//! Everything here takes an [`IndexMap<Key, T>`] (or pairs destined for one)
//! and returns a freshly allocated map; inputs are never modified.

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::{CollectionError, Key};

/// Insertion-ordered backing storage.
pub(crate) type Entries<T> = IndexMap<Key, T>;

/// Builds a map with keys `0..n` from `values`.
pub(crate) fn reindex<T>(values: impl IntoIterator<Item = T>) -> Entries<T> {
    (0_i64..)
        .zip(values)
        .map(|(index, value)| (Key::Int(index), value))
        .collect()
}

/// Builds a map from explicit pairs.
///
/// A repeated key keeps the position of its first occurrence and the value
/// of its last one.
pub(crate) fn from_pairs<K, T>(pairs: impl IntoIterator<Item = (K, T)>) -> Entries<T>
where
    K: Into<Key>,
{
    let pairs = pairs.into_iter();
    let mut entries = IndexMap::with_capacity(pairs.size_hint().0);
    for (key, value) in pairs {
        entries.insert(key.into(), value);
    }
    entries
}

/// Merges pairs in order.
///
/// Integer-keyed values are renumbered from 0 in encounter order. String
/// keys are kept; a later string key overwrites the value of an earlier one
/// without moving it.
pub(crate) fn merge<T>(pairs: impl IntoIterator<Item = (Key, T)>) -> Entries<T> {
    let pairs = pairs.into_iter();
    let mut merged = IndexMap::with_capacity(pairs.size_hint().0);
    let mut next_index = 0_i64;
    for (key, value) in pairs {
        match key {
            Key::Int(_) => {
                merged.insert(Key::Int(next_index), value);
                next_index += 1;
            }
            Key::Str(_) => {
                merged.insert(key, value);
            }
        }
    }
    tracing::trace!(merged = merged.len(), "merged entries");
    merged
}

/// Returns `true` when the keys are exactly `0..n` in order.
pub(crate) fn is_list<T>(entries: &Entries<T>) -> bool {
    (0_i64..)
        .zip(entries.keys())
        .all(|(index, key)| *key == Key::Int(index))
}

/// Takes a contiguous range of entries.
///
/// - A negative `offset` counts from the end; an offset past the end gives an
///   empty result.
/// - `length` of `None` runs to the end; a negative length stops that many
///   entries before the end.
/// - Without `preserve_keys`, integer keys are renumbered from 0. String keys
///   are always kept.
pub(crate) fn slice<T: Clone>(
    entries: &Entries<T>,
    offset: isize,
    length: Option<isize>,
    preserve_keys: bool,
) -> Entries<T> {
    let count = isize::try_from(entries.len()).unwrap_or(isize::MAX);
    if offset > count {
        return IndexMap::new();
    }
    let start = if offset < 0 {
        count.saturating_add(offset).max(0)
    } else {
        offset
    };
    let available = count - start;
    let length = match length {
        None => available,
        Some(length) if length < 0 => available.saturating_add(length).max(0),
        Some(length) => length.min(available),
    };
    let (Ok(start), Ok(length)) = (usize::try_from(start), usize::try_from(length)) else {
        return IndexMap::new();
    };

    let mut sliced = IndexMap::with_capacity(length);
    let mut next_index = 0_i64;
    for (key, value) in entries.iter().skip(start).take(length) {
        let key = match key {
            Key::Int(_) if !preserve_keys => {
                next_index += 1;
                Key::Int(next_index - 1)
            }
            _ => key.clone(),
        };
        sliced.insert(key, value.clone());
    }
    sliced
}

/// Splits `input` on `separator`, honouring `limit`.
///
/// - `limit > 0`: at most `limit` fragments, the last holding the rest.
/// - `limit == 0`: treated as 1.
/// - `limit < 0`: every fragment except the last `|limit|`.
///
/// # Errors
///
/// Returns [`CollectionError::InvalidArgument`] when `separator` is empty.
pub(crate) fn split(input: &str, separator: &str, limit: i64) -> Result<Vec<String>, CollectionError> {
    if separator.is_empty() {
        tracing::debug!(input_length = input.len(), limit, "rejected empty separator");
        return Err(CollectionError::invalid_argument(
            "from_string",
            "separator must not be empty",
        ));
    }

    if limit >= 0 {
        let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        return Ok(input.splitn(limit, separator).map(str::to_string).collect());
    }

    let mut fragments: Vec<String> = input.split(separator).map(str::to_string).collect();
    let dropped = usize::try_from(limit.unsigned_abs()).unwrap_or(usize::MAX);
    fragments.truncate(fragments.len().saturating_sub(dropped));
    Ok(fragments)
}

/// Sorts values in their natural order and renumbers them.
///
/// Incomparable values (such as NaN) are treated as equal. The sort is
/// stable.
pub(crate) fn sort_natural<T: PartialOrd + Clone>(entries: &Entries<T>) -> Entries<T> {
    let mut values: Vec<T> = entries.values().cloned().collect();
    values.sort_by(|left, right| left.partial_cmp(right).unwrap_or(Ordering::Equal));
    reindex(values)
}

/// Sorts values with `comparator`, keeping or renumbering keys. The sort is
/// stable.
pub(crate) fn sort_with<T, F>(entries: &Entries<T>, mut comparator: F, preserve_keys: bool) -> Entries<T>
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut pairs: Vec<(Key, T)> = entries
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    pairs.sort_by(|(_, left), (_, right)| comparator(left, right));
    if preserve_keys {
        pairs.into_iter().collect()
    } else {
        reindex(pairs.into_iter().map(|(_, value)| value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn keyed(pairs: &[(&str, i32)]) -> Entries<i32> {
        from_pairs(pairs.iter().map(|(key, value)| (*key, *value)))
    }

    fn keys<T>(entries: &Entries<T>) -> Vec<Key> {
        entries.keys().cloned().collect()
    }

    // =========================================================================
    // from_pairs / merge
    // =========================================================================

    #[rstest]
    fn test_from_pairs_repeated_key_keeps_first_position() {
        let entries = keyed(&[("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(keys(&entries), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(entries[&Key::from("a")], 3);
    }

    #[rstest]
    fn test_merge_renumbers_integers_and_overwrites_strings() {
        let merged = merge(vec![
            (Key::Int(5), "five"),
            (Key::from("name"), "first"),
            (Key::Int(9), "nine"),
            (Key::Int(0), "zero"),
            (Key::from("name"), "second"),
        ]);
        let pairs: Vec<(Key, &str)> = merged.into_iter().collect();
        assert_eq!(
            pairs,
            vec![
                (Key::Int(0), "five"),
                (Key::from("name"), "second"),
                (Key::Int(1), "nine"),
                (Key::Int(2), "zero"),
            ]
        );
    }

    #[rstest]
    fn test_is_list() {
        assert!(is_list(&reindex(vec![1, 2, 3])));
        assert!(is_list(&Entries::<i32>::new()));
        assert!(!is_list(&from_pairs(vec![(1, "a"), (0, "b")])));
        assert!(!is_list(&keyed(&[("a", 1)])));
    }

    // =========================================================================
    // slice
    // =========================================================================

    #[rstest]
    #[case(0, None, vec![1, 2, 3, 4, 5])]
    #[case(1, Some(2), vec![2, 3])]
    #[case(-2, None, vec![4, 5])]
    #[case(-10, Some(2), vec![1, 2])]
    #[case(1, Some(-1), vec![2, 3, 4])]
    #[case(3, Some(-3), vec![])]
    #[case(5, None, vec![])]
    #[case(6, None, vec![])]
    #[case(2, Some(100), vec![3, 4, 5])]
    #[case(0, Some(0), vec![])]
    fn test_slice_ranges(#[case] offset: isize, #[case] length: Option<isize>, #[case] expected: Vec<i32>) {
        let entries = reindex(vec![1, 2, 3, 4, 5]);
        let sliced = slice(&entries, offset, length, false);
        assert_eq!(sliced.values().copied().collect::<Vec<_>>(), expected);
        assert!(is_list(&sliced));
    }

    #[rstest]
    fn test_slice_preserve_keys() {
        let entries = reindex(vec!["a", "b", "c"]);
        let sliced = slice(&entries, 1, None, true);
        assert_eq!(keys(&sliced), vec![Key::Int(1), Key::Int(2)]);
    }

    #[rstest]
    fn test_slice_always_keeps_string_keys() {
        let entries = from_pairs(vec![(Key::Int(4), 1), (Key::from("x"), 2), (Key::Int(8), 3)]);
        let sliced = slice(&entries, 0, None, false);
        assert_eq!(keys(&sliced), vec![Key::Int(0), Key::from("x"), Key::Int(1)]);
    }

    // =========================================================================
    // split
    // =========================================================================

    #[rstest]
    #[case("a,b,c", i64::MAX, vec!["a", "b", "c"])]
    #[case("a,b,c", 2, vec!["a", "b,c"])]
    #[case("a,b,c", 1, vec!["a,b,c"])]
    #[case("a,b,c", 0, vec!["a,b,c"])]
    #[case("a,b,c", -1, vec!["a", "b"])]
    #[case("a,b,c", -3, vec![])]
    #[case("a,b,c", -5, vec![])]
    #[case("", i64::MAX, vec![""])]
    #[case("", -1, vec![])]
    #[case("abc", i64::MAX, vec!["abc"])]
    #[case(",a,", i64::MAX, vec!["", "a", ""])]
    fn test_split(#[case] input: &str, #[case] limit: i64, #[case] expected: Vec<&str>) {
        assert_eq!(split(input, ",", limit).unwrap(), expected);
    }

    #[rstest]
    fn test_split_multi_character_separator() {
        assert_eq!(split("a::b::c", "::", 2).unwrap(), vec!["a", "b::c"]);
    }

    #[rstest]
    fn test_split_empty_separator_fails() {
        let error = split("abc", "", 1).unwrap_err();
        assert!(matches!(error, CollectionError::InvalidArgument { .. }));
    }

    // =========================================================================
    // sort
    // =========================================================================

    #[rstest]
    fn test_sort_natural_reindexes() {
        let entries = keyed(&[("x", 3), ("y", 1), ("z", 2)]);
        let sorted = sort_natural(&entries);
        assert_eq!(sorted.values().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(is_list(&sorted));
    }

    #[rstest]
    fn test_sort_natural_handles_nan() {
        let entries = reindex(vec![2.0, f64::NAN, 1.0]);
        let sorted = sort_natural(&entries);
        assert_eq!(sorted.len(), 3);
    }

    #[rstest]
    fn test_sort_with_preserves_keys() {
        let entries = keyed(&[("x", 3), ("y", 1), ("z", 2)]);
        let sorted = sort_with(&entries, i32::cmp, true);
        assert_eq!(keys(&sorted), vec![Key::from("y"), Key::from("z"), Key::from("x")]);
    }

    #[rstest]
    fn test_sort_with_is_stable() {
        let entries = reindex(vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')]);
        let sorted = sort_with(&entries, |left, right| left.0.cmp(&right.0), false);
        let letters: Vec<char> = sorted.values().map(|pair| pair.1).collect();
        assert_eq!(letters, vec!['b', 'd', 'a', 'c']);
    }
}
