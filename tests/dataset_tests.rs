//! Unit tests for DataSet.

use std::collections::HashMap;

use keyed_sets::{CollectionError, DataSet, DedupMode, JsonFlags, Key};
use rstest::rstest;
use serde_json::{Value, json};

fn pairs<T: Clone>(data: &DataSet<T>) -> Vec<(Key, T)> {
    data.iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

// =============================================================================
// Construction and accessors
// =============================================================================

#[rstest]
fn test_empty_data_set() {
    let data: DataSet<i32> = DataSet::empty();
    assert!(data.is_empty());
    assert_eq!(data.count(), 0);
    assert_eq!(data.min(), None);
    assert_eq!(data.max(), None);
    assert_eq!(data.join(","), "");
}

#[rstest]
fn test_from_other_data_set_copies_pairs() {
    let original = DataSet::from_entries([("a", 1), ("b", 2)]);
    let copy = DataSet::from(&original);
    let added = copy.add_item(3);
    assert_eq!(original.count(), 2);
    assert_eq!(copy, original);
    assert_eq!(added.count(), 3);
}

#[rstest]
fn test_from_string() {
    let data = DataSet::from_string("x|y", "|").unwrap();
    assert_eq!(data.reverse(), vec!["y".to_string(), "x".to_string()]);
    assert!(matches!(
        DataSet::from_string("x", ""),
        Err(CollectionError::InvalidArgument { .. })
    ));
}

#[rstest]
fn test_first_and_last_are_index_lookups() {
    let data = DataSet::from_entries([(Key::Int(2), "two"), (Key::Int(0), "zero"), (Key::Int(1), "one")]);
    assert_eq!(data.first(), Some(&"zero"));
    assert_eq!(data.last(), Some(&"two"));

    let gapped = DataSet::from_entries([(5, "five"), (9, "nine")]);
    assert_eq!(gapped.first(), None);
    assert_eq!(gapped.last(), None);
}

// =============================================================================
// add_item / add_items
// =============================================================================

#[rstest]
fn test_add_item_appends() {
    let data = DataSet::from(vec![1, 2]);
    let added = data.add_item(3);
    assert_eq!(added, DataSet::from(vec![1, 2, 3]));
    assert_eq!(data.count(), 2);
}

#[rstest]
fn test_add_item_renumbers_integer_keys() {
    let data = DataSet::from_entries([(Key::Int(10), "a"), (Key::from("k"), "b")]);
    let added = data.add_item("c");
    assert_eq!(
        pairs(&added),
        vec![(Key::Int(0), "a"), (Key::from("k"), "b"), (Key::Int(1), "c")]
    );
}

#[rstest]
fn test_add_item_with_string_key_overwrites_in_place() {
    let data = DataSet::from_entries([("a", 1), ("b", 2)]);
    let replaced = data.add_item_with_key(9, "a");
    assert_eq!(pairs(&replaced), vec![(Key::from("a"), 9), (Key::from("b"), 2)]);
}

#[rstest]
fn test_add_item_with_new_string_key_appends() {
    let data = DataSet::from(vec![1]);
    let added = data.add_item_with_key(2, "extra");
    assert_eq!(pairs(&added), vec![(Key::Int(0), 1), (Key::from("extra"), 2)]);
}

#[rstest]
fn test_add_items_concatenates_lists() {
    let data = DataSet::from(vec!["a", "b"]);
    let merged = data.add_items(vec!["c", "d"]);
    assert_eq!(merged, DataSet::from(vec!["a", "b", "c", "d"]));
}

#[rstest]
fn test_add_items_overwrites_string_keys() {
    let data = DataSet::from_entries([("name", "old"), ("kept", "yes")]);
    let merged = data.add_items(DataSet::from_entries([("name", "new")]));
    assert_eq!(
        pairs(&merged),
        vec![(Key::from("name"), "new"), (Key::from("kept"), "yes")]
    );
}

// =============================================================================
// contains / min / max / join
// =============================================================================

#[rstest]
fn test_contains_is_strict() {
    let data = DataSet::from(vec![json!(1), json!("2")]);
    assert!(data.contains(&json!(1)));
    assert!(!data.contains(&json!("1")));
    assert!(!data.contains(&json!(2)));
}

#[rstest]
fn test_min_max() {
    let data = DataSet::from(vec![3.5, -2.0, 10.0]);
    assert_eq!(data.min(), Some(-2.0));
    assert_eq!(data.max(), Some(10.0));
}

#[rstest]
fn test_join_coerces_values() {
    assert_eq!(DataSet::from(vec![1, 2, 3]).join(", "), "1, 2, 3");
    assert_eq!(DataSet::from(vec![true, false, true]).join("|"), "1||1");
    assert_eq!(DataSet::from(vec![1.5, 2.0]).join(";"), "1.5;2");
    assert_eq!(
        DataSet::from(vec![json!("a"), json!(null), json!(7)]).join("-"),
        "a--7"
    );
}

// =============================================================================
// deduplicate / reverse
// =============================================================================

#[rstest]
fn test_deduplicate_keeps_first_occurrence_and_key() {
    let data = DataSet::from(vec!["a", "b", "a"]);
    let unique = data.deduplicate();
    assert_eq!(pairs(&unique), vec![(Key::Int(0), "a"), (Key::Int(1), "b")]);
}

#[rstest]
#[case(DedupMode::String, vec![0, 2, 3, 4])]
#[case(DedupMode::Numeric, vec![0, 3])]
fn test_deduplicate_modes(#[case] mode: DedupMode, #[case] expected_keys: Vec<i64>) {
    let data = DataSet::from(vec![json!(1), json!("1"), json!("1.0"), json!("abc"), json!(0)]);
    let unique = data.deduplicate_with(mode);
    let keys: Vec<i64> = unique.keys().filter_map(Key::as_int).collect();
    assert_eq!(keys, expected_keys);
}

#[rstest]
fn test_reverse_returns_plain_values() {
    let data = DataSet::from_entries([("a", 1), ("b", 2), ("c", 3)]);
    assert_eq!(data.reverse(), vec![3, 2, 1]);
}

// =============================================================================
// map / filter / column
// =============================================================================

#[rstest]
fn test_map_preserving_keys() {
    let data = DataSet::from_entries([("a", 1), ("b", 2)]);
    let mapped = data.map(|value| value + 1, true);
    assert_eq!(pairs(&mapped), vec![(Key::from("a"), 2), (Key::from("b"), 3)]);
}

#[rstest]
fn test_map_reindexing() {
    let data = DataSet::from_entries([("a", 1), ("b", 2)]);
    let mapped = data.map(ToString::to_string, false);
    assert_eq!(mapped, DataSet::from(vec!["1".to_string(), "2".to_string()]));
}

#[rstest]
fn test_filter_default_predicate() {
    let data = DataSet::from(vec![0, 1, 0, 2]);
    assert_eq!(pairs(&data.filter_truthy(true)), vec![(Key::Int(1), 1), (Key::Int(3), 2)]);
    assert_eq!(data.filter_truthy(false), DataSet::from(vec![1, 2]));
}

#[rstest]
fn test_filter_with_predicate() {
    let data = DataSet::from(vec![1, 2, 3, 4]);
    let even = data.filter(|value| value % 2 == 0, false);
    assert_eq!(even, DataSet::from(vec![2, 4]));
}

#[rstest]
fn test_column_extracts_field() {
    let data = DataSet::from(vec![json!({"x": 1}), json!({"x": 2})]);
    assert_eq!(pairs(&data.column("x", false)), vec![(Key::Int(0), json!(1)), (Key::Int(1), json!(2))]);
}

#[rstest]
fn test_column_skips_records_without_field() {
    let data = DataSet::from_entries([
        ("first", json!({"id": 1})),
        ("second", json!({"name": "no id"})),
        ("third", json!({"id": 3})),
    ]);
    assert_eq!(data.column("id", false), DataSet::from(vec![json!(1), json!(3)]));
    assert_eq!(
        pairs(&data.column("id", true)),
        vec![(Key::from("first"), json!(1)), (Key::from("third"), json!(3))]
    );
}

#[rstest]
fn test_column_of_hash_maps() {
    let rows: Vec<HashMap<String, i32>> = vec![
        [("age".to_string(), 30)].into_iter().collect(),
        [("age".to_string(), 40)].into_iter().collect(),
    ];
    let ages = DataSet::from(rows).column("age", false);
    assert_eq!(ages, DataSet::from(vec![30, 40]));
}

#[rstest]
fn test_column_numeric_name_reads_list_positions() {
    let data = DataSet::from(vec![vec!["a", "b"], vec!["c", "d"]]);
    assert_eq!(data.column("1", false), DataSet::from(vec!["b", "d"]));
}

// =============================================================================
// sort / slice
// =============================================================================

#[rstest]
fn test_sort_natural() {
    let data = DataSet::from_entries([("a", "pear"), ("b", "apple")]);
    assert_eq!(data.sort(), DataSet::from(vec!["apple", "pear"]));
}

#[rstest]
fn test_sort_by_preserving_keys() {
    let data = DataSet::from(vec![30, 10, 20]);
    let sorted = data.sort_by(|left, right| left.cmp(right), true);
    assert_eq!(
        pairs(&sorted),
        vec![(Key::Int(1), 10), (Key::Int(2), 20), (Key::Int(0), 30)]
    );
    // Keys 1, 2, 0: first/last look up keys 0 and 2.
    assert_eq!(sorted.first(), Some(&30));
    assert_eq!(sorted.last(), Some(&20));
}

#[rstest]
fn test_slice() {
    let data = DataSet::from(vec![1, 2, 3, 4]);
    assert_eq!(data.slice(-3, Some(2), false), DataSet::from(vec![2, 3]));
    assert_eq!(
        pairs(&data.slice(2, None, true)),
        vec![(Key::Int(2), 3), (Key::Int(3), 4)]
    );
}

// =============================================================================
// reduce / some / every
// =============================================================================

#[rstest]
fn test_reduce_sums() {
    let data = DataSet::from(vec![1, 2, 3]);
    assert_eq!(data.reduce(|total, value| total + value, 0), 6);
}

#[rstest]
fn test_reduce_on_empty_returns_initial() {
    let data: DataSet<i32> = DataSet::empty();
    assert_eq!(data.reduce(|total, value| total + value, 42), 42);
    assert_eq!(data.reduce(|_, value| Some(*value), None), None);
}

#[rstest]
fn test_reduce_order_is_left_to_right() {
    let data = DataSet::from(vec!["a", "b", "c"]);
    let joined = data.reduce(
        |mut text, value| {
            text.push_str(value);
            text
        },
        String::new(),
    );
    assert_eq!(joined, "abc");
}

#[rstest]
fn test_some_short_circuits() {
    let data = DataSet::from(vec![1, 2, 3, 4]);
    let mut calls = 0;
    assert!(data.some(|value| {
        calls += 1;
        *value == 2
    }));
    assert_eq!(calls, 2);
    assert!(!data.some(|value| *value > 10));
}

#[rstest]
fn test_every_short_circuits() {
    let data = DataSet::from(vec![1, 2, 3, 4]);
    let mut calls = 0;
    assert!(!data.every(|value| {
        calls += 1;
        *value < 2
    }));
    assert_eq!(calls, 2);
    assert!(data.every(|value| *value > 0));
    assert!(DataSet::<i32>::empty().every(|_| false));
    assert!(!DataSet::<i32>::empty().some(|_| true));
}

// =============================================================================
// flatten
// =============================================================================

#[rstest]
fn test_flatten_keeps_nested_keys_and_skips_scalars() {
    let data = DataSet::from(vec![
        json!({"a": 1}),
        json!("not a mapping"),
        json!({"b": 2, "a": 3}),
    ]);
    let flat = data.flatten();
    assert_eq!(pairs(&flat), vec![(Key::from("a"), json!(3)), (Key::from("b"), json!(2))]);
}

#[rstest]
fn test_flatten_overwrites_integer_keys() {
    let data = DataSet::from(vec![vec![1, 2, 3], vec![9]]);
    assert_eq!(data.flatten(), DataSet::from(vec![9, 2, 3]));
}

#[rstest]
fn test_flatten_empty_is_empty() {
    let data: DataSet<Value> = DataSet::empty();
    assert!(data.flatten().is_empty());
}

// =============================================================================
// json_encode
// =============================================================================

#[rstest]
fn test_json_encode_list_and_object() {
    assert_eq!(DataSet::from(vec![1, 2, 3]).to_json().unwrap(), "[1,2,3]");
    assert_eq!(
        DataSet::from_entries([("a", 1), ("b", 2)]).to_json().unwrap(),
        r#"{"a":1,"b":2}"#
    );
    assert_eq!(
        DataSet::from(vec![1, 2, 3]).filter(|value| *value != 2, true).to_json().unwrap(),
        r#"{"0":1,"2":3}"#
    );
    assert_eq!(DataSet::<i32>::empty().to_json().unwrap(), "[]");
}

#[rstest]
fn test_json_encode_nested_data_sets() {
    let inner = DataSet::from_entries([("k", 1)]);
    let outer = DataSet::from(vec![inner.clone(), inner]);
    assert_eq!(outer.to_json().unwrap(), r#"[{"k":1},{"k":1}]"#);
}

#[rstest]
fn test_json_encode_pretty() {
    let data = DataSet::from_entries([("a", vec![1])]);
    assert_eq!(
        data.json_encode(JsonFlags::PRETTY_PRINT, 512).unwrap(),
        "{\n    \"a\": [\n        1\n    ]\n}"
    );
}

#[rstest]
fn test_json_encode_force_object() {
    let data = DataSet::from(vec!["x"]);
    assert_eq!(
        data.json_encode(JsonFlags::FORCE_OBJECT, 512).unwrap(),
        r#"{"0":"x"}"#
    );
}

#[rstest]
fn test_json_encode_escaping() {
    let data = DataSet::from(vec!["http://a/ü"]);
    assert_eq!(data.to_json().unwrap(), r#"["http://a/ü"]"#);
    assert_eq!(
        data.json_encode(JsonFlags::ESCAPE_SLASHES, 512).unwrap(),
        r#"["http:\/\/a\/ü"]"#
    );
    assert_eq!(
        data.json_encode(JsonFlags::ESCAPE_UNICODE, 512).unwrap(),
        r#"["http://a/\u00fc"]"#
    );
}

#[rstest]
fn test_json_encode_depth() {
    let data = DataSet::from(vec![vec![1]]);
    assert_eq!(data.json_encode(JsonFlags::NONE, 2).unwrap(), "[[1]]");
    assert_eq!(
        data.json_encode(JsonFlags::NONE, 1),
        Err(CollectionError::DepthExceeded { limit: 1, found: 2 })
    );
    assert_eq!(
        data.json_encode(JsonFlags::NONE, 0),
        Err(CollectionError::DepthExceeded { limit: 1, found: 2 })
    );
}
