//! Integration tests for merging and patching.
#![allow(missing_docs)]

use serde_json::json;
use shana_data::{merge, merge_to, Data, DataError, Object, Patch, PatchAction, Value};
use std::collections::HashMap;

fn data(json: serde_json::Value) -> Data {
    serde_json::from_value(json).unwrap()
}

fn updates(entries: &[(&str, serde_json::Value)]) -> HashMap<String, Data> {
    entries
        .iter()
        .map(|(query, value)| (query.to_string(), data(value.clone())))
        .collect()
}

/// Apply a single-action patch both ways and check that they agree.
fn apply_single(
    deletes: &[&str],
    updates: HashMap<String, Data>,
    target: &Data,
) -> Result<Data, DataError> {
    let mut patch = Patch::new();
    patch.add(deletes, updates.clone());

    assert_eq!(
        patch.actions(),
        [PatchAction {
            deletes: deletes.iter().map(|s| s.to_string()).collect(),
            updates,
        }]
    );

    let applied = patch.apply(target);

    let mut in_place = target.clone();
    let result = patch.apply_to(&mut in_place);

    match &applied {
        Ok(applied) => {
            assert!(result.is_ok());
            assert_eq!(*applied, in_place);
        }
        Err(_) => assert!(result.is_err()),
    }

    applied
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_merge_single_empty() {
    let merged = merge([&Data::default()]);
    assert!(merged.is_empty());
    assert_eq!(merged.to_string(), "{}");
}

#[test]
fn test_merge_copy() {
    let input = data(json!({"a": 1}));
    let merged = merge([&input]);
    assert_eq!(merged, input);
}

#[test]
fn test_merge_typical() {
    let mut first_map = Object::new();
    first_map.insert("a".into(), Value::from(true));
    first_map.insert("b".into(), Value::from("string"));
    first_map.insert("d".into(), Value::from(vec![1i8, 2, 3]));

    let mut second_map = Object::new();
    second_map.insert("a".into(), Value::from(false));
    second_map.insert("c".into(), Value::from(123));
    second_map.insert("d".into(), Value::from(vec![4u64, 5]));

    let mut nil_map = Data::default();
    nil_map.insert("map", Value::Null);

    let mut first = data(json!({
        "str": "abcdefg",
        "int": 1234,
        "float": -43.21,
        "slice": ["first", "second"],
    }));
    first.insert("map", first_map);

    let mut second = data(json!({
        "str": "zyxwvu",
        "uint": 5678,
        "nil": null,
        "slice": ["third", "forth"],
    }));
    second.insert("map", second_map);

    let expected = data(json!({
        "str": "zyxwvu",
        "int": 1234,
        "uint": 5678,
        "float": -43.21,
        "slice": ["first", "second", "third", "forth"],
        "map": {
            "a": false,
            "b": "string",
            "c": 123,
            // Sequences of different element kinds are replaced.
            "d": [4, 5],
        },
    }));

    let merged = merge([&nil_map, &first, &second]);
    assert_eq!(merged, expected);
    assert!(!merged.object().unwrap().contains_key("nil"));

    let mut target = nil_map.clone();
    merge_to(&mut target, [&first, &second]);
    assert_eq!(target, expected);
}

#[test]
fn test_merge_result_is_independent() {
    let first = data(json!({"nested": {"list": [1]}}));
    let second = data(json!({"nested": {"list": [2]}}));

    let mut merged = merge([&first, &second]);
    merged.insert("this-is-a-key-not-exist", true);
    merged
        .query_mut("nested")
        .and_then(Value::as_object_mut)
        .unwrap()
        .insert("added".into(), Value::from(1));

    for input in [&first, &second] {
        assert!(input.query("this-is-a-key-not-exist").is_none());
        assert!(input.query("nested.added").is_none());
    }
    assert_eq!(first, data(json!({"nested": {"list": [1]}})));
}

// ============================================================================
// Patch
// ============================================================================

#[test]
fn test_patch_example() {
    let mut patch = Patch::new();
    patch.add(&["v2", "v3.1", "v4.v4-1"], HashMap::new());
    patch.add(
        &[],
        updates(&[
            ("", json!({"v1": [2, 3], "v2": 456})),
            ("v4", json!({"v4-1": "new"})),
        ]),
    );
    patch.add(&["v4.v4-2"], updates(&[("v4", json!({"v4-2": {"new": true}}))]));

    let mut target = data(json!({
        "v1": [1],
        "v2": 123,
        "v3": ["first", "second", "third"],
        "v4": {"v4-1": "old", "v4-2": {"old": true}},
    }));
    patch.apply_to(&mut target).unwrap();

    assert_eq!(
        target.to_string(),
        r#"{"v1":[1,2,3],"v2":456,"v3":["first","third"],"v4":{"v4-1":"new","v4-2":{"new":true}}}"#
    );
}

#[test]
fn test_patch_nothing() {
    let target = data(json!({"a": {"b": [1, 2]}}));
    assert_eq!(apply_single(&[], HashMap::new(), &target).unwrap(), target);
}

#[test]
fn test_patch_delete_all() {
    let target = data(json!({"a": 1}));
    let result = apply_single(&[""], HashMap::new(), &target).unwrap();
    assert!(result.is_nil());
}

#[test]
fn test_patch_delete_array_element() {
    let target = data(json!({"arr": [1, 2, 3]}));
    let result = apply_single(&["arr.1"], HashMap::new(), &target).unwrap();
    assert_eq!(result, data(json!({"arr": [1, 3]})));
}

#[test]
fn test_patch_update_nested() {
    let target = data(json!({
        "v1": 1,
        "v2": 2,
        "v3": {"arr": [1, 2], "map": {"k1": true}},
        "v4": [null, null, [null, [null, null, {"v4-1": "old"}]]],
    }));

    let result = apply_single(
        &[],
        updates(&[
            ("", json!({"v2": 222, "v3": {"arr": [3, 4]}})),
            ("v3.map", json!({"k1": false, "k2": 999})),
            ("v4.2.1.2", json!({"v4-1": "new", "v4-2": 2222})),
        ]),
        &target,
    )
    .unwrap();

    assert_eq!(
        result,
        data(json!({
            "v1": 1,
            "v2": 222,
            "v3": {"arr": [1, 2, 3, 4], "map": {"k1": false, "k2": 999}},
            "v4": [null, null, [null, [null, null, {"v4-1": "new", "v4-2": 2222}]]],
        }))
    );
}

#[test]
fn test_patch_delete_and_update() {
    let target = data(json!({
        "string": "abcd",
        "sub_type": {"int8": -8, "int32": -32},
        "anonymous_type": {"data_list": [{"a": 1}, {}, {"b": true}]},
    }));

    let result = apply_single(
        &["sub_type", "anonymous_type.data_list.1"],
        updates(&[
            ("", json!({"string": "xyz", "sub_type": {"int32": -32000}})),
            ("anonymous_type.data_list.1", json!({"a": "aaaa", "b": "bbbb"})),
        ]),
        &target,
    )
    .unwrap();

    assert_eq!(
        result,
        data(json!({
            "string": "xyz",
            "sub_type": {"int32": -32000},
            "anonymous_type": {"data_list": [{"a": 1}, {"a": "aaaa", "b": "bbbb"}]},
        }))
    );
}

#[test]
fn test_patch_delete_invalid_path() {
    let target = data(json!({"arr": [1, 2, 3]}));
    let result = apply_single(&["arr.3", "foo", "arr.x.y"], HashMap::new(), &target).unwrap();
    assert_eq!(result, target);
}

#[test]
fn test_patch_update_invalid_path() {
    let target = data(json!({"arr": [1, 2, 3]}));
    let err = apply_single(&[], updates(&[("foo", json!({"bar": 1}))]), &target).unwrap_err();
    assert!(matches!(err, DataError::InvalidQuery { ref query } if query == "foo"));
}

#[test]
fn test_patch_update_invalid_type() {
    let target = data(json!({"foo": 123}));
    let err = apply_single(&[], updates(&[("foo", json!({"bar": 1}))]), &target).unwrap_err();
    assert!(matches!(err, DataError::UnsupportedType { found: "int", .. }));
}

#[test]
fn test_patch_is_plain_data() {
    let mut patch = Patch::new();
    patch.add(&["a.b"], updates(&[("c", json!({"d": 1}))]));

    let encoded = shana_data::encode(&patch);
    assert_eq!(
        encoded.to_json(),
        json!({"actions": [{"deletes": ["a.b"], "updates": {"c": {"d": 1}}}]})
    );

    let mut decoded = Patch::new();
    shana_data::decode(&encoded, &mut decoded).unwrap();
    assert_eq!(decoded, patch);

    let text = serde_json::to_string(&patch).unwrap();
    let parsed: Patch = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, patch);
}
