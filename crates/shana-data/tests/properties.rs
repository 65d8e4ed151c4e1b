//! Property tests for merge, patch and query escaping.
#![allow(missing_docs)]

use proptest::prelude::*;
use serde_json::json;
use shana_data::{merge, merge_to, parse_query, Data, Patch, Path, Record};
use std::collections::HashMap;

fn arb_key() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("c".to_string()),
        "[a-z.]{1,4}",
    ]
}

fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        "[a-z]{0,6}".prop_map(serde_json::Value::from),
    ];

    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(serde_json::Value::Array),
            prop::collection::hash_map(arb_key(), inner, 0..4)
                .prop_map(|m| serde_json::Value::Object(m.into_iter().collect())),
        ]
    })
}

fn arb_data() -> impl Strategy<Value = Data> {
    prop::collection::hash_map(arb_key(), arb_json(), 0..5).prop_map(|m| {
        serde_json::from_value(serde_json::Value::Object(m.into_iter().collect())).unwrap()
    })
}

fn arb_segment() -> impl Strategy<Value = String> {
    prop_oneof!["[a-z]{0,4}", r"[a-z.\\]{0,6}", r"\PC{0,4}"]
}

#[derive(Record, Debug, Default, Clone, PartialEq)]
struct Sample {
    #[data("id")]
    id: i32,
    #[data("name,omitempty")]
    name: String,
    #[data("enabled")]
    enabled: bool,
    #[data("weights")]
    weights: Vec<u16>,
    #[data("labels")]
    labels: HashMap<String, String>,
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    (
        any::<i32>(),
        "[a-z ]{0,8}",
        any::<bool>(),
        prop::collection::vec(any::<u16>(), 0..4),
        prop::collection::hash_map("[a-z]{1,3}", "[a-z]{0,3}", 0..3),
    )
        .prop_map(|(id, name, enabled, weights, labels)| Sample {
            id,
            name,
            enabled,
            weights,
            labels,
        })
}

proptest! {
    #[test]
    fn merge_is_a_left_fold(a in arb_data(), b in arb_data(), c in arb_data()) {
        let all = merge([&a, &b, &c]);
        let folded = merge([&merge([&a, &b]), &c]);
        prop_assert_eq!(&all, &folded);

        let mut target = a.clone();
        merge_to(&mut target, [&b, &c]);
        prop_assert_eq!(&merge([&target]), &all);
    }

    #[test]
    fn merge_never_aliases_inputs(a in arb_data(), b in arb_data()) {
        let snapshot = (a.clone(), b.clone());

        let mut merged = merge([&a, &b]);
        let keys: Vec<String> = merged
            .object()
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();

        for key in &keys {
            if let Some(obj) = merged.object_mut().get_mut(key).and_then(|v| v.as_object_mut()) {
                obj.insert("injected".into(), true.into());
            }
        }
        merged.insert("injected", 1);

        prop_assert_eq!(&a, &snapshot.0);
        prop_assert_eq!(&b, &snapshot.1);
    }

    #[test]
    fn merge_keeps_every_key(a in arb_data(), b in arb_data()) {
        let merged = merge([&a, &b]);
        let merged = merged.object().unwrap();

        for input in [&a, &b] {
            for (key, value) in input.object().into_iter().flatten() {
                if !value.is_null() {
                    prop_assert!(merged.contains_key(key), "missing key {:?}", key);
                }
            }
        }
    }

    #[test]
    fn deleting_every_key_empties_data(d in arb_data()) {
        let keys: Vec<String> = d
            .object()
            .map(|obj| obj.keys().map(|k| shana_data::escape_segment(k)).collect())
            .unwrap_or_default();
        let deletes: Vec<&str> = keys.iter().map(String::as_str).collect();

        let mut patch = Patch::new();
        patch.add(&deletes, HashMap::new());
        let patched = patch.apply(&d).unwrap();

        prop_assert!(patched.is_empty());
    }

    #[test]
    fn escaped_segments_parse_back(segments in prop::collection::vec(arb_segment(), 1..5)) {
        prop_assume!(!(segments.len() == 1 && segments[0].is_empty()));

        let path = Path::from_segments(segments.clone());
        let query = path.to_string();

        prop_assert_eq!(parse_query(&query), segments);
        prop_assert_eq!(query.parse::<Path>().unwrap(), path);
    }

    #[test]
    fn escaped_key_is_queryable(key in arb_segment(), n in any::<i64>()) {
        prop_assume!(!key.is_empty());

        let mut d = Data::default();
        d.insert(key.clone(), n);
        let query = shana_data::escape_segment(&key);

        prop_assert_eq!(d.query(&query), d.get(&[key.as_str()]));
        prop_assert!(d.query(&query).is_some());
    }

    #[test]
    fn record_survives_encode_decode(sample in arb_sample()) {
        let encoded = shana_data::encode(&sample);

        let mut decoded = Sample::default();
        shana_data::decode(&encoded, &mut decoded).unwrap();
        prop_assert_eq!(&decoded, &sample);

        let text = encoded.to_string();
        let reparsed = Data::from_json_str(&text).unwrap();
        prop_assert_eq!(&reparsed, &encoded);
    }
}

#[test]
fn merge_of_nothing_is_nil() {
    let none: [&Data; 0] = [];
    assert!(merge(none).is_nil());

    let d: Data = serde_json::from_value(json!({"a": 1})).unwrap();
    assert_eq!(merge([&d]), d);
}
