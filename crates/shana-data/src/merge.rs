//! Deep merge of generic data.
//!
//! Values are combined left to right. For each key present on both sides:
//!
//! - an incoming `Null` keeps the existing value;
//! - a missing or `Null` existing value takes a copy of the incoming one;
//! - objects merge key by key, and so do mappings;
//! - sequences of the same element kind are concatenated;
//! - anything else is replaced by a copy of the incoming value.
//!
//! Inputs are never modified and the result shares nothing with them.

use crate::data::Data;
use crate::value::{Mapping, Object, Value};

/// Merge `values` left to right into a new `Data`.
///
/// # Examples
///
/// ```
/// use shana_data::{merge, Data};
/// use serde_json::json;
///
/// let a: Data = serde_json::from_value(json!({"list": [1], "obj": {"x": 1}})).unwrap();
/// let b: Data = serde_json::from_value(json!({"list": [2], "obj": {"y": 2}})).unwrap();
///
/// let merged = merge([&a, &b]);
/// assert_eq!(merged.to_string(), r#"{"list":[1,2],"obj":{"x":1,"y":2}}"#);
/// ```
pub fn merge<'a, I>(values: I) -> Data
where
    I: IntoIterator<Item = &'a Data>,
{
    let mut values = values.into_iter().peekable();

    if values.peek().is_none() {
        return Data::default();
    }

    let mut target = Data::make(Object::new());
    merge_to(&mut target, values);
    target
}

/// Merge `values` left to right into `target`.
///
/// Does nothing when `values` is empty, so a nil target stays nil.
pub fn merge_to<'a, I>(target: &mut Data, values: I)
where
    I: IntoIterator<Item = &'a Data>,
{
    let mut values = values.into_iter().peekable();

    if values.peek().is_none() {
        return;
    }

    let obj = target.object_mut();

    for value in values {
        if let Some(incoming) = value.object() {
            tracing::trace!(keys = incoming.len(), "merging object");
            merge_object(obj, incoming);
        }
    }
}

/// Merge `incoming` into `target` key by key.
pub fn merge_object(target: &mut Object, incoming: &Object) {
    for (key, value) in incoming {
        match target.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None if value.is_null() => {}
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_mapping(target: &mut Mapping, incoming: &Mapping) {
    for (key, value) in incoming.iter() {
        match target.get_mut(&key.key_text()) {
            Some(existing) => merge_value(existing, value),
            None if value.is_null() => {}
            None => target.insert(key.clone(), value.clone()),
        }
    }
}

/// Merge `incoming` into `target` in place.
pub fn merge_value(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (_, Value::Null) => {}
        (Value::Object(a), Value::Object(b)) => merge_object(a, b),
        (Value::Map(a), Value::Map(b)) => merge_mapping(a, b),
        (Value::Array(a), Value::Array(b)) if a.kind() == b.kind() => {
            a.items_mut().extend(b.iter().cloned());
        }
        (target, incoming) => *target = incoming.clone(),
    }
}
