//! The top-level generic container.

use crate::error::{DataError, DataResult};
use crate::path::{self, parse_query};
use crate::value::{Object, Value};
use serde::de::{Deserialize, Deserializer, Error as _};
use serde::{Serialize, Serializer};
use std::fmt;

/// A generic, schema-less object.
///
/// `Data` is either nil (never populated) or wraps an [`Object`]. A nil `Data`
/// and an empty one are distinguishable through [`Data::is_nil`] but compare
/// equal and both render as `{}`.
///
/// # Examples
///
/// ```
/// use shana_data::{Data, Value};
/// use serde_json::json;
///
/// let data: Data = serde_json::from_value(json!({"a": {"b": 1}})).unwrap();
/// assert_eq!(data.query("a.b"), Some(&Value::Int(1)));
/// assert_eq!(data.to_string(), r#"{"a":{"b":1}}"#);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Data {
    raw: Value,
}

impl Data {
    /// Wrap an object.
    #[inline]
    pub fn make(obj: Object) -> Self {
        Self {
            raw: Value::Object(obj),
        }
    }

    /// Wrap a value if it is an object; anything else yields a nil `Data`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(obj) => Self::make(obj),
            _ => Self::default(),
        }
    }

    /// Returns true if the data was never populated.
    #[inline]
    pub fn is_nil(&self) -> bool {
        self.raw.is_null()
    }

    /// Number of top-level entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.object().map_or(0, Object::len)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The underlying object, if populated.
    #[inline]
    pub fn object(&self) -> Option<&Object> {
        self.raw.as_object()
    }

    /// The underlying object, created empty if the data is nil.
    pub fn object_mut(&mut self) -> &mut Object {
        if !self.raw.is_object() {
            self.raw = Value::Object(Object::new());
        }

        match &mut self.raw {
            Value::Object(obj) => obj,
            _ => unreachable!("raw was just set to an object"),
        }
    }

    /// The data as a value: `Null` when nil, otherwise an object.
    #[inline]
    pub fn as_value(&self) -> &Value {
        &self.raw
    }

    #[inline]
    pub fn into_value(self) -> Value {
        self.raw
    }

    #[inline]
    pub fn into_object(self) -> Object {
        match self.raw {
            Value::Object(obj) => obj,
            _ => Object::new(),
        }
    }

    /// Insert a top-level entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.object_mut().insert(key.into(), value.into())
    }

    /// Resolve a list of segments.
    ///
    /// Returns `None` as soon as a segment cannot be resolved. Zero segments
    /// return the whole object, or `None` when nil.
    #[inline]
    pub fn get<S: AsRef<str>>(&self, fields: &[S]) -> Option<&Value> {
        path::lookup(&self.raw, fields)
    }

    /// Resolve a query string such as `"servers.0.host"`.
    #[inline]
    pub fn query(&self, query: &str) -> Option<&Value> {
        self.get(&parse_query(query))
    }

    /// Resolve a query string for in-place modification.
    #[inline]
    pub fn query_mut(&mut self, query: &str) -> Option<&mut Value> {
        path::lookup_mut(&mut self.raw, &parse_query(query))
    }

    /// Remove the entry addressed by `fields`.
    ///
    /// Removing from a sequence compacts it. Zero segments clear the whole
    /// data back to nil. Missing paths are ignored.
    pub fn delete<S: AsRef<str>>(&mut self, fields: &[S]) {
        if fields.is_empty() {
            self.raw = Value::Null;
            return;
        }

        path::remove(&mut self.raw, fields);
    }

    /// Remove the entry addressed by a query string.
    #[inline]
    pub fn delete_query(&mut self, query: &str) {
        self.delete(&parse_query(query));
    }

    /// Serialize the canonical form, compact or indented.
    pub fn to_json_string(&self, pretty: bool) -> String {
        match &self.raw {
            Value::Null => "{}".to_string(),
            value => value.to_json_string(pretty),
        }
    }

    /// Canonical JSON form; nil renders as an empty object.
    pub fn to_json(&self) -> serde_json::Value {
        match &self.raw {
            Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            value => value.to_json(),
        }
    }

    /// Parse a JSON object.
    pub fn from_json_str(s: &str) -> DataResult<Self> {
        serde_json::from_str(s).map_err(DataError::from)
    }
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string(f.alternate()))
    }
}

impl From<Object> for Data {
    fn from(obj: Object) -> Self {
        Data::make(obj)
    }
}

impl From<Data> for Value {
    fn from(data: Data) -> Self {
        Value::Object(data.into_object())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Data::make(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl Serialize for Data {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Data {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Object(obj) => Ok(Data::make(obj)),
            Value::Null => Ok(Data::default()),
            other => Err(D::Error::custom(format!(
                "expected an object, found {}",
                other.type_name()
            ))),
        }
    }
}
