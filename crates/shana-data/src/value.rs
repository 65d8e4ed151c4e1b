//! Generic value model.
//!
//! A [`Value`] is a tagged union over the shapes the container may hold:
//! scalars, sequences, string-keyed objects, generic mappings and the two
//! well-known types (duration, timestamp). Typed records never appear inside
//! a `Value`; they are projected in and out by the encoder and decoder.

use crate::duration::format_duration;
use crate::encode::Encode;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// String-keyed association underlying every [`crate::Data`].
///
/// Insertion order carries no meaning.
pub type Object = HashMap<String, Value>;

/// The element kind of a sequence.
///
/// Two sequences are concatenated by a merge only when their kinds match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Mixed or unknown elements.
    #[default]
    Any,
    Bool,
    Int,
    Uint,
    Float,
    Complex,
    String,
    Duration,
    Time,
    Array,
    Object,
    Map,
}

/// An ordered sequence tagged with its element kind.
#[derive(Clone, Debug, Default)]
pub struct Array {
    kind: Kind,
    items: Vec<Value>,
}

impl Array {
    /// Create an empty array of the given element kind.
    #[inline]
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Create an array from items.
    #[inline]
    pub fn with_items(kind: Kind, items: Vec<Value>) -> Self {
        Self { kind, items }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    #[inline]
    pub fn items_mut(&mut self) -> &mut Vec<Value> {
        &mut self.items
    }

    #[inline]
    pub fn into_items(self) -> Vec<Value> {
        self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }
}

/// A mapping whose keys are not strings.
///
/// Keys are matched by their textual rendering (see [`Value::key_text`]), so
/// `Int(123)` is found by the path segment `"123"`.
#[derive(Clone, Debug, Default)]
pub struct Mapping {
    entries: Vec<(Value, Value)>,
}

impl Mapping {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry whose key renders the same.
    pub fn insert(&mut self, key: Value, value: Value) {
        let text = key.key_text();

        match self.entries.iter_mut().find(|(k, _)| k.key_text() == text) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Look up an entry by the textual rendering of its key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.key_text() == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.key_text() == key)
            .map(|(_, v)| v)
    }

    /// Remove an entry by the textual rendering of its key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let pos = self.entries.iter().position(|(k, _)| k.key_text() == key)?;
        Some(self.entries.swap_remove(pos).1)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Value, Value)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut mapping = Mapping::new();
        for (k, v) in iter {
            mapping.insert(k, v);
        }
        mapping
    }
}

/// A complex number.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.re == 0.0 && self.im == 0.0
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}{:+}i)", self.re, self.im)
    }
}

/// A numeric literal carried as text.
///
/// The encoder projects it as an integer when it parses as one, then as a
/// float, and only falls back to the raw string otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Number(String);

impl Number {
    #[inline]
    pub fn new(literal: impl Into<String>) -> Self {
        Self(literal.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Number {
    fn from(s: &str) -> Self {
        Number(s.to_owned())
    }
}

impl From<String> for Number {
    fn from(s: String) -> Self {
        Number(s)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generic, type-erased value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Complex(Complex),
    String(String),
    Duration(Duration),
    Time(DateTime<Utc>),
    Array(Array),
    Object(Object),
    Map(Mapping),
}

impl Value {
    /// Name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::String(_) => "string",
            Value::Duration(_) => "duration",
            Value::Time(_) => "time",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Map(_) => "map",
        }
    }

    /// The kind this value contributes as a sequence element.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Any,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Uint(_) => Kind::Uint,
            Value::Float(_) => Kind::Float,
            Value::Complex(_) => Kind::Complex,
            Value::String(_) => Kind::String,
            Value::Duration(_) => Kind::Duration,
            Value::Time(_) => Kind::Time,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
            Value::Map(_) => Kind::Map,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Whether the value counts as empty for `omitempty`: absent, a zero
    /// scalar or an empty container. The zero timestamp is the Unix epoch,
    /// which is also `DateTime::<Utc>::default()`.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Complex(c) => c.is_zero(),
            Value::String(s) => s.is_empty(),
            Value::Duration(d) => d.is_zero(),
            Value::Time(t) => t.timestamp() == 0 && t.timestamp_subsec_nanos() == 0,
            Value::Array(arr) => arr.is_empty(),
            Value::Object(obj) => obj.is_empty(),
            Value::Map(map) => map.is_empty(),
        }
    }

    /// Textual rendering used to match mapping keys against path segments.
    pub fn key_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Complex(c) => c.to_string(),
            Value::String(s) => s.clone(),
            Value::Duration(d) => format_duration(*d),
            Value::Time(t) => format_time(t),
            Value::Array(_) | Value::Object(_) | Value::Map(_) => self.to_string(),
        }
    }

    /// Canonical JSON form: object keys sorted recursively, well-known values
    /// rendered as strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Uint(u) => Json::from(*u),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Complex(c) => Json::String(c.to_string()),
            Value::String(s) => Json::String(s.clone()),
            Value::Duration(d) => Json::String(format_duration(*d)),
            Value::Time(t) => Json::String(format_time(t)),
            Value::Array(arr) => Json::Array(arr.iter().map(Value::to_json).collect()),
            Value::Object(obj) => {
                let mut keys: Vec<&String> = obj.keys().collect();
                keys.sort();
                let mut map = serde_json::Map::with_capacity(keys.len());
                for k in keys {
                    map.insert(k.clone(), obj[k].to_json());
                }
                Json::Object(map)
            }
            Value::Map(mapping) => {
                let mut entries: Vec<(String, &Value)> =
                    mapping.iter().map(|(k, v)| (k.key_text(), v)).collect();
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                Json::Object(entries.into_iter().map(|(k, v)| (k, v.to_json())).collect())
            }
        }
    }

    /// Serialize the canonical form, compact or indented.
    pub fn to_json_string(&self, pretty: bool) -> String {
        let json = self.to_json();

        if pretty {
            serde_json::to_string_pretty(&json).unwrap_or_default()
        } else {
            json.to_string()
        }
    }
}

fn format_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Values are equal when their canonical forms are equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.to_json() == other.to_json()
    }
}

/// Compact canonical text; `{:#}` selects the indented form.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json_string(f.alternate()))
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Uint(v), Value::Int))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Array(Array::with_items(Kind::Any, items)))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((k, v)) = map.next_entry::<Value, Value>()? {
            entries.push((k, v));
        }

        if entries.iter().all(|(k, _)| matches!(k, Value::String(_))) {
            let obj = entries
                .into_iter()
                .map(|(k, v)| match k {
                    Value::String(s) => (s, v),
                    other => (other.key_text(), v),
                })
                .collect();
            Ok(Value::Object(obj))
        } else {
            Ok(Value::Map(entries.into_iter().collect()))
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(Array::with_items(
                Kind::Any,
                items.into_iter().map(Value::from).collect(),
            )),
            Json::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

macro_rules! impl_from_scalar {
    ($variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )+
    };
}

impl_from_scalar!(Int as i64: i8, i16, i32, i64, isize);
impl_from_scalar!(Uint as u64: u8, u16, u32, u64, usize);
impl_from_scalar!(Float as f64: f32, f64);

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Complex> for Value {
    fn from(v: Complex) -> Self {
        Value::Complex(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::Time(v)
    }
}

impl From<Array> for Value {
    fn from(v: Array) -> Self {
        Value::Array(v)
    }
}

impl From<Object> for Value {
    fn from(v: Object) -> Self {
        Value::Object(v)
    }
}

impl From<Mapping> for Value {
    fn from(v: Mapping) -> Self {
        Value::Map(v)
    }
}

/// Builds an array whose element kind is taken from `T`.
impl<T: Encode + Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(Array::with_items(
            T::KIND,
            items.into_iter().map(Into::into).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_type_name() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::from(1).type_name(), "int");
        assert_eq!(Value::from(1u8).type_name(), "uint");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::from(Object::new()).type_name(), "object");
    }

    #[test]
    fn test_canonical_form_sorts_keys() {
        let value = Value::from(json!({"b": 1, "a": {"d": [1, 2], "c": null}}));
        assert_eq!(value.to_string(), r#"{"a":{"c":null,"d":[1,2]},"b":1}"#);
    }

    #[test]
    fn test_well_known_rendering() {
        let time = Utc.with_ymd_and_hms(2023, 2, 23, 14, 15, 16).unwrap();
        assert_eq!(Value::Time(time).to_string(), r#""2023-02-23T14:15:16Z""#);
        assert_eq!(
            Value::Duration(Duration::from_millis(8321)).to_string(),
            r#""8.321s""#
        );
        assert_eq!(Complex::new(34.0, 5.5).to_string(), "(34+5.5i)");
        assert_eq!(Complex::new(78.9, -10.0).to_string(), "(78.9-10i)");
    }

    #[test]
    fn test_equality_ignores_integer_signedness() {
        assert_eq!(Value::Int(5), Value::Uint(5));
        assert_ne!(Value::Int(5), Value::Float(5.5));
        assert_eq!(
            Value::from(vec![1i64, 2]),
            Value::from(json!([1, 2]))
        );
    }

    #[test]
    fn test_mapping_key_text() {
        let mut mapping = Mapping::new();
        mapping.insert(Value::Int(123), Value::from("a"));
        mapping.insert(Value::Float(0.5), Value::from("b"));
        mapping.insert(Value::Uint(123), Value::from("c"));

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("123"), Some(&Value::from("c")));
        assert_eq!(mapping.get("0.5"), Some(&Value::from("b")));
        assert!(mapping.remove("0.5").is_some());
        assert!(mapping.get("0.5").is_none());
    }

    #[test]
    fn test_deserialize_numbers() {
        let value: Value = serde_json::from_str(r#"[1, -2, 18446744073709551615, 2.5]"#).unwrap();
        let arr = value.as_array().unwrap();
        assert!(matches!(arr.items()[0], Value::Int(1)));
        assert!(matches!(arr.items()[1], Value::Int(-2)));
        assert!(matches!(arr.items()[2], Value::Uint(u64::MAX)));
        assert!(matches!(arr.items()[3], Value::Float(f) if f == 2.5));
        assert_eq!(arr.kind(), Kind::Any);
    }

    #[test]
    fn test_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(Value::from(0).is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::from(Object::new()).is_empty());
        assert!(Value::from(false).is_empty());
        assert!(Value::Time(DateTime::<Utc>::default()).is_empty());
        assert!(!Value::from(" ").is_empty());
        assert!(!Value::from(vec![0u8]).is_empty());
    }
}
