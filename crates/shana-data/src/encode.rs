//! Projection of typed values into the generic model.
//!
//! Every encodable type implements [`Encode`]. Records get their impl from
//! `#[derive(Record)]`, which routes each field through
//! [`Encoder::encode_record_field`] so that tags, name conversion,
//! `omitempty` and `squash` are applied uniformly.

use crate::data::Data;
use crate::duration::format_duration;
use crate::name::NameConverter;
use crate::record::FieldSchema;
use crate::value::{Array, Complex, Kind, Mapping, Number, Object, Value};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::mpsc::{Receiver, Sender, SyncSender};
use std::sync::Arc;
use std::time::Duration;

/// Default tag name read from field attributes.
pub const DEFAULT_TAG_NAME: &str = "data";

/// A type that can be projected into a [`Value`].
pub trait Encode {
    /// The kind of value this type produces, used as the element kind of
    /// sequences built from it.
    const KIND: Kind = Kind::Any;

    /// Whether an empty projection surfaces as nil data from
    /// [`Encoder::encode`]. Set for string-keyed maps.
    const NIL_WHEN_EMPTY: bool = false;

    /// Project `self` into a generic value.
    fn encode(&self, enc: &Encoder) -> Value;
}

/// Encoding options.
///
/// # Examples
///
/// ```
/// use shana_data::{Encoder, Record};
/// use shana_data::name::snake_case;
///
/// #[derive(Record)]
/// struct Server {
///     #[data("addr")]
///     listen: String,
///     max_conns: u32,
///     #[data(",omitempty")]
///     label: String,
/// }
///
/// let enc = Encoder::new().with_name_converter(snake_case);
/// let data = enc.encode(&Server {
///     listen: ":80".into(),
///     max_conns: 8,
///     label: String::new(),
/// });
/// assert_eq!(data.to_string(), r#"{"addr":":80","max_conns":8}"#);
/// ```
#[derive(Clone, Debug)]
pub struct Encoder {
    tag_name: Cow<'static, str>,
    omit_empty: bool,
    name_converter: Option<NameConverter>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            tag_name: Cow::Borrowed(DEFAULT_TAG_NAME),
            omit_empty: false,
            name_converter: None,
        }
    }
}

impl Encoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read field tags from `tag_name` instead of `data`.
    pub fn with_tag_name(mut self, tag_name: impl Into<Cow<'static, str>>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Omit empty values for every field, not only those tagged `omitempty`.
    pub fn with_omit_empty(mut self, omit_empty: bool) -> Self {
        self.omit_empty = omit_empty;
        self
    }

    /// Convert field names without an alias.
    pub fn with_name_converter(mut self, converter: NameConverter) -> Self {
        self.name_converter = Some(converter);
        self
    }

    #[inline]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    #[inline]
    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    #[inline]
    pub fn name_converter(&self) -> Option<NameConverter> {
        self.name_converter
    }

    /// Encode a record or a string-keyed map.
    ///
    /// Anything that does not project to an object yields an empty `Data`,
    /// and so does a string-keyed map without entries.
    pub fn encode<T: Encode + ?Sized>(&self, value: &T) -> Data {
        match value.encode(self) {
            Value::Object(obj) if obj.is_empty() && T::NIL_WHEN_EMPTY => Data::default(),
            encoded => Data::from_value(encoded),
        }
    }

    /// Encode one record field into `obj`.
    pub fn encode_record_field<T: Encode + ?Sized>(
        &self,
        obj: &mut Object,
        field: &FieldSchema,
        value: &T,
    ) {
        let tag = field.field_tag(&self.tag_name);

        if tag.skipped {
            return;
        }

        let encoded = value.encode(self);

        if (tag.omit_empty || self.omit_empty) && encoded.is_empty() {
            return;
        }

        match encoded {
            Value::Object(inner) if tag.squash => obj.extend(inner),
            encoded => {
                obj.insert(field.key(&tag, self.name_converter), encoded);
            }
        }
    }
}

macro_rules! impl_encode_scalar {
    ($kind:ident, $variant:ident as $target:ty: $($ty:ty),+) => {
        $(
            impl Encode for $ty {
                const KIND: Kind = Kind::$kind;

                #[inline]
                fn encode(&self, _: &Encoder) -> Value {
                    Value::$variant(*self as $target)
                }
            }
        )+
    };
}

impl_encode_scalar!(Int, Int as i64: i8, i16, i32, i64, isize);
impl_encode_scalar!(Uint, Uint as u64: u8, u16, u32, u64, usize);
impl_encode_scalar!(Float, Float as f64: f32, f64);

impl Encode for bool {
    const KIND: Kind = Kind::Bool;

    fn encode(&self, _: &Encoder) -> Value {
        Value::Bool(*self)
    }
}

impl Encode for str {
    const KIND: Kind = Kind::String;

    fn encode(&self, _: &Encoder) -> Value {
        Value::String(self.to_owned())
    }
}

impl Encode for String {
    const KIND: Kind = Kind::String;

    fn encode(&self, _: &Encoder) -> Value {
        Value::String(self.clone())
    }
}

/// Integers first, then floats, then the raw literal.
impl Encode for Number {
    fn encode(&self, _: &Encoder) -> Value {
        let literal = self.as_str();

        if let Ok(i) = literal.parse::<i64>() {
            return Value::Int(i);
        }

        if let Ok(f) = literal.parse::<f64>() {
            return Value::Float(f);
        }

        Value::String(literal.to_owned())
    }
}

impl Encode for Complex {
    const KIND: Kind = Kind::Complex;

    fn encode(&self, _: &Encoder) -> Value {
        Value::Complex(*self)
    }
}

/// Durations travel as literals; zero is the empty string.
impl Encode for Duration {
    const KIND: Kind = Kind::String;

    fn encode(&self, _: &Encoder) -> Value {
        if self.is_zero() {
            return Value::String(String::new());
        }

        Value::String(format_duration(*self))
    }
}

impl Encode for DateTime<Utc> {
    const KIND: Kind = Kind::Time;

    fn encode(&self, _: &Encoder) -> Value {
        Value::Time(*self)
    }
}

impl Encode for Value {
    fn encode(&self, _: &Encoder) -> Value {
        self.clone()
    }
}

impl Encode for Data {
    const KIND: Kind = Kind::Object;

    fn encode(&self, _: &Encoder) -> Value {
        Value::Object(self.object().cloned().unwrap_or_default())
    }
}

impl<T: Encode> Encode for Option<T> {
    const KIND: Kind = T::KIND;
    const NIL_WHEN_EMPTY: bool = T::NIL_WHEN_EMPTY;

    fn encode(&self, enc: &Encoder) -> Value {
        match self {
            Some(v) => v.encode(enc),
            None => Value::Null,
        }
    }
}

macro_rules! impl_encode_deref {
    ($($ty:ident),+) => {
        $(
            impl<T: Encode + ?Sized> Encode for $ty<T> {
                const KIND: Kind = T::KIND;
                const NIL_WHEN_EMPTY: bool = T::NIL_WHEN_EMPTY;

                #[inline]
                fn encode(&self, enc: &Encoder) -> Value {
                    (**self).encode(enc)
                }
            }
        )+
    };
}

impl_encode_deref!(Box, Rc, Arc);

impl<T: Encode + ?Sized> Encode for &T {
    const KIND: Kind = T::KIND;
    const NIL_WHEN_EMPTY: bool = T::NIL_WHEN_EMPTY;

    fn encode(&self, enc: &Encoder) -> Value {
        (**self).encode(enc)
    }
}

impl<T: Encode + ?Sized> Encode for &mut T {
    const KIND: Kind = T::KIND;
    const NIL_WHEN_EMPTY: bool = T::NIL_WHEN_EMPTY;

    fn encode(&self, enc: &Encoder) -> Value {
        (**self).encode(enc)
    }
}

fn encode_seq<'a, T: Encode + 'a>(enc: &Encoder, items: impl Iterator<Item = &'a T>) -> Value {
    Value::Array(Array::with_items(
        T::KIND,
        items.map(|item| item.encode(enc)).collect(),
    ))
}

impl<T: Encode> Encode for [T] {
    const KIND: Kind = Kind::Array;

    fn encode(&self, enc: &Encoder) -> Value {
        encode_seq(enc, self.iter())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    const KIND: Kind = Kind::Array;

    fn encode(&self, enc: &Encoder) -> Value {
        encode_seq(enc, self.iter())
    }
}

impl<T: Encode> Encode for Vec<T> {
    const KIND: Kind = Kind::Array;

    fn encode(&self, enc: &Encoder) -> Value {
        encode_seq(enc, self.iter())
    }
}

impl<T: Encode> Encode for VecDeque<T> {
    const KIND: Kind = Kind::Array;

    fn encode(&self, enc: &Encoder) -> Value {
        encode_seq(enc, self.iter())
    }
}

const fn map_kind(key: Kind) -> Kind {
    if matches!(key, Kind::String) {
        Kind::Object
    } else {
        Kind::Map
    }
}

/// String keys produce an object, anything else a mapping.
fn encode_map<'a, K, V>(enc: &Encoder, entries: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: Encode + 'a,
    V: Encode + 'a,
{
    if matches!(K::KIND, Kind::String) {
        Value::Object(
            entries
                .map(|(k, v)| (k.encode(enc).key_text(), v.encode(enc)))
                .collect(),
        )
    } else {
        Value::Map(
            entries
                .map(|(k, v)| (k.encode(enc), v.encode(enc)))
                .collect::<Mapping>(),
        )
    }
}

impl<K: Encode, V: Encode, S> Encode for HashMap<K, V, S> {
    const KIND: Kind = map_kind(K::KIND);
    const NIL_WHEN_EMPTY: bool = matches!(K::KIND, Kind::String);

    fn encode(&self, enc: &Encoder) -> Value {
        encode_map(enc, self.iter())
    }
}

impl<K: Encode, V: Encode> Encode for BTreeMap<K, V> {
    const KIND: Kind = map_kind(K::KIND);
    const NIL_WHEN_EMPTY: bool = matches!(K::KIND, Kind::String);

    fn encode(&self, enc: &Encoder) -> Value {
        encode_map(enc, self.iter())
    }
}

macro_rules! impl_encode_null {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl<T: ?Sized> Encode for $ty {
                #[inline]
                fn encode(&self, _: &Encoder) -> Value {
                    Value::Null
                }
            }
        )+
    };
}

// Pointers, markers and channel ends carry no data.
impl_encode_null!(*const T, *mut T, PhantomData<T>);

macro_rules! impl_encode_channel {
    ($($ty:ident),+) => {
        $(
            impl<T> Encode for $ty<T> {
                #[inline]
                fn encode(&self, _: &Encoder) -> Value {
                    Value::Null
                }
            }
        )+
    };
}

impl_encode_channel!(Sender, SyncSender, Receiver);

impl Encode for () {
    fn encode(&self, _: &Encoder) -> Value {
        Value::Null
    }
}
