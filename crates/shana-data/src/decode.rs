//! Projection of generic values back into typed destinations.
//!
//! Decoding works in place: the destination is updated field by field and
//! anything the source does not mention is left untouched. A null or absent
//! source is a no-op.

use crate::data::Data;
use crate::duration::parse_duration;
use crate::encode::DEFAULT_TAG_NAME;
use crate::error::{DataError, DataResult};
use crate::name::NameConverter;
use crate::record::FieldSchema;
use crate::value::{Complex, Number, Object, Value};
use chrono::{DateTime, Utc};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// A type that can be updated from a [`Value`].
pub trait Decode {
    /// Whether a `squash` field of this type decodes from its parent's
    /// source. True for records and pointers to records.
    const SQUASHABLE: bool = false;

    /// Update `self` from a non-null source.
    ///
    /// Callers go through [`Decoder::decode_into`], which skips null sources.
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()>;
}

/// Decoding options.
///
/// # Examples
///
/// ```
/// use shana_data::{Data, Decoder, Record};
/// use serde_json::json;
///
/// #[derive(Record, Default)]
/// struct Pool {
///     #[data("max")]
///     max_conns: u32,
///     timeout: std::time::Duration,
/// }
///
/// let data: Data = serde_json::from_value(json!({
///     "db": {"pool": {"max": 16, "timeout": "1.5s"}}
/// })).unwrap();
///
/// let mut pool = Pool::default();
/// Decoder::new()
///     .decode_query(&data, "db.pool", &mut pool)
///     .unwrap();
/// assert_eq!(pool.max_conns, 16);
/// assert_eq!(pool.timeout.as_millis(), 1500);
/// ```
#[derive(Clone, Debug)]
pub struct Decoder {
    tag_name: Cow<'static, str>,
    name_converter: Option<NameConverter>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            tag_name: Cow::Borrowed(DEFAULT_TAG_NAME),
            name_converter: None,
        }
    }
}

impl Decoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read field tags from `tag_name` instead of `data`.
    pub fn with_tag_name(mut self, tag_name: impl Into<Cow<'static, str>>) -> Self {
        self.tag_name = tag_name.into();
        self
    }

    /// Convert field names without an alias before looking them up.
    pub fn with_name_converter(mut self, converter: NameConverter) -> Self {
        self.name_converter = Some(converter);
        self
    }

    #[inline]
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    #[inline]
    pub fn name_converter(&self) -> Option<NameConverter> {
        self.name_converter
    }

    /// Decode the whole data into `to`.
    pub fn decode<T: Decode + ?Sized>(&self, data: &Data, to: &mut T) -> DataResult<()> {
        self.decode_into(data.as_value(), to)
    }

    /// Decode the part of `data` selected by `query` into `to`.
    ///
    /// A query that resolves to nothing leaves `to` untouched.
    pub fn decode_query<T: Decode + ?Sized>(
        &self,
        data: &Data,
        query: &str,
        to: &mut T,
    ) -> DataResult<()> {
        tracing::trace!(query, "decoding query");

        match data.query(query) {
            Some(from) => self.decode_into(from, to),
            None => Ok(()),
        }
    }

    /// Decode the part of `data` selected by `fields` into `to`.
    pub fn decode_field<S: AsRef<str>, T: Decode + ?Sized>(
        &self,
        data: &Data,
        fields: &[S],
        to: &mut T,
    ) -> DataResult<()> {
        tracing::trace!(depth = fields.len(), "decoding fields");

        match data.get(fields) {
            Some(from) => self.decode_into(from, to),
            None => Ok(()),
        }
    }

    /// Decode `from` into `to`, skipping null sources.
    #[inline]
    pub fn decode_into<T: Decode + ?Sized>(&self, from: &Value, to: &mut T) -> DataResult<()> {
        if from.is_null() {
            return Ok(());
        }

        to.decode_value(self, from)
    }

    /// Decode one record field from the record's source.
    ///
    /// `from` is an object or mapping. Squashed record fields decode from
    /// `from` itself; other fields from the entry under their key, if any.
    pub fn decode_record_field<T: Decode + ?Sized>(
        &self,
        from: &Value,
        field: &FieldSchema,
        to: &mut T,
    ) -> DataResult<()> {
        let tag = field.field_tag(&self.tag_name);

        if tag.skipped {
            return Ok(());
        }

        if tag.squash && T::SQUASHABLE {
            return self.decode_into(from, to);
        }

        let key = field.key(&tag, self.name_converter);
        let entry = match from {
            Value::Object(obj) => obj.get(&key),
            Value::Map(map) => map.get(&key),
            _ => None,
        };

        match entry {
            Some(value) => self.decode_into(value, to),
            None => Ok(()),
        }
    }
}

/// Integer sources and whole floats, range-checked against `T`.
fn decode_signed<T: TryFrom<i64>>(from: &Value) -> DataResult<T> {
    let i = match *from {
        Value::Int(i) => i,
        Value::Uint(u) => i64::try_from(u).map_err(|_| DataError::overflow::<T>(u))?,
        Value::Float(f) => {
            if f != f.round() {
                return Err(DataError::not_integral::<T>(f));
            }

            // i64::MAX is not representable; 2^63 is the first float past it.
            if !(-9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0).contains(&f) {
                return Err(DataError::overflow::<T>(f));
            }

            f as i64
        }
        _ => return Err(DataError::type_mismatch::<T>(from.type_name())),
    };

    T::try_from(i).map_err(|_| DataError::overflow::<T>(i))
}

fn decode_unsigned<T: TryFrom<u64>>(from: &Value) -> DataResult<T> {
    let u = match *from {
        Value::Int(i) => u64::try_from(i).map_err(|_| DataError::overflow::<T>(i))?,
        Value::Uint(u) => u,
        Value::Float(f) => {
            if f != f.round() {
                return Err(DataError::not_integral::<T>(f));
            }

            if !(0.0..18_446_744_073_709_551_616.0).contains(&f) {
                return Err(DataError::overflow::<T>(f));
            }

            f as u64
        }
        _ => return Err(DataError::type_mismatch::<T>(from.type_name())),
    };

    T::try_from(u).map_err(|_| DataError::overflow::<T>(u))
}

macro_rules! impl_decode_int {
    ($via:ident: $($ty:ty),+) => {
        $(
            impl Decode for $ty {
                fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
                    *self = $via::<$ty>(from)?;
                    Ok(())
                }
            }
        )+
    };
}

impl_decode_int!(decode_signed: i8, i16, i32, i64, isize);
impl_decode_int!(decode_unsigned: u8, u16, u32, u64, usize);

impl Decode for f64 {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = match *from {
            Value::Int(i) => i as f64,
            Value::Uint(u) => u as f64,
            Value::Float(f) => f,
            _ => return Err(DataError::type_mismatch::<f64>(from.type_name())),
        };
        Ok(())
    }
}

impl Decode for f32 {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = match *from {
            Value::Int(i) => i as f32,
            Value::Uint(u) => u as f32,
            Value::Float(f) => {
                if f.is_finite() && f.abs() > f64::from(f32::MAX) {
                    return Err(DataError::overflow::<f32>(f));
                }
                f as f32
            }
            _ => return Err(DataError::type_mismatch::<f32>(from.type_name())),
        };
        Ok(())
    }
}

impl Decode for bool {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        match *from {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            _ => Err(DataError::type_mismatch::<bool>(from.type_name())),
        }
    }
}

/// Strings also accept the textual rendering of scalars.
impl Decode for String {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = match from {
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            _ => return Err(DataError::type_mismatch::<String>(from.type_name())),
        };
        Ok(())
    }
}

impl Decode for Number {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = match from {
            Value::String(s) => Number::new(s.clone()),
            Value::Int(i) => Number::new(i.to_string()),
            Value::Uint(u) => Number::new(u.to_string()),
            Value::Float(f) => Number::new(f.to_string()),
            _ => return Err(DataError::type_mismatch::<Number>(from.type_name())),
        };
        Ok(())
    }
}

impl Decode for Complex {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        match *from {
            Value::Complex(c) => {
                *self = c;
                Ok(())
            }
            _ => Err(DataError::type_mismatch::<Complex>(from.type_name())),
        }
    }
}

/// Duration literals; the empty string is zero. A `Value::Duration` built
/// by hand is copied as is.
impl Decode for Duration {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = match from {
            Value::String(s) if s.is_empty() => Duration::ZERO,
            Value::String(s) => parse_duration(s)?,
            Value::Duration(d) => *d,
            _ => return Err(DataError::type_mismatch::<Duration>(from.type_name())),
        };
        Ok(())
    }
}

/// Timestamps are copied, never parsed.
impl Decode for DateTime<Utc> {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        match *from {
            Value::Time(t) => {
                *self = t;
                Ok(())
            }
            _ => Err(DataError::type_mismatch::<DateTime<Utc>>(from.type_name())),
        }
    }
}

impl Decode for Value {
    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        *self = from.clone();
        Ok(())
    }
}

/// A squashed `Data` field takes the whole enclosing object.
impl Decode for Data {
    const SQUASHABLE: bool = true;

    fn decode_value(&mut self, _: &Decoder, from: &Value) -> DataResult<()> {
        let obj: Object = match from {
            Value::Object(obj) => obj.clone(),
            Value::Map(map) => map
                .iter()
                .map(|(k, v)| (k.key_text(), v.clone()))
                .collect(),
            _ => return Err(DataError::type_mismatch::<Data>(from.type_name())),
        };

        *self = if obj.is_empty() {
            Data::default()
        } else {
            Data::make(obj)
        };
        Ok(())
    }
}

/// `None` is allocated before decoding into it.
impl<T: Decode + Default> Decode for Option<T> {
    const SQUASHABLE: bool = T::SQUASHABLE;

    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        self.get_or_insert_with(T::default).decode_value(dec, from)
    }
}

impl<T: Decode + ?Sized> Decode for Box<T> {
    const SQUASHABLE: bool = T::SQUASHABLE;

    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        (**self).decode_value(dec, from)
    }
}

/// Shared pointers are only writable while uniquely owned.
impl<T: Decode + ?Sized> Decode for Arc<T> {
    const SQUASHABLE: bool = T::SQUASHABLE;

    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        Arc::get_mut(self)
            .ok_or(DataError::InvalidDestination)?
            .decode_value(dec, from)
    }
}

impl<T: Decode + ?Sized> Decode for Rc<T> {
    const SQUASHABLE: bool = T::SQUASHABLE;

    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        Rc::get_mut(self)
            .ok_or(DataError::InvalidDestination)?
            .decode_value(dec, from)
    }
}

impl<T: Decode + ?Sized> Decode for &mut T {
    const SQUASHABLE: bool = T::SQUASHABLE;

    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        (**self).decode_value(dec, from)
    }
}

fn decode_items<T, C>(dec: &Decoder, from: &Value) -> DataResult<C>
where
    T: Decode + Default,
    C: FromIterator<T>,
{
    let Value::Array(arr) = from else {
        return Err(DataError::type_mismatch::<C>(from.type_name()));
    };

    arr.iter()
        .map(|item| {
            let mut slot = T::default();
            dec.decode_into(item, &mut slot)?;
            Ok(slot)
        })
        .collect()
}

impl<T: Decode + Default> Decode for Vec<T> {
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        *self = decode_items::<T, Vec<T>>(dec, from)?;
        Ok(())
    }
}

impl<T: Decode + Default> Decode for VecDeque<T> {
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        *self = decode_items::<T, VecDeque<T>>(dec, from)?;
        Ok(())
    }
}

/// Decoded in place; elements past the source length are kept.
impl<T: Decode, const N: usize> Decode for [T; N] {
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        let Value::Array(arr) = from else {
            return Err(DataError::type_mismatch::<Self>(from.type_name()));
        };

        if arr.len() > N {
            return Err(DataError::no_room::<Self>(arr.len()));
        }

        for (slot, item) in self.iter_mut().zip(arr.iter()) {
            dec.decode_into(item, slot)?;
        }

        Ok(())
    }
}

fn decode_entries<K, V, C>(dec: &Decoder, from: &Value) -> DataResult<C>
where
    K: From<String>,
    V: Decode + Default,
    C: FromIterator<(K, V)>,
{
    let decode_entry = |key: String, value: &Value| -> DataResult<(K, V)> {
        let mut slot = V::default();
        dec.decode_into(value, &mut slot)?;
        Ok((K::from(key), slot))
    };

    match from {
        Value::Object(obj) => obj
            .iter()
            .map(|(k, v)| decode_entry(k.clone(), v))
            .collect(),
        Value::Map(map) => map
            .iter()
            .map(|(k, v)| decode_entry(k.key_text(), v))
            .collect(),
        _ => Err(DataError::type_mismatch::<C>(from.type_name())),
    }
}

/// Map keys must be string-like.
impl<K, V, S> Decode for HashMap<K, V, S>
where
    K: From<String> + Eq + Hash,
    V: Decode + Default,
    S: BuildHasher + Default,
{
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        *self = decode_entries::<K, V, Self>(dec, from)?;
        Ok(())
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: From<String> + Ord,
    V: Decode + Default,
{
    fn decode_value(&mut self, dec: &Decoder, from: &Value) -> DataResult<()> {
        *self = decode_entries::<K, V, Self>(dec, from)?;
        Ok(())
    }
}
