//! Binding of configuration sub-trees to typed destinations.
//!
//! A [`Registry`] collects `(query, destination)` pairs while a program is
//! being wired together, then decodes a merged configuration into all of them
//! at once. It is an ordinary value: build one, pass it to whatever needs to
//! register, and call [`Registry::decode`] when the configuration is ready.

use crate::data::Data;
use crate::decode::{Decode, Decoder};
use crate::error::DataResult;

type Binding<'a> = Box<dyn FnMut(&Decoder, &Data) -> DataResult<()> + 'a>;

/// An ordered set of configuration bindings.
///
/// # Examples
///
/// ```
/// use shana_data::{Data, Decoder, Record, Registry};
/// use shana_data::name::uncapitalize;
/// use serde_json::json;
///
/// #[derive(Record, Default)]
/// #[allow(non_snake_case)]
/// struct Http {
///     Addr: String,
/// }
///
/// let config: Data = serde_json::from_value(json!({
///     "server": {"http": {"addr": ":8080"}},
/// })).unwrap();
///
/// let mut http = Http::default();
/// let mut registry = Registry::new(
///     Decoder::new()
///         .with_tag_name("config")
///         .with_name_converter(uncapitalize),
/// );
/// registry.register("server.http", &mut http);
/// registry.decode(&config).unwrap();
/// drop(registry);
///
/// assert_eq!(http.Addr, ":8080");
/// ```
pub struct Registry<'a> {
    decoder: Decoder,
    bindings: Vec<(String, Binding<'a>)>,
}

impl<'a> Registry<'a> {
    pub fn new(decoder: Decoder) -> Self {
        Self {
            decoder,
            bindings: Vec::new(),
        }
    }

    #[inline]
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Bind the sub-tree at `query` to `target`.
    pub fn register<T: Decode + ?Sized>(&mut self, query: impl Into<String>, target: &'a mut T) {
        self.register_with(query, target, |_| Ok(()));
    }

    /// Bind the sub-tree at `query` to `target` and run `hook` on it once it
    /// has been decoded, e.g. to validate or derive fields.
    pub fn register_with<T, F>(
        &mut self,
        query: impl Into<String>,
        target: &'a mut T,
        mut hook: F,
    ) where
        T: Decode + ?Sized,
        F: FnMut(&mut T) -> DataResult<()> + 'a,
    {
        let query = query.into();
        let bound = query.clone();
        let bind: Binding<'a> = Box::new(move |dec: &Decoder, data: &Data| {
            dec.decode_query(data, &bound, &mut *target)?;
            hook(&mut *target)
        });

        self.bindings.push((query, bind));
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Queries in registration order.
    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.bindings.iter().map(|(query, _)| query.as_str())
    }

    /// Decode `data` into every binding in registration order.
    ///
    /// Stops at the first error.
    pub fn decode(&mut self, data: &Data) -> DataResult<()> {
        for (query, bind) in &mut self.bindings {
            tracing::debug!(query = query.as_str(), "binding configuration");
            bind(&self.decoder, data)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("decoder", &self.decoder)
            .field("queries", &self.queries().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DataError;
    use serde_json::json;

    #[test]
    fn test_bindings_in_order() {
        let config: Data = serde_json::from_value(json!({"a": 1, "b": "x"})).unwrap();
        let mut a = 0i64;
        let mut b = String::new();
        let mut missing = 7u8;

        let mut registry = Registry::new(Decoder::new());
        registry.register("a", &mut a);
        registry.register("b", &mut b);
        registry.register("missing", &mut missing);
        assert_eq!(registry.queries().collect::<Vec<_>>(), ["a", "b", "missing"]);

        registry.decode(&config).unwrap();
        drop(registry);

        assert_eq!(a, 1);
        assert_eq!(b, "x");
        assert_eq!(missing, 7);
    }

    #[test]
    fn test_hook_error_aborts() {
        let config: Data = serde_json::from_value(json!({"a": 1, "b": 2})).unwrap();
        let mut a = 0i64;
        let mut b = 0i64;

        let mut registry = Registry::new(Decoder::new());
        registry.register_with("a", &mut a, |v| {
            if *v > 0 {
                Err(DataError::custom("a must not be positive"))
            } else {
                Ok(())
            }
        });
        registry.register("b", &mut b);

        let err = registry.decode(&config).unwrap_err();
        drop(registry);

        assert_eq!(err.to_string(), "a must not be positive");
        assert_eq!(a, 1);
        assert_eq!(b, 0);
    }
}
