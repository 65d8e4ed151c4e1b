//! Compile-time schema tables for typed records.

use crate::name::NameConverter;
use crate::tag::FieldTag;

/// One field of a record as seen by the encoder and decoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSchema {
    /// The Rust field name.
    pub name: &'static str,
    /// Tag strings keyed by tag name, e.g. `("data", "alias,omitempty")`.
    pub tags: &'static [(&'static str, &'static str)],
}

impl FieldSchema {
    /// The raw tag string for `tag_name`, empty if the field has none.
    pub fn tag(&self, tag_name: &str) -> &'static str {
        self.tags
            .iter()
            .find(|(name, _)| *name == tag_name)
            .map_or("", |(_, tag)| tag)
    }

    /// Parse the tag for `tag_name`.
    #[inline]
    pub fn field_tag(&self, tag_name: &str) -> FieldTag {
        FieldTag::parse(self.tag(tag_name))
    }

    /// The object key for this field: the alias if set, otherwise the field
    /// name passed through `converter`.
    pub fn key(&self, tag: &FieldTag, converter: Option<NameConverter>) -> String {
        if let Some(alias) = tag.alias() {
            return alias.to_string();
        }

        match converter {
            Some(convert) => convert(self.name),
            None => self.name.to_string(),
        }
    }
}

/// A typed record with a schema table.
///
/// Implemented by `#[derive(Record)]`, together with
/// [`Encode`](crate::Encode) and [`Decode`](crate::Decode).
pub trait Record {
    /// The record's fields in declaration order.
    const FIELDS: &'static [FieldSchema];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::uncapitalize;

    const FIELD: FieldSchema = FieldSchema {
        name: "MaxConns",
        tags: &[("data", "max,omitempty"), ("config", ",squash")],
    };

    #[test]
    fn test_tag_lookup() {
        assert_eq!(FIELD.tag("data"), "max,omitempty");
        assert_eq!(FIELD.tag("config"), ",squash");
        assert_eq!(FIELD.tag("json"), "");
    }

    #[test]
    fn test_key_resolution() {
        let data = FIELD.field_tag("data");
        assert_eq!(FIELD.key(&data, Some(uncapitalize)), "max");

        let config = FIELD.field_tag("config");
        assert!(config.squash);
        assert_eq!(FIELD.key(&config, None), "MaxConns");
        assert_eq!(FIELD.key(&config, Some(uncapitalize)), "maxConns");
    }
}
