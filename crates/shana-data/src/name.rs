//! Field name converters.
//!
//! A converter maps a field name to the key used when the field has no alias.

use convert_case::{Case, Casing};

/// Converts a field name into an object key.
pub type NameConverter = fn(&str) -> String;

/// `"fieldName"` becomes `"FieldName"`.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"FieldName"` becomes `"fieldName"`.
pub fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();

    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"FieldName"` becomes `"field_name"`.
pub fn snake_case(name: &str) -> String {
    name.to_case(Case::Snake)
}

/// `"field_name"` becomes `"FieldName"`.
pub fn camel_case(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// `"field_name"` becomes `"fieldName"`.
pub fn lower_camel_case(name: &str) -> String {
    name.to_case(Case::Camel)
}
