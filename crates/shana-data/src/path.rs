//! Query paths for navigating generic data.
//!
//! A query is a dot-joined list of segments. Each segment resolves one level of
//! object-key lookup, sequence-index lookup (base-10, non-negative) or mapping
//! lookup by the key's textual rendering. Inside a segment, `\.` is a literal
//! dot and `\\` a literal backslash; any other backslash is kept as is.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Split a query string into segments.
///
/// `""` has no segments, so it addresses the root. Empty segments are kept:
/// `"..."` has four.
///
/// # Examples
///
/// ```
/// use shana_data::parse_query;
///
/// assert_eq!(parse_query(r"a.b\.c"), vec!["a", "b.c"]);
/// assert_eq!(parse_query(r"a.b\\.c"), vec!["a", r"b\", "c"]);
/// assert!(parse_query("").is_empty());
/// ```
pub fn parse_query(query: &str) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = query.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.peek() {
                Some(&next @ ('.' | '\\')) => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push('\\'),
            },
            '.' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    fields.push(current);
    fields
}

/// Escape a single segment so that [`parse_query`] returns it unchanged.
pub fn escape_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());

    for c in segment.chars() {
        if c == '.' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }

    out
}

/// A parsed query: the list of segments it addresses.
///
/// # Examples
///
/// ```
/// use shana_data::Path;
///
/// let path = Path::root().field("servers").index(0).field("host");
/// assert_eq!(path.to_string(), "servers.0.host");
/// assert_eq!("servers.0.host".parse::<Path>().unwrap(), path);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<String>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Create a path from already split segments.
    #[inline]
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    /// Append a field segment and return self (builder pattern).
    #[inline]
    pub fn field(mut self, f: impl Into<String>) -> Self {
        self.0.push(f.into());
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(i.to_string());
        self
    }

    #[inline]
    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    #[inline]
    pub fn pop(&mut self) -> Option<String> {
        self.0.pop()
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the parent path (path without the last segment).
    pub fn parent(&self) -> Option<Path> {
        let (_, parent) = self.0.split_last()?;
        Some(Path(parent.to_vec()))
    }

    /// Join this path with another path.
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    #[inline]
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.starts_with(&prefix.0)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromStr for Path {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path(parse_query(s)))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&escape_segment(seg))?;
        }
        Ok(())
    }
}

impl AsRef<[String]> for Path {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for Path {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = str;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a [`Path`] from a sequence of segments.
///
/// Each segment goes through `to_string`, so indices can be written as
/// integers.
///
/// ```
/// use shana_data::path;
///
/// let p = path!("servers", 0, "host");
/// assert_eq!(p.to_string(), "servers.0.host");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push(::std::string::ToString::to_string(&$seg));
        )+
        p
    }};
}

fn parse_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Resolve `fields` below `value`. A stored `Null` reads as absent.
pub(crate) fn lookup<'a, S: AsRef<str>>(value: &'a Value, fields: &[S]) -> Option<&'a Value> {
    let mut current = value;

    for field in fields {
        let field = field.as_ref();
        current = match current {
            Value::Object(obj) => obj.get(field)?,
            Value::Array(arr) => arr.items().get(parse_index(field)?)?,
            Value::Map(map) => map.get(field)?,
            _ => return None,
        };
    }

    (!current.is_null()).then_some(current)
}

pub(crate) fn lookup_mut<'a, S: AsRef<str>>(
    value: &'a mut Value,
    fields: &[S],
) -> Option<&'a mut Value> {
    let mut current = value;

    for field in fields {
        let field = field.as_ref();
        current = match current {
            Value::Object(obj) => obj.get_mut(field)?,
            Value::Array(arr) => arr.items_mut().get_mut(parse_index(field)?)?,
            Value::Map(map) => map.get_mut(field)?,
            _ => return None,
        };
    }

    (!current.is_null()).then_some(current)
}

/// Remove the entry addressed by a non-empty `fields` from its container.
pub(crate) fn remove<S: AsRef<str>>(value: &mut Value, fields: &[S]) -> Option<Value> {
    let (last, parents) = fields.split_last()?;
    let last = last.as_ref();

    match lookup_mut(value, parents)? {
        Value::Object(obj) => obj.remove(last),
        Value::Array(arr) => {
            let idx = parse_index(last)?;
            (idx < arr.len()).then(|| arr.items_mut().remove(idx))
        }
        Value::Map(map) => map.remove(last),
        _ => None,
    }
}

impl Value {
    /// Resolve a list of segments. Zero segments return the value itself.
    #[inline]
    pub fn get<S: AsRef<str>>(&self, fields: &[S]) -> Option<&Value> {
        lookup(self, fields)
    }

    #[inline]
    pub fn get_mut<S: AsRef<str>>(&mut self, fields: &[S]) -> Option<&mut Value> {
        lookup_mut(self, fields)
    }

    /// Resolve a query string.
    #[inline]
    pub fn query(&self, query: &str) -> Option<&Value> {
        lookup(self, &parse_query(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_escapes() {
        assert_eq!(parse_query(r"a.b\.c"), vec!["a", "b.c"]);
        assert_eq!(parse_query(r"a.b\\.c"), vec!["a", r"b\", "c"]);
        assert_eq!(parse_query(r"a\b"), vec![r"a\b"]);
        assert_eq!(parse_query(r"a\"), vec![r"a\"]);
        assert_eq!(parse_query(r"\\\.x"), vec![r"\.x"]);
    }

    #[test]
    fn test_parse_query_empty_segments() {
        assert!(parse_query("").is_empty());
        assert_eq!(parse_query("."), vec!["", ""]);
        assert_eq!(parse_query("..."), vec!["", "", "", ""]);
        assert_eq!(parse_query("a..b"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_path_display_round_trip() {
        let path = Path::root().field("a.b").field(r"c\").index(3);
        assert_eq!(path.to_string(), r"a\.b.c\\.3");
        assert_eq!(path.to_string().parse::<Path>().unwrap(), path);
    }

    #[test]
    fn test_path_macro() {
        let p = path!("users", 0, "name");
        assert_eq!(p.len(), 3);
        assert_eq!(&p[1], "0");
        assert_eq!(p.parent().unwrap().to_string(), "users.0");
    }

    #[test]
    fn test_lookup_shapes() {
        let value = Value::from(json!({
            "a": {"b": [10, {"c": "deep"}]},
            "n": null,
        }));

        assert_eq!(value.query("a.b.0"), Some(&Value::Int(10)));
        assert_eq!(value.query("a.b.1.c"), Some(&Value::from("deep")));
        assert_eq!(value.query("a.b.2"), None);
        assert_eq!(value.query("a.b.-1"), None);
        assert_eq!(value.query("a.b.+1"), None);
        assert_eq!(value.query("a.b.0.x"), None);
        assert_eq!(value.query("n"), None);
        assert_eq!(value.query(""), Some(&value));
    }

    #[test]
    fn test_remove_compacts_arrays() {
        let mut value = Value::from(json!({"v": ["first", "second", "third"]}));
        assert_eq!(remove(&mut value, &["v", "1"]), Some(Value::from("second")));
        assert_eq!(value, Value::from(json!({"v": ["first", "third"]})));
        assert_eq!(remove(&mut value, &["v", "5"]), None);
        assert_eq!(remove(&mut value, &["missing", "x"]), None);
    }
}
