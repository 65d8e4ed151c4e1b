//! Per-field tag parsing.

/// A parsed field tag of the form `alias,opt1,opt2,...`.
///
/// Recognized options are `omitempty` and `squash`; anything else is ignored.
/// An alias of `-` skips the field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Key to use instead of the field name. Empty when unset.
    pub alias: String,
    /// The field does not take part in encoding or decoding.
    pub skipped: bool,
    /// Empty values are not emitted.
    pub omit_empty: bool,
    /// A nested record's entries live in the parent object.
    pub squash: bool,
}

impl FieldTag {
    /// Parse a tag string. Never fails: malformed input degrades to no alias
    /// and no options.
    pub fn parse(tag: &str) -> Self {
        let mut opts = tag.split(',');
        let mut alias = opts.next().unwrap_or_default().trim().to_string();
        let mut parsed = FieldTag::default();

        for opt in opts {
            match opt {
                "omitempty" => parsed.omit_empty = true,
                "squash" => parsed.squash = true,
                _ => {}
            }
        }

        if alias == "-" {
            alias.clear();
            parsed.skipped = true;
        }

        parsed.alias = alias;
        parsed
    }

    #[inline]
    pub fn alias(&self) -> Option<&str> {
        (!self.alias.is_empty()).then_some(self.alias.as_str())
    }
}
