//! Schema-less data container with typed projection.
//!
//! `shana-data` holds arbitrary nested data in a generic [`Data`] container and
//! moves it in and out of typed records.
//!
//! # Core Concepts
//!
//! - **Value**: a tagged union over scalars, sequences, objects, mappings and
//!   the well-known duration/timestamp types
//! - **Data**: the top-level object, with path queries and deletion
//! - **Encoder / Decoder**: projection between records and values, driven by
//!   per-field tags such as `#[data("alias,omitempty")]`
//! - **Merge**: left-to-right deep merge of several `Data`
//! - **Patch**: ordered delete-then-merge modifications
//! - **Registry**: binding configuration sub-trees to typed destinations
//!
//! # Quick Start
//!
//! ```
//! use shana_data::{decode, encode, merge, Data, Record};
//! use serde_json::json;
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct Server {
//!     #[data("addr")]
//!     listen: String,
//!     #[data("max_conns,omitempty")]
//!     max_conns: u32,
//!     tags: Vec<String>,
//! }
//!
//! let defaults = encode(&Server {
//!     listen: ":80".into(),
//!     max_conns: 0,
//!     tags: vec!["base".into()],
//! });
//! assert_eq!(defaults.to_string(), r#"{"addr":":80","tags":["base"]}"#);
//!
//! let overrides: Data = serde_json::from_value(json!({
//!     "max_conns": 64,
//!     "tags": ["edge"],
//! })).unwrap();
//!
//! let mut server = Server::default();
//! decode(&merge([&defaults, &overrides]), &mut server).unwrap();
//! assert_eq!(server.max_conns, 64);
//!
//! // `Vec<String>` and a parsed JSON list have different element kinds, so
//! // the later list replaces the earlier one instead of extending it.
//! assert_eq!(server.tags, ["edge"]);
//! ```

extern crate self as shana_data;

mod data;
mod decode;
pub mod duration;
mod encode;
mod error;
mod merge;
pub mod name;
mod patch;
mod path;
mod record;
mod registry;
mod tag;
mod value;

pub use data::Data;
pub use decode::{Decode, Decoder};
pub use encode::{Encode, Encoder, DEFAULT_TAG_NAME};
pub use error::{DataError, DataResult};
pub use merge::{merge, merge_object, merge_to, merge_value};
pub use name::NameConverter;
pub use patch::{Patch, PatchAction};
pub use path::{escape_segment, parse_query, Path};
pub use record::{FieldSchema, Record};
pub use registry::Registry;
pub use tag::FieldTag;
pub use value::{Array, Complex, Kind, Mapping, Number, Object, Value};

// Re-export derive macro
pub use shana_data_derive::Record;

/// Encode a record or string-keyed map with default options.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Data {
    Encoder::default().encode(value)
}

/// Decode `data` into `to` with default options.
pub fn decode<T: Decode + ?Sized>(data: &Data, to: &mut T) -> DataResult<()> {
    Decoder::default().decode(data, to)
}

/// Encode any encodable value, not only records, with default options.
pub fn to_value<T: Encode + ?Sized>(value: &T) -> Value {
    value.encode(&Encoder::default())
}
