//! Derive macro for shana-data records.
//!
//! `#[derive(Record)]` generates, for a struct with named fields:
//! - `impl Record`: the compile-time schema table (field names and tags)
//! - `impl Encode`: projection into a generic object
//! - `impl Decode`: in-place update from a generic object or mapping
//!
//! # Usage
//!
//! ```ignore
//! use shana_data::Record;
//!
//! #[derive(Record, Default)]
//! struct Server {
//!     #[data("addr")]
//!     listen: String,
//!     #[data(",omitempty", config = "max_conns")]
//!     max_conns: u32,
//!     #[data(",squash")]
//!     tls: TlsOptions,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod codegen;
mod parse;

/// Derive `Record`, `Encode` and `Decode` for a struct.
///
/// # Attributes
///
/// ## Field Attributes
///
/// - `#[data("alias,opt1,opt2")]`: tag read by encoders and decoders using the
///   default tag name `data`
/// - `#[data(name = "alias,opts")]`: tag read when the tag name is `name`;
///   several tag names may be listed in one attribute
///
/// An alias of `-` skips the field. Recognized options are `omitempty` and
/// `squash`. Fields without an alias use their name, passed through the
/// encoder's or decoder's name converter if one is set.
///
/// Every field type must implement `Encode` and `Decode`; generic type
/// parameters get the matching bound automatically.
#[proc_macro_derive(Record, attributes(data))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match codegen::expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
