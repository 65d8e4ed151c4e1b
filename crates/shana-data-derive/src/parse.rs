//! Parsing logic for the Record derive macro.

use darling::{ast, FromDeriveInput, FromField};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream};
use syn::punctuated::Punctuated;
use syn::{Attribute, Generics, Ident, LitStr, Token, Type};

/// Tag name used by `#[data("...")]` without an explicit name.
pub const DEFAULT_TAG_NAME: &str = "data";

/// Parsed struct-level input.
#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
pub struct RecordInput {
    /// The struct identifier.
    pub ident: Ident,

    /// Generic parameters.
    pub generics: Generics,

    /// Struct data (fields).
    pub data: ast::Data<(), FieldInput>,
}

impl RecordInput {
    /// Get the fields as a vector.
    pub fn fields(&self) -> Vec<&FieldInput> {
        self.data
            .as_ref()
            .take_struct()
            .map(|s| s.fields.to_vec())
            .unwrap_or_default()
    }
}

/// Parsed field-level input. `#[data(...)]` attributes are forwarded
/// untouched and parsed by [`FieldInput::tags`].
#[derive(Debug, FromField)]
#[darling(forward_attrs(data))]
pub struct FieldInput {
    /// Field identifier.
    pub ident: Option<Ident>,

    /// Field type.
    pub ty: Type,

    /// The `#[data(...)]` attributes.
    pub attrs: Vec<Attribute>,
}

/// One argument of a `#[data(...)]` attribute.
///
/// A bare string sets the tag for the default tag name; `name = "..."` sets
/// the tag for `name`.
#[derive(Debug)]
pub struct TagArg {
    pub name: String,
    pub value: LitStr,
}

impl Parse for TagArg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(TagArg {
                name: DEFAULT_TAG_NAME.to_string(),
                value: input.parse()?,
            });
        }

        let name = Ident::parse_any(input)?;
        input.parse::<Token![=]>()?;

        Ok(TagArg {
            name: name.unraw().to_string(),
            value: input.parse()?,
        })
    }
}

impl FieldInput {
    /// The field identifier. Only named structs are accepted, so it is
    /// always present.
    pub fn ident(&self) -> syn::Result<&Ident> {
        self.ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(&self.ty, "named field required"))
    }

    /// The field name as seen by the encoder, without a raw-identifier
    /// prefix.
    pub fn name(&self) -> syn::Result<String> {
        Ok(self.ident()?.unraw().to_string())
    }

    /// All tags of this field in declaration order.
    ///
    /// Fails on malformed arguments and on a tag name given twice.
    pub fn tags(&self) -> syn::Result<Vec<TagArg>> {
        let mut tags: Vec<TagArg> = Vec::new();

        for attr in &self.attrs {
            let args =
                attr.parse_args_with(Punctuated::<TagArg, Token![,]>::parse_terminated)?;

            for arg in args {
                if tags.iter().any(|t| t.name == arg.name) {
                    return Err(syn::Error::new_spanned(
                        &arg.value,
                        format!("duplicate tag `{}` on this field", arg.name),
                    ));
                }
                tags.push(arg);
            }
        }

        Ok(tags)
    }
}
