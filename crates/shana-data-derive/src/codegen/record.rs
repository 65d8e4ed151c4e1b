//! Schema table, `Encode` and `Decode` generation.

use crate::parse::{FieldInput, RecordInput};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Generics};

/// Generate `Record`, `Encode` and `Decode` impls for a named struct.
pub fn generate(input: &RecordInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let fields = input.fields();

    let schema = fields
        .iter()
        .map(|f| field_schema(f))
        .collect::<syn::Result<Vec<_>>>()?;
    let idents = fields
        .iter()
        .map(|f| f.ident())
        .collect::<syn::Result<Vec<_>>>()?;
    let indices = 0..fields.len();

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let encode_generics = bounded(&input.generics, quote!(::shana_data::Encode));
    let (encode_impl, _, encode_where) = encode_generics.split_for_impl();

    let decode_generics = bounded(&input.generics, quote!(::shana_data::Decode));
    let (decode_impl, _, decode_where) = decode_generics.split_for_impl();

    let encode_fields = indices.clone().zip(&idents).map(|(i, field)| {
        quote! {
            enc.encode_record_field(
                &mut obj,
                &<Self as ::shana_data::Record>::FIELDS[#i],
                &self.#field,
            );
        }
    });

    let decode_fields = indices.zip(&idents).map(|(i, field)| {
        quote! {
            dec.decode_record_field(
                from,
                &<Self as ::shana_data::Record>::FIELDS[#i],
                &mut self.#field,
            )?;
        }
    });

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics ::shana_data::Record for #ident #ty_generics #where_clause {
            const FIELDS: &'static [::shana_data::FieldSchema] = &[#(#schema),*];
        }

        #[automatically_derived]
        impl #encode_impl ::shana_data::Encode for #ident #ty_generics #encode_where {
            const KIND: ::shana_data::Kind = ::shana_data::Kind::Object;

            #[allow(unused_mut, unused_variables)]
            fn encode(&self, enc: &::shana_data::Encoder) -> ::shana_data::Value {
                let mut obj = ::shana_data::Object::new();
                #(#encode_fields)*
                ::shana_data::Value::Object(obj)
            }
        }

        #[automatically_derived]
        impl #decode_impl ::shana_data::Decode for #ident #ty_generics #decode_where {
            const SQUASHABLE: bool = true;

            #[allow(unused_variables)]
            fn decode_value(
                &mut self,
                dec: &::shana_data::Decoder,
                from: &::shana_data::Value,
            ) -> ::shana_data::DataResult<()> {
                if !::core::matches!(
                    from,
                    ::shana_data::Value::Object(_) | ::shana_data::Value::Map(_)
                ) {
                    return ::core::result::Result::Err(
                        ::shana_data::DataError::type_mismatch::<Self>(from.type_name()),
                    );
                }

                #(#decode_fields)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// `FieldSchema { name, tags }` literal for one field.
fn field_schema(field: &FieldInput) -> syn::Result<TokenStream> {
    let name = field.name()?;
    let tags = field.tags()?.into_iter().map(|tag| {
        let tag_name = tag.name;
        let value = tag.value;
        quote!((#tag_name, #value))
    });

    Ok(quote! {
        ::shana_data::FieldSchema {
            name: #name,
            tags: &[#(#tags),*],
        }
    })
}

/// Copy of `generics` with `bound` added to every type parameter.
fn bounded(generics: &Generics, bound: TokenStream) -> Generics {
    let mut generics = generics.clone();

    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#bound));
    }

    generics
}
