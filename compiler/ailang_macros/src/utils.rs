//! Shared helpers for the derive implementations.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields};

/// Validate that `input` is a struct with named fields and return them.
pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive_name: &str,
) -> syn::Result<&'a syn::punctuated::Punctuated<Field, syn::Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive_name} only supports structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive_name} only supports structs"),
        )),
    }
}

/// `name1 = self.name1, name2 = self.name2, ...` for `format!` interpolation
/// against every named field, so `#[diag(CODE, "missing {field}")]` can
/// reference any field of the struct.
pub fn format_args<'a>(fields: impl Iterator<Item = &'a Field>) -> TokenStream2 {
    let args = fields.filter_map(|f| {
        let name = f.ident.as_ref()?;
        Some(quote! { #name = self.#name })
    });
    quote! { #(#args),* }
}
