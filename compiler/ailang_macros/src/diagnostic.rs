//! `#[derive(IntoDiagnostic)]`: generates an `into_diagnostic()` method and
//! a `From<Self> for ailang_diagnostic::Diagnostic` impl from a
//! `#[diag(PHASE, CODE, "message")]` struct attribute.
//!
//! The struct's named fields are available to the message format string by
//! name, and one field tagged `#[primary_span]` (of type
//! `ailang_ir::Span`) becomes the diagnostic's span.
//!
//! ```ignore
//! #[derive(IntoDiagnostic)]
//! #[diag(Typecheck, TC001, "cannot unify {expected} with {actual}")]
//! struct UnifyMismatch {
//!     #[primary_span]
//!     span: Span,
//!     expected: String,
//!     actual: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Field, Ident, LitStr};

use crate::utils::{format_args, named_fields};

pub fn derive_into_diagnostic(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (phase, code, message) = parse_diag_attribute(input)?;
    let fields = named_fields(input, "IntoDiagnostic")?;
    let primary_span = primary_span_field(fields)?;
    let args = format_args(fields.iter());

    Ok(quote! {
        impl #name {
            pub fn into_diagnostic(self) -> ailang_diagnostic::Diagnostic {
                let message = format!(#message, #args);
                ailang_diagnostic::Diagnostic::new(
                    ailang_diagnostic::ErrorCode::#code(),
                    ailang_diagnostic::Phase::#phase,
                    message,
                )
                .with_span(self.#primary_span.clone())
            }
        }

        impl From<#name> for ailang_diagnostic::Diagnostic {
            fn from(err: #name) -> Self {
                err.into_diagnostic()
            }
        }
    })
}

fn parse_diag_attribute(input: &DeriveInput) -> syn::Result<(Ident, Ident, LitStr)> {
    for attr in &input.attrs {
        if attr.path().is_ident("diag") {
            return attr.parse_args_with(|stream: syn::parse::ParseStream| {
                let phase: Ident = stream.parse()?;
                let _: syn::Token![,] = stream.parse()?;
                let code: Ident = stream.parse()?;
                let _: syn::Token![,] = stream.parse()?;
                let message: LitStr = stream.parse()?;
                Ok((phase, code, message))
            });
        }
    }
    Err(syn::Error::new_spanned(
        input,
        "missing #[diag(Phase, CODE, \"message\")] attribute",
    ))
}

fn primary_span_field(
    fields: &syn::punctuated::Punctuated<Field, syn::Token![,]>,
) -> syn::Result<Ident> {
    for field in fields {
        if field.attrs.iter().any(|a| a.path().is_ident("primary_span")) {
            return field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new_spanned(field, "expected named field"));
        }
    }
    Err(syn::Error::new_spanned(
        fields,
        "no field marked #[primary_span]",
    ))
}
