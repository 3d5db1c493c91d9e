//! Procedural macros for the AILANG compiler.

mod diagnostic;
mod utils;

use proc_macro::TokenStream;

#[proc_macro_derive(IntoDiagnostic, attributes(diag, primary_span))]
pub fn derive_into_diagnostic(input: TokenStream) -> TokenStream {
    diagnostic::derive_into_diagnostic(input)
}
