//! Low-level tokenizer for AILANG.
//!
//! This crate is the "raw" half of a two-layer lexer architecture: it
//! produces `(RawTag, len)` pairs from raw bytes with no spans, no
//! interning, and no diagnostics. `ailang_lexer` "cooks" these into
//! compiler-ready tokens with spans and interned identifiers. The split
//! lets external tools (a future LSP or formatter) depend on just the raw
//! scanner without pulling in the rest of the compiler.

mod scanner;
mod tag;

pub use scanner::{tokenize, RawScanner};
pub use tag::{RawTag, RawToken};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_let_binding() {
        let tokens = tokenize("let x = 1 + 2");
        let tags: Vec<_> = tokens
            .iter()
            .filter(|t| t.tag != RawTag::Whitespace)
            .map(|t| t.tag)
            .collect();
        assert_eq!(
            tags,
            vec![
                RawTag::Ident,
                RawTag::Ident,
                RawTag::Eq,
                RawTag::Int,
                RawTag::Plus,
                RawTag::Int,
            ]
        );
    }

    #[test]
    fn distinguishes_int_and_float() {
        let tokens = tokenize("42 3.5");
        let tags: Vec<_> = tokens
            .iter()
            .filter(|t| t.tag != RawTag::Whitespace)
            .map(|t| t.tag)
            .collect();
        assert_eq!(tags, vec![RawTag::Int, RawTag::Float]);
    }

    #[test]
    fn reports_unterminated_string() {
        let tokens = tokenize("\"abc");
        assert_eq!(
            tokens[0].tag,
            RawTag::String { terminated: false }
        );
    }
}
