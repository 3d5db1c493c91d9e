//! Cooks `ailang_lexer_core`'s raw tokens into spanned, interned tokens for
//! `ailang_parse`.
//!
//! The textual surface syntax is an external-collaborator concern (only the
//! `Token`/`Span` contract it hands the parser is load-bearing), so this
//! crate stays deliberately small: one keyword table, one cooking pass, no
//! context-sensitive lexing.

mod cook;
mod keywords;
mod token;

pub use cook::Cooker;
pub use token::{Token, TokenKind};

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::Interner;

    fn cook(src: &str) -> (Vec<TokenKind>, Interner) {
        let interner = Interner::new();
        let (tokens, diags) = Cooker::new(src, "test.ail", &interner).cook();
        assert!(diags.is_empty(), "unexpected diagnostics: {diags:?}");
        (tokens.into_iter().map(|t| t.kind).collect(), interner)
    }

    #[test]
    fn cooks_keywords_and_idents() {
        let (kinds, _) = cook("let x = 1 in x");
        assert_eq!(kinds[0], TokenKind::KwLet);
        assert!(matches!(kinds[1], TokenKind::Ident(_)));
        assert_eq!(kinds[2], TokenKind::Eq);
        assert_eq!(kinds[3], TokenKind::Int(1));
        assert_eq!(kinds[4], TokenKind::KwIn);
        assert!(matches!(kinds[5], TokenKind::Ident(_)));
        assert_eq!(kinds[6], TokenKind::Eof);
    }

    #[test]
    fn interns_identical_identifiers_to_the_same_name() {
        let (kinds, _) = cook("x x");
        let (TokenKind::Ident(a), TokenKind::Ident(b)) = (kinds[0], kinds[1]) else {
            panic!("expected two idents");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn cooks_match_arm_fat_arrow() {
        let (kinds, _) = cook("match x { _ => 1 }");
        assert!(kinds.contains(&TokenKind::FatArrow));
    }

    #[test]
    fn unescapes_string_literals() {
        let interner = Interner::new();
        let (tokens, diags) = Cooker::new(r#""a\nb""#, "test.ail", &interner).cook();
        assert!(diags.is_empty());
        let TokenKind::Str(name) = tokens[0].kind else {
            panic!("expected a string token");
        };
        assert_eq!(interner.resolve(name), "a\nb");
    }

    #[test]
    fn reports_unterminated_string() {
        let interner = Interner::new();
        let (_, diags) = Cooker::new("\"abc", "test.ail", &interner).cook();
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn reports_unknown_character() {
        let interner = Interner::new();
        let (_, diags) = Cooker::new("let x = 1 ` 2", "test.ail", &interner).cook();
        assert_eq!(diags.len(), 1);
    }
}
