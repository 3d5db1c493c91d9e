//! Keyword resolution. All AILANG keywords are reserved unconditionally —
//! unlike the soft-keyword scheme some sibling languages use, there is no
//! `(`-lookahead disambiguation here (§6 grammar has no use for it).

use crate::token::TokenKind;

#[must_use]
pub fn lookup(text: &str) -> Option<TokenKind> {
    match text {
        "module" => Some(TokenKind::KwModule),
        "import" => Some(TokenKind::KwImport),
        "export" => Some(TokenKind::KwExport),
        "func" => Some(TokenKind::KwFunc),
        "type" => Some(TokenKind::KwType),
        "instance" => Some(TokenKind::KwInstance),
        "let" => Some(TokenKind::KwLet),
        "letrec" => Some(TokenKind::KwLetRec),
        "in" => Some(TokenKind::KwIn),
        "if" => Some(TokenKind::KwIf),
        "else" => Some(TokenKind::KwElse),
        "match" => Some(TokenKind::KwMatch),
        "record" => Some(TokenKind::KwRecord),
        "update" => Some(TokenKind::KwUpdate),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        _ => None,
    }
}
