//! Cooked tokens: the parser's input alphabet.

use ailang_ir::{Name, Span};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    Ident(Name),
    Int(i64),
    Float(u64),
    Str(Name),
    True,
    False,

    KwModule,
    KwImport,
    KwExport,
    KwFunc,
    KwType,
    KwInstance,
    KwLet,
    KwLetRec,
    KwIn,
    KwIf,
    KwElse,
    KwMatch,
    KwRecord,
    KwUpdate,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    Eq,
    EqEq,
    BangEq,
    Bang,
    Lt,
    LtEq,
    Gt,
    GtEq,
    AmpAmp,
    PipePipe,
    Pipe,
    Arrow,
    FatArrow,
    Colon,
    Comma,
    Dot,
    Semi,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    Eof,
}

#[derive(Clone, Copy, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}
