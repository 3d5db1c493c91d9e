//! Cooking: raw tokens + source text -> spanned, interned `Token`s.
//!
//! Only the `Token`/`Span` contract handed to `ailang_parse` is load-bearing,
//! not any particular scanning strategy.

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{Interner, SourceSpan, Span};
use ailang_lexer_core::{tokenize, RawTag, RawToken};

use crate::keywords;
use crate::token::{Token, TokenKind};

pub struct Cooker<'a> {
    source: &'a str,
    file: String,
    interner: &'a Interner,
}

impl<'a> Cooker<'a> {
    #[must_use]
    pub fn new(source: &'a str, file: impl Into<String>, interner: &'a Interner) -> Self {
        Cooker {
            source,
            file: file.into(),
            interner,
        }
    }

    /// Cook the whole source into a token stream, terminated by `Eof`.
    /// Diagnostics for individual bad tokens are collected rather than
    /// aborting, so the parser still gets a token stream to recover on.
    pub fn cook(&self) -> (Vec<Token>, Vec<Diagnostic>) {
        let raw = tokenize(self.source);
        let mut tokens = Vec::with_capacity(raw.len());
        let mut diagnostics = Vec::new();
        let mut offset = 0u32;

        for RawToken { tag, len } in raw {
            let start = offset;
            let end = offset + len;
            offset = end;
            let span = Span::new(start, end);
            let text = &self.source[start as usize..end as usize];

            match tag {
                RawTag::Whitespace | RawTag::LineComment => {}
                RawTag::BlockComment { terminated } => {
                    if !terminated {
                        diagnostics.push(self.unterminated(span, "block comment"));
                    }
                }
                RawTag::Ident => {
                    let kind = keywords::lookup(text)
                        .unwrap_or_else(|| TokenKind::Ident(self.interner.intern(text)));
                    tokens.push(Token::new(kind, span));
                }
                RawTag::Int => match text.parse::<i64>() {
                    Ok(v) => tokens.push(Token::new(TokenKind::Int(v), span)),
                    Err(_) => diagnostics.push(self.bad_number(span, text)),
                },
                RawTag::Float => match text.parse::<f64>() {
                    Ok(v) => tokens.push(Token::new(TokenKind::Float(v.to_bits()), span)),
                    Err(_) => diagnostics.push(self.bad_number(span, text)),
                },
                RawTag::String { terminated } => {
                    if !terminated {
                        diagnostics.push(self.unterminated(span, "string literal"));
                    }
                    let inner = &text[1..text.len() - usize::from(terminated)];
                    let unescaped = unescape(inner);
                    let name = self.interner.intern(&unescaped);
                    tokens.push(Token::new(TokenKind::Str(name), span));
                }
                RawTag::Plus => tokens.push(Token::new(TokenKind::Plus, span)),
                RawTag::Minus => tokens.push(Token::new(TokenKind::Minus, span)),
                RawTag::Star => tokens.push(Token::new(TokenKind::Star, span)),
                RawTag::Slash => tokens.push(Token::new(TokenKind::Slash, span)),
                RawTag::Percent => tokens.push(Token::new(TokenKind::Percent, span)),
                RawTag::PlusPlus => tokens.push(Token::new(TokenKind::PlusPlus, span)),
                RawTag::Eq => tokens.push(Token::new(TokenKind::Eq, span)),
                RawTag::EqEq => tokens.push(Token::new(TokenKind::EqEq, span)),
                RawTag::FatArrow => tokens.push(Token::new(TokenKind::FatArrow, span)),
                RawTag::Bang => tokens.push(Token::new(TokenKind::Bang, span)),
                RawTag::BangEq => tokens.push(Token::new(TokenKind::BangEq, span)),
                RawTag::Lt => tokens.push(Token::new(TokenKind::Lt, span)),
                RawTag::LtEq => tokens.push(Token::new(TokenKind::LtEq, span)),
                RawTag::Gt => tokens.push(Token::new(TokenKind::Gt, span)),
                RawTag::GtEq => tokens.push(Token::new(TokenKind::GtEq, span)),
                RawTag::AmpAmp => tokens.push(Token::new(TokenKind::AmpAmp, span)),
                RawTag::PipePipe => tokens.push(Token::new(TokenKind::PipePipe, span)),
                RawTag::Pipe => tokens.push(Token::new(TokenKind::Pipe, span)),
                RawTag::Arrow => tokens.push(Token::new(TokenKind::Arrow, span)),
                RawTag::Colon => tokens.push(Token::new(TokenKind::Colon, span)),
                RawTag::Comma => tokens.push(Token::new(TokenKind::Comma, span)),
                RawTag::Dot => tokens.push(Token::new(TokenKind::Dot, span)),
                RawTag::Semi => tokens.push(Token::new(TokenKind::Semi, span)),
                RawTag::LParen => tokens.push(Token::new(TokenKind::LParen, span)),
                RawTag::RParen => tokens.push(Token::new(TokenKind::RParen, span)),
                RawTag::LBrace => tokens.push(Token::new(TokenKind::LBrace, span)),
                RawTag::RBrace => tokens.push(Token::new(TokenKind::RBrace, span)),
                RawTag::LBracket => tokens.push(Token::new(TokenKind::LBracket, span)),
                RawTag::RBracket => tokens.push(Token::new(TokenKind::RBracket, span)),
                RawTag::Unknown => {
                    diagnostics.push(
                        Diagnostic::new(
                            ErrorCode::LEX001(),
                            Phase::Parser,
                            format!("unrecognized character `{text}`"),
                        )
                        .with_span(SourceSpan {
                            file: self.file.clone(),
                            span,
                        }),
                    );
                }
                RawTag::Eof => {}
            }
        }

        let eof_span = Span::new(offset, offset);
        tokens.push(Token::new(TokenKind::Eof, eof_span));
        (tokens, diagnostics)
    }

    fn unterminated(&self, span: Span, what: &str) -> Diagnostic {
        Diagnostic::new(
            ErrorCode::LEX001(),
            Phase::Parser,
            format!("unterminated {what}"),
        )
        .with_span(SourceSpan {
            file: self.file.clone(),
            span,
        })
    }

    fn bad_number(&self, span: Span, text: &str) -> Diagnostic {
        Diagnostic::new(
            ErrorCode::LEX002(),
            Phase::Parser,
            format!("invalid numeric literal `{text}`"),
        )
        .with_span(SourceSpan {
            file: self.file.clone(),
            span,
        })
    }
}

/// Resolve backslash escapes in a string literal's interior (the quotes
/// already stripped). Unknown escapes pass the backslash through literally
/// rather than erroring — the lexer here only guarantees termination, not a
/// full escape grammar (§6 "beyond the AST contract it produces").
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
