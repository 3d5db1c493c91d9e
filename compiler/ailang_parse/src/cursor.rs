//! Token cursor: thin navigation over a cooked token slice.

use ailang_lexer::{Token, TokenKind};

pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[must_use]
    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    #[must_use]
    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn bump(&mut self) -> Token {
        let tok = *self.current();
        if !matches!(tok.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        tok
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Advance one token on no progress to guarantee termination during
    /// error recovery.
    pub fn force_advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }
}
