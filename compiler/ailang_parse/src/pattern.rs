//! Pattern parsing for `match` arms.

use ailang_ir::{Literal, Pattern, PatternKind};
use ailang_lexer::TokenKind;

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_pattern(&mut self) -> Pattern {
        let start = self.cursor.current().span;
        let kind = match self.cursor.kind() {
            TokenKind::Ident(name) => {
                self.cursor.bump();
                if self.is_wildcard_text(name) {
                    PatternKind::Wildcard
                } else if self.cursor.at(TokenKind::LParen) {
                    self.cursor.bump();
                    let mut args = Vec::new();
                    if !self.cursor.at(TokenKind::RParen) {
                        args.push(self.parse_pattern());
                        while self.eat(TokenKind::Comma) {
                            if self.cursor.at(TokenKind::RParen) {
                                break;
                            }
                            args.push(self.parse_pattern());
                        }
                    }
                    self.expect(TokenKind::RParen, "expected `)` closing constructor pattern");
                    PatternKind::Constructor {
                        module: None,
                        ctor: name,
                        args,
                    }
                } else if self.eat(TokenKind::Dot) {
                    let ctor = self.expect_ident("expected a constructor name after `.`");
                    let mut args = Vec::new();
                    if self.eat(TokenKind::LParen) {
                        if !self.cursor.at(TokenKind::RParen) {
                            args.push(self.parse_pattern());
                            while self.eat(TokenKind::Comma) {
                                if self.cursor.at(TokenKind::RParen) {
                                    break;
                                }
                                args.push(self.parse_pattern());
                            }
                        }
                        self.expect(TokenKind::RParen, "expected `)` closing constructor pattern");
                    }
                    PatternKind::Constructor {
                        module: Some(name),
                        ctor,
                        args,
                    }
                } else {
                    PatternKind::Var(name)
                }
            }
            TokenKind::Int(v) => {
                self.cursor.bump();
                PatternKind::Lit(Literal::Int(v))
            }
            TokenKind::Float(bits) => {
                self.cursor.bump();
                PatternKind::Lit(Literal::Float(bits))
            }
            TokenKind::True => {
                self.cursor.bump();
                PatternKind::Lit(Literal::Bool(true))
            }
            TokenKind::False => {
                self.cursor.bump();
                PatternKind::Lit(Literal::Bool(false))
            }
            TokenKind::Str(name) => {
                self.cursor.bump();
                PatternKind::Lit(Literal::Str(name))
            }
            TokenKind::LParen => {
                self.cursor.bump();
                let mut elems = Vec::new();
                if !self.cursor.at(TokenKind::RParen) {
                    elems.push(self.parse_pattern());
                    while self.eat(TokenKind::Comma) {
                        if self.cursor.at(TokenKind::RParen) {
                            break;
                        }
                        elems.push(self.parse_pattern());
                    }
                }
                self.expect(TokenKind::RParen, "expected `)` closing tuple pattern");
                if elems.len() == 1 {
                    return elems.into_iter().next().unwrap_or(Pattern {
                        span: start,
                        kind: PatternKind::Wildcard,
                    });
                }
                PatternKind::Tuple(elems)
            }
            TokenKind::KwRecord => {
                self.cursor.bump();
                self.expect(TokenKind::LBrace, "expected `{` after `record`");
                let mut fields = Vec::new();
                while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
                    let label = self.expect_ident("expected a field label");
                    self.expect(TokenKind::Colon, "expected `:` after field label");
                    let pat = self.parse_pattern();
                    fields.push((label, pat));
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "expected `}` closing record pattern");
                PatternKind::Record(fields)
            }
            _ => {
                self.error("expected a pattern");
                self.cursor.force_advance();
                PatternKind::Wildcard
            }
        };
        Pattern { span: start, kind }
    }

    fn is_wildcard_text(&self, name: ailang_ir::Name) -> bool {
        self.interner.resolve(name) == "_"
    }
}
