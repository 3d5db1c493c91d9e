//! Type annotations as written in source (§4.A "Surface AST" type
//! positions): function signatures, instance heads, `type` definitions.

use ailang_ir::surface::ParsedType;
use ailang_lexer::TokenKind;

use crate::Parser;

impl Parser<'_> {
    pub(crate) fn parse_type(&mut self) -> ParsedType {
        match self.cursor.kind() {
            TokenKind::KwFunc => self.parse_fn_type(),
            TokenKind::KwRecord => self.parse_record_type(),
            TokenKind::LParen => self.parse_tuple_type(),
            TokenKind::Ident(name) => {
                self.cursor.bump();
                if self.cursor.at(TokenKind::Lt) {
                    self.cursor.bump();
                    let mut args = vec![self.parse_type()];
                    while self.eat(TokenKind::Comma) {
                        args.push(self.parse_type());
                    }
                    self.expect(TokenKind::Gt, "expected `>` closing type arguments");
                    ParsedType::App(name, args)
                } else {
                    ParsedType::Con(name)
                }
            }
            _ => {
                self.error("expected a type");
                ParsedType::Con(ailang_ir::Name::UNIT)
            }
        }
    }

    fn parse_tuple_type(&mut self) -> ParsedType {
        self.expect(TokenKind::LParen, "expected `(`");
        let mut elems = Vec::new();
        if !self.cursor.at(TokenKind::RParen) {
            elems.push(self.parse_type());
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RParen) {
                    break;
                }
                elems.push(self.parse_type());
            }
        }
        self.expect(TokenKind::RParen, "expected `)` closing tuple type");
        if elems.len() == 1 {
            elems.into_iter().next().unwrap_or(ParsedType::Tuple(vec![]))
        } else {
            ParsedType::Tuple(elems)
        }
    }

    fn parse_fn_type(&mut self) -> ParsedType {
        self.expect(TokenKind::KwFunc, "expected `func`");
        self.expect(TokenKind::LParen, "expected `(` after `func`");
        let mut params = Vec::new();
        if !self.cursor.at(TokenKind::RParen) {
            params.push(self.parse_type());
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RParen) {
                    break;
                }
                params.push(self.parse_type());
            }
        }
        self.expect(TokenKind::RParen, "expected `)` closing parameter types");
        self.expect(TokenKind::Arrow, "expected `->` in function type");
        let ret = Box::new(self.parse_type());
        let effect = self.parse_optional_effect_row();
        ParsedType::Fun {
            params,
            ret,
            effect,
        }
    }

    fn parse_record_type(&mut self) -> ParsedType {
        self.expect(TokenKind::KwRecord, "expected `record`");
        self.expect(TokenKind::LBrace, "expected `{` after `record`");
        let mut fields = Vec::new();
        let mut open = false;
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            if self.eat(TokenKind::Dot) {
                self.expect(TokenKind::Dot, "expected `..` marking an open row");
                open = true;
                break;
            }
            let label = self.expect_ident("expected a field label");
            self.expect(TokenKind::Colon, "expected `:` after field label");
            let ty = self.parse_type();
            fields.push((label, ty));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "expected `}` closing record type");
        ParsedType::Record { fields, open }
    }

    /// `! { IO, FS }` or nothing (inferred). An explicitly empty `!{}` means
    /// pure, distinct from the absent-annotation case (§4.A `Param`/`ret`
    /// doc: "None means inferred, Some(vec![]) means explicitly pure").
    pub(crate) fn parse_optional_effect_row(&mut self) -> Option<Vec<ailang_ir::Name>> {
        if !self.eat(TokenKind::Bang) {
            return None;
        }
        self.expect(TokenKind::LBrace, "expected `{` after `!`");
        let mut names = Vec::new();
        if !self.cursor.at(TokenKind::RBrace) {
            names.push(self.expect_ident("expected an effect name"));
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RBrace) {
                    break;
                }
                names.push(self.expect_ident("expected an effect name"));
            }
        }
        self.expect(TokenKind::RBrace, "expected `}` closing effect row");
        Some(names)
    }
}
