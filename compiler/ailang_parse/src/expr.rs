//! Expression parsing: precedence-climbing binary operators over a
//! recursive-descent core (§4.A "Surface AST").

use ailang_ir::surface::{BinOp, Expr, ExprKind, MatchArm, UnaryOp};
use ailang_ir::Literal;
use ailang_lexer::TokenKind;

use crate::Parser;

/// Binding power of each binary operator, for precedence climbing in
/// `parse_binary`. All comparison operators share one level, so `a < b < c`
/// parses as `(a < b) < c` rather than being rejected as non-associative —
/// the type checker rejects it later since `<`'s result is `Bool`.
fn binop_of(kind: TokenKind) -> Option<(BinOp, u8)> {
    match kind {
        TokenKind::PipePipe => Some((BinOp::Or, 1)),
        TokenKind::AmpAmp => Some((BinOp::And, 2)),
        TokenKind::EqEq => Some((BinOp::Eq, 3)),
        TokenKind::BangEq => Some((BinOp::Neq, 3)),
        TokenKind::Lt => Some((BinOp::Lt, 3)),
        TokenKind::LtEq => Some((BinOp::Le, 3)),
        TokenKind::Gt => Some((BinOp::Gt, 3)),
        TokenKind::GtEq => Some((BinOp::Ge, 3)),
        TokenKind::Plus => Some((BinOp::Add, 4)),
        TokenKind::Minus => Some((BinOp::Sub, 4)),
        TokenKind::PlusPlus => Some((BinOp::Concat, 4)),
        TokenKind::Star => Some((BinOp::Mul, 5)),
        TokenKind::Slash => Some((BinOp::Div, 5)),
        TokenKind::Percent => Some((BinOp::Mod, 5)),
        _ => None,
    }
}

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_binary(0)
    }

    fn parse_binary(&mut self, min_bp: u8) -> Expr {
        let mut lhs = self.parse_unary();
        loop {
            let Some((op, bp)) = binop_of(self.cursor.kind()) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.cursor.bump();
            let rhs = self.parse_binary(bp + 1);
            let span = lhs.span.merge(rhs.span);
            lhs = Expr {
                span,
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
            };
        }
        lhs
    }

    fn parse_unary(&mut self) -> Expr {
        let start = self.cursor.current().span;
        let op = match self.cursor.kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        self.cursor.bump();
        let operand = self.parse_unary();
        Expr {
            span: start.merge(operand.span),
            kind: ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            match self.cursor.kind() {
                TokenKind::LParen => {
                    self.cursor.bump();
                    let mut args = Vec::new();
                    if !self.cursor.at(TokenKind::RParen) {
                        args.push(self.parse_expr());
                        while self.eat(TokenKind::Comma) {
                            if self.cursor.at(TokenKind::RParen) {
                                break;
                            }
                            args.push(self.parse_expr());
                        }
                    }
                    let end = self.cursor.current().span;
                    self.expect(TokenKind::RParen, "expected `)` closing call arguments");
                    expr = Expr {
                        span: expr.span.merge(end),
                        kind: ExprKind::Call {
                            func: Box::new(expr),
                            args,
                        },
                    };
                }
                TokenKind::Dot => {
                    self.cursor.bump();
                    let label = self.expect_ident("expected a field name after `.`");
                    expr = Expr {
                        span: expr.span,
                        kind: ExprKind::RecordAccess {
                            record: Box::new(expr),
                            label,
                        },
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let span = self.cursor.current().span;
        match self.cursor.kind() {
            TokenKind::Int(v) => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Int(v)),
                }
            }
            TokenKind::Float(bits) => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Float(bits)),
                }
            }
            TokenKind::True => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Bool(true)),
                }
            }
            TokenKind::False => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Bool(false)),
                }
            }
            TokenKind::Str(name) => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Str(name)),
                }
            }
            TokenKind::Ident(name) => {
                self.cursor.bump();
                Expr {
                    span,
                    kind: ExprKind::Var(name),
                }
            }
            TokenKind::LParen => self.parse_paren_or_tuple(span),
            TokenKind::LBracket => self.parse_list(span),
            TokenKind::LBrace => self.parse_block(span),
            TokenKind::KwIf => self.parse_if(span),
            TokenKind::KwMatch => self.parse_match(span),
            TokenKind::KwLet => self.parse_let(span),
            TokenKind::KwLetRec => self.parse_letrec(span),
            TokenKind::KwFunc => self.parse_func_lit(span),
            TokenKind::KwRecord => self.parse_record_or_update(span),
            TokenKind::KwUpdate => self.parse_update_expr(),
            _ => {
                self.error("expected an expression");
                self.cursor.force_advance();
                Expr {
                    span,
                    kind: ExprKind::Lit(Literal::Unit),
                }
            }
        }
    }

    fn parse_paren_or_tuple(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        if self.eat(TokenKind::RParen) {
            return Expr {
                span: start,
                kind: ExprKind::Lit(Literal::Unit),
            };
        }
        let mut elems = vec![self.parse_expr()];
        let mut is_tuple = false;
        while self.eat(TokenKind::Comma) {
            is_tuple = true;
            if self.cursor.at(TokenKind::RParen) {
                break;
            }
            elems.push(self.parse_expr());
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RParen, "expected `)` closing parenthesized expression");
        let span = start.merge(end);
        if is_tuple {
            Expr {
                span,
                kind: ExprKind::Tuple(elems),
            }
        } else {
            elems.into_iter().next().unwrap_or(Expr {
                span,
                kind: ExprKind::Lit(Literal::Unit),
            })
        }
    }

    fn parse_list(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let mut elems = Vec::new();
        if !self.cursor.at(TokenKind::RBracket) {
            elems.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RBracket) {
                    break;
                }
                elems.push(self.parse_expr());
            }
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBracket, "expected `]` closing list literal");
        Expr {
            span: start.merge(end),
            kind: ExprKind::List(elems),
        }
    }

    /// `{ e1; e2; ...; en }` — the last expression (no trailing `;`) is the
    /// block's value (§4.A "block desugaring").
    pub(crate) fn parse_block(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let mut exprs = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            exprs.push(self.parse_expr());
            if !self.eat(TokenKind::Semi) {
                break;
            }
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBrace, "expected `}` closing block");
        if exprs.is_empty() {
            exprs.push(Expr {
                span: start.merge(end),
                kind: ExprKind::Lit(Literal::Unit),
            });
        }
        Expr {
            span: start.merge(end),
            kind: ExprKind::Block(exprs),
        }
    }

    fn parse_if(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let cond = self.parse_expr();
        let then_branch = self.parse_block(self.cursor.current().span);
        self.expect(TokenKind::KwElse, "expected `else` after `if` branch");
        let else_branch = if self.cursor.at(TokenKind::KwIf) {
            self.parse_if(self.cursor.current().span)
        } else {
            self.parse_block(self.cursor.current().span)
        };
        Expr {
            span: start.merge(else_branch.span),
            kind: ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            },
        }
    }

    fn parse_match(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let scrutinee = self.parse_expr();
        self.expect(TokenKind::LBrace, "expected `{` opening match arms");
        let mut arms = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            let pattern = self.parse_pattern();
            let guard = if self.eat(TokenKind::KwIf) {
                Some(self.parse_expr())
            } else {
                None
            };
            self.expect(TokenKind::FatArrow, "expected `=>` after match pattern");
            let body = self.parse_expr();
            arms.push(MatchArm {
                pattern,
                guard,
                body,
            });
            // The comma between arms is optional.
            self.eat(TokenKind::Comma);
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBrace, "expected `}` closing match arms");
        Expr {
            span: start.merge(end),
            kind: ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                arms,
            },
        }
    }

    fn parse_let(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let name = self.expect_ident("expected a name after `let`");
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        self.expect(TokenKind::Eq, "expected `=` in `let` binding");
        let value = self.parse_expr();
        self.expect(TokenKind::KwIn, "expected `in` after `let` value");
        let body = self.parse_expr();
        Expr {
            span: start.merge(body.span),
            kind: ExprKind::Let {
                name,
                ty,
                value: Box::new(value),
                body: Box::new(body),
            },
        }
    }

    fn parse_letrec(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let mut bindings = vec![self.parse_letrec_binding()];
        while self.eat(TokenKind::Semi) {
            if self.cursor.at(TokenKind::KwIn) {
                break;
            }
            bindings.push(self.parse_letrec_binding());
        }
        self.expect(TokenKind::KwIn, "expected `in` after `letrec` bindings");
        let body = self.parse_expr();
        Expr {
            span: start.merge(body.span),
            kind: ExprKind::LetRec {
                bindings,
                body: Box::new(body),
            },
        }
    }

    fn parse_letrec_binding(&mut self) -> (ailang_ir::Name, Expr) {
        let name = self.expect_ident("expected a binding name in `letrec`");
        self.expect(TokenKind::Eq, "expected `=` in `letrec` binding");
        let value = self.parse_expr();
        (name, value)
    }

    pub(crate) fn parse_func_lit(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        let params = self.parse_params();
        let ret = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type())
        } else {
            None
        };
        let effect = self.parse_optional_effect_row();
        let body = self.parse_block(self.cursor.current().span);
        Expr {
            span: start.merge(body.span),
            kind: ExprKind::FuncLit {
                params,
                ret,
                effect,
                body: Box::new(body),
            },
        }
    }

    pub(crate) fn parse_params(&mut self) -> Vec<ailang_ir::surface::Param> {
        self.expect(TokenKind::LParen, "expected `(` opening parameter list");
        let mut params = Vec::new();
        if !self.cursor.at(TokenKind::RParen) {
            params.push(self.parse_param());
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RParen) {
                    break;
                }
                params.push(self.parse_param());
            }
        }
        self.expect(TokenKind::RParen, "expected `)` closing parameter list");
        params
    }

    fn parse_param(&mut self) -> ailang_ir::surface::Param {
        let span = self.cursor.current().span;
        let name = self.expect_ident("expected a parameter name");
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        ailang_ir::surface::Param { name, ty, span }
    }

    /// `record { l: e, ... }` or `update base { l: e, ... }` (§4.A "record
    /// update").
    fn parse_record_or_update(&mut self, start: ailang_ir::Span) -> Expr {
        self.cursor.bump();
        self.expect(TokenKind::LBrace, "expected `{` after `record`");
        let mut fields = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            let label = self.expect_ident("expected a field label");
            self.expect(TokenKind::Colon, "expected `:` after field label");
            let value = self.parse_expr();
            fields.push((label, value));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBrace, "expected `}` closing record literal");
        Expr {
            span: start.merge(end),
            kind: ExprKind::Record { fields },
        }
    }

    pub(crate) fn parse_update_expr(&mut self) -> Expr {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwUpdate, "expected `update`");
        let base = self.parse_postfix();
        self.expect(TokenKind::LBrace, "expected `{` after `update` base");
        let mut updates = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            let label = self.expect_ident("expected a field label");
            self.expect(TokenKind::Colon, "expected `:` after field label");
            let value = self.parse_expr();
            updates.push((label, value));
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBrace, "expected `}` closing record update");
        Expr {
            span: start.merge(end),
            kind: ExprKind::RecordUpdate {
                base: Box::new(base),
                updates,
            },
        }
    }
}
