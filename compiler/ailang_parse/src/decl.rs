//! Top-level structure: module header, imports, and declarations
//! (§4.A "Surface AST", §6 "Source file format").

use ailang_ir::module::ImportNames;
use ailang_ir::surface::{Decl, FuncDecl, Import, InstanceDecl, LetDecl, TypeDecl};
use ailang_lexer::TokenKind;

use crate::Parser;

impl Parser<'_> {
    /// `import Foo.Bar` or `import Foo.Bar (name1, name2)`.
    pub(crate) fn parse_import(&mut self) -> Import {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwImport, "expected `import`");
        let module_path = self.parse_dotted_path();
        let names = if self.eat(TokenKind::LParen) {
            let mut names = vec![self.expect_ident("expected an imported name")];
            while self.eat(TokenKind::Comma) {
                if self.cursor.at(TokenKind::RParen) {
                    break;
                }
                names.push(self.expect_ident("expected an imported name"));
            }
            self.expect(TokenKind::RParen, "expected `)` closing selective import");
            ImportNames::Selective(names)
        } else {
            ImportNames::All
        };
        let end = self.cursor.current().span;
        Import {
            module_path,
            names,
            span: start.merge(end),
        }
    }

    /// `Foo.Bar.Baz` or `std/clock` (§6 "Source file format" uses the
    /// slash form for stdlib imports), interned as one dotted `Name` either
    /// way — the loader only ever sees `.`-joined segments when it splits
    /// the path back apart to resolve a file or a stdlib module id (§4.D).
    pub(crate) fn parse_dotted_path(&mut self) -> ailang_ir::Name {
        let mut text = self.interner.resolve(self.expect_ident("expected a module path"));
        while self.eat(TokenKind::Dot) || self.eat(TokenKind::Slash) {
            text.push('.');
            text.push_str(&self.interner.resolve(self.expect_ident("expected a path segment")));
        }
        self.interner.intern(&text)
    }

    pub(crate) fn parse_decl(&mut self) -> Decl {
        let exported = self.eat(TokenKind::KwExport);
        match self.cursor.kind() {
            TokenKind::KwFunc => Decl::Func(self.parse_func_decl(exported)),
            TokenKind::KwLet => Decl::Let(self.parse_let_decl(exported)),
            TokenKind::KwType => Decl::Type(self.parse_type_decl()),
            TokenKind::KwInstance => Decl::Instance(self.parse_instance_decl()),
            _ => {
                self.error("expected a declaration (`func`, `let`, `type`, or `instance`)");
                self.cursor.force_advance();
                Decl::Let(LetDecl {
                    name: ailang_ir::Name::UNIT,
                    ty: None,
                    value: ailang_ir::surface::Expr {
                        span: self.cursor.current().span,
                        kind: ailang_ir::surface::ExprKind::Lit(ailang_ir::Literal::Unit),
                    },
                    exported: false,
                    span: self.cursor.current().span,
                })
            }
        }
    }

    fn parse_func_decl(&mut self, exported: bool) -> FuncDecl {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwFunc, "expected `func`");
        let name = self.expect_ident("expected a function name");
        let params = self.parse_params();
        let ret = if self.eat(TokenKind::Arrow) {
            Some(self.parse_type())
        } else {
            None
        };
        let effect = self.parse_optional_effect_row();
        let body = self.parse_block(self.cursor.current().span);
        FuncDecl {
            name,
            params,
            ret,
            effect,
            span: start.merge(body.span),
            body,
            exported,
        }
    }

    fn parse_let_decl(&mut self, exported: bool) -> LetDecl {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwLet, "expected `let`");
        let name = self.expect_ident("expected a name after `let`");
        let ty = if self.eat(TokenKind::Colon) {
            Some(self.parse_type())
        } else {
            None
        };
        self.expect(TokenKind::Eq, "expected `=` in top-level `let`");
        let value = self.parse_expr();
        LetDecl {
            name,
            ty,
            span: start.merge(value.span),
            value,
            exported,
        }
    }

    /// `type Name = Ctor1(T, ...) | Ctor2 | ...`.
    fn parse_type_decl(&mut self) -> TypeDecl {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwType, "expected `type`");
        let name = self.expect_ident("expected a type name");
        self.expect(TokenKind::Eq, "expected `=` in `type` declaration");
        let mut constructors = vec![self.parse_constructor_def()];
        while self.eat(TokenKind::Pipe) {
            constructors.push(self.parse_constructor_def());
        }
        let end = self.cursor.current().span;
        TypeDecl {
            name,
            constructors,
            span: start.merge(end),
        }
    }

    fn parse_constructor_def(&mut self) -> (ailang_ir::Name, Vec<ailang_ir::surface::ParsedType>) {
        let ctor = self.expect_ident("expected a constructor name");
        let mut args = Vec::new();
        if self.eat(TokenKind::LParen) {
            if !self.cursor.at(TokenKind::RParen) {
                args.push(self.parse_type());
                while self.eat(TokenKind::Comma) {
                    if self.cursor.at(TokenKind::RParen) {
                        break;
                    }
                    args.push(self.parse_type());
                }
            }
            self.expect(TokenKind::RParen, "expected `)` closing constructor arguments");
        }
        (ctor, args)
    }

    /// `instance ClassName for HeadType { func m1(...) {...} ... }`.
    fn parse_instance_decl(&mut self) -> InstanceDecl {
        let start = self.cursor.current().span;
        self.expect(TokenKind::KwInstance, "expected `instance`");
        let class = self.expect_ident("expected a class name");
        self.expect_keyword_text("for", "expected `for` after the class name");
        let head = self.parse_type();
        self.expect(TokenKind::LBrace, "expected `{` opening instance body");
        let mut methods = Vec::new();
        while !self.cursor.at(TokenKind::RBrace) && !self.cursor.at(TokenKind::Eof) {
            methods.push(self.parse_func_decl(false));
        }
        let end = self.cursor.current().span;
        self.expect(TokenKind::RBrace, "expected `}` closing instance body");
        InstanceDecl {
            class,
            head,
            methods,
            span: start.merge(end),
        }
    }
}
