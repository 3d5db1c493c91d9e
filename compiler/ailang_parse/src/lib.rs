//! Recursive-descent parser for AILANG's surface syntax.
//!
//! The textual grammar itself is an external-collaborator concern (§6
//! "beyond the AST contract it produces") — what matters to the rest of the
//! pipeline is that this crate hands `ailang_elab` a well-formed
//! `ailang_ir::surface::Module`. Precedence climbing handles binary
//! operators; everything else is a direct recursive descent over the
//! cooked token stream from `ailang_lexer`.

mod cursor;
mod decl;
mod expr;
mod pattern;
mod ty;

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::surface::Module as SurfaceModule;
use ailang_ir::{Interner, Name, SourceSpan};
use ailang_lexer::{Cooker, Token, TokenKind};

use cursor::Cursor;

pub struct Parser<'a> {
    cursor: Cursor<'a>,
    interner: &'a Interner,
    file: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token], interner: &'a Interner, file: impl Into<String>) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            interner,
            file: file.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Parse a whole source file: a run of `import`s, then either a
    /// `module <path>` header plus declarations, or a single trailing
    /// expression (a script, §6 "Source file format").
    #[must_use]
    pub fn parse_module(mut self) -> (SurfaceModule, Vec<Diagnostic>) {
        let mut imports = Vec::new();
        while self.cursor.at(TokenKind::KwImport) {
            imports.push(self.parse_import());
        }

        let module = if self.eat(TokenKind::KwModule) {
            let path = self.parse_dotted_path();
            let mut decls = Vec::new();
            while !self.cursor.at(TokenKind::Eof) {
                let before = self.cursor.position();
                decls.push(self.parse_decl());
                if self.cursor.position() == before {
                    // Guaranteed progress: parse_decl's error arm already
                    // advances, but keep this as a hard backstop.
                    self.cursor.force_advance();
                }
            }
            SurfaceModule {
                path: Some(path),
                imports,
                decls,
                script_expr: None,
            }
        } else {
            let script_expr = self.parse_expr();
            SurfaceModule {
                path: None,
                imports,
                decls: Vec::new(),
                script_expr: Some(script_expr),
            }
        };

        (module, self.diagnostics)
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.cursor.at(kind) {
            self.cursor.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) {
        if !self.eat(kind) {
            self.error(message);
        }
    }

    /// `expect_ident` for contextual keywords that are lexed as plain
    /// identifiers (only `for` at present, in `instance ... for ...`).
    fn expect_keyword_text(&mut self, text: &str, message: &str) {
        if let TokenKind::Ident(name) = self.cursor.kind() {
            if self.interner.resolve(name) == text {
                self.cursor.bump();
                return;
            }
        }
        self.error(message);
    }

    fn expect_ident(&mut self, message: &str) -> Name {
        if let TokenKind::Ident(name) = self.cursor.kind() {
            self.cursor.bump();
            name
        } else {
            self.error(message);
            self.interner.intern("_")
        }
    }

    fn error(&mut self, message: &str) {
        let span = self.cursor.current().span;
        self.diagnostics.push(
            Diagnostic::new(ErrorCode::PAR001(), Phase::Parser, message.to_string())
                .with_span(SourceSpan::new(self.file.clone(), span)),
        );
    }
}

/// Cook and parse a whole source file in one call.
#[must_use]
pub fn parse_source(
    source: &str,
    file: impl Into<String>,
    interner: &Interner,
) -> (SurfaceModule, Vec<Diagnostic>) {
    let file = file.into();
    let (tokens, mut diagnostics) = Cooker::new(source, file.clone(), interner).cook();
    let parser = Parser::new(&tokens, interner, file);
    let (module, parse_diagnostics) = parser.parse_module();
    diagnostics.extend(parse_diagnostics);
    (module, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::surface::ExprKind;

    fn parse(src: &str) -> (SurfaceModule, Vec<Diagnostic>, Interner) {
        let interner = Interner::new();
        let (module, diags) = parse_source(src, "test.ail", &interner);
        (module, diags, interner)
    }

    #[test]
    fn parses_arithmetic_script() {
        let (module, diags, _) = parse("let x = 1 + 2 in x * 3");
        assert!(diags.is_empty(), "{diags:?}");
        assert!(module.is_script());
        assert!(matches!(
            module.script_expr.as_ref().map(|e| &e.kind),
            Some(ExprKind::Let { .. })
        ));
    }

    #[test]
    fn parses_module_with_exported_func() {
        let src = "module Demo\n\nexport func add(x: Int, y: Int) -> Int {\n  x + y\n}\n";
        let (module, diags, _) = parse(src);
        assert!(diags.is_empty(), "{diags:?}");
        assert!(!module.is_script());
        assert_eq!(module.decls.len(), 1);
    }

    #[test]
    fn parses_match_with_guard() {
        let src = "match x { n if n > 0 => 1, _ => 0 }";
        let (module, diags, _) = parse(src);
        assert!(diags.is_empty(), "{diags:?}");
        let Some(expr) = module.script_expr.as_ref() else {
            panic!("expected a script expression");
        };
        let ExprKind::Match { arms, .. } = &expr.kind else {
            panic!("expected a match expression");
        };
        assert_eq!(arms.len(), 2);
        assert!(arms[0].guard.is_some());
    }

    #[test]
    fn parses_import_with_selective_names() {
        let src = "import Foo.Bar (baz, qux)\n\nbaz";
        let (module, diags, _) = parse(src);
        assert!(diags.is_empty(), "{diags:?}");
        assert_eq!(module.imports.len(), 1);
    }

    #[test]
    fn reports_a_parse_error_without_panicking() {
        let (_module, diags, _) = parse("let = 1 in x");
        assert!(!diags.is_empty());
    }
}
