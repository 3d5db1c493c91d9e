//! Elaborates the surface AST (`ailang_ir::surface`) into a Core `CoreModule`
//! (§4.A "Elaboration").
//!
//! This is the pipeline stage between parsing and type checking: surface
//! syntax sugar (blocks, `&&`/`||`/`!`, anonymous functions) is desugared
//! to ANF here, type annotations are resolved from names to `Type`s, and a
//! `letrec`-duplicate-binding / non-exhaustive-`match` / underscore-export
//! check each run once per declaration.

mod anf;
mod exhaustiveness;
mod letrec;
mod types;

pub use anf::Elaborator;
pub use types::TypeResolver;

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::surface;
use ailang_ir::{
    CoreModule, Decl as CoreDecl, DeclKind, Import, Interner, InstanceDecl, Name, SourceSpan,
};

/// Elaborates one parsed source file into a Core module.
///
/// Scripts (no `module` header) are given the synthetic path `main` and a
/// single exported declaration named `main` wrapping the script expression,
/// so the loader and CLI entry point can treat scripts and modules
/// uniformly (§6 "Source file format").
pub fn elaborate_module(
    parsed: &surface::Module,
    interner: &Interner,
    file: &str,
) -> (CoreModule, Vec<Diagnostic>) {
    let mut elab = Elaborator::new(interner, file);
    let mut decls = Vec::new();
    let mut diagnostics = Vec::new();

    for decl in &parsed.decls {
        match decl {
            surface::Decl::Func(f) => {
                check_underscore_export(f.name, f.exported, f.span, interner, file, &mut diagnostics);
                let (params, param_types, body) = elab.lower_func(&f.params, &f.body);
                let lambda = elab.arena.alloc(
                    f.span,
                    ailang_ir::CoreExprKind::Lambda {
                        params,
                        param_types,
                        body,
                    },
                );
                decls.push(CoreDecl {
                    name: f.name,
                    exported: f.exported,
                    kind: DeclKind::Value {
                        body: lambda,
                        scheme: None,
                    },
                    span: f.span,
                });
            }
            surface::Decl::Let(l) => {
                check_underscore_export(l.name, l.exported, l.span, interner, file, &mut diagnostics);
                let body = elab.lower_expr(&l.value);
                decls.push(CoreDecl {
                    name: l.name,
                    exported: l.exported,
                    kind: DeclKind::Value { body, scheme: None },
                    span: l.span,
                });
            }
            surface::Decl::Type(t) => {
                let constructors = t
                    .constructors
                    .iter()
                    .map(|(ctor_name, field_types)| {
                        let tys = field_types
                            .iter()
                            .map(|pt| elab.resolve_type(pt))
                            .collect();
                        (*ctor_name, tys)
                    })
                    .collect();
                decls.push(CoreDecl {
                    name: t.name,
                    exported: true,
                    kind: DeclKind::TypeDef { constructors },
                    span: t.span,
                });
            }
            surface::Decl::Instance(inst) => {
                let head_type = elab.resolve_type(&inst.head);
                let methods = inst
                    .methods
                    .iter()
                    .map(|m| {
                        let (params, param_types, body) = elab.lower_func(&m.params, &m.body);
                        let lambda = elab.arena.alloc(
                            m.span,
                            ailang_ir::CoreExprKind::Lambda {
                                params,
                                param_types,
                                body,
                            },
                        );
                        (m.name, lambda)
                    })
                    .collect();
                decls.push(CoreDecl {
                    name: inst.class,
                    exported: false,
                    kind: DeclKind::Instance(InstanceDecl {
                        class: inst.class,
                        head_type,
                        methods,
                        span: inst.span,
                    }),
                    span: inst.span,
                });
            }
        }
    }

    if let Some(script_expr) = &parsed.script_expr {
        let body = elab.lower_expr(script_expr);
        decls.push(CoreDecl {
            name: Name::MAIN,
            exported: true,
            kind: DeclKind::Value { body, scheme: None },
            span: script_expr.span,
        });
    }

    diagnostics.extend(elab.take_diagnostics());

    let imports = parsed
        .imports
        .iter()
        .map(|i| Import {
            module_path: i.module_path,
            names: i.names.clone(),
            span: i.span,
        })
        .collect();

    let path = parsed.path.unwrap_or(Name::MAIN);
    let module = CoreModule {
        path,
        imports,
        decls,
        arena: elab.arena,
        is_script: parsed.is_script(),
    };
    (module, diagnostics)
}

fn check_underscore_export(
    name: Name,
    exported: bool,
    span: ailang_ir::Span,
    interner: &Interner,
    file: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !exported {
        return;
    }
    let text = interner.resolve(name);
    if text.starts_with('_') {
        diagnostics.push(
            Diagnostic::new(
                ErrorCode::ELB003(),
                Phase::Elab,
                format!("`{text}` is underscore-prefixed and cannot be exported"),
            )
            .with_span(SourceSpan::new(file, span)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_parse::parse_source;

    fn elaborate(source: &str) -> (CoreModule, Vec<Diagnostic>, Interner) {
        let interner = Interner::new();
        let (parsed, parse_diags) = parse_source(source, "test.ail", &interner);
        assert!(parse_diags.is_empty(), "unexpected parse errors: {parse_diags:?}");
        let (module, diags) = elaborate_module(&parsed, &interner, "test.ail");
        (module, diags, interner)
    }

    #[test]
    fn elaborates_a_script_into_a_main_declaration() {
        let (module, diags, _interner) = elaborate("1 + 2");
        assert!(diags.is_empty());
        assert!(module.is_script);
        assert_eq!(module.decls.len(), 1);
        assert_eq!(module.decls[0].name, Name::MAIN);
        assert!(module.decls[0].exported);
    }

    #[test]
    fn elaborates_an_exported_func_declaration() {
        let (module, diags, interner) = elaborate(
            "module Demo\n\nexport func add(x: Int, y: Int) -> Int { x + y }\n",
        );
        assert!(diags.is_empty());
        assert_eq!(module.decls.len(), 1);
        let decl = &module.decls[0];
        assert_eq!(interner.resolve(decl.name), "add");
        assert!(decl.exported);
        match &decl.kind {
            DeclKind::Value { body, .. } => {
                assert!(matches!(
                    module.arena.get(*body).kind,
                    ailang_ir::CoreExprKind::Lambda { .. }
                ));
            }
            other => panic!("expected Value decl, got {other:?}"),
        }
    }

    #[test]
    fn rejects_exporting_an_underscore_prefixed_name() {
        let (_module, diags, _interner) = elaborate(
            "module Demo\n\nexport let _secret = 1\n",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::ELB003());
    }

    #[test]
    fn flags_duplicate_letrec_bindings() {
        let (_module, diags, _interner) = elaborate(
            "letrec f = func() -> Int { 1 }; f = func() -> Int { 2 } in f()",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::ELB002());
    }

    #[test]
    fn warns_on_non_exhaustive_match() {
        let (_module, diags, _interner) = elaborate(
            "match 1 { 1 => true, 2 => false }",
        );
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::ELB004());
        assert_eq!(diags[0].severity, ailang_diagnostic::Severity::Warning);
    }
}
