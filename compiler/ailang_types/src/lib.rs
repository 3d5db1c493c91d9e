//! Constraint-based type checker: Hindley-Milner inference extended with
//! type classes (dictionary passing) and row polymorphism, per §4.B of the
//! spec.
//!
//! [`check_module`] is the single entry point: it seeds a type environment
//! from the module's own declarations (constructors from `type` decls,
//! placeholder variables for every top-level value so mutually-recursive
//! functions can reference each other), walks every declaration with
//! [`infer::InferCtx`], runs [`defaulting::apply_defaulting`] over whatever
//! class constraints never resolved to a concrete type, and finally
//! generalises each declaration's scheme and fills it into the module.

mod classenv;
mod defaulting;
mod generalize;
mod infer;
mod lowering;
mod subst;
mod unify;

pub use classenv::{instance_key, ClassEnv};
pub use defaulting::DefaultingTrace;
pub use infer::{Env, InferCtx};
pub use lowering::{lower_module, method_name_for};
pub use subst::Subst;
pub use unify::UnifyError;

use std::collections::HashSet;

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{
    CoreModule, DeclKind, Interner, Name, ResolvedConstraint, ResolvedConstraints, Scheme, Type,
    TypeVar,
};
use rustc_hash::FxHashMap;

pub struct CheckResult {
    pub resolved_constraints: ResolvedConstraints,
    pub defaulting_trace: Vec<DefaultingTrace>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Type-checks every declaration in `module`, filling in each `Value`
/// declaration's `scheme` field and returning the class-constraint
/// resolution the lowering pass (§4.C) consumes.
pub fn check_module(module: &mut CoreModule, interner: &Interner, file: &str) -> CheckResult {
    check_module_with_imports(module, interner, file, &Env::default())
}

/// Same as [`check_module`], but seeds the environment with schemes for
/// names brought in by `import` declarations before checking this module's
/// own declarations, so a module can reference what it imports. The loader
/// (`ailang_link`) resolves imports to the already-generalised `Scheme`s of
/// the modules loaded before this one and passes them in here.
#[tracing::instrument(skip_all, fields(file, decls = module.decls.len()))]
pub fn check_module_with_imports(
    module: &mut CoreModule,
    interner: &Interner,
    file: &str,
    imported: &Env,
) -> CheckResult {
    tracing::debug!("type-checking module");
    let mut classenv = ClassEnv::new();
    classenv.register_module_instances(module.instances());

    let mut env: Env = imported.clone();
    for decl in &module.decls {
        if let DeclKind::TypeDef { constructors } = &decl.kind {
            for (ctor_name, field_tys) in constructors {
                let ty = if field_tys.is_empty() {
                    Type::Con(decl.name)
                } else {
                    Type::pure_fun(field_tys.clone(), Type::Con(decl.name))
                };
                env.insert(*ctor_name, Scheme::monomorphic(ty));
            }
        }
    }

    let arena = &module.arena;
    let mut ctx = InferCtx::new(arena, interner, file);

    // Every top-level value gets a placeholder type variable up front, so a
    // mutually-recursive pair of functions can reference each other before
    // either has a generalised scheme — the whole set of top-level `Value`
    // decls is treated as one big `letrec` group.
    let mut placeholders: FxHashMap<Name, TypeVar> = FxHashMap::default();
    for decl in &module.decls {
        if matches!(decl.kind, DeclKind::Value { .. }) {
            let v = ctx.fresh_type_var();
            placeholders.insert(decl.name, v);
            env.insert(decl.name, Scheme::monomorphic(Type::Var(v)));
        }
    }

    for decl in &module.decls {
        if let DeclKind::Value { body, .. } = &decl.kind {
            let placeholder = placeholders[&decl.name];
            let (body_ty, _effect) = ctx.infer(&mut env, *body);
            let span = arena.get(*body).span;
            ctx.unify(&Type::Var(placeholder), &body_ty, span);
        }
    }

    let mut diagnostics = std::mem::take(&mut ctx.diagnostics);

    let (defaulting_trace, defaulting_diags) =
        defaulting::apply_defaulting(&mut ctx.subst, &ctx.class_constraints, file);
    diagnostics.extend(defaulting_diags);

    // Top-level declarations have no enclosing scope to protect, so every
    // variable still free after solving is fair game to quantify over.
    let env_free: HashSet<TypeVar> = HashSet::new();
    for decl in module.decls.iter_mut() {
        if let DeclKind::Value { body, scheme } = &mut decl.kind {
            let placeholder = placeholders[&decl.name];
            let is_value = generalize::is_syntactic_value(&arena.get(*body).kind);
            *scheme = Some(generalize::generalize(
                &Type::Var(placeholder),
                is_value,
                &ctx.subst,
                &env_free,
            ));
        }
    }

    let mut resolved_constraints = ResolvedConstraints::default();
    for (node, class, ty) in &ctx.class_constraints {
        let resolved_ty = ctx.subst.apply_type(ty);
        if !classenv.has_instance(*class, &resolved_ty) {
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::TC_CLASS_001(),
                    Phase::Typecheck,
                    format!(
                        "no instance of `{}` exists for this type",
                        interner.resolve(*class)
                    ),
                )
                .with_node(*node)
                .with_data("class", interner.resolve(*class)),
            );
            continue;
        }
        resolved_constraints.insert(
            *node,
            ResolvedConstraint {
                class: *class,
                instance_key: classenv::instance_key(*class, &resolved_ty),
                ty: resolved_ty,
                method: None,
            },
        );
    }

    CheckResult {
        resolved_constraints,
        defaulting_trace,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_elab::elaborate_module;
    use ailang_parse::parse_source;

    fn check(source: &str) -> (CoreModule, CheckResult, Interner) {
        let interner = Interner::new();
        let (parsed, parse_diags) = parse_source(source, "test.ail", &interner);
        assert!(parse_diags.is_empty(), "unexpected parse errors: {parse_diags:?}");
        let (mut module, elab_diags) = elaborate_module(&parsed, &interner, "test.ail");
        assert!(elab_diags.is_empty(), "unexpected elaboration errors: {elab_diags:?}");
        let result = check_module(&mut module, &interner, "test.ail");
        (module, result, interner)
    }

    #[test]
    fn infers_int_arithmetic_script() {
        let (module, result, _interner) = check("1 + 2 * 3");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let main = module.find_decl(Name::MAIN).unwrap();
        match &main.kind {
            DeclKind::Value { scheme, .. } => {
                assert_eq!(scheme.as_ref().unwrap().body, Type::int());
            }
            other => panic!("expected Value, got {other:?}"),
        }
    }

    #[test]
    fn division_defaults_to_float_when_unconstrained() {
        let (module, result, _interner) = check("func halve(x) -> Float { x / 2.0 }\nhalve(4.0)");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        let _ = module;
    }

    #[test]
    fn mismatched_if_branches_report_tc001() {
        let (_module, result, _interner) = check("if true { 1 } else { \"x\" }");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::TC001()));
    }

    #[test]
    fn identity_function_is_generalized_across_two_call_sites() {
        let (_module, result, _interner) = check(
            "func identity(x) { x }\nlet a = identity(1) in let b = identity(\"s\") in a",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn unknown_field_access_reports_tc_rec_001() {
        let (_module, result, _interner) =
            check("let p = { x: 1, y: 2 } in p.z");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::TC_REC_001()));
    }

    #[test]
    fn ambiguous_show_with_nothing_to_default_reports_tc_amb_001() {
        let (_module, result, _interner) = check("func describe(x) -> String { show(x) }");
        assert!(result
            .diagnostics
            .iter()
            .any(|d| d.code == ErrorCode::TC_AMB_001()));
    }
}
