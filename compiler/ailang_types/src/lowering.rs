//! Operator lowering (§4.C): rewrites pre-lowering `Intrinsic(op, args)`
//! nodes into `DictApp(DictRef(class, type), method, args)` calls.
//!
//! The dictionary and method are read straight off the type checker's
//! [`ResolvedConstraints`] table, keyed by the intrinsic node's own
//! `NodeId` — never re-derived from the shape of `args`. A literal-shape
//! heuristic (picking `add_Int` because an operand happens to be an int
//! literal) would silently diverge from the type checker on expressions
//! that mix literals and variables.

use ailang_ir::{CoreExprKind, CoreModule, Interner, IntrinsicOp, Name, NodeId, ResolvedConstraints};

/// Rewrites every lowerable `Intrinsic` node in `module` in place. `Concat`
/// is never lowered — it's built-in string/list append (§4.C table) with no
/// backing class.
///
/// Each rewrite keeps the intrinsic's own `NodeId` for the resulting
/// `DictApp`, so every other node's references into the arena stay valid;
/// only the freshly allocated `DictRef` gets a new id.
pub fn lower_module(module: &mut CoreModule, resolved: &ResolvedConstraints, interner: &Interner) {
    let ids: Vec<NodeId> = module.arena.iter().map(|node| node.id).collect();
    for id in ids {
        let (op, args, span) = match &module.arena.get(id).kind {
            CoreExprKind::Intrinsic { op, args } => (op.clone(), args.clone(), module.arena.get(id).span),
            _ => continue,
        };
        if matches!(op, IntrinsicOp::Concat) {
            continue;
        }
        let Some(constraint) = resolved.get(&id) else {
            // No resolved constraint means the type checker never reached
            // this node (e.g. it's inside a branch that failed to type
            // check) — leave it as an intrinsic; the diagnostics already
            // cover the failure.
            continue;
        };
        let method = interner.intern(method_name(&op));
        let dict_ref = module.arena.alloc(
            span,
            CoreExprKind::DictRef {
                class: constraint.class,
                ty: constraint.ty.clone(),
            },
        );
        module.arena.get_mut(id).kind = CoreExprKind::DictApp {
            dict: dict_ref,
            method,
            args,
        };
    }
}

fn method_name(op: &IntrinsicOp) -> &'static str {
    match op {
        IntrinsicOp::Add => "add",
        IntrinsicOp::Sub => "sub",
        IntrinsicOp::Mul => "mul",
        IntrinsicOp::Div => "div",
        IntrinsicOp::Neg => "neg",
        IntrinsicOp::Mod => "mod",
        IntrinsicOp::Eq => "eq",
        IntrinsicOp::Neq => "neq",
        IntrinsicOp::Lt => "lt",
        IntrinsicOp::Le => "le",
        IntrinsicOp::Gt => "gt",
        IntrinsicOp::Ge => "ge",
        IntrinsicOp::Show => "show",
        IntrinsicOp::Concat => unreachable!("Concat is never lowered"),
    }
}

/// Exposed so the linker (§4.D) and evaluator agree with lowering on what a
/// resolved dictionary's method name means, without re-deriving it from
/// `IntrinsicOp` themselves.
#[must_use]
pub fn method_name_for(op: &IntrinsicOp) -> Option<&'static str> {
    if matches!(op, IntrinsicOp::Concat) {
        None
    } else {
        Some(method_name(op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_elab::elaborate_module;
    use ailang_parse::parse_source;

    fn lower(source: &str) -> (CoreModule, Interner) {
        let interner = Interner::new();
        let (parsed, parse_diags) = parse_source(source, "test.ail", &interner);
        assert!(parse_diags.is_empty(), "{parse_diags:?}");
        let (mut module, elab_diags) = elaborate_module(&parsed, &interner, "test.ail");
        assert!(elab_diags.is_empty(), "{elab_diags:?}");
        let result = crate::check_module(&mut module, &interner, "test.ail");
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        lower_module(&mut module, &result.resolved_constraints, &interner);
        (module, interner)
    }

    #[test]
    fn addition_lowers_to_a_num_dict_app() {
        let (module, interner) = lower("1 + 2");
        let main = module.find_decl(Name::MAIN).unwrap();
        let body = match &main.kind {
            ailang_ir::DeclKind::Value { body, .. } => *body,
            other => panic!("expected Value, got {other:?}"),
        };
        match &module.arena.get(body).kind {
            CoreExprKind::DictApp { method, dict, .. } => {
                assert_eq!(interner.resolve(*method), "add");
                match &module.arena.get(*dict).kind {
                    CoreExprKind::DictRef { class, .. } => assert_eq!(*class, Name::NUM),
                    other => panic!("expected DictRef, got {other:?}"),
                }
            }
            other => panic!("expected DictApp, got {other:?}"),
        }
    }

    #[test]
    fn concat_is_never_lowered() {
        let (module, _interner) = lower("\"a\" ++ \"b\"");
        let main = module.find_decl(Name::MAIN).unwrap();
        let body = match &main.kind {
            ailang_ir::DeclKind::Value { body, .. } => *body,
            other => panic!("expected Value, got {other:?}"),
        };
        assert!(matches!(
            module.arena.get(body).kind,
            CoreExprKind::Intrinsic {
                op: IntrinsicOp::Concat,
                ..
            }
        ));
    }

    #[test]
    fn method_name_for_show_is_show_and_concat_is_none() {
        assert_eq!(method_name_for(&IntrinsicOp::Show), Some("show"));
        assert_eq!(method_name_for(&IntrinsicOp::Concat), None);
    }
}
