//! Principled defaulting for class constraints whose type variable never
//! got unified with a concrete type.
//!
//! `Fractional` defaults to `Float`, `Integral` to `Int`, and the general
//! `Num` to `Int` — the order matters, since a variable constrained by both
//! `Num` and `Fractional` (e.g. `1.0 + x`) must default to `Float`, not
//! `Int`. `Eq`/`Ord`/`Show` are neutral: they piggyback on whichever numeric
//! default already applies to the variable, and on their own (no numeric
//! class in sight) they cannot resolve an ambiguity, since nothing picks
//! `Int` over `String` for "some comparable type".

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{Name, NodeId, Type, TypeVar};
use rustc_hash::FxHashMap;

use crate::subst::Subst;

#[derive(Clone, Debug)]
pub struct DefaultingTrace {
    pub var: TypeVar,
    /// The class whose defaulting rule fired.
    pub driving_class: Name,
    pub default_ty: Type,
}

/// Resolves every class constraint whose type is still a bare, unbound type
/// variable after solving, by binding that variable in `subst`. Returns the
/// trace (surfaced by `ailang check --json`'s `data.defaulting`) and any
/// `TC_AMB_001` diagnostics for variables no rule could resolve.
pub fn apply_defaulting(
    subst: &mut Subst,
    class_constraints: &[(NodeId, Name, Type)],
    file: &str,
) -> (Vec<DefaultingTrace>, Vec<Diagnostic>) {
    let mut by_var: FxHashMap<TypeVar, Vec<(Name, NodeId)>> = FxHashMap::default();
    for (node, class, ty) in class_constraints {
        if let Type::Var(v) = subst.apply_type(ty) {
            by_var.entry(v).or_default().push((*class, *node));
        }
    }

    let mut trace = Vec::new();
    let mut diagnostics = Vec::new();
    let mut vars: Vec<_> = by_var.into_iter().collect();
    vars.sort_by_key(|(v, _)| v.0);

    for (var, classes) in vars {
        let class_names: Vec<Name> = classes.iter().map(|(c, _)| *c).collect();
        match pick_default(&class_names) {
            Some((driving_class, default_ty)) => {
                subst.bind_type(var, default_ty.clone());
                trace.push(DefaultingTrace {
                    var,
                    driving_class,
                    default_ty,
                });
            }
            None => {
                let first_node = classes.first().map(|(_, n)| *n);
                let mut diag = Diagnostic::new(
                    ErrorCode::TC_AMB_001(),
                    Phase::Typecheck,
                    format!(
                        "type variable #{} is constrained by a class with no defaulting rule \
                         and was never unified with a concrete type",
                        var.0
                    ),
                )
                .with_data("file", file);
                if let Some(node) = first_node {
                    diag = diag.with_node(node);
                }
                diagnostics.push(diag);
            }
        }
    }

    (trace, diagnostics)
}

fn pick_default(classes: &[Name]) -> Option<(Name, Type)> {
    if classes.contains(&Name::FRACTIONAL) {
        return Some((Name::FRACTIONAL, Type::float()));
    }
    if classes.contains(&Name::INTEGRAL) {
        return Some((Name::INTEGRAL, Type::int()));
    }
    if classes.contains(&Name::NUM) {
        return Some((Name::NUM, Type::int()));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(n: u32) -> NodeId {
        NodeId::from_raw(n)
    }

    #[test]
    fn num_alone_defaults_to_int() {
        let mut subst = Subst::new();
        let v = TypeVar(0);
        let constraints = vec![(node(0), Name::NUM, Type::Var(v))];
        let (trace, diags) = apply_defaulting(&mut subst, &constraints, "t.ail");
        assert!(diags.is_empty());
        assert_eq!(trace.len(), 1);
        assert_eq!(subst.apply_type(&Type::Var(v)), Type::int());
    }

    #[test]
    fn num_and_fractional_together_default_to_float() {
        let mut subst = Subst::new();
        let v = TypeVar(0);
        let constraints = vec![
            (node(0), Name::NUM, Type::Var(v)),
            (node(1), Name::FRACTIONAL, Type::Var(v)),
        ];
        let (_trace, diags) = apply_defaulting(&mut subst, &constraints, "t.ail");
        assert!(diags.is_empty());
        assert_eq!(subst.apply_type(&Type::Var(v)), Type::float());
    }

    #[test]
    fn integral_alone_defaults_to_int() {
        let mut subst = Subst::new();
        let v = TypeVar(0);
        let constraints = vec![(node(0), Name::INTEGRAL, Type::Var(v))];
        let (trace, _diags) = apply_defaulting(&mut subst, &constraints, "t.ail");
        assert_eq!(trace[0].default_ty, Type::int());
    }

    #[test]
    fn eq_alone_is_ambiguous() {
        let mut subst = Subst::new();
        let v = TypeVar(0);
        let constraints = vec![(node(0), Name::EQ, Type::Var(v))];
        let (trace, diags) = apply_defaulting(&mut subst, &constraints, "t.ail");
        assert!(trace.is_empty());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::TC_AMB_001());
    }

    #[test]
    fn a_variable_already_bound_to_a_concrete_type_is_left_alone() {
        let mut subst = Subst::new();
        let v = TypeVar(0);
        subst.bind_type(v, Type::string());
        let constraints = vec![(node(0), Name::EQ, Type::Var(v))];
        let (trace, diags) = apply_defaulting(&mut subst, &constraints, "t.ail");
        assert!(trace.is_empty());
        assert!(diags.is_empty());
    }
}
