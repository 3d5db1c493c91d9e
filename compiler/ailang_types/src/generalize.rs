//! Value-restriction-based let-generalisation.
//!
//! Only syntactic values (literals, lambdas, bare variable references) are
//! given polymorphic schemes; everything else a `let` can bind — a call, an
//! `if`, a match — is kept monomorphic. This is what keeps unification sound
//! in the presence of effects: generalising the type of a function call
//! would let two uses of the same `let` instantiate fresh, unrelated type
//! variables for something that actually ran once.

use std::collections::HashSet;

use ailang_ir::{CoreExprKind, Name, Scheme, Type, TypeVar};
use rustc_hash::FxHashMap;

use crate::subst::Subst;

#[must_use]
pub fn is_syntactic_value(kind: &CoreExprKind) -> bool {
    matches!(
        kind,
        CoreExprKind::Lambda { .. } | CoreExprKind::Lit(_) | CoreExprKind::Var(_)
    )
}

/// Every type variable free in some scheme already bound in `env`. These
/// must not be quantified over: a binding still constrained by an enclosing
/// scope would otherwise be generalised as if it were independent of it.
#[must_use]
pub fn env_free_vars(env: &FxHashMap<Name, Scheme>, subst: &Subst) -> HashSet<TypeVar> {
    let mut out = HashSet::new();
    for scheme in env.values() {
        let mut free = Vec::new();
        subst.apply_type(&scheme.body).free_vars(&mut free);
        for v in free {
            if !scheme.vars.contains(&v) {
                out.insert(v);
            }
        }
    }
    out
}

#[must_use]
pub fn generalize(ty: &Type, is_value: bool, subst: &Subst, env_free: &HashSet<TypeVar>) -> Scheme {
    let resolved = subst.apply_type(ty);
    if !is_value {
        return Scheme::monomorphic(resolved);
    }
    let mut vars = Vec::new();
    resolved.free_vars(&mut vars);
    vars.retain(|v| !env_free.contains(v));
    Scheme {
        vars,
        constraints: Vec::new(),
        body: resolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::{Literal, Name as IrName, NodeId};

    #[test]
    fn lambda_literal_and_var_are_values() {
        assert!(is_syntactic_value(&CoreExprKind::Lit(Literal::Int(1))));
        assert!(is_syntactic_value(&CoreExprKind::Var(IrName::from_raw(0))));
        assert!(is_syntactic_value(&CoreExprKind::Lambda {
            params: Vec::new(),
            param_types: Vec::new(),
            body: NodeId::from_raw(0),
        }));
    }

    #[test]
    fn application_is_not_a_value() {
        assert!(!is_syntactic_value(&CoreExprKind::App {
            func: NodeId::from_raw(0),
            args: Vec::new(),
        }));
    }

    #[test]
    fn generalizing_a_non_value_keeps_it_monomorphic() {
        let subst = Subst::new();
        let env_free = HashSet::new();
        let scheme = generalize(&Type::Var(TypeVar(3)), false, &subst, &env_free);
        assert!(scheme.vars.is_empty());
    }

    #[test]
    fn generalizing_a_value_quantifies_free_vars_not_in_the_environment() {
        let subst = Subst::new();
        let env_free = HashSet::new();
        let scheme = generalize(&Type::Var(TypeVar(3)), true, &subst, &env_free);
        assert_eq!(scheme.vars, vec![TypeVar(3)]);
    }

    #[test]
    fn generalizing_a_value_excludes_vars_still_free_in_the_environment() {
        let subst = Subst::new();
        let mut env_free = HashSet::new();
        env_free.insert(TypeVar(3));
        let scheme = generalize(&Type::Var(TypeVar(3)), true, &subst, &env_free);
        assert!(scheme.vars.is_empty());
    }
}
