//! Unification: `Eq` constraints over `Type`, and the row-unification
//! algorithm from the row-unification section (the kind-tagged,
//! four-tails-case algorithm; case 3 mirrors case 2 or effect labels
//! silently vanish).

use ailang_ir::{Row, RowKind, RowTail, RowVar, Type, TypeVar};

use crate::subst::Subst;

#[derive(Clone, Debug)]
pub enum UnifyError {
    Mismatch { expected: Type, actual: Type },
    Occurs { var: TypeVar, ty: Type },
    RowOccurs { var: RowVar },
    RowMissingLabels { kind: RowKind, missing: Vec<ailang_ir::Name> },
    KindMismatch { expected: RowKind, actual: RowKind },
    Arity { expected: usize, actual: usize },
}

/// Allocates fresh type/row variables during unification (only the
/// open/open row case needs one, for the shared fresh tail).
pub struct VarGen<'a> {
    next: &'a mut u32,
}

impl<'a> VarGen<'a> {
    #[must_use]
    pub fn new(next: &'a mut u32) -> Self {
        VarGen { next }
    }

    pub fn fresh_row_var(&mut self) -> RowVar {
        let v = RowVar(*self.next);
        *self.next += 1;
        v
    }
}

pub fn unify_types(
    subst: &mut Subst,
    vars: &mut VarGen<'_>,
    a: &Type,
    b: &Type,
) -> Result<(), UnifyError> {
    let a = subst.apply_type(a);
    let b = subst.apply_type(b);
    match (&a, &b) {
        (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(()),
        (Type::Var(v), _) => bind_type_var(subst, *v, &b),
        (_, Type::Var(v)) => bind_type_var(subst, *v, &a),
        (Type::Con(n1), Type::Con(n2)) => {
            if n1 == n2 {
                Ok(())
            } else {
                Err(UnifyError::Mismatch {
                    expected: a.clone(),
                    actual: b.clone(),
                })
            }
        }
        (Type::App(c1, args1), Type::App(c2, args2)) => {
            unify_types(subst, vars, c1, c2)?;
            if args1.len() != args2.len() {
                return Err(UnifyError::Arity {
                    expected: args1.len(),
                    actual: args2.len(),
                });
            }
            for (x, y) in args1.iter().zip(args2.iter()) {
                unify_types(subst, vars, x, y)?;
            }
            Ok(())
        }
        (
            Type::Fun {
                params: p1,
                ret: r1,
                effect: e1,
            },
            Type::Fun {
                params: p2,
                ret: r2,
                effect: e2,
            },
        ) => {
            if p1.len() != p2.len() {
                return Err(UnifyError::Arity {
                    expected: p1.len(),
                    actual: p2.len(),
                });
            }
            for (x, y) in p1.iter().zip(p2.iter()) {
                unify_types(subst, vars, x, y)?;
            }
            unify_types(subst, vars, r1, r2)?;
            unify_rows(subst, vars, e1, e2)
        }
        (Type::Record(r1), Type::Record(r2)) => unify_rows(subst, vars, r1, r2),
        (Type::Tuple(e1), Type::Tuple(e2)) => {
            if e1.len() != e2.len() {
                return Err(UnifyError::Arity {
                    expected: e1.len(),
                    actual: e2.len(),
                });
            }
            for (x, y) in e1.iter().zip(e2.iter()) {
                unify_types(subst, vars, x, y)?;
            }
            Ok(())
        }
        _ => Err(UnifyError::Mismatch {
            expected: a.clone(),
            actual: b.clone(),
        }),
    }
}

fn bind_type_var(subst: &mut Subst, v: TypeVar, ty: &Type) -> Result<(), UnifyError> {
    let mut free = Vec::new();
    subst.free_type_vars(ty, &mut free);
    if free.contains(&v) {
        return Err(UnifyError::Occurs { var: v, ty: ty.clone() });
    }
    subst.bind_type(v, ty.clone());
    Ok(())
}

pub fn unify_rows(
    subst: &mut Subst,
    vars: &mut VarGen<'_>,
    a: &Row,
    b: &Row,
) -> Result<(), UnifyError> {
    let a = subst.apply_row(a);
    let b = subst.apply_row(b);
    if a.kind != b.kind {
        return Err(UnifyError::KindMismatch {
            expected: a.kind,
            actual: b.kind,
        });
    }
    let kind = a.kind;

    let only1: Vec<_> = a
        .labels
        .iter()
        .filter(|(l, _)| b.field(*l).is_none())
        .cloned()
        .collect();
    let only2: Vec<_> = b
        .labels
        .iter()
        .filter(|(l, _)| a.field(*l).is_none())
        .cloned()
        .collect();

    for (label, ty1) in &a.labels {
        if let Some(ty2) = b.field(*label) {
            unify_types(subst, vars, ty1, ty2)?;
        }
    }

    match (&a.tail, &b.tail) {
        (RowTail::Closed, RowTail::Closed) => {
            if only1.is_empty() && only2.is_empty() {
                Ok(())
            } else {
                let mut missing: Vec<_> = only1
                    .into_iter()
                    .chain(only2)
                    .map(|(n, _)| n)
                    .collect();
                missing.sort_by_key(ailang_ir::Name::raw);
                Err(UnifyError::RowMissingLabels { kind, missing })
            }
        }
        (RowTail::Open(t1), RowTail::Closed) => {
            if !only1.is_empty() {
                let missing = only1.into_iter().map(|(n, _)| n).collect();
                return Err(UnifyError::RowMissingLabels { kind, missing });
            }
            bind_row_var(subst, *t1, Row::closed(kind, only2))
        }
        (RowTail::Closed, RowTail::Open(t2)) => {
            if !only2.is_empty() {
                let missing = only2.into_iter().map(|(n, _)| n).collect();
                return Err(UnifyError::RowMissingLabels { kind, missing });
            }
            bind_row_var(subst, *t2, Row::closed(kind, only1))
        }
        (RowTail::Open(t1), RowTail::Open(t2)) => {
            let fresh = vars.fresh_row_var();
            bind_row_var(subst, *t1, Row::open(kind, only2, fresh))?;
            bind_row_var(subst, *t2, Row::open(kind, only1, fresh))
        }
    }
}

fn bind_row_var(subst: &mut Subst, v: RowVar, row: Row) -> Result<(), UnifyError> {
    let resolved = subst.apply_row(&row);
    if row_mentions(&resolved, v) {
        return Err(UnifyError::RowOccurs { var: v });
    }
    subst.bind_row(v, resolved);
    Ok(())
}

fn row_mentions(row: &Row, v: RowVar) -> bool {
    matches!(row.tail, RowTail::Open(t) if t == v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::Name;

    #[test]
    fn unifies_equal_constructors() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        assert!(unify_types(&mut subst, &mut vars, &Type::int(), &Type::int()).is_ok());
    }

    #[test]
    fn rejects_mismatched_constructors() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let err = unify_types(&mut subst, &mut vars, &Type::int(), &Type::bool()).unwrap_err();
        assert!(matches!(err, UnifyError::Mismatch { .. }));
    }

    #[test]
    fn binds_a_variable_to_a_concrete_type() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let v = TypeVar(0);
        unify_types(&mut subst, &mut vars, &Type::Var(v), &Type::int()).unwrap();
        assert_eq!(subst.apply_type(&Type::Var(v)), Type::int());
    }

    #[test]
    fn occurs_check_rejects_infinite_types() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let v = TypeVar(0);
        let recursive = Type::list(Type::Var(v));
        let err = unify_types(&mut subst, &mut vars, &Type::Var(v), &recursive).unwrap_err();
        assert!(matches!(err, UnifyError::Occurs { .. }));
    }

    #[test]
    fn closed_rows_unify_when_labels_match() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let x = Name::from_raw(200);
        let r1 = Row::closed(RowKind::Record, vec![(x, Type::int())]);
        let r2 = Row::closed(RowKind::Record, vec![(x, Type::int())]);
        assert!(unify_rows(&mut subst, &mut vars, &r1, &r2).is_ok());
    }

    #[test]
    fn closed_rows_with_different_labels_fail() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let x = Name::from_raw(200);
        let y = Name::from_raw(201);
        let r1 = Row::closed(RowKind::Record, vec![(x, Type::int())]);
        let r2 = Row::closed(RowKind::Record, vec![(y, Type::int())]);
        let err = unify_rows(&mut subst, &mut vars, &r1, &r2).unwrap_err();
        assert!(matches!(err, UnifyError::RowMissingLabels { .. }));
    }

    #[test]
    fn open_row_unifies_against_closed_by_picking_up_missing_labels() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let x = Name::from_raw(200);
        let y = Name::from_raw(201);
        let rho = RowVar(0);
        let open = Row::open(RowKind::Record, vec![(x, Type::int())], rho);
        let closed = Row::closed(RowKind::Record, vec![(x, Type::int()), (y, Type::bool())]);
        unify_rows(&mut subst, &mut vars, &open, &closed).unwrap();
        let resolved = subst.apply_row(&Row::open(RowKind::Record, Vec::new(), rho));
        assert_eq!(resolved.field(y), Some(&Type::bool()));
    }

    #[test]
    fn open_open_rows_share_a_fresh_tail() {
        let mut subst = Subst::new();
        let mut next = 100u32;
        let mut vars = VarGen::new(&mut next);
        let x = Name::from_raw(200);
        let y = Name::from_raw(201);
        let rho1 = RowVar(0);
        let rho2 = RowVar(1);
        let r1 = Row::open(RowKind::Effect, vec![(x, Type::unit())], rho1);
        let r2 = Row::open(RowKind::Effect, vec![(y, Type::unit())], rho2);
        unify_rows(&mut subst, &mut vars, &r1, &r2).unwrap();
        let resolved1 = subst.apply_row(&Row::open(RowKind::Effect, Vec::new(), rho1));
        let resolved2 = subst.apply_row(&Row::open(RowKind::Effect, Vec::new(), rho2));
        assert_eq!(resolved1.field(y), Some(&Type::unit()));
        assert_eq!(resolved2.field(x), Some(&Type::unit()));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let mut subst = Subst::new();
        let mut next = 0u32;
        let mut vars = VarGen::new(&mut next);
        let r1 = Row::empty_effect();
        let r2 = Row::closed(RowKind::Record, Vec::new());
        let err = unify_rows(&mut subst, &mut vars, &r1, &r2).unwrap_err();
        assert!(matches!(err, UnifyError::KindMismatch { .. }));
    }
}
