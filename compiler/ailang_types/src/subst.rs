//! The mutable substitution a checker instance builds up while solving one
//! compilation unit (§3 "Relationships and ownership" — discarded once a
//! declaration's scheme is generalised).

use ailang_ir::{Row, RowKind, RowTail, RowVar, Type, TypeVar};
use rustc_hash::FxHashMap;

#[derive(Default)]
pub struct Subst {
    types: FxHashMap<TypeVar, Type>,
    rows: FxHashMap<RowVar, Row>,
}

impl Subst {
    #[must_use]
    pub fn new() -> Self {
        Subst::default()
    }

    pub fn bind_type(&mut self, v: TypeVar, ty: Type) {
        self.types.insert(v, ty);
    }

    pub fn bind_row(&mut self, v: RowVar, row: Row) {
        self.rows.insert(v, row);
    }

    /// Walks `ty` through the substitution, resolving every bound variable
    /// to its (recursively resolved) binding.
    #[must_use]
    pub fn apply_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Var(v) => match self.types.get(v) {
                Some(bound) => self.apply_type(bound),
                None => ty.clone(),
            },
            Type::Con(_) => ty.clone(),
            Type::App(ctor, args) => Type::App(
                Box::new(self.apply_type(ctor)),
                args.iter().map(|a| self.apply_type(a)).collect(),
            ),
            Type::Fun {
                params,
                ret,
                effect,
            } => Type::Fun {
                params: params.iter().map(|p| self.apply_type(p)).collect(),
                ret: Box::new(self.apply_type(ret)),
                effect: self.apply_row(effect),
            },
            Type::Record(row) => Type::Record(self.apply_row(row)),
            Type::Tuple(elems) => Type::Tuple(elems.iter().map(|e| self.apply_type(e)).collect()),
        }
    }

    /// Resolves a row's tail through the substitution, merging in whatever
    /// labels that binding itself carries.
    #[must_use]
    pub fn apply_row(&self, row: &Row) -> Row {
        let labels: Vec<(ailang_ir::Name, Type)> = row
            .labels
            .iter()
            .map(|(l, t)| (*l, self.apply_type(t)))
            .collect();
        match &row.tail {
            RowTail::Closed => Row {
                kind: row.kind,
                labels,
                tail: RowTail::Closed,
            },
            RowTail::Open(v) => match self.rows.get(v) {
                Some(bound) => {
                    let resolved = self.apply_row(bound);
                    let mut merged = labels;
                    merged.extend(resolved.labels);
                    merged.sort_by_key(|(n, _)| n.raw());
                    Row {
                        kind: row.kind,
                        labels: merged,
                        tail: resolved.tail,
                    }
                }
                None => Row {
                    kind: row.kind,
                    labels,
                    tail: RowTail::Open(*v),
                },
            },
        }
    }

    /// Free type variables in `ty` after substitution, in first-occurrence
    /// order — used by the occurs check and by generalisation.
    pub fn free_type_vars(&self, ty: &Type, out: &mut Vec<TypeVar>) {
        self.apply_type(ty).free_vars(out);
    }

    /// Free row variables reachable from `ty` after substitution: the row's
    /// own open tail, plus any row variable nested inside a function's
    /// effect row or a record's field types.
    pub fn free_row_vars(&self, ty: &Type, out: &mut Vec<RowVar>) {
        match self.apply_type(ty) {
            Type::Var(_) | Type::Con(_) => {}
            Type::App(ctor, args) => {
                self.free_row_vars(&ctor, out);
                for a in &args {
                    self.free_row_vars(a, out);
                }
            }
            Type::Fun {
                params,
                ret,
                effect,
            } => {
                for p in &params {
                    self.free_row_vars(p, out);
                }
                self.free_row_vars(&ret, out);
                row_free_row_vars(&effect, out);
            }
            Type::Record(row) => row_free_row_vars(&row, out),
            Type::Tuple(elems) => {
                for e in &elems {
                    self.free_row_vars(e, out);
                }
            }
        }
    }

}

fn row_free_row_vars(row: &Row, out: &mut Vec<RowVar>) {
    if let RowTail::Open(v) = row.tail {
        if !out.contains(&v) {
            out.push(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::Name;

    #[test]
    fn resolves_a_chain_of_bound_type_variables() {
        let mut subst = Subst::new();
        subst.bind_type(TypeVar(0), Type::Var(TypeVar(1)));
        subst.bind_type(TypeVar(1), Type::int());
        assert_eq!(subst.apply_type(&Type::Var(TypeVar(0))), Type::int());
    }

    #[test]
    fn merges_row_tail_bindings() {
        let mut subst = Subst::new();
        let label = Name::from_raw(200);
        subst.bind_row(
            RowVar(0),
            Row::closed(RowKind::Record, vec![(label, Type::int())]),
        );
        let open = Row::open(RowKind::Record, Vec::new(), RowVar(0));
        let resolved = subst.apply_row(&open);
        assert!(resolved.is_closed());
        assert_eq!(resolved.field(label), Some(&Type::int()));
    }
}
