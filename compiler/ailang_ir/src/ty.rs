//! Types, rows, and class constraints.
//!
//! A `Type` sum with variables,
//! constructors, application, functions (carrying an effect row), records,
//! and tuples; a kind-tagged `Row` for records/effects/instances; and the
//! `Constraint`/`Scheme` machinery the type checker solves and generalises.

use std::fmt;

use crate::name::Name;

/// A unification variable. Carries a `rank` (the let-nesting depth at which
/// it was allocated) so generalisation can distinguish "this variable
/// escapes to an enclosing scope" from "this variable is local to the
/// binding being generalised" without a separate occurs-based escape
/// analysis — the same technique as Algorithm W with levels.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeVar(pub u32);

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct RowVar(pub u32);

/// Tags which of the three disjoint row kinds a `Row` carries labels for.
/// Unification must never mix kinds (invariant 4).
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum RowKind {
    Record,
    Effect,
    /// Used internally by the type checker to track which class dictionaries
    /// a polymorphic function still needs at a call site; never appears in
    /// a surface or Core type.
    Instance,
}

/// A row: a closed or open set of labelled fields of one `RowKind`.
///
/// For `Effect` rows the field type is always `Type::unit()` — only the
/// label (the effect name) is meaningful.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Row {
    pub kind: RowKind,
    /// Sorted by label so two structurally-equal rows compare equal
    /// regardless of declaration order.
    pub labels: Vec<(Name, Type)>,
    pub tail: RowTail,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum RowTail {
    Closed,
    Open(RowVar),
}

impl Row {
    #[must_use]
    pub fn closed(kind: RowKind, mut labels: Vec<(Name, Type)>) -> Self {
        labels.sort_by_key(|(n, _)| n.raw());
        Row {
            kind,
            labels,
            tail: RowTail::Closed,
        }
    }

    #[must_use]
    pub fn open(kind: RowKind, mut labels: Vec<(Name, Type)>, tail: RowVar) -> Self {
        labels.sort_by_key(|(n, _)| n.raw());
        Row {
            kind,
            labels,
            tail: RowTail::Open(tail),
        }
    }

    #[must_use]
    pub fn empty_effect() -> Self {
        Row::closed(RowKind::Effect, Vec::new())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.tail, RowTail::Closed)
    }

    #[must_use]
    pub fn field(&self, label: Name) -> Option<&Type> {
        self.labels
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, t)| t)
    }

    /// Effect-row union used when propagating effects through application
    /// and sequencing (§4.B "Function application and effect propagation").
    /// Both rows must already be solved to a concrete label set; this is a
    /// set union, not a unification.
    #[must_use]
    pub fn union_effects(a: &Row, b: &Row) -> Row {
        debug_assert_eq!(a.kind, RowKind::Effect);
        debug_assert_eq!(b.kind, RowKind::Effect);
        let mut labels = a.labels.clone();
        for (name, ty) in &b.labels {
            if !labels.iter().any(|(n, _)| n == name) {
                labels.push((*name, ty.clone()));
            }
        }
        let tail = match (&a.tail, &b.tail) {
            (RowTail::Closed, RowTail::Closed) => RowTail::Closed,
            (RowTail::Open(v), RowTail::Closed) | (RowTail::Closed, RowTail::Open(v)) => {
                RowTail::Open(*v)
            }
            (RowTail::Open(v), RowTail::Open(_)) => RowTail::Open(*v),
        };
        Row {
            kind: RowKind::Effect,
            labels,
            tail,
        }
    }
}

/// A type, per §3.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    Var(TypeVar),
    Con(Name),
    App(Box<Type>, Vec<Type>),
    Fun {
        params: Vec<Type>,
        ret: Box<Type>,
        effect: Row,
    },
    Record(Row),
    Tuple(Vec<Type>),
}

impl Type {
    #[must_use]
    pub fn unit() -> Self {
        Type::Con(Name::UNIT)
    }

    #[must_use]
    pub fn int() -> Self {
        Type::Con(Name::INT)
    }

    #[must_use]
    pub fn float() -> Self {
        Type::Con(Name::FLOAT)
    }

    #[must_use]
    pub fn bool() -> Self {
        Type::Con(Name::BOOL)
    }

    #[must_use]
    pub fn string() -> Self {
        Type::Con(Name::STRING)
    }

    #[must_use]
    pub fn list(elem: Type) -> Self {
        Type::App(Box::new(Type::Con(Name::LIST)), vec![elem])
    }

    #[must_use]
    pub fn pure_fun(params: Vec<Type>, ret: Type) -> Self {
        Type::Fun {
            params,
            ret: Box::new(ret),
            effect: Row::empty_effect(),
        }
    }

    /// Every free type variable in `self`, in first-occurrence order.
    pub fn free_vars(&self, out: &mut Vec<TypeVar>) {
        match self {
            Type::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Type::Con(_) => {}
            Type::App(ctor, args) => {
                ctor.free_vars(out);
                for a in args {
                    a.free_vars(out);
                }
            }
            Type::Fun {
                params,
                ret,
                effect,
            } => {
                for p in params {
                    p.free_vars(out);
                }
                ret.free_vars(out);
                for (_, t) in &effect.labels {
                    t.free_vars(out);
                }
            }
            Type::Record(row) => {
                for (_, t) in &row.labels {
                    t.free_vars(out);
                }
            }
            Type::Tuple(elems) => {
                for e in elems {
                    e.free_vars(out);
                }
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Debug-style rendering keyed by raw Name ids; the real pretty
        // printer lives in `ailang_diagnostic` where an `Interner` is in
        // scope to resolve names back to source text.
        write!(f, "{self:?}")
    }
}

/// A class constraint: `classname` requires an instance at `ty`, attached to
/// the Core node `node` that generated it (so lowering can find it again via
/// `ResolvedConstraints`).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassConstraint {
    pub class: Name,
    pub ty: Type,
}

/// A solver-time constraint, generated while walking Core and discharged
/// during solving (§4.B step 2).
#[derive(Clone, Debug)]
pub enum Constraint {
    /// Plain unification goal.
    Eq(Type, Type),
    /// `classname` instance required at `ty`, for diagnostic purposes tied
    /// to the node that required it.
    Class {
        class: Name,
        ty: Type,
        node: crate::node_id::NodeId,
    },
    /// Row equality between two rows of matching kind.
    Row(Row, Row),
    /// `ty` must be a record containing `label: field_ty` (possibly via an
    /// open tail).
    Field {
        ty: Type,
        label: Name,
        field_ty: Type,
    },
}

/// `∀ vars. constraints ⇒ body`.
#[derive(Clone, Debug)]
pub struct Scheme {
    pub vars: Vec<TypeVar>,
    pub constraints: Vec<ClassConstraint>,
    pub body: Type,
}

impl Scheme {
    #[must_use]
    pub fn monomorphic(body: Type) -> Self {
        Scheme {
            vars: Vec::new(),
            constraints: Vec::new(),
            body,
        }
    }
}
