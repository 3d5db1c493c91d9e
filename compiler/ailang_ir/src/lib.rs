//! Core data model for the AILANG compiler.
//!
//! Spans, interned names, types/rows/constraints, the Core ANF arena, the
//! surface AST, and modules/declarations/imports/instances — the shared
//! vocabulary every later stage (`ailang_elab`, `ailang_types`,
//! `ailang_link`, `ailang_eval`) is built against.

pub mod capability;
pub mod core;
pub mod literal;
pub mod module;
pub mod name;
pub mod node_id;
pub mod pattern;
pub mod span;
pub mod surface;
pub mod ty;

pub use capability::Capabilities;
pub use core::{CoreArena, CoreExprKind, CoreNode, IntrinsicOp, MatchArm as CoreMatchArm};
pub use literal::Literal;
pub use module::{Decl, DeclKind, Import, ImportNames, InstanceDecl, Module as CoreModule};
pub use name::{Interner, Name};
pub use node_id::{NodeId, NodeIdGen};
pub use pattern::{Pattern, PatternKind};
pub use span::{SourceSpan, Span};
pub use ty::{ClassConstraint, Constraint, Row, RowKind, RowTail, RowVar, Scheme, Type, TypeVar};

/// A resolved class constraint, produced by the type checker and consumed
/// by the lowering pass (§3 "Resolved constraint", §4.B step 5).
#[derive(Clone, Debug)]
pub struct ResolvedConstraint {
    pub class: Name,
    pub ty: Type,
    pub instance_key: String,
    /// The specific method this node will call through the dictionary, if
    /// the node is itself a method call rather than a bare instance
    /// requirement (e.g. a `show` intrinsic resolves directly to
    /// `Show.show`).
    pub method: Option<Name>,
}

/// `NodeId -> ResolvedConstraint`, keyed by the node that required the
/// class instance. Built once per declaration by the type checker and
/// never mutated afterwards (§3 "Relationships and ownership").
pub type ResolvedConstraints = rustc_hash::FxHashMap<NodeId, ResolvedConstraint>;
