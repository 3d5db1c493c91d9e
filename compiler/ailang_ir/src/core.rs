//! The Core intermediate representation: an A-Normal Form arena.
//!
//! Every non-trivial subterm is let-bound (§4.A), so `App` arguments,
//! `If`-conditions, and `Match`-scrutinees are always `Var` or `Lit` nodes
//! (testable property 1, §8). Nodes are stored flat in a `CoreArena`,
//! indexed by `NodeId`, following `ori_ir`'s "flatten everything, no
//! `Box<Expr>`" design: cheap `Copy` indices instead of owned trees, and a
//! single place (the arena) diagnostics and side tables key off of.

use crate::literal::Literal;
use crate::name::Name;
use crate::node_id::NodeId;
use crate::pattern::Pattern;
use crate::span::Span;
use crate::ty::Type;

#[derive(Clone, Debug)]
pub struct CoreNode {
    pub id: NodeId,
    pub span: Span,
    pub kind: CoreExprKind,
}

#[derive(Clone, Debug)]
pub enum IntrinsicOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    Show,
    /// Unary negation. Resolves through the same `Num` dictionary as `Sub`.
    Neg,
    /// String/list append. Never lowered to a dictionary call (§4.C table).
    Concat,
}

#[derive(Clone, Debug)]
pub struct MatchArm {
    pub pattern: Pattern,
    /// The `if cond` guard, kept as a separate sub-node (§4.A "Guards").
    pub guard: Option<NodeId>,
    pub body: NodeId,
}

#[derive(Clone, Debug)]
pub enum CoreExprKind {
    Var(Name),
    Lit(Literal),
    Lambda {
        params: Vec<Name>,
        param_types: Vec<Option<Type>>,
        body: NodeId,
    },
    App {
        func: NodeId,
        args: Vec<NodeId>,
    },
    Let {
        name: Name,
        value: NodeId,
        body: NodeId,
    },
    LetRec {
        bindings: Vec<(Name, NodeId)>,
        body: NodeId,
    },
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: NodeId,
    },
    Match {
        scrutinee: NodeId,
        arms: Vec<MatchArm>,
    },
    Record {
        fields: Vec<(Name, NodeId)>,
    },
    RecordAccess {
        record: NodeId,
        label: Name,
    },
    RecordUpdate {
        base: NodeId,
        updates: Vec<(Name, NodeId)>,
    },
    List(Vec<NodeId>),
    Tuple(Vec<NodeId>),
    /// Pre-lowering arithmetic/comparison/equality/show operator.
    Intrinsic { op: IntrinsicOp, args: Vec<NodeId> },
    /// Post-lowering reference to a class dictionary at a resolved type.
    /// Resolved to a concrete registry pointer by the linker (§4.D).
    DictRef { class: Name, ty: Type },
    /// Post-lowering dictionary method invocation.
    DictApp {
        dict: NodeId,
        method: Name,
        args: Vec<NodeId>,
    },
    /// Reference to a runtime builtin not backed by a class (e.g. effect
    /// operation entry points before they're wrapped in a capability
    /// check).
    BuiltinRef(Name),
}

/// Flat, append-only store of Core nodes. `NodeId(i)` is always
/// `nodes[i]` — the arena index *is* the stable node identity (invariant 1).
#[derive(Default, Clone, Debug)]
pub struct CoreArena {
    nodes: Vec<CoreNode>,
}

impl CoreArena {
    #[must_use]
    pub fn new() -> Self {
        CoreArena { nodes: Vec::new() }
    }

    pub fn alloc(&mut self, span: Span, kind: CoreExprKind) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        self.nodes.push(CoreNode { id, span, kind });
        id
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> &CoreNode {
        &self.nodes[id.raw() as usize]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut CoreNode {
        &mut self.nodes[id.raw() as usize]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CoreNode> {
        self.nodes.iter()
    }

    /// `Var` or `Lit`: the two kinds ANF allows as an atomic argument.
    #[must_use]
    pub fn is_atom(&self, id: NodeId) -> bool {
        matches!(
            self.get(id).kind,
            CoreExprKind::Var(_) | CoreExprKind::Lit(_)
        )
    }
}
