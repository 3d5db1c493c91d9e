//! Lowers the surface AST to Core ANF (§4.A).
//!
//! Every non-atomic subexpression passed where the Core arena requires an
//! atom (`App`'s callee and arguments, `If` conditions, `Match`
//! scrutinees) is let-bound first by [`Elaborator::atomize`]. `&&`, `||`,
//! and unary `!` have no Core intrinsic of their own; they desugar to `If`
//! right here, not later.

use ailang_diagnostic::Diagnostic;
use ailang_ir::surface::{BinOp, Expr, ExprKind, MatchArm as SurfaceMatchArm, Param, UnaryOp};
use ailang_ir::{
    CoreArena, CoreExprKind, CoreMatchArm, Interner, IntrinsicOp, Literal, Name, NodeId, Span,
    Type,
};

use crate::exhaustiveness;
use crate::letrec;
use crate::types::TypeResolver;

/// Lowers one declaration's worth of surface expressions into a shared
/// [`CoreArena`]. One `Elaborator` is built per compilation unit; `next_type_var`
/// is threaded through every [`TypeResolver`] it constructs so type
/// variables stay unique across the whole module.
pub struct Elaborator<'a> {
    pub arena: CoreArena,
    interner: &'a Interner,
    file: String,
    next_type_var: u32,
    tmp_counter: u32,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Elaborator<'a> {
    #[must_use]
    pub fn new(interner: &'a Interner, file: impl Into<String>) -> Self {
        Elaborator {
            arena: CoreArena::new(),
            interner,
            file: file.into(),
            next_type_var: 0,
            tmp_counter: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// A fresh `TypeResolver` scoped to one declaration. `func id(x: a) -> a`
    /// must resolve both `a`s to the same variable, so callers share one
    /// resolver across a declaration's params, return type, and body
    /// annotations rather than building a new one per annotation.
    pub fn type_resolver(&mut self) -> TypeResolver<'a, '_> {
        TypeResolver::new(self.interner, &mut self.next_type_var)
    }

    pub fn resolve_type(&mut self, parsed: &ailang_ir::surface::ParsedType) -> Type {
        self.type_resolver().resolve(parsed)
    }

    fn fresh_name(&mut self, hint: &str) -> Name {
        self.tmp_counter += 1;
        self.interner.intern(&format!("${hint}{}", self.tmp_counter))
    }

    /// Returns `id` unchanged if it is already an atom, otherwise queues a
    /// `let` binding for it in `pending` and returns a fresh `Var` atom.
    fn atomize(&mut self, span: Span, id: NodeId, pending: &mut Vec<(Name, NodeId)>) -> NodeId {
        if self.arena.is_atom(id) {
            return id;
        }
        let name = self.fresh_name("t");
        pending.push((name, id));
        self.arena.alloc(span, CoreExprKind::Var(name))
    }

    /// Wraps `body` in nested `Let`s for every pending binding, innermost
    /// (last pushed) first.
    fn wrap_pending(&mut self, span: Span, pending: Vec<(Name, NodeId)>, body: NodeId) -> NodeId {
        let mut result = body;
        for (name, value) in pending.into_iter().rev() {
            result = self.arena.alloc(
                span,
                CoreExprKind::Let {
                    name,
                    value,
                    body: result,
                },
            );
        }
        result
    }

    fn lower_params(&mut self, params: &[Param]) -> (Vec<Name>, Vec<Option<Type>>) {
        let mut names = Vec::with_capacity(params.len());
        let mut tys = Vec::with_capacity(params.len());
        for p in params {
            names.push(p.name);
            tys.push(p.ty.as_ref().map(|t| self.resolve_type(t)));
        }
        (names, tys)
    }

    /// Lowers a `func`/method body: the shared entry point for top-level
    /// `func` declarations, instance methods, and `FuncLit` expressions.
    pub fn lower_func(
        &mut self,
        params: &[Param],
        body: &Expr,
    ) -> (Vec<Name>, Vec<Option<Type>>, NodeId) {
        let (names, param_types) = self.lower_params(params);
        let body_id = self.lower_expr(body);
        (names, param_types, body_id)
    }

    /// Lowers one expression to a Core node. The result is a complete,
    /// self-contained term — any ANF let-bindings the translation needed
    /// internally are already wrapped around it — so callers elsewhere in
    /// the tree can freely nest the returned `NodeId` without re-atomizing.
    pub fn lower_expr(&mut self, expr: &Expr) -> NodeId {
        let span = expr.span;
        match &expr.kind {
            ExprKind::Var(name) => self.arena.alloc(span, CoreExprKind::Var(*name)),
            ExprKind::Lit(lit) => self.arena.alloc(span, CoreExprKind::Lit(*lit)),

            ExprKind::Binary {
                op: BinOp::And,
                lhs,
                rhs,
            } => {
                let mut pending = Vec::new();
                let lhs_id = self.lower_expr(lhs);
                let cond = self.atomize(span, lhs_id, &mut pending);
                let then_branch = self.lower_expr(rhs);
                let else_branch = self.arena.alloc(span, CoreExprKind::Lit(Literal::Bool(false)));
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                );
                self.wrap_pending(span, pending, node)
            }
            ExprKind::Binary {
                op: BinOp::Or,
                lhs,
                rhs,
            } => {
                let mut pending = Vec::new();
                let lhs_id = self.lower_expr(lhs);
                let cond = self.atomize(span, lhs_id, &mut pending);
                let then_branch = self.arena.alloc(span, CoreExprKind::Lit(Literal::Bool(true)));
                let else_branch = self.lower_expr(rhs);
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                );
                self.wrap_pending(span, pending, node)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let mut pending = Vec::new();
                let lhs_id = self.lower_expr(lhs);
                let lhs_atom = self.atomize(span, lhs_id, &mut pending);
                let rhs_id = self.lower_expr(rhs);
                let rhs_atom = self.atomize(span, rhs_id, &mut pending);
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::Intrinsic {
                        op: intrinsic_of_binop(*op),
                        args: vec![lhs_atom, rhs_atom],
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::Unary {
                op: UnaryOp::Not,
                operand,
            } => {
                let mut pending = Vec::new();
                let operand_id = self.lower_expr(operand);
                let cond = self.atomize(span, operand_id, &mut pending);
                let then_branch = self.arena.alloc(span, CoreExprKind::Lit(Literal::Bool(false)));
                let else_branch = self.arena.alloc(span, CoreExprKind::Lit(Literal::Bool(true)));
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                );
                self.wrap_pending(span, pending, node)
            }
            ExprKind::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                let mut pending = Vec::new();
                let operand_id = self.lower_expr(operand);
                let arg = self.atomize(span, operand_id, &mut pending);
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::Intrinsic {
                        op: IntrinsicOp::Neg,
                        args: vec![arg],
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::Call { func, args } => {
                let mut pending = Vec::new();
                let func_id = self.lower_expr(func);
                let func_atom = self.atomize(span, func_id, &mut pending);
                let arg_atoms = args
                    .iter()
                    .map(|a| {
                        let id = self.lower_expr(a);
                        self.atomize(span, id, &mut pending)
                    })
                    .collect();
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::App {
                        func: func_atom,
                        args: arg_atoms,
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::FuncLit {
                params,
                body,
                ..
            } => {
                let (names, param_types, body_id) = self.lower_func(params, body);
                self.arena.alloc(
                    span,
                    CoreExprKind::Lambda {
                        params: names,
                        param_types,
                        body: body_id,
                    },
                )
            }

            ExprKind::Block(exprs) => self.lower_block(span, exprs),

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut pending = Vec::new();
                let cond_id = self.lower_expr(cond);
                let cond_atom = self.atomize(span, cond_id, &mut pending);
                let then_id = self.lower_expr(then_branch);
                let else_id = self.lower_expr(else_branch);
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::If {
                        cond: cond_atom,
                        then_branch: then_id,
                        else_branch: else_id,
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::Match { scrutinee, arms } => {
                let mut pending = Vec::new();
                let scrutinee_id = self.lower_expr(scrutinee);
                let scrutinee_atom = self.atomize(span, scrutinee_id, &mut pending);
                let arms: Vec<CoreMatchArm> = arms.iter().map(|a| self.lower_match_arm(a)).collect();
                if let Some(diag) = exhaustiveness::check_exhaustive(&arms, span, &self.file) {
                    self.diagnostics.push(diag);
                }
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::Match {
                        scrutinee: scrutinee_atom,
                        arms,
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::Let {
                name,
                value,
                body,
                ..
            } => {
                let value_id = self.lower_expr(value);
                let body_id = self.lower_expr(body);
                self.arena.alloc(
                    span,
                    CoreExprKind::Let {
                        name: *name,
                        value: value_id,
                        body: body_id,
                    },
                )
            }

            ExprKind::LetRec { bindings, body } => {
                let name_spans: Vec<(Name, Span)> =
                    bindings.iter().map(|(name, value)| (*name, value.span)).collect();
                let mut dups = letrec::check_duplicate_bindings(&name_spans, self.interner, &self.file);
                self.diagnostics.append(&mut dups);
                let bindings = bindings
                    .iter()
                    .map(|(name, value)| (*name, self.lower_expr(value)))
                    .collect();
                let body_id = self.lower_expr(body);
                self.arena.alloc(
                    span,
                    CoreExprKind::LetRec {
                        bindings,
                        body: body_id,
                    },
                )
            }

            ExprKind::Record { fields } => {
                let fields = fields
                    .iter()
                    .map(|(label, value)| (*label, self.lower_expr(value)))
                    .collect();
                self.arena.alloc(span, CoreExprKind::Record { fields })
            }

            ExprKind::RecordAccess { record, label } => {
                let mut pending = Vec::new();
                let record_id = self.lower_expr(record);
                let record_atom = self.atomize(span, record_id, &mut pending);
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::RecordAccess {
                        record: record_atom,
                        label: *label,
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::RecordUpdate { base, updates } => {
                let mut pending = Vec::new();
                let base_id = self.lower_expr(base);
                let base_atom = self.atomize(span, base_id, &mut pending);
                let updates = updates
                    .iter()
                    .map(|(label, value)| (*label, self.lower_expr(value)))
                    .collect();
                let node = self.arena.alloc(
                    span,
                    CoreExprKind::RecordUpdate {
                        base: base_atom,
                        updates,
                    },
                );
                self.wrap_pending(span, pending, node)
            }

            ExprKind::List(elems) => {
                let elems = elems.iter().map(|e| self.lower_expr(e)).collect();
                self.arena.alloc(span, CoreExprKind::List(elems))
            }
            ExprKind::Tuple(elems) => {
                let elems = elems.iter().map(|e| self.lower_expr(e)).collect();
                self.arena.alloc(span, CoreExprKind::Tuple(elems))
            }
        }
    }

    /// `{ e1; e2; ...; en }` becomes `let $_1 = e1 in let $_2 = e2 in ... en`,
    /// discarding every intermediate value but its effects. An empty block
    /// lowers to `Unit` (the parser never emits one, but nothing else should
    /// assume it can't happen).
    fn lower_block(&mut self, span: Span, exprs: &[Expr]) -> NodeId {
        let Some((last, init)) = exprs.split_last() else {
            return self.arena.alloc(span, CoreExprKind::Lit(Literal::Unit));
        };
        let mut bound = Vec::with_capacity(init.len());
        for e in init {
            bound.push(self.lower_expr(e));
        }
        let last_id = self.lower_expr(last);
        let mut result = last_id;
        for value in bound.into_iter().rev() {
            let name = self.fresh_name("_");
            result = self.arena.alloc(
                span,
                CoreExprKind::Let {
                    name,
                    value,
                    body: result,
                },
            );
        }
        result
    }

    fn lower_match_arm(&mut self, arm: &SurfaceMatchArm) -> CoreMatchArm {
        let guard = arm.guard.as_ref().map(|g| self.lower_expr(g));
        let body = self.lower_expr(&arm.body);
        CoreMatchArm {
            pattern: arm.pattern.clone(),
            guard,
            body,
        }
    }
}

fn intrinsic_of_binop(op: BinOp) -> IntrinsicOp {
    match op {
        BinOp::Add => IntrinsicOp::Add,
        BinOp::Sub => IntrinsicOp::Sub,
        BinOp::Mul => IntrinsicOp::Mul,
        BinOp::Div => IntrinsicOp::Div,
        BinOp::Mod => IntrinsicOp::Mod,
        BinOp::Eq => IntrinsicOp::Eq,
        BinOp::Neq => IntrinsicOp::Neq,
        BinOp::Lt => IntrinsicOp::Lt,
        BinOp::Le => IntrinsicOp::Le,
        BinOp::Gt => IntrinsicOp::Gt,
        BinOp::Ge => IntrinsicOp::Ge,
        BinOp::Concat => IntrinsicOp::Concat,
        BinOp::And | BinOp::Or => unreachable!("And/Or are desugared to If before reaching here"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::surface::ParsedType;
    use ailang_ir::Span;

    fn var(interner: &Interner, s: &str, span: Span) -> Expr {
        Expr {
            span,
            kind: ExprKind::Var(interner.intern(s)),
        }
    }

    fn lit_int(n: i64, span: Span) -> Expr {
        Expr {
            span,
            kind: ExprKind::Lit(Literal::Int(n)),
        }
    }

    #[test]
    fn and_desugars_to_if_without_evaluating_rhs_eagerly() {
        let interner = Interner::new();
        let mut elab = Elaborator::new(&interner, "test.ail");
        let span = Span::new(0, 1);
        let expr = Expr {
            span,
            kind: ExprKind::Binary {
                op: BinOp::And,
                lhs: Box::new(var(&interner, "a", span)),
                rhs: Box::new(var(&interner, "b", span)),
            },
        };
        let id = elab.lower_expr(&expr);
        match &elab.arena.get(id).kind {
            CoreExprKind::If { .. } => {}
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn binary_add_let_binds_non_atomic_operands() {
        let interner = Interner::new();
        let mut elab = Elaborator::new(&interner, "test.ail");
        let span = Span::new(0, 1);
        // (1 + 2) + 3 forces the left operand through a let, since it is
        // itself an Intrinsic node, not a Var/Lit atom.
        let inner = Expr {
            span,
            kind: ExprKind::Binary {
                op: BinOp::Add,
                lhs: Box::new(lit_int(1, span)),
                rhs: Box::new(lit_int(2, span)),
            },
        };
        let expr = Expr {
            span,
            kind: ExprKind::Binary {
                op: BinOp::Add,
                lhs: Box::new(inner),
                rhs: Box::new(lit_int(3, span)),
            },
        };
        let id = elab.lower_expr(&expr);
        match &elab.arena.get(id).kind {
            CoreExprKind::Let { value, body, .. } => {
                assert!(matches!(
                    elab.arena.get(*value).kind,
                    CoreExprKind::Intrinsic { .. }
                ));
                match &elab.arena.get(*body).kind {
                    CoreExprKind::Intrinsic { op, args } => {
                        assert!(matches!(op, IntrinsicOp::Add));
                        for a in args {
                            assert!(elab.arena.is_atom(*a));
                        }
                    }
                    other => panic!("expected Intrinsic, got {other:?}"),
                }
            }
            other => panic!("expected Let wrapping the hoisted operand, got {other:?}"),
        }
    }

    #[test]
    fn call_atomizes_callee_and_every_argument() {
        let interner = Interner::new();
        let mut elab = Elaborator::new(&interner, "test.ail");
        let span = Span::new(0, 1);
        let nested = Expr {
            span,
            kind: ExprKind::Binary {
                op: BinOp::Mul,
                lhs: Box::new(lit_int(2, span)),
                rhs: Box::new(lit_int(3, span)),
            },
        };
        let expr = Expr {
            span,
            kind: ExprKind::Call {
                func: Box::new(var(&interner, "f", span)),
                args: vec![nested],
            },
        };
        let id = elab.lower_expr(&expr);
        // Walk through the wrapping Let to the App node.
        let mut cur = id;
        loop {
            match &elab.arena.get(cur).kind {
                CoreExprKind::Let { body, .. } => cur = *body,
                CoreExprKind::App { func, args } => {
                    assert!(elab.arena.is_atom(*func));
                    for a in args {
                        assert!(elab.arena.is_atom(*a));
                    }
                    break;
                }
                other => panic!("expected Let* then App, got {other:?}"),
            }
        }
    }

    #[test]
    fn block_sequences_through_nested_lets_and_keeps_the_last_value() {
        let interner = Interner::new();
        let mut elab = Elaborator::new(&interner, "test.ail");
        let span = Span::new(0, 1);
        let expr = Expr {
            span,
            kind: ExprKind::Block(vec![lit_int(1, span), lit_int(2, span), lit_int(3, span)]),
        };
        let id = elab.lower_expr(&expr);
        match &elab.arena.get(id).kind {
            CoreExprKind::Let { value, body, .. } => {
                assert!(matches!(elab.arena.get(*value).kind, CoreExprKind::Lit(_)));
                match &elab.arena.get(*body).kind {
                    CoreExprKind::Let { body: inner_body, .. } => {
                        assert!(matches!(
                            elab.arena.get(*inner_body).kind,
                            CoreExprKind::Lit(Literal::Int(3))
                        ));
                    }
                    other => panic!("expected nested Let, got {other:?}"),
                }
            }
            other => panic!("expected Let, got {other:?}"),
        }
    }

    #[test]
    fn resolve_type_shares_one_variable_across_a_declaration() {
        let interner = Interner::new();
        let mut elab = Elaborator::new(&interner, "test.ail");
        let a = interner.intern("a");
        let mut resolver = elab.type_resolver();
        let t1 = resolver.resolve(&ParsedType::Con(a));
        let t2 = resolver.resolve(&ParsedType::Con(a));
        assert_eq!(format!("{t1:?}"), format!("{t2:?}"));
    }
}
