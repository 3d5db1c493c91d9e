//! Constraint generation and on-the-fly unification over a Core arena
//! (§4.B steps 1-2): an Algorithm W variant that unifies as it walks rather
//! than deferring every constraint to a separate solving pass, since ANF
//! already gives each subterm a name to hang a type on.
//!
//! `Eq`/`Row`/`Field` goals are discharged immediately by calling into
//! [`crate::unify`]; `Class` goals (`Num a`, `Show a`, ...) are deferred into
//! `class_constraints` because the type they apply to may still be an
//! unresolved variable when the goal is generated, and only resolves once
//! the whole declaration (or defaulting) is done.

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{
    CoreArena, CoreExprKind, Interner, IntrinsicOp, Literal, Name, NodeId, Pattern, PatternKind,
    Row, RowKind, Scheme, SourceSpan, Span, Type, TypeVar,
};
use rustc_hash::FxHashMap;

use crate::generalize;
use crate::subst::Subst;
use crate::unify::{self, UnifyError, VarGen};

pub type Env = FxHashMap<Name, Scheme>;

pub struct InferCtx<'a> {
    arena: &'a CoreArena,
    interner: &'a Interner,
    file: &'a str,
    pub subst: Subst,
    next_var: u32,
    pub class_constraints: Vec<(NodeId, Name, Type)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> InferCtx<'a> {
    #[must_use]
    pub fn new(arena: &'a CoreArena, interner: &'a Interner, file: &'a str) -> Self {
        InferCtx {
            arena,
            interner,
            file,
            subst: Subst::new(),
            next_var: 0,
            class_constraints: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn fresh_var(&mut self) -> TypeVar {
        let v = TypeVar(self.next_var);
        self.next_var += 1;
        v
    }

    fn fresh_row_var(&mut self) -> ailang_ir::RowVar {
        ailang_ir::RowVar(self.fresh_var().0)
    }

    /// Allocates a fresh type variable outside of the normal inference walk,
    /// for placeholders the module-level orchestration seeds before a
    /// mutually-recursive group of top-level declarations is inferred.
    pub fn fresh_type_var(&mut self) -> TypeVar {
        self.fresh_var()
    }

    pub(crate) fn unify(&mut self, a: &Type, b: &Type, span: Span) {
        let mut vars = VarGen::new(&mut self.next_var);
        if let Err(err) = unify::unify_types(&mut self.subst, &mut vars, a, b) {
            self.diagnostics.push(self.unify_error_diagnostic(err, span));
        }
    }

    fn unify_error_diagnostic(&self, err: UnifyError, span: Span) -> Diagnostic {
        let source_span = SourceSpan::new(self.file, span);
        match err {
            UnifyError::Mismatch { expected, actual } => Diagnostic::new(
                ErrorCode::TC001(),
                Phase::Typecheck,
                "cannot unify two incompatible types",
            )
            .with_data("expected", format!("{expected:?}"))
            .with_data("actual", format!("{actual:?}"))
            .with_span(source_span),
            UnifyError::Occurs { var, ty } => Diagnostic::new(
                ErrorCode::TC002(),
                Phase::Typecheck,
                format!("type variable #{} occurs in {ty:?}, which has no finite solution", var.0),
            )
            .with_span(source_span),
            UnifyError::RowOccurs { var } => Diagnostic::new(
                ErrorCode::TC002(),
                Phase::Typecheck,
                format!("row variable #{} occurs in its own solution", var.0),
            )
            .with_span(source_span),
            UnifyError::RowMissingLabels { kind, missing } => {
                let names: Vec<String> = missing.iter().map(|n| self.interner.resolve(*n)).collect();
                let code = if kind == RowKind::Record {
                    ErrorCode::TC_REC_001()
                } else {
                    ErrorCode::TC001()
                };
                Diagnostic::new(
                    code,
                    Phase::Typecheck,
                    format!("row is missing field(s): {}", names.join(", ")),
                )
                .with_data("missing", names.join(","))
                .with_span(source_span)
            }
            UnifyError::KindMismatch { expected, actual } => Diagnostic::new(
                ErrorCode::TC_KIND_001(),
                Phase::Typecheck,
                format!("row kind mismatch: expected {expected:?}, found {actual:?}"),
            )
            .with_span(source_span),
            UnifyError::Arity { expected, actual } => Diagnostic::new(
                ErrorCode::TC001(),
                Phase::Typecheck,
                format!("arity mismatch: expected {expected} argument(s), found {actual}"),
            )
            .with_span(source_span),
        }
    }

    fn instantiate(&mut self, scheme: &Scheme) -> Type {
        let mut map = FxHashMap::default();
        for v in &scheme.vars {
            map.insert(*v, Type::Var(self.fresh_var()));
        }
        substitute_vars(&scheme.body, &map)
    }

    /// Infers the type and the effect incurred by *evaluating* `id` to a
    /// value. For an `App`, this effect is the callee's own latent effect
    /// (from its `Fun` type) union the effects of evaluating its arguments —
    /// deliberately excluding the effect carried by the function-reference
    /// node itself, since referencing a closure performs no effect; only
    /// invoking it does (§4.B "Function application and effect propagation").
    pub fn infer(&mut self, env: &mut Env, id: NodeId) -> (Type, Row) {
        ailang_stack::ensure_sufficient_stack(|| self.infer_inner(env, id))
    }

    /// The recursive walk itself, grown onto a fresh stack segment by
    /// [`InferCtx::infer`] whenever a deeply nested expression (recursive
    /// descent has no depth limit of its own) gets close to exhausting the
    /// current one.
    fn infer_inner(&mut self, env: &mut Env, id: NodeId) -> (Type, Row) {
        let node = self.arena.get(id);
        let span = node.span;
        match node.kind.clone() {
            CoreExprKind::Var(name) => match env.get(&name).cloned() {
                Some(scheme) => (self.instantiate(&scheme), Row::empty_effect()),
                None => {
                    self.diagnostics.push(
                        Diagnostic::new(
                            ErrorCode::RT_UNDEF(),
                            Phase::Typecheck,
                            format!("`{}` is not in scope", self.interner.resolve(name)),
                        )
                        .with_node(id)
                        .with_span(SourceSpan::new(self.file, span)),
                    );
                    (Type::Var(self.fresh_var()), Row::empty_effect())
                }
            },
            CoreExprKind::Lit(lit) => (literal_type(&lit), Row::empty_effect()),
            CoreExprKind::Lambda { params, param_types, body } => {
                let mut body_env = env.clone();
                let mut param_tys = Vec::with_capacity(params.len());
                for (name, declared) in params.iter().zip(param_types.iter()) {
                    let ty = declared.clone().unwrap_or_else(|| Type::Var(self.fresh_var()));
                    body_env.insert(*name, Scheme::monomorphic(ty.clone()));
                    param_tys.push(ty);
                }
                let (body_ty, body_effect) = self.infer(&mut body_env, body);
                (
                    Type::Fun {
                        params: param_tys,
                        ret: Box::new(body_ty),
                        effect: body_effect,
                    },
                    Row::empty_effect(),
                )
            }
            CoreExprKind::App { func, args } => {
                let (func_ty, _) = self.infer(env, func);
                let arg_tys: Vec<Type> = args.iter().map(|a| self.infer(env, *a).0).collect();
                let ret_var = Type::Var(self.fresh_var());
                let effect_tail = self.fresh_row_var();
                let effect_var = Row::open(RowKind::Effect, Vec::new(), effect_tail);
                let expected = Type::Fun {
                    params: arg_tys,
                    ret: Box::new(ret_var.clone()),
                    effect: effect_var.clone(),
                };
                self.unify(&func_ty, &expected, span);
                let resolved_effect = self.subst.apply_row(&effect_var);
                (self.subst.apply_type(&ret_var), resolved_effect)
            }
            CoreExprKind::Let { name, value, body } => {
                let (value_ty, value_effect) = self.infer(env, value);
                let is_value = generalize::is_syntactic_value(&self.arena.get(value).kind);
                let env_free = generalize::env_free_vars(env, &self.subst);
                let scheme = generalize::generalize(&value_ty, is_value, &self.subst, &env_free);
                let mut body_env = env.clone();
                body_env.insert(name, scheme);
                let (body_ty, body_effect) = self.infer(&mut body_env, body);
                let effect = Row::union_effects(
                    &self.subst.apply_row(&value_effect),
                    &self.subst.apply_row(&body_effect),
                );
                (body_ty, effect)
            }
            CoreExprKind::LetRec { bindings, body } => {
                let mut local_env = env.clone();
                let mut placeholders = Vec::with_capacity(bindings.len());
                for (name, _) in &bindings {
                    let v = Type::Var(self.fresh_var());
                    local_env.insert(*name, Scheme::monomorphic(v.clone()));
                    placeholders.push(v);
                }
                let mut effect = Row::empty_effect();
                for ((_, value), placeholder) in bindings.iter().zip(placeholders.iter()) {
                    let (value_ty, value_effect) = self.infer(&mut local_env, *value);
                    self.unify(placeholder, &value_ty, span);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                }
                let env_free = generalize::env_free_vars(env, &self.subst);
                for ((name, value), placeholder) in bindings.iter().zip(placeholders.iter()) {
                    let is_value = generalize::is_syntactic_value(&self.arena.get(*value).kind);
                    let scheme = generalize::generalize(placeholder, is_value, &self.subst, &env_free);
                    local_env.insert(*name, scheme);
                }
                let (body_ty, body_effect) = self.infer(&mut local_env, body);
                effect = Row::union_effects(&effect, &self.subst.apply_row(&body_effect));
                (body_ty, effect)
            }
            CoreExprKind::If { cond, then_branch, else_branch } => {
                let (cond_ty, _) = self.infer(env, cond);
                self.unify(&cond_ty, &Type::bool(), span);
                let (then_ty, then_effect) = self.infer(env, then_branch);
                let (else_ty, else_effect) = self.infer(env, else_branch);
                self.unify(&then_ty, &else_ty, span);
                let effect = Row::union_effects(
                    &self.subst.apply_row(&then_effect),
                    &self.subst.apply_row(&else_effect),
                );
                (self.subst.apply_type(&then_ty), effect)
            }
            CoreExprKind::Match { scrutinee, arms } => {
                let (scrut_ty, mut effect) = self.infer(env, scrutinee);
                let mut result_ty: Option<Type> = None;
                for arm in &arms {
                    let mut arm_env = env.clone();
                    self.bind_pattern(&arm.pattern, &scrut_ty, &mut arm_env);
                    if let Some(guard) = arm.guard {
                        let (guard_ty, guard_effect) = self.infer(&mut arm_env, guard);
                        self.unify(&guard_ty, &Type::bool(), self.arena.get(guard).span);
                        effect = Row::union_effects(&effect, &self.subst.apply_row(&guard_effect));
                    }
                    let (body_ty, body_effect) = self.infer(&mut arm_env, arm.body);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&body_effect));
                    match &result_ty {
                        Some(t) => self.unify(t, &body_ty, self.arena.get(arm.body).span),
                        None => result_ty = Some(body_ty),
                    }
                }
                let ty = result_ty.unwrap_or_else(|| Type::Var(self.fresh_var()));
                (self.subst.apply_type(&ty), effect)
            }
            CoreExprKind::Record { fields } => {
                let mut labels = Vec::with_capacity(fields.len());
                let mut effect = Row::empty_effect();
                for (name, value) in fields {
                    let (ty, value_effect) = self.infer(env, value);
                    labels.push((name, ty));
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                }
                (Type::Record(Row::closed(RowKind::Record, labels)), effect)
            }
            CoreExprKind::RecordAccess { record, label } => {
                let (record_ty, effect) = self.infer(env, record);
                let field_var = Type::Var(self.fresh_var());
                let tail = self.fresh_row_var();
                let expected = Type::Record(Row::open(RowKind::Record, vec![(label, field_var.clone())], tail));
                self.unify(&record_ty, &expected, span);
                (self.subst.apply_type(&field_var), effect)
            }
            CoreExprKind::RecordUpdate { base, updates } => {
                let (base_ty, mut effect) = self.infer(env, base);
                let mut labels = Vec::with_capacity(updates.len());
                for (name, value) in updates {
                    let (ty, value_effect) = self.infer(env, value);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                    labels.push((name, ty));
                }
                let tail = self.fresh_row_var();
                let expected = Type::Record(Row::open(RowKind::Record, labels, tail));
                self.unify(&base_ty, &expected, span);
                (self.subst.apply_type(&base_ty), effect)
            }
            CoreExprKind::List(elems) => {
                let elem_var = Type::Var(self.fresh_var());
                let mut effect = Row::empty_effect();
                for e in elems {
                    let (ty, value_effect) = self.infer(env, e);
                    self.unify(&elem_var, &ty, span);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                }
                (Type::list(self.subst.apply_type(&elem_var)), effect)
            }
            CoreExprKind::Tuple(elems) => {
                let mut tys = Vec::with_capacity(elems.len());
                let mut effect = Row::empty_effect();
                for e in elems {
                    let (ty, value_effect) = self.infer(env, e);
                    tys.push(ty);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                }
                (Type::Tuple(tys), effect)
            }
            CoreExprKind::Intrinsic { op, args } => self.infer_intrinsic(env, id, op, &args, span),
            CoreExprKind::DictRef { ty, .. } => (ty, Row::empty_effect()),
            CoreExprKind::DictApp { args, .. } => {
                let mut effect = Row::empty_effect();
                for a in args {
                    let (_, value_effect) = self.infer(env, a);
                    effect = Row::union_effects(&effect, &self.subst.apply_row(&value_effect));
                }
                (Type::Var(self.fresh_var()), effect)
            }
            CoreExprKind::BuiltinRef(_) => (Type::Var(self.fresh_var()), Row::empty_effect()),
        }
    }

    fn infer_intrinsic(
        &mut self,
        env: &mut Env,
        node: NodeId,
        op: IntrinsicOp,
        args: &[NodeId],
        span: Span,
    ) -> (Type, Row) {
        let arg_tys: Vec<Type> = args.iter().map(|a| self.infer(env, *a).0).collect();
        let unify_all = |ctx: &mut Self, tys: &[Type]| -> Type {
            let t = tys.first().cloned().unwrap_or_else(|| Type::Var(ctx.fresh_var()));
            for other in &tys[1..] {
                ctx.unify(&t, other, span);
            }
            t
        };
        match op {
            IntrinsicOp::Add | IntrinsicOp::Sub | IntrinsicOp::Mul | IntrinsicOp::Neg => {
                let t = unify_all(self, &arg_tys);
                self.class_constraints.push((node, Name::NUM, t.clone()));
                (t, Row::empty_effect())
            }
            IntrinsicOp::Div => {
                let t = unify_all(self, &arg_tys);
                self.class_constraints.push((node, Name::NUM, t.clone()));
                self.class_constraints.push((node, Name::FRACTIONAL, t.clone()));
                (t, Row::empty_effect())
            }
            IntrinsicOp::Mod => {
                let t = unify_all(self, &arg_tys);
                self.class_constraints.push((node, Name::NUM, t.clone()));
                self.class_constraints.push((node, Name::INTEGRAL, t.clone()));
                (t, Row::empty_effect())
            }
            IntrinsicOp::Eq | IntrinsicOp::Neq => {
                let t = unify_all(self, &arg_tys);
                self.class_constraints.push((node, Name::EQ, t));
                (Type::bool(), Row::empty_effect())
            }
            IntrinsicOp::Lt | IntrinsicOp::Le | IntrinsicOp::Gt | IntrinsicOp::Ge => {
                let t = unify_all(self, &arg_tys);
                self.class_constraints.push((node, Name::ORD, t));
                (Type::bool(), Row::empty_effect())
            }
            IntrinsicOp::Show => {
                let t = arg_tys.into_iter().next().unwrap_or_else(|| Type::Var(self.fresh_var()));
                self.class_constraints.push((node, Name::SHOW, t));
                (Type::string(), Row::empty_effect())
            }
            IntrinsicOp::Concat => {
                for t in &arg_tys {
                    self.unify(t, &Type::string(), span);
                }
                (Type::string(), Row::empty_effect())
            }
        }
    }

    fn bind_pattern(&mut self, pattern: &Pattern, scrut_ty: &Type, env: &mut Env) {
        match &pattern.kind {
            PatternKind::Wildcard => {}
            PatternKind::Var(name) => {
                env.insert(*name, Scheme::monomorphic(scrut_ty.clone()));
            }
            PatternKind::Lit(lit) => {
                let lit_ty = literal_type(lit);
                self.unify(scrut_ty, &lit_ty, pattern.span);
            }
            PatternKind::Tuple(elems) => {
                let elem_vars: Vec<Type> = elems.iter().map(|_| Type::Var(self.fresh_var())).collect();
                self.unify(scrut_ty, &Type::Tuple(elem_vars.clone()), pattern.span);
                for (p, t) in elems.iter().zip(elem_vars.iter()) {
                    self.bind_pattern(p, t, env);
                }
            }
            PatternKind::Record(fields) => {
                let field_vars: Vec<(Name, Type)> =
                    fields.iter().map(|(l, _)| (*l, Type::Var(self.fresh_var()))).collect();
                let tail = self.fresh_row_var();
                let expected = Type::Record(Row::open(RowKind::Record, field_vars.clone(), tail));
                self.unify(scrut_ty, &expected, pattern.span);
                for ((_, p), (_, t)) in fields.iter().zip(field_vars.iter()) {
                    self.bind_pattern(p, t, env);
                }
            }
            PatternKind::Constructor { ctor, args, .. } => {
                let ctor_ty = env.get(ctor).cloned().map(|scheme| self.instantiate(&scheme));
                match ctor_ty {
                    Some(Type::Fun { params, ret, .. }) => {
                        self.unify(scrut_ty, &ret, pattern.span);
                        for (p, t) in args.iter().zip(params.iter()) {
                            self.bind_pattern(p, t, env);
                        }
                    }
                    Some(other) => {
                        self.unify(scrut_ty, &other, pattern.span);
                        for p in args {
                            let fresh = Type::Var(self.fresh_var());
                            self.bind_pattern(p, &fresh, env);
                        }
                    }
                    None => {
                        for p in args {
                            let fresh = Type::Var(self.fresh_var());
                            self.bind_pattern(p, &fresh, env);
                        }
                    }
                }
            }
        }
    }
}

fn literal_type(lit: &Literal) -> Type {
    match lit {
        Literal::Int(_) => Type::int(),
        Literal::Float(_) => Type::float(),
        Literal::Bool(_) => Type::bool(),
        Literal::Str(_) => Type::string(),
        Literal::Unit => Type::unit(),
    }
}

fn substitute_vars(ty: &Type, map: &FxHashMap<TypeVar, Type>) -> Type {
    match ty {
        Type::Var(v) => map.get(v).cloned().unwrap_or_else(|| ty.clone()),
        Type::Con(_) => ty.clone(),
        Type::App(ctor, args) => Type::App(
            Box::new(substitute_vars(ctor, map)),
            args.iter().map(|a| substitute_vars(a, map)).collect(),
        ),
        Type::Fun { params, ret, effect } => Type::Fun {
            params: params.iter().map(|p| substitute_vars(p, map)).collect(),
            ret: Box::new(substitute_vars(ret, map)),
            effect: substitute_vars_row(effect, map),
        },
        Type::Record(row) => Type::Record(substitute_vars_row(row, map)),
        Type::Tuple(elems) => Type::Tuple(elems.iter().map(|e| substitute_vars(e, map)).collect()),
    }
}

fn substitute_vars_row(row: &Row, map: &FxHashMap<TypeVar, Type>) -> Row {
    Row {
        kind: row.kind,
        labels: row
            .labels
            .iter()
            .map(|(l, t)| (*l, substitute_vars(t, map)))
            .collect(),
        tail: row.tail.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_with<'a>(arena: &'a CoreArena, interner: &'a Interner) -> InferCtx<'a> {
        InferCtx::new(arena, interner, "test.ail")
    }

    #[test]
    fn literal_int_infers_to_int() {
        let interner = Interner::new();
        let mut arena = CoreArena::new();
        let id = arena.alloc(Span::new(0, 1), CoreExprKind::Lit(Literal::Int(1)));
        let mut ctx = ctx_with(&arena, &interner);
        let mut env = Env::default();
        let (ty, effect) = ctx.infer(&mut env, id);
        assert_eq!(ty, Type::int());
        assert!(effect.labels.is_empty());
    }

    #[test]
    fn undefined_variable_reports_rt_undef() {
        let interner = Interner::new();
        let mut arena = CoreArena::new();
        let name = interner.intern("missing");
        let id = arena.alloc(Span::new(0, 1), CoreExprKind::Var(name));
        let mut ctx = ctx_with(&arena, &interner);
        let mut env = Env::default();
        ctx.infer(&mut env, id);
        assert_eq!(ctx.diagnostics.len(), 1);
        assert_eq!(ctx.diagnostics[0].code, ErrorCode::RT_UNDEF());
    }

    #[test]
    fn if_branches_must_unify() {
        let interner = Interner::new();
        let mut arena = CoreArena::new();
        let cond = arena.alloc(Span::new(0, 1), CoreExprKind::Lit(Literal::Bool(true)));
        let then_b = arena.alloc(Span::new(0, 1), CoreExprKind::Lit(Literal::Int(1)));
        let else_b = arena.alloc(Span::new(0, 1), CoreExprKind::Lit(Literal::Str("x".into())));
        let if_id = arena.alloc(
            Span::new(0, 1),
            CoreExprKind::If { cond, then_branch: then_b, else_branch: else_b },
        );
        let mut ctx = ctx_with(&arena, &interner);
        let mut env = Env::default();
        ctx.infer(&mut env, if_id);
        assert_eq!(ctx.diagnostics.len(), 1);
        assert_eq!(ctx.diagnostics[0].code, ErrorCode::TC001());
    }

    #[test]
    fn let_bound_lambda_generalizes_over_its_parameter() {
        let interner = Interner::new();
        let mut arena = CoreArena::new();
        let x = interner.intern("x");
        let id_fn = interner.intern("identity");
        let body = arena.alloc(Span::new(0, 1), CoreExprKind::Var(x));
        let lambda = arena.alloc(
            Span::new(0, 1),
            CoreExprKind::Lambda { params: vec![x], param_types: vec![None], body },
        );
        let use_int = arena.alloc(Span::new(0, 1), CoreExprKind::Lit(Literal::Int(1)));
        let func_ref = arena.alloc(Span::new(0, 1), CoreExprKind::Var(id_fn));
        let call_int = arena.alloc(
            Span::new(0, 1),
            CoreExprKind::App { func: func_ref, args: vec![use_int] },
        );
        let let_id = arena.alloc(
            Span::new(0, 1),
            CoreExprKind::Let { name: id_fn, value: lambda, body: call_int },
        );
        let mut ctx = ctx_with(&arena, &interner);
        let mut env = Env::default();
        let (ty, _effect) = ctx.infer(&mut env, let_id);
        assert!(ctx.diagnostics.is_empty(), "{:?}", ctx.diagnostics);
        assert_eq!(ty, Type::int());
    }
}
