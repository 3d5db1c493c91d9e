//! The tree-walking evaluator (§4.E "Evaluation").
//!
//! Strict, call-by-value, left-to-right: an `App`'s function and arguments
//! (already atoms, per ANF invariant 1) are evaluated in source order,
//! argument lists for `Record`/`List`/`Tuple` likewise. Closures capture
//! their defining [`Environment`] by reference (`Environment::clone` shares
//! the scope chain), which is what makes ordinary function definitions
//! mutually recursive through [`CoreExprKind::LetRec`] without a separate
//! "forward declaration" pass.

use std::cell::RefCell;
use std::rc::Rc;

use ailang_ir::{CoreArena, CoreExprKind, Interner, Literal, Name, NodeId, PatternKind, Type};
use ailang_link::{DictionarySource, LinkedProgram, ModuleId};
use ailang_types::instance_key;
use rustc_hash::FxHashMap;

use crate::dict;
use crate::effects::{self, EffContext};
use crate::environment::Environment;
use crate::errors::RuntimeError;
use crate::value::{Callable, Closure, DictValue, NativeFn, Value};

/// Holds everything evaluation needs once linking has succeeded: each
/// module's arena and a built [`Environment`] of its top-level bindings,
/// the dictionary registry, and a cache of dictionaries already resolved
/// this run (a `DictRef` at the same `(class, type)` always means the same
/// dictionary, so there is no reason to rebuild it on every call).
pub struct Interpreter {
    interner: Rc<Interner>,
    program: LinkedProgram,
    arenas: FxHashMap<ModuleId, Rc<CoreArena>>,
    module_envs: FxHashMap<ModuleId, Environment>,
    effect_registry: FxHashMap<Name, Callable>,
    dict_cache: RefCell<FxHashMap<String, Rc<DictValue>>>,
}

impl Interpreter {
    /// Builds every module's environment in dependency order and wires up
    /// the effect registry, with the default (unseeded clock, no sandbox,
    /// default `Net` limits) effect context. `caps` is the capability set
    /// granted for this run (§6 `--caps`).
    pub fn new(program: LinkedProgram, interner: Rc<Interner>, caps: rustc_hash::FxHashSet<Name>) -> Result<Self, RuntimeError> {
        Interpreter::with_context(program, Rc::clone(&interner), EffContext::new(caps, interner))
    }

    /// As [`Interpreter::new`], but with a caller-built [`EffContext`] — the
    /// `run` command uses this to wire up `--net-*`/`AILANG_SEED`/
    /// `AILANG_FS_SANDBOX` before any module-level effect runs.
    pub fn with_context(program: LinkedProgram, interner: Rc<Interner>, ctx: EffContext) -> Result<Self, RuntimeError> {
        let ctx = Rc::new(RefCell::new(ctx));
        let effect_registry = effects::build_registry(&interner, ctx);

        let mut arenas: FxHashMap<ModuleId, Rc<CoreArena>> = FxHashMap::default();
        for (id, module) in &program.modules {
            arenas.insert(id.clone(), Rc::new(module.core.arena.clone()));
        }

        let mut interp = Interpreter {
            interner,
            program,
            arenas,
            module_envs: FxHashMap::default(),
            effect_registry,
            dict_cache: RefCell::new(FxHashMap::default()),
        };
        interp.build_module_envs()?;
        Ok(interp)
    }

    /// The entry module is the last one linked (§4.D "Loader": dependency
    /// order, every import precedes its importer, and nothing imports the
    /// program's own entry file).
    #[must_use]
    pub fn entry_module(&self) -> Option<&ModuleId> {
        self.program.order.last()
    }

    /// Looks up `name` in the entry module's top-level bindings and applies
    /// it to `args` (`main()` with no CLI argument, `main(arg)` with
    /// `--args-json`, per §6).
    pub fn run_entry(&self, name: Name, args: &[Value]) -> Result<Value, RuntimeError> {
        let entry = self.entry_module().ok_or_else(|| RuntimeError::type_mismatch("a linked program", "an empty program", None))?;
        let env = self.module_envs.get(entry).ok_or_else(|| RuntimeError::type_mismatch("a built module environment", "none", None))?;
        let callee = env
            .lookup(name)
            .ok_or_else(|| RuntimeError::undefined(&self.interner, name, NodeId::from_raw(0)))?;
        if args.is_empty() {
            match &callee {
                Value::Fn(_) => self.apply(callee, args, NodeId::from_raw(0)),
                other => Ok(other.clone()),
            }
        } else {
            self.apply(callee, args, NodeId::from_raw(0))
        }
    }

    fn build_module_envs(&mut self) -> Result<(), RuntimeError> {
        let order = self.program.order.clone();
        for id in &order {
            let env = self.build_one_module_env(&id)?;
            self.module_envs.insert(id.clone(), env);
        }
        Ok(())
    }

    fn build_one_module_env(&self, id: &ModuleId) -> Result<Environment, RuntimeError> {
        let mut env = Environment::new();
        let Some(module) = self.program.modules.get(id) else {
            return Ok(env);
        };

        // Seed imports from each dependency's already-built environment.
        for import in &module.core.imports {
            let Some(target_id) = module.import_targets.get(&import.module_path) else {
                continue;
            };
            let Some(target_env) = self.module_envs.get(target_id) else {
                continue;
            };
            match &import.names {
                ailang_ir::ImportNames::All => {
                    for decl in &self.program.modules[target_id].core.decls {
                        if decl.exported {
                            if let Some(v) = target_env.lookup(decl.name) {
                                env.define(decl.name, v);
                            }
                        }
                    }
                }
                ailang_ir::ImportNames::Selective(names) => {
                    for name in names {
                        if let Some(v) = target_env.lookup(*name) {
                            env.define(*name, v);
                        }
                    }
                }
            }
        }

        let arena = &self.arenas[id];
        for decl in &module.core.decls {
            match &decl.kind {
                ailang_ir::DeclKind::Value { body, .. } => match &arena.get(*body).kind {
                    CoreExprKind::Lambda { params, body: lam_body, .. } => {
                        env.define(
                            decl.name,
                            Value::Fn(Callable::Closure(Rc::new(Closure {
                                params: params.clone(),
                                body: *lam_body,
                                env: env.clone(),
                                arena: Rc::clone(arena),
                            }))),
                        );
                    }
                    CoreExprKind::BuiltinRef(name) => {
                        if let Some(callable) = self.effect_registry.get(name) {
                            env.define(decl.name, Value::Fn(callable.clone()));
                        }
                    }
                    _ => {
                        // Evaluated strictly, in declaration order, against the
                        // bindings seen so far in this module. A failure here
                        // (e.g. a capability-gated effect run at module-load
                        // time) must surface, not vanish into a later, more
                        // confusing `RT_UNDEF` on whatever the binding would
                        // have been.
                        let v = self.eval(arena, *body, &env)?;
                        env.define(decl.name, v);
                    }
                },
                ailang_ir::DeclKind::TypeDef { .. } | ailang_ir::DeclKind::Instance(_) => {}
            }
        }

        Ok(env)
    }

    fn eval_lit(&self, lit: &Literal) -> Value {
        match lit {
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(_) => Value::Float(lit.as_float().unwrap_or(0.0)),
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Str(name) => Value::str(self.interner.resolve(*name)),
            Literal::Unit => Value::Unit,
        }
    }

    fn eval(&self, arena: &Rc<CoreArena>, node: NodeId, env: &Environment) -> Result<Value, RuntimeError> {
        ailang_stack::ensure_sufficient_stack(|| self.eval_inner(arena, node, env))
    }

    /// The tree-walk itself, grown onto a fresh stack segment by [`Interpreter::eval`]
    /// whenever deep recursion (nested `App`/`If`/`Match` with no depth limit of its
    /// own) gets close to exhausting the current one.
    fn eval_inner(&self, arena: &Rc<CoreArena>, node: NodeId, env: &Environment) -> Result<Value, RuntimeError> {
        match &arena.get(node).kind {
            CoreExprKind::Var(name) => env.lookup(*name).ok_or_else(|| RuntimeError::undefined(&self.interner, *name, node)),
            CoreExprKind::Lit(lit) => Ok(self.eval_lit(lit)),
            CoreExprKind::Lambda { params, body, .. } => Ok(Value::Fn(Callable::Closure(Rc::new(Closure {
                params: params.clone(),
                body: *body,
                env: env.clone(),
                arena: Rc::clone(arena),
            })))),
            CoreExprKind::App { func, args } => {
                let callee = self.eval(arena, *func, env)?;
                let arg_vals = args.iter().map(|a| self.eval(arena, *a, env)).collect::<Result<Vec<_>, _>>()?;
                self.apply(callee, &arg_vals, node)
            }
            CoreExprKind::Let { name, value, body } => {
                let v = self.eval(arena, *value, env)?;
                let mut child = env.clone();
                child.push_scope();
                child.define(*name, v);
                self.eval(arena, *body, &child)
            }
            CoreExprKind::LetRec { bindings, body } => {
                let mut child = env.clone();
                child.push_scope();
                for (name, rhs) in bindings {
                    if let CoreExprKind::Lambda { params, body: lam_body, .. } = &arena.get(*rhs).kind {
                        child.define(
                            *name,
                            Value::Fn(Callable::Closure(Rc::new(Closure {
                                params: params.clone(),
                                body: *lam_body,
                                env: child.clone(),
                                arena: Rc::clone(arena),
                            }))),
                        );
                    }
                }
                for (name, rhs) in bindings {
                    if !matches!(arena.get(*rhs).kind, CoreExprKind::Lambda { .. }) {
                        let v = self.eval(arena, *rhs, &child)?;
                        child.define(*name, v);
                    }
                }
                self.eval(arena, *body, &child)
            }
            CoreExprKind::If { cond, then_branch, else_branch } => match self.eval(arena, *cond, env)? {
                Value::Bool(true) => self.eval(arena, *then_branch, env),
                Value::Bool(false) => self.eval(arena, *else_branch, env),
                other => Err(RuntimeError::type_mismatch("Bool", other.type_name(), Some(node))),
            },
            CoreExprKind::Match { scrutinee, arms } => {
                let scrutinee_val = self.eval(arena, *scrutinee, env)?;
                for arm in arms {
                    let mut child = env.clone();
                    child.push_scope();
                    if !bind_pattern(&arm.pattern.kind, &scrutinee_val, &mut child, &self.interner) {
                        continue;
                    }
                    if let Some(guard) = arm.guard {
                        match self.eval(arena, guard, &child)? {
                            Value::Bool(true) => {}
                            Value::Bool(false) => continue,
                            other => return Err(RuntimeError::type_mismatch("Bool", other.type_name(), Some(node))),
                        }
                    }
                    return self.eval(arena, arm.body, &child);
                }
                Err(RuntimeError::NoMatchingArm { node })
            }
            CoreExprKind::Record { fields } => {
                let mut values = fields
                    .iter()
                    .map(|(label, value)| Ok((*label, self.eval(arena, *value, env)?)))
                    .collect::<Result<Vec<_>, RuntimeError>>()?;
                values.sort_by_key(|(label, _)| label.raw());
                Ok(Value::Record(Rc::new(values)))
            }
            CoreExprKind::RecordAccess { record, label } => match self.eval(arena, *record, env)? {
                Value::Record(fields) => fields
                    .iter()
                    .find(|(name, _)| name == label)
                    .map(|(_, v)| v.clone())
                    .ok_or_else(|| RuntimeError::type_mismatch("a record with that field", "a record missing it", Some(node))),
                other => Err(RuntimeError::type_mismatch("Record", other.type_name(), Some(node))),
            },
            CoreExprKind::RecordUpdate { base, updates } => match self.eval(arena, *base, env)? {
                Value::Record(fields) => {
                    let mut merged: Vec<(Name, Value)> = fields.as_ref().clone();
                    for (label, value_node) in updates {
                        let v = self.eval(arena, *value_node, env)?;
                        if let Some(slot) = merged.iter_mut().find(|(name, _)| name == label) {
                            slot.1 = v;
                        } else {
                            merged.push((*label, v));
                        }
                    }
                    merged.sort_by_key(|(label, _)| label.raw());
                    Ok(Value::Record(Rc::new(merged)))
                }
                other => Err(RuntimeError::type_mismatch("Record", other.type_name(), Some(node))),
            },
            CoreExprKind::List(items) => {
                let values = items.iter().map(|n| self.eval(arena, *n, env)).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(Rc::new(values)))
            }
            CoreExprKind::Tuple(items) => {
                let values = items.iter().map(|n| self.eval(arena, *n, env)).collect::<Result<Vec<_>, _>>()?;
                Ok(Value::Tuple(Rc::new(values)))
            }
            CoreExprKind::Intrinsic { op, args } => self.eval_intrinsic(arena, op, args, env, node),
            CoreExprKind::DictRef { class, ty } => {
                let dict = self.resolve_dict(*class, ty, node)?;
                Ok(Value::Dict(dict))
            }
            CoreExprKind::DictApp { dict, method, args } => {
                let dict_val = match self.eval(arena, *dict, env)? {
                    Value::Dict(d) => d,
                    other => return Err(RuntimeError::type_mismatch("a class dictionary", other.type_name(), Some(node))),
                };
                let arg_vals = args.iter().map(|a| self.eval(arena, *a, env)).collect::<Result<Vec<_>, _>>()?;
                self.apply_dict_method(&dict_val, *method, &arg_vals, node)
            }
            CoreExprKind::BuiltinRef(name) => self
                .effect_registry
                .get(name)
                .map(|c| Value::Fn(c.clone()))
                .ok_or_else(|| RuntimeError::undefined(&self.interner, *name, node)),
        }
    }

    /// `++` is the one intrinsic lowering never rewrites into a `DictApp`
    /// (§4.C table): it works on `String` and `List` alike, neither of
    /// which is backed by a user-extensible class.
    fn eval_intrinsic(
        &self,
        arena: &Rc<CoreArena>,
        op: &ailang_ir::IntrinsicOp,
        args: &[NodeId],
        env: &Environment,
        node: NodeId,
    ) -> Result<Value, RuntimeError> {
        match op {
            ailang_ir::IntrinsicOp::Concat => {
                let lhs_node = *args.first().ok_or_else(|| RuntimeError::type_mismatch("two arguments", "none", Some(node)))?;
                let rhs_node = *args.get(1).ok_or_else(|| RuntimeError::type_mismatch("two arguments", "one", Some(node)))?;
                let lhs = self.eval(arena, lhs_node, env)?;
                let rhs = self.eval(arena, rhs_node, env)?;
                match (lhs, rhs) {
                    (Value::Str(a), Value::Str(b)) => Ok(Value::str(format!("{a}{b}"))),
                    (Value::List(a), Value::List(b)) => {
                        let mut merged = a.as_ref().clone();
                        merged.extend(b.as_ref().clone());
                        Ok(Value::List(Rc::new(merged)))
                    }
                    (other, _) => Err(RuntimeError::type_mismatch("String or List", other.type_name(), Some(node))),
                }
            }
            // Every other intrinsic is rewritten to a `DictApp` by lowering;
            // reaching one here means lowering did not run on this node.
            _ => Err(RuntimeError::type_mismatch("a lowered operator", "a raw intrinsic", Some(node))),
        }
    }

    fn apply(&self, callee: Value, args: &[Value], node: NodeId) -> Result<Value, RuntimeError> {
        match callee {
            Value::Fn(Callable::Closure(closure)) => {
                if closure.params.len() != args.len() {
                    return Err(RuntimeError::type_mismatch("matching argument count", "a different argument count", Some(node)));
                }
                let mut call_env = closure.env.clone();
                call_env.push_scope();
                for (param, arg) in closure.params.iter().zip(args) {
                    call_env.define(*param, arg.clone());
                }
                self.eval(&closure.arena, closure.body, &call_env)
            }
            Value::Fn(Callable::Native(native)) => {
                if native.arity != args.len() {
                    return Err(RuntimeError::type_mismatch("matching argument count", "a different argument count", Some(node)));
                }
                (native.call)(args)
            }
            other => Err(RuntimeError::type_mismatch("Function", other.type_name(), Some(node))),
        }
    }

    fn apply_dict_method(&self, dict: &DictValue, method: Name, args: &[Value], node: NodeId) -> Result<Value, RuntimeError> {
        if let Some(callable) = dict.methods.get(&method) {
            return self.apply(Value::Fn(callable.clone()), args, node);
        }
        if let Some(ord) = &dict.derived_eq_from {
            return self.derive_eq_method(ord, method, args, node);
        }
        Err(RuntimeError::type_mismatch("a dictionary method", "a missing one", Some(node)))
    }

    /// Superclass provision (§4.D): no direct `Eq` instance existed, so
    /// `eq`/`neq` are derived from the `Ord` instance's `lt`.
    fn derive_eq_method(&self, ord: &DictValue, method: Name, args: &[Value], node: NodeId) -> Result<Value, RuntimeError> {
        let lt_name = self.interner.intern("lt");
        let lt = ord
            .methods
            .get(&lt_name)
            .cloned()
            .ok_or_else(|| RuntimeError::type_mismatch("an Ord dictionary with lt", "one without it", Some(node)))?;
        let a = args.first().cloned().ok_or_else(|| RuntimeError::type_mismatch("argument", "nothing", Some(node)))?;
        let b = args.get(1).cloned().ok_or_else(|| RuntimeError::type_mismatch("argument", "nothing", Some(node)))?;
        let lt_ab = as_bool(self.apply(Value::Fn(lt.clone()), &[a.clone(), b.clone()], node)?, node)?;
        let lt_ba = as_bool(self.apply(Value::Fn(lt), &[b, a], node)?, node)?;
        let equal = !lt_ab && !lt_ba;
        if method == self.interner.intern("eq") {
            Ok(Value::Bool(equal))
        } else if method == self.interner.intern("neq") {
            Ok(Value::Bool(!equal))
        } else {
            Err(RuntimeError::type_mismatch("eq or neq", "another Eq method", Some(node)))
        }
    }

    fn resolve_dict(&self, class: Name, ty: &Type, node: NodeId) -> Result<Rc<DictValue>, RuntimeError> {
        let key = instance_key(class, ty);
        if let Some(cached) = self.dict_cache.borrow().get(&key) {
            return Ok(Rc::clone(cached));
        }

        let lookup = self
            .program
            .registry
            .resolve(class, ty, &self.interner)
            .ok_or_else(|| RuntimeError::type_mismatch("a registered class instance", "none (should have been caught at link time)", Some(node)))?;

        let dict_value = match &lookup.source {
            DictionarySource::Builtin if lookup.via_superclass => {
                let ord = dict::builtin_dict(Name::ORD, ty, &self.interner)
                    .ok_or_else(|| RuntimeError::type_mismatch("a builtin Ord dictionary", "none", Some(node)))?;
                let ty_name = ord.ty_name.clone();
                DictValue { class: Name::EQ, ty_name, methods: FxHashMap::default(), derived_eq_from: Some(Rc::new(ord)) }
            }
            DictionarySource::Builtin => dict::builtin_dict(class, ty, &self.interner)
                .ok_or_else(|| RuntimeError::type_mismatch("a builtin dictionary", "none", Some(node)))?,
            DictionarySource::Instance { module, methods } if lookup.via_superclass => {
                let ord = self.build_instance_dict(Name::ORD, ty, module, methods)?;
                DictValue { class: Name::EQ, ty_name: ord.ty_name.clone(), methods: FxHashMap::default(), derived_eq_from: Some(Rc::new(ord)) }
            }
            DictionarySource::Instance { module, methods } => self.build_instance_dict(class, ty, module, methods)?,
        };

        let rc = Rc::new(dict_value);
        self.dict_cache.borrow_mut().insert(key, Rc::clone(&rc));
        Ok(rc)
    }

    fn build_instance_dict(&self, class: Name, ty: &Type, module: &ModuleId, methods: &FxHashMap<Name, NodeId>) -> Result<DictValue, RuntimeError> {
        let module_env = self
            .module_envs
            .get(module)
            .ok_or_else(|| RuntimeError::type_mismatch("a built module environment", "none", None))?;
        let arena = &self.arenas[module];
        let mut built: FxHashMap<Name, Callable> = FxHashMap::default();
        for (method_name, body_node) in methods {
            let callable = match &arena.get(*body_node).kind {
                CoreExprKind::Lambda { params, body, .. } => Callable::Closure(Rc::new(Closure {
                    params: params.clone(),
                    body: *body,
                    env: module_env.clone(),
                    arena: Rc::clone(arena),
                })),
                _ => {
                    let value = self.eval(arena, *body_node, module_env)?;
                    Callable::Native(Rc::new(NativeFn { name: "instance-method", arity: 0, call: Box::new(move |_| Ok(value.clone())) }))
                }
            };
            built.insert(*method_name, callable);
        }
        let ty_name = match ty {
            Type::Con(con) => self.interner.resolve(*con),
            _ => String::from("?"),
        };
        Ok(DictValue { class, ty_name, methods: built, derived_eq_from: None })
    }
}

fn as_bool(v: Value, node: NodeId) -> Result<bool, RuntimeError> {
    match v {
        Value::Bool(b) => Ok(b),
        other => Err(RuntimeError::type_mismatch("Bool", other.type_name(), Some(node))),
    }
}

/// Matches `value` against `pattern`, defining every bound name in `env` on
/// success. Returns `false` (with `env` left untouched by the caller's
/// fresh-scope discipline) on a mismatch — the caller pushes a brand new
/// scope per arm attempt, so a failed match's partial bindings are simply
/// discarded along with that scope.
fn bind_pattern(pattern: &PatternKind, value: &Value, env: &mut Environment, interner: &Interner) -> bool {
    match pattern {
        PatternKind::Wildcard => true,
        PatternKind::Var(name) => {
            env.define(*name, value.clone());
            true
        }
        PatternKind::Lit(lit) => literal_matches(lit, value, interner),
        PatternKind::Tuple(patterns) => match value {
            Value::Tuple(items) if items.len() == patterns.len() => {
                patterns.iter().zip(items.iter()).all(|(p, v)| bind_pattern(&p.kind, v, env, interner))
            }
            _ => false,
        },
        PatternKind::Record(fields) => match value {
            Value::Record(record_fields) => fields.iter().all(|(label, pat)| {
                record_fields
                    .iter()
                    .find(|(name, _)| name == label)
                    .is_some_and(|(_, v)| bind_pattern(&pat.kind, v, env, interner))
            }),
            _ => false,
        },
        PatternKind::Constructor { ctor, args, .. } => match value {
            Value::Data { ctor: value_ctor, args: value_args } if value_ctor == ctor && value_args.len() == args.len() => {
                args.iter().zip(value_args.iter()).all(|(p, v)| bind_pattern(&p.kind, v, env, interner))
            }
            _ => false,
        },
    }
}

fn literal_matches(lit: &Literal, value: &Value, interner: &Interner) -> bool {
    match (lit, value) {
        (Literal::Int(a), Value::Int(b)) => a == b,
        (Literal::Bool(a), Value::Bool(b)) => a == b,
        (Literal::Unit, Value::Unit) => true,
        (Literal::Float(_), Value::Float(b)) => lit.as_float() == Some(*b),
        (Literal::Str(name), Value::Str(s)) => interner.resolve(*name) == s.as_ref(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempDir(std::path::PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("ailang_eval_test_{tag}_{}", std::process::id()));
            std::fs::create_dir_all(&dir).expect("create scratch dir");
            TempDir(dir)
        }

        fn write(&self, relative: &str, contents: &str) -> std::path::PathBuf {
            let path = self.0.join(relative);
            std::fs::write(&path, contents).expect("write source file");
            path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn evaluates_arithmetic_through_the_num_dictionary() {
        let interner = Rc::new(Interner::new());
        let dir = TempDir::new("arith");
        let entry_path = dir.write("main.ail", "func main() -> Int { 1 + 2 * 3 }");
        let program = ailang_link::load_and_link(&entry_path, &interner).expect("program links");

        let interp = Interpreter::new(program, Rc::clone(&interner), rustc_hash::FxHashSet::default()).expect("module envs build");
        let main = interner.intern("main");
        let value = interp.run_entry(main, &[]).expect("main evaluates");
        assert!(matches!(value, Value::Int(7)));
    }

    #[test]
    fn undefined_variable_is_reported_as_rt_undef() {
        let interner = Rc::new(Interner::new());
        let dir = TempDir::new("undef_value");
        let entry_path = dir.write("main.ail", "func main() -> Int { doesNotExist }");
        let link_result = ailang_link::load_and_link(&entry_path, &interner);
        // An unresolved variable is normally caught at type-check time; this
        // test only documents the evaluator's own fallback if it weren't.
        assert!(link_result.is_err());
    }
}
