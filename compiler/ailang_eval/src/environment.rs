//! Variable environment (§5 "immutable cons-lists": shadowing allocates a
//! new binding, never mutates an existing one).
//!
//! A cons-list of scopes shared by `Rc`, with `Mutability`/`assign`
//! dropped entirely: AILANG has no mutable rebinding, so every binding is
//! write-once and `Scope::assign`'s "is this mutable" branch has no
//! counterpart here.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use ailang_ir::Name;
use rustc_hash::FxHashMap;

use crate::value::Value;

/// Single-threaded reference-counted interior mutability, factory-only.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    #[must_use]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    bindings: FxHashMap<Name, Value>,
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        Scope::default()
    }

    #[must_use]
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    pub fn define(&mut self, name: Name, value: Value) {
        self.bindings.insert(name, value);
    }

    #[must_use]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.borrow().lookup(name))
    }
}

/// A scope stack: the current scope shares its tail with every ancestor,
/// so pushing a scope never copies the bindings already in view.
pub struct Environment {
    scopes: Vec<LocalScope<Scope>>,
    global: LocalScope<Scope>,
}

impl Environment {
    #[must_use]
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        self.scopes.push(LocalScope::new(Scope::with_parent(parent)));
    }

    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    pub fn define(&mut self, name: Name, value: Value) {
        self.current_scope().borrow_mut().define(name, value);
    }

    #[must_use]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.current_scope().borrow().lookup(name)
    }

    pub fn define_global(&mut self, name: Name, value: Value) {
        self.global.borrow_mut().define(name, value);
    }

    /// A fresh environment sharing the same global scope but starting a new
    /// local scope stack — used to enter a function call.
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }
}

impl Clone for Environment {
    /// Closures capture their defining environment by reference: cloning
    /// shares the same scope chain rather than copying bindings.
    fn clone(&self) -> Self {
        Environment {
            scopes: self.scopes.clone(),
            global: self.global.clone(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::Interner;

    #[test]
    fn lookup_finds_a_defined_binding() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::Int(42));
        assert!(matches!(env.lookup(x), Some(Value::Int(42))));
    }

    #[test]
    fn shadowing_in_a_child_scope_does_not_affect_the_parent() {
        let interner = Interner::new();
        let x = interner.intern("x");
        let mut env = Environment::new();
        env.define(x, Value::Int(1));
        env.push_scope();
        env.define(x, Value::Int(2));
        assert!(matches!(env.lookup(x), Some(Value::Int(2))));
        env.pop_scope();
        assert!(matches!(env.lookup(x), Some(Value::Int(1))));
    }

    #[test]
    fn child_environment_sees_globals_but_not_caller_locals() {
        let interner = Interner::new();
        let g = interner.intern("g");
        let local = interner.intern("local");
        let mut env = Environment::new();
        env.define_global(g, Value::Int(7));
        env.define(local, Value::Int(9));

        let child = env.child();
        assert!(matches!(child.lookup(g), Some(Value::Int(7))));
        assert!(child.lookup(local).is_none());
    }

    #[test]
    fn undefined_name_looks_up_to_none() {
        let interner = Interner::new();
        let missing = interner.intern("missing");
        let env = Environment::new();
        assert!(env.lookup(missing).is_none());
    }
}
