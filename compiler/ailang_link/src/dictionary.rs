//! Dictionary registry (§4.D): maps `(class, type)` pairs to the concrete
//! method table a `DictRef` resolves to at link time.
//!
//! Keyed by the same `instance_key` string format the type checker used to
//! resolve class constraints (`ailang_types::instance_key`), so a
//! `ResolvedConstraint` produced during checking and a registry entry
//! produced during linking always agree on identity.

use ailang_ir::{DeclKind, InstanceDecl, Name, NodeId, Type};
use ailang_types::instance_key;
use rustc_hash::FxHashMap;

use crate::loader::ModuleId;

/// Where a dictionary's methods live.
#[derive(Clone, Debug)]
pub enum DictionarySource {
    /// One of the evaluator's native dictionaries (`Num[Int]`, `Eq[Float]`,
    /// ...). The evaluator, not the linker, owns the method implementations;
    /// the linker only needs to know one exists.
    Builtin,
    /// A user-written `instance` declaration: method name to the `NodeId`
    /// of its (already lowered) body, in the module it was declared in.
    Instance {
        module: ModuleId,
        methods: FxHashMap<Name, NodeId>,
    },
}

#[derive(Default)]
pub struct DictionaryRegistry {
    entries: FxHashMap<String, DictionarySource>,
}

/// `(class, type)` pairs the evaluator pre-registers without any `instance`
/// declaration backing them (§4.E "pre-registered built-in dictionaries").
const BUILTIN_INSTANCES: &[(&str, &str)] = &[
    ("Num", "Int"),
    ("Num", "Float"),
    ("Fractional", "Float"),
    ("Integral", "Int"),
    ("Eq", "Int"),
    ("Eq", "Float"),
    ("Eq", "Bool"),
    ("Eq", "String"),
    ("Ord", "Int"),
    ("Ord", "Float"),
    ("Show", "Int"),
    ("Show", "Float"),
    ("Show", "Bool"),
    ("Show", "String"),
];

impl DictionaryRegistry {
    #[must_use]
    pub fn new(interner: &ailang_ir::Interner) -> Self {
        let mut entries = FxHashMap::default();
        for (class, ty) in BUILTIN_INSTANCES {
            let class_name = interner.intern(class);
            let ty_name = interner.intern(ty);
            let key = instance_key(class_name, &Type::Con(ty_name));
            entries.insert(key, DictionarySource::Builtin);
        }
        DictionaryRegistry { entries }
    }

    /// Registers every `instance` declaration found in `module`. Idempotent:
    /// re-registering the same `(class, type)` from the same module is a
    /// no-op rather than an error, since a module can be visited once per
    /// entry point but the registry itself is built once per program.
    pub fn register_module(&mut self, module_id: &ModuleId, instances: impl Iterator<Item = InstanceDecl>) {
        for inst in instances {
            let key = instance_key(inst.class, &inst.head_type);
            let methods: FxHashMap<Name, NodeId> = inst.methods.into_iter().collect();
            self.entries
                .entry(key)
                .or_insert_with(|| DictionarySource::Instance {
                    module: module_id.clone(),
                    methods,
                });
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&DictionarySource> {
        self.entries.get(key)
    }

    /// Superclass provision fallback: an `Ord` instance on a type also
    /// satisfies an `Eq` constraint on that type, even with no direct `Eq`
    /// instance. Deriving `eq`/`neq` from `lt`/`le` is the evaluator's job;
    /// the registry only needs to answer "does something exist".
    #[must_use]
    pub fn resolve(&self, class: Name, ty: &Type, interner: &ailang_ir::Interner) -> Option<DictionaryLookup> {
        let key = instance_key(class, ty);
        if let Some(source) = self.entries.get(&key) {
            return Some(DictionaryLookup {
                key,
                source: source.clone(),
                via_superclass: false,
            });
        }
        if interner.resolve(class) == "Eq" {
            let ord_key = instance_key(interner.intern("Ord"), ty);
            if let Some(source) = self.entries.get(&ord_key) {
                return Some(DictionaryLookup {
                    key: ord_key,
                    source: source.clone(),
                    via_superclass: true,
                });
            }
        }
        None
    }
}

pub struct DictionaryLookup {
    pub key: String,
    pub source: DictionarySource,
    pub via_superclass: bool,
}

/// Pulls every `instance` decl out of a loaded module's declarations, for
/// feeding into [`DictionaryRegistry::register_module`].
#[must_use]
pub fn module_instances(decls: &[ailang_ir::Decl]) -> Vec<InstanceDecl> {
    decls
        .iter()
        .filter_map(|d| match &d.kind {
            DeclKind::Instance(inst) => Some(inst.clone()),
            _ => None,
        })
        .collect()
}
