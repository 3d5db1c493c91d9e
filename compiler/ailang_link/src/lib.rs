//! Module loader and dictionary linker (§4.D).
//!
//! [`load_and_link`] is the single entry point the `ailang` CLI and any
//! future embedder call: given an entry file, it loads every transitively
//! imported module, type-checks each one with its imports' schemes seeded
//! in, lowers operators to dictionary calls, registers every `instance`
//! declaration, and validates that every `DictRef` and `import` actually
//! resolves. What comes back is everything [`ailang_eval`] needs to run the
//! program, with no further filesystem or name-resolution work left to do.

mod dictionary;
mod linker;
mod loader;
mod stdlib;

use std::path::Path;

use ailang_diagnostic::Diagnostic;
use ailang_ir::{CoreModule, Interner, Name};
use ailang_types::{DefaultingTrace, Env};
use rustc_hash::FxHashMap;

pub use dictionary::{DictionaryLookup, DictionaryRegistry, DictionarySource};
pub use loader::ModuleId;

pub struct LinkedModule {
    pub core: CoreModule,
    pub defaulting_trace: Vec<DefaultingTrace>,
    /// Each import's dotted path resolved to the concrete [`ModuleId`] it
    /// loaded from — the evaluator uses this the same way pass 2 does, to
    /// find which already-built module environment an import's names come
    /// from without re-deriving filesystem paths.
    pub import_targets: FxHashMap<Name, ModuleId>,
}

pub struct LinkedProgram {
    /// Dependency order: every module's imports precede it.
    pub order: Vec<ModuleId>,
    pub modules: FxHashMap<ModuleId, LinkedModule>,
    pub registry: DictionaryRegistry,
}

/// Loads, checks, lowers, and links `entry_path` and everything it
/// transitively imports.
///
/// `file` arguments elsewhere in the pipeline are given module ids as
/// their `file`, so diagnostics from every stage point at the right
/// source.
pub fn load_and_link(entry_path: &Path, interner: &Interner) -> Result<LinkedProgram, Vec<Diagnostic>> {
    let mut loaded = loader::load(entry_path, interner)?;

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut envs: FxHashMap<ModuleId, Env> = FxHashMap::default();
    let mut linked: FxHashMap<ModuleId, LinkedModule> = FxHashMap::default();
    let mut registry = DictionaryRegistry::new(interner);

    // Pass 1: check + lower each module in dependency order, seeding each
    // one's environment from the modules it imports (already checked,
    // since `order` guarantees that).
    for id in &loaded.order {
        let Some(mut module_entry) = loaded.modules.remove(id) else {
            continue;
        };

        let imported_env = build_imported_env(&module_entry, &envs);
        let import_targets = module_entry.import_targets.clone();

        let check_result = ailang_types::check_module_with_imports(
            &mut module_entry.core,
            interner,
            id,
            &imported_env,
        );
        if !check_result.diagnostics.is_empty() {
            diagnostics.extend(check_result.diagnostics);
            continue;
        }

        ailang_types::lower_module(&mut module_entry.core, &check_result.resolved_constraints, interner);

        registry.register_module(id, dictionary::module_instances(&module_entry.core.decls).into_iter());

        let mut exported_env = imported_env;
        for decl in &module_entry.core.decls {
            if !decl.exported {
                continue;
            }
            match &decl.kind {
                ailang_ir::DeclKind::Value { scheme: Some(scheme), .. } => {
                    exported_env.insert(decl.name, scheme.clone());
                }
                // A constructor is visible to an importer the same way
                // `check_module_with_imports` makes it visible locally
                // (§4.D): `Ctor(fields...) -> TypeName`, or a nullary
                // `TypeName` constant. Without this, pattern-matching a
                // stdlib ADT (e.g. `httpRequest`'s `NetResult`) from an
                // importing module would never see `Ok`/`Err` in scope.
                ailang_ir::DeclKind::TypeDef { constructors } => {
                    for (ctor_name, field_tys) in constructors {
                        let ty = if field_tys.is_empty() {
                            ailang_ir::Type::Con(decl.name)
                        } else {
                            ailang_ir::Type::pure_fun(field_tys.clone(), ailang_ir::Type::Con(decl.name))
                        };
                        exported_env.insert(*ctor_name, ailang_ir::Scheme::monomorphic(ty));
                    }
                }
                _ => {}
            }
        }
        envs.insert(id.clone(), exported_env);

        linked.insert(
            id.clone(),
            LinkedModule {
                core: module_entry.core,
                defaulting_trace: check_result.defaulting_trace,
                import_targets,
            },
        );
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    // Pass 2: every module is checked and lowered now, so imports and
    // dictionary references can be validated against the final graph.
    let providers: FxHashMap<ModuleId, &CoreModule> =
        linked.iter().map(|(id, m)| (id.clone(), &m.core)).collect();

    for id in &loaded.order {
        let Some(module) = linked.get(id) else {
            continue;
        };
        diagnostics.extend(linker::validate_imports(
            id,
            &module.core,
            &module.import_targets,
            &providers,
            interner,
        ));
        diagnostics.extend(linker::resolve_dictionaries(id, &module.core, &registry, interner));
    }

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    Ok(LinkedProgram {
        order: loaded.order,
        modules: linked,
        registry,
    })
}

fn build_imported_env(module: &loader::LoadedModule, envs: &FxHashMap<ModuleId, Env>) -> Env {
    let mut env = Env::default();
    for import in &module.core.imports {
        let Some(target_id) = module.import_targets.get(&import.module_path) else {
            continue;
        };
        let Some(target_env) = envs.get(target_id) else {
            continue;
        };
        match &import.names {
            ailang_ir::ImportNames::All => {
                env.extend(target_env.iter().map(|(k, v)| (*k, v.clone())));
            }
            ailang_ir::ImportNames::Selective(names) => {
                for name in names {
                    if let Some(scheme) = target_env.get(name) {
                        env.insert(*name, scheme.clone());
                    }
                }
            }
        }
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_diagnostic::ErrorCode;
    use std::sync::atomic::{AtomicU32, Ordering};

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    /// A scratch directory unique to this test process, cleaned up on drop.
    struct TempDir(std::path::PathBuf);

    impl TempDir {
        fn new() -> Self {
            let n = COUNTER.fetch_add(1, Ordering::Relaxed);
            let dir = std::env::temp_dir().join(format!("ailang_link_test_{}_{n}", std::process::id()));
            std::fs::create_dir_all(&dir).expect("create temp dir");
            TempDir(dir)
        }

        fn write(&self, relative: &str, contents: &str) -> std::path::PathBuf {
            let path = self.0.join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dir");
            }
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
    fn loads_a_single_script_with_no_imports() {
        let dir = TempDir::new();
        let entry = dir.write("main.ail", "1 + 2");
        let interner = Interner::new();
        let program = match load_and_link(&entry, &interner) {
            Ok(p) => p,
            Err(d) => panic!("unexpected diagnostics: {d:?}"),
        };
        assert_eq!(program.order.len(), 1);
    }

    #[test]
    fn loads_a_module_that_imports_another() {
        let dir = TempDir::new();
        dir.write(
            "Util.ail",
            "module Util\nexport func double(x) -> Int { x * 2 }",
        );
        let entry = dir.write("main.ail", "import Util\ndouble(21)");
        let interner = Interner::new();
        let program = match load_and_link(&entry, &interner) {
            Ok(p) => p,
            Err(d) => panic!("unexpected diagnostics: {d:?}"),
        };
        assert_eq!(program.order.len(), 2);
    }

    #[test]
    fn import_cycle_is_reported_as_ldr001() {
        let dir = TempDir::new();
        dir.write("A.ail", "module A\nimport B\nexport let x = 1");
        dir.write("B.ail", "module B\nimport A\nexport let y = 2");
        let entry = dir.0.join("A.ail");
        let interner = Interner::new();
        let diagnostics = match load_and_link(&entry, &interner) {
            Ok(_) => panic!("expected an import cycle to be reported"),
            Err(d) => d,
        };
        assert!(diagnostics.iter().any(|d| d.code == ErrorCode::LDR001()));
    }

    #[test]
    fn selective_import_of_unexported_name_reports_imp010() {
        let dir = TempDir::new();
        dir.write("Util.ail", "module Util\nlet secret = 1");
        let entry = dir.write("main.ail", "import Util (secret)\nsecret");
        let interner = Interner::new();
        let diagnostics = match load_and_link(&entry, &interner) {
            Ok(_) => panic!("expected IMP010 to be reported"),
            Err(d) => d,
        };
        assert!(diagnostics.iter().any(|d| d.code == ErrorCode::IMP010()));
    }
}
