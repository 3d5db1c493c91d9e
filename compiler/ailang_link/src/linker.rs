//! Import validation and dictionary resolution (§4.D "Linker").
//!
//! Two independent checks run over the fully loaded, lowered module graph:
//! every `import` resolves to a name the target module actually exports
//! (`IMP010`/`IMP011`/`IMP012`), and every `DictRef` left behind by lowering
//! (§4.C) resolves to something in the [`DictionaryRegistry`]
//! (`LNK001`).

use std::collections::hash_map::Entry;

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{CoreExprKind, CoreModule, Interner, SourceSpan};
use rustc_hash::FxHashMap;

use crate::dictionary::DictionaryRegistry;
use crate::loader::ModuleId;

/// Validates every import in `module` against the already-loaded
/// `providers` map (module id -> its `CoreModule`). `module_id` is used
/// only to label span diagnostics with the importing file.
pub fn validate_imports(
    module_id: &ModuleId,
    module: &CoreModule,
    import_targets: &FxHashMap<ailang_ir::Name, ModuleId>,
    providers: &FxHashMap<ModuleId, &CoreModule>,
    interner: &Interner,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    // name -> the import it first came from, to catch IMP011.
    let mut brought_in: FxHashMap<ailang_ir::Name, usize> = FxHashMap::default();

    for (idx, import) in module.imports.iter().enumerate() {
        let dotted = interner.resolve(import.module_path);
        let Some(target_id) = import_targets.get(&import.module_path) else {
            // Missing modules are already reported as LDR001 by the loader;
            // nothing more to validate here.
            continue;
        };
        let Some(target) = providers.get(target_id) else {
            continue;
        };

        let exported = target.exported_names();
        let names: Vec<ailang_ir::Name> = match &import.names {
            ailang_ir::ImportNames::All => exported.clone(),
            ailang_ir::ImportNames::Selective(names) => names.clone(),
        };

        if let ailang_ir::ImportNames::Selective(names) = &import.names {
            for name in names {
                if !exported.contains(name) {
                    diagnostics.push(
                        Diagnostic::new(
                            ErrorCode::IMP010(),
                            Phase::Link,
                            format!(
                                "`{}` is not exported by module `{dotted}`",
                                interner.resolve(*name)
                            ),
                        )
                        .with_span(SourceSpan::new(module_id.clone(), import.span))
                        .with_data(
                            "available",
                            serde_json::json!(exported
                                .iter()
                                .map(|n| interner.resolve(*n))
                                .collect::<Vec<_>>()),
                        ),
                    );
                }
            }
        }

        for name in names {
            match brought_in.entry(name) {
                Entry::Occupied(_) => {
                    diagnostics.push(
                        Diagnostic::new(
                            ErrorCode::IMP011(),
                            Phase::Link,
                            format!(
                                "`{}` is imported from more than one module",
                                interner.resolve(name)
                            ),
                        )
                        .with_span(SourceSpan::new(module_id.clone(), import.span)),
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                }
            }
        }
    }

    diagnostics
}

/// Scans `module`'s (already lowered) arena for `DictRef` nodes and checks
/// each resolves to a registry entry. Does not mutate the module: the
/// evaluator recomputes the same `instance_key` from the `DictRef`'s own
/// `(class, ty)` fields at call time, so there is nothing to rewrite here,
/// only a missing-instance diagnostic to raise early instead of at runtime.
pub fn resolve_dictionaries(
    module_id: &ModuleId,
    module: &CoreModule,
    registry: &DictionaryRegistry,
    interner: &Interner,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for node in module.arena.iter() {
        let CoreExprKind::DictRef { class, ty } = &node.kind else {
            continue;
        };
        if registry.resolve(*class, ty, interner).is_none() {
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::LNK001(),
                    Phase::Link,
                    format!(
                        "no instance of `{}` is registered for this type",
                        interner.resolve(*class)
                    ),
                )
                .with_node(node.id)
                .with_span(SourceSpan::new(module_id.clone(), node.span))
                .with_data("class", interner.resolve(*class)),
            );
        }
    }
    diagnostics
}
