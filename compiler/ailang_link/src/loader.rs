//! Recursive module loader (§4.D "Loader").
//!
//! Given an entry file, loads it and every module it transitively imports,
//! detects import cycles, and returns modules in an order where every
//! module's imports precede it. Module identity is the import's canonical
//! filesystem path (or a fixed `std.*` key for the embedded stdlib);
//! duplicate imports of the same module are loaded once and cached.

use std::path::{Path, PathBuf};

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{CoreModule, Interner, Name, SourceSpan};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::stdlib;

pub type ModuleId = String;

pub struct LoadedModule {
    pub id: ModuleId,
    pub file: String,
    pub core: CoreModule,
    /// Each import's `module_path` resolved to the `ModuleId` it actually
    /// loaded as, so the linker never has to re-derive filesystem paths
    /// from a dotted name.
    pub import_targets: FxHashMap<Name, ModuleId>,
}

pub struct LoadResult {
    /// Dependency order: every module's imports appear before it.
    pub order: Vec<ModuleId>,
    pub modules: FxHashMap<ModuleId, LoadedModule>,
}

/// Loads `entry_path` and everything it imports, topologically sorted.
pub fn load(entry_path: &Path, interner: &Interner) -> Result<LoadResult, Vec<Diagnostic>> {
    let mut modules: FxHashMap<ModuleId, LoadedModule> = FxHashMap::default();
    let mut diagnostics = Vec::new();

    let entry_id = canonical_id(entry_path, &mut diagnostics);
    let Some(entry_id) = entry_id else {
        return Err(diagnostics);
    };

    // DFS with an explicit stack so cycles are caught as "still being
    // loaded" rather than "already loaded".
    let mut in_progress: Vec<ModuleId> = Vec::new();
    let mut order: Vec<ModuleId> = Vec::new();
    let mut visited: FxHashSet<ModuleId> = FxHashSet::default();
    let mut std_used: FxHashSet<ModuleId> = FxHashSet::default();

    load_one(
        &entry_id,
        entry_path,
        interner,
        &mut modules,
        &mut order,
        &mut visited,
        &mut in_progress,
        &mut std_used,
        &mut diagnostics,
    );

    if !diagnostics.is_empty() {
        return Err(diagnostics);
    }

    // Stdlib modules have no imports of their own, so any stable order
    // ahead of every user module satisfies the "imports precede" invariant.
    let mut std_ids: Vec<&ModuleId> = std_used.iter().collect();
    std_ids.sort();
    let mut full_order = Vec::with_capacity(std_ids.len() + order.len());
    for id in std_ids {
        modules.insert(id.clone(), stdlib::build(id, interner));
        full_order.push(id.clone());
    }
    full_order.extend(order);

    Ok(LoadResult {
        order: full_order,
        modules,
    })
}

#[allow(clippy::too_many_arguments)]
fn load_one(
    id: &ModuleId,
    path: &Path,
    interner: &Interner,
    modules: &mut FxHashMap<ModuleId, LoadedModule>,
    order: &mut Vec<ModuleId>,
    visited: &mut FxHashSet<ModuleId>,
    in_progress: &mut Vec<ModuleId>,
    std_used: &mut FxHashSet<ModuleId>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if visited.contains(id) {
        return;
    }
    if in_progress.contains(id) {
        let mut trace = in_progress.clone();
        trace.push(id.clone());
        diagnostics.push(
            Diagnostic::new(
                ErrorCode::LDR001(),
                Phase::Load,
                format!("import cycle detected: {}", trace.join(" -> ")),
            )
            .with_data("cycle", serde_json::json!(trace)),
        );
        return;
    }

    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::LDR001(),
                    Phase::Load,
                    format!("could not read module file {}: {e}", path.display()),
                )
                .with_data("search_trace", serde_json::json!([path.display().to_string()])),
            );
            return;
        }
    };

    let (parsed, parse_diags) = ailang_parse::parse_source(&source, id.clone(), interner);
    if !parse_diags.is_empty() {
        diagnostics.extend(parse_diags);
        return;
    }
    let (core, elab_diags) = ailang_elab::elaborate_module(&parsed, interner, id);
    if !elab_diags.is_empty() {
        diagnostics.extend(elab_diags);
        return;
    }

    in_progress.push(id.clone());

    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut import_targets: FxHashMap<Name, ModuleId> = FxHashMap::default();
    for import in &core.imports {
        let dotted = interner.resolve(import.module_path);
        if let Some(std_id) = stdlib::module_id(&dotted) {
            std_used.insert(std_id.clone());
            import_targets.insert(import.module_path, std_id);
            continue;
        }
        let Some(import_path) = resolve_relative(&base_dir, &dotted) else {
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::LDR001(),
                    Phase::Load,
                    format!("module `{dotted}` not found"),
                )
                .with_span(SourceSpan::new(id.clone(), import.span))
                .with_data(
                    "search_trace",
                    serde_json::json!([dotted_to_path(&base_dir, &dotted).display().to_string()]),
                ),
            );
            continue;
        };
        let Some(import_id) = canonical_id(&import_path, diagnostics) else {
            continue;
        };
        import_targets.insert(import.module_path, import_id.clone());
        load_one(
            &import_id,
            &import_path,
            interner,
            modules,
            order,
            visited,
            in_progress,
            std_used,
            diagnostics,
        );
    }

    in_progress.pop();
    visited.insert(id.clone());
    order.push(id.clone());
    modules.insert(
        id.clone(),
        LoadedModule {
            id: id.clone(),
            file: id.clone(),
            core,
            import_targets,
        },
    );
}

fn dotted_to_path(base_dir: &Path, dotted: &str) -> PathBuf {
    let mut path = base_dir.to_path_buf();
    for segment in dotted.split('.') {
        path.push(segment);
    }
    path.set_extension("ail");
    path
}

fn resolve_relative(base_dir: &Path, dotted: &str) -> Option<PathBuf> {
    let path = dotted_to_path(base_dir, dotted);
    path.is_file().then_some(path)
}

fn canonical_id(path: &Path, diagnostics: &mut Vec<Diagnostic>) -> Option<ModuleId> {
    match std::fs::canonicalize(path) {
        Ok(p) => Some(p.display().to_string()),
        Err(e) => {
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::LDR001(),
                    Phase::Load,
                    format!("module not found: {} ({e})", path.display()),
                )
                .with_data("search_trace", serde_json::json!([path.display().to_string()])),
            );
            None
        }
    }
}
