//! Synthetic `std.io` / `std.fs` / `std.clock` / `std.net` modules.
//!
//! There is no `.ail` source for these: each export is built directly as a
//! `CoreModule` declaration whose body is a [`CoreExprKind::BuiltinRef`], so
//! importing modules see ordinary exported names and the evaluator's effect
//! dispatch (§4.E) picks the native implementation up by name at call time.

use ailang_ir::{CoreArena, CoreExprKind, CoreModule, Decl, DeclKind, Import, Interner, Row, RowKind, Scheme, Span, Type};

use crate::loader::{LoadedModule, ModuleId};

/// One native function a stdlib module exports, named the way the
/// evaluator's effect registry looks it up: `(effect, operation)`.
struct Builtin {
    name: &'static str,
    effect: &'static str,
    operation: &'static str,
    ty: Type,
}

fn io_builtins() -> Vec<Builtin> {
    vec![
        Builtin { name: "print", effect: "IO", operation: "print", ty: Type::pure_fun(vec![Type::string()], Type::unit()) },
        Builtin { name: "println", effect: "IO", operation: "println", ty: Type::pure_fun(vec![Type::string()], Type::unit()) },
        Builtin { name: "readLine", effect: "IO", operation: "readLine", ty: Type::pure_fun(vec![], Type::string()) },
    ]
}

fn fs_builtins() -> Vec<Builtin> {
    vec![
        Builtin { name: "readFile", effect: "FS", operation: "readFile", ty: Type::pure_fun(vec![Type::string()], Type::string()) },
        Builtin { name: "writeFile", effect: "FS", operation: "writeFile", ty: Type::pure_fun(vec![Type::string(), Type::string()], Type::unit()) },
        Builtin { name: "exists", effect: "FS", operation: "exists", ty: Type::pure_fun(vec![Type::string()], Type::bool()) },
    ]
}

fn clock_builtins() -> Vec<Builtin> {
    vec![
        Builtin { name: "now", effect: "Clock", operation: "now", ty: Type::pure_fun(vec![], Type::int()) },
        Builtin { name: "sleep", effect: "Clock", operation: "sleep", ty: Type::pure_fun(vec![Type::int()], Type::unit()) },
    ]
}

fn net_builtins(interner: &Interner) -> Vec<Builtin> {
    // `httpGet`/`httpPost` return the response body directly (§4.E table);
    // only the structured `httpRequest` returns a `Result<Response, NetError>`,
    // here a concrete `NetResult` ADT with `Ok`/`Err` constructors (see
    // `net_result_typedef`) rather than a bare placeholder type.
    let result_ty = Type::Con(interner.intern("NetResult"));
    vec![
        Builtin { name: "httpGet", effect: "Net", operation: "httpGet", ty: Type::pure_fun(vec![Type::string()], Type::string()) },
        Builtin { name: "httpPost", effect: "Net", operation: "httpPost", ty: Type::pure_fun(vec![Type::string(), Type::string()], Type::string()) },
        Builtin {
            name: "httpRequest",
            effect: "Net",
            operation: "httpRequest",
            // (method, url, headers, body) -> Result<Response, NetError>
            ty: Type::pure_fun(vec![Type::string(), Type::string(), Type::string(), Type::string()], result_ty),
        },
    ]
}

/// `Response { status: Int, headers: [(String, String)], body: String }` —
/// an anonymous record, matching the evaluator's `ok_response` (§4.E).
fn response_record_ty(interner: &Interner) -> Type {
    Type::Record(Row::closed(
        RowKind::Record,
        vec![
            (interner.intern("status"), Type::int()),
            (interner.intern("headers"), Type::list(Type::Tuple(vec![Type::string(), Type::string()]))),
            (interner.intern("body"), Type::string()),
        ],
    ))
}

/// `NetError { code: String, message: String }`, matching `err_response`.
fn net_error_record_ty(interner: &Interner) -> Type {
    Type::Record(Row::closed(
        RowKind::Record,
        vec![
            (interner.intern("code"), Type::string()),
            (interner.intern("message"), Type::string()),
        ],
    ))
}

/// The `NetResult` ADT declaration: `Ok(Response) | Err(NetError)`. Registered
/// as a real `TypeDef` (not just a `Type::Con` placeholder) so `Ok`/`Err`
/// resolve as constructors during both local and cross-module pattern
/// matching against `httpRequest`'s return value (§4.D constructor export).
fn net_result_typedef(interner: &Interner) -> Decl {
    Decl {
        name: interner.intern("NetResult"),
        exported: true,
        kind: DeclKind::TypeDef {
            constructors: vec![
                (interner.intern("Ok"), vec![response_record_ty(interner)]),
                (interner.intern("Err"), vec![net_error_record_ty(interner)]),
            ],
        },
        span: Span::DUMMY,
    }
}

/// Maps a dotted import path (e.g. `"std.io"`) to its stable `ModuleId`, or
/// `None` if it does not name an embedded stdlib module.
#[must_use]
pub fn module_id(dotted: &str) -> Option<ModuleId> {
    matches!(dotted, "std.io" | "std.fs" | "std.clock" | "std.net").then(|| dotted.to_string())
}

/// Builds the synthetic module for `id` (must be one `module_id` recognizes).
#[must_use]
pub fn build(id: &str, interner: &Interner) -> LoadedModule {
    let builtins = match id {
        "std.io" => io_builtins(),
        "std.fs" => fs_builtins(),
        "std.clock" => clock_builtins(),
        "std.net" => net_builtins(interner),
        other => unreachable!("not a stdlib module id: {other}"),
    };

    let mut arena = CoreArena::new();
    let mut decls = Vec::with_capacity(builtins.len());
    for b in builtins {
        let builtin_name = interner.intern(&format!("{}.{}", b.effect, b.operation));
        let body = arena.alloc(Span::DUMMY, CoreExprKind::BuiltinRef(builtin_name));
        decls.push(Decl {
            name: interner.intern(b.name),
            exported: true,
            kind: DeclKind::Value {
                body,
                scheme: Some(Scheme::monomorphic(b.ty)),
            },
            span: Span::DUMMY,
        });
    }
    if id == "std.net" {
        decls.push(net_result_typedef(interner));
    }

    let core = CoreModule {
        path: interner.intern(id),
        imports: Vec::<Import>::new(),
        decls,
        arena,
        is_script: false,
    };

    LoadedModule {
        id: id.to_string(),
        file: id.to_string(),
        core,
        import_targets: rustc_hash::FxHashMap::default(),
    }
}
