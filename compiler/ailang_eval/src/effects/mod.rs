//! The effect context and the native effect registry (§4.E).
//!
//! Every effect operation is reached through a `BuiltinRef(Name)` whose
//! name is `"{Effect}.{operation}"` (the same convention
//! `ailang_link::stdlib` uses to build `std.io`/`std.fs`/`std.clock`/
//! `std.net`'s exports). [`build_registry`] builds the matching
//! `Name -> Callable` table once per run, each entry gated by a capability
//! check against the shared [`EffContext`] before it touches the outside
//! world.

mod clock;
mod fs;
mod io;
mod net;

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use ailang_ir::{Interner, Name};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::RuntimeError;
use crate::value::{Callable, NativeFn, Value};

/// Deterministic-clock state (§4.E "Determinism"): when `AILANG_SEED` is
/// set, virtual time starts at 0 and only advances via explicit `sleep`.
pub struct ClockCtx {
    pub virtual_millis: Option<i64>,
}

impl ClockCtx {
    #[must_use]
    pub fn real() -> Self {
        ClockCtx { virtual_millis: None }
    }

    #[must_use]
    pub fn seeded() -> Self {
        ClockCtx { virtual_millis: Some(0) }
    }
}

/// Net capability configuration, built from CLI flags (§6 `run` flags).
pub struct NetConfig {
    pub allow_http: bool,
    pub allow_localhost: bool,
    pub allowlist: Vec<String>,
    pub timeout: Duration,
    pub max_bytes: u64,
    pub max_redirects: u32,
}

impl Default for NetConfig {
    fn default() -> Self {
        NetConfig {
            allow_http: false,
            allow_localhost: false,
            allowlist: Vec::new(),
            timeout: Duration::from_secs(30),
            max_bytes: 10 * 1024 * 1024,
            max_redirects: 5,
        }
    }
}

/// The evaluator's non-owning pointer to the running program's effect
/// configuration (§3 "Relationships and ownership"). Shared by `Rc` between
/// every native effect closure; `RefCell`'d only where a native op truly
/// needs interior mutability (the virtual clock).
pub struct EffContext {
    pub caps: FxHashSet<Name>,
    pub clock: ClockCtx,
    pub net: NetConfig,
    pub fs_sandbox: Option<PathBuf>,
    /// `Net.httpRequest` needs to intern field/constructor names
    /// (`Ok`/`Err`/`status`/...) when it builds a `Response`/`NetError`
    /// value; shared by `Rc` rather than threaded through every native
    /// function's call signature.
    pub interner: Rc<Interner>,
}

impl EffContext {
    #[must_use]
    pub fn new(caps: FxHashSet<Name>, interner: Rc<Interner>) -> Self {
        EffContext { caps, clock: ClockCtx::real(), net: NetConfig::default(), fs_sandbox: None, interner }
    }

    #[must_use]
    pub fn has(&self, effect: Name) -> bool {
        self.caps.contains(&effect)
    }
}

fn capability_gated(
    effect: Name,
    effect_str: &'static str,
    ctx: Rc<RefCell<EffContext>>,
    op: impl Fn(&[Value], &Rc<RefCell<EffContext>>) -> Result<Value, RuntimeError> + 'static,
) -> impl Fn(&[Value]) -> Result<Value, RuntimeError> {
    move |args| {
        if !ctx.borrow().has(effect) {
            return Err(RuntimeError::capability_missing(effect_str, None));
        }
        op(args, &ctx)
    }
}

fn native(name: &'static str, arity: usize, call: impl Fn(&[Value]) -> Result<Value, RuntimeError> + 'static) -> Callable {
    Callable::Native(Rc::new(NativeFn { name, arity, call: Box::new(call) }))
}

/// Builds the `Name -> Callable` table for every operation in §4.E's
/// built-in effects table, keyed the same way [`ailang_link::stdlib`]
/// names its `BuiltinRef`s.
#[must_use]
pub fn build_registry(interner: &Interner, ctx: Rc<RefCell<EffContext>>) -> FxHashMap<Name, Callable> {
    let mut registry = FxHashMap::default();

    registry.insert(
        interner.intern("IO.print"),
        native("IO.print", 1, capability_gated(Name::IO, "IO", Rc::clone(&ctx), io::print)),
    );
    registry.insert(
        interner.intern("IO.println"),
        native("IO.println", 1, capability_gated(Name::IO, "IO", Rc::clone(&ctx), io::println)),
    );
    registry.insert(
        interner.intern("IO.readLine"),
        native("IO.readLine", 0, capability_gated(Name::IO, "IO", Rc::clone(&ctx), io::read_line)),
    );

    registry.insert(
        interner.intern("FS.readFile"),
        native("FS.readFile", 1, capability_gated(Name::FS, "FS", Rc::clone(&ctx), fs::read_file)),
    );
    registry.insert(
        interner.intern("FS.writeFile"),
        native("FS.writeFile", 2, capability_gated(Name::FS, "FS", Rc::clone(&ctx), fs::write_file)),
    );
    registry.insert(
        interner.intern("FS.exists"),
        native("FS.exists", 1, capability_gated(Name::FS, "FS", Rc::clone(&ctx), fs::exists)),
    );

    registry.insert(
        interner.intern("Clock.now"),
        native("Clock.now", 0, capability_gated(Name::CLOCK, "Clock", Rc::clone(&ctx), clock::now)),
    );
    registry.insert(
        interner.intern("Clock.sleep"),
        native("Clock.sleep", 1, capability_gated(Name::CLOCK, "Clock", Rc::clone(&ctx), clock::sleep)),
    );

    registry.insert(
        interner.intern("Net.httpGet"),
        native("Net.httpGet", 1, capability_gated(Name::NET, "Net", Rc::clone(&ctx), net::http_get)),
    );
    registry.insert(
        interner.intern("Net.httpPost"),
        native("Net.httpPost", 2, capability_gated(Name::NET, "Net", Rc::clone(&ctx), net::http_post)),
    );
    registry.insert(
        interner.intern("Net.httpRequest"),
        native("Net.httpRequest", 4, capability_gated(Name::NET, "Net", ctx, net::http_request)),
    );

    registry
}
