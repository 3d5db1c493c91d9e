//! Runtime values (§4.E).
//!
//! Strings are owned (`Rc<str>`), independent of the compiler's `Interner`:
//! most strings a running program touches (HTTP bodies, `readFile` output,
//! `++` results) are never interned, so paying an intern/resolve round trip
//! for every one of them would be pure overhead. String *literals* are
//! resolved out of the `Interner` once, at the point the `Lit` node is
//! evaluated, into an owned `Rc<str>`.

use std::fmt;
use std::rc::Rc;

use ailang_ir::{CoreArena, Name, NodeId};

use crate::environment::Environment;

/// A function value: either a source closure or a native builtin.
#[derive(Clone)]
pub enum Callable {
    Closure(Rc<Closure>),
    Native(Rc<NativeFn>),
}

pub struct Closure {
    pub params: Vec<Name>,
    pub body: NodeId,
    pub env: Environment,
    /// The arena `body` indexes into — a closure can be called from a
    /// module other than the one that defined it, so it carries its own
    /// arena rather than borrowing the caller's.
    pub arena: Rc<CoreArena>,
}

/// A dictionary method or effect operation implemented directly in Rust,
/// rather than as a Core closure.
pub struct NativeFn {
    pub name: &'static str,
    pub arity: usize,
    #[allow(clippy::type_complexity)]
    pub call: Box<dyn Fn(&[Value]) -> Result<Value, crate::errors::RuntimeError>>,
}

#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(Rc<str>),
    Unit,
    Fn(Callable),
    /// Record value: sorted by label so two structurally-equal records have
    /// the same field order (mirrors `Row`'s label-sorted invariant).
    Record(Rc<Vec<(Name, Value)>>),
    List(Rc<Vec<Value>>),
    Tuple(Rc<Vec<Value>>),
    /// An algebraic data type value: the constructor name plus its
    /// arguments, e.g. `Some(1)` or `Response { status: 200, ... }` modeled
    /// through a record argument.
    Data { ctor: Name, args: Rc<Vec<Value>> },
    /// A resolved class dictionary: method name to its implementation.
    Dict(Rc<DictValue>),
}

pub struct DictValue {
    pub class: Name,
    pub ty_name: String,
    pub methods: rustc_hash::FxHashMap<Name, Callable>,
    /// Set only for an `Eq` dictionary produced through superclass
    /// provision (§4.D "Instance resolution respects superclass
    /// provision"): no direct `Eq` instance existed, so `eq`/`neq` fall
    /// back to deriving from this `Ord` dictionary's `lt` method.
    pub derived_eq_from: Option<Rc<DictValue>>,
}

impl Value {
    #[must_use]
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Value::Str(s.into())
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::Str(_) => "String",
            Value::Unit => "Unit",
            Value::Fn(_) => "Function",
            Value::Record(_) => "Record",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Data { .. } => "Data",
            Value::Dict(_) => "Dict",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Unit => write!(f, "Unit"),
            Value::Fn(_) => write!(f, "Fn"),
            Value::Record(fields) => f.debug_map().entries(fields.iter().map(|(k, v)| (k.raw(), v))).finish(),
            Value::List(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Tuple(items) => f.debug_tuple("Tuple").field(&items.as_ref()).finish(),
            Value::Data { ctor, args } => f.debug_tuple("Data").field(&ctor.raw()).field(&args.as_ref()).finish(),
            Value::Dict(d) => write!(f, "Dict({})", d.ty_name),
        }
    }
}
