//! Tree-walking evaluator (§4.E "Evaluation").
//!
//! Consumes a [`ailang_link::LinkedProgram`] — every module checked,
//! lowered, and dictionary-resolved — and runs it: builds each module's
//! top-level environment in dependency order, then applies the requested
//! entry point. Values, environments, and class dictionaries are the
//! evaluator's own vocabulary; everything upstream of linking is someone
//! else's concern.

mod dict;
mod effects;
mod environment;
mod errors;
mod interpreter;
mod value;

pub use effects::{ClockCtx, EffContext, NetConfig};
pub use environment::Environment;
pub use errors::{NetError, RuntimeError};
pub use interpreter::Interpreter;
pub use value::{Callable, Closure, DictValue, NativeFn, Value};
