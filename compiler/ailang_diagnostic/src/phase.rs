//! The pipeline phase a diagnostic originated in (§6 "Structured error
//! format", §7).

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Phase {
    Parser,
    Elab,
    Typecheck,
    Lower,
    Link,
    Load,
    Runtime,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Parser => "parser",
            Phase::Elab => "elab",
            Phase::Typecheck => "typecheck",
            Phase::Lower => "lower",
            Phase::Link => "link",
            Phase::Load => "load",
            Phase::Runtime => "runtime",
        };
        f.write_str(s)
    }
}
