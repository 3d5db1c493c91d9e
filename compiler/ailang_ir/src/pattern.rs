//! Patterns, shared by the surface AST and Core `Match`.

use crate::literal::Literal;
use crate::name::Name;
use crate::span::Span;

#[derive(Clone, Debug)]
pub struct Pattern {
    pub span: Span,
    pub kind: PatternKind,
}

#[derive(Clone, Debug)]
pub enum PatternKind {
    Wildcard,
    Var(Name),
    Lit(Literal),
    Tuple(Vec<Pattern>),
    Record(Vec<(Name, Pattern)>),
    /// `Some(x)`, `Cons(h, t)`, `Module.Ctor(args...)`.
    Constructor {
        module: Option<Name>,
        ctor: Name,
        args: Vec<Pattern>,
    },
}

impl Pattern {
    #[must_use]
    pub fn bound_names(&self, out: &mut Vec<Name>) {
        match &self.kind {
            PatternKind::Wildcard | PatternKind::Lit(_) => {}
            PatternKind::Var(n) => out.push(*n),
            PatternKind::Tuple(elems) => {
                for e in elems {
                    e.bound_names(out);
                }
            }
            PatternKind::Record(fields) => {
                for (_, p) in fields {
                    p.bound_names(out);
                }
            }
            PatternKind::Constructor { args, .. } => {
                for a in args {
                    a.bound_names(out);
                }
            }
        }
    }
}
