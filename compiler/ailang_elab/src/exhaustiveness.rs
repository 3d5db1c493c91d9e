//! Pattern-exhaustiveness warning for `match` (ELB004).
//!
//! A full Maranget-style usefulness check belongs in the type checker,
//! where constructor arities and ADT definitions are known; at elaboration
//! time we only have the shape of the patterns themselves. So this is
//! deliberately conservative: a `match` is accepted as exhaustive only when
//! its last arm is an unguarded `Wildcard` or `Var` (a catch-all), which is
//! how exhaustiveness is written in practice. Anything else is warned on,
//! even if it happens to be exhaustive over a small enum — a false warning
//! there is cheap; a missed non-exhaustive match is not.

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{CoreMatchArm, PatternKind, SourceSpan, Span};

#[must_use]
pub fn is_catch_all(arm: &CoreMatchArm) -> bool {
    arm.guard.is_none() && matches!(arm.pattern.kind, PatternKind::Wildcard | PatternKind::Var(_))
}

#[must_use]
pub fn check_exhaustive(arms: &[CoreMatchArm], span: Span, file: &str) -> Option<Diagnostic> {
    if arms.last().is_some_and(is_catch_all) {
        return None;
    }
    Some(
        Diagnostic::new(
            ErrorCode::ELB004(),
            Phase::Elab,
            "this `match` has no arm that catches every remaining case",
        )
        .warning()
        .with_span(SourceSpan::new(file, span)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ailang_ir::{Literal, Name, NodeId, Pattern};

    fn arm(kind: PatternKind, guard: Option<NodeId>) -> CoreMatchArm {
        CoreMatchArm {
            pattern: Pattern {
                span: Span::new(0, 1),
                kind,
            },
            guard,
            body: NodeId::from_raw(0),
        }
    }

    #[test]
    fn trailing_wildcard_is_exhaustive() {
        let arms = vec![
            arm(PatternKind::Lit(Literal::Int(1)), None),
            arm(PatternKind::Wildcard, None),
        ];
        assert!(check_exhaustive(&arms, Span::new(0, 1), "t.ail").is_none());
    }

    #[test]
    fn trailing_var_is_exhaustive() {
        let arms = vec![arm(PatternKind::Var(Name::from_raw(0)), None)];
        assert!(check_exhaustive(&arms, Span::new(0, 1), "t.ail").is_none());
    }

    #[test]
    fn guarded_trailing_wildcard_is_not_exhaustive() {
        let arms = vec![arm(PatternKind::Wildcard, Some(NodeId::from_raw(0)))];
        assert!(check_exhaustive(&arms, Span::new(0, 1), "t.ail").is_some());
    }

    #[test]
    fn only_literal_arms_warn() {
        let arms = vec![
            arm(PatternKind::Lit(Literal::Bool(true)), None),
            arm(PatternKind::Lit(Literal::Bool(false)), None),
        ];
        let diag = check_exhaustive(&arms, Span::new(0, 1), "t.ail");
        assert!(diag.is_some());
        assert_eq!(diag.unwrap().code, ErrorCode::ELB004());
    }
}
