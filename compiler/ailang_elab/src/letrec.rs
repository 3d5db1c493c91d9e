//! Duplicate-binding detection for `letrec` groups (ELB002).
//!
//! A recursive binding group must give each name exactly one definition;
//! `letrec f = ...; f = ... in ...` has no sensible recursive-closure
//! semantics (which `f` would calls to `f` resolve to?), so it is rejected
//! before it ever reaches the type checker.

use std::collections::HashSet;

use ailang_diagnostic::{Diagnostic, ErrorCode, Phase};
use ailang_ir::{Interner, Name, Span};

/// One diagnostic per name bound more than once, anchored at the span of
/// the repeated (not the original) binding.
pub fn check_duplicate_bindings(
    bindings: &[(Name, Span)],
    interner: &Interner,
    file: &str,
) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();
    for (name, span) in bindings {
        if !seen.insert(*name) {
            let text = interner.resolve(*name);
            diagnostics.push(
                Diagnostic::new(
                    ErrorCode::ELB002(),
                    Phase::Elab,
                    format!("`{text}` is bound more than once in this `letrec`"),
                )
                .with_data("name", text)
                .with_span(ailang_ir::SourceSpan::new(file, *span)),
            );
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_a_name_bound_twice() {
        let interner = Interner::new();
        let f = interner.intern("f");
        let g = interner.intern("g");
        let bindings = vec![
            (f, Span::new(0, 1)),
            (g, Span::new(1, 2)),
            (f, Span::new(2, 3)),
        ];
        let diags = check_duplicate_bindings(&bindings, &interner, "test.ail");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, ErrorCode::ELB002());
    }

    #[test]
    fn accepts_a_group_with_all_distinct_names() {
        let interner = Interner::new();
        let f = interner.intern("f");
        let g = interner.intern("g");
        let bindings = vec![(f, Span::new(0, 1)), (g, Span::new(1, 2))];
        assert!(check_duplicate_bindings(&bindings, &interner, "test.ail").is_empty());
    }
}
