//! Source location spans.
//!
//! Compact 8-byte span: two `u32` byte offsets into the originating file.

use std::fmt;

/// A half-open byte range `[start, end)` into a source file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span for synthesized nodes that have no source location.
    pub const DUMMY: Span = Span { start: 0, end: 0 };

    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Span { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    #[must_use]
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    #[must_use]
    pub fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A span paired with the path of the file it was taken from.
///
/// Most of the pipeline threads a bare [`Span`] and resolves the file from
/// context; the diagnostic layer needs the file too, so it carries both.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceSpan {
    pub file: String,
    pub span: Span,
}

impl SourceSpan {
    #[must_use]
    pub fn new(file: impl Into<String>, span: Span) -> Self {
        SourceSpan {
            file: file.into(),
            span,
        }
    }
}
