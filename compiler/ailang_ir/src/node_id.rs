//! Stable node identifiers for Core AST nodes.
//!
//! A `NodeId` is assigned once, when the elaborator allocates a Core node
//! into the arena, and never changes afterwards — even across
//! retypechecking (invariant 1). Because the arena only ever appends, the
//! arena index itself is a stable identity; `NodeId` is that index made
//! into a distinct type so it can't be confused with an unrelated `u32`.

use std::fmt;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        NodeId(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Allocates consecutive `NodeId`s. One instance lives on the elaborator for
/// the duration of a single `elaborate()` call.
#[derive(Default)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    #[must_use]
    pub fn new() -> Self {
        NodeIdGen { next: 0 }
    }

    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
