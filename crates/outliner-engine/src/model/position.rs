use serde::{Deserialize, Serialize};

/// A zero-based (line, character) position.
///
/// Positions are only meaningful together with the buffer they were measured
/// in; the tree never stores them, it derives them on demand (see
/// [`crate::model::Root`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub ch: usize,
}

impl Position {
    pub fn new(line: usize, ch: usize) -> Self {
        Self { line, ch }
    }
}

/// An anchor/head selection. `head` is where the cursor blinks; the pair is
/// deliberately not normalized so that direction survives selection edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: Position,
    pub head: Position,
}

impl Selection {
    pub fn new(anchor: Position, head: Position) -> Self {
        Self { anchor, head }
    }

    /// A collapsed selection (plain cursor).
    pub fn cursor(pos: Position) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// True when the head sits before the anchor.
    pub fn is_backward(&self) -> bool {
        self.head < self.anchor
    }

    pub fn min(&self) -> Position {
        min_pos(self.anchor, self.head)
    }

    pub fn max(&self) -> Position {
        max_pos(self.anchor, self.head)
    }
}

pub fn min_pos(a: Position, b: Position) -> Position {
    std::cmp::min(a, b)
}

pub fn max_pos(a: Position, b: Position) -> Position {
    std::cmp::max(a, b)
}

/// Tests whether the inclusive ranges `[a_from, a_to]` and `[b_from, b_to]`
/// share at least one position.
pub fn ranges_intersect(a_from: Position, a_to: Position, b_from: Position, b_to: Position) -> bool {
    a_from <= b_to && b_from <= a_to
}
