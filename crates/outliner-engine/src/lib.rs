//! Core engine for structural editing of indented Markdown-style outlines.
//!
//! The engine turns a flat text region into a tree of list items
//! ([`model::Root`]), runs structural operations on that tree (indent, move,
//! split, merge, drag, selection and fold-aware cursor movement), and writes
//! the result back to the host buffer as a minimal text replacement with
//! cursor and fold state reconciled. Positions are never stored on nodes;
//! they are derived from the tree shape on demand, so an operation only has
//! to get the structure right.
//!
//! Hosts plug in through the [`editor::Reader`] and [`editor::Editor`]
//! traits; [`editor::MemoryEditor`] is the in-memory reference host.

pub mod editing;
pub mod editor;
pub mod model;
pub mod parsing;

pub use editing::{Outcome, apply};
pub use editor::{Editor, IndentDefaults, MemoryEditor, Reader};
pub use model::{ListNode, NodeId, Position, Root, Selection};
pub use parsing::{ParseError, parse, try_parse};
