//! The operation catalog: pure tree mutations, one family per module.
//!
//! Every operation takes the parsed [`Root`], mutates it (and its
//! selections) in place, and reports through [`Outcome`] whether the caller
//! must run the change applicator or fall through to the host default.
//! Structural operations refuse multi-selection roots; multi-cursor
//! structural edits are unsupported by design.

pub mod create_new_item;
pub mod create_note_line;
pub mod cursor;
pub mod indent;
pub mod merge;
pub mod move_to_position;
pub mod move_vertical;
pub mod select;

pub use create_new_item::create_new_item;
pub use create_note_line::create_note_line;
pub use cursor::{
    ensure_cursor_in_list_content, ensure_cursor_is_in_unfolded_line,
    keep_cursor_outside_folded_lines, move_cursor_to_previous_unfolded_line,
};
pub use indent::{indent_item, outdent_item};
pub use merge::{delete_and_merge_with_next, delete_and_merge_with_previous};
pub use move_to_position::{Placement, move_item_to_position};
pub use move_vertical::{move_item_down, move_item_up};
pub use select::{expand_selection_to_full_items, select_all_content};

use crate::model::{NodeId, Position, Root, Selection};

/// The single selection, or `None` when the root holds several (structural
/// operations fall through in that case).
pub(crate) fn single_selection(root: &Root) -> Option<Selection> {
    if root.has_single_selection() {
        root.selections().first().copied()
    } else {
        None
    }
}

/// The single collapsed cursor, or `None` for multi-selections and non-empty
/// selections.
pub(crate) fn single_cursor(root: &Root) -> Option<Position> {
    let sel = single_selection(root)?;
    sel.is_empty().then_some(sel.head)
}

/// The indent one child level below `id`: the existing first child's indent
/// when there is one, the item's own indent plus one default level otherwise.
pub(crate) fn child_level_indent(root: &Root, id: NodeId, default_indent: &str) -> String {
    match root.children_of(id).first() {
        Some(&child) => root.node(child).indent.clone(),
        None => format!("{}{}", root.node(id).indent, default_indent),
    }
}

/// Tree depth of an item (top-level items have depth 0).
pub(crate) fn depth_of(root: &Root, id: NodeId) -> usize {
    let mut depth = 0;
    let mut cur = root.parent_of(id);
    while let Some(p) = cur {
        if p == root.root_id() {
            break;
        }
        depth += 1;
        cur = root.parent_of(p);
    }
    depth
}
