use crate::editing::Outcome;
use crate::editing::operations::single_selection;
use crate::editing::renumber::recalculate_numeric_bullets;
use crate::model::{Position, Root};

/// Tab: re-parents the item under the cursor (with its whole subtree) as the
/// last child of its previous sibling.
///
/// The indent delta is inferred, in priority order, from: the previous
/// sibling's existing first child, the item's own indent relative to its
/// parent, the item's own first child, and finally the caller-supplied
/// default. Returns [`Outcome::NoOp`] when there is no previous sibling.
pub fn indent_item(root: &mut Root, default_indent: &str) -> Outcome {
    let Some(selection) = single_selection(root) else {
        return Outcome::NoOp;
    };
    let cursor = selection.head;
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some(prev) = root.prev_sibling(id) else {
        return Outcome::NoOp;
    };

    let parent = root
        .parent_of(id)
        .unwrap_or_else(|| unreachable!("item with a sibling has a parent"));
    let own_indent_len = root.node(id).indent.len();

    let delta = if let Some(&niece) = root.children_of(prev).first() {
        root.node(niece).indent[root.node(prev).indent.len()..].to_string()
    } else if parent != root.root_id() {
        root.node(id).indent[root.node(parent).indent.len()..].to_string()
    } else if let Some(&child) = root.children_of(id).first() {
        root.node(child).indent[own_indent_len..].to_string()
    } else {
        default_indent.to_string()
    };
    let delta = if delta.is_empty() {
        default_indent.to_string()
    } else {
        delta
    };

    root.detach(id);
    root.append_child(prev, id);
    root.indent_subtree(id, own_indent_len, &delta);

    // The item keeps its document position, so the cursor only shifts right.
    root.set_cursor(Position::new(cursor.line, cursor.ch + delta.len()));

    recalculate_numeric_bullets(root);
    Outcome::Applied
}

/// Shift+Tab: re-parents the item as the next sibling of its former parent,
/// stripping exactly the parent-to-item indent delta.
///
/// Returns [`Outcome::NoOp`] for top-level items.
pub fn outdent_item(root: &mut Root) -> Outcome {
    let Some(selection) = single_selection(root) else {
        return Outcome::NoOp;
    };
    let cursor = selection.head;
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some(parent) = root.parent_of(id) else {
        return Outcome::NoOp;
    };
    if parent == root.root_id() {
        return Outcome::NoOp;
    }

    let from = root.node(parent).indent.len();
    let till = root.node(id).indent.len();
    let delta = till - from;

    // Outdenting can move the subtree past its former parent's later
    // children; track the cursor relative to the item.
    let Some(old_first) = root.first_line_of(id) else {
        return Outcome::NoOp;
    };
    let line_offset = cursor.line - old_first;

    root.detach(id);
    root.add_after(parent, id);
    root.unindent_subtree(id, from, till);

    let new_first = root
        .first_line_of(id)
        .unwrap_or_else(|| unreachable!("item was just re-attached"));
    root.set_cursor(Position::new(
        new_first + line_offset,
        cursor.ch.saturating_sub(delta),
    ));

    recalculate_numeric_bullets(root);
    Outcome::Applied
}
