use crate::editing::Outcome;
use crate::editing::operations::{child_level_indent, single_cursor};
use crate::model::{Position, Root};

/// Shift+Enter: splits the cursor line into a note continuation below it.
///
/// The first note added to an item establishes its notes indent: the
/// existing first child's indent when the item has children, one default
/// level deeper than the item otherwise.
pub fn create_note_line(root: &mut Root, default_indent: &str) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some(first_line) = root.first_line_of(id) else {
        return Outcome::NoOp;
    };

    let line_idx = cursor.line - first_line;
    let content_start = root.content_start_ch(id, line_idx);
    if cursor.ch < content_start {
        return Outcome::NoOp;
    }

    if root.node(id).notes_indent.is_none() {
        let notes_indent = child_level_indent(root, id, default_indent);
        root.node_mut(id).notes_indent = Some(notes_indent);
    }

    let rel = cursor.ch - content_start;
    let node = root.node_mut(id);
    let tail = node.lines[line_idx][rel..].to_string();
    node.lines[line_idx].truncate(rel);
    node.lines.insert(line_idx + 1, tail);

    let notes_ch = root
        .node(id)
        .notes_indent
        .as_ref()
        .map_or(0, |n| n.len());
    root.set_cursor(Position::new(cursor.line + 1, notes_ch));
    Outcome::Applied
}
