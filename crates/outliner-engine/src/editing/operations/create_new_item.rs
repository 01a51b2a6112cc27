use crate::editing::operations::single_cursor;
use crate::editing::renumber::recalculate_numeric_bullets;
use crate::editing::Outcome;
use crate::model::{ListNode, Root};

/// Enter: splits the item under the cursor into a kept part and a new item.
///
/// Placement rules:
/// - cursor at the very end of an item that has content and unfolded
///   children: the new (empty) item becomes the *first child*;
/// - cursor at the end of a folded item: the new item becomes the next
///   sibling of the whole subtree (folded children must not silently gain a
///   hidden first entry);
/// - cursor mid-content: the tail of the cursor line plus all following note
///   lines move to the new item, and the item's children move with them so
///   the tail text stays directly above them.
///
/// A checkbox on the original first line puts an unchecked `[ ]` on the new
/// item. Returns [`Outcome::NoOp`] when the split point sits before the
/// line's content start (the caller falls through to a plain newline).
pub fn create_new_item(root: &mut Root, _default_indent: &str) -> Outcome {
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

    let (_, content_end) = root
        .content_range_of(id)
        .unwrap_or_else(|| unreachable!("attached node has a content range"));
    let at_end = cursor == content_end;

    let node = root.node(id);
    let has_content = node.lines.len() > 1 || !node.lines[0].is_empty();
    let has_children = !node.children.is_empty();
    let folded = node.folded;
    let on_child_level = has_children && has_content && at_end && !folded;

    // Split the content lines at the cursor.
    let rel = cursor.ch - content_start;
    let node = root.node_mut(id);
    let tail_first = node.lines[line_idx][rel..].to_string();
    node.lines[line_idx].truncate(rel);
    let tail_rest: Vec<String> = node.lines.drain(line_idx + 1..).collect();

    let node = root.node(id);
    let new_indent = if on_child_level {
        let &first_child = root
            .children_of(id)
            .first()
            .unwrap_or_else(|| unreachable!("child-level insert requires children"));
        root.node(first_child).indent.clone()
    } else {
        node.indent.clone()
    };
    let new_checkbox = (node.checkbox.is_some() && line_idx == 0).then(|| "[ ]".to_string());
    let new_notes_indent = (!tail_rest.is_empty())
        .then(|| node.notes_indent.clone())
        .flatten();

    let mut new_node = ListNode::new(new_indent, node.bullet.clone(), new_checkbox, tail_first);
    new_node.lines.extend(tail_rest);
    new_node.notes_indent = new_notes_indent;
    let new_id = root.alloc(new_node);

    if on_child_level {
        root.add_first_child(id, new_id);
    } else {
        root.add_after(id, new_id);
        if !at_end {
            // Mid-content split: the tail line sits directly above the old
            // children, so they belong to the new item now.
            let children = root.children_of(id).to_vec();
            for child in children {
                root.detach(child);
                root.append_child(new_id, child);
            }
        }
    }

    // Renumber before deriving the cursor; a bullet that changes width
    // ("9." -> "10.") shifts the content start.
    recalculate_numeric_bullets(root);

    let new_cursor = root
        .content_start_of(new_id)
        .unwrap_or_else(|| unreachable!("freshly attached node has a position"));
    root.set_cursor(new_cursor);
    Outcome::Applied
}
