use crate::editing::Outcome;
use crate::editing::operations::{depth_of, single_cursor};
use crate::editing::renumber::recalculate_numeric_bullets;
use crate::model::{NodeId, Position, Root};

/// Backspace at an item's content start: merges the item into the one
/// rendered directly above it.
///
/// Only three shapes merge; everything else is [`Outcome::NoOp`] and the
/// host performs a plain single-character deletion:
/// - both items childless,
/// - the earlier item childless and at the same depth,
/// - the later item childless and exactly one level deeper (an empty child
///   absorbed back into its parent).
pub fn delete_and_merge_with_previous(root: &mut Root) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(later) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some(first_line) = root.first_line_of(later) else {
        return Outcome::NoOp;
    };
    // Only the first line's content start is an item boundary; backspace in
    // notes is ordinary text editing.
    if cursor != Position::new(first_line, root.content_start_ch(later, 0)) {
        return Outcome::NoOp;
    }
    if first_line == root.start.line {
        return Outcome::NoOp;
    }
    let Some(earlier) = root.list_under_line(first_line - 1) else {
        return Outcome::NoOp;
    };
    merge_into(root, earlier, later)
}

/// Delete at an item's last content end: merges the item rendered directly
/// below into this one. Same shape conditions as
/// [`delete_and_merge_with_previous`].
pub fn delete_and_merge_with_next(root: &mut Root) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(earlier) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some((_, content_end)) = root.content_range_of(earlier) else {
        return Outcome::NoOp;
    };
    if cursor != content_end {
        return Outcome::NoOp;
    }
    let Some(later) = root.list_under_line(content_end.line + 1) else {
        return Outcome::NoOp;
    };
    merge_into(root, earlier, later)
}

fn merge_into(root: &mut Root, earlier: NodeId, later: NodeId) -> Outcome {
    let earlier_childless = !root.has_children(earlier);
    let later_childless = !root.has_children(later);
    let earlier_depth = depth_of(root, earlier);
    let later_depth = depth_of(root, later);

    let mergeable = (earlier_childless && later_childless)
        || (earlier_childless && earlier_depth == later_depth)
        || (later_childless && later_depth == earlier_depth + 1);
    if !mergeable {
        return Outcome::NoOp;
    }

    // The cursor lands at the junction: the end of the earlier item's last
    // line before the merge.
    let junction_line = root
        .last_own_line_of(earlier)
        .unwrap_or_else(|| unreachable!("attached item has lines"));
    let junction_ch = root.line_len(earlier, root.line_count(earlier) - 1);

    let later_node = root.node(later).clone();
    let node = root.node_mut(earlier);
    node.lines
        .last_mut()
        .unwrap_or_else(|| unreachable!("items always have a first line"))
        .push_str(&later_node.lines[0]);
    node.lines.extend(later_node.lines[1..].iter().cloned());
    if node.notes_indent.is_none() {
        node.notes_indent = later_node.notes_indent;
    }

    let orphans = root.children_of(later).to_vec();
    for child in orphans {
        root.detach(child);
        root.append_child(earlier, child);
    }
    root.detach(later);

    root.set_cursor(Position::new(junction_line, junction_ch));
    recalculate_numeric_bullets(root);
    Outcome::Applied
}
