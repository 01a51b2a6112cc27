use crate::editing::Outcome;
use crate::editing::operations::child_level_indent;
use crate::editing::renumber::recalculate_numeric_bullets;
use crate::model::{NodeId, Position, Root};

/// Where a dragged subtree lands relative to the drop target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Previous sibling of the target.
    Before,
    /// Next sibling of the target (after its whole subtree).
    After,
    /// First child of the target.
    Inside,
}

/// Drag-and-drop: relocates `source` (with its subtree) relative to
/// `target`, re-indenting it to the destination level.
///
/// The cursor stays with whichever of source/target contained it; when
/// neither did, it is relocated to the end of the moved subtree's last line
/// so the viewport follows the drop instead of jumping somewhere unrelated.
pub fn move_item_to_position(
    root: &mut Root,
    source: NodeId,
    target: NodeId,
    placement: Placement,
    default_indent: &str,
) -> Outcome {
    if !root.has_single_selection() {
        return Outcome::NoOp;
    }
    if source == target || root.is_ancestor_of(source, target) {
        return Outcome::NoOp;
    }
    let (Some(source_first), Some(target_first)) =
        (root.first_line_of(source), root.first_line_of(target))
    else {
        return Outcome::NoOp;
    };

    let cursor = root.cursor();
    let source_last = root
        .last_subtree_line(source)
        .unwrap_or_else(|| unreachable!("attached source has a line range"));
    let target_last = root
        .last_subtree_line(target)
        .unwrap_or_else(|| unreachable!("attached target has a line range"));
    let cursor_in_source = cursor.line >= source_first && cursor.line <= source_last;
    let cursor_in_target = cursor.line >= target_first && cursor.line <= target_last;
    let source_offset = cursor.line.saturating_sub(source_first);
    let target_offset = cursor.line.saturating_sub(target_first);

    let new_indent = match placement {
        Placement::Before | Placement::After => root.node(target).indent.clone(),
        Placement::Inside => child_level_indent(root, target, default_indent),
    };
    let old_len = root.node(source).indent.len();
    let ch_shift = new_indent.len() as isize - old_len as isize;

    root.detach(source);
    match placement {
        Placement::Before => root.add_before(target, source),
        Placement::After => root.add_after(target, source),
        Placement::Inside => root.add_first_child(target, source),
    }
    root.reindent_subtree(source, old_len, &new_indent);

    let new_cursor = if cursor_in_source {
        let line = root
            .first_line_of(source)
            .unwrap_or_else(|| unreachable!("source was re-attached"))
            + source_offset;
        Position::new(line, cursor.ch.saturating_add_signed(ch_shift))
    } else if cursor_in_target {
        let line = root
            .first_line_of(target)
            .unwrap_or_else(|| unreachable!("target stayed attached"))
            + target_offset;
        Position::new(line, cursor.ch)
    } else {
        root.subtree_range_of(source)
            .map(|(_, to)| to)
            .unwrap_or_else(|| unreachable!("source was re-attached"))
    };
    root.set_cursor(new_cursor);

    recalculate_numeric_bullets(root);
    Outcome::Applied
}
