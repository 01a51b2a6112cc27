use crate::editing::Outcome;
use crate::editing::operations::single_selection;
use crate::editing::renumber::recalculate_numeric_bullets;
use crate::model::{NodeId, Position, Root};

/// Moves the item under the cursor one slot up: swap with the previous
/// sibling, or, when the item is its parent's first child, append it to the
/// children of the parent's previous sibling (same visual depth).
///
/// Returns [`Outcome::NoOp`] when neither destination exists.
pub fn move_item_up(root: &mut Root) -> Outcome {
    move_vertical(root, Direction::Up)
}

/// Mirror of [`move_item_up`]: swap with the next sibling, or become the
/// first child of the parent's next sibling.
pub fn move_item_down(root: &mut Root) -> Outcome {
    move_vertical(root, Direction::Down)
}

enum Direction {
    Up,
    Down,
}

fn move_vertical(root: &mut Root, direction: Direction) -> Outcome {
    let Some(selection) = single_selection(root) else {
        return Outcome::NoOp;
    };
    let cursor = selection.head;
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let Some(old_first) = root.first_line_of(id) else {
        return Outcome::NoOp;
    };
    let line_offset = cursor.line - old_first;

    let adjacent = match direction {
        Direction::Up => root.prev_sibling(id),
        Direction::Down => root.next_sibling(id),
    };

    let mut ch_shift: isize = 0;
    if let Some(sibling) = adjacent {
        root.detach(id);
        match direction {
            Direction::Up => root.add_before(sibling, id),
            Direction::Down => root.add_after(sibling, id),
        }
    } else {
        let Some(parent) = root.parent_of(id) else {
            return Outcome::NoOp;
        };
        if parent == root.root_id() {
            return Outcome::NoOp;
        }
        let destination = match direction {
            Direction::Up => root.prev_sibling(parent),
            Direction::Down => root.next_sibling(parent),
        };
        let Some(destination) = destination else {
            return Outcome::NoOp;
        };

        let new_indent = level_indent_under(root, destination, parent, id);
        let old_len = root.node(id).indent.len();
        ch_shift = new_indent.len() as isize - old_len as isize;

        root.detach(id);
        match direction {
            Direction::Up => root.append_child(destination, id),
            Direction::Down => root.add_first_child(destination, id),
        }
        root.reindent_subtree(id, old_len, &new_indent);
    }

    let new_first = root
        .first_line_of(id)
        .unwrap_or_else(|| unreachable!("moved item is attached"));
    root.set_cursor(Position::new(
        new_first + line_offset,
        cursor.ch.saturating_add_signed(ch_shift),
    ));

    recalculate_numeric_bullets(root);
    Outcome::Applied
}

/// The indent the moved subtree should carry under `destination`: its
/// existing children's indent when present, otherwise the destination's
/// indent plus the item's old delta below its old parent.
fn level_indent_under(root: &Root, destination: NodeId, old_parent: NodeId, id: NodeId) -> String {
    if let Some(&child) = root.children_of(destination).first() {
        return root.node(child).indent.clone();
    }
    let delta = &root.node(id).indent[root.node(old_parent).indent.len()..];
    format!("{}{}", root.node(destination).indent, delta)
}
