use crate::editing::Outcome;
use crate::editing::operations::single_cursor;
use crate::model::{Position, Root, Selection};

/// Clamps the cursor out of a folded subtree's hidden body, to the end of the
/// fold root's visible first line. Pure cursor operation, idempotent.
pub fn ensure_cursor_is_in_unfolded_line(root: &mut Root) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(clamped) = clamp_out_of_folds(root, cursor) else {
        return Outcome::NoOp;
    };
    root.set_cursor(clamped);
    Outcome::Applied
}

/// Like [`ensure_cursor_is_in_unfolded_line`] but applied to every selection
/// endpoint, so a shift-selection can't anchor inside a hidden range either.
pub fn keep_cursor_outside_folded_lines(root: &mut Root) -> Outcome {
    let mut moved = false;
    let selections = root
        .selections()
        .iter()
        .map(|s| {
            let anchor = clamp_out_of_folds(root, s.anchor);
            let head = clamp_out_of_folds(root, s.head);
            moved |= anchor.is_some() || head.is_some();
            Selection::new(anchor.unwrap_or(s.anchor), head.unwrap_or(s.head))
        })
        .collect();
    if !moved {
        return Outcome::NoOp;
    }
    root.set_selections(selections);
    Outcome::Applied
}

/// Clamps a cursor sitting inside the indent/bullet/checkbox prefix forward
/// to the line's content start. Idempotent.
pub fn ensure_cursor_in_list_content(root: &mut Root) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let first_line = root
        .first_line_of(id)
        .unwrap_or_else(|| unreachable!("list_under_line only yields attached items"));
    let content_start = root.content_start_ch(id, cursor.line - first_line);
    if cursor.ch >= content_start {
        return Outcome::NoOp;
    }
    root.set_cursor(Position::new(cursor.line, content_start));
    Outcome::Applied
}

/// ArrowUp from a line's content start: jumps to the end of the previous
/// *visible* line, skipping over a folded subtree's hidden body.
///
/// Anywhere else the host's default ArrowUp applies and this is
/// [`Outcome::NoOp`].
pub fn move_cursor_to_previous_unfolded_line(root: &mut Root) -> Outcome {
    let Some(cursor) = single_cursor(root) else {
        return Outcome::NoOp;
    };
    let Some(id) = root.list_under_line(cursor.line) else {
        return Outcome::NoOp;
    };
    let first_line = root
        .first_line_of(id)
        .unwrap_or_else(|| unreachable!("list_under_line only yields attached items"));
    if cursor.ch != root.content_start_ch(id, cursor.line - first_line) {
        return Outcome::NoOp;
    }
    if cursor.line == root.start.line {
        return Outcome::NoOp;
    }

    let above = cursor.line - 1;
    let target = clamp_out_of_folds(root, Position::new(above, 0))
        .map(|p| p.line)
        .unwrap_or(above);
    let Some(end) = line_end(root, target) else {
        return Outcome::NoOp;
    };
    root.set_cursor(end);
    Outcome::Applied
}

/// `Some(new position)` when `pos` sits on a line hidden by a fold root; the
/// new position is the end of that fold root's first (visible) line.
fn clamp_out_of_folds(root: &Root, pos: Position) -> Option<Position> {
    for fold in root.fold_roots() {
        let first = root.first_line_of(fold)?;
        let last = root.last_subtree_line(fold)?;
        if pos.line > first && pos.line <= last {
            return Some(Position::new(first, root.line_len(fold, 0)));
        }
    }
    None
}

fn line_end(root: &Root, line: usize) -> Option<Position> {
    let id = root.list_under_line(line)?;
    let idx = line - root.first_line_of(id)?;
    Some(Position::new(line, root.line_len(id, idx)))
}
