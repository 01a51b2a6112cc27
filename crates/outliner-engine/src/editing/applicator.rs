use tracing::warn;

use crate::editor::Editor;
use crate::model::{Position, Root, ranges_intersect};

/// Reconciles a mutated tree back into the host buffer.
///
/// `prev` is the clone taken right after parsing, `new` the mutated tree;
/// they share `NodeId`s, which is what fold reconciliation matches by. The
/// replacement is minimal: the longest common line prefix and suffix of the
/// two printed trees are left untouched. Fold roots whose lines intersect the
/// replaced range are unfolded first and re-folded at their new first line
/// afterwards; a fold whose node lost its children (or got detached) in the
/// edit is dropped rather than restored somewhere wrong.
pub fn apply(editor: &mut impl Editor, prev: &Root, new: &Root) {
    let prev_lines = prev.print_lines();
    let new_lines = new.print_lines();
    if prev_lines == new_lines {
        editor.set_selections(new.selections().to_vec());
        return;
    }

    let max = prev_lines.len().min(new_lines.len());
    let mut prefix = 0;
    while prefix < max && prev_lines[prefix] == new_lines[prefix] {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < max - prefix
        && prev_lines[prev_lines.len() - 1 - suffix] == new_lines[new_lines.len() - 1 - suffix]
    {
        suffix += 1;
    }

    let start = prev.start.line;
    let removed = prev_lines.len() - prefix - suffix;
    let added = new_lines.len() - prefix - suffix;

    // The absolute buffer lines the edit touches; a pure insertion touches
    // only the boundary line it joins onto.
    let (touch_from, touch_to) = if removed == 0 {
        let anchor = start + prefix.saturating_sub(1);
        (anchor, anchor)
    } else {
        (start + prefix, start + prev_lines.len() - suffix - 1)
    };

    let mut refold = Vec::new();
    for id in prev.fold_roots() {
        let (Some(first), Some(last)) = (prev.first_line_of(id), prev.last_subtree_line(id))
        else {
            continue;
        };
        // Line granularity: both ranges cover whole lines, so ch 0 endpoints
        // give an inclusive line-overlap test.
        if ranges_intersect(
            Position::new(first, 0),
            Position::new(last, 0),
            Position::new(touch_from, 0),
            Position::new(touch_to, 0),
        ) {
            editor.unfold(first);
            refold.push(id);
        }
    }

    let last_replaced = prev_lines.len() - suffix - 1;
    if removed == 0 {
        let text = new_lines[prefix..new_lines.len() - suffix].join("\n");
        if prefix > 0 {
            let at = Position::new(start + prefix - 1, prev_lines[prefix - 1].len());
            editor.replace_range(&format!("\n{text}"), at, at);
        } else {
            let at = Position::new(start, 0);
            editor.replace_range(&format!("{text}\n"), at, at);
        }
    } else if added == 0 {
        if prefix > 0 {
            let from = Position::new(start + prefix - 1, prev_lines[prefix - 1].len());
            let to = Position::new(start + last_replaced, prev_lines[last_replaced].len());
            editor.replace_range("", from, to);
        } else {
            let from = Position::new(start, 0);
            let to = Position::new(start + last_replaced + 1, 0);
            editor.replace_range("", from, to);
        }
    } else {
        let text = new_lines[prefix..new_lines.len() - suffix].join("\n");
        let from = Position::new(start + prefix, 0);
        let to = Position::new(start + last_replaced, prev_lines[last_replaced].len());
        editor.replace_range(&text, from, to);
    }

    for id in refold {
        let restorable = new.is_attached(id) && new.has_children(id) && new.node(id).folded;
        match (restorable, new.first_line_of(id)) {
            (true, Some(line)) => editor.fold(line),
            _ => warn!(node = id.index(), "fold lost its subtree in the edit, dropping it"),
        }
    }

    editor.set_selections(new.selections().to_vec());
}
