use crate::editing::Outcome;
use crate::editing::operations::single_selection;
use crate::model::{Position, Root, Selection};

/// Ctrl+A: stateless three-stage expansion. Line content, then the item with
/// all its descendants, then the whole list.
///
/// The stage is detected purely from the current selection's boundaries, so
/// repeated invocations on a freshly parsed tree step through the stages
/// without any session state. Stages that coincide (a childless single-line
/// item *is* its own subtree) are skipped. Once everything is selected the
/// result is [`Outcome::Blocked`] so the host shortcut doesn't grab content
/// outside the list.
pub fn select_all_content(root: &mut Root) -> Outcome {
    let Some(selection) = single_selection(root) else {
        return Outcome::NoOp;
    };
    // Anchor on the selection's first line: after the item stage the head
    // sits on the last descendant, which is the wrong item to grow from.
    let line = selection.min().line;
    let Some(id) = root.list_under_line(line) else {
        return Outcome::NoOp;
    };
    let first_line = root
        .first_line_of(id)
        .unwrap_or_else(|| unreachable!("list_under_line only yields attached items"));
    let idx = line - first_line;

    let line_stage = (
        Position::new(line, root.content_start_ch(id, idx)),
        Position::new(line, root.line_len(id, idx)),
    );
    let item_stage = root
        .subtree_range_of(id)
        .unwrap_or_else(|| unreachable!("attached item has a subtree range"));
    let all_stage = root
        .whole_range()
        .unwrap_or_else(|| unreachable!("a parsed list has at least one item"));

    let current = (selection.min(), selection.max());
    let next = if current == all_stage {
        return Outcome::Blocked("whole list already selected");
    } else if current == line_stage {
        if item_stage != line_stage {
            item_stage
        } else {
            all_stage
        }
    } else if current == item_stage {
        all_stage
    } else {
        line_stage
    };

    root.set_selections(vec![Selection::new(next.0, next.1)]);
    Outcome::Applied
}

/// Snaps a selection outward to item boundaries: from the first selected
/// item's content start through the last selected item's subtree end,
/// keeping the anchor/head direction.
pub fn expand_selection_to_full_items(root: &mut Root) -> Outcome {
    let Some(selection) = single_selection(root) else {
        return Outcome::NoOp;
    };
    let Some(first_item) = root.list_under_line(selection.min().line) else {
        return Outcome::NoOp;
    };
    let Some(last_item) = root.list_under_line(selection.max().line) else {
        return Outcome::NoOp;
    };
    let (Some(from), Some((_, to))) = (
        root.content_start_of(first_item),
        root.subtree_range_of(last_item),
    ) else {
        return Outcome::NoOp;
    };

    let snapped = if selection.is_backward() {
        Selection::new(to, from)
    } else {
        Selection::new(from, to)
    };
    if snapped == selection {
        return Outcome::NoOp;
    }
    root.set_selections(vec![snapped]);
    Outcome::Applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, MemoryEditor};
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;

    fn root_at(lines: &[&str], line: usize, ch: usize) -> Root {
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        editor.set_selections(vec![Selection::cursor(Position::new(line, ch))]);
        parse(&editor, Position::new(line, ch)).expect("fixture parses")
    }

    fn sel(root: &Root) -> Selection {
        root.selections()[0]
    }

    #[test]
    fn expands_line_then_subtree_then_whole_list() {
        let mut root = root_at(&["- one", "- two", "\t- sub", "- three"], 1, 4);

        assert_eq!(select_all_content(&mut root), Outcome::Applied);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(1, 2), Position::new(1, 5)),
            "first press selects the line's content"
        );

        assert_eq!(select_all_content(&mut root), Outcome::Applied);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(1, 2), Position::new(2, 6)),
            "second press adds the subtree"
        );

        assert_eq!(select_all_content(&mut root), Outcome::Applied);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(0, 2), Position::new(3, 7)),
            "third press takes the whole list"
        );

        assert_eq!(
            select_all_content(&mut root),
            Outcome::Blocked("whole list already selected")
        );
    }

    #[test]
    fn childless_item_skips_the_subtree_stage() {
        let mut root = root_at(&["- one", "- two"], 1, 4);
        select_all_content(&mut root);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(1, 2), Position::new(1, 5))
        );
        select_all_content(&mut root);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(0, 2), Position::new(1, 5)),
            "line and subtree coincide, so the second press takes the list"
        );
    }

    #[test]
    fn note_line_stage_uses_the_notes_indent() {
        let mut root = root_at(&["- one", "\tnote"], 1, 3);
        select_all_content(&mut root);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(1, 1), Position::new(1, 5))
        );
    }

    #[test]
    fn snaps_a_partial_selection_to_item_boundaries() {
        let mut root = root_at(&["- one", "- two", "\t- sub", "- three"], 0, 0);
        root.set_selections(vec![Selection::new(
            Position::new(0, 4),
            Position::new(1, 3),
        )]);
        assert_eq!(expand_selection_to_full_items(&mut root), Outcome::Applied);
        assert_eq!(
            sel(&root),
            Selection::new(Position::new(0, 2), Position::new(2, 6)),
            "grows to the last item's subtree end"
        );
    }

    #[test]
    fn snapping_preserves_a_backward_selection() {
        let mut root = root_at(&["- one", "- two"], 0, 0);
        root.set_selections(vec![Selection::new(
            Position::new(1, 3),
            Position::new(0, 4),
        )]);
        assert_eq!(expand_selection_to_full_items(&mut root), Outcome::Applied);
        let snapped = sel(&root);
        assert!(snapped.is_backward());
        assert_eq!(snapped.min(), Position::new(0, 2));
        assert_eq!(snapped.max(), Position::new(1, 5));
    }

    #[test]
    fn already_snapped_selection_is_noop() {
        let mut root = root_at(&["- one", "- two"], 0, 0);
        root.set_selections(vec![Selection::new(
            Position::new(0, 2),
            Position::new(1, 5),
        )]);
        assert_eq!(expand_selection_to_full_items(&mut root), Outcome::NoOp);
    }
}
