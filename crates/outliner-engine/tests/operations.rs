//! End-to-end editing cycles: parse the buffer, mutate the tree, apply the
//! result back, and check the buffer plus cursor afterwards.

use outliner_engine::editing::operations::{
    Placement, create_new_item, create_note_line, delete_and_merge_with_previous,
    ensure_cursor_is_in_unfolded_line, indent_item, move_item_down, move_item_to_position,
    move_item_up, outdent_item, select_all_content,
};
use outliner_engine::editing::{Outcome, apply};
use outliner_engine::editor::{Editor, IndentDefaults, MemoryEditor, Reader};
use outliner_engine::model::{Position, Root, Selection};
use outliner_engine::parsing::parse;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One full editing cycle against the in-memory host.
fn edit(editor: &mut MemoryEditor, op: impl FnOnce(&mut Root, &str) -> Outcome) -> Outcome {
    init_tracing();
    let indent = IndentDefaults::of(editor).indent_string();
    let Some(mut root) = parse(editor, editor.get_cursor()) else {
        return Outcome::NoOp;
    };
    let prev = root.clone();
    let outcome = op(&mut root, &indent);
    if outcome.changed() {
        apply(editor, &prev, &root);
    }
    outcome
}

#[test]
fn tab_indents_the_item_under_the_cursor() {
    let mut editor = MemoryEditor::from_marked_lines(&["- one", "- two|"]);
    assert!(edit(&mut editor, |root, indent| indent_item(root, indent)).changed());
    assert_eq!(editor.to_marked_lines(), vec!["- one", "\t- two|"]);
}

#[test]
fn enter_at_end_of_a_parent_inserts_the_first_child() {
    let mut editor = MemoryEditor::from_marked_lines(&["- one", "\t- two|", "\t\t- three"]);
    assert!(edit(&mut editor, create_new_item).changed());
    assert_eq!(
        editor.to_marked_lines(),
        vec!["- one", "\t- two", "\t\t- |", "\t\t- three"]
    );
}

#[test]
fn backspace_in_an_empty_trailing_item_merges_it_away() {
    let mut editor = MemoryEditor::from_marked_lines(&["- item 1", "- |"]);
    assert!(edit(&mut editor, |root, _| delete_and_merge_with_previous(root)).changed());
    assert_eq!(editor.to_marked_lines(), vec!["- item 1|"]);
}

#[test]
fn shift_enter_turns_the_line_tail_into_a_note() {
    let mut editor = MemoryEditor::from_marked_lines(&["- one| tail", "- two"]);
    assert!(edit(&mut editor, create_note_line).changed());
    assert_eq!(editor.to_marked_lines(), vec!["- one", "\t| tail", "- two"]);
}

#[test]
fn indent_then_outdent_restores_the_buffer() {
    let original = vec!["- a", "\t- b", "- c|"];
    let mut editor = MemoryEditor::from_marked_lines(&original);
    assert!(edit(&mut editor, |root, indent| indent_item(root, indent)).changed());
    assert_eq!(editor.to_marked_lines(), vec!["- a", "\t- b", "\t- c|"]);
    assert!(edit(&mut editor, |root, _| outdent_item(root)).changed());
    assert_eq!(
        editor.to_marked_lines(),
        original.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    );
}

#[test]
fn moving_a_folded_subtree_keeps_it_folded() {
    let mut editor = MemoryEditor::from_text("- a\n\t- a1\n- b");
    editor.set_fold(0, 1);
    editor.set_selections(vec![Selection::cursor(Position::new(0, 3))]);

    assert!(edit(&mut editor, |root, _| move_item_down(root)).changed());
    assert_eq!(editor.lines(), &["- b", "- a", "\t- a1"]);
    assert_eq!(editor.unfold_calls(), &[0], "unfolded before the edit");
    assert_eq!(editor.fold_calls(), &[1], "refolded at the new location");
    assert_eq!(editor.get_cursor(), Position::new(1, 3));
}

#[test]
fn drag_inside_reindents_to_the_destination_child_level() {
    let mut editor = MemoryEditor::from_marked_lines(&["- a", "  - a1", "- b|", "  - b1"])
        .with_indent_defaults(false, 2);
    assert!(
        edit(&mut editor, |root, indent| {
            let source = root.list_under_line(2).unwrap();
            let target = root.list_under_line(0).unwrap();
            move_item_to_position(root, source, target, Placement::Inside, indent)
        })
        .changed()
    );
    assert_eq!(
        editor.to_marked_lines(),
        vec!["- a", "  - b|", "    - b1", "  - a1"]
    );
}

#[test]
fn reordering_renumbers_numeric_siblings() {
    let mut editor = MemoryEditor::from_marked_lines(&["1. one", "2. two", "3. three|"]);
    assert!(edit(&mut editor, |root, _| move_item_up(root)).changed());
    assert_eq!(
        editor.to_marked_lines(),
        vec!["1. one", "2. three|", "3. two"]
    );
}

#[test]
fn untouched_lines_are_never_rewritten() {
    let mut editor = MemoryEditor::from_marked_lines(&["- one", "- two|", "- three"]);
    edit(&mut editor, |root, indent| indent_item(root, indent));
    assert_eq!(editor.replace_calls().len(), 1);
    let (text, from, to) = &editor.replace_calls()[0];
    assert_eq!(text, "\t- two");
    assert_eq!((*from, *to), (Position::new(1, 0), Position::new(1, 5)));
}

#[test]
fn cursor_clamps_out_of_a_folded_body_without_touching_text() {
    let mut editor = MemoryEditor::from_text("- a\n\t- a1\n\t- a2\n- b");
    editor.set_fold(0, 2);
    editor.set_selections(vec![Selection::cursor(Position::new(1, 4))]);

    assert!(edit(&mut editor, |root, _| ensure_cursor_is_in_unfolded_line(root)).changed());
    assert!(editor.replace_calls().is_empty());
    assert_eq!(editor.get_cursor(), Position::new(0, 3));
}

#[test]
fn select_all_walks_line_then_list_for_a_childless_item() {
    let mut editor = MemoryEditor::from_marked_lines(&["- one", "- tw|o"]);

    assert!(edit(&mut editor, |root, _| select_all_content(root)).changed());
    assert_eq!(
        editor.list_selections(),
        vec![Selection::new(Position::new(1, 2), Position::new(1, 5))]
    );

    assert!(edit(&mut editor, |root, _| select_all_content(root)).changed());
    assert_eq!(
        editor.list_selections(),
        vec![Selection::new(Position::new(0, 2), Position::new(1, 5))]
    );

    let outcome = edit(&mut editor, |root, _| select_all_content(root));
    assert!(!outcome.changed());
    assert!(outcome.stops_propagation(), "shortcut must not escape the list");
}

#[test]
fn operations_refuse_multi_cursor_buffers() {
    let mut editor = MemoryEditor::from_text("- one\n- two");
    editor.set_selections(vec![
        Selection::cursor(Position::new(0, 5)),
        Selection::cursor(Position::new(1, 5)),
    ]);

    let outcome = edit(&mut editor, |root, indent| indent_item(root, indent));
    assert_eq!(outcome, Outcome::NoOp);
    assert_eq!(editor.lines(), &["- one", "- two"]);
}
