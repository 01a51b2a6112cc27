use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::editor::Reader;
use crate::model::{ListNode, NodeId, Position, Root};
use crate::parsing::error::{ParseError, render_whitespace};

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<indent>[ \t]*)(?P<bullet>[-*+]|\d+\.) (?P<content>.*)$")
        .unwrap_or_else(|e| unreachable!("invalid list item regex: {e}"))
});

static CHECKBOX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<checkbox>\[[^\[\]]\]) (?P<content>.*)$")
        .unwrap_or_else(|e| unreachable!("invalid checkbox regex: {e}"))
});

/// Local facts extracted from one bullet line.
struct ListItemLine {
    indent: String,
    bullet: String,
    checkbox: Option<String>,
    content: String,
}

fn classify_list_item(line: &str) -> Option<ListItemLine> {
    let caps = LIST_ITEM_RE.captures(line)?;
    let rest = &caps["content"];
    let (checkbox, content) = match CHECKBOX_RE.captures(rest) {
        Some(c) => (Some(c["checkbox"].to_string()), c["content"].to_string()),
        None => (None, rest.to_string()),
    };
    Some(ListItemLine {
        indent: caps["indent"].to_string(),
        bullet: caps["bullet"].to_string(),
        checkbox,
        content,
    })
}

fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(_, c)| c != ' ' && c != '\t')
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// A line that can belong to a list without being a bullet line: it starts
/// with whitespace (continuation candidate) or is whitespace-only.
fn is_continuation_candidate(line: &str) -> bool {
    !line.is_empty() && line.trim().is_empty() || !leading_whitespace(line).is_empty()
}

/// Parses the contiguous list around `cursor`, logging the diagnostic and
/// returning `None` on any parse failure.
///
/// `None` is also the answer when the cursor simply isn't inside a list; the
/// caller falls through to default editor behavior either way.
pub fn parse(reader: &impl Reader, cursor: Position) -> Option<Root> {
    match try_parse(reader, cursor) {
        Ok(root) => root,
        Err(err) => {
            tracing::debug!(error = %err, "list under cursor did not parse");
            None
        }
    }
}

/// Like [`parse`], but surfaces the diagnostic instead of logging it.
pub fn try_parse(reader: &impl Reader, cursor: Position) -> Result<Option<Root>, ParseError> {
    let Some(start) = find_list_start(reader, cursor.line)? else {
        return Ok(None);
    };
    build(reader, cursor, start)
}

/// Walks backward from `line` over the contiguous run of list and
/// continuation lines and returns the topmost bullet line with zero indent.
///
/// `Ok(None)` when the cursor line is not part of a list, or when the run is
/// an indented fragment without a zero-indent start. A continuation line
/// whose run holds no list start at all is an orphan and a diagnosed error.
fn find_list_start(reader: &impl Reader, line: usize) -> Result<Option<usize>, ParseError> {
    if line > reader.last_line() {
        return Ok(None);
    }
    let text = reader.get_line(line);
    let on_bullet = classify_list_item(text).is_some();
    if !on_bullet && !is_continuation_candidate(text) {
        return Ok(None);
    }

    let mut current = line;
    let mut topmost_start = None;
    loop {
        let text = reader.get_line(current);
        if let Some(item) = classify_list_item(text)
            && item.indent.is_empty()
        {
            topmost_start = Some(current);
        }
        if current == 0 {
            break;
        }
        let above = reader.get_line(current - 1);
        if classify_list_item(above).is_some() || is_continuation_candidate(above) {
            current -= 1;
        } else {
            break;
        }
    }

    match topmost_start {
        Some(start) => Ok(Some(start)),
        None if !on_bullet => Err(ParseError::OrphanContinuation { line }),
        None => Ok(None),
    }
}

fn build(
    reader: &impl Reader,
    cursor: Position,
    start: usize,
) -> Result<Option<Root>, ParseError> {
    let folded: HashSet<usize> = reader.get_all_folded_lines().into_iter().collect();
    let mut root = Root::new(Position::new(start, 0), Position::new(start, 0));

    let mut last_item: Option<NodeId> = None;
    let mut end_line = start;
    let last_buffer_line = reader.last_line();

    let mut line = start;
    while line <= last_buffer_line {
        let text = reader.get_line(line);

        if let Some(item) = classify_list_item(text) {
            // Validate the new indent against the deepest open indent over
            // their overlapping prefix; any mismatch there means the run
            // mixes whitespace inconsistently.
            let tracked = last_item.map_or(String::new(), |id| root.node(id).indent.clone());
            check_overlap(line, &tracked, &item.indent)?;

            let parent = match last_item {
                None => root.root_id(),
                Some(prev) if item.indent.len() > root.node(prev).indent.len() => prev,
                Some(prev) => {
                    // Shallower or equal: climb until the parent's indent is
                    // strictly shorter than the new item's.
                    let mut p = prev;
                    while p != root.root_id()
                        && root.node(p).indent.len() >= item.indent.len()
                    {
                        p = root
                            .parent_of(p)
                            .unwrap_or_else(|| unreachable!("non-root node without parent"));
                    }
                    p
                }
            };

            let mut node = ListNode::new(item.indent, item.bullet, item.checkbox, item.content);
            node.folded = folded.contains(&(line + 1));
            let id = root.alloc(node);
            root.append_child(parent, id);
            last_item = Some(id);
            end_line = line;
        } else if text.is_empty() || is_continuation_candidate(text) {
            let Some(item) = last_item else {
                return Err(ParseError::OrphanContinuation { line });
            };
            let ws = leading_whitespace(text);

            if text.trim().is_empty() {
                // Whitespace-only line: a note only when it matches the
                // established notes indent exactly; anything else is the
                // host's auto-indent artifact and ends the parsed range.
                match root.node(item).notes_indent.as_deref() {
                    Some(notes) if ws == notes => {
                        root.node_mut(item).lines.push(String::new());
                        end_line = line;
                    }
                    _ => break,
                }
            } else {
                match root.node(item).notes_indent.clone() {
                    None => {
                        let item_indent = root.node(item).indent.clone();
                        if !ws.starts_with(item_indent.as_str()) || ws.len() <= item_indent.len() {
                            return Err(ParseError::InconsistentIndent {
                                line,
                                expected: render_whitespace(&item_indent),
                                actual: render_whitespace(ws),
                            });
                        }
                        // First continuation fixes the item's notes indent.
                        let node = root.node_mut(item);
                        node.notes_indent = Some(ws.to_string());
                        node.lines.push(text[ws.len()..].to_string());
                    }
                    Some(notes) => {
                        if ws != notes {
                            return Err(ParseError::NoteIndentMismatch {
                                line,
                                expected: render_whitespace(&notes),
                                actual: render_whitespace(ws),
                            });
                        }
                        root.node_mut(item).lines.push(text[ws.len()..].to_string());
                    }
                }
                end_line = line;
            }
        } else {
            break;
        }

        line += 1;
    }

    if cursor.line < start || cursor.line > end_line {
        // The cursor sat on an excluded artifact line below the list; that
        // counts as "not inside a list", not as a parse failure.
        return Ok(None);
    }

    root.end = Position::new(end_line, reader.get_line(end_line).len());
    root.set_selections(reader.list_selections());
    Ok(Some(root))
}

fn check_overlap(line: usize, tracked: &str, actual: &str) -> Result<(), ParseError> {
    let overlap = tracked.len().min(actual.len());
    if tracked.as_bytes()[..overlap] != actual.as_bytes()[..overlap] {
        return Err(ParseError::InconsistentIndent {
            line,
            expected: render_whitespace(tracked),
            actual: render_whitespace(actual),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{Editor, MemoryEditor};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse_at(lines: &[&str], line: usize, ch: usize) -> Option<Root> {
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        editor.set_selections(vec![crate::model::Selection::cursor(Position::new(line, ch))]);
        parse(&editor, Position::new(line, ch))
    }

    #[test]
    fn parses_nested_list_and_round_trips() {
        let lines = ["- one", "\t- two", "\t\t- three", "- four"];
        let root = parse_at(&lines, 1, 3).unwrap();
        assert_eq!(root.print(), lines.join("\n"));
        assert_eq!(root.children_of(root.root_id()).len(), 2);
        assert_eq!(root.start, Position::new(0, 0));
        assert_eq!(root.end, Position::new(3, 6));
    }

    #[test]
    fn attaches_notes_to_the_preceding_item() {
        let lines = ["- one", "\t\tnote a", "\t\tnote b", "\t- two"];
        let root = parse_at(&lines, 0, 2).unwrap();
        let one = root.list_under_line(0).unwrap();
        assert_eq!(root.node(one).lines, vec!["one", "note a", "note b"]);
        assert_eq!(root.node(one).notes_indent.as_deref(), Some("\t\t"));
        assert_eq!(root.print(), lines.join("\n"));
    }

    #[test]
    fn parses_checkboxes_and_numbered_bullets() {
        let lines = ["1. [x] done", "2. [ ] pending", "\t- sub"];
        let root = parse_at(&lines, 0, 7).unwrap();
        let first = root.list_under_line(0).unwrap();
        let second = root.list_under_line(1).unwrap();
        assert_eq!(root.node(first).bullet, "1.");
        assert_eq!(root.node(first).checkbox.as_deref(), Some("[x]"));
        assert_eq!(root.node(first).lines, vec!["done"]);
        assert_eq!(root.node(second).checkbox.as_deref(), Some("[ ]"));
        assert_eq!(root.print(), lines.join("\n"));
    }

    #[test]
    fn cursor_on_note_line_parses_the_whole_list() {
        let lines = ["- one", "\ttext under one", "- two"];
        let root = parse_at(&lines, 1, 4).unwrap();
        assert_eq!(root.print(), lines.join("\n"));
    }

    #[rstest]
    #[case(&["plain paragraph"], 0)]
    #[case(&["# heading", "text"], 1)]
    fn non_list_lines_parse_to_none(#[case] lines: &[&str], #[case] cursor_line: usize) {
        assert!(parse_at(lines, cursor_line, 0).is_none());
    }

    #[test]
    fn cursor_on_a_later_top_level_item_parses_from_the_first() {
        let lines = ["- one", "- two", "\t- sub", "- three"];
        let root = parse_at(&lines, 3, 4).unwrap();
        assert_eq!(root.start, Position::new(0, 0));
        assert_eq!(root.print(), lines.join("\n"));
        assert_eq!(root.children_of(root.root_id()).len(), 3);
    }

    #[test]
    fn later_sibling_sees_the_items_above_it() {
        let root = parse_at(&["- one", "- two"], 1, 5).unwrap();
        let two = root.list_under_line(1).unwrap();
        assert!(
            root.prev_sibling(two).is_some(),
            "the item above the cursor is part of the tree"
        );
    }

    #[test]
    fn indented_fragment_without_zero_indent_start_is_not_a_list() {
        assert!(parse_at(&["\t- floating", "\t- items"], 0, 3).is_none());
    }

    #[test]
    fn continuation_with_no_list_above_is_an_orphan() {
        let lines = ["paragraph", "\tdangling note"];
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        editor.set_selections(vec![crate::model::Selection::cursor(Position::new(1, 3))]);
        let err = try_parse(&editor, Position::new(1, 3)).unwrap_err();
        assert_eq!(err, ParseError::OrphanContinuation { line: 1 });
        assert!(parse(&editor, Position::new(1, 3)).is_none());
    }

    #[test]
    fn list_ends_at_first_foreign_line() {
        let lines = ["- one", "- two", "", "- separate"];
        let root = parse_at(&lines, 0, 2).unwrap();
        assert_eq!(root.print(), "- one\n- two");
        assert_eq!(root.end.line, 1);
    }

    #[test]
    fn trailing_whitespace_artifact_is_excluded() {
        let lines = ["- one", "\t- two", "\t"];
        let root = parse_at(&lines, 1, 3).unwrap();
        assert_eq!(root.end.line, 1);
        assert_eq!(root.print(), "- one\n\t- two");
    }

    #[test]
    fn cursor_on_excluded_artifact_line_is_none() {
        assert!(parse_at(&["- one", "\t"], 1, 1).is_none());
    }

    #[test]
    fn whitespace_line_matching_notes_indent_is_an_empty_note() {
        let lines = ["- one", "\tnote", "\t", "\tmore"];
        let root = parse_at(&lines, 0, 2).unwrap();
        let one = root.list_under_line(0).unwrap();
        assert_eq!(root.node(one).lines, vec!["one", "note", "", "more"]);
        assert_eq!(root.print(), lines.join("\n"));
    }

    #[test]
    fn mixed_indent_is_a_diagnosed_parse_failure() {
        let lines = ["- one", "\t- two", "  - three"];
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        editor.set_selections(vec![crate::model::Selection::cursor(Position::new(0, 2))]);

        let err = try_parse(&editor, Position::new(0, 2)).unwrap_err();
        assert_eq!(
            err,
            ParseError::InconsistentIndent {
                line: 2,
                expected: "T".to_string(),
                actual: "SS".to_string(),
            }
        );
        assert!(parse(&editor, Position::new(0, 2)).is_none());
    }

    #[test]
    fn note_indent_mismatch_is_a_parse_failure() {
        let lines = ["- one", "\t\tnote", "\t also note"];
        let editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        let err = try_parse(&editor, Position::new(0, 2)).unwrap_err();
        assert!(matches!(err, ParseError::NoteIndentMismatch { line: 2, .. }));
    }

    #[test]
    fn note_shallower_than_its_item_is_a_parse_failure() {
        let lines = ["- one", "\t- two", " note"];
        let editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        let err = try_parse(&editor, Position::new(1, 3)).unwrap_err();
        assert!(matches!(err, ParseError::InconsistentIndent { line: 2, .. }));
    }

    #[test]
    fn fold_state_is_read_below_the_bullet_line() {
        let lines = ["- one", "\t- two", "\t- three", "- four"];
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        editor.set_fold(0, 2);
        let root = parse(&editor, Position::new(0, 2)).unwrap();
        let one = root.list_under_line(0).unwrap();
        let four = root.list_under_line(3).unwrap();
        assert!(root.node(one).folded);
        assert!(!root.node(four).folded);
        assert_eq!(root.fold_roots(), vec![one]);
    }

    #[test]
    fn selections_are_copied_from_the_reader() {
        let lines = ["- one", "- two"];
        let mut editor = MemoryEditor::new(lines.iter().map(|l| l.to_string()).collect());
        let sel = crate::model::Selection::new(Position::new(0, 2), Position::new(1, 5));
        editor.set_selections(vec![sel]);
        let root = parse(&editor, Position::new(1, 5)).unwrap();
        assert_eq!(root.selections(), &[sel]);
    }
}
