use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Position, Selection};

/// Read-only view of the host text buffer, as much as the parser needs.
pub trait Reader {
    fn get_line(&self, n: usize) -> &str;
    /// Index of the last line in the buffer.
    fn last_line(&self) -> usize;
    fn get_cursor(&self) -> Position;
    fn list_selections(&self) -> Vec<Selection>;
    /// All lines currently hidden by folds.
    fn get_all_folded_lines(&self) -> Vec<usize>;
}

/// Full host-editor capability set consumed by the change applicator.
pub trait Editor: Reader {
    fn get_range(&self, from: Position, to: Position) -> String;
    fn replace_range(&mut self, text: &str, from: Position, to: Position);
    fn set_selections(&mut self, selections: Vec<Selection>);
    /// Collapses the fold region starting at the given line.
    fn fold(&mut self, line: usize);
    /// Removes the fold region starting at the given line.
    fn unfold(&mut self, line: usize);
    fn use_tab(&self) -> bool;
    fn tab_size(&self) -> usize;
}

/// Host indentation defaults, used when an indent level cannot be inferred
/// from the surrounding list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentDefaults {
    pub use_tab: bool,
    pub tab_size: usize,
}

impl IndentDefaults {
    pub fn of(editor: &impl Editor) -> Self {
        Self {
            use_tab: editor.use_tab(),
            tab_size: editor.tab_size(),
        }
    }

    /// One level of indentation as literal text.
    pub fn indent_string(&self) -> String {
        if self.use_tab {
            "\t".to_string()
        } else {
            " ".repeat(self.tab_size)
        }
    }
}

impl Default for IndentDefaults {
    fn default() -> Self {
        Self {
            use_tab: true,
            tab_size: 4,
        }
    }
}

/// Line-vector implementation of [`Reader`]/[`Editor`].
///
/// This is the reference host used by the integration tests. Fold regions are
/// registered explicitly via [`MemoryEditor::set_fold`]; `fold`/`unfold`
/// calls coming from the change applicator are recorded so tests can assert
/// the reconciliation order (a real host tracks fold extents itself).
#[derive(Debug, Clone)]
pub struct MemoryEditor {
    lines: Vec<String>,
    selections: Vec<Selection>,
    /// fold start line -> last hidden line (inclusive)
    folds: BTreeMap<usize, usize>,
    fold_calls: Vec<usize>,
    unfold_calls: Vec<usize>,
    replace_calls: Vec<(String, Position, Position)>,
    use_tab: bool,
    tab_size: usize,
}

impl MemoryEditor {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            selections: vec![Selection::cursor(Position::new(0, 0))],
            folds: BTreeMap::new(),
            fold_calls: Vec::new(),
            unfold_calls: Vec::new(),
            replace_calls: Vec::new(),
            use_tab: true,
            tab_size: 4,
        }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.split('\n').map(str::to_string).collect())
    }

    /// Builds an editor from lines where a single `|` marks the cursor.
    pub fn from_marked_lines(marked: &[&str]) -> Self {
        let mut cursor = Position::new(0, 0);
        let lines = marked
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if let Some(ch) = line.find('|') {
                    cursor = Position::new(i, ch);
                    line.replacen('|', "", 1)
                } else {
                    line.to_string()
                }
            })
            .collect();
        let mut editor = Self::new(lines);
        editor.selections = vec![Selection::cursor(cursor)];
        editor
    }

    /// The buffer with the cursor re-inserted as `|`, for test assertions.
    pub fn to_marked_lines(&self) -> Vec<String> {
        let cursor = self.get_cursor();
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i == cursor.line {
                    let mut marked = line.clone();
                    marked.insert(cursor.ch.min(line.len()), '|');
                    marked
                } else {
                    line.clone()
                }
            })
            .collect()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn with_indent_defaults(mut self, use_tab: bool, tab_size: usize) -> Self {
        self.use_tab = use_tab;
        self.tab_size = tab_size;
        self
    }

    /// Registers a fold starting at `start_line` hiding lines
    /// `start_line + 1 ..= end_line`.
    pub fn set_fold(&mut self, start_line: usize, end_line: usize) {
        self.folds.insert(start_line, end_line);
    }

    pub fn fold_calls(&self) -> &[usize] {
        &self.fold_calls
    }

    pub fn unfold_calls(&self) -> &[usize] {
        &self.unfold_calls
    }

    /// Every `replace_range` call so far, in order.
    pub fn replace_calls(&self) -> &[(String, Position, Position)] {
        &self.replace_calls
    }
}

impl Reader for MemoryEditor {
    fn get_line(&self, n: usize) -> &str {
        self.lines.get(n).map_or("", |l| l.as_str())
    }

    fn last_line(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn get_cursor(&self) -> Position {
        self.selections
            .first()
            .map(|s| s.head)
            .unwrap_or(Position::new(0, 0))
    }

    fn list_selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn get_all_folded_lines(&self) -> Vec<usize> {
        self.folds
            .iter()
            .flat_map(|(&start, &end)| start + 1..=end)
            .collect()
    }
}

impl Editor for MemoryEditor {
    fn get_range(&self, from: Position, to: Position) -> String {
        if from.line == to.line {
            return self.get_line(from.line)[from.ch..to.ch].to_string();
        }
        let mut out = self.get_line(from.line)[from.ch..].to_string();
        for line in from.line + 1..to.line {
            out.push('\n');
            out.push_str(self.get_line(line));
        }
        out.push('\n');
        out.push_str(&self.get_line(to.line)[..to.ch]);
        out
    }

    fn replace_range(&mut self, text: &str, from: Position, to: Position) {
        self.replace_calls.push((text.to_string(), from, to));
        let prefix = self.get_line(from.line)[..from.ch].to_string();
        let suffix = self.get_line(to.line)[to.ch..].to_string();
        let combined = format!("{prefix}{text}{suffix}");
        let replacement: Vec<String> = combined.split('\n').map(str::to_string).collect();
        self.lines.splice(from.line..=to.line, replacement);
    }

    fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    fn fold(&mut self, line: usize) {
        self.fold_calls.push(line);
    }

    fn unfold(&mut self, line: usize) {
        self.unfold_calls.push(line);
        self.folds.remove(&line);
    }

    fn use_tab(&self) -> bool {
        self.use_tab
    }

    fn tab_size(&self) -> usize {
        self.tab_size
    }
}
