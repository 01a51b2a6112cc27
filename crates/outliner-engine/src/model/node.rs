/// Index of a node in a [`crate::model::Root`] arena.
///
/// Ids are assigned at creation and survive `Root::clone`, so the same id
/// addresses the corresponding node in a pre-mutation snapshot and in the
/// mutated tree. They are never reused within one parse cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// One outline item: a bullet line plus optional note continuation lines and
/// child items.
///
/// The first content line renders as `{indent}{bullet} {checkbox }{lines[0]}`;
/// every further line renders as `{notes_indent}{lines[i]}`. Text positions
/// are never stored here; the tree derives them from line counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode {
    /// Literal leading whitespace of the first line. Must strictly extend the
    /// parent's indent.
    pub indent: String,
    /// `-`, `*`, `+` or `N.`. Empty only on the synthetic root.
    pub bullet: String,
    /// Optional `[ ]`/`[x]`-style marker immediately after the bullet.
    pub checkbox: Option<String>,
    /// First line's content plus zero or more note lines.
    pub lines: Vec<String>,
    /// Shared indent of the note lines; set lazily by the first note and
    /// strictly deeper than `indent`. Only bulk re-indents may shift it.
    pub notes_indent: Option<String>,
    /// True when this node is collapsed in the host editor.
    pub folded: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

impl ListNode {
    pub(crate) fn synthetic_root() -> Self {
        Self {
            indent: String::new(),
            bullet: String::new(),
            checkbox: None,
            lines: Vec::new(),
            notes_indent: None,
            folded: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn new(indent: String, bullet: String, checkbox: Option<String>, first_line: String) -> Self {
        Self {
            indent,
            bullet,
            checkbox,
            lines: vec![first_line],
            notes_indent: None,
            folded: false,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Number of content lines (first line + notes) this node itself spans.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Column where content starts on the first line: after indent, bullet,
    /// the space following the bullet, and the optional checkbox.
    pub fn first_line_content_start_ch(&self) -> usize {
        let checkbox_len = self.checkbox.as_ref().map_or(0, |c| c.len() + 1);
        self.indent.len() + self.bullet.len() + 1 + checkbox_len
    }

    /// Renders the node's own lines (no children) into `out`.
    pub(crate) fn print_own_lines(&self, out: &mut Vec<String>) {
        let mut first = format!("{}{} ", self.indent, self.bullet);
        if let Some(checkbox) = &self.checkbox {
            first.push_str(checkbox);
            first.push(' ');
        }
        first.push_str(&self.lines[0]);
        out.push(first);

        if self.lines.len() > 1 {
            let notes_indent = self.notes_indent.as_deref().unwrap_or("");
            for note in &self.lines[1..] {
                out.push(format!("{notes_indent}{note}"));
            }
        }
    }
}
