use crate::model::node::{ListNode, NodeId};
use crate::model::position::{Position, Selection};

/// The outline tree bound to a contiguous text range.
///
/// Nodes live in an arena indexed by [`NodeId`]; parent/child links are ids,
/// never references, so mutation can't leave dangling pointers. A detached
/// subtree stays in the arena (ids remain valid for diffing) but is no longer
/// reachable from the synthetic root.
///
/// `start`/`end` describe the text range the outline occupied *at parse
/// time*. They are snapshot labels consumed by the change applicator and go
/// stale as soon as the tree is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Root {
    nodes: Vec<ListNode>,
    root: NodeId,
    pub start: Position,
    pub end: Position,
    selections: Vec<Selection>,
}

impl Root {
    pub fn new(start: Position, end: Position) -> Self {
        Self {
            nodes: vec![ListNode::synthetic_root()],
            root: NodeId(0),
            start,
            end,
            selections: Vec::new(),
        }
    }

    /// The synthetic, invisible parent of the top-level items.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &ListNode {
        &self.nodes[id.index()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut ListNode {
        &mut self.nodes[id.index()]
    }

    /// Adds a node to the arena without attaching it anywhere.
    pub fn alloc(&mut self, node: ListNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    // ---- structure -------------------------------------------------------

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    fn sibling_index(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node(id).parent?;
        let idx = self
            .node(parent)
            .children
            .iter()
            .position(|&c| c == id)
            .unwrap_or_else(|| unreachable!("child missing from its parent's children"));
        Some((parent, idx))
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, idx) = self.sibling_index(id)?;
        if idx == 0 {
            None
        } else {
            Some(self.node(parent).children[idx - 1])
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, idx) = self.sibling_index(id)?;
        self.node(parent).children.get(idx + 1).copied()
    }

    /// Detaches `id` from its parent. The node keeps its children.
    pub fn detach(&mut self, id: NodeId) {
        if let Some((parent, idx)) = self.sibling_index(id) {
            self.node_mut(parent).children.remove(idx);
            self.node_mut(id).parent = None;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none());
        self.node_mut(parent).children.push(child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn add_first_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.node(child).parent.is_none());
        self.node_mut(parent).children.insert(0, child);
        self.node_mut(child).parent = Some(parent);
    }

    pub fn add_before(&mut self, sibling: NodeId, new: NodeId) {
        let (parent, idx) = self
            .sibling_index(sibling)
            .unwrap_or_else(|| unreachable!("add_before target has no parent"));
        self.node_mut(parent).children.insert(idx, new);
        self.node_mut(new).parent = Some(parent);
    }

    pub fn add_after(&mut self, sibling: NodeId, new: NodeId) {
        let (parent, idx) = self
            .sibling_index(sibling)
            .unwrap_or_else(|| unreachable!("add_after target has no parent"));
        self.node_mut(parent).children.insert(idx + 1, new);
        self.node_mut(new).parent = Some(parent);
    }

    /// Whether `id` is still reachable from the synthetic root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cur = id;
        loop {
            if cur == self.root {
                return true;
            }
            match self.node(cur).parent {
                Some(parent) => cur = parent,
                None => return false,
            }
        }
    }

    /// Whether `ancestor` contains `id` (strictly; a node is not its own
    /// ancestor).
    pub fn is_ancestor_of(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cur = self.node(id).parent;
        while let Some(p) = cur {
            if p == ancestor {
                return true;
            }
            cur = self.node(p).parent;
        }
        false
    }

    /// Pre-order traversal of the attached items (the synthetic root itself
    /// is not yielded).
    pub fn iter_items(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(self.root).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev());
        }
        out
    }

    // ---- derived positions ----------------------------------------------
    //
    // All line numbers are absolute (relative to the host buffer), derived
    // from `start.line` plus each preceding node's line count in one walk.

    pub fn line_count(&self, id: NodeId) -> usize {
        self.node(id).line_count()
    }

    pub fn subtree_line_count(&self, id: NodeId) -> usize {
        let node = self.node(id);
        node.line_count()
            + node
                .children
                .iter()
                .map(|&c| self.subtree_line_count(c))
                .sum::<usize>()
    }

    /// Absolute first line of the node, or `None` if detached.
    pub fn first_line_of(&self, id: NodeId) -> Option<usize> {
        if !self.is_attached(id) {
            return None;
        }
        let mut line = self.start.line;
        for item in self.iter_items() {
            if item == id {
                return Some(line);
            }
            line += self.line_count(item);
        }
        None
    }

    /// Absolute last line of the node's own content (notes included,
    /// children excluded).
    pub fn last_own_line_of(&self, id: NodeId) -> Option<usize> {
        Some(self.first_line_of(id)? + self.line_count(id) - 1)
    }

    /// Absolute last line of the node's whole subtree.
    pub fn last_subtree_line(&self, id: NodeId) -> Option<usize> {
        Some(self.first_line_of(id)? + self.subtree_line_count(id) - 1)
    }

    /// The item whose own content lines contain the given absolute line.
    pub fn list_under_line(&self, line: usize) -> Option<NodeId> {
        let mut cur = self.start.line;
        for item in self.iter_items() {
            let count = self.line_count(item);
            if line >= cur && line < cur + count {
                return Some(item);
            }
            cur += count;
        }
        None
    }

    /// Content start column of the given content line (0 = bullet line).
    pub fn content_start_ch(&self, id: NodeId, line_idx: usize) -> usize {
        let node = self.node(id);
        if line_idx == 0 {
            node.first_line_content_start_ch()
        } else {
            node.notes_indent.as_ref().map_or(0, |n| n.len())
        }
    }

    /// Rendered length of the given content line.
    pub fn line_len(&self, id: NodeId, line_idx: usize) -> usize {
        self.content_start_ch(id, line_idx) + self.node(id).lines[line_idx].len()
    }

    /// Content start position of the node's first line.
    pub fn content_start_of(&self, id: NodeId) -> Option<Position> {
        let line = self.first_line_of(id)?;
        Some(Position::new(line, self.content_start_ch(id, 0)))
    }

    /// `[from, to]` of the node's own content lines: content start of the
    /// first line through the end of the last own line.
    pub fn content_range_of(&self, id: NodeId) -> Option<(Position, Position)> {
        let first = self.first_line_of(id)?;
        let last_idx = self.line_count(id) - 1;
        let from = Position::new(first, self.content_start_ch(id, 0));
        let to = Position::new(first + last_idx, self.line_len(id, last_idx));
        Some((from, to))
    }

    /// `[from, to]` of the node's whole subtree: content start of its first
    /// line through the end of its last descendant's last line.
    pub fn subtree_range_of(&self, id: NodeId) -> Option<(Position, Position)> {
        let from = self.content_start_of(id)?;
        let mut last = id;
        while let Some(&tail) = self.node(last).children.last() {
            last = tail;
        }
        let last_first = self.first_line_of(last)?;
        let last_idx = self.line_count(last) - 1;
        let to = Position::new(last_first + last_idx, self.line_len(last, last_idx));
        Some((from, to))
    }

    /// `[from, to]` of the whole parsed outline's content: content start of
    /// the first item through the end of the last line.
    pub fn whole_range(&self) -> Option<(Position, Position)> {
        let &first = self.node(self.root).children.first()?;
        let from = self.content_start_of(first)?;
        let mut last_line = self.start.line;
        let mut last = first;
        for item in self.iter_items() {
            last = item;
            last_line = self.first_line_of(item)? + self.line_count(item) - 1;
        }
        let to = Position::new(last_line, self.line_len(last, self.line_count(last) - 1));
        Some((from, to))
    }

    // ---- folds -----------------------------------------------------------

    /// True when the node itself or any ancestor carries the fold flag.
    pub fn is_folded(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(n) = cur {
            if self.node(n).folded {
                return true;
            }
            cur = self.node(n).parent;
        }
        false
    }

    /// A fold root is the topmost folded node of a hidden subtree: folded,
    /// has something to hide, and no folded ancestor.
    pub fn is_fold_root(&self, id: NodeId) -> bool {
        let node = self.node(id);
        if !node.folded || node.children.is_empty() && node.line_count() == 1 {
            return false;
        }
        let mut cur = node.parent;
        while let Some(p) = cur {
            if self.node(p).folded {
                return false;
            }
            cur = self.node(p).parent;
        }
        true
    }

    pub fn fold_roots(&self) -> Vec<NodeId> {
        self.iter_items()
            .into_iter()
            .filter(|&id| self.is_fold_root(id))
            .collect()
    }

    // ---- bulk re-indent --------------------------------------------------

    /// Inserts `chars` at column `pos` of the indent (and notes indent) of
    /// `id` and every descendant. All affected indents share the prefix up to
    /// `pos`, so one column addresses them all.
    pub fn indent_subtree(&mut self, id: NodeId, pos: usize, chars: &str) {
        let node = self.node_mut(id);
        node.indent.insert_str(pos, chars);
        if let Some(notes) = &mut node.notes_indent {
            notes.insert_str(pos, chars);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.indent_subtree(child, pos, chars);
        }
    }

    /// Removes the indent slice `[from, till)` from `id` and every
    /// descendant.
    pub fn unindent_subtree(&mut self, id: NodeId, from: usize, till: usize) {
        let node = self.node_mut(id);
        node.indent.replace_range(from..till, "");
        if let Some(notes) = &mut node.notes_indent {
            notes.replace_range(from..till, "");
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.unindent_subtree(child, from, till);
        }
    }

    /// Replaces the leading `old_prefix_len` columns of every indent in the
    /// subtree with `new_prefix`. Used when a subtree moves to a different
    /// depth entirely (drag, cross-parent moves).
    pub fn reindent_subtree(&mut self, id: NodeId, old_prefix_len: usize, new_prefix: &str) {
        let node = self.node_mut(id);
        node.indent.replace_range(..old_prefix_len, new_prefix);
        if let Some(notes) = &mut node.notes_indent {
            notes.replace_range(..old_prefix_len, new_prefix);
        }
        let children = self.node(id).children.clone();
        for child in children {
            self.reindent_subtree(child, old_prefix_len, new_prefix);
        }
    }

    // ---- selections ------------------------------------------------------

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn set_selections(&mut self, selections: Vec<Selection>) {
        self.selections = selections;
    }

    pub fn has_single_selection(&self) -> bool {
        self.selections.len() == 1
    }

    /// The primary cursor: head of the first selection.
    pub fn cursor(&self) -> Position {
        self.selections
            .first()
            .map(|s| s.head)
            .unwrap_or(self.start)
    }

    pub fn set_cursor(&mut self, pos: Position) {
        self.selections = vec![Selection::cursor(pos)];
    }

    // ---- printing --------------------------------------------------------

    pub fn print_lines(&self) -> Vec<String> {
        let mut out = Vec::new();
        for item in self.iter_items() {
            self.node(item).print_own_lines(&mut out);
        }
        out
    }

    pub fn print(&self) -> String {
        self.print_lines().join("\n")
    }
}
