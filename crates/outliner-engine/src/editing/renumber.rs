use std::sync::LazyLock;

use regex::Regex;

use crate::model::{NodeId, Root};

static NUMBERED_BULLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.$").unwrap_or_else(|e| unreachable!("invalid numbered bullet regex: {e}"))
});

/// Renumbers `N.` bullets to a contiguous `1..N` within every sibling group,
/// in document order, recursively.
///
/// Run as a post-pass by every structural operation that can reorder or
/// re-parent siblings; non-numeric bullets in a group are left alone and do
/// not consume a number.
pub fn recalculate_numeric_bullets(root: &mut Root) {
    renumber_group(root, root.root_id());
}

fn renumber_group(root: &mut Root, parent: NodeId) {
    let children = root.children_of(parent).to_vec();
    let mut next = 0usize;
    for &child in &children {
        if NUMBERED_BULLET_RE.is_match(&root.node(child).bullet) {
            next += 1;
            let bullet = format!("{next}.");
            if root.node(child).bullet != bullet {
                root.node_mut(child).bullet = bullet;
            }
        }
    }
    for child in children {
        renumber_group(root, child);
    }
}
