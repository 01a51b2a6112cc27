pub mod node;
pub mod position;
pub mod tree;

pub use node::{ListNode, NodeId};
pub use position::{Position, Selection, max_pos, min_pos, ranges_intersect};
pub use tree::Root;
