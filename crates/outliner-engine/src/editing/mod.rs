//! Structural editing: the operation catalog, numeric renumbering, and the
//! change applicator that reconciles a mutated tree back into the host
//! buffer.
//!
//! The editing cycle is parse → clone → mutate → apply:
//!
//! ```
//! use outliner_engine::editing::{apply, operations::indent_item};
//! use outliner_engine::editor::{IndentDefaults, MemoryEditor, Reader};
//! use outliner_engine::parsing::parse;
//!
//! let mut editor = MemoryEditor::from_marked_lines(&["- one", "- two|"]);
//! let indent = IndentDefaults::of(&editor).indent_string();
//!
//! if let Some(mut root) = parse(&editor, editor.get_cursor()) {
//!     let prev = root.clone();
//!     if indent_item(&mut root, &indent).changed() {
//!         apply(&mut editor, &prev, &root);
//!     }
//! }
//! assert_eq!(editor.to_marked_lines(), vec!["- one", "\t- two|"]);
//! ```

pub mod applicator;
pub mod operations;
pub mod outcome;
pub mod renumber;

pub use applicator::apply;
pub use outcome::Outcome;
pub use renumber::recalculate_numeric_bullets;
