//! Undo history for text fields.
//!
//! - [`UndoManager`] - Bounded undo/redo stacks for any entry type
//! - [`TextUndoOperation`] - One undoable text change, with merge rules
//! - [`TextUndoManager`] - Staging and merging policy used by
//!   [`TextFieldState`](crate::TextFieldState)

mod manager;
mod operation;
mod text_undo;

pub use manager::{UndoManager, DEFAULT_UNDO_CAPACITY};
pub use operation::{TextDeleteType, TextEditType, TextUndoOperation, DEFAULT_MERGE_WINDOW_MS};
pub use text_undo::{SavedUndoState, TextFieldEditUndoBehavior, TextUndoManager};
