//! Editable text field state for Cranpose.
//!
//! This crate provides the core types behind text fields: storage, edit
//! transactions, change tracking, undo history, and transformations. All
//! offsets are codepoint indices.
//!
//! # Core Types
//!
//! - [`TextRange`] - Represents cursor position or text selection range
//! - [`TextFieldCharSequence`] - Immutable snapshot of a text field's content
//! - [`TextFieldBuffer`] - Mutable buffer for editing text with change tracking
//! - [`TextFieldState`] - Observable state holder with undo/redo
//! - [`TextFieldLineLimits`] - Controls single-line vs multi-line input
//!
//! Storage and bookkeeping:
//!
//! - [`GapBuffer`] and [`PartialGapBuffer`] - Text stores behind the buffer
//! - [`ChangeTracker`] - Changed intervals of one edit transaction
//! - [`UndoManager`] and [`TextUndoManager`] - History stacks and merge policy
//!
//! # Example
//!
//! ```
//! use cranpose_text_input::{MaxLength, TextFieldState};
//!
//! let state = TextFieldState::builder("Hello")
//!     .input_transformation(MaxLength(13))
//!     .build();
//! state.edit(|buffer| {
//!     buffer.place_cursor_at_end();
//!     buffer.append(", World!");
//! });
//! assert_eq!(state.text(), "Hello, World!");
//!
//! // Too long: the transformation rejects the edit.
//! state.edit(|buffer| buffer.append("!"));
//! assert_eq!(state.text(), "Hello, World!");
//! ```

mod buffer;
mod change_tracker;
mod chars;
mod clock;
mod error;
mod gap_buffer;
mod line_limits;
mod partial_gap_buffer;
mod range;
mod state;
pub mod transform;
pub mod undo;
mod value;

pub use buffer::TextFieldBuffer;
pub use change_tracker::{ChangeList, ChangeTracker};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Result, TextFieldError};
pub use gap_buffer::{GapBuffer, TextStore, DEFAULT_GAP_SIZE};
pub use line_limits::{filter_for_single_line, TextFieldLineLimits};
pub use partial_gap_buffer::{PartialGapBuffer, SURROUNDING_SIZE};
pub use range::TextRange;
pub use state::{ChangeListenerId, SavedTextFieldState, TextFieldState, TextFieldStateBuilder};
pub use transform::{
    apply_codepoint_transformation, apply_output_transformation, AllCaps, ByValue,
    CodepointTransformation, Filter, InputTransformation, MaskWith, MaxLength,
    OutputTransformation, SingleLine, TransformedText,
};
pub use undo::{
    TextFieldEditUndoBehavior, TextUndoManager, TextUndoOperation, UndoManager,
};
pub use value::{PlacedAnnotation, TextFieldCharSequence, TextHighlight, TextHighlightType};
