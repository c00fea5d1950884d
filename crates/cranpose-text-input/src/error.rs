//! Error type shared by the text stores, the edit buffer, and the undo stacks.

use thiserror::Error;

/// Errors reported by text field operations.
///
/// Mutators validate their arguments before touching any state, so an `Err`
/// always means nothing was applied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFieldError {
    #[error("index {index} is out of bounds for text of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("range {start}..{end} is invalid for text of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("TextFieldState::edit called while another edit is in progress")]
    ReentrantEdit,

    #[error("nothing to undo")]
    EmptyUndoStack,

    #[error("nothing to redo")]
    EmptyRedoStack,
}

pub type Result<T, E = TextFieldError> = std::result::Result<T, E>;

/// Checks that `index` is a valid cursor offset in a text of `len` codepoints.
pub(crate) fn check_offset(index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(TextFieldError::IndexOutOfRange { index, len });
    }
    Ok(())
}

/// Checks that `start..end` is an ordered range inside a text of `len` codepoints.
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<()> {
    if start > end || end > len {
        return Err(TextFieldError::InvalidRange { start, end, len });
    }
    Ok(())
}
