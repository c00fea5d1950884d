//! Text-specific undo policy on top of [`UndoManager`].
//!
//! The most recent operation is held in a staging slot instead of going to the
//! undo stack immediately, so that the next compatible edit (another typed
//! character, another backspace) can merge into it.

use crate::error::Result;
use crate::state::TextFieldState;

use super::manager::{UndoManager, DEFAULT_UNDO_CAPACITY};
use super::operation::{TextUndoOperation, DEFAULT_MERGE_WINDOW_MS};

/// How an edit interacts with the undo history.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextFieldEditUndoBehavior {
    /// Merge with the previous edit when the merge rules allow it.
    #[default]
    MergeIfPossible,
    /// Record as its own undo step that later edits cannot merge into.
    NeverMerge,
    /// Drop all history. The edit itself is not undoable.
    ClearHistory,
}

/// Undo history of a [`TextFieldState`].
#[derive(Clone, Debug)]
pub struct TextUndoManager {
    staging: Option<TextUndoOperation>,
    history: UndoManager<TextUndoOperation>,
    merge_window_ms: u64,
}

impl TextUndoManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            staging: None,
            history: UndoManager::new(capacity),
            merge_window_ms: DEFAULT_MERGE_WINDOW_MS,
        }
    }

    /// Sets how far apart, in milliseconds, two edits may be and still merge.
    pub fn with_merge_window(mut self, merge_window_ms: u64) -> Self {
        self.merge_window_ms = merge_window_ms;
        self
    }

    pub fn merge_window_ms(&self) -> u64 {
        self.merge_window_ms
    }

    /// The operation waiting to be merged or committed.
    pub fn staging(&self) -> Option<&TextUndoOperation> {
        self.staging.as_ref()
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    pub fn can_undo(&self) -> bool {
        self.staging.is_some() || self.history.can_undo()
    }

    /// False while an operation is staged: committing it clears redo.
    pub fn can_redo(&self) -> bool {
        self.staging.is_none() && self.history.can_redo()
    }

    /// Records `op`, merging it into the staged operation when possible.
    pub fn record(&mut self, op: TextUndoOperation) {
        let merged = self
            .staging
            .as_ref()
            .and_then(|staged| staged.merge_within(&op, self.merge_window_ms));
        match merged {
            Some(merged) => {
                log::trace!(
                    "merged undo operation at {}: {:?} -> {:?}",
                    merged.index(),
                    merged.pre_text(),
                    merged.post_text()
                );
                self.staging = Some(merged);
            }
            None => {
                self.flush();
                log::trace!("staged undo operation {:?} at {}", op.kind(), op.index());
                self.staging = Some(op);
            }
        }
    }

    pub fn record_with_behavior(
        &mut self,
        op: TextUndoOperation,
        behavior: TextFieldEditUndoBehavior,
    ) {
        match behavior {
            TextFieldEditUndoBehavior::MergeIfPossible => self.record(op),
            TextFieldEditUndoBehavior::NeverMerge => {
                self.flush();
                self.history.record(op.with_can_merge(false));
            }
            TextFieldEditUndoBehavior::ClearHistory => self.clear_history(),
        }
    }

    /// Commits the staged operation to the undo stack.
    pub fn flush(&mut self) {
        if let Some(op) = self.staging.take() {
            self.history.record(op);
        }
    }

    pub fn clear_history(&mut self) {
        log::debug!("clearing text undo history ({} entries)", self.history.size());
        self.staging = None;
        self.history.clear_history();
    }

    /// Reverts the most recent undo step on `state`.
    pub fn undo(&mut self, state: &TextFieldState) -> Result<()> {
        self.flush();
        let op = self.history.undo()?;
        log::debug!("undo {:?} at {}", op.kind(), op.index());
        state.edit_without_side_effects(|buffer| {
            let (start, end) = op.post_range();
            buffer.replace(start, end, op.pre_text())?;
            let selection = op.pre_selection();
            buffer.set_selection(selection.start, selection.end)
        })
    }

    /// Reapplies the most recently undone step on `state`.
    pub fn redo(&mut self, state: &TextFieldState) -> Result<()> {
        self.flush();
        let op = self.history.redo()?;
        log::debug!("redo {:?} at {}", op.kind(), op.index());
        state.edit_without_side_effects(|buffer| {
            let (start, end) = op.pre_range();
            buffer.replace(start, end, op.post_text())?;
            let selection = op.post_selection();
            buffer.set_selection(selection.start, selection.end)
        })
    }

    /// Copy of the history, for persistence.
    pub fn saved_state(&self) -> SavedUndoState {
        SavedUndoState {
            staging: self.staging.clone(),
            undo_stack: self.history.undo_stack(),
            redo_stack: self.history.redo_stack(),
            capacity: self.history.capacity(),
            merge_window_ms: self.merge_window_ms,
        }
    }

    /// Restores a manager from [`saved_state`](Self::saved_state) output.
    pub fn from_saved_state(saved: SavedUndoState) -> Self {
        Self {
            staging: saved.staging,
            history: UndoManager::with_history(saved.undo_stack, saved.redo_stack, saved.capacity),
            merge_window_ms: saved.merge_window_ms,
        }
    }
}

impl Default for TextUndoManager {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

/// Persistable form of a [`TextUndoManager`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedUndoState {
    pub staging: Option<TextUndoOperation>,
    pub undo_stack: Vec<TextUndoOperation>,
    pub redo_stack: Vec<TextUndoOperation>,
    pub capacity: usize,
    #[cfg_attr(feature = "serde", serde(default = "default_merge_window_ms"))]
    pub merge_window_ms: u64,
}

#[cfg(feature = "serde")]
fn default_merge_window_ms() -> u64 {
    DEFAULT_MERGE_WINDOW_MS
}
