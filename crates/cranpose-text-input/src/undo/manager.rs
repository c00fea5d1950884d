//! Bounded undo/redo stacks, independent of what is being undone.

use std::collections::VecDeque;

use crate::error::{Result, TextFieldError};

/// Capacity used when a non-positive capacity is requested.
pub const DEFAULT_UNDO_CAPACITY: usize = 100;

/// Two stacks of history entries sharing one capacity.
///
/// Recording a new entry clears the redo stack. When the undo stack grows past
/// the capacity the oldest entry is dropped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndoManager<T> {
    /// Oldest entry at the front, most recent at the back.
    undo_stack: VecDeque<T>,
    /// Next entry to redo at the back.
    redo_stack: Vec<T>,
    capacity: usize,
}

impl<T> UndoManager<T> {
    /// Creates an empty manager. A capacity of `0` becomes
    /// [`DEFAULT_UNDO_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            capacity: coerce_capacity(capacity),
        }
    }

    /// Restores a manager from saved stacks, each ordered bottom to top.
    ///
    /// History beyond the capacity is dropped, oldest undo entries first.
    pub fn with_history(undo_stack: Vec<T>, redo_stack: Vec<T>, capacity: usize) -> Self {
        let mut manager = Self {
            undo_stack: undo_stack.into(),
            redo_stack,
            capacity: coerce_capacity(capacity),
        };
        let excess = manager.size().saturating_sub(manager.capacity);
        if excess > 0 {
            log::warn!(
                "restored undo history has {} entries, capacity is {}; dropping {} oldest",
                manager.size(),
                manager.capacity,
                excess
            );
            let from_undo = excess.min(manager.undo_stack.len());
            manager.undo_stack.drain(..from_undo);
            manager.redo_stack.drain(..excess - from_undo);
        }
        manager
    }

    /// Pushes `item` onto the undo stack and clears the redo stack.
    pub fn record(&mut self, item: T) {
        self.redo_stack.clear();
        self.undo_stack.push_back(item);
        while self.size() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn peek_undo(&self) -> Option<&T> {
        self.undo_stack.back()
    }

    pub fn peek_redo(&self) -> Option<&T> {
        self.redo_stack.last()
    }

    /// Replaces the most recent undo entry.
    pub fn replace_top(&mut self, item: T) -> Result<()> {
        let top = self
            .undo_stack
            .back_mut()
            .ok_or(TextFieldError::EmptyUndoStack)?;
        *top = item;
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Entries across both stacks.
    pub fn size(&self) -> usize {
        self.undo_stack.len() + self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Clone> UndoManager<T> {
    /// Moves the most recent undo entry to the redo stack and returns it.
    pub fn undo(&mut self) -> Result<T> {
        let item = self
            .undo_stack
            .pop_back()
            .ok_or(TextFieldError::EmptyUndoStack)?;
        self.redo_stack.push(item.clone());
        Ok(item)
    }

    /// Moves the most recent redo entry back to the undo stack and returns it.
    pub fn redo(&mut self) -> Result<T> {
        let item = self
            .redo_stack
            .pop()
            .ok_or(TextFieldError::EmptyRedoStack)?;
        self.undo_stack.push_back(item.clone());
        Ok(item)
    }

    /// Copy of the undo stack, oldest first.
    pub fn undo_stack(&self) -> Vec<T> {
        self.undo_stack.iter().cloned().collect()
    }

    /// Copy of the redo stack, bottom first.
    pub fn redo_stack(&self) -> Vec<T> {
        self.redo_stack.clone()
    }
}

impl<T> Default for UndoManager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_CAPACITY)
    }
}

fn coerce_capacity(capacity: usize) -> usize {
    if capacity == 0 {
        DEFAULT_UNDO_CAPACITY
    } else {
        capacity
    }
}
