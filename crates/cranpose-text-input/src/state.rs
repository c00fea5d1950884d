//! Observable state holder for a text field.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::buffer::TextFieldBuffer;
use crate::change_tracker::ChangeList;
use crate::chars::{char_slice, diff_window};
use crate::clock::{Clock, MonotonicClock};
use crate::error::{Result, TextFieldError};
use crate::range::TextRange;
use crate::transform::InputTransformation;
use crate::undo::{
    SavedUndoState, TextFieldEditUndoBehavior, TextUndoManager, TextUndoOperation,
    DEFAULT_MERGE_WINDOW_MS, DEFAULT_UNDO_CAPACITY,
};
use crate::value::TextFieldCharSequence;

type ChangeListener = Rc<dyn Fn(&TextFieldCharSequence, &TextFieldCharSequence)>;

/// Handle returned by [`TextFieldState::add_change_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChangeListenerId(u64);

struct TextFieldStateInner {
    value: RefCell<TextFieldCharSequence>,
    undo_manager: RefCell<TextUndoManager>,
    is_editing: Cell<bool>,
    input_transformation: RefCell<Option<Rc<dyn InputTransformation>>>,
    clock: Rc<dyn Clock>,
    listeners: RefCell<Vec<(ChangeListenerId, ChangeListener)>>,
    next_listener_id: Cell<u64>,
}

/// Holds the current content of a text field and its undo history.
///
/// All changes go through [`edit`](Self::edit): the block gets a
/// [`TextFieldBuffer`] over the current snapshot, the configured
/// [`InputTransformation`] runs after it, and the result is published as the
/// new snapshot in one step. Clones share the same state.
///
/// # Example
///
/// ```
/// use cranpose_text_input::TextFieldState;
///
/// let state = TextFieldState::new("Hello");
/// state.edit(|buffer| {
///     buffer.place_cursor_at_end();
///     buffer.append(", World!");
/// });
/// assert_eq!(state.text(), "Hello, World!");
///
/// state.undo().unwrap();
/// assert_eq!(state.text(), "Hello");
/// ```
#[derive(Clone)]
pub struct TextFieldState {
    inner: Rc<TextFieldStateInner>,
}

/// Clears the editing flag when the edit scope ends, including by panic.
struct EditScopeGuard<'a> {
    is_editing: &'a Cell<bool>,
}

impl Drop for EditScopeGuard<'_> {
    fn drop(&mut self) {
        self.is_editing.set(false);
    }
}

fn enter_edit_scope(is_editing: &Cell<bool>) -> EditScopeGuard<'_> {
    if is_editing.get() {
        panic!("{}", TextFieldError::ReentrantEdit);
    }
    is_editing.set(true);
    EditScopeGuard { is_editing }
}

impl TextFieldState {
    /// Creates a state holding `text` with the cursor at the end.
    pub fn new(text: impl Into<String>) -> Self {
        Self::builder(text).build()
    }

    pub fn with_selection(text: impl Into<String>, selection: TextRange) -> Self {
        Self::builder(text).selection(selection).build()
    }

    pub fn builder(text: impl Into<String>) -> TextFieldStateBuilder {
        TextFieldStateBuilder::new(text)
    }

    // ========== Reading ==========

    /// The current snapshot.
    pub fn value(&self) -> TextFieldCharSequence {
        self.inner.value.borrow().clone()
    }

    pub fn text(&self) -> String {
        self.inner.value.borrow().text().to_string()
    }

    pub fn selection(&self) -> TextRange {
        self.inner.value.borrow().selection()
    }

    pub fn composition(&self) -> Option<TextRange> {
        self.inner.value.borrow().composition()
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        self.inner.value.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.value.borrow().is_empty()
    }

    /// True while an edit block or input transformation is running.
    pub fn is_editing(&self) -> bool {
        self.inner.is_editing.get()
    }

    // ========== Editing ==========

    /// Runs `block` on a buffer over the current content and commits the
    /// result, merging it into the previous undo step when possible.
    ///
    /// # Panics
    ///
    /// Panics if called from inside another `edit` on the same state.
    pub fn edit<R>(&self, block: impl FnOnce(&mut TextFieldBuffer) -> R) -> R {
        self.edit_with_behavior(block, TextFieldEditUndoBehavior::MergeIfPossible)
    }

    /// Like [`edit`](Self::edit) with an explicit undo behavior.
    pub fn edit_with_behavior<R>(
        &self,
        block: impl FnOnce(&mut TextFieldBuffer) -> R,
        behavior: TextFieldEditUndoBehavior,
    ) -> R {
        let (result, change) = {
            let _scope = enter_edit_scope(&self.inner.is_editing);
            let mut buffer = TextFieldBuffer::new(self.value());
            let result = block(&mut buffer);
            self.apply_input_transformation(&mut buffer);
            (result, self.commit(&buffer, Some(behavior)))
        };
        if let Some((old, new)) = change {
            self.notify_listeners(&old, &new);
        }
        result
    }

    /// Like [`edit`](Self::edit), but discards the edit when `block` fails.
    pub fn try_edit<R, E>(
        &self,
        block: impl FnOnce(&mut TextFieldBuffer) -> Result<R, E>,
    ) -> Result<R, E> {
        let (result, change) = {
            let _scope = enter_edit_scope(&self.inner.is_editing);
            let mut buffer = TextFieldBuffer::new(self.value());
            match block(&mut buffer) {
                Ok(result) => {
                    self.apply_input_transformation(&mut buffer);
                    let change =
                        self.commit(&buffer, Some(TextFieldEditUndoBehavior::MergeIfPossible));
                    (Ok(result), change)
                }
                Err(err) => (Err(err), None),
            }
        };
        if let Some((old, new)) = change {
            self.notify_listeners(&old, &new);
        }
        result
    }

    /// Applies an edit without running the input transformation or touching
    /// undo history. Listeners are notified by the caller.
    pub(crate) fn edit_without_side_effects(
        &self,
        block: impl FnOnce(&mut TextFieldBuffer) -> Result<()>,
    ) -> Result<()> {
        let _scope = enter_edit_scope(&self.inner.is_editing);
        let mut buffer = TextFieldBuffer::new(self.value());
        block(&mut buffer)?;
        self.commit(&buffer, None);
        Ok(())
    }

    fn apply_input_transformation(&self, buffer: &mut TextFieldBuffer) {
        let transformation = self.inner.input_transformation.borrow().clone();
        if let Some(transformation) = transformation {
            transformation.transform_input(buffer);
        }
    }

    /// Publishes the buffer's content if it differs from the current snapshot,
    /// recording an undo step when `behavior` is set and the text changed.
    fn commit(
        &self,
        buffer: &TextFieldBuffer,
        behavior: Option<TextFieldEditUndoBehavior>,
    ) -> Option<(TextFieldCharSequence, TextFieldCharSequence)> {
        let new_value = buffer.finalize();
        let mut value = self.inner.value.borrow_mut();
        if *value == new_value {
            return None;
        }
        if let Some(behavior) = behavior {
            if !value.content_equals(new_value.text()) {
                let op = self.undo_operation(buffer, &value, &new_value, behavior);
                self.inner
                    .undo_manager
                    .borrow_mut()
                    .record_with_behavior(op, behavior);
            }
        }
        log::trace!(
            "text field committed: {} codepoints, selection {:?}",
            new_value.len(),
            new_value.selection()
        );
        let old_value = std::mem::replace(&mut *value, new_value.clone());
        Some((old_value, new_value))
    }

    /// Builds the undo step for an edit from `old` to `new`, narrowed to the
    /// span the buffer reports as changed.
    fn undo_operation(
        &self,
        buffer: &TextFieldBuffer,
        old: &TextFieldCharSequence,
        new: &TextFieldCharSequence,
        behavior: TextFieldEditUndoBehavior,
    ) -> TextUndoOperation {
        let (start, pre_end, post_end) = changed_window(buffer, old.text(), new.text());
        TextUndoOperation::new(
            start,
            char_slice(old.text(), start, pre_end),
            char_slice(new.text(), start, post_end),
            old.selection(),
            new.selection(),
            self.inner.clock.now_ms(),
            behavior == TextFieldEditUndoBehavior::MergeIfPossible,
        )
    }

    // ========== Convenience edits ==========

    pub fn set_text_and_place_cursor_at_end(&self, text: &str) {
        self.edit(|buffer| buffer.set_text_and_place_cursor_at_end(text));
    }

    pub fn set_text_and_select_all(&self, text: &str) {
        self.edit(|buffer| buffer.set_text_and_select_all(text));
    }

    pub fn clear_text(&self) {
        self.edit(|buffer| buffer.set_text_and_place_cursor_at_end(""));
    }

    pub fn select_all(&self) {
        self.edit(|buffer| buffer.select_all());
    }

    pub fn place_cursor_at_end(&self) {
        self.edit(|buffer| buffer.place_cursor_at_end());
    }

    // ========== Undo ==========

    /// Reverts the most recent undo step.
    pub fn undo(&self) -> Result<()> {
        let before = self.value();
        let result = self.inner.undo_manager.borrow_mut().undo(self);
        self.notify_if_changed(&before);
        result
    }

    /// Reapplies the most recently undone step.
    pub fn redo(&self) -> Result<()> {
        let before = self.value();
        let result = self.inner.undo_manager.borrow_mut().redo(self);
        self.notify_if_changed(&before);
        result
    }

    pub fn can_undo(&self) -> bool {
        self.inner.undo_manager.borrow().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.inner.undo_manager.borrow().can_redo()
    }

    pub fn clear_history(&self) {
        self.inner.undo_manager.borrow_mut().clear_history();
    }

    /// Seals the current undo step so the next edit starts a new one.
    pub fn commit_undo_staging(&self) {
        self.inner.undo_manager.borrow_mut().flush();
    }

    /// Copy of the undo history.
    pub fn undo_state(&self) -> SavedUndoState {
        self.inner.undo_manager.borrow().saved_state()
    }

    // ========== Configuration ==========

    pub fn input_transformation(&self) -> Option<Rc<dyn InputTransformation>> {
        self.inner.input_transformation.borrow().clone()
    }

    /// Replaces the transformation applied to later edits. The current
    /// content is not re-filtered.
    pub fn set_input_transformation(&self, transformation: Option<Rc<dyn InputTransformation>>) {
        *self.inner.input_transformation.borrow_mut() = transformation;
    }

    // ========== Listeners ==========

    /// Registers `listener` to be called with `(old, new)` after every
    /// published change, including undo and redo.
    pub fn add_change_listener(
        &self,
        listener: impl Fn(&TextFieldCharSequence, &TextFieldCharSequence) + 'static,
    ) -> ChangeListenerId {
        let id = ChangeListenerId(self.inner.next_listener_id.get());
        self.inner.next_listener_id.set(id.0 + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn remove_change_listener(&self, id: ChangeListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    fn notify_listeners(&self, old: &TextFieldCharSequence, new: &TextFieldCharSequence) {
        // Snapshot the list so listeners may add or remove listeners.
        let listeners: Vec<ChangeListener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(old, new);
        }
    }

    fn notify_if_changed(&self, before: &TextFieldCharSequence) {
        let after = self.value();
        if after != *before {
            self.notify_listeners(before, &after);
        }
    }

    // ========== Saved state ==========

    /// Content and undo history, for restoring the field later.
    pub fn saved_state(&self) -> SavedTextFieldState {
        let value = self.inner.value.borrow();
        SavedTextFieldState {
            text: value.text().to_string(),
            selection: value.selection(),
            undo: self.undo_state(),
        }
    }

    /// Restores a state saved with [`saved_state`](Self::saved_state).
    pub fn from_saved_state(saved: SavedTextFieldState) -> Self {
        let capacity = saved.undo.capacity;
        let state = Self::builder(saved.text)
            .selection(saved.selection)
            .undo_capacity(capacity)
            .build();
        *state.inner.undo_manager.borrow_mut() = TextUndoManager::from_saved_state(saved.undo);
        state
    }
}

/// Span `(start, pre_end, post_end)` that differs between `old` and `new`.
///
/// The buffer's change list bounds the span; the shared prefix and suffix
/// inside it are trimmed. Without tracked changes the whole texts are compared.
fn changed_window(buffer: &TextFieldBuffer, old: &str, new: &str) -> (usize, usize, usize) {
    let changes = buffer.changes();
    let count = changes.change_count();
    let bounds = (
        changes.get_original_range(0),
        changes.get_original_range(count.saturating_sub(1)),
        changes.get_range(count.saturating_sub(1)),
    );
    let (Some(first), Some(last_original), Some(last_current)) = bounds else {
        return diff_window(old, new);
    };
    let start = first.min();
    let (prefix, pre_end, post_end) = diff_window(
        char_slice(old, start, last_original.max()),
        char_slice(new, start, last_current.max()),
    );
    (start + prefix, start + pre_end, start + post_end)
}

impl fmt::Debug for TextFieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldState")
            .field("value", &*self.inner.value.borrow())
            .field("is_editing", &self.inner.is_editing.get())
            .finish_non_exhaustive()
    }
}

impl Default for TextFieldState {
    fn default() -> Self {
        Self::new("")
    }
}

/// Configures a [`TextFieldState`].
pub struct TextFieldStateBuilder {
    text: String,
    selection: Option<TextRange>,
    undo_capacity: usize,
    merge_window_ms: u64,
    clock: Option<Rc<dyn Clock>>,
    input_transformation: Option<Rc<dyn InputTransformation>>,
}

impl TextFieldStateBuilder {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: None,
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            merge_window_ms: DEFAULT_MERGE_WINDOW_MS,
            clock: None,
            input_transformation: None,
        }
    }

    /// Initial selection. Defaults to a cursor at the end of the text.
    pub fn selection(mut self, selection: TextRange) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn undo_capacity(mut self, capacity: usize) -> Self {
        self.undo_capacity = capacity;
        self
    }

    pub fn merge_window_ms(mut self, merge_window_ms: u64) -> Self {
        self.merge_window_ms = merge_window_ms;
        self
    }

    /// Time source for undo merging. Defaults to [`MonotonicClock`].
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Rc::new(clock));
        self
    }

    /// Transformation applied after every edit. It does not filter the
    /// initial text.
    pub fn input_transformation(
        mut self,
        transformation: impl InputTransformation + 'static,
    ) -> Self {
        self.input_transformation = Some(Rc::new(transformation));
        self
    }

    pub fn build(self) -> TextFieldState {
        let value = match self.selection {
            Some(selection) => TextFieldCharSequence::new(self.text, selection),
            None => TextFieldCharSequence::with_cursor_at_end(self.text),
        };
        let undo_manager =
            TextUndoManager::new(self.undo_capacity).with_merge_window(self.merge_window_ms);
        let clock = self
            .clock
            .unwrap_or_else(|| Rc::new(MonotonicClock::new()));
        TextFieldState {
            inner: Rc::new(TextFieldStateInner {
                value: RefCell::new(value),
                undo_manager: RefCell::new(undo_manager),
                is_editing: Cell::new(false),
                input_transformation: RefCell::new(self.input_transformation),
                clock,
                listeners: RefCell::new(Vec::new()),
                next_listener_id: Cell::new(0),
            }),
        }
    }
}

impl fmt::Debug for TextFieldStateBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldStateBuilder")
            .field("text", &self.text)
            .field("selection", &self.selection)
            .field("undo_capacity", &self.undo_capacity)
            .field("merge_window_ms", &self.merge_window_ms)
            .finish_non_exhaustive()
    }
}

/// Persistable form of a [`TextFieldState`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedTextFieldState {
    pub text: String,
    pub selection: TextRange,
    pub undo: SavedUndoState,
}
