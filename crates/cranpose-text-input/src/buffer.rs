//! Mutable text buffer used inside one edit transaction.
//!
//! A [`TextFieldBuffer`] starts as a copy of a [`TextFieldCharSequence`]
//! snapshot, accepts edits, records them in a [`ChangeTracker`], and is turned
//! back into a snapshot when the transaction ends.

use std::fmt;

use crate::change_tracker::ChangeTracker;
use crate::chars::char_len;
use crate::error::{check_offset, check_range, Result, TextFieldError};
use crate::gap_buffer::TextStore;
use crate::partial_gap_buffer::PartialGapBuffer;
use crate::range::TextRange;
use crate::value::{PlacedAnnotation, TextFieldCharSequence, TextHighlight, TextHighlightType};

/// A mutable text buffer that can be edited.
///
/// Text changes:
/// - [`replace`](Self::replace) - Replace a range with new text
/// - [`insert`](Self::insert) - Insert text at an offset
/// - [`delete`](Self::delete) - Delete a range of text
/// - [`append`](Self::append) - Add text at the end
///
/// Cursor and selection:
/// - [`set_selection`](Self::set_selection)
/// - [`place_cursor_at_end`](Self::place_cursor_at_end)
/// - [`place_cursor_before_char_at`](Self::place_cursor_before_char_at)
/// - [`select_all`](Self::select_all)
///
/// Offsets are codepoint indices. Methods taking offsets return an error and
/// leave the buffer untouched when an offset is outside `0..=len`.
///
/// # Example
///
/// ```
/// use cranpose_text_input::{TextFieldBuffer, TextFieldCharSequence, TextRange};
///
/// let value = TextFieldCharSequence::new("Hello", TextRange::cursor(5));
/// let mut buffer = TextFieldBuffer::new(value);
/// buffer.append(", World!");
/// assert_eq!(buffer.to_string(), "Hello, World!");
/// assert_eq!(buffer.selection(), TextRange::cursor(13));
/// ```
pub struct TextFieldBuffer {
    /// Snapshot the transaction started from.
    original_value: TextFieldCharSequence,
    text: Box<dyn TextStore>,
    selection: TextRange,
    /// IME composition range, if any
    composition: Option<TextRange>,
    composing_annotations: Vec<PlacedAnnotation>,
    highlight: Option<TextHighlight>,
    /// Display-only annotations added by output transformations.
    output_annotations: Vec<PlacedAnnotation>,
    changes: ChangeTracker,
}

impl TextFieldBuffer {
    /// Creates a buffer holding the content of `original_value`.
    pub fn new(original_value: TextFieldCharSequence) -> Self {
        let store = PartialGapBuffer::new(original_value.text());
        Self::with_store(original_value, Box::new(store))
    }

    pub(crate) fn with_store(
        original_value: TextFieldCharSequence,
        text: Box<dyn TextStore>,
    ) -> Self {
        Self {
            selection: original_value.selection(),
            composition: original_value.composition(),
            composing_annotations: original_value.composing_annotations().to_vec(),
            highlight: original_value.highlight(),
            output_annotations: Vec::new(),
            changes: ChangeTracker::new(),
            text,
            original_value,
        }
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_at(&self, index: usize) -> Result<char> {
        self.text.get(index).ok_or(TextFieldError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<String> {
        self.text.sub_sequence(start, end)
    }

    pub fn content_equals(&self, other: &str) -> bool {
        self.text.content_equals(other)
    }

    /// The snapshot this transaction started from.
    pub fn original_value(&self) -> &TextFieldCharSequence {
        &self.original_value
    }

    /// Changes made since the transaction started.
    pub fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    // ========== Text Modification ==========

    /// Replaces `start..end` with `text`.
    ///
    /// Selection, composition, and highlight follow the edit: offsets before
    /// it stay, offsets after it shift, and offsets inside the replaced range
    /// (including both ends) move to the end of the new text.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        self.do_replace(start, end, text)
    }

    pub fn insert(&mut self, index: usize, text: &str) -> Result<()> {
        self.do_replace(index, index, text)
    }

    pub fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        self.do_replace(start, end, "")
    }

    pub fn append(&mut self, text: &str) {
        let len = self.len();
        self.do_replace(len, len, text)
            .expect("end of text should be a valid insertion point");
    }

    /// Replaces all text with `text` and places the cursor after it.
    pub fn set_text_and_place_cursor_at_end(&mut self, text: &str) {
        let len = self.len();
        self.do_replace(0, len, text)
            .expect("whole text should be a valid range");
        self.place_cursor_at_end();
    }

    /// Replaces all text with `text` and selects it.
    pub fn set_text_and_select_all(&mut self, text: &str) {
        let len = self.len();
        self.do_replace(0, len, text)
            .expect("whole text should be a valid range");
        self.select_all();
    }

    /// Discards every change made in this transaction.
    pub fn revert_all_changes(&mut self) {
        self.text = Box::new(PartialGapBuffer::new(self.original_value.text()));
        self.selection = self.original_value.selection();
        self.highlight = self.original_value.highlight();
        self.composition = None;
        self.composing_annotations.clear();
        self.output_annotations.clear();
        self.changes.clear();
    }

    fn do_replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        check_range(start, end, self.len())?;
        let new_len = char_len(text);

        self.text.replace(start, end, text)?;
        self.changes.track_change(start, end, new_len);

        let adjust = |range: TextRange| adjust_range(range, start, end, new_len);
        self.selection = adjust(self.selection);
        self.composition = self.composition.map(adjust);
        self.highlight = self
            .highlight
            .map(|highlight| TextHighlight::new(highlight.kind, adjust(highlight.range)));
        for annotation in self
            .composing_annotations
            .iter_mut()
            .chain(self.output_annotations.iter_mut())
        {
            annotation.range = adjust(annotation.range);
        }
        Ok(())
    }

    // ========== Cursor/Selection Manipulation ==========

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    /// Returns true if there's a non-collapsed selection.
    pub fn has_selection(&self) -> bool {
        !self.selection.collapsed()
    }

    /// Selects `start..end`. `start > end` makes a backwards selection.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<()> {
        let len = self.len();
        check_offset(start, len)?;
        check_offset(end, len)?;
        self.selection = TextRange::new(start, end);
        Ok(())
    }

    /// Sets the selection, clamping it into the text.
    pub(crate) fn set_selection_coerced(&mut self, selection: TextRange) {
        self.selection = selection.coerce_in(self.len());
    }

    pub fn select_all(&mut self) {
        self.selection = TextRange::all(self.len());
    }

    pub fn place_cursor_at_end(&mut self) {
        self.selection = TextRange::cursor(self.len());
    }

    /// Places the cursor before the codepoint at `index`.
    pub fn place_cursor_before_char_at(&mut self, index: usize) -> Result<()> {
        check_offset(index, self.len())?;
        self.selection = TextRange::cursor(index);
        Ok(())
    }

    /// Places the cursor after the codepoint at `index`.
    pub fn place_cursor_after_char_at(&mut self, index: usize) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(TextFieldError::IndexOutOfRange { index, len });
        }
        self.selection = TextRange::cursor(index + 1);
        Ok(())
    }

    // ========== Composition and Highlight ==========

    pub fn composition(&self) -> Option<TextRange> {
        self.composition
    }

    /// Marks `start..end` as the text being composed by an input method.
    pub fn set_composition(&mut self, start: usize, end: usize) -> Result<()> {
        check_range(start.min(end), start.max(end), self.len())?;
        self.composition = Some(TextRange::normalized(start, end));
        Ok(())
    }

    /// Sets the styling annotations of the composing region.
    pub fn set_composing_annotations(&mut self, annotations: Vec<PlacedAnnotation>) -> Result<()> {
        let len = self.len();
        for annotation in &annotations {
            check_range(annotation.range.min(), annotation.range.max(), len)?;
        }
        self.composing_annotations = annotations;
        Ok(())
    }

    pub fn clear_composition(&mut self) {
        self.composition = None;
        self.composing_annotations.clear();
    }

    pub fn highlight(&self) -> Option<TextHighlight> {
        self.highlight
    }

    pub fn set_highlight(
        &mut self,
        kind: TextHighlightType,
        start: usize,
        end: usize,
    ) -> Result<()> {
        check_range(start.min(end), start.max(end), self.len())?;
        self.highlight = Some(TextHighlight::new(kind, TextRange::normalized(start, end)));
        Ok(())
    }

    pub fn clear_highlight(&mut self) {
        self.highlight = None;
    }

    /// Adds a display-only annotation. Used by output transformations.
    pub fn add_annotation(
        &mut self,
        start: usize,
        end: usize,
        tag: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        check_range(start.min(end), start.max(end), self.len())?;
        self.output_annotations
            .push(PlacedAnnotation::new(start, end, tag, value));
        Ok(())
    }

    pub(crate) fn output_annotations(&self) -> &[PlacedAnnotation] {
        &self.output_annotations
    }

    /// Builds a snapshot of the current content.
    pub fn finalize(&self) -> TextFieldCharSequence {
        TextFieldCharSequence::with_composition(
            self.text.to_string(),
            self.selection,
            self.composition,
        )
        .highlighted(self.highlight)
        .with_composing_annotations(self.composing_annotations.clone())
        .with_output_annotations(self.output_annotations.clone())
    }
}

impl fmt::Display for TextFieldBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.text, f)
    }
}

impl fmt::Debug for TextFieldBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFieldBuffer")
            .field("text", &self.text.to_string())
            .field("selection", &self.selection)
            .field("composition", &self.composition)
            .field("highlight", &self.highlight)
            .field("changes", &self.changes)
            .finish()
    }
}

/// Moves `offset` across the replacement of `start..end` by `new_len`
/// codepoints.
fn adjust_offset(offset: usize, start: usize, end: usize, new_len: usize) -> usize {
    if offset < start {
        offset
    } else if offset > end {
        offset - (end - start) + new_len
    } else {
        start + new_len
    }
}

pub(crate) fn adjust_range(
    range: TextRange,
    start: usize,
    end: usize,
    new_len: usize,
) -> TextRange {
    TextRange::new(
        adjust_offset(range.start, start, end, new_len),
        adjust_offset(range.end, start, end, new_len),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_tracker::ChangeList;

    fn buffer(text: &str, selection: TextRange) -> TextFieldBuffer {
        TextFieldBuffer::new(TextFieldCharSequence::new(text, selection))
    }

    #[test]
    fn insert_at_cursor_moves_cursor() {
        let mut buffer = buffer("Helo", TextRange::cursor(2));
        buffer.insert(2, "l").unwrap();
        assert_eq!(buffer.to_string(), "Hello");
        assert_eq!(buffer.selection(), TextRange::cursor(3));
    }

    #[test]
    fn edit_before_selection_shifts_it() {
        let mut buffer = buffer("Hello World", TextRange::new(6, 11));
        buffer.replace(0, 5, "Hi").unwrap();
        assert_eq!(buffer.to_string(), "Hi World");
        assert_eq!(buffer.selection(), TextRange::new(3, 8));
    }

    #[test]
    fn edit_after_selection_leaves_it() {
        let mut buffer = buffer("Hello World", TextRange::new(0, 5));
        buffer.delete(5, 11).unwrap();
        assert_eq!(buffer.to_string(), "Hello");
        assert_eq!(buffer.selection(), TextRange::new(0, 5));
    }

    #[test]
    fn cursor_inside_replaced_range_moves_to_end_of_new_text() {
        let mut buffer = buffer("abcdef", TextRange::cursor(3));
        buffer.replace(1, 5, "XY").unwrap();
        assert_eq!(buffer.to_string(), "aXYf");
        assert_eq!(buffer.selection(), TextRange::cursor(3));
    }

    #[test]
    fn cursor_at_start_of_replaced_range_moves_to_end_of_new_text() {
        let mut buffer = buffer("abcdef", TextRange::cursor(1));
        buffer.replace(1, 4, "XY").unwrap();
        assert_eq!(buffer.to_string(), "aXYef");
        assert_eq!(buffer.selection(), TextRange::cursor(3));
    }

    #[test]
    fn selection_over_replaced_range_collapses_after_new_text() {
        let mut buffer = buffer("abcdef", TextRange::new(1, 4));
        buffer.set_composition(1, 4).unwrap();
        buffer
            .set_highlight(TextHighlightType::HandwritingDeletePreview, 1, 4)
            .unwrap();
        buffer.replace(1, 4, "XY").unwrap();
        assert_eq!(buffer.selection(), TextRange::cursor(3));
        assert_eq!(buffer.composition(), Some(TextRange::cursor(3)));
        assert_eq!(buffer.highlight().map(|h| h.range), Some(TextRange::cursor(3)));
    }

    #[test]
    fn backspace_moves_cursor_back() {
        let mut buffer = buffer("abc", TextRange::cursor(3));
        buffer.delete(2, 3).unwrap();
        assert_eq!(buffer.selection(), TextRange::cursor(2));
    }

    #[test]
    fn delete_key_keeps_cursor() {
        let mut buffer = buffer("abc", TextRange::cursor(1));
        buffer.delete(1, 2).unwrap();
        assert_eq!(buffer.to_string(), "ac");
        assert_eq!(buffer.selection(), TextRange::cursor(1));
    }

    #[test]
    fn composition_follows_edits() {
        let mut buffer = buffer("hello world", TextRange::cursor(11));
        buffer.set_composition(6, 11).unwrap();
        buffer.insert(0, ">> ").unwrap();
        assert_eq!(buffer.composition(), Some(TextRange::new(9, 14)));
        buffer.clear_composition();
        assert_eq!(buffer.composition(), None);
    }

    #[test]
    fn out_of_range_edits_fail_without_change() {
        let mut buffer = buffer("abc", TextRange::cursor(0));
        assert_eq!(
            buffer.replace(2, 4, "x"),
            Err(TextFieldError::InvalidRange {
                start: 2,
                end: 4,
                len: 3
            })
        );
        assert_eq!(
            buffer.insert(4, "x"),
            Err(TextFieldError::InvalidRange {
                start: 4,
                end: 4,
                len: 3
            })
        );
        assert!(buffer.set_selection(0, 9).is_err());
        assert!(buffer.char_at(3).is_err());
        assert_eq!(buffer.to_string(), "abc");
        assert_eq!(buffer.changes().change_count(), 0);
    }

    #[test]
    fn backwards_selection_is_kept() {
        let mut buffer = buffer("abcdef", TextRange::cursor(0));
        buffer.set_selection(5, 2).unwrap();
        assert!(buffer.selection().reversed());
        assert!(buffer.has_selection());
    }

    #[test]
    fn cursor_placement_helpers() {
        let mut buffer = buffer("abc", TextRange::cursor(0));
        buffer.place_cursor_after_char_at(1).unwrap();
        assert_eq!(buffer.selection(), TextRange::cursor(2));
        buffer.place_cursor_before_char_at(0).unwrap();
        assert_eq!(buffer.selection(), TextRange::cursor(0));
        assert!(buffer.place_cursor_after_char_at(3).is_err());
        buffer.select_all();
        assert_eq!(buffer.selection(), TextRange::new(0, 3));
        buffer.place_cursor_at_end();
        assert_eq!(buffer.selection(), TextRange::cursor(3));
    }

    #[test]
    fn edits_are_tracked() {
        let mut buffer = buffer("hello world", TextRange::cursor(0));
        buffer.replace(0, 5, "HELLO").unwrap();
        buffer.append("!");
        assert_eq!(buffer.changes().change_count(), 2);
        assert_eq!(buffer.changes().get_original_range(1), Some(TextRange::cursor(11)));
    }

    #[test]
    fn revert_restores_original() {
        let original = TextFieldCharSequence::new("abc", TextRange::cursor(1));
        let mut buffer = TextFieldBuffer::new(original.clone());
        buffer.append("de");
        buffer.set_composition(0, 2).unwrap();
        buffer.revert_all_changes();
        assert_eq!(buffer.to_string(), "abc");
        assert_eq!(buffer.changes().change_count(), 0);
        assert_eq!(buffer.finalize(), original);
    }

    #[test]
    fn finalize_carries_highlight_and_composition() {
        let mut buffer = buffer("hello", TextRange::cursor(5));
        buffer
            .set_highlight(TextHighlightType::HandwritingSelectPreview, 1, 3)
            .unwrap();
        buffer.set_composition(3, 5).unwrap();
        let value = buffer.finalize();
        assert_eq!(value.composition(), Some(TextRange::new(3, 5)));
        assert!(!value.should_show_selection());
    }

    #[test]
    fn works_in_codepoints() {
        let mut buffer = buffer("Hello 世界", TextRange::cursor(8));
        assert_eq!(buffer.len(), 8);
        assert_eq!(buffer.char_at(6), Ok('世'));
        buffer.delete(7, 8).unwrap();
        assert_eq!(buffer.to_string(), "Hello 世");
        assert_eq!(buffer.selection(), TextRange::cursor(7));
    }
}
