//! Display-only rewriting of a text field's content.

use std::fmt;

use crate::buffer::TextFieldBuffer;
use crate::change_tracker::ChangeTracker;
use crate::gap_buffer::GapBuffer;
use crate::range::TextRange;
use crate::value::{PlacedAnnotation, TextFieldCharSequence};

/// Rewrites what is shown without touching what is stored, e.g. inserting
/// separators into a phone number.
///
/// Runs on a scratch copy of the content; edits and annotations made here are
/// discarded after rendering.
pub trait OutputTransformation {
    fn transform_output(&self, buffer: &mut TextFieldBuffer);
}

impl<T: OutputTransformation + ?Sized> OutputTransformation for Box<T> {
    fn transform_output(&self, buffer: &mut TextFieldBuffer) {
        (**self).transform_output(buffer);
    }
}

/// Adapts a closure into an [`OutputTransformation`].
pub struct OutputTransformationFn<F>(pub F);

impl<F> fmt::Debug for OutputTransformationFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OutputTransformationFn")
    }
}

impl<F: Fn(&mut TextFieldBuffer)> OutputTransformation for OutputTransformationFn<F> {
    fn transform_output(&self, buffer: &mut TextFieldBuffer) {
        (self.0)(buffer);
    }
}

/// Converts offsets between stored and displayed text.
#[derive(Clone, Debug, Default)]
pub struct OffsetMapping {
    changes: ChangeTracker,
}

impl OffsetMapping {
    /// True when the display text equals the stored text.
    pub fn is_identity(&self) -> bool {
        self.changes.is_empty()
    }

    /// Maps a stored offset to the displayed text. Offsets inside rewritten
    /// text map to the whole rewritten range.
    pub fn to_transformed(&self, offset: usize) -> TextRange {
        self.changes.map_from_original(offset)
    }

    /// Maps a displayed offset back to the stored text.
    pub fn to_original(&self, offset: usize) -> TextRange {
        self.changes.map_to_original(offset)
    }

    /// Maps a stored selection to the displayed text, widening it over any
    /// rewritten text it touches.
    pub fn selection_to_transformed(&self, selection: TextRange) -> TextRange {
        if selection.collapsed() {
            return TextRange::cursor(self.to_transformed(selection.start).max());
        }
        let start = self.to_transformed(selection.min()).min();
        let end = self.to_transformed(selection.max()).max();
        if selection.reversed() {
            TextRange::new(end, start)
        } else {
            TextRange::new(start, end)
        }
    }
}

/// Result of [`apply_output_transformation`].
#[derive(Clone, Debug)]
pub struct TransformedText {
    pub text: String,
    pub annotations: Vec<PlacedAnnotation>,
    /// The stored selection in display coordinates.
    pub selection: TextRange,
    pub mapping: OffsetMapping,
}

/// Runs `transformation` on a scratch copy of `value`.
pub fn apply_output_transformation<T>(
    value: &TextFieldCharSequence,
    transformation: &T,
) -> TransformedText
where
    T: OutputTransformation + ?Sized,
{
    let scratch = TextFieldCharSequence::new(value.text(), value.selection());
    let mut buffer = TextFieldBuffer::with_store(scratch, Box::new(GapBuffer::from(value.text())));
    transformation.transform_output(&mut buffer);

    let mapping = OffsetMapping {
        changes: buffer.changes().clone(),
    };
    TransformedText {
        text: buffer.to_string(),
        annotations: buffer.output_annotations().to_vec(),
        selection: mapping.selection_to_transformed(value.selection()),
        mapping,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PhoneNumber;

    impl OutputTransformation for PhoneNumber {
        fn transform_output(&self, buffer: &mut TextFieldBuffer) {
            let digits = buffer.len();
            if digits > 3 {
                buffer.insert(3, "-").unwrap();
            }
            if digits > 7 {
                buffer.insert(7, "-").unwrap();
            }
        }
    }

    #[test]
    fn stored_text_is_not_touched() {
        let value = TextFieldCharSequence::new("5551234", TextRange::cursor(7));
        let transformed = apply_output_transformation(&value, &PhoneNumber);
        assert_eq!(transformed.text, "555-1234");
        assert_eq!(value.text(), "5551234");
        assert_eq!(transformed.selection, TextRange::cursor(8));
    }

    #[test]
    fn mapping_converts_offsets_both_ways() {
        let value = TextFieldCharSequence::new("5551234567", TextRange::cursor(0));
        let transformed = apply_output_transformation(&value, &PhoneNumber);
        assert_eq!(transformed.text, "555-123-4567");
        let mapping = &transformed.mapping;
        assert_eq!(mapping.to_transformed(2), TextRange::cursor(2));
        assert_eq!(mapping.to_transformed(5), TextRange::cursor(6));
        assert_eq!(mapping.to_transformed(10), TextRange::cursor(12));
        assert_eq!(mapping.to_original(12), TextRange::cursor(10));
        assert_eq!(mapping.to_original(4), TextRange::cursor(3));
    }

    #[test]
    fn annotations_are_returned() {
        let value = TextFieldCharSequence::with_cursor_at_end("see docs");
        let transformation = OutputTransformationFn(|buffer: &mut TextFieldBuffer| {
            buffer.add_annotation(4, 8, "link", "https://docs.rs").unwrap();
        });
        let transformed = apply_output_transformation(&value, &transformation);
        assert_eq!(transformed.text, "see docs");
        assert!(transformed.mapping.is_identity());
        assert_eq!(transformed.annotations.len(), 1);
        assert_eq!(transformed.annotations[0].range, TextRange::new(4, 8));
        assert_eq!(transformed.annotations[0].value, "https://docs.rs");
    }

    #[test]
    fn selection_over_rewritten_text_widens() {
        let value = TextFieldCharSequence::new("abcdef", TextRange::new(2, 3));
        let transformation = OutputTransformationFn(|buffer: &mut TextFieldBuffer| {
            buffer.replace(1, 4, "*").unwrap();
        });
        let transformed = apply_output_transformation(&value, &transformation);
        assert_eq!(transformed.text, "a*ef");
        assert_eq!(transformed.selection, TextRange::new(1, 2));
    }
}
