//! Immutable snapshot of a text field's content.

use std::fmt;

use crate::chars::{char_len, char_slice};
use crate::range::TextRange;

/// Kind of handwriting gesture preview shown by a [`TextHighlight`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextHighlightType {
    /// Preview of the text a select gesture would select.
    HandwritingSelectPreview,
    /// Preview of the text a delete gesture would remove.
    HandwritingDeletePreview,
}

/// A highlighted range. While present, the cursor and selection are hidden.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextHighlight {
    pub kind: TextHighlightType,
    pub range: TextRange,
}

impl TextHighlight {
    pub fn new(kind: TextHighlightType, range: TextRange) -> Self {
        Self { kind, range }
    }
}

/// A tagged annotation over a range of text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlacedAnnotation {
    pub range: TextRange,
    pub tag: String,
    pub value: String,
}

impl PlacedAnnotation {
    pub fn new(start: usize, end: usize, tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            range: TextRange::normalized(start, end),
            tag: tag.into(),
            value: value.into(),
        }
    }

    fn coerce_in(mut self, len: usize) -> Self {
        self.range = self.range.coerce_in(len);
        self
    }
}

/// The state of a text field at one point in time.
///
/// Every range is clamped into `0..=len` on construction, so a snapshot built
/// from stale IME or paste ranges is still consistent. Snapshots are never
/// mutated; edits produce new ones.
///
/// Equality compares text, selection, composition, highlight, and the range
/// and tag of each composing annotation. Output annotations are display-only
/// and do not take part.
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "SnapshotRepr", into = "SnapshotRepr")
)]
pub struct TextFieldCharSequence {
    text: String,
    selection: TextRange,
    composition: Option<TextRange>,
    highlight: Option<TextHighlight>,
    composing_annotations: Vec<PlacedAnnotation>,
    output_annotations: Vec<PlacedAnnotation>,
}

impl TextFieldCharSequence {
    /// Creates a snapshot with the given selection and no composition.
    pub fn new(text: impl Into<String>, selection: TextRange) -> Self {
        let text = text.into();
        let len = char_len(&text);
        Self {
            text,
            selection: selection.coerce_in(len),
            composition: None,
            highlight: None,
            composing_annotations: Vec::new(),
            output_annotations: Vec::new(),
        }
    }

    /// Creates a snapshot with a cursor at the end of `text`.
    pub fn with_cursor_at_end(text: impl Into<String>) -> Self {
        let text = text.into();
        let len = char_len(&text);
        Self::new(text, TextRange::cursor(len))
    }

    /// Creates a snapshot carrying an IME composition range.
    pub fn with_composition(
        text: impl Into<String>,
        selection: TextRange,
        composition: Option<TextRange>,
    ) -> Self {
        let mut value = Self::new(text, selection);
        let len = value.len();
        value.composition = composition.map(|range| range.coerce_in(len));
        value
    }

    /// Returns a copy carrying `highlight`.
    pub fn highlighted(mut self, highlight: Option<TextHighlight>) -> Self {
        let len = self.len();
        self.highlight = highlight.map(|h| TextHighlight::new(h.kind, h.range.coerce_in(len)));
        self
    }

    /// Returns a copy carrying `annotations` over the composing region.
    pub fn with_composing_annotations(mut self, annotations: Vec<PlacedAnnotation>) -> Self {
        let len = self.len();
        self.composing_annotations = annotations.into_iter().map(|a| a.coerce_in(len)).collect();
        self
    }

    /// Returns a copy carrying display-only `annotations`.
    pub fn with_output_annotations(mut self, annotations: Vec<PlacedAnnotation>) -> Self {
        let len = self.len();
        self.output_annotations = annotations.into_iter().map(|a| a.coerce_in(len)).collect();
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in codepoints.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn selection(&self) -> TextRange {
        self.selection
    }

    pub fn composition(&self) -> Option<TextRange> {
        self.composition
    }

    pub fn highlight(&self) -> Option<TextHighlight> {
        self.highlight
    }

    pub fn composing_annotations(&self) -> &[PlacedAnnotation] {
        &self.composing_annotations
    }

    pub fn output_annotations(&self) -> &[PlacedAnnotation] {
        &self.output_annotations
    }

    /// Cursor and selection are hidden while a highlight is shown.
    pub fn should_show_selection(&self) -> bool {
        self.highlight.is_none()
    }

    /// Up to `max_chars` codepoints immediately before the selection.
    pub fn text_before_selection(&self, max_chars: usize) -> &str {
        let end = self.selection.min();
        char_slice(&self.text, end.saturating_sub(max_chars), end)
    }

    /// Up to `max_chars` codepoints immediately after the selection.
    pub fn text_after_selection(&self, max_chars: usize) -> &str {
        let start = self.selection.max();
        char_slice(&self.text, start, start + max_chars)
    }

    pub fn selected_text(&self) -> &str {
        char_slice(&self.text, self.selection.min(), self.selection.max())
    }

    pub fn content_equals(&self, other: &str) -> bool {
        self.text == other
    }

    /// Codepoints `start..end`, clamped to the text.
    pub fn sub_sequence(&self, start: usize, end: usize) -> &str {
        char_slice(&self.text, start, end)
    }
}

impl PartialEq for TextFieldCharSequence {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.selection == other.selection
            && self.composition == other.composition
            && self.highlight == other.highlight
            && self.composing_annotations.len() == other.composing_annotations.len()
            && self
                .composing_annotations
                .iter()
                .zip(&other.composing_annotations)
                .all(|(a, b)| a.range == b.range && a.tag == b.tag)
    }
}

impl Eq for TextFieldCharSequence {}

/// Serialized form. Deserializing goes through the coercing constructors.
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct SnapshotRepr {
    text: String,
    selection: TextRange,
    #[serde(default)]
    composition: Option<TextRange>,
    #[serde(default)]
    highlight: Option<TextHighlight>,
    #[serde(default)]
    composing_annotations: Vec<PlacedAnnotation>,
    #[serde(default)]
    output_annotations: Vec<PlacedAnnotation>,
}

#[cfg(feature = "serde")]
impl From<SnapshotRepr> for TextFieldCharSequence {
    fn from(repr: SnapshotRepr) -> Self {
        TextFieldCharSequence::with_composition(repr.text, repr.selection, repr.composition)
            .highlighted(repr.highlight)
            .with_composing_annotations(repr.composing_annotations)
            .with_output_annotations(repr.output_annotations)
    }
}

#[cfg(feature = "serde")]
impl From<TextFieldCharSequence> for SnapshotRepr {
    fn from(value: TextFieldCharSequence) -> Self {
        Self {
            text: value.text,
            selection: value.selection,
            composition: value.composition,
            highlight: value.highlight,
            composing_annotations: value.composing_annotations,
            output_annotations: value.output_annotations,
        }
    }
}

impl fmt::Display for TextFieldCharSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
