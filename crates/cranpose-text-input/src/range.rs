//! Text range type for selections, compositions, and edited intervals.
//!
//! Offsets are codepoint indices into the text, never byte offsets.

/// A range of text positions.
///
/// When `start == end` the range is collapsed and represents a cursor.
/// `start` may be greater than `end`; that marks a selection made backwards
/// (the cursor sits at `end`, the anchor at `start`). Use [`min`](Self::min)
/// and [`max`](Self::max) for the ordered bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRange {
    /// Anchor position.
    pub start: usize,
    /// Cursor position.
    pub end: usize,
}

impl TextRange {
    /// Creates a new text range. Direction is preserved.
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates an ordered range from two offsets in any order.
    pub fn normalized(a: usize, b: usize) -> Self {
        Self::new(a.min(b), a.max(b))
    }

    /// Creates a collapsed range (cursor) at the given position.
    pub const fn cursor(position: usize) -> Self {
        Self::new(position, position)
    }

    /// Creates a range at position 0.
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// Creates a range covering `0..len`.
    pub const fn all(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Returns the smaller of start and end.
    pub fn min(&self) -> usize {
        self.start.min(self.end)
    }

    /// Returns the larger of start and end.
    pub fn max(&self) -> usize {
        self.start.max(self.end)
    }

    /// Returns true if this is a collapsed range (cursor).
    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Returns true if the selection was made backwards.
    pub fn reversed(&self) -> bool {
        self.start > self.end
    }

    /// Returns the number of codepoints covered.
    pub fn length(&self) -> usize {
        self.max() - self.min()
    }

    /// Returns true if `offset` lies in `min..max`.
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.min() && offset < self.max()
    }

    /// Returns true if the two ranges share at least one codepoint, or touch
    /// when either is collapsed.
    pub fn intersects(&self, other: TextRange) -> bool {
        self.min() <= other.max() && other.min() <= self.max()
    }

    /// Clamps both ends into `0..=len`, keeping direction.
    pub fn coerce_in(&self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }

    /// Returns a copy moved by `delta` codepoints, saturating at zero.
    pub fn shift(&self, delta: isize) -> Self {
        Self::new(shift_offset(self.start, delta), shift_offset(self.end, delta))
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

pub(crate) fn shift_offset(offset: usize, delta: isize) -> usize {
    if delta >= 0 {
        offset + delta as usize
    } else {
        offset.saturating_sub(delta.unsigned_abs())
    }
}
