//! Gap buffer implementation for efficient text editing.
//!
//! A gap buffer is a codepoint array with a movable gap at the edit position.
//! Replacing text at the gap is O(1) amortized; moving the gap is
//! O(gap_distance), which amortizes well because edits are local.

use std::fmt;

use crate::chars::char_len;
use crate::error::{check_range, Result, TextFieldError};

/// Gap allocated on construction and the minimum headroom added on growth.
pub const DEFAULT_GAP_SIZE: usize = 256;

/// Read/replace capability shared by [`GapBuffer`] and
/// [`PartialGapBuffer`](crate::PartialGapBuffer).
///
/// Offsets are codepoint indices.
pub trait TextStore: fmt::Display {
    /// Logical length in codepoints.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Codepoint at `index`, or `None` past the end.
    fn get(&self, index: usize) -> Option<char>;

    /// Replaces `start..end` with `text`. Fails without mutating when the
    /// range is reversed or extends past the end.
    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()>;

    /// Copies `start..end` out as a `String`.
    fn sub_sequence(&self, start: usize, end: usize) -> Result<String>;

    /// True if the stored text equals `other` codepoint for codepoint.
    fn content_equals(&self, other: &str) -> bool;

    fn insert(&mut self, index: usize, text: &str) -> Result<()> {
        self.replace(index, index, text)
    }

    fn delete(&mut self, start: usize, end: usize) -> Result<()> {
        self.replace(start, end, "")
    }

    fn append(&mut self, text: &str) -> Result<()> {
        let len = self.len();
        self.replace(len, len, text)
    }
}

/// A gap buffer over codepoints.
///
/// Logical index `i` maps to storage index `i` before the gap and to
/// `i + gap_len` after it.
#[derive(Debug, Clone)]
pub struct GapBuffer {
    /// Storage laid out as [pre-gap content | gap | post-gap content].
    data: Vec<char>,
    /// First unused slot.
    gap_start: usize,
    /// First used slot after the gap.
    gap_end: usize,
}

impl GapBuffer {
    /// Creates a new empty gap buffer.
    pub fn new() -> Self {
        Self::from_chars(&[])
    }

    /// Creates a gap buffer holding `chars`, with the gap at the end.
    pub fn from_chars(chars: &[char]) -> Self {
        let len = chars.len();
        let capacity = len + DEFAULT_GAP_SIZE;

        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(chars);
        data.resize(capacity, '\0');

        Self {
            data,
            gap_start: len,
            gap_end: capacity,
        }
    }

    /// Total storage size, content plus gap.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Iterates the content in logical order.
    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.data[..self.gap_start]
            .iter()
            .chain(self.data[self.gap_end..].iter())
            .copied()
    }

    /// Appends the content to `out`.
    pub(crate) fn extend_into(&self, out: &mut Vec<char>) {
        out.extend_from_slice(&self.data[..self.gap_start]);
        out.extend_from_slice(&self.data[self.gap_end..]);
    }

    /// Moves the gap to `start` and widens it over `start..end`, dropping
    /// that content.
    fn open_gap_over(&mut self, start: usize, end: usize) {
        let gap_len = self.gap_len();
        if end <= self.gap_start {
            // Shift [end..gap_start] to the back of the gap.
            let shift = self.gap_start - end;
            self.data
                .copy_within(end..self.gap_start, self.gap_end - shift);
            self.gap_start = start;
            self.gap_end -= shift;
        } else if start <= self.gap_start {
            // Range straddles the gap; just widen it.
            self.gap_start = start;
            self.gap_end = end + gap_len;
        } else {
            // Shift [gap_end..start] to the front of the gap.
            let physical_start = start + gap_len;
            let shift = physical_start - self.gap_end;
            self.data
                .copy_within(self.gap_end..physical_start, self.gap_start);
            self.gap_start += shift;
            self.gap_end = end + gap_len;
        }
    }

    /// Grows storage so the gap can take `needed` codepoints. The gap stays
    /// where it is.
    fn ensure_gap(&mut self, needed: usize) {
        if self.gap_len() >= needed {
            return;
        }

        let old_len = self.data.len();
        let growth = needed.max(DEFAULT_GAP_SIZE);
        let post_gap_len = old_len - self.gap_end;

        let new_size = old_len + growth;
        self.data.resize(new_size, '\0');
        if post_gap_len > 0 {
            self.data
                .copy_within(self.gap_end..old_len, new_size - post_gap_len);
        }
        self.gap_end = new_size - post_gap_len;
    }
}

impl TextStore for GapBuffer {
    fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    fn get(&self, index: usize) -> Option<char> {
        if index >= self.len() {
            return None;
        }
        let physical = if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        };
        Some(self.data[physical])
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        check_range(start, end, self.len())?;

        self.open_gap_over(start, end);
        self.ensure_gap(char_len(text));
        for ch in text.chars() {
            self.data[self.gap_start] = ch;
            self.gap_start += 1;
        }
        Ok(())
    }

    fn sub_sequence(&self, start: usize, end: usize) -> Result<String> {
        check_range(start, end, self.len())?;
        Ok(self.chars().skip(start).take(end - start).collect())
    }

    fn content_equals(&self, other: &str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl Default for GapBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for GapBuffer {
    fn from(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::from_chars(&chars)
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            fmt::Write::write_char(f, ch)?;
        }
        Ok(())
    }
}

impl GapBuffer {
    /// Codepoint at `index`, reporting the length when out of bounds.
    pub fn char_at(&self, index: usize) -> Result<char> {
        self.get(index).ok_or(TextFieldError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }
}
