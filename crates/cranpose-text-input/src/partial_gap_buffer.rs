//! Text store that only materializes a gap buffer around the edit site.
//!
//! Most edit transactions touch a few codepoints near the cursor. Copying the
//! whole text into a [`GapBuffer`] for that would be wasteful, so this store
//! keeps the text as an immutable codepoint slice and opens a small gap buffer
//! window around the first edit. Edits that stay in or next to the window go
//! to the gap buffer; an edit elsewhere flushes the window back into the
//! immutable text and opens a new one.

use std::fmt;

use crate::error::{check_range, Result};
use crate::gap_buffer::{GapBuffer, TextStore};

/// Codepoints of context copied into the window on each side of an edit.
pub const SURROUNDING_SIZE: usize = 256;

#[derive(Debug, Clone)]
struct Window {
    /// Start of the window in `text` coordinates.
    start: usize,
    /// End of the window in `text` coordinates.
    end: usize,
    buffer: GapBuffer,
}

/// A lazily windowed gap buffer.
#[derive(Debug, Clone)]
pub struct PartialGapBuffer {
    text: Box<[char]>,
    window: Option<Window>,
}

impl PartialGapBuffer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            window: None,
        }
    }

    /// True while a gap buffer window is open.
    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    /// Writes the open window back into the immutable text.
    pub fn flush(&mut self) {
        let Some(window) = self.window.take() else {
            return;
        };
        let mut chars = Vec::with_capacity(
            self.text.len() - (window.end - window.start) + window.buffer.len(),
        );
        chars.extend_from_slice(&self.text[..window.start]);
        window.buffer.extend_into(&mut chars);
        chars.extend_from_slice(&self.text[window.end..]);
        log::trace!(
            "partial gap buffer flushed window {}..{} ({} codepoints)",
            window.start,
            window.end,
            chars.len()
        );
        self.text = chars.into_boxed_slice();
    }

    fn open_window(&mut self, start: usize, end: usize, replacement: &str) -> Result<()> {
        let left = start.min(SURROUNDING_SIZE);
        let right = (self.text.len() - end).min(SURROUNDING_SIZE);
        let window_start = start - left;
        let window_end = end + right;

        let mut buffer = GapBuffer::from_chars(&self.text[window_start..window_end]);
        buffer.replace(left, left + (end - start), replacement)?;
        self.window = Some(Window {
            start: window_start,
            end: window_end,
            buffer,
        });
        Ok(())
    }

    fn chars(&self) -> Box<dyn Iterator<Item = char> + '_> {
        match &self.window {
            None => Box::new(self.text.iter().copied()),
            Some(window) => Box::new(
                self.text[..window.start]
                    .iter()
                    .copied()
                    .chain(window.buffer.chars())
                    .chain(self.text[window.end..].iter().copied()),
            ),
        }
    }
}

impl TextStore for PartialGapBuffer {
    fn len(&self) -> usize {
        match &self.window {
            None => self.text.len(),
            Some(window) => {
                self.text.len() - (window.end - window.start) + window.buffer.len()
            }
        }
    }

    fn get(&self, index: usize) -> Option<char> {
        let Some(window) = &self.window else {
            return self.text.get(index).copied();
        };
        if index < window.start {
            return self.text.get(index).copied();
        }
        let window_len = window.buffer.len();
        if index < window.start + window_len {
            return window.buffer.get(index - window.start);
        }
        self.text
            .get(index - window.start - window_len + window.end)
            .copied()
    }

    fn replace(&mut self, start: usize, end: usize, text: &str) -> Result<()> {
        check_range(start, end, self.len())?;

        if let Some(window) = &mut self.window {
            let window_len = window.buffer.len();
            if start >= window.start && end <= window.start + window_len {
                return window
                    .buffer
                    .replace(start - window.start, end - window.start, text);
            }
            self.flush();
        }
        self.open_window(start, end, text)
    }

    fn sub_sequence(&self, start: usize, end: usize) -> Result<String> {
        check_range(start, end, self.len())?;
        Ok(self.chars().skip(start).take(end - start).collect())
    }

    fn content_equals(&self, other: &str) -> bool {
        self.chars().eq(other.chars())
    }
}

impl fmt::Display for PartialGapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        for ch in self.chars() {
            f.write_char(ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_text(len: usize) -> String {
        (0..len)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect()
    }

    #[test]
    fn reads_through_without_window() {
        let buf = PartialGapBuffer::new("hello");
        assert!(!buf.has_window());
        assert_eq!(buf.len(), 5);
        assert_eq!(buf.get(1), Some('e'));
        assert_eq!(buf.to_string(), "hello");
    }

    #[test]
    fn first_edit_opens_window() {
        let mut buf = PartialGapBuffer::new("hello");
        buf.replace(5, 5, " world").unwrap();
        assert!(buf.has_window());
        assert_eq!(buf.to_string(), "hello world");
        assert_eq!(buf.len(), 11);
    }

    #[test]
    fn edits_next_to_window_stay_in_window() {
        let text = long_text(2000);
        let mut buf = PartialGapBuffer::new(&text);
        buf.replace(1000, 1000, "X").unwrap();
        // After the insert the window spans 744..1257; touch its right edge.
        buf.replace(1257, 1257, "Y").unwrap();

        let mut expected = text.clone();
        expected.insert(1000, 'X');
        expected.insert(1257, 'Y');
        assert_eq!(buf.to_string(), expected);
    }

    #[test]
    fn distant_edit_flushes_and_reopens() {
        let text = long_text(4000);
        let mut buf = PartialGapBuffer::new(&text);
        buf.replace(10, 12, "").unwrap();
        buf.replace(3000, 3001, "ZZ").unwrap();

        let mut expected: Vec<char> = text.chars().collect();
        expected.drain(10..12);
        expected.splice(3000..3001, ['Z', 'Z']);
        let expected: String = expected.into_iter().collect();

        assert_eq!(buf.to_string(), expected);
        assert_eq!(buf.len(), expected.chars().count());
        for (i, ch) in expected.chars().enumerate() {
            assert_eq!(buf.get(i), Some(ch), "mismatch at {i}");
        }
    }

    #[test]
    fn flush_preserves_content() {
        let mut buf = PartialGapBuffer::new("abc");
        buf.replace(1, 2, "BB").unwrap();
        buf.flush();
        assert!(!buf.has_window());
        assert_eq!(buf.to_string(), "aBBc");
        assert!(buf.content_equals("aBBc"));
    }

    #[test]
    fn rejects_out_of_range_edits() {
        let mut buf = PartialGapBuffer::new("abc");
        assert!(buf.replace(1, 4, "x").is_err());
        assert!(!buf.has_window());
        assert_eq!(buf.sub_sequence(1, 3).unwrap(), "bc");
    }
}
