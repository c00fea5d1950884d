//! Single-line vs multi-line text fields.

use crate::transform::SingleLine;

/// How many lines a text field shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextFieldLineLimits {
    /// One line that scrolls horizontally. Newlines are displayed inline.
    SingleLine,
    /// Grows between `min_lines` and `max_lines`, then scrolls vertically.
    MultiLine { min_lines: usize, max_lines: usize },
}

impl TextFieldLineLimits {
    /// Multi-line limits, with `min_lines` at least 1 and `max_lines` at least
    /// `min_lines`.
    pub fn multi_line(min_lines: usize, max_lines: usize) -> Self {
        let min_lines = min_lines.max(1);
        Self::MultiLine {
            min_lines,
            max_lines: max_lines.max(min_lines),
        }
    }

    pub fn is_single_line(&self) -> bool {
        matches!(self, Self::SingleLine)
    }

    /// Display substitution applied to the text under these limits.
    pub fn codepoint_transformation(&self) -> Option<SingleLine> {
        match self {
            Self::SingleLine => Some(SingleLine),
            Self::MultiLine { .. } => None,
        }
    }
}

impl Default for TextFieldLineLimits {
    fn default() -> Self {
        Self::MultiLine {
            min_lines: 1,
            max_lines: usize::MAX,
        }
    }
}

/// Replaces line breaks with spaces for pasting into a single-line field.
/// `\r\n` becomes one space.
pub fn filter_for_single_line(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::apply_codepoint_transformation;

    #[test]
    fn default_is_unbounded_multi_line() {
        let limits = TextFieldLineLimits::default();
        assert!(!limits.is_single_line());
        assert!(limits.codepoint_transformation().is_none());
    }

    #[test]
    fn multi_line_bounds_are_coerced() {
        assert_eq!(
            TextFieldLineLimits::multi_line(0, 0),
            TextFieldLineLimits::MultiLine {
                min_lines: 1,
                max_lines: 1
            }
        );
        assert_eq!(
            TextFieldLineLimits::multi_line(3, 2),
            TextFieldLineLimits::MultiLine {
                min_lines: 3,
                max_lines: 3
            }
        );
    }

    #[test]
    fn single_line_displays_breaks_inline() {
        let transformation = TextFieldLineLimits::SingleLine
            .codepoint_transformation()
            .unwrap();
        assert_eq!(apply_codepoint_transformation("a\nb", &transformation), "a b");
    }

    #[test]
    fn filter_replaces_line_breaks() {
        assert_eq!(filter_for_single_line("one\ntwo\r\nthree\rfour"), "one two three four");
        assert_eq!(filter_for_single_line("plain"), "plain");
    }
}
