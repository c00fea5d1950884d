//! Codepoint indexing helpers over UTF-8 strings.

/// Number of codepoints in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the codepoint at `index`, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, index: usize) -> usize {
    text.char_indices()
        .nth(index)
        .map_or(text.len(), |(offset, _)| offset)
}

/// Slice of `text` covering codepoints `start..end`, clamped to the text.
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> &str {
    let begin = byte_offset(text, start);
    let finish = byte_offset(text, end.max(start));
    &text[begin..finish]
}

/// Codepoint window `(start, pre_end, post_end)` where `old` and `new` differ.
///
/// Matches the longest shared prefix first, then the longest shared suffix of
/// what is left, so the two never overlap.
pub(crate) fn diff_window(old: &str, new: &str) -> (usize, usize, usize) {
    let prefix = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let old_len = char_len(old);
    let new_len = char_len(new);
    let max_suffix = old_len.min(new_len) - prefix;
    let suffix = old
        .chars()
        .rev()
        .zip(new.chars().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();
    (prefix, old_len - suffix, new_len - suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_by_codepoint() {
        let text = "a世界b";
        assert_eq!(char_len(text), 4);
        assert_eq!(char_slice(text, 1, 3), "世界");
        assert_eq!(char_slice(text, 3, 10), "b");
        assert_eq!(char_slice(text, 4, 4), "");
    }

    #[test]
    fn diff_of_insertion() {
        assert_eq!(diff_window("Hi", "Hi!"), (2, 2, 3));
        assert_eq!(diff_window("", "abc"), (0, 0, 3));
    }

    #[test]
    fn diff_of_repeated_characters_does_not_overlap() {
        // "aa" -> "aaa": prefix eats both old chars, suffix gets nothing.
        assert_eq!(diff_window("aa", "aaa"), (2, 2, 3));
        assert_eq!(diff_window("aaa", "a"), (1, 3, 1));
    }

    #[test]
    fn diff_of_replacement_in_middle() {
        assert_eq!(diff_window("hello world", "hello there world"), (6, 6, 12));
        assert_eq!(diff_window("abcdef", "abXYef"), (2, 4, 4));
    }

    #[test]
    fn identical_strings_have_empty_window() {
        let (start, pre_end, post_end) = diff_window("same", "same");
        assert_eq!(start, pre_end);
        assert_eq!(start, post_end);
    }
}
