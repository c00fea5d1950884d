//! A single undoable text change and the rules for merging consecutive ones.

use crate::chars::char_len;
use crate::range::TextRange;

/// Consecutive edits further apart than this never merge.
pub const DEFAULT_MERGE_WINDOW_MS: u64 = 2000;

/// What an operation did to the text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextEditType {
    Insert,
    Delete,
    Replace,
}

/// How a deletion was most likely triggered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextDeleteType {
    /// Cursor moved back over the deleted text.
    BackspaceLike,
    /// Cursor stayed and the text after it was removed.
    DeleteKeyLike,
    /// A selection was removed.
    SelectionDelete,
    NotUserInitiated,
}

/// An edit that replaced `pre_text` with `post_text` at `index`.
///
/// Undoing replaces `index..index + len(post_text)` with `pre_text` and
/// restores `pre_selection`. Redoing does the reverse.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextUndoOperation {
    index: usize,
    pre_text: String,
    post_text: String,
    pre_selection: TextRange,
    post_selection: TextRange,
    timestamp_ms: u64,
    can_merge: bool,
}

impl TextUndoOperation {
    pub fn new(
        index: usize,
        pre_text: impl Into<String>,
        post_text: impl Into<String>,
        pre_selection: TextRange,
        post_selection: TextRange,
        timestamp_ms: u64,
        can_merge: bool,
    ) -> Self {
        Self {
            index,
            pre_text: pre_text.into(),
            post_text: post_text.into(),
            pre_selection,
            post_selection,
            timestamp_ms,
            can_merge,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pre_text(&self) -> &str {
        &self.pre_text
    }

    pub fn post_text(&self) -> &str {
        &self.post_text
    }

    pub fn pre_selection(&self) -> TextRange {
        self.pre_selection
    }

    pub fn post_selection(&self) -> TextRange {
        self.post_selection
    }

    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }

    pub fn can_merge(&self) -> bool {
        self.can_merge
    }

    pub(crate) fn with_can_merge(mut self, can_merge: bool) -> Self {
        self.can_merge = can_merge;
        self
    }

    /// Range of `post_text` in the text after this operation.
    pub(crate) fn post_range(&self) -> (usize, usize) {
        (self.index, self.index + char_len(&self.post_text))
    }

    /// Range of `pre_text` in the text before this operation.
    pub(crate) fn pre_range(&self) -> (usize, usize) {
        (self.index, self.index + char_len(&self.pre_text))
    }

    pub fn kind(&self) -> TextEditType {
        match (self.pre_text.is_empty(), self.post_text.is_empty()) {
            (true, false) => TextEditType::Insert,
            (false, true) => TextEditType::Delete,
            _ => TextEditType::Replace,
        }
    }

    /// Direction of a deletion, `None` for inserts and replacements.
    pub fn delete_type(&self) -> Option<TextDeleteType> {
        if self.kind() != TextEditType::Delete {
            return None;
        }
        if !self.post_selection.collapsed() {
            return Some(TextDeleteType::NotUserInitiated);
        }
        let direction = if self.pre_selection.collapsed() {
            if self.pre_selection.start > self.post_selection.start {
                TextDeleteType::BackspaceLike
            } else {
                TextDeleteType::DeleteKeyLike
            }
        } else if self.pre_selection.min() == self.post_selection.start
            && self.post_selection.start == self.index
        {
            TextDeleteType::SelectionDelete
        } else {
            TextDeleteType::NotUserInitiated
        };
        Some(direction)
    }

    /// Merges `next` into this operation using the default merge window.
    pub fn merge(&self, next: &TextUndoOperation) -> Option<TextUndoOperation> {
        self.merge_within(next, DEFAULT_MERGE_WINDOW_MS)
    }

    /// Returns one operation equivalent to applying `self` then `next`, or
    /// `None` when the two should stay separate undo steps.
    pub fn merge_within(
        &self,
        next: &TextUndoOperation,
        window_ms: u64,
    ) -> Option<TextUndoOperation> {
        if !self.can_merge || !next.can_merge {
            return None;
        }
        if next.timestamp_ms.saturating_sub(self.timestamp_ms) > window_ms {
            return None;
        }
        // A new line always starts a new undo step.
        if next.post_text.contains('\n') {
            return None;
        }
        let kind = self.kind();
        if kind != next.kind() {
            return None;
        }

        match kind {
            TextEditType::Insert => {
                if next.index != self.index + char_len(&self.post_text) {
                    return None;
                }
                Some(self.merged(
                    self.index,
                    String::new(),
                    format!("{}{}", self.post_text, next.post_text),
                    next,
                ))
            }
            TextEditType::Delete => {
                let direction = self.delete_type()?;
                if next.delete_type() != Some(direction) {
                    return None;
                }
                match direction {
                    TextDeleteType::BackspaceLike => {
                        if next.index + char_len(&next.pre_text) != self.index {
                            return None;
                        }
                        Some(self.merged(
                            next.index,
                            format!("{}{}", next.pre_text, self.pre_text),
                            String::new(),
                            next,
                        ))
                    }
                    TextDeleteType::DeleteKeyLike | TextDeleteType::SelectionDelete => {
                        if next.index != self.index {
                            return None;
                        }
                        Some(self.merged(
                            self.index,
                            format!("{}{}", self.pre_text, next.pre_text),
                            String::new(),
                            next,
                        ))
                    }
                    TextDeleteType::NotUserInitiated => None,
                }
            }
            TextEditType::Replace => None,
        }
    }

    fn merged(&self, index: usize, pre_text: String, post_text: String, next: &Self) -> Self {
        Self {
            index,
            pre_text,
            post_text,
            pre_selection: self.pre_selection,
            post_selection: next.post_selection,
            timestamp_ms: next.timestamp_ms,
            can_merge: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(index: usize, text: &str, at: u64) -> TextUndoOperation {
        let len = char_len(text);
        TextUndoOperation::new(
            index,
            "",
            text,
            TextRange::cursor(index),
            TextRange::cursor(index + len),
            at,
            true,
        )
    }

    fn backspace(index: usize, text: &str, at: u64) -> TextUndoOperation {
        let len = char_len(text);
        TextUndoOperation::new(
            index,
            text,
            "",
            TextRange::cursor(index + len),
            TextRange::cursor(index),
            at,
            true,
        )
    }

    fn delete_key(index: usize, text: &str, at: u64) -> TextUndoOperation {
        TextUndoOperation::new(
            index,
            text,
            "",
            TextRange::cursor(index),
            TextRange::cursor(index),
            at,
            true,
        )
    }

    #[test]
    fn classifies_kind() {
        assert_eq!(insert(0, "a", 0).kind(), TextEditType::Insert);
        assert_eq!(backspace(0, "a", 0).kind(), TextEditType::Delete);
        let replace = TextUndoOperation::new(
            0,
            "a",
            "b",
            TextRange::new(0, 1),
            TextRange::cursor(1),
            0,
            true,
        );
        assert_eq!(replace.kind(), TextEditType::Replace);
        assert_eq!(replace.delete_type(), None);
    }

    #[test]
    fn classifies_delete_direction() {
        assert_eq!(
            backspace(2, "c", 0).delete_type(),
            Some(TextDeleteType::BackspaceLike)
        );
        assert_eq!(
            delete_key(2, "c", 0).delete_type(),
            Some(TextDeleteType::DeleteKeyLike)
        );
        let selection = TextUndoOperation::new(
            1,
            "bcd",
            "",
            TextRange::new(4, 1),
            TextRange::cursor(1),
            0,
            true,
        );
        assert_eq!(selection.delete_type(), Some(TextDeleteType::SelectionDelete));
        let programmatic = TextUndoOperation::new(
            1,
            "bcd",
            "",
            TextRange::cursor(0),
            TextRange::new(0, 1),
            0,
            true,
        );
        assert_eq!(
            programmatic.delete_type(),
            Some(TextDeleteType::NotUserInitiated)
        );
    }

    #[test]
    fn consecutive_inserts_merge() {
        let merged = insert(0, "H", 0).merge(&insert(1, "i", 50)).unwrap();
        assert_eq!(merged.index(), 0);
        assert_eq!(merged.post_text(), "Hi");
        assert_eq!(merged.pre_selection(), TextRange::cursor(0));
        assert_eq!(merged.post_selection(), TextRange::cursor(2));
        assert_eq!(merged.timestamp_ms(), 50);
    }

    #[test]
    fn non_adjacent_inserts_do_not_merge() {
        assert!(insert(0, "H", 0).merge(&insert(3, "i", 50)).is_none());
    }

    #[test]
    fn merge_window_is_inclusive() {
        assert!(insert(0, "a", 0).merge(&insert(1, "b", 2000)).is_some());
        assert!(insert(0, "a", 0).merge(&insert(1, "b", 2001)).is_none());
        assert!(insert(0, "a", 0)
            .merge_within(&insert(1, "b", 400), 300)
            .is_none());
    }

    #[test]
    fn newline_starts_new_step() {
        assert!(insert(0, "Hi", 0).merge(&insert(2, "\n", 10)).is_none());
        assert!(insert(0, "\n", 0).merge(&insert(1, "a", 10)).is_some());
    }

    #[test]
    fn non_mergeable_operations_stay_apart() {
        let sealed = insert(0, "a", 0).with_can_merge(false);
        assert!(sealed.merge(&insert(1, "b", 10)).is_none());
        assert!(insert(0, "a", 0)
            .merge(&insert(1, "b", 10).with_can_merge(false))
            .is_none());
    }

    #[test]
    fn backspaces_merge_backwards() {
        let merged = backspace(2, "c", 0).merge(&backspace(1, "b", 10)).unwrap();
        assert_eq!(merged.index(), 1);
        assert_eq!(merged.pre_text(), "bc");
        assert_eq!(merged.pre_selection(), TextRange::cursor(3));
        assert_eq!(merged.post_selection(), TextRange::cursor(1));
    }

    #[test]
    fn delete_keys_merge_forwards() {
        let merged = delete_key(1, "b", 0).merge(&delete_key(1, "c", 10)).unwrap();
        assert_eq!(merged.index(), 1);
        assert_eq!(merged.pre_text(), "bc");
    }

    #[test]
    fn mixed_delete_directions_do_not_merge() {
        assert!(backspace(1, "b", 0).merge(&delete_key(1, "c", 10)).is_none());
    }

    #[test]
    fn replacements_never_merge() {
        let replace = |index: usize, pre: &str, post: &str, at: u64| {
            TextUndoOperation::new(
                index,
                pre,
                post,
                TextRange::new(index, index + 1),
                TextRange::cursor(index + 1),
                at,
                true,
            )
        };
        let a = replace(0, "a", "b", 0);
        let b = replace(1, "c", "d", 1);
        assert!(a.merge(&b).is_none());
    }
}
