//! Tracks the edited intervals of one edit transaction.
//!
//! Each entry pairs the interval in the text as it was before the transaction
//! (`original`) with the interval that replaced it in the current text
//! (`current`). Entries stay sorted, never overlap, and entries that touch are
//! merged, so the list is the minimal description of what changed.

use smallvec::SmallVec;

use crate::range::{shift_offset, TextRange};

/// Read-only view of the changes made during an edit.
pub trait ChangeList {
    /// Number of disjoint changed intervals.
    fn change_count(&self) -> usize;

    /// Interval of change `index` in the current text.
    fn get_range(&self, index: usize) -> Option<TextRange>;

    /// Interval of change `index` in the text as it was before the edit.
    fn get_original_range(&self, index: usize) -> Option<TextRange>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Change {
    original: TextRange,
    current: TextRange,
}

impl Change {
    /// Current length minus original length.
    fn delta(&self) -> isize {
        self.current.length() as isize - self.original.length() as isize
    }
}

#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    changes: SmallVec<[Change; 4]>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `pre_start..pre_end` of the current text was replaced by
    /// `post_len` codepoints.
    pub fn track_change(&mut self, pre_start: usize, pre_end: usize, post_len: usize) {
        let start = pre_start.min(pre_end);
        let end = pre_start.max(pre_end);
        if start == end && post_len == 0 {
            return;
        }
        let delta = post_len as isize - (end - start) as isize;

        let mut updated: SmallVec<[Change; 4]> = SmallVec::with_capacity(self.changes.len() + 1);
        let mut after: SmallVec<[Change; 4]> = SmallVec::new();
        let mut delta_before = 0isize;
        let mut touching: Option<(Change, Change)> = None;

        for change in self.changes.iter().copied() {
            if change.current.max() < start {
                delta_before += change.delta();
                updated.push(change);
            } else if change.current.min() <= end {
                touching = Some(match touching {
                    None => (change, change),
                    Some((first, _)) => (first, change),
                });
            } else {
                after.push(Change {
                    original: change.original,
                    current: change.current.shift(delta),
                });
            }
        }

        let merged = match touching {
            None => {
                let original_start = shift_offset(start, -delta_before);
                Change {
                    original: TextRange::new(original_start, original_start + (end - start)),
                    current: TextRange::new(start, start + post_len),
                }
            }
            Some((first, last)) => {
                let original_start = if start < first.current.min() {
                    shift_offset(start, -delta_before)
                } else {
                    first.original.min()
                };
                let original_end = if end > last.current.max() {
                    last.original.max() + (end - last.current.max())
                } else {
                    last.original.max()
                };
                let current_start = start.min(first.current.min());
                let current_end = shift_offset(end.max(last.current.max()), delta);
                Change {
                    original: TextRange::new(original_start, original_end),
                    current: TextRange::new(current_start, current_end),
                }
            }
        };

        // An insert fully deleted again leaves nothing behind.
        if !(merged.original.collapsed() && merged.current.collapsed()) {
            updated.push(merged);
        }
        updated.extend(after);
        self.changes = updated;
    }

    /// Calls `f(original, current)` for each change in text order.
    pub fn for_each(&self, mut f: impl FnMut(TextRange, TextRange)) {
        for change in &self.changes {
            f(change.original, change.current);
        }
    }

    pub fn clear(&mut self) {
        self.changes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Maps an offset in the original text to the current text.
    ///
    /// Offsets outside every changed interval map to a cursor shifted by the
    /// changes before them. An offset strictly inside a replaced interval maps
    /// to the whole interval that replaced it.
    pub fn map_from_original(&self, offset: usize) -> TextRange {
        let mut delta = 0isize;
        for change in &self.changes {
            if change.original.max() <= offset {
                delta += change.delta();
                continue;
            }
            if offset <= change.original.min() {
                break;
            }
            return change.current;
        }
        TextRange::cursor(shift_offset(offset, delta))
    }

    /// Maps an offset in the current text back to the original text.
    pub fn map_to_original(&self, offset: usize) -> TextRange {
        let mut delta = 0isize;
        for change in &self.changes {
            if change.current.max() <= offset {
                delta -= change.delta();
                continue;
            }
            if offset <= change.current.min() {
                break;
            }
            return change.original;
        }
        TextRange::cursor(shift_offset(offset, delta))
    }
}

impl ChangeList for ChangeTracker {
    fn change_count(&self) -> usize {
        self.changes.len()
    }

    fn get_range(&self, index: usize) -> Option<TextRange> {
        self.changes.get(index).map(|change| change.current)
    }

    fn get_original_range(&self, index: usize) -> Option<TextRange> {
        self.changes.get(index).map(|change| change.original)
    }
}
