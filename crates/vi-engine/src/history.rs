//! Undo/redo history with a merge window.
//!
//! Every text mutation is one [`TextHist`]: the span of the pre-edit text
//! that was replaced, the text that was there, and the text that replaced
//! it. Undo pops the newest entry and writes `old_text` back over the span
//! `new_text` now occupies; redo writes `new_text` over the original span.
//! Any new edit clears the redo stack.
//!
//! # Merge window
//!
//! While the window is open, an insertion that lands exactly at the end of
//! the newest entry's new text is appended to that entry instead of becoming
//! a new one, so a burst of typing undoes as one unit. Recording with
//! `open = false` closes the window, as does [`History::close`]. The window
//! never reopens over a non-empty redo stack.
//!
//! # Cursor
//!
//! Entries recorded by engine commands carry the cursor from before and after
//! the command so undo/redo can put it back exactly. Entries reconstructed
//! from host edits ([`diff`]) have none; undo then puts the cursor after the
//! restored text, redo after the new text.

use ropey::Rope;

use crate::cursor::Cursor;
use crate::surface::TextSurface;

// ---------------------------------------------------------------------------
// TextHist
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextHist {
    /// Replaced span, in the text as it was before the edit.
    pub range: Cursor,
    pub old_text: String,
    pub new_text: String,
    pub cursor_before: Option<usize>,
    pub cursor_after: Option<usize>,
}

impl TextHist {
    #[must_use]
    pub fn new(start: usize, end: usize, old_text: &str, new_text: &str) -> Self {
        Self {
            range: Cursor::new(end, start),
            old_text: old_text.to_string(),
            new_text: new_text.to_string(),
            cursor_before: None,
            cursor_after: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> usize {
        self.range.low()
    }

    fn old_len(&self) -> usize {
        self.old_text.chars().count()
    }

    fn new_len(&self) -> usize {
        self.new_text.chars().count()
    }
}

/// The single changed span between two snapshots, by longest common prefix
/// and suffix. `None` when they are equal.
#[must_use]
pub fn diff(old: &Rope, new: &Rope) -> Option<TextHist> {
    let prefix = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let (mut oe, mut ne) = (old.len_chars(), new.len_chars());
    if prefix == oe && prefix == ne {
        return None;
    }
    while oe > prefix && ne > prefix && old.char(oe - 1) == new.char(ne - 1) {
        oe -= 1;
        ne -= 1;
    }
    Some(TextHist::new(
        prefix,
        oe,
        &old.slice(prefix..oe).to_string(),
        &new.slice(prefix..ne).to_string(),
    ))
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<TextHist>,
    redo_stack: Vec<TextHist>,
    open: bool,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `start..end`, holding `old_text`, was replaced by
    /// `new_text`. `cursor` is where the cursor was before the edit. With
    /// `open` set, the window stays open for the next insertion to merge into.
    ///
    /// Returns `true` if the edit was merged into the newest entry.
    pub fn record(
        &mut self,
        start: usize,
        end: usize,
        old_text: &str,
        new_text: &str,
        cursor: usize,
        open: bool,
    ) -> bool {
        let merge_ok = self.open && open && self.redo_stack.is_empty() && start == end;
        let mut merged = false;
        if merge_ok {
            if let Some(top) = self.undo_stack.last_mut() {
                if top.start() + top.new_len() == start {
                    top.new_text.push_str(new_text);
                    top.cursor_after = Some(start + new_text.chars().count());
                    merged = true;
                }
            }
        }
        if !merged {
            let mut h = TextHist::new(start, end, old_text, new_text);
            h.cursor_before = Some(cursor);
            log::debug!("history: record {h:?}");
            self.undo_stack.push(h);
        }
        self.redo_stack.clear();
        self.open = open;
        merged
    }

    /// Push an entry reconstructed from host edits. Closes the window.
    pub fn push(&mut self, h: TextHist) {
        log::debug!("history: host edit {h:?}");
        self.undo_stack.push(h);
        self.redo_stack.clear();
        self.open = false;
    }

    /// Set the after-cursor of the newest entry, if it has none yet.
    pub fn settle(&mut self, cursor: usize) {
        if let Some(top) = self.undo_stack.last_mut() {
            if top.cursor_after.is_none() {
                top.cursor_after = Some(cursor);
            }
        }
    }

    /// Close the merge window.
    pub const fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Undo the newest entry on `surface`. Returns the cursor to restore, or
    /// `None` if there was nothing to undo or the surface refused the edit.
    pub fn undo(&mut self, surface: &mut impl TextSurface) -> Option<usize> {
        self.open = false;
        let h = self.undo_stack.pop()?;
        let start = h.start();
        if !surface.replace_range(start, start + h.new_len(), &h.old_text) {
            log::warn!("history: surface refused undo of {h:?}");
            self.undo_stack.push(h);
            return None;
        }
        let cursor = h.cursor_before.unwrap_or(start + h.old_len());
        self.redo_stack.push(h);
        Some(cursor)
    }

    /// Redo the newest undone entry. Returns the cursor to restore.
    pub fn redo(&mut self, surface: &mut impl TextSurface) -> Option<usize> {
        self.open = false;
        let h = self.redo_stack.pop()?;
        let start = h.start();
        if !surface.replace_range(start, start + h.old_len(), &h.new_text) {
            log::warn!("history: surface refused redo of {h:?}");
            self.redo_stack.push(h);
            return None;
        }
        let cursor = h.cursor_after.unwrap_or(start + h.new_len());
        self.undo_stack.push(h);
        Some(cursor)
    }

    /// Number of undoable entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<&TextHist> {
        self.undo_stack.last()
    }

    /// Entries since `mark` (a previous [`len`](Self::len)), oldest first.
    #[must_use]
    pub fn since(&self, mark: usize) -> &[TextHist] {
        self.undo_stack.get(mark..).unwrap_or_default()
    }

    #[must_use]
    pub fn undo_entries(&self) -> &[TextHist] {
        &self.undo_stack
    }

    #[must_use]
    pub fn redo_entries(&self) -> &[TextHist] {
        &self.redo_stack
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    /// Apply an edit to the surface and record it, as the session does.
    fn edit(
        h: &mut History,
        s: &mut MemorySurface,
        start: usize,
        end: usize,
        text: &str,
        open: bool,
    ) -> bool {
        let old = s.text().slice(start..end).to_string();
        assert!(s.replace_range(start, end, text));
        h.record(start, end, &old, text, start, open)
    }

    // -- diff ---------------------------------------------------------------

    #[test]
    fn diff_insertion() {
        let h = diff(&Rope::from_str("hello world"), &Rope::from_str("hello big world")).unwrap();
        assert_eq!(h.start(), 6);
        assert_eq!(h.old_text, "");
        assert_eq!(h.new_text, "big ");
    }

    #[test]
    fn diff_replacement() {
        let h = diff(&Rope::from_str("abcdef"), &Rope::from_str("abXYef")).unwrap();
        assert_eq!((h.range.low(), h.range.high()), (2, 4));
        assert_eq!(h.old_text, "cd");
        assert_eq!(h.new_text, "XY");
    }

    #[test]
    fn diff_deletion_at_end() {
        let h = diff(&Rope::from_str("abc"), &Rope::from_str("ab")).unwrap();
        assert_eq!((h.start(), h.old_text.as_str(), h.new_text.as_str()), (2, "c", ""));
    }

    #[test]
    fn diff_repeated_chars() {
        // Prefix and suffix must not overlap.
        let h = diff(&Rope::from_str("aa"), &Rope::from_str("aaa")).unwrap();
        assert_eq!((h.start(), h.old_text.as_str(), h.new_text.as_str()), (2, "", "a"));
    }

    #[test]
    fn diff_equal_is_none() {
        assert!(diff(&Rope::from_str("same"), &Rope::from_str("same")).is_none());
    }

    // -- undo / redo --------------------------------------------------------

    #[test]
    fn undo_restores_text_and_cursor() {
        let mut s = MemorySurface::new("hello world");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 6, "", false);
        h.settle(0);
        assert_eq!(s.contents(), "world");
        assert_eq!(h.undo(&mut s), Some(0));
        assert_eq!(s.contents(), "hello world");
        assert_eq!(h.redo(&mut s), Some(0));
        assert_eq!(s.contents(), "world");
    }

    #[test]
    fn host_entries_use_offset_rule() {
        let mut s = MemorySurface::new("ab");
        let mut h = History::new();
        s.type_text("xyz");
        h.push(diff(&Rope::from_str("ab"), &s.text()).unwrap());
        assert_eq!(s.contents(), "xyzab");
        assert_eq!(h.undo(&mut s), Some(0));
        assert_eq!(s.contents(), "ab");
        assert_eq!(h.redo(&mut s), Some(3));
        assert_eq!(s.contents(), "xyzab");
    }

    #[test]
    fn undo_and_redo_on_empty_stacks() {
        let mut s = MemorySurface::new("x");
        let mut h = History::new();
        assert_eq!(h.undo(&mut s), None);
        assert_eq!(h.redo(&mut s), None);
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut s = MemorySurface::new("abc");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 1, "", false);
        h.undo(&mut s);
        assert_eq!(h.redo_entries().len(), 1);
        edit(&mut h, &mut s, 1, 2, "", false);
        assert!(h.redo_entries().is_empty());
    }

    #[test]
    fn undo_all_then_redo_all() {
        let mut s = MemorySurface::new("one");
        let mut h = History::new();
        edit(&mut h, &mut s, 3, 3, " two", false);
        edit(&mut h, &mut s, 7, 7, " three", false);
        edit(&mut h, &mut s, 0, 3, "1", false);
        assert_eq!(s.contents(), "1 two three");
        while h.undo(&mut s).is_some() {}
        assert_eq!(s.contents(), "one");
        while h.redo(&mut s).is_some() {}
        assert_eq!(s.contents(), "1 two three");
    }

    // -- merge window -------------------------------------------------------

    #[test]
    fn adjacent_insertions_merge_while_open() {
        let mut s = MemorySurface::new("");
        let mut h = History::new();
        assert!(!edit(&mut h, &mut s, 0, 0, "a", true));
        assert!(edit(&mut h, &mut s, 1, 1, "b", true));
        assert!(edit(&mut h, &mut s, 2, 2, "c", true));
        assert_eq!(h.len(), 1);
        assert_eq!(h.top().map(|t| t.new_text.as_str()), Some("abc"));
        assert_eq!(h.undo(&mut s), Some(0));
        assert_eq!(s.contents(), "");
        assert_eq!(h.redo(&mut s), Some(3));
    }

    #[test]
    fn closed_window_does_not_merge() {
        let mut s = MemorySurface::new("");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 0, "a", true);
        h.close();
        edit(&mut h, &mut s, 1, 1, "b", true);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn non_adjacent_insertion_starts_new_entry() {
        let mut s = MemorySurface::new("xy");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 0, "a", true);
        edit(&mut h, &mut s, 3, 3, "b", true);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn replacement_never_merges() {
        let mut s = MemorySurface::new("xy");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 0, "a", true);
        edit(&mut h, &mut s, 1, 2, "b", true);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn window_stays_shut_over_redo() {
        let mut s = MemorySurface::new("");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 0, "a", true);
        edit(&mut h, &mut s, 1, 1, "b", false);
        h.undo(&mut s);
        edit(&mut h, &mut s, 1, 1, "c", true);
        assert_eq!(h.len(), 2);
    }

    // -- marks --------------------------------------------------------------

    #[test]
    fn since_mark() {
        let mut s = MemorySurface::new("");
        let mut h = History::new();
        edit(&mut h, &mut s, 0, 0, "a", false);
        let mark = h.len();
        edit(&mut h, &mut s, 1, 1, "b", false);
        assert_eq!(h.since(mark).len(), 1);
        assert!(h.since(10).is_empty());
    }
}
