//! Text surface: the host's editable text and its selection.
//!
//! The engine never owns the text. Before every command attempt it takes a
//! fresh snapshot through [`TextSurface::text`], and every mutation goes back
//! through [`TextSurface::replace_range`]. This keeps the engine correct when
//! the host edits the text behind its back (typing in insert mode, scripts,
//! undo stacks of its own).
//!
//! Snapshots are [`ropey::Rope`]s: cloning one is cheap, char indexing is
//! O(log n), and char offsets are exactly the offsets the engine works in.
//!
//! [`MemorySurface`] is a complete in-memory implementation used by the
//! driver binary and by tests.

use ropey::Rope;

use crate::cursor::{Cursor, Direction};

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A host selection: ordered offsets plus the active end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: Direction,
}

impl Selection {
    /// An empty selection (caret) at `offset`.
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
            direction: Direction::Forward,
        }
    }

    /// The engine cursor for this selection.
    #[must_use]
    pub const fn to_cursor(self) -> Cursor {
        Cursor::spanning(self.start, self.end, self.direction)
    }
}

impl From<Cursor> for Selection {
    fn from(c: Cursor) -> Self {
        let (start, end, direction) = c.ordered();
        Self {
            start,
            end,
            direction,
        }
    }
}

// ---------------------------------------------------------------------------
// TextSurface
// ---------------------------------------------------------------------------

/// What the engine needs from a host text field.
pub trait TextSurface {
    /// Snapshot of the current text.
    fn text(&self) -> Rope;

    /// The current selection.
    fn selection(&self) -> Selection;

    /// Replace the selection.
    fn set_selection(&mut self, sel: Selection);

    /// Replace chars `start..end` with `text`. Returns `false` if the host
    /// refused or the range was invalid.
    fn replace_range(&mut self, start: usize, end: usize, text: &str) -> bool;

    /// Scroll the viewport by pixels. Never moves the selection.
    fn scroll_by(&mut self, dx: i32, dy: i32);

    /// Height of the scrollable content in pixels, for page scrolling.
    fn viewport_height(&self) -> i32 {
        0
    }

    /// False for single-line inputs (tab moves focus there).
    fn is_multiline(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// MemorySurface
// ---------------------------------------------------------------------------

/// A rope-backed surface with a selection and a scroll offset.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    rope: Rope,
    selection: Selection,
    scroll_y: i32,
    height: i32,
    multiline: bool,
}

impl MemorySurface {
    /// A surface holding `text` with the caret at 0.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::caret(0),
            scroll_y: 0,
            height: 400,
            multiline: true,
        }
    }

    /// Builder: place the caret.
    #[must_use]
    pub fn with_caret(mut self, offset: usize) -> Self {
        self.selection = Selection::caret(offset.min(self.rope.len_chars()));
        self
    }

    /// Builder: single-line input.
    #[must_use]
    pub const fn single_line(mut self) -> Self {
        self.multiline = false;
        self
    }

    /// The text as a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    /// Accumulated vertical scroll.
    #[must_use]
    pub const fn scroll_y(&self) -> i32 {
        self.scroll_y
    }

    /// Simulate the host typing `text` at the caret, replacing any selection.
    /// This bypasses the engine, as typing in insert mode does.
    pub fn type_text(&mut self, text: &str) {
        let Selection { start, end, .. } = self.selection;
        if self.replace_range(start, end, text) {
            self.selection = Selection::caret(start + text.chars().count());
        }
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> Rope {
        self.rope.clone()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_selection(&mut self, sel: Selection) {
        let len = self.rope.len_chars();
        self.selection = Selection {
            start: sel.start.min(len),
            end: sel.end.min(len),
            direction: sel.direction,
        };
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) -> bool {
        let len = self.rope.len_chars();
        if start > end || end > len {
            return false;
        }
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        // Select the replacement, as a DOM text field's `setRangeText` does.
        self.selection = Selection {
            start,
            end: start + text.chars().count(),
            direction: Direction::Forward,
        };
        true
    }

    fn scroll_by(&mut self, _dx: i32, dy: i32) {
        self.scroll_y = (self.scroll_y + dy).max(0);
    }

    fn viewport_height(&self) -> i32 {
        self.height
    }

    fn is_multiline(&self) -> bool {
        self.multiline
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
