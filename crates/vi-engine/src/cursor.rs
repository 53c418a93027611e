//! Cursor and selection: a pair of caret offsets into the text.
//!
//! Offsets count Unicode scalar values (chars), the same unit `ropey` uses for
//! its char indices. An offset is a *caret* position between two characters:
//! offset 0 is before the first character, `len` is after the last one.
//!
//! A [`Cursor`] holds two offsets:
//!
//! - `cur`: where new input lands, the active end of a selection.
//! - `start`: the anchor of the selection.
//!
//! When `cur == start` there is no selection. The direction of a selection is
//! implied by the two offsets: forward when `cur >= start`.

use std::fmt;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which end of a selection is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `cur` is at the high end (or the selection is empty).
    #[default]
    Forward,
    /// `cur` is at the low end.
    Backward,
}

impl Direction {
    /// The other direction.
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Caret plus selection anchor.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub cur: usize,
    pub start: usize,
}

impl Cursor {
    /// A cursor with an explicit anchor.
    #[inline]
    #[must_use]
    pub const fn new(cur: usize, start: usize) -> Self {
        Self { cur, start }
    }

    /// A collapsed cursor (no selection) at `offset`.
    #[inline]
    #[must_use]
    pub const fn at(offset: usize) -> Self {
        Self {
            cur: offset,
            start: offset,
        }
    }

    /// A selection covering `low..high` with the given active end.
    #[must_use]
    pub const fn spanning(low: usize, high: usize, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self::new(high, low),
            Direction::Backward => Self::new(low, high),
        }
    }

    /// True when `cur >= start`.
    #[inline]
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.cur >= self.start
    }

    /// The direction implied by the two offsets.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        if self.is_forward() {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// `(low, high, direction)` with `low <= high`.
    #[inline]
    #[must_use]
    pub const fn ordered(&self) -> (usize, usize, Direction) {
        if self.cur < self.start {
            (self.cur, self.start, Direction::Backward)
        } else {
            (self.start, self.cur, Direction::Forward)
        }
    }

    /// The low end of the selection.
    #[inline]
    #[must_use]
    pub const fn low(&self) -> usize {
        self.ordered().0
    }

    /// The high end of the selection.
    #[inline]
    #[must_use]
    pub const fn high(&self) -> usize {
        self.ordered().1
    }

    /// Number of chars selected.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        let (low, high, _) = self.ordered();
        high - low
    }

    /// True when nothing is selected.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cur == self.start
    }

    /// Collapse to the low end.
    #[must_use]
    pub const fn at_start(&self) -> Self {
        Self::at(self.low())
    }

    /// Collapse to the high end.
    #[must_use]
    pub const fn at_end(&self) -> Self {
        Self::at(self.high())
    }

    /// Swap the active end and the anchor (`o` in visual mode).
    #[must_use]
    pub const fn swapped(&self) -> Self {
        Self::new(self.start, self.cur)
    }

    /// Clamp both offsets to `0..=len`.
    #[must_use]
    pub fn clamped(&self, len: usize) -> Self {
        Self::new(self.cur.min(len), self.start.min(len))
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Cursor({})", self.cur)
        } else {
            write!(f, "Cursor({}<-{})", self.cur, self.start)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
