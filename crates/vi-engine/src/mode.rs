//! Modal state.
//!
//! The session is always in exactly one [`Mode`]:
//!
//! | Mode               | Key input owned by | Purpose                          |
//! |--------------------|--------------------|----------------------------------|
//! | Insert             | host               | Plain typing, host edits text    |
//! | Command            | engine             | Motions and operators            |
//! | Visual(Char)       | engine             | Character-wise selection         |
//! | Visual(Line)       | engine             | Line-wise selection              |
//!
//! Insert is the default: until the user asks for command mode, the host
//! surface behaves exactly as it would without the engine.

use std::fmt;

// ---------------------------------------------------------------------------
// VisualKind
// ---------------------------------------------------------------------------

/// The sub-mode of visual selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// `v`: character-wise selection.
    Char,
    /// `V`: line-wise selection (always selects full lines).
    Line,
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char => f.write_str("VISUAL"),
            Self::Line => f.write_str("VISUAL LINE"),
        }
    }
}

// ---------------------------------------------------------------------------
// Mode
// ---------------------------------------------------------------------------

/// The current editing mode.
///
/// This is a pure data type. Key dispatch and the transitions between modes
/// live in the session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// The host owns editing; the engine only watches for the enter chord.
    #[default]
    Insert,
    /// Keys are commands, not text input.
    Command,
    /// Selection mode. Motions extend the selection.
    Visual(VisualKind),
}

impl Mode {
    /// Human-readable name, for status displays and logs.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Command => "COMMAND",
            Self::Visual(VisualKind::Char) => "VISUAL",
            Self::Visual(VisualKind::Line) => "VISUAL LINE",
        }
    }

    /// True while the engine holds exclusive control of key input.
    #[inline]
    #[must_use]
    pub const fn is_engine_owned(self) -> bool {
        !matches!(self, Self::Insert)
    }

    /// True if we're in any visual sub-mode.
    #[inline]
    #[must_use]
    pub const fn is_visual(self) -> bool {
        matches!(self, Self::Visual(_))
    }

    /// True in line-wise visual mode.
    #[inline]
    #[must_use]
    pub const fn is_visual_line(self) -> bool {
        matches!(self, Self::Visual(VisualKind::Line))
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
