//! Keys and vi key notation.
//!
//! Hosts translate their native key events into [`Key`]s. Scripts and tests
//! use the familiar notation parsed by [`parse_keys`]:
//!
//! | Notation | Key |
//! |----------|-----|
//! | `a` | `Char('a')` |
//! | `<Esc>` | `Escape` |
//! | `<Tab>` | `Tab` |
//! | `<CR>`, `<Enter>` | `Char('\n')` |
//! | `<C-r>` | `Ctrl('r')` |
//! | `<lt>` | `Char('<')` |
//!
//! A `<` that does not start a recognised token is an ordinary character, so
//! `>>` and `<<` can be written directly.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Ctrl(char),
    Escape,
    Tab,
    /// Anything the engine has no binding for (arrows, function keys...).
    Other,
}

impl Key {
    /// `Escape`, or one of the control chords that act as it.
    #[must_use]
    pub const fn is_escape(self) -> bool {
        matches!(self, Self::Escape | Self::Ctrl('[' | '{'))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char('<') => f.write_str("<lt>"),
            Self::Char('\n') => f.write_str("<CR>"),
            Self::Char(c) => write!(f, "{c}"),
            Self::Ctrl(c) => write!(f, "<C-{c}>"),
            Self::Escape => f.write_str("<Esc>"),
            Self::Tab => f.write_str("<Tab>"),
            Self::Other => f.write_str("<?>"),
        }
    }
}

/// Parse vi key notation into keys.
#[must_use]
pub fn parse_keys(s: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = s;
    while let Some(c) = rest.chars().next() {
        if let Some((key, len)) = special(rest) {
            keys.push(key);
            rest = &rest[len..];
            continue;
        }
        keys.push(Key::Char(c));
        rest = &rest[c.len_utf8()..];
    }
    keys
}

/// Recognise a `<...>` token at the start of `s`.
fn special(s: &str) -> Option<(Key, usize)> {
    if !s.starts_with('<') {
        return None;
    }
    let end = s.find('>')?;
    let name = &s[1..end];
    let key = match name.to_ascii_lowercase().as_str() {
        "esc" => Key::Escape,
        "tab" => Key::Tab,
        "cr" | "enter" | "return" => Key::Char('\n'),
        "lt" => Key::Char('<'),
        "space" => Key::Char(' '),
        "bs" | "del" | "up" | "down" | "left" | "right" => Key::Other,
        _ => {
            let mut chars = name.chars();
            let (Some(m), Some('-'), Some(c), None) =
                (chars.next(), chars.next(), chars.next(), chars.next())
            else {
                return None;
            };
            if !m.eq_ignore_ascii_case(&'c') {
                return None;
            }
            Key::Ctrl(c)
        }
    };
    Some((key, end + 1))
}
