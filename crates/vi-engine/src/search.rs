//! Search: `/`, `?`, `*`, `#`, `n`, `N`.
//!
//! The remembered pattern carries its kind in its first character: `/` for a
//! regular expression, a space for a literal string. Both are searched with
//! the `regex` crate (literals escaped); the compiled regex is cached and
//! only rebuilt when the pattern string changes, so `n`/`N` never recompile.
//!
//! Forward search starts one character past the cursor and wraps to the top
//! of the text. Backward search takes the last match lying wholly before the
//! cursor and wraps to the last match in the text.

use regex::Regex;
use ropey::Rope;

const REGEX_MARKER: char = '/';
const LITERAL_MARKER: char = ' ';

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

impl SearchDirection {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

// ---------------------------------------------------------------------------
// Match
// ---------------------------------------------------------------------------

/// A match: start offset and length, in characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// SearchState
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    pattern: String,
    direction: SearchDirection,
    compiled: Option<(String, Regex)>,
    compilations: usize,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a literal pattern.
    pub fn set_literal(&mut self, s: &str, direction: SearchDirection) {
        self.set(LITERAL_MARKER, s, direction);
    }

    /// Remember a regular expression.
    pub fn set_regex(&mut self, s: &str, direction: SearchDirection) {
        self.set(REGEX_MARKER, s, direction);
    }

    /// Remember a pattern typed at the `/` or `?` prompt: a regular
    /// expression when it starts with `/`, otherwise a literal string.
    pub fn set_entered(&mut self, line: &str, direction: SearchDirection) {
        match line.strip_prefix(REGEX_MARKER) {
            Some(re) => self.set_regex(re, direction),
            None => self.set_literal(line, direction),
        }
    }

    /// Remember a whole-word search for `word` (`*`, `#`).
    pub fn set_word(&mut self, word: &str, direction: SearchDirection) {
        let re = format!(r"\b{}\b", regex::escape(word));
        self.set(REGEX_MARKER, &re, direction);
    }

    /// Keep the pattern, change the direction `n` follows.
    pub const fn set_direction(&mut self, direction: SearchDirection) {
        self.direction = direction;
    }

    fn set(&mut self, marker: char, s: &str, direction: SearchDirection) {
        self.pattern = format!("{marker}{s}");
        self.direction = direction;
    }

    /// The stored pattern, marker included. Empty when nothing was searched.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn has_pattern(&self) -> bool {
        !self.pattern.is_empty()
    }

    #[must_use]
    pub fn is_regex(&self) -> bool {
        self.pattern.starts_with(REGEX_MARKER)
    }

    /// Direction of the last `/`, `?`, `*` or `#`: what `n` repeats.
    #[must_use]
    pub const fn direction(&self) -> SearchDirection {
        self.direction
    }

    /// How many times a regex has been built.
    #[must_use]
    pub const fn compilations(&self) -> usize {
        self.compilations
    }

    fn regex(&mut self) -> Result<Option<&Regex>, regex::Error> {
        let Some(marker) = self.pattern.chars().next() else {
            return Ok(None);
        };
        let body = &self.pattern[marker.len_utf8()..];
        let source = if marker == REGEX_MARKER {
            body.to_string()
        } else {
            regex::escape(body)
        };
        let stale = self.compiled.as_ref().is_none_or(|(s, _)| *s != source);
        if stale {
            log::debug!("search: compiling {source:?}");
            let re = Regex::new(&source)?;
            self.compilations += 1;
            self.compiled = Some((source, re));
        }
        Ok(self.compiled.as_ref().map(|(_, re)| re))
    }

    /// Search from `cur`: `n` with `reverse == false`, `N` with `true`.
    pub fn find(
        &mut self,
        text: &Rope,
        cur: usize,
        reverse: bool,
    ) -> Result<Option<Match>, regex::Error> {
        let direction = if reverse {
            self.direction.opposite()
        } else {
            self.direction
        };
        let Some(re) = self.regex()? else {
            return Ok(None);
        };
        Ok(match direction {
            SearchDirection::Forward => find_forward(re, text, cur),
            SearchDirection::Backward => find_backward(re, text, cur),
        })
    }
}

fn to_match(text: &Rope, m: &regex::Match<'_>) -> Match {
    let start = text.byte_to_char(m.start());
    Match {
        start,
        len: text.byte_to_char(m.end()) - start,
    }
}

/// First match starting after `cur`, else the first match in the text.
#[must_use]
pub fn find_forward(re: &Regex, text: &Rope, cur: usize) -> Option<Match> {
    let s = text.to_string();
    let from = text.char_to_byte((cur + 1).min(text.len_chars()));
    re.find_at(&s, from)
        .or_else(|| re.find(&s))
        .map(|m| to_match(text, &m))
}

/// Last match lying wholly before `cur`, else the last match in the text.
#[must_use]
pub fn find_backward(re: &Regex, text: &Rope, cur: usize) -> Option<Match> {
    let s = text.to_string();
    let limit = text.char_to_byte(cur.min(text.len_chars()));
    last_match(re, &s[..limit])
        .or_else(|| last_match(re, &s))
        .map(|m| to_match(text, &m))
}

/// The match starting last in `hay`. Candidates are tried at every start so
/// overlapping matches are not skipped.
fn last_match<'t>(re: &Regex, hay: &'t str) -> Option<regex::Match<'t>> {
    let mut best = None;
    let mut at = 0;
    while let Some(m) = re.find_at(hay, at) {
        best = Some(m);
        match hay[m.start()..].chars().next() {
            Some(c) => at = m.start() + c.len_utf8(),
            None => break,
        }
    }
    best
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
