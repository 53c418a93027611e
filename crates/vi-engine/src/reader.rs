//! Bidirectional reader: a scanning cursor over a text snapshot.
//!
//! Motions are written as small programs over two readers anchored at the
//! cursor: one reading backward (`br`), one reading forward (`fr`). A reader
//! consumes characters one at a time, can peek at the next one, and can give
//! characters back. The `gather` family consumes characters while a predicate
//! holds.
//!
//! For a backward reader "next character" means the character *before* the
//! current offset, so `peek` on a backward reader at offset 5 returns the char
//! at index 4.

use ropey::Rope;

use crate::word::{is_punct, is_space};

/// A scanning cursor over an immutable rope snapshot.
#[derive(Clone)]
pub struct Reader {
    text: Rope,
    origin: usize,
    forward: bool,
    consumed: usize,
}

impl Reader {
    /// A reader moving toward the end of the text, starting at `origin`.
    #[must_use]
    pub fn forward(text: &Rope, origin: usize) -> Self {
        Self {
            text: text.clone(),
            origin: origin.min(text.len_chars()),
            forward: true,
            consumed: 0,
        }
    }

    /// A reader moving toward the start of the text, starting at `origin`.
    #[must_use]
    pub fn backward(text: &Rope, origin: usize) -> Self {
        Self {
            text: text.clone(),
            origin: origin.min(text.len_chars()),
            forward: false,
            consumed: 0,
        }
    }

    /// A fresh forward reader at this reader's current offset.
    #[must_use]
    pub fn to_forward(&self) -> Self {
        Self::forward(&self.text, self.offset())
    }

    /// A fresh backward reader at this reader's current offset.
    #[must_use]
    pub fn to_backward(&self) -> Self {
        Self::backward(&self.text, self.offset())
    }

    /// The snapshot this reader scans.
    #[must_use]
    pub const fn text(&self) -> &Rope {
        &self.text
    }

    /// Current caret offset.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        if self.forward {
            self.origin + self.consumed
        } else {
            self.origin - self.consumed
        }
    }

    /// Number of characters consumed so far.
    #[inline]
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.consumed
    }

    #[inline]
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        self.forward
    }

    /// The next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        let at = self.offset();
        if self.forward {
            self.text.get_char(at)
        } else if at == 0 {
            None
        } else {
            self.text.get_char(at - 1)
        }
    }

    /// Consume and return the next character.
    pub fn get(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.consumed += 1;
        Some(c)
    }

    /// Give back the last `n` consumed characters.
    pub fn unget(&mut self, n: usize) {
        self.consumed -= n.min(self.consumed);
    }

    /// Consume up to the end of the line, returning the characters read
    /// (in reading order) and whether the text was already exhausted.
    ///
    /// The newline itself is consumed only when `include_newline` is set.
    pub fn line(&mut self, include_newline: bool) -> (String, bool) {
        let mut s = String::new();
        loop {
            let Some(c) = self.peek() else {
                let eof = s.is_empty();
                return (s, eof);
            };
            if c == '\n' {
                if include_newline {
                    self.get();
                }
                return (s, false);
            }
            self.get();
            s.push(c);
        }
    }

    /// Consume while `pred` holds. Returns `true` if a character failed the
    /// predicate, `false` if the text ran out first.
    pub fn gather(&mut self, mut pred: impl FnMut(char) -> bool) -> bool {
        self.gather_window(1, false, |w| pred(w[0]))
    }

    /// Like [`gather`](Self::gather), but also consume the character that
    /// failed the predicate when `around` is set.
    pub fn gather_around(&mut self, around: bool, mut pred: impl FnMut(char) -> bool) -> bool {
        self.gather_window(1, around, |w| pred(w[0]))
    }

    /// Consume while `pred` holds for a sliding window of `n` characters,
    /// given in reading order. When the predicate fails, the window is given
    /// back unless `around` is set.
    pub fn gather_window(
        &mut self,
        n: usize,
        around: bool,
        mut pred: impl FnMut(&[char]) -> bool,
    ) -> bool {
        let mut window: Vec<char> = Vec::with_capacity(n);
        loop {
            while window.len() < n {
                match self.get() {
                    Some(c) => window.push(c),
                    None => return false,
                }
            }
            if !pred(&window) {
                if !around {
                    self.unget(window.len());
                }
                return true;
            }
            window.remove(0);
        }
    }

    // -- Character-class helpers --------------------------------------------

    /// Skip whitespace; newlines count only when `newline` is set.
    pub fn whitespace(&mut self, newline: bool) -> bool {
        self.gather(|c| (c != '\n' || newline) && is_space(c))
    }

    /// Skip a run of non-whitespace (a WORD).
    pub fn non_whitespace(&mut self) -> bool {
        self.gather(|c| !is_space(c))
    }

    /// Skip whitespace and punctuation.
    pub fn whitespace_punct(&mut self, newline: bool) -> bool {
        self.gather(|c| (c != '\n' || newline) && (is_space(c) || is_punct(c)))
    }

    /// Skip a run of word characters.
    pub fn word(&mut self) -> bool {
        self.gather(|c| !is_space(c) && !is_punct(c))
    }

    /// Skip a run of punctuation.
    pub fn punctuation(&mut self) -> bool {
        self.gather(is_punct)
    }

    /// Skip spaces and tabs only.
    pub fn blanks(&mut self) -> bool {
        self.gather(|c| c == ' ' || c == '\t')
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fwd(s: &str, at: usize) -> Reader {
        Reader::forward(&Rope::from_str(s), at)
    }

    fn bwd(s: &str, at: usize) -> Reader {
        Reader::backward(&Rope::from_str(s), at)
    }

    // -- peek / get / unget -------------------------------------------------

    #[test]
    fn forward_get_and_offset() {
        let mut r = fwd("abc", 1);
        assert_eq!(r.peek(), Some('b'));
        assert_eq!(r.get(), Some('b'));
        assert_eq!(r.get(), Some('c'));
        assert_eq!(r.get(), None);
        assert_eq!(r.offset(), 3);
        assert_eq!(r.consumed(), 2);
    }

    #[test]
    fn backward_peeks_previous_char() {
        let mut r = bwd("abc", 2);
        assert_eq!(r.peek(), Some('b'));
        assert_eq!(r.get(), Some('b'));
        assert_eq!(r.get(), Some('a'));
        assert_eq!(r.get(), None);
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn unget_restores() {
        let mut r = bwd("abcd", 4);
        r.get();
        r.get();
        r.unget(1);
        assert_eq!(r.offset(), 3);
        r.unget(10);
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn origin_is_clamped() {
        assert_eq!(fwd("ab", 10).offset(), 2);
    }

    // -- line ---------------------------------------------------------------

    #[test]
    fn line_forward_stops_at_newline() {
        let mut r = fwd("one\ntwo", 1);
        assert_eq!(r.line(false), ("ne".to_string(), false));
        assert_eq!(r.offset(), 3);
        let mut r = fwd("one\ntwo", 1);
        r.line(true);
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn line_backward_reads_to_line_start() {
        let mut r = bwd("one\ntwo", 6);
        assert_eq!(r.line(false), ("wt".to_string(), false));
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn line_reports_eof() {
        let mut r = fwd("ab", 2);
        assert_eq!(r.line(true), (String::new(), true));
        let mut r = fwd("ab", 0);
        assert_eq!(r.line(true), ("ab".to_string(), false));
    }

    // -- gather -------------------------------------------------------------

    #[test]
    fn gather_stops_before_failing_char() {
        let mut r = fwd("aaab", 0);
        assert!(r.gather(|c| c == 'a'));
        assert_eq!(r.offset(), 3);
    }

    #[test]
    fn gather_around_consumes_failing_char() {
        let mut r = fwd("aaab", 0);
        assert!(r.gather_around(true, |c| c == 'a'));
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn gather_reports_exhaustion() {
        let mut r = fwd("aaa", 0);
        assert!(!r.gather(|c| c == 'a'));
        assert_eq!(r.offset(), 3);
    }

    #[test]
    fn gather_window_finds_blank_line() {
        let mut r = fwd("ab\n\ncd", 0);
        assert!(r.gather_window(2, false, |w| w != ['\n', '\n']));
        assert_eq!(r.offset(), 2);
    }

    #[test]
    fn gather_window_backward_is_reading_order() {
        // Window [nearer, further]: stop when the further char is '.'.
        let mut r = bwd("x. yz", 5);
        assert!(r.gather_window(2, false, |w| w[1] != '.'));
        assert_eq!(r.offset(), 3);
    }

    // -- class helpers ------------------------------------------------------

    #[test]
    fn whitespace_respects_newline_flag() {
        let mut r = fwd("  \n x", 0);
        r.whitespace(false);
        assert_eq!(r.offset(), 2);
        let mut r = fwd("  \n x", 0);
        r.whitespace(true);
        assert_eq!(r.offset(), 4);
    }

    #[test]
    fn word_and_punctuation_runs() {
        let mut r = fwd("foo_bar.,baz", 0);
        r.word();
        assert_eq!(r.offset(), 7);
        r.punctuation();
        assert_eq!(r.offset(), 9);
    }

    #[test]
    fn to_forward_and_back() {
        let mut r = bwd("hello", 5);
        r.get();
        r.get();
        let f = r.to_forward();
        assert_eq!(f.peek(), Some('l'));
        assert!(f.is_forward());
        assert_eq!(f.to_backward().peek(), Some('l'));
    }
}
