//! Word motions over a [`Reader`].
//!
//! | Function | Key | Moves |
//! |----------|-----|-------|
//! | [`word_forward`] | `w` | to the start of the next word |
//! | [`word_run`] | `cw` | to the end of the current word |
//! | [`word_backward`] | `b` | to the start of the previous word |
//! | [`word_end`] | `e` | to the end of the current or next word |
//! | [`big_word_forward`] | `W` | to the start of the next WORD |
//! | [`big_word_run`] | `cW` | to the end of the current WORD |
//! | [`big_word_backward`] | `B` | to the start of the previous WORD |
//! | [`big_word_end`] | `E` | to the end of the current or next WORD |
//!
//! A **word** is a run of word characters or a run of punctuation. A
//! **WORD** is any run of non-whitespace. Punctuation is Unicode punctuation
//! (general category `P*`) except `_`, which joins identifiers.
//!
//! Each function performs one step; callers repeat it for a count.

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::reader::Reader;

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Whitespace, including line breaks.
#[inline]
#[must_use]
pub fn is_space(c: char) -> bool {
    c.is_whitespace()
}

/// Unicode punctuation, not counting `_`.
#[must_use]
pub fn is_punct(c: char) -> bool {
    if c == '_' {
        return false;
    }
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// The word under the reader or, when on punctuation, the punctuation run.
/// This is `w` without the trailing whitespace, as `cw` uses it.
pub fn word_run(fr: &mut Reader) {
    let o = fr.offset();
    fr.word();
    if o == fr.offset() {
        fr.punctuation();
    }
}

/// `w`: skip the word run and the whitespace after it.
pub fn word_forward(fr: &mut Reader) {
    word_run(fr);
    fr.whitespace(true);
}

/// `b`: skip whitespace backward, then the punctuation run or word before it.
pub fn word_backward(br: &mut Reader) {
    br.whitespace(true);
    if br.peek().is_some_and(is_punct) {
        br.punctuation();
    } else {
        br.word();
    }
}

/// `e`: skip whitespace, then a word run, or a punctuation run if no word
/// follows.
pub fn word_end(fr: &mut Reader) {
    fr.whitespace(true);
    let o = fr.offset();
    fr.word();
    if o == fr.offset() {
        fr.punctuation();
    }
}

/// `W` without the trailing whitespace.
pub fn big_word_run(fr: &mut Reader) {
    fr.non_whitespace();
}

/// `W`
pub fn big_word_forward(fr: &mut Reader) {
    big_word_run(fr);
    fr.whitespace(true);
}

/// `B`
pub fn big_word_backward(br: &mut Reader) {
    br.whitespace(true);
    br.non_whitespace();
}

/// `E`
pub fn big_word_end(fr: &mut Reader) {
    fr.whitespace(true);
    fr.non_whitespace();
}

/// Bounds `(start, end)` of the run of word characters around `at`, for `*`
/// and `#`. Empty when `at` touches no word character.
#[must_use]
pub fn word_around(text: &ropey::Rope, at: usize) -> (usize, usize) {
    let mut br = Reader::backward(text, at);
    let mut fr = Reader::forward(text, at);
    br.word();
    fr.word();
    (br.offset(), fr.offset())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ropey::Rope;

    use super::*;

    fn step_fwd(s: &str, at: usize, f: fn(&mut Reader)) -> usize {
        let mut r = Reader::forward(&Rope::from_str(s), at);
        f(&mut r);
        r.offset()
    }

    fn step_bwd(s: &str, at: usize, f: fn(&mut Reader)) -> usize {
        let mut r = Reader::backward(&Rope::from_str(s), at);
        f(&mut r);
        r.offset()
    }

    // -- classification -----------------------------------------------------

    #[test]
    fn punctuation_classes() {
        assert!(!is_punct('a'));
        assert!(!is_punct('_'));
        assert!(!is_punct('9'));
        assert!(is_punct('.'));
        assert!(is_punct('('));
        assert!(is_punct('\u{201c}'));
        assert!(is_space(' '));
        assert!(is_space('\n'));
    }

    #[test]
    fn symbols_are_word_chars() {
        // Math and currency symbols are not punctuation.
        assert!(!is_punct('+'));
        assert!(!is_punct('$'));
    }

    // -- w / b / e ----------------------------------------------------------

    #[test]
    fn w_skips_word_and_space() {
        assert_eq!(step_fwd("hello world", 0, word_forward), 6);
        assert_eq!(step_fwd("hello world", 3, word_forward), 6);
    }

    #[test]
    fn w_stops_at_punctuation() {
        assert_eq!(step_fwd("foo.bar", 0, word_forward), 3);
        assert_eq!(step_fwd("foo.bar", 3, word_forward), 4);
        assert_eq!(step_fwd("foo... bar", 3, word_forward), 7);
    }

    #[test]
    fn word_run_keeps_trailing_space() {
        assert_eq!(step_fwd("foo bar", 0, word_run), 3);
        assert_eq!(step_fwd("... bar", 0, word_run), 3);
        assert_eq!(step_fwd("foo.bar baz", 0, big_word_run), 7);
    }

    #[test]
    fn w_crosses_lines() {
        assert_eq!(step_fwd("foo\n  bar", 0, word_forward), 6);
    }

    #[test]
    fn b_to_word_start() {
        assert_eq!(step_bwd("hello world", 11, word_backward), 6);
        assert_eq!(step_bwd("hello world", 6, word_backward), 0);
        assert_eq!(step_bwd("hello world", 3, word_backward), 0);
    }

    #[test]
    fn b_over_punctuation() {
        assert_eq!(step_bwd("foo.bar", 4, word_backward), 3);
        assert_eq!(step_bwd("foo.bar", 3, word_backward), 0);
    }

    #[test]
    fn e_to_word_end() {
        assert_eq!(step_fwd("hello world", 0, word_end), 5);
        assert_eq!(step_fwd("hello world", 5, word_end), 11);
        assert_eq!(step_fwd("a ...", 1, word_end), 5);
    }

    // -- W / B / E ----------------------------------------------------------

    #[test]
    fn big_words_ignore_punctuation() {
        assert_eq!(step_fwd("foo.bar baz", 0, big_word_forward), 8);
        assert_eq!(step_bwd("foo.bar baz", 7, big_word_backward), 0);
        assert_eq!(step_fwd("foo.bar baz", 0, big_word_end), 7);
    }

    // -- word_around ----------------------------------------------------------

    #[test]
    fn word_around_cursor() {
        let text = Rope::from_str("let foo_bar = 1;");
        assert_eq!(word_around(&text, 6), (4, 11));
        let text = Rope::from_str("foo, bar");
        assert_eq!(word_around(&text, 4), (4, 4));
    }
}
