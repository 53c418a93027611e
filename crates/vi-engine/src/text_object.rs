//! Text objects: `i` (inner) and `a` (around) selections.
//!
//! A text object grows the selection outward from the cursor. It drives the
//! two readers of a motion attempt: `br` backward to the start of the object,
//! `fr` forward to its end. The caller turns the final reader offsets into a
//! selection.
//!
//! | Key | Object |
//! |-----|--------|
//! | `w` | word (punctuation breaks it) |
//! | `W` | WORD (only whitespace breaks it) |
//! | `s` | sentence |
//! | `p` | paragraph |
//! | `'` `"` | quoted string |
//! | `(` `)` `b` | parenthesised block |
//! | `<` `>` | angle-bracketed block |
//! | `B` | curly-braced block |
//!
//! Inner excludes the delimiters or trailing whitespace, around includes
//! them. A count repeats the expansion outward.

use crate::error::ParseError;
use crate::reader::Reader;

type Result<T> = std::result::Result<T, ParseError>;

/// Expand `br` and `fr` over the text object named by `obj`.
pub fn select(obj: char, around: bool, n: usize, br: &mut Reader, fr: &mut Reader) -> Result<()> {
    match obj {
        'w' => {
            br.word();
            for i in 0..n {
                let o = fr.offset();
                fr.word();
                if o == fr.offset() {
                    fr.punctuation();
                }
                if around || i + 1 < n {
                    fr.whitespace(true);
                }
            }
        }
        'W' => {
            br.non_whitespace();
            for i in 0..n {
                fr.non_whitespace();
                if around || i + 1 < n {
                    fr.whitespace(false);
                }
            }
        }
        's' => sentence(around, n, br, fr),
        'p' => paragraph(around, n, br, fr),
        '\'' | '"' => quoted(obj, around, n, br, fr)?,
        '(' | ')' | 'b' => block('(', ')', around, n, br, fr)?,
        '<' | '>' => block('<', '>', around, n, br, fr)?,
        'B' | '{' | '}' => block('{', '}', around, n, br, fr)?,
        't' => return Err(ParseError::InvalidMotion("tag objects are not supported")),
        _ => return Err(ParseError::InvalidMotion("unknown text object")),
    }
    Ok(())
}

/// A sentence runs back to the previous `.` or blank line and forward
/// through the next `.`, or up to a blank line if that comes first.
fn sentence(around: bool, n: usize, br: &mut Reader, fr: &mut Reader) {
    br.gather_window(2, false, |w| w != ['\n', '\n'] && w[1] != '.');
    for i in 0..n {
        if i > 0 {
            fr.get();
        }
        let mut blank = fr.clone();
        fr.gather_around(true, |c| c != '.');
        blank.gather_window(2, true, |w| w != ['\n', '\n']);
        if blank.offset() < fr.offset() {
            *fr = blank;
        }
        if around || i + 1 < n {
            fr.whitespace(true);
        }
    }
}

fn paragraph(around: bool, n: usize, br: &mut Reader, fr: &mut Reader) {
    br.gather_window(2, false, |w| w != ['\n', '\n']);
    let mut start = br.to_forward();
    start.gather(|c| c == '\n');
    *br = start.to_backward();
    for i in 0..n {
        if i > 0 {
            fr.gather(|c| c == '\n');
        }
        fr.gather_window(2, false, |w| w != ['\n', '\n']);
        while fr.peek() == Some('\n') {
            fr.get();
            if !around {
                break;
            }
        }
    }
}

fn quoted(q: char, around: bool, n: usize, br: &mut Reader, fr: &mut Reader) -> Result<()> {
    for i in 0..n {
        let past = around || i + 1 < n;
        if !br.gather_around(past, |c| c != q) || !fr.gather_around(past, |c| c != q) {
            return Err(ParseError::InvalidMotion("no enclosing quote"));
        }
    }
    Ok(())
}

/// Bracket pairs nest: brackets of the same kind in between are skipped.
fn block(
    open: char,
    close: char,
    around: bool,
    n: usize,
    br: &mut Reader,
    fr: &mut Reader,
) -> Result<()> {
    for i in 0..n {
        let past = around || i + 1 < n;
        let found_open = br.gather_around(past, nesting(close, open));
        let found_close = fr.gather_around(past, nesting(open, close));
        if !found_open || !found_close {
            return Err(ParseError::InvalidMotion("no enclosing bracket"));
        }
    }
    Ok(())
}

/// Predicate that keeps reading until an unmatched `target`, counting `inner`
/// as the start of a nested pair.
fn nesting(inner: char, target: char) -> impl FnMut(char) -> bool {
    let mut depth = 0usize;
    move |c| {
        if c == inner {
            depth += 1;
        } else if c == target {
            if depth == 0 {
                return false;
            }
            depth -= 1;
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use ropey::Rope;

    use super::*;

    fn obj(text: &str, at: usize, keys: &str, n: usize) -> Result<(usize, usize)> {
        let rope = Rope::from_str(text);
        let mut br = Reader::backward(&rope, at);
        let mut fr = Reader::forward(&rope, at);
        let mut k = keys.chars();
        let around = k.next() == Some('a');
        let o = k.next().unwrap_or(' ');
        select(o, around, n, &mut br, &mut fr)?;
        Ok((br.offset(), fr.offset()))
    }

    // -- words --------------------------------------------------------------

    #[test]
    fn inner_and_around_word() {
        assert_eq!(obj("hello world", 2, "iw", 1), Ok((0, 5)));
        assert_eq!(obj("hello world", 2, "aw", 1), Ok((0, 6)));
    }

    #[test]
    fn counted_word() {
        assert_eq!(obj("foo bar baz", 0, "iw", 2), Ok((0, 7)));
    }

    #[test]
    fn inner_big_word() {
        assert_eq!(obj("a foo.bar b", 4, "iW", 1), Ok((2, 9)));
    }

    // -- sentences and paragraphs -------------------------------------------

    #[test]
    fn inner_and_around_sentence() {
        let text = "One. Two three. Four";
        assert_eq!(obj(text, 6, "is", 1), Ok((5, 15)));
        assert_eq!(obj(text, 6, "as", 1), Ok((5, 16)));
    }

    #[test]
    fn sentence_stops_at_blank_line() {
        assert_eq!(obj("one two\n\nthree", 2, "is", 1), Ok((0, 9)));
    }

    #[test]
    fn inner_and_around_paragraph() {
        let text = "a\nb\n\nc";
        assert_eq!(obj(text, 0, "ip", 1), Ok((0, 4)));
        assert_eq!(obj(text, 0, "ap", 1), Ok((0, 5)));
        assert_eq!(obj(text, 5, "ip", 1), Ok((5, 6)));
    }

    // -- quotes -------------------------------------------------------------

    #[test]
    fn double_quotes() {
        let text = "say \"hi there\" ok";
        assert_eq!(obj(text, 6, "i\"", 1), Ok((5, 13)));
        assert_eq!(obj(text, 6, "a\"", 1), Ok((4, 14)));
    }

    #[test]
    fn single_quotes() {
        assert_eq!(obj("x = 'abc';", 6, "i'", 1), Ok((5, 8)));
    }

    #[test]
    fn missing_quote_fails() {
        assert!(obj("abc", 1, "i\"", 1).is_err());
    }

    // -- brackets -----------------------------------------------------------

    #[test]
    fn nested_parens() {
        let text = "f(a, (b), c)";
        assert_eq!(obj(text, 10, "i(", 1), Ok((2, 11)));
        assert_eq!(obj(text, 10, "a)", 1), Ok((1, 12)));
        assert_eq!(obj(text, 10, "ib", 1), Ok((2, 11)));
        assert_eq!(obj(text, 6, "ib", 1), Ok((6, 7)));
    }

    #[test]
    fn counted_parens_grow_outward() {
        assert_eq!(obj("f(a, (b), c)", 6, "ib", 2), Ok((2, 11)));
    }

    #[test]
    fn braces_and_angles() {
        assert_eq!(obj("{ x }", 2, "iB", 1), Ok((1, 4)));
        assert_eq!(obj("Vec<u8>", 5, "i<", 1), Ok((4, 6)));
        assert_eq!(obj("Vec<u8>", 5, "a>", 1), Ok((3, 7)));
    }

    #[test]
    fn unmatched_bracket_fails() {
        assert_eq!(
            obj("(abc", 2, "i(", 1),
            Err(ParseError::InvalidMotion("no enclosing bracket"))
        );
    }

    // -- unsupported --------------------------------------------------------

    #[test]
    fn tags_and_unknown_objects_fail() {
        assert!(matches!(
            obj("<a>x</a>", 4, "it", 1),
            Err(ParseError::InvalidMotion(_))
        ));
        assert!(matches!(
            obj("abc", 1, "iz", 1),
            Err(ParseError::InvalidMotion(_))
        ));
    }
}
