//! Motion resolver.
//!
//! A motion reads its keys from a [`Cmd`] and moves one of two readers
//! anchored at the cursor. The result is a [`Cursor`] whose `cur` is the new
//! position and whose `start` is left where it was, so operators get the
//! range `start..cur` and visual mode extends its selection. Text objects
//! also move `start`, growing the selection outward.
//!
//! | Keys | Motion |
//! |------|--------|
//! | `0` `^` `$` | line start, first non-blank, line end |
//! | `h` `l` | left, right (not across lines) |
//! | `j` `k` | down, up, keeping the column |
//! | `-` `+` | up, down to the first non-blank |
//! | `w` `b` `e` `W` `B` `E` | words, see [`crate::word`] |
//! | `(` `)` | previous, next sentence |
//! | `{` `}` | previous, next blank line |
//! | `f` `F` `t` `T` `;` `,` | character search on the line |
//! | `G` | last character, or line N |
//! | `%` | matching bracket |
//! | `iX` `aX` | text objects, see [`crate::text_object`] |

use ropey::Rope;

use crate::cmd::Cmd;
use crate::cursor::Cursor;
use crate::error::ParseError;
use crate::reader::Reader;
use crate::text_object;
use crate::word;

type Result<T> = std::result::Result<T, ParseError>;

/// The remembered `f`/`F`/`t`/`T` search, for `;` and `,`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharSearch {
    pub target: char,
    pub forward: bool,
    /// `t`/`T`: stop next to the character instead of on it.
    pub before: bool,
}

/// One motion attempt over a text snapshot.
pub struct Motion<'a> {
    text: &'a Rope,
    cursor: Cursor,
    /// Operator key that, doubled, selects whole lines (`dd`, `yy`, `>>`).
    pub line_key: Option<char>,
    /// `$` includes the line break (visual mode).
    pub visual: bool,
    /// `w`/`W` leave trailing whitespace alone (`cw`).
    pub change: bool,
}

impl<'a> Motion<'a> {
    #[must_use]
    pub const fn new(text: &'a Rope, cursor: Cursor) -> Self {
        Self {
            text,
            cursor,
            line_key: None,
            visual: false,
            change: false,
        }
    }

    #[must_use]
    pub const fn line_key(mut self, key: char) -> Self {
        self.line_key = Some(key);
        self
    }

    #[must_use]
    pub const fn visual(mut self, visual: bool) -> Self {
        self.visual = visual;
        self
    }

    #[must_use]
    pub const fn change(mut self, change: bool) -> Self {
        self.change = change;
        self
    }

    fn fwd(&self, at: usize) -> Reader {
        Reader::forward(self.text, at)
    }

    fn bwd(&self, at: usize) -> Reader {
        Reader::backward(self.text, at)
    }

    fn moved(&self, to: usize) -> Cursor {
        Cursor {
            cur: to,
            start: self.cursor.start,
        }
    }

    /// Resolve the motion at the front of `cmd`. The count must already have
    /// been parsed.
    pub fn resolve(&self, cmd: &mut Cmd, search: &mut Option<CharSearch>) -> Result<Cursor> {
        let at = self.cursor.cur;
        let mut br = self.bwd(at);
        let mut fr = self.fwd(at);
        let n = cmd.n();
        let k = cmd.get()?;
        let to = match k {
            '0' => {
                br.line(false);
                br.offset()
            }
            '$' => {
                cmd.no_number()?;
                fr.line(self.visual);
                fr.offset()
            }
            '^' => {
                br.line(false);
                self.first_non_blank(br.offset())
            }
            '-' => {
                for _ in 0..n {
                    br.line(true);
                }
                br.line(false);
                self.first_non_blank(br.offset())
            }
            '+' => {
                for _ in 0..n {
                    fr.line(true);
                }
                let mut rr = fr.to_backward();
                rr.line(false);
                self.first_non_blank(rr.offset())
            }
            'w' | 'W' => {
                let (run, step): (fn(&mut Reader), fn(&mut Reader)) = if k == 'w' {
                    (word::word_run, word::word_forward)
                } else {
                    (word::big_word_run, word::big_word_forward)
                };
                for i in 0..n {
                    // `cw` stops at the end of the last word.
                    if self.change && i + 1 == n {
                        run(&mut fr);
                    } else {
                        step(&mut fr);
                    }
                }
                fr.offset()
            }
            'b' | 'B' | 'e' | 'E' => {
                let (step, reader): (fn(&mut Reader), &mut Reader) = match k {
                    'b' => (word::word_backward, &mut br),
                    'B' => (word::big_word_backward, &mut br),
                    'e' => (word::word_end, &mut fr),
                    _ => (word::big_word_end, &mut fr),
                };
                for _ in 0..n {
                    step(reader);
                }
                reader.offset()
            }
            'h' => {
                for _ in 0..n {
                    if br.peek().is_some_and(|c| c != '\n') {
                        br.get();
                    }
                }
                br.offset()
            }
            'l' => {
                for _ in 0..n {
                    if fr.peek().is_some_and(|c| c != '\n') {
                        fr.get();
                    }
                }
                fr.offset()
            }
            'j' => self.down(n),
            'k' => self.up(n),
            '(' => {
                for _ in 0..n {
                    br.get();
                    br.gather_window(2, false, |w| w != ['\n', '\n'] && w[1] != '.');
                    if br.peek() == Some('.') {
                        let mut f = br.to_forward();
                        f.whitespace(true);
                        br = f.to_backward();
                    }
                }
                br.offset()
            }
            ')' => {
                for _ in 0..n {
                    fr.get();
                    fr.gather_window(2, false, |w| w != ['\n', '\n'] && w[0] != '.');
                    // Step over the `.`, or the first break of a blank line.
                    if fr.get() == Some('.') {
                        fr.whitespace(true);
                    } else {
                        fr.blanks();
                    }
                }
                fr.offset()
            }
            'f' | 't' | 'F' | 'T' | ';' | ',' => {
                let repeat = matches!(k, ';' | ',');
                let mut s = if repeat {
                    search.ok_or(ParseError::InvalidMotion("no previous character search"))?
                } else {
                    let target = cmd.get()?;
                    let s = CharSearch {
                        target,
                        forward: matches!(k, 'f' | 't'),
                        before: matches!(k, 't' | 'T'),
                    };
                    *search = Some(s);
                    s
                };
                if k == ',' {
                    s.forward = !s.forward;
                }
                self.find_char(s, n, repeat)?
            }
            'i' | 'a' => {
                let obj = cmd.get()?;
                text_object::select(obj, k == 'a', n, &mut br, &mut fr)?;
                return Ok(self.expand(fr.offset(), br.offset()));
            }
            'G' => {
                if cmd.has_count() {
                    let mut r = self.fwd(0);
                    let mut line_start = 0;
                    for _ in 1..n {
                        r.line(false);
                        if r.get().is_none() {
                            break;
                        }
                        line_start = r.offset();
                    }
                    line_start
                } else {
                    self.text.len_chars().saturating_sub(1)
                }
            }
            '%' => {
                cmd.no_number()?;
                self.matching_bracket()
                    .ok_or(ParseError::InvalidMotion("no matching bracket"))?
            }
            '{' => {
                for _ in 0..n {
                    br.line(false);
                    loop {
                        let o = br.offset();
                        br.get();
                        br.line(false);
                        if br.peek().is_none() || br.offset() + 1 == o {
                            break;
                        }
                    }
                }
                br.offset()
            }
            '}' => {
                for _ in 0..n {
                    loop {
                        fr.get();
                        fr.line(true);
                        if fr.peek().is_none_or(|c| c == '\n') {
                            break;
                        }
                    }
                }
                fr.offset()
            }
            _ if Some(k) == self.line_key => {
                br.line(false);
                for _ in 0..n {
                    fr.line(true);
                }
                return Ok(Cursor {
                    cur: fr.offset(),
                    start: br.offset(),
                });
            }
            _ => return Err(ParseError::InvalidMotion("unknown motion")),
        };
        Ok(self.moved(to))
    }

    fn first_non_blank(&self, line_start: usize) -> usize {
        let mut r = self.fwd(line_start);
        r.whitespace(false);
        r.offset()
    }

    /// Advance at most `col` characters from `line_start` without leaving the
    /// line.
    fn column(&self, line_start: usize, col: usize) -> usize {
        let mut r = self.fwd(line_start);
        for _ in 0..col {
            if r.peek().is_none_or(|c| c == '\n') {
                break;
            }
            r.get();
        }
        r.offset()
    }

    fn down(&self, n: usize) -> usize {
        let mut br = self.bwd(self.cursor.cur);
        let col = br.line(false).0.chars().count();
        let mut line_start = br.offset();
        let mut fr = self.fwd(self.cursor.cur);
        for _ in 0..n {
            fr.line(false);
            if fr.get().is_none() {
                break;
            }
            line_start = fr.offset();
        }
        self.column(line_start, col)
    }

    fn up(&self, n: usize) -> usize {
        let mut br = self.bwd(self.cursor.cur);
        let col = br.line(false).0.chars().count();
        for _ in 0..n {
            if br.peek() != Some('\n') {
                break;
            }
            br.get();
            br.line(false);
        }
        self.column(br.offset(), col)
    }

    /// `f`/`t` forward, `F`/`T` backward, stopping at the line end. A counted
    /// search steps over the character after each intermediate match.
    fn find_char(&self, s: CharSearch, n: usize, repeat: bool) -> Result<usize> {
        let at = self.cursor.cur;
        let miss = ParseError::InvalidMotion("character not found");
        let CharSearch {
            target,
            forward,
            before,
        } = s;
        if forward {
            let mut r = self.fwd(at);
            // A repeated `t` must not stop next to the match it stopped at.
            if before && repeat && self.text.get_char(at + 1) == Some(target) {
                r.get();
            }
            for i in 0..n {
                if r.peek().is_some_and(|c| c != '\n') {
                    r.get();
                }
                r.gather(|c| c != target && c != '\n');
                if r.peek() != Some(target) {
                    return Err(miss);
                }
                if i + 1 < n {
                    r.get();
                }
            }
            let to = r.offset();
            Ok(if before { to.saturating_sub(1).max(at) } else { to })
        } else {
            let mut r = self.bwd(at);
            if before && repeat && r.peek() == Some(target) {
                r.get();
            }
            for i in 0..n {
                r.gather(|c| c != target && c != '\n');
                if r.peek() != Some(target) {
                    return Err(miss);
                }
                if i + 1 < n || !before {
                    r.get();
                }
            }
            Ok(r.offset())
        }
    }

    /// Find the first bracket at or after the cursor on this line and jump to
    /// its partner.
    fn matching_bracket(&self) -> Option<usize> {
        const OPEN: [char; 4] = ['(', '{', '[', '<'];
        const CLOSE: [char; 4] = [')', '}', ']', '>'];
        let mut r = self.fwd(self.cursor.cur);
        r.gather(|c| c != '\n' && !OPEN.contains(&c) && !CLOSE.contains(&c));
        let p = r.offset();
        let c = r.peek()?;
        if let Some(i) = OPEN.iter().position(|&o| o == c) {
            let mut depth = 0usize;
            for (j, ch) in self.text.chars_at(p + 1).enumerate() {
                if ch == OPEN[i] {
                    depth += 1;
                } else if ch == CLOSE[i] {
                    if depth == 0 {
                        return Some(p + 1 + j);
                    }
                    depth -= 1;
                }
            }
            None
        } else {
            let i = CLOSE.iter().position(|&cl| cl == c)?;
            let mut depth = 0usize;
            let mut j = p;
            while j > 0 {
                j -= 1;
                let ch = self.text.char(j);
                if ch == CLOSE[i] {
                    depth += 1;
                } else if ch == OPEN[i] {
                    if depth == 0 {
                        return Some(j);
                    }
                    depth -= 1;
                }
            }
            None
        }
    }

    /// Text-object result: `cur` goes to `cur_at`, `start` grows toward
    /// `start_at` without shrinking an existing selection.
    fn expand(&self, cur_at: usize, start_at: usize) -> Cursor {
        let start = if cur_at >= start_at {
            self.cursor.start.min(start_at)
        } else {
            self.cursor.start.max(start_at)
        };
        Cursor { cur: cur_at, start }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
