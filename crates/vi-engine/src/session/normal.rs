//! Command mode dispatch.
//!
//! | Keys | Action |
//! |------|--------|
//! | `i` `I` `a` `A` `o` `O` | enter insert mode |
//! | `s` `S` `c{motion}` `cc` `C` | change |
//! | `x` `X` `d{motion}` `dd` `D` | delete |
//! | `y{motion}` `yy` `Y` `p` `P` | clipboard |
//! | `>{motion}` `<{motion}` | indent, unindent lines |
//! | `J` `gJ` `gq{motion}` `~` | join, join raw, wrap, toggle case |
//! | `v` `V` | visual mode |
//! | `/` `?` `n` `N` `*` `#` | search |
//! | `:` | ex prompt |
//! | `.` `u` `Ctrl-r` | repeat, undo, redo |
//! | `Ctrl-d` `Ctrl-u` `Ctrl-f` `Ctrl-b` `Ctrl-e` `Ctrl-y` | scroll |
//!
//! Anything else is a motion that moves the caret.

use ropey::Rope;

use super::{Flow, Session, first_non_blank, line_start, next_line_start, nth_line_end};
use crate::clipboard::Clipboard;
use crate::cmd::Cmd;
use crate::cursor::Cursor;
use crate::edit;
use crate::error::{ParseError, Result};
use crate::mode::{Mode, VisualKind};
use crate::motion::Motion;
use crate::prompt::{Prompt, PromptKind};
use crate::reader::Reader;
use crate::search::SearchDirection;
use crate::surface::TextSurface;
use crate::word;
use crate::wrap::wrap;

#[allow(clippy::future_not_send)]
impl<S: TextSurface, C: Clipboard, P: Prompt> Session<S, C, P> {
    pub(super) async fn command(&mut self, keys: &str, ctrl: bool) -> Result<Flow> {
        let text = self.surface.text();
        let at = self.cursor.cur.min(text.len_chars());
        let mut fr = Reader::forward(&text, at);
        let mut br = Reader::backward(&text, at);
        let mut cmd = Cmd::new(keys);
        cmd.count()?;
        let n = cmd.n();
        let k = cmd.get()?;
        self.changed = false;

        if ctrl {
            if k == 'r' {
                self.redo(n);
            } else {
                self.scroll(k, n)?;
            }
            return Ok(Flow::Done);
        }

        match k {
            'i' => self.to_insert(),
            'I' => {
                br.line(false);
                self.set_cursor(first_non_blank(&text, br.offset()));
                self.to_insert();
            }
            'a' => {
                if fr.peek().is_some_and(|c| c != '\n') {
                    fr.get();
                }
                self.set_cursor(fr.offset());
                self.to_insert();
            }
            'A' => {
                fr.line(false);
                self.set_cursor(fr.offset());
                self.to_insert();
            }
            'o' => {
                fr.line(false);
                let o = if fr.get() == Some('\n') {
                    let o = fr.offset();
                    self.replace(o, o, "\n", false);
                    o
                } else {
                    let o = fr.offset();
                    self.replace(o, o, "\n", false);
                    o + 1
                };
                self.set_cursor(o);
                self.to_insert();
            }
            'O' => {
                br.line(false);
                let o = br.offset();
                self.replace(o, o, "\n", false);
                self.set_cursor(o);
                self.to_insert();
            }
            'x' | 's' => {
                for _ in 0..n {
                    if fr.peek().is_some_and(|c| c != '\n') {
                        fr.get();
                    }
                }
                self.replace(at, fr.offset(), "", false);
                self.set_cursor(at);
                if k == 's' {
                    self.to_insert();
                }
            }
            'X' => {
                for _ in 0..n {
                    if br.peek().is_some_and(|c| c != '\n') {
                        br.get();
                    }
                }
                self.replace(br.offset(), at, "", false);
                self.set_cursor(br.offset());
            }
            'D' | 'C' => {
                self.replace(at, nth_line_end(&text, at, n), "", false);
                self.set_cursor(at);
                if k == 'C' {
                    self.to_insert();
                }
            }
            'S' => self.change_lines(&text, at, n),
            'd' => {
                let (c, _) = self.operator_range(&text, &mut cmd, 'd')?;
                self.replace(c.low(), c.high(), "", false);
                self.set_cursor(c.low());
            }
            'c' => {
                cmd.motion_count()?;
                if cmd.peek() == Some('c') {
                    self.change_lines(&text, at, cmd.n());
                } else {
                    let c = Motion::new(&text, Cursor::at(at))
                        .change(true)
                        .resolve(&mut cmd, &mut self.char_search)?;
                    self.replace(c.low(), c.high(), "", false);
                    self.set_cursor(c.low());
                    self.to_insert();
                }
            }
            'y' => {
                let (c, _) = self.operator_range(&text, &mut cmd, 'y')?;
                let yanked = text.slice(c.low()..c.high()).to_string();
                self.clipboard.write_text(&yanked).await?;
                self.set_cursor(c.low());
            }
            'Y' => {
                br.line(false);
                for _ in 0..n {
                    fr.line(true);
                }
                let yanked = text.slice(br.offset()..fr.offset()).to_string();
                self.clipboard.write_text(&yanked).await?;
            }
            'p' | 'P' => self.put(&text, at, k == 'p', n).await?,
            '>' | '<' => {
                let (c, doubled) = self.operator_range(&text, &mut cmd, k)?;
                let start = line_start(&text, c.low());
                let end = if doubled {
                    c.high()
                } else {
                    next_line_start(&text, c.high())
                };
                let old = text.slice(start..end).to_string();
                let new = if k == '>' {
                    edit::indent(&old, &self.options.indent)
                } else {
                    edit::unindent(&old, &self.options.indent)
                };
                if self.replace(start, end, &new, false) {
                    let fresh = self.surface.text();
                    self.set_cursor(first_non_blank(&fresh, start));
                }
            }
            'J' => {
                cmd.default_count(2);
                self.join_lines(&text, at, cmd.n(), " ");
            }
            'g' => match cmd.get()? {
                'J' => {
                    cmd.default_count(2);
                    self.join_lines(&text, at, cmd.n(), "");
                }
                'q' => {
                    let (c, _) = self.operator_range(&text, &mut cmd, 'q')?;
                    let start = line_start(&text, c.low());
                    let end = next_line_start(&text, c.high().saturating_sub(1).max(c.low()));
                    self.wrap_lines(start, end);
                }
                _ => return Err(ParseError::InvalidCommand("unknown g command").into()),
            },
            '~' => {
                for _ in 0..n {
                    if fr.peek().is_some_and(|c| c != '\n') {
                        fr.get();
                    }
                }
                let old = text.slice(at..fr.offset()).to_string();
                self.replace(at, fr.offset(), &edit::swap_case(&old), false);
                self.set_cursor(fr.offset());
            }
            'v' => {
                self.cursor = Cursor::at(at);
                self.set_mode(Mode::Visual(VisualKind::Char));
                self.sync_selection();
            }
            'V' => {
                br.line(false);
                fr.line(true);
                self.cursor = Cursor::new(fr.offset(), br.offset());
                self.set_mode(Mode::Visual(VisualKind::Line));
                self.sync_selection();
            }
            '*' | '#' => {
                let (s, e) = word::word_around(&text, at);
                if s == e {
                    return Err(ParseError::InvalidCommand("no word under cursor").into());
                }
                let word = text.slice(s..e).to_string();
                let direction = if k == '*' {
                    SearchDirection::Forward
                } else {
                    SearchDirection::Backward
                };
                self.search.set_word(&word, direction);
                // Start from the word's own start so a backward search skips it.
                self.cursor = Cursor::at(s);
                self.search_move(false, n)?;
            }
            'n' | 'N' => self.search_move(k == 'N', n)?,
            '/' => self.search_prompt(PromptKind::SearchForward).await?,
            '?' => self.search_prompt(PromptKind::SearchBackward).await?,
            ':' => return self.ex_prompt(None).await,
            '.' => return Ok(Flow::Repeat(n)),
            'u' => self.undo(n),
            _ => {
                let mut cmd = Cmd::new(keys);
                cmd.count()?;
                let c = Motion::new(&text, Cursor::at(at)).resolve(&mut cmd, &mut self.char_search)?;
                self.set_cursor(c.cur);
            }
        }

        if self.changed {
            self.repeat.record_command(keys, self.mode == Mode::Insert);
        }
        Ok(Flow::Done)
    }

    /// Parse `{count}{motion}` after an operator key. Doubling the operator
    /// selects whole lines; the flag says it was doubled.
    fn operator_range(&mut self, text: &Rope, cmd: &mut Cmd, op: char) -> Result<(Cursor, bool)> {
        cmd.motion_count()?;
        let doubled = cmd.peek() == Some(op);
        let at = self.cursor.cur.min(text.len_chars());
        let c = Motion::new(text, Cursor::at(at))
            .line_key(op)
            .resolve(cmd, &mut self.char_search)?;
        Ok((c, doubled))
    }

    /// `S` and `cc`: empty `n` lines and insert.
    fn change_lines(&mut self, text: &Rope, at: usize, n: usize) {
        let start = line_start(text, at);
        self.replace(start, nth_line_end(text, at, n), "", false);
        self.set_cursor(start);
        self.to_insert();
    }

    /// `J` and `gJ`: join `n` lines starting at the cursor.
    fn join_lines(&mut self, text: &Rope, at: usize, n: usize, between: &str) {
        let mut fr = Reader::forward(text, at);
        for _ in 0..n.max(2) - 1 {
            fr.line(false);
            if fr.get().is_none() {
                break;
            }
        }
        fr.line(true);
        let old = text.slice(at..fr.offset()).to_string();
        let (new, join_at) = edit::join(&old, between);
        if self.replace(at, fr.offset(), &new, false) {
            self.set_cursor(at + join_at);
        }
    }

    /// `gq`: rewrap `start..end` and put the caret on the line after it.
    pub(super) fn wrap_lines(&mut self, start: usize, end: usize) {
        let text = self.surface.text();
        let old = text.slice(start..end).to_string();
        let new = wrap(&old, self.options.text_width, &self.options.line_prefixes);
        self.replace(start, end, &new, false);
        self.set_cursor(start + new.chars().count());
    }

    /// `p` and `P`. Text ending in a line break is put on its own line.
    async fn put(&mut self, text: &Rope, at: usize, after: bool, n: usize) -> Result<()> {
        let s = self.clipboard.read_text().await?;
        if s.is_empty() {
            return Ok(());
        }
        let s = s.repeat(n);
        if s.ends_with('\n') {
            if after {
                let mut fr = Reader::forward(text, at);
                fr.line(false);
                if fr.get() == Some('\n') {
                    let o = fr.offset();
                    self.replace(o, o, &s, false);
                    self.set_cursor(o);
                } else {
                    let o = fr.offset();
                    self.replace(o, o, &format!("\n{s}"), false);
                    self.set_cursor(o + 1);
                }
            } else {
                let o = line_start(text, at);
                self.replace(o, o, &s, false);
                self.set_cursor(o);
            }
        } else {
            let o = if after && text.get_char(at).is_some_and(|c| c != '\n') {
                at + 1
            } else {
                at
            };
            self.replace(o, o, &s, false);
            self.set_cursor(o + s.chars().count().saturating_sub(1));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
