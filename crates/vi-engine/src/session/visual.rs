//! Visual and visual-line mode dispatch.
//!
//! Operators act on the selection and return to command mode; every other
//! key is a motion that moves the active end. In visual-line mode the
//! selection always covers whole lines, line breaks included.

use super::{Flow, Session, first_non_blank, line_start, next_line_start};
use crate::clipboard::Clipboard;
use crate::cmd::Cmd;
use crate::cursor::{Cursor, Direction};
use crate::edit;
use crate::error::{ParseError, Result};
use crate::mode::{Mode, VisualKind};
use crate::motion::Motion;
use crate::prompt::Prompt;
use crate::surface::TextSurface;

#[allow(clippy::future_not_send)]
impl<S: TextSurface, C: Clipboard, P: Prompt> Session<S, C, P> {
    pub(super) async fn visual(&mut self, keys: &str, ctrl: bool) -> Result<Flow> {
        let text = self.surface.text();
        let sel = self.cursor.clamped(text.len_chars());
        let (low, high, _) = sel.ordered();
        let mut cmd = Cmd::new(keys);
        cmd.count()?;
        let n = cmd.n();
        let k = cmd.get()?;

        if ctrl {
            self.scroll(k, n)?;
            return Ok(Flow::Done);
        }

        match k {
            'v' => {
                self.set_mode(Mode::Visual(VisualKind::Char));
                return Ok(Flow::Done);
            }
            'V' => {
                let start = line_start(&text, low);
                let end = next_line_start(&text, high.saturating_sub(1).max(low));
                self.cursor = Cursor::spanning(start, end, sel.direction());
                self.set_mode(Mode::Visual(VisualKind::Line));
                self.sync_selection();
                return Ok(Flow::Done);
            }
            'o' => {
                self.cursor = sel.swapped();
                self.sync_selection();
                return Ok(Flow::Done);
            }
            'd' => {
                self.replace(low, high, "", false);
                self.set_cursor(low);
            }
            'c' | 's' => {
                self.replace(low, high, "", false);
                self.set_cursor(low);
                self.to_insert();
                return Ok(Flow::Done);
            }
            'y' => {
                let yanked = text.slice(low..high).to_string();
                self.clipboard.write_text(&yanked).await?;
                self.set_cursor(low);
            }
            'p' => {
                let s = self.clipboard.read_text().await?;
                self.replace(low, high, &s, false);
                self.set_cursor(low);
            }
            '>' | '<' => {
                let start = line_start(&text, low);
                let old = text.slice(start..high).to_string();
                let new = if k == '>' {
                    edit::indent(&old, &self.options.indent)
                } else {
                    edit::unindent(&old, &self.options.indent)
                };
                self.replace(start, high, &new, false);
                let fresh = self.surface.text();
                self.set_cursor(first_non_blank(&fresh, start));
            }
            'J' => self.join_selection(&text, low, high, " "),
            '~' => {
                let old = text.slice(low..high).to_string();
                self.replace(low, high, &edit::swap_case(&old), false);
                self.set_cursor(low);
            }
            'g' => match cmd.get()? {
                'J' => self.join_selection(&text, low, high, ""),
                'q' => {
                    let start = line_start(&text, low);
                    let end = next_line_start(&text, high.saturating_sub(1).max(low));
                    self.wrap_lines(start, end);
                }
                _ => return Err(ParseError::InvalidCommand("unknown g command").into()),
            },
            ':' => {
                let flow = self.ex_prompt(Some(sel)).await;
                if self.mode.is_visual() {
                    self.to_command();
                }
                return flow;
            }
            _ => {
                self.extend(&text, sel, keys)?;
                return Ok(Flow::Done);
            }
        }

        self.to_command();
        Ok(Flow::Done)
    }

    /// Move the active end of the selection by the motion in `keys`.
    fn extend(&mut self, text: &ropey::Rope, sel: Cursor, keys: &str) -> Result<()> {
        let line = self.mode.is_visual_line();
        let (low, high, dir) = sel.ordered();
        let mut base = sel;
        // Step back inside the last line so line motions start from it.
        if line && high > low && text.char(high - 1) == '\n' {
            if dir == Direction::Forward {
                base.cur = high - 1;
            } else {
                base.start = high - 1;
            }
        }

        let mut cmd = Cmd::new(keys);
        cmd.count()?;
        let c = Motion::new(text, base)
            .visual(true)
            .resolve(&mut cmd, &mut self.char_search)?;

        // The anchor's line stays selected whichever side the cursor is on.
        self.cursor = match (line, c.cur >= c.start) {
            (false, _) => c,
            (true, true) => Cursor::spanning(
                line_start(text, c.start),
                next_line_start(text, c.cur),
                Direction::Forward,
            ),
            (true, false) => Cursor::spanning(
                line_start(text, c.cur),
                next_line_start(text, c.start),
                Direction::Backward,
            ),
        };
        self.sync_selection();
        Ok(())
    }

    fn join_selection(&mut self, text: &ropey::Rope, low: usize, high: usize, between: &str) {
        let old = text.slice(low..high).to_string();
        let (new, join_at) = edit::join(&old, between);
        if self.replace(low, high, &new, false) {
            self.set_cursor(low + join_at);
        } else {
            self.set_cursor(low);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
