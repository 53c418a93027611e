//! The editing session: one per text surface.
//!
//! A [`Session`] owns the mode, cursor, key buffer, history, repeat and
//! search state for a single [`TextSurface`]. Hosts feed it keys with
//! [`Session::key`]; in command and visual mode every key is appended to the
//! key buffer and the whole buffer is parsed again. An incomplete parse keeps
//! the buffer ([`Outcome::Pending`]); an invalid one clears it and returns
//! the error.
//!
//! In insert mode the host edits the text itself. The session notices those
//! edits when control comes back ([`Session::enter`]) by diffing against the
//! last text it saw, and records them as one history entry.
//!
//! ```text
//!   Insert --Esc/enter()--> Command --v/V--> Visual
//!     ^                       |   ^            |
//!     +--- i a o c s ... -----+   +---- Esc ---+
//! ```
//!
//! `key` borrows the session mutably for as long as a clipboard or prompt
//! call is pending, so no other key can be dispatched in between.

mod normal;
mod visual;

use ropey::Rope;

use crate::clipboard::Clipboard;
use crate::command::{self, CmdRange, ExCommand, Substitution};
use crate::cursor::Cursor;
use crate::error::{Error, ParseError, Result};
use crate::history::{self, History};
use crate::key::Key;
use crate::mode::Mode;
use crate::motion::CharSearch;
use crate::options::Options;
use crate::prompt::{Prompt, PromptHistory, PromptKind};
use crate::reader::Reader;
use crate::repeat::RepeatState;
use crate::search::{SearchDirection, SearchState};
use crate::surface::{Selection, TextSurface};

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// What happened to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The key was consumed.
    Handled,
    /// The key buffer is a valid prefix; waiting for more keys.
    Pending,
    /// The host should perform its default action for the key.
    PassThrough,
    /// The key was consumed and produced a message for the user.
    Report(String),
}

/// How a dispatched command finished.
enum Flow {
    Done,
    /// `.` with its count.
    Repeat(usize),
    Report(String),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

pub struct Session<S, C, P> {
    surface: S,
    clipboard: C,
    prompt: P,
    options: Options,
    mode: Mode,
    cursor: Cursor,
    /// Keys typed so far in command or visual mode.
    keys: String,
    history: History,
    repeat: RepeatState,
    search: SearchState,
    char_search: Option<CharSearch>,
    prompts: PromptHistory,
    last_substitute: Option<Substitution>,
    /// The text as of the last edit the session made or saw.
    known: Rope,
    /// Set by [`Session::replace`]; tells the dispatcher a command mutated.
    changed: bool,
    /// Tab inserts a tab in insert mode (after command mode was used once).
    tab_armed: bool,
}

#[allow(clippy::future_not_send)]
impl<S: TextSurface, C: Clipboard, P: Prompt> Session<S, C, P> {
    /// Start a session in insert mode.
    pub fn new(surface: S, clipboard: C, prompt: P, options: Options) -> Self {
        let known = surface.text();
        let cursor = surface.selection().to_cursor();
        Self {
            surface,
            clipboard,
            prompt,
            options,
            mode: Mode::Insert,
            cursor,
            keys: String::new(),
            history: History::new(),
            repeat: RepeatState::new(),
            search: SearchState::new(),
            char_search: None,
            prompts: PromptHistory::default(),
            last_substitute: None,
            known,
            changed: false,
            tab_armed: false,
        }
    }

    // -- accessors ----------------------------------------------------------

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Keys waiting for the rest of a command.
    #[must_use]
    pub fn pending_keys(&self) -> &str {
        &self.keys
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, for host-side edits in insert mode.
    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub const fn clipboard(&self) -> &C {
        &self.clipboard
    }

    #[must_use]
    pub const fn prompt(&self) -> &P {
        &self.prompt
    }

    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub const fn repeat(&self) -> &RepeatState {
        &self.repeat
    }

    #[must_use]
    pub const fn search(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.options.debug = debug;
        log::info!("debug logging {}", if debug { "on" } else { "off" });
    }

    // -- keys ---------------------------------------------------------------

    /// Handle one key.
    pub async fn key(&mut self, key: Key) -> Result<Outcome> {
        if self.options.debug {
            log::debug!("key {key} in {} after {:?}", self.mode, self.keys);
        }

        if self.mode == Mode::Insert {
            return Ok(self.insert_key(key));
        }

        if key.is_escape() {
            self.keys.clear();
            self.to_command();
            return Ok(Outcome::Handled);
        }

        let (c, ctrl) = match key {
            Key::Char(c) => (c, false),
            Key::Ctrl('h') => {
                self.dump_history();
                return Ok(Outcome::Handled);
            }
            // Only a count may precede a control key.
            Key::Ctrl(_) if !self.keys.chars().all(|k| k.is_ascii_digit()) => {
                log::debug!("invalid {:?}: control key inside a command", self.keys);
                self.keys.clear();
                return Err(ParseError::InvalidCommand("control key inside a command").into());
            }
            Key::Ctrl(c) => (c, true),
            Key::Tab if self.keys.is_empty() => {
                self.release();
                return Ok(Outcome::PassThrough);
            }
            Key::Tab => return Ok(Outcome::Pending),
            Key::Escape | Key::Other => return Ok(Outcome::Handled),
        };

        self.keys.push(c);
        let keys = self.keys.clone();
        let result = if self.mode.is_visual() {
            self.visual(&keys, ctrl).await
        } else {
            self.command(&keys, ctrl).await
        };

        let flow = match result {
            Ok(flow) => flow,
            Err(Error::Parse(e)) if e.is_incomplete() => {
                if self.options.debug {
                    log::debug!("incomplete: {keys:?}");
                }
                return Ok(Outcome::Pending);
            }
            Err(e) => {
                self.keys.clear();
                match &e {
                    Error::Parse(_) => log::debug!("invalid {keys:?}: {e}"),
                    _ => log::warn!("{keys:?}: {e}"),
                }
                return Err(e);
            }
        };
        self.keys.clear();

        let outcome = match flow {
            Flow::Done => Outcome::Handled,
            Flow::Repeat(n) => {
                self.repeat_last(n).await?;
                Outcome::Handled
            }
            Flow::Report(msg) => {
                log::info!("{msg}");
                Outcome::Report(msg)
            }
        };
        self.history.settle(self.cursor.cur);
        Ok(outcome)
    }

    /// A key in insert mode. Only Escape and Tab concern the session.
    fn insert_key(&mut self, key: Key) -> Outcome {
        if key.is_escape() {
            self.enter();
            return Outcome::Handled;
        }
        if key == Key::Tab && self.tab_armed && self.surface.is_multiline() {
            self.insert_text("\t");
            return Outcome::Handled;
        }
        Outcome::PassThrough
    }

    /// Insert `text` at the host selection through the history, keeping the
    /// merge window open so consecutive single characters undo together.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        self.reconcile();
        let sel = self.surface.selection();
        self.cursor = Cursor::at(sel.start);
        if !self.replace(sel.start, sel.end, text, true) {
            return false;
        }
        self.set_cursor(sel.start + text.chars().count());
        self.history.settle(self.cursor.cur);
        true
    }

    // -- mode transitions ---------------------------------------------------

    /// Take control (host Escape in insert mode): pick up the host's
    /// selection and any edits made in insert mode.
    pub fn enter(&mut self) {
        let mark = self.repeat.insert_mark().unwrap_or_else(|| self.history.len());
        self.reconcile();
        let typed: String = self
            .history
            .since(mark)
            .iter()
            .map(|h| h.new_text.as_str())
            .collect();
        self.repeat.finish_insert(typed);

        self.cursor = self.surface.selection().to_cursor();
        self.history.settle(self.cursor.cur);
        self.keys.clear();
        self.tab_armed = true;
        self.set_mode(if self.cursor.is_empty() {
            Mode::Command
        } else {
            Mode::Visual(crate::mode::VisualKind::Char)
        });
    }

    /// Give control back to the host (insert mode).
    pub fn release(&mut self) {
        self.keys.clear();
        self.history.close();
        self.known = self.surface.text();
        self.set_mode(Mode::Insert);
    }

    /// The surface lost focus: release, and let Tab move focus again.
    pub fn blur(&mut self) {
        self.release();
        self.tab_armed = false;
    }

    /// Re-read the selection after a pointer action. A new non-empty
    /// selection switches to visual mode, an empty one to command mode.
    pub fn mouse_selection(&mut self) {
        if !self.mode.is_engine_owned() {
            return;
        }
        let c = self.surface.selection().to_cursor();
        self.keys.clear();
        if c.is_empty() {
            self.cursor = c;
            self.set_mode(Mode::Command);
        } else if c != self.cursor {
            self.cursor = c;
            self.set_mode(Mode::Visual(crate::mode::VisualKind::Char));
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            log::info!("mode {} -> {mode}", self.mode);
        }
        self.mode = mode;
    }

    /// Switch to insert mode from a command.
    fn to_insert(&mut self) {
        self.history.close();
        self.known = self.surface.text();
        self.repeat.begin_insert(self.history.len());
        self.set_mode(Mode::Insert);
    }

    /// Back to command mode, collapsing any selection onto the cursor.
    fn to_command(&mut self) {
        self.set_mode(Mode::Command);
        self.set_cursor(self.cursor.cur);
    }

    /// Record host edits since the last known text.
    fn reconcile(&mut self) {
        let now = self.surface.text();
        if let Some(h) = history::diff(&self.known, &now) {
            self.history.push(h);
        }
        self.known = now;
    }

    // -- text and cursor ----------------------------------------------------

    /// Replace chars `low..high` with `text` and record it. Returns `false`
    /// if nothing changed or the surface refused.
    fn replace(&mut self, low: usize, high: usize, text: &str, open: bool) -> bool {
        let snapshot = self.surface.text();
        let high = high.min(snapshot.len_chars());
        let low = low.min(high);
        let old = snapshot.slice(low..high).to_string();
        if old == text {
            return false;
        }
        if !self.surface.replace_range(low, high, text) {
            log::warn!("surface refused replacing {low}..{high}");
            return false;
        }
        let merged = self
            .history
            .record(low, high, &old, text, self.cursor.cur, open);
        if self.options.debug {
            log::debug!("replace {low}..{high} {old:?} -> {text:?} merged={merged}");
        }
        self.known = self.surface.text();
        self.changed = true;
        true
    }

    /// Move the caret, dropping any selection.
    fn set_cursor(&mut self, offset: usize) {
        let offset = offset.min(self.surface.text().len_chars());
        self.cursor = Cursor::at(offset);
        self.surface.set_selection(Selection::caret(offset));
    }

    fn sync_selection(&mut self) {
        self.surface.set_selection(self.cursor.into());
    }

    fn undo(&mut self, n: usize) {
        for _ in 0..n {
            let Some(c) = self.history.undo(&mut self.surface) else {
                break;
            };
            self.set_cursor(c);
        }
        self.known = self.surface.text();
    }

    fn redo(&mut self, n: usize) {
        for _ in 0..n {
            let Some(c) = self.history.redo(&mut self.surface) else {
                break;
            };
            self.set_cursor(c);
        }
        self.known = self.surface.text();
    }

    /// Scrolling keys shared by command and visual mode.
    fn scroll(&mut self, k: char, n: usize) -> std::result::Result<(), ParseError> {
        let page = self.surface.viewport_height();
        let lines = i32::try_from(n)
            .unwrap_or(i32::MAX)
            .saturating_mul(self.options.line_height);
        let dy = match k {
            'd' => page / 2,
            'u' => -(page / 2),
            'f' => page,
            'b' => -page,
            'e' => lines,
            'y' => -lines,
            _ => return Err(ParseError::InvalidCommand("unknown control key")),
        };
        self.surface.scroll_by(0, dy);
        Ok(())
    }

    // -- repeat -------------------------------------------------------------

    /// Replay the last change `n` times. The repeat state itself is left as
    /// it was.
    async fn repeat_last(&mut self, n: usize) -> Result<()> {
        let saved = self.repeat.clone();
        if saved.is_empty() {
            return Ok(());
        }
        log::debug!(
            "repeat {n}x {:?} + {:?}",
            saved.command(),
            saved.inserted_text()
        );
        let mut result = Ok(());
        for _ in 0..n {
            if !saved.command().is_empty() {
                if let Err(e) = self.command(saved.command(), false).await {
                    result = Err(e);
                    break;
                }
            }
            let text = saved.inserted_text();
            if !text.is_empty() {
                let at = self.cursor.cur;
                self.replace(at, at, text, false);
                self.set_cursor(at + text.chars().count());
            }
            self.history.close();
            self.set_mode(Mode::Command);
        }
        self.repeat = saved;
        self.known = self.surface.text();
        result
    }

    // -- search -------------------------------------------------------------

    /// Move to the `n`th next match of the remembered pattern.
    fn search_move(&mut self, reverse: bool, n: usize) -> Result<()> {
        let text = self.surface.text();
        let mut at = self.cursor.cur;
        for _ in 0..n {
            let Some(m) = self.search.find(&text, at, reverse)? else {
                return Err(ParseError::InvalidMotion("pattern not found").into());
            };
            at = m.start;
        }
        self.set_cursor(at);
        Ok(())
    }

    /// `/` and `?`.
    async fn search_prompt(&mut self, kind: PromptKind) -> Result<()> {
        let list = self.prompts.list(kind).to_vec();
        let Some(line) = self.prompt.ask(kind, &list).await else {
            log::debug!("{} cancelled", kind.prefix());
            return Ok(());
        };
        self.prompts.push(kind, &line);
        let direction = if kind == PromptKind::SearchBackward {
            SearchDirection::Backward
        } else {
            SearchDirection::Forward
        };
        if line.is_empty() {
            if !self.search.has_pattern() {
                return Err(ParseError::InvalidCommand("no previous search").into());
            }
            self.search.set_direction(direction);
        } else {
            self.search.set_entered(&line, direction);
        }
        self.search_move(false, 1)
    }

    // -- ex -----------------------------------------------------------------

    /// `:`. `selection` is the visual selection the prompt was opened from.
    async fn ex_prompt(&mut self, selection: Option<Cursor>) -> Result<Flow> {
        let list = self.prompts.list(PromptKind::Ex).to_vec();
        let Some(line) = self.prompt.ask(PromptKind::Ex, &list).await else {
            return Ok(Flow::Done);
        };
        self.prompts.push(PromptKind::Ex, &line);

        let ex = command::parse(&line)?;
        let range = ex.range();
        let sub = match ex {
            ExCommand::Substitute { sub, .. } => sub,
            ExCommand::SubRepeat { .. } => self
                .last_substitute
                .clone()
                .ok_or_else(|| Error::Substitute("no previous substitution".into()))?,
        };

        let text = self.surface.text();
        let (first, last) = self.ex_lines(&text, range, selection);
        let r = command::execute(&text, first, last, &sub)?;
        self.last_substitute = Some(sub.clone());
        if r.count == 0 {
            return Err(Error::Substitute(format!("pattern not found: {}", sub.pattern)));
        }
        if sub.flags.count_only {
            return Ok(Flow::Report(format!("{} matches", r.count)));
        }
        self.replace(r.start, r.end, &r.text, false);
        if let Some(o) = r.last_line {
            self.set_cursor(o);
        }
        Ok(Flow::Report(format!("{} substitutions", r.count)))
    }

    /// Resolve an ex range to 0-indexed lines.
    fn ex_lines(&self, text: &Rope, range: CmdRange, selection: Option<Cursor>) -> (usize, usize) {
        let line_of = |o: usize| text.char_to_line(o.min(text.len_chars()));
        let current = line_of(self.cursor.cur);
        match range {
            CmdRange::CurrentLine => (current, current),
            CmdRange::All => (0, text.len_lines().saturating_sub(1)),
            CmdRange::Lines(a, b) => (a.min(b), a.max(b)),
            CmdRange::Visual => selection.map_or((current, current), |c| {
                let (low, high, _) = c.ordered();
                let first = line_of(low);
                let mut last = line_of(high);
                // A selection ending after a line break stops on that line.
                if high > low && last > first && text.char(high - 1) == '\n' {
                    last -= 1;
                }
                (first, last)
            }),
        }
    }

    // -- debugging ----------------------------------------------------------

    /// Log the history stacks and repeat state (`Ctrl-h`).
    pub fn dump_history(&self) {
        log::debug!("undo stack ({}):", self.history.len());
        for h in self.history.undo_entries() {
            log::debug!("  {h:?}");
        }
        log::debug!("redo stack ({}):", self.history.redo_entries().len());
        for h in self.history.redo_entries() {
            log::debug!("  {h:?}");
        }
        log::debug!("merge window open: {}", self.history.is_open());
        log::debug!(
            "repeat: command {:?} text {:?} capturing {}",
            self.repeat.command(),
            self.repeat.inserted_text(),
            self.repeat.is_capturing()
        );
    }
}

// ---------------------------------------------------------------------------
// Line helpers
// ---------------------------------------------------------------------------

fn line_start(text: &Rope, at: usize) -> usize {
    let mut r = Reader::backward(text, at);
    r.line(false);
    r.offset()
}

fn line_end(text: &Rope, at: usize) -> usize {
    let mut r = Reader::forward(text, at);
    r.line(false);
    r.offset()
}

/// Start of the next line, or the end of the text.
fn next_line_start(text: &Rope, at: usize) -> usize {
    let mut r = Reader::forward(text, at);
    r.line(true);
    r.offset()
}

fn first_non_blank(text: &Rope, line_start: usize) -> usize {
    let mut r = Reader::forward(text, line_start);
    r.blanks();
    r.offset()
}

/// End of the `n`th line from `at` (the first is `at`'s own), before its
/// line break.
fn nth_line_end(text: &Rope, at: usize, n: usize) -> usize {
    let mut r = Reader::forward(text, at);
    for i in 0..n {
        r.line(false);
        if i + 1 < n && r.get().is_none() {
            break;
        }
    }
    r.offset()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use futures_executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clipboard::{ClipboardError, MemoryClipboard};
    use crate::key::parse_keys;
    use crate::mode::VisualKind;
    use crate::prompt::ScriptedPrompt;
    use crate::surface::MemorySurface;

    pub type TestSession = Session<MemorySurface, MemoryClipboard, ScriptedPrompt>;

    /// A session in command mode over `text` with the caret at `at`.
    pub fn session(text: &str, at: usize) -> TestSession {
        session_with(text, at, MemoryClipboard::new())
    }

    pub fn session_with(text: &str, at: usize, clipboard: MemoryClipboard) -> TestSession {
        let surface = MemorySurface::new(text).with_caret(at);
        let mut s = Session::new(surface, clipboard, ScriptedPrompt::new(), Options::default());
        s.enter();
        s
    }

    /// Feed keys in vi notation; the last key's outcome.
    pub fn feed(s: &mut TestSession, keys: &str) -> Result<Outcome> {
        let mut last = Ok(Outcome::Handled);
        for k in parse_keys(keys) {
            last = block_on(s.key(k));
        }
        last
    }

    pub fn text(s: &TestSession) -> String {
        s.surface().contents()
    }

    // -- modes --------------------------------------------------------------

    #[test]
    fn starts_in_insert_and_enters_command() {
        let surface = MemorySurface::new("abc");
        let mut s = Session::new(
            surface,
            MemoryClipboard::new(),
            ScriptedPrompt::new(),
            Options::default(),
        );
        assert_eq!(s.mode(), Mode::Insert);
        assert_eq!(block_on(s.key(Key::Char('x'))).unwrap(), Outcome::PassThrough);
        assert_eq!(block_on(s.key(Key::Escape)).unwrap(), Outcome::Handled);
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn ctrl_brace_enters_command_mode() {
        let mut s = session("abc", 0);
        s.release();
        block_on(s.key(Key::Ctrl('{'))).unwrap();
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn enter_with_selection_is_visual() {
        let mut surface = MemorySurface::new("hello");
        surface.set_selection(Selection {
            start: 1,
            end: 3,
            direction: crate::cursor::Direction::Forward,
        });
        let mut s = Session::new(
            surface,
            MemoryClipboard::new(),
            ScriptedPrompt::new(),
            Options::default(),
        );
        s.enter();
        assert_eq!(s.mode(), Mode::Visual(VisualKind::Char));
        assert_eq!(s.cursor(), Cursor::new(3, 1));
    }

    #[test]
    fn escape_clears_pending_keys() {
        let mut s = session("hello world", 0);
        assert_eq!(feed(&mut s, "d2").unwrap(), Outcome::Pending);
        assert_eq!(s.pending_keys(), "d2");
        feed(&mut s, "<Esc>").unwrap();
        assert_eq!(s.pending_keys(), "");
        feed(&mut s, "w").unwrap();
        assert_eq!(text(&s), "hello world");
        assert_eq!(s.cursor(), Cursor::at(6));
    }

    #[test]
    fn tab_releases_control_when_idle() {
        let mut s = session("abc", 0);
        assert_eq!(feed(&mut s, "<Tab>").unwrap(), Outcome::PassThrough);
        assert_eq!(s.mode(), Mode::Insert);
    }

    #[test]
    fn tab_inserts_in_insert_mode_once_armed() {
        let mut s = session("ab", 1);
        feed(&mut s, "i<Tab>").unwrap();
        assert_eq!(text(&s), "a\tb");
        s.blur();
        assert_eq!(feed(&mut s, "<Tab>").unwrap(), Outcome::PassThrough);
        assert_eq!(text(&s), "a\tb");
    }

    #[test]
    fn tab_passes_through_on_single_line_inputs() {
        let surface = MemorySurface::new("ab").single_line();
        let mut s = Session::new(
            surface,
            MemoryClipboard::new(),
            ScriptedPrompt::new(),
            Options::default(),
        );
        s.enter();
        feed(&mut s, "i").unwrap();
        assert_eq!(feed(&mut s, "<Tab>").unwrap(), Outcome::PassThrough);
    }

    #[test]
    fn mouse_selection_switches_modes() {
        let mut s = session("hello world", 0);
        s.surface_mut().set_selection(Selection {
            start: 2,
            end: 5,
            direction: crate::cursor::Direction::Forward,
        });
        s.mouse_selection();
        assert_eq!(s.mode(), Mode::Visual(VisualKind::Char));
        s.surface_mut().set_selection(Selection::caret(7));
        s.mouse_selection();
        assert_eq!(s.mode(), Mode::Command);
        assert_eq!(s.cursor(), Cursor::at(7));
    }

    // -- errors -------------------------------------------------------------

    #[test]
    fn invalid_command_resets_buffer() {
        let mut s = session("abc", 0);
        let err = feed(&mut s, "dq").unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::InvalidMotion(_))));
        assert_eq!(s.pending_keys(), "");
        feed(&mut s, "x").unwrap();
        assert_eq!(text(&s), "bc");
    }

    #[test]
    fn clipboard_failure_aborts_without_mutation() {
        let mut s = session_with(
            "abc",
            0,
            MemoryClipboard::failing(ClipboardError::PermissionDenied),
        );
        let err = feed(&mut s, "p").unwrap_err();
        assert!(matches!(err, Error::Clipboard(ClipboardError::PermissionDenied)));
        assert_eq!(text(&s), "abc");
        assert_eq!(s.cursor(), Cursor::at(0));
        assert!(s.history().is_empty());
        assert!(matches!(feed(&mut s, "yw"), Err(Error::Clipboard(_))));
        feed(&mut s, "x").unwrap();
        assert_eq!(text(&s), "bc");
    }

    // -- history ------------------------------------------------------------

    #[test]
    fn undo_redo_restore_text_and_cursor_exactly() {
        for cmd in ["dw", "x", "3x", "dd", "J", "~", ">>", "D", "2dj", "diw", "gJ"] {
            let start = "one two\n  three four\nfive\n";
            let mut s = session(start, 4);
            feed(&mut s, cmd).unwrap();
            let after = text(&s);
            let after_cursor = s.cursor();
            assert_ne!(after, start, "{cmd} changed nothing");
            feed(&mut s, "u").unwrap();
            assert_eq!(text(&s), start, "{cmd} undo text");
            assert_eq!(s.cursor(), Cursor::at(4), "{cmd} undo cursor");
            feed(&mut s, "<C-r>").unwrap();
            assert_eq!(text(&s), after, "{cmd} redo text");
            assert_eq!(s.cursor(), after_cursor, "{cmd} redo cursor");
        }
    }

    #[test]
    fn undo_with_count() {
        let mut s = session("abcdef", 0);
        feed(&mut s, "xxx").unwrap();
        assert_eq!(text(&s), "def");
        feed(&mut s, "2u").unwrap();
        assert_eq!(text(&s), "bcdef");
        feed(&mut s, "2<C-r>").unwrap();
        assert_eq!(text(&s), "def");
    }

    #[test]
    fn typed_characters_undo_as_one() {
        let mut s = session("ac", 1);
        feed(&mut s, "i").unwrap();
        for c in ["x", "y", "z"] {
            assert!(s.insert_text(c));
        }
        feed(&mut s, "<Esc>").unwrap();
        assert_eq!(text(&s), "axyzc");
        assert_eq!(s.history().len(), 1);
        feed(&mut s, "u").unwrap();
        assert_eq!(text(&s), "ac");
        assert_eq!(s.cursor(), Cursor::at(1));
        feed(&mut s, "<C-r>").unwrap();
        assert_eq!(text(&s), "axyzc");
        assert_eq!(s.cursor(), Cursor::at(4));
    }

    #[test]
    fn host_edits_become_one_entry() {
        let mut s = session("hello", 5);
        feed(&mut s, "A").unwrap();
        s.surface_mut().type_text(" there");
        s.enter();
        assert_eq!(s.history().len(), 1);
        let top = s.history().top().unwrap();
        assert_eq!(top.old_text, "");
        assert_eq!(top.new_text, " there");
        feed(&mut s, "u").unwrap();
        assert_eq!(text(&s), "hello");
        assert_eq!(s.cursor(), Cursor::at(5));
    }

    #[test]
    fn new_edit_clears_redo() {
        let mut s = session("abc", 0);
        feed(&mut s, "xu").unwrap();
        assert_eq!(s.history().redo_entries().len(), 1);
        feed(&mut s, "x").unwrap();
        assert!(s.history().redo_entries().is_empty());
    }

    // -- repeat -------------------------------------------------------------

    #[test]
    fn dot_repeats_delete() {
        let mut s = session("a b c d", 0);
        feed(&mut s, "dw..").unwrap();
        assert_eq!(text(&s), "d");
    }

    #[test]
    fn dot_repeats_change_with_typed_text() {
        let mut s = session("one two three", 0);
        feed(&mut s, "cw").unwrap();
        assert_eq!(s.mode(), Mode::Insert);
        s.insert_text("1");
        feed(&mut s, "<Esc>").unwrap();
        assert_eq!(s.repeat().command(), "cw");
        assert_eq!(s.repeat().inserted_text(), "1");
        feed(&mut s, "w.").unwrap();
        assert_eq!(text(&s), "1 1 three");
        assert_eq!(s.mode(), Mode::Command);
    }

    #[test]
    fn dot_after_plain_insert_inserts_same_text() {
        let mut s = session("ab", 0);
        feed(&mut s, "i").unwrap();
        s.surface_mut().type_text("xy");
        feed(&mut s, "<Esc>").unwrap();
        assert_eq!(text(&s), "xyab");
        assert_eq!(s.repeat().command(), "");
        s.surface_mut().set_selection(Selection::caret(4));
        s.mouse_selection();
        feed(&mut s, ".").unwrap();
        assert_eq!(text(&s), "xyabxy");
        assert_eq!(s.cursor(), Cursor::at(6));
    }

    #[test]
    fn dot_with_count_and_open_line() {
        let mut s = session("a", 0);
        feed(&mut s, "o").unwrap();
        s.insert_text("b");
        feed(&mut s, "<Esc>2.").unwrap();
        assert_eq!(text(&s), "a\nb\nb\nb");
    }

    #[test]
    fn dot_without_change_does_nothing() {
        let mut s = session("abc", 1);
        feed(&mut s, ".").unwrap();
        assert_eq!(text(&s), "abc");
    }

    #[test]
    fn motions_do_not_replace_last_change() {
        let mut s = session("abcdef", 0);
        feed(&mut s, "xl").unwrap();
        assert_eq!(s.repeat().command(), "x");
        feed(&mut s, "yw").unwrap();
        assert_eq!(s.repeat().command(), "x");
    }

    // -- debug --------------------------------------------------------------

    #[test]
    fn ctrl_h_and_debug_toggle_are_harmless() {
        let mut s = session("abc", 0);
        s.set_debug(true);
        assert!(s.options().debug);
        feed(&mut s, "x<C-h>").unwrap();
        assert_eq!(text(&s), "bc");
        s.set_debug(false);
    }
}
