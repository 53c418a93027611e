//! State for `.`, repeat last change.
//!
//! A change is the key string of the last mutating command plus the text
//! typed in insert mode right after it. `cw` + `foo` + Escape replays as
//! `cw`, then `foo` inserted at the resulting cursor. Typing after a plain
//! `i`/`a`/`A`/`I` records an empty command, so `.` only inserts.

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepeatState {
    last_command: String,
    last_inserted_text: String,
    /// The last command entered insert mode; the text typed there belongs
    /// to it.
    pending_capture: bool,
    /// History length when insert mode was entered.
    insert_mark: Option<usize>,
}

impl RepeatState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.last_command
    }

    #[must_use]
    pub fn inserted_text(&self) -> &str {
        &self.last_inserted_text
    }

    #[must_use]
    pub const fn is_capturing(&self) -> bool {
        self.pending_capture
    }

    /// Nothing to repeat yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_command.is_empty() && self.last_inserted_text.is_empty()
    }

    /// A mutating command ran. If it left the session in insert mode, the
    /// text typed next is captured for it.
    pub fn record_command(&mut self, keys: &str, entered_insert: bool) {
        self.last_command = keys.to_string();
        self.last_inserted_text.clear();
        self.pending_capture = entered_insert;
    }

    /// Insert mode was entered with `history_len` entries recorded.
    pub const fn begin_insert(&mut self, history_len: usize) {
        self.insert_mark = Some(history_len);
    }

    /// Where insert mode began, if it is still active.
    #[must_use]
    pub const fn insert_mark(&self) -> Option<usize> {
        self.insert_mark
    }

    /// Insert mode ended after `typed` was inserted.
    pub fn finish_insert(&mut self, typed: String) {
        self.insert_mark = None;
        if self.pending_capture {
            self.pending_capture = false;
            self.last_inserted_text = typed;
        } else if !typed.is_empty() {
            self.last_command.clear();
            self.last_inserted_text = typed;
        }
    }
}
