//! Single-line sub-input for `/`, `?` and `:`.
//!
//! The host presents the prompt (a floating input, a status line, ...), lets
//! the user browse the history it was given, and resolves with the submitted
//! string or `None` on cancel. The engine only keeps the history lists.

use std::collections::VecDeque;

use async_trait::async_trait;

/// What the prompt is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    /// `/`: search forward.
    SearchForward,
    /// `?`: search backward.
    SearchBackward,
    /// `:`: ex command.
    Ex,
}

impl PromptKind {
    /// The character shown before the input.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::SearchForward => '/',
            Self::SearchBackward => '?',
            Self::Ex => ':',
        }
    }

    /// Search prompts share one history list.
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::SearchForward | Self::SearchBackward)
    }
}

/// The host's prompt collaborator.
#[async_trait(?Send)]
pub trait Prompt {
    /// Ask for one line of input. `history` is oldest first.
    async fn ask(&mut self, kind: PromptKind, history: &[String]) -> Option<String>;
}

/// A prompt that never answers. For hosts without sub-input.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

#[async_trait(?Send)]
impl Prompt for NoPrompt {
    async fn ask(&mut self, _kind: PromptKind, _history: &[String]) -> Option<String> {
        None
    }
}

/// A prompt that replays queued answers, recording what it was asked.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    answers: VecDeque<Option<String>>,
    asked: Vec<(PromptKind, Vec<String>)>,
}

impl ScriptedPrompt {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a submitted answer.
    pub fn answer(&mut self, text: &str) {
        self.answers.push_back(Some(text.to_string()));
    }

    /// Queue a cancellation.
    pub fn cancel(&mut self) {
        self.answers.push_back(None);
    }

    /// Every `(kind, history)` pair the prompt was opened with.
    #[must_use]
    pub fn asked(&self) -> &[(PromptKind, Vec<String>)] {
        &self.asked
    }
}

#[async_trait(?Send)]
impl Prompt for ScriptedPrompt {
    async fn ask(&mut self, kind: PromptKind, history: &[String]) -> Option<String> {
        self.asked.push((kind, history.to_vec()));
        self.answers.pop_front().flatten()
    }
}

// ---------------------------------------------------------------------------
// History lists
// ---------------------------------------------------------------------------

/// Per-kind prompt history.
#[derive(Debug, Default, Clone)]
pub struct PromptHistory {
    search: Vec<String>,
    ex: Vec<String>,
}

impl PromptHistory {
    /// The list shown for `kind`, oldest first.
    #[must_use]
    pub fn list(&self, kind: PromptKind) -> &[String] {
        if kind.is_search() { &self.search } else { &self.ex }
    }

    /// Remember a submitted line. Empty lines and repeats of the newest entry
    /// are not stored.
    pub fn push(&mut self, kind: PromptKind, line: &str) {
        let list = if kind.is_search() {
            &mut self.search
        } else {
            &mut self.ex
        };
        if line.is_empty() || list.last().is_some_and(|l| l == line) {
            return;
        }
        list.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use futures_executor::block_on;

    use super::*;

    #[test]
    fn scripted_prompt_replays_in_order() {
        let mut p = ScriptedPrompt::new();
        p.answer("foo");
        p.cancel();
        assert_eq!(
            block_on(p.ask(PromptKind::SearchForward, &[])),
            Some("foo".to_string())
        );
        assert_eq!(block_on(p.ask(PromptKind::Ex, &["s/a/b/".into()])), None);
        assert_eq!(block_on(p.ask(PromptKind::Ex, &[])), None);
        assert_eq!(p.asked().len(), 3);
        assert_eq!(p.asked()[1].1, vec!["s/a/b/".to_string()]);
    }

    #[test]
    fn history_dedupes_consecutive() {
        let mut h = PromptHistory::default();
        h.push(PromptKind::SearchForward, "foo");
        h.push(PromptKind::SearchBackward, "foo");
        h.push(PromptKind::SearchForward, "bar");
        h.push(PromptKind::Ex, "");
        assert_eq!(h.list(PromptKind::SearchBackward), ["foo", "bar"]);
        assert!(h.list(PromptKind::Ex).is_empty());
    }

    #[test]
    fn prefixes() {
        assert_eq!(PromptKind::SearchForward.prefix(), '/');
        assert_eq!(PromptKind::SearchBackward.prefix(), '?');
        assert_eq!(PromptKind::Ex.prefix(), ':');
    }
}
