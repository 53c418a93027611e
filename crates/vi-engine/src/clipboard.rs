//! Clipboard abstraction.
//!
//! The engine has no registers: yank and paste go through the single host
//! clipboard. Hosts provide a [`Clipboard`] implementation; reads and writes
//! are asynchronous because system clipboards usually are.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClipboardError {
    #[error("clipboard not available")]
    Unavailable,
    #[error("clipboard permission denied")]
    PermissionDenied,
    #[error("{0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;

/// The host clipboard.
#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&mut self, text: &str) -> Result<()>;
    async fn read_text(&mut self) -> Result<String>;
}

/// In-process clipboard. Used when no system clipboard is reachable, and by
/// tests (see [`MemoryClipboard::failing`]).
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    content: String,
    fail: Option<ClipboardError>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard pre-filled with `text`.
    #[must_use]
    pub fn with_text(text: &str) -> Self {
        Self {
            content: text.to_string(),
            fail: None,
        }
    }

    /// A clipboard on which every operation fails with `err`.
    #[must_use]
    pub const fn failing(err: ClipboardError) -> Self {
        Self {
            content: String::new(),
            fail: Some(err),
        }
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}

#[async_trait(?Send)]
impl Clipboard for MemoryClipboard {
    async fn write_text(&mut self, text: &str) -> Result<()> {
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        self.content = text.to_string();
        Ok(())
    }

    async fn read_text(&mut self) -> Result<String> {
        if let Some(err) = &self.fail {
            return Err(err.clone());
        }
        Ok(self.content.clone())
    }
}
