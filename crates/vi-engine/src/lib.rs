//! # vi-engine: modal vi commands for any editable text surface
//!
//! The engine drives a host text widget through the [`surface::TextSurface`]
//! trait. It never owns the text; it re-reads it before every command.
//!
//! - **[`session`]**: `Session`, the mode machine and key dispatcher
//! - **[`motion`]** / **[`text_object`]** / **[`word`]**: motion resolution
//! - **[`reader`]**: directional character reader over a rope
//! - **[`cmd`]** / **[`key`]**: the key buffer and key notation
//! - **[`history`]** / **[`repeat`]**: undo, redo and `.`
//! - **[`search`]** / **[`command`]**: `/`, `?`, `*`, `#` and `:s`
//! - **[`edit`]** / **[`wrap`]**: indent, join, case and `gq` transforms
//! - **[`clipboard`]** / **[`prompt`]**: async host boundaries
//!
//! ```
//! use futures_executor::block_on;
//! use vi_engine::clipboard::MemoryClipboard;
//! use vi_engine::key::parse_keys;
//! use vi_engine::prompt::NoPrompt;
//! use vi_engine::surface::MemorySurface;
//! use vi_engine::{Options, Session};
//!
//! let surface = MemorySurface::new("foo bar baz").with_caret(4);
//! let mut s = Session::new(surface, MemoryClipboard::new(), NoPrompt, Options::default());
//! s.enter();
//! for k in parse_keys("dw") {
//!     block_on(s.key(k)).unwrap();
//! }
//! assert_eq!(s.surface().contents(), "foo baz");
//! ```

pub mod clipboard;
pub mod cmd;
pub mod command;
pub mod cursor;
pub mod edit;
pub mod error;
pub mod history;
pub mod key;
pub mod mode;
pub mod motion;
pub mod options;
pub mod prompt;
pub mod reader;
pub mod repeat;
pub mod search;
pub mod session;
pub mod surface;
pub mod text_object;
pub mod word;
pub mod wrap;

pub use cursor::Cursor;
pub use error::{Error, ParseError, Result};
pub use key::Key;
pub use mode::Mode;
pub use options::Options;
pub use session::{Outcome, Session};
