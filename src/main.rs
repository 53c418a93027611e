// SPDX-License-Identifier: MIT
//
// vi-surface: run vi key scripts against a text file, headless.
//
// The binary wires the engine to an in-memory surface:
//
//   file → MemorySurface → Session ← keys (vi notation, from --keys or stdin)
//                             ↕
//              system clipboard (arboard) or in-memory fallback
//
// The session starts in command mode, as vi does after opening a file.
// Characters the session passes through in insert mode are typed through
// `Session::insert_text`, so a burst of typing undoes as one entry. Prompts
// (`/`, `?`, `:`) read their answer from the same key script, up to `<CR>`;
// `<Esc>` cancels them.
//
// Usage:
//
//   vi-surface [--debug] [--width N] [--no-clipboard] [--write] FILE [--keys KEYS]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use futures_executor::block_on;
use vi_engine::clipboard::{Clipboard, ClipboardError, MemoryClipboard};
use vi_engine::key::parse_keys;
use vi_engine::prompt::{Prompt, PromptKind};
use vi_engine::surface::MemorySurface;
use vi_engine::{Key, Mode, Options, Outcome, Session};

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    path: String,
    keys: Option<String>,
    width: Option<usize>,
    debug: bool,
    no_clipboard: bool,
    write: bool,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut out = Self::default();
        let mut path = None;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--debug" => out.debug = true,
                "--no-clipboard" => out.no_clipboard = true,
                "--write" | "-w" => out.write = true,
                "--width" => {
                    let n = args.next().context("--width needs a value")?;
                    let n: usize = n.parse().with_context(|| format!("bad width {n:?}"))?;
                    if n < 2 {
                        bail!("width must be at least 2");
                    }
                    out.width = Some(n);
                }
                "--keys" | "-k" => {
                    out.keys = Some(args.next().context("--keys needs a value")?);
                }
                s if s.starts_with('-') => bail!("unknown option {s}"),
                _ if path.is_some() => bail!("only one file can be given"),
                _ => path = Some(arg),
            }
        }
        out.path = path.context(
            "usage: vi-surface [--debug] [--width N] [--no-clipboard] [--write] FILE [--keys KEYS]",
        )?;
        Ok(out)
    }

    fn options(&self) -> Options {
        let mut options = Options::default().with_debug(self.debug);
        if let Some(width) = self.width {
            options = options.with_text_width(width);
        }
        options
    }
}

// ─── Clipboard ──────────────────────────────────────────────────────────────

/// The system clipboard, or an in-memory one where none is reachable.
enum HostClipboard {
    System(arboard::Clipboard),
    Memory(MemoryClipboard),
}

impl HostClipboard {
    fn open(memory_only: bool) -> Self {
        if memory_only {
            return Self::Memory(MemoryClipboard::new());
        }
        match arboard::Clipboard::new() {
            Ok(c) => Self::System(c),
            Err(e) => {
                log::warn!("system clipboard unavailable ({e}), using an in-memory one");
                Self::Memory(MemoryClipboard::new())
            }
        }
    }
}

fn clipboard_error(e: arboard::Error) -> ClipboardError {
    match e {
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
        other => ClipboardError::Platform(other.to_string()),
    }
}

#[async_trait(?Send)]
impl Clipboard for HostClipboard {
    async fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self {
            Self::System(c) => c.set_text(text.to_owned()).map_err(clipboard_error),
            Self::Memory(m) => m.write_text(text).await,
        }
    }

    async fn read_text(&mut self) -> Result<String, ClipboardError> {
        match self {
            Self::System(c) => match c.get_text() {
                Ok(s) => Ok(s),
                // Nothing textual on the clipboard: paste nothing.
                Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
                Err(e) => Err(clipboard_error(e)),
            },
            Self::Memory(m) => m.read_text().await,
        }
    }
}

// ─── Script ─────────────────────────────────────────────────────────────────

/// Keys still to be fed. Shared with the prompt, which takes its answers from
/// the same stream.
type KeyQueue = Rc<RefCell<VecDeque<Key>>>;

/// Answers prompts with the script's next keys, up to `<CR>`.
struct ScriptAnswer {
    keys: KeyQueue,
}

#[async_trait(?Send)]
impl Prompt for ScriptAnswer {
    async fn ask(&mut self, kind: PromptKind, _history: &[String]) -> Option<String> {
        let mut line = String::new();
        let mut keys = self.keys.borrow_mut();
        while let Some(k) = keys.pop_front() {
            match k {
                Key::Char('\n') => {
                    log::debug!("prompt {}{line}", kind.prefix());
                    return Some(line);
                }
                Key::Char(c) => line.push(c),
                Key::Tab => line.push('\t'),
                k if k.is_escape() => return None,
                _ => {}
            }
        }
        // Script ended inside the prompt: submit what was typed.
        Some(line)
    }
}

/// Feed every key of the script. Errors are reported and the script goes on,
/// as a user would keep typing.
fn run_script(session: &mut Session<MemorySurface, HostClipboard, ScriptAnswer>, keys: &KeyQueue) {
    loop {
        let Some(key) = keys.borrow_mut().pop_front() else {
            break;
        };
        match block_on(session.key(key)) {
            Ok(Outcome::PassThrough) => {
                if let Key::Char(c) = key {
                    if session.mode() == Mode::Insert {
                        session.insert_text(c.encode_utf8(&mut [0; 4]));
                    }
                }
            }
            Ok(Outcome::Report(msg)) => eprintln!("{msg}"),
            Ok(Outcome::Handled | Outcome::Pending) => {}
            Err(e) => eprintln!("vi-surface: {key}: {e}"),
        }
    }
    if !session.pending_keys().is_empty() {
        log::warn!("script ended with pending keys {:?}", session.pending_keys());
    }
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> Result<()> {
    let args = Args::parse(env::args().skip(1))?;

    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let text = fs::read_to_string(&args.path).with_context(|| format!("reading {}", args.path))?;
    let script = match &args.keys {
        Some(k) => k.clone(),
        None => {
            let mut s = String::new();
            io::stdin()
                .read_to_string(&mut s)
                .context("reading keys from stdin")?;
            s.trim_end_matches('\n').to_string()
        }
    };

    let keys: KeyQueue = Rc::new(RefCell::new(parse_keys(&script).into()));
    let prompt = ScriptAnswer {
        keys: Rc::clone(&keys),
    };
    let mut session = Session::new(
        MemorySurface::new(&text),
        HostClipboard::open(args.no_clipboard),
        prompt,
        args.options(),
    );
    session.enter();
    run_script(&mut session, &keys);

    let out = session.surface().contents();
    if args.write {
        fs::write(&args.path, &out).with_context(|| format!("writing {}", args.path))?;
    } else {
        io::stdout()
            .write_all(out.as_bytes())
            .context("writing result")?;
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("vi-surface: {e:#}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
