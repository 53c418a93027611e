//! Session options.
//!
//! | Field           | Default             | Used by |
//! |-----------------|---------------------|---------|
//! | `text_width`    | 78                  | `gq` wrap column |
//! | `line_prefixes` | `#`, `>`, `//`      | `gq` continuation prefixes |
//! | `line_height`   | 20                  | `Ctrl-e` / `Ctrl-y` scroll step, pixels |
//! | `indent`        | tab                 | `>` / `<` |
//! | `debug`         | false               | per-key debug logging |

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Wrapped lines stay strictly shorter than this.
    pub text_width: usize,
    /// Tokens repeated at the start of wrapped continuation lines.
    pub line_prefixes: Vec<String>,
    /// Pixels scrolled per line.
    pub line_height: i32,
    /// Unit added by `>` and removed by `<`.
    pub indent: String,
    /// Log every key, parse and history record.
    pub debug: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            text_width: 78,
            line_prefixes: vec!["#".into(), ">".into(), "//".into()],
            line_height: 20,
            indent: "\t".into(),
            debug: false,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_text_width(mut self, width: usize) -> Self {
        self.text_width = width;
        self
    }

    #[must_use]
    pub fn with_line_prefixes<I, T>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.line_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_line_height(mut self, px: i32) -> Self {
        self.line_height = px;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, unit: &str) -> Self {
        self.indent = unit.to_string();
        self
    }

    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}
