//! Ex commands: the line typed after `:`.
//!
//! The only command is `s`, with an optional line range in front:
//!
//! | Range | Lines |
//! |-------|-------|
//! | none | the cursor's line |
//! | `%` | all |
//! | `N,M` or `N` | 1-based line numbers |
//! | `'<,'>` | the visual selection |
//!
//! `s/pat/rep/flags` substitutes; a bare `s` repeats the previous
//! substitution on the new range. Flags are `g` (every match on a line),
//! `i` (ignore case) and `n` (count, change nothing).
//!
//! Any character can stand in for `/` as the delimiter, and `\` escapes it
//! inside the pattern and replacement.
//!
//! # Replacement syntax
//!
//! | Input | Inserts |
//! |-------|---------|
//! | `&`   | the whole match |
//! | `\0`..`\9` | a capture group |
//! | `\&`  | a literal `&` |
//! | `\n` `\t` `\\` | newline, tab, backslash |
//!
//! [`translate_replacement`] turns this into the `regex` crate's `${N}`
//! syntax, escaping any literal `$`.

use regex::RegexBuilder;
use ropey::Rope;

use crate::error::ParseError;

// ---------------------------------------------------------------------------
// Command-line range
// ---------------------------------------------------------------------------

/// The line range prefix of an ex command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdRange {
    /// No range given: the cursor's line.
    CurrentLine,

    /// `%`: every line.
    All,

    /// `N,M`: explicit line numbers, 0-indexed (converted from the 1-indexed
    /// input while parsing).
    Lines(usize, usize),

    /// `'<,'>`: the lines of the visual selection.
    Visual,
}

// ---------------------------------------------------------------------------
// Substitution flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubFlags {
    /// `g`: replace all matches on each line (not just the first).
    pub global: bool,

    /// `i`: case-insensitive matching.
    pub case_insensitive: bool,

    /// `n`: count matches only, don't actually replace.
    pub count_only: bool,
}

// ---------------------------------------------------------------------------
// Parsed command
// ---------------------------------------------------------------------------

/// A substitution: pattern, replacement (user syntax) and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub pattern: String,
    pub replacement: String,
    pub flags: SubFlags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExCommand {
    /// `:[range]s/pattern/replacement/[flags]`
    Substitute {
        range: CmdRange,
        sub: Substitution,
    },

    /// `:[range]s`: repeat the last substitution.
    SubRepeat { range: CmdRange },
}

impl ExCommand {
    #[must_use]
    pub const fn range(&self) -> CmdRange {
        match self {
            Self::Substitute { range, .. } | Self::SubRepeat { range } => *range,
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse an ex command line (without the leading `:`).
pub fn parse(input: &str) -> Result<ExCommand, ParseError> {
    let trimmed = input.trim();
    let (range, rest) = parse_range(trimmed);
    let Some(body) = rest.strip_prefix('s') else {
        return Err(ParseError::InvalidCommand("unknown ex command"));
    };
    parse_substitute(range, body)
}

/// Parse a range prefix from the start of a command string.
///
/// Returns `(range, rest)` where `rest` is the command string after the range.
/// If no range is found, returns `(CmdRange::CurrentLine, input)`.
fn parse_range(input: &str) -> (CmdRange, &str) {
    if let Some(rest) = input.strip_prefix('%') {
        return (CmdRange::All, rest);
    }

    if let Some(rest) = input.strip_prefix("'<,'>") {
        return (CmdRange::Visual, rest);
    }

    if let Some((start, rest_after_start)) = parse_line_number(input) {
        if let Some(after_comma) = rest_after_start.strip_prefix(',') {
            if let Some((end, rest_after_end)) = parse_line_number(after_comma) {
                return (
                    CmdRange::Lines(start.saturating_sub(1), end.saturating_sub(1)),
                    rest_after_end,
                );
            }
        }
        let line = start.saturating_sub(1);
        return (CmdRange::Lines(line, line), rest_after_start);
    }

    (CmdRange::CurrentLine, input)
}

/// Parse a decimal number from the start of `input`.
fn parse_line_number(input: &str) -> Option<(usize, &str)> {
    let end = input
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(input.len());
    if end == 0 {
        return None;
    }
    let num: usize = input[..end].parse().ok()?;
    Some((num, &input[end..]))
}

/// Parse the body of a `:s` command (everything after the `s`).
fn parse_substitute(range: CmdRange, body: &str) -> Result<ExCommand, ParseError> {
    let Some(delim) = body.chars().next() else {
        return Ok(ExCommand::SubRepeat { range });
    };
    if delim.is_alphanumeric() || delim == '\\' || delim.is_whitespace() {
        return Err(ParseError::InvalidCommand("bad substitute delimiter"));
    }
    let after_delim = &body[delim.len_utf8()..];

    let (pattern, rest) = split_at_unescaped(after_delim, delim).unwrap_or((after_delim, ""));
    let (replacement, flags) = split_at_unescaped(rest, delim).unwrap_or((rest, ""));

    if pattern.is_empty() {
        return Err(ParseError::InvalidCommand("empty substitute pattern"));
    }

    Ok(ExCommand::Substitute {
        range,
        sub: Substitution {
            pattern: unescape_delim(pattern, delim),
            replacement: unescape_delim(replacement, delim),
            flags: parse_sub_flags(flags)?,
        },
    })
}

/// Split a string at the first unescaped occurrence of `delim`.
fn split_at_unescaped(s: &str, delim: char) -> Option<(&str, &str)> {
    let mut escaped = false;
    for (byte_idx, ch) in s.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == delim {
            return Some((&s[..byte_idx], &s[byte_idx + ch.len_utf8()..]));
        }
    }
    None
}

/// `\<delim>` → `<delim>`; other escapes are left for the regex or the
/// replacement translation.
fn unescape_delim(s: &str, delim: char) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' && chars.peek() == Some(&delim) {
            result.push(delim);
            chars.next();
            continue;
        }
        result.push(ch);
    }
    result
}

fn parse_sub_flags(s: &str) -> Result<SubFlags, ParseError> {
    let mut flags = SubFlags::default();
    for ch in s.trim().chars() {
        match ch {
            'g' => flags.global = true,
            'i' => flags.case_insensitive = true,
            'n' => flags.count_only = true,
            _ => return Err(ParseError::InvalidCommand("unknown substitute flag")),
        }
    }
    Ok(flags)
}

// ---------------------------------------------------------------------------
// Replacement translation
// ---------------------------------------------------------------------------

/// Translate vi replacement syntax to the `regex` crate's expansion syntax.
#[must_use]
pub fn translate_replacement(rep: &str) -> String {
    let mut out = String::with_capacity(rep.len() + 8);
    let mut chars = rep.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '&' => out.push_str("${0}"),
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                Some(d @ '0'..='9') => {
                    out.push_str("${");
                    out.push(d);
                    out.push('}');
                }
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('$') => out.push_str("$$"),
                Some(other) => out.push(other),
                None => out.push('\\'),
            },
            _ => out.push(ch),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// The outcome of running a substitution over a line range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResult {
    /// First char of the affected span.
    pub start: usize,
    /// End (exclusive) of the affected span in the old text.
    pub end: usize,
    /// Replacement for `start..end`. Equal to the old span when nothing
    /// changed or the `n` flag was given.
    pub text: String,
    /// Number of matches replaced (or counted).
    pub count: usize,
    /// Start of the last changed line, in the new text.
    pub last_line: Option<usize>,
}

/// Run `sub` over lines `first..=last` (0-indexed, clamped to the text).
pub fn execute(
    text: &Rope,
    first: usize,
    last: usize,
    sub: &Substitution,
) -> Result<SubResult, regex::Error> {
    let re = RegexBuilder::new(&sub.pattern)
        .case_insensitive(sub.flags.case_insensitive)
        .build()?;
    let replacement = translate_replacement(&sub.replacement);

    let max_line = text.len_lines().saturating_sub(1);
    let last = last.min(max_line);
    let first = first.min(last);
    let start = text.line_to_char(first);
    let end = if last + 1 < text.len_lines() {
        text.line_to_char(last + 1)
    } else {
        text.len_chars()
    };

    let mut out = String::new();
    let mut out_chars = 0;
    let mut count = 0;
    let mut last_line = None;
    for line in text.slice(start..end).lines() {
        // ropey yields an empty line after a final line break.
        if line.len_chars() == 0 {
            continue;
        }
        let line = line.to_string();
        let (body, newline) = line
            .strip_suffix('\n')
            .map_or((line.as_str(), ""), |b| (b, "\n"));
        let found = if sub.flags.global {
            re.find_iter(body).count()
        } else {
            usize::from(re.is_match(body))
        };
        let new_body = if found == 0 || sub.flags.count_only {
            body.to_string()
        } else {
            last_line = Some(start + out_chars);
            let limit = if sub.flags.global { 0 } else { 1 };
            re.replacen(body, limit, replacement.as_str()).into_owned()
        };
        count += found;
        out_chars += new_body.chars().count() + newline.len();
        out.push_str(&new_body);
        out.push_str(newline);
    }
    log::debug!("substitute: {count} matches in lines {first}..={last}");

    Ok(SubResult {
        start,
        end,
        text: out,
        count,
        last_line,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
