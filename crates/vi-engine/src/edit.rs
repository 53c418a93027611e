//! Text transforms behind `>`, `<`, `J`, `gJ` and `~`.
//!
//! Each takes the text of the affected range and returns its replacement;
//! the session writes it back through the surface and history.

/// Add `unit` at the start of every non-empty line in `text`.
///
/// A line only counts if its first character is inside `text`, so a range
/// ending just after a line break leaves the next line alone.
#[must_use]
pub fn indent(text: &str, unit: &str) -> String {
    let mut out = String::with_capacity(text.len() + unit.len() * 4);
    let mut at_line_start = true;
    for c in text.chars() {
        if at_line_start && c != '\n' {
            out.push_str(unit);
        }
        out.push(c);
        at_line_start = c == '\n';
    }
    out
}

/// Remove one indent level from every line in `text`: a leading tab, or a
/// leading `unit`.
#[must_use]
pub fn unindent(text: &str, unit: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            line.strip_prefix('\t')
                .or_else(|| (!unit.is_empty()).then(|| line.strip_prefix(unit)).flatten())
                .unwrap_or(line)
        })
        .collect()
}

/// Join the lines of `text`, trimming whitespace at each join and putting
/// `between` there. A final line break is kept.
///
/// Returns the joined text and the char offset of the last join point.
#[must_use]
pub fn join(text: &str, between: &str) -> (String, usize) {
    let (body, newline) = text
        .strip_suffix('\n')
        .map_or((text, false), |b| (b, true));
    let lines: Vec<&str> = body.split('\n').collect();
    let last = lines.len() - 1;
    let between_len = between.chars().count();

    let mut out = String::with_capacity(text.len());
    let mut out_len = 0;
    let mut join_at = 0;
    for (i, line) in lines.iter().enumerate() {
        let mut line = *line;
        if i != 0 {
            line = line.trim_start();
        }
        if i != last {
            line = line.trim_end();
        }
        out.push_str(line);
        out_len += line.chars().count();
        if i != last {
            join_at = out_len;
            out.push_str(between);
            out_len += between_len;
        }
    }
    if newline {
        out.push('\n');
    }
    (out, join_at)
}

/// Swap the case of every cased character.
#[must_use]
pub fn swap_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_uppercase() {
            out.extend(c.to_lowercase());
        } else if c.is_lowercase() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
