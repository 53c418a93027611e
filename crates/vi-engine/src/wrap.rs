//! Paragraph reflow for `gq`.
//!
//! Text is split into paragraphs: runs of non-blank lines that share their
//! leading whitespace and line prefix. Each paragraph is re-filled greedily
//! so every line stays shorter than the width, unless a single word is
//! already too long.
//!
//! - Leading whitespace of a paragraph's first line is repeated on every
//!   line produced from it.
//! - A line starting with `- ` opens a list item: it starts a new paragraph
//!   and its continuation lines get two extra spaces of indent.
//! - A prefix token (`#`, `>`, `//` by default) followed by whitespace is
//!   repeated at the start of every continuation line.
//! - Blank lines separate paragraphs and lose trailing whitespace. A final
//!   line break is kept.
//!
//! Reflowing already reflowed text at the same width changes nothing.

const HANGING: &str = "  ";

/// One input line, split into its parts.
struct Line<'a> {
    lead: &'a str,
    prefix: Option<&'a str>,
    content: &'a str,
}

impl<'a> Line<'a> {
    fn parse(s: &'a str, prefixes: &[String]) -> Self {
        let body = s.trim_start_matches([' ', '\t']);
        let lead = &s[..s.len() - body.len()];
        let prefix = longest_prefix(body, prefixes);
        let content = prefix.map_or(body, |p| &body[p.len()..]).trim();
        Self {
            lead,
            prefix,
            content,
        }
    }

    fn is_blank(&self) -> bool {
        self.content.is_empty()
    }

    fn is_list_item(&self) -> bool {
        self.content == "-" || self.content.starts_with("- ")
    }
}

/// The longest configured prefix that starts `body` and is followed by
/// whitespace or nothing.
fn longest_prefix<'a>(body: &'a str, prefixes: &[String]) -> Option<&'a str> {
    prefixes
        .iter()
        .filter(|p| !p.is_empty() && body.starts_with(p.as_str()))
        .filter(|p| {
            body[p.len()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
        })
        .max_by_key(|p| p.len())
        .map(|p| &body[..p.len()])
}

/// Reflow `s` so lines stay shorter than `width` characters.
#[must_use]
pub fn wrap(s: &str, width: usize, prefixes: &[String]) -> String {
    let trailing_newline = s.ends_with('\n');
    let body = s.strip_suffix('\n').unwrap_or(s);
    let lines: Vec<Line<'_>> = body.split('\n').map(|l| Line::parse(l, prefixes)).collect();

    let mut out: Vec<String> = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let first = &lines[i];
        if first.is_blank() {
            let mut kept = String::from(first.lead.trim_end());
            if let Some(p) = first.prefix {
                kept = format!("{}{p}", first.lead);
            }
            out.push(kept);
            i += 1;
            continue;
        }
        let list = first.is_list_item();
        let mut words: Vec<&str> = first.content.split_whitespace().collect();
        i += 1;
        while i < lines.len() && continues(first, list, &lines[i]) {
            words.extend(lines[i].content.split_whitespace());
            i += 1;
        }
        let head = first
            .prefix
            .map_or_else(|| first.lead.to_string(), |p| format!("{}{p} ", first.lead));
        let cont = if list {
            format!("{head}{HANGING}")
        } else {
            head.clone()
        };
        fill(&mut out, &words, &head, &cont, width);
    }

    let mut result = out.join("\n");
    if trailing_newline {
        result.push('\n');
    }
    result
}

/// Whether `line` continues the paragraph opened by `first`.
fn continues(first: &Line<'_>, list: bool, line: &Line<'_>) -> bool {
    if line.is_blank() || line.is_list_item() || line.prefix != first.prefix {
        return false;
    }
    if first.prefix.is_some() {
        return line.lead == first.lead;
    }
    line.lead == first.lead
        || (list && line.lead.strip_prefix(first.lead) == Some(HANGING))
}

/// Greedy fill: a word goes on the current line while the line stays
/// shorter than `width`.
fn fill(out: &mut Vec<String>, words: &[&str], head: &str, cont: &str, width: usize) {
    let mut line = head.to_string();
    let mut len = head.chars().count();
    let mut empty = true;
    for w in words {
        let wlen = w.chars().count();
        if !empty && len + 1 + wlen >= width {
            out.push(std::mem::replace(&mut line, cont.to_string()));
            len = cont.chars().count();
            empty = true;
        }
        if !empty {
            line.push(' ');
            len += 1;
        }
        line.push_str(w);
        len += wlen;
        empty = false;
    }
    out.push(line);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn prefixes() -> Vec<String> {
        vec!["#".into(), ">".into(), "//".into()]
    }

    fn w(s: &str, width: usize) -> String {
        wrap(s, width, &prefixes())
    }

    fn words_of(n: usize) -> String {
        (0..n).map(|i| format!("word{i:02}")).collect::<Vec<_>>().join(" ")
    }

    // -- filling ------------------------------------------------------------

    #[test]
    fn long_line_wraps_under_width() {
        let input = words_of(13);
        assert_eq!(input.chars().count(), 90);
        let out = w(&input, 78);
        let lines: Vec<&str> = out.split('\n').collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.chars().count() < 78));
        assert_eq!(out.split_whitespace().collect::<Vec<_>>(), input.split(' ').collect::<Vec<_>>());
    }

    #[test]
    fn short_lines_are_joined() {
        assert_eq!(w("one\ntwo\nthree\n", 78), "one two three\n");
    }

    #[test]
    fn long_word_gets_its_own_line() {
        assert_eq!(w("a bbbbbbbbbb c", 5), "a\nbbbbbbbbbb\nc");
    }

    #[test]
    fn exact_width_boundary() {
        // "aaa bbb" is 7 chars: not shorter than 7, so it wraps.
        assert_eq!(w("aaa bbb", 7), "aaa\nbbb");
        assert_eq!(w("aaa bbb", 8), "aaa bbb");
    }

    // -- indentation and lists ----------------------------------------------

    #[test]
    fn leading_whitespace_is_repeated() {
        assert_eq!(w("\tone two three four\n", 12), "\tone two\n\tthree four\n");
    }

    #[test]
    fn list_items_hang_and_stay_separate() {
        let input = "- first item has words\n- second\n";
        assert_eq!(w(input, 14), "- first item\n  has words\n- second\n");
    }

    #[test]
    fn different_indent_starts_new_paragraph() {
        assert_eq!(w("a b\n  c d\n", 78), "a b\n  c d\n");
    }

    // -- prefixes -----------------------------------------------------------

    #[test]
    fn prefix_is_repeated() {
        assert_eq!(
            w("// one two three four\n", 14),
            "// one two\n// three four\n"
        );
        assert_eq!(w("> a\n> b\n", 78), "> a b\n");
    }

    #[test]
    fn prefix_needs_following_space() {
        assert_eq!(w("#tag word\n", 78), "#tag word\n");
    }

    #[test]
    fn prefix_change_starts_new_paragraph() {
        assert_eq!(w("# a\n> b\n", 78), "# a\n> b\n");
    }

    // -- blank lines --------------------------------------------------------

    #[test]
    fn blank_lines_separate_and_are_trimmed() {
        assert_eq!(w("a\nb\n   \nc\n", 78), "a b\n\nc\n");
    }

    #[test]
    fn trailing_newline_preserved_or_not() {
        assert_eq!(w("a\nb", 78), "a b");
        assert_eq!(w("a\nb\n", 78), "a b\n");
        assert_eq!(w("", 78), "");
    }

    // -- idempotence --------------------------------------------------------

    #[test]
    fn rewrapping_changes_nothing() {
        let samples = [
            words_of(40),
            format!("\t{}\n", words_of(25)),
            format!("- {}\n- {}\n", words_of(20), words_of(3)),
            format!("# {}\n\n> {}\n", words_of(20), words_of(15)),
            format!("  - {}\n", words_of(30)),
        ];
        for s in &samples {
            let once = w(s, 78);
            assert_eq!(w(&once, 78), once);
        }
    }
}
