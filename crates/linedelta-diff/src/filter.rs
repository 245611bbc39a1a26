//! Ignore filter: turns lines into comparison keys according to an
//! [`IgnoreConfig`].
//!
//! Each line is split into three zones, scanned from the end:
//!
//! ```text
//!   "  foo  bar \t\r\n"
//!    |--body---||--||--|
//!                 |    line-ending zone (`\n` / `\r`)
//!                 trailing whitespace zone
//! ```
//!
//! Leading whitespace of the body, interior whitespace runs, the trailing
//! zone, and the line-ending zone are each dropped when the matching flag is
//! set. Case folding applies per character. A line whose body is empty is
//! blank; blank lines vanish entirely when `ignore_blank_lines` is set.
//!
//! A [`FilteredSequence`] writes every key of one side into a single text
//! buffer owned by that sequence, so concurrent diff runs never share
//! scratch state.

use std::ops::Range;

use linedelta_types::IgnoreConfig;

/// Normalize one line into a comparison key.
///
/// Returns `None` when the line is blank and blank lines are ignored.
pub fn normalize(line: &str, cfg: &IgnoreConfig) -> Option<String> {
    let mut out = String::with_capacity(line.len());
    normalize_into(line, cfg, &mut out).then_some(out)
}

/// Append the comparison key of `line` to `out`.
///
/// Returns `false`, leaving `out` untouched, when the line is elided.
///
/// A line whose key would be empty gets the key `"\n"` instead. Under any
/// active rule an empty line and a line holding only `"\n"` therefore
/// compare equal: both count as blank. Unfiltered comparison, used when no
/// rule is active, still tells them apart.
pub fn normalize_into(line: &str, cfg: &IgnoreConfig, out: &mut String) -> bool {
    let eol_start = line.trim_end_matches(is_line_ending).len();
    let body_end = line[..eol_start].trim_end_matches(char::is_whitespace).len();

    let body = &line[..body_end];
    if body.is_empty() && cfg.ignore_blank_lines {
        return false;
    }

    let start = out.len();
    let mut leading = true;
    for c in body.chars() {
        if c.is_whitespace() {
            let dropped = if leading {
                cfg.ignore_leading_whitespace
            } else {
                cfg.ignore_interior_whitespace
            };
            if !dropped {
                out.push(c);
            }
        } else {
            leading = false;
            if cfg.ignore_case {
                out.extend(c.to_lowercase());
            } else {
                out.push(c);
            }
        }
    }

    if !cfg.ignore_trailing_whitespace {
        out.push_str(&line[body_end..eol_start]);
    }
    if !cfg.ignore_line_endings {
        out.push_str(&line[eol_start..]);
    }

    // Keep an emptied line as a real element so positions stay aligned.
    if out.len() == start {
        out.push('\n');
    }
    true
}

fn is_line_ending(c: char) -> bool {
    c == '\n' || c == '\r'
}

/// One surviving line of a filtered sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilteredToken {
    span: Range<usize>,
    line: usize,
}

impl FilteredToken {
    /// Line number of this token in the unfiltered sequence.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// The comparison keys of one side, with back-references to the true line
/// numbers.
#[derive(Clone, Debug, Default)]
pub struct FilteredSequence {
    text: String,
    tokens: Vec<FilteredToken>,
}

impl FilteredSequence {
    /// Filter every line of `lines` under `cfg`.
    pub fn build<S: AsRef<str>>(lines: &[S], cfg: &IgnoreConfig) -> Self {
        let capacity = lines.iter().map(|l| l.as_ref().len()).sum();
        let mut text = String::with_capacity(capacity);
        let mut tokens = Vec::with_capacity(lines.len());

        for (line_no, line) in lines.iter().enumerate() {
            let start = text.len();
            if normalize_into(line.as_ref(), cfg, &mut text) {
                tokens.push(FilteredToken {
                    span: start..text.len(),
                    line: line_no,
                });
            }
        }

        Self { text, tokens }
    }

    /// Number of surviving tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if every line was elided.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[FilteredToken] {
        &self.tokens
    }

    /// Normalized text of the token at `index`.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(|t| &self.text[t.span.clone()])
    }

    /// True line number of the token at `index`.
    pub fn line(&self, index: usize) -> Option<usize> {
        self.tokens.get(index).map(FilteredToken::line)
    }

    /// Iterate over the normalized texts in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(|t| &self.text[t.span.clone()])
    }
}
