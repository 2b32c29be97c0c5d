//! Candidate discovery: scanning visible text for jump targets.
//!
//! The engine core is agnostic about what a candidate is; this module
//! implements the host-adjacent scan that discovers candidates in document
//! order for the five jump modes. Matching is case-insensitive and confined
//! to the caller-supplied visible byte range.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::decompose_canonical;

/// Which positions a search session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum JumpMode {
    /// Word beginnings matching the typed character.
    #[default]
    Start,
    /// Word endings matching the typed character.
    End,
    /// Any occurrence of the typed character.
    Any,
    /// Line beginnings; needs no typed character.
    Line,
    /// Line endings; needs no typed character.
    Terminator,
}

impl JumpMode {
    /// Line-targeting modes synthesize their first keystroke instead of
    /// waiting for one.
    pub fn is_line_mode(self) -> bool {
        matches!(self, JumpMode::Line | JumpMode::Terminator)
    }
}

impl std::str::FromStr for JumpMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(JumpMode::Start),
            "end" => Ok(JumpMode::End),
            "any" => Ok(JumpMode::Any),
            "line" => Ok(JumpMode::Line),
            "terminator" => Ok(JumpMode::Terminator),
            other => Err(format!("unknown jump mode: {other}")),
        }
    }
}

impl std::fmt::Display for JumpMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JumpMode::Start => "start",
            JumpMode::End => "end",
            JumpMode::Any => "any",
            JumpMode::Line => "line",
            JumpMode::Terminator => "terminator",
        };
        f.write_str(name)
    }
}

/// A (line, column) document position, zero-based, columns in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextPosition {
    pub line: usize,
    pub ch: usize,
}

/// One discovered jump target: the candidate payload carried through the
/// tree. Byte offsets index the scanned text; positions are for the host's
/// cursor placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPosition {
    pub start: TextPosition,
    pub end: TextPosition,
    /// Byte offset of the match start.
    pub index_s: usize,
    /// Byte offset just past the match.
    pub index_e: usize,
    /// The matched text.
    pub value: String,
}

/// Scan tuning taken from the session configuration.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Compare characters by their decomposed base (e.g. `é` matches `e`).
    pub fold_ascii: bool,
    /// Characters that do not count as a line terminator when trailing.
    pub terminator_exceptions: String,
}

/// Discover all candidates of `mode` within `visible`, in document order.
/// `query` is ignored by the line modes.
pub fn scan(
    mode: JumpMode,
    text: &str,
    visible: Range<usize>,
    query: char,
    opts: &ScanOptions,
) -> Vec<SearchPosition> {
    match mode {
        JumpMode::Start => scan_words(text, visible, query, opts, WordEdge::Start),
        JumpMode::End => scan_words(text, visible, query, opts, WordEdge::End),
        JumpMode::Any => scan_any(text, visible, query, opts),
        JumpMode::Line => scan_line_starts(text, visible),
        JumpMode::Terminator => scan_line_ends(text, visible, opts),
    }
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Decomposed base character, used for accent-insensitive matching.
fn fold_char(ch: char) -> char {
    let mut base = ch;
    let mut first = true;
    decompose_canonical(ch, |c| {
        if first {
            base = c;
            first = false;
        }
    });
    base
}

fn char_eq(a: char, b: char, opts: &ScanOptions) -> bool {
    let (a, b) = if opts.fold_ascii {
        (fold_char(a), fold_char(b))
    } else {
        (a, b)
    };
    a.to_lowercase().eq(b.to_lowercase())
}

/// Walk `text` tracking byte offset, line and column; calls `visit` for
/// every character with its predecessor and successor.
fn walk(text: &str, mut visit: impl FnMut(usize, TextPosition, char, Option<char>, Option<char>)) {
    let mut line = 0usize;
    let mut col = 0usize;
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();

    while let Some((idx, ch)) = iter.next() {
        let next = iter.peek().map(|&(_, c)| c);
        visit(idx, TextPosition { line, ch: col }, ch, prev, next);
        if ch == '\n' {
            line += 1;
            col = 0;
        } else {
            col += 1;
        }
        prev = Some(ch);
    }
}

fn make_position(idx: usize, pos: TextPosition, ch: char) -> SearchPosition {
    SearchPosition {
        start: pos,
        end: TextPosition {
            line: pos.line,
            ch: pos.ch + 1,
        },
        index_s: idx,
        index_e: idx + ch.len_utf8(),
        value: ch.to_string(),
    }
}

fn scan_any(
    text: &str,
    visible: Range<usize>,
    query: char,
    opts: &ScanOptions,
) -> Vec<SearchPosition> {
    let mut out = Vec::new();
    walk(text, |idx, pos, ch, _, _| {
        if visible.contains(&idx) && char_eq(ch, query, opts) {
            out.push(make_position(idx, pos, ch));
        }
    });
    out
}

#[derive(Clone, Copy, PartialEq)]
enum WordEdge {
    Start,
    End,
}

fn scan_words(
    text: &str,
    visible: Range<usize>,
    query: char,
    opts: &ScanOptions,
    edge: WordEdge,
) -> Vec<SearchPosition> {
    let mut out = Vec::new();
    walk(text, |idx, pos, ch, prev, next| {
        if !visible.contains(&idx) || !is_word(ch) || !char_eq(ch, query, opts) {
            return;
        }
        let at_edge = match edge {
            WordEdge::Start => !prev.map_or(false, is_word),
            WordEdge::End => !next.map_or(false, is_word),
        };
        if at_edge {
            out.push(make_position(idx, pos, ch));
        }
    });
    out
}

fn scan_line_starts(text: &str, visible: Range<usize>) -> Vec<SearchPosition> {
    let mut out = Vec::new();
    let mut saw_content = true; // suppresses a target before the first char
    walk(text, |idx, pos, ch, prev, _| {
        if prev.is_none() || prev == Some('\n') {
            saw_content = false;
        }
        if saw_content {
            return;
        }
        // first non-blank character of the line, or the line break itself
        // on a blank line
        if !ch.is_whitespace() || ch == '\n' {
            saw_content = true;
            if visible.contains(&idx) {
                out.push(make_position(idx, pos, ch));
            }
        }
    });
    out
}

fn scan_line_ends(text: &str, visible: Range<usize>, opts: &ScanOptions) -> Vec<SearchPosition> {
    // last non-blank, non-exception character of every line
    let mut out = Vec::new();
    let mut last_good: Option<(usize, TextPosition, char)> = None;
    walk(text, |idx, pos, ch, _, next| {
        if ch != '\n' && !ch.is_whitespace() && !opts.terminator_exceptions.contains(ch) {
            last_good = Some((idx, pos, ch));
        }
        if ch == '\n' || next.is_none() {
            if let Some((i, p, c)) = last_good.take() {
                if visible.contains(&i) {
                    out.push(make_position(i, p, c));
                }
            }
        }
    });
    out
}
