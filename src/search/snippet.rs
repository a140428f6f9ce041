//! Match excerpts with highlight offsets.

use ahash::AHashSet;
use serde::Serialize;

use super::tokenize::Tokenizer;

const ELLIPSIS: &str = "...";

/// A highlighted byte range within a snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub start: usize,
    pub len: usize,
}

impl Highlight {
    pub const fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Snippet {
    pub text: String,
    pub highlights: Vec<Highlight>,
}

/// Excerpt `text` around its first token in `terms`.
///
/// Keeps up to `radius` characters on each side of the match, snapped so no
/// word is cut, with whitespace collapsed. Falls back to `title` when the text
/// holds no match.
pub fn build_snippet(
    title: &str,
    text: &str,
    terms: &AHashSet<String>,
    tokenizer: &Tokenizer,
    radius: usize,
) -> Snippet {
    let first = tokenizer
        .spans(text)
        .find(|span| terms.contains(&span.term));

    let Some(first) = first else {
        return highlight(collapse_whitespace(title), terms, tokenizer);
    };

    let start = snap_start(text, back_chars(text, first.start, radius));
    let end = snap_end(text, forward_chars(text, first.end, radius));

    let mut excerpt = String::new();
    if !text[..start].trim().is_empty() {
        excerpt.push_str(ELLIPSIS);
    }
    excerpt.push_str(&collapse_whitespace(&text[start..end]));
    if !text[end..].trim().is_empty() {
        excerpt.push_str(ELLIPSIS);
    }

    highlight(excerpt, terms, tokenizer)
}

fn highlight(text: String, terms: &AHashSet<String>, tokenizer: &Tokenizer) -> Snippet {
    let highlights = tokenizer
        .spans(&text)
        .filter(|span| terms.contains(&span.term))
        .map(|span| Highlight {
            start: span.start,
            len: span.end - span.start,
        })
        .collect();
    Snippet { text, highlights }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset `n` characters before `from`, or 0.
fn back_chars(text: &str, from: usize, n: usize) -> usize {
    text[..from]
        .char_indices()
        .rev()
        .take(n)
        .last()
        .map_or(from, |(i, _)| i)
}

/// Byte offset `n` characters after `from`, or the end of `text`.
fn forward_chars(text: &str, from: usize, n: usize) -> usize {
    text[from..]
        .char_indices()
        .nth(n)
        .map_or(text.len(), |(i, _)| from + i)
}

/// Characters that stay inside a word when flanked by alphanumerics, as in
/// `built-in`, `Julia's` or `snake_case`.
const fn is_joiner(c: char) -> bool {
    matches!(c, '-' | '\'' | '_' | '\u{2019}')
}

/// Whether byte offset `at` falls strictly inside a word.
fn inside_word(text: &str, at: usize) -> bool {
    let mut before = text[..at].chars().rev();
    let mut after = text[at..].chars();
    let (Some(prev), Some(next)) = (before.next(), after.next()) else {
        return false;
    };
    match (prev.is_alphanumeric(), next.is_alphanumeric()) {
        (true, true) => true,
        (true, false) => is_joiner(next) && after.next().is_some_and(char::is_alphanumeric),
        (false, true) => is_joiner(prev) && before.next().is_some_and(char::is_alphanumeric),
        (false, false) => false,
    }
}

/// Move a window start that lands inside a word to the end of that word.
fn snap_start(text: &str, start: usize) -> usize {
    let mut at = start;
    while at < text.len() && inside_word(text, at) {
        at += text[at..].chars().next().map_or(1, char::len_utf8);
    }
    at
}

/// Move a window end that lands inside a word back to the start of that word.
fn snap_end(text: &str, end: usize) -> usize {
    let mut at = end;
    while at > 0 && inside_word(text, at) {
        at -= text[..at].chars().next_back().map_or(1, char::len_utf8);
    }
    at
}
