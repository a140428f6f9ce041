//! Text tokenization shared by indexing, querying and snippet highlighting.

use crate::config::SearchConfig;
use ahash::AHashSet;

/// A token located in its source text.
///
/// `start..end` is a byte range into the original (not lower-cased) text, so
/// highlight offsets stay valid even when lower-casing changes byte lengths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
    /// Lower-cased token text.
    pub term: String,
}

/// Splits text on non-alphanumeric boundaries and normalizes case.
///
/// Splitting already discards every punctuation-only token, so the stoplist
/// only needs to hold words.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    min_len: usize,
    stop_words: AHashSet<String>,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl Tokenizer {
    pub fn new<I, S>(min_len: usize, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            min_len: min_len.max(1),
            stop_words: stop_words
                .into_iter()
                .map(|word| word.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.min_token_len, &config.stop_words)
    }

    /// Lower-cased tokens in source order, duplicates kept.
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.spans(text).map(|span| span.term).collect()
    }

    /// Distinct lower-cased tokens in order of first appearance.
    pub fn unique_tokens(&self, text: &str) -> Vec<String> {
        let mut seen = AHashSet::new();
        self.spans(text)
            .filter_map(|span| seen.insert(span.term.clone()).then_some(span.term))
            .collect()
    }

    /// Tokens with their byte ranges in `text`.
    pub fn spans<'t>(&'t self, text: &'t str) -> impl Iterator<Item = TokenSpan> + 't {
        Runs::new(text).filter_map(move |(start, end)| {
            let raw = &text[start..end];
            if raw.chars().count() < self.min_len {
                return None;
            }
            let term = raw.to_lowercase();
            if self.stop_words.contains(&term) {
                return None;
            }
            Some(TokenSpan { start, end, term })
        })
    }
}

/// Iterator over maximal alphanumeric runs as byte ranges.
struct Runs<'t> {
    text: &'t str,
    chars: std::str::CharIndices<'t>,
}

impl<'t> Runs<'t> {
    fn new(text: &'t str) -> Self {
        Self {
            text,
            chars: text.char_indices(),
        }
    }
}

impl Iterator for Runs<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let start = loop {
            let (i, c) = self.chars.next()?;
            if c.is_alphanumeric() {
                break i;
            }
        };

        for (i, c) in self.chars.by_ref() {
            if !c.is_alphanumeric() {
                return Some((start, i));
            }
        }
        Some((start, self.text.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("SIGNATURES", vec!["signatures"])]
    #[case("$(SIGNATURES)", vec!["signatures"])]
    #[case("getmethods!-Tuple{Any,Any}", vec!["getmethods", "tuple", "any", "any"])]
    #[case("func(x, y) = x + y", vec!["func"])]
    #[case("README.md", vec!["readme", "md"])]
    #[case("snake_case hyphen-case", vec!["snake", "case", "hyphen", "case"])]
    #[case("Array{T,1} where T<:AbstractString", vec!["array", "where", "abstractstring"])]
    fn test_tokens_exact(#[case] input: &str, #[case] expected: Vec<&str>) {
        let tokens = Tokenizer::default().tokens(input);
        check!(tokens == expected);
    }

    #[rstest]
    #[case("u8", vec!["u8"])]
    #[case("i32 f64", vec!["i32", "f64"])]
    #[case("x y z", vec![])]
    #[case("@ # ! ... ::", vec![])]
    fn test_short_and_punctuation_tokens(#[case] input: &str, #[case] expected: Vec<&str>) {
        let tokens = Tokenizer::default().tokens(input);
        check!(tokens == expected);
    }

    #[test]
    fn test_spans_point_into_original_text() {
        let text = "An Abbreviation for including";
        let spans: Vec<_> = Tokenizer::default().spans(text).collect();
        check!(spans.len() == 4);
        check!(&text[spans[1].start..spans[1].end] == "Abbreviation");
        check!(spans[1].term == "abbreviation");
    }

    #[test]
    fn test_spans_survive_length_changing_lowercase() {
        // 'İ' lower-cases to two chars; the span must still cover the source bytes.
        let text = "İstanbul ok";
        let spans: Vec<_> = Tokenizer::default().spans(text).collect();
        check!(&text[spans[0].start..spans[0].end] == "İstanbul");
        check!(&text[spans[1].start..spans[1].end] == "ok");
    }

    #[test]
    fn test_stop_words_filtered_case_insensitively() {
        let tokenizer = Tokenizer::new(2, ["The", "of"]);
        check!(tokenizer.tokens("the docs of THE module") == vec!["docs", "module"]);
    }

    #[test]
    fn test_unique_tokens_keep_first_order() {
        let tokens = Tokenizer::default().unique_tokens("Any any ANY Tuple any");
        check!(tokens == vec!["any", "tuple"]);
    }

    #[rstest]
    #[case("Москва")]
    #[case("日本")]
    #[case("🦀")]
    fn test_unicode_handling(#[case] input: &str) {
        // Should not panic, even if it produces empty results
        let _tokens = Tokenizer::default().tokens(input);
    }

    #[test]
    fn test_empty_and_whitespace() {
        let tokenizer = Tokenizer::default();
        check!(tokenizer.tokens("").is_empty());
        check!(tokenizer.tokens("   ").is_empty());
        check!(tokenizer.tokens("\n\t").is_empty());
    }
}
