//! Query evaluation: candidate retrieval, ranking and snippet attachment.

use crate::config::SearchConfig;
use crate::entry::{Entry, EntryId};
use crate::error::SearchError;
use ahash::{AHashMap, AHashSet};
use rapidfuzz::distance::jaro_winkler;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::index::{DocIndex, Field};
use super::scoring::{field_weight, phrase_bonus, rank_order};
use super::snippet::{Highlight, build_snippet};

/// Suggestions scoring below this similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// How many results a query may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Unbounded,
    AtMost(usize),
}

impl Limit {
    /// Interpret an untyped limit, the way tool callers send it.
    ///
    /// Accepts integers and integral floats, as numbers or strings. `null`
    /// yields `default`.
    pub fn from_value(value: &Value, default: usize) -> Result<Self, SearchError> {
        match value {
            Value::Null => Ok(Self::AtMost(default)),
            Value::Number(n) => {
                if let Some(n) = n.as_i64() {
                    Ok(Self::from(n))
                } else if let Some(n) = n.as_u64() {
                    Ok(usize::try_from(n).map_or(Self::Unbounded, Self::AtMost))
                } else {
                    n.as_f64()
                        .and_then(integral)
                        .map(Self::from)
                        .ok_or_else(|| SearchError::InvalidLimit(n.to_string()))
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .or_else(|| trimmed.parse::<f64>().ok().and_then(integral))
                    .map(Self::from)
                    .ok_or_else(|| SearchError::InvalidLimit(format!("{:?}", s)))
            }
            other => Err(SearchError::InvalidLimit(other.to_string())),
        }
    }

    fn apply<T>(self, items: &mut Vec<T>) {
        if let Self::AtMost(n) = self {
            items.truncate(n);
        }
    }
}

/// `limit <= 0` means no truncation.
impl From<i64> for Limit {
    fn from(n: i64) -> Self {
        usize::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .map_or(Self::Unbounded, Self::AtMost)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15).then_some(f as i64)
}

/// Ranking inputs beyond the query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub limit: Limit,
    /// Only keep entries whose category key matches, case-insensitively.
    pub category: Option<String>,
    /// Only keep entries on this page.
    pub page: Option<String>,
}

impl SearchOptions {
    /// No filters; `limit <= 0` means no truncation.
    pub fn with_limit(limit: i64) -> Self {
        Self {
            limit: Limit::from(limit),
            category: None,
            page: None,
        }
    }
}

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredResult {
    pub entry: Arc<Entry>,
    /// Corpus position of the entry.
    pub id: EntryId,
    pub score: u32,
    pub snippet: String,
    /// Byte ranges into `snippet`.
    pub highlights: Vec<Highlight>,
}

/// A "did you mean" candidate title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub title: String,
    pub location: String,
    pub score: f64,
}

/// Rank `index` entries against `query`.
///
/// A candidate needs one query token in any field. Empty or token-free
/// queries return nothing.
pub fn search(
    index: &DocIndex,
    config: &SearchConfig,
    query: &str,
    options: &SearchOptions,
) -> Vec<ScoredResult> {
    let tokenizer = index.tokenizer();
    let terms = tokenizer.unique_tokens(query);
    if terms.is_empty() {
        return vec![];
    }

    let weights = &config.weights;
    let mut scores: AHashMap<EntryId, u32> = AHashMap::new();
    for term in &terms {
        for field in Field::ALL {
            let weight = field_weight(weights, field);
            for &id in index.postings(field, term) {
                let score = scores.entry(id).or_insert(0);
                *score = score.saturating_add(weight);
            }
        }
    }

    let category = options.category.as_deref().map(|c| c.trim().to_lowercase());
    let phrase = normalize_phrase(query);

    let mut ranked: Vec<(EntryId, u32)> = scores
        .into_iter()
        .filter_map(|(id, score)| {
            let entry = index.entry(id)?;
            if category.as_deref().is_some_and(|c| entry.category().key() != c) {
                return None;
            }
            if options.page.as_deref().is_some_and(|p| entry.page() != p) {
                return None;
            }
            Some((id, score.saturating_add(phrase_bonus(weights, entry, &phrase))))
        })
        .collect();

    ranked.sort_unstable_by(|a, b| rank_order(*a, *b));
    options.limit.apply(&mut ranked);

    tracing::debug!(
        "Query {:?}: {} token(s), {} result(s)",
        query,
        terms.len(),
        ranked.len()
    );

    let term_set: AHashSet<String> = terms.into_iter().collect();
    ranked
        .into_iter()
        .filter_map(|(id, score)| {
            let entry = index.entry(id)?;
            let snippet = build_snippet(
                entry.title(),
                entry.text(),
                &term_set,
                tokenizer,
                config.snippet_radius,
            );
            Some(ScoredResult {
                entry: Arc::clone(entry),
                id,
                score,
                snippet: snippet.text,
                highlights: snippet.highlights,
            })
        })
        .collect()
}

/// Entries of one category in corpus order.
pub fn browse(index: &DocIndex, category: &str, limit: Limit) -> Vec<Arc<Entry>> {
    let Some(bucket) = index.category(category) else {
        return vec![];
    };
    let mut entries: Vec<_> = bucket
        .entries
        .iter()
        .filter_map(|&id| index.entry(id).cloned())
        .collect();
    limit.apply(&mut entries);
    entries
}

/// Titles resembling `query`, best first, one per distinct title.
pub fn suggest(index: &DocIndex, query: &str, max: usize) -> Vec<Suggestion> {
    let phrase = normalize_phrase(query);
    if phrase.is_empty() {
        return vec![];
    }

    let mut seen = AHashSet::new();
    let mut suggestions: Vec<Suggestion> = index
        .entries()
        .iter()
        .filter_map(|entry| {
            if entry.title().is_empty() || !seen.insert(entry.title_lower()) {
                return None;
            }
            let score = jaro_winkler::similarity(phrase.chars(), entry.title_lower().chars());
            (score >= SUGGESTION_THRESHOLD).then(|| Suggestion {
                title: entry.title().to_string(),
                location: entry.location().to_string(),
                score,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(max);
    suggestions
}

/// Lower-cased query with whitespace runs collapsed, for phrase matching.
fn normalize_phrase(query: &str) -> String {
    query
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::tokenize::Tokenizer;
    use assert2::{check, let_assert};
    use rstest::rstest;
    use serde_json::json;

    fn index(entries: &[(&str, &str, &str)]) -> DocIndex {
        let entries = entries
            .iter()
            .enumerate()
            .map(|(i, (title, category, text))| {
                Entry::new(format!("#e{}", i), "Home", *title, *category, *text).unwrap()
            })
            .collect();
        DocIndex::build(entries, Tokenizer::default())
    }

    fn run(index: &DocIndex, query: &str, limit: i64) -> Vec<ScoredResult> {
        search(index, &SearchConfig::default(), query, &SearchOptions::with_limit(limit))
    }

    fn titles(results: &[ScoredResult]) -> Vec<&str> {
        results.iter().map(|r| r.entry.title()).collect()
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    #[case("x")]
    #[case("?!")]
    fn test_blank_or_tokenless_query_is_empty(#[case] query: &str) {
        let index = index(&[("x", "constant", "x ? !")]);
        check!(run(&index, query, 10).is_empty());
    }

    #[test]
    fn test_scores_sum_field_weights_and_phrase_bonus() {
        let index = index(&[
            ("SIGNATURES", "constant", "method signatures"),
            ("other", "constant", "signatures"),
            ("signatures", "signatures", ""),
        ]);
        let results = run(&index, "signatures", 0);
        let scores: Vec<_> = results.iter().map(|r| (r.id, r.score)).collect();
        // #e2: title 5 + category 3 + title phrase 2
        // #e0: title 5 + text 1 + title phrase 2 + text phrase 1
        // #e1: text 1 + text phrase 1
        check!(scores == vec![(2, 10), (0, 9), (1, 2)]);
    }

    #[test]
    fn test_extreme_weights_saturate_instead_of_overflowing() {
        let index = index(&[("signatures", "signatures", "signatures"), ("other", "page", "signatures")]);
        let mut config = SearchConfig::default();
        config.weights.title = 4_000_000_000;
        config.weights.title_phrase = 4_000_000_000;
        config.weights.category = u32::MAX;
        let results = search(&index, &config, "signatures", &SearchOptions::with_limit(0));
        let scores: Vec<_> = results.iter().map(|r| (r.id, r.score)).collect();
        check!(scores == vec![(0, u32::MAX), (1, 2)]);
    }

    #[test]
    fn test_or_semantics_across_tokens() {
        let index = index(&[
            ("alpha", "page", ""),
            ("beta", "page", ""),
            ("gamma", "page", ""),
        ]);
        check!(titles(&run(&index, "alpha beta", 10)) == vec!["alpha", "beta"]);
    }

    #[test]
    fn test_duplicate_query_tokens_count_once() {
        let index = index(&[("format", "method", "")]);
        let once = run(&index, "format", 10);
        let twice = run(&index, "format format", 10);
        check!(once[0].score == 7);
        check!(twice[0].score == 5);
    }

    #[test]
    fn test_limit_truncates_and_non_positive_is_unbounded() {
        let rows: Vec<_> = (0..8).map(|_| ("item", "method", "")).collect();
        let index = index(&rows);
        check!(run(&index, "item", 5).len() == 5);
        check!(run(&index, "item", 0).len() == 8);
        check!(run(&index, "item", -3).len() == 8);
    }

    #[test]
    fn test_category_and_page_filters() {
        let index = index(&[
            ("format", "method", ""),
            ("FORMAT", "constant", ""),
            ("format", "Method", ""),
        ]);
        let options = SearchOptions {
            category: Some("METHOD".to_string()),
            ..SearchOptions::with_limit(0)
        };
        let results = search(&index, &SearchConfig::default(), "format", &options);
        let ids: Vec<_> = results.iter().map(|r| r.id).collect();
        check!(ids == vec![0, 2]);

        let options = SearchOptions {
            page: Some("Guide".to_string()),
            ..SearchOptions::with_limit(0)
        };
        check!(search(&index, &SearchConfig::default(), "format", &options).is_empty());
    }

    #[test]
    fn test_custom_weights_change_ranking() {
        let index = index(&[("readme", "page", ""), ("x", "page", "readme")]);
        let mut config = SearchConfig::default();
        config.weights.title = 0;
        config.weights.title_phrase = 0;
        config.weights.text = 4;
        let results = search(&index, &config, "readme", &SearchOptions::with_limit(0));
        check!(results[0].id == 1);
    }

    #[test]
    fn test_browse_lists_category_in_order() {
        let index = index(&[
            ("a", "macro", ""),
            ("b", "method", ""),
            ("c", "Macro", ""),
        ]);
        let found: Vec<_> = browse(&index, "macro", Limit::Unbounded)
            .iter()
            .map(|e| e.title().to_string())
            .collect();
        check!(found == vec!["a", "c"]);
        check!(browse(&index, "macro", Limit::AtMost(1)).len() == 1);
        check!(browse(&index, "keyword", Limit::Unbounded).is_empty());
    }

    #[test]
    fn test_suggest_finds_near_titles() {
        let index = index(&[
            ("TYPEDSIGNATURES", "constant", ""),
            ("SIGNATURES", "constant", ""),
            ("signatures", "method", ""),
            ("LICENSE", "constant", ""),
        ]);
        let suggestions = suggest(&index, "signatrues", 5);
        let_assert!(Some(best) = suggestions.first());
        check!(best.title == "SIGNATURES");
        check!(suggestions.iter().all(|s| s.title != "LICENSE"));
        check!(suggestions.iter().filter(|s| s.title.eq_ignore_ascii_case("signatures")).count() == 1);
    }

    #[rstest]
    #[case(json!(5), Limit::AtMost(5))]
    #[case(json!(0), Limit::Unbounded)]
    #[case(json!(-1), Limit::Unbounded)]
    #[case(json!(3.0), Limit::AtMost(3))]
    #[case(json!("12"), Limit::AtMost(12))]
    #[case(json!(" 7 "), Limit::AtMost(7))]
    #[case(json!("5.0"), Limit::AtMost(5))]
    #[case(json!("-2.0"), Limit::Unbounded)]
    #[case(json!(null), Limit::AtMost(20))]
    fn test_limit_from_value(#[case] value: Value, #[case] expected: Limit) {
        check!(Limit::from_value(&value, 20) == Ok(expected));
    }

    #[rstest]
    #[case(json!(2.5))]
    #[case(json!("ten"))]
    #[case(json!("5.5"))]
    #[case(json!("NaN"))]
    #[case(json!("inf"))]
    #[case(json!(true))]
    #[case(json!([5]))]
    #[case(json!({"n": 5}))]
    fn test_limit_rejects_non_integers(#[case] value: Value) {
        check!(let Err(SearchError::InvalidLimit(_)) = Limit::from_value(&value, 20));
    }
}
