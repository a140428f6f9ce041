//! Field-weighted search handler for finding documentation entries.

use crate::config::SearchConfig;
use crate::engine::{SearchEngine, Snapshot};
use crate::error::Result;
use crate::search::{
    DocIndex, Highlight, Limit, ScoredResult, SearchOptions, relative_relevance, search, suggest,
};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt::Write as _, sync::Arc};

/// Number of "did you mean" titles offered for an empty result.
const SUGGESTION_COUNT: usize = 5;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Free-text query; any matching word qualifies an entry
    pub query: String,
    /// Maximum number of results (default from config; 0 or less returns all)
    #[serde(default)]
    pub limit: Option<Value>,
    /// Restrict to one category, e.g. "function", "macro", "type"
    #[serde(default)]
    pub category: Option<String>,
    /// Restrict to one page by its display name
    #[serde(default)]
    pub page: Option<String>,
}

/// Execute a search against the active index.
pub async fn handle_search(
    engine: &Arc<SearchEngine>,
    request: SearchRequest,
) -> Result<String> {
    render_search(&engine.current(), engine.config(), &request)
}

/// Answer `request` entirely from `current`, so results and suggestions
/// describe one corpus.
fn render_search(current: &Snapshot, config: &SearchConfig, request: &SearchRequest) -> Result<String> {
    let limit = Limit::from_value(
        request.limit.as_ref().unwrap_or(&Value::Null),
        config.default_limit,
    )?;

    if request.query.trim().is_empty() {
        return Ok("Empty query: nothing to search for.\n".to_string());
    }

    let index = current.index();
    if index.is_empty() {
        return Ok(
            "No documentation corpus is loaded.\n\n\
             Use load_corpus with the path to a search_index.js or JSON corpus file."
                .to_string(),
        );
    }

    let options = SearchOptions {
        limit,
        category: request.category.clone(),
        page: request.page.clone(),
    };
    let results = search(index, config, &request.query, &options);

    if results.is_empty() {
        return Ok(format_no_results(index, request));
    }

    Ok(format_search_results(&results, &request.query))
}

/// Format search results into a readable string output.
fn format_search_results(results: &[ScoredResult], query: &str) -> String {
    let mut output = format!(
        "Search results for '{}' ({} match{}):\n\n",
        query,
        results.len(),
        if results.len() == 1 { "" } else { "es" }
    );

    let best = results.first().map_or(0, |r| r.score);

    for (idx, result) in results.iter().enumerate() {
        let entry = &result.entry;
        let title = if entry.title().is_empty() {
            entry.location()
        } else {
            entry.title()
        };

        let _ = writeln!(
            output,
            "{}. `{}` ({}) - relevance: {}%",
            idx + 1,
            title,
            entry.category(),
            relative_relevance(result.score, best)
        );
        let _ = writeln!(output, "   {} · {}", entry.location(), entry.page());

        if !result.snippet.is_empty() && result.snippet != entry.title() {
            let _ = writeln!(
                output,
                "   {}",
                mark_highlights(&result.snippet, &result.highlights)
            );
        }
        output.push('\n');
    }

    output
}

fn format_no_results(index: &DocIndex, request: &SearchRequest) -> String {
    let mut msg = format!("No results found for '{}'", request.query);
    if let Some(category) = &request.category {
        let _ = write!(msg, " in category '{}'", category);
    }
    if let Some(page) = &request.page {
        let _ = write!(msg, " on page '{}'", page);
    }
    msg.push_str(".\n\n");

    let suggestions = suggest(index, &request.query, SUGGESTION_COUNT);
    if !suggestions.is_empty() {
        msg.push_str("Did you mean:\n");
        for suggestion in suggestions {
            let _ = writeln!(msg, "• `{}` ({})", suggestion.title, suggestion.location);
        }
        msg.push('\n');
    }

    msg.push_str("Search tips:\n");
    msg.push_str("• Words shorter than two characters are ignored\n");
    msg.push_str("• Any matching word counts, so add alternatives rather than more detail\n");
    if request.category.is_some() || request.page.is_some() {
        msg.push_str("• Drop the category or page filter to widen the search\n");
    }

    msg
}

/// Wrap each highlighted range in `**`.
///
/// Ranges must be ascending and non-overlapping, as `build_snippet` produces.
pub fn mark_highlights(snippet: &str, highlights: &[Highlight]) -> String {
    let mut marked = String::with_capacity(snippet.len() + highlights.len() * 4);
    let mut cursor = 0;
    for highlight in highlights {
        let (start, end) = (highlight.start, highlight.end());
        if start < cursor || end > snippet.len() {
            continue;
        }
        marked.push_str(&snippet[cursor..start]);
        marked.push_str("**");
        marked.push_str(&snippet[start..end]);
        marked.push_str("**");
        cursor = end;
    }
    marked.push_str(&snippet[cursor..]);
    marked
}
