//! Category browsing handler.

use crate::engine::{CorpusStats, SearchEngine, Snapshot};
use crate::entry::Entry;
use crate::error::Result;
use crate::search::{Limit, browse};
use rmcp::schemars;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct BrowseRequest {
    /// Category to list, case-insensitive. If omitted, shows every category and page.
    #[serde(default)]
    pub category: Option<String>,
    /// Maximum number of entries (default from config; 0 or less returns all)
    #[serde(default)]
    pub limit: Option<Value>,
}

/// Handles browse requests.
///
/// ## Overview Mode (no category)
/// Lists every category with its entry count, then every page.
///
/// ## Category Mode
/// Lists entries of one category in document order.
pub async fn handle_browse(engine: &Arc<SearchEngine>, request: BrowseRequest) -> Result<String> {
    render_browse(&engine.current(), engine.config().default_limit, &request)
}

/// Answer `request` entirely from `current`, so listings and category names
/// describe one corpus.
fn render_browse(current: &Snapshot, default_limit: usize, request: &BrowseRequest) -> Result<String> {
    let limit = Limit::from_value(request.limit.as_ref().unwrap_or(&Value::Null), default_limit)?;

    let index = current.index();
    if index.is_empty() {
        return Ok("No documentation corpus is loaded. Use load_corpus first.".to_string());
    }

    let stats = current.stats();
    match request.category.as_deref().map(str::trim) {
        None | Some("") => Ok(render_overview(&stats)),
        Some(category) => {
            let entries = browse(index, category, limit);
            let total = index.category(category).map_or(0, |bucket| bucket.entries.len());
            Ok(render_category(category, &entries, total, &stats))
        }
    }
}

fn render_overview(stats: &CorpusStats) -> String {
    let mut output = format!(
        "Corpus: {} entries across {} pages (generation {})\n\n",
        stats.entry_count,
        stats.pages.len(),
        stats.generation
    );

    output.push_str("Categories:\n");
    for category in &stats.categories {
        let _ = writeln!(output, "  {} ({})", category.label, category.count);
    }

    output.push_str("\nPages:\n");
    for page in &stats.pages {
        let _ = writeln!(output, "  {}", page);
    }

    output
}

fn render_category(category: &str, entries: &[Arc<Entry>], total: usize, stats: &CorpusStats) -> String {
    if entries.is_empty() {
        let mut msg = format!("No entries in category '{}'.\n\nAvailable categories:\n", category);
        for known in &stats.categories {
            let _ = writeln!(msg, "  {}", known.label);
        }
        return msg;
    }

    let mut output = if entries.len() < total {
        format!("Category '{}' ({} of {} entries):\n\n", category, entries.len(), total)
    } else {
        format!("Category '{}' ({} entries):\n\n", category, total)
    };

    for (idx, entry) in entries.iter().enumerate() {
        let title = if entry.title().is_empty() {
            entry.location()
        } else {
            entry.title()
        };
        let _ = writeln!(output, "{}. `{}` - {} · {}", idx + 1, title, entry.location(), entry.page());
    }

    output
}
