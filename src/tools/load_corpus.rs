//! Corpus (re)load handler.

use crate::corpus::read_corpus;
use crate::engine::{LoadReport, LoadWarning, SearchEngine};
use crate::error::Result;
use anyhow::Context as _;
use rmcp::schemars;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LoadCorpusRequest {
    /// Path to a search_index.js file or a JSON array of entry records
    pub path: String,
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

/// Read a corpus file and swap it in as the active index.
///
/// On any read or decode error the previous index stays active.
pub async fn load_corpus_file(engine: &Arc<SearchEngine>, path: &Path) -> Result<LoadReport> {
    let records = read_corpus(path).await?;

    // Index build is CPU-bound; keep it off the async workers.
    let engine = Arc::clone(engine);
    let report = tokio::task::spawn_blocking(move || engine.load(records)).await?;
    Ok(report)
}

pub async fn handle_load_corpus(
    engine: &Arc<SearchEngine>,
    request: LoadCorpusRequest,
) -> Result<String> {
    let path = PathBuf::from(expand_tilde(&request.path).as_ref());

    let report = load_corpus_file(engine, &path)
        .await
        .inspect_err(|e| tracing::warn!("Corpus load from {} failed: {:#}", path.display(), e))
        .context("Failed to load corpus; the previous index is still active")?;

    Ok(format_response(&path, &report))
}

pub fn format_response(path: &Path, report: &LoadReport) -> String {
    let mut output = format!(
        "Loaded {} entries from {} (generation {}, digest {:016x}).\n",
        report.entry_count,
        path.display(),
        report.generation,
        report.digest
    );

    for warning in &report.warnings {
        match warning {
            LoadWarning::SkippedRecords(n) => {
                let _ = writeln!(output, "Warning: skipped {} malformed record(s) without a location.", n);
            }
            LoadWarning::EmptyIndex => {
                output.push_str("Warning: the corpus produced no entries; searches will return nothing.\n");
            }
        }
    }

    output
}
