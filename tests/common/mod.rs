//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `abbreviations`: the two-entry DocStringExtensions corpus
//! - `manual`: a small Documenter-style manual spanning several pages and categories
//! - `loaded_engine`: a [`SearchEngine`] with `manual` already published
//!
//! [`CorpusDir`] provides a temp directory for tests that read corpus or
//! config files from disk.

use docsift::SearchEngine;
use rstest::fixture;
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A temporary directory holding corpus and config files.
///
/// Cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct CorpusDir {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl CorpusDir {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `content` to `name` and returns the full path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write {}: {}", path.display(), e));
        path
    }

    /// Writes `records` as a Documenter `search_index.js`.
    pub fn write_documenter(&self, name: &str, records: &[Value]) -> PathBuf {
        let body = json!({ "docs": records });
        self.write(name, &format!("var documenterSearchIndex = {}\n", body))
    }

    /// Writes `records` as a bare JSON array.
    pub fn write_json(&self, name: &str, records: &[Value]) -> PathBuf {
        self.write(name, &Value::Array(records.to_vec()).to_string())
    }
}

/// Builds one corpus record.
pub fn record(location: &str, page: &str, title: &str, category: &str, text: &str) -> Value {
    json!({
        "location": location,
        "page": page,
        "title": title,
        "category": category,
        "text": text,
    })
}

#[fixture]
pub fn abbreviations() -> Vec<Value> {
    vec![
        record(
            "#DocStringExtensions.SIGNATURES",
            "Home",
            "SIGNATURES",
            "constant",
            "An Abbreviation for including a simplified representation of all the method signature forms.",
        ),
        record(
            "#DocStringExtensions.README",
            "Home",
            "README",
            "constant",
            "An Abbreviation for including the package README.md.",
        ),
    ]
}

#[fixture]
pub fn manual() -> Vec<Value> {
    vec![
        record("index.html", "Home", "Home", "page", ""),
        record(
            "index.html#Getting-started",
            "Home",
            "Getting started",
            "section",
            "Install the package and load it. Searching works on any generated manual.",
        ),
        record(
            "api.html#Base.search",
            "API",
            "search",
            "function",
            "Search the index for entries matching a query and return them in order.",
        ),
        record(
            "api.html#Base.index",
            "API",
            "index",
            "function",
            "Build an index from a corpus of entries.",
        ),
        record(
            "api.html#Base.@doc",
            "API",
            "@doc",
            "macro",
            "Attach documentation to a binding. The docs are searched by the search tool.",
        ),
        record(
            "api.html#Base.Entry",
            "API",
            "Entry",
            "type",
            "One documentation fragment with a location, title and text.",
        ),
        record(
            "guide.html#Query-syntax",
            "Guide",
            "Query syntax",
            "section",
            "Any word of the query may match. Title matches rank above body matches.",
        ),
    ]
}

#[fixture]
pub fn loaded_engine(manual: Vec<Value>) -> Arc<SearchEngine> {
    docsift::tracing::init();
    let engine = SearchEngine::default();
    engine.load(manual);
    Arc::new(engine)
}

/// Titles of `results`, in rank order.
#[allow(dead_code)]
pub fn titles(results: &[docsift::ScoredResult]) -> Vec<String> {
    results.iter().map(|r| r.entry.title().to_string()).collect()
}
