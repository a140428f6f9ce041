//! The search engine: one active index, swapped whole on reload.
//!
//! Queries load the current index pointer once and work on that snapshot, so
//! a concurrent reload is never partially visible. Reloads are serialized by
//! a writer lock; readers never lock.

use crate::config::SearchConfig;
use crate::corpus::{LoadedCorpus, load_records};
use crate::entry::Entry;
use crate::search::{self, DocIndex, Field, Limit, ScoredResult, SearchOptions, Suggestion, Tokenizer};
use arc_swap::ArcSwap;
use serde::Serialize;
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Non-fatal observations about a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoadWarning {
    /// The load produced zero entries. Queries will return nothing.
    EmptyIndex,
    /// This many records were malformed and dropped.
    SkippedRecords(usize),
}

/// Outcome of a corpus load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub entry_count: usize,
    pub skipped: usize,
    /// Count of loads performed by this engine, including this one.
    pub generation: u64,
    /// xxh3 digest of the loaded entries.
    pub digest: u64,
    pub warnings: Vec<LoadWarning>,
}

/// One category as seen by `stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub key: String,
    pub count: usize,
}

/// Shape of the active index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub entry_count: usize,
    pub generation: u64,
    pub digest: u64,
    pub title_terms: usize,
    pub category_terms: usize,
    pub text_terms: usize,
    pub categories: Vec<CategoryCount>,
    pub pages: Vec<String>,
}

/// One published index, tagged with its load generation.
///
/// Everything a caller derives from a single `Snapshot` describes the same
/// corpus, even if a reload lands meanwhile.
#[derive(Debug)]
pub struct Snapshot {
    index: Arc<DocIndex>,
    generation: u64,
}

impl Snapshot {
    pub fn index(&self) -> &Arc<DocIndex> {
        &self.index
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> CorpusStats {
        let index = &self.index;
        CorpusStats {
            entry_count: index.len(),
            generation: self.generation,
            digest: index.digest(),
            title_terms: index.term_count(Field::Title),
            category_terms: index.term_count(Field::Category),
            text_terms: index.term_count(Field::Text),
            categories: index
                .categories()
                .iter()
                .map(|bucket| CategoryCount {
                    label: bucket.label.clone(),
                    key: bucket.key.clone(),
                    count: bucket.entries.len(),
                })
                .collect(),
            pages: index.pages().to_vec(),
        }
    }
}

#[derive(Debug)]
pub struct SearchEngine {
    config: SearchConfig,
    current: ArcSwap<Snapshot>,
    /// Writer lock; guards the generation counter.
    reload: Mutex<u64>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchEngine {
    /// An engine with an empty index at generation 0.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            current: ArcSwap::from_pointee(Snapshot {
                index: Arc::new(DocIndex::empty()),
                generation: 0,
            }),
            reload: Mutex::new(0),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Normalize `records`, index them, and make the result the active index.
    pub fn load<I>(&self, records: I) -> LoadReport
    where
        I: IntoIterator<Item = Value>,
    {
        self.load_corpus(load_records(records))
    }

    /// Index already-validated entries and publish them.
    pub fn load_corpus(&self, corpus: LoadedCorpus) -> LoadReport {
        let LoadedCorpus { entries, skipped } = corpus;

        let mut generation = self.reload.lock().unwrap_or_else(PoisonError::into_inner);
        let index = DocIndex::build(entries, Tokenizer::from_config(&self.config));

        let mut warnings = Vec::new();
        if skipped > 0 {
            warnings.push(LoadWarning::SkippedRecords(skipped));
        }
        if index.is_empty() {
            tracing::warn!("Corpus load produced no entries; searches will return nothing");
            warnings.push(LoadWarning::EmptyIndex);
        }

        let previous_digest = self.current.load().index.digest();
        let digest = index.digest();
        let entry_count = index.len();

        *generation += 1;
        self.current.store(Arc::new(Snapshot {
            index: Arc::new(index),
            generation: *generation,
        }));

        if digest == previous_digest {
            tracing::debug!("Reloaded corpus is unchanged (digest {:016x})", digest);
        }
        tracing::info!(
            "Published index generation {}: {} entries, {} skipped",
            *generation,
            entry_count,
            skipped
        );

        LoadReport {
            entry_count,
            skipped,
            generation: *generation,
            digest,
            warnings,
        }
    }

    /// The active index and its generation, loaded once.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// The active index. Holding it keeps it alive across reloads.
    pub fn snapshot(&self) -> Arc<DocIndex> {
        Arc::clone(&self.current.load().index)
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Ranked results for `query`; `limit <= 0` returns every match.
    pub fn search(&self, query: &str, limit: i64) -> Vec<ScoredResult> {
        self.search_with(query, &SearchOptions::with_limit(limit))
    }

    pub fn search_with(&self, query: &str, options: &SearchOptions) -> Vec<ScoredResult> {
        let index = self.snapshot();
        search::search(&index, &self.config, query, options)
    }

    /// Entries of one category in corpus order.
    pub fn browse(&self, category: &str, limit: i64) -> Vec<Arc<Entry>> {
        search::browse(&self.snapshot(), category, Limit::from(limit))
    }

    pub fn suggest(&self, query: &str, max: usize) -> Vec<Suggestion> {
        search::suggest(&self.snapshot(), query, max)
    }

    pub fn stats(&self) -> CorpusStats {
        self.current().stats()
    }
}
