//! Full-text search over documentation fragments.
//!
//! This module provides field-weighted token search, including tokenization,
//! indexing, scoring, snippet extraction and query evaluation.

// Module declarations
pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod snippet;
pub(crate) mod tokenize;

// Public re-exports (used via lib.rs)
pub use index::{CategoryBucket, DocIndex, Field};
pub use query::{Limit, ScoredResult, SearchOptions, Suggestion, browse, search, suggest};
pub use scoring::relative_relevance;
pub use snippet::{Highlight, Snippet, build_snippet};
pub use tokenize::{TokenSpan, Tokenizer};
