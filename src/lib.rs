//! Field-weighted full-text search over generated documentation sites.
//!
//! A corpus of documentation fragments is normalized into [`Entry`] values,
//! indexed per field, and queried through a [`SearchEngine`] whose active
//! index can be replaced atomically while queries run.

pub mod config;
pub mod corpus;
pub mod engine;
pub mod entry;
pub mod error;
pub mod search;
pub mod server;
pub mod tools;
pub mod tracing;

pub use config::{FieldWeights, SearchConfig};
pub use engine::{CategoryCount, CorpusStats, LoadReport, LoadWarning, SearchEngine, Snapshot};
pub use entry::{Category, CategoryKind, Entry, EntryId};
pub use error::{ConfigError, LoadError, MalformedEntry, Result, SearchError};
pub use search::{Limit, ScoredResult, SearchOptions, Suggestion};
pub use server::DocServer;
