//! Corpus loading: raw generator records to validated entries.

mod format;
mod loader;

pub use format::{parse_corpus, read_corpus};
pub use loader::{LoadedCorpus, load_records, normalize_record};
