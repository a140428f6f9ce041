//! Record normalization with bulk tolerance.

use crate::entry::Entry;
use crate::error::MalformedEntry;
use serde_json::{Map, Value};

/// Validated entries in source order, plus the number of dropped records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedCorpus {
    pub entries: Vec<Entry>,
    pub skipped: usize,
}

impl LoadedCorpus {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize every record in one pass, dropping the malformed ones.
pub fn load_records<I>(records: I) -> LoadedCorpus
where
    I: IntoIterator<Item = Value>,
{
    let records = records.into_iter();
    let mut corpus = LoadedCorpus {
        entries: Vec::with_capacity(records.size_hint().0),
        skipped: 0,
    };

    for (position, record) in records.enumerate() {
        match normalize_record(&record) {
            Ok(entry) => corpus.entries.push(entry),
            Err(e) => {
                tracing::debug!("Skipping record {}: {}", position, e);
                corpus.skipped += 1;
            }
        }
    }

    if corpus.skipped > 0 {
        tracing::warn!(
            "Skipped {} malformed record(s), kept {}",
            corpus.skipped,
            corpus.entries.len()
        );
    }

    corpus
}

/// Turn one raw record into an entry.
///
/// Fields that are missing, null, or not strings read as empty; extra fields
/// are ignored.
pub fn normalize_record(record: &Value) -> Result<Entry, MalformedEntry> {
    let Value::Object(fields) = record else {
        return Err(MalformedEntry::not_an_object());
    };

    Entry::new(
        string_field(fields, "location"),
        string_field(fields, "page"),
        string_field(fields, "title"),
        string_field(fields, "category"),
        string_field(fields, "text"),
    )
}

fn string_field<'a>(fields: &'a Map<String, Value>, name: &str) -> &'a str {
    fields.get(name).and_then(Value::as_str).unwrap_or_default()
}
