//! Field-partitioned inverted index over a documentation corpus.

use crate::entry::{Entry, EntryId};
use ahash::AHashMap;
use std::sync::Arc;
use xxhash_rust::xxh3::Xxh3;

use super::tokenize::Tokenizer;

/// Entry field a token was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Category,
    Text,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Title, Self::Category, Self::Text];

    const fn slot(self) -> usize {
        match self {
            Self::Title => 0,
            Self::Category => 1,
            Self::Text => 2,
        }
    }
}

/// Map from token to ascending, deduplicated entry ids.
type Postings = AHashMap<String, Vec<EntryId>>;

/// Entries sharing one category key, in corpus order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBucket {
    /// Label of the first entry seen with this key.
    pub label: String,
    pub key: String,
    pub entries: Vec<EntryId>,
}

/// Immutable search index. Built once per corpus load and shared by `Arc`.
#[derive(Debug)]
pub struct DocIndex {
    entries: Vec<Arc<Entry>>,
    fields: [Postings; 3],
    categories: Vec<CategoryBucket>,
    category_slots: AHashMap<String, usize>,
    pages: Vec<String>,
    tokenizer: Tokenizer,
    digest: u64,
}

impl DocIndex {
    /// Index `entries`, preserving their order as ids.
    pub fn build(entries: Vec<Entry>, tokenizer: Tokenizer) -> Self {
        let start = std::time::Instant::now();
        let mut builder = IndexBuilder::new(tokenizer);
        for entry in entries {
            builder.add(entry);
        }
        let index = builder.finalize();

        tracing::info!(
            "Built search index: {} entries, {} title / {} category / {} text terms, {} categories in {:?}",
            index.len(),
            index.term_count(Field::Title),
            index.term_count(Field::Category),
            index.term_count(Field::Text),
            index.categories.len(),
            start.elapsed()
        );

        index
    }

    /// An index with no entries. Every query against it is empty.
    pub fn empty() -> Self {
        IndexBuilder::new(Tokenizer::default()).finalize()
    }

    /// Entry ids containing `term` in `field`, ascending.
    pub fn postings(&self, field: Field, term: &str) -> &[EntryId] {
        self.fields[field.slot()]
            .get(term)
            .map_or(&[], Vec::as_slice)
    }

    pub fn entry(&self, id: EntryId) -> Option<&Arc<Entry>> {
        self.entries.get(id as usize)
    }

    pub fn entries(&self) -> &[Arc<Entry>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct tokens indexed for `field`.
    pub fn term_count(&self, field: Field) -> usize {
        self.fields[field.slot()].len()
    }

    /// Bucket for a category, looked up case-insensitively.
    pub fn category(&self, name: &str) -> Option<&CategoryBucket> {
        let key = name.trim().to_lowercase();
        self.category_slots
            .get(&key)
            .map(|&slot| &self.categories[slot])
    }

    /// All category buckets in order of first appearance.
    pub fn categories(&self) -> &[CategoryBucket] {
        &self.categories
    }

    /// Distinct page names in order of first appearance.
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    /// The tokenizer the index was built with. Queries must use the same one.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// xxh3 digest of every entry's fields, in order.
    pub fn digest(&self) -> u64 {
        self.digest
    }
}

/// Accumulates postings one entry at a time.
struct IndexBuilder {
    entries: Vec<Arc<Entry>>,
    fields: [Postings; 3],
    categories: Vec<CategoryBucket>,
    category_slots: AHashMap<String, usize>,
    pages: Vec<String>,
    seen_pages: ahash::AHashSet<String>,
    tokenizer: Tokenizer,
    hasher: Xxh3,
}

impl IndexBuilder {
    fn new(tokenizer: Tokenizer) -> Self {
        Self {
            entries: Vec::new(),
            fields: Default::default(),
            categories: Vec::new(),
            category_slots: AHashMap::new(),
            pages: Vec::new(),
            seen_pages: ahash::AHashSet::new(),
            tokenizer,
            hasher: Xxh3::new(),
        }
    }

    fn add(&mut self, entry: Entry) {
        let Ok(id) = EntryId::try_from(self.entries.len()) else {
            tracing::warn!(
                "Corpus exceeds {} entries, ignoring {}",
                EntryId::MAX,
                entry.location()
            );
            return;
        };

        self.add_terms(Field::Title, entry.title(), id);
        self.add_terms(Field::Category, entry.category().label(), id);
        self.add_terms(Field::Text, entry.text(), id);

        let key = entry.category().key();
        let slot = *self
            .category_slots
            .entry(key.to_string())
            .or_insert_with(|| {
                self.categories.push(CategoryBucket {
                    label: entry.category().label().to_string(),
                    key: key.to_string(),
                    entries: Vec::new(),
                });
                self.categories.len() - 1
            });
        self.categories[slot].entries.push(id);

        if self.seen_pages.insert(entry.page().to_string()) {
            self.pages.push(entry.page().to_string());
        }

        for part in [
            entry.location(),
            entry.page(),
            entry.title(),
            entry.category().label(),
            entry.text(),
        ] {
            self.hasher.update(part.as_bytes());
            self.hasher.update(&[0]);
        }

        self.entries.push(Arc::new(entry));
    }

    fn add_terms(&mut self, field: Field, text: &str, id: EntryId) {
        let postings = &mut self.fields[field.slot()];
        for term in self.tokenizer.tokens(text) {
            let ids = postings.entry(term).or_default();
            // Ids arrive in ascending order, so a repeat within one entry is always last.
            if ids.last() != Some(&id) {
                ids.push(id);
            }
        }
    }

    fn finalize(self) -> DocIndex {
        DocIndex {
            entries: self.entries,
            fields: self.fields,
            categories: self.categories,
            category_slots: self.category_slots,
            pages: self.pages,
            tokenizer: self.tokenizer,
            digest: self.hasher.digest(),
        }
    }
}
