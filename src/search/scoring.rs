//! Search relevance and ranking rules.
//!
//! Scores are integer sums so that ties are exact and ordering is
//! reproducible; ties fall back to corpus order. Sums saturate at `u32::MAX`.

use crate::config::FieldWeights;
use crate::entry::{Entry, EntryId};
use std::cmp::Ordering;

use super::index::Field;

/// Weight contributed by one distinct query token found in `field`.
pub const fn field_weight(weights: &FieldWeights, field: Field) -> u32 {
    match field {
        Field::Title => weights.title,
        Field::Category => weights.category,
        Field::Text => weights.text,
    }
}

/// Bonus for the whole normalized query appearing contiguously.
///
/// `phrase` must already be lower-cased and whitespace-normalized.
pub fn phrase_bonus(weights: &FieldWeights, entry: &Entry, phrase: &str) -> u32 {
    if phrase.is_empty() {
        return 0;
    }

    let mut bonus: u32 = 0;
    if entry.title_lower().contains(phrase) {
        bonus = bonus.saturating_add(weights.title_phrase);
    }
    if entry.text_lower().contains(phrase) {
        bonus = bonus.saturating_add(weights.text_phrase);
    }
    bonus
}

/// Highest score first, then corpus order.
pub fn rank_order(a: (EntryId, u32), b: (EntryId, u32)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Relevance of `score` as a percentage of the best score in a result set.
pub fn relative_relevance(score: u32, best: u32) -> u8 {
    if best == 0 {
        return 0;
    }
    let percent = (u64::from(score) * 100 + u64::from(best) / 2) / u64::from(best);
    u8::try_from(percent.min(100)).unwrap_or(100)
}
