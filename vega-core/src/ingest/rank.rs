//! Deduplication and the canonical catalog ordering.

use std::collections::HashSet;

use vega_model::{language_rank, DisplayRecord};

/// Dedup by id (first occurrence wins, later duplicates are discarded
/// outright) and impose the canonical total order:
///
/// 1. release date, most recent first (unknown dates sort last),
/// 2. popularity, descending,
/// 3. language rank, ascending (hi, en, rest),
/// 4. title, case-insensitive ascending.
///
/// The sort is stable, so the ordering is idempotent: ranking an
/// already ranked list is a no-op.
pub fn rank(records: Vec<DisplayRecord>) -> Vec<DisplayRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut unique: Vec<DisplayRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.id))
        .collect();

    unique.sort_by(|a, b| {
        b.date
            .sort_key()
            .cmp(&a.date.sort_key())
            .then_with(|| b.popularity.total_cmp(&a.popularity))
            .then_with(|| language_rank(&a.language).cmp(&language_rank(&b.language)))
            .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
    });

    unique
}
