//! Preferred-subset selection: the pinned first page.

use std::collections::HashSet;

use tracing::debug;
use vega_model::{DisplayRecord, MovieId};

use crate::config::CatalogConfig;

/// Which records qualify for the pinned first page.
#[derive(Debug, Clone)]
pub struct PinPolicy {
    pub preferred_langs: Vec<String>,
    /// Also admit English records whose text carries a Hindi/dubbed
    /// marker.
    pub include_hindi_hollywood: bool,
}

impl PinPolicy {
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self {
            preferred_langs: config.preferred_langs.clone(),
            include_hindi_hollywood: config.include_hindi_hollywood,
        }
    }
}

/// Whether a record qualifies for the preferred subset.
pub fn is_preferred(record: &DisplayRecord, policy: &PinPolicy) -> bool {
    let lang = record.language.to_lowercase();
    if policy.preferred_langs.iter().any(|l| l == &lang) {
        return true;
    }
    if !policy.include_hindi_hollywood || lang != "en" {
        return false;
    }
    let text = format!("{} {} {}", record.title, record.overview, record.details).to_lowercase();
    text.contains("hindi") || text.contains("dubbed")
}

/// Pick the pinned ids from an already ranked list: the first
/// `page_size` preferred records, or the first `page_size` of the whole
/// list when nothing qualifies.
pub fn select_pinned(ranked: &[DisplayRecord], policy: &PinPolicy, page_size: usize) -> Vec<MovieId> {
    let preferred: Vec<MovieId> = ranked
        .iter()
        .filter(|record| is_preferred(record, policy))
        .take(page_size)
        .map(|record| record.id)
        .collect();

    if !preferred.is_empty() {
        debug!(count = preferred.len(), "pinned preferred subset selected");
        return preferred;
    }

    ranked.iter().take(page_size).map(|record| record.id).collect()
}

/// Overlay pinned ids onto a list: pinned records first in pinned
/// order, everything else after in its existing order, no duplicates.
/// Pinned ids absent from the list are skipped.
pub fn apply_pinned(list: Vec<DisplayRecord>, pinned: &[MovieId]) -> Vec<DisplayRecord> {
    if pinned.is_empty() {
        return list;
    }

    let pinned_set: HashSet<MovieId> = pinned.iter().copied().collect();
    let mut front: Vec<DisplayRecord> = Vec::with_capacity(pinned.len());
    for id in pinned {
        if let Some(record) = list.iter().find(|record| record.id == *id) {
            front.push(record.clone());
        }
    }

    let rest = list.into_iter().filter(|record| !pinned_set.contains(&record.id));
    front.extend(rest);
    front
}

#[cfg(test)]
mod tests {
    use super::*;
    use vega_model::ReleaseDate;

    fn record(id: u64, title: &str, language: &str, overview: &str) -> DisplayRecord {
        DisplayRecord {
            id: MovieId(id),
            title: title.to_string(),
            poster: String::new(),
            details: String::new(),
            date: ReleaseDate::parse("2024-01-01"),
            popularity: 0.0,
            language: language.to_string(),
            overview: overview.to_string(),
            category: String::new(),
            genres: vec![],
            platform: None,
            link: String::new(),
        }
    }

    fn policy() -> PinPolicy {
        PinPolicy {
            preferred_langs: vec!["hi".into(), "ta".into(), "te".into(), "ml".into(), "kn".into()],
            include_hindi_hollywood: true,
        }
    }

    #[test]
    fn preferred_languages_qualify() {
        assert!(is_preferred(&record(1, "X", "hi", ""), &policy()));
        assert!(is_preferred(&record(2, "Y", "ta", ""), &policy()));
        assert!(!is_preferred(&record(3, "Z", "fr", ""), &policy()));
    }

    #[test]
    fn english_needs_a_domestic_marker() {
        assert!(is_preferred(&record(1, "Movie (Hindi Dub)", "en", ""), &policy()));
        assert!(is_preferred(&record(2, "Movie", "en", "now dubbed in four languages"), &policy()));
        assert!(!is_preferred(&record(3, "Movie", "en", "plain overview"), &policy()));

        let strict = PinPolicy {
            include_hindi_hollywood: false,
            ..policy()
        };
        assert!(!is_preferred(&record(4, "Movie (Hindi Dub)", "en", ""), &strict));
    }

    #[test]
    fn selection_prefers_the_preferred_subset() {
        let ranked = vec![
            record(1, "A", "en", ""),
            record(2, "B", "hi", ""),
            record(3, "C", "ta", ""),
        ];
        assert_eq!(select_pinned(&ranked, &policy(), 40), vec![MovieId(2), MovieId(3)]);
    }

    #[test]
    fn selection_falls_back_to_the_head_of_the_ranked_list() {
        let ranked = vec![record(1, "A", "en", ""), record(2, "B", "fr", "")];
        assert_eq!(select_pinned(&ranked, &policy(), 1), vec![MovieId(1)]);
    }

    #[test]
    fn overlay_moves_pins_to_the_front_without_duplication() {
        let list: Vec<DisplayRecord> =
            ["A", "B", "C", "D", "E"]
                .iter()
                .enumerate()
                .map(|(i, t)| record(i as u64 + 1, t, "en", ""))
                .collect();

        // Canonical [A,B,C,D,E] with pins [C,A] => [C,A,B,D,E].
        let pinned = vec![MovieId(3), MovieId(1)];
        let overlaid = apply_pinned(list, &pinned);
        let titles: Vec<&str> = overlaid.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "A", "B", "D", "E"]);
    }

    #[test]
    fn overlay_skips_pins_missing_from_the_list() {
        let list = vec![record(1, "A", "en", ""), record(2, "B", "en", "")];
        let overlaid = apply_pinned(list, &[MovieId(9), MovieId(2)]);
        let titles: Vec<&str> = overlaid.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }
}
