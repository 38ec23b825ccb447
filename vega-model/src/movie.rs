//! Raw upstream records and the canonical display record.

use serde::{Deserialize, Serialize};

use crate::dates::ReleaseDate;
use crate::ids::MovieId;

/// A single item from the upstream discover `results` array.
///
/// Untrusted: every field except the id defaults when absent or
/// mistyped, so a malformed record never fails deserialization of the
/// surrounding page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
}

/// The canonical, fully defaulted record the catalog works with.
///
/// Produced by the normalizer, consumed by the ranker and the store.
/// Matches the JSON shape of the static snapshot file and the local
/// cache entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub id: MovieId,
    pub title: String,
    /// Resolved poster URL; a placeholder when the source had none.
    pub poster: String,
    /// Genre labels plus a truncated overview, for card display and
    /// text-matching filters.
    pub details: String,
    #[serde(default)]
    pub date: ReleaseDate,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub overview: String,
    /// Leading genre label, lowercased. Not authoritative.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Cosmetic streaming-platform tag. Assigned for display flavor
    /// only; unrelated to actual licensing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub link: String,
}

impl DisplayRecord {
    /// Whether this record counts as released relative to `today`.
    pub fn is_released(&self, today: chrono::NaiveDate) -> bool {
        self.date.is_released(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_movie_tolerates_sparse_json() {
        let raw: RawMovie = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(raw.id, 42);
        assert!(raw.title.is_empty());
        assert!(raw.release_date.is_none());
        assert!(raw.genre_ids.is_empty());
    }

    #[test]
    fn raw_movie_tolerates_null_fields() {
        let raw: RawMovie = serde_json::from_str(
            r#"{"id": 7, "title": "x", "poster_path": null, "popularity": null, "overview": null}"#,
        )
        .unwrap();
        assert_eq!(raw.id, 7);
        assert!(raw.popularity.is_none());
    }

    #[test]
    fn display_record_round_trips_snapshot_json() {
        let json = r#"{
            "id": 603,
            "title": "The Matrix",
            "poster": "https://image.tmdb.org/t/p/w500/x.jpg",
            "details": "Action | Neo discovers...",
            "date": "1999-03-31",
            "popularity": 88.5,
            "language": "en",
            "overview": "Neo discovers the truth.",
            "category": "action",
            "genres": ["Action"],
            "link": "/movie/the-matrix"
        }"#;
        let record: DisplayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, MovieId(603));
        assert!(record.platform.is_none());

        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["date"], "1999-03-31");
        assert!(back.get("platform").is_none());
    }
}
