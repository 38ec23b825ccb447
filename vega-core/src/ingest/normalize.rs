//! Raw record to canonical display record.
//!
//! Nothing in here can fail: every malformed or absent field degrades
//! to the documented default. Whether the result belongs in the catalog
//! (the release-date filter) is the caller's decision.

use vega_model::{DisplayRecord, MovieId, RawMovie, ReleaseDate};

use crate::providers::tmdb::{GenreMap, TmdbProvider, PLACEHOLDER_POSTER};

/// Truncation length for the overview summary inside `details`.
const OVERVIEW_SUMMARY_LEN: usize = 80;

const NO_DESCRIPTION: &str = "No description";
const FALLBACK_GENRE: &str = "Movie";
const FALLBACK_CATEGORY: &str = "hollywood";

/// The truncated overview used in card details: first 80 chars plus an
/// ellipsis marker, or the no-description marker when absent.
pub fn overview_summary(overview: &str) -> String {
    if overview.is_empty() {
        return NO_DESCRIPTION.to_string();
    }
    if overview.chars().count() > OVERVIEW_SUMMARY_LEN {
        let prefix: String = overview.chars().take(OVERVIEW_SUMMARY_LEN).collect();
        format!("{prefix}...")
    } else {
        overview.to_string()
    }
}

/// The details line shown on a card and matched by text filters.
pub fn build_details(genres: &[String], platform: Option<&str>, overview: &str) -> String {
    let genres = genres.join(", ");
    let summary = overview_summary(overview);
    match platform {
        Some(platform) => format!("{genres} | {platform} | {summary}"),
        None => format!("{genres} | {summary}"),
    }
}

fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Convert one untrusted raw record into the canonical display record.
///
/// `fallback_year` covers records whose own release date is absent;
/// callers pass the year of the discover query that produced the page.
pub fn normalize(raw: &RawMovie, fallback_year: Option<&str>, genres: &GenreMap) -> DisplayRecord {
    let poster = raw
        .poster_path
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(TmdbProvider::poster_url)
        .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string());

    let genre_labels: Vec<String> = raw
        .genre_ids
        .iter()
        .map(|id| genres.get(*id).unwrap_or(FALLBACK_GENRE).to_string())
        .collect();

    let category = genre_labels
        .first()
        .map(|g| g.to_lowercase())
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

    let raw_date = raw
        .release_date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .or(fallback_year)
        .unwrap_or("");

    let overview = raw.overview.clone().unwrap_or_default();
    let popularity = raw.popularity.filter(|p| p.is_finite()).unwrap_or(0.0);

    DisplayRecord {
        id: MovieId(raw.id),
        title: raw.title.clone(),
        poster,
        details: build_details(&genre_labels, None, &overview),
        date: ReleaseDate::parse(raw_date),
        popularity,
        language: raw
            .original_language
            .as_deref()
            .unwrap_or_default()
            .to_lowercase(),
        overview,
        category,
        genres: genre_labels,
        platform: None,
        link: format!("/movie/{}", slugify(&raw.title)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn genre_map() -> GenreMap {
        [(28u64, "Action".to_string()), (18, "Drama".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn full_record_normalizes_every_field() {
        let raw = RawMovie {
            id: 603,
            title: "The Matrix".into(),
            poster_path: Some("/x.jpg".into()),
            release_date: Some("1999-03-31".into()),
            popularity: Some(88.5),
            original_language: Some("EN".into()),
            overview: Some("Neo discovers the truth.".into()),
            genre_ids: vec![28, 18],
        };

        let record = normalize(&raw, None, &genre_map());
        assert_eq!(record.id, MovieId(603));
        assert_eq!(record.poster, "https://image.tmdb.org/t/p/w500/x.jpg");
        assert_eq!(record.date, ReleaseDate::parse("1999-03-31"));
        assert_eq!(record.language, "en");
        assert_eq!(record.category, "action");
        assert_eq!(record.genres, vec!["Action", "Drama"]);
        assert_eq!(record.details, "Action, Drama | Neo discovers the truth.");
        assert_eq!(record.link, "/movie/the-matrix");
    }

    #[test]
    fn empty_record_degrades_to_safe_defaults() {
        let record = normalize(&RawMovie::default(), None, &GenreMap::default());
        assert_eq!(record.poster, PLACEHOLDER_POSTER);
        assert_eq!(record.date, ReleaseDate::Unknown);
        assert_eq!(record.popularity, 0.0);
        assert_eq!(record.language, "");
        assert_eq!(record.category, "hollywood");
        assert_eq!(record.details, " | No description");
        assert!(!record.is_released(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()));
    }

    #[test]
    fn fallback_year_is_used_when_release_date_is_absent() {
        let raw = RawMovie {
            id: 1,
            title: "Old".into(),
            ..RawMovie::default()
        };
        let record = normalize(&raw, Some("2004"), &GenreMap::default());
        assert_eq!(record.date, ReleaseDate::Year(2004));
    }

    #[test]
    fn unknown_genre_ids_get_the_fallback_label() {
        let raw = RawMovie {
            id: 1,
            title: "X".into(),
            genre_ids: vec![9999],
            ..RawMovie::default()
        };
        let record = normalize(&raw, None, &genre_map());
        assert_eq!(record.genres, vec!["Movie"]);
        assert_eq!(record.category, "movie");
    }

    #[test]
    fn long_overview_is_truncated_with_ellipsis() {
        let overview = "x".repeat(100);
        let summary = overview_summary(&overview);
        assert_eq!(summary.chars().count(), 83);
        assert!(summary.ends_with("..."));
        // Short overviews pass through untouched.
        assert_eq!(overview_summary("short"), "short");
        assert_eq!(overview_summary(""), "No description");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let overview = "é".repeat(100);
        let summary = overview_summary(&overview);
        assert!(summary.starts_with(&"é".repeat(80)));
        assert!(summary.ends_with("..."));
    }
}
