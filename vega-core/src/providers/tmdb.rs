//! TMDB discover endpoint: URL planning, page shapes, genre labels.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;
use url::form_urlencoded;

use vega_model::RawMovie;

use crate::config::CatalogConfig;
use crate::ingest::fetch::{FetchPool, HttpFetch};

const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";
const TMDB_V3_BASE: &str = "https://api.themoviedb.org/3";
const POSTER_SIZE: &str = "w500";

/// Poster shown when the source record carries no poster path.
pub const PLACEHOLDER_POSTER: &str = "https://via.placeholder.com/500x750?text=No+Image";

/// One page of discover results. Pagination metadata is parsed but the
/// pipeline plans its own page set up front and does not walk it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<RawMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct GenreItem {
    id: u64,
    name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct GenreListResponse {
    #[serde(default)]
    genres: Vec<GenreItem>,
}

/// Genre id to display label. Missing entries fall back at the
/// normalizer, not here.
#[derive(Debug, Clone, Default)]
pub struct GenreMap(HashMap<u64, String>);

impl GenreMap {
    pub fn get(&self, id: u64) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl FromIterator<(u64, String)> for GenreMap {
    fn from_iter<I: IntoIterator<Item = (u64, String)>>(iter: I) -> Self {
        GenreMap(iter.into_iter().collect())
    }
}

/// Query planner for the TMDB v3 discover API.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    api_key: String,
    language: Option<String>,
    region: Option<String>,
}

impl TmdbProvider {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            language: config.language.clone(),
            region: config.region.clone(),
        }
    }

    /// Discover URL for one year/page, popularity-sorted, future
    /// releases excluded server-side as well as by the local filter.
    pub fn discover_movies_by_year_url(&self, year: i32, page: u32, today: NaiveDate) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("api_key", &self.api_key)
            .append_pair("primary_release_year", &year.to_string())
            .append_pair("sort_by", "popularity.desc")
            .append_pair("release_date.lte", &today.format("%Y-%m-%d").to_string())
            .append_pair("page", &page.max(1).to_string());
        if let Some(language) = self.language.as_deref() {
            query.append_pair("language", language);
        }
        if let Some(region) = self.region.as_deref() {
            query.append_pair("region", region);
        }
        format!("{TMDB_V3_BASE}/discover/movie?{}", query.finish())
    }

    /// First discover page for one original language in the IN region;
    /// feeds the fast regional bootstrap.
    pub fn regional_discover_url(&self, original_language: &str, today: NaiveDate) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("api_key", &self.api_key)
            .append_pair("region", "IN")
            .append_pair("with_original_language", original_language)
            .append_pair("sort_by", "popularity.desc")
            .append_pair("release_date.lte", &today.format("%Y-%m-%d").to_string())
            .append_pair("page", "1");
        format!("{TMDB_V3_BASE}/discover/movie?{}", query.finish())
    }

    pub fn genre_list_url(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("api_key", &self.api_key)
            .append_pair("language", "en-US");
        format!("{TMDB_V3_BASE}/genre/movie/list?{}", query.finish())
    }

    /// Fetch the genre label map with the pool's retry policy. Failure
    /// after retries degrades to an empty map; the normalizer's
    /// fallback labels cover the gap.
    pub async fn fetch_genre_map<F: HttpFetch + 'static>(&self, pool: &FetchPool<F>) -> GenreMap {
        let value = match pool.fetch_with_retry(&self.genre_list_url()).await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "genre list fetch failed; using empty genre map");
                return GenreMap::default();
            }
        };

        match serde_json::from_value::<GenreListResponse>(value) {
            Ok(response) => response
                .genres
                .into_iter()
                .map(|genre| (genre.id, genre.name))
                .collect(),
            Err(err) => {
                warn!(error = %err, "genre list response malformed; using empty genre map");
                GenreMap::default()
            }
        }
    }

    /// Build a poster URL from a poster path.
    pub fn poster_url(path: &str) -> String {
        format!("{TMDB_IMAGE_BASE}/{POSTER_SIZE}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use crate::ingest::fetch::{FetchError, MockHttpFetch};

    fn provider(key: &str) -> TmdbProvider {
        TmdbProvider::new(&CatalogConfig {
            api_key: Some(key.to_string()),
            ..CatalogConfig::default()
        })
    }

    #[test]
    fn discover_url_carries_year_page_and_release_ceiling() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let url = provider("k").discover_movies_by_year_url(2024, 2, today);
        assert!(url.starts_with("https://api.themoviedb.org/3/discover/movie?"));
        assert!(url.contains("api_key=k"));
        assert!(url.contains("primary_release_year=2024"));
        assert!(url.contains("sort_by=popularity.desc"));
        assert!(url.contains("release_date.lte=2026-02-10"));
        assert!(url.contains("page=2"));
    }

    #[test]
    fn regional_url_pins_region_and_language() {
        let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
        let url = provider("k").regional_discover_url("ta", today);
        assert!(url.contains("region=IN"));
        assert!(url.contains("with_original_language=ta"));
        assert!(url.contains("page=1"));
    }

    #[test]
    fn poster_url_uses_the_w500_template() {
        assert_eq!(
            TmdbProvider::poster_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn genre_fetch_retries_transient_failures() {
        let mut fetch = MockHttpFetch::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_inner = Arc::clone(&calls);
        fetch.expect_get_json().returning(move |_| {
            if calls_inner.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FetchError::Transient("status 429".into()))
            } else {
                Ok(serde_json::json!({"genres": [{"id": 28, "name": "Action"}]}))
            }
        });
        let config = CatalogConfig {
            retries: 3,
            base_delay: Duration::from_millis(500),
            ..CatalogConfig::default()
        };
        let pool = FetchPool::new(Arc::new(fetch), &config);

        let map = provider("k").fetch_genre_map(&pool).await;

        // A lone 429 must not cost the whole run its genre labels.
        assert_eq!(map.get(28), Some("Action"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn genre_fetch_degrades_to_an_empty_map_on_permanent_failure() {
        let mut fetch = MockHttpFetch::new();
        fetch
            .expect_get_json()
            .returning(|_| Err(FetchError::Permanent(reqwest::StatusCode::UNAUTHORIZED)));
        let pool = FetchPool::new(Arc::new(fetch), &CatalogConfig::default());

        let map = provider("k").fetch_genre_map(&pool).await;
        assert!(map.is_empty());
    }

    #[test]
    fn discover_page_tolerates_missing_fields() {
        let page: DiscoverPage = serde_json::from_str(r#"{"results": [{"id": 1}]}"#).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total_pages, 0);
    }
}
