//! Environment-driven configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

/// Languages whose records are eligible for the pinned first page.
pub const PREFERRED_LANGS: [&str; 5] = ["hi", "ta", "te", "ml", "kn"];

/// Catalog-wide knobs, gathered once at startup.
///
/// Every field has an environment override so deployments can tune the
/// ingest shape without a rebuild.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// TMDB credential. Optional here; the offline generation pass
    /// treats absence as fatal.
    pub api_key: Option<String>,
    /// Oldest year the discover plan reaches back to.
    pub year_start: i32,
    /// Years at or above this get `pages_per_year` pages; older years
    /// get a single page.
    pub full_load_floor: i32,
    pub pages_per_year: u32,
    /// Worker-pool size for the fetch queue.
    pub concurrency: usize,
    /// Extra attempts per URL on transient failure.
    pub retries: u32,
    /// Backoff base; the delay doubles each retry.
    pub base_delay: Duration,
    /// Deadline for a whole ingest run; partial results are kept.
    pub run_timeout: Duration,
    /// Root directory of the on-disk cache.
    pub cache_dir: PathBuf,
    /// Absolute URL of the pre-generated snapshot, when deployed.
    pub static_movies_url: Option<String>,
    pub preferred_langs: Vec<String>,
    /// Count English records with Hindi/dubbed markers as preferred.
    pub include_hindi_hollywood: bool,
    /// Attach cosmetic platform labels during ingest.
    pub decorate_platforms: bool,
    /// Optional discover defaults forwarded to TMDB.
    pub language: Option<String>,
    pub region: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            year_start: 2000,
            full_load_floor: 2015,
            pages_per_year: 3,
            concurrency: 4,
            retries: 3,
            base_delay: Duration::from_millis(500),
            run_timeout: Duration::from_secs(300),
            cache_dir: PathBuf::from(".vega-cache"),
            static_movies_url: None,
            preferred_langs: PREFERRED_LANGS.iter().map(|s| s.to_string()).collect(),
            include_hindi_hollywood: true,
            decorate_platforms: true,
            language: None,
            region: None,
        }
    }
}

impl CatalogConfig {
    /// The credential, or [`CatalogError::MissingCredential`] when
    /// absent. Only the offline generation pass treats that as fatal.
    ///
    /// [`CatalogError::MissingCredential`]: crate::error::CatalogError::MissingCredential
    pub fn require_api_key(&self) -> crate::error::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(crate::error::CatalogError::MissingCredential)
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("TMDB_API_KEY").ok().filter(|k| !k.is_empty()),
            year_start: env_parse("VEGA_YEAR_START", defaults.year_start),
            full_load_floor: env_parse("VEGA_FULL_LOAD_FLOOR", defaults.full_load_floor),
            pages_per_year: env_parse("VEGA_PAGES_PER_YEAR", defaults.pages_per_year),
            concurrency: env_parse("VEGA_MAX_CONCURRENT_REQUESTS", defaults.concurrency).max(1),
            retries: env_parse("VEGA_FETCH_RETRIES", defaults.retries),
            base_delay: Duration::from_millis(env_parse("VEGA_FETCH_BASE_DELAY_MS", 500)),
            run_timeout: Duration::from_secs(env_parse("VEGA_RUN_TIMEOUT_SECS", 300)),
            cache_dir: std::env::var("VEGA_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            static_movies_url: std::env::var("VEGA_STATIC_MOVIES_URL")
                .ok()
                .filter(|u| !u.is_empty()),
            preferred_langs: defaults.preferred_langs,
            include_hindi_hollywood: env_parse(
                "VEGA_INCLUDE_HINDI_HOLLYWOOD",
                defaults.include_hindi_hollywood,
            ),
            decorate_platforms: env_parse("VEGA_DECORATE_PLATFORMS", defaults.decorate_platforms),
            language: std::env::var("TMDB_LANG").ok(),
            region: std::env::var("TMDB_REGION").ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_catalog_constants() {
        let config = CatalogConfig::default();
        assert_eq!(config.year_start, 2000);
        assert_eq!(config.full_load_floor, 2015);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.retries, 3);
        assert_eq!(config.base_delay, Duration::from_millis(500));
        assert_eq!(config.preferred_langs, ["hi", "ta", "te", "ml", "kn"]);
    }
}
