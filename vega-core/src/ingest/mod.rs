//! The ingestion pipeline: plan discover URLs, fetch under a bounded
//! worker pool, normalize, release-filter, rank.

pub mod fetch;
pub mod normalize;
pub mod pins;
pub mod rank;

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use tracing::{info, warn};

use vega_model::DisplayRecord;

use crate::cache::CacheGateway;
use crate::catalog::{CatalogStore, FIRST_PAGE_SIZE};
use crate::config::CatalogConfig;
use crate::decor::assign_platform;
use crate::providers::tmdb::{DiscoverPage, TmdbProvider};
use crate::snapshot;
use fetch::{FetchPool, HttpFetch, ReqwestFetch};
use pins::PinPolicy;

/// Where the catalog contents came from on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Pre-generated `movies.json` snapshot.
    Snapshot,
    /// Local cache within its TTL.
    Cache,
    /// Fresh fetch from the discovery API.
    Live,
    /// Everything failed; the catalog is empty but displayable.
    Empty,
}

/// Owns the provider, the fetch pool, and the config for ingest runs.
#[derive(Debug)]
pub struct Ingestor<F> {
    fetch: Arc<F>,
    pool: FetchPool<F>,
    provider: TmdbProvider,
    config: CatalogConfig,
}

impl Ingestor<ReqwestFetch> {
    pub fn new(config: CatalogConfig) -> Self {
        Self::with_fetcher(Arc::new(ReqwestFetch::default()), config)
    }
}

impl<F: HttpFetch + 'static> Ingestor<F> {
    pub fn with_fetcher(fetch: Arc<F>, config: CatalogConfig) -> Self {
        let pool = FetchPool::new(Arc::clone(&fetch), &config);
        let provider = TmdbProvider::new(&config);
        Self {
            fetch,
            pool,
            provider,
            config,
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// The discover request plan: recent years get the full page count,
    /// older years down to `year_start` a single page each.
    pub fn plan_discover_urls(&self, today: NaiveDate) -> Vec<String> {
        let current_year = today.year();
        let mut urls = Vec::new();

        for year in (self.config.full_load_floor..=current_year).rev() {
            for page in 1..=self.config.pages_per_year {
                urls.push(self.provider.discover_movies_by_year_url(year, page, today));
            }
        }
        for year in (self.config.year_start..self.config.full_load_floor).rev() {
            urls.push(self.provider.discover_movies_by_year_url(year, 1, today));
        }

        urls
    }

    /// Run the full ingest: every planned page, accumulated out of
    /// order, then ranked. Total API failure yields an empty list.
    pub async fn run(&self, today: NaiveDate) -> Vec<DisplayRecord> {
        let urls = self.plan_discover_urls(today);
        info!(requests = urls.len(), "starting ingest run");
        let collected = self.fetch_and_collect(urls, today).await;
        let ranked = rank::rank(collected);
        info!(total = ranked.len(), "ingest run complete");
        ranked
    }

    /// Fast bootstrap list: one region=IN discover page per preferred
    /// language, merged and ranked, truncated to the first-page size.
    pub async fn regional_first_page(&self, today: NaiveDate) -> Vec<DisplayRecord> {
        let urls: Vec<String> = self
            .config
            .preferred_langs
            .iter()
            .map(|lang| self.provider.regional_discover_url(lang, today))
            .collect();

        let collected = self.fetch_and_collect(urls, today).await;
        let mut ranked = rank::rank(collected);
        ranked.truncate(FIRST_PAGE_SIZE);
        ranked
    }

    async fn fetch_and_collect(&self, urls: Vec<String>, today: NaiveDate) -> Vec<DisplayRecord> {
        let genres = Arc::new(self.provider.fetch_genre_map(&self.pool).await);
        let accumulator: Arc<Mutex<Vec<DisplayRecord>>> = Arc::new(Mutex::new(Vec::new()));

        let handler_acc = Arc::clone(&accumulator);
        let decorate = self.config.decorate_platforms;
        let handler = move |value: serde_json::Value, url: &str| {
            let page = match serde_json::from_value::<DiscoverPage>(value) {
                Ok(page) => page,
                Err(err) => {
                    warn!(%url, error = %err, "discover page malformed; skipped");
                    return;
                }
            };

            let mut batch = Vec::with_capacity(page.results.len());
            for raw in &page.results {
                let fallback_year = raw.release_date.as_deref().and_then(|d| d.get(..4));
                let mut record = normalize::normalize(raw, fallback_year, &genres);
                if !record.is_released(today) {
                    continue;
                }
                if decorate {
                    assign_platform(&mut record, &mut rand::rng());
                }
                batch.push(record);
            }

            // Append-only accumulation; interleaving across workers is
            // fine because the rank stage imposes the final order.
            if let Ok(mut acc) = handler_acc.lock() {
                acc.extend(batch);
            }
        };

        let report = self.pool.fetch_all(urls, handler).await;
        info!(
            completed = report.completed,
            dropped = report.dropped,
            timed_out = report.timed_out,
            "fetch pool drained"
        );

        accumulator
            .lock()
            .map(|mut acc| std::mem::take(&mut *acc))
            .unwrap_or_default()
    }

    /// Startup policy: snapshot, then cache, then live fetch; the first
    /// source that yields records wins. A live success is written back
    /// to the cache. Always leaves the store in a displayable state.
    pub async fn bootstrap(
        &self,
        store: &mut CatalogStore,
        cache: &CacheGateway,
        now: DateTime<Utc>,
    ) -> CatalogSource {
        let today = now.date_naive();
        let now_ms = now.timestamp_millis();
        let policy = PinPolicy::from_config(&self.config);

        if let Some(url) = self.config.static_movies_url.as_deref() {
            if let Some(list) = snapshot::fetch_static_movies(self.fetch.as_ref(), url, now_ms).await
            {
                info!(count = list.len(), "catalog loaded from static snapshot");
                store.replace_canonical(list, today, Some(&policy));
                return CatalogSource::Snapshot;
            }
        }

        if let Some(list) = cache.load(now_ms).await {
            info!(count = list.len(), "catalog loaded from cache");
            store.replace_canonical(list, today, Some(&policy));
            return CatalogSource::Cache;
        }

        let list = self.run(today).await;
        if list.is_empty() {
            warn!("all catalog sources failed; serving an empty catalog");
            store.replace_canonical(Vec::new(), today, None);
            return CatalogSource::Empty;
        }

        store.replace_canonical(list, today, Some(&policy));
        cache.save(store.canonical(), now_ms).await;
        CatalogSource::Live
    }
}
