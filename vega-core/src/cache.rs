//! TTL-bounded local cache for the normalized catalog.
//!
//! A thin typed wrapper over `cacache`. Read and write failures are
//! absorbed here: a bad read is a cache miss, a bad write is a no-op,
//! and ingestion proceeds either way.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use vega_model::DisplayRecord;

/// Versioned cache key; bump on incompatible record-shape changes.
pub const CACHE_KEY: &str = "vega_cached_movies_v1";

/// Entry lifetime: 24 hours, in epoch milliseconds.
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp: i64,
    movies: Vec<DisplayRecord>,
}

#[derive(Debug, Clone)]
pub struct CacheGateway {
    root: PathBuf,
}

impl CacheGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the cached list. `None` on a miss, a malformed entry, or an
    /// entry older than the TTL. `now_ms` is injected for determinism.
    pub async fn load(&self, now_ms: i64) -> Option<Vec<DisplayRecord>> {
        let bytes = match cacache::read(&self.root, CACHE_KEY).await {
            Ok(bytes) => bytes,
            Err(cacache::Error::EntryNotFound(_, _)) => return None,
            Err(err) => {
                warn!(error = %err, "cache read failed; treating as miss");
                return None;
            }
        };

        let entry: CacheEntry = match serde_json::from_slice(&bytes) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "cache entry malformed; treating as miss");
                return None;
            }
        };

        if now_ms.saturating_sub(entry.timestamp) > CACHE_TTL_MS {
            debug!(age_ms = now_ms - entry.timestamp, "cache entry expired");
            return None;
        }

        Some(entry.movies)
    }

    /// Overwrite the cache with the given list, stamped `now_ms`.
    /// Best-effort: a failed write is logged and otherwise ignored.
    pub async fn save(&self, movies: &[DisplayRecord], now_ms: i64) {
        let entry = CacheEntry {
            timestamp: now_ms,
            movies: movies.to_vec(),
        };

        let bytes = match serde_json::to_vec(&entry) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(error = %err, "cache entry serialization failed; skipping write");
                return;
            }
        };

        if let Err(err) = cacache::write(&self.root, CACHE_KEY, &bytes).await {
            warn!(error = %err, "cache write failed; continuing without cache");
        }
    }
}
