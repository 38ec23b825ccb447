//! Pre-generated static snapshot loader.
//!
//! Deployments may ship a `movies.json` produced by the offline
//! generation pass. Loading it is always a soft attempt: any failure
//! falls back to cache or live fetch.

use std::path::Path;

use tracing::{debug, warn};

use vega_model::DisplayRecord;

use crate::error::Result;
use crate::ingest::fetch::HttpFetch;

/// Fetch the snapshot with a cache-busting timestamp parameter.
/// `None` on any failure or an empty array.
pub async fn fetch_static_movies<F: HttpFetch>(
    fetch: &F,
    url: &str,
    now_ms: i64,
) -> Option<Vec<DisplayRecord>> {
    let separator = if url.contains('?') { '&' } else { '?' };
    let busted = format!("{url}{separator}t={now_ms}");

    let value = match fetch.get_json(&busted).await {
        Ok(value) => value,
        Err(err) => {
            debug!(%url, error = %err, "static snapshot unavailable");
            return None;
        }
    };

    let movies = match serde_json::from_value::<Vec<DisplayRecord>>(value) {
        Ok(movies) => movies,
        Err(err) => {
            warn!(%url, error = %err, "static snapshot malformed; ignoring");
            return None;
        }
    };

    if movies.is_empty() {
        debug!(%url, "static snapshot empty; ignoring");
        return None;
    }

    Some(movies)
}

/// Write the snapshot document the loader above consumes. Used by the
/// offline generation pass.
pub fn write_snapshot(path: &Path, movies: &[DisplayRecord]) -> Result<()> {
    let json = serde_json::to_vec_pretty(movies)?;
    std::fs::write(path, json)?;
    Ok(())
}
