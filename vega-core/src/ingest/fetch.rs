//! Bounded-concurrency fetch pool with retry and backoff.
//!
//! A fixed number of workers pull from a shared queue of URLs; each
//! worker claims the next index atomically, fetches with retry, and
//! hands the parsed JSON to the caller's handler. Completion order is
//! unspecified; the only ordering guarantee in the pipeline comes from
//! the rank stage afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::task::JoinSet;
use tracing::warn;

use crate::config::CatalogConfig;

#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    /// Timeout, connection failure, 429, or 5xx. Worth retrying.
    #[error("transient failure: {0}")]
    Transient(String),

    /// Any other 4xx. Returned as-is, never retried.
    #[error("permanent HTTP failure: status {0}")]
    Permanent(StatusCode),

    /// 2xx whose body was not the expected JSON.
    #[error("invalid JSON response: {0}")]
    Parse(String),
}

/// The HTTP seam. Production uses [`ReqwestFetch`]; tests substitute a
/// mock or a scripted stub.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError>;
}

/// Reqwest-backed fetcher classifying statuses into [`FetchError`].
#[derive(Debug, Clone, Default)]
pub struct ReqwestFetch {
    client: reqwest::Client,
}

impl ReqwestFetch {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<serde_json::Value>()
                .await
                .map_err(|e| FetchError::Parse(e.to_string()));
        }

        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(FetchError::Transient(format!("status {status}")));
        }

        Err(FetchError::Permanent(status))
    }
}

/// Outcome summary of one `fetch_all` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchReport {
    /// URLs whose handler ran.
    pub completed: usize,
    /// URLs dropped after exhausting retries or on permanent failure.
    pub dropped: usize,
    /// Whether the run deadline expired with work left in the queue.
    pub timed_out: bool,
}

/// Worker pool over a shared URL queue.
#[derive(Debug)]
pub struct FetchPool<F> {
    fetch: Arc<F>,
    concurrency: usize,
    retries: u32,
    base_delay: Duration,
    run_timeout: Duration,
}

impl<F> Clone for FetchPool<F> {
    fn clone(&self) -> Self {
        Self {
            fetch: Arc::clone(&self.fetch),
            concurrency: self.concurrency,
            retries: self.retries,
            base_delay: self.base_delay,
            run_timeout: self.run_timeout,
        }
    }
}

impl<F: HttpFetch + 'static> FetchPool<F> {
    pub fn new(fetch: Arc<F>, config: &CatalogConfig) -> Self {
        Self {
            fetch,
            concurrency: config.concurrency.max(1),
            retries: config.retries,
            base_delay: config.base_delay,
            run_timeout: config.run_timeout,
        }
    }

    /// Fetch every URL with at most `concurrency` requests in flight,
    /// invoking `handler` once per successful result as it completes.
    ///
    /// Individual failures are logged and skipped; they never abort the
    /// rest of the queue. The handler must tolerate arbitrary
    /// completion order.
    pub async fn fetch_all<H>(&self, urls: Vec<String>, handler: H) -> FetchReport
    where
        H: Fn(serde_json::Value, &str) + Send + Sync + 'static,
    {
        let urls = Arc::new(urls);
        let next = Arc::new(AtomicUsize::new(0));
        let completed = Arc::new(AtomicUsize::new(0));
        let dropped = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(handler);

        let mut workers = JoinSet::new();
        for worker_id in 0..self.concurrency {
            let pool = self.clone();
            let urls = Arc::clone(&urls);
            let next = Arc::clone(&next);
            let completed = Arc::clone(&completed);
            let dropped = Arc::clone(&dropped);
            let handler = Arc::clone(&handler);

            workers.spawn(async move {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(url) = urls.get(index) else { break };
                    match pool.fetch_with_retry(url).await {
                        Ok(value) => {
                            handler(value, url);
                            completed.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            warn!(worker_id, %url, error = %err, "request dropped");
                            dropped.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            });
        }

        let drained = tokio::time::timeout(self.run_timeout, async {
            while workers.join_next().await.is_some() {}
        })
        .await;

        let timed_out = drained.is_err();
        if timed_out {
            workers.abort_all();
            warn!(
                queued = urls.len(),
                completed = completed.load(Ordering::Relaxed),
                "ingest run deadline expired; keeping partial results"
            );
        }

        FetchReport {
            completed: completed.load(Ordering::Relaxed),
            dropped: dropped.load(Ordering::Relaxed),
            timed_out,
        }
    }

    /// One URL with the pool's retry policy, outside the worker queue.
    /// Used for prerequisite requests such as the genre list.
    pub async fn fetch_with_retry(&self, url: &str) -> Result<serde_json::Value, FetchError> {
        let mut attempt = 0u32;
        loop {
            match self.fetch.get_json(url).await {
                Ok(value) => return Ok(value),
                Err(FetchError::Transient(reason)) if attempt < self.retries => {
                    let delay = self.base_delay * 2u32.saturating_pow(attempt);
                    attempt += 1;
                    warn!(
                        %url,
                        attempt,
                        max = self.retries,
                        delay_ms = delay.as_millis() as u64,
                        %reason,
                        "transient fetch failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
