// src/feed/client.rs
use metrics::{counter, histogram};
use thiserror::Error;

use crate::config::FeedConfig;
use crate::feed::assemble::{parse_feed, parse_profile, Article, Profile};
use crate::feed::ensure_metrics_described;

/// Errors surfaced by the upstream feed retrieval.
///
/// One attempt per call: a failed fetch is reported, not retried. Partial or
/// malformed feed *content* is never an error here; the assembler degrades
/// field-by-field instead.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (DNS, connection, TLS, transport timeout).
    #[error("Failed to fetch RSS feed: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream answered with a non-success status.
    #[error("Failed to fetch RSS feed: {status}")]
    Status { status: reqwest::StatusCode },
}

/// HTTP client for the well-known per-user Medium feed URL.
///
/// The base URL is configurable so tests can point it at a local mock server.
pub struct MediumClient {
    client: reqwest::Client,
    base_url: String,
    max_description_len: usize,
}

impl MediumClient {
    pub fn from_config(config: &FeedConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_description_len: config.max_description_len,
        }
    }

    fn feed_url(&self, username: &str) -> String {
        format!("{}/feed/@{}", self.base_url, username)
    }

    async fn fetch_document(&self, username: &str) -> Result<String, FetchError> {
        ensure_metrics_described();
        let t0 = std::time::Instant::now();
        let url = self.feed_url(username);

        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = ?e, username, "feed http error");
                counter!("feed_fetch_errors_total").increment(1);
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, username, "feed upstream returned non-success");
            counter!("feed_fetch_errors_total").increment(1);
            return Err(FetchError::Status { status });
        }

        let body = resp.text().await?;

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("feed_fetch_ms").record(ms);
        counter!("feed_fetch_total").increment(1);

        Ok(body)
    }

    /// Fetch and normalize at most `limit` articles for `username`.
    pub async fn fetch_articles(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let body = self.fetch_document(username).await?;
        Ok(parse_feed(&body, limit, self.max_description_len))
    }

    /// Fetch channel-level profile metadata for `username`.
    pub async fn fetch_profile(&self, username: &str) -> Result<Profile, FetchError> {
        let body = self.fetch_document(username).await?;
        Ok(parse_profile(&body))
    }
}
