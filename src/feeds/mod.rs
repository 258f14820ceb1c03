//! Public data feeds backing the birthday and week-plan widgets.
//!
//! Both widgets share one [`FeedClient`]: a GET with caching disabled, a
//! status check, and a lenient JSON body. Payload shapes from the public
//! endpoints are not trusted; extraction happens field by field so a
//! missing or mistyped field degrades to empty content instead of a
//! deserialization failure.

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use thiserror::Error;

pub mod birthdays;
pub mod week_plan;

/// Feed fetch errors, one variant per failure class.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed payload: {0}")]
    Malformed(String),
}

/// Shared HTTP client for the public feeds.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        // The kiosk must never show stale feed data from an intermediary.
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    /// GET `url` and return the response body as loosely-typed JSON.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }
        Ok(response.json().await?)
    }
}

impl Default for FeedClient {
    fn default() -> Self {
        Self::new()
    }
}
