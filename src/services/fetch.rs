//! Vendor page fetching.

use std::time::Duration;

use async_trait::async_trait;

use crate::config::HttpConfig;
use crate::error::{AppError, Result};

/// Trait for fetching vendor product pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page body; a non-success status is an error.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP-backed page fetcher with an identifying client tag.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a configured fetcher.
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
