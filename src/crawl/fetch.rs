// src/crawl/fetch.rs
// =============================================================================
// Page fetching for the crawler.
//
// The crawler only needs "give me the HTML behind this URL, or tell me it
// failed". That capability is the PageFetcher trait; HttpFetcher is the
// real implementation on top of reqwest.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;

use crate::checker::describe_error;
use crate::error::{LinkError, Result};

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Returns the document body, or LinkError::Fetch on any failure
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    // Fetches a web page and returns its HTML content
    //
    // Anything but a 2xx answer counts as a failure: we don't want to
    // harvest links from error pages.
    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| LinkError::fetch(url, describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::fetch(url, format!("HTTP {}", status)));
        }

        response
            .text()
            .await
            .map_err(|e| LinkError::fetch(url, describe_error(&e)))
    }
}
