// Fragment fetching - the one place the client touches the network
//
// The trait is the seam: the engine and router only see "text for a URL or
// an error", which keeps navigation testable without a server. The real
// implementation rides reqwest and disables caching so every navigation
// re-reads the source of truth.

use anyhow::{ensure, Context, Result};
use reqwest::header::{HeaderValue, CACHE_CONTROL};
use std::future::Future;

/// Fetches fragment documents by URL
pub trait FragmentFetcher: Send + Sync + 'static {
    fn fetch(&self, url: String) -> impl Future<Output = Result<String>> + Send;
}

/// HTTP fetcher over reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentFetcher for HttpFetcher {
    async fn fetch(&self, url: String) -> Result<String> {
        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        ensure!(status.is_success(), "fragment {url} returned {status}");

        response
            .text()
            .await
            .with_context(|| format!("reading body of {url} failed"))
    }
}
