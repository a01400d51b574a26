//! HTTP client for ontap.pl requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;
use wreq_util::Emulation;

/// Trait for fetching listing pages - enables mocking for tests.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the multitap directory listing.
    async fn directory(&self) -> Result<String>;

    /// Fetches a bar's tap list.
    async fn venue(&self, url: &str) -> Result<String>;

    /// Returns the directory URL, used to resolve relative bar links.
    fn directory_url(&self) -> &str;
}

/// ontap.pl HTTP client with browser impersonation.
pub struct OnTapClient {
    client: Client,
    directory_url: String,
}

impl OnTapClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_directory_url(config, config.directory_url.clone())
    }

    /// Creates a new client pointed at a custom directory URL (for testing).
    pub fn with_directory_url(config: &Config, directory_url: String) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self { client, directory_url })
    }

    /// Performs a GET request and returns the body of a successful response.
    async fn get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "pl-PL,pl;q=0.9,en;q=0.8")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        debug!("Response status: {} for {}", status, url);

        if !status.is_success() {
            anyhow::bail!("Request to {} failed with status: {}", url, status);
        }

        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl PageSource for OnTapClient {
    async fn directory(&self) -> Result<String> {
        info!("Fetching bar directory: {}", self.directory_url);
        self.get(&self.directory_url).await
    }

    async fn venue(&self, url: &str) -> Result<String> {
        debug!("Fetching tap list: {}", url);
        self.get(url).await
    }

    fn directory_url(&self) -> &str {
        &self.directory_url
    }
}
