//! The fetch capability consumed by the orchestrator.
//!
//! The core only needs `fetch(url) -> bytes`; transport policy (headers,
//! cookies, proxies, timeouts) belongs to the implementation. [`HttpFetcher`]
//! is the bundled reqwest-backed implementation with the browser-like
//! identification Scholar expects.

use crate::config::ScholarConfig;
use crate::cookies::CookieJar;
use crate::error::{Result, ScholarError};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Error produced by a fetch implementation.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Capability to retrieve the raw bytes behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError>;
}

/// reqwest-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
    cookie_header: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher for the given configuration.
    pub fn new(config: &ScholarConfig) -> Result<Self> {
        Self::with_proxy(config, None)
    }

    /// Builds a fetcher routing all requests through `proxy` if given.
    pub fn with_proxy(config: &ScholarConfig, proxy: Option<&str>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(30))
            .cookie_store(true);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                ScholarError::Config(format!("Invalid proxy URL '{}': {}", proxy_url, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| ScholarError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            cookie_header: stored_cookie_header(config),
        })
    }
}

/// Renders the configured cookie jar into a header value for the base host.
fn stored_cookie_header(config: &ScholarConfig) -> Option<String> {
    let path = config.cookie_file.clone()?;
    let host = Url::parse(&config.base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))?;

    let header = CookieJar::with_path(path).header_for(&host);
    if header.is_empty() {
        None
    } else {
        Some(header)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError> {
        debug!(url, "Fetching");

        let mut request = self
            .client
            .get(url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9");

        if let Some(header) = &self.cookie_header {
            request = request.header("Cookie", header);
        }

        let response = request.send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}
