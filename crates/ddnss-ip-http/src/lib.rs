// # HTTP Address Resolver
//
// This crate provides an HTTP-based address resolver for the DDNSS updater.
//
// ## Purpose
//
// Asks a "what is my IP" page for the caller's public address and picks the
// first dotted quad out of whatever the page returns (plain text or HTML).
//
// ## Architecture
//
// One GET per `resolve()` call, no caching, no polling. Failures are
// classified by `ddnss_core::http` and handed back to the run controller.

use async_trait::async_trait;
use ddnss_core::config::NetworkSettings;
use ddnss_core::http::{DEFAULT_HTTP_TIMEOUT, build_client, fetch_text};
use ddnss_core::traits::AddressResolver;
use ddnss_core::{Error, IpAddress, Result};

use std::time::Duration;

/// Path of the address page below the provider base URL
pub const ADDRESS_PATH: &str = "/meineip.php";

/// HTTP-based address resolver
#[derive(Debug, Clone)]
pub struct HttpAddressResolver {
    /// URL to fetch the address page from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpAddressResolver {
    /// Create a resolver for `<base_url>/meineip.php`
    ///
    /// # Parameters
    ///
    /// - `base_url`: provider base URL (e.g., "https://www.ddnss.de")
    /// - `timeout`: request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: format!("{}{}", base_url.trim_end_matches('/'), ADDRESS_PATH),
            client: build_client(timeout)?,
        })
    }

    /// Create a resolver from the `[NETWORK]` settings
    pub fn from_settings(network: &NetworkSettings) -> Result<Self> {
        Self::new(&network.base_url, network.http_timeout())
    }

    /// Create a resolver for the default provider with the default timeout
    pub fn ddnss() -> Result<Self> {
        Self::new("https://www.ddnss.de", DEFAULT_HTTP_TIMEOUT)
    }

    /// URL the resolver queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self) -> Result<IpAddress> {
        tracing::debug!("Fetching current IP from {}", self.url);

        let body = fetch_text(self.client.get(&self.url)).await?;

        IpAddress::extract(&body).ok_or_else(|| {
            tracing::warn!("No IPv4 literal in response ({} bytes)", body.len());
            Error::NoAddressFound
        })
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
