// # DDNSS Provider
//
// This crate provides the ddnss.de update provider for the DDNSS updater.
//
// ## Behavior
//
// - ✅ One HTTP request per `update_record()` call
// - ✅ HTTP timeout configured (10 seconds by default)
// - ✅ Classifies the answer: `Updated <n> hostname.` means accepted,
//   anything else is a rejection with the readable text of the error page
// - ❌ NO retry logic (the next attempt is the next scheduled run)
// - ❌ NO comparison with the stored address (owned by RunController)
//
// ## Security Requirements
//
// - The update key NEVER appears in logs or Debug output
// - Construction fails if the key is empty
//
// ## API Reference
//
// - Update: GET `/upd.php?key=<key>&host=<hostname>&host=<allhost>`
//   The provider takes the address from the request's source.

use async_trait::async_trait;
use ddnss_core::config::{BusinessSettings, NetworkSettings};
use ddnss_core::http::{build_client, fetch_text};
use ddnss_core::traits::{DnsProvider, ProviderReply};
use ddnss_core::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Duration;

/// Path of the update endpoint below the provider base URL
pub const UPDATE_PATH: &str = "/upd.php";

fn success_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Updated \d+ hostname.").expect("success pattern is valid"))
}

fn fragment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r">([^<>\\]+)<").expect("fragment pattern is valid"))
}

/// Pull the human readable text out of an HTML page
///
/// Returns every run of text between `>` and `<` that contains none of
/// `<`, `>` or `\`, trimmed, skipping runs that are only whitespace.
pub fn extract_fragments(html: &str) -> Vec<String> {
    fragment_pattern()
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .map(str::to_string)
        .collect()
}

/// Classify an update response body
pub fn classify_reply(body: &str) -> ProviderReply {
    match success_pattern().find(body) {
        Some(m) => ProviderReply::Accepted {
            message: m.as_str().to_string(),
        },
        None => ProviderReply::Rejected {
            fragments: extract_fragments(body),
        },
    }
}

/// ddnss.de update provider
///
/// # Trust Level: Untrusted
///
/// This provider is isolated, stateless, and single-shot.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the update key.
pub struct DdnssProvider {
    /// Update key
    /// ⚠️ NEVER log this value
    authentication_key: String,

    /// Primary hostname
    hostname: String,

    /// Second host parameter, sent verbatim
    allhost: String,

    /// Full URL of the update endpoint
    url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the update key
impl std::fmt::Debug for DdnssProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DdnssProvider")
            .field("authentication_key", &"<REDACTED>")
            .field("hostname", &self.hostname)
            .field("allhost", &self.allhost)
            .field("url", &self.url)
            .finish()
    }
}

impl DdnssProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `base_url`: provider base URL (e.g., "https://www.ddnss.de")
    /// - `authentication_key`: update key
    /// - `hostname`: primary hostname
    /// - `allhost`: second `host` parameter (usually "all")
    /// - `timeout`: request timeout
    pub fn new(
        base_url: &str,
        authentication_key: impl Into<String>,
        hostname: impl Into<String>,
        allhost: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let authentication_key = authentication_key.into();
        if authentication_key.is_empty() {
            return Err(Error::config("DDNSS update key cannot be empty"));
        }

        let hostname = hostname.into();
        if hostname.is_empty() {
            return Err(Error::config("DDNSS hostname cannot be empty"));
        }

        Ok(Self {
            authentication_key,
            hostname,
            allhost: allhost.into(),
            url: format!("{}{}", base_url.trim_end_matches('/'), UPDATE_PATH),
            client: build_client(timeout)?,
        })
    }

    /// Create a provider from the `[BUSINESS]` and `[NETWORK]` settings
    pub fn from_settings(business: &BusinessSettings, network: &NetworkSettings) -> Result<Self> {
        Self::new(
            &network.base_url,
            business.authentication_key.clone(),
            business.hostname.clone(),
            business.allhost.clone(),
            network.http_timeout(),
        )
    }
}

#[async_trait]
impl DnsProvider for DdnssProvider {
    async fn update_record(&self) -> Result<ProviderReply> {
        tracing::debug!(
            "Requesting update for {} (host={})",
            self.hostname,
            self.allhost
        );

        let request = self.client.get(&self.url).query(&[
            ("key", self.authentication_key.as_str()),
            ("host", self.hostname.as_str()),
            ("host", self.allhost.as_str()),
        ]);

        let body = fetch_text(request).await?;
        let reply = classify_reply(&body);

        match &reply {
            ProviderReply::Accepted { message } => tracing::debug!("Provider: {}", message),
            ProviderReply::Rejected { fragments } => {
                tracing::warn!("Provider rejected update ({} fragments)", fragments.len())
            }
        }

        Ok(reply)
    }

    fn provider_name(&self) -> &'static str {
        "ddnss"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddnss_core::TransportFailure;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> DdnssProvider {
        DdnssProvider::new(
            &server.uri(),
            "secret-key-123",
            "myhost.ddnss.de",
            "all",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_fragments_exclude_tags() {
        assert_eq!(
            extract_fragments("<html><body>Key invalid</body></html>"),
            vec!["Key invalid".to_string()]
        );
    }

    #[test]
    fn test_fragments_skip_whitespace_and_backslashes() {
        let html = "<html>\n<body>\n<h1>Error</h1>\n<p>Host not found</p>\n<i>a\\b</i></body></html>";
        assert_eq!(
            extract_fragments(html),
            vec!["Error".to_string(), "Host not found".to_string()]
        );
    }

    #[test]
    fn test_classify_success() {
        let reply = classify_reply("<html>Updated 2 hostname.</html>");
        assert_eq!(
            reply,
            ProviderReply::Accepted {
                message: "Updated 2 hostname.".to_string()
            }
        );
    }

    #[test]
    fn test_classify_rejection() {
        let reply = classify_reply("<html><body>Updated hostname failed</body></html>");
        assert_eq!(
            reply,
            ProviderReply::Rejected {
                fragments: vec!["Updated hostname failed".to_string()]
            }
        );
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = DdnssProvider::new("https://www.ddnss.de", "", "h", "all", Duration::from_secs(1));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_key_not_exposed_in_debug() {
        let provider = DdnssProvider::new(
            "https://www.ddnss.de",
            "secret-key-123",
            "myhost.ddnss.de",
            "all",
            Duration::from_secs(1),
        )
        .unwrap();

        let debug = format!("{:?}", provider);
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("<REDACTED>"));
        assert_eq!(provider.provider_name(), "ddnss");
    }

    #[tokio::test]
    async fn test_update_sends_key_and_hosts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPDATE_PATH))
            .and(query_param("key", "secret-key-123"))
            .and(query_param("host", "myhost.ddnss.de"))
            .and(query_param("host", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Updated 1 hostname."))
            .expect(1)
            .mount(&server)
            .await;

        let reply = provider_for(&server).update_record().await.unwrap();
        assert!(matches!(reply, ProviderReply::Accepted { .. }));
    }

    #[tokio::test]
    async fn test_update_rejected_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPDATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "<html><head><title>DDNSS</title></head><body><b>Key invalid</b></body></html>",
            ))
            .mount(&server)
            .await;

        let reply = provider_for(&server).update_record().await.unwrap();
        assert_eq!(
            reply,
            ProviderReply::Rejected {
                fragments: vec!["DDNSS".to_string(), "Key invalid".to_string()]
            }
        );
    }

    #[tokio::test]
    async fn test_update_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(UPDATE_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("denied"))
            .mount(&server)
            .await;

        let err = provider_for(&server).update_record().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Transport(TransportFailure::HttpStatus { code: 401, .. })
        ));
    }
}
