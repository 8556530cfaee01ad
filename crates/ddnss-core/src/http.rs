//! Shared HTTP transport
//!
//! Both outbound calls (address lookup and provider update) go through
//! [`fetch_text`], so they fail the same way: a non-success status, a
//! network/protocol problem, or something unexpected.

use std::time::Duration;

use crate::error::{Error, Result, TransportFailure};

/// Default HTTP timeout for outbound requests (10 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Build an HTTP client with the given request timeout
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ddnss-updater/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}

/// Send a request and return the decoded body of a successful response
pub async fn fetch_text(request: reqwest::RequestBuilder) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| Error::Transport(classify(&e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::http_status(status.as_u16(), body));
    }

    response
        .text()
        .await
        .map_err(|e| Error::Transport(classify(&e)))
}

/// Map a `reqwest` error onto the transport taxonomy
pub fn classify(err: &reqwest::Error) -> TransportFailure {
    if let Some(status) = err.status() {
        return TransportFailure::HttpStatus {
            code: status.as_u16(),
            body: String::new(),
        };
    }

    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() || err.is_decode()
    {
        return TransportFailure::Network {
            reason: err.to_string(),
        };
    }

    TransportFailure::Unexpected {
        description: err.to_string(),
    }
}
