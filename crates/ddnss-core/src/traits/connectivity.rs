// # Connectivity Probe Trait
//
// Pre-flight check run before any HTTP call.

use async_trait::async_trait;

/// Answers "can the update service's host be reached right now"
///
/// Every failure (resolution, connect, timeout) is just `false`; no
/// reason is surfaced.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Check whether `host` accepts connections
    async fn is_reachable(&self, host: &str) -> bool;
}
