// # TCP Connectivity Probe
//
// Resolves the host and opens (then drops) one TCP connection. The whole
// probe, resolution included, is bounded by a single timeout.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::traits::ConnectivityProbe;

/// Default probe port
pub const DEFAULT_PROBE_PORT: u16 = 80;

/// Default probe timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Connectivity probe backed by a plain TCP connect
#[derive(Debug, Clone)]
pub struct TcpConnectivityProbe {
    port: u16,
    timeout: Duration,
}

impl TcpConnectivityProbe {
    /// Create a probe for `port` bounded by `timeout`
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

impl Default for TcpConnectivityProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_PORT, DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl ConnectivityProbe for TcpConnectivityProbe {
    async fn is_reachable(&self, host: &str) -> bool {
        let target = (host, self.port);

        match timeout(self.timeout, TcpStream::connect(target)).await {
            Ok(Ok(_stream)) => {
                tracing::debug!("{}:{} is reachable", host, self.port);
                true
            }
            Ok(Err(e)) => {
                tracing::debug!("{}:{} is not reachable: {}", host, self.port, e);
                false
            }
            Err(_) => {
                tracing::debug!(
                    "{}:{} did not answer within {:?}",
                    host,
                    self.port,
                    self.timeout
                );
                false
            }
        }
    }
}
