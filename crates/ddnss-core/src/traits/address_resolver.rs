// # Address Resolver Trait
//
// Defines the interface for learning the caller's current public address.
//
// ## Implementations
//
// - HTTP "what is my IP" page: `ddnss-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddnss_core::AddressResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* AddressResolver implementation */;
//
//     let current_ip = resolver.resolve().await?;
//     println!("Public address: {}", current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::address::IpAddress;

/// Trait for address resolver implementations
///
/// A resolver makes exactly one request per call and reports what it saw.
/// It does not compare against stored state and does not log to the
/// operator journal; the run controller owns both.
///
/// # Errors
///
/// - `Error::Transport(..)`: the request failed, classified by kind
/// - `Error::NoAddressFound`: the response held no IPv4-shaped token
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Fetch the current public address
    async fn resolve(&self) -> Result<IpAddress, crate::Error>;

    /// Name of the source (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
