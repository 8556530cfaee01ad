// # DNS Provider Trait
//
// Defines the interface for pushing the current address to the
// dynamic-DNS provider.
//
// ## Implementations
//
// - ddnss.de style `upd.php`: `ddnss-provider` crate
//
// ## Usage
//
// ```rust,ignore
// use ddnss_core::{DnsProvider, ProviderReply};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     match provider.update_record().await? {
//         ProviderReply::Accepted { message } => println!("{}", message),
//         ProviderReply::Rejected { fragments } => eprintln!("{:?}", fragments),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// What the provider said about an update request that reached it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderReply {
    /// The provider confirmed the update
    Accepted {
        /// The confirmation text, e.g. "Updated 1 hostname."
        message: String,
    },
    /// The provider answered but did not apply the update
    Rejected {
        /// Human readable text pulled out of the provider's error page
        fragments: Vec<String>,
    },
}

/// Trait for DNS provider implementations
///
/// # Trust Level: Untrusted
///
/// Providers are isolated, stateless and single-shot:
/// - ✅ Perform one HTTP call to their own endpoint per invocation
/// - ✅ Classify the provider's answer
/// - ❌ Decide whether an update is needed (owned by `RunController`)
/// - ❌ Touch the state store or the journal (owned by `RunController`)
/// - ❌ Retry (the next attempt is the next scheduled run)
///
/// The provider reads the address from the request's source; the caller
/// does not pass one.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Ask the provider to point the configured hostnames at the caller
    ///
    /// # Returns
    ///
    /// - `Ok(ProviderReply)`: the provider answered (accepted or rejected)
    /// - `Err(Error::Transport(..))`: the request did not complete
    async fn update_record(&self) -> Result<ProviderReply, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
