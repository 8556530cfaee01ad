// # State Store Trait
//
// Defines the interface for the single persisted value: the last address
// the provider accepted.
//
// ## Implementations
//
// - File-based: `FileIpStore` (one line, `<ip>\n`)
// - In-memory: `MemoryIpStore` (embedding and tests)

use async_trait::async_trait;

use crate::address::IpAddress;

/// Trait for state store implementations
///
/// # Trust Level: Trusted (Core Component)
///
/// - ✅ Perform I/O for its own backing storage
/// - ❌ Decide when to write (owned by `RunController`)
///
/// The store is written only after the provider confirmed an update.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the last accepted address
    ///
    /// # Returns
    ///
    /// - `Ok(Some(IpAddress))`: the stored address
    /// - `Ok(None)`: the storage exists but holds no address yet (first run)
    /// - `Err(Error)`: the backing storage is missing, unreadable or holds garbage
    async fn read_last_ip(&self) -> Result<Option<IpAddress>, crate::Error>;

    /// Replace the stored address
    async fn write_last_ip(&self, ip: &IpAddress) -> Result<(), crate::Error>;
}
