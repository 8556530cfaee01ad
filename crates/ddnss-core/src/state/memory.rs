// # Memory IP Store
//
// In-memory implementation of StateStore.
//
// ## Purpose
//
// Holds the last accepted address for the lifetime of the process only.
// Useful when embedding the run controller and in tests, where the
// number of writes is itself something to assert on.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

use crate::Error;
use crate::address::IpAddress;
use crate::traits::state_store::StateStore;

/// In-memory IP store
///
/// Clones share the same value and write counter.
///
/// # Example
///
/// ```rust
/// use ddnss_core::state::MemoryIpStore;
/// use ddnss_core::traits::StateStore;
/// use ddnss_core::IpAddress;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryIpStore::new(IpAddress::parse("1.2.3.4")?);
///     assert_eq!(store.read_last_ip().await?.unwrap().as_str(), "1.2.3.4");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryIpStore {
    inner: Arc<RwLock<Option<IpAddress>>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryIpStore {
    /// Create a store holding `ip`
    pub fn new(ip: IpAddress) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip))),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a store that holds no address yet
    pub fn empty() -> Self {
        Self {
            inner: Arc::new(RwLock::new(None)),
            writes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of successful `write_last_ip` calls
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StateStore for MemoryIpStore {
    async fn read_last_ip(&self) -> Result<Option<IpAddress>, Error> {
        Ok(self.inner.read().await.clone())
    }

    async fn write_last_ip(&self, ip: &IpAddress) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
