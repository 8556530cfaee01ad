// # File IP Store
//
// File-based implementation of StateStore.
//
// ## File Format
//
// A single line holding the last accepted address:
//
// ```text
// 203.0.113.7
// ```
//
// ## Crash Safety
//
// - Atomic writes: new content goes to `<file>.tmp`, then is renamed over the original
// - The file must exist before the first run; its absence is caught by the
//   preflight gate, not treated as "no previous address"
// - An empty (or whitespace-only) file means "no previous address", so a
//   freshly touched file leads to an update on the first run

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::address::IpAddress;
use crate::traits::state_store::StateStore;

/// File-based IP store
///
/// # Example
///
/// ```rust,no_run
/// use ddnss_core::state::FileIpStore;
/// use ddnss_core::traits::StateStore;
/// use ddnss_core::IpAddress;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileIpStore::new("/var/lib/ddnss/ipFile.txt");
///
///     store.write_last_ip(&IpAddress::parse("1.2.3.4")?).await?;
///     assert_eq!(store.read_last_ip().await?, Some(IpAddress::parse("1.2.3.4")?));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpStore {
    path: PathBuf,
}

impl FileIpStore {
    /// Create a store backed by `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl StateStore for FileIpStore {
    async fn read_last_ip(&self) -> Result<Option<IpAddress>, Error> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to read IP file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let content = content.trim_end_matches(['\n', '\r']);
        if content.trim().is_empty() {
            tracing::debug!("IP file {} is empty", self.path.display());
            return Ok(None);
        }

        IpAddress::parse(content).map(Some).map_err(|_| {
            Error::state_store(format!(
                "IP file {} does not hold an address: {:?}",
                self.path.display(),
                content
            ))
        })
    }

    async fn write_last_ip(&self, ip: &IpAddress) -> Result<(), Error> {
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(format!("{}\n", ip).as_bytes())
                .await
                .map_err(|e| {
                    Error::state_store(format!(
                        "Failed to write to temp file {}: {}",
                        temp_path.display(),
                        e
                    ))
                })?;

            file.sync_all().await.map_err(|e| {
                Error::state_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::state_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("IP file written: {}", self.path.display());
        Ok(())
    }
}
