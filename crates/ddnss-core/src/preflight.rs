//! Startup precondition checks
//!
//! These run before the journal exists, so their failures cannot be
//! logged. The caller prints the diagnostic to stdout and exits.

use chrono::Local;
use std::path::Path;

use crate::config::Settings;
use crate::error::{Error, Result};

/// Format a startup diagnostic line
pub fn diagnostic(message: &str) -> String {
    format!("DEBUG {}: {}", Local::now().format("%Y-%m-%d %H:%M:%S%.6f"), message)
}

/// Fail with a precondition error if `path` is not an existing file
pub fn require_file(path: &Path, name: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::precondition(diagnostic(&format!(
            "{} does not exist",
            name
        ))))
    }
}

/// Check that the log file and the IP store both exist
///
/// The log file is checked first, matching the order the files are used.
pub fn check_files(settings: &Settings) -> Result<()> {
    require_file(&settings.logging.logfile, "LogFile")?;
    require_file(&settings.logging.ipfile, "IpFile")?;
    Ok(())
}
