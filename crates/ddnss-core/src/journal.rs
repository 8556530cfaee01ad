//! Operator journal
//!
//! The journal is the operator-facing record of every run: an append-only
//! text file with one entry per physical line. Entries are also mirrored
//! as `tracing` events so they show up in the process diagnostics.
//!
//! ## Notification policy
//!
//! - `ERROR` entries are mailed to the operator after they are written.
//! - A failed mail is written as a `DEBUG` entry and is **not** mailed.
//!   `DEBUG` entries never notify, so a broken relay ends the chain there.
//!
//! ## Line format
//!
//! ```text
//! ERROR 2026-10-19 12:00:00.123456 [update]: Key invalid
//!                                            Host unknown
//! ```
//!
//! Continuation lines are indented to the width of the entry header.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::traits::Notifier;

/// Subject of mails sent for `ERROR` entries
pub const ERROR_REPORT_SUBJECT: &str = "DDNSS-Updater Error Report";

/// Severity of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    /// Normal progress
    Info,
    /// Detail for troubleshooting; never notifies
    Debug,
    /// Failure; notifies the operator
    Error,
}

impl LogCategory {
    /// Upper-case name as written to the log file
    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Info => "INFO",
            LogCategory::Debug => "DEBUG",
            LogCategory::Error => "ERROR",
        }
    }
}

impl fmt::Display for LogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One journal entry
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity
    pub category: LogCategory,
    /// Short context label (e.g. "resolve", "update", "mail")
    pub hint: String,
    /// When the entry was created
    pub timestamp: DateTime<Local>,
    /// Free-form message, may span several lines
    pub message: String,
}

impl LogEntry {
    /// Create an entry stamped with the current local time
    pub fn new(category: LogCategory, hint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            category,
            hint: hint.into(),
            timestamp: Local::now(),
            message: message.into(),
        }
    }

    /// Render the entry as written to the log file (without trailing newline)
    pub fn render(&self) -> String {
        let header = format!(
            "{} {} [{}]: ",
            self.category,
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.6f"),
            self.hint
        );

        let message = self.message.trim_matches(['\n', '\r']);
        let indent = format!("\n{}", " ".repeat(header.chars().count()));
        let body = message.replace("\r\n", "\n").replace('\n', &indent);

        format!("{}{}", header, body)
    }
}

/// Append-only operator log with error notification
#[derive(Clone)]
pub struct Journal {
    path: PathBuf,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Journal").field("path", &self.path).finish()
    }
}

impl Journal {
    /// Create a journal writing to `path` and notifying through `notifier`
    pub fn new(path: impl AsRef<Path>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            notifier,
        }
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record an `INFO` entry
    pub async fn info(&self, hint: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogCategory::Info, hint, message)).await;
    }

    /// Record a `DEBUG` entry
    pub async fn debug(&self, hint: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogCategory::Debug, hint, message)).await;
    }

    /// Record an `ERROR` entry and mail it to the operator
    pub async fn error(&self, hint: &str, message: impl Into<String>) {
        self.record(LogEntry::new(LogCategory::Error, hint, message)).await;
    }

    /// Write an entry; `ERROR` entries are then mailed
    pub async fn record(&self, entry: LogEntry) {
        let line = entry.render();
        self.append(&entry, &line).await;

        if entry.category == LogCategory::Error {
            self.notify(ERROR_REPORT_SUBJECT, &line).await;
        }
    }

    /// Best-effort notification
    ///
    /// A failed send is written as a `DEBUG` entry and goes no further.
    pub async fn notify(&self, subject: &str, body: &str) {
        if let Err(e) = self.notifier.send(subject, body).await {
            let entry = LogEntry::new(
                LogCategory::Debug,
                "mail",
                format!("Sending mail failed: {}", e),
            );
            let line = entry.render();
            self.append(&entry, &line).await;
        }
    }

    async fn append(&self, entry: &LogEntry, line: &str) {
        match entry.category {
            LogCategory::Info => tracing::info!(hint = %entry.hint, "{}", entry.message),
            LogCategory::Debug => tracing::debug!(hint = %entry.hint, "{}", entry.message),
            LogCategory::Error => tracing::error!(hint = %entry.hint, "{}", entry.message),
        }

        if let Err(e) = self.write_line(line).await {
            // The log file is the one place we cannot report into
            tracing::error!(
                "Failed to append to log file {}: {}",
                self.path.display(),
                e
            );
        }
    }

    async fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(format!("{}\n", line).as_bytes()).await?;
        file.flush().await
    }
}
