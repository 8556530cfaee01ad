//! Run controller
//!
//! The RunController drives one check-update-notify cycle:
//! - Probing the provider host
//! - Resolving the current public address
//! - Comparing it with the stored address
//! - Updating the provider and persisting the new address
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────┐   ┌─────────────────┐
//! │ ConnectivityProbe │   │ AddressResolver │
//! └───────────────────┘   └─────────────────┘
//!           │                      │
//!           └──────────┬───────────┘
//!                      ▼
//!              ┌───────────────┐
//!              │ RunController │──── entries ───▶ Journal ─▶ Notifier
//!              └───────────────┘
//!                      │
//!           ┌──────────┴───────────┐
//!           ▼                      ▼
//!   ┌─────────────┐        ┌──────────────┐
//!   │ StateStore  │        │ DnsProvider  │
//!   │ (read/write)│        │ (update)     │
//!   └─────────────┘        └──────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. Probe; unreachable → ERROR, stop
//! 2. Resolve; any failure → ERROR, stop
//! 3. Read stored address; failure → ERROR, stop. An empty store counts
//!    as a changed address
//! 4. Equal → INFO, stop
//! 5. Update provider; on success mail the operator, then persist
//!
//! Every step runs once. There are no retries; the next attempt is the
//! next scheduled invocation.

use crate::address::IpAddress;
use crate::error::{Error, TransportFailure};
use crate::journal::Journal;
use crate::traits::{AddressResolver, ConnectivityProbe, DnsProvider, ProviderReply, StateStore};

/// Subject of the mail sent after a successful update
pub const UPDATE_REPORT_SUBJECT: &str = "DDNSS-Updater IP Update";

/// Journaled when a rejection page has no readable text
pub const NO_REJECTION_DETAILS: &str = "Provider response contained no readable text";

/// Result of the compare-and-update step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the new address
    Success {
        /// Address stored before this run (`None` on the first run)
        old: Option<IpAddress>,
        /// Address sent to the provider
        new: IpAddress,
    },

    /// Resolved and stored addresses were equal; no call was made
    NoChange {
        /// The unchanged address
        current: IpAddress,
    },

    /// The provider answered but did not apply the update
    ProviderRejected {
        /// Text pulled out of the provider's error page
        fragments: Vec<String>,
    },

    /// The update request did not complete
    TransportFailure(TransportFailure),
}

/// Terminal state of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The provider host did not accept a connection
    Unreachable,

    /// The current address could not be determined
    ResolutionFailed,

    /// The stored address could not be read
    StateUnavailable,

    /// Dry run: the address changed but the provider was not called
    DryRun {
        /// Address stored before this run (`None` on the first run)
        old: Option<IpAddress>,
        /// Address that would have been sent
        new: IpAddress,
    },

    /// The comparison ran; see the update outcome
    Completed(UpdateOutcome),
}

/// Orchestrates one check-update-notify cycle
///
/// ## Lifecycle
///
/// 1. Create with [`RunController::new()`]
/// 2. Call [`RunController::run()`] once per invocation
///
/// Nothing is retained between calls to `run()` except what the
/// state store and the journal write to disk.
pub struct RunController {
    /// Pre-flight reachability check
    probe: Box<dyn ConnectivityProbe>,

    /// Source of the current public address
    resolver: Box<dyn AddressResolver>,

    /// Dynamic-DNS provider
    provider: Box<dyn DnsProvider>,

    /// Last accepted address
    state_store: Box<dyn StateStore>,

    /// Operator log
    journal: Journal,

    /// Host the probe checks before any HTTP call
    probe_host: String,

    /// Skip the provider call and the state write
    dry_run: bool,
}

impl RunController {
    /// Create a new run controller
    ///
    /// # Parameters
    ///
    /// - `probe`: connectivity probe implementation
    /// - `resolver`: address resolver implementation
    /// - `provider`: DNS provider implementation
    /// - `state_store`: state store implementation
    /// - `journal`: operator journal (owns the notifier)
    /// - `probe_host`: provider host checked before any HTTP call
    pub fn new(
        probe: Box<dyn ConnectivityProbe>,
        resolver: Box<dyn AddressResolver>,
        provider: Box<dyn DnsProvider>,
        state_store: Box<dyn StateStore>,
        journal: Journal,
        probe_host: impl Into<String>,
    ) -> Self {
        Self {
            probe,
            resolver,
            provider,
            state_store,
            journal,
            probe_host: probe_host.into(),
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run one full cycle
    pub async fn run(&self) -> RunOutcome {
        tracing::info!(
            "Starting cycle (provider={}, source={}, dry_run={})",
            self.provider.provider_name(),
            self.resolver.source_name(),
            self.dry_run
        );

        if !self.probe.is_reachable(&self.probe_host).await {
            self.journal
                .error("probe", Error::Connectivity(self.probe_host.clone()).to_string())
                .await;
            return RunOutcome::Unreachable;
        }

        let Some(new_ip) = self.resolve().await else {
            return RunOutcome::ResolutionFailed;
        };

        let old_ip = match self.state_store.read_last_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                self.journal.error("state", e.to_string()).await;
                return RunOutcome::StateUnavailable;
            }
        };

        if self.dry_run && old_ip.as_ref() != Some(&new_ip) {
            self.journal
                .info(
                    "update",
                    format!(
                        "Dry run: would update {} -> {}",
                        shown(old_ip.as_ref()),
                        new_ip
                    ),
                )
                .await;
            return RunOutcome::DryRun {
                old: old_ip,
                new: new_ip,
            };
        }

        RunOutcome::Completed(self.update_if_changed(old_ip.as_ref(), &new_ip).await)
    }

    /// Compare the two addresses and update the provider if they differ
    ///
    /// # Parameters
    ///
    /// - `old_ip`: address read from the state store, `None` if it holds none
    /// - `new_ip`: address just resolved
    pub async fn update_if_changed(
        &self,
        old_ip: Option<&IpAddress>,
        new_ip: &IpAddress,
    ) -> UpdateOutcome {
        if old_ip == Some(new_ip) {
            self.journal
                .info("compare", format!("IP did not change {}", new_ip))
                .await;
            return UpdateOutcome::NoChange {
                current: new_ip.clone(),
            };
        }

        tracing::debug!("IP changed: {:?} -> {}", old_ip, new_ip);

        match self.provider.update_record().await {
            Ok(ProviderReply::Accepted { message }) => {
                tracing::debug!("Provider accepted update: {}", message);
                self.on_success(old_ip, new_ip).await;
                UpdateOutcome::Success {
                    old: old_ip.cloned(),
                    new: new_ip.clone(),
                }
            }
            Ok(ProviderReply::Rejected { fragments }) => {
                self.journal.error("update", "Update failed!").await;
                if fragments.is_empty() {
                    self.journal.error("update", NO_REJECTION_DETAILS).await;
                } else {
                    self.journal.error("update", fragments.join("\n")).await;
                }
                UpdateOutcome::ProviderRejected { fragments }
            }
            Err(Error::Transport(failure)) => {
                self.report_transport("update", &failure).await;
                UpdateOutcome::TransportFailure(failure)
            }
            Err(other) => {
                let failure = TransportFailure::Unexpected {
                    description: other.to_string(),
                };
                self.report_transport("update", &failure).await;
                UpdateOutcome::TransportFailure(failure)
            }
        }
    }

    /// Resolve the current address, journaling any failure
    async fn resolve(&self) -> Option<IpAddress> {
        match self.resolver.resolve().await {
            Ok(ip) => {
                tracing::debug!("Resolved current IP: {}", ip);
                Some(ip)
            }
            Err(Error::Transport(failure)) => {
                self.report_transport("resolve", &failure).await;
                None
            }
            Err(e @ Error::NoAddressFound) => {
                self.journal.error("resolve", e.to_string()).await;
                None
            }
            Err(other) => {
                self.journal
                    .error("resolve", format!("Unexpected error: {}", other))
                    .await;
                None
            }
        }
    }

    /// Notify, then persist; neither step can cancel the other
    async fn on_success(&self, old_ip: Option<&IpAddress>, new_ip: &IpAddress) {
        let message = format!(
            "Update successful. Old IP {}, New IP {}",
            shown(old_ip),
            new_ip
        );
        self.journal.info("update", message.clone()).await;

        self.journal.notify(UPDATE_REPORT_SUBJECT, &message).await;

        if let Err(e) = self.state_store.write_last_ip(new_ip).await {
            self.journal.error("state", e.to_string()).await;
        }
    }

    /// Journal a transport failure: status code at ERROR and body at DEBUG,
    /// network reason at ERROR, anything else as a generic ERROR
    async fn report_transport(&self, hint: &str, failure: &TransportFailure) {
        match failure {
            TransportFailure::HttpStatus { code, body } => {
                self.journal.error(hint, code.to_string()).await;
                self.journal.debug(hint, body.clone()).await;
            }
            TransportFailure::Network { reason } => {
                self.journal.error(hint, reason.clone()).await;
            }
            TransportFailure::Unexpected { description } => {
                self.journal
                    .error(hint, format!("Unexpected error: {}", description))
                    .await;
            }
        }
    }
}

/// Text used for the stored address in journal entries; empty if none
fn shown(ip: Option<&IpAddress>) -> &str {
    ip.map(IpAddress::as_str).unwrap_or_default()
}
