// # ddnss-core
//
// Core library for the DDNSS check-update-notify cycle.
//
// ## Architecture Overview
//
// This library provides the core functionality for one updater run:
// - **ConnectivityProbe**: Pre-flight check that the provider host is reachable
// - **AddressResolver**: Trait for learning the current public address
// - **DnsProvider**: Trait for pushing the address to the dynamic-DNS provider
// - **StateStore**: Trait for the last accepted address
// - **Notifier**: Trait for mailing the operator
// - **Journal**: Append-only operator log; ERROR entries notify
// - **RunController**: Orchestrates probe → resolve → compare → update
//
// ## Design Principles
//
// 1. **Single shot**: One cycle per process, no retries, no background tasks
// 2. **Explicit configuration**: `Settings` is loaded once and passed down
// 3. **Closed taxonomies**: Log categories and outcomes are enums, not strings
// 4. **Library-First**: The binary only wires components together

pub mod address;
pub mod config;
pub mod engine;
pub mod error;
pub mod http;
pub mod journal;
pub mod preflight;
pub mod probe;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use address::IpAddress;
pub use config::Settings;
pub use engine::{RunController, RunOutcome, UpdateOutcome};
pub use error::{Error, Result, TransportFailure};
pub use journal::{Journal, LogCategory, LogEntry};
pub use probe::TcpConnectivityProbe;
pub use state::{FileIpStore, MemoryIpStore};
pub use traits::{AddressResolver, ConnectivityProbe, DnsProvider, Notifier, ProviderReply, StateStore};
