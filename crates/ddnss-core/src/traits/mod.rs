//! Core traits for the DDNSS updater
//!
//! This module defines the abstract interfaces the run controller drives.
//!
//! - [`ConnectivityProbe`]: Pre-flight reachability check
//! - [`AddressResolver`]: Learn the current public address
//! - [`DnsProvider`]: Push the address to the dynamic-DNS provider
//! - [`StateStore`]: The last accepted address
//! - [`Notifier`]: Out-of-band operator messages

pub mod address_resolver;
pub mod connectivity;
pub mod dns_provider;
pub mod notifier;
pub mod state_store;

pub use address_resolver::AddressResolver;
pub use connectivity::ConnectivityProbe;
pub use dns_provider::{DnsProvider, ProviderReply};
pub use notifier::Notifier;
pub use state_store::StateStore;
