//! Test doubles and common utilities for run controller contract tests
//!
//! Every double is `Clone` and shares its counters across clones, so a
//! test can hand one copy to the controller and keep another to assert on.

#![allow(dead_code)]

use ddnss_core::error::Result;
use ddnss_core::traits::{AddressResolver, ConnectivityProbe, DnsProvider, Notifier, ProviderReply, StateStore};
use ddnss_core::{Error, IpAddress, Journal, MemoryIpStore, RunController, TransportFailure};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Probe with a fixed answer
#[derive(Clone)]
pub struct FixedProbe {
    reachable: bool,
    calls: Arc<AtomicUsize>,
}

impl FixedProbe {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ConnectivityProbe for FixedProbe {
    async fn is_reachable(&self, _host: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reachable
    }
}

/// What a scripted resolver returns
#[derive(Clone)]
pub enum Resolution {
    Address(&'static str),
    NoAddress,
    Failure(TransportFailure),
}

/// Resolver that always returns the same scripted result
#[derive(Clone)]
pub struct ScriptedResolver {
    resolution: Resolution,
    calls: Arc<AtomicUsize>,
}

impl ScriptedResolver {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn address(ip: &'static str) -> Self {
        Self::new(Resolution::Address(ip))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressResolver for ScriptedResolver {
    async fn resolve(&self) -> Result<IpAddress> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.resolution {
            Resolution::Address(ip) => IpAddress::parse(ip),
            Resolution::NoAddress => Err(Error::NoAddressFound),
            Resolution::Failure(failure) => Err(Error::Transport(failure.clone())),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Provider that always gives the same scripted answer
#[derive(Clone)]
pub struct ScriptedProvider {
    reply: std::result::Result<ProviderReply, TransportFailure>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    pub fn accepting() -> Self {
        Self::with_reply(Ok(ProviderReply::Accepted {
            message: "Updated 1 hostname.".to_string(),
        }))
    }

    pub fn rejecting(fragments: &[&str]) -> Self {
        Self::with_reply(Ok(ProviderReply::Rejected {
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
        }))
    }

    pub fn failing(failure: TransportFailure) -> Self {
        Self::with_reply(Err(failure))
    }

    fn with_reply(reply: std::result::Result<ProviderReply, TransportFailure>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DnsProvider for ScriptedProvider {
    async fn update_record(&self) -> Result<ProviderReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().map_err(Error::Transport)
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

/// Notifier that records every message and optionally fails
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_with_subject(&self, subject: &str) -> usize {
        self.sent().iter().filter(|(s, _)| s == subject).count()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, subject: &str, body: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((subject.to_string(), body.to_string()));
        if self.fail {
            Err(Error::notification("relay refused connection"))
        } else {
            Ok(())
        }
    }
}

/// State store whose writes always fail
#[derive(Clone)]
pub struct ReadOnlyStore {
    inner: MemoryIpStore,
}

impl ReadOnlyStore {
    pub fn new(ip: &str) -> Self {
        Self {
            inner: MemoryIpStore::new(IpAddress::parse(ip).unwrap()),
        }
    }
}

#[async_trait::async_trait]
impl StateStore for ReadOnlyStore {
    async fn read_last_ip(&self) -> Result<Option<IpAddress>> {
        self.inner.read_last_ip().await
    }

    async fn write_last_ip(&self, _ip: &IpAddress) -> Result<()> {
        Err(Error::state_store("disk is read-only"))
    }
}

/// A temporary log file plus the doubles a controller needs
pub struct Harness {
    pub dir: tempfile::TempDir,
    pub probe: FixedProbe,
    pub notifier: RecordingNotifier,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::new())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ipLog.txt"), "").unwrap();
        Self {
            dir,
            probe: FixedProbe::new(true),
            notifier,
        }
    }

    pub fn unreachable(mut self) -> Self {
        self.probe = FixedProbe::new(false);
        self
    }

    pub fn log_path(&self) -> PathBuf {
        self.dir.path().join("ipLog.txt")
    }

    pub fn journal(&self) -> Journal {
        Journal::new(self.log_path(), Arc::new(self.notifier.clone()))
    }

    pub fn controller(
        &self,
        resolver: ScriptedResolver,
        provider: ScriptedProvider,
        store: impl StateStore + 'static,
    ) -> RunController {
        RunController::new(
            Box::new(self.probe.clone()),
            Box::new(resolver),
            Box::new(provider),
            Box::new(store),
            self.journal(),
            "www.ddnss.de",
        )
    }

    pub fn lines(&self) -> Vec<String> {
        read_lines(&self.log_path())
    }

    /// Journal lines of one category ("INFO", "DEBUG", "ERROR")
    pub fn lines_of(&self, category: &str) -> Vec<String> {
        let prefix = format!("{} ", category);
        self.lines()
            .into_iter()
            .filter(|line| line.starts_with(&prefix))
            .collect()
    }
}

pub fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn memory_store(ip: &str) -> MemoryIpStore {
    MemoryIpStore::new(IpAddress::parse(ip).unwrap())
}

/// The address a store currently holds, as text
pub async fn stored(store: &impl StateStore) -> Option<String> {
    store
        .read_last_ip()
        .await
        .unwrap()
        .map(|ip| ip.as_str().to_string())
}
