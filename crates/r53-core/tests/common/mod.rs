//! Test doubles and common utilities for reconciliation contract tests
//!
//! Every double counts its calls through shared `Arc` counters so a test can
//! keep a handle after the double has been boxed into a `Reconciler`.

#![allow(dead_code)]

use r53_core::error::{Error, Result};
use r53_core::model::{DnsRecordRef, Ipv4Address, ReconciliationOutcome};
use r53_core::traits::{DnsRecordClient, HealthSignal, PublicIpResolver, ResultReporter};
use r53_core::Reconciler;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Parse a dotted quad in tests
pub fn ip(text: &str) -> Ipv4Address {
    text.parse().expect("valid test address")
}

/// The record every contract test manages
pub fn test_record() -> DnsRecordRef {
    DnsRecordRef::new("Z0123456789TEST", "home.example.com")
}

/// How a stub resolver answers
#[derive(Clone)]
pub enum ResolverBehavior {
    Answer(Ipv4Address),
    TimeOut,
}

/// A resolver that returns a fixed answer and counts calls
#[derive(Clone)]
pub struct StubResolver {
    behavior: ResolverBehavior,
    calls: Arc<AtomicUsize>,
}

impl StubResolver {
    pub fn answering(address: Ipv4Address) -> Self {
        Self {
            behavior: ResolverBehavior::Answer(address),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn timing_out() -> Self {
        Self {
            behavior: ResolverBehavior::TimeOut,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PublicIpResolver for StubResolver {
    async fn resolve(&self) -> Result<Ipv4Address> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            ResolverBehavior::Answer(address) => Ok(*address),
            ResolverBehavior::TimeOut => Err(Error::resolution(
                "Request failed: operation timed out",
            )),
        }
    }

    fn source_name(&self) -> &str {
        "stub"
    }
}

/// A DNS client that stores the last upsert, like the provider does
///
/// Clones share the stored record and every counter.
#[derive(Clone)]
pub struct RecordingDnsClient {
    stored: Arc<Mutex<Option<Ipv4Address>>>,
    read_calls: Arc<AtomicUsize>,
    upsert_calls: Arc<AtomicUsize>,
    upserted: Arc<Mutex<Vec<(String, u32, Ipv4Address)>>>,
    fail_read: bool,
    fail_upsert: bool,
    dry_run: bool,
}

impl RecordingDnsClient {
    /// A zone with no record for the test name
    pub fn empty() -> Self {
        Self::with_record(None)
    }

    /// A zone whose record currently holds `address`
    pub fn holding(address: Ipv4Address) -> Self {
        Self::with_record(Some(address))
    }

    fn with_record(stored: Option<Ipv4Address>) -> Self {
        Self {
            stored: Arc::new(Mutex::new(stored)),
            read_calls: Arc::new(AtomicUsize::new(0)),
            upsert_calls: Arc::new(AtomicUsize::new(0)),
            upserted: Arc::new(Mutex::new(Vec::new())),
            fail_read: false,
            fail_upsert: false,
            dry_run: false,
        }
    }

    /// Make every read fail with an authentication error
    pub fn failing_reads(mut self) -> Self {
        self.fail_read = true;
        self
    }

    /// Make every upsert fail with a throttling error
    pub fn failing_upserts(mut self) -> Self {
        self.fail_upsert = true;
        self
    }

    /// Count upserts but never store them
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    pub fn read_count(&self) -> usize {
        self.read_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Total provider calls (reads and writes)
    pub fn provider_calls(&self) -> usize {
        self.read_count() + self.upsert_count()
    }

    /// `(name, ttl, address)` of every upsert, in order
    pub fn upserts(&self) -> Vec<(String, u32, Ipv4Address)> {
        self.upserted.lock().unwrap().clone()
    }

    pub fn stored(&self) -> Option<Ipv4Address> {
        *self.stored.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DnsRecordClient for RecordingDnsClient {
    async fn read_current(&self, _record: &DnsRecordRef) -> Result<Option<Ipv4Address>> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            return Err(Error::auth("The security token included in the request is invalid"));
        }
        Ok(*self.stored.lock().unwrap())
    }

    async fn upsert(&self, record: &DnsRecordRef, address: &Ipv4Address) -> Result<()> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_upsert {
            return Err(Error::rate_limited("Rate exceeded"));
        }
        if self.dry_run {
            return Ok(());
        }
        self.upserted
            .lock()
            .unwrap()
            .push((record.name.clone(), record.ttl_seconds, *address));
        *self.stored.lock().unwrap() = Some(*address);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// A health signal that counts pings and can be told to fail
#[derive(Clone)]
pub struct CountingHealthSignal {
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl CountingHealthSignal {
    pub fn healthy() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl HealthSignal for CountingHealthSignal {
    async fn signal(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(Error::health_signal("HTTP error: 503 Service Unavailable"))
        } else {
            Ok(())
        }
    }
}

/// A reporter that remembers the label of every outcome it saw
#[derive(Clone, Default)]
pub struct CapturingReporter {
    seen: Arc<Mutex<Vec<String>>>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl ResultReporter for CapturingReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<()> {
        self.seen.lock().unwrap().push(outcome.to_string());
        Ok(())
    }
}

/// Build a reconciler over clones of the given doubles
pub fn reconciler(resolver: &StubResolver, client: &RecordingDnsClient) -> Reconciler {
    Reconciler::new(
        Box::new(resolver.clone()),
        Box::new(client.clone()),
        test_record(),
    )
}
