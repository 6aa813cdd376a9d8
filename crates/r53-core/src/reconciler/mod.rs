//! Reconciliation routine
//!
//! The Reconciler is responsible for:
//! - Resolving the public IP via PublicIpResolver
//! - Reading the published address via DnsRecordClient
//! - Signalling liveness via HealthSignal
//! - Upserting the record only when the two addresses differ
//! - Reporting the outcome via ResultReporter
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │ PublicIpResolver │   │ DnsRecordClient  │
//! │ (resolve)        │   │ (read_current)   │
//! └──────────────────┘   └──────────────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!             ┌──────────────┐        ┌──────────────┐
//!             │  Reconciler  │───────▶│ HealthSignal │
//!             └──────────────┘        └──────────────┘
//!                     │
//!         ┌───────────┴────────────┐
//!         ▼                        ▼
//! ┌─────────────────┐     ┌────────────────┐
//! │ DnsRecordClient │     │ ResultReporter │
//! │ (upsert)        │     │ (report)       │
//! └─────────────────┘     └────────────────┘
//! ```
//!
//! ## Run Flow
//!
//! 1. Resolve the public IP
//! 2. Read the registered IP (absent record = always different)
//! 3. Signal liveness
//! 4. Compare; upsert on mismatch
//! 5. Report the outcome

use std::fmt;

use tracing::{debug, info};

use crate::error::Result;
use crate::model::{DnsRecordRef, Ipv4Address, ReconciliationOutcome, Stage};
use crate::report::TracingReporter;
use crate::traits::{
    DnsRecordClient, HealthSignal, NoopHealthSignal, PublicIpResolver, ResultReporter,
};

/// States a run passes through, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    ResolvingIp,
    ReadingRecord,
    HealthSignal,
    Comparing,
    NoOp,
    Upserting,
    Reporting,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::ResolvingIp => "resolving_ip",
            RunState::ReadingRecord => "reading_record",
            RunState::HealthSignal => "health_signal",
            RunState::Comparing => "comparing",
            RunState::NoOp => "no_op",
            RunState::Upserting => "upserting",
            RunState::Reporting => "reporting",
            RunState::Done => "done",
        };
        f.write_str(name)
    }
}

/// Compare-and-correct routine for a single "A" record
///
/// One call to [`Reconciler::run`] is one invocation of the job: a strictly
/// ordered sequence of awaited calls with no retries. Any error ends the run
/// with [`ReconciliationOutcome::Failed`]; the next scheduled invocation is
/// the retry.
///
/// ## Lifecycle
///
/// 1. Create with [`Reconciler::new()`]
/// 2. Attach optional collaborators with [`Reconciler::with_health_signal()`]
///    and [`Reconciler::with_reporter()`]
/// 3. Call [`Reconciler::run()`] once
pub struct Reconciler {
    /// Public IP lookup
    resolver: Box<dyn PublicIpResolver>,

    /// DNS provider for reading and writing the record
    client: Box<dyn DnsRecordClient>,

    /// Liveness ping (no-op unless configured)
    health: Box<dyn HealthSignal>,

    /// Outcome sink
    reporter: Box<dyn ResultReporter>,

    /// The managed record
    record: DnsRecordRef,
}

impl Reconciler {
    /// Create a reconciler with no health signal and a log-only reporter
    pub fn new(
        resolver: Box<dyn PublicIpResolver>,
        client: Box<dyn DnsRecordClient>,
        record: DnsRecordRef,
    ) -> Self {
        Self {
            resolver,
            client,
            health: Box::new(NoopHealthSignal),
            reporter: Box::new(TracingReporter::new(record.name.clone())),
            record,
        }
    }

    /// Ping `health` on every run
    pub fn with_health_signal(mut self, health: Box<dyn HealthSignal>) -> Self {
        self.health = health;
        self
    }

    /// Send outcomes to `reporter` instead of the default log reporter
    pub fn with_reporter(mut self, reporter: Box<dyn ResultReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// The managed record
    pub fn record(&self) -> &DnsRecordRef {
        &self.record
    }

    /// Resolve the public IP without touching the provider
    pub async fn public_ip(&self) -> Result<Ipv4Address> {
        self.resolver.resolve().await
    }

    /// Read the published address without resolving or writing
    pub async fn registered_ip(&self) -> Result<Option<Ipv4Address>> {
        self.client.read_current(&self.record).await
    }

    /// Run one reconciliation and report its outcome
    pub async fn run(&self) -> ReconciliationOutcome {
        let outcome = self.reconcile().await;

        self.enter(RunState::Reporting);
        let outcome = self.report(outcome).await;

        self.enter(RunState::Done);
        outcome
    }

    async fn reconcile(&self) -> ReconciliationOutcome {
        self.enter(RunState::ResolvingIp);
        let public_ip = match self.resolver.resolve().await {
            Ok(ip) => ip,
            Err(e) => return ReconciliationOutcome::failed(Stage::Resolve, e),
        };
        debug!(
            "Public IP from {}: {}",
            self.resolver.source_name(),
            public_ip
        );

        self.enter(RunState::ReadingRecord);
        let registered_ip = match self.client.read_current(&self.record).await {
            Ok(ip) => ip,
            Err(e) => return ReconciliationOutcome::failed(Stage::Read, e),
        };
        debug!(
            "Registered IP for {}: {}",
            self.record.name,
            registered_ip
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| "<none>".to_string())
        );

        self.enter(RunState::HealthSignal);
        if let Err(e) = self.health.signal().await {
            return ReconciliationOutcome::failed(Stage::HealthSignal, e);
        }

        self.enter(RunState::Comparing);
        if registered_ip == Some(public_ip) {
            self.enter(RunState::NoOp);
            info!("IP is already updated ({})", public_ip);
            return ReconciliationOutcome::Unchanged { address: public_ip };
        }

        self.enter(RunState::Upserting);
        info!(
            "Upserting {} {} -> {} via {}",
            self.record.name,
            self.record.record_type(),
            public_ip,
            self.client.provider_name()
        );
        match self.client.upsert(&self.record, &public_ip).await {
            Ok(()) if self.client.is_dry_run() => ReconciliationOutcome::WouldUpdate {
                previous: registered_ip,
                address: public_ip,
            },
            Ok(()) => ReconciliationOutcome::Updated {
                previous: registered_ip,
                address: public_ip,
            },
            Err(e) => ReconciliationOutcome::failed(Stage::Upsert, e),
        }
    }

    /// Hand the outcome to the reporter
    ///
    /// A reporter failure fails a successful run; a failed run keeps its
    /// original stage and error.
    async fn report(&self, outcome: ReconciliationOutcome) -> ReconciliationOutcome {
        match self.reporter.report(&outcome).await {
            Ok(()) => outcome,
            Err(e) if outcome.is_success() => ReconciliationOutcome::failed(Stage::Report, e),
            Err(e) => {
                tracing::warn!("Failed to report failed run ({}): {}", outcome, e);
                outcome
            }
        }
    }

    fn enter(&self, state: RunState) {
        tracing::trace!(record = %self.record.name, "run state: {}", state);
    }
}
