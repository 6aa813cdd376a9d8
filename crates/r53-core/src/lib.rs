// # r53-core
//
// Core library for the Route 53 dynamic-DNS updater.
//
// ## Architecture Overview
//
// One invocation reconciles one "A" record with the caller's public IP:
// - **PublicIpResolver**: Trait for discovering the public IPv4 address
// - **DnsRecordClient**: Trait for reading and upserting the record
// - **HealthSignal**: Trait for the optional liveness ping
// - **ResultReporter**: Trait for outcome sinks (error capture, run markers)
// - **Reconciler**: Fetch, compare, and update, in that order, once
//
// ## Design Principles
//
// 1. **Single shot**: No retries, no background tasks; the scheduler is the loop
// 2. **Provider is the source of truth**: No local cache of the last IP
// 3. **Injectable collaborators**: Every external service sits behind a trait
// 4. **Structured outcomes**: Errors become a tagged outcome; only `main` exits

pub mod traits;
pub mod reconciler;
pub mod config;
pub mod error;
pub mod model;
pub mod report;

// Re-export core types for convenience
pub use traits::{DnsRecordClient, HealthSignal, NoopHealthSignal, PublicIpResolver, ResultReporter};
pub use reconciler::{Reconciler, RunState};
pub use config::{Credentials, DatabaseSettings, RunLogSettings, Settings};
pub use error::{Error, Result};
pub use model::{DnsRecordRef, Ipv4Address, ReconciliationOutcome, Stage};
pub use report::{CompositeReporter, RunLogReporter, TracingReporter};
