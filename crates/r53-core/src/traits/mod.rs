//! Collaborator traits for the updater
//!
//! The [`Reconciler`](crate::Reconciler) only talks to these interfaces:
//!
//! - [`PublicIpResolver`]: Discover the caller's public IPv4 address
//! - [`DnsRecordClient`]: Read and upsert the managed "A" record
//! - [`HealthSignal`]: Prove to an external watchdog that the job ran
//! - [`ResultReporter`]: Forward the run outcome (error capture, run markers)

pub mod ip_resolver;
pub mod dns_record_client;
pub mod health_signal;
pub mod reporter;

pub use ip_resolver::PublicIpResolver;
pub use dns_record_client::DnsRecordClient;
pub use health_signal::{HealthSignal, NoopHealthSignal};
pub use reporter::ResultReporter;
