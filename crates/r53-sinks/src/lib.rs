// # Outcome Sinks
//
// External `ResultReporter` implementations:
//
// - `PostgresRunReporter`: inserts a `cron_jobs` row for every run that
//   completed, so a dashboard can alert when the job stops running
// - `SentryReporter`: captures failed runs as Sentry events tagged with the
//   failing stage
//
// Both are optional and wired by the binary only when configured.

pub mod postgres;
pub mod crash;

pub use crate::postgres::PostgresRunReporter;
pub use crate::crash::{SentryReporter, init_sentry, validate_dsn};
