// # Result Reporter Trait
//
// Receives the outcome of every run. Implementations forward failures to
// error tracking and record a "job ran" marker for successful runs.
//
// ## Implementations
//
// - `TracingReporter`: structured log events (error capture)
// - `RunLogReporter`: timestamped JSON-lines run markers
// - `CompositeReporter`: fan-out to several reporters

use async_trait::async_trait;

use crate::model::ReconciliationOutcome;

/// Trait for outcome reporters
///
/// Called exactly once per reconciliation run, after the outcome is known.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    /// Report the outcome of a run
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The outcome was recorded
    /// - `Err(Error)`: Recording failed; the reconciler fails a successful
    ///   run at the report stage
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<(), crate::Error>;
}
