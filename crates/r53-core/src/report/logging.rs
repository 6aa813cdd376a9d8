// # Tracing Reporter
//
// Error capture through structured log events. Failures are emitted at
// error level with the failing stage as a field so log shippers can alert
// on them; updates are emitted at info level so they stand out from the
// routine "nothing to do" runs.

use async_trait::async_trait;
use tracing::{error, info};

use crate::Error;
use crate::model::ReconciliationOutcome;
use crate::traits::ResultReporter;

/// Reporter that turns outcomes into `tracing` events
#[derive(Debug, Clone)]
pub struct TracingReporter {
    record_name: String,
}

impl TracingReporter {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
        }
    }
}

#[async_trait]
impl ResultReporter for TracingReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<(), Error> {
        match outcome {
            ReconciliationOutcome::Unchanged { address } => {
                info!(
                    record = %self.record_name,
                    outcome = "unchanged",
                    %address,
                    "Record already points at the public IP"
                );
            }
            ReconciliationOutcome::Updated { previous, address } => {
                info!(
                    record = %self.record_name,
                    outcome = "updated",
                    previous = ?previous.map(|ip| ip.to_string()),
                    %address,
                    "Record updated"
                );
            }
            ReconciliationOutcome::WouldUpdate { previous, address } => {
                info!(
                    record = %self.record_name,
                    outcome = "would_update",
                    previous = ?previous.map(|ip| ip.to_string()),
                    %address,
                    "Dry run: record would be updated"
                );
            }
            ReconciliationOutcome::Failed { stage, error } => {
                error!(
                    record = %self.record_name,
                    outcome = "failed",
                    %stage,
                    "Run failed: {}",
                    error
                );
            }
        }
        Ok(())
    }
}
