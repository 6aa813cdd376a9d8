// # Result Reporter Implementations
//
// This module provides implementations of the ResultReporter trait for
// the outcome sinks the updater supports.

pub mod logging;
pub mod run_log;

pub use logging::TracingReporter;
pub use run_log::{RunLogReporter, RunRecord};

use async_trait::async_trait;

use crate::Error;
use crate::model::ReconciliationOutcome;
use crate::traits::ResultReporter;

/// Fan-out reporter
///
/// Every inner reporter sees the outcome, even after an earlier one failed.
/// The first error is returned.
#[derive(Default)]
pub struct CompositeReporter {
    reporters: Vec<Box<dyn ResultReporter>>,
}

impl CompositeReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reporter to the end of the chain
    pub fn with(mut self, reporter: Box<dyn ResultReporter>) -> Self {
        self.reporters.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[async_trait]
impl ResultReporter for CompositeReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<(), Error> {
        let mut first_error = None;
        for reporter in &self.reporters {
            if let Err(e) = reporter.report(outcome).await {
                tracing::warn!("Reporter failed: {}", e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
