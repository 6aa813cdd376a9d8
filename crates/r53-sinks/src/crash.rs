// # Sentry Reporter
//
// Failed runs become Sentry error events tagged with the failing stage and
// the record name. Successful runs, including dry runs, send nothing.
//
// The client itself is process-wide: `init_sentry` must be called in `main`
// and its guard kept alive until exit so queued events are flushed.

use async_trait::async_trait;
use r53_core::traits::ResultReporter;
use r53_core::{Error, ReconciliationOutcome, Result};
use sentry::types::{Dsn, Uuid};

/// Check that `dsn` is a well-formed Sentry DSN
pub fn validate_dsn(dsn: &str) -> Result<()> {
    dsn.parse::<Dsn>()
        .map(|_| ())
        .map_err(|e| Error::config(format!("Invalid Sentry DSN: {}", e)))
}

/// Install the process-wide Sentry client
///
/// Events are flushed when the returned guard is dropped.
pub fn init_sentry(dsn: &str) -> Result<sentry::ClientInitGuard> {
    let dsn = dsn
        .parse::<Dsn>()
        .map_err(|e| Error::config(format!("Invalid Sentry DSN: {}", e)))?;

    Ok(sentry::init(sentry::ClientOptions {
        dsn: Some(dsn),
        release: sentry::release_name!(),
        ..Default::default()
    }))
}

/// Reporter that captures failed runs in Sentry
#[derive(Debug, Clone)]
pub struct SentryReporter {
    record_name: String,
}

impl SentryReporter {
    pub fn new(record_name: impl Into<String>) -> Self {
        Self {
            record_name: record_name.into(),
        }
    }

    /// Capture `outcome` if it is a failure, returning the event id
    pub fn capture(&self, outcome: &ReconciliationOutcome) -> Option<Uuid> {
        let ReconciliationOutcome::Failed { stage, error } = outcome else {
            return None;
        };

        let event_id = sentry::with_scope(
            |scope| {
                scope.set_tag("stage", stage.as_str());
                scope.set_tag("record", &self.record_name);
            },
            || sentry::capture_error(error),
        );
        Some(event_id)
    }
}

#[async_trait]
impl ResultReporter for SentryReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<()> {
        if let Some(event_id) = self.capture(outcome) {
            tracing::debug!("Failure captured as Sentry event {}", event_id);
        }
        Ok(())
    }
}
