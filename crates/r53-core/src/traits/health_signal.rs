// # Health Signal Trait
//
// Liveness ping to an external watchdog (e.g. a cron monitor). The job is
// only considered to have run if the ping succeeds, so a failed ping fails
// the run.

use async_trait::async_trait;

/// Trait for liveness signal implementations
#[async_trait]
pub trait HealthSignal: Send + Sync {
    /// Tell the watchdog the job is running
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The watchdog acknowledged the ping
    /// - `Err(Error::HealthSignal)`: Network failure or non-2xx status
    async fn signal(&self) -> Result<(), crate::Error>;
}

/// Health signal used when no watchdog is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHealthSignal;

#[async_trait]
impl HealthSignal for NoopHealthSignal {
    async fn signal(&self) -> Result<(), crate::Error> {
        Ok(())
    }
}
