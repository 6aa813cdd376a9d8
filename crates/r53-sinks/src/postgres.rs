// # Postgres Run Reporter
//
// One row per completed run:
//
// ```sql
// INSERT INTO cron_jobs (label) VALUES ('route53-ddns-updater');
// ```
//
// The table is owned by the monitoring side (it supplies the timestamp
// default); this crate never creates or migrates it. Failed runs and dry
// runs insert nothing.

use std::time::Duration;

use async_trait::async_trait;
use r53_core::traits::ResultReporter;
use r53_core::{DatabaseSettings, Error, ReconciliationOutcome, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const INSERT_RUN: &str = "INSERT INTO cron_jobs (label) VALUES ($1)";

/// Reporter that records completed runs in `cron_jobs`
#[derive(Clone)]
pub struct PostgresRunReporter {
    pool: PgPool,
    label: String,
}

impl std::fmt::Debug for PostgresRunReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRunReporter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl PostgresRunReporter {
    /// Prepare a single-connection pool without connecting
    ///
    /// The connection is opened on the first insert, so runs that fail
    /// earlier never touch the database.
    pub fn connect_lazy(settings: &DatabaseSettings, timeout: Duration) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(timeout)
            .connect_lazy(&settings.url)
            .map_err(|e| Error::config(format!("Invalid database URL: {}", e)))?;

        Ok(Self::from_pool(pool, settings.label.clone()))
    }

    pub fn from_pool(pool: PgPool, label: impl Into<String>) -> Self {
        Self {
            pool,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Whether `outcome` should leave a row behind
fn records(outcome: &ReconciliationOutcome) -> bool {
    matches!(
        outcome,
        ReconciliationOutcome::Unchanged { .. } | ReconciliationOutcome::Updated { .. }
    )
}

#[async_trait]
impl ResultReporter for PostgresRunReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<()> {
        if !records(outcome) {
            return Ok(());
        }

        sqlx::query(INSERT_RUN)
            .bind(&self.label)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::report(format!("Failed to insert cron_jobs row: {}", e)))?;

        tracing::debug!("Run marker {} inserted into cron_jobs", self.label);
        Ok(())
    }
}
