// # Run Log Reporter
//
// Records a timestamped "job ran" marker for every successful run, so an
// external check can alert when the scheduler stops invoking the job.
//
// ## File Format
//
// One JSON object per line, appended:
//
// ```json
// {"label":"route53-ddns-updater","ran_at":"2025-01-09T12:00:00Z","outcome":"updated","address":"203.0.113.5"}
// ```
//
// Failed runs and dry runs are not recorded; failures are captured by the
// tracing reporter.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::config::RunLogSettings;
use crate::model::{Ipv4Address, ReconciliationOutcome};
use crate::traits::ResultReporter;

/// A single "job ran" marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Job label
    pub label: String,
    /// When the run finished
    pub ran_at: DateTime<Utc>,
    /// "unchanged" or "updated"
    pub outcome: String,
    /// Address published after the run
    pub address: Ipv4Address,
}

impl RunRecord {
    /// Build the marker for an outcome
    ///
    /// `None` for failed runs and dry runs: neither published anything.
    pub fn from_outcome(label: &str, outcome: &ReconciliationOutcome) -> Option<Self> {
        if matches!(outcome, ReconciliationOutcome::WouldUpdate { .. }) {
            return None;
        }
        let address = outcome.address()?;
        Some(Self {
            label: label.to_string(),
            ran_at: Utc::now(),
            outcome: outcome.label().to_string(),
            address,
        })
    }
}

/// Reporter that appends run markers to a JSON-lines file
///
/// # Example
///
/// ```rust,no_run
/// use r53_core::report::RunLogReporter;
/// use r53_core::traits::ResultReporter;
/// use r53_core::ReconciliationOutcome;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let reporter = RunLogReporter::new("/var/lib/r53-ddns/runs.jsonl", "route53-ddns-updater");
///
///     let outcome = ReconciliationOutcome::Unchanged { address: "203.0.113.5".parse()? };
///     reporter.report(&outcome).await?;
///
///     let runs = reporter.read_all().await?;
///     assert_eq!(runs.last().map(|r| r.outcome.as_str()), Some("unchanged"));
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RunLogReporter {
    path: PathBuf,
    label: String,
}

impl RunLogReporter {
    pub fn new(path: impl AsRef<Path>, label: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            label: label.into(),
        }
    }

    pub fn from_settings(settings: &RunLogSettings) -> Self {
        Self::new(&settings.path, settings.label.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one marker to the log
    pub async fn append(&self, record: &RunRecord) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::report(format!(
                        "Failed to create run log directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                Error::report(format!(
                    "Failed to open run log {}: {}",
                    self.path.display(),
                    e
                ))
            })?;

        file.write_all(line.as_bytes()).await.map_err(|e| {
            Error::report(format!(
                "Failed to write run log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        file.flush().await.map_err(|e| {
            Error::report(format!(
                "Failed to flush run log {}: {}",
                self.path.display(),
                e
            ))
        })?;

        tracing::debug!("Run marker written to {}", self.path.display());
        Ok(())
    }

    /// Read every marker in the log, oldest first
    ///
    /// A missing file is an empty log. Lines that do not parse are skipped
    /// with a warning.
    pub async fn read_all(&self) -> Result<Vec<RunRecord>, Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<RunRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "Skipping malformed run log line {} in {}: {}",
                    index + 1,
                    self.path.display(),
                    e
                ),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl ResultReporter for RunLogReporter {
    async fn report(&self, outcome: &ReconciliationOutcome) -> Result<(), Error> {
        match RunRecord::from_outcome(&self.label, outcome) {
            Some(record) => self.append(&record).await,
            None => Ok(()),
        }
    }
}
