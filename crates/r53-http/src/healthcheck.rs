// # HTTP Health Signal
//
// Liveness ping for cron-style monitors (healthchecks.io and friends): a GET
// to the configured URL. Non-2xx responses and network failures fail the run.

use std::time::Duration;

use async_trait::async_trait;
use r53_core::traits::HealthSignal;
use r53_core::{Error, Result};

/// Health signal that GETs a watchdog URL
#[derive(Debug, Clone)]
pub struct HttpHealthSignal {
    url: String,
    client: reqwest::Client,
}

impl HttpHealthSignal {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, crate::DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: crate::build_client(timeout)?,
        })
    }
}

#[async_trait]
impl HealthSignal for HttpHealthSignal {
    async fn signal(&self) -> Result<()> {
        // Ping URLs often embed a secret check id; log the host only.
        let host = reqwest::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| "<invalid url>".to_string());
        tracing::debug!("Sending health signal to {}", host);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                Error::health_signal(format!("Request to {} failed: {}", host, e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::health_signal(format!(
                "HTTP error from {}: {}",
                host, status
            )));
        }

        Ok(())
    }
}
