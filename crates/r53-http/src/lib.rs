// # HTTP Collaborators
//
// This crate provides the HTTP-backed collaborators of the updater:
//
// - `HttpIpResolver`: asks an "echo my IP" service for the public IPv4 address
// - `HttpHealthSignal`: pings a watchdog URL to prove the job ran
//
// Both issue exactly one GET per call, with a fixed request timeout, and
// never retry.

pub mod healthcheck;
pub mod resolver;

pub use healthcheck::HttpHealthSignal;
pub use resolver::{DEFAULT_IP_SERVICE, HttpIpResolver};

use std::time::Duration;

use r53_core::{Error, Result};

/// Default timeout for HTTP requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client with a request timeout
pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("r53-ddns/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))
}
