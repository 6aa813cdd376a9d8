//! Error types for the Route 53 updater
//!
//! Every error is terminal for the current run. The [`Reconciler`](crate::Reconciler)
//! turns them into a failed [`ReconciliationOutcome`](crate::ReconciliationOutcome)
//! tagged with the stage that produced them.

use thiserror::Error;

/// Result type alias for updater operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the updater
#[derive(Error, Debug)]
pub enum Error {
    /// Public IP lookup failed or returned unparseable data
    #[error("Public IP resolution failed: {0}")]
    Resolution(String),

    /// DNS provider call failed or returned a malformed response
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Provider rejected the credentials
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Provider throttled the request
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Liveness ping failed
    #[error("Health signal failed: {0}")]
    HealthSignal(String),

    /// Outcome reporting failed
    #[error("Result reporting failed: {0}")]
    Report(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text that is not a dotted-quad IPv4 address
    #[error("Invalid IPv4 address: {0:?}")]
    InvalidAddress(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a public IP resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a health signal error
    pub fn health_signal(msg: impl Into<String>) -> Self {
        Self::HealthSignal(msg.into())
    }

    /// Create a reporting error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::Report(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid address error
    pub fn invalid_address(text: impl Into<String>) -> Self {
        Self::InvalidAddress(text.into())
    }
}
