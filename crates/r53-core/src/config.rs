//! Configuration types for the updater
//!
//! [`Settings`] is built once at process start (see the `r53-ddns` binary),
//! validated, and passed by value into the constructors of every collaborator.
//! Nothing in the core reads the environment.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::model::DnsRecordRef;

/// Default AWS region for the Route 53 client
pub const DEFAULT_REGION: &str = "eu-west-1";

/// Default public-IP echo service
pub const DEFAULT_PUBLIC_IP_URL: &str = "http://checkip.amazonaws.com/";

/// Default job label written into run markers
pub const DEFAULT_RUN_LABEL: &str = "route53-ddns-updater";

/// Default timeout for every outbound call
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest TTL accepted for the managed record (two days)
pub const MAX_TTL_SECONDS: u32 = 172_800;

/// Access key pair for the DNS provider
///
/// The Debug implementation never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Access key id
    pub access_key_id: String,

    /// Secret access key
    /// ⚠️ NEVER log this value
    pub secret_access_key: String,
}

impl Credentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<REDACTED>")
            .finish()
    }
}

/// Where and under which label successful runs are recorded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogSettings {
    /// JSON-lines file the markers are appended to
    pub path: PathBuf,

    /// Job label stored with every marker
    pub label: String,
}

/// Postgres run-marker sink
///
/// The URL usually carries a password; Debug never shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// `postgres://` connection URL
    pub url: String,

    /// Value written to `cron_jobs.label`
    pub label: String,
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("url", &"<REDACTED>")
            .field("label", &self.label)
            .finish()
    }
}

/// Complete, immutable configuration of one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    /// The managed record
    pub record: DnsRecordRef,

    /// Provider credentials
    pub credentials: Credentials,

    /// Provider region
    pub region: String,

    /// Public-IP echo service URL
    pub public_ip_url: String,

    /// Liveness ping URL (optional)
    pub healthcheck_url: Option<String>,

    /// Run marker sink (optional)
    pub run_log: Option<RunLogSettings>,

    /// Postgres run marker sink (optional)
    pub database: Option<DatabaseSettings>,

    /// Timeout applied to every outbound call
    pub http_timeout: Duration,

    /// Never write to the provider
    pub dry_run: bool,
}

impl Settings {
    /// Create settings with defaults for everything but the record and credentials
    pub fn new(record: DnsRecordRef, credentials: Credentials) -> Self {
        Self {
            record,
            credentials,
            region: DEFAULT_REGION.to_string(),
            public_ip_url: DEFAULT_PUBLIC_IP_URL.to_string(),
            healthcheck_url: None,
            run_log: None,
            database: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.record.zone_id.trim().is_empty() {
            return Err(crate::Error::config("Hosted zone id cannot be empty"));
        }

        validate_domain_name(&self.record.name)?;

        if self.record.ttl_seconds == 0 || self.record.ttl_seconds > MAX_TTL_SECONDS {
            return Err(crate::Error::config(format!(
                "Record TTL must be between 1 and {} seconds. Got: {}",
                MAX_TTL_SECONDS, self.record.ttl_seconds
            )));
        }

        if self.credentials.access_key_id.is_empty() {
            return Err(crate::Error::config("Access key id cannot be empty"));
        }
        if self.credentials.secret_access_key.is_empty() {
            return Err(crate::Error::config("Secret access key cannot be empty"));
        }

        if self.region.trim().is_empty() {
            return Err(crate::Error::config("Region cannot be empty"));
        }

        validate_url("public IP URL", &self.public_ip_url)?;
        if let Some(url) = &self.healthcheck_url {
            validate_url("healthcheck URL", url)?;
        }

        if let Some(run_log) = &self.run_log {
            if run_log.path.as_os_str().is_empty() {
                return Err(crate::Error::config("Run log path cannot be empty"));
            }
            if run_log.label.trim().is_empty() {
                return Err(crate::Error::config("Run log label cannot be empty"));
            }
        }

        if let Some(database) = &self.database {
            if !database.url.starts_with("postgres://") && !database.url.starts_with("postgresql://")
            {
                return Err(crate::Error::config(
                    "The database URL must use the postgres:// or postgresql:// scheme",
                ));
            }
            if database.label.trim().is_empty() {
                return Err(crate::Error::config("Run label cannot be empty"));
            }
        }

        if self.http_timeout.is_zero() {
            return Err(crate::Error::config("HTTP timeout must be > 0"));
        }

        Ok(())
    }
}

fn validate_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if !url.starts_with("https://") && !url.starts_with("http://") {
        return Err(crate::Error::config(format!(
            "The {} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

/// Validate that a string is a valid domain name
///
/// Basic RFC 1035 checks; a single trailing dot (fully-qualified form) is
/// accepted.
pub fn validate_domain_name(domain: &str) -> Result<(), crate::Error> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);

    if domain.is_empty() {
        return Err(crate::Error::config("Domain name cannot be empty"));
    }

    if domain.len() > 253 {
        return Err(crate::Error::config(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(crate::Error::config(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(crate::Error::config(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(crate::Error::config(format!(
                "Domain label contains invalid characters. Label: '{}'",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(crate::Error::config(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}
