// Environment-driven configuration for the r53-ddns binary.
//
// Every variable is read exactly once, here. The core crates receive an
// immutable `Settings` and never look at the environment themselves.

use std::path::PathBuf;
use std::time::Duration;

use r53_core::config::{DEFAULT_RUN_LABEL, MAX_TTL_SECONDS};
use r53_core::{
    Credentials, DatabaseSettings, DnsRecordRef, Error, Result, RunLogSettings, Settings,
};
use tracing::Level;

pub const AWS_ACCESS_KEY_ID: &str = "AWS_ACCESS_KEY_ID";
pub const AWS_SECRET_ACCESS_KEY: &str = "AWS_SECRET_ACCESS_KEY";
pub const AWS_HOSTED_ZONE_ID: &str = "AWS_HOSTED_ZONE_ID";
pub const AWS_RECORD_NAME: &str = "AWS_RECORD_NAME";
pub const AWS_REGION: &str = "AWS_REGION";
pub const DDNS_RECORD_TTL: &str = "DDNS_RECORD_TTL";
pub const DDNS_PUBLIC_IP_URL: &str = "DDNS_PUBLIC_IP_URL";
pub const DDNS_HEALTHCHECK_URL: &str = "DDNS_HEALTHCHECK_URL";
pub const DDNS_RUN_LOG_PATH: &str = "DDNS_RUN_LOG_PATH";
pub const DDNS_RUN_LABEL: &str = "DDNS_RUN_LABEL";
pub const DDNS_HTTP_TIMEOUT_SECS: &str = "DDNS_HTTP_TIMEOUT_SECS";
pub const DDNS_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";
pub const DDNS_DATABASE_URL: &str = "DDNS_DATABASE_URL";
pub const SENTRY_DSN: &str = "SENTRY_DSN";

/// Variables without which no run is possible
const REQUIRED: [&str; 4] = [
    AWS_ACCESS_KEY_ID,
    AWS_SECRET_ACCESS_KEY,
    AWS_HOSTED_ZONE_ID,
    AWS_RECORD_NAME,
];

/// Validated process configuration
pub struct AppConfig {
    pub settings: Settings,
    pub log_level: Level,

    /// Crash reporting DSN (optional)
    pub sentry_dsn: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("settings", &self.settings)
            .field("log_level", &self.log_level)
            .field("sentry_dsn", &self.sentry_dsn.as_ref().map(|_| "<REDACTED>"))
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env(dry_run: bool) -> Result<Self> {
        Self::from_lookup(dry_run, |key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`
    ///
    /// Empty values count as unset. All missing required variables are
    /// reported in one error.
    pub fn from_lookup<F>(dry_run: bool, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let missing: Vec<&str> = REQUIRED
            .iter()
            .copied()
            .filter(|key| get(key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(Error::config(format!(
                "Missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }

        let required = |key: &str| get(key).unwrap_or_default();

        let ttl = match get(DDNS_RECORD_TTL) {
            Some(raw) => parse_in_range(DDNS_RECORD_TTL, &raw, 1, u64::from(MAX_TTL_SECONDS))?,
            None => u64::from(r53_core::model::DEFAULT_TTL_SECONDS),
        };
        let ttl = u32::try_from(ttl)
            .map_err(|_| Error::config(format!("{} is out of range: {}", DDNS_RECORD_TTL, ttl)))?;

        let record = DnsRecordRef::new(required(AWS_HOSTED_ZONE_ID), required(AWS_RECORD_NAME))
            .with_ttl(ttl);
        let credentials =
            Credentials::new(required(AWS_ACCESS_KEY_ID), required(AWS_SECRET_ACCESS_KEY));

        let mut settings = Settings::new(record, credentials);
        settings.dry_run = dry_run;

        if let Some(region) = get(AWS_REGION) {
            settings.region = region;
        }
        if let Some(url) = get(DDNS_PUBLIC_IP_URL) {
            settings.public_ip_url = url;
        }
        settings.healthcheck_url = get(DDNS_HEALTHCHECK_URL);
        let label = get(DDNS_RUN_LABEL).unwrap_or_else(|| DEFAULT_RUN_LABEL.to_string());
        settings.run_log = get(DDNS_RUN_LOG_PATH).map(|path| RunLogSettings {
            path: PathBuf::from(path),
            label: label.clone(),
        });
        settings.database = get(DDNS_DATABASE_URL).map(|url| DatabaseSettings { url, label });
        if let Some(raw) = get(DDNS_HTTP_TIMEOUT_SECS) {
            settings.http_timeout =
                Duration::from_secs(parse_in_range(DDNS_HTTP_TIMEOUT_SECS, &raw, 1, 300)?);
        }

        settings.validate()?;

        let log_level = match get(DDNS_LOG_LEVEL) {
            Some(raw) => parse_level(&raw)?,
            None => Level::INFO,
        };

        let sentry_dsn = get(SENTRY_DSN);
        if let Some(dsn) = &sentry_dsn {
            r53_sinks::validate_dsn(dsn)?;
        }

        Ok(Self {
            settings,
            log_level,
            sentry_dsn,
        })
    }
}

fn parse_in_range(key: &str, raw: &str, min: u64, max: u64) -> Result<u64> {
    let value: u64 = raw
        .parse()
        .map_err(|_| Error::config(format!("{} must be a whole number. Got: {}", key, raw)))?;

    if !(min..=max).contains(&value) {
        return Err(Error::config(format!(
            "{} must be between {} and {}. Got: {}",
            key, min, max, value
        )));
    }

    Ok(value)
}

fn parse_level(raw: &str) -> Result<Level> {
    match raw.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
            DDNS_LOG_LEVEL, raw
        ))),
    }
}
