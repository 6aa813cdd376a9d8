//! Data model for a single reconciliation run
//!
//! Nothing here is mutated after construction and nothing outlives the run.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Default TTL applied to the managed record
pub const DEFAULT_TTL_SECONDS: u32 = 3600;

/// A validated IPv4 host address
///
/// Only strict dotted-quad text parses: four decimal octets in `0..=255`,
/// no surrounding whitespace. Callers reading from the network trim first.
///
/// ```
/// use r53_core::Ipv4Address;
///
/// let addr: Ipv4Address = "203.0.113.5".parse().unwrap();
/// assert_eq!(addr.to_string(), "203.0.113.5");
/// assert!("203.0.113".parse::<Ipv4Address>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    /// Wrap an already-typed address
    pub const fn new(addr: Ipv4Addr) -> Self {
        Self(addr)
    }

    /// The underlying std address
    pub fn as_ipv4(&self) -> Ipv4Addr {
        self.0
    }
}

impl FromStr for Ipv4Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Self)
            .map_err(|_| Error::invalid_address(s))
    }
}

impl TryFrom<String> for Ipv4Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ipv4Address> for String {
    fn from(value: Ipv4Address) -> Self {
        value.to_string()
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Self(addr)
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self(Ipv4Addr::from(octets))
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies the record the updater manages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordRef {
    /// Provider-assigned zone identifier
    pub zone_id: String,

    /// Fully-qualified record name (e.g. "home.example.com")
    pub name: String,

    /// TTL written on upsert
    pub ttl_seconds: u32,
}

impl DnsRecordRef {
    /// Record type managed by the updater; only "A" is supported
    pub const RECORD_TYPE: &'static str = "A";

    /// Create a record reference with the default TTL
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl_seconds: u32) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Record type of this reference
    pub fn record_type(&self) -> &'static str {
        Self::RECORD_TYPE
    }
}

/// Step of a run in which a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Resolve,
    Read,
    HealthSignal,
    Upsert,
    Report,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Resolve => "resolve",
            Stage::Read => "read",
            Stage::HealthSignal => "health_signal",
            Stage::Upsert => "upsert",
            Stage::Report => "report",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one reconciliation run
#[derive(Debug)]
pub enum ReconciliationOutcome {
    /// Published record already matched the public IP (no write)
    Unchanged {
        /// The address both sides agree on
        address: Ipv4Address,
    },

    /// Record was written with the public IP
    Updated {
        /// The previously published address, `None` on first run
        previous: Option<Ipv4Address>,
        /// The newly published address
        address: Ipv4Address,
    },

    /// Record differs from the public IP but the client only logged the write
    WouldUpdate {
        /// The address still published, `None` if the record is missing
        previous: Option<Ipv4Address>,
        /// The address a real run would have published
        address: Ipv4Address,
    },

    /// The run stopped at `stage`
    Failed {
        /// Where the run stopped
        stage: Stage,
        /// Why it stopped
        error: Error,
    },
}

impl ReconciliationOutcome {
    pub fn failed(stage: Stage, error: Error) -> Self {
        Self::Failed { stage, error }
    }

    /// Whether the run completed (updated, would update, or nothing to do)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Short tag used in logs and run records
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged { .. } => "unchanged",
            Self::Updated { .. } => "updated",
            Self::WouldUpdate { .. } => "would_update",
            Self::Failed { .. } => "failed",
        }
    }

    /// The address published after the run, if it completed
    pub fn address(&self) -> Option<Ipv4Address> {
        match self {
            Self::Unchanged { address } | Self::Updated { address, .. } => Some(*address),
            Self::WouldUpdate { previous, .. } => *previous,
            Self::Failed { .. } => None,
        }
    }

    /// The failing stage, if any
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Failed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl fmt::Display for ReconciliationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged { address } => write!(f, "unchanged ({address})"),
            Self::Updated {
                previous: Some(previous),
                address,
            } => write!(f, "updated {previous} -> {address}"),
            Self::Updated {
                previous: None,
                address,
            } => write!(f, "created -> {address}"),
            Self::WouldUpdate {
                previous: Some(previous),
                address,
            } => write!(f, "would update {previous} -> {address}"),
            Self::WouldUpdate {
                previous: None,
                address,
            } => write!(f, "would create -> {address}"),
            Self::Failed { stage, error } => write!(f, "failed at {stage}: {error}"),
        }
    }
}
