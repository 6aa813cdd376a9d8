// # DNS Record Client Trait
//
// Defines the minimal provider surface the updater needs: read the value of
// one "A" record and create-or-replace it.
//
// ## Implementations
//
// - AWS Route 53: `r53-route53` crate (`Route53Client`)
//
// ## Usage
//
// ```rust,ignore
// use r53_core::{DnsRecordClient, DnsRecordRef};
//
// let client = /* DnsRecordClient implementation */;
// let record = DnsRecordRef::new("Z0123456789", "home.example.com");
//
// match client.read_current(&record).await? {
//     Some(ip) => println!("Registered IP address is {ip}"),
//     None => println!("No A record yet"),
// }
//
// client.upsert(&record, &"203.0.113.5".parse()?).await?;
// ```

use async_trait::async_trait;

use crate::model::{DnsRecordRef, Ipv4Address};

/// Trait for DNS provider clients
///
/// This is intentionally not a general DNS-management client. Clients must:
///
/// - Make one provider call per method invocation
/// - Never retry or back off (a failed run is retried by the scheduler)
/// - Never decide whether an update is needed (owned by `Reconciler`)
/// - Never log credentials
#[async_trait]
pub trait DnsRecordClient: Send + Sync {
    /// Read the currently published address of the record
    ///
    /// # Returns
    ///
    /// - `Ok(Some(address))`: The first value of the record set
    /// - `Ok(None)`: No such record, or a record set with no values
    ///   (a legitimate first-run state)
    /// - `Err(Error)`: The call failed or the response was malformed
    async fn read_current(&self, record: &DnsRecordRef)
    -> Result<Option<Ipv4Address>, crate::Error>;

    /// Create or replace the record with a single address
    ///
    /// # Idempotency
    ///
    /// Calling this twice with the same address leaves the provider in the
    /// same state; this relies on the provider's upsert semantics, not on
    /// local state.
    async fn upsert(&self, record: &DnsRecordRef, address: &Ipv4Address)
    -> Result<(), crate::Error>;

    /// Whether `upsert` only logs the change instead of sending it
    ///
    /// The reconciler reports a successful upsert from a dry-run client as
    /// `WouldUpdate`, never as `Updated`.
    fn is_dry_run(&self) -> bool {
        false
    }

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
