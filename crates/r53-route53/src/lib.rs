// # Route 53 Record Client
//
// This crate provides the AWS Route 53 implementation of `DnsRecordClient`.
//
// ## Behaviour
//
// - One API call per method (`ListResourceRecordSets` or `ChangeResourceRecordSets`)
// - No retry logic; the SDK retry layer is disabled and a failed run is
//   retried by the scheduler
// - Operation timeout on every call
// - Dry-run mode: reads normally, logs the change batch instead of sending it
//
// ## Security Requirements
//
// - The secret access key NEVER appears in logs or Debug output
// - Credentials come from settings only; the default AWS provider chain is
//   not consulted
//
// ## API Reference
//
// - ListResourceRecordSets: `GET /2013-04-01/hostedzone/{Id}/rrset?name=...&type=A&maxitems=1`
// - ChangeResourceRecordSets: `POST /2013-04-01/hostedzone/{Id}/rrset` with an UPSERT change

use std::time::Duration;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_route53::Client;
use aws_sdk_route53::config::Credentials as AwsCredentials;
use aws_sdk_route53::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_route53::types::{
    Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use r53_core::traits::DnsRecordClient;
use r53_core::{Credentials, DnsRecordRef, Error, Ipv4Address, Result, Settings};

/// Provider name used in errors and logs
pub const PROVIDER: &str = "route53";

/// Default operation timeout for API requests
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Comment attached to every change batch
const CHANGE_COMMENT: &str = "r53-ddns: public IP changed";

/// Route 53 record client
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Perform `ListResourceRecordSets` normally
/// - Log the intended change batch
/// - **NOT** call `ChangeResourceRecordSets`
pub struct Route53Client {
    /// SDK client (credentials live inside its config)
    client: Client,

    /// Region the client was built for
    region: String,

    /// Dry-run mode: if true, skip writes
    dry_run: bool,
}

// Custom Debug implementation that never touches the credentials
impl std::fmt::Debug for Route53Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route53Client")
            .field("region", &self.region)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl Route53Client {
    /// Build a client from static credentials
    ///
    /// # Parameters
    ///
    /// - `credentials`: Access key pair with `route53:ListResourceRecordSets`
    ///   and `route53:ChangeResourceRecordSets` on the zone
    /// - `region`: AWS region for request signing
    /// - `timeout`: Operation timeout applied to every call
    /// - `dry_run`: If true, never write
    pub async fn connect(
        credentials: &Credentials,
        region: impl Into<String>,
        timeout: Duration,
        dry_run: bool,
    ) -> Self {
        let region = region.into();
        let aws_credentials = AwsCredentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "r53-ddns-settings",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(aws_credentials)
            .retry_config(RetryConfig::disabled())
            .timeout_config(TimeoutConfig::builder().operation_timeout(timeout).build())
            .load()
            .await;

        if dry_run {
            tracing::warn!("Route 53 client running in DRY-RUN mode - no changes will be made");
        }

        Self {
            client: Client::new(&sdk_config),
            region,
            dry_run,
        }
    }

    /// Build a client from the process settings
    pub async fn from_settings(settings: &Settings) -> Self {
        Self::connect(
            &settings.credentials,
            settings.region.clone(),
            settings.http_timeout,
            settings.dry_run,
        )
        .await
    }

    /// Wrap an already-configured SDK client
    pub fn from_client(client: Client, region: impl Into<String>, dry_run: bool) -> Self {
        Self {
            client,
            region: region.into(),
            dry_run,
        }
    }
}

#[async_trait]
impl DnsRecordClient for Route53Client {
    /// Read the first value of the record's "A" set
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /2013-04-01/hostedzone/:zone_id/rrset?name=home.example.com&type=A&maxitems=1
    /// ```
    async fn read_current(&self, record: &DnsRecordRef) -> Result<Option<Ipv4Address>> {
        tracing::debug!(
            "Listing record sets in {} starting at {} ({})",
            record.zone_id,
            record.name,
            record.record_type()
        );

        let output = self
            .client
            .list_resource_record_sets()
            .hosted_zone_id(&record.zone_id)
            .start_record_name(&record.name)
            .start_record_type(RrType::A)
            .max_items(1)
            .send()
            .await
            .map_err(|e| map_sdk_error("ListResourceRecordSets", e))?;

        registered_address(output.resource_record_sets(), &record.name)
    }

    /// Create or replace the record with `address`
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /2013-04-01/hostedzone/:zone_id/rrset
    /// <ChangeBatch>
    ///   <Changes><Change>
    ///     <Action>UPSERT</Action>
    ///     <ResourceRecordSet>
    ///       <Name>home.example.com</Name><Type>A</Type><TTL>3600</TTL>
    ///       <ResourceRecords><ResourceRecord><Value>1.2.3.4</Value></ResourceRecord></ResourceRecords>
    ///     </ResourceRecordSet>
    ///   </Change></Changes>
    /// </ChangeBatch>
    /// ```
    async fn upsert(&self, record: &DnsRecordRef, address: &Ipv4Address) -> Result<()> {
        let batch = upsert_change_batch(record, address)?;

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would UPSERT {} {} {} (ttl {}) in zone {}",
                record.name,
                record.record_type(),
                address,
                record.ttl_seconds,
                record.zone_id
            );
            return Ok(());
        }

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&record.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| map_sdk_error("ChangeResourceRecordSets", e))?;

        if let Some(info) = output.change_info() {
            tracing::info!(
                "Route 53 accepted change {} ({})",
                info.id(),
                info.status().as_str()
            );
        }

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Pick the registered address out of a `ListResourceRecordSets` page
///
/// The list call is positional: it returns the first set at or after the
/// requested name, which may belong to another name or type. Only an exact
/// name match of type A counts; anything else, including a set with no
/// values (e.g. an alias record), means no address is registered.
pub fn registered_address(
    record_sets: &[ResourceRecordSet],
    record_name: &str,
) -> Result<Option<Ipv4Address>> {
    let Some(set) = record_sets.first() else {
        return Ok(None);
    };

    if !same_name(set.name(), record_name) || *set.r#type() != RrType::A {
        tracing::debug!(
            "First record set is {} {}, not {} A",
            set.name(),
            set.r#type().as_str(),
            record_name
        );
        return Ok(None);
    }

    let Some(first) = set.resource_records().first() else {
        return Ok(None);
    };

    first.value().parse::<Ipv4Address>().map(Some).map_err(|_| {
        Error::provider(
            PROVIDER,
            format!(
                "Record {} holds a value that is not an IPv4 address: {:?}",
                record_name,
                first.value()
            ),
        )
    })
}

/// Build the single-change UPSERT batch for `record`
pub fn upsert_change_batch(record: &DnsRecordRef, address: &Ipv4Address) -> Result<ChangeBatch> {
    let build_error =
        |e: aws_sdk_route53::error::BuildError| Error::provider(PROVIDER, format!("Invalid change batch: {}", e));

    let value = ResourceRecord::builder()
        .value(address.to_string())
        .build()
        .map_err(build_error)?;

    let record_set = ResourceRecordSet::builder()
        .name(&record.name)
        .r#type(RrType::A)
        .ttl(i64::from(record.ttl_seconds))
        .resource_records(value)
        .build()
        .map_err(build_error)?;

    let change = Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set)
        .build()
        .map_err(build_error)?;

    ChangeBatch::builder()
        .comment(CHANGE_COMMENT)
        .changes(change)
        .build()
        .map_err(build_error)
}

/// Compare record names the way DNS does
///
/// Route 53 answers with fully-qualified lowercase names ("home.example.com.");
/// configuration may omit the trailing dot or use another case.
fn same_name(a: &str, b: &str) -> bool {
    a.trim_end_matches('.').eq_ignore_ascii_case(b.trim_end_matches('.'))
}

/// Map an SDK error to the updater's error taxonomy
fn map_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_string);
    let detail = DisplayErrorContext(&err).to_string();
    classify_error(operation, code.as_deref(), &detail)
}

/// Classify a Route 53 error code
fn classify_error(operation: &str, code: Option<&str>, detail: &str) -> Error {
    match code {
        Some(
            "InvalidClientTokenId"
            | "SignatureDoesNotMatch"
            | "IncompleteSignature"
            | "AccessDenied"
            | "AccessDeniedException"
            | "UnrecognizedClientException"
            | "ExpiredToken",
        ) => Error::auth(format!("{} rejected the credentials: {}", operation, detail)),
        Some(
            "Throttling"
            | "ThrottlingException"
            | "PriorRequestNotComplete"
            | "TooManyRequestsException",
        ) => Error::rate_limited(format!("{} was throttled: {}", operation, detail)),
        Some("NoSuchHostedZone") => {
            Error::provider(PROVIDER, format!("Hosted zone not found: {}", detail))
        }
        _ => Error::provider(PROVIDER, format!("{} failed: {}", operation, detail)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(text: &str) -> Ipv4Address {
        text.parse().unwrap()
    }

    fn record_set(name: &str, rr_type: RrType, values: &[&str]) -> ResourceRecordSet {
        let mut builder = ResourceRecordSet::builder().name(name).r#type(rr_type).ttl(3600);
        for value in values {
            builder = builder.resource_records(ResourceRecord::builder().value(*value).build().unwrap());
        }
        builder.build().unwrap()
    }

    #[test]
    fn empty_page_means_no_record() {
        assert_eq!(registered_address(&[], "home.example.com").unwrap(), None);
    }

    #[test]
    fn first_value_of_matching_set_is_returned() {
        let sets = [record_set(
            "home.example.com.",
            RrType::A,
            &["203.0.113.5", "203.0.113.6"],
        )];
        assert_eq!(
            registered_address(&sets, "home.example.com").unwrap(),
            Some(ip("203.0.113.5"))
        );
    }

    #[test]
    fn neighbouring_name_is_not_a_match() {
        // The list API starts *at* the name; the next set in the zone comes back
        // when the record itself is missing.
        let sets = [record_set("mail.example.com.", RrType::A, &["198.51.100.1"])];
        assert_eq!(registered_address(&sets, "home.example.com").unwrap(), None);
    }

    #[test]
    fn other_record_type_is_not_a_match() {
        let sets = [record_set("home.example.com.", RrType::Aaaa, &["2001:db8::1"])];
        assert_eq!(registered_address(&sets, "home.example.com").unwrap(), None);
    }

    #[test]
    fn set_without_values_is_treated_as_missing() {
        let sets = [record_set("home.example.com.", RrType::A, &[])];
        assert_eq!(registered_address(&sets, "home.example.com").unwrap(), None);
    }

    #[test]
    fn non_ipv4_value_is_a_provider_error() {
        let sets = [record_set("home.example.com.", RrType::A, &["not-an-ip"])];
        assert!(matches!(
            registered_address(&sets, "home.example.com"),
            Err(Error::Provider { .. })
        ));
    }

    #[test]
    fn names_compare_without_trailing_dot_or_case() {
        assert!(same_name("home.example.com.", "home.example.com"));
        assert!(same_name("home.example.com", "Home.Example.COM."));
        assert!(!same_name("home.example.com.", "www.home.example.com"));
    }

    #[test]
    fn change_batch_is_a_single_a_upsert() {
        let record = DnsRecordRef::new("Z0123456789", "home.example.com").with_ttl(300);
        let batch = upsert_change_batch(&record, &ip("203.0.113.9")).unwrap();

        assert_eq!(batch.changes().len(), 1);
        let change = &batch.changes()[0];
        assert_eq!(change.action(), &ChangeAction::Upsert);

        let set = change.resource_record_set().unwrap();
        assert_eq!(set.name(), "home.example.com");
        assert_eq!(set.r#type(), &RrType::A);
        assert_eq!(set.ttl(), Some(300));
        assert_eq!(set.resource_records().len(), 1);
        assert_eq!(set.resource_records()[0].value(), "203.0.113.9");
    }

    #[test]
    fn error_codes_are_classified() {
        assert!(matches!(
            classify_error("ListResourceRecordSets", Some("InvalidClientTokenId"), "bad token"),
            Error::Authentication(_)
        ));
        assert!(matches!(
            classify_error("ChangeResourceRecordSets", Some("Throttling"), "Rate exceeded"),
            Error::RateLimited(_)
        ));
        assert!(matches!(
            classify_error("ChangeResourceRecordSets", Some("InvalidChangeBatch"), "bad"),
            Error::Provider { .. }
        ));
        assert!(matches!(
            classify_error("ListResourceRecordSets", None, "dispatch failure"),
            Error::Provider { .. }
        ));
    }

    #[tokio::test]
    async fn secret_not_exposed_in_debug() {
        let credentials = Credentials::new("AKIDEXAMPLE", "secret_key_12345");
        let client =
            Route53Client::connect(&credentials, "eu-west-1", DEFAULT_OPERATION_TIMEOUT, true)
                .await;

        let debug_str = format!("{:?}", client);
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("Route53Client"));
        assert!(debug_str.contains("eu-west-1"));
        assert!(client.is_dry_run());
        assert_eq!(client.provider_name(), "route53");
    }
}
