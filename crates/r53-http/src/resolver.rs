// # HTTP Public IP Resolver
//
// Fetches the caller's public IPv4 address from a plain-text echo service
// (e.g. checkip.amazonaws.com, api.ipify.org). The body must be exactly one
// dotted-quad address, optionally followed by whitespace or a newline.

use std::time::Duration;

use async_trait::async_trait;
use r53_core::traits::PublicIpResolver;
use r53_core::{Error, Ipv4Address, Result};

/// Default "echo my IP" service
pub const DEFAULT_IP_SERVICE: &str = "http://checkip.amazonaws.com/";

/// Public IP resolver backed by an HTTP echo service
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP from (e.g., "http://checkip.amazonaws.com/")
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, crate::DEFAULT_TIMEOUT)
    }

    /// Create a resolver with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            url: url.into(),
            client: crate::build_client(timeout)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Parse an echo-service body into an address
///
/// Surrounding whitespace is ignored; anything else that is not a single
/// IPv4 address is an error.
pub fn parse_body(body: &str) -> Result<Ipv4Address> {
    let text = body.trim();
    text.parse::<Ipv4Address>()
        .map_err(|_| Error::resolution(format!("Invalid IPv4 address in response: {:?}", text)))
}

#[async_trait]
impl PublicIpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<Ipv4Address> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::resolution(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::resolution(format!(
                "HTTP error from {}: {}",
                self.url, status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::resolution(format!("Failed to read response: {}", e)))?;

        parse_body(&body)
    }

    fn source_name(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn body_is_trimmed() {
        assert_eq!(
            parse_body("203.0.113.5\n").unwrap(),
            "203.0.113.5".parse::<Ipv4Address>().unwrap()
        );
        assert!(parse_body("  198.51.100.1 \r\n").is_ok());
    }

    #[test]
    fn body_must_be_a_single_ipv4_address() {
        for body in ["", "\n", "203.0.113.5 203.0.113.6", "2001:db8::1", "<html>", "203.0.113"] {
            assert!(
                matches!(parse_body(body), Err(Error::Resolution(_))),
                "{body:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn resolves_plain_text_answer() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("203.0.113.5\n");
        });

        let resolver = HttpIpResolver::new(server.url("/")).unwrap();
        let ip = resolver.resolve().await.unwrap();

        mock.assert();
        assert_eq!(ip.to_string(), "203.0.113.5");
    }

    #[tokio::test]
    async fn non_2xx_is_a_resolution_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(503).body("203.0.113.5");
        });

        let resolver = HttpIpResolver::new(server.url("/")).unwrap();
        let err = resolver.resolve().await.unwrap_err();

        assert!(matches!(err, Error::Resolution(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn garbage_body_is_a_resolution_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("not an address");
        });

        let resolver = HttpIpResolver::new(server.url("/")).unwrap();
        assert!(matches!(
            resolver.resolve().await,
            Err(Error::Resolution(_))
        ));
    }

    #[tokio::test]
    async fn slow_service_times_out() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .body("203.0.113.5")
                .delay(Duration::from_millis(500));
        });

        let resolver =
            HttpIpResolver::with_timeout(server.url("/"), Duration::from_millis(50)).unwrap();
        assert!(matches!(
            resolver.resolve().await,
            Err(Error::Resolution(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_service_is_a_resolution_error() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let resolver = HttpIpResolver::new("http://127.0.0.1:9/").unwrap();
        assert!(matches!(
            resolver.resolve().await,
            Err(Error::Resolution(_))
        ));
    }
}
