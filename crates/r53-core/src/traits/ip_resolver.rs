// # Public IP Resolver Trait
//
// Defines the interface for discovering the caller's public IPv4 address.
//
// ## Implementations
//
// - HTTP echo service: `r53-http` crate (`HttpIpResolver`)
//
// ## Usage
//
// ```rust,ignore
// use r53_core::PublicIpResolver;
//
// let resolver = /* PublicIpResolver implementation */;
// let public_ip = resolver.resolve().await?;
// println!("My current IP address is {public_ip}");
// ```

use async_trait::async_trait;

use crate::model::Ipv4Address;

/// Trait for public IP resolver implementations
///
/// A resolver performs exactly one lookup per call. It does not cache, retry
/// or fall back to another service; the scheduler's next invocation is the
/// retry.
#[async_trait]
pub trait PublicIpResolver: Send + Sync {
    /// Look up the current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Address)`: The validated address
    /// - `Err(Error::Resolution)`: Network failure, timeout, non-2xx status,
    ///   or a body that is not exactly one IPv4 address
    async fn resolve(&self) -> Result<Ipv4Address, crate::Error>;

    /// Name of the lookup source (for logging)
    fn source_name(&self) -> &str;
}
