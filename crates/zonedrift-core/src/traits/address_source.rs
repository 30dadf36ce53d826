// # Address Source Trait
//
// Defines the interface for detecting the host's current public addresses.
//
// ## Implementations
//
// - Local interface enumeration: `zonedrift-ip-local` crate
// - Future: HTTP "what is my IP" services, platform-specific APIs
//
// ## Usage
//
// ```rust,ignore
// use zonedrift_core::AddressSource;
//
// let source = /* AddressSource implementation */;
// let addr = source.detect().await?;
// if let Some(v4) = addr.ipv4 {
//     println!("public IPv4: {v4}");
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

use crate::traits::dns_provider::RecordType;

/// The host's best-guess public addresses, one slot per family.
///
/// Produced fresh on every reconciliation tick and discarded after use.
/// A populated slot always holds a globally routable address; bogon
/// addresses (loopback, link-local, private and reserved ranges) never
/// reach this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetectedAddress {
    /// Public IPv4 address, if any interface carries one
    pub ipv4: Option<std::net::Ipv4Addr>,
    /// Public IPv6 address, if any interface carries one
    pub ipv6: Option<std::net::Ipv6Addr>,
}

impl DetectedAddress {
    /// The detected address matching `record_type`, if present
    pub fn for_type(&self, record_type: RecordType) -> Option<IpAddr> {
        match record_type {
            RecordType::A => self.ipv4.map(IpAddr::V4),
            RecordType::Aaaa => self.ipv6.map(IpAddr::V6),
        }
    }
}

/// Trait for address source implementations
///
/// `detect()` is called once per reconciliation tick. An error is fatal
/// for that tick only; the engine retries from scratch on the next one.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Detect the current public addresses
    ///
    /// # Returns
    ///
    /// - `Ok(DetectedAddress)`: the per-family snapshot (slots may be empty)
    /// - `Err(Error)`: if enumeration itself failed
    async fn detect(&self) -> Result<DetectedAddress, crate::Error>;

    /// Source name for logging/debugging (e.g. "local-interfaces")
    fn source_name(&self) -> &'static str;
}
