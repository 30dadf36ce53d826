// # DNS Provider Trait
//
// Defines the interface for querying and updating DNS records via
// provider APIs.
//
// ## Implementations
//
// - Cloudflare: `zonedrift-provider-cloudflare` crate
//
// Providers are single-shot API clients: one HTTP call per method, no
// retry, no backoff, no caching. Record caching is owned by
// [`crate::RecordCache`], and retry is owned by the schedule — the next
// tick starts from scratch. Whether a failure aborts the whole tick or a
// single host is the engine's decision, so providers return errors
// untouched.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// DNS record type relevant to address reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// IPv4 address record
    A,
    /// IPv6 address record
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One DNS record as held by the provider
///
/// A configured host typically maps to several of these, one per address
/// family actually present at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Provider-opaque record ID
    pub id: String,
    /// Record type (A or AAAA)
    pub record_type: RecordType,
    /// Current record content, an IP literal
    pub content: String,
    /// Fully-qualified record name
    pub hostname: String,
}

/// The authoritative domain (zone) as resolved by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainDescriptor {
    /// Provider-opaque domain ID
    pub id: String,
    /// Zone name
    pub name: String,
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Resolve the authoritative domain by zone name
    ///
    /// # Returns
    ///
    /// - `Ok(DomainDescriptor)`: the zone's ID and canonical name
    /// - `Err(Error::DomainNotFound)`: the provider has no zone by this name
    /// - `Err(Error)`: transport or authentication failure
    async fn domain_by_name(&self, domain: &str) -> Result<DomainDescriptor, crate::Error>;

    /// List the address records for `{host_label}.{domain}`
    ///
    /// Only A and AAAA records are returned; records of other types are
    /// dropped.
    ///
    /// # Parameters
    ///
    /// - `domain_id`: the zone ID from [`DnsProvider::domain_by_name`]
    /// - `host_label`: the bare subdomain label (e.g. "www")
    /// - `domain`: the zone name (e.g. "example.com")
    async fn records_for_host(
        &self,
        domain_id: &str,
        host_label: &str,
        domain: &str,
    ) -> Result<Vec<HostRecord>, crate::Error>;

    /// Rewrite `record`'s content to `new_content`
    ///
    /// # Parameters
    ///
    /// - `domain_id`: the zone ID the record belongs to
    /// - `record`: the record as last fetched from the provider
    /// - `new_content`: the IP literal to store
    async fn update_record(
        &self,
        domain_id: &str,
        record: &HostRecord,
        new_content: &str,
    ) -> Result<(), crate::Error>;

    /// Provider name for logging/debugging (e.g. "cloudflare")
    fn provider_name(&self) -> &'static str;
}
