//! Reconciliation engine
//!
//! The ReconciliationEngine runs one tick of the detect → validate →
//! compare → update cycle across all configured hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐          ┌─────────────┐
//! │ AddressSource │─detect──▶│ StackPolicy │  (failure aborts the tick)
//! └───────────────┘          └─────────────┘
//!                                   │
//!                                   ▼
//!                            ┌─────────────┐    miss: fetch+put   ┌─────────────┐
//!                            │ RecordCache │◀────────────────────▶│ DnsProvider │
//!                            └─────────────┘                      └─────────────┘
//!                                   │                                    ▲
//!                                   ▼                                    │
//!                             drift compare ───── update on drift ───────┘
//!                                   │
//!                                   ▼
//!                       invalidate entry on success
//! ```
//!
//! ## Failure scopes
//!
//! Address detection, stack validation and the domain lookup abort the
//! whole tick. Fetching one host's records aborts only that host; the
//! remaining hosts are still reconciled. A failed update is logged and
//! the cache entry is kept, so the same drift is detected again from
//! cache on the next tick. Nothing propagates to the caller — the next
//! scheduled tick retries from scratch.

use tracing::{debug, error, info, warn};

use crate::cache::RecordCache;
use crate::config::{ReconciliationConfig, StackMode};
use crate::error::{Error, Result};
use crate::policy;
use crate::traits::{
    AddressSource, DetectedAddress, DnsProvider, DomainDescriptor, HostRecord, RecordType,
};

/// Orchestrates one reconciliation tick across all configured hosts
///
/// Collaborators are injected once at startup. The engine holds no mutable
/// state of its own; the only state that survives between ticks is the
/// shared [`RecordCache`].
pub struct ReconciliationEngine {
    /// Address source for detecting the host's public addresses
    source: Box<dyn AddressSource>,

    /// DNS provider for querying and updating records
    provider: Box<dyn DnsProvider>,

    /// Per-hostname record cache
    cache: RecordCache,

    /// Zone name
    domain: String,

    /// Subdomain labels, processed in configuration order
    hosts: Vec<String>,

    /// Addressing mode
    stack: StackMode,
}

impl ReconciliationEngine {
    /// Create a new reconciliation engine
    ///
    /// # Parameters
    ///
    /// - `source`: address source implementation
    /// - `provider`: DNS provider implementation
    /// - `cache`: record cache, constructed once at startup (clones share
    ///   entries, so callers can keep a handle for inspection)
    /// - `config`: reconciliation configuration, validated here
    pub fn new(
        source: Box<dyn AddressSource>,
        provider: Box<dyn DnsProvider>,
        cache: RecordCache,
        config: &ReconciliationConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            provider,
            cache,
            domain: config.domain.clone(),
            hosts: config.hosts.clone(),
            stack: config.stack,
        })
    }

    /// Run one reconciliation tick
    ///
    /// Never returns an error: every failure is terminal for the current
    /// tick only, and all outcomes are reported via logs.
    pub async fn run_tick(&self) {
        debug!(
            stack = %self.stack,
            hosts = self.hosts.len(),
            source = self.source.source_name(),
            provider = self.provider.provider_name(),
            "starting reconciliation tick"
        );

        if let Err(e) = self.tick().await {
            warn!(error = %e, "reconciliation tick aborted");
        }
    }

    async fn tick(&self) -> Result<()> {
        let addr = self.source.detect().await?;
        debug!(ipv4 = ?addr.ipv4, ipv6 = ?addr.ipv6, "detected addresses");

        policy::validate(&addr, self.stack)?;

        let zone = match self.provider.domain_by_name(&self.domain).await {
            Ok(zone) => zone,
            Err(e) => {
                // A failed zone lookup is most often a credential problem.
                error!(
                    domain = %self.domain,
                    "domain lookup failed; double-check that the API token is valid"
                );
                return Err(e);
            }
        };

        for label in &self.hosts {
            let hostname = format!("{label}.{}", self.domain);
            debug!(host = %hostname, "reviewing host");
            if let Err(e) = self.reconcile_host(&zone, label, &hostname, &addr).await {
                warn!(host = %hostname, error = %e, "host skipped for this tick");
            }
        }

        debug!("reconciliation tick complete");
        Ok(())
    }

    /// Reconcile a single host; errors abort this host only
    async fn reconcile_host(
        &self,
        zone: &DomainDescriptor,
        label: &str,
        hostname: &str,
        addr: &DetectedAddress,
    ) -> Result<()> {
        let records = match self.cache.get(hostname).await {
            Some(records) => records,
            None => {
                let fetched = self
                    .provider
                    .records_for_host(&zone.id, label, &self.domain)
                    .await
                    .map_err(|e| Error::record_fetch(hostname, e.to_string()))?;
                self.cache.put(hostname, fetched.clone()).await;
                fetched
            }
        };

        let mut updated = false;
        for record_type in self.stack.required_types() {
            if self
                .reconcile_family(zone, hostname, &records, *record_type, addr)
                .await
            {
                updated = true;
            }
        }

        // Invalidate-after-update handshake: the next tick must refetch
        // authoritative state instead of trusting the pre-update entry.
        if updated {
            self.cache.invalidate(hostname).await;
        }

        Ok(())
    }

    /// Compare one address family and update the provider record on drift
    ///
    /// Returns true when an update was issued successfully. A failed
    /// update returns false, leaving the cache entry in place so the same
    /// drift is detected again on the next tick.
    async fn reconcile_family(
        &self,
        zone: &DomainDescriptor,
        hostname: &str,
        records: &[HostRecord],
        record_type: RecordType,
        addr: &DetectedAddress,
    ) -> bool {
        // policy::validate guarantees presence for every required family
        let Some(ip) = addr.for_type(record_type) else {
            return false;
        };

        let Some(record) = records.iter().find(|r| r.record_type == record_type) else {
            // No record of the required type at the provider: treated as
            // "no drift", not as an error.
            debug!(
                host = %hostname,
                record_type = %record_type,
                "no record of required type cached for host, skipping"
            );
            return false;
        };

        let want = ip.to_string();
        if record.content == want {
            debug!(host = %hostname, record_type = %record_type, ip = %want, "record in sync");
            return false;
        }

        info!(
            host = %hostname,
            record_type = %record_type,
            from = %record.content,
            to = %want,
            "record drifted, sending update"
        );

        match self.provider.update_record(&zone.id, record, &want).await {
            Ok(()) => true,
            Err(e) => {
                error!(
                    host = %hostname,
                    record_type = %record_type,
                    error = %e,
                    "failed to update record"
                );
                false
            }
        }
    }
}
