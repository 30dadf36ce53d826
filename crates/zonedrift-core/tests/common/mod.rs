//! Test doubles and common utilities for reconciliation contract tests
//!
//! This module provides scripted collaborators that record every call the
//! engine makes, so tests can assert on provider traffic without any real
//! network or interface I/O.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use zonedrift_core::traits::{
    AddressSource, DetectedAddress, DnsProvider, DomainDescriptor, HostRecord, RecordType,
};
use zonedrift_core::{
    Credentials, Error, RecordCache, ReconciliationConfig, ReconciliationEngine, Result, StackMode,
};

/// An address source that returns the same snapshot on every tick
pub struct FixedAddressSource {
    addr: DetectedAddress,
    fail: bool,
    detect_call_count: Arc<AtomicUsize>,
}

impl FixedAddressSource {
    pub fn new(addr: DetectedAddress) -> Self {
        Self {
            addr,
            fail: false,
            detect_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Source with only a public IPv4 address
    pub fn v4(ip: &str) -> Self {
        Self::new(DetectedAddress {
            ipv4: Some(ip.parse().expect("valid IPv4 literal")),
            ipv6: None,
        })
    }

    /// Source with a public address for both families
    pub fn dual(ipv4: &str, ipv6: &str) -> Self {
        Self::new(DetectedAddress {
            ipv4: Some(ipv4.parse().expect("valid IPv4 literal")),
            ipv6: Some(ipv6.parse().expect("valid IPv6 literal")),
        })
    }

    /// Source whose detection always fails
    pub fn failing() -> Self {
        Self {
            addr: DetectedAddress::default(),
            fail: true,
            detect_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times detect() was called
    pub fn detect_call_count(&self) -> usize {
        self.detect_call_count.load(Ordering::SeqCst)
    }

    /// Create a handle that shares counters with this source
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            addr: other.addr,
            fail: other.fail,
            detect_call_count: Arc::clone(&other.detect_call_count),
        }
    }
}

#[async_trait]
impl AddressSource for FixedAddressSource {
    async fn detect(&self) -> Result<DetectedAddress> {
        self.detect_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::Network(std::io::Error::other(
                "interface enumeration scripted to fail",
            )));
        }
        Ok(self.addr)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A provider double with scripted responses and call counters
///
/// Clones share all state, so tests keep one handle for assertions while
/// the engine owns another.
#[derive(Clone)]
pub struct ScriptedProvider {
    inner: Arc<ProviderInner>,
}

struct ProviderInner {
    zone: Mutex<Option<DomainDescriptor>>,
    /// Record sets keyed by host label
    records: Mutex<HashMap<String, Vec<HostRecord>>>,
    fail_fetch_for: Mutex<HashSet<String>>,
    fail_updates: AtomicBool,
    domain_call_count: AtomicUsize,
    fetch_call_count: AtomicUsize,
    update_call_count: AtomicUsize,
    /// Successful updates as (record id, new content) pairs, in order
    updates: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    /// Provider with no zone configured: every domain lookup fails
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ProviderInner {
                zone: Mutex::new(None),
                records: Mutex::new(HashMap::new()),
                fail_fetch_for: Mutex::new(HashSet::new()),
                fail_updates: AtomicBool::new(false),
                domain_call_count: AtomicUsize::new(0),
                fetch_call_count: AtomicUsize::new(0),
                update_call_count: AtomicUsize::new(0),
                updates: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn with_zone(self, id: &str, name: &str) -> Self {
        *self.inner.zone.lock().unwrap() = Some(DomainDescriptor {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    pub fn with_records(self, host_label: &str, records: Vec<HostRecord>) -> Self {
        self.inner
            .records
            .lock()
            .unwrap()
            .insert(host_label.to_string(), records);
        self
    }

    pub fn failing_fetch_for(self, host_label: &str) -> Self {
        self.inner
            .fail_fetch_for
            .lock()
            .unwrap()
            .insert(host_label.to_string());
        self
    }

    pub fn failing_updates(self) -> Self {
        self.inner.fail_updates.store(true, Ordering::SeqCst);
        self
    }

    /// Get the number of times domain_by_name() was called
    pub fn domain_call_count(&self) -> usize {
        self.inner.domain_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times records_for_host() was called
    pub fn fetch_call_count(&self) -> usize {
        self.inner.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.inner.update_call_count.load(Ordering::SeqCst)
    }

    /// Successful updates as (record id, new content) pairs, in order
    pub fn updates(&self) -> Vec<(String, String)> {
        self.inner.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsProvider for ScriptedProvider {
    async fn domain_by_name(&self, domain: &str) -> Result<DomainDescriptor> {
        self.inner.domain_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner
            .zone
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::domain_not_found(domain))
    }

    async fn records_for_host(
        &self,
        _domain_id: &str,
        host_label: &str,
        _domain: &str,
    ) -> Result<Vec<HostRecord>> {
        self.inner.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        if self
            .inner
            .fail_fetch_for
            .lock()
            .unwrap()
            .contains(host_label)
        {
            return Err(Error::provider(
                "scripted",
                format!("fetch scripted to fail for {host_label}"),
            ));
        }
        Ok(self
            .inner
            .records
            .lock()
            .unwrap()
            .get(host_label)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_record(
        &self,
        _domain_id: &str,
        record: &HostRecord,
        new_content: &str,
    ) -> Result<()> {
        self.inner.update_call_count.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_updates.load(Ordering::SeqCst) {
            return Err(Error::provider("scripted", "update scripted to fail"));
        }
        self.inner
            .updates
            .lock()
            .unwrap()
            .push((record.id.clone(), new_content.to_string()));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

pub fn a_record(id: &str, content: &str, hostname: &str) -> HostRecord {
    HostRecord {
        id: id.to_string(),
        record_type: RecordType::A,
        content: content.to_string(),
        hostname: hostname.to_string(),
    }
}

pub fn aaaa_record(id: &str, content: &str, hostname: &str) -> HostRecord {
    HostRecord {
        id: id.to_string(),
        record_type: RecordType::Aaaa,
        content: content.to_string(),
        hostname: hostname.to_string(),
    }
}

/// Build an engine over the doubles with a minimal valid config
pub fn engine_for(
    source: FixedAddressSource,
    provider: &ScriptedProvider,
    cache: &RecordCache,
    hosts: &[&str],
    stack: StackMode,
) -> ReconciliationEngine {
    let config = ReconciliationConfig {
        domain: "example.com".to_string(),
        hosts: hosts.iter().map(|s| s.to_string()).collect(),
        stack,
        credentials: Credentials {
            email: "ops@example.com".to_string(),
            api_token: "test-token".to_string(),
        },
    };

    ReconciliationEngine::new(
        Box::new(source),
        Box::new(provider.clone()),
        cache.clone(),
        &config,
    )
    .expect("engine construction succeeds")
}
