// # Record Cache
//
// Per-hostname cache of the provider's current DNS record set.
//
// ## Purpose
//
// Avoids a provider lookup on every reconciliation tick: a host's records
// are fetched once and reused until an update is issued for that host.
//
// ## Discipline
//
// A cache hit is trusted without a freshness check. Correctness relies
// entirely on the engine's invalidate-after-update handshake: the moment
// an update succeeds for a hostname, its entry is evicted, so the next
// tick refetches authoritative state. Entry lifecycle:
//
// ```text
// Absent ──first fetch──▶ Cached ──successful update──▶ Absent
// ```
//
// No other transitions exist. Nothing is persisted: the cache starts
// empty on every launch and dies with the process.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::traits::HostRecord;

/// Concurrency-safe record cache
///
/// All entries live in a HashMap protected by an RwLock, so get/put/
/// invalidate are individually atomic and safe under concurrent tasks.
/// Cloning is cheap and shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct RecordCache {
    inner: Arc<RwLock<HashMap<String, Vec<HostRecord>>>>,
}

impl RecordCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The cached record set for `hostname`, if present
    pub async fn get(&self, hostname: &str) -> Option<Vec<HostRecord>> {
        self.inner.read().await.get(hostname).cloned()
    }

    /// Replace the cached record set for `hostname`
    pub async fn put(&self, hostname: &str, records: Vec<HostRecord>) {
        self.inner.write().await.insert(hostname.to_string(), records);
    }

    /// Evict `hostname`, forcing the next `get` to miss
    pub async fn invalidate(&self, hostname: &str) {
        self.inner.write().await.remove(hostname);
    }

    /// Number of cached hostnames
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the cache is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Drop every entry
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}
