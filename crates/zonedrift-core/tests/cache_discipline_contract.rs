//! Contract tests: record-cache discipline
//!
//! Verifies the invalidate-after-update handshake between drift detection
//! and the record cache:
//! - a cache hit skips the provider fetch entirely
//! - a successful update evicts the entry, forcing a refetch next tick
//! - a failed update keeps the entry, so the drift retries from cache
//! - a fetch failure is scoped to the single host, not the tick

mod common;

use common::*;
use zonedrift_core::{RecordCache, StackMode};

#[tokio::test]
async fn second_tick_reuses_cache_without_refetch() {
    let source = FixedAddressSource::v4("203.0.113.5");
    let provider = ScriptedProvider::new()
        .with_zone("zone-1", "example.com")
        .with_records("www", vec![a_record("rec-1", "203.0.113.5", "www.example.com")]);
    let cache = RecordCache::new();
    let engine = engine_for(source, &provider, &cache, &["www"], StackMode::Ipv4);

    engine.run_tick().await;
    engine.run_tick().await;

    // The domain is resolved every tick, the records only once
    assert_eq!(provider.domain_call_count(), 2);
    assert_eq!(
        provider.fetch_call_count(),
        1,
        "second tick must be served from cache"
    );
    assert_eq!(provider.update_call_count(), 0);
}

#[tokio::test]
async fn successful_update_forces_refetch_on_next_tick() {
    let source = FixedAddressSource::v4("203.0.113.5");
    let provider = ScriptedProvider::new()
        .with_zone("zone-1", "example.com")
        .with_records("www", vec![a_record("rec-1", "203.0.113.9", "www.example.com")]);
    let cache = RecordCache::new();
    let engine = engine_for(source, &provider, &cache, &["www"], StackMode::Ipv4);

    engine.run_tick().await;
    assert_eq!(provider.fetch_call_count(), 1);
    assert!(
        cache.get("www.example.com").await.is_none(),
        "entry must be gone after the update"
    );

    engine.run_tick().await;
    assert_eq!(
        provider.fetch_call_count(),
        2,
        "post-update tick must refetch authoritative state"
    );
}

#[tokio::test]
async fn failed_update_leaves_cache_entry_for_retry() {
    let source = FixedAddressSource::v4("203.0.113.5");
    let provider = ScriptedProvider::new()
        .with_zone("zone-1", "example.com")
        .with_records("www", vec![a_record("rec-1", "203.0.113.9", "www.example.com")])
        .failing_updates();
    let cache = RecordCache::new();
    let engine = engine_for(source, &provider, &cache, &["www"], StackMode::Ipv4);

    engine.run_tick().await;

    assert_eq!(provider.update_call_count(), 1);
    assert!(
        cache.get("www.example.com").await.is_some(),
        "a failed update must not evict the entry"
    );

    // Next tick: drift is re-detected from cache, no refetch, retry issued
    engine.run_tick().await;
    assert_eq!(provider.fetch_call_count(), 1);
    assert_eq!(provider.update_call_count(), 2);
}

#[tokio::test]
async fn fetch_failure_is_scoped_to_single_host() {
    let source = FixedAddressSource::v4("203.0.113.5");
    let provider = ScriptedProvider::new()
        .with_zone("zone-1", "example.com")
        .with_records("www", vec![a_record("rec-1", "203.0.113.9", "www.example.com")])
        .with_records("mail", vec![a_record("rec-2", "203.0.113.9", "mail.example.com")])
        .failing_fetch_for("www");
    let cache = RecordCache::new();
    let engine = engine_for(source, &provider, &cache, &["www", "mail"], StackMode::Ipv4);

    engine.run_tick().await;

    // Both fetches attempted; only the healthy host got updated
    assert_eq!(provider.fetch_call_count(), 2);
    assert_eq!(
        provider.updates(),
        vec![("rec-2".to_string(), "203.0.113.5".to_string())]
    );
    assert!(cache.get("www.example.com").await.is_none());
}

#[tokio::test]
async fn cache_entries_grow_lazily_per_host() {
    let source = FixedAddressSource::v4("203.0.113.5");
    let provider = ScriptedProvider::new()
        .with_zone("zone-1", "example.com")
        .with_records("www", vec![a_record("rec-1", "203.0.113.5", "www.example.com")])
        .with_records("mail", vec![a_record("rec-2", "203.0.113.5", "mail.example.com")]);
    let cache = RecordCache::new();
    let engine = engine_for(source, &provider, &cache, &["www", "mail"], StackMode::Ipv4);

    assert!(cache.is_empty().await, "cache starts empty at process start");

    engine.run_tick().await;

    assert_eq!(cache.len().await, 2);
    assert!(cache.get("www.example.com").await.is_some());
    assert!(cache.get("mail.example.com").await.is_some());
}
