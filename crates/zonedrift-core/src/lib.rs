// # zonedrift-core
//
// Core library for the zonedrift dynamic DNS daemon.
//
// ## Architecture Overview
//
// This library provides the reconciliation core that keeps provider DNS
// records synchronized with the host's detected public addresses:
// - **AddressSource**: Trait for detecting the host's public IPv4/IPv6 addresses
// - **DnsProvider**: Trait for querying and updating DNS records via provider APIs
// - **RecordCache**: Per-hostname cache of the provider's current record set
// - **StackPolicy**: Validation of detected addresses against the addressing mode
// - **ReconciliationEngine**: The detect → validate → compare → update flow
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Schedule-Driven**: The daemon invokes `run_tick` on a fixed interval;
//    each tick re-derives everything it needs except the record cache
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Logs-Only Observability**: A tick never returns a status; every
//    outcome is reported through tracing

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod policy;
pub mod traits;

// Re-export core types for convenience
pub use cache::RecordCache;
pub use config::{Credentials, ReconciliationConfig, StackMode};
pub use engine::ReconciliationEngine;
pub use error::{Error, Result};
pub use traits::{
    AddressSource, DetectedAddress, DnsProvider, DomainDescriptor, HostRecord, RecordType,
};
