//! Core traits for the zonedrift system
//!
//! This module defines the collaborator interfaces the engine consumes.
//!
//! - [`AddressSource`]: Detect the host's current public addresses
//! - [`DnsProvider`]: Query and update DNS records via provider APIs

pub mod address_source;
pub mod dns_provider;

pub use address_source::{AddressSource, DetectedAddress};
pub use dns_provider::{DnsProvider, DomainDescriptor, HostRecord, RecordType};
