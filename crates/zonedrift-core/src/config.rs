//! Configuration types for the zonedrift system
//!
//! This module defines the reconciliation configuration and the addressing
//! mode. Configuration is loaded once at startup and read-only thereafter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::traits::RecordType;

/// Addressing mode the reconciler enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StackMode {
    /// IPv4 only (A records)
    Ipv4,
    /// IPv6 only (AAAA records)
    Ipv6,
    /// Both families must be present and reconciled
    Dual,
}

impl StackMode {
    /// Record types this mode reconciles, in fixed order
    pub fn required_types(&self) -> &'static [RecordType] {
        match self {
            StackMode::Ipv4 => &[RecordType::A],
            StackMode::Ipv6 => &[RecordType::Aaaa],
            StackMode::Dual => &[RecordType::A, RecordType::Aaaa],
        }
    }
}

impl FromStr for StackMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "ipv4" => Ok(StackMode::Ipv4),
            "ipv6" => Ok(StackMode::Ipv6),
            "dual" => Ok(StackMode::Dual),
            other => Err(Error::UnknownStackMode(other.to_string())),
        }
    }
}

impl fmt::Display for StackMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StackMode::Ipv4 => "ipv4",
            StackMode::Ipv6 => "ipv6",
            StackMode::Dual => "dual",
        };
        f.write_str(name)
    }
}

/// Provider account identity and credential
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Provider account email
    pub email: String,

    /// Provider API token
    pub api_token: String,
}

// The token must never reach logs via Debug formatting
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

/// Reconciliation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Zone name, e.g. "example.com"
    pub domain: String,

    /// Subdomain labels to reconcile, processed in this order
    pub hosts: Vec<String>,

    /// Addressing mode
    pub stack: StackMode,

    /// Provider credentials
    pub credentials: Credentials,
}

impl ReconciliationConfig {
    /// Validate the configuration
    ///
    /// An empty host list is allowed here — the daemon warns about it at
    /// startup instead of refusing to run. The remaining fields are
    /// required.
    pub fn validate(&self) -> Result<(), Error> {
        if self.domain.is_empty() {
            return Err(Error::config("domain cannot be empty"));
        }
        if self.credentials.email.is_empty() {
            return Err(Error::config("provider account email cannot be empty"));
        }
        if self.credentials.api_token.is_empty() {
            return Err(Error::config("provider API token cannot be empty"));
        }
        Ok(())
    }
}
