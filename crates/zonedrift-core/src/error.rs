//! Error types for the zonedrift system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for zonedrift operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the zonedrift system
#[derive(Error, Debug)]
pub enum Error {
    /// The detected addresses do not satisfy the configured stack mode
    #[error("no public address: {0}")]
    AddressMissing(String),

    /// Unrecognized addressing-mode value
    #[error("unknown ip stack: {0}")]
    UnknownStackMode(String),

    /// The configured domain does not exist at the provider
    #[error("domain not found: {0}")]
    DomainNotFound(String),

    /// Authentication errors
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Fetching a single host's records failed (host-scoped, not tick-fatal)
    #[error("record fetch failed for {hostname}: {message}")]
    RecordFetchFailed {
        /// Fully-qualified hostname whose fetch failed
        hostname: String,
        /// Underlying failure
        message: String,
    },

    /// Provider-specific error
    #[error("provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an address-missing error
    pub fn address_missing(msg: impl Into<String>) -> Self {
        Self::AddressMissing(msg.into())
    }

    /// Create a domain-not-found error
    pub fn domain_not_found(domain: impl Into<String>) -> Self {
        Self::DomainNotFound(domain.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a host-scoped record-fetch error
    pub fn record_fetch(hostname: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordFetchFailed {
            hostname: hostname.into(),
            message: message.into(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
