// # Cloudflare DNS Provider
//
// DnsProvider implementation backed by the Cloudflare API v4.
//
// ## Behavior
//
// - One HTTP request per trait method call; no retry, no backoff, no
//   caching. Failure scoping is owned by the engine and record reuse by
//   the record cache, so errors are returned untouched.
// - Legacy key authentication via X-Auth-Email / X-Auth-Key headers,
//   matching the EMAIL / API_TOKEN pair the daemon is configured with.
// - HTTP timeout configured (30 seconds); a hung call surfaces as an
//   ordinary per-tick failure.
// - Specific error handling for HTTP status codes (401/403, 429, 5xx).
// - Dry-run mode for safe testing: lookups are performed, updates are
//   logged and skipped.
//
// ## Security
//
// - The API key NEVER appears in logs
// - The Debug implementation redacts the API key
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use zonedrift_core::traits::{DnsProvider, DomainDescriptor, HostRecord, RecordType};
use zonedrift_core::{Error, Result};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Response envelope shared by all Cloudflare v4 endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
}

/// One entry of the envelope's `errors` array
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

/// Zone object, reduced to the fields the reconciler needs
#[derive(Debug, Deserialize)]
struct Zone {
    id: String,
    name: String,
}

/// DNS record object, reduced to the fields the reconciler needs
#[derive(Debug, Deserialize)]
struct DnsRecord {
    id: String,
    #[serde(rename = "type")]
    record_type: String,
    name: String,
    content: String,
}

impl DnsRecord {
    /// Map to the core model; records of non-address types are dropped
    fn into_host_record(self) -> Option<HostRecord> {
        let record_type = match self.record_type.as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            _ => return None,
        };
        Some(HostRecord {
            id: self.id,
            record_type,
            content: self.content,
            hostname: self.name,
        })
    }
}

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider performs all GET requests but
/// logs the intended PUT payload instead of sending it, so drift
/// detection can be exercised without modifying any records.
pub struct CloudflareProvider {
    /// Account email for legacy key authentication
    email: String,

    /// Cloudflare API key — never log this value
    api_key: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `email`: account email for legacy key authentication
    /// - `api_key`: API key with DNS edit permissions
    /// - `dry_run`: if true, perform lookups but skip record updates
    pub fn new(
        email: impl Into<String>,
        api_key: impl Into<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let email = email.into();
        let api_key = api_key.into();

        if email.is_empty() {
            return Err(Error::config("Cloudflare account email cannot be empty"));
        }
        if api_key.is_empty() {
            return Err(Error::config("Cloudflare API key cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::provider("cloudflare", format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            email,
            api_key,
            client,
            dry_run,
        })
    }

    /// Create a new Cloudflare provider (production/live mode)
    pub fn new_live(email: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::new(email, api_key, false)
    }

    /// Create a new Cloudflare provider (dry-run mode)
    pub fn new_dry_run(email: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        Self::new(email, api_key, true)
    }

    /// Attach the legacy-auth headers to a request
    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("X-Auth-Email", self.email.as_str())
            .header("X-Auth-Key", self.api_key.as_str())
            .header("Content-Type", "application/json")
    }

    /// Issue a request and map transport errors and non-success statuses
    /// onto the crate error taxonomy. Returns the raw response body.
    async fn send(&self, req: reqwest::RequestBuilder, context: &str) -> Result<String> {
        let response = self
            .auth(req)
            .send()
            .await
            .map_err(|e| Error::provider("cloudflare", format!("{context}: HTTP request failed: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            Error::provider("cloudflare", format!("{context}: failed to read response body: {e}"))
        })?;

        if status.is_success() {
            return Ok(body);
        }

        match status.as_u16() {
            401 | 403 => Err(Error::auth(format!(
                "{context}: invalid API key or insufficient permissions (status {status})"
            ))),
            429 => Err(Error::rate_limited(format!("{context}: status {status}"))),
            500..=599 => Err(Error::provider(
                "cloudflare",
                format!("{context}: server error (transient): {status} - {body}"),
            )),
            _ => Err(Error::provider(
                "cloudflare",
                format!("{context}: {status} - {body}"),
            )),
        }
    }

    /// Parse an envelope body, converting `success: false` into an error
    fn parse<T: serde::de::DeserializeOwned>(body: &str, context: &str) -> Result<T> {
        let envelope: Envelope<T> = serde_json::from_str(body)?;

        if !envelope.success {
            let messages: Vec<String> = envelope
                .errors
                .iter()
                .map(|e| format!("{} (code {})", e.message, e.code))
                .collect();
            return Err(Error::provider(
                "cloudflare",
                format!("{context}: API reported failure: {}", messages.join("; ")),
            ));
        }

        envelope.result.ok_or_else(|| {
            Error::provider("cloudflare", format!("{context}: response missing result"))
        })
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    async fn domain_by_name(&self, domain: &str) -> Result<DomainDescriptor> {
        let url = format!("{CLOUDFLARE_API_BASE}/zones?name={domain}");
        tracing::debug!(%domain, "looking up zone");

        let body = self.send(self.client.get(&url), "zone lookup").await?;
        let zones: Vec<Zone> = Self::parse(&body, "zone lookup")?;

        let zone = zones
            .into_iter()
            .next()
            .ok_or_else(|| Error::domain_not_found(domain))?;

        tracing::debug!(zone_id = %zone.id, "found zone");
        Ok(DomainDescriptor {
            id: zone.id,
            name: zone.name,
        })
    }

    async fn records_for_host(
        &self,
        domain_id: &str,
        host_label: &str,
        domain: &str,
    ) -> Result<Vec<HostRecord>> {
        let name = format!("{host_label}.{domain}");
        let url = format!("{CLOUDFLARE_API_BASE}/zones/{domain_id}/dns_records?name={name}");
        tracing::debug!(host = %name, "listing records");

        let body = self.send(self.client.get(&url), "record listing").await?;
        let records: Vec<DnsRecord> = Self::parse(&body, "record listing")?;

        Ok(records
            .into_iter()
            .filter_map(DnsRecord::into_host_record)
            .collect())
    }

    async fn update_record(
        &self,
        domain_id: &str,
        record: &HostRecord,
        new_content: &str,
    ) -> Result<()> {
        let url = format!(
            "{CLOUDFLARE_API_BASE}/zones/{domain_id}/dns_records/{}",
            record.id
        );
        let payload = serde_json::json!({
            "type": record.record_type.as_str(),
            "name": record.hostname,
            "content": new_content,
        });

        if self.dry_run {
            tracing::info!(
                host = %record.hostname,
                record_type = %record.record_type,
                payload = %payload,
                "[DRY-RUN] skipping record update"
            );
            return Ok(());
        }

        tracing::info!(
            host = %record.hostname,
            record_type = %record.record_type,
            from = %record.content,
            to = %new_content,
            "updating record"
        );

        let body = self
            .send(self.client.put(&url).json(&payload), "record update")
            .await?;
        let _updated: DnsRecord = Self::parse(&body, "record update")?;

        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
