// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for the DDNS
// updater.
//
// ## Scope
//
// - ✅ Lists the records of one pre-configured zone (one GET per cycle)
// - ✅ Overwrites a single record by id (one PUT per write)
// - ✅ Surfaces raw response bodies for diagnostics
// - ✅ HTTP timeout configurable (30 seconds by default)
// - ❌ NO retry logic (the next scheduled cycle is the retry)
// - ❌ NO caching (every cycle reads a fresh record set)
// - ❌ NO decision making (owned by DdnsEngine)
//
// ## Security Requirements
//
// - API token NEVER appears in logs
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records`
// - Overwrite DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use ddns_core::config::{DEFAULT_API_BASE, ProviderConfig};
use ddns_core::traits::{DnsProvider, DnsRecord, UpdateRequest, WriteOutcome};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

/// Provider name used in errors and logs
const PROVIDER_NAME: &str = "cloudflare";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Envelope of the record listing response
#[derive(Deserialize)]
struct ListRecordsResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Option<Vec<DnsRecord>>,
}

/// Envelope of the record overwrite response
#[derive(Deserialize)]
struct WriteResponse {
    #[serde(default)]
    success: bool,
}

/// Cloudflare DNS provider
///
/// Stateless apart from its configuration and HTTP client; every call goes
/// straight to the API.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone that holds the managed record
    zone_id: String,

    /// API base URL, without a trailing slash
    api_base: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider against the public API
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permissions
    /// - `zone_id`: Zone that holds the managed record
    ///
    /// # Security
    ///
    /// The API token will NEVER be logged or displayed in error messages.
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Result<Self> {
        Self::build(
            api_token.into(),
            zone_id.into(),
            DEFAULT_API_BASE.to_string(),
            Some(DEFAULT_HTTP_TIMEOUT),
        )
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        Self::build(
            config.api_token.clone(),
            config.zone_id.clone(),
            config.api_base.clone(),
            config.timeout(),
        )
    }

    /// Point the provider at a different API base URL
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn build(
        api_token: String,
        zone_id: String,
        api_base: String,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        // Validate token is not empty
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        // Build HTTP client with timeout
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            zone_id,
            api_base: api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self) -> String {
        format!("{}/zones/{}/dns_records", self.api_base, self.zone_id)
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }
}

/// Human hint for a failed write, based on the status code
fn status_hint(status: u16) -> &'static str {
    match status {
        401 | 403 => "invalid API token or insufficient permissions",
        404 => "zone or record not found",
        409 => "record is being updated by another process",
        429 => "rate limit exceeded",
        500..=599 => "Cloudflare server error (transient)",
        _ => "request rejected",
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List the zone's DNS records
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// The body is parsed regardless of the HTTP status; the `success` flag
    /// decides the result.
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        tracing::debug!("Listing DNS records for zone {}", self.zone_id);

        let response = self
            .client
            .get(self.records_url())
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        let envelope: ListRecordsResponse = serde_json::from_str(&body)
            .map_err(|e| Error::parse(format!("Failed to parse record list: {}", e), body.clone()))?;

        if !envelope.success {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("request failed: {}", body),
            ));
        }

        let records = envelope.result.unwrap_or_default();
        for record in &records {
            tracing::debug!(
                "Remote record {} {} ({}) = {:?}",
                record.id,
                record.name,
                record.record_type,
                record.content
            );
        }

        Ok(records)
    }

    /// Overwrite a DNS record
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    ///
    /// {"content": "1.2.3.4", "name": "...", "type": "A", "proxied": false, "tags": [], "ttl": 60}
    /// ```
    ///
    /// Only HTTP 200 with `"success": true` counts as success.
    async fn update_record(&self, record_id: &str, update: &UpdateRequest) -> WriteOutcome {
        let response = match self
            .client
            .put(self.record_url(record_id))
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(update)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return WriteOutcome::TransportFailure(format!("HTTP request failed: {}", e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return WriteOutcome::TransportFailure(format!("Failed to read response: {}", e));
            }
        };

        if status != StatusCode::OK {
            tracing::warn!(
                "Update of record {} rejected with status {}: {}",
                record_id,
                status,
                status_hint(status.as_u16())
            );
            return WriteOutcome::ProviderFailure {
                status: status.as_u16(),
                body,
            };
        }

        match serde_json::from_str::<WriteResponse>(&body) {
            Ok(WriteResponse { success: true }) => {
                tracing::debug!("Record {} updated", record_id);
                WriteOutcome::Success
            }
            Ok(_) => WriteOutcome::ProviderFailure {
                status: status.as_u16(),
                body,
            },
            Err(e) => {
                tracing::warn!("Failed to parse update response: {}", e);
                WriteOutcome::ProviderFailure {
                    status: status.as_u16(),
                    body,
                }
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
