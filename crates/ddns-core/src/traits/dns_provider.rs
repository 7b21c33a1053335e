// # DNS Provider Trait
//
// Defines the interface for reading and writing DNS records via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{DnsProvider, UpdateRequest, WriteOutcome};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     let records = provider.list_records().await?;
//     let request = UpdateRequest::new("1.2.3.4", "home.example.com", "A", 60);
//     match provider.update_record(&records[0].id, &request).await {
//         WriteOutcome::Success => println!("updated"),
//         other => println!("update failed: {:?}", other),
//     }
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A DNS record as reported by the provider
///
/// Only the fields the updater needs are kept; anything else in the
/// provider's response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-specific record identifier
    pub id: String,
    /// Fully-qualified record name
    pub name: String,
    /// Record type ("A", "AAAA", "CNAME", ...)
    #[serde(rename = "type")]
    pub record_type: String,
    /// Current record content (an IP address for A/AAAA)
    #[serde(default)]
    pub content: String,
}

impl DnsRecord {
    /// Create a record snapshot
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
        }
    }
}

/// Body of a full record overwrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    /// New record content
    pub content: String,
    /// Record name
    pub name: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: String,
    /// Whether the record is proxied by the provider; always `false`
    pub proxied: bool,
    /// Free-form comment; left unset by the updater
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Record tags; left empty by the updater
    pub tags: Vec<String>,
    /// Time-to-live in seconds
    pub ttl: u32,
}

impl UpdateRequest {
    /// Build an unproxied update with no comment and no tags
    pub fn new(
        content: impl Into<String>,
        name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            record_type: record_type.into(),
            proxied: false,
            comment: None,
            tags: Vec::new(),
            ttl,
        }
    }
}

/// Result of a single write attempt
///
/// Write failures are reported as values rather than errors so that the
/// caller sees exactly which side failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The provider acknowledged the write with `success: true`
    Success,
    /// The provider answered, but not with a successful acknowledgement
    ProviderFailure {
        /// HTTP status code of the response
        status: u16,
        /// Raw response body
        body: String,
    },
    /// The request never produced a complete response
    TransportFailure(String),
}

impl WriteOutcome {
    /// Whether the write was acknowledged
    pub fn is_success(&self) -> bool {
        matches!(self, WriteOutcome::Success)
    }
}

/// Trait for DNS provider implementations
///
/// # Responsibilities
///
/// - ✅ Perform HTTP/HTTPS API calls to the provider's endpoints
/// - ✅ Parse provider-specific responses
/// - ❌ Retry or back off (the next scheduled cycle is the retry)
/// - ❌ Cache records beyond a single call
/// - ❌ Decide whether an update is needed (owned by `DdnsEngine`)
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the records of the configured zone, in provider order
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<DnsRecord>)`: A fresh snapshot of the zone
    /// - `Err(Error)`: Transport failure, unparseable body, or the provider
    ///   reported `success: false`
    async fn list_records(&self) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Overwrite a record
    ///
    /// # Parameters
    ///
    /// - `record_id`: Identifier from a previous [`DnsProvider::list_records`]
    /// - `update`: The full new record
    async fn update_record(&self, record_id: &str, update: &UpdateRequest) -> WriteOutcome;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
