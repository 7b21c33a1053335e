// # HTTP IP Source
//
// This crate provides an HTTP-based IP source for the DDNS updater.
//
// ## Purpose
//
// Asks an external "what is my IP" service for the caller's public address.
// Two response formats are understood:
//
// - `full`: the whole body is the address (e.g. api.ipify.org)
// - `json`: the body is a JSON object and the address sits at a dotted key
//   path (e.g. `data.ip`)
//
// A manually configured address short-circuits the lookup entirely.
//
// ## Behavior Notes
//
// - The HTTP status code is not checked; the body is used as-is
// - `full` bodies are not trimmed or validated
// - A JSON value that exists but is not a string yields no address, not an
//   error

use ddns_core::config::{IpSourceConfig, ParseMode};
use ddns_core::json_path::{self, KeyPath};
use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use serde_json::{Map, Value};

/// HTTP-based IP source
pub struct HttpIpSource {
    /// URL to fetch IP from
    url: String,

    /// How to read the response body
    parse_mode: ParseMode,

    /// Where the address sits in a JSON body
    key_path: Option<KeyPath>,

    /// Fixed address, bypasses the lookup
    manual_ip: Option<String>,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch IP from (e.g., "http://api.ipify.org")
    /// - `parse_mode`: How to read the body
    /// - `key_path`: Where the address sits, for [`ParseMode::Json`]
    pub fn new(url: impl Into<String>, parse_mode: ParseMode, key_path: Option<KeyPath>) -> Self {
        Self {
            url: url.into(),
            parse_mode,
            key_path,
            manual_ip: None,
            client: reqwest::Client::new(),
        }
    }

    /// Create an IP source from configuration
    ///
    /// The HTTP client is built with the configured timeout.
    pub fn from_config(config: &IpSourceConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            parse_mode: config.parse_mode,
            key_path: config.key_path(),
            manual_ip: config.manual_ip().map(str::to_string),
            client,
        })
    }

    /// Always answer with `ip` instead of asking the service
    ///
    /// An empty string leaves the lookup enabled.
    pub fn with_manual_ip(mut self, ip: impl Into<String>) -> Self {
        let ip = ip.into();
        self.manual_ip = (!ip.is_empty()).then_some(ip);
        self
    }

    /// Fetch the raw response body
    async fn fetch_body(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            // Not an error: the body is still the answer
            tracing::debug!("IP service {} answered with status {}", self.url, status);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        Ok(body.to_vec())
    }

    /// Extract the address from a JSON body
    fn extract_from_json(&self, body: &[u8]) -> Result<Option<String>> {
        let text = String::from_utf8_lossy(body).into_owned();

        let root: Map<String, Value> = serde_json::from_slice(body)
            .map_err(|e| Error::parse(format!("Invalid JSON from IP service: {}", e), text.clone()))?;

        let path = self
            .key_path
            .as_ref()
            .ok_or_else(|| Error::config("A JSON key path is required when the parse mode is 'json'"))?;

        match json_path::resolve(&root, path) {
            None => Err(Error::not_found(path.to_string(), text)),
            Some(Value::String(ip)) => Ok(Some(ip.clone())),
            Some(other) => {
                tracing::debug!("Value at '{}' is not a string: {}", path, other);
                Ok(None)
            }
        }
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<Option<String>> {
        if let Some(ip) = &self.manual_ip {
            tracing::debug!("Using manually configured IP");
            return Ok(Some(ip.clone()));
        }

        tracing::debug!("Fetching IP from {} ({} mode)", self.url, self.parse_mode);
        let body = self.fetch_body().await?;

        match self.parse_mode {
            ParseMode::Full => Ok(Some(String::from_utf8_lossy(&body).into_owned())),
            ParseMode::Json => self.extract_from_json(&body),
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
