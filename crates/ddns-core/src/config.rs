//! Configuration types for the DDNS updater
//!
//! A single [`DdnsConfig`] is built once at startup (by `ddnsd` from its
//! command line) and handed to the component constructors.

use crate::json_path::KeyPath;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default URL used to discover the public IP
pub const DEFAULT_IP_URL: &str = "http://api.ipify.org";

/// Cloudflare API base URL
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Main DDNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DdnsConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// IP source configuration
    pub ip_source: IpSourceConfig,

    /// The DNS record to keep up to date
    pub record: RecordConfig,

    /// How often the update cycle runs
    #[serde(default)]
    pub schedule: Schedule,

    /// Look up and decide, but never write
    #[serde(default)]
    pub dry_run: bool,
}

impl DdnsConfig {
    /// Create a configuration with defaults for everything but the token
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            provider: ProviderConfig::new(api_token, zone_id),
            ip_source: IpSourceConfig::default(),
            record: RecordConfig::default(),
            schedule: Schedule::default(),
            dry_run: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.provider.validate()?;
        self.ip_source.validate()?;
        self.record.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}

/// Cloudflare provider configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Cloudflare API token
    pub api_token: String,

    /// Zone that holds the record
    pub zone_id: String,

    /// API base URL, without a trailing slash
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// HTTP request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    /// Create a provider configuration against the public Cloudflare API
    pub fn new(api_token: impl Into<String>, zone_id: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.api_token.is_empty() {
            return Err(crate::Error::config("Cloudflare API token cannot be empty"));
        }
        if self.api_base.is_empty() {
            return Err(crate::Error::config("Cloudflare API base URL cannot be empty"));
        }
        Ok(())
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

// The token must never reach the logs
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("api_base", &self.api_base)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// How the body of the IP-check response is turned into an address
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// The whole body is the address
    #[default]
    Full,
    /// The body is a JSON object; the address sits at a key path
    Json,
}

impl FromStr for ParseMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(ParseMode::Full),
            "json" => Ok(ParseMode::Json),
            other => Err(crate::Error::config(format!(
                "Unknown parse mode '{}' (expected 'full' or 'json')",
                other
            ))),
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMode::Full => f.write_str("full"),
            ParseMode::Json => f.write_str("json"),
        }
    }
}

/// IP source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpSourceConfig {
    /// URL to fetch the IP from
    #[serde(default = "default_ip_url")]
    pub url: String,

    /// How to read the response body
    #[serde(default)]
    pub parse_mode: ParseMode,

    /// Dotted key path, required for [`ParseMode::Json`]
    #[serde(default)]
    pub json_path: Option<String>,

    /// Fixed address that bypasses the HTTP lookup entirely
    #[serde(default)]
    pub manual_ip: Option<String>,

    /// HTTP request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl IpSourceConfig {
    /// Validate the IP source configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.manual_ip().is_some() {
            return Ok(());
        }

        if self.url.is_empty() {
            return Err(crate::Error::config("IP source URL cannot be empty"));
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "IP source URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }

        if self.parse_mode == ParseMode::Json && self.key_path().is_none() {
            return Err(crate::Error::config(
                "A JSON key path is required when the parse mode is 'json'",
            ));
        }

        Ok(())
    }

    /// The manual override, if set to a non-empty value
    pub fn manual_ip(&self) -> Option<&str> {
        self.manual_ip.as_deref().filter(|ip| !ip.is_empty())
    }

    /// The JSON key path, if set to a non-empty value
    pub fn key_path(&self) -> Option<KeyPath> {
        self.json_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(KeyPath::parse)
    }

    /// Request timeout, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        timeout_from_secs(self.timeout_secs)
    }
}

impl Default for IpSourceConfig {
    fn default() -> Self {
        Self {
            url: default_ip_url(),
            parse_mode: ParseMode::Full,
            json_path: None,
            manual_ip: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// DNS record configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordConfig {
    /// Record name as the provider reports it
    #[serde(default = "default_record_name")]
    pub name: String,

    /// Record type (e.g. "A", "AAAA", "CNAME")
    #[serde(default = "default_record_type")]
    pub record_type: String,

    /// TTL in seconds sent with every update
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

impl RecordConfig {
    /// Create a record configuration with the default type and TTL
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the record type
    pub fn with_record_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = record_type.into();
        self
    }

    /// Set the TTL
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate the record configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.is_empty() {
            return Err(crate::Error::config("Record name cannot be empty"));
        }
        if self.record_type.is_empty() {
            return Err(crate::Error::config("Record type cannot be empty"));
        }
        Ok(())
    }
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self {
            name: default_record_name(),
            record_type: default_record_type(),
            ttl: default_ttl(),
        }
    }
}

/// When the update cycle runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Schedule {
    /// Run a single cycle and stop
    Once,
    /// Run a cycle, wait `interval_secs`, repeat until shutdown
    Every {
        /// Seconds between the end of one cycle and the start of the next
        interval_secs: u64,
    },
}

impl Schedule {
    /// Validate the schedule
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Schedule::Every { interval_secs: 0 } = self {
            return Err(crate::Error::config("Update interval must be > 0"));
        }
        Ok(())
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Every {
            interval_secs: default_interval_secs(),
        }
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_ip_url() -> String {
    DEFAULT_IP_URL.to_string()
}

fn default_record_name() -> String {
    "@".to_string()
}

fn default_record_type() -> String {
    "A".to_string()
}

fn default_ttl() -> u32 {
    60
}

fn default_interval_secs() -> u64 {
    5 * 60
}

fn default_timeout_secs() -> u64 {
    30
}
