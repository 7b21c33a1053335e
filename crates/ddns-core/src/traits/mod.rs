//! Core traits for the DDNS updater
//!
//! This module defines the abstract interfaces the engine drives.
//!
//! - [`IpSource`]: Determine the current public IP
//! - [`DnsProvider`]: Read and write DNS records via provider APIs

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecord, UpdateRequest, WriteOutcome};
