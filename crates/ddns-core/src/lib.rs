// # ddns-core
//
// Core library for the DDNS updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpSource**: Trait for determining the current public IP
// - **DnsProvider**: Trait for listing and overwriting DNS records
// - **json_path**: Dotted key-path lookup used by JSON-speaking IP sources
// - **decide**: Pure decision whether a record needs a write
// - **DdnsEngine**: Runs the IP → lookup → decide → write cycle, once or on
//   a fixed interval
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from HTTP details
// 2. **Sequential Cycles**: One cycle at a time, no state between cycles
// 3. **Library-First**: All core functionality can be used as a library
// 4. **No Hidden Retries**: The next scheduled cycle is the retry

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod json_path;

// Re-export core types for convenience
pub use traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest, WriteOutcome};
pub use engine::{CycleReport, DdnsEngine, Decision, SkipReason, decide};
pub use config::{DdnsConfig, IpSourceConfig, ParseMode, ProviderConfig, RecordConfig, Schedule};
pub use error::{Error, Result};
pub use json_path::KeyPath;
