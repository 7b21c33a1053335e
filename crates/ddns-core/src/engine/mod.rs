//! Core DDNS engine
//!
//! The DdnsEngine is responsible for:
//! - Resolving the current IP via IpSource
//! - Reading the zone's records via DnsProvider
//! - Deciding whether the configured record needs a write
//! - Writing it and checking the provider's acknowledgement
//! - Repeating on a fixed schedule until shutdown
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────┐     ┌──────────────┐
//! │  IpSource   │ ──▶ │ DnsProvider  │ ──▶ │ decide() │ ──▶ │ DnsProvider  │
//! │ (current)   │     │ (list)       │     │          │     │ (update)     │
//! └─────────────┘     └──────────────┘     └──────────┘     └──────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Resolve the current IP (no address → stop, nothing to do)
//! 2. Fetch a fresh record set for the zone
//! 3. Match the configured name + type; skip if missing or unchanged
//! 4. Otherwise overwrite the record (or log the payload in dry-run mode)
//!
//! Every step runs sequentially. An error aborts the current cycle only;
//! nothing carries over into the next one.

mod decision;

pub use decision::{Decision, SkipReason, decide};

use crate::config::{DdnsConfig, RecordConfig, Schedule};
use crate::error::{Error, Result};
use crate::traits::{DnsProvider, IpSource, UpdateRequest, WriteOutcome};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Outcome of one completed update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// The IP source answered without a usable address
    NoAddress,
    /// No write was needed
    Skipped(SkipReason),
    /// A write was needed but dry-run mode suppressed it
    DryRun {
        /// Record that would have been written
        record_id: String,
        /// Content that would have been written
        content: String,
    },
    /// The record was overwritten and the provider acknowledged it
    Updated {
        /// Record that was written
        record_id: String,
        /// Content before the write
        previous: String,
        /// Content after the write
        current: String,
    },
}

impl fmt::Display for CycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleReport::NoAddress => f.write_str("no address resolved"),
            CycleReport::Skipped(reason) => write!(f, "skipped ({})", reason),
            CycleReport::DryRun { record_id, content } => {
                write!(f, "dry run: would set {} to {:?}", record_id, content)
            }
            CycleReport::Updated {
                record_id,
                previous,
                current,
            } => write!(f, "updated {}: {:?} -> {:?}", record_id, previous, current),
        }
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`], or drive single cycles with
///    [`DdnsEngine::run_once()`]
/// 3. In loop mode the engine runs until a shutdown signal is received
///
/// Cycles never overlap. A shutdown signal is only observed between
/// cycles; a cycle in flight always runs to completion.
pub struct DdnsEngine {
    /// IP source for the current address
    ip_source: Box<dyn IpSource>,

    /// DNS provider for reading and writing records
    provider: Box<dyn DnsProvider>,

    /// The record to keep up to date
    record: RecordConfig,

    /// Single shot or fixed interval
    schedule: Schedule,

    /// Skip writes, log them instead
    dry_run: bool,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `ip_source`: IP source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: DDNS configuration (validated here)
    pub fn new(
        ip_source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: DdnsConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            ip_source,
            provider,
            record: config.record,
            schedule: config.schedule,
            dry_run: config.dry_run,
        })
    }

    /// Run the engine according to its schedule
    ///
    /// In loop mode this returns after Ctrl-C. In single-shot mode it
    /// returns the error of the only cycle, if any.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the engine, stopping on the given signal instead of Ctrl-C
    ///
    /// A dropped sender counts as a shutdown signal.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        let interval = match self.schedule {
            Schedule::Once => {
                info!("Running a single update cycle");
                let report = self.run_once().await?;
                self.log_report(&report);
                return Ok(());
            }
            Schedule::Every { interval_secs } => Duration::from_secs(interval_secs),
        };

        info!("Running an update cycle every {:?}", interval);

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to wait for Ctrl-C: {}", e);
                        // Without a signal handler, only the process dying stops the loop
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        loop {
            match self.run_once().await {
                Ok(report) => self.log_report(&report),
                Err(e) => error!("Update cycle failed: {}", e),
            }

            debug!("Next update cycle in {:?}", interval);
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Engine stopped");
        Ok(())
    }

    /// Run a single update cycle
    ///
    /// # Returns
    ///
    /// - `Ok(CycleReport)`: The cycle completed (including "nothing to do")
    /// - `Err(Error)`: The cycle was aborted
    pub async fn run_once(&self) -> Result<CycleReport> {
        let Some(ip) = self.ip_source.current().await? else {
            warn!(
                "IP source {} returned no usable address, skipping cycle",
                self.ip_source.source_name()
            );
            return Ok(CycleReport::NoAddress);
        };
        info!("Current IP: {:?}", ip);

        let records = self.provider.list_records().await?;
        debug!(
            "Provider {} returned {} record(s)",
            self.provider.provider_name(),
            records.len()
        );

        let (record_id, previous) =
            match decide(&records, &self.record.name, &self.record.record_type, &ip) {
                Decision::Skip(reason) => return Ok(CycleReport::Skipped(reason)),
                Decision::Update {
                    record_id,
                    current_content,
                } => (record_id, current_content),
            };

        let request = UpdateRequest::new(
            ip.clone(),
            self.record.name.clone(),
            self.record.record_type.clone(),
            self.record.ttl,
        );

        if self.dry_run {
            info!(
                "[DRY-RUN] Would update record {} with payload: {}",
                record_id,
                serde_json::to_string(&request).unwrap_or_default()
            );
            return Ok(CycleReport::DryRun {
                record_id,
                content: ip,
            });
        }

        info!(
            "Updating {} ({}) record {}: {:?} -> {:?}",
            self.record.name, self.record.record_type, record_id, previous, ip
        );

        match self.provider.update_record(&record_id, &request).await {
            WriteOutcome::Success => Ok(CycleReport::Updated {
                record_id,
                previous,
                current: ip,
            }),
            WriteOutcome::ProviderFailure { status, body } => Err(Error::provider(
                self.provider.provider_name(),
                format!("update failed (status {}): {}", status, body),
            )),
            WriteOutcome::TransportFailure(message) => Err(Error::transport(message)),
        }
    }

    fn log_report(&self, report: &CycleReport) {
        match report {
            CycleReport::Updated { .. } => info!("DNS record {}: {}", self.record.name, report),
            CycleReport::Skipped(SkipReason::NotFound) => warn!(
                "No {} record named {} found, nothing to update",
                self.record.record_type, self.record.name
            ),
            _ => info!("DNS record {}: {}", self.record.name, report),
        }
    }
}
