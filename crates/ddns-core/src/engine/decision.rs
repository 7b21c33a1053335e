//! Update decision
//!
//! Pure comparison of the resolved address against a record set. No I/O.

use crate::traits::DnsRecord;
use std::fmt;

/// Why no write is needed this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No record matches the configured name and type
    NotFound,
    /// The matching record already holds the resolved address
    Unchanged,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound => f.write_str("not found"),
            SkipReason::Unchanged => f.write_str("unchanged"),
        }
    }
}

/// What to do with the matching record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Leave DNS alone
    Skip(SkipReason),
    /// Overwrite the record
    Update {
        /// Id of the record to overwrite
        record_id: String,
        /// What the record holds now
        current_content: String,
    },
}

/// Decide whether the record named `name` of type `record_type` needs
/// `resolved_ip` written to it
///
/// Records are scanned in the order given; the first one matching both
/// name and type is the only one considered.
pub fn decide(records: &[DnsRecord], name: &str, record_type: &str, resolved_ip: &str) -> Decision {
    let Some(record) = records
        .iter()
        .find(|r| r.name == name && r.record_type == record_type)
    else {
        return Decision::Skip(SkipReason::NotFound);
    };

    if record.content == resolved_ip {
        Decision::Skip(SkipReason::Unchanged)
    } else {
        Decision::Update {
            record_id: record.id.clone(),
            current_content: record.content.clone(),
        }
    }
}
