//! Test doubles and common utilities for engine contract tests
//!
//! These doubles count calls so tests can assert which parts of the
//! pipeline ran, without any network access.

#![allow(dead_code)]

use ddns_core::config::{DdnsConfig, RecordConfig, Schedule};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest, WriteOutcome};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What a scripted IP source answers on each call
#[derive(Debug, Clone)]
pub enum IpAnswer {
    Address(&'static str),
    NoAddress,
    Fail,
}

/// An IP source that plays back a script, repeating the last answer
pub struct ScriptedIpSource {
    answers: Mutex<VecDeque<IpAnswer>>,
    last: Mutex<IpAnswer>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    pub fn new(answers: Vec<IpAnswer>) -> Self {
        let last = answers.last().cloned().unwrap_or(IpAnswer::NoAddress);
        Self {
            answers: Mutex::new(answers.into()),
            last: Mutex::new(last),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fixed(ip: &'static str) -> Self {
        Self::new(vec![IpAnswer::Address(ip)])
    }

    /// Shared handle on the call counter
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<Option<String>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let answer = {
            let mut answers = self.answers.lock().unwrap();
            match answers.pop_front() {
                Some(answer) => answer,
                None => self.last.lock().unwrap().clone(),
            }
        };

        match answer {
            IpAnswer::Address(ip) => Ok(Some(ip.to_string())),
            IpAnswer::NoAddress => Ok(None),
            IpAnswer::Fail => Err(Error::transport("connection refused")),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// Calls observed by a [`MockDnsProvider`]
#[derive(Default)]
pub struct ProviderCalls {
    pub list_count: AtomicUsize,
    pub updates: Mutex<Vec<(String, UpdateRequest)>>,
}

impl ProviderCalls {
    pub fn list_count(&self) -> usize {
        self.list_count.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn updates(&self) -> Vec<(String, UpdateRequest)> {
        self.updates.lock().unwrap().clone()
    }
}

/// A DnsProvider that serves a fixed record set and a fixed write outcome
pub struct MockDnsProvider {
    records: Vec<DnsRecord>,
    list_fails: bool,
    outcome: WriteOutcome,
    calls: Arc<ProviderCalls>,
}

impl MockDnsProvider {
    pub fn new(records: Vec<DnsRecord>) -> Self {
        Self {
            records,
            list_fails: false,
            outcome: WriteOutcome::Success,
            calls: Arc::new(ProviderCalls::default()),
        }
    }

    /// Make `list_records` fail like a provider answering `success: false`
    pub fn failing_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    /// Answer every write with `outcome`
    pub fn with_outcome(mut self, outcome: WriteOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Shared handle on the recorded calls
    pub fn calls(&self) -> Arc<ProviderCalls> {
        Arc::clone(&self.calls)
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        self.calls.list_count.fetch_add(1, Ordering::SeqCst);
        if self.list_fails {
            return Err(Error::provider(
                "mock",
                "request failed: {\"success\":false,\"errors\":[]}",
            ));
        }
        Ok(self.records.clone())
    }

    async fn update_record(&self, record_id: &str, update: &UpdateRequest) -> WriteOutcome {
        self.calls
            .updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), update.clone()));
        self.outcome.clone()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// The record set most tests run against
pub fn home_records() -> Vec<DnsRecord> {
    vec![
        DnsRecord::new("r0", "home.example.com", "AAAA", "2001:db8::1"),
        DnsRecord::new("r1", "home.example.com", "A", "1.1.1.1"),
        DnsRecord::new("r2", "www.example.com", "CNAME", "home.example.com"),
    ]
}

/// Helper to create a minimal DdnsConfig for testing
pub fn minimal_config(record_name: &str, schedule: Schedule) -> DdnsConfig {
    let mut config = DdnsConfig::new("test-token", "test-zone");
    config.record = RecordConfig::new(record_name).with_ttl(120);
    config.schedule = schedule;
    config
}
