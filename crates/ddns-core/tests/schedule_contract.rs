//! Contract Test: Scheduling & Shutdown
//!
//! Verifies how the engine repeats cycles.
//!
//! Constraints verified:
//! - Single-shot mode runs exactly one cycle and surfaces its error
//! - Loop mode keeps running after a failed cycle
//! - Loop mode stops on the shutdown signal, between cycles
//!
//! If this test fails, the scheduler either stops too early or never stops.

mod common;

use common::*;
use ddns_core::DdnsEngine;
use ddns_core::config::Schedule;
use std::sync::atomic::Ordering;
use tokio::time::{Duration, sleep, timeout};

#[tokio::test]
async fn once_runs_a_single_cycle() {
    let ip_source = ScriptedIpSource::fixed("2.2.2.2");
    let ip_calls = ip_source.counter();
    let provider = MockDnsProvider::new(home_records());
    let calls = provider.calls();

    let engine = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        minimal_config("home.example.com", Schedule::Once),
    )
    .expect("engine construction succeeds");

    // No shutdown signal is needed for single-shot mode
    let result = timeout(Duration::from_secs(5), engine.run_with_shutdown(None)).await;

    assert!(matches!(result, Ok(Ok(()))));
    assert_eq!(ip_calls.load(Ordering::SeqCst), 1);
    assert_eq!(calls.update_count(), 1);
}

#[tokio::test]
async fn once_surfaces_cycle_error() {
    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::new(vec![IpAnswer::Fail])),
        Box::new(MockDnsProvider::new(home_records())),
        minimal_config("home.example.com", Schedule::Once),
    )
    .expect("engine construction succeeds");

    let result = engine.run_with_shutdown(None).await;

    assert!(matches!(result, Err(ddns_core::Error::Transport(_))));
}

#[tokio::test]
async fn loop_survives_failed_cycles_and_stops_on_shutdown() {
    // First cycle fails, later cycles succeed
    let ip_source = ScriptedIpSource::new(vec![
        IpAnswer::Fail,
        IpAnswer::Address("1.1.1.1"),
    ]);
    let ip_calls = ip_source.counter();
    let provider = MockDnsProvider::new(home_records());
    let calls = provider.calls();

    let engine = DdnsEngine::new(
        Box::new(ip_source),
        Box::new(provider),
        minimal_config("home.example.com", Schedule::Every { interval_secs: 1 }),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let engine_handle =
        tokio::spawn(async move { engine.run_with_shutdown(Some(shutdown_rx)).await });

    // Let the failed cycle and at least one successful cycle run
    sleep(Duration::from_millis(1500)).await;

    shutdown_tx.send(()).expect("engine is still running");

    let result = timeout(Duration::from_secs(5), engine_handle).await;
    assert!(result.is_ok(), "Engine should stop within 5 seconds");
    let run_result = result.unwrap().expect("engine task does not panic");
    assert!(run_result.is_ok());

    assert!(ip_calls.load(Ordering::SeqCst) >= 2);
    assert!(calls.list_count() >= 1);
    assert_eq!(calls.update_count(), 0);
}

#[tokio::test]
async fn dropped_shutdown_sender_stops_loop() {
    let engine = DdnsEngine::new(
        Box::new(ScriptedIpSource::fixed("1.1.1.1")),
        Box::new(MockDnsProvider::new(home_records())),
        minimal_config("home.example.com", Schedule::Every { interval_secs: 3600 }),
    )
    .expect("engine construction succeeds");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    drop(shutdown_tx);

    let result = timeout(
        Duration::from_secs(5),
        engine.run_with_shutdown(Some(shutdown_rx)),
    )
    .await;

    assert!(matches!(result, Ok(Ok(()))));
}
