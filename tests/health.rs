//! Health probe and monitor behavior against mock endpoints.

mod common;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use echo_sidecar::config::HealthCheckConfig;
use echo_sidecar::health::{HealthMonitor, HealthProbe};
use echo_sidecar::lifecycle::Shutdown;

fn probe_for(addr: SocketAddr, pattern: &str) -> HealthProbe {
    HealthProbe::new(&HealthCheckConfig {
        uri: format!("http://{}/healthz", addr),
        match_pattern: pattern.to_string(),
        interval_secs: 5,
        timeout_secs: 2,
    })
    .unwrap()
}

#[tokio::test]
async fn healthy_when_body_matches() {
    let addr: SocketAddr = "127.0.0.1:28281".parse().unwrap();
    common::start_health_backend(addr, || (200, "ok".to_string())).await;

    assert!(probe_for(addr, "ok").check().await);
}

#[tokio::test]
async fn unhealthy_when_body_does_not_match() {
    let addr: SocketAddr = "127.0.0.1:28282".parse().unwrap();
    common::start_health_backend(addr, || (200, "ok".to_string())).await;

    assert!(!probe_for(addr, "notok").check().await);
}

#[tokio::test]
async fn unhealthy_on_error_status() {
    let addr: SocketAddr = "127.0.0.1:28283".parse().unwrap();
    common::start_health_backend(addr, || (503, "ok".to_string())).await;

    assert!(!probe_for(addr, "ok").check().await);
}

#[tokio::test]
async fn unhealthy_when_unreachable() {
    // Nothing listens here.
    let addr: SocketAddr = "127.0.0.1:28284".parse().unwrap();

    assert!(!probe_for(addr, "ok").check().await);
}

#[tokio::test]
async fn default_pattern_matches_ok_prefix() {
    let addr: SocketAddr = "127.0.0.1:28285".parse().unwrap();
    common::start_health_backend(addr, || (200, "OK backend ready".to_string())).await;

    let pattern = HealthCheckConfig::default().match_pattern;
    assert!(probe_for(addr, &pattern).check().await);
}

#[tokio::test]
async fn monitor_emits_first_check_immediately() {
    let addr: SocketAddr = "127.0.0.1:28286".parse().unwrap();
    common::start_health_backend(addr, || (200, "ok".to_string())).await;

    // Interval far longer than the test: only the immediate first check
    // can produce this event.
    let monitor = HealthMonitor::new(probe_for(addr, "ok"), Duration::from_secs(60));
    let shutdown = Shutdown::new();
    let (events_tx, mut events_rx) = mpsc::channel(1);
    let task = tokio::spawn(monitor.run(events_tx, shutdown.subscribe()));

    let event = timeout(Duration::from_secs(2), events_rx.recv())
        .await
        .expect("first check should run without delay");
    assert_eq!(event, Some(true));

    shutdown.fire();
    task.await.unwrap();
}

#[tokio::test]
async fn monitor_spaces_checks_after_slow_probes() {
    let addr: SocketAddr = "127.0.0.1:28288".parse().unwrap();
    // Each probe takes ~500ms, longer than the 400ms interval. Checks must
    // stay spaced by a full interval after each completion, never firing
    // back-to-back to catch up on missed ticks.
    common::start_delayed_health_backend(addr, Duration::from_millis(500), || {
        (200, "ok".to_string())
    })
    .await;

    let monitor = HealthMonitor::new(probe_for(addr, "ok"), Duration::from_millis(400));
    let shutdown = Shutdown::new();
    let (events_tx, mut events_rx) = mpsc::channel(1);
    let task = tokio::spawn(monitor.run(events_tx, shutdown.subscribe()));

    let start = std::time::Instant::now();
    for _ in 0..3 {
        timeout(Duration::from_secs(5), events_rx.recv())
            .await
            .expect("monitor should keep emitting")
            .unwrap();
    }
    // Spaced checks: ~500ms, ~1400ms, ~2300ms. Bursting would deliver the
    // third event by ~1500ms.
    assert!(
        start.elapsed() >= Duration::from_millis(1900),
        "checks ran back-to-back: {:?}",
        start.elapsed()
    );

    shutdown.fire();
    task.await.unwrap();
}

#[tokio::test]
async fn monitor_stops_when_event_channel_closes() {
    let addr: SocketAddr = "127.0.0.1:28287".parse().unwrap();
    common::start_health_backend(addr, || (200, "ok".to_string())).await;

    let monitor = HealthMonitor::new(probe_for(addr, "ok"), Duration::from_millis(50));
    let shutdown = Shutdown::new();
    let (events_tx, events_rx) = mpsc::channel(1);
    let task = tokio::spawn(monitor.run(events_tx, shutdown.subscribe()));

    drop(events_rx);
    timeout(Duration::from_secs(2), task)
        .await
        .expect("monitor should exit once nobody consumes events")
        .unwrap();
}
