//! Periodic health polling.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;

use crate::health::probe::HealthProbe;
use crate::lifecycle::shutdown::ShutdownSignal;

/// Polls the monitored endpoint and emits one boolean event per check.
pub struct HealthMonitor {
    probe: HealthProbe,
    interval: Duration,
}

impl HealthMonitor {
    pub fn new(probe: HealthProbe, interval: Duration) -> Self {
        Self { probe, interval }
    }

    /// Run until the shutdown signal fires or the event channel closes.
    ///
    /// The first check runs immediately; later checks are spaced by the
    /// configured interval. Once this returns, no further events are
    /// emitted.
    pub async fn run(self, events: mpsc::Sender<bool>, mut shutdown: ShutdownSignal) {
        tracing::info!(interval_secs = self.interval.as_secs(), "health monitor starting");

        let mut ticker = time::interval(self.interval);
        // A probe slower than the interval must not trigger a burst of
        // back-to-back checks; the next check waits a full interval.
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.fired() => {
                    tracing::debug!("health monitor received shutdown signal, exiting");
                    return;
                }
                _ = ticker.tick() => {
                    let healthy = self.probe.check().await;
                    tracing::trace!(healthy, "health check complete");
                    if events.send(healthy).await.is_err() {
                        tracing::debug!("health event channel closed, exiting");
                        return;
                    }
                }
            }
        }
    }
}
