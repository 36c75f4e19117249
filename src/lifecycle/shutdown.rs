//! Shutdown signalling and task accounting.

use std::sync::Arc;

use tokio::sync::watch;

/// One-shot, level-triggered shutdown signal.
///
/// Built on a `watch` channel rather than a broadcast so the signal stays
/// observable after it fires: a handler that checks late still sees it.
#[derive(Debug)]
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

impl Shutdown {
    /// Create a new, unfired signal.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    /// Subscribe to the signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Fire the signal. Idempotent; every subscriber observes it.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }

    /// Whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`Shutdown`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Non-blocking check.
    pub fn is_fired(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the signal fires.
    ///
    /// A dropped sender counts as fired; nothing can un-fire a signal.
    pub async fn fired(&mut self) {
        let _ = self.rx.wait_for(|fired| *fired).await;
    }
}

/// Counts live tasks and lets the controller wait for all of them to exit.
///
/// The count lives inside a `watch` channel so waiters block on a real
/// notification instead of polling.
#[derive(Debug, Clone)]
pub struct WorkTracker {
    count: Arc<watch::Sender<usize>>,
}

impl WorkTracker {
    /// Create a tracker with no outstanding work.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            count: Arc::new(tx),
        }
    }

    /// Register a unit of work. The returned guard releases it on drop,
    /// exactly once, even if the owning task panics.
    pub fn track(&self) -> WorkGuard {
        self.count.send_modify(|n| *n += 1);
        WorkGuard {
            count: Arc::clone(&self.count),
        }
    }

    /// Number of live guards.
    pub fn outstanding(&self) -> usize {
        *self.count.borrow()
    }

    /// Wait until every tracked task has exited. Returns immediately if the
    /// tracker is already idle.
    pub async fn wait_idle(&self) {
        let mut rx = self.count.subscribe();
        // Cannot fail: the tracker itself keeps the sender alive.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

impl Default for WorkTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for one unit of tracked work.
#[derive(Debug)]
pub struct WorkGuard {
    count: Arc<watch::Sender<usize>>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.count.send_modify(|n| *n -= 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_counts_guards() {
        let tracker = WorkTracker::new();
        assert_eq!(tracker.outstanding(), 0);

        let guard1 = tracker.track();
        assert_eq!(tracker.outstanding(), 1);

        let guard2 = tracker.track();
        assert_eq!(tracker.outstanding(), 2);

        drop(guard1);
        assert_eq!(tracker.outstanding(), 1);

        drop(guard2);
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn wait_idle_returns_immediately_when_idle() {
        let tracker = WorkTracker::new();
        tracker.wait_idle().await;
    }

    #[tokio::test]
    async fn wait_idle_blocks_until_guards_drop() {
        let tracker = WorkTracker::new();
        let guard = tracker.track();

        let waiter = {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.wait_idle().await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn late_subscriber_sees_fired_signal() {
        let shutdown = Shutdown::new();
        shutdown.fire();
        shutdown.fire();

        let mut signal = shutdown.subscribe();
        assert!(signal.is_fired());
        signal.fired().await;
    }

    #[test]
    fn fresh_signal_is_not_fired() {
        let shutdown = Shutdown::new();
        assert!(!shutdown.is_fired());
        assert!(!shutdown.subscribe().is_fired());
    }
}
