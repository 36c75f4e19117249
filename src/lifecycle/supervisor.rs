//! Health-driven supervision of the echo service.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::EchoError;
use crate::lifecycle::controller::EchoService;

/// Drives the echo service up and down from a stream of health events.
///
/// A healthy event brings the service up, an unhealthy one takes it down.
/// Transitions are never in flight concurrently: this is the only task
/// invoking them, and each call completes before the next event is read.
pub struct Supervisor {
    service: Arc<EchoService>,
}

impl Supervisor {
    pub fn new(service: Arc<EchoService>) -> Self {
        Self { service }
    }

    /// Consume health events until `term` resolves, then stop the service
    /// exactly once and return.
    ///
    /// The event channel is closed before the final down transition so a
    /// late health event cannot bring the service back up while the process
    /// is exiting. An error from an up transition (a bind fault) is fatal
    /// and propagates to the caller.
    pub async fn run(
        self,
        mut events: mpsc::Receiver<bool>,
        term: impl Future<Output = ()>,
    ) -> Result<(), EchoError> {
        tokio::pin!(term);
        loop {
            tokio::select! {
                _ = &mut term => {
                    tracing::info!("termination requested, shutting down");
                    events.close();
                    self.service.down().await;
                    tracing::info!("graceful shutdown complete");
                    return Ok(());
                }
                event = events.recv() => match event {
                    Some(true) => {
                        tracing::debug!("endpoint healthy, ensuring echo server is up");
                        self.service.up().await?;
                    }
                    Some(false) => {
                        tracing::debug!("endpoint unhealthy, ensuring echo server is down");
                        self.service.down().await;
                    }
                    None => {
                        tracing::debug!("health event channel closed, shutting down");
                        self.service.down().await;
                        return Ok(());
                    }
                },
            }
        }
    }
}
