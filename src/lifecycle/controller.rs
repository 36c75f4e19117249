//! Echo service lifecycle state machine.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::{watch, Mutex};

use crate::config::ListenerConfig;
use crate::error::EchoError;
use crate::lifecycle::shutdown::{Shutdown, WorkTracker};
use crate::net::listener;

/// Lifecycle states of the echo service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// No listener bound; connections are refused.
    Down,
    /// Bind in progress.
    Starting,
    /// Listener bound, accept loop running.
    Up,
    /// Shutdown signal fired, draining in-flight connections.
    Closing,
}

impl std::fmt::Display for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ServiceState::Down => "down",
            ServiceState::Starting => "starting",
            ServiceState::Up => "up",
            ServiceState::Closing => "closing",
        };
        f.write_str(s)
    }
}

/// Live resources of an up service, released on the next down transition.
struct Running {
    shutdown: Shutdown,
    work: WorkTracker,
    local_addr: SocketAddr,
}

/// The supervised TCP echo service.
///
/// [`up`](Self::up) and [`down`](Self::down) are idempotent and safe to call
/// concurrently: at most one listener exists at a time, the shutdown signal
/// fires at most once per up/down cycle, and `down` returns only after every
/// spawned task has exited.
pub struct EchoService {
    config: ListenerConfig,
    state: watch::Sender<ServiceState>,
    /// Serializes transition bodies; also owns the live resources.
    running: Mutex<Option<Running>>,
}

impl EchoService {
    /// Create a service in the `Down` state with a fixed bind configuration.
    pub fn new(config: ListenerConfig) -> Self {
        let (state, _) = watch::channel(ServiceState::Down);
        Self {
            config,
            state,
            running: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    /// Watch state transitions. Observers can await a particular state
    /// instead of polling.
    pub fn state_changes(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    /// Address the listener is bound to, while the service is up.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.local_addr)
    }

    /// Bring the service up.
    ///
    /// No-op if the service is already starting or up. A bind failure is a
    /// fatal startup fault: the caller is expected to terminate the process,
    /// not retry.
    pub async fn up(&self) -> Result<&Self, EchoError> {
        if matches!(self.state(), ServiceState::Up | ServiceState::Starting) {
            tracing::trace!("up requested but service is already starting or up");
            return Ok(self);
        }

        let mut running = self.running.lock().await;
        // Re-check under the lock; a concurrent up() may have won the race.
        if running.is_some() {
            return Ok(self);
        }
        self.state.send_replace(ServiceState::Starting);

        let bind_addr = self.config.socket_addr();
        let socket = match TcpListener::bind(&bind_addr).await {
            Ok(socket) => socket,
            Err(source) => {
                self.state.send_replace(ServiceState::Down);
                return Err(EchoError::Bind {
                    addr: bind_addr,
                    source,
                });
            }
        };
        let local_addr = match socket.local_addr() {
            Ok(addr) => addr,
            Err(source) => {
                self.state.send_replace(ServiceState::Down);
                return Err(EchoError::Bind {
                    addr: bind_addr,
                    source,
                });
            }
        };

        tracing::info!(address = %local_addr, "starting TCP echo server");

        let shutdown = Shutdown::new();
        let work = WorkTracker::new();
        let accept_guard = work.track();
        tokio::spawn(listener::accept_loop(
            accept_guard,
            socket,
            shutdown.subscribe(),
            work.clone(),
        ));

        *running = Some(Running {
            shutdown,
            work,
            local_addr,
        });
        self.state.send_replace(ServiceState::Up);
        tracing::info!("TCP echo server startup complete");
        Ok(self)
    }

    /// Take the service down, draining in-flight connections first.
    ///
    /// No-op if the service is already down, or closing: a second call
    /// arriving mid-drain returns immediately without firing the one-shot
    /// shutdown signal again. Otherwise this returns only once the accept
    /// loop and every connection handler have exited and the port is
    /// released.
    pub async fn down(&self) -> &Self {
        if matches!(self.state(), ServiceState::Down | ServiceState::Closing) {
            tracing::trace!("down requested but service is already closing or down");
            return self;
        }

        let mut running = self.running.lock().await;
        let Some(active) = running.take() else {
            return self;
        };
        self.state.send_replace(ServiceState::Closing);
        tracing::info!("gracefully stopping TCP echo server");

        active.shutdown.fire();
        active.work.wait_idle().await;

        self.state.send_replace(ServiceState::Down);
        tracing::info!("graceful TCP echo server termination complete");
        self
    }
}
