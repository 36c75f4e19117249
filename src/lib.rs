//! TCP echo sidecar gated by an external HTTP health check.
//!
//! Exposes a raw TCP echo responder whose availability tracks the health of
//! a separately monitored HTTP endpoint: while the endpoint is healthy the
//! listener is up, and when it turns unhealthy the listener is torn down
//! gracefully, draining in-flight connections and releasing the port. Useful
//! where the mere presence of a TCP listener (e.g. behind a load balancer)
//! must signal liveness of a backend that cannot be probed over TCP itself.
//!
//! ```text
//! health::monitor ──bool events──▶ lifecycle::supervisor
//!                                        │ up() / down()
//!                                        ▼
//!                                 lifecycle::controller
//!                                        │ spawn / signal + drain
//!                                        ▼
//!                    net::listener (accept loop) ──▶ net::echo (per conn)
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::SidecarConfig;
pub use error::EchoError;
pub use lifecycle::{EchoService, ServiceState, Supervisor};
