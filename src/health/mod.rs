//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! monitor.rs:
//!     Periodic timer (first tick immediate)
//!     → probe.rs (GET check uri)
//!     → bool event on the supervisor's channel
//!
//! probe.rs, one check:
//!     transport error | status != 200 | unreadable body | pattern miss
//!         → unhealthy
//!     otherwise → healthy
//! ```
//!
//! # Design Decisions
//! - No retry or hysteresis: every check reports its result immediately,
//!   and the lifecycle controller makes repeated transitions idempotent
//! - The monitor stops emitting the moment shutdown begins

pub mod monitor;
pub mod probe;

pub use monitor::HealthMonitor;
pub use probe::HealthProbe;
