//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Health events (health::monitor):
//!     true  → supervisor.rs → controller.rs up()   → accept loop spawned
//!     false → supervisor.rs → controller.rs down() → drain, port released
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → supervisor closes event intake → one final down()
//!
//! Shutdown (shutdown.rs):
//!     controller fires one-shot signal → accept loop and handlers observe
//!     it, exit, and release their work guards → down() unblocks
//! ```
//!
//! # Design Decisions
//! - Explicit state machine: Down → Starting → Up → Closing → Down
//! - up()/down() are idempotent; double transitions are no-ops, not errors
//! - down() is synchronous teardown: it returns only when all tasks are dead
//! - The shutdown signal is level-triggered; late checks still observe it

pub mod controller;
pub mod shutdown;
pub mod signals;
pub mod supervisor;

pub use controller::{EchoService, ServiceState};
pub use shutdown::{Shutdown, ShutdownSignal, WorkGuard, WorkTracker};
pub use supervisor::Supervisor;
