//! Observability subsystem.
//!
//! All subsystems log through `tracing`; logging.rs wires the subscriber.
//! Connection- and accept-level failures surface only here, as debug/info
//! events, never as errors crossing subsystem boundaries.

pub mod logging;
