//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, cancellable via shutdown signal)
//!     → echo.rs (read chunk, write it back, 3s idle deadline)
//!
//! Shutdown signal fired:
//!     listener.rs stops accepting and drops the socket
//!     echo.rs handlers observe the signal between iterations and exit
//! ```
//!
//! # Design Decisions
//! - The accept loop owns the listening socket; nothing else touches it
//! - Accept errors are contained; only the shutdown signal ends the loop
//! - Connections share no mutable state with each other

pub mod echo;
pub mod listener;
