//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// The configured level applies to this crate's events; `RUST_LOG` wins
/// when set. An unrecognized level falls back to `info`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("echo_sidecar={level}")))
        .unwrap_or_else(|_| EnvFilter::new("echo_sidecar=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
