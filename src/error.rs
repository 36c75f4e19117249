//! Crate error type for fatal startup faults.

use crate::config::ConfigError;

/// Errors that abort the sidecar.
///
/// Only misconfiguration and bind failures appear here; they require
/// operator intervention, so there is no retry. Connection- and accept-level
/// failures never reach this type, they are contained and logged where they
/// happen.
#[derive(Debug, thiserror::Error)]
pub enum EchoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid check pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("could not build health check client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
