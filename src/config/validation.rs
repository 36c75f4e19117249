//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic ones: the check pattern must
//! compile, the check URI must be http(s), the port and interval must be
//! nonzero. Returns all violations, not just the first.

use regex::Regex;
use url::Url;

use crate::config::schema::SidecarConfig;

/// A single semantic violation in a parsed configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("bind address must not be empty")]
    EmptyBindAddress,

    #[error("bind port must be nonzero")]
    ZeroPort,

    #[error("check interval must be nonzero")]
    ZeroInterval,

    #[error("check timeout must be nonzero")]
    ZeroTimeout,

    #[error("invalid check uri {uri:?}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("invalid check pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Validate a parsed configuration, collecting every violation.
pub fn validate_config(config: &SidecarConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }
    if config.listener.bind_port == 0 {
        errors.push(ValidationError::ZeroPort);
    }
    if config.health_check.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if config.health_check.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    match Url::parse(&config.health_check.uri) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUri {
            uri: config.health_check.uri.clone(),
            reason: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUri {
            uri: config.health_check.uri.clone(),
            reason: e.to_string(),
        }),
    }

    if let Err(e) = Regex::new(&config.health_check.match_pattern) {
        errors.push(ValidationError::InvalidPattern {
            pattern: config.health_check.match_pattern.clone(),
            reason: e.to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
