//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! default to a runnable configuration.

use serde::{Deserialize, Serialize};

/// Root configuration for the sidecar.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SidecarConfig {
    /// Listener configuration (bind address, port).
    pub listener: ListenerConfig,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Logging settings.
    pub log: LogConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address or hostname to bind to.
    pub bind_address: String,

    /// Port to listen on.
    pub bind_port: u16,
}

impl ListenerConfig {
    /// Address string handed to the binder; hostname resolution happens at
    /// bind time.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.bind_port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            bind_port: 1580,
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// URI probed on every check.
    pub uri: String,

    /// Regex the response body must match for a check to pass.
    pub match_pattern: String,

    /// Seconds between checks. The first check runs immediately.
    pub interval_secs: u64,

    /// Per-check request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:8080/healthz".to_string(),
            match_pattern: r"(?i)^ok\b".to_string(),
            interval_secs: 5,
            timeout_secs: 5,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_flag_defaults() {
        let config = SidecarConfig::default();
        assert_eq!(config.listener.socket_addr(), "0.0.0.0:1580");
        assert_eq!(config.health_check.uri, "http://localhost:8080/healthz");
        assert_eq!(config.health_check.interval_secs, 5);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: SidecarConfig = toml::from_str(
            r#"
            [listener]
            bind_port = 2580
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0");
        assert_eq!(config.listener.bind_port, 2580);
        assert_eq!(config.health_check.interval_secs, 5);
    }
}
