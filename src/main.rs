//! Binary entry point: CLI parsing, logging setup, subsystem wiring.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;

use echo_sidecar::config::{load_config, validate_config, ConfigError, SidecarConfig};
use echo_sidecar::health::{HealthMonitor, HealthProbe};
use echo_sidecar::lifecycle::{signals, EchoService, Shutdown, Supervisor};
use echo_sidecar::observability::logging;
use echo_sidecar::EchoError;

#[derive(Parser)]
#[command(name = "echo-sidecar")]
#[command(about = "TCP echo responder gated by an external HTTP health check", long_about = None)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// IP address to bind to
    #[arg(long)]
    bind_address: Option<String>,

    /// Port to listen on
    #[arg(long)]
    bind_port: Option<u16>,

    /// URI to check
    #[arg(long)]
    check_uri: Option<String>,

    /// Regex the health check body must match
    #[arg(long)]
    check_match: Option<String>,

    /// Seconds between health checks
    #[arg(long)]
    check_interval: Option<u64>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Merge file config (if any) with flag overrides, then re-validate.
    fn into_config(self) -> Result<SidecarConfig, EchoError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => SidecarConfig::default(),
        };

        if let Some(addr) = self.bind_address {
            config.listener.bind_address = addr;
        }
        if let Some(port) = self.bind_port {
            config.listener.bind_port = port;
        }
        if let Some(uri) = self.check_uri {
            config.health_check.uri = uri;
        }
        if let Some(pattern) = self.check_match {
            config.health_check.match_pattern = pattern;
        }
        if let Some(interval) = self.check_interval {
            config.health_check.interval_secs = interval;
        }
        if let Some(level) = self.log_level {
            config.log.level = level;
        }

        validate_config(&config)
            .map_err(ConfigError::Validation)
            .map_err(EchoError::from)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), EchoError> {
    let config = Cli::parse().into_config()?;
    logging::init(&config.log.level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        bind_port = config.listener.bind_port,
        check_uri = %config.health_check.uri,
        check_interval_secs = config.health_check.interval_secs,
        "configuration loaded"
    );

    let service = Arc::new(EchoService::new(config.listener.clone()));
    let probe = HealthProbe::new(&config.health_check)?;
    let monitor = HealthMonitor::new(
        probe,
        Duration::from_secs(config.health_check.interval_secs),
    );

    let monitor_shutdown = Shutdown::new();
    let (events_tx, events_rx) = mpsc::channel(1);
    let monitor_task = tokio::spawn(monitor.run(events_tx, monitor_shutdown.subscribe()));

    let supervisor = Supervisor::new(Arc::clone(&service));
    let result = supervisor.run(events_rx, signals::terminated()).await;

    // The supervisor has already stopped the echo service; the monitor sees
    // its event channel close, the signal just shortens any pending sleep.
    monitor_shutdown.fire();
    let _ = monitor_task.await;

    tracing::info!("shutdown complete");
    result
}
