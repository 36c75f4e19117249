//! OS signal handling.
//!
//! Translates SIGINT/SIGTERM into a termination event for the supervisor.

/// Resolve when the process receives SIGINT or SIGTERM.
pub async fn terminated() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!(signal = "SIGINT", "received signal, shutting down"),
        _ = terminate => tracing::info!(signal = "SIGTERM", "received signal, shutting down"),
    }
}
