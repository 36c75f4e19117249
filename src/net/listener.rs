//! Accept loop for the echo listener.

use std::io::ErrorKind;

use tokio::net::TcpListener;

use crate::lifecycle::shutdown::{ShutdownSignal, WorkGuard, WorkTracker};
use crate::net::echo;

/// Accept connections until the shutdown signal fires.
///
/// Owns the listening socket exclusively; dropping it on exit closes the
/// port. Accept errors never terminate the loop, only the shutdown signal
/// does. Each accepted connection gets its own handler task registered with
/// the work tracker.
///
/// The work guard is declared first: parameters drop in reverse declaration
/// order, and the guard must release only after the socket has closed, or a
/// drain could complete while the port still accepts.
pub async fn accept_loop(
    _guard: WorkGuard,
    socket: TcpListener,
    mut shutdown: ShutdownSignal,
    work: WorkTracker,
) {
    loop {
        let accepted = tokio::select! {
            _ = shutdown.fired() => {
                tracing::debug!("shutdown signal observed, closing listener");
                break;
            }
            accepted = socket.accept() => accepted,
        };

        match accepted {
            Ok((stream, peer)) => {
                tracing::debug!(peer = %peer, "accepted connection");
                let conn_guard = work.track();
                tokio::spawn(echo::serve(conn_guard, stream, peer, shutdown.clone()));
            }
            Err(e) if is_transient(&e) => {}
            Err(e) => {
                tracing::info!(error = %e, "error on accept");
            }
        }
    }
    // The socket drops here; the port stops accepting immediately.
}

/// Accept errors caused by the remote end or scheduler, not the listener.
fn is_transient(err: &std::io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
            | ErrorKind::Interrupted
            | ErrorKind::WouldBlock
    )
}
