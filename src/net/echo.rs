//! Per-connection echo handler.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time;

use crate::lifecycle::shutdown::{ShutdownSignal, WorkGuard};

/// Read/write deadline per iteration; a connection with no traffic inside
/// this window is closed as idle.
const IO_DEADLINE: Duration = Duration::from_secs(3);

/// Read buffer size; a reply never exceeds one buffer per read.
const BUFFER_SIZE: usize = 4096;

/// Serve one connection: read a chunk, write it back, repeat.
///
/// The shutdown check is non-blocking and happens between iterations, so an
/// in-flight read runs to its deadline before the handler exits; drain
/// latency is bounded by [`IO_DEADLINE`]. Every terminating condition closes
/// the connection. Nothing is reported back to the controller; connection
/// failures are local.
///
/// The work guard is declared first: parameters drop in reverse declaration
/// order, and the guard must release only after the stream has closed, or a
/// drain could complete with this connection still open.
pub async fn serve(
    _guard: WorkGuard,
    mut stream: TcpStream,
    peer: SocketAddr,
    shutdown: ShutdownSignal,
) {
    let mut buf = [0u8; BUFFER_SIZE];
    loop {
        if shutdown.is_fired() {
            tracing::trace!(peer = %peer, "shutdown signal observed, dropping connection");
            return;
        }

        let n = match time::timeout(IO_DEADLINE, stream.read(&mut buf)).await {
            Ok(Ok(0)) => {
                tracing::trace!(peer = %peer, "peer closed connection");
                return;
            }
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                tracing::debug!(peer = %peer, error = %e, "read failed, dropping connection");
                return;
            }
            Err(_) => {
                tracing::debug!(peer = %peer, "idle deadline reached, dropping connection");
                return;
            }
        };

        // Echo exactly the bytes read, never the rest of the buffer.
        match time::timeout(IO_DEADLINE, stream.write_all(&buf[..n])).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(peer = %peer, error = %e, "write failed, dropping connection");
                return;
            }
            Err(_) => {
                tracing::debug!(peer = %peer, "write deadline reached, dropping connection");
                return;
            }
        }
    }
}
