//! Shared helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a mock HTTP health endpoint whose status and body come from the
/// supplied closure, evaluated per request.
#[allow(dead_code)]
pub async fn start_health_backend<F>(addr: SocketAddr, f: F)
where
    F: Fn() -> (u16, String) + Send + Sync + 'static,
{
    start_delayed_health_backend(addr, Duration::ZERO, f).await
}

/// Start a mock HTTP health endpoint that waits `delay` before answering
/// each request, to simulate a slow probe target.
#[allow(dead_code)]
pub async fn start_delayed_health_backend<F>(addr: SocketAddr, delay: Duration, f: F)
where
    F: Fn() -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind(addr).await.unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Consume the request head before answering.
                        let mut head = [0u8; 1024];
                        let _ = socket.read(&mut head).await;

                        if delay > Duration::ZERO {
                            tokio::time::sleep(delay).await;
                        }

                        let (status, body) = f();
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    // Give the accept loop a moment to come up.
    tokio::time::sleep(Duration::from_millis(50)).await;
}
