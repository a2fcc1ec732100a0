//! Remote control channel for stopping the daemon
//!
//! A second well-known local port accepts single-shot plaintext commands.
//! `stop` is acknowledged with `stopping` and makes the accept loop
//! return, which completes the main select and exits the process; anything
//! else gets `unknown` and is ignored. Losing the bind only disables the
//! feature for this run.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, warn};

/// What a control connection asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Stop,
    Unknown,
}

/// Accepts remote commands on the control port.
pub struct ControlChannel {
    listener: Option<TcpListener>,
}

impl ControlChannel {
    /// Bind the control port. Failure is non-fatal: the daemon runs on,
    /// just without remote stop.
    pub async fn bind(port: u16) -> Self {
        match TcpListener::bind(("127.0.0.1", port)).await {
            Ok(listener) => {
                info!(port, "control channel listening");
                Self {
                    listener: Some(listener),
                }
            }
            Err(e) => {
                warn!(port, error = %e, "control port unavailable, remote stop disabled");
                Self { listener: None }
            }
        }
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Serve commands until a `stop` arrives. Never returns when the port
    /// could not be bound.
    pub async fn run(&self) {
        let Some(listener) = &self.listener else {
            return std::future::pending().await;
        };

        loop {
            let (mut stream, addr) = match listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    error!(error = %e, "control accept error");
                    continue;
                }
            };
            debug!(%addr, "control client connected");

            match handle_client(&mut stream).await {
                Ok(Command::Stop) => {
                    info!(%addr, "stop command received");
                    return;
                }
                Ok(Command::Unknown) => {}
                Err(e) => warn!(error = %e, "control client error"),
            }
        }
    }
}

/// One connection, one command, one acknowledgement.
async fn handle_client(stream: &mut TcpStream) -> std::io::Result<Command> {
    let mut buf = [0u8; 64];
    let n = stream.read(&mut buf).await?;
    let request = String::from_utf8_lossy(&buf[..n]);

    if request.trim().eq_ignore_ascii_case("stop") {
        stream.write_all(b"stopping").await?;
        Ok(Command::Stop)
    } else {
        stream.write_all(b"unknown").await?;
        Ok(Command::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn send(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).await.unwrap();
        reply
    }

    #[tokio::test]
    async fn test_stop_acknowledged_and_loop_returns() {
        let channel = ControlChannel::bind(0).await;
        let addr = channel.local_addr().unwrap();

        let client = tokio::spawn(async move { send(addr, "stop\n").await });
        // run() must return because of the stop command.
        channel.run().await;
        assert_eq!(client.await.unwrap(), "stopping");
    }

    #[tokio::test]
    async fn test_stop_is_case_insensitive() {
        let channel = ControlChannel::bind(0).await;
        let addr = channel.local_addr().unwrap();

        let client = tokio::spawn(async move { send(addr, "  STOP  ").await });
        channel.run().await;
        assert_eq!(client.await.unwrap(), "stopping");
    }

    #[tokio::test]
    async fn test_unknown_command_keeps_serving() {
        let channel = ControlChannel::bind(0).await;
        let addr = channel.local_addr().unwrap();

        let client = tokio::spawn(async move {
            let first = send(addr, "status").await;
            let second = send(addr, "stop").await;
            (first, second)
        });

        channel.run().await;
        let (first, second) = client.await.unwrap();
        assert_eq!(first, "unknown");
        assert_eq!(second, "stopping");
    }

    #[tokio::test]
    async fn test_unbound_channel_reports_no_addr() {
        let first = ControlChannel::bind(0).await;
        let taken = first.local_addr().unwrap().port();

        let second = ControlChannel::bind(taken).await;
        assert!(second.local_addr().is_none());
    }
}
