//! Single-instance enforcement via an exclusively bound local port
//!
//! Binding a fixed local port in listen mode is a cross-platform mutex:
//! the first claimer wins and the OS releases the port when the process
//! exits, crash included. No payload is ever exchanged on it.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};

use tracing::info;

/// Errors from claiming the instance slot
#[derive(Debug, thiserror::Error)]
pub enum SingletonError {
    /// Another instance already holds the port. Treated as a clean
    /// "already running" refusal, not a failure.
    #[error("another instance already holds the instance port")]
    AlreadyRunning,

    #[error("failed to claim instance port: {0}")]
    Io(#[from] std::io::Error),
}

/// Holds the instance port for the process lifetime.
pub struct SingletonGuard {
    listener: TcpListener,
}

impl SingletonGuard {
    /// Claim exclusive ownership of the running-instance slot.
    pub fn claim(port: u16) -> Result<Self, SingletonError> {
        match TcpListener::bind(("127.0.0.1", port)) {
            Ok(listener) => {
                info!(port, "instance port claimed");
                Ok(Self { listener })
            }
            Err(e) if e.kind() == ErrorKind::AddrInUse => Err(SingletonError::AlreadyRunning),
            Err(e) => Err(SingletonError::Io(e)),
        }
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}
