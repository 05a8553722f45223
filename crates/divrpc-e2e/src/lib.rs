//! End-to-end harness for divrpc.
//!
//! [`RunningServer`] starts the real server on an ephemeral loopback port so
//! tests can drive it with the real client or with raw sockets.

use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;

use thiserror::Error;

use divrpc_config::Endpoint;
use divrpc_server::{ListenerError, RegistrationError, Server, ServerHandle, default_registry};

/// Errors raised while preparing the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The default operations could not be registered.
    #[error("failed to build registry: {0}")]
    Registry(#[from] RegistrationError),
    /// The server could not bind or start.
    #[error("failed to start server: {0}")]
    Listener(#[from] ListenerError),
    /// A raw connection could not be opened.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Address of the server.
        addr: SocketAddr,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// A server listening on `127.0.0.1` with an ephemeral port.
///
/// Dropping the value stops the accept loop and waits for it to exit.
pub struct RunningServer {
    handle: Option<ServerHandle>,
    addr: SocketAddr,
}

impl RunningServer {
    /// Starts a server with the default registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be built or the listener
    /// cannot be started.
    pub fn start() -> Result<Self, HarnessError> {
        let registry = Arc::new(default_registry()?);
        let server = Server::bind(&Endpoint::tcp("127.0.0.1", 0), registry)?;
        let handle = server.start()?;
        let addr = handle.local_addr();
        Ok(Self {
            handle: Some(handle),
            addr,
        })
    }

    /// Address the server is bound to.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Endpoint a client should connect to.
    #[must_use]
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::tcp(self.addr.ip().to_string(), self.addr.port())
    }

    /// Opens a plain TCP connection to the server.
    ///
    /// # Errors
    ///
    /// Returns [`HarnessError::Connect`] if the connection fails.
    pub fn raw_connection(&self) -> Result<TcpStream, HarnessError> {
        TcpStream::connect(self.addr).map_err(|source| HarnessError::Connect {
            addr: self.addr,
            source,
        })
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.shutdown();
            let _ = handle.join();
        }
    }
}
