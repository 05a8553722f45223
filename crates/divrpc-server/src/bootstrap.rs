//! Server bootstrap orchestration.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;

use divrpc_config::telemetry::{self, TelemetryError};
use divrpc_config::{Endpoint, ServerConfig};

use crate::dispatch::RpcConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::registry::{RegistrationError, Registry};
use crate::service::default_registry;
use crate::transport::{ListenerError, ListenerHandle, SocketListener};

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The operation registry could not be assembled.
    #[error("failed to register operations: {source}")]
    Registration {
        /// Underlying registration error.
        #[source]
        source: RegistrationError,
    },
    /// Binding or running the listener failed.
    #[error("listener failed: {source}")]
    Listener {
        /// Underlying listener error.
        #[source]
        source: ListenerError,
    },
}

/// A bound server that has not started accepting yet.
#[derive(Debug)]
pub struct Server {
    listener: SocketListener,
    handler: Arc<RpcConnectionHandler>,
}

impl Server {
    /// Binds `endpoint` and prepares to serve `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be resolved or bound.
    pub fn bind(endpoint: &Endpoint, registry: Arc<Registry>) -> Result<Self, ListenerError> {
        let listener = SocketListener::bind(endpoint)?;
        Ok(Self {
            listener,
            handler: Arc::new(RpcConnectionHandler::new(registry)),
        })
    }

    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Starts the accept loop on a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be switched to non-blocking
    /// mode.
    pub fn start(self) -> Result<ServerHandle, ListenerError> {
        let listener = self.listener.start(self.handler)?;
        Ok(ServerHandle { listener })
    }
}

/// Handle to a running server.
///
/// Dropping the handle stops the accept loop. Connections already being
/// served run until their peers disconnect.
pub struct ServerHandle {
    listener: ListenerHandle,
}

impl ServerHandle {
    /// Address the listener is bound to.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.listener.local_addr()
    }

    /// Asks the accept loop to stop.
    pub fn shutdown(&self) {
        self.listener.shutdown();
    }

    /// Waits for the accept loop to exit.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::ThreadPanic`] if the accept thread panicked.
    pub fn join(self) -> Result<(), ListenerError> {
        self.listener.join()
    }
}

/// Bootstraps the server using the supplied reporter.
///
/// # Errors
///
/// Returns an error if telemetry, registration, or binding fails. The
/// reporter is told about the failure before it is returned.
pub fn bootstrap_with(
    config: &ServerConfig,
    reporter: Arc<dyn HealthReporter>,
) -> Result<ServerHandle, BootstrapError> {
    reporter.bootstrap_starting();
    let result = start_server(config);
    match &result {
        Ok(handle) => reporter.bootstrap_succeeded(config, handle.local_addr()),
        Err(error) => reporter.bootstrap_failed(error),
    }
    result
}

fn start_server(config: &ServerConfig) -> Result<ServerHandle, BootstrapError> {
    telemetry::initialise(&config.logging)
        .map_err(|source| BootstrapError::Telemetry { source })?;
    let registry =
        default_registry().map_err(|source| BootstrapError::Registration { source })?;
    Server::bind(&config.listen, Arc::new(registry))
        .and_then(Server::start)
        .map_err(|source| BootstrapError::Listener { source })
}

/// Runs the server until the accept loop exits.
///
/// # Errors
///
/// Returns an error if bootstrap fails or the accept thread panics.
pub fn run(config: &ServerConfig) -> Result<(), BootstrapError> {
    let handle = bootstrap_with(config, Arc::new(StructuredHealthReporter::new()))?;
    handle
        .join()
        .map_err(|source| BootstrapError::Listener { source })
}
