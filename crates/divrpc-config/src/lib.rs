//! Shared configuration for the divrpc server and client binaries.
//!
//! Both processes run with fixed defaults: the server listens on
//! `tcp://0.0.0.0:8859` and the client dials `tcp://127.0.0.1:8859`. The
//! command-line structs defined here reproduce those defaults when no flags
//! are given and allow tests to point the binaries at ephemeral ports. No
//! configuration file or environment variable is consulted.

mod args;
mod defaults;
mod endpoint;
mod logging;
pub mod telemetry;

pub use args::{ClientConfig, LoggingConfig, ServerConfig};
pub use defaults::{
    DEFAULT_CLIENT_HOST, DEFAULT_DIVIDEND, DEFAULT_DIVISOR, DEFAULT_LOG_FILTER, DEFAULT_PORT,
    DEFAULT_SERVER_HOST, default_client_endpoint, default_listen_endpoint,
};
pub use endpoint::{Endpoint, SocketParseError};
pub use logging::{LogFormat, LogFormatParseError};
pub use telemetry::{TelemetryError, TelemetryHandle};
