//! Command-line configuration for the divrpc binaries.
//!
//! Every flag is optional; running either binary without arguments yields
//! the fixed endpoints and arguments from [`crate::defaults`].

use clap::{Args, Parser};
use serde::Serialize;

use crate::defaults::{
    DEFAULT_DIVIDEND, DEFAULT_DIVISOR, DEFAULT_LOG_FILTER, default_client_endpoint,
    default_listen_endpoint,
};
use crate::endpoint::Endpoint;
use crate::logging::LogFormat;

/// Logging options shared by both binaries.
#[derive(Args, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggingConfig {
    /// Tracing filter expression (for example `info` or `divrpc_server=debug`).
    #[arg(long, value_name = "FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub log_filter: String,
    /// Log output format.
    #[arg(long, value_name = "FORMAT", default_value_t = LogFormat::default())]
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

/// Configuration for the `divrpc-server` binary.
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(name = "divrpc-server", about = "Serves the division RPC over TCP")]
pub struct ServerConfig {
    /// Endpoint to listen on.
    #[arg(long, value_name = "ENDPOINT", default_value_t = default_listen_endpoint())]
    pub listen: Endpoint,
    /// Logging options.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_endpoint(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration for the `divrpc-client` binary.
#[derive(Parser, Debug, Clone, PartialEq, Eq, Serialize)]
#[command(
    name = "divrpc-client",
    about = "Calls Service.Division on a divrpc server",
    allow_negative_numbers = true
)]
pub struct ClientConfig {
    /// Server endpoint to connect to.
    #[arg(long, value_name = "ENDPOINT", default_value_t = default_client_endpoint())]
    pub server: Endpoint,
    /// Logging options.
    #[command(flatten)]
    pub logging: LoggingConfig,
    /// Dividend (`A`).
    #[arg(value_name = "DIVIDEND", default_value_t = DEFAULT_DIVIDEND)]
    pub dividend: i64,
    /// Divisor (`B`).
    #[arg(value_name = "DIVISOR", default_value_t = DEFAULT_DIVISOR)]
    pub divisor: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: default_client_endpoint(),
            logging: LoggingConfig::default(),
            dividend: DEFAULT_DIVIDEND,
            divisor: DEFAULT_DIVISOR,
        }
    }
}
