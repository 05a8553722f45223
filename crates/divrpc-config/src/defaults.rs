use crate::endpoint::Endpoint;

/// TCP port shared by the server listener and the client target.
pub const DEFAULT_PORT: u16 = 8859;

/// Host the server binds when no `--listen` override is supplied.
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Host the client dials when no `--server` override is supplied.
pub const DEFAULT_CLIENT_HOST: &str = "127.0.0.1";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Dividend sent by the client when none is given.
pub const DEFAULT_DIVIDEND: i64 = 88;

/// Divisor sent by the client when none is given.
pub const DEFAULT_DIVISOR: i64 = 6;

/// Endpoint the server listens on by default.
#[must_use]
pub fn default_listen_endpoint() -> Endpoint {
    Endpoint::tcp(DEFAULT_SERVER_HOST, DEFAULT_PORT)
}

/// Endpoint the client connects to by default.
#[must_use]
pub fn default_client_endpoint() -> Endpoint {
    Endpoint::tcp(DEFAULT_CLIENT_HOST, DEFAULT_PORT)
}
