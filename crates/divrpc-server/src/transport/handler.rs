use std::net::TcpStream;

/// Handles accepted connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a single connection until the peer goes away. Implementations
    /// should avoid panicking.
    fn handle(&self, stream: TcpStream);
}
