//! Connection handler that serves RPC requests.
//!
//! The handler implements the transport layer's `ConnectionHandler` trait. It
//! reads request lines until the peer closes the connection, answering each
//! one before reading the next.

use std::net::TcpStream;
use std::sync::Arc;

use tracing::{debug, warn};

use divrpc_protocol::{LineReader, Reply, Request, write_line};

use crate::registry::Registry;
use crate::transport::ConnectionHandler;

use super::DISPATCH_TARGET;
use super::errors::DispatchError;
use super::request::parse_request;

/// Connection handler that dispatches requests through a [`Registry`].
#[derive(Debug, Clone)]
pub struct RpcConnectionHandler {
    registry: Arc<Registry>,
}

impl RpcConnectionHandler {
    /// Creates a handler sharing `registry` across connections.
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Invokes the requested operation and builds its reply.
    ///
    /// The reply always echoes the request id.
    pub fn reply_to(&self, request: Request) -> Reply {
        let Request { method, params, id } = request;
        match self.registry.call(&method, params.as_ref()) {
            Ok(result) => Reply::success(id, result),
            Err(error) => {
                debug!(
                    target: DISPATCH_TARGET,
                    method = %method,
                    %error,
                    "call failed"
                );
                Reply::failure(id, error.to_string())
            }
        }
    }

    fn serve(&self, stream: TcpStream) -> Result<(), DispatchError> {
        let mut reader = LineReader::new(stream.try_clone()?);
        let mut writer = stream;
        while let Some(line) = reader.next_line()? {
            let Some(request) = parse_request(&line)? else {
                continue;
            };
            debug!(
                target: DISPATCH_TARGET,
                method = %request.method,
                id = %request.id,
                "dispatching request"
            );
            let reply = self.reply_to(request);
            write_line(&mut writer, &reply)?;
        }
        Ok(())
    }
}

impl ConnectionHandler for RpcConnectionHandler {
    fn handle(&self, stream: TcpStream) {
        let peer = stream
            .peer_addr()
            .map_or_else(|_| String::from("unknown"), |addr| addr.to_string());
        match self.serve(stream) {
            Ok(()) => debug!(target: DISPATCH_TARGET, %peer, "client disconnected"),
            Err(error) => warn!(
                target: DISPATCH_TARGET,
                %peer,
                %error,
                "closing connection"
            ),
        }
    }
}
