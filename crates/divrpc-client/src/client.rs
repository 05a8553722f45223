//! Sequential RPC client.
//!
//! A client owns one connection and issues one call at a time: it writes the
//! request, then reads reply lines until the one carrying the call's id
//! arrives. Ids come from a per-client counter starting at zero. Replies for
//! any other id are logged and dropped.
//!
//! A transport or framing failure ends the connection; every call made
//! afterwards fails with [`ClientError::Shutdown`]. An error reported by the
//! server leaves the connection usable.

use std::net::{Shutdown, SocketAddr, TcpStream};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use divrpc_config::Endpoint;
use divrpc_protocol::{
    DIVISION_METHOD, DivisionArgs, FrameError, LineReader, Reply, Request, write_line,
};

use crate::ClientError;
use crate::transport::connect;

const CLIENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::client");
const UNSPECIFIED_ERROR: &str = "unspecified error";

/// A connected RPC client.
pub struct RpcClient {
    writer: TcpStream,
    reader: LineReader<TcpStream>,
    peer: SocketAddr,
    next_id: u64,
    closed: bool,
}

impl RpcClient {
    /// Connects to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint cannot be resolved or connected.
    pub fn connect(endpoint: &Endpoint) -> Result<Self, ClientError> {
        let stream = connect(endpoint)?;
        Self::from_stream(stream)
    }

    /// Wraps an established connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream cannot be duplicated for reading.
    pub fn from_stream(stream: TcpStream) -> Result<Self, ClientError> {
        let peer = stream.peer_addr().map_err(ClientError::CloneStream)?;
        let reader = stream.try_clone().map_err(ClientError::CloneStream)?;
        debug!(target: CLIENT_TARGET, %peer, "connected");
        Ok(Self {
            writer: stream,
            reader: LineReader::new(reader),
            peer,
            next_id: 0,
            closed: false,
        })
    }

    /// Address of the server this client is connected to.
    #[must_use]
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Calls `method` with `argument` and decodes the result.
    ///
    /// Blocks until the reply arrives or the connection ends.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Remote`] when the server reports a failure and
    /// a transport or decoding error otherwise.
    pub fn call<P, R>(&mut self, method: &str, argument: &P) -> Result<R, ClientError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if self.closed {
            return Err(ClientError::Shutdown);
        }
        let argument = serde_json::to_value(argument).map_err(ClientError::SerialiseRequest)?;
        let id = self.next_id;
        self.next_id += 1;
        let request = Request::new(id, method, argument);

        if let Err(error) = write_line(&mut self.writer, &request) {
            return Err(self.fail(ClientError::from_write(error)));
        }
        debug!(target: CLIENT_TARGET, id, method, "request sent");

        let reply = self.await_reply(id)?;
        match reply.error {
            Some(message) if message.is_empty() => {
                Err(ClientError::Remote(UNSPECIFIED_ERROR.to_owned()))
            }
            Some(message) => Err(ClientError::Remote(message)),
            None => serde_json::from_value(reply.result).map_err(ClientError::DecodeResult),
        }
    }

    /// Calls `Service.Division` with `a` and `b`.
    ///
    /// # Errors
    ///
    /// See [`RpcClient::call`]; a zero divisor yields
    /// `ClientError::Remote("division by zero")`.
    pub fn divide(&mut self, a: i64, b: i64) -> Result<f64, ClientError> {
        self.call(DIVISION_METHOD, &DivisionArgs::new(a, b))
    }

    /// Returns true once the connection can no longer carry calls.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the connection.
    pub fn close(mut self) {
        self.shutdown();
    }

    fn await_reply(&mut self, id: u64) -> Result<Reply, ClientError> {
        loop {
            let line = match self.reader.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return Err(self.fail(ClientError::ConnectionClosed)),
                Err(FrameError::Io(source)) => {
                    return Err(self.fail(ClientError::ReadReply(source)));
                }
                Err(error) => {
                    return Err(self.fail(ClientError::ParseReply {
                        message: error.to_string(),
                    }));
                }
            };
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let reply: Reply = match serde_json::from_slice(&line) {
                Ok(reply) => reply,
                Err(error) => {
                    return Err(self.fail(ClientError::ParseReply {
                        message: error.to_string(),
                    }));
                }
            };
            if reply.numeric_id() == Some(id) {
                return Ok(reply);
            }
            warn!(
                target: CLIENT_TARGET,
                expected = id,
                received = %reply.id,
                "reply for unknown call dropped"
            );
        }
    }

    fn fail(&mut self, error: ClientError) -> ClientError {
        warn!(target: CLIENT_TARGET, peer = %self.peer, %error, "connection failed");
        self.shutdown();
        error
    }

    fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(error) = self.writer.shutdown(Shutdown::Both) {
            debug!(target: CLIENT_TARGET, %error, "socket already closed");
        }
    }
}

impl Drop for RpcClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}
