//! Error types for the RPC client.

use std::io;

use thiserror::Error;

use divrpc_protocol::FrameError;

/// Errors surfaced while connecting or calling.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to resolve server address {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to connect to server at {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare connection: {0}")]
    CloneStream(#[source] io::Error),
    #[error("failed to serialise request: {0}")]
    SerialiseRequest(#[source] serde_json::Error),
    #[error("failed to send request to server: {0}")]
    SendRequest(#[source] io::Error),
    #[error("failed to read reply from server: {0}")]
    ReadReply(#[source] io::Error),
    #[error("failed to parse server reply: {message}")]
    ParseReply { message: String },
    #[error("server closed the connection before replying")]
    ConnectionClosed,
    #[error("connection is shut down")]
    Shutdown,
    /// The server answered with an error message.
    #[error("{0}")]
    Remote(String),
    #[error("failed to decode call result: {0}")]
    DecodeResult(#[source] serde_json::Error),
}

impl ClientError {
    /// Returns true when the server processed the call and reported a
    /// failure, as opposed to a transport or protocol failure.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    pub(crate) fn from_write(error: FrameError) -> Self {
        match error {
            FrameError::Encode(source) => Self::SerialiseRequest(source),
            FrameError::Io(source) => Self::SendRequest(source),
            FrameError::TooLarge { limit } => Self::SendRequest(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("request exceeds {limit} bytes"),
            )),
        }
    }
}
