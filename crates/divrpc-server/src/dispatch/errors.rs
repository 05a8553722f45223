//! Errors that end a connection.

use std::io;

use thiserror::Error;

use divrpc_protocol::FrameError;

/// Errors surfaced while reading requests or writing replies.
///
/// Any of these ends the affected connection; the listener and other
/// connections are unaffected.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line could not be decoded as a request envelope.
    #[error("malformed request: {message}")]
    MalformedJson {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: exceeds {max_size} byte limit")]
    RequestTooLarge { max_size: usize },

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Reply serialisation failed.
    #[error("failed to serialise reply: {0}")]
    SerializeReply(#[source] serde_json::Error),
}

impl DispatchError {
    /// Creates a malformed request error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJson {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed request error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: message.into(),
            source: None,
        }
    }
}

impl From<FrameError> for DispatchError {
    fn from(error: FrameError) -> Self {
        match error {
            FrameError::TooLarge { limit } => Self::RequestTooLarge { max_size: limit },
            FrameError::Io(source) => Self::Io(source),
            FrameError::Encode(source) => Self::SerializeReply(source),
        }
    }
}
