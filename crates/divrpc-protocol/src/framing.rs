//! JSON-lines framing shared by both peers.

use std::io::{self, BufRead, BufReader, Read, Write};

use serde::Serialize;
use thiserror::Error;

/// Maximum size of a single line, newline included.
pub const MAX_LINE_BYTES: usize = 64 * 1024;

/// Errors raised while reading or writing framed messages.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The peer sent a line longer than the configured limit.
    #[error("line too large: exceeds {limit} byte limit")]
    TooLarge {
        /// Limit that was exceeded.
        limit: usize,
    },
    /// Reading from or writing to the stream failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The message could not be serialised.
    #[error("failed to serialise message: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads newline-terminated lines with a size bound.
///
/// Bytes following a newline stay buffered for the next call, so several
/// requests may arrive in one segment.
pub struct LineReader<R> {
    inner: BufReader<R>,
    limit: usize,
}

impl<R: Read> LineReader<R> {
    /// Wraps `reader` using [`MAX_LINE_BYTES`] as the limit.
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, MAX_LINE_BYTES)
    }

    /// Wraps `reader` with an explicit limit.
    pub fn with_limit(reader: R, limit: usize) -> Self {
        Self {
            inner: BufReader::new(reader),
            limit,
        }
    }

    /// Reads the next line.
    ///
    /// Returns `Ok(None)` on a clean end of stream. A final line without a
    /// trailing newline is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::TooLarge`] when the line exceeds the limit and
    /// [`FrameError::Io`] when reading fails.
    pub fn next_line(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        let mut buffer = Vec::new();
        let budget = u64::try_from(self.limit)
            .unwrap_or(u64::MAX)
            .saturating_add(1);
        let read = self
            .inner
            .by_ref()
            .take(budget)
            .read_until(b'\n', &mut buffer)?;
        if read == 0 {
            return Ok(None);
        }
        if buffer.len() > self.limit {
            return Err(FrameError::TooLarge { limit: self.limit });
        }
        Ok(Some(buffer))
    }
}

/// Serialises `message` as one JSON line and flushes the writer.
///
/// # Errors
///
/// Returns an error if serialisation, writing, or flushing fails.
pub fn write_line<W, T>(writer: &mut W, message: &T) -> Result<(), FrameError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    let mut line = serde_json::to_vec(message)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}
