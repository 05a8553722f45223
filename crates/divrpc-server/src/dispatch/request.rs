//! Request line decoding.

use divrpc_protocol::Request;

use super::errors::DispatchError;

/// Decodes one request line.
///
/// Trailing whitespace, including the newline delimiter, is trimmed before
/// parsing. Returns `Ok(None)` for a blank line.
///
/// # Errors
///
/// Returns [`DispatchError::MalformedJson`] if the line is not valid UTF-8
/// JSON matching the request envelope.
pub(crate) fn parse_request(line: &[u8]) -> Result<Option<Request>, DispatchError> {
    let trimmed = trim_trailing_whitespace(line);
    if trimmed.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(trimmed)
        .map(Some)
        .map_err(DispatchError::from_json_error)
}

fn trim_trailing_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(0, |pos| pos + 1);
    &bytes[..end]
}
