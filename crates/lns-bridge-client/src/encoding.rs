//! Payload and URL encoding.
//!
//! - Downlink payloads travel as standard base64 (with padding).
//! - Device EUIs are percent-encoded as path segments and query values as
//!   query components. Hex EUIs and plain names pass through unchanged.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters escaped inside a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'\\');

/// Characters escaped inside a query value.
const QUERY_VALUE: &AsciiSet = &PATH_SEGMENT.add(b'&').add(b'=').add(b'+');

/// Encode a downlink payload as standard base64.
///
/// # Examples
///
/// ```
/// use lns_bridge_client::encode_payload;
///
/// assert_eq!(encode_payload(b"abc"), "YWJj");
/// assert_eq!(encode_payload(b"ab"), "YWI=");
/// ```
#[must_use]
pub fn encode_payload(payload: &[u8]) -> String {
    STANDARD.encode(payload)
}

/// Decode a base64 payload, e.g. the data frame of an uplink.
///
/// # Errors
///
/// Returns error if the input is not valid base64.
pub fn decode_payload(encoded: &str) -> Result<Vec<u8>, EncodingError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| EncodingError::Base64Decode(e.to_string()))
}

/// Percent-encode a value used as one URL path segment.
#[must_use]
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Percent-encode a value used on the right-hand side of a query pair.
#[must_use]
pub fn encode_query_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Errors that can occur during decoding.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EncodingError {
    /// Base64 decoding failed
    #[error("base64 decode error: {0}")]
    Base64Decode(String),
}
