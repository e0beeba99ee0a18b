//! Base64 helpers
//!
//! Token segments use Base64URL without padding (RFC 4648 §5, RFC 7515 §2).
//! Public key files use the standard alphabet with padding.
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

/// Encode bytes to Base64URL string
pub fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Encode string to Base64URL
pub fn encode(input: &str) -> String {
    encode_bytes(input.as_bytes())
}

/// Decode Base64URL string to bytes
pub fn decode_bytes(input: &str) -> Result<Vec<u8>> {
    URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::InvalidBase64(e.to_string()))
}

/// Decode Base64URL string to UTF-8 string
pub fn decode(input: &str) -> Result<String> {
    let bytes = decode_bytes(input)?;
    String::from_utf8(bytes).map_err(|e| Error::InvalidBase64(format!("Invalid UTF-8: {e}")))
}

/// Encode bytes with the standard Base64 alphabet (with padding)
pub fn encode_standard(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Decode standard Base64 text, ignoring surrounding whitespace
pub fn decode_standard(input: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(input.trim())
        .map_err(|e| Error::InvalidBase64(e.to_string()))
}
