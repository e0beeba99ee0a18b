pub mod base64url;

pub use base64url::{decode, decode_bytes, encode, encode_bytes};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current Unix timestamp in seconds
///
/// A clock set before the Unix epoch reads as `0`.
pub fn now_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
