//! Base64 transport wrapping
//!
//! Standard alphabet (`A-Z a-z 0-9 + /`) with `=` padding. The engine is
//! a process-wide constant, so concurrent calls share nothing mutable.

use ::base64::{engine::general_purpose, Engine as _};

use crate::error::Result;

pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode a Base64 string. Surrounding whitespace, as found around blobs
/// embedded in page markup, is ignored.
pub fn decode_base64(text: &str) -> Result<Vec<u8>> {
    Ok(general_purpose::STANDARD.decode(text.trim())?)
}
