//! TWKB codec
//!
//! # Submodules
//! - `varint` - Zigzag and variable-length integers
//! - `cursor` - Bounds-checked byte reader
//! - `precision` - Precision validation and coordinate scaling
//! - `header` - Type/precision, metadata and extended dimension bytes
//! - `bbox` - Bounding box section
//! - `ids` - Identifier lists
//! - `delta` - Coordinate delta accumulator
//! - `params` - Encoding parameters
//! - `encode` / `decode` - Geometry encoder and decoder
//! - `base64` - Base64 wrapping for text transport
//! - `batch` - Parallel batch helpers

pub mod base64;
pub mod batch;
mod bbox;
pub mod cursor;
mod decode;
mod delta;
mod encode;
pub mod header;
mod ids;
mod params;
pub mod precision;
pub mod varint;

/// Deepest collection nesting the encoder writes or the decoder follows.
/// The top-level geometry is level 0, its members level 1.
pub const MAX_NESTING_DEPTH: usize = 64;

pub use decode::{decode_detailed, decode_from_base64, decode_from_bytes, DecodedTwkb};
pub use encode::{encode, encode_geometry, EncodedTwkb, LINE_MIN_POINTS, RING_MIN_POINTS};
pub use params::EncodingParameters;
