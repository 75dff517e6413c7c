//! TWKB (Tiny Well-Known Binary) geometry codec
//!
//! Encodes points, lines, polygons, their multi-part variants and
//! geometry collections into a compact byte stream using per-geometry
//! coordinate precision, zigzag varints and delta compression, and
//! decodes such streams back into [`Geometry`] values. Buffers can be
//! wrapped in Base64 for text transport.
//!
//! # Example
//! ```ignore
//! let point = Geometry::Point { coordinates: vec![-3.70379, 40.41678] };
//! let encoded = encode_geometry(&point, 5, &EncodingParameters::default())?;
//! let decoded = decode_from_base64(&encoded.base64())?;
//! ```

pub mod codec;
pub mod error;
pub mod geometry;

pub use codec::base64::{decode_base64, encode_base64};
pub use codec::batch::{decode_batch, decode_batch_base64, encode_batch};
pub use codec::{
    decode_detailed, decode_from_base64, decode_from_bytes, encode, encode_geometry, DecodedTwkb, EncodedTwkb,
    EncodingParameters, MAX_NESTING_DEPTH,
};
pub use error::{Result, TwkbError};
pub use geometry::{BoundingBox, Coord, Geometry, GeometryType};
