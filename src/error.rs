//! Error types for the TWKB codec
//!
//! Every failure is reported at the point it is detected. Nothing is
//! coerced: a missing byte is never read as zero and an out-of-range
//! precision is never clamped.

use thiserror::Error;

use crate::geometry::GeometryType;

pub type Result<T> = std::result::Result<T, TwkbError>;

#[derive(Debug, Error)]
pub enum TwkbError {
    /// Type code in the header is outside 1..=7
    #[error("invalid geometry type code {0}")]
    InvalidGeometryType(u8),

    #[error("invalid {name} precision {value} (allowed {min}..={max})")]
    InvalidPrecision {
        name: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("invalid bounding box: expected {expected} values, got {actual}")]
    InvalidBoundingBox { expected: usize, actual: usize },

    #[error("invalid id list: geometry has {expected} elements, got {actual} ids")]
    InvalidIdList { expected: usize, actual: usize },

    /// Ids were supplied for a single-part geometry
    #[error("id list is not allowed on {0:?}")]
    IdsNotSupported(GeometryType),

    #[error("invalid coordinate dimension {0}")]
    InvalidDimension(usize),

    #[error("unexpected end of buffer at offset {offset} (needed {needed} more bytes)")]
    UnexpectedEndOfBuffer { offset: usize, needed: usize },

    #[error("malformed empty geometry: {0}")]
    MalformedEmptyGeometry(&'static str),

    #[error("varint at offset {offset} does not fit in 64 bits")]
    VarintOverflow { offset: usize },

    #[error("geometry collections nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },

    /// Scaled coordinate is non-finite or beyond the exact-integer range of f64
    #[error("coordinate {0} cannot be represented at this precision")]
    CoordinateOutOfRange(f64),

    #[error("invalid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}
