//! Geometry module
//!
//! # Submodules
//! - `types` - The `Geometry` enum, coordinates and wire type codes
//! - `bounds` - Bounding boxes

mod bounds;
mod types;

pub use bounds::BoundingBox;
pub use types::{Coord, Geometry, GeometryType};
