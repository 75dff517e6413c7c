//! Axis-aligned bounding boxes

use serde::Serialize;

use super::types::Geometry;
use crate::error::{Result, TwkbError};

/// Min/max extent with one entry per coordinate dimension
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl BoundingBox {
    pub fn dimension(&self) -> usize {
        self.min.len()
    }

    /// Extent of every coordinate in the geometry, `None` when it has none
    pub fn from_geometry(geometry: &Geometry) -> Result<Option<Self>> {
        let mut bbox: Option<BoundingBox> = None;
        geometry.for_each_coord(&mut |c| {
            match bbox.as_mut() {
                None => {
                    bbox = Some(BoundingBox { min: c.clone(), max: c.clone() });
                }
                Some(b) => {
                    if c.len() != b.dimension() {
                        return Err(TwkbError::InvalidDimension(c.len()));
                    }
                    for (i, &v) in c.iter().enumerate() {
                        b.min[i] = b.min[i].min(v);
                        b.max[i] = b.max[i].max(v);
                    }
                }
            }
            Ok(())
        })?;
        Ok(bbox)
    }

    /// Build from the flat `[min.., max..]` form.
    /// The slice must hold exactly `2 * dimension` values.
    pub fn from_flat(values: &[f64], dimension: usize) -> Result<Self> {
        if values.len() != 2 * dimension {
            return Err(TwkbError::InvalidBoundingBox {
                expected: 2 * dimension,
                actual: values.len(),
            });
        }
        let (min, max) = values.split_at(dimension);
        Ok(BoundingBox { min: min.to_vec(), max: max.to_vec() })
    }
}
