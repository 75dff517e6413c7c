//! Bounding box section: per dimension, the scaled minimum then the
//! scaled extent (max - min), both as signed varints.

use super::cursor::Cursor;
use super::precision::{from_grid, to_grid, Scales};
use super::varint::{read_signed, write_signed};
use crate::error::{Result, TwkbError};
use crate::geometry::BoundingBox;

pub fn write_bbox(buf: &mut Vec<u8>, bbox: &BoundingBox, scales: &Scales) -> Result<()> {
    if bbox.dimension() != scales.dimension() || bbox.max.len() != bbox.min.len() {
        return Err(TwkbError::InvalidBoundingBox {
            expected: 2 * scales.dimension(),
            actual: bbox.min.len() + bbox.max.len(),
        });
    }
    for axis in 0..scales.dimension() {
        let min = to_grid(bbox.min[axis], scales.get(axis))?;
        let max = to_grid(bbox.max[axis], scales.get(axis))?;
        write_signed(buf, min);
        write_signed(buf, max - min);
    }
    Ok(())
}

pub fn read_bbox(cursor: &mut Cursor<'_>, scales: &Scales) -> Result<BoundingBox> {
    let dimension = scales.dimension();
    let mut min = Vec::with_capacity(dimension);
    let mut max = Vec::with_capacity(dimension);
    for axis in 0..dimension {
        let lo = read_signed(cursor)?;
        let delta = read_signed(cursor)?;
        let hi = lo
            .checked_add(delta)
            .ok_or(TwkbError::CoordinateOutOfRange(lo as f64 + delta as f64))?;
        min.push(from_grid(lo, scales.get(axis)));
        max.push(from_grid(hi, scales.get(axis)));
    }
    Ok(BoundingBox { min, max })
}
