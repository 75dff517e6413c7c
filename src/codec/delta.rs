//! Running coordinate state for delta compression

use crate::error::{Result, TwkbError};

/// Last grid position written or read, one slot per dimension.
///
/// A fresh accumulator starts at the origin for every top-level geometry
/// and is passed by `&mut` through all of its nested arrays. Collection
/// members get their own.
#[derive(Debug, Clone)]
pub struct DeltaAccumulator {
    previous: Vec<i64>,
}

impl DeltaAccumulator {
    pub fn new(dimension: usize) -> Self {
        DeltaAccumulator { previous: vec![0; dimension] }
    }

    /// Delta from the previous value on `axis`, then remember `value`
    pub fn delta_to(&mut self, axis: usize, value: i64) -> i64 {
        let delta = value - self.previous[axis];
        self.previous[axis] = value;
        delta
    }

    /// Apply a decoded delta on `axis` and return the absolute value
    pub fn apply(&mut self, axis: usize, delta: i64) -> Result<i64> {
        let prev = self.previous[axis];
        let value = prev
            .checked_add(delta)
            .ok_or(TwkbError::CoordinateOutOfRange(prev as f64 + delta as f64))?;
        self.previous[axis] = value;
        Ok(value)
    }

    /// True when `grid` equals the last position, i.e. every delta would be zero
    pub fn is_repeat(&self, grid: &[i64]) -> bool {
        self.previous.as_slice() == grid
    }
}
