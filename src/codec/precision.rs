//! Coordinate precision scaling
//!
//! A precision `p` keeps `p` decimal digits: coordinates are multiplied by
//! `10^p` and rounded to integers before delta encoding. Negative XY
//! precisions round to tens, hundreds, ...

use crate::error::{Result, TwkbError};

pub const MIN_PRECISION_XY: i32 = -7;
pub const MAX_PRECISION_XY: i32 = 7;
pub const MAX_PRECISION_ZM: i32 = 7;

/// Largest integer magnitude an f64 holds exactly
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

pub fn scale_factor(precision: i32) -> f64 {
    10f64.powi(precision)
}

pub fn validate_xy(precision: i32) -> Result<()> {
    check_range("XY", precision, MIN_PRECISION_XY, MAX_PRECISION_XY)
}

pub fn validate_z(precision: i32) -> Result<()> {
    check_range("Z", precision, 0, MAX_PRECISION_ZM)
}

pub fn validate_m(precision: i32) -> Result<()> {
    check_range("M", precision, 0, MAX_PRECISION_ZM)
}

fn check_range(name: &'static str, value: i32, min: i32, max: i32) -> Result<()> {
    if value < min || value > max {
        return Err(TwkbError::InvalidPrecision { name, value, min, max });
    }
    Ok(())
}

/// Round a coordinate onto the integer grid for `scale`
pub fn to_grid(value: f64, scale: f64) -> Result<i64> {
    let scaled = (value * scale).round();
    if !scaled.is_finite() || scaled.abs() > MAX_EXACT_INTEGER {
        return Err(TwkbError::CoordinateOutOfRange(value));
    }
    Ok(scaled as i64)
}

pub fn from_grid(value: i64, scale: f64) -> f64 {
    value as f64 / scale
}

/// Per-dimension scales for one geometry: X and Y share the XY scale,
/// then Z and M follow when present.
#[derive(Debug, Clone, PartialEq)]
pub struct Scales {
    factors: Vec<f64>,
}

impl Scales {
    pub fn new(dimension: usize, precision_xy: i32, z: Option<i32>, m: Option<i32>) -> Self {
        let xy = scale_factor(precision_xy);
        let mut factors = vec![xy, xy];
        if let Some(pz) = z {
            factors.push(scale_factor(pz));
        }
        if let Some(pm) = m {
            factors.push(scale_factor(pm));
        }
        factors.truncate(dimension.max(2));
        Scales { factors }
    }

    pub fn get(&self, axis: usize) -> f64 {
        self.factors[axis]
    }

    pub fn dimension(&self) -> usize {
        self.factors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_factor() {
        assert_eq!(scale_factor(0), 1.0);
        assert_eq!(scale_factor(5), 100000.0);
        assert!((scale_factor(-2) - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_precision_ranges() {
        assert!(validate_xy(-7).is_ok());
        assert!(validate_xy(7).is_ok());
        assert!(matches!(validate_xy(8), Err(TwkbError::InvalidPrecision { name: "XY", value: 8, .. })));
        assert!(validate_xy(-8).is_err());
        assert!(validate_z(0).is_ok());
        assert!(validate_z(-1).is_err());
        assert!(validate_m(7).is_ok());
        assert!(validate_m(8).is_err());
    }

    #[test]
    fn test_grid_rounding() {
        let scale = scale_factor(5);
        assert_eq!(to_grid(-3.70379, scale).unwrap(), -370379);
        assert_eq!(to_grid(40.41678, scale).unwrap(), 4041678);
        assert!((from_grid(4041678, scale) - 40.41678).abs() < 1e-12);

        // precision -2 rounds to hundreds
        let coarse = scale_factor(-2);
        assert_eq!(to_grid(1249.0, coarse).unwrap(), 12);
        assert!((from_grid(12, coarse) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert!(matches!(to_grid(f64::NAN, 1.0), Err(TwkbError::CoordinateOutOfRange(_))));
        assert!(to_grid(f64::INFINITY, 1.0).is_err());
        assert!(to_grid(1e12, scale_factor(7)).is_err());
    }

    #[test]
    fn test_scales_layout() {
        let xyzm = Scales::new(4, 2, Some(1), Some(3));
        assert_eq!(xyzm.dimension(), 4);
        assert_eq!(xyzm.get(0), 100.0);
        assert_eq!(xyzm.get(2), 10.0);
        assert_eq!(xyzm.get(3), 1000.0);

        let xym = Scales::new(3, 0, None, Some(2));
        assert_eq!(xym.get(2), 100.0);
    }
}
