//! Encoding parameters

use serde::{Deserialize, Serialize};

use super::precision;
use crate::error::Result;

/// Options for one encode call.
///
/// Deserializes from JSON with every field optional, e.g.
/// `{"precision_xy": 5, "include_bbox": true}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingParameters {
    /// Decimal digits kept for X and Y, -7..=7
    pub precision_xy: i32,
    /// Decimal digits kept for Z, 0..=7
    pub precision_z: i32,
    /// Decimal digits kept for M, 0..=7
    pub precision_m: i32,
    pub include_bbox: bool,
    pub include_size: bool,
    /// Overrides the ids stored on the geometry. Only valid for multi-part
    /// kinds, one id per element.
    pub ids: Option<Vec<i64>>,
    /// Bounding box in `[min.., max..]` form to write instead of the
    /// computed one. Implies `include_bbox`.
    pub bbox: Option<Vec<f64>>,
    /// Skip repeated points in lines and rings
    pub drop_repeated_points: bool,
}

impl Default for EncodingParameters {
    fn default() -> Self {
        Self {
            precision_xy: 0,
            precision_z: 0,
            precision_m: 0,
            include_bbox: false,
            include_size: false,
            ids: None,
            bbox: None,
            drop_repeated_points: true,
        }
    }
}

impl EncodingParameters {
    pub fn with_precision(precision_xy: i32) -> Self {
        Self { precision_xy, ..Self::default() }
    }

    pub fn validate(&self) -> Result<()> {
        precision::validate_xy(self.precision_xy)?;
        precision::validate_z(self.precision_z)?;
        precision::validate_m(self.precision_m)?;
        Ok(())
    }

    /// Settings inherited by collection members: precision and section
    /// flags carry over, ids and an explicit bbox do not.
    pub(crate) fn for_member(&self) -> Self {
        Self {
            ids: None,
            bbox: None,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TwkbError;

    #[test]
    fn test_defaults() {
        let params = EncodingParameters::default();
        assert_eq!(params.precision_xy, 0);
        assert!(params.drop_repeated_points);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_from_partial_json() {
        let params: EncodingParameters =
            serde_json::from_str(r#"{"precision_xy": -3, "include_size": true, "ids": [4, 5]}"#).unwrap();
        assert_eq!(params.precision_xy, -3);
        assert!(params.include_size);
        assert!(!params.include_bbox);
        assert_eq!(params.ids, Some(vec![4, 5]));
        assert!(params.drop_repeated_points);
    }

    #[test]
    fn test_validate_rejects_each_range() {
        let bad_xy = EncodingParameters::with_precision(9);
        assert!(matches!(bad_xy.validate(), Err(TwkbError::InvalidPrecision { name: "XY", .. })));

        let bad_z = EncodingParameters { precision_z: -1, ..Default::default() };
        assert!(matches!(bad_z.validate(), Err(TwkbError::InvalidPrecision { name: "Z", .. })));

        let bad_m = EncodingParameters { precision_m: 8, ..Default::default() };
        assert!(matches!(bad_m.validate(), Err(TwkbError::InvalidPrecision { name: "M", .. })));
    }

    #[test]
    fn test_member_settings() {
        let params = EncodingParameters {
            precision_xy: 4,
            ids: Some(vec![1]),
            bbox: Some(vec![0.0, 0.0, 1.0, 1.0]),
            ..Default::default()
        };
        let member = params.for_member();
        assert_eq!(member.precision_xy, 4);
        assert!(member.ids.is_none());
        assert!(member.bbox.is_none());
        assert!(!member.include_bbox);
    }
}
