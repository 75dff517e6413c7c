//! Core geometry types
//!
//! The seven TWKB geometry kinds as a closed enum. The serde form is
//! GeoJSON-shaped (`"type"` tag plus `"coordinates"` or `"geometries"`)
//! with an optional `"ids"` array on the multi-part kinds.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TwkbError};

/// One position: X, Y and optionally Z, then M
pub type Coord = Vec<f64>;

/// Wire type codes, low nibble of the first header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point = 1,
    LineString = 2,
    Polygon = 3,
    MultiPoint = 4,
    MultiLineString = 5,
    MultiPolygon = 6,
    GeometryCollection = 7,
}

impl GeometryType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for GeometryType {
    type Error = TwkbError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            1 => Ok(GeometryType::Point),
            2 => Ok(GeometryType::LineString),
            3 => Ok(GeometryType::Polygon),
            4 => Ok(GeometryType::MultiPoint),
            5 => Ok(GeometryType::MultiLineString),
            6 => Ok(GeometryType::MultiPolygon),
            7 => Ok(GeometryType::GeometryCollection),
            other => Err(TwkbError::InvalidGeometryType(other)),
        }
    }
}

/// A vector geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Coord,
    },
    LineString {
        coordinates: Vec<Coord>,
    },
    Polygon {
        #[serde(rename = "coordinates")]
        rings: Vec<Vec<Coord>>,
    },
    MultiPoint {
        #[serde(rename = "coordinates")]
        points: Vec<Coord>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ids: Option<Vec<i64>>,
    },
    MultiLineString {
        #[serde(rename = "coordinates")]
        lines: Vec<Vec<Coord>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ids: Option<Vec<i64>>,
    },
    MultiPolygon {
        #[serde(rename = "coordinates")]
        polygons: Vec<Vec<Vec<Coord>>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ids: Option<Vec<i64>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ids: Option<Vec<i64>>,
    },
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryType::GeometryCollection,
        }
    }

    /// Number of parts for multi-part kinds, `None` for single geometries
    pub fn element_count(&self) -> Option<usize> {
        match self {
            Geometry::Point { .. } | Geometry::LineString { .. } | Geometry::Polygon { .. } => None,
            Geometry::MultiPoint { points, .. } => Some(points.len()),
            Geometry::MultiLineString { lines, .. } => Some(lines.len()),
            Geometry::MultiPolygon { polygons, .. } => Some(polygons.len()),
            Geometry::GeometryCollection { geometries, .. } => Some(geometries.len()),
        }
    }

    /// Ids stored on the geometry itself
    pub fn ids(&self) -> Option<&[i64]> {
        match self {
            Geometry::Point { .. } | Geometry::LineString { .. } | Geometry::Polygon { .. } => None,
            Geometry::MultiPoint { ids, .. }
            | Geometry::MultiLineString { ids, .. }
            | Geometry::MultiPolygon { ids, .. }
            | Geometry::GeometryCollection { ids, .. } => ids.as_deref(),
        }
    }

    /// Visit every coordinate, descending into collection members.
    /// An empty point contributes nothing.
    pub fn for_each_coord<F>(&self, f: &mut F) -> Result<()>
    where
        F: FnMut(&Coord) -> Result<()>,
    {
        match self {
            Geometry::Point { coordinates } => {
                if !coordinates.is_empty() {
                    f(coordinates)?;
                }
            }
            Geometry::LineString { coordinates } | Geometry::MultiPoint { points: coordinates, .. } => {
                for c in coordinates {
                    f(c)?;
                }
            }
            Geometry::Polygon { rings } | Geometry::MultiLineString { lines: rings, .. } => {
                for c in rings.iter().flatten() {
                    f(c)?;
                }
            }
            Geometry::MultiPolygon { polygons, .. } => {
                for c in polygons.iter().flatten().flatten() {
                    f(c)?;
                }
            }
            Geometry::GeometryCollection { geometries, .. } => {
                for g in geometries {
                    g.for_each_coord(f)?;
                }
            }
        }
        Ok(())
    }

    /// Total number of coordinates, collection members included
    pub fn point_count(&self) -> usize {
        match self {
            Geometry::Point { coordinates } => usize::from(!coordinates.is_empty()),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { points: coordinates, .. } => coordinates.len(),
            Geometry::Polygon { rings } | Geometry::MultiLineString { lines: rings, .. } => {
                rings.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon { polygons, .. } => polygons.iter().flatten().map(Vec::len).sum(),
            Geometry::GeometryCollection { geometries, .. } => geometries.iter().map(Geometry::point_count).sum(),
        }
    }

    /// Deepest collection level below this geometry; 0 for anything that
    /// is not a collection with members. Walks with an explicit stack so a
    /// pathological tree can be measured before anything recurses into it.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 0usize)];
        while let Some((geometry, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            if let Geometry::GeometryCollection { geometries, .. } = geometry {
                pending.extend(geometries.iter().map(|g| (g, depth + 1)));
            }
        }
        deepest
    }

    /// True when there is nothing to encode: no coordinates, or no
    /// members for a collection
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::GeometryCollection { geometries, .. } => geometries.is_empty(),
            _ => self.point_count() == 0,
        }
    }

    /// Coordinate dimension, taken from the first coordinate found.
    ///
    /// Every coordinate of a simple or multi-part geometry must share it.
    /// A zero-length coordinate is only legal as the whole of an empty
    /// `Point`; anywhere else it is `InvalidDimension(0)`. Collection
    /// members are checked independently when they are encoded, so for a
    /// collection only the first member coordinate counts.
    pub fn dimension(&self) -> Result<usize> {
        let mut dim: Option<usize> = None;
        match self {
            Geometry::GeometryCollection { geometries, .. } => {
                for g in geometries {
                    let d = g.dimension()?;
                    if d != 0 {
                        return Ok(d);
                    }
                }
                Ok(0)
            }
            _ => {
                // for_each_coord skips an empty Point, so any empty
                // coordinate seen here sits inside an array
                self.for_each_coord(&mut |c| {
                    if c.is_empty() {
                        return Err(TwkbError::InvalidDimension(0));
                    }
                    let seen = dim;
                    match seen {
                        None => dim = Some(c.len()),
                        Some(d) if d != c.len() => return Err(TwkbError::InvalidDimension(c.len())),
                        Some(_) => {}
                    }
                    Ok(())
                })?;
                let d = dim.unwrap_or(0);
                match d {
                    0 | 2 | 3 | 4 => Ok(d),
                    other => Err(TwkbError::InvalidDimension(other)),
                }
            }
        }
    }
}
