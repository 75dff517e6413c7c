//! Geometry decoder

use serde::Serialize;

use super::bbox::read_bbox;
use super::cursor::Cursor;
use super::delta::DeltaAccumulator;
use super::header::TwkbHeader;
use super::ids::read_ids;
use super::precision::{from_grid, Scales};
use super::varint::{read_signed, read_unsigned};
use super::{base64, MAX_NESTING_DEPTH};
use crate::error::{Result, TwkbError};
use crate::geometry::{BoundingBox, Coord, Geometry, GeometryType};

/// A decoded geometry together with its header and optional bounding box
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedTwkb {
    pub geometry: Geometry,
    pub header: TwkbHeader,
    pub bbox: Option<BoundingBox>,
}

pub fn decode_from_bytes(bytes: &[u8]) -> Result<Geometry> {
    Ok(decode_detailed(bytes)?.geometry)
}

pub fn decode_from_base64(text: &str) -> Result<Geometry> {
    let bytes = base64::decode_base64(text)?;
    decode_from_bytes(&bytes)
}

/// Decode one top-level geometry, keeping header and bounding box
pub fn decode_detailed(bytes: &[u8]) -> Result<DecodedTwkb> {
    let mut cursor = Cursor::new(bytes);
    let decoded = read_geometry(&mut cursor, 0)?;
    // an empty geometry is exactly its header, a full one may sit in a
    // larger buffer
    if !cursor.is_at_end() {
        if decoded.header.is_empty {
            return Err(TwkbError::MalformedEmptyGeometry("payload follows an empty geometry"));
        }
        tracing::debug!(trailing = cursor.remaining(), "ignoring bytes after geometry");
    }
    tracing::debug!(
        geometry_type = ?decoded.header.geometry_type,
        precision_xy = decoded.header.precision_xy,
        bytes = bytes.len(),
        "decoded TWKB geometry"
    );
    Ok(decoded)
}

/// Read one complete geometry starting at its header, with a fresh
/// accumulator. `depth` is the collection level the geometry sits at.
fn read_geometry(cursor: &mut Cursor<'_>, depth: usize) -> Result<DecodedTwkb> {
    if depth > MAX_NESTING_DEPTH {
        return Err(TwkbError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
    }
    let header = TwkbHeader::read(cursor)?;

    if header.is_empty {
        // nothing may follow the header but a zero size
        if header.has_bbox || header.has_ids {
            return Err(TwkbError::MalformedEmptyGeometry("empty flag set together with bbox or ids"));
        }
        if header.has_size && read_unsigned(cursor)? != 0 {
            return Err(TwkbError::MalformedEmptyGeometry("empty flag set with a non-zero size"));
        }
        return Ok(DecodedTwkb { geometry: empty_geometry(header.geometry_type), header, bbox: None });
    }

    // single geometries have no element count to attach ids to
    if header.has_ids
        && matches!(header.geometry_type, GeometryType::Point | GeometryType::LineString | GeometryType::Polygon)
    {
        return Err(TwkbError::IdsNotSupported(header.geometry_type));
    }

    if header.has_size {
        // advisory only, but it can't point past the buffer
        let size = read_unsigned(cursor)?;
        cursor.require(usize::try_from(size).unwrap_or(usize::MAX))?;
    }

    let dimension = header.dimension();
    let scales = Scales::new(dimension, header.precision_xy, header.precision_z(), header.precision_m());
    let bbox = if header.has_bbox { Some(read_bbox(cursor, &scales)?) } else { None };

    let mut deltas = DeltaAccumulator::new(dimension);
    let geometry = BodyReader { cursor, scales: &scales, deltas: &mut deltas, depth }.read(&header)?;

    Ok(DecodedTwkb { geometry, header, bbox })
}

fn empty_geometry(geometry_type: GeometryType) -> Geometry {
    match geometry_type {
        GeometryType::Point => Geometry::Point { coordinates: Vec::new() },
        GeometryType::LineString => Geometry::LineString { coordinates: Vec::new() },
        GeometryType::Polygon => Geometry::Polygon { rings: Vec::new() },
        GeometryType::MultiPoint => Geometry::MultiPoint { points: Vec::new(), ids: None },
        GeometryType::MultiLineString => Geometry::MultiLineString { lines: Vec::new(), ids: None },
        GeometryType::MultiPolygon => Geometry::MultiPolygon { polygons: Vec::new(), ids: None },
        GeometryType::GeometryCollection => Geometry::GeometryCollection { geometries: Vec::new(), ids: None },
    }
}

struct BodyReader<'r, 'a> {
    cursor: &'r mut Cursor<'a>,
    scales: &'r Scales,
    deltas: &'r mut DeltaAccumulator,
    depth: usize,
}

impl BodyReader<'_, '_> {
    fn read(&mut self, header: &TwkbHeader) -> Result<Geometry> {
        let geometry = match header.geometry_type {
            // a point is a bare coordinate, no count in front
            GeometryType::Point => Geometry::Point { coordinates: self.read_coord()? },
            GeometryType::LineString => {
                let coordinates = self.read_coord_array()?;
                require_parts(coordinates.len())?;
                Geometry::LineString { coordinates }
            }
            GeometryType::Polygon => {
                let rings = self.read_rings()?;
                require_parts(rings.len())?;
                Geometry::Polygon { rings }
            }
            GeometryType::MultiPoint => {
                let (count, ids) = self.read_parts_prefix(header)?;
                let mut points = Vec::with_capacity(count);
                for _ in 0..count {
                    points.push(self.read_coord()?);
                }
                Geometry::MultiPoint { points, ids }
            }
            GeometryType::MultiLineString => {
                let (count, ids) = self.read_parts_prefix(header)?;
                let mut lines = Vec::with_capacity(count);
                for _ in 0..count {
                    lines.push(self.read_coord_array()?);
                }
                Geometry::MultiLineString { lines, ids }
            }
            GeometryType::MultiPolygon => {
                let (count, ids) = self.read_parts_prefix(header)?;
                let mut polygons = Vec::with_capacity(count);
                for _ in 0..count {
                    polygons.push(self.read_rings()?);
                }
                Geometry::MultiPolygon { polygons, ids }
            }
            GeometryType::GeometryCollection => {
                let (count, ids) = self.read_parts_prefix(header)?;
                let mut geometries = Vec::with_capacity(count);
                for index in 0..count {
                    tracing::trace!(index, offset = self.cursor.position(), "decoding collection member");
                    // members carry their own header and start from zero
                    geometries.push(read_geometry(self.cursor, self.depth + 1)?.geometry);
                }
                Geometry::GeometryCollection { geometries, ids }
            }
        };
        Ok(geometry)
    }

    /// Element count followed by the optional id list
    fn read_parts_prefix(&mut self, header: &TwkbHeader) -> Result<(usize, Option<Vec<i64>>)> {
        let count = self.read_count()?;
        require_parts(count)?;
        let ids = if header.has_ids { Some(read_ids(self.cursor, count)?) } else { None };
        Ok((count, ids))
    }

    /// Every counted element takes at least one byte, so a count larger
    /// than what is left can't be satisfied
    fn read_count(&mut self) -> Result<usize> {
        let count = read_unsigned(self.cursor)?;
        let count = usize::try_from(count).unwrap_or(usize::MAX);
        self.cursor.require(count)?;
        Ok(count)
    }

    fn read_coord(&mut self) -> Result<Coord> {
        let dimension = self.scales.dimension();
        let mut coord = Vec::with_capacity(dimension);
        for axis in 0..dimension {
            let delta = read_signed(self.cursor)?;
            let value = self.deltas.apply(axis, delta)?;
            coord.push(from_grid(value, self.scales.get(axis)));
        }
        Ok(coord)
    }

    fn read_coord_array(&mut self) -> Result<Vec<Coord>> {
        let count = self.read_count()?;
        let mut coords = Vec::with_capacity(count);
        for _ in 0..count {
            coords.push(self.read_coord()?);
        }
        Ok(coords)
    }

    /// Rings come back closed: a ring whose last point differs from its
    /// first gets the first point appended
    fn read_rings(&mut self) -> Result<Vec<Vec<Coord>>> {
        let count = self.read_count()?;
        let mut rings = Vec::with_capacity(count);
        for _ in 0..count {
            let mut ring = self.read_coord_array()?;
            // compared after scaling, so a ring closed on the grid stays as is
            if let (Some(first), Some(last)) = (ring.first(), ring.last()) {
                if first != last {
                    let first = first.clone();
                    ring.push(first);
                }
            }
            rings.push(ring);
        }
        Ok(rings)
    }
}

/// A geometry not flagged empty must have at least one part
fn require_parts(count: usize) -> Result<()> {
    if count == 0 {
        return Err(TwkbError::MalformedEmptyGeometry("zero elements without the empty flag"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::header::FLAG_EMPTY;

    #[test]
    fn test_decode_point_bytes() {
        let geometry = decode_from_bytes(&[0x01, 0x00, 0x02, 0x04]).unwrap();
        assert_eq!(geometry, Geometry::Point { coordinates: vec![1.0, 2.0] });
    }

    #[test]
    fn test_decode_empty_linestring() {
        let geometry = decode_from_bytes(&[0x62, FLAG_EMPTY]).unwrap();
        assert_eq!(geometry, Geometry::LineString { coordinates: vec![] });
    }

    #[test]
    fn test_zero_count_without_empty_flag() {
        let err = decode_from_bytes(&[0x02, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, TwkbError::MalformedEmptyGeometry(_)));
    }

    #[test]
    fn test_payload_after_empty_geometry() {
        let err = decode_from_bytes(&[0x02, FLAG_EMPTY, 0x02, 0x00, 0x00]).unwrap_err();
        assert!(matches!(err, TwkbError::MalformedEmptyGeometry(_)));
    }

    #[test]
    fn test_empty_with_bbox_flag() {
        let err = decode_from_bytes(&[0x01, FLAG_EMPTY | 0x01]).unwrap_err();
        assert!(matches!(err, TwkbError::MalformedEmptyGeometry(_)));
    }

    #[test]
    fn test_ring_closed_on_decode() {
        // polygon, 1 ring, 3 points: (0,0) (2,0) (2,2)
        let bytes = [0x03, 0x00, 0x01, 0x03, 0x00, 0x00, 0x04, 0x00, 0x00, 0x04];
        let geometry = decode_from_bytes(&bytes).unwrap();
        let Geometry::Polygon { rings } = geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings[0].len(), 4);
        assert_eq!(rings[0].first(), rings[0].last());
    }

    #[test]
    fn test_huge_count_rejected() {
        // linestring claiming 2^20 points with two bytes left
        let bytes = [0x02, 0x00, 0x80, 0x80, 0x40, 0x00, 0x00];
        assert!(matches!(
            decode_from_bytes(&bytes),
            Err(TwkbError::UnexpectedEndOfBuffer { .. })
        ));
    }

    #[test]
    fn test_size_past_end() {
        // size says 9 bytes follow, only 4 do
        let bytes = [0x02, 0x02, 0x09, 0x01, 0x00, 0x00, 0x00];
        assert!(matches!(
            decode_from_bytes(&bytes),
            Err(TwkbError::UnexpectedEndOfBuffer { .. })
        ));
    }

    #[test]
    fn test_ids_flag_on_point_rejected() {
        // point header with the ids flag, then a plain coordinate
        let err = decode_from_bytes(&[0x01, 0x04, 0x02, 0x04]).unwrap_err();
        assert!(matches!(err, TwkbError::IdsNotSupported(GeometryType::Point)), "{:?}", err);

        let err = decode_from_bytes(&[0x02, 0x04, 0x02, 0x00, 0x00, 0x02, 0x02]).unwrap_err();
        assert!(matches!(err, TwkbError::IdsNotSupported(GeometryType::LineString)), "{:?}", err);
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| {
            let mut bytes = Vec::new();
            for _ in 0..levels {
                bytes.extend_from_slice(&[0x07, 0x00, 0x01]);
            }
            bytes.extend_from_slice(&[0x01, 0x00, 0x02, 0x04]);
            bytes
        };
        assert!(decode_from_bytes(&nested(MAX_NESTING_DEPTH)).is_ok());
        assert!(matches!(
            decode_from_bytes(&nested(MAX_NESTING_DEPTH + 1)),
            Err(TwkbError::NestingTooDeep { limit: MAX_NESTING_DEPTH })
        ));
    }

    #[test]
    fn test_detailed_exposes_bbox() {
        // point with bbox flag: bbox (1,0)(2,0), point (1,2)
        let bytes = [0x01, 0x01, 0x02, 0x00, 0x04, 0x00, 0x02, 0x04];
        let decoded = decode_detailed(&bytes).unwrap();
        assert!(decoded.header.has_bbox);
        let bbox = decoded.bbox.unwrap();
        assert_eq!(bbox.min, vec![1.0, 2.0]);
        assert_eq!(bbox.max, vec![1.0, 2.0]);
    }
}
