//! Geometry encoder
//!
//! Output order for one geometry:
//! `[header][ext dims?][size?][bbox?][count?][ids?][coordinates]`.
//! Collection members repeat the whole sequence, each with its own
//! header and a fresh delta accumulator.

use super::bbox::write_bbox;
use super::delta::DeltaAccumulator;
use super::header::{ExtendedDimensions, TwkbHeader};
use super::ids::{resolve_ids, write_ids};
use super::params::EncodingParameters;
use super::precision::{to_grid, Scales};
use super::varint::{write_signed, write_unsigned};
use super::{base64, MAX_NESTING_DEPTH};
use crate::error::{Result, TwkbError};
use crate::geometry::{BoundingBox, Coord, Geometry};

/// Minimum points kept in a line when dropping repeated points
pub const LINE_MIN_POINTS: usize = 2;
/// Minimum points kept in a polygon ring when dropping repeated points
pub const RING_MIN_POINTS: usize = 4;

/// Output of one encode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTwkb {
    bytes: Vec<u8>,
}

impl EncodedTwkb {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn base64(&self) -> String {
        base64::encode_base64(&self.bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Encodes a geometry with the given XY precision
///
/// # Arguments
/// * `geometry` - The geometry to encode
/// * `precision_xy` - Decimal digits kept for X and Y (-7..=7); replaces
///   `params.precision_xy`
/// * `params` - Remaining encoding options
///
/// # Returns
/// * `Result<EncodedTwkb>` - The encoded buffer, or the first validation
///   error. Nothing is produced when validation fails.
pub fn encode_geometry(geometry: &Geometry, precision_xy: i32, params: &EncodingParameters) -> Result<EncodedTwkb> {
    let params = EncodingParameters { precision_xy, ..params.clone() };
    encode(geometry, &params)
}

pub fn encode(geometry: &Geometry, params: &EncodingParameters) -> Result<EncodedTwkb> {
    params.validate()?;
    // measured iteratively before the recursive passes below touch the tree
    if geometry.nesting_depth() > MAX_NESTING_DEPTH {
        return Err(TwkbError::NestingTooDeep { limit: MAX_NESTING_DEPTH });
    }
    let mut bytes = Vec::new();
    write_geometry(&mut bytes, geometry, params)?;
    tracing::debug!(
        geometry_type = ?geometry.geometry_type(),
        precision_xy = params.precision_xy,
        bytes = bytes.len(),
        "encoded TWKB geometry"
    );
    Ok(EncodedTwkb { bytes })
}

/// Write one complete TWKB geometry. Everything that can fail on the
/// input is checked before the header goes out.
fn write_geometry(buf: &mut Vec<u8>, geometry: &Geometry, params: &EncodingParameters) -> Result<()> {
    let dimension = geometry.dimension()?;
    let ids = resolve_ids(geometry, params.ids.as_deref())?;
    let explicit_bbox = match &params.bbox {
        Some(flat) => Some(BoundingBox::from_flat(flat, dimension)?),
        None => None,
    };
    let is_empty = geometry.is_empty();

    // a caller box wins over a computed one, and empties get neither
    let bbox = if is_empty {
        None
    } else if explicit_bbox.is_some() {
        explicit_bbox
    } else if params.include_bbox {
        BoundingBox::from_geometry(geometry)?
    } else {
        None
    };

    // a third component is Z; M only ever appears with Z
    let extended = match dimension {
        3 => Some(ExtendedDimensions { has_z: true, has_m: false, precision_z: params.precision_z, precision_m: 0 }),
        4 => Some(ExtendedDimensions {
            has_z: true,
            has_m: true,
            precision_z: params.precision_z,
            precision_m: params.precision_m,
        }),
        _ => None,
    };
    let scales = Scales::new(
        dimension,
        params.precision_xy,
        extended.filter(|e| e.has_z).map(|e| e.precision_z),
        extended.filter(|e| e.has_m).map(|e| e.precision_m),
    );

    let header = TwkbHeader {
        geometry_type: geometry.geometry_type(),
        precision_xy: params.precision_xy,
        has_bbox: bbox.is_some(),
        has_size: params.include_size && !is_empty,
        has_ids: ids.is_some() && !is_empty,
        is_empty,
        extended,
    };

    // body is built first so the size field can count it
    let mut body = Vec::new();
    if !is_empty {
        if let Some(bbox) = &bbox {
            write_bbox(&mut body, bbox, &scales)?;
        }
        let mut deltas = DeltaAccumulator::new(dimension);
        let mut writer = BodyWriter { buf: &mut body, scales: &scales, deltas: &mut deltas, params };
        writer.write(geometry, ids)?;
    }

    header.write(buf);
    if header.has_size {
        write_unsigned(buf, body.len() as u64);
    }
    buf.extend_from_slice(&body);
    Ok(())
}

/// Writes the payload of one top-level geometry, threading the
/// accumulator through every nested array
struct BodyWriter<'a> {
    buf: &'a mut Vec<u8>,
    scales: &'a Scales,
    deltas: &'a mut DeltaAccumulator,
    params: &'a EncodingParameters,
}

impl BodyWriter<'_> {
    fn write(&mut self, geometry: &Geometry, ids: Option<&[i64]>) -> Result<()> {
        match geometry {
            Geometry::Point { coordinates } => self.write_coord(coordinates),
            Geometry::LineString { coordinates } => self.write_coord_array(coordinates, LINE_MIN_POINTS),
            Geometry::Polygon { rings } => self.write_rings(rings),
            Geometry::MultiPoint { points, .. } => {
                self.write_parts_prefix(points.len(), ids);
                for point in points {
                    self.write_coord(point)?;
                }
                Ok(())
            }
            Geometry::MultiLineString { lines, .. } => {
                self.write_parts_prefix(lines.len(), ids);
                for line in lines {
                    self.write_coord_array(line, LINE_MIN_POINTS)?;
                }
                Ok(())
            }
            Geometry::MultiPolygon { polygons, .. } => {
                self.write_parts_prefix(polygons.len(), ids);
                for rings in polygons {
                    self.write_rings(rings)?;
                }
                Ok(())
            }
            Geometry::GeometryCollection { geometries, .. } => {
                self.write_parts_prefix(geometries.len(), ids);
                let member_params = self.params.for_member();
                for (index, member) in geometries.iter().enumerate() {
                    tracing::trace!(index, geometry_type = ?member.geometry_type(), "encoding collection member");
                    write_geometry(self.buf, member, &member_params)?;
                }
                Ok(())
            }
        }
    }

    fn write_parts_prefix(&mut self, count: usize, ids: Option<&[i64]>) {
        write_unsigned(self.buf, count as u64);
        if let Some(ids) = ids {
            write_ids(self.buf, ids);
        }
    }

    fn write_coord(&mut self, coord: &Coord) -> Result<()> {
        for axis in 0..self.scales.dimension() {
            let value = to_grid(coord[axis], self.scales.get(axis))?;
            write_signed(self.buf, self.deltas.delta_to(axis, value));
        }
        Ok(())
    }

    fn write_rings(&mut self, rings: &[Vec<Coord>]) -> Result<()> {
        write_unsigned(self.buf, rings.len() as u64);
        for ring in rings {
            self.write_coord_array(ring, RING_MIN_POINTS)?;
        }
        Ok(())
    }

    /// Point count, then the points. A count below 128 is a single byte,
    /// larger counts continue as an unsigned varint.
    ///
    /// With `drop_repeated_points`, a point on the same grid position as
    /// the previous one is skipped once `min_points` have been written.
    /// The first point is always written, so the accumulator state from a
    /// preceding part never swallows it.
    fn write_coord_array(&mut self, coords: &[Coord], min_points: usize) -> Result<()> {
        let dimension = self.scales.dimension();
        let mut points = Vec::with_capacity(coords.len() * dimension);
        let mut grid = vec![0i64; dimension];
        let mut written = 0usize;

        for coord in coords {
            // snap to the grid first; repeats are judged on integers
            for (axis, slot) in grid.iter_mut().enumerate() {
                *slot = to_grid(coord[axis], self.scales.get(axis))?;
            }
            if self.params.drop_repeated_points && written >= min_points && self.deltas.is_repeat(&grid) {
                continue;
            }
            for (axis, &value) in grid.iter().enumerate() {
                write_signed(&mut points, self.deltas.delta_to(axis, value));
            }
            written += 1;
        }

        // count is only known once trimming is done
        write_unsigned(self.buf, written as u64);
        self.buf.extend_from_slice(&points);
        Ok(())
    }
}
