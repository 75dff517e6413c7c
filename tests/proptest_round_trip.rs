//! Property-based round-trip tests for the codec.

use proptest::prelude::*;

use twkb::codec::cursor::Cursor;
use twkb::codec::varint::{decode_varint, encode_varint, zagzig, zigzag};
use twkb::{decode_base64, decode_from_bytes, encode, encode_base64, Coord, EncodingParameters, Geometry};

/// Largest magnitude an f64 holds exactly
const MAX_EXACT: i64 = 1 << 53;

/// Coordinates of a fixed dimension
fn arb_coord(dimension: usize) -> impl Strategy<Value = Coord> {
    prop::collection::vec(-180.0f64..180.0, dimension)
}

fn arb_line(dimension: usize) -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec(arb_coord(dimension), 2..12)
}

/// Closed ring: at least three points plus the first repeated at the end
fn arb_ring(dimension: usize) -> impl Strategy<Value = Vec<Coord>> {
    prop::collection::vec(arb_coord(dimension), 3..10).prop_map(|mut ring| {
        let first = ring[0].clone();
        ring.push(first);
        ring
    })
}

fn arb_polygon(dimension: usize) -> impl Strategy<Value = Vec<Vec<Coord>>> {
    prop::collection::vec(arb_ring(dimension), 1..4)
}

fn arb_ids(count: usize) -> impl Strategy<Value = Option<Vec<i64>>> {
    prop::option::of(prop::collection::vec(-1_000_000i64..1_000_000, count))
}

/// Any non-collection geometry of the given dimension
fn arb_simple(dimension: usize) -> impl Strategy<Value = Geometry> {
    prop_oneof![
        arb_coord(dimension).prop_map(|coordinates| Geometry::Point { coordinates }),
        arb_line(dimension).prop_map(|coordinates| Geometry::LineString { coordinates }),
        arb_polygon(dimension).prop_map(|rings| Geometry::Polygon { rings }),
        prop::collection::vec(arb_coord(dimension), 1..10)
            .prop_flat_map(|points| {
                let n = points.len();
                (Just(points), arb_ids(n))
            })
            .prop_map(|(points, ids)| Geometry::MultiPoint { points, ids }),
        prop::collection::vec(arb_line(dimension), 1..5)
            .prop_flat_map(|lines| {
                let n = lines.len();
                (Just(lines), arb_ids(n))
            })
            .prop_map(|(lines, ids)| Geometry::MultiLineString { lines, ids }),
        prop::collection::vec(arb_polygon(dimension), 1..4)
            .prop_flat_map(|polygons| {
                let n = polygons.len();
                (Just(polygons), arb_ids(n))
            })
            .prop_map(|(polygons, ids)| Geometry::MultiPolygon { polygons, ids }),
    ]
}

fn arb_geometry() -> impl Strategy<Value = Geometry> {
    (2usize..=4).prop_flat_map(|dimension| {
        prop_oneof![
            3 => arb_simple(dimension),
            1 => prop::collection::vec(arb_simple(dimension), 1..4)
                .prop_flat_map(|geometries| {
                    let n = geometries.len();
                    (Just(geometries), arb_ids(n))
                })
                .prop_map(|(geometries, ids)| Geometry::GeometryCollection { geometries, ids }),
        ]
    })
}

fn arb_params() -> impl Strategy<Value = EncodingParameters> {
    (-7i32..=7, 0i32..=7, 0i32..=7, any::<bool>(), any::<bool>()).prop_map(
        |(precision_xy, precision_z, precision_m, include_bbox, include_size)| EncodingParameters {
            precision_xy,
            precision_z,
            precision_m,
            include_bbox,
            include_size,
            // keep every point so shapes can be compared one to one
            drop_repeated_points: false,
            ..Default::default()
        },
    )
}

/// Per-axis tolerance: 10^-precision
fn tolerances(params: &EncodingParameters) -> [f64; 4] {
    let xy = 10f64.powi(-params.precision_xy);
    [xy, xy, 10f64.powi(-params.precision_z), 10f64.powi(-params.precision_m)]
}

fn coords_close(a: &[Coord], b: &[Coord], tol: &[f64; 4]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(ca, cb)| {
            ca.len() == cb.len() && ca.iter().zip(cb).enumerate().all(|(i, (x, y))| (x - y).abs() <= tol[i])
        })
}

fn rings_close(a: &[Vec<Coord>], b: &[Vec<Coord>], tol: &[f64; 4]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(ra, rb)| coords_close(ra, rb, tol))
}

fn geometry_close(a: &Geometry, b: &Geometry, tol: &[f64; 4]) -> bool {
    match (a, b) {
        (Geometry::Point { coordinates: ca }, Geometry::Point { coordinates: cb }) => {
            coords_close(std::slice::from_ref(ca), std::slice::from_ref(cb), tol)
        }
        (Geometry::LineString { coordinates: ca }, Geometry::LineString { coordinates: cb }) => {
            coords_close(ca, cb, tol)
        }
        (Geometry::Polygon { rings: ra }, Geometry::Polygon { rings: rb }) => rings_close(ra, rb, tol),
        (Geometry::MultiPoint { points: pa, ids: ia }, Geometry::MultiPoint { points: pb, ids: ib }) => {
            ia == ib && coords_close(pa, pb, tol)
        }
        (Geometry::MultiLineString { lines: la, ids: ia }, Geometry::MultiLineString { lines: lb, ids: ib }) => {
            ia == ib && rings_close(la, lb, tol)
        }
        (Geometry::MultiPolygon { polygons: pa, ids: ia }, Geometry::MultiPolygon { polygons: pb, ids: ib }) => {
            ia == ib && pa.len() == pb.len() && pa.iter().zip(pb).all(|(a, b)| rings_close(a, b, tol))
        }
        (
            Geometry::GeometryCollection { geometries: ga, ids: ia },
            Geometry::GeometryCollection { geometries: gb, ids: ib },
        ) => ia == ib && ga.len() == gb.len() && ga.iter().zip(gb).all(|(a, b)| geometry_close(a, b, tol)),
        _ => false,
    }
}

proptest! {
    #[test]
    fn geometry_round_trip(geometry in arb_geometry(), params in arb_params()) {
        let encoded = encode(&geometry, &params).expect("encoding valid geometry must succeed");
        let decoded = decode_from_bytes(encoded.bytes()).expect("decoding own output must succeed");
        let tol = tolerances(&params);
        prop_assert!(geometry_close(&geometry, &decoded, &tol), "{:?}\n!=\n{:?}", geometry, decoded);
    }

    #[test]
    fn signed_varint_round_trip(n in -MAX_EXACT..=MAX_EXACT) {
        let bytes = encode_varint(n, false);
        let mut cursor = Cursor::new(&bytes);
        prop_assert_eq!(decode_varint(&mut cursor, false).unwrap(), n);
        prop_assert!(cursor.is_at_end());
    }

    #[test]
    fn unsigned_varint_round_trip(n in 0..=MAX_EXACT) {
        let bytes = encode_varint(n, true);
        let mut cursor = Cursor::new(&bytes);
        prop_assert_eq!(decode_varint(&mut cursor, true).unwrap(), n);
    }

    #[test]
    fn zigzag_round_trip(n in any::<i64>()) {
        prop_assert_eq!(zagzig(zigzag(n)), n);
    }

    #[test]
    fn base64_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..300)) {
        let text = encode_base64(&bytes);
        prop_assert_eq!(decode_base64(&text).unwrap(), bytes);
    }

    #[test]
    fn truncated_buffers_error(geometry in arb_geometry(), params in arb_params()) {
        let bytes = encode(&geometry, &params).unwrap().into_bytes();
        for len in 0..bytes.len() {
            prop_assert!(decode_from_bytes(&bytes[..len]).is_err(), "prefix of {} bytes decoded", len);
        }
    }
}
