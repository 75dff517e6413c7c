//! Identifier lists for multi-part geometries and collections

use super::cursor::Cursor;
use super::varint::{read_signed, write_signed};
use crate::error::{Result, TwkbError};
use crate::geometry::Geometry;

/// Pick the ids to write for `geometry`: the explicit override first, then
/// the ids stored on the geometry. The list must match the element count
/// and is only allowed on multi-part kinds.
pub fn resolve_ids<'a>(geometry: &'a Geometry, explicit: Option<&'a [i64]>) -> Result<Option<&'a [i64]>> {
    let ids = match explicit {
        Some(ids) => Some(ids),
        None => geometry.ids(),
    };
    let Some(ids) = ids else {
        return Ok(None);
    };
    let Some(count) = geometry.element_count() else {
        return Err(TwkbError::IdsNotSupported(geometry.geometry_type()));
    };
    if ids.len() != count {
        return Err(TwkbError::InvalidIdList { expected: count, actual: ids.len() });
    }
    Ok(Some(ids))
}

pub fn write_ids(buf: &mut Vec<u8>, ids: &[i64]) {
    for &id in ids {
        write_signed(buf, id);
    }
}

pub fn read_ids(cursor: &mut Cursor<'_>, count: usize) -> Result<Vec<i64>> {
    // each id takes at least one byte
    cursor.require(count)?;
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(read_signed(cursor)?);
    }
    Ok(ids)
}
