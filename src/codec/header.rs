//! TWKB header bytes
//!
//! Layout:
//! ```text
//! byte 0: [precision_xy (zigzag, 4 bits)][type code (4 bits)]
//! byte 1: flags, low to high: bbox, size, ids, extended dims, empty
//! byte 2: only with the extended dims flag:
//!         bit0 has_z, bit1 has_m, bits2-4 precision_z, bits5-7 precision_m
//! ```

use serde::Serialize;

use super::cursor::Cursor;
use super::precision;
use super::varint::{zagzig, zigzag};
use crate::error::Result;
use crate::geometry::GeometryType;

pub const FLAG_BBOX: u8 = 0x01;
pub const FLAG_SIZE: u8 = 0x02;
pub const FLAG_IDS: u8 = 0x04;
pub const FLAG_EXTENDED_DIMS: u8 = 0x08;
pub const FLAG_EMPTY: u8 = 0x10;

/// Z/M presence and precision, from the optional third header byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtendedDimensions {
    pub has_z: bool,
    pub has_m: bool,
    pub precision_z: i32,
    pub precision_m: i32,
}

impl ExtendedDimensions {
    fn to_byte(self) -> u8 {
        let mut byte = 0u8;
        if self.has_z {
            byte |= 0x01;
        }
        if self.has_m {
            byte |= 0x02;
        }
        byte |= ((self.precision_z as u8) & 0x07) << 2;
        byte |= ((self.precision_m as u8) & 0x07) << 5;
        byte
    }

    fn from_byte(byte: u8) -> Self {
        ExtendedDimensions {
            has_z: byte & 0x01 != 0,
            has_m: byte & 0x02 != 0,
            precision_z: ((byte >> 2) & 0x07) as i32,
            precision_m: ((byte >> 5) & 0x07) as i32,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwkbHeader {
    pub geometry_type: GeometryType,
    pub precision_xy: i32,
    pub has_bbox: bool,
    pub has_size: bool,
    pub has_ids: bool,
    pub is_empty: bool,
    pub extended: Option<ExtendedDimensions>,
}

impl TwkbHeader {
    /// Coordinate dimension implied by the Z/M flags
    pub fn dimension(&self) -> usize {
        match self.extended {
            Some(ext) => 2 + ext.has_z as usize + ext.has_m as usize,
            None => 2,
        }
    }

    pub fn precision_z(&self) -> Option<i32> {
        self.extended.filter(|e| e.has_z).map(|e| e.precision_z)
    }

    pub fn precision_m(&self) -> Option<i32> {
        self.extended.filter(|e| e.has_m).map(|e| e.precision_m)
    }

    fn flags(&self) -> u8 {
        let mut flags = 0u8;
        if self.has_bbox {
            flags |= FLAG_BBOX;
        }
        if self.has_size {
            flags |= FLAG_SIZE;
        }
        if self.has_ids {
            flags |= FLAG_IDS;
        }
        if self.extended.is_some() {
            flags |= FLAG_EXTENDED_DIMS;
        }
        if self.is_empty {
            flags |= FLAG_EMPTY;
        }
        flags
    }

    pub fn write(&self, buf: &mut Vec<u8>) {
        let precision_nibble = (zigzag(self.precision_xy as i64) as u8) & 0x0F;
        buf.push((precision_nibble << 4) | self.geometry_type.code());
        buf.push(self.flags());
        if let Some(ext) = self.extended {
            buf.push(ext.to_byte());
        }
    }

    pub fn read(cursor: &mut Cursor<'_>) -> Result<Self> {
        let type_byte = cursor.read_u8()?;
        let geometry_type = GeometryType::try_from(type_byte & 0x0F)?;
        let precision_xy = zagzig((type_byte >> 4) as u64) as i32;
        precision::validate_xy(precision_xy)?;

        let flags = cursor.read_u8()?;
        if flags & 0xE0 != 0 {
            tracing::trace!(flags, "ignoring reserved metadata bits");
        }
        let extended = if flags & FLAG_EXTENDED_DIMS != 0 {
            Some(ExtendedDimensions::from_byte(cursor.read_u8()?))
        } else {
            None
        };

        Ok(TwkbHeader {
            geometry_type,
            precision_xy,
            has_bbox: flags & FLAG_BBOX != 0,
            has_size: flags & FLAG_SIZE != 0,
            has_ids: flags & FLAG_IDS != 0,
            is_empty: flags & FLAG_EMPTY != 0,
            extended,
        })
    }
}
