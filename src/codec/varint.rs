//! Zigzag varints
//!
//! Each byte carries 7 value bits, least significant group first, with
//! the high bit (0x80) set on every byte except the last. Signed values
//! are zigzag-mapped first so that small negatives stay short:
//!
//! ```text
//!  0 -> 0,  -1 -> 1,  1 -> 2,  -2 -> 3, ...
//! ```
//!
//! Values are held in 64-bit integers. Coordinates come from `f64`, so
//! the usable integer domain of the format is +/-2^53; the encoder rejects
//! anything outside it before it gets here.

use super::cursor::Cursor;
use crate::error::{Result, TwkbError};

/// Longest varint a u64 can produce
const MAX_VARINT_LEN: usize = 10;

pub fn zigzag(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}

pub fn zagzig(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Append an unsigned varint
pub fn write_unsigned(buf: &mut Vec<u8>, mut value: u64) {
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
        if value == 0 {
            break;
        }
    }
}

/// Append a zigzag-encoded signed varint
pub fn write_signed(buf: &mut Vec<u8>, value: i64) {
    write_unsigned(buf, zigzag(value));
}

/// Encode `n` on its own. With `unsigned` the zigzag step is skipped and
/// `n` must not be negative.
pub fn encode_varint(n: i64, unsigned: bool) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4);
    if unsigned {
        debug_assert!(n >= 0, "unsigned varint of negative value");
        write_unsigned(&mut buf, n as u64);
    } else {
        write_signed(&mut buf, n);
    }
    buf
}

pub fn read_unsigned(cursor: &mut Cursor<'_>) -> Result<u64> {
    let start = cursor.position();
    let mut result = 0u64;
    let mut shift = 0u32;
    for _ in 0..MAX_VARINT_LEN {
        let byte = cursor.read_u8()?;
        // the tenth group has room for a single bit and no continuation
        if shift == 63 && byte > 1 {
            return Err(TwkbError::VarintOverflow { offset: start });
        }
        result |= ((byte & 0x7F) as u64) << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(TwkbError::VarintOverflow { offset: start })
}

pub fn read_signed(cursor: &mut Cursor<'_>) -> Result<i64> {
    Ok(zagzig(read_unsigned(cursor)?))
}

/// Decode one varint; reverses the zigzag step unless `unsigned`.
/// An unsigned value above `i64::MAX` is `VarintOverflow`.
pub fn decode_varint(cursor: &mut Cursor<'_>, unsigned: bool) -> Result<i64> {
    if unsigned {
        let start = cursor.position();
        i64::try_from(read_unsigned(cursor)?).map_err(|_| TwkbError::VarintOverflow { offset: start })
    } else {
        read_signed(cursor)
    }
}
