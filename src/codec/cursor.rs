//! Bounds-checked read cursor

use crate::error::{Result, TwkbError};

/// Forward-only reader over a byte slice.
/// Every read past the end fails with `UnexpectedEndOfBuffer`.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Cursor { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self.buf.get(self.pos).ok_or(TwkbError::UnexpectedEndOfBuffer {
            offset: self.pos,
            needed: 1,
        })?;
        self.pos += 1;
        Ok(byte)
    }

    /// Fail unless at least `n` more bytes are available
    pub fn require(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(TwkbError::UnexpectedEndOfBuffer {
                offset: self.pos,
                needed: n - self.remaining(),
            });
        }
        Ok(())
    }
}
