//! Bounds-checked reads over an in-memory buffer.

use crate::error::CursorError;

/// Sequential reader over an immutable byte slice, with absolute seeks for
/// entry bodies stored out of order.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.position)
    }

    /// Move to an absolute offset. The end of the buffer is a valid target.
    pub fn seek_absolute(&mut self, position: usize) -> Result<(), CursorError> {
        if position > self.bytes.len() {
            return Err(CursorError::SeekOutOfBounds {
                position,
                len: self.bytes.len(),
            });
        }
        self.position = position;
        Ok(())
    }

    /// Read exactly `n` bytes, advancing past them. Nothing is consumed on
    /// failure.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], CursorError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CursorError::UnexpectedEnd {
                offset: self.position,
                needed: n,
                remaining,
            });
        }
        let start = self.position;
        self.position += n;
        Ok(&self.bytes[start..start + n])
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CursorError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u16_be(&mut self) -> Result<u16, CursorError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, CursorError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }
}
