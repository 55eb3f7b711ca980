//! Native-endian byte helpers shared by importers.
//!
//! Counts are stored as `u64` so payloads written on one pointer width read
//! back on another. Every read is bounds-checked against the remaining input.

use std::io::Cursor;
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use bytemuck::Pod;
use crate::error::{Error, Result};

// ============================================================================
// WRITER
// ============================================================================

/// Growable output buffer
#[derive(Debug, Default)]
pub struct ByteWriter {
    buffer: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: Vec::with_capacity(capacity) }
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.buffer.write_u32::<NativeEndian>(value)?;
        Ok(())
    }

    /// Element count, widened to `u64`
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        self.buffer.write_u64::<NativeEndian>(count as u64)?;
        Ok(())
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Raw bytes of a plain-data slice, without a count prefix
    pub fn write_pod_slice<T: Pod>(&mut self, values: &[T]) {
        self.buffer.extend_from_slice(bytemuck::cast_slice(values));
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }
}

// ============================================================================
// READER
// ============================================================================

/// Bounds-checked cursor over a serialized payload
pub struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { cursor: Cursor::new(data) }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if needed > self.remaining() {
            return Err(Error::Serialization(format!(
                "Truncated payload: need {} bytes at offset {}, {} remain",
                needed,
                self.position(),
                self.remaining()
            )));
        }
        Ok(())
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.ensure(4)?;
        Ok(self.cursor.read_u32::<NativeEndian>()?)
    }

    /// Element count written by [`ByteWriter::write_count`]
    pub fn read_count(&mut self) -> Result<usize> {
        self.ensure(8)?;
        let count = self.cursor.read_u64::<NativeEndian>()?;
        usize::try_from(count)
            .map_err(|_| Error::Serialization(format!("Count {} does not fit in memory", count)))
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        self.ensure(len)?;
        let start = self.position();
        let bytes = self.cursor.get_ref()[start..start + len].to_vec();
        self.cursor.set_position((start + len) as u64);
        Ok(bytes)
    }

    /// `count` plain-data values; alignment of the input does not matter
    pub fn read_pod_vec<T: Pod>(&mut self, count: usize) -> Result<Vec<T>> {
        let len = count.checked_mul(std::mem::size_of::<T>()).ok_or_else(|| {
            Error::Serialization(format!("Element count {} overflows", count))
        })?;
        let bytes = self.read_bytes(len)?;
        Ok(bytemuck::pod_collect_to_vec(&bytes))
    }

    /// Fail if any input is left unread
    pub fn finish(self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            extra => Err(Error::Serialization(format!(
                "{} trailing bytes after offset {}",
                extra,
                self.position()
            ))),
        }
    }
}

#[cfg(test)]
#[path = "byte_io_tests.rs"]
mod tests;
