//! RPACK on-disk layout.
//!
//! ```text
//! offset 0            Metadata   { filetable_size: u64, lut_size: u64, version: u8 }
//! offset 17           FileTable  { lut_size: u64 }
//! offset 25           LutEntry[lut_size] { guid: u32, offset: u64, uncompressed_size: u64, type: i32 }
//! offset header_len   blob for LUT[0], LUT[1], ... LUT[lut_size - 2]
//! ```
//!
//! All integers are native-endian. The last lookup entry is a sentinel
//! (`guid = u32::MAX`, `offset` = total stored bytes) so the stored length of
//! entry `i` is always `LUT[i + 1].offset - LUT[i].offset`.

use std::io::{Read, Write};
use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::resource::ResourceType;

/// Codec version written into every pack; the only compatibility gate
pub const PACK_VERSION: u8 = 1;

/// `Metadata` byte size
pub const METADATA_SIZE: usize = 8 + 8 + 1;

/// File table header byte size
pub const FILE_TABLE_HEADER_SIZE: usize = 8;

/// `LutEntry` byte size
pub const LUT_ENTRY_SIZE: usize = 4 + 8 + 8 + 4;

// ============================================================================
// METADATA
// ============================================================================

/// Fixed header at offset 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Metadata {
    /// Byte size of the file table header that follows
    pub filetable_size: u64,
    /// Number of lookup entries, sentinel included
    pub lut_size: u64,
    pub version: u8,
}

impl Metadata {
    pub fn for_table(table: &FileTable) -> Self {
        Self {
            filetable_size: FILE_TABLE_HEADER_SIZE as u64,
            lut_size: table.lut_size() as u64,
            version: PACK_VERSION,
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<NativeEndian>(self.filetable_size)?;
        writer.write_u64::<NativeEndian>(self.lut_size)?;
        writer.write_u8(self.version)?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Self {
            filetable_size: reader.read_u64::<NativeEndian>()?,
            lut_size: reader.read_u64::<NativeEndian>()?,
            version: reader.read_u8()?,
        })
    }
}

// ============================================================================
// LOOKUP ENTRY
// ============================================================================

/// One lookup-table row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LutEntry {
    pub guid: Guid,
    /// Offset of the stored blob, relative to the end of the header region
    pub offset: u64,
    pub uncompressed_size: u64,
    pub resource_type: ResourceType,
}

impl LutEntry {
    /// Terminating entry carrying the total stored size
    pub fn sentinel(total_stored: u64) -> Self {
        Self {
            guid: Guid::SENTINEL,
            offset: total_stored,
            uncompressed_size: 0,
            resource_type: ResourceType::None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.guid.is_sentinel()
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<NativeEndian>(self.guid.value())?;
        writer.write_u64::<NativeEndian>(self.offset)?;
        writer.write_u64::<NativeEndian>(self.uncompressed_size)?;
        writer.write_i32::<NativeEndian>(self.resource_type.to_raw())?;
        Ok(())
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let guid = Guid(reader.read_u32::<NativeEndian>()?);
        let offset = reader.read_u64::<NativeEndian>()?;
        let uncompressed_size = reader.read_u64::<NativeEndian>()?;
        let raw_type = reader.read_i32::<NativeEndian>()?;
        let resource_type = ResourceType::from_raw(raw_type)
            .ok_or_else(|| Error::CorruptPack(format!("Unknown resource type tag {}", raw_type)))?;
        Ok(Self { guid, offset, uncompressed_size, resource_type })
    }
}

// ============================================================================
// FILE TABLE
// ============================================================================

/// In-memory lookup table, sentinel included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    entries: Vec<LutEntry>,
}

impl FileTable {
    /// Build a table from `(guid, type, uncompressed, stored)` rows in write order
    ///
    /// Offsets are the running sum of stored sizes; the sentinel is appended.
    /// The result is validated like a table read from disk.
    pub fn build<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Guid, ResourceType, usize, usize)>,
    {
        let mut entries = Vec::new();
        let mut offset = 0u64;
        for (guid, resource_type, uncompressed_size, stored_size) in rows {
            entries.push(LutEntry {
                guid,
                offset,
                uncompressed_size: uncompressed_size as u64,
                resource_type,
            });
            offset = offset.checked_add(stored_size as u64).ok_or_else(|| {
                Error::CorruptPack(format!("Stored size of {} overflows the blob region", guid))
            })?;
        }
        entries.push(LutEntry::sentinel(offset));

        let table = Self { entries };
        table.validate()?;
        Ok(table)
    }

    /// Wrap already-validated entries
    fn from_entries(entries: Vec<LutEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries, sentinel included
    pub fn lut_size(&self) -> usize {
        self.entries.len()
    }

    /// Number of stored resources
    pub fn resource_count(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn entries(&self) -> &[LutEntry] {
        &self.entries
    }

    /// Entries excluding the sentinel
    pub fn resources(&self) -> &[LutEntry] {
        &self.entries[..self.resource_count()]
    }

    pub fn sentinel(&self) -> Option<&LutEntry> {
        self.entries.last()
    }

    /// Total bytes in the blob region
    pub fn total_stored(&self) -> u64 {
        self.sentinel().map_or(0, |s| s.offset)
    }

    /// Linear search for `guid`; the sentinel never matches
    pub fn find(&self, guid: Guid) -> Option<usize> {
        self.resources().iter().position(|entry| entry.guid == guid)
    }

    /// Stored (possibly compressed) length of entry `index`
    pub fn chunk_len(&self, index: usize) -> Option<u64> {
        let next = self.entries.get(index + 1)?;
        let current = &self.entries[index];
        next.offset.checked_sub(current.offset)
    }

    /// Byte offset where the blob region starts
    pub fn header_len(&self) -> u64 {
        (METADATA_SIZE + FILE_TABLE_HEADER_SIZE + self.lut_size() * LUT_ENTRY_SIZE) as u64
    }

    /// Write metadata, table header and lookup entries
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        Metadata::for_table(self).write_to(writer)?;
        writer.write_u64::<NativeEndian>(self.lut_size() as u64)?;
        for entry in &self.entries {
            entry.write_to(writer)?;
        }
        Ok(())
    }

    /// Read and validate metadata, table header and lookup entries
    ///
    /// The reader must be positioned at offset 0.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let metadata = Metadata::read_from(reader)?;
        if metadata.version != PACK_VERSION {
            return Err(Error::VersionMismatch {
                expected: PACK_VERSION,
                found: metadata.version,
            });
        }
        if metadata.filetable_size != FILE_TABLE_HEADER_SIZE as u64 {
            return Err(Error::CorruptPack(format!(
                "File table header is {} bytes, expected {}",
                metadata.filetable_size, FILE_TABLE_HEADER_SIZE
            )));
        }

        let header_lut_size = reader.read_u64::<NativeEndian>()?;
        if header_lut_size != metadata.lut_size {
            return Err(Error::CorruptPack(format!(
                "Lookup size disagrees: metadata {}, table {}",
                metadata.lut_size, header_lut_size
            )));
        }
        if metadata.lut_size == 0 {
            return Err(Error::CorruptPack("Lookup table has no sentinel".to_string()));
        }

        // Reads are incremental so a bogus count fails on EOF instead of allocating
        let mut entries = Vec::new();
        for _ in 0..metadata.lut_size {
            entries.push(LutEntry::read_from(reader)?);
        }

        let table = Self::from_entries(entries);
        table.validate()?;
        Ok(table)
    }

    /// Absolute file offset of entry `index`'s blob
    pub fn blob_start(&self, index: usize) -> Option<u64> {
        let entry = self.entries.get(index)?;
        self.header_len().checked_add(entry.offset)
    }

    /// Check the sentinel, offset monotonicity and that the blob region is addressable
    pub fn validate(&self) -> Result<()> {
        match self.sentinel() {
            Some(last) if last.is_sentinel() => {}
            _ => return Err(Error::CorruptPack("Lookup table does not end in a sentinel".to_string())),
        }
        if let Some(pos) = self.resources().iter().position(LutEntry::is_sentinel) {
            return Err(Error::CorruptPack(format!("Sentinel found at entry {}", pos)));
        }
        for (i, pair) in self.entries.windows(2).enumerate() {
            if pair[1].offset < pair[0].offset {
                return Err(Error::CorruptPack(format!(
                    "Offsets decrease between entries {} and {}",
                    i,
                    i + 1
                )));
            }
        }
        if self.header_len().checked_add(self.total_stored()).is_none() {
            return Err(Error::CorruptPack(format!(
                "Blob region of {} bytes overflows the file offset range",
                self.total_stored()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
