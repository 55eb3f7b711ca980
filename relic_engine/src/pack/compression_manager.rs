//! Pack codec: owns the active RPACK file.
//!
//! Resources are staged with `add_resource` and persisted together by
//! `write_pack`, which rewrites the whole pack from the staged set. Reads go
//! through the lookup table, which is loaded once per pack and cached.
//!
//! Only one pack is active at a time. Switching packs flushes pending writes
//! to the previous one first.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use bytemuck::Pod;
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::resource::ResourceType;
use super::codec::{compress_block, decompress_block};
use super::config::PackConfig;
use super::format::FileTable;

/// A resource staged for the next flush
#[derive(Debug, Clone)]
struct PendingResource {
    guid: Guid,
    resource_type: ResourceType,
    data: Vec<u8>,
}

/// RPACK reader/writer
pub struct CompressionManager {
    config: PackConfig,
    target: Option<PathBuf>,
    needs_write: bool,
    file_table: Option<FileTable>,
    pending: Vec<PendingResource>,
}

impl CompressionManager {
    /// Create a codec with no active pack
    pub fn new(config: PackConfig) -> Self {
        Self {
            config,
            target: None,
            needs_write: false,
            file_table: None,
            pending: Vec::new(),
        }
    }

    /// Log an error before returning it
    fn log_and_return_error(error: Error) -> Error {
        match &error {
            Error::VersionMismatch { expected, found } => {
                crate::engine_error!("relic::CompressionManager",
                    "Pack version {} is not supported (codec version {})", found, expected);
            }
            Error::Io(msg) => {
                crate::engine_error!("relic::CompressionManager", "I/O failure: {}", msg);
            }
            _ => {
                crate::engine_error!("relic::CompressionManager", "{}", error);
            }
        }
        error
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    // ===== TARGET =====

    /// Select the pack subsequent operations apply to
    ///
    /// A dirty previous pack is flushed before the switch; if that flush fails
    /// the previous pack stays active. Staged resources and the cached table
    /// are dropped. Selecting the active pack again does nothing.
    pub fn set_target<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if self.target.as_deref() == Some(path) {
            return Ok(());
        }

        if self.needs_write {
            self.write_pack()?;
        }

        self.target = Some(path.to_path_buf());
        self.pending.clear();
        self.file_table = None;
        self.needs_write = false;

        crate::engine_info!("relic::CompressionManager", "Selected pack '{}'", path.display());
        Ok(())
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&Path> {
        self.target.as_deref()
    }

    /// True when staged resources have not been written yet
    pub fn needs_write(&self) -> bool {
        self.needs_write
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// GUIDs staged for the active pack, in write order
    pub fn pending_guids(&self) -> Vec<Guid> {
        self.pending.iter().map(|r| r.guid).collect()
    }

    // ===== WRITE PATH =====

    /// Stage a resource for the active pack
    ///
    /// A staged resource with the same GUID is replaced in place, keeping its
    /// position in the write order.
    ///
    /// # Errors
    ///
    /// `NoTarget` when no pack is selected; `InvalidResource` for the sentinel GUID.
    pub fn add_resource(&mut self, data: Vec<u8>, guid: Guid, resource_type: ResourceType) -> Result<()> {
        if self.target.is_none() {
            return Err(Self::log_and_return_error(Error::NoTarget));
        }
        if guid.is_sentinel() {
            crate::engine_bail!("relic::CompressionManager",
                "GUID {} is reserved for the lookup-table sentinel", guid);
        }

        let resource = PendingResource { guid, resource_type, data };
        match self.pending.iter_mut().find(|r| r.guid == guid) {
            Some(existing) => {
                crate::engine_debug!("relic::CompressionManager",
                    "Replacing staged resource {}", guid);
                *existing = resource;
            }
            None => self.pending.push(resource),
        }

        self.needs_write = true;
        Ok(())
    }

    /// Compress and write every staged resource to the active pack
    ///
    /// No-op unless there are unwritten changes. The freshly built lookup table
    /// becomes the cached table; compressed buffers are released afterwards.
    pub fn write_pack(&mut self) -> Result<()> {
        if !self.needs_write {
            return Ok(());
        }
        let path = self.target.clone()
            .ok_or_else(|| Self::log_and_return_error(Error::NoTarget))?;

        let level = self.config.compression_level;
        let stored = self.pending.iter()
            .map(|r| compress_block(&r.data, level))
            .collect::<Result<Vec<_>>>()
            .map_err(Self::log_and_return_error)?;

        let table = FileTable::build(
            self.pending.iter()
                .zip(&stored)
                .map(|(r, blob)| (r.guid, r.resource_type, r.data.len(), blob.len())),
        ).map_err(Self::log_and_return_error)?;

        Self::write_file(&path, &table, &stored)
            .map_err(|e| Self::log_and_return_error(match e {
                Error::Io(msg) => Error::Io(format!("writing '{}': {}", path.display(), msg)),
                other => other,
            }))?;

        crate::engine_info!("relic::CompressionManager",
            "Wrote {} resources ({} stored bytes) to '{}'",
            table.resource_count(), table.total_stored(), path.display());

        self.file_table = Some(table);
        self.needs_write = false;
        Ok(())
    }

    fn write_file(path: &Path, table: &FileTable, blobs: &[Vec<u8>]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        table.write_to(&mut writer)?;
        for blob in blobs {
            writer.write_all(blob)?;
        }
        writer.flush()?;
        Ok(())
    }

    // ===== READ PATH =====

    /// Read and cache the lookup table of the active pack
    ///
    /// On any failure (version mismatch included) the cached table is left unset.
    pub fn read_file_table(&mut self) -> Result<()> {
        self.file_table = None;
        let path = self.target.clone()
            .ok_or_else(|| Self::log_and_return_error(Error::NoTarget))?;

        let table = Self::read_table_from(&path)
            .map_err(|e| Self::log_and_return_error(match e {
                Error::Io(msg) => Error::Io(format!("reading '{}': {}", path.display(), msg)),
                other => other,
            }))?;

        crate::engine_debug!("relic::CompressionManager",
            "Loaded lookup table of '{}' ({} resources)", path.display(), table.resource_count());
        self.file_table = Some(table);
        Ok(())
    }

    fn read_table_from(path: &Path) -> Result<FileTable> {
        let mut file = File::open(path)?;
        file.seek(SeekFrom::Start(0))?;
        FileTable::read_from(&mut BufReader::new(file))
    }

    /// Lookup table of the active pack, read on first use
    pub fn file_table(&mut self) -> Result<&FileTable> {
        if self.file_table.is_none() {
            self.read_file_table()?;
        }
        self.file_table.as_ref()
            .ok_or_else(|| Error::CorruptPack("Lookup table unavailable".to_string()))
    }

    /// Load and decompress one resource by GUID
    ///
    /// Serves what is on disk; staged resources become visible after `write_pack`.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` (logged as a warning) when the GUID is absent, plus
    /// any table, I/O or decompression failure.
    pub fn load_resource_binary(&mut self, guid: Guid) -> Result<(Vec<u8>, ResourceType)> {
        let strict = self.config.strict_size_check;
        let path = self.target.clone()
            .ok_or_else(|| Self::log_and_return_error(Error::NoTarget))?;

        let table = self.file_table()?;
        let index = match table.find(guid) {
            Some(index) => index,
            None => {
                crate::engine_warn!("relic::CompressionManager",
                    "Resource {} not found in '{}'", guid, path.display());
                return Err(Error::ResourceNotFound(guid));
            }
        };
        let entry = table.entries()[index];
        let chunk_len = table.chunk_len(index)
            .ok_or_else(|| Self::log_and_return_error(
                Error::CorruptPack(format!("Entry {} has no successor", index))
            ))?;
        let start = table.blob_start(index)
            .ok_or_else(|| Self::log_and_return_error(
                Error::CorruptPack(format!("Offset of entry {} overflows", index))
            ))?;

        crate::engine_trace!("relic::CompressionManager",
            "Reading {} ({} bytes at offset {})", guid, chunk_len, start);

        let stored = Self::read_chunk(&path, start, chunk_len)
            .map_err(Self::log_and_return_error)?;

        let data = decompress_block(&stored, entry.uncompressed_size as usize, strict)?;
        Ok((data, entry.resource_type))
    }

    fn read_chunk(path: &Path, start: u64, len: u64) -> Result<Vec<u8>> {
        let mut file = File::open(path)?;
        let file_len = file.metadata()?.len();
        if start.checked_add(len).map_or(true, |end| end > file_len) {
            return Err(Error::CorruptPack(format!(
                "Blob [{}, +{}) lies outside the {}-byte pack",
                start, len, file_len
            )));
        }

        file.seek(SeekFrom::Start(start))?;
        let mut stored = vec![0u8; len as usize];
        file.read_exact(&mut stored)?;
        Ok(stored)
    }

    /// Load a fixed-size plain-data record without any importer
    ///
    /// # Errors
    ///
    /// `SizeMismatch` when the stored payload is not exactly `size_of::<T>()` bytes.
    pub fn load_resource<T: Pod>(&mut self, guid: Guid) -> Result<T> {
        let (bytes, _) = self.load_resource_binary(guid)?;
        if bytes.len() != std::mem::size_of::<T>() {
            return Err(Self::log_and_return_error(Error::SizeMismatch {
                expected: std::mem::size_of::<T>(),
                actual: bytes.len(),
            }));
        }
        Ok(bytemuck::pod_read_unaligned(&bytes))
    }
}

impl Drop for CompressionManager {
    fn drop(&mut self) {
        if self.needs_write {
            // Errors are already logged by write_pack
            let _ = self.write_pack();
        }
    }
}

#[cfg(test)]
#[path = "compression_manager_tests.rs"]
mod tests;
