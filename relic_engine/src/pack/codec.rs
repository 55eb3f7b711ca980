//! Per-resource block compression.
//!
//! Every resource is compressed on its own with LZ4 HC so any single blob can
//! be decompressed without touching its neighbours. When compression does not
//! shrink a payload the raw bytes are stored instead; a stored length equal to
//! the uncompressed length therefore always means "stored raw".

use lz4::block::{self, CompressionMode};
use crate::error::{Error, Result};

/// Compress `raw` for storage, falling back to the raw bytes
pub fn compress_block(raw: &[u8], level: u32) -> Result<Vec<u8>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if raw.len() > i32::MAX as usize {
        return Err(Error::Compression(format!(
            "Payload of {} bytes exceeds the block size limit",
            raw.len()
        )));
    }

    let compressed = block::compress(raw, Some(CompressionMode::HIGHCOMPRESSION(level as i32)), false)
        .map_err(|e| Error::Compression(e.to_string()))?;

    if compressed.len() < raw.len() {
        Ok(compressed)
    } else {
        crate::engine_trace!("relic::codec",
            "Block of {} bytes did not shrink, storing raw", raw.len());
        Ok(raw.to_vec())
    }
}

/// Recover the original bytes of a stored blob
///
/// With `strict` a decoded length different from `expected` is an error;
/// otherwise it is logged and the buffer is returned as decoded.
pub fn decompress_block(stored: &[u8], expected: usize, strict: bool) -> Result<Vec<u8>> {
    if stored.len() == expected {
        return Ok(stored.to_vec());
    }
    if expected > i32::MAX as usize {
        return Err(Error::Compression(format!(
            "Expected size {} exceeds the block size limit",
            expected
        )));
    }

    let decoded = block::decompress(stored, Some(expected as i32))
        .map_err(|e| Error::Compression(e.to_string()))?;

    if decoded.len() != expected {
        if strict {
            crate::engine_error!("relic::codec",
                "Decompressed {} bytes, expected {}", decoded.len(), expected);
            return Err(Error::SizeMismatch { expected, actual: decoded.len() });
        }
        crate::engine_warn!("relic::codec",
            "Decompressed {} bytes, expected {}; returning as-is", decoded.len(), expected);
    }
    Ok(decoded)
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
