//! RPACK container
//!
//! Content-addressed, per-resource compressed binary packs.

mod codec;
mod compression_manager;
mod config;
pub mod format;

pub use codec::{compress_block, decompress_block};
pub use compression_manager::CompressionManager;
pub use config::PackConfig;
pub use format::{
    FileTable, LutEntry, Metadata,
    PACK_VERSION, METADATA_SIZE, FILE_TABLE_HEADER_SIZE, LUT_ENTRY_SIZE,
};
