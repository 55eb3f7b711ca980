//! Pack codec configuration

use std::path::PathBuf;

/// Pack codec configuration
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Pack selected when a resource is stored before any pack was chosen
    pub default_pack: PathBuf,
    /// LZ4 HC compression level (1..=12)
    pub compression_level: u32,
    /// Treat a decompressed-size mismatch as an error instead of a warning
    pub strict_size_check: bool,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            default_pack: PathBuf::from("default.rpack"),
            compression_level: 9,
            strict_size_check: true,
        }
    }
}
