//! Error types for the Relic engine
//!
//! This module defines the error types used throughout the resource core,
//! including pack I/O, (de)serialization, and scratch allocation.

use std::fmt;
use crate::guid::Guid;
use crate::resource::ResourceType;

/// Result type for Relic engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Relic engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Underlying file operation failed (open, seek, short read/write)
    Io(String),

    /// A pack operation was requested before any pack was selected
    NoTarget,

    /// Pack was written by an incompatible codec version
    VersionMismatch { expected: u8, found: u8 },

    /// Pack header or lookup table is malformed
    CorruptPack(String),

    /// GUID is absent from the active pack
    ResourceNotFound(Guid),

    /// Decoded payload does not have the recorded size
    SizeMismatch { expected: usize, actual: usize },

    /// Block compressor failure
    Compression(String),

    /// No importer registered for a typed payload
    MissingImporter(ResourceType),

    /// Serialized payload could not be encoded or decoded
    Serialization(String),

    /// Scratch allocator cannot service the request
    OutOfMemory { requested: usize, available: usize },

    /// Allocator marker would corrupt the arena
    InvalidMarker(String),

    /// Invalid resource (bad input, unexpected variant, etc.)
    InvalidResource(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
            Error::NoTarget => write!(f, "No pack selected"),
            Error::VersionMismatch { expected, found } => write!(
                f,
                "Pack version mismatch: expected {}, found {}",
                expected, found
            ),
            Error::CorruptPack(msg) => write!(f, "Corrupt pack: {}", msg),
            Error::ResourceNotFound(guid) => write!(f, "Resource {} not found", guid),
            Error::SizeMismatch { expected, actual } => write!(
                f,
                "Size mismatch: expected {} bytes, got {}",
                expected, actual
            ),
            Error::Compression(msg) => write!(f, "Compression error: {}", msg),
            Error::MissingImporter(ty) => write!(f, "No importer registered for {:?}", ty),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::OutOfMemory { requested, available } => write!(
                f,
                "Out of scratch memory: requested {} bytes, {} available",
                requested, available
            ),
            Error::InvalidMarker(msg) => write!(f, "Invalid marker: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

// ===== ERROR MACROS =====

/// Log an error and build an `Error::InvalidResource` from the same message
///
/// # Example
///
/// ```no_run
/// # use relic_engine::engine_err;
/// let err = engine_err!("relic::Model", "Mesh {} has no vertices", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::relic::Error::InvalidResource(message)
    }};
}

/// Log an error and return it as `Err(Error::InvalidResource)`
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
