/*!
# Relic Engine

Resource core of the Relic game engine.

Assets are identified by a 32-bit GUID (the MurmurHash3 of their import
path), converted to native structures by per-type importers, and stored in
RPACK files where every resource is an independently LZ4-compressed blob
indexed by a lookup table. A resource store caches decoded resources and
hides the pack behind `get` / `set` calls.

## Architecture

- **Guid**: Name → identifier hashing
- **ResourceManager**: Cache and entry point for loading and storing resources
- **CompressionManager**: RPACK reader/writer
- **Importer**: Per-type decode / serialize / deserialize contract
- **StackAllocator**, **DoubleHeadedStackAllocator**, **MemoryManager**: Scratch memory

All types are plain values owned by the caller. The only process-wide state
is the logger installed through `Engine`.
*/

// Internal modules
mod error;
mod engine;
mod guid;
pub mod log;
pub mod resource;
pub mod pack;
pub mod importer;
pub mod memory;

// Main relic namespace module
pub mod relic {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::engine::Engine;

    // Identifiers
    pub use crate::guid::{Guid, murmur3_32, GUID_SEED};

    // Resource store
    pub use crate::resource::ResourceManager;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Resource data sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Pack codec sub-module
    pub mod pack {
        pub use crate::pack::*;
    }

    // Importer sub-module
    pub mod importer {
        pub use crate::importer::*;
    }

    // Scratch memory sub-module
    pub mod memory {
        pub use crate::memory::*;
    }
}

// Re-export math library at crate root
pub use glam;
