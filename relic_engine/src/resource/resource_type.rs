//! Resource type tags.
//!
//! The tag is stored next to every lookup-table entry as an `i32`, so the
//! discriminants below are part of the pack format and must never be
//! reordered.

/// Closed set of resource kinds known to the engine
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceType {
    /// Untyped placeholder (no importer, no payload semantics)
    None = 0,
    /// Opaque byte blob stored verbatim
    Binary = 1,
    /// Reserved marker for structures without a valid type
    Invalid = 2,
    /// Multi-mesh model
    Model = 3,
    /// Single mesh
    Mesh = 4,
    /// Decoded image
    Texture = 5,
}

impl ResourceType {
    /// Every tag, in discriminant order
    pub const ALL: [ResourceType; 6] = [
        ResourceType::None,
        ResourceType::Binary,
        ResourceType::Invalid,
        ResourceType::Model,
        ResourceType::Mesh,
        ResourceType::Texture,
    ];

    /// On-disk representation
    pub fn to_raw(self) -> i32 {
        self as i32
    }

    /// Parse an on-disk tag; unknown values yield `None`
    pub fn from_raw(raw: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|ty| ty.to_raw() == raw)
    }
}
