//! Resource identifiers.
//!
//! A `Guid` is the 32-bit MurmurHash3 of the path a resource was imported
//! from. It is the only key the pack and the resource store understand, so
//! callers must hash the exact same string on write and on read.
//!
//! Collisions are not detected: two names with the same hash alias each
//! other inside a pack.

use std::fmt;
use bytemuck::{Pod, Zeroable};

/// Seed used for every resource name
pub const GUID_SEED: u32 = 0;

/// 32-bit resource identifier
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Pod, Zeroable)]
pub struct Guid(pub u32);

impl Guid {
    /// Returned by importers that could not produce a resource
    pub const INVALID: Guid = Guid(0);

    /// Lookup-table terminator; never a valid resource key
    pub const SENTINEL: Guid = Guid(u32::MAX);

    /// Hash a resource name into its GUID
    pub fn from_name(name: &str) -> Self {
        Guid(murmur3_32(name.as_bytes(), GUID_SEED))
    }

    /// Raw 32-bit value
    pub fn value(self) -> u32 {
        self.0
    }

    pub fn is_sentinel(self) -> bool {
        self == Self::SENTINEL
    }
}

impl From<u32> for Guid {
    fn from(value: u32) -> Self {
        Guid(value)
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[inline]
fn scramble(mut k: u32) -> u32 {
    k = k.wrapping_mul(0xcc9e_2d51);
    k = k.rotate_left(15);
    k.wrapping_mul(0x1b87_3593)
}

/// MurmurHash3 x86 32-bit
///
/// Blocks are read little-endian so the result does not depend on the host.
pub fn murmur3_32(key: &[u8], seed: u32) -> u32 {
    let mut h = seed;

    let mut blocks = key.chunks_exact(4);
    for block in &mut blocks {
        let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h ^= scramble(k);
        h = h.rotate_left(13);
        h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
    }

    let mut k = 0u32;
    for &byte in blocks.remainder().iter().rev() {
        k <<= 8;
        k |= byte as u32;
    }
    h ^= scramble(k);

    // fmix32
    h ^= key.len() as u32;
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^= h >> 16;
    h
}

#[cfg(test)]
#[path = "guid_tests.rs"]
mod tests;
