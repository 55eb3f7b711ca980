//! Native model data.
//!
//! These are the CPU-side shapes importers build from decoded scenes and the
//! renderer consumes. Buffers are owned `Vec`s; nothing here touches the GPU.
//!
//! # Hierarchy
//!
//! ```text
//! Model
//! └── meshes
//!     ├── Mesh 0 → vertices[], indices[]
//!     └── Mesh 1 → ...
//! ```

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

// ============================================================================
// VERTEX
// ============================================================================

/// Interleaved vertex as stored in packs and uploaded to vertex buffers
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    /// Size of one vertex in bytes
    pub const SIZE: usize = std::mem::size_of::<Vertex>();

    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self { position, normal, uv }
    }
}

// ============================================================================
// MESH
// ============================================================================

/// Indexed triangle mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Index of the first out-of-range index, if any
    pub fn first_invalid_index(&self) -> Option<usize> {
        let count = self.vertices.len() as u64;
        self.indices.iter().position(|&i| u64::from(i) >= count)
    }
}

// ============================================================================
// MODEL
// ============================================================================

/// Collection of meshes imported from one scene file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub meshes: Vec<Mesh>,
}

impl Model {
    pub fn new(meshes: Vec<Mesh>) -> Self {
        Self { meshes }
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Sum of vertices over every mesh
    pub fn total_vertex_count(&self) -> usize {
        self.meshes.iter().map(Mesh::vertex_count).sum()
    }

    /// Sum of indices over every mesh
    pub fn total_index_count(&self) -> usize {
        self.meshes.iter().map(Mesh::index_count).sum()
    }
}
