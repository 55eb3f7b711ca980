//! Model importer.
//!
//! Scene files are decoded by a pluggable [`SceneDecoder`]; this importer
//! turns the decoded geometry into a [`Model`] and owns its pack layout:
//!
//! ```text
//! mesh_count: u64
//! per mesh:
//!     vertex_count: u64
//!     vertices: Vertex[vertex_count]   (position, normal, uv)
//!     index_count: u64
//!     indices: u32[index_count]
//! ```

use std::path::Path;
use std::sync::Arc;
use glam::{Vec2, Vec3};
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::resource::{Mesh, Model, ResourceData, ResourceManager, ResourceType, Vertex};
use super::byte_io::{ByteReader, ByteWriter};
use super::importer::{guid_for_path, Importer};

// ============================================================================
// DECODER CONTRACT
// ============================================================================

/// Geometry of one mesh as produced by a scene decoder
///
/// `normals` and `uvs` are either empty or one per position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

/// Every mesh found in a scene file, in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedScene {
    pub meshes: Vec<DecodedMesh>,
}

/// External scene-file decoder (FBX, glTF, ...)
pub trait SceneDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedScene>;
}

impl DecodedMesh {
    /// Interleave into a native mesh, defaulting missing attributes to zero
    pub fn into_mesh(self) -> Result<Mesh> {
        let count = self.positions.len();
        if !self.normals.is_empty() && self.normals.len() != count {
            crate::engine_bail!("relic::ModelImporter",
                "{} normals for {} positions", self.normals.len(), count);
        }
        if !self.uvs.is_empty() && self.uvs.len() != count {
            crate::engine_bail!("relic::ModelImporter",
                "{} uvs for {} positions", self.uvs.len(), count);
        }

        let vertices = self.positions.iter().enumerate()
            .map(|(i, &position)| Vertex::new(
                position,
                self.normals.get(i).copied().unwrap_or(Vec3::ZERO),
                self.uvs.get(i).copied().unwrap_or(Vec2::ZERO),
            ))
            .collect();

        let mesh = Mesh::new(vertices, self.indices);
        if let Some(at) = mesh.first_invalid_index() {
            crate::engine_bail!("relic::ModelImporter",
                "Index {} at position {} exceeds {} vertices", mesh.indices[at], at, count);
        }
        Ok(mesh)
    }
}

// ============================================================================
// IMPORTER
// ============================================================================

pub struct ModelImporter {
    decoder: Arc<dyn SceneDecoder>,
}

impl ModelImporter {
    pub fn new(decoder: Arc<dyn SceneDecoder>) -> Self {
        Self { decoder }
    }

    /// Build a model from decoded geometry
    pub fn build_model(scene: DecodedScene) -> Result<Model> {
        let meshes = scene.meshes.into_iter()
            .map(DecodedMesh::into_mesh)
            .collect::<Result<Vec<_>>>()?;
        Ok(Model::new(meshes))
    }

    pub fn serialize_model(model: &Model) -> Result<Vec<u8>> {
        let size = 8 + model.meshes.iter()
            .map(|m| 16 + m.vertex_count() * Vertex::SIZE + m.index_count() * 4)
            .sum::<usize>();

        let mut writer = ByteWriter::with_capacity(size);
        writer.write_count(model.mesh_count())?;
        for mesh in &model.meshes {
            writer.write_count(mesh.vertex_count())?;
            writer.write_pod_slice(&mesh.vertices);
            writer.write_count(mesh.index_count())?;
            writer.write_pod_slice(&mesh.indices);
        }
        Ok(writer.into_inner())
    }

    pub fn deserialize_model(data: &[u8]) -> Result<Model> {
        let mut reader = ByteReader::new(data);
        let mesh_count = reader.read_count()?;

        // Each mesh needs at least its two counts
        if mesh_count > reader.remaining() / 16 {
            return Err(Error::Serialization(format!(
                "{} meshes cannot fit in {} bytes",
                mesh_count,
                reader.remaining()
            )));
        }

        let mut meshes = Vec::with_capacity(mesh_count);
        for index in 0..mesh_count {
            let vertex_count = reader.read_count()?;
            let vertices = reader.read_pod_vec::<Vertex>(vertex_count)?;
            let index_count = reader.read_count()?;
            let indices = reader.read_pod_vec::<u32>(index_count)?;

            let mesh = Mesh::new(vertices, indices);
            if let Some(at) = mesh.first_invalid_index() {
                return Err(Error::Serialization(format!(
                    "Mesh {} index {} is out of range",
                    index, at
                )));
            }
            meshes.push(mesh);
        }
        reader.finish()?;
        Ok(Model::new(meshes))
    }
}

impl Importer for ModelImporter {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Model
    }

    fn import_resource(&self, path: &Path, resources: &mut ResourceManager) -> Result<Guid> {
        let scene = self.decoder.decode(path)?;
        let model = Self::build_model(scene)?;
        let guid = guid_for_path(path);

        crate::engine_info!("relic::ModelImporter",
            "Imported '{}' as {} ({} meshes, {} vertices)",
            path.display(), guid, model.mesh_count(), model.total_vertex_count());

        resources.set_resource_data(guid, ResourceType::Model, ResourceData::Model(model), true)?;
        Ok(guid)
    }

    fn serialize(&self, resource: &ResourceData) -> Result<Vec<u8>> {
        match resource {
            ResourceData::Model(model) => Self::serialize_model(model),
            other => Err(Error::Serialization(format!(
                "Model importer cannot serialize {:?} data",
                other.resource_type()
            ))),
        }
    }

    fn deserialize(&self, data: &[u8]) -> Result<ResourceData> {
        Self::deserialize_model(data).map(ResourceData::Model)
    }
}

#[cfg(test)]
#[path = "model_importer_tests.rs"]
mod tests;
