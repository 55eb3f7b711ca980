//! Typed resource payloads.
//!
//! Every value the resource store caches is one of these variants, and the
//! variant always agrees with its `ResourceType`.

use super::model::{Mesh, Model};
use super::resource_type::ResourceType;
use super::texture::Texture;

/// A decoded resource held by the store
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceData {
    /// Opaque bytes, stored and returned verbatim
    Binary(Vec<u8>),
    Model(Model),
    Mesh(Mesh),
    Texture(Texture),
}

impl ResourceData {
    /// Type tag matching the variant
    pub fn resource_type(&self) -> ResourceType {
        match self {
            ResourceData::Binary(_) => ResourceType::Binary,
            ResourceData::Model(_) => ResourceType::Model,
            ResourceData::Mesh(_) => ResourceType::Mesh,
            ResourceData::Texture(_) => ResourceType::Texture,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ResourceData::Binary(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Model> {
        match self {
            ResourceData::Model(model) => Some(model),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            ResourceData::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_texture(&self) -> Option<&Texture> {
        match self {
            ResourceData::Texture(texture) => Some(texture),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for ResourceData {
    fn from(bytes: Vec<u8>) -> Self {
        ResourceData::Binary(bytes)
    }
}

impl From<Model> for ResourceData {
    fn from(model: Model) -> Self {
        ResourceData::Model(model)
    }
}

impl From<Mesh> for ResourceData {
    fn from(mesh: Mesh) -> Self {
        ResourceData::Mesh(mesh)
    }
}

impl From<Texture> for ResourceData {
    fn from(texture: Texture) -> Self {
        ResourceData::Texture(texture)
    }
}
