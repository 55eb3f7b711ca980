//! Importer contract and the type → importer registry.
//!
//! An importer owns one `ResourceType`: it decodes external assets into the
//! native structure, stores them through the resource store, and converts the
//! native structure to and from its pack representation.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::guid::Guid;
use crate::resource::{ResourceData, ResourceManager, ResourceType};
use super::model_importer::{ModelImporter, SceneDecoder};
use super::texture_importer::{ImageDecoder, TextureImporter};

/// Per-type asset importer
pub trait Importer: Send + Sync {
    /// Type this importer serves
    fn resource_type(&self) -> ResourceType;

    /// Decode `path`, store the result through `resources` and return its GUID
    ///
    /// The GUID is derived from the path text (see [`guid_for_path`]).
    fn import_resource(&self, path: &Path, resources: &mut ResourceManager) -> Result<Guid>;

    /// Native structure → pack bytes
    fn serialize(&self, resource: &ResourceData) -> Result<Vec<u8>>;

    /// Pack bytes → native structure
    ///
    /// Must reject truncated or malformed input instead of reading past it.
    fn deserialize(&self, data: &[u8]) -> Result<ResourceData>;
}

/// GUID of an imported asset: the hash of its path as given
pub fn guid_for_path(path: &Path) -> Guid {
    Guid::from_name(&path.to_string_lossy())
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Maps each resource type to at most one importer
#[derive(Default, Clone)]
pub struct ImporterRegistry {
    importers: FxHashMap<ResourceType, Arc<dyn Importer>>,
}

impl ImporterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in importers (model, then texture)
    pub fn with_defaults(
        scene_decoder: Arc<dyn SceneDecoder>,
        image_decoder: Arc<dyn ImageDecoder>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ModelImporter::new(scene_decoder)));
        registry.register(Arc::new(TextureImporter::new(image_decoder)));
        registry
    }

    /// Register `importer` under its own resource type
    ///
    /// Returns the importer it replaced, if any.
    pub fn register(&mut self, importer: Arc<dyn Importer>) -> Option<Arc<dyn Importer>> {
        let resource_type = importer.resource_type();
        let previous = self.importers.insert(resource_type, importer);
        if previous.is_some() {
            crate::engine_warn!("relic::ImporterRegistry",
                "Replaced importer for {:?}", resource_type);
        } else {
            crate::engine_debug!("relic::ImporterRegistry",
                "Registered importer for {:?}", resource_type);
        }
        previous
    }

    pub fn importer_for(&self, resource_type: ResourceType) -> Option<Arc<dyn Importer>> {
        self.importers.get(&resource_type).cloned()
    }

    pub fn contains(&self, resource_type: ResourceType) -> bool {
        self.importers.contains_key(&resource_type)
    }

    pub fn len(&self) -> usize {
        self.importers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.importers.is_empty()
    }

    /// Registered types, sorted by tag
    pub fn types(&self) -> Vec<ResourceType> {
        let mut types: Vec<_> = self.importers.keys().copied().collect();
        types.sort();
        types
    }
}

impl fmt::Debug for ImporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImporterRegistry")
            .field("types", &self.types())
            .finish()
    }
}

#[cfg(test)]
#[path = "importer_tests.rs"]
mod tests;
