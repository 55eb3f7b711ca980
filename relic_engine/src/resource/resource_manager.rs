//! Central resource store.
//!
//! Resolves GUIDs to typed resource data: serves cached values, loads and
//! deserializes from the active pack on a miss, and stages new data for
//! writing. The store is an explicit value owned by the caller; wrap it in
//! `Arc<Mutex<_>>` to share it.

use std::path::Path;
use std::sync::Arc;
use bytemuck::Pod;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::importer::{Importer, ImporterRegistry};
use crate::pack::{CompressionManager, PackConfig};
use super::resource_data::ResourceData;
use super::resource_type::ResourceType;

pub struct ResourceManager {
    compression: CompressionManager,
    importers: ImporterRegistry,
    /// Decoded resources, shared with callers
    resources: FxHashMap<Guid, Arc<ResourceData>>,
}

impl ResourceManager {
    /// Create a store with the default pack configuration and no importers
    pub fn new() -> Self {
        Self::with_config(PackConfig::default())
    }

    pub fn with_config(config: PackConfig) -> Self {
        Self {
            compression: CompressionManager::new(config),
            importers: ImporterRegistry::new(),
            resources: FxHashMap::default(),
        }
    }

    /// Create a store with the default configuration and `importers`
    pub fn with_importers(importers: ImporterRegistry) -> Self {
        let mut manager = Self::new();
        manager.importers = importers;
        manager
    }

    // ===== IMPORTERS =====

    pub fn importers(&self) -> &ImporterRegistry {
        &self.importers
    }

    pub fn importers_mut(&mut self) -> &mut ImporterRegistry {
        &mut self.importers
    }

    /// Register an importer, replacing any previous one for its type
    pub fn register_importer(&mut self, importer: Arc<dyn Importer>) -> Option<Arc<dyn Importer>> {
        self.importers.register(importer)
    }

    // ===== PACK =====

    /// Select the active pack (flushes pending writes to the previous one)
    pub fn set_pack<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.compression.set_target(path)
    }

    pub fn has_pack(&self) -> bool {
        self.compression.has_target()
    }

    pub fn pack_path(&self) -> Option<&Path> {
        self.compression.target()
    }

    /// Flush staged resources to the active pack
    pub fn write_pack(&mut self) -> Result<()> {
        self.compression.write_pack()
    }

    pub fn compression(&self) -> &CompressionManager {
        &self.compression
    }

    // ===== STORE =====

    /// Stage `data` under `guid` and cache it
    ///
    /// Selects the configured default pack when none is active. `Binary` data
    /// is stored verbatim whatever `resource_type` says, so already-serialized
    /// payloads can be filed under their real type. Typed data is serialized
    /// by the importer registered for `resource_type`. With `write` the pack is
    /// flushed immediately and the resource is only cached once the flush succeeds.
    ///
    /// # Errors
    ///
    /// `MissingImporter` for typed data without an importer, `InvalidResource`
    /// when the data variant disagrees with `resource_type`, plus any pack error.
    pub fn set_resource_data(
        &mut self,
        guid: Guid,
        resource_type: ResourceType,
        data: ResourceData,
        write: bool,
    ) -> Result<()> {
        if !self.compression.has_target() {
            let default_pack = self.compression.config().default_pack.clone();
            crate::engine_info!("relic::ResourceManager",
                "No pack selected, using '{}'", default_pack.display());
            self.compression.set_target(default_pack)?;
        }

        let bytes = self.serialize_for_pack(resource_type, &data)?;
        self.compression.add_resource(bytes, guid, resource_type)?;
        if write {
            self.compression.write_pack()?;
        }

        self.resources.insert(guid, Arc::new(data));
        Ok(())
    }

    fn serialize_for_pack(&self, resource_type: ResourceType, data: &ResourceData) -> Result<Vec<u8>> {
        if let ResourceData::Binary(bytes) = data {
            return Ok(bytes.clone());
        }
        if data.resource_type() != resource_type {
            crate::engine_bail!("relic::ResourceManager",
                "{:?} data cannot be stored as {:?}", data.resource_type(), resource_type);
        }
        match self.importers.importer_for(resource_type) {
            Some(importer) => importer.serialize(data),
            None => {
                crate::engine_error!("relic::ResourceManager",
                    "No importer registered for {:?}, cannot serialize", resource_type);
                Err(Error::MissingImporter(resource_type))
            }
        }
    }

    // ===== LOAD =====

    /// Resolve `guid` to its resource data
    ///
    /// Returns the cached value unless `force_reload` is set. Otherwise the
    /// payload is loaded from the active pack and deserialized by the importer
    /// for its recorded type; without an importer the raw bytes are returned
    /// as `Binary` and a warning is logged. The result replaces the cache entry.
    pub fn get_resource_data(&mut self, guid: Guid, force_reload: bool) -> Result<Arc<ResourceData>> {
        if !force_reload {
            if let Some(cached) = self.resources.get(&guid) {
                return Ok(Arc::clone(cached));
            }
        }

        let (bytes, resource_type) = self.compression.load_resource_binary(guid)?;
        crate::engine_debug!("relic::ResourceManager",
            "Loaded {} ({:?}, {} bytes)", guid, resource_type, bytes.len());

        let data = match self.importers.importer_for(resource_type) {
            Some(importer) => importer.deserialize(&bytes).map_err(|e| {
                crate::engine_error!("relic::ResourceManager",
                    "Failed to deserialize {} as {:?}: {}", guid, resource_type, e);
                e
            })?,
            None => {
                crate::engine_warn!("relic::ResourceManager",
                    "No importer for {:?}, returning {} as raw bytes", resource_type, guid);
                ResourceData::Binary(bytes)
            }
        };

        let data = Arc::new(data);
        self.resources.insert(guid, Arc::clone(&data));
        Ok(data)
    }

    /// Load a fixed-size plain-data record, bypassing importers and the cache
    pub fn get_simple_resource_data<T: Pod>(&mut self, guid: Guid) -> Result<T> {
        self.compression.load_resource::<T>(guid)
    }

    // ===== CACHE =====

    pub fn is_resource_loaded(&self, guid: Guid) -> bool {
        self.resources.contains_key(&guid)
    }

    pub fn loaded_count(&self) -> usize {
        self.resources.len()
    }

    /// Drop the cached value for `guid`; returns it if present
    ///
    /// Callers holding the `Arc` keep their copy.
    pub fn evict(&mut self, guid: Guid) -> Option<Arc<ResourceData>> {
        self.resources.remove(&guid)
    }

    pub fn clear_cache(&mut self) {
        self.resources.clear();
    }

    // ===== IMPORT =====

    /// Import an external asset through the importer for `resource_type`
    pub fn import_resource<P: AsRef<Path>>(&mut self, path: P, resource_type: ResourceType) -> Result<Guid> {
        let path = path.as_ref();
        let importer = match self.importers.importer_for(resource_type) {
            Some(importer) => importer,
            None => {
                crate::engine_warn!("relic::ResourceManager",
                    "Cannot import '{}': no importer for {:?}", path.display(), resource_type);
                return Err(Error::MissingImporter(resource_type));
            }
        };
        importer.import_resource(path, self)
    }
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "resource_manager_tests.rs"]
mod tests;
