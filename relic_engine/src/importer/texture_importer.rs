//! Texture importer.
//!
//! Pack layout: `width: u32, height: u32, components: u32, data_size: u32`
//! followed by `data_size` pixel bytes.

use std::path::Path;
use std::sync::Arc;
use crate::error::{Error, Result};
use crate::guid::Guid;
use crate::resource::{ResourceData, ResourceManager, ResourceType, Texture};
use super::byte_io::{ByteReader, ByteWriter};
use super::importer::{guid_for_path, Importer};

/// Pixels as produced by an image decoder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub components: u32,
    pub pixels: Vec<u8>,
}

/// External image decoder
pub trait ImageDecoder: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}

/// Decoder backed by the `image` crate, always producing RGBA8
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => Error::Io(format!("{}: {}", path.display(), io)),
            other => Error::InvalidResource(format!("Failed to decode {}: {}", path.display(), other)),
        })?;
        let rgba = img.to_rgba8();
        Ok(DecodedImage {
            width: rgba.width(),
            height: rgba.height(),
            components: 4,
            pixels: rgba.into_raw(),
        })
    }
}

// ============================================================================
// IMPORTER
// ============================================================================

pub struct TextureImporter {
    decoder: Arc<dyn ImageDecoder>,
}

impl TextureImporter {
    pub fn new(decoder: Arc<dyn ImageDecoder>) -> Self {
        Self { decoder }
    }

    /// Texture backed by the `image` crate
    pub fn with_image_crate() -> Self {
        Self::new(Arc::new(ImageCrateDecoder))
    }

    pub fn serialize_texture(texture: &Texture) -> Result<Vec<u8>> {
        let data_size = u32::try_from(texture.data.len()).map_err(|_| {
            Error::Serialization(format!("Texture data of {} bytes is too large", texture.data.len()))
        })?;

        let mut writer = ByteWriter::with_capacity(16 + texture.data.len());
        writer.write_u32(texture.width)?;
        writer.write_u32(texture.height)?;
        writer.write_u32(texture.components)?;
        writer.write_u32(data_size)?;
        writer.write_bytes(&texture.data);
        Ok(writer.into_inner())
    }

    pub fn deserialize_texture(data: &[u8]) -> Result<Texture> {
        let mut reader = ByteReader::new(data);
        let width = reader.read_u32()?;
        let height = reader.read_u32()?;
        let components = reader.read_u32()?;
        let data_size = reader.read_u32()? as usize;
        let pixels = reader.read_bytes(data_size)?;
        reader.finish()?;

        let texture = Texture::new(width, height, components, pixels);
        texture.validate()?;
        Ok(texture)
    }
}

impl Importer for TextureImporter {
    fn resource_type(&self) -> ResourceType {
        ResourceType::Texture
    }

    fn import_resource(&self, path: &Path, resources: &mut ResourceManager) -> Result<Guid> {
        let image = self.decoder.decode(path)?;
        if image.width == 0 || image.height == 0 || image.components == 0 {
            crate::engine_bail!("relic::TextureImporter",
                "'{}' decoded to an empty image ({}x{}x{})",
                path.display(), image.width, image.height, image.components);
        }

        let texture = Texture::new(image.width, image.height, image.components, image.pixels);
        if let Err(e) = texture.validate() {
            crate::engine_error!("relic::TextureImporter", "'{}': {}", path.display(), e);
            return Err(e);
        }

        let guid = guid_for_path(path);
        crate::engine_info!("relic::TextureImporter",
            "Imported '{}' as {} ({}x{})", path.display(), guid, texture.width, texture.height);

        resources.set_resource_data(guid, ResourceType::Texture, ResourceData::Texture(texture), true)?;
        Ok(guid)
    }

    fn serialize(&self, resource: &ResourceData) -> Result<Vec<u8>> {
        match resource {
            ResourceData::Texture(texture) => Self::serialize_texture(texture),
            other => Err(Error::Serialization(format!(
                "Texture importer cannot serialize {:?} data",
                other.resource_type()
            ))),
        }
    }

    fn deserialize(&self, data: &[u8]) -> Result<ResourceData> {
        Self::deserialize_texture(data).map(ResourceData::Texture)
    }
}

#[cfg(test)]
#[path = "texture_importer_tests.rs"]
mod tests;
