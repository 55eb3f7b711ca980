//! Unit tests for texture_importer.rs

use super::*;
use crate::pack::PackConfig;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

struct FixedImageDecoder {
    image: DecodedImage,
}

impl ImageDecoder for FixedImageDecoder {
    fn decode(&self, _path: &Path) -> Result<DecodedImage> {
        Ok(self.image.clone())
    }
}

fn checker_image(width: u32, height: u32) -> DecodedImage {
    let pixels = (0..width * height)
        .flat_map(|i| if i % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] })
        .collect();
    DecodedImage { width, height, components: 4, pixels }
}

fn importer_for(image: DecodedImage) -> Arc<TextureImporter> {
    Arc::new(TextureImporter::new(Arc::new(FixedImageDecoder { image })))
}

fn store_in(dir: &TempDir) -> ResourceManager {
    let config = PackConfig {
        default_pack: dir.path().join("textures.rpack"),
        ..PackConfig::default()
    };
    ResourceManager::with_config(config)
}

// ============================================================================
// SERIALIZATION
// ============================================================================

#[test]
fn test_serialized_header_fields() {
    let texture = Texture::new(2, 1, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    let bytes = TextureImporter::serialize_texture(&texture).unwrap();
    assert_eq!(bytes.len(), 16 + 8);

    let header: Vec<u32> = bytemuck::pod_collect_to_vec(&bytes[..16]);
    assert_eq!(header, vec![2, 1, 4, 8]);
    assert_eq!(&bytes[16..], &texture.data[..]);
}

#[test]
fn test_serialize_then_deserialize_is_equal() {
    let importer = TextureImporter::with_image_crate();
    let image = checker_image(4, 4);
    let texture = Texture::new(image.width, image.height, image.components, image.pixels);
    let bytes = importer.serialize(&ResourceData::Texture(texture.clone())).unwrap();
    assert_eq!(importer.deserialize(&bytes).unwrap(), ResourceData::Texture(texture));
}

#[test]
fn test_truncated_pixels_are_rejected() {
    let texture = Texture::new(2, 2, 4, vec![7; 16]);
    let bytes = TextureImporter::serialize_texture(&texture).unwrap();
    assert!(matches!(
        TextureImporter::deserialize_texture(&bytes[..bytes.len() - 1]),
        Err(Error::Serialization(_))
    ));
}

#[test]
fn test_inconsistent_header_is_rejected() {
    // Header claims 2x2x4 but only 4 pixel bytes follow
    let texture = Texture::new(2, 2, 4, vec![0; 4]);
    let bytes = TextureImporter::serialize_texture(&texture).unwrap();
    assert_eq!(
        TextureImporter::deserialize_texture(&bytes).unwrap_err(),
        Error::SizeMismatch { expected: 16, actual: 4 }
    );
}

#[test]
fn test_overflowing_dimensions_are_rejected() {
    let mut bytes = Vec::new();
    for field in [u32::MAX, u32::MAX, u32::MAX, 0] {
        bytes.extend_from_slice(&field.to_ne_bytes());
    }
    assert!(matches!(
        TextureImporter::deserialize_texture(&bytes),
        Err(Error::InvalidResource(_))
    ));
}

#[test]
fn test_serialize_wrong_variant_fails() {
    let importer = TextureImporter::with_image_crate();
    assert!(importer.serialize(&ResourceData::Binary(vec![])).is_err());
}

// ============================================================================
// IMPORT
// ============================================================================

#[test]
fn test_import_stores_texture() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    let importer = importer_for(checker_image(3, 2));
    store.register_importer(importer.clone());

    let path = dir.path().join("bricks.png");
    let guid = importer.import_resource(&path, &mut store).unwrap();
    assert_eq!(guid, guid_for_path(&path));

    store.clear_cache();
    let loaded = store.get_resource_data(guid, false).unwrap();
    let texture = loaded.as_texture().unwrap();
    assert_eq!((texture.width, texture.height, texture.components), (3, 2, 4));
    assert_eq!(texture.data_size(), 24);
}

#[test]
fn test_empty_image_is_not_stored() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    let importer = importer_for(DecodedImage { width: 0, height: 5, components: 4, pixels: vec![] });

    let err = importer.import_resource(Path::new("empty.png"), &mut store).unwrap_err();
    assert!(matches!(err, Error::InvalidResource(_)));
    assert_eq!(store.loaded_count(), 0);
}

#[test]
fn test_short_pixel_buffer_is_not_stored() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    let mut image = checker_image(2, 2);
    image.pixels.truncate(10);
    let importer = importer_for(image);

    let err = importer.import_resource(Path::new("short.png"), &mut store).unwrap_err();
    assert_eq!(err, Error::SizeMismatch { expected: 16, actual: 10 });
    assert_eq!(store.loaded_count(), 0);
}

#[test]
fn test_image_crate_decoder_reads_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tiny.png");
    let mut img = image::RgbaImage::new(2, 3);
    img.put_pixel(1, 2, image::Rgba([10, 20, 30, 40]));
    img.save(&path).unwrap();

    let decoded = ImageCrateDecoder.decode(&path).unwrap();
    assert_eq!((decoded.width, decoded.height, decoded.components), (2, 3, 4));
    assert_eq!(decoded.pixels.len(), 24);
    assert_eq!(&decoded.pixels[20..24], &[10, 20, 30, 40]);
}

#[test]
fn test_image_crate_decoder_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = ImageCrateDecoder.decode(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
