//! Asset importers
//!
//! Per-type decoders that bring external files into packs.

mod byte_io;
mod importer;
mod model_importer;
mod texture_importer;

pub use byte_io::{ByteReader, ByteWriter};
pub use importer::{guid_for_path, Importer, ImporterRegistry};
pub use model_importer::{DecodedMesh, DecodedScene, ModelImporter, SceneDecoder};
pub use texture_importer::{DecodedImage, ImageCrateDecoder, ImageDecoder, TextureImporter};
