//! Resource management module
//!
//! Typed resource payloads and the cache that loads them from packs.

mod resource_manager;
mod resource_type;
mod resource_data;
pub mod model;
pub mod texture;

pub use resource_manager::ResourceManager;
pub use resource_type::ResourceType;
pub use resource_data::ResourceData;
pub use model::{Model, Mesh, Vertex};
pub use texture::Texture;
