/// Resource module - buffers, meshes, textures and samplers

pub mod buffer;
pub mod mesh;
pub mod texture;
pub mod sampler;

pub use buffer::*;
pub use mesh::*;
pub use texture::*;
pub use sampler::*;
