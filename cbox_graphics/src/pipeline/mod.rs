/// Pipeline module - fixed-function state, vertex layouts and pipeline objects

pub mod rasterizer;
pub mod depth_stencil;
pub mod blend;
pub mod vertex_layout;
pub mod pipeline;

pub use rasterizer::*;
pub use depth_stencil::*;
pub use blend::*;
pub use vertex_layout::*;
pub use pipeline::*;
