/// Scene module - materials, cameras and transforms

pub mod material;
pub mod camera;
pub mod transform;

pub use material::*;
pub use camera::*;
pub use transform::*;
