/// Shader module - compilation, transpilation, reflection and linked programs

pub mod stage;
pub mod compiler;
pub mod parser;
pub mod transpiler;
pub mod reflection;
pub mod module;
mod spirv;
#[cfg(test)]
pub(crate) mod test_shaders;

pub use stage::*;
pub use compiler::{compile, compile_file, CompileOptions};
pub use parser::*;
pub use transpiler::{transpile, GLSL_VERSION};
pub use reflection::*;
pub use module::*;
