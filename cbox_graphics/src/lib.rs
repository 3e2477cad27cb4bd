/*!
# cbox graphics

Core types for the cbox graphics hardware abstraction layer.

The crate has two halves:

- a **shader pipeline** that compiles GLSL 450 to SPIR-V, transpiles SPIR-V to
  GLSL 420, reflects vertex inputs, uniforms and samplers, and links programs;
- a **command and pipeline-state model**: buffers, textures, samplers,
  framebuffers, fixed-function state, pipelines, render passes and an
  immediate-mode command buffer.

Every GPU side effect goes through the [`GraphicsDevice`](gfx::device::GraphicsDevice)
trait. Backends (see `cbox_graphics_gl`) implement it; resources are concrete
structs that hold the device and their native handle.
*/

// Internal modules
mod error;
mod graphics;
pub mod log;
pub mod device;
pub mod resource;
pub mod framebuffer;
pub mod pipeline;
pub mod shader;
pub mod command;
pub mod scene;
pub mod context;

// Main gfx namespace module
pub mod gfx {
    // Error types
    pub use crate::error::{Error, ErrorKind, Result};

    // Logging facade
    pub use crate::graphics::Graphics;

    // Render context
    pub use crate::context::{ContextConfig, RenderContext, RenderContextBuilder};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Backend device trait and frame-state types
    pub mod device {
        pub use crate::device::*;
    }

    // GPU resources
    pub mod resource {
        pub use crate::resource::*;
    }

    // Render targets
    pub mod framebuffer {
        pub use crate::framebuffer::*;
    }

    // Fixed-function state and pipelines
    pub mod pipeline {
        pub use crate::pipeline::*;
    }

    // Shader compilation, transpilation, reflection and programs
    pub mod shader {
        pub use crate::shader::*;
    }

    // Render passes and command recording
    pub mod command {
        pub use crate::command::*;
    }

    // Materials, cameras and transforms
    pub mod scene {
        pub use crate::scene::*;
    }
}

// Re-export math library at crate root
pub use glam;
