/// CommandBuffer - immediate-mode command recording
///
/// Every command is forwarded to the device as it is issued, in order, whether
/// or not `begin` was called; `begin`/`end` only bracket a frame and reset the
/// bound pipeline. Commands that have nothing to act on (no pipeline, no shader)
/// are skipped and [`ValidationMode`] decides whether a skip is reported.

use std::sync::Arc;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::command::RenderPass;
use crate::device::{GraphicsDevice, Rect2D, UniformValue, Viewport};
use crate::error::{ErrorKind, Result};
use crate::framebuffer::Framebuffer;
use crate::pipeline::PipelineState;
use crate::resource::{Buffer, BufferKind, Mesh, Sampler, Texture2D};
use crate::shader::ShaderModule;
use crate::{gfx_fail, gfx_trace};

const SOURCE: &str = "cbox::command";

/// What happens when a command has nothing to act on
///
/// Skipped commands are silent no-ops unless `Report` is asked for explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Skip the command, trace-log it and return `Ok`
    #[default]
    Silent,
    /// Return `InvalidState`
    Report,
}

/// Command recorder bound to one device
pub struct CommandBuffer {
    device: Arc<dyn GraphicsDevice>,
    validation: ValidationMode,
    recording: bool,
    pipeline: Option<Arc<PipelineState>>,
    shader: Option<Arc<ShaderModule>>,
    pass_framebuffer: Option<Arc<Framebuffer>>,
}

impl CommandBuffer {
    /// Create an idle command buffer
    pub fn new(device: &Arc<dyn GraphicsDevice>, validation: ValidationMode) -> Self {
        Self {
            device: device.clone(),
            validation,
            recording: false,
            pipeline: None,
            shader: None,
            pass_framebuffer: None,
        }
    }

    // ===== RECORDING =====

    /// Begin recording commands
    pub fn begin(&mut self) -> Result<()> {
        if self.recording {
            return self.skip("begin", "already recording");
        }
        self.recording = true;
        Ok(())
    }

    /// End recording commands
    ///
    /// Closes an open render pass and forgets the bound pipeline and shader.
    pub fn end(&mut self) -> Result<()> {
        if !self.recording {
            return self.skip("end", "not recording");
        }
        if self.pass_framebuffer.is_some() {
            self.end_render_pass()?;
        }
        self.pipeline = None;
        self.shader = None;
        self.recording = false;
        Ok(())
    }

    // ===== RENDER PASS =====

    /// Begin a render pass
    ///
    /// Binds the pass's framebuffer, sets the viewport to its size and issues
    /// at most one combined clear for every attachment that loads with `Clear`.
    ///
    /// # Arguments
    ///
    /// * `pass` - The render pass to begin
    pub fn begin_render_pass(&mut self, pass: &RenderPass) -> Result<()> {
        if self.pass_framebuffer.is_some() {
            return self.skip("begin_render_pass", "a render pass is already active");
        }

        let framebuffer = pass.framebuffer();
        framebuffer.bind();
        let request = pass.clear_request();
        if !request.is_empty() {
            self.device.clear(&request);
        }
        self.pass_framebuffer = Some(framebuffer.clone());
        Ok(())
    }

    /// End the current render pass and restore the default framebuffer
    pub fn end_render_pass(&mut self) -> Result<()> {
        match self.pass_framebuffer.take() {
            Some(framebuffer) => {
                framebuffer.unbind();
                Ok(())
            }
            None => self.skip("end_render_pass", "no active render pass"),
        }
    }

    // ===== STATE =====

    /// Bind a pipeline and remember its shader for uniform writes
    ///
    /// # Arguments
    ///
    /// * `pipeline` - Pipeline to bind
    pub fn set_pipeline(&mut self, pipeline: &Arc<PipelineState>) -> Result<()> {
        pipeline.bind();
        self.shader = Some(pipeline.shader().clone());
        self.pipeline = Some(pipeline.clone());
        Ok(())
    }

    /// Set the viewport
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.device.set_viewport(viewport);
        Ok(())
    }

    /// Set the scissor rectangle
    pub fn set_scissor(&mut self, rect: Rect2D) -> Result<()> {
        self.device.set_scissor(rect);
        Ok(())
    }

    // ===== UNIFORMS =====

    /// Write a uniform of the bound shader
    ///
    /// A name the program does not have (location -1) writes nothing.
    ///
    /// # Arguments
    ///
    /// * `name` - Uniform name as declared in the shader
    /// * `value` - Value to write
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) -> Result<()> {
        let Some(shader) = &self.shader else {
            return self.skip("set_uniform", "no shader bound");
        };
        shader.set_uniform(name, &value);
        Ok(())
    }

    pub fn set_uniform_float(&mut self, name: &str, value: f32) -> Result<()> {
        self.set_uniform(name, UniformValue::Float(value))
    }

    pub fn set_uniform_int(&mut self, name: &str, value: i32) -> Result<()> {
        self.set_uniform(name, UniformValue::Int(value))
    }

    pub fn set_uniform_vec2(&mut self, name: &str, value: Vec2) -> Result<()> {
        self.set_uniform(name, UniformValue::Vec2(value))
    }

    pub fn set_uniform_vec3(&mut self, name: &str, value: Vec3) -> Result<()> {
        self.set_uniform(name, UniformValue::Vec3(value))
    }

    pub fn set_uniform_vec4(&mut self, name: &str, value: Vec4) -> Result<()> {
        self.set_uniform(name, UniformValue::Vec4(value))
    }

    pub fn set_uniform_mat3(&mut self, name: &str, value: Mat3) -> Result<()> {
        self.set_uniform(name, UniformValue::Mat3(value))
    }

    pub fn set_uniform_mat4(&mut self, name: &str, value: Mat4) -> Result<()> {
        self.set_uniform(name, UniformValue::Mat4(value))
    }

    // ===== RESOURCES =====

    /// Bind a texture to a texture unit
    pub fn set_texture(&mut self, slot: u32, texture: &Texture2D) -> Result<()> {
        if self.shader.is_none() {
            return self.skip("set_texture", "no shader bound");
        }
        texture.bind(slot);
        Ok(())
    }

    /// Bind a sampler to a texture unit
    pub fn set_sampler(&mut self, slot: u32, sampler: &Sampler) -> Result<()> {
        if self.shader.is_none() {
            return self.skip("set_sampler", "no shader bound");
        }
        sampler.bind(slot);
        Ok(())
    }

    /// Bind a uniform buffer to a block binding point
    ///
    /// # Errors
    ///
    /// `InvalidState` if `buffer` is not a uniform buffer
    pub fn bind_uniform_buffer(&mut self, binding: u32, buffer: &Buffer) -> Result<()> {
        if buffer.kind() != BufferKind::Uniform {
            return Err(gfx_fail!(
                ErrorKind::InvalidState,
                SOURCE,
                "bind_uniform_buffer expects a uniform buffer, got {:?}",
                buffer.kind()
            ));
        }
        self.device.bind_buffer_base(BufferKind::Uniform, binding, Some(buffer.handle()));
        Ok(())
    }

    /// Replace the vertex buffer of the bound pipeline
    pub fn set_vertex_buffer(&mut self, buffer: Arc<Buffer>) -> Result<()> {
        match &self.pipeline {
            Some(pipeline) => pipeline.set_vertex_buffer(buffer),
            None => self.skip("set_vertex_buffer", "no pipeline bound"),
        }
    }

    /// Replace the index buffer of the bound pipeline
    pub fn set_index_buffer(&mut self, buffer: Arc<Buffer>) -> Result<()> {
        match &self.pipeline {
            Some(pipeline) => pipeline.set_index_buffer(buffer),
            None => self.skip("set_index_buffer", "no pipeline bound"),
        }
    }

    // ===== DRAW =====

    /// Draw vertices
    ///
    /// # Arguments
    ///
    /// * `vertex_count` - Number of vertices to draw
    /// * `first_vertex` - First vertex index
    pub fn draw(&mut self, vertex_count: u32, first_vertex: u32) -> Result<()> {
        let Some(pipeline) = &self.pipeline else {
            return self.skip("draw", "no pipeline bound");
        };
        self.device.draw_arrays(pipeline.topology(), first_vertex, vertex_count);
        Ok(())
    }

    /// Draw indexed vertices (32-bit indices)
    ///
    /// # Arguments
    ///
    /// * `index_count` - Number of indices to draw
    /// * `first_index` - First index in the index buffer
    /// * `vertex_offset` - Value added to each index before fetching the vertex
    pub fn draw_indexed(&mut self, index_count: u32, first_index: u32, vertex_offset: i32) -> Result<()> {
        let Some(pipeline) = &self.pipeline else {
            return self.skip("draw_indexed", "no pipeline bound");
        };
        if pipeline.index_buffer().is_none() {
            return self.skip("draw_indexed", "pipeline has no index buffer");
        }
        let byte_offset = u64::from(first_index) * 4;
        self.device.draw_elements(pipeline.topology(), index_count, byte_offset, vertex_offset);
        Ok(())
    }

    /// Attach `mesh` to the bound pipeline and draw all of it
    ///
    /// Indexed meshes draw their indices, others their vertices, with the
    /// mesh's own topology.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the mesh layout differs from the pipeline's.
    pub fn draw_mesh(&mut self, mesh: &Mesh) -> Result<()> {
        let Some(pipeline) = &self.pipeline else {
            return self.skip("draw_mesh", "no pipeline bound");
        };
        mesh.attach(pipeline)?;
        if mesh.is_indexed() {
            self.device.draw_elements(mesh.topology(), mesh.index_count(), 0, 0);
        } else {
            self.device.draw_arrays(mesh.topology(), 0, mesh.vertex_count());
        }
        Ok(())
    }

    // ===== ACCESSORS =====

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// Pipeline set since `begin`
    pub fn pipeline(&self) -> Option<&Arc<PipelineState>> {
        self.pipeline.as_ref()
    }

    /// Framebuffer of the active render pass
    pub fn active_framebuffer(&self) -> Option<&Arc<Framebuffer>> {
        self.pass_framebuffer.as_ref()
    }

    fn skip(&self, command: &str, reason: &str) -> Result<()> {
        match self.validation {
            ValidationMode::Report => Err(gfx_fail!(
                ErrorKind::InvalidState,
                SOURCE,
                "{} skipped: {}",
                command,
                reason
            )),
            ValidationMode::Silent => {
                gfx_trace!(SOURCE, "{} skipped: {}", command, reason);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[path = "command_buffer_tests.rs"]
mod tests;
