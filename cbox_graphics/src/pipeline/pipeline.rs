/// Pipeline state: shader, vertex input and fixed-function state bound as one unit
///
/// A pipeline owns the device vertex array. Buffers can be swapped after
/// creation; everything else is fixed at build time.

use std::sync::{Arc, Mutex};
use crate::device::{GraphicsDevice, VertexArrayHandle};
use crate::error::{ErrorKind, Result};
use crate::pipeline::{BlendState, DepthStencilState, RasterizerState, VertexLayout};
use crate::resource::{Buffer, BufferKind};
use crate::shader::ShaderModule;
use crate::{gfx_debug, gfx_fail};

/// How vertices are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    #[default]
    TriangleList,
    TriangleStrip,
    TriangleFan,
}

#[derive(Default)]
struct VertexBindings {
    vertex_buffer: Option<Arc<Buffer>>,
    index_buffer: Option<Arc<Buffer>>,
}

/// Complete pipeline state
pub struct PipelineState {
    device: Arc<dyn GraphicsDevice>,
    shader: Arc<ShaderModule>,
    vertex_array: VertexArrayHandle,
    vertex_layout: VertexLayout,
    topology: PrimitiveTopology,
    rasterizer: RasterizerState,
    depth_stencil: DepthStencilState,
    blend: BlendState,
    color_attachment_count: u32,
    bindings: Mutex<VertexBindings>,
}

impl PipelineState {
    /// Start building a pipeline
    pub fn builder(device: &Arc<dyn GraphicsDevice>) -> PipelineStateBuilder {
        PipelineStateBuilder {
            device: device.clone(),
            shader: None,
            vertex_layout: VertexLayout::default(),
            topology: PrimitiveTopology::default(),
            rasterizer: RasterizerState::default(),
            depth_stencil: DepthStencilState::default(),
            blend: BlendState::default(),
            color_attachment_count: 1,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// Bind program, vertex array, then rasterizer, depth/stencil and blend state
    ///
    /// Safe to call repeatedly.
    pub fn bind(&self) {
        self.shader.bind();
        self.device.bind_vertex_array(Some(self.vertex_array));
        self.rasterizer.apply(self.device.as_ref());
        self.depth_stencil.apply(self.device.as_ref());
        self.blend.apply(self.device.as_ref(), self.color_attachment_count);
    }

    /// Unbind the vertex array, then the program
    pub fn unbind(&self) {
        self.device.bind_vertex_array(None);
        self.shader.unbind();
    }

    /// Attach a vertex buffer using this pipeline's layout
    ///
    /// # Errors
    ///
    /// `InvalidState` if `buffer` is not a vertex buffer.
    pub fn set_vertex_buffer(&self, buffer: Arc<Buffer>) -> Result<()> {
        if buffer.kind() != BufferKind::Vertex {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::pipeline",
                "Expected a vertex buffer, got {:?}", buffer.kind()));
        }
        self.device.attach_vertex_buffer(self.vertex_array, buffer.handle(), &self.vertex_layout);
        self.lock_bindings().vertex_buffer = Some(buffer);
        Ok(())
    }

    /// Attach a 32-bit index buffer
    ///
    /// # Errors
    ///
    /// `InvalidState` if `buffer` is not an index buffer.
    pub fn set_index_buffer(&self, buffer: Arc<Buffer>) -> Result<()> {
        if buffer.kind() != BufferKind::Index {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::pipeline",
                "Expected an index buffer, got {:?}", buffer.kind()));
        }
        self.device.attach_index_buffer(self.vertex_array, buffer.handle());
        self.lock_bindings().index_buffer = Some(buffer);
        Ok(())
    }

    pub fn shader(&self) -> &Arc<ShaderModule> {
        &self.shader
    }

    pub fn vertex_array(&self) -> VertexArrayHandle {
        self.vertex_array
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.vertex_layout
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn rasterizer(&self) -> &RasterizerState {
        &self.rasterizer
    }

    pub fn depth_stencil(&self) -> &DepthStencilState {
        &self.depth_stencil
    }

    pub fn blend(&self) -> &BlendState {
        &self.blend
    }

    /// Currently attached vertex buffer
    pub fn vertex_buffer(&self) -> Option<Arc<Buffer>> {
        self.lock_bindings().vertex_buffer.clone()
    }

    /// Currently attached index buffer
    pub fn index_buffer(&self) -> Option<Arc<Buffer>> {
        self.lock_bindings().index_buffer.clone()
    }

    fn lock_bindings(&self) -> std::sync::MutexGuard<'_, VertexBindings> {
        // Bindings are plain data; a poisoned lock still holds a consistent value
        self.bindings.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PipelineState {
    fn drop(&mut self) {
        self.device.delete_vertex_array(self.vertex_array);
    }
}

impl std::fmt::Debug for PipelineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineState")
            .field("program", &self.shader.program())
            .field("vertex_array", &self.vertex_array)
            .field("topology", &self.topology)
            .finish()
    }
}

/// Builder for [`PipelineState`]
pub struct PipelineStateBuilder {
    device: Arc<dyn GraphicsDevice>,
    shader: Option<Arc<ShaderModule>>,
    vertex_layout: VertexLayout,
    topology: PrimitiveTopology,
    rasterizer: RasterizerState,
    depth_stencil: DepthStencilState,
    blend: BlendState,
    color_attachment_count: u32,
    vertex_buffer: Option<Arc<Buffer>>,
    index_buffer: Option<Arc<Buffer>>,
}

impl PipelineStateBuilder {
    pub fn shader(mut self, shader: Arc<ShaderModule>) -> Self {
        self.shader = Some(shader);
        self
    }

    pub fn vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.vertex_layout = layout;
        self
    }

    pub fn topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    pub fn rasterizer(mut self, state: RasterizerState) -> Self {
        self.rasterizer = state;
        self
    }

    pub fn depth_stencil(mut self, state: DepthStencilState) -> Self {
        self.depth_stencil = state;
        self
    }

    pub fn blend(mut self, state: BlendState) -> Self {
        self.blend = state;
        self
    }

    /// Number of blend attachments applied on bind (default 1)
    pub fn color_attachment_count(mut self, count: u32) -> Self {
        self.color_attachment_count = count;
        self
    }

    /// Vertex buffer attached right after the vertex array is created
    pub fn vertex_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.vertex_buffer = Some(buffer);
        self
    }

    /// Index buffer attached right after the vertex array is created
    pub fn index_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.index_buffer = Some(buffer);
        self
    }

    /// Create the vertex array and attach any initial buffers
    ///
    /// # Errors
    ///
    /// - `NullValue` if no shader was set
    /// - `InvalidState` if an initial buffer has the wrong kind
    pub fn build(self) -> Result<PipelineState> {
        let shader = self.shader.ok_or_else(|| {
            gfx_fail!(ErrorKind::NullValue, "cbox::pipeline", "Shader is null")
        })?;

        let vertex_array = self.device.create_vertex_array()?;
        let pipeline = PipelineState {
            device: self.device,
            shader,
            vertex_array,
            vertex_layout: self.vertex_layout,
            topology: self.topology,
            rasterizer: self.rasterizer,
            depth_stencil: self.depth_stencil,
            blend: self.blend,
            color_attachment_count: self.color_attachment_count,
            bindings: Mutex::new(VertexBindings::default()),
        };

        if let Some(buffer) = self.vertex_buffer {
            pipeline.set_vertex_buffer(buffer)?;
        }
        if let Some(buffer) = self.index_buffer {
            pipeline.set_index_buffer(buffer)?;
        }

        gfx_debug!("cbox::pipeline", "Created pipeline (vertex array {}, {:?})", vertex_array, pipeline.topology);
        Ok(pipeline)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
