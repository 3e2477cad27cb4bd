/// Mesh - vertex data, optional 32-bit indices and the layout that reads them
///
/// A mesh does not own a vertex array. It is attached to a [`PipelineState`]
/// whose layout matches, or seeds a pipeline builder with its own buffers.

use std::sync::Arc;
use crate::device::GraphicsDevice;
use crate::error::{ErrorKind, Result};
use crate::pipeline::{PipelineState, PipelineStateBuilder, PrimitiveTopology, VertexLayout};
use crate::resource::{Buffer, BufferKind};
use crate::{gfx_debug, gfx_fail};

const SOURCE: &str = "cbox::mesh";
const INDEX_SIZE: u64 = 4;

/// Drawable geometry
pub struct Mesh {
    vertex_buffer: Arc<Buffer>,
    index_buffer: Option<Arc<Buffer>>,
    layout: VertexLayout,
    topology: PrimitiveTopology,
    vertex_count: u32,
    index_count: u32,
}

impl Mesh {
    pub fn builder() -> MeshBuilder {
        MeshBuilder::default()
    }

    /// Pipeline builder preset with this mesh's layout, topology and buffers
    pub fn pipeline_builder(&self, device: &Arc<dyn GraphicsDevice>) -> PipelineStateBuilder {
        let builder = PipelineState::builder(device)
            .vertex_layout(self.layout.clone())
            .topology(self.topology)
            .vertex_buffer(self.vertex_buffer.clone());
        match &self.index_buffer {
            Some(indices) => builder.index_buffer(indices.clone()),
            None => builder,
        }
    }

    /// Attach this mesh's buffers to `pipeline`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the pipeline's vertex layout differs from the mesh's.
    pub fn attach(&self, pipeline: &PipelineState) -> Result<()> {
        if *pipeline.vertex_layout() != self.layout {
            return Err(gfx_fail!(ErrorKind::InvalidState, SOURCE,
                "Pipeline vertex layout does not match the mesh layout"));
        }
        pipeline.set_vertex_buffer(self.vertex_buffer.clone())?;
        if let Some(indices) = &self.index_buffer {
            pipeline.set_index_buffer(indices.clone())?;
        }
        Ok(())
    }

    pub fn vertex_buffer(&self) -> &Arc<Buffer> {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&Arc<Buffer>> {
        self.index_buffer.as_ref()
    }

    pub fn vertex_layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Number of indices (0 when not indexed)
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }
}

/// Builder for [`Mesh`]
#[derive(Default)]
pub struct MeshBuilder {
    vertex_buffer: Option<Arc<Buffer>>,
    index_buffer: Option<Arc<Buffer>>,
    layout: VertexLayout,
    topology: PrimitiveTopology,
    vertex_count: Option<u32>,
    index_count: Option<u32>,
}

impl MeshBuilder {
    pub fn vertex_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.vertex_buffer = Some(buffer);
        self
    }

    pub fn index_buffer(mut self, buffer: Arc<Buffer>) -> Self {
        self.index_buffer = Some(buffer);
        self
    }

    pub fn vertex_layout(mut self, layout: VertexLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Draw fewer vertices than the buffer holds
    pub fn vertex_count(mut self, count: u32) -> Self {
        self.vertex_count = Some(count);
        self
    }

    /// Draw fewer indices than the buffer holds
    pub fn index_count(mut self, count: u32) -> Self {
        self.index_count = Some(count);
        self
    }

    /// Build the mesh
    ///
    /// Counts default to what the buffers hold: vertex buffer size over the
    /// layout stride, index buffer size over 4.
    ///
    /// # Errors
    ///
    /// - `NullValue` if no vertex buffer was set
    /// - `InvalidState` if a buffer has the wrong kind, the layout is empty,
    ///   or an explicit count exceeds what its buffer holds
    pub fn build(self) -> Result<Mesh> {
        let vertex_buffer = self.vertex_buffer.ok_or_else(|| {
            gfx_fail!(ErrorKind::NullValue, SOURCE, "Vertex buffer is null")
        })?;
        if vertex_buffer.kind() != BufferKind::Vertex {
            return Err(gfx_fail!(ErrorKind::InvalidState, SOURCE,
                "Expected a vertex buffer, got {:?}", vertex_buffer.kind()));
        }
        if self.layout.is_empty() || self.layout.stride() == 0 {
            return Err(gfx_fail!(ErrorKind::InvalidState, SOURCE, "Mesh vertex layout is empty"));
        }

        let vertex_capacity = vertex_buffer.size() / u64::from(self.layout.stride());
        let vertex_count = resolve_count("vertex", self.vertex_count, vertex_capacity)?;

        let index_count = match &self.index_buffer {
            Some(indices) if indices.kind() != BufferKind::Index => {
                return Err(gfx_fail!(ErrorKind::InvalidState, SOURCE,
                    "Expected an index buffer, got {:?}", indices.kind()));
            }
            Some(indices) => resolve_count("index", self.index_count, indices.size() / INDEX_SIZE)?,
            None => 0,
        };

        gfx_debug!(SOURCE, "Created mesh ({} vertices, {} indices, {:?})",
            vertex_count, index_count, self.topology);
        Ok(Mesh {
            vertex_buffer,
            index_buffer: self.index_buffer,
            layout: self.layout,
            topology: self.topology,
            vertex_count,
            index_count,
        })
    }
}

fn resolve_count(what: &str, requested: Option<u32>, capacity: u64) -> Result<u32> {
    match requested {
        Some(count) if u64::from(count) > capacity => Err(gfx_fail!(ErrorKind::InvalidState, SOURCE,
            "{} count {} exceeds the {} the buffer holds", what, count, capacity)),
        Some(count) => Ok(count),
        None => u32::try_from(capacity).map_err(|_| gfx_fail!(ErrorKind::InvalidState, SOURCE,
            "{} buffer holds more than {} elements", what, u32::MAX)),
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
