/// Render pass: a framebuffer plus load/store operations and clear values
///
/// `begin_render_pass` turns every `Clear` load op into one combined clear of
/// the bound framebuffer. `Load` and `DontCare` leave the contents alone.

use std::sync::Arc;
use glam::Vec4;
use crate::device::ClearRequest;
use crate::error::{ErrorKind, Result};
use crate::framebuffer::Framebuffer;
use crate::gfx_fail;

/// Color attachments a render pass can describe
pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOp {
    /// Keep existing content
    Load,
    /// Clear to the attachment's clear value
    Clear,
    /// Don't care about existing content
    DontCare,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// Keep the rendered content
    Store,
    /// Don't care about storing the content
    DontCare,
}

/// Load/store behaviour of one color attachment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorAttachmentOps {
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub clear_color: Vec4,
}

impl Default for ColorAttachmentOps {
    fn default() -> Self {
        Self {
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            clear_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

/// Load/store behaviour of the depth/stencil slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthStencilOps {
    pub depth_load_op: LoadOp,
    pub depth_store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    pub clear_depth: f32,
    pub clear_stencil: u32,
}

impl Default for DepthStencilOps {
    fn default() -> Self {
        Self {
            depth_load_op: LoadOp::Clear,
            depth_store_op: StoreOp::Store,
            stencil_load_op: LoadOp::DontCare,
            stencil_store_op: StoreOp::DontCare,
            clear_depth: 1.0,
            clear_stencil: 0,
        }
    }
}

/// Framebuffer with per-attachment load/store operations
#[derive(Debug, Clone)]
pub struct RenderPass {
    framebuffer: Arc<Framebuffer>,
    color_ops: [ColorAttachmentOps; MAX_COLOR_ATTACHMENTS],
    depth_stencil_ops: DepthStencilOps,
    color_attachment_count: usize,
}

impl RenderPass {
    /// Start building a pass over `framebuffer`
    pub fn builder(framebuffer: Arc<Framebuffer>) -> RenderPassBuilder {
        RenderPassBuilder {
            framebuffer,
            color_ops: [ColorAttachmentOps::default(); MAX_COLOR_ATTACHMENTS],
            depth_stencil_ops: DepthStencilOps::default(),
            color_attachment_count: 1,
            bad_index: None,
        }
    }

    /// The single clear issued when the pass begins
    ///
    /// Color comes from the first active attachment whose load op is `Clear`;
    /// the backend clears every bound draw buffer with it.
    pub fn clear_request(&self) -> ClearRequest {
        let ds = &self.depth_stencil_ops;
        ClearRequest {
            color: self.color_ops[..self.color_attachment_count]
                .iter()
                .find(|ops| ops.load_op == LoadOp::Clear)
                .map(|ops| ops.clear_color),
            depth: (ds.depth_load_op == LoadOp::Clear).then_some(ds.clear_depth),
            stencil: (ds.stencil_load_op == LoadOp::Clear).then_some(ds.clear_stencil),
        }
    }

    pub fn framebuffer(&self) -> &Arc<Framebuffer> {
        &self.framebuffer
    }

    /// Ops of color attachment `index`, `None` past the active count
    pub fn color_ops(&self, index: usize) -> Option<&ColorAttachmentOps> {
        self.color_ops[..self.color_attachment_count].get(index)
    }

    pub fn depth_stencil_ops(&self) -> &DepthStencilOps {
        &self.depth_stencil_ops
    }

    pub fn color_attachment_count(&self) -> usize {
        self.color_attachment_count
    }
}

/// Builder for [`RenderPass`]
///
/// An out-of-range attachment index is reported by `build()`.
pub struct RenderPassBuilder {
    framebuffer: Arc<Framebuffer>,
    color_ops: [ColorAttachmentOps; MAX_COLOR_ATTACHMENTS],
    depth_stencil_ops: DepthStencilOps,
    color_attachment_count: usize,
    bad_index: Option<usize>,
}

impl RenderPassBuilder {
    fn color_mut(&mut self, index: usize) -> Option<&mut ColorAttachmentOps> {
        if index >= MAX_COLOR_ATTACHMENTS {
            self.bad_index.get_or_insert(index);
            return None;
        }
        Some(&mut self.color_ops[index])
    }

    pub fn clear_color(mut self, index: usize, color: Vec4) -> Self {
        if let Some(ops) = self.color_mut(index) {
            ops.clear_color = color;
        }
        self
    }

    pub fn color_load_op(mut self, index: usize, op: LoadOp) -> Self {
        if let Some(ops) = self.color_mut(index) {
            ops.load_op = op;
        }
        self
    }

    pub fn color_store_op(mut self, index: usize, op: StoreOp) -> Self {
        if let Some(ops) = self.color_mut(index) {
            ops.store_op = op;
        }
        self
    }

    pub fn clear_depth(mut self, depth: f32) -> Self {
        self.depth_stencil_ops.clear_depth = depth;
        self
    }

    pub fn clear_stencil(mut self, stencil: u32) -> Self {
        self.depth_stencil_ops.clear_stencil = stencil;
        self
    }

    pub fn depth_load_op(mut self, op: LoadOp) -> Self {
        self.depth_stencil_ops.depth_load_op = op;
        self
    }

    pub fn depth_store_op(mut self, op: StoreOp) -> Self {
        self.depth_stencil_ops.depth_store_op = op;
        self
    }

    pub fn stencil_load_op(mut self, op: LoadOp) -> Self {
        self.depth_stencil_ops.stencil_load_op = op;
        self
    }

    pub fn stencil_store_op(mut self, op: StoreOp) -> Self {
        self.depth_stencil_ops.stencil_store_op = op;
        self
    }

    /// Number of active color attachments (default 1)
    pub fn color_attachment_count(mut self, count: usize) -> Self {
        self.color_attachment_count = count;
        self
    }

    /// Build the render pass
    ///
    /// # Errors
    ///
    /// `InvalidState` when an attachment index or the attachment count
    /// exceeds [`MAX_COLOR_ATTACHMENTS`]
    pub fn build(self) -> Result<RenderPass> {
        if let Some(index) = self.bad_index {
            return Err(gfx_fail!(
                ErrorKind::InvalidState,
                "cbox::command",
                "Color attachment index {} out of range (max {})",
                index,
                MAX_COLOR_ATTACHMENTS
            ));
        }
        if self.color_attachment_count > MAX_COLOR_ATTACHMENTS {
            return Err(gfx_fail!(
                ErrorKind::InvalidState,
                "cbox::command",
                "Render pass declares {} color attachments (max {})",
                self.color_attachment_count,
                MAX_COLOR_ATTACHMENTS
            ));
        }

        Ok(RenderPass {
            framebuffer: self.framebuffer,
            color_ops: self.color_ops,
            depth_stencil_ops: self.depth_stencil_ops,
            color_attachment_count: self.color_attachment_count,
        })
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
