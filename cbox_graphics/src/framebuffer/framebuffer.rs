/// Render targets: the default framebuffer and offscreen framebuffers
///
/// An offscreen framebuffer owns (or shares) its color textures and at most one
/// depth or depth-stencil texture, all matching its size. The default framebuffer
/// owns no native object and is never deleted.

use std::sync::Arc;
use crate::device::{FramebufferHandle, GraphicsDevice, Viewport};
use crate::error::{ErrorKind, Result};
use crate::framebuffer::{Attachment, AttachmentType};
use crate::resource::Texture2D;
use crate::{gfx_fail, gfx_info};

/// Render target
pub struct Framebuffer {
    device: Arc<dyn GraphicsDevice>,
    /// `None` for the default framebuffer
    handle: Option<FramebufferHandle>,
    width: u32,
    height: u32,
    color_attachments: Vec<Attachment>,
    depth_attachment: Option<Attachment>,
    color_textures: Vec<Arc<Texture2D>>,
    depth_texture: Option<Arc<Texture2D>>,
}

struct Targets {
    handle: FramebufferHandle,
    colors: Vec<Arc<Texture2D>>,
    depth: Option<Arc<Texture2D>>,
}

impl Framebuffer {
    /// The window's framebuffer
    pub fn default_target(device: &Arc<dyn GraphicsDevice>, width: u32, height: u32) -> Self {
        Self {
            device: device.clone(),
            handle: None,
            width,
            height,
            color_attachments: Vec::new(),
            depth_attachment: None,
            color_textures: Vec::new(),
            depth_texture: None,
        }
    }

    /// Start building an offscreen framebuffer
    pub fn builder(device: &Arc<dyn GraphicsDevice>, width: u32, height: u32) -> FramebufferBuilder {
        FramebufferBuilder {
            device: device.clone(),
            width,
            height,
            color_attachments: Vec::new(),
            depth_attachment: None,
            depth_stencil_attachment: None,
        }
    }

    /// Bind as render target and set the viewport to its size
    pub fn bind(&self) {
        self.device.bind_framebuffer(self.handle);
        self.device.set_viewport(Viewport::full(self.width, self.height));
    }

    /// Restore the default framebuffer
    pub fn unbind(&self) {
        self.device.bind_framebuffer(None);
    }

    /// Resize the framebuffer
    ///
    /// The default framebuffer only records the new size. Offscreen framebuffers
    /// recreate their textures and native object.
    ///
    /// # Errors
    ///
    /// - `InvalidState` on a zero dimension or when a provided attachment texture
    ///   does not match the new size
    /// - `BackendError` if the recreated framebuffer is incomplete
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::framebuffer",
                "Framebuffer dimensions cannot be 0"));
        }
        if self.handle.is_none() {
            self.width = width;
            self.height = height;
            return Ok(());
        }

        let targets = create_targets(
            &self.device,
            width,
            height,
            &self.color_attachments,
            self.depth_attachment.as_ref(),
        )?;

        if let Some(old) = self.handle.replace(targets.handle) {
            self.device.delete_framebuffer(old);
        }
        self.color_textures = targets.colors;
        self.depth_texture = targets.depth;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// True for the window's framebuffer
    pub fn is_default(&self) -> bool {
        self.handle.is_none()
    }

    pub fn handle(&self) -> Option<FramebufferHandle> {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of color attachments
    pub fn color_attachment_count(&self) -> u32 {
        self.color_textures.len() as u32
    }

    /// Color texture `index`, `None` when out of range
    pub fn color_texture(&self, index: usize) -> Option<&Arc<Texture2D>> {
        self.color_textures.get(index)
    }

    /// Depth or depth-stencil texture
    pub fn depth_texture(&self) -> Option<&Arc<Texture2D>> {
        self.depth_texture.as_ref()
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.delete_framebuffer(handle);
        }
    }
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("handle", &self.handle)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("color_attachments", &self.color_textures.len())
            .field("has_depth", &self.depth_texture.is_some())
            .finish()
    }
}

/// Builder for offscreen [`Framebuffer`]s
pub struct FramebufferBuilder {
    device: Arc<dyn GraphicsDevice>,
    width: u32,
    height: u32,
    color_attachments: Vec<Attachment>,
    depth_attachment: Option<Attachment>,
    depth_stencil_attachment: Option<Attachment>,
}

impl FramebufferBuilder {
    /// Append a color attachment (attachment point = insertion order)
    pub fn color_attachment(mut self, attachment: Attachment) -> Self {
        self.color_attachments.push(attachment);
        self
    }

    /// Depth-only attachment (ignored if a depth-stencil attachment is set)
    pub fn depth_attachment(mut self, attachment: Attachment) -> Self {
        self.depth_attachment = Some(attachment);
        self
    }

    /// Combined depth-stencil attachment
    pub fn depth_stencil_attachment(mut self, attachment: Attachment) -> Self {
        self.depth_stencil_attachment = Some(attachment);
        self
    }

    /// Create textures for attachments without one, then the native framebuffer
    ///
    /// # Errors
    ///
    /// - `InvalidState` if width or height is 0, if there are more color
    ///   attachments than the device supports, or a provided texture has a different size
    /// - `BackendError` if the framebuffer is incomplete
    pub fn build(self) -> Result<Framebuffer> {
        if self.width == 0 || self.height == 0 {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::framebuffer",
                "Framebuffer dimensions cannot be 0"));
        }

        let max_colors = self.device.capabilities().max_color_attachments;
        if max_colors > 0 && self.color_attachments.len() as u32 > max_colors {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::framebuffer",
                "{} color attachments requested, device supports {}",
                self.color_attachments.len(), max_colors));
        }

        let depth = self.depth_stencil_attachment.or(self.depth_attachment);
        let targets = create_targets(&self.device, self.width, self.height, &self.color_attachments, depth.as_ref())?;

        gfx_info!("cbox::framebuffer", "Created offscreen framebuffer {} ({}x{}, {} color attachments)",
            targets.handle, self.width, self.height, targets.colors.len());

        Ok(Framebuffer {
            device: self.device,
            handle: Some(targets.handle),
            width: self.width,
            height: self.height,
            color_attachments: self.color_attachments,
            depth_attachment: depth,
            color_textures: targets.colors,
            depth_texture: targets.depth,
        })
    }
}

fn attachment_texture(
    device: &Arc<dyn GraphicsDevice>,
    width: u32,
    height: u32,
    attachment: &Attachment,
) -> Result<Arc<Texture2D>> {
    match attachment.texture() {
        Some(texture) if texture.width() != width || texture.height() != height => {
            Err(gfx_fail!(ErrorKind::InvalidState, "cbox::framebuffer",
                "{:?} attachment texture is {}x{}, framebuffer is {}x{}",
                attachment.kind(), texture.width(), texture.height(), width, height))
        }
        Some(texture) => Ok(texture.clone()),
        None => Ok(Arc::new(Texture2D::builder(device, width, height, attachment.format()).build()?)),
    }
}

fn create_targets(
    device: &Arc<dyn GraphicsDevice>,
    width: u32,
    height: u32,
    colors: &[Attachment],
    depth: Option<&Attachment>,
) -> Result<Targets> {
    let color_textures = colors
        .iter()
        .map(|attachment| attachment_texture(device, width, height, attachment))
        .collect::<Result<Vec<_>>>()?;

    let depth_texture = depth
        .map(|attachment| attachment_texture(device, width, height, attachment))
        .transpose()?;

    let color_handles: Vec<_> = color_textures.iter().map(|t| t.handle()).collect();
    let depth_target = match (depth, depth_texture.as_ref()) {
        (Some(attachment), Some(texture)) => {
            let point = match attachment.kind() {
                AttachmentType::Color | AttachmentType::Depth => AttachmentType::Depth,
                other => other,
            };
            Some((texture.handle(), point))
        }
        _ => None,
    };

    let handle = device.create_framebuffer(&color_handles, depth_target)?;
    Ok(Targets { handle, colors: color_textures, depth: depth_texture })
}

#[cfg(test)]
#[path = "framebuffer_tests.rs"]
mod tests;
