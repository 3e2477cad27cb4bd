/// Framebuffer attachment descriptions

use std::sync::Arc;
use crate::error::{ErrorKind, Result};
use crate::gfx_fail;
use crate::resource::{Texture2D, TextureFormat};

/// Attachment point in a framebuffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentType {
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

/// One framebuffer attachment: a format and, optionally, an existing texture
///
/// Attachments without a texture get one created by the framebuffer.
#[derive(Debug, Clone)]
pub struct Attachment {
    kind: AttachmentType,
    format: TextureFormat,
    texture: Option<Arc<Texture2D>>,
}

impl Attachment {
    /// Color attachment (RGBA8 is the usual choice)
    pub fn color(format: TextureFormat) -> AttachmentBuilder {
        AttachmentBuilder { kind: AttachmentType::Color, format, texture: None }
    }

    /// Depth attachment (Depth24Stencil8 is the usual choice)
    pub fn depth(format: TextureFormat) -> AttachmentBuilder {
        AttachmentBuilder { kind: AttachmentType::Depth, format, texture: None }
    }

    /// Combined depth-stencil attachment, always Depth24Stencil8
    pub fn depth_stencil() -> AttachmentBuilder {
        AttachmentBuilder {
            kind: AttachmentType::DepthStencil,
            format: TextureFormat::Depth24Stencil8,
            texture: None,
        }
    }

    pub fn kind(&self) -> AttachmentType {
        self.kind
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    /// Existing texture, if one was provided
    pub fn texture(&self) -> Option<&Arc<Texture2D>> {
        self.texture.as_ref()
    }
}

/// Builder for [`Attachment`]
pub struct AttachmentBuilder {
    kind: AttachmentType,
    format: TextureFormat,
    texture: Option<Arc<Texture2D>>,
}

impl AttachmentBuilder {
    pub fn format(mut self, format: TextureFormat) -> Self {
        self.format = format;
        self
    }

    /// Use an existing texture instead of creating one; its format wins
    pub fn texture(mut self, texture: Arc<Texture2D>) -> Self {
        self.format = texture.format();
        self.texture = Some(texture);
        self
    }

    /// Finish the attachment
    ///
    /// # Errors
    ///
    /// `InvalidFormat` if a color attachment has a depth format or a
    /// depth/stencil attachment has a color format.
    pub fn build(self) -> Result<Attachment> {
        let wants_depth = self.kind != AttachmentType::Color;
        if wants_depth != self.format.is_depth() {
            return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::framebuffer",
                "{:?} attachment cannot use format {:?}", self.kind, self.format));
        }
        if self.kind == AttachmentType::DepthStencil && !self.format.has_stencil() {
            return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::framebuffer",
                "Depth-stencil attachment needs a stencil format, got {:?}", self.format));
        }

        Ok(Attachment { kind: self.kind, format: self.format, texture: self.texture })
    }
}

#[cfg(test)]
#[path = "attachment_tests.rs"]
mod tests;
