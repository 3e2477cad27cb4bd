/// Color blending state

use glam::Vec4;
use crate::device::GraphicsDevice;

/// Maximum number of color attachments with their own blend entry
pub const MAX_BLEND_ATTACHMENTS: usize = 8;

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendOp {
    /// result = src * srcFactor + dst * dstFactor
    Add,
    /// result = src * srcFactor - dst * dstFactor
    Subtract,
    /// result = dst * dstFactor - src * srcFactor
    ReverseSubtract,
    /// result = min(src, dst)
    Min,
    /// result = max(src, dst)
    Max,
}

bitflags::bitflags! {
    /// Color channels written by an attachment
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteMask: u8 {
        const R = 1 << 0;
        const G = 1 << 1;
        const B = 1 << 2;
        const A = 1 << 3;
        const RGB = Self::R.bits() | Self::G.bits() | Self::B.bits();
        const ALL = Self::RGB.bits() | Self::A.bits();
    }
}

impl Default for ColorWriteMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Blend settings for one color attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlendAttachment {
    /// Enable blending
    pub enabled: bool,
    /// Source color blend factor
    pub src_color: BlendFactor,
    /// Destination color blend factor
    pub dst_color: BlendFactor,
    /// Color blend operation
    pub color_op: BlendOp,
    /// Source alpha blend factor
    pub src_alpha: BlendFactor,
    /// Destination alpha blend factor
    pub dst_alpha: BlendFactor,
    /// Alpha blend operation
    pub alpha_op: BlendOp,
    /// Color write mask
    pub write_mask: ColorWriteMask,
}

impl Default for BlendAttachment {
    fn default() -> Self {
        Self {
            enabled: false,
            src_color: BlendFactor::One,
            dst_color: BlendFactor::Zero,
            color_op: BlendOp::Add,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            alpha_op: BlendOp::Add,
            write_mask: ColorWriteMask::ALL,
        }
    }
}

/// Blend state for up to [`MAX_BLEND_ATTACHMENTS`] color attachments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendState {
    /// Per-attachment blend settings
    pub attachments: [BlendAttachment; MAX_BLEND_ATTACHMENTS],
    /// Constant color for the Constant* factors
    pub blend_constants: Vec4,
}

impl Default for BlendState {
    fn default() -> Self {
        Self::disabled()
    }
}

impl BlendState {
    /// Blending off on every attachment
    pub fn disabled() -> Self {
        Self {
            attachments: [BlendAttachment::default(); MAX_BLEND_ATTACHMENTS],
            blend_constants: Vec4::ZERO,
        }
    }

    /// Standard `src.a * src + (1 - src.a) * dst` on attachment 0
    pub fn alpha_blend() -> Self {
        let mut state = Self::disabled();
        state.attachments[0] = BlendAttachment {
            enabled: true,
            src_color: BlendFactor::SrcAlpha,
            dst_color: BlendFactor::OneMinusSrcAlpha,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::Zero,
            ..BlendAttachment::default()
        };
        state
    }

    /// `src + dst` on attachment 0
    pub fn additive() -> Self {
        let mut state = Self::disabled();
        state.attachments[0] = BlendAttachment {
            enabled: true,
            src_color: BlendFactor::One,
            dst_color: BlendFactor::One,
            src_alpha: BlendFactor::One,
            dst_alpha: BlendFactor::One,
            ..BlendAttachment::default()
        };
        state
    }

    /// Push this state to the device for the first `attachment_count` attachments
    ///
    /// The count is clamped to [`MAX_BLEND_ATTACHMENTS`].
    pub fn apply(&self, device: &dyn GraphicsDevice, attachment_count: u32) {
        let count = attachment_count.min(MAX_BLEND_ATTACHMENTS as u32);
        device.apply_blend(self, count);
    }
}

#[cfg(test)]
#[path = "blend_tests.rs"]
mod tests;
