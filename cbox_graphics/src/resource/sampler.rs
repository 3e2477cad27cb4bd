/// Sampler objects: filtering, wrapping and anisotropy

use std::sync::Arc;
use glam::Vec4;
use crate::device::{GraphicsDevice, SamplerHandle};
use crate::error::Result;
use crate::gfx_debug;

/// Texel filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Nearest,
    Linear,
}

/// Filter between mip levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipmapMode {
    Nearest,
    Linear,
}

/// Addressing outside [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Repeat,
    MirroredRepeat,
    ClampToEdge,
    ClampToBorder,
}

/// Sampler parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerDesc {
    pub min_filter: Filter,
    pub mag_filter: Filter,
    pub mipmap_mode: MipmapMode,
    pub wrap_u: WrapMode,
    pub wrap_v: WrapMode,
    pub wrap_w: WrapMode,
    /// Applied only when greater than 1
    pub anisotropy: f32,
    pub border_color: Vec4,
}

impl Default for SamplerDesc {
    fn default() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            mipmap_mode: MipmapMode::Linear,
            wrap_u: WrapMode::Repeat,
            wrap_v: WrapMode::Repeat,
            wrap_w: WrapMode::Repeat,
            anisotropy: 1.0,
            border_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
        }
    }
}

impl SamplerDesc {
    /// Anisotropy level to apply, `None` when it is 1 or less
    pub fn effective_anisotropy(&self) -> Option<f32> {
        (self.anisotropy > 1.0).then_some(self.anisotropy)
    }
}

/// GPU sampler object
pub struct Sampler {
    device: Arc<dyn GraphicsDevice>,
    handle: SamplerHandle,
    desc: SamplerDesc,
}

impl Sampler {
    /// Start building a sampler with default settings
    pub fn builder(device: &Arc<dyn GraphicsDevice>) -> SamplerBuilder {
        SamplerBuilder { device: device.clone(), desc: SamplerDesc::default() }
    }

    /// Bind to texture unit `slot`
    pub fn bind(&self, slot: u32) {
        self.device.bind_sampler(slot, Some(self.handle));
    }

    /// Clear texture unit `slot`
    pub fn unbind(&self, slot: u32) {
        self.device.bind_sampler(slot, None);
    }

    pub fn handle(&self) -> SamplerHandle {
        self.handle
    }

    pub fn desc(&self) -> &SamplerDesc {
        &self.desc
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.device.delete_sampler(self.handle);
    }
}

impl std::fmt::Debug for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sampler").field("handle", &self.handle).finish()
    }
}

/// Builder for [`Sampler`]
pub struct SamplerBuilder {
    device: Arc<dyn GraphicsDevice>,
    desc: SamplerDesc,
}

impl SamplerBuilder {
    pub fn filter(mut self, min: Filter, mag: Filter) -> Self {
        self.desc.min_filter = min;
        self.desc.mag_filter = mag;
        self
    }

    pub fn mipmap(mut self, mode: MipmapMode) -> Self {
        self.desc.mipmap_mode = mode;
        self
    }

    /// Same wrap mode on all three axes
    pub fn wrap(mut self, mode: WrapMode) -> Self {
        self.desc.wrap_u = mode;
        self.desc.wrap_v = mode;
        self.desc.wrap_w = mode;
        self
    }

    pub fn wrap_u(mut self, mode: WrapMode) -> Self {
        self.desc.wrap_u = mode;
        self
    }

    pub fn wrap_v(mut self, mode: WrapMode) -> Self {
        self.desc.wrap_v = mode;
        self
    }

    pub fn wrap_w(mut self, mode: WrapMode) -> Self {
        self.desc.wrap_w = mode;
        self
    }

    pub fn anisotropy(mut self, level: f32) -> Self {
        self.desc.anisotropy = level;
        self
    }

    pub fn border_color(mut self, color: Vec4) -> Self {
        self.desc.border_color = color;
        self
    }

    /// Create the native sampler
    pub fn build(self) -> Result<Sampler> {
        let handle = self.device.create_sampler(&self.desc)?;
        gfx_debug!("cbox::sampler", "Created sampler {} ({:?}/{:?})", handle, self.desc.min_filter, self.desc.mag_filter);
        Ok(Sampler { device: self.device, handle, desc: self.desc })
    }
}

#[cfg(test)]
#[path = "sampler_tests.rs"]
mod tests;
