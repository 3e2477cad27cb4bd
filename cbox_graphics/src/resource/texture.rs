/// 2D textures and texture formats

use std::path::{Path, PathBuf};
use std::sync::Arc;
use crate::device::{GraphicsDevice, TextureHandle};
use crate::error::{Error, ErrorKind, Result};
use crate::{gfx_debug, gfx_fail};

/// Pixel format of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8,
    RG8,
    RGB8,
    RGBA8,
    R16F,
    RG16F,
    RGB16F,
    RGBA16F,
    R32F,
    RG32F,
    RGB32F,
    RGBA32F,
    Depth24Stencil8,
    Depth32F,
}

impl TextureFormat {
    /// True for depth (and depth-stencil) formats
    pub fn is_depth(self) -> bool {
        matches!(self, TextureFormat::Depth24Stencil8 | TextureFormat::Depth32F)
    }

    /// True when the format carries a stencil component
    pub fn has_stencil(self) -> bool {
        self == TextureFormat::Depth24Stencil8
    }

    /// Bytes for one texel
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8 => 1,
            TextureFormat::RG8 => 2,
            TextureFormat::RGB8 => 3,
            TextureFormat::RGBA8 => 4,
            TextureFormat::R16F => 2,
            TextureFormat::RG16F => 4,
            TextureFormat::RGB16F => 6,
            TextureFormat::RGBA16F => 8,
            TextureFormat::R32F => 4,
            TextureFormat::RG32F => 8,
            TextureFormat::RGB32F => 12,
            TextureFormat::RGBA32F => 16,
            TextureFormat::Depth24Stencil8 => 4,
            TextureFormat::Depth32F => 4,
        }
    }

    /// 8-bit format with `channels` components (1 to 4)
    pub fn from_channel_count(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(TextureFormat::R8),
            2 => Some(TextureFormat::RG8),
            3 => Some(TextureFormat::RGB8),
            4 => Some(TextureFormat::RGBA8),
            _ => None,
        }
    }
}

/// Creation parameters handed to the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    /// Store RGB8/RGBA8 as sRGB
    pub srgb: bool,
    /// Generate the mip chain after upload
    pub mipmaps: bool,
}

impl TextureDesc {
    /// Bytes needed for a full level-0 upload
    pub fn byte_size(&self) -> u64 {
        self.width as u64 * self.height as u64 * self.format.bytes_per_pixel() as u64
    }
}

/// GPU 2D texture
///
/// The native texture is deleted when the last owner drops.
pub struct Texture2D {
    device: Arc<dyn GraphicsDevice>,
    handle: TextureHandle,
    desc: TextureDesc,
}

impl Texture2D {
    /// Start building an empty (or data-filled) texture
    pub fn builder(device: &Arc<dyn GraphicsDevice>, width: u32, height: u32, format: TextureFormat) -> Texture2DBuilder {
        Texture2DBuilder {
            device: device.clone(),
            source: TextureSource::Size { width, height, format },
            data: None,
            srgb: false,
            mipmaps: false,
        }
    }

    /// Start building a texture decoded from an image file
    pub fn from_file(device: &Arc<dyn GraphicsDevice>, path: impl AsRef<Path>) -> Texture2DBuilder {
        Texture2DBuilder {
            device: device.clone(),
            source: TextureSource::File(path.as_ref().to_path_buf()),
            data: None,
            srgb: false,
            mipmaps: false,
        }
    }

    /// Bind to texture unit `slot`
    pub fn bind(&self, slot: u32) {
        self.device.bind_texture(slot, Some(self.handle));
    }

    /// Clear texture unit `slot`
    pub fn unbind(&self, slot: u32) {
        self.device.bind_texture(slot, None);
    }

    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    pub fn format(&self) -> TextureFormat {
        self.desc.format
    }

    pub fn desc(&self) -> &TextureDesc {
        &self.desc
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        self.device.delete_texture(self.handle);
    }
}

impl std::fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2D")
            .field("handle", &self.handle)
            .field("desc", &self.desc)
            .finish()
    }
}

enum TextureSource {
    Size { width: u32, height: u32, format: TextureFormat },
    File(PathBuf),
}

/// Builder for [`Texture2D`]
pub struct Texture2DBuilder {
    device: Arc<dyn GraphicsDevice>,
    source: TextureSource,
    data: Option<Vec<u8>>,
    srgb: bool,
    mipmaps: bool,
}

impl Texture2DBuilder {
    /// Initial level-0 pixels (ignored for file textures)
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = Some(data.to_vec());
        self
    }

    /// Store 8-bit RGB/RGBA as sRGB
    pub fn srgb(mut self, srgb: bool) -> Self {
        self.srgb = srgb;
        self
    }

    /// Generate mipmaps after upload
    pub fn generate_mipmaps(mut self) -> Self {
        self.mipmaps = true;
        self
    }

    /// Create the native texture
    ///
    /// # Errors
    ///
    /// - `InvalidState` on a zero dimension or short initial data
    /// - `NotFound` / `AccessDenied` / `ReadError` if the image file cannot be read
    /// - `InvalidFormat` if the image cannot be decoded or has an unsupported channel count
    pub fn build(self) -> Result<Texture2D> {
        let (width, height, format, data) = match self.source {
            TextureSource::Size { width, height, format } => (width, height, format, self.data),
            TextureSource::File(ref path) => {
                let (width, height, format, pixels) = load_image(path)?;
                (width, height, format, Some(pixels))
            }
        };

        if width == 0 || height == 0 {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::texture",
                "Texture dimensions cannot be 0 ({}x{})", width, height));
        }

        let desc = TextureDesc { width, height, format, srgb: self.srgb, mipmaps: self.mipmaps };
        if let Some(ref pixels) = data {
            if (pixels.len() as u64) < desc.byte_size() {
                return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::texture",
                    "Texture data is {} bytes, {}x{} {:?} needs {}",
                    pixels.len(), width, height, format, desc.byte_size()));
            }
        }

        let handle = self.device.create_texture_2d(&desc, data.as_deref())?;
        gfx_debug!("cbox::texture", "Created texture {} ({}x{} {:?})", handle, width, height, format);

        Ok(Texture2D { device: self.device, handle, desc })
    }
}

/// Decode an image file, flipped so row 0 is the bottom row
fn load_image(path: &Path) -> Result<(u32, u32, TextureFormat, Vec<u8>)> {
    let reader = image::ImageReader::open(path).map_err(|e| {
        let err = Error::from_io(&e, path);
        crate::gfx_error!("cbox::texture", "{}", err);
        err
    })?;
    let image = reader
        .decode()
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::texture",
            "Failed to decode {}: {}", path.display(), e))?
        .flipv();

    let channels = image.color().channel_count();
    let format = TextureFormat::from_channel_count(channels).ok_or_else(|| {
        gfx_fail!(ErrorKind::InvalidFormat, "cbox::texture",
            "Unsupported channel count {} in {}", channels, path.display())
    })?;

    let (width, height) = (image.width(), image.height());
    let pixels = match format {
        TextureFormat::R8 => image.into_luma8().into_raw(),
        TextureFormat::RG8 => image.into_luma_alpha8().into_raw(),
        TextureFormat::RGB8 => image.into_rgb8().into_raw(),
        _ => image.into_rgba8().into_raw(),
    };

    Ok((width, height, format, pixels))
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
