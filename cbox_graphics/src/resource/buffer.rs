/// GPU buffer: one native buffer object with a fixed size and kind
///
/// Size and kind never change after creation. Contents are replaced with
/// `set_data` (full or partial overwrite) and can be read back with `read_data`.

use std::sync::Arc;
use bytemuck::Pod;
use crate::device::{BufferHandle, GraphicsDevice};
use crate::error::{ErrorKind, Result};
use crate::{gfx_debug, gfx_fail};

/// What a buffer is bound as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    /// Vertex attributes
    Vertex,
    /// 32-bit indices
    Index,
    /// Uniform block storage
    Uniform,
    /// Shader storage
    Storage,
}

/// Update frequency hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Written once
    Static,
    /// Rewritten occasionally
    Dynamic,
    /// Rewritten every frame
    Stream,
}

/// GPU buffer resource
///
/// The native buffer is deleted when the last owner drops.
pub struct Buffer {
    device: Arc<dyn GraphicsDevice>,
    handle: BufferHandle,
    kind: BufferKind,
    usage: BufferUsage,
    size: u64,
}

impl Buffer {
    /// Start building a buffer of `kind`
    pub fn builder(device: &Arc<dyn GraphicsDevice>, kind: BufferKind) -> BufferBuilder {
        BufferBuilder {
            device: device.clone(),
            kind,
            usage: BufferUsage::Static,
            size: None,
            data: None,
        }
    }

    /// Create a buffer sized and filled from a typed slice
    pub fn from_slice<T: Pod>(
        device: &Arc<dyn GraphicsDevice>,
        kind: BufferKind,
        usage: BufferUsage,
        data: &[T],
    ) -> Result<Self> {
        Self::builder(device, kind)
            .usage(usage)
            .data(bytemuck::cast_slice(data))
            .build()
    }

    /// Overwrite `data.len()` bytes starting at `offset`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the range ends past the buffer size.
    pub fn set_data(&self, offset: u64, data: &[u8]) -> Result<()> {
        let fits = offset.checked_add(data.len() as u64).filter(|&end| end <= self.size);
        if fits.is_none() {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::buffer",
                "Write of {} bytes at offset {} exceeds buffer size {}", data.len(), offset, self.size));
        }
        self.device.write_buffer(self.handle, self.kind, offset, data)
    }

    /// Overwrite from a typed slice, starting at byte `offset`
    pub fn set_slice<T: Pod>(&self, offset: u64, data: &[T]) -> Result<()> {
        self.set_data(offset, bytemuck::cast_slice(data))
    }

    /// Read `len` bytes starting at `offset`
    ///
    /// # Errors
    ///
    /// `InvalidState` if the range ends past the buffer size.
    pub fn read_data(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        if offset.checked_add(len).filter(|&end| end <= self.size).is_none() {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::buffer",
                "Read of {} bytes at offset {} exceeds buffer size {}", len, offset, self.size));
        }
        self.device.read_buffer(self.handle, self.kind, offset, len)
    }

    /// Bind to the target for this buffer's kind
    pub fn bind(&self) {
        self.device.bind_buffer(self.kind, Some(self.handle));
    }

    /// Clear the target for this buffer's kind
    pub fn unbind(&self) {
        self.device.bind_buffer(self.kind, None);
    }

    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    pub fn usage(&self) -> BufferUsage {
        self.usage
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.device.delete_buffer(self.handle);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("handle", &self.handle)
            .field("kind", &self.kind)
            .field("usage", &self.usage)
            .field("size", &self.size)
            .finish()
    }
}

/// Builder for [`Buffer`]
pub struct BufferBuilder {
    device: Arc<dyn GraphicsDevice>,
    kind: BufferKind,
    usage: BufferUsage,
    size: Option<u64>,
    data: Option<Vec<u8>>,
}

impl BufferBuilder {
    /// Usage hint (default Static)
    pub fn usage(mut self, usage: BufferUsage) -> Self {
        self.usage = usage;
        self
    }

    /// Size in bytes; defaults to the initial data length
    pub fn size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    /// Initial contents
    pub fn data(mut self, data: &[u8]) -> Self {
        self.data = Some(data.to_vec());
        self
    }

    /// Create the native buffer
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the size is 0
    /// - `InvalidState` if the initial data is larger than the size
    pub fn build(self) -> Result<Buffer> {
        let data_len = self.data.as_ref().map(|d| d.len() as u64);
        let size = self.size.or(data_len).unwrap_or(0);

        if size == 0 {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::buffer",
                "Buffer size cannot be 0"));
        }
        if let Some(len) = data_len {
            if len > size {
                return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::buffer",
                    "Initial data ({} bytes) exceeds buffer size {}", len, size));
            }
        }

        let handle = self.device.create_buffer(self.kind, self.usage, size, self.data.as_deref())?;
        gfx_debug!("cbox::buffer", "Created {:?} buffer {} ({} bytes, {:?})", self.kind, handle, size, self.usage);

        Ok(Buffer {
            device: self.device,
            handle,
            kind: self.kind,
            usage: self.usage,
            size,
        })
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
