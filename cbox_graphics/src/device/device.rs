/// Backend device trait: the single dispatch seam between the core and a graphics API
///
/// Resource objects (Buffer, Texture2D, ShaderModule, ...) are concrete structs that
/// hold an `Arc<dyn GraphicsDevice>` and a native handle. Every GPU side effect goes
/// through this trait, so a real backend and the test mock stand behind the same API.

use std::fmt;
use std::num::NonZeroU32;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::error::Result;
use crate::framebuffer::AttachmentType;
use crate::pipeline::{
    BlendState, DepthStencilState, PrimitiveTopology, RasterizerState, VertexLayout,
};
use crate::resource::{BufferKind, BufferUsage, SamplerDesc, TextureDesc};
use crate::shader::ShaderStage;

// ===== NATIVE HANDLES =====

macro_rules! native_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wrap a raw backend id, `None` for 0
            pub fn new(raw: u32) -> Option<Self> {
                NonZeroU32::new(raw).map(Self)
            }

            /// Wrap a non-zero backend id
            pub fn from_non_zero(raw: NonZeroU32) -> Self {
                Self(raw)
            }

            /// Raw backend id
            pub fn raw(self) -> u32 {
                self.0.get()
            }

            /// Raw backend id as NonZeroU32
            pub fn non_zero(self) -> NonZeroU32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

native_handle!(
    /// Native buffer object
    BufferHandle
);
native_handle!(
    /// Native texture object
    TextureHandle
);
native_handle!(
    /// Native sampler object
    SamplerHandle
);
native_handle!(
    /// Native framebuffer object (never the default framebuffer)
    FramebufferHandle
);
native_handle!(
    /// Compiled native shader stage
    ShaderHandle
);
native_handle!(
    /// Linked native program
    ProgramHandle
);
native_handle!(
    /// Native vertex-binding object (vertex array)
    VertexArrayHandle
);

// ===== RENDER API =====

/// Graphics API a device implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderApi {
    None,
    OpenGL,
    Vulkan,
    DirectX12,
    Metal,
}

impl fmt::Display for RenderApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderApi::None => "None",
            RenderApi::OpenGL => "OpenGL",
            RenderApi::Vulkan => "Vulkan",
            RenderApi::DirectX12 => "DirectX12",
            RenderApi::Metal => "Metal",
        };
        f.write_str(name)
    }
}

// ===== DEVICE CAPABILITIES =====

/// Limits and optional features queried once from the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceCapabilities {
    /// Largest texture dimension
    pub max_texture_size: u32,
    /// Texture units usable by a program
    pub max_texture_units: u32,
    /// Vertex attribute locations
    pub max_vertex_attributes: u32,
    /// Default-block uniform locations
    pub max_uniform_locations: u32,
    /// Framebuffer color attachments
    pub max_color_attachments: u32,
    /// Max sampler anisotropy (1.0 when unsupported)
    pub max_anisotropy: f32,
    /// Compute shaders available
    pub supports_compute: bool,
    /// Geometry shaders available
    pub supports_geometry_shaders: bool,
    /// Tessellation available
    pub supports_tessellation: bool,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_size: 0,
            max_texture_units: 0,
            max_vertex_attributes: 0,
            max_uniform_locations: 0,
            max_color_attachments: 0,
            max_anisotropy: 1.0,
            supports_compute: false,
            supports_geometry_shaders: false,
            supports_tessellation: false,
        }
    }
}

// ===== FRAME STATE =====

/// Viewport rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport covering `width` x `height` from the origin
    pub fn full(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }
}

/// 2D rectangle (scissor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect2D {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// One combined clear of the bound framebuffer
///
/// Each `Some` field contributes its bit to the clear mask.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClearRequest {
    pub color: Option<Vec4>,
    pub depth: Option<f32>,
    pub stencil: Option<u32>,
}

impl ClearRequest {
    /// True when nothing would be cleared
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.depth.is_none() && self.stencil.is_none()
    }
}

// ===== UNIFORM VALUES =====

/// Value written to a default-block uniform location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

impl UniformValue {
    /// Short type name, used in logs
    pub fn type_name(&self) -> &'static str {
        match self {
            UniformValue::Float(_) => "float",
            UniformValue::Int(_) => "int",
            UniformValue::Vec2(_) => "vec2",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Vec4(_) => "vec4",
            UniformValue::Mat3(_) => "mat3",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

macro_rules! uniform_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for UniformValue {
                fn from(value: $ty) -> Self {
                    UniformValue::$variant(value)
                }
            }
        )*
    };
}

uniform_value_from!(
    f32 => Float,
    i32 => Int,
    Vec2 => Vec2,
    Vec3 => Vec3,
    Vec4 => Vec4,
    Mat3 => Mat3,
    Mat4 => Mat4,
);

// ===== DEVICE TRAIT =====

/// Graphics device (one per backend context)
///
/// The backend context must be current on the calling thread. Calls run in
/// order and return once the backend call has been issued.
pub trait GraphicsDevice: Send + Sync {
    /// API this device implements
    fn api(&self) -> RenderApi;

    /// Limits and features, queried at device creation
    fn capabilities(&self) -> DeviceCapabilities;

    // ===== FRAME =====

    /// Clear the bound framebuffer in one call
    fn clear(&self, request: &ClearRequest);

    /// Set the viewport
    fn set_viewport(&self, viewport: Viewport);

    /// Set the scissor rectangle
    fn set_scissor(&self, rect: Rect2D);

    // ===== BUFFERS =====

    /// Create a buffer of `size` bytes, optionally filled from `data`
    fn create_buffer(
        &self,
        kind: BufferKind,
        usage: BufferUsage,
        size: u64,
        data: Option<&[u8]>,
    ) -> Result<BufferHandle>;

    /// Overwrite `data.len()` bytes at `offset`
    fn write_buffer(&self, buffer: BufferHandle, kind: BufferKind, offset: u64, data: &[u8]) -> Result<()>;

    /// Read `len` bytes at `offset`
    fn read_buffer(&self, buffer: BufferHandle, kind: BufferKind, offset: u64, len: u64) -> Result<Vec<u8>>;

    /// Bind to (or clear) the target for `kind`
    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferHandle>);

    /// Bind a uniform or storage buffer to an indexed binding point
    fn bind_buffer_base(&self, kind: BufferKind, index: u32, buffer: Option<BufferHandle>);

    /// Release a buffer
    fn delete_buffer(&self, buffer: BufferHandle);

    // ===== TEXTURES & SAMPLERS =====

    /// Create a 2D texture with optional initial pixels
    fn create_texture_2d(&self, desc: &TextureDesc, data: Option<&[u8]>) -> Result<TextureHandle>;

    /// Bind a texture to a texture unit
    fn bind_texture(&self, slot: u32, texture: Option<TextureHandle>);

    /// Release a texture
    fn delete_texture(&self, texture: TextureHandle);

    /// Create a sampler object
    fn create_sampler(&self, desc: &SamplerDesc) -> Result<SamplerHandle>;

    /// Bind a sampler to a texture unit
    fn bind_sampler(&self, slot: u32, sampler: Option<SamplerHandle>);

    /// Release a sampler
    fn delete_sampler(&self, sampler: SamplerHandle);

    // ===== FRAMEBUFFERS =====

    /// Create a framebuffer from color textures and an optional depth texture
    ///
    /// Fails with `BackendError` if the result is incomplete.
    fn create_framebuffer(
        &self,
        colors: &[TextureHandle],
        depth: Option<(TextureHandle, AttachmentType)>,
    ) -> Result<FramebufferHandle>;

    /// Bind a framebuffer, `None` for the default one
    fn bind_framebuffer(&self, framebuffer: Option<FramebufferHandle>);

    /// Release a framebuffer
    fn delete_framebuffer(&self, framebuffer: FramebufferHandle);

    // ===== SHADERS & PROGRAMS =====

    /// Compile backend-native source for one stage
    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle>;

    /// Release a compiled stage
    fn delete_shader(&self, shader: ShaderHandle);

    /// Link compiled stages into a program
    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle>;

    /// Make a program current, `None` to unbind
    fn use_program(&self, program: Option<ProgramHandle>);

    /// Release a program
    fn delete_program(&self, program: ProgramHandle);

    /// Uniform location by name, -1 if the program has none
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32;

    /// Vertex attribute location by name, -1 if the program has none
    fn attribute_location(&self, program: ProgramHandle, name: &str) -> i32;

    /// Write a uniform of the current program
    fn set_uniform(&self, location: i32, value: &UniformValue);

    // ===== VERTEX ARRAYS =====

    /// Create a vertex-binding object
    fn create_vertex_array(&self) -> Result<VertexArrayHandle>;

    /// Bind a vertex-binding object, `None` to unbind
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);

    /// Attach a vertex buffer with its layout to a vertex array
    fn attach_vertex_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle, layout: &VertexLayout);

    /// Attach an index buffer to a vertex array
    fn attach_index_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle);

    /// Release a vertex array
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);

    // ===== FIXED FUNCTION =====

    /// Apply culling, fill mode, depth bias, clamp and scissor enable
    fn apply_rasterizer(&self, state: &RasterizerState);

    /// Apply depth test and stencil state
    fn apply_depth_stencil(&self, state: &DepthStencilState);

    /// Apply blend state for `attachment_count` color attachments
    fn apply_blend(&self, state: &BlendState, attachment_count: u32);

    // ===== DRAW =====

    /// Non-indexed draw
    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32);

    /// Indexed draw with 32-bit indices
    ///
    /// `byte_offset` locates the first index in the bound index buffer;
    /// `base_vertex` is added to every index.
    fn draw_elements(&self, topology: PrimitiveTopology, count: u32, byte_offset: u64, base_vertex: i32);
}
