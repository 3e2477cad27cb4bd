/// Conversions from cbox core enums to OpenGL enums
///
/// Pure functions with no GL calls, so every mapping is unit-tested without a context.

use cbox_graphics::gfx::log::LogSeverity;
use cbox_graphics::gfx::framebuffer::AttachmentType;
use cbox_graphics::gfx::pipeline::{
    BlendFactor, BlendOp, CompareOp, CullMode, FrontFace, PolygonMode, PrimitiveTopology,
    StencilOp, VertexFormat, VertexScalar,
};
use cbox_graphics::gfx::resource::{
    BufferKind, BufferUsage, Filter, MipmapMode, TextureFormat, WrapMode,
};
use cbox_graphics::gfx::shader::ShaderStage;

/// Internal format, pixel format and pixel type for one texture upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlTextureFormat {
    pub internal: u32,
    pub format: u32,
    pub ty: u32,
}

/// Attribute size, component type and whether it uses the integer pointer path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GlVertexFormat {
    pub size: i32,
    pub ty: u32,
    pub integer: bool,
}

// ===== BUFFERS =====

pub(crate) fn buffer_target(kind: BufferKind) -> u32 {
    match kind {
        BufferKind::Vertex => glow::ARRAY_BUFFER,
        BufferKind::Index => glow::ELEMENT_ARRAY_BUFFER,
        BufferKind::Uniform => glow::UNIFORM_BUFFER,
        BufferKind::Storage => glow::SHADER_STORAGE_BUFFER,
    }
}

pub(crate) fn buffer_usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
        BufferUsage::Stream => glow::STREAM_DRAW,
    }
}

// ===== TEXTURES =====

/// Upload formats; `srgb` only affects RGB8 and RGBA8
pub(crate) fn texture_format(format: TextureFormat, srgb: bool) -> GlTextureFormat {
    let (internal, pixel_format, ty) = match format {
        TextureFormat::R8 => (glow::R8, glow::RED, glow::UNSIGNED_BYTE),
        TextureFormat::RG8 => (glow::RG8, glow::RG, glow::UNSIGNED_BYTE),
        TextureFormat::RGB8 if srgb => (glow::SRGB8, glow::RGB, glow::UNSIGNED_BYTE),
        TextureFormat::RGB8 => (glow::RGB8, glow::RGB, glow::UNSIGNED_BYTE),
        TextureFormat::RGBA8 if srgb => (glow::SRGB8_ALPHA8, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::RGBA8 => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE),
        TextureFormat::R16F => (glow::R16F, glow::RED, glow::FLOAT),
        TextureFormat::RG16F => (glow::RG16F, glow::RG, glow::FLOAT),
        TextureFormat::RGB16F => (glow::RGB16F, glow::RGB, glow::FLOAT),
        TextureFormat::RGBA16F => (glow::RGBA16F, glow::RGBA, glow::FLOAT),
        TextureFormat::R32F => (glow::R32F, glow::RED, glow::FLOAT),
        TextureFormat::RG32F => (glow::RG32F, glow::RG, glow::FLOAT),
        TextureFormat::RGB32F => (glow::RGB32F, glow::RGB, glow::FLOAT),
        TextureFormat::RGBA32F => (glow::RGBA32F, glow::RGBA, glow::FLOAT),
        TextureFormat::Depth24Stencil8 => {
            (glow::DEPTH24_STENCIL8, glow::DEPTH_STENCIL, glow::UNSIGNED_INT_24_8)
        }
        TextureFormat::Depth32F => (glow::DEPTH_COMPONENT32F, glow::DEPTH_COMPONENT, glow::FLOAT),
    };
    GlTextureFormat { internal, format: pixel_format, ty }
}

pub(crate) fn mag_filter(filter: Filter) -> u32 {
    match filter {
        Filter::Nearest => glow::NEAREST,
        Filter::Linear => glow::LINEAR,
    }
}

/// Minification filter combined with the between-level filter
pub(crate) fn min_filter(filter: Filter, mipmap: MipmapMode) -> u32 {
    match (filter, mipmap) {
        (Filter::Nearest, MipmapMode::Nearest) => glow::NEAREST_MIPMAP_NEAREST,
        (Filter::Nearest, MipmapMode::Linear) => glow::NEAREST_MIPMAP_LINEAR,
        (Filter::Linear, MipmapMode::Nearest) => glow::LINEAR_MIPMAP_NEAREST,
        (Filter::Linear, MipmapMode::Linear) => glow::LINEAR_MIPMAP_LINEAR,
    }
}

pub(crate) fn wrap_mode(mode: WrapMode) -> u32 {
    match mode {
        WrapMode::Repeat => glow::REPEAT,
        WrapMode::MirroredRepeat => glow::MIRRORED_REPEAT,
        WrapMode::ClampToEdge => glow::CLAMP_TO_EDGE,
        WrapMode::ClampToBorder => glow::CLAMP_TO_BORDER,
    }
}

/// Framebuffer attachment point for a depth-side attachment, `None` for color
pub(crate) fn depth_attachment_point(kind: AttachmentType) -> Option<u32> {
    match kind {
        AttachmentType::Color => None,
        AttachmentType::Depth => Some(glow::DEPTH_ATTACHMENT),
        AttachmentType::Stencil => Some(glow::STENCIL_ATTACHMENT),
        AttachmentType::DepthStencil => Some(glow::DEPTH_STENCIL_ATTACHMENT),
    }
}

// ===== SHADERS =====

pub(crate) fn shader_type(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Compute => glow::COMPUTE_SHADER,
        ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
        ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
    }
}

// ===== VERTEX INPUT & DRAW =====

pub(crate) fn vertex_format(format: VertexFormat) -> GlVertexFormat {
    let (ty, integer) = match format.scalar() {
        VertexScalar::Float => (glow::FLOAT, false),
        VertexScalar::Int => (glow::INT, true),
        VertexScalar::UInt => (glow::UNSIGNED_INT, true),
    };
    GlVertexFormat { size: format.component_count() as i32, ty, integer }
}

pub(crate) fn topology(topology: PrimitiveTopology) -> u32 {
    match topology {
        PrimitiveTopology::PointList => glow::POINTS,
        PrimitiveTopology::LineList => glow::LINES,
        PrimitiveTopology::LineStrip => glow::LINE_STRIP,
        PrimitiveTopology::TriangleList => glow::TRIANGLES,
        PrimitiveTopology::TriangleStrip => glow::TRIANGLE_STRIP,
        PrimitiveTopology::TriangleFan => glow::TRIANGLE_FAN,
    }
}

// ===== FIXED FUNCTION =====

/// Face passed to glCullFace, `None` when culling is off
pub(crate) fn cull_face(mode: CullMode) -> Option<u32> {
    match mode {
        CullMode::None => None,
        CullMode::Front => Some(glow::FRONT),
        CullMode::Back => Some(glow::BACK),
        CullMode::FrontAndBack => Some(glow::FRONT_AND_BACK),
    }
}

pub(crate) fn front_face(face: FrontFace) -> u32 {
    match face {
        FrontFace::CounterClockwise => glow::CCW,
        FrontFace::Clockwise => glow::CW,
    }
}

pub(crate) fn polygon_mode(mode: PolygonMode) -> u32 {
    match mode {
        PolygonMode::Fill => glow::FILL,
        PolygonMode::Line => glow::LINE,
        PolygonMode::Point => glow::POINT,
    }
}

/// Polygon-offset enable matching the fill mode
pub(crate) fn polygon_offset_cap(mode: PolygonMode) -> u32 {
    match mode {
        PolygonMode::Fill => glow::POLYGON_OFFSET_FILL,
        PolygonMode::Line => glow::POLYGON_OFFSET_LINE,
        PolygonMode::Point => glow::POLYGON_OFFSET_POINT,
    }
}

pub(crate) fn compare_op(op: CompareOp) -> u32 {
    match op {
        CompareOp::Never => glow::NEVER,
        CompareOp::Less => glow::LESS,
        CompareOp::Equal => glow::EQUAL,
        CompareOp::LessOrEqual => glow::LEQUAL,
        CompareOp::Greater => glow::GREATER,
        CompareOp::NotEqual => glow::NOTEQUAL,
        CompareOp::GreaterOrEqual => glow::GEQUAL,
        CompareOp::Always => glow::ALWAYS,
    }
}

pub(crate) fn stencil_op(op: StencilOp) -> u32 {
    match op {
        StencilOp::Keep => glow::KEEP,
        StencilOp::Zero => glow::ZERO,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::IncrementAndClamp => glow::INCR,
        StencilOp::DecrementAndClamp => glow::DECR,
        StencilOp::Invert => glow::INVERT,
        StencilOp::IncrementAndWrap => glow::INCR_WRAP,
        StencilOp::DecrementAndWrap => glow::DECR_WRAP,
    }
}

pub(crate) fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
    }
}

pub(crate) fn blend_op(op: BlendOp) -> u32 {
    match op {
        BlendOp::Add => glow::FUNC_ADD,
        BlendOp::Subtract => glow::FUNC_SUBTRACT,
        BlendOp::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        BlendOp::Min => glow::MIN,
        BlendOp::Max => glow::MAX,
    }
}

// ===== DEBUG OUTPUT =====

/// Logger severity for a KHR_debug message severity
pub(crate) fn debug_severity(severity: u32) -> LogSeverity {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Debug,
    }
}

/// Short label for a KHR_debug message type
pub(crate) fn debug_type_name(ty: u32) -> &'static str {
    match ty {
        glow::DEBUG_TYPE_ERROR => "ERROR",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "DEPRECATED",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "UNDEFINED",
        glow::DEBUG_TYPE_PORTABILITY => "PORTABILITY",
        glow::DEBUG_TYPE_PERFORMANCE => "PERFORMANCE",
        glow::DEBUG_TYPE_MARKER => "MARKER",
        _ => "OTHER",
    }
}

#[cfg(test)]
#[path = "gl_convert_tests.rs"]
mod tests;
