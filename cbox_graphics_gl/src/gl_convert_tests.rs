//! Unit tests for the core-to-GL enum conversions
//!
//! No context is needed: every function here only maps values.

use super::*;

// ============================================================================
// BUFFERS
// ============================================================================

#[test]
fn test_buffer_targets() {
    assert_eq!(buffer_target(BufferKind::Vertex), glow::ARRAY_BUFFER);
    assert_eq!(buffer_target(BufferKind::Index), glow::ELEMENT_ARRAY_BUFFER);
    assert_eq!(buffer_target(BufferKind::Uniform), glow::UNIFORM_BUFFER);
    assert_eq!(buffer_target(BufferKind::Storage), glow::SHADER_STORAGE_BUFFER);
}

#[test]
fn test_buffer_usage_hints() {
    assert_eq!(buffer_usage(BufferUsage::Static), glow::STATIC_DRAW);
    assert_eq!(buffer_usage(BufferUsage::Dynamic), glow::DYNAMIC_DRAW);
    assert_eq!(buffer_usage(BufferUsage::Stream), glow::STREAM_DRAW);
}

// ============================================================================
// TEXTURES
// ============================================================================

#[test]
fn test_srgb_only_changes_8_bit_color() {
    assert_eq!(texture_format(TextureFormat::RGBA8, false).internal, glow::RGBA8);
    assert_eq!(texture_format(TextureFormat::RGBA8, true).internal, glow::SRGB8_ALPHA8);
    assert_eq!(texture_format(TextureFormat::RGB8, true).internal, glow::SRGB8);
    assert_eq!(texture_format(TextureFormat::RGBA16F, true).internal, glow::RGBA16F);
    assert_eq!(texture_format(TextureFormat::R8, true).internal, glow::R8);
}

#[test]
fn test_float_formats_upload_as_float() {
    let half = texture_format(TextureFormat::RG16F, false);
    assert_eq!((half.format, half.ty), (glow::RG, glow::FLOAT));

    let full = texture_format(TextureFormat::RGB32F, false);
    assert_eq!(full, GlTextureFormat { internal: glow::RGB32F, format: glow::RGB, ty: glow::FLOAT });
}

#[test]
fn test_depth_formats() {
    assert_eq!(texture_format(TextureFormat::Depth24Stencil8, false), GlTextureFormat {
        internal: glow::DEPTH24_STENCIL8,
        format: glow::DEPTH_STENCIL,
        ty: glow::UNSIGNED_INT_24_8,
    });
    assert_eq!(texture_format(TextureFormat::Depth32F, false).format, glow::DEPTH_COMPONENT);
}

#[test]
fn test_min_filter_combines_mipmap_mode() {
    assert_eq!(min_filter(Filter::Linear, MipmapMode::Linear), glow::LINEAR_MIPMAP_LINEAR);
    assert_eq!(min_filter(Filter::Linear, MipmapMode::Nearest), glow::LINEAR_MIPMAP_NEAREST);
    assert_eq!(min_filter(Filter::Nearest, MipmapMode::Linear), glow::NEAREST_MIPMAP_LINEAR);
    assert_eq!(mag_filter(Filter::Nearest), glow::NEAREST);
}

#[test]
fn test_wrap_modes() {
    assert_eq!(wrap_mode(WrapMode::Repeat), glow::REPEAT);
    assert_eq!(wrap_mode(WrapMode::MirroredRepeat), glow::MIRRORED_REPEAT);
    assert_eq!(wrap_mode(WrapMode::ClampToEdge), glow::CLAMP_TO_EDGE);
    assert_eq!(wrap_mode(WrapMode::ClampToBorder), glow::CLAMP_TO_BORDER);
}

#[test]
fn test_depth_attachment_points() {
    assert_eq!(depth_attachment_point(AttachmentType::Color), None);
    assert_eq!(depth_attachment_point(AttachmentType::Depth), Some(glow::DEPTH_ATTACHMENT));
    assert_eq!(depth_attachment_point(AttachmentType::DepthStencil), Some(glow::DEPTH_STENCIL_ATTACHMENT));
}

// ============================================================================
// SHADERS, VERTEX INPUT, DRAW
// ============================================================================

#[test]
fn test_shader_types() {
    assert_eq!(shader_type(ShaderStage::Vertex), glow::VERTEX_SHADER);
    assert_eq!(shader_type(ShaderStage::Fragment), glow::FRAGMENT_SHADER);
    assert_eq!(shader_type(ShaderStage::Compute), glow::COMPUTE_SHADER);
    assert_eq!(shader_type(ShaderStage::TessEvaluation), glow::TESS_EVALUATION_SHADER);
}

#[test]
fn test_vertex_formats() {
    assert_eq!(vertex_format(VertexFormat::Float3), GlVertexFormat { size: 3, ty: glow::FLOAT, integer: false });
    assert_eq!(vertex_format(VertexFormat::Int2), GlVertexFormat { size: 2, ty: glow::INT, integer: true });
    assert_eq!(vertex_format(VertexFormat::UInt4), GlVertexFormat { size: 4, ty: glow::UNSIGNED_INT, integer: true });
}

#[test]
fn test_topologies() {
    assert_eq!(topology(PrimitiveTopology::PointList), glow::POINTS);
    assert_eq!(topology(PrimitiveTopology::LineStrip), glow::LINE_STRIP);
    assert_eq!(topology(PrimitiveTopology::TriangleList), glow::TRIANGLES);
    assert_eq!(topology(PrimitiveTopology::TriangleFan), glow::TRIANGLE_FAN);
}

// ============================================================================
// FIXED FUNCTION
// ============================================================================

#[test]
fn test_cull_none_disables_culling() {
    assert_eq!(cull_face(CullMode::None), None);
    assert_eq!(cull_face(CullMode::Back), Some(glow::BACK));
    assert_eq!(cull_face(CullMode::FrontAndBack), Some(glow::FRONT_AND_BACK));
}

#[test]
fn test_winding_and_fill() {
    assert_eq!(front_face(FrontFace::CounterClockwise), glow::CCW);
    assert_eq!(front_face(FrontFace::Clockwise), glow::CW);
    assert_eq!(polygon_mode(PolygonMode::Line), glow::LINE);
    assert_eq!(polygon_offset_cap(PolygonMode::Line), glow::POLYGON_OFFSET_LINE);
    assert_eq!(polygon_offset_cap(PolygonMode::Fill), glow::POLYGON_OFFSET_FILL);
}

#[test]
fn test_compare_ops() {
    assert_eq!(compare_op(CompareOp::Less), glow::LESS);
    assert_eq!(compare_op(CompareOp::LessOrEqual), glow::LEQUAL);
    assert_eq!(compare_op(CompareOp::NotEqual), glow::NOTEQUAL);
    assert_eq!(compare_op(CompareOp::GreaterOrEqual), glow::GEQUAL);
}

#[test]
fn test_stencil_ops_distinguish_clamp_and_wrap() {
    assert_eq!(stencil_op(StencilOp::IncrementAndClamp), glow::INCR);
    assert_eq!(stencil_op(StencilOp::IncrementAndWrap), glow::INCR_WRAP);
    assert_eq!(stencil_op(StencilOp::DecrementAndClamp), glow::DECR);
    assert_eq!(stencil_op(StencilOp::DecrementAndWrap), glow::DECR_WRAP);
}

#[test]
fn test_blend_mappings() {
    assert_eq!(blend_factor(BlendFactor::SrcAlpha), glow::SRC_ALPHA);
    assert_eq!(blend_factor(BlendFactor::OneMinusSrcAlpha), glow::ONE_MINUS_SRC_ALPHA);
    assert_eq!(blend_factor(BlendFactor::OneMinusConstantAlpha), glow::ONE_MINUS_CONSTANT_ALPHA);
    assert_eq!(blend_op(BlendOp::ReverseSubtract), glow::FUNC_REVERSE_SUBTRACT);
    assert_eq!(blend_op(BlendOp::Max), glow::MAX);
}

// ============================================================================
// DEBUG OUTPUT
// ============================================================================

#[test]
fn test_debug_severity_mapping() {
    assert_eq!(debug_severity(glow::DEBUG_SEVERITY_HIGH), LogSeverity::Error);
    assert_eq!(debug_severity(glow::DEBUG_SEVERITY_MEDIUM), LogSeverity::Warn);
    assert_eq!(debug_severity(glow::DEBUG_SEVERITY_LOW), LogSeverity::Info);
    assert_eq!(debug_severity(glow::DEBUG_SEVERITY_NOTIFICATION), LogSeverity::Debug);
}

#[test]
fn test_debug_type_names() {
    assert_eq!(debug_type_name(glow::DEBUG_TYPE_ERROR), "ERROR");
    assert_eq!(debug_type_name(glow::DEBUG_TYPE_PERFORMANCE), "PERFORMANCE");
    assert_eq!(debug_type_name(0), "OTHER");
}
