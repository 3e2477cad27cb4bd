use super::*;
use crate::shader::test_shaders::*;
use crate::shader::{compile, CompileOptions};

fn reflect_glsl(source: &str, stage: ShaderStage) -> ShaderReflection {
    let words = compile(source, stage, &CompileOptions::default()).unwrap();
    reflect(&words, stage).unwrap()
}

// ============================================================================
// ERRORS
// ============================================================================

#[test]
fn test_empty_bytecode_rejected() {
    let err = reflect(&[], ShaderStage::Vertex).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_garbage_bytecode_rejected() {
    let err = reflect(&[0xDEAD_BEEF, 0, 0, 0, 0], ShaderStage::Vertex).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}

#[test]
fn test_missing_stage_entry_point_is_backend_error() {
    let words = compile(SOLID_FS, ShaderStage::Fragment, &CompileOptions::default()).unwrap();
    let err = reflect(&words, ShaderStage::Vertex).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BackendError);
}

// ============================================================================
// VERTEX INPUTS
// ============================================================================

#[test]
fn test_passthrough_vertex_has_one_attribute() {
    let reflection = reflect_glsl(PASSTHROUGH_VS, ShaderStage::Vertex);

    assert_eq!(reflection.attributes().len(), 1);
    let attr = &reflection.attributes()[0];
    assert_eq!(attr.location, 0);
    assert_eq!(attr.name, "a_position");
    assert_eq!(attr.ty, UniformType::Vec3);
    assert_eq!(attr.offset, 0);
    assert!(reflection.uniforms().is_empty());
    assert!(reflection.samplers().is_empty());
}

#[test]
fn test_attributes_sorted_by_location() {
    let reflection = reflect_glsl(TEXTURED_VS, ShaderStage::Vertex);

    let names: Vec<_> = reflection.attributes().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["a_position", "a_uv"]);
    assert_eq!(reflection.attribute("a_uv").unwrap().ty, UniformType::Vec2);
    assert_eq!(reflection.attribute_locations().get("a_uv"), Some(&1));
}

#[test]
fn test_fragment_has_no_attributes() {
    let reflection = reflect_glsl(TEXTURED_FS, ShaderStage::Fragment);
    assert!(reflection.attributes().is_empty());
}

// ============================================================================
// UNIFORMS AND SAMPLERS
// ============================================================================

#[test]
fn test_push_constants_reflected_without_binding() {
    let reflection = reflect_glsl(TEXTURED_VS, ShaderStage::Vertex);

    let mvp = reflection.uniform("u_mvp").unwrap();
    assert_eq!(mvp.binding, None);
    assert_eq!(mvp.location, 0);
    assert_eq!(mvp.ty, UniformType::Mat4);
    assert_eq!(mvp.size, 64);

    let time = reflection.uniform("u_time").unwrap();
    assert_eq!(time.location, 1);
    assert_eq!(time.ty, UniformType::Float);
}

#[test]
fn test_uniform_block_members() {
    let reflection = reflect_glsl(TEXTURED_FS, ShaderStage::Fragment);

    let members: Vec<_> = reflection
        .uniforms()
        .iter()
        .map(|u| (u.name.as_str(), u.binding, u.location, u.ty, u.size))
        .collect();
    assert_eq!(members, vec![
        ("u_color", Some(0), 0, UniformType::Vec4, 16),
        ("u_light_dir", Some(0), 1, UniformType::Vec3, 12),
        ("u_mode", Some(0), 2, UniformType::Int, 4),
    ]);
    assert_eq!(reflection.uniform_locations().get("u_mode"), Some(&2));
}

#[test]
fn test_std140_block_reflects_its_members() {
    const CAMERA_VS: &str = r#"#version 450
layout(location = 0) in vec3 a_position;

layout(std140, set = 0, binding = 0) uniform Camera {
    mat4 u_view_proj;
} camera;

void main() {
    gl_Position = camera.u_view_proj * vec4(a_position, 1.0);
}
"#;
    let reflection = reflect_glsl(CAMERA_VS, ShaderStage::Vertex);

    assert_eq!(reflection.uniforms().len(), 1);
    let view_proj = reflection.uniform("u_view_proj").unwrap();
    assert_eq!(view_proj.binding, Some(0));
    assert_eq!(view_proj.location, 0);
    assert_eq!(view_proj.ty, UniformType::Mat4);
    assert!(reflection.uniform("member0").is_none());
}

#[test]
fn test_sampled_texture_reflected_by_binding() {
    let reflection = reflect_glsl(TEXTURED_FS, ShaderStage::Fragment);

    assert_eq!(reflection.samplers().len(), 1);
    let albedo = reflection.sampler("u_albedo").unwrap();
    assert_eq!(albedo.binding, 1);
    assert_eq!(albedo.ty, UniformType::Sampler2D);
    assert_eq!(reflection.sampler_bindings().get("u_albedo"), Some(&1));
    assert!(reflection.sampler("u_sampler").is_none());
}

#[test]
fn test_solid_fragment_reflection_is_empty() {
    assert!(reflect_glsl(SOLID_FS, ShaderStage::Fragment).is_empty());
}

#[test]
fn test_uniform_type_sizes() {
    assert_eq!(UniformType::Float.size(), 4);
    assert_eq!(UniformType::Bool.size(), 4);
    assert_eq!(UniformType::IVec2.size(), 8);
    assert_eq!(UniformType::Vec3.size(), 12);
    assert_eq!(UniformType::Mat3.size(), 36);
    assert_eq!(UniformType::Mat4.size(), 64);
    assert_eq!(UniformType::SamplerCube.size(), 0);
    assert_eq!(UniformType::None.size(), 0);
    assert!(UniformType::Sampler3D.is_sampler());
    assert!(!UniformType::Vec4.is_sampler());
}
