use super::*;
use crate::device::MockDevice;
use crate::shader::test_shaders::*;
use crate::shader::{compile, UniformType};

fn setup() -> (Arc<MockDevice>, Arc<dyn GraphicsDevice>) {
    let mock = Arc::new(MockDevice::new());
    let device: Arc<dyn GraphicsDevice> = mock.clone();
    (mock, device)
}

/// Raw handle returned by the recorded `compile_shader <stage> -> N` call
fn compiled_handle(mock: &MockDevice, stage: &str) -> u32 {
    let prefix = format!("compile_shader {} -> ", stage);
    mock.calls_matching(&prefix)[0][prefix.len()..].parse().unwrap()
}

// ============================================================================
// BUILD
// ============================================================================

#[test]
fn test_build_without_stages_fails() {
    let (mock, device) = setup();
    let err = ShaderModule::builder(&device).build().unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(mock.calls().is_empty());
}

#[test]
fn test_build_links_and_deletes_stage_objects() {
    let (mock, device) = setup();
    let module = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(ShaderStage::Fragment, SOLID_FS)
        .build()
        .unwrap();

    let vs = compiled_handle(&mock, "vertex");
    let fs = compiled_handle(&mock, "fragment");
    assert_eq!(mock.calls(), vec![
        format!("compile_shader vertex -> {}", vs),
        format!("compile_shader fragment -> {}", fs),
        format!("link_program [{}, {}] -> {}", vs, fs, module.program()),
        format!("delete_shader {}", vs),
        format!("delete_shader {}", fs),
    ]);
    assert_eq!(module.stages(), &[ShaderStage::Vertex, ShaderStage::Fragment]);
    assert!(module.has_stage(ShaderStage::Fragment));
    assert!(!module.has_stage(ShaderStage::Compute));
}

#[test]
fn test_device_receives_glsl_420() {
    let (mock, device) = setup();
    let _module = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .build()
        .unwrap();

    let handle = ShaderHandle::new(compiled_handle(&mock, "vertex")).unwrap();
    assert!(mock.shader_source(handle).unwrap().starts_with("#version 420 core"));
}

#[test]
fn test_native_compile_failure_deletes_earlier_stages() {
    let (mock, device) = setup();
    mock.fail_compile_on(ShaderStage::Fragment);

    let result = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(ShaderStage::Fragment, SOLID_FS)
        .build();

    assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidFormat);
    let vs = compiled_handle(&mock, "vertex");
    assert_eq!(mock.calls_matching("delete_shader"), vec![format!("delete_shader {}", vs)]);
    assert!(mock.calls_matching("link_program").is_empty());
}

#[test]
fn test_glsl_error_deletes_earlier_stages() {
    let (mock, device) = setup();

    let err = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(ShaderStage::Fragment, BROKEN_FS)
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(mock.calls_matching("delete_shader").len(), 1);
    assert_eq!(mock.calls_matching("compile_shader").len(), 1);
}

#[test]
fn test_link_failure_deletes_all_stages() {
    let (mock, device) = setup();
    mock.fail_link();

    let result = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(ShaderStage::Fragment, SOLID_FS)
        .build();

    assert!(result.is_err());
    assert_eq!(mock.calls_matching("delete_shader").len(), 2);
    assert!(mock.calls_matching("delete_program").is_empty());
}

#[test]
fn test_duplicate_stage_rejected() {
    let (mock, device) = setup();
    let err = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(ShaderStage::Vertex, PASSTHROUGH_VS)
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(mock.calls().is_empty());
}

#[test]
fn test_missing_stage_file() {
    let (mock, device) = setup();
    let err = ShaderModule::builder(&device)
        .add_stage_file(ShaderStage::Vertex, "/nonexistent/cbox/pass.vert")
        .build()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(mock.calls().is_empty());
}

#[test]
fn test_add_source_adds_every_section() {
    let (_mock, device) = setup();
    let module = ShaderModule::builder(&device).add_source(combined_source()).build().unwrap();
    assert_eq!(module.stages(), &[ShaderStage::Vertex, ShaderStage::Fragment]);
}

#[test]
fn test_add_stage_spirv() {
    let (mock, device) = setup();
    let words = compile(PASSTHROUGH_VS, ShaderStage::Vertex, &CompileOptions::default()).unwrap();

    let module = ShaderModule::builder(&device)
        .add_stage_spirv(ShaderStage::Vertex, words)
        .reflect(true)
        .build()
        .unwrap();

    assert_eq!(mock.calls_matching("compile_shader vertex").len(), 1);
    assert_eq!(module.reflection(ShaderStage::Vertex).attributes().len(), 1);
}

// ============================================================================
// REFLECTION
// ============================================================================

#[test]
fn test_passthrough_reflection() {
    let (_mock, device) = setup();
    let module = passthrough_module(&device);

    let vertex = module.reflection(ShaderStage::Vertex);
    assert_eq!(vertex.attributes().len(), 1);
    assert_eq!(vertex.attributes()[0].ty, UniformType::Vec3);
    assert!(vertex.uniforms().is_empty());
    assert!(module.reflection(ShaderStage::Fragment).is_empty());
    assert!(module.reflection(ShaderStage::Geometry).is_empty());
}

#[test]
fn test_reflection_off_by_default() {
    let (_mock, device) = setup();
    let module = ShaderModule::builder(&device)
        .add_stage(ShaderStage::Vertex, TEXTURED_VS)
        .build()
        .unwrap();

    assert!(module.reflection(ShaderStage::Vertex).is_empty());
}

// ============================================================================
// LOCATIONS
// ============================================================================

#[test]
fn test_uniform_location_is_cached() {
    let (mock, device) = setup();
    mock.set_uniform_location("u_mvp", 3);
    let module = passthrough_module(&device);

    assert_eq!(module.uniform_location("u_mvp"), 3);
    assert_eq!(module.uniform_location("u_mvp"), 3);
    assert_eq!(mock.calls_matching("uniform_location").len(), 1);
}

#[test]
fn test_unknown_uniform_caches_minus_one() {
    let (mock, device) = setup();
    let module = passthrough_module(&device);

    assert_eq!(module.uniform_location("u_missing"), -1);
    assert_eq!(module.uniform_location("u_missing"), -1);
    assert_eq!(mock.calls_matching("uniform_location").len(), 1);
}

#[test]
fn test_attribute_location_prefers_device() {
    let (mock, device) = setup();
    mock.set_attribute_location("a_position", 5);
    let module = passthrough_module(&device);

    assert_eq!(module.attribute_location("a_position"), 5);
}

#[test]
fn test_attribute_location_falls_back_to_reflection() {
    let (_mock, device) = setup();
    let module = passthrough_module(&device);

    assert_eq!(module.attribute_location("a_position"), 0);
    assert_eq!(module.attribute_location("a_normal"), -1);
}

// ============================================================================
// LIFETIME
// ============================================================================

#[test]
fn test_bind_unbind_and_drop() {
    let (mock, device) = setup();
    let module = passthrough_module(&device);
    let program = module.program();
    mock.clear_calls();

    module.bind();
    module.unbind();
    drop(module);

    assert_eq!(mock.calls(), vec![
        format!("use_program {}", program),
        "use_program 0".to_string(),
        format!("delete_program {}", program),
    ]);
}

#[test]
fn test_set_uniform_skips_unknown_names() {
    let (mock, device) = setup();
    mock.set_uniform_location("u_alpha", 2);
    let module = passthrough_module(&device);
    mock.clear_calls();

    assert!(module.set_uniform("u_alpha", &UniformValue::Float(0.5)));
    assert!(!module.set_uniform("u_beta", &UniformValue::Float(0.5)));

    assert_eq!(mock.calls_matching("set_uniform"), vec!["set_uniform 2 float"]);
}
