use super::*;
use crate::command::LoadOp;
use crate::device::MockDevice;
use crate::pipeline::{PrimitiveTopology, VertexFormat, VertexLayout};
use crate::resource::{BufferUsage, TextureFormat};
use crate::shader::test_shaders::passthrough_module;

fn setup() -> (Arc<MockDevice>, Arc<dyn GraphicsDevice>) {
    let mock = Arc::new(MockDevice::new());
    let device: Arc<dyn GraphicsDevice> = mock.clone();
    (mock, device)
}

fn pipeline(device: &Arc<dyn GraphicsDevice>, indexed: bool) -> Arc<PipelineState> {
    let mut builder = PipelineState::builder(device)
        .shader(passthrough_module(device))
        .topology(PrimitiveTopology::TriangleStrip);
    if indexed {
        let indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let ibo = Buffer::from_slice(device, BufferKind::Index, BufferUsage::Static, &indices).unwrap();
        builder = builder.index_buffer(Arc::new(ibo));
    }
    Arc::new(builder.build().unwrap())
}

fn recording(device: &Arc<dyn GraphicsDevice>, validation: ValidationMode) -> CommandBuffer {
    let mut cmd = CommandBuffer::new(device, validation);
    cmd.begin().unwrap();
    cmd
}

fn window_pass(device: &Arc<dyn GraphicsDevice>) -> RenderPass {
    RenderPass::builder(Arc::new(Framebuffer::default_target(device, 800, 600)))
        .build()
        .unwrap()
}

// ============================================================================
// RECORDING STATE
// ============================================================================

#[test]
fn test_default_validation_is_silent() {
    assert_eq!(ValidationMode::default(), ValidationMode::Silent);
}

#[test]
fn test_default_validation_skips_draw_without_pipeline() {
    let (mock, device) = setup();
    let mut cmd = CommandBuffer::new(&device, ValidationMode::default());

    assert!(cmd.draw(3, 0).is_ok());
    assert!(cmd.set_uniform_float("u_time", 1.0).is_ok());
    assert!(mock.calls().is_empty());
}

#[test]
fn test_begin_end() {
    let (_mock, device) = setup();
    let mut cmd = CommandBuffer::new(&device, ValidationMode::Report);

    assert!(!cmd.is_recording());
    cmd.begin().unwrap();
    assert!(cmd.is_recording());
    cmd.end().unwrap();
    assert!(!cmd.is_recording());
}

#[test]
fn test_commands_before_begin_are_forwarded() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, false);
    mock.clear_calls();

    let mut cmd = CommandBuffer::new(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline).unwrap();
    cmd.draw(3, 0).unwrap();

    assert!(!cmd.is_recording());
    assert_eq!(mock.calls().last().unwrap(), "draw_arrays TriangleStrip 0 3");
}

#[test]
fn test_end_without_begin() {
    let (_mock, device) = setup();

    let mut silent = CommandBuffer::new(&device, ValidationMode::Silent);
    assert!(silent.end().is_ok());

    let mut report = CommandBuffer::new(&device, ValidationMode::Report);
    let err = report.end().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(err.to_string().contains("not recording"));
}

#[test]
fn test_end_forgets_pipeline() {
    let (_mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline(&device, false)).unwrap();

    cmd.end().unwrap();
    cmd.begin().unwrap();

    assert!(cmd.pipeline().is_none());
    assert_eq!(cmd.draw(3, 0).unwrap_err().kind(), ErrorKind::InvalidState);
}

// ============================================================================
// RENDER PASS
// ============================================================================

#[test]
fn test_begin_render_pass_binds_and_clears_once() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);

    cmd.begin_render_pass(&window_pass(&device)).unwrap();

    assert_eq!(mock.calls(), vec![
        "bind_framebuffer 0",
        "set_viewport 0 0 800 600",
        "clear color depth",
    ]);
}

#[test]
fn test_begin_render_pass_clears_without_begin() {
    let (mock, device) = setup();
    let mut cmd = CommandBuffer::new(&device, ValidationMode::Silent);

    cmd.begin_render_pass(&window_pass(&device)).unwrap();

    assert!(!cmd.is_recording());
    assert_eq!(mock.calls_matching("clear"), vec!["clear color depth"]);
    assert!(cmd.active_framebuffer().is_some());
}

#[test]
fn test_load_pass_does_not_clear() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);
    let pass = RenderPass::builder(Arc::new(Framebuffer::default_target(&device, 64, 64)))
        .color_load_op(0, LoadOp::Load)
        .depth_load_op(LoadOp::Load)
        .build()
        .unwrap();

    cmd.begin_render_pass(&pass).unwrap();

    assert!(mock.calls_matching("clear").is_empty());
}

#[test]
fn test_offscreen_pass_binds_its_framebuffer() {
    let (mock, device) = setup();
    let framebuffer = Framebuffer::builder(&device, 256, 256)
        .color_attachment(crate::framebuffer::Attachment::color(TextureFormat::RGBA8).build().unwrap())
        .build()
        .unwrap();
    let handle = framebuffer.handle().unwrap();
    let pass = RenderPass::builder(Arc::new(framebuffer)).build().unwrap();
    let mut cmd = recording(&device, ValidationMode::Report);
    mock.clear_calls();

    cmd.begin_render_pass(&pass).unwrap();
    cmd.end_render_pass().unwrap();

    assert_eq!(mock.calls(), vec![
        format!("bind_framebuffer {}", handle),
        "set_viewport 0 0 256 256".to_string(),
        "clear color depth".to_string(),
        "bind_framebuffer 0".to_string(),
    ]);
    assert!(cmd.active_framebuffer().is_none());
}

#[test]
fn test_nested_render_pass_rejected() {
    let (_mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);
    let pass = window_pass(&device);

    cmd.begin_render_pass(&pass).unwrap();
    assert_eq!(cmd.begin_render_pass(&pass).unwrap_err().kind(), ErrorKind::InvalidState);
}

#[test]
fn test_end_closes_open_pass() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.begin_render_pass(&window_pass(&device)).unwrap();
    mock.clear_calls();

    cmd.end().unwrap();

    assert_eq!(mock.calls(), vec!["bind_framebuffer 0"]);
}

// ============================================================================
// DRAW
// ============================================================================

#[test]
fn test_draw_without_pipeline_is_silent_noop() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Silent);

    assert!(cmd.draw(3, 0).is_ok());
    assert!(cmd.draw_indexed(6, 0, 0).is_ok());
    assert!(mock.calls().is_empty());
}

#[test]
fn test_draw_without_pipeline_reported() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);

    let err = cmd.draw(3, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(err.to_string().contains("no pipeline bound"));
    assert!(mock.calls().is_empty());
}

#[test]
fn test_draw_uses_pipeline_topology() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, false);
    let mut cmd = recording(&device, ValidationMode::Report);

    cmd.set_pipeline(&pipeline).unwrap();
    cmd.draw(4, 2).unwrap();

    assert_eq!(mock.calls().last().unwrap(), "draw_arrays TriangleStrip 2 4");
}

#[test]
fn test_draw_indexed_forwards_vertex_offset() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, true);
    let mut cmd = recording(&device, ValidationMode::Report);

    cmd.set_pipeline(&pipeline).unwrap();
    cmd.draw_indexed(6, 3, -2).unwrap();

    assert_eq!(mock.calls().last().unwrap(), "draw_elements TriangleStrip 6 12 -2");
}

#[test]
fn test_draw_indexed_needs_index_buffer() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, false);
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline).unwrap();

    assert_eq!(cmd.draw_indexed(6, 0, 0).unwrap_err().kind(), ErrorKind::InvalidState);
    assert!(mock.calls_matching("draw_elements").is_empty());
}

#[test]
fn test_set_pipeline_binds() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, false);
    let mut cmd = recording(&device, ValidationMode::Report);
    mock.clear_calls();

    cmd.set_pipeline(&pipeline).unwrap();

    assert_eq!(mock.calls()[0], format!("use_program {}", pipeline.shader().program()));
    assert_eq!(mock.calls()[1], format!("bind_vertex_array {}", pipeline.vertex_array()));
    assert!(Arc::ptr_eq(cmd.pipeline().unwrap(), &pipeline));
}

#[test]
fn test_viewport_and_scissor_forwarded() {
    let (mock, device) = setup();
    let mut cmd = recording(&device, ValidationMode::Report);

    cmd.set_viewport(Viewport { x: 10, y: 20, width: 30, height: 40 }).unwrap();
    cmd.set_scissor(Rect2D { x: 1, y: 2, width: 3, height: 4 }).unwrap();

    assert_eq!(mock.calls(), vec!["set_viewport 10 20 30 40", "set_scissor 1 2 3 4"]);
}

// ============================================================================
// UNIFORMS & RESOURCES
// ============================================================================

#[test]
fn test_uniform_written_only_for_known_location() {
    let (mock, device) = setup();
    mock.set_uniform_location("u_tint", 4);
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline(&device, false)).unwrap();

    cmd.set_uniform_vec4("u_tint", Vec4::ONE).unwrap();
    cmd.set_uniform_mat4("u_missing", Mat4::IDENTITY).unwrap();

    assert_eq!(mock.calls_matching("set_uniform"), vec!["set_uniform 4 vec4"]);
}

#[test]
fn test_typed_uniform_setters() {
    let (mock, device) = setup();
    mock.set_uniform_location("u_value", 1);
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline(&device, false)).unwrap();

    cmd.set_uniform_float("u_value", 1.0).unwrap();
    cmd.set_uniform_int("u_value", 1).unwrap();
    cmd.set_uniform_vec2("u_value", Vec2::ONE).unwrap();
    cmd.set_uniform_vec3("u_value", Vec3::ONE).unwrap();
    cmd.set_uniform_mat3("u_value", Mat3::IDENTITY).unwrap();

    assert_eq!(mock.calls_matching("set_uniform"), vec![
        "set_uniform 1 float",
        "set_uniform 1 int",
        "set_uniform 1 vec2",
        "set_uniform 1 vec3",
        "set_uniform 1 mat3",
    ]);
}

#[test]
fn test_uniform_without_shader() {
    let (mock, device) = setup();
    mock.set_uniform_location("u_time", 0);

    let mut silent = recording(&device, ValidationMode::Silent);
    silent.set_uniform_float("u_time", 1.0).unwrap();
    assert!(mock.calls().is_empty());

    let mut report = recording(&device, ValidationMode::Report);
    let err = report.set_uniform_float("u_time", 1.0).unwrap_err();
    assert!(err.to_string().contains("no shader bound"));
}

#[test]
fn test_texture_and_sampler_binding() {
    let (mock, device) = setup();
    let texture = Texture2D::builder(&device, 4, 4, TextureFormat::RGBA8).build().unwrap();
    let sampler = Sampler::builder(&device).build().unwrap();
    let mut cmd = recording(&device, ValidationMode::Report);

    assert!(cmd.set_texture(0, &texture).is_err());
    cmd.set_pipeline(&pipeline(&device, false)).unwrap();
    mock.clear_calls();

    cmd.set_texture(2, &texture).unwrap();
    cmd.set_sampler(2, &sampler).unwrap();

    assert_eq!(mock.calls(), vec![
        format!("bind_texture 2 {}", texture.handle()),
        format!("bind_sampler 2 {}", sampler.handle()),
    ]);
}

#[test]
fn test_bind_uniform_buffer() {
    let (mock, device) = setup();
    let ubo = Buffer::builder(&device, BufferKind::Uniform).size(64).build().unwrap();
    let vbo = Buffer::builder(&device, BufferKind::Vertex).size(64).build().unwrap();
    let mut cmd = recording(&device, ValidationMode::Silent);

    cmd.bind_uniform_buffer(3, &ubo).unwrap();
    assert_eq!(cmd.bind_uniform_buffer(3, &vbo).unwrap_err().kind(), ErrorKind::InvalidState);

    assert_eq!(mock.calls_matching("bind_buffer_base"), vec![
        format!("bind_buffer_base Uniform 3 {}", ubo.handle()),
    ]);
}

#[test]
fn test_set_vertex_buffer_forwards_to_pipeline() {
    let (mock, device) = setup();
    let pipeline = pipeline(&device, false);
    let vertices: [f32; 3] = [0.0, 1.0, 2.0];
    let vbo = Arc::new(Buffer::from_slice(&device, BufferKind::Vertex, BufferUsage::Dynamic, &vertices).unwrap());
    let mut cmd = recording(&device, ValidationMode::Report);

    assert!(cmd.set_vertex_buffer(vbo.clone()).is_err());
    cmd.set_pipeline(&pipeline).unwrap();
    cmd.set_vertex_buffer(vbo.clone()).unwrap();

    assert!(Arc::ptr_eq(&pipeline.vertex_buffer().unwrap(), &vbo));
    assert_eq!(mock.calls_matching("attach_vertex_buffer").len(), 1);
}

// ============================================================================
// MESHES
// ============================================================================

fn quad_mesh(device: &Arc<dyn GraphicsDevice>) -> Mesh {
    let positions: [f32; 12] = [-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.5, 0.5, 0.0, -0.5, 0.5, 0.0];
    let indices: [u32; 6] = [0, 1, 2, 2, 3, 0];
    Mesh::builder()
        .vertex_buffer(Arc::new(Buffer::from_slice(device, BufferKind::Vertex, BufferUsage::Static, &positions).unwrap()))
        .index_buffer(Arc::new(Buffer::from_slice(device, BufferKind::Index, BufferUsage::Static, &indices).unwrap()))
        .vertex_layout(VertexLayout::builder().attribute(0, VertexFormat::Float3, 0, false).build().unwrap())
        .build()
        .unwrap()
}

#[test]
fn test_draw_mesh_attaches_and_draws_indices() {
    let (mock, device) = setup();
    let mesh = quad_mesh(&device);
    let pipeline = Arc::new(mesh.pipeline_builder(&device).shader(passthrough_module(&device)).build().unwrap());
    let mut cmd = recording(&device, ValidationMode::Report);
    cmd.set_pipeline(&pipeline).unwrap();
    mock.clear_calls();

    cmd.draw_mesh(&mesh).unwrap();

    assert_eq!(mock.calls_matching("attach_index_buffer").len(), 1);
    assert_eq!(mock.calls().last().unwrap(), "draw_elements TriangleList 6 0 0");
}

#[test]
fn test_draw_mesh_without_pipeline() {
    let (mock, device) = setup();
    let mesh = quad_mesh(&device);
    mock.clear_calls();

    let mut silent = recording(&device, ValidationMode::Silent);
    silent.draw_mesh(&mesh).unwrap();
    assert!(mock.calls().is_empty());

    let mut report = recording(&device, ValidationMode::Report);
    assert_eq!(report.draw_mesh(&mesh).unwrap_err().kind(), ErrorKind::InvalidState);
}

#[test]
fn test_draw_mesh_without_indices_draws_vertices() {
    let (mock, device) = setup();
    let positions: [f32; 6] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
    let mesh = Mesh::builder()
        .vertex_buffer(Arc::new(Buffer::from_slice(&device, BufferKind::Vertex, BufferUsage::Static, &positions).unwrap()))
        .vertex_layout(VertexLayout::builder().attribute(0, VertexFormat::Float3, 0, false).build().unwrap())
        .topology(PrimitiveTopology::LineList)
        .build()
        .unwrap();
    let pipeline = Arc::new(mesh.pipeline_builder(&device).shader(passthrough_module(&device)).build().unwrap());
    let mut cmd = CommandBuffer::new(&device, ValidationMode::Silent);
    cmd.set_pipeline(&pipeline).unwrap();

    cmd.draw_mesh(&mesh).unwrap();

    assert_eq!(mock.calls().last().unwrap(), "draw_arrays LineList 0 2");
}
