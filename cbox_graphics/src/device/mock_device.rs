/// Mock device for unit tests (no GPU required)
///
/// Records every backend call as a string, keeps buffer contents so data can be
/// read back, and hands out monotonically increasing non-zero handles.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use std::sync::atomic::{AtomicU32, Ordering};
#[cfg(test)]
use rustc_hash::FxHashMap;

#[cfg(test)]
use crate::device::{
    BufferHandle, ClearRequest, DeviceCapabilities, FramebufferHandle, GraphicsDevice,
    ProgramHandle, Rect2D, RenderApi, SamplerHandle, ShaderHandle, TextureHandle,
    UniformValue, VertexArrayHandle, Viewport,
};
#[cfg(test)]
use crate::error::Result;
#[cfg(test)]
use crate::framebuffer::AttachmentType;
#[cfg(test)]
use crate::pipeline::{BlendState, DepthStencilState, PrimitiveTopology, RasterizerState, VertexLayout};
#[cfg(test)]
use crate::resource::{BufferKind, BufferUsage, SamplerDesc, TextureDesc};
#[cfg(test)]
use crate::shader::ShaderStage;
#[cfg(test)]
use crate::gfx_bail;

// ============================================================================
// Mock Device
// ============================================================================

/// Recording device that tracks calls without a GPU
#[cfg(test)]
pub struct MockDevice {
    /// Recorded calls, in order
    pub calls: Arc<Mutex<Vec<String>>>,
    api: RenderApi,
    next_handle: AtomicU32,
    buffers: Mutex<FxHashMap<u32, Vec<u8>>>,
    shader_sources: Mutex<FxHashMap<u32, String>>,
    uniform_locations: Mutex<FxHashMap<String, i32>>,
    attribute_locations: Mutex<FxHashMap<String, i32>>,
    fail_compile: Mutex<Option<ShaderStage>>,
    fail_link: Mutex<bool>,
    fail_framebuffer: Mutex<bool>,
}

#[cfg(test)]
impl MockDevice {
    /// Create a mock OpenGL device
    pub fn new() -> Self {
        Self::with_api(RenderApi::OpenGL)
    }

    /// Create a mock device reporting `api`
    pub fn with_api(api: RenderApi) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            api,
            next_handle: AtomicU32::new(1),
            buffers: Mutex::new(FxHashMap::default()),
            shader_sources: Mutex::new(FxHashMap::default()),
            uniform_locations: Mutex::new(FxHashMap::default()),
            attribute_locations: Mutex::new(FxHashMap::default()),
            fail_compile: Mutex::new(None),
            fail_link: Mutex::new(false),
            fail_framebuffer: Mutex::new(false),
        }
    }

    /// Snapshot of recorded calls
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded calls starting with `prefix`
    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Make the next compile of `stage` fail
    pub fn fail_compile_on(&self, stage: ShaderStage) {
        *self.fail_compile.lock().unwrap() = Some(stage);
    }

    /// Make program linking fail
    pub fn fail_link(&self) {
        *self.fail_link.lock().unwrap() = true;
    }

    /// Make framebuffer creation report incompleteness
    pub fn fail_framebuffer(&self) {
        *self.fail_framebuffer.lock().unwrap() = true;
    }

    /// Register a uniform location for every program
    pub fn set_uniform_location(&self, name: &str, location: i32) {
        self.uniform_locations.lock().unwrap().insert(name.to_string(), location);
    }

    /// Register an attribute location for every program
    pub fn set_attribute_location(&self, name: &str, location: i32) {
        self.attribute_locations.lock().unwrap().insert(name.to_string(), location);
    }

    /// Source text handed to `compile_shader` for a handle
    pub fn shader_source(&self, shader: ShaderHandle) -> Option<String> {
        self.shader_sources.lock().unwrap().get(&shader.raw()).cloned()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_raw(&self) -> u32 {
        self.next_handle.fetch_add(1, Ordering::Relaxed)
    }
}

#[cfg(test)]
fn raw_or_zero(handle: Option<u32>) -> u32 {
    handle.unwrap_or(0)
}

#[cfg(test)]
impl GraphicsDevice for MockDevice {
    fn api(&self) -> RenderApi {
        self.api
    }

    fn capabilities(&self) -> DeviceCapabilities {
        DeviceCapabilities {
            max_texture_size: 4096,
            max_texture_units: 16,
            max_vertex_attributes: 16,
            max_uniform_locations: 1024,
            max_color_attachments: 8,
            max_anisotropy: 16.0,
            supports_compute: true,
            supports_geometry_shaders: true,
            supports_tessellation: true,
        }
    }

    fn clear(&self, request: &ClearRequest) {
        let mut call = String::from("clear");
        if request.color.is_some() {
            call.push_str(" color");
        }
        if request.depth.is_some() {
            call.push_str(" depth");
        }
        if request.stencil.is_some() {
            call.push_str(" stencil");
        }
        self.record(call);
    }

    fn set_viewport(&self, viewport: Viewport) {
        self.record(format!(
            "set_viewport {} {} {} {}",
            viewport.x, viewport.y, viewport.width, viewport.height
        ));
    }

    fn set_scissor(&self, rect: Rect2D) {
        self.record(format!("set_scissor {} {} {} {}", rect.x, rect.y, rect.width, rect.height));
    }

    fn create_buffer(
        &self,
        kind: BufferKind,
        usage: BufferUsage,
        size: u64,
        data: Option<&[u8]>,
    ) -> Result<BufferHandle> {
        let raw = self.next_raw();
        let mut contents = vec![0u8; size as usize];
        if let Some(data) = data {
            contents[..data.len()].copy_from_slice(data);
        }
        self.buffers.lock().unwrap().insert(raw, contents);
        self.record(format!("create_buffer {:?} {:?} {} -> {}", kind, usage, size, raw));
        BufferHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn write_buffer(&self, buffer: BufferHandle, _kind: BufferKind, offset: u64, data: &[u8]) -> Result<()> {
        self.record(format!("write_buffer {} {} {}", buffer, offset, data.len()));
        let mut buffers = self.buffers.lock().unwrap();
        let Some(contents) = buffers.get_mut(&buffer.raw()) else {
            gfx_bail!("cbox::mock", "write_buffer: unknown buffer {}", buffer);
        };
        let start = offset as usize;
        let end = start + data.len();
        if end > contents.len() {
            gfx_bail!("cbox::mock", "write_buffer: range {}..{} out of bounds", start, end);
        }
        contents[start..end].copy_from_slice(data);
        Ok(())
    }

    fn read_buffer(&self, buffer: BufferHandle, _kind: BufferKind, offset: u64, len: u64) -> Result<Vec<u8>> {
        self.record(format!("read_buffer {} {} {}", buffer, offset, len));
        let buffers = self.buffers.lock().unwrap();
        let Some(contents) = buffers.get(&buffer.raw()) else {
            gfx_bail!("cbox::mock", "read_buffer: unknown buffer {}", buffer);
        };
        let start = offset as usize;
        let end = start + len as usize;
        if end > contents.len() {
            gfx_bail!("cbox::mock", "read_buffer: range {}..{} out of bounds", start, end);
        }
        Ok(contents[start..end].to_vec())
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferHandle>) {
        self.record(format!("bind_buffer {:?} {}", kind, raw_or_zero(buffer.map(BufferHandle::raw))));
    }

    fn bind_buffer_base(&self, kind: BufferKind, index: u32, buffer: Option<BufferHandle>) {
        self.record(format!(
            "bind_buffer_base {:?} {} {}",
            kind,
            index,
            raw_or_zero(buffer.map(BufferHandle::raw))
        ));
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.buffers.lock().unwrap().remove(&buffer.raw());
        self.record(format!("delete_buffer {}", buffer));
    }

    fn create_texture_2d(&self, desc: &TextureDesc, _data: Option<&[u8]>) -> Result<TextureHandle> {
        let raw = self.next_raw();
        self.record(format!(
            "create_texture_2d {}x{} {:?} -> {}",
            desc.width, desc.height, desc.format, raw
        ));
        TextureHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn bind_texture(&self, slot: u32, texture: Option<TextureHandle>) {
        self.record(format!("bind_texture {} {}", slot, raw_or_zero(texture.map(TextureHandle::raw))));
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.record(format!("delete_texture {}", texture));
    }

    fn create_sampler(&self, _desc: &SamplerDesc) -> Result<SamplerHandle> {
        let raw = self.next_raw();
        self.record(format!("create_sampler -> {}", raw));
        SamplerHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn bind_sampler(&self, slot: u32, sampler: Option<SamplerHandle>) {
        self.record(format!("bind_sampler {} {}", slot, raw_or_zero(sampler.map(SamplerHandle::raw))));
    }

    fn delete_sampler(&self, sampler: SamplerHandle) {
        self.record(format!("delete_sampler {}", sampler));
    }

    fn create_framebuffer(
        &self,
        colors: &[TextureHandle],
        depth: Option<(TextureHandle, AttachmentType)>,
    ) -> Result<FramebufferHandle> {
        if *self.fail_framebuffer.lock().unwrap() {
            self.record("create_framebuffer incomplete".to_string());
            gfx_bail!("cbox::mock", "Framebuffer is not complete");
        }
        let raw = self.next_raw();
        self.record(format!(
            "create_framebuffer colors={} depth={} -> {}",
            colors.len(),
            depth.is_some(),
            raw
        ));
        FramebufferHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferHandle>) {
        self.record(format!(
            "bind_framebuffer {}",
            raw_or_zero(framebuffer.map(FramebufferHandle::raw))
        ));
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferHandle) {
        self.record(format!("delete_framebuffer {}", framebuffer));
    }

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        let should_fail = {
            let mut fail = self.fail_compile.lock().unwrap();
            if *fail == Some(stage) {
                *fail = None;
                true
            } else {
                false
            }
        };
        if should_fail {
            self.record(format!("compile_shader {} failed", stage));
            return Err(crate::error::Error::InvalidFormat(format!(
                "mock compile failure for {} stage",
                stage
            )));
        }

        let raw = self.next_raw();
        self.shader_sources.lock().unwrap().insert(raw, source.to_string());
        self.record(format!("compile_shader {} -> {}", stage, raw));
        ShaderHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.record(format!("delete_shader {}", shader));
    }

    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle> {
        let ids: Vec<u32> = shaders.iter().map(|s| s.raw()).collect();
        if *self.fail_link.lock().unwrap() {
            self.record(format!("link_program {:?} failed", ids));
            return Err(crate::error::Error::InvalidFormat("mock link failure".to_string()));
        }
        let raw = self.next_raw();
        self.record(format!("link_program {:?} -> {}", ids, raw));
        ProgramHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record(format!("use_program {}", raw_or_zero(program.map(ProgramHandle::raw))));
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.record(format!("delete_program {}", program));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32 {
        self.record(format!("uniform_location {} {}", program, name));
        self.uniform_locations.lock().unwrap().get(name).copied().unwrap_or(-1)
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> i32 {
        self.record(format!("attribute_location {} {}", program, name));
        self.attribute_locations.lock().unwrap().get(name).copied().unwrap_or(-1)
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        self.record(format!("set_uniform {} {}", location, value.type_name()));
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle> {
        let raw = self.next_raw();
        self.record(format!("create_vertex_array -> {}", raw));
        VertexArrayHandle::new(raw).ok_or(crate::error::Error::OutOfMemory)
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(format!(
            "bind_vertex_array {}",
            raw_or_zero(vertex_array.map(VertexArrayHandle::raw))
        ));
    }

    fn attach_vertex_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle, layout: &VertexLayout) {
        self.record(format!(
            "attach_vertex_buffer {} {} stride={}",
            vertex_array,
            buffer,
            layout.stride()
        ));
    }

    fn attach_index_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle) {
        self.record(format!("attach_index_buffer {} {}", vertex_array, buffer));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.record(format!("delete_vertex_array {}", vertex_array));
    }

    fn apply_rasterizer(&self, state: &RasterizerState) {
        self.record(format!(
            "apply_rasterizer cull={:?} fill={:?} offset={}",
            state.cull_mode,
            state.polygon_mode,
            state.polygon_offset_enabled()
        ));
    }

    fn apply_depth_stencil(&self, state: &DepthStencilState) {
        self.record(format!(
            "apply_depth_stencil test={} write={} stencil={}",
            state.depth_test_enable, state.depth_write_enable, state.stencil_test_enable
        ));
    }

    fn apply_blend(&self, _state: &BlendState, attachment_count: u32) {
        self.record(format!("apply_blend attachments={}", attachment_count));
    }

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        self.record(format!("draw_arrays {:?} {} {}", topology, first, count));
    }

    fn draw_elements(&self, topology: PrimitiveTopology, count: u32, byte_offset: u64, base_vertex: i32) {
        self.record(format!(
            "draw_elements {:?} {} {} {}",
            topology, count, byte_offset, base_vertex
        ));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_device_tests.rs"]
mod tests;
