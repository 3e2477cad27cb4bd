/// OpenGL implementation of the GraphicsDevice trait
///
/// Wraps a loaded `glow::Context`. The GL context must be current on the thread
/// that calls into the device; every trait method issues the matching GL calls
/// in order and returns once they are submitted.

use std::fmt;
use std::os::raw::c_void;
use glow::HasContext;
use cbox_graphics::gfx::{ErrorKind, Result};
use cbox_graphics::gfx::device::{
    BufferHandle, ClearRequest, DeviceCapabilities, FramebufferHandle, GraphicsDevice,
    ProgramHandle, Rect2D, RenderApi, SamplerHandle, ShaderHandle, TextureHandle,
    UniformValue, VertexArrayHandle, Viewport,
};
use cbox_graphics::gfx::framebuffer::AttachmentType;
use cbox_graphics::gfx::pipeline::{
    BlendState, ColorWriteMask, DepthStencilState, PrimitiveTopology, RasterizerState, VertexLayout,
    MAX_BLEND_ATTACHMENTS,
};
use cbox_graphics::gfx::resource::{BufferKind, BufferUsage, SamplerDesc, TextureDesc};
use cbox_graphics::gfx::shader::ShaderStage;
use cbox_graphics::{gfx_bail, gfx_debug, gfx_err, gfx_error, gfx_fail, gfx_info, gfx_trace, gfx_warn};
use crate::gl_convert;
use crate::gl_debug;

const SOURCE: &str = "cbox::gl";

/// Lowest context version whose GLSL accepts `layout(binding = N)`
const MIN_GL_VERSION: (u32, u32) = (4, 2);

/// OpenGL graphics device
pub struct GlDevice {
    gl: glow::Context,
    capabilities: DeviceCapabilities,
    debug_output: bool,
}

impl GlDevice {
    /// Wrap a loaded context
    ///
    /// Checks the context version, queries capabilities once and, with the
    /// `gl-debug` feature, installs the KHR_debug callback.
    ///
    /// # Errors
    ///
    /// `BackendError` for OpenGL ES contexts or versions below 4.2.
    pub fn new(mut gl: glow::Context) -> Result<Self> {
        // ========== VALIDATION ==========
        let version = gl.version().clone();
        if version.is_embedded {
            gfx_bail!(SOURCE, "OpenGL ES contexts are not supported");
        }
        if (version.major, version.minor) < MIN_GL_VERSION {
            gfx_bail!(
                SOURCE,
                "OpenGL {}.{} or newer is required (context is {}.{})",
                MIN_GL_VERSION.0, MIN_GL_VERSION.1, version.major, version.minor
            );
        }

        let debug_output = cfg!(feature = "gl-debug") && unsafe { gl_debug::install(&mut gl) };
        let capabilities = unsafe { query_capabilities(&gl) };

        let renderer = unsafe { gl.get_parameter_string(glow::RENDERER) };
        gfx_info!(SOURCE, "OpenGL {}.{} device created ({})", version.major, version.minor, renderer);
        gfx_info!(SOURCE, "  Max texture size: {}", capabilities.max_texture_size);
        gfx_info!(SOURCE, "  Max texture units: {}", capabilities.max_texture_units);
        gfx_info!(SOURCE, "  Max vertex attributes: {}", capabilities.max_vertex_attributes);
        gfx_info!(SOURCE, "  Max anisotropy: {}", capabilities.max_anisotropy);
        gfx_info!(SOURCE, "  Compute shaders: {}", if capabilities.supports_compute { "yes" } else { "no" });

        Ok(Self { gl, capabilities, debug_output })
    }

    /// Load GL entry points with `loader` and wrap the resulting context
    ///
    /// # Safety
    ///
    /// A GL context must be current on the calling thread and `loader` must
    /// return entry points for it.
    pub unsafe fn from_loader_function<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&str) -> *const c_void,
    {
        Self::new(glow::Context::from_loader_function(loader))
    }

    /// Underlying glow context
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    /// True when driver messages are forwarded to the logger
    pub fn debug_output(&self) -> bool {
        self.debug_output
    }

    /// Driver messages forwarded since the callback was installed
    pub fn debug_stats(&self) -> gl_debug::DebugStats {
        gl_debug::debug_stats()
    }

    fn set_capability(&self, capability: u32, enabled: bool) {
        unsafe {
            if enabled {
                self.gl.enable(capability);
            } else {
                self.gl.disable(capability);
            }
        }
    }

    /// Look up `name` among the active uniforms by its trailing `.member` path
    ///
    /// Uniforms moved into generated blocks or structs keep their source name
    /// as the last path component.
    fn find_nested_uniform(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        let suffix = format!(".{}", name);
        unsafe {
            let count = self.gl.get_active_uniforms(program);
            (0..count)
                .filter_map(|index| self.gl.get_active_uniform(program, index))
                .find_map(|active| {
                    let base = active.name.strip_suffix("[0]").unwrap_or(&active.name);
                    if base.ends_with(&suffix) {
                        self.gl.get_uniform_location(program, base)
                    } else {
                        None
                    }
                })
        }
    }
}

impl fmt::Debug for GlDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.gl.version();
        f.debug_struct("GlDevice")
            .field("version", &format_args!("{}.{}", version.major, version.minor))
            .field("capabilities", &self.capabilities)
            .field("debug_output", &self.debug_output)
            .finish()
    }
}

// ===== CAPABILITIES =====

unsafe fn query_capabilities(gl: &glow::Context) -> DeviceCapabilities {
    let version = gl.version();
    let at_least = |major: u32, minor: u32| (version.major, version.minor) >= (major, minor);
    let extensions = gl.supported_extensions();

    let anisotropic = at_least(4, 6)
        || extensions.contains("GL_ARB_texture_filter_anisotropic")
        || extensions.contains("GL_EXT_texture_filter_anisotropic");
    let max_anisotropy = if anisotropic {
        gl.get_parameter_f32(glow::MAX_TEXTURE_MAX_ANISOTROPY).max(1.0)
    } else {
        1.0
    };

    let limit = |parameter: u32| gl.get_parameter_i32(parameter).max(0) as u32;

    DeviceCapabilities {
        max_texture_size: limit(glow::MAX_TEXTURE_SIZE),
        max_texture_units: limit(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
        max_vertex_attributes: limit(glow::MAX_VERTEX_ATTRIBS),
        max_uniform_locations: if at_least(4, 3) { limit(glow::MAX_UNIFORM_LOCATIONS) } else { 0 },
        max_color_attachments: limit(glow::MAX_COLOR_ATTACHMENTS),
        max_anisotropy,
        supports_compute: at_least(4, 3),
        supports_geometry_shaders: at_least(3, 2),
        supports_tessellation: at_least(4, 0),
    }
}

// ===== HANDLE CONVERSIONS =====

fn native_buffer(handle: BufferHandle) -> glow::Buffer {
    glow::NativeBuffer(handle.non_zero())
}

fn native_texture(handle: TextureHandle) -> glow::Texture {
    glow::NativeTexture(handle.non_zero())
}

fn native_sampler(handle: SamplerHandle) -> glow::Sampler {
    glow::NativeSampler(handle.non_zero())
}

fn native_framebuffer(handle: FramebufferHandle) -> glow::Framebuffer {
    glow::NativeFramebuffer(handle.non_zero())
}

fn native_shader(handle: ShaderHandle) -> glow::Shader {
    glow::NativeShader(handle.non_zero())
}

fn native_program(handle: ProgramHandle) -> glow::Program {
    glow::NativeProgram(handle.non_zero())
}

fn native_vertex_array(handle: VertexArrayHandle) -> glow::VertexArray {
    glow::NativeVertexArray(handle.non_zero())
}

/// Byte count or offset as the GLsizei/GLintptr glow expects
fn gl_size(value: u64, what: &str) -> Result<i32> {
    i32::try_from(value).map_err(|_| gfx_err!(SOURCE, "{} of {} bytes exceeds the GL limit", what, value))
}

/// Texture dimension checked against the device limit
fn gl_dimension(value: u32, max: u32) -> Result<i32> {
    if value > max {
        return Err(gfx_fail!(
            ErrorKind::InvalidState,
            SOURCE,
            "Texture dimension {} exceeds the device maximum {}",
            value,
            max
        ));
    }
    Ok(value as i32)
}

// ===== GRAPHICS DEVICE =====

impl GraphicsDevice for GlDevice {
    fn api(&self) -> RenderApi {
        RenderApi::OpenGL
    }

    fn capabilities(&self) -> DeviceCapabilities {
        self.capabilities
    }

    // ===== FRAME =====

    fn clear(&self, request: &ClearRequest) {
        let mut mask = 0;
        unsafe {
            if let Some(color) = request.color {
                self.gl.clear_color(color.x, color.y, color.z, color.w);
                mask |= glow::COLOR_BUFFER_BIT;
            }
            if let Some(depth) = request.depth {
                self.gl.clear_depth(f64::from(depth));
                mask |= glow::DEPTH_BUFFER_BIT;
            }
            if let Some(stencil) = request.stencil {
                self.gl.clear_stencil(stencil as i32);
                mask |= glow::STENCIL_BUFFER_BIT;
            }
            if mask != 0 {
                self.gl.clear(mask);
            }
        }
    }

    fn set_viewport(&self, viewport: Viewport) {
        unsafe {
            self.gl.viewport(viewport.x, viewport.y, viewport.width as i32, viewport.height as i32);
        }
    }

    fn set_scissor(&self, rect: Rect2D) {
        unsafe {
            self.gl.scissor(rect.x, rect.y, rect.width as i32, rect.height as i32);
        }
    }

    // ===== BUFFERS =====

    fn create_buffer(
        &self,
        kind: BufferKind,
        usage: BufferUsage,
        size: u64,
        data: Option<&[u8]>,
    ) -> Result<BufferHandle> {
        let gl_len = gl_size(size, "Buffer size")?;
        let usage_hint = gl_convert::buffer_usage(usage);

        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create buffer: {}", e))?;

            // Uploads go through the copy target so no VAO element binding is touched
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(buffer));
            match data {
                Some(bytes) if bytes.len() as u64 == size => {
                    self.gl.buffer_data_u8_slice(glow::COPY_WRITE_BUFFER, bytes, usage_hint);
                }
                Some(bytes) => {
                    self.gl.buffer_data_size(glow::COPY_WRITE_BUFFER, gl_len, usage_hint);
                    self.gl.buffer_sub_data_u8_slice(glow::COPY_WRITE_BUFFER, 0, bytes);
                }
                None => self.gl.buffer_data_size(glow::COPY_WRITE_BUFFER, gl_len, usage_hint),
            }
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);

            gfx_debug!(SOURCE, "Created {:?} buffer {} ({} bytes, {:?})", kind, buffer.0, size, usage);
            Ok(BufferHandle::from_non_zero(buffer.0))
        }
    }

    fn write_buffer(&self, buffer: BufferHandle, _kind: BufferKind, offset: u64, data: &[u8]) -> Result<()> {
        let offset = gl_size(offset, "Buffer offset")?;
        unsafe {
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, Some(native_buffer(buffer)));
            self.gl.buffer_sub_data_u8_slice(glow::COPY_WRITE_BUFFER, offset, data);
            self.gl.bind_buffer(glow::COPY_WRITE_BUFFER, None);
        }
        Ok(())
    }

    fn read_buffer(&self, buffer: BufferHandle, _kind: BufferKind, offset: u64, len: u64) -> Result<Vec<u8>> {
        let offset = gl_size(offset, "Buffer offset")?;
        let mut bytes = vec![0u8; gl_size(len, "Buffer read")? as usize];
        unsafe {
            self.gl.bind_buffer(glow::COPY_READ_BUFFER, Some(native_buffer(buffer)));
            self.gl.get_buffer_sub_data(glow::COPY_READ_BUFFER, offset, &mut bytes);
            self.gl.bind_buffer(glow::COPY_READ_BUFFER, None);
        }
        Ok(bytes)
    }

    fn bind_buffer(&self, kind: BufferKind, buffer: Option<BufferHandle>) {
        unsafe {
            self.gl.bind_buffer(gl_convert::buffer_target(kind), buffer.map(native_buffer));
        }
    }

    fn bind_buffer_base(&self, kind: BufferKind, index: u32, buffer: Option<BufferHandle>) {
        unsafe {
            self.gl.bind_buffer_base(gl_convert::buffer_target(kind), index, buffer.map(native_buffer));
        }
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        gfx_trace!(SOURCE, "Deleting buffer {}", buffer);
        unsafe {
            self.gl.delete_buffer(native_buffer(buffer));
        }
    }

    // ===== TEXTURES & SAMPLERS =====

    fn create_texture_2d(&self, desc: &TextureDesc, data: Option<&[u8]>) -> Result<TextureHandle> {
        let width = gl_dimension(desc.width, self.capabilities.max_texture_size)?;
        let height = gl_dimension(desc.height, self.capabilities.max_texture_size)?;
        let format = gl_convert::texture_format(desc.format, desc.srgb);
        let min_filter = if desc.mipmaps { glow::LINEAR_MIPMAP_LINEAR } else { glow::LINEAR };

        unsafe {
            let texture = self
                .gl
                .create_texture()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create texture: {}", e))?;

            let previous = self.gl.get_parameter_texture(glow::TEXTURE_BINDING_2D);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.internal as i32,
                width,
                height,
                0,
                format.format,
                format.ty,
                glow::PixelUnpackData::Slice(data),
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            if desc.mipmaps {
                self.gl.generate_mipmap(glow::TEXTURE_2D);
            } else {
                // Keeps the texture complete under mipmapped sampler filters
                self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAX_LEVEL, 0);
            }
            self.gl.bind_texture(glow::TEXTURE_2D, previous);

            gfx_debug!(
                SOURCE,
                "Created texture {} ({}x{}, {:?}{})",
                texture.0, desc.width, desc.height, desc.format,
                if desc.srgb { ", sRGB" } else { "" }
            );
            Ok(TextureHandle::from_non_zero(texture.0))
        }
    }

    fn bind_texture(&self, slot: u32, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + slot);
            self.gl.bind_texture(glow::TEXTURE_2D, texture.map(native_texture));
        }
    }

    fn delete_texture(&self, texture: TextureHandle) {
        gfx_trace!(SOURCE, "Deleting texture {}", texture);
        unsafe {
            self.gl.delete_texture(native_texture(texture));
        }
    }

    fn create_sampler(&self, desc: &SamplerDesc) -> Result<SamplerHandle> {
        unsafe {
            let sampler = self
                .gl
                .create_sampler()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create sampler: {}", e))?;

            let min_filter = gl_convert::min_filter(desc.min_filter, desc.mipmap_mode);
            let mag_filter = gl_convert::mag_filter(desc.mag_filter);
            self.gl.sampler_parameter_i32(sampler, glow::TEXTURE_MIN_FILTER, min_filter as i32);
            self.gl.sampler_parameter_i32(sampler, glow::TEXTURE_MAG_FILTER, mag_filter as i32);
            self.gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_S, gl_convert::wrap_mode(desc.wrap_u) as i32);
            self.gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_T, gl_convert::wrap_mode(desc.wrap_v) as i32);
            self.gl.sampler_parameter_i32(sampler, glow::TEXTURE_WRAP_R, gl_convert::wrap_mode(desc.wrap_w) as i32);
            self.gl.sampler_parameter_f32_slice(sampler, glow::TEXTURE_BORDER_COLOR, &desc.border_color.to_array());

            if let Some(level) = desc.effective_anisotropy() {
                if self.capabilities.max_anisotropy > 1.0 {
                    let level = level.min(self.capabilities.max_anisotropy);
                    self.gl.sampler_parameter_f32(sampler, glow::TEXTURE_MAX_ANISOTROPY, level);
                } else {
                    gfx_warn!(SOURCE, "Anisotropic filtering unavailable, ignoring level {}", level);
                }
            }

            gfx_debug!(SOURCE, "Created sampler {}", sampler.0);
            Ok(SamplerHandle::from_non_zero(sampler.0))
        }
    }

    fn bind_sampler(&self, slot: u32, sampler: Option<SamplerHandle>) {
        unsafe {
            self.gl.bind_sampler(slot, sampler.map(native_sampler));
        }
    }

    fn delete_sampler(&self, sampler: SamplerHandle) {
        gfx_trace!(SOURCE, "Deleting sampler {}", sampler);
        unsafe {
            self.gl.delete_sampler(native_sampler(sampler));
        }
    }

    // ===== FRAMEBUFFERS =====

    fn create_framebuffer(
        &self,
        colors: &[TextureHandle],
        depth: Option<(TextureHandle, AttachmentType)>,
    ) -> Result<FramebufferHandle> {
        // ========== VALIDATION ==========
        if colors.len() as u32 > self.capabilities.max_color_attachments {
            gfx_bail!(
                SOURCE,
                "{} color attachments requested, device supports {}",
                colors.len(),
                self.capabilities.max_color_attachments
            );
        }
        let depth_point = match depth {
            Some((texture, kind)) => match gl_convert::depth_attachment_point(kind) {
                Some(point) => Some((texture, point)),
                None => gfx_bail!(SOURCE, "A color attachment cannot be used as the depth attachment"),
            },
            None => None,
        };

        // ========== CREATION ==========
        unsafe {
            let framebuffer = self
                .gl
                .create_framebuffer()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create framebuffer: {}", e))?;

            let previous = self.gl.get_parameter_framebuffer(glow::FRAMEBUFFER_BINDING);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));

            let draw_buffers: Vec<u32> =
                (0..colors.len() as u32).map(|i| glow::COLOR_ATTACHMENT0 + i).collect();
            for (&texture, &attachment) in colors.iter().zip(&draw_buffers) {
                self.gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    attachment,
                    glow::TEXTURE_2D,
                    Some(native_texture(texture)),
                    0,
                );
            }
            if let Some((texture, point)) = depth_point {
                self.gl.framebuffer_texture_2d(
                    glow::FRAMEBUFFER,
                    point,
                    glow::TEXTURE_2D,
                    Some(native_texture(texture)),
                    0,
                );
            }

            if draw_buffers.is_empty() {
                // Depth-only target
                self.gl.draw_buffers(&[glow::NONE]);
                self.gl.read_buffer(glow::NONE);
            } else {
                self.gl.draw_buffers(&draw_buffers);
            }

            let status = self.gl.check_framebuffer_status(glow::FRAMEBUFFER);
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, previous);

            if status != glow::FRAMEBUFFER_COMPLETE {
                self.gl.delete_framebuffer(framebuffer);
                gfx_bail!(SOURCE, "Framebuffer is incomplete (status 0x{:04X})", status);
            }

            gfx_debug!(
                SOURCE,
                "Created framebuffer {} ({} color attachments, depth: {})",
                framebuffer.0,
                colors.len(),
                depth.is_some()
            );
            Ok(FramebufferHandle::from_non_zero(framebuffer.0))
        }
    }

    fn bind_framebuffer(&self, framebuffer: Option<FramebufferHandle>) {
        unsafe {
            self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer.map(native_framebuffer));
        }
    }

    fn delete_framebuffer(&self, framebuffer: FramebufferHandle) {
        gfx_trace!(SOURCE, "Deleting framebuffer {}", framebuffer);
        unsafe {
            self.gl.delete_framebuffer(native_framebuffer(framebuffer));
        }
    }

    // ===== SHADERS & PROGRAMS =====

    fn compile_shader(&self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        unsafe {
            let shader = self
                .gl
                .create_shader(gl_convert::shader_type(stage))
                .map_err(|e| gfx_err!(SOURCE, "Failed to create {} shader: {}", stage, e))?;

            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);

            if !self.gl.get_shader_compile_status(shader) {
                let info_log = self.gl.get_shader_info_log(shader);
                self.gl.delete_shader(shader);
                return Err(gfx_fail!(
                    ErrorKind::InvalidFormat,
                    SOURCE,
                    "Failed to compile {} shader: {}",
                    stage,
                    info_log.trim()
                ));
            }

            gfx_trace!(SOURCE, "Compiled {} shader {}", stage, shader.0);
            Ok(ShaderHandle::from_non_zero(shader.0))
        }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe {
            self.gl.delete_shader(native_shader(shader));
        }
    }

    fn link_program(&self, shaders: &[ShaderHandle]) -> Result<ProgramHandle> {
        unsafe {
            let program = self
                .gl
                .create_program()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create program: {}", e))?;

            for &shader in shaders {
                self.gl.attach_shader(program, native_shader(shader));
            }
            self.gl.link_program(program);
            for &shader in shaders {
                self.gl.detach_shader(program, native_shader(shader));
            }

            if !self.gl.get_program_link_status(program) {
                let info_log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(gfx_fail!(
                    ErrorKind::InvalidFormat,
                    SOURCE,
                    "Failed to link program: {}",
                    info_log.trim()
                ));
            }

            gfx_debug!(SOURCE, "Linked program {} from {} stages", program.0, shaders.len());
            Ok(ProgramHandle::from_non_zero(program.0))
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe {
            self.gl.use_program(program.map(native_program));
        }
    }

    fn delete_program(&self, program: ProgramHandle) {
        gfx_trace!(SOURCE, "Deleting program {}", program);
        unsafe {
            self.gl.delete_program(native_program(program));
        }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> i32 {
        let program = native_program(program);
        let exact = unsafe { self.gl.get_uniform_location(program, name) };
        exact
            .or_else(|| self.find_nested_uniform(program, name))
            .map_or(-1, |location| location.0 as i32)
    }

    fn attribute_location(&self, program: ProgramHandle, name: &str) -> i32 {
        unsafe {
            self.gl
                .get_attrib_location(native_program(program), name)
                .map_or(-1, |location| location as i32)
        }
    }

    fn set_uniform(&self, location: i32, value: &UniformValue) {
        if location < 0 {
            return;
        }
        let location = glow::NativeUniformLocation(location as u32);
        let location = Some(&location);

        unsafe {
            match *value {
                UniformValue::Float(v) => self.gl.uniform_1_f32(location, v),
                UniformValue::Int(v) => self.gl.uniform_1_i32(location, v),
                UniformValue::Vec2(v) => self.gl.uniform_2_f32(location, v.x, v.y),
                UniformValue::Vec3(v) => self.gl.uniform_3_f32(location, v.x, v.y, v.z),
                UniformValue::Vec4(v) => self.gl.uniform_4_f32(location, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => self.gl.uniform_matrix_3_f32_slice(location, false, &m.to_cols_array()),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, &m.to_cols_array()),
            }
        }
    }

    // ===== VERTEX ARRAYS =====

    fn create_vertex_array(&self) -> Result<VertexArrayHandle> {
        unsafe {
            let vertex_array = self
                .gl
                .create_vertex_array()
                .map_err(|e| gfx_err!(SOURCE, "Failed to create vertex array: {}", e))?;
            Ok(VertexArrayHandle::from_non_zero(vertex_array.0))
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array.map(native_vertex_array));
        }
    }

    fn attach_vertex_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle, layout: &VertexLayout) {
        let stride = layout.stride() as i32;
        unsafe {
            let previous = self.gl.get_parameter_vertex_array(glow::VERTEX_ARRAY_BINDING);
            self.gl.bind_vertex_array(Some(native_vertex_array(vertex_array)));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native_buffer(buffer)));

            for attribute in layout.attributes() {
                let format = gl_convert::vertex_format(attribute.format);
                self.gl.enable_vertex_attrib_array(attribute.location);
                if format.integer {
                    self.gl.vertex_attrib_pointer_i32(
                        attribute.location,
                        format.size,
                        format.ty,
                        stride,
                        attribute.offset as i32,
                    );
                } else {
                    self.gl.vertex_attrib_pointer_f32(
                        attribute.location,
                        format.size,
                        format.ty,
                        attribute.normalized,
                        stride,
                        attribute.offset as i32,
                    );
                }
            }

            self.gl.bind_vertex_array(previous);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn attach_index_buffer(&self, vertex_array: VertexArrayHandle, buffer: BufferHandle) {
        unsafe {
            let previous = self.gl.get_parameter_vertex_array(glow::VERTEX_ARRAY_BINDING);
            self.gl.bind_vertex_array(Some(native_vertex_array(vertex_array)));
            // Element binding is vertex-array state: it stays recorded after the unbind
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(native_buffer(buffer)));
            self.gl.bind_vertex_array(previous);
        }
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe {
            self.gl.delete_vertex_array(native_vertex_array(vertex_array));
        }
    }

    // ===== FIXED FUNCTION =====

    fn apply_rasterizer(&self, state: &RasterizerState) {
        unsafe {
            match gl_convert::cull_face(state.cull_mode) {
                Some(face) => {
                    self.gl.enable(glow::CULL_FACE);
                    self.gl.cull_face(face);
                }
                None => self.gl.disable(glow::CULL_FACE),
            }
            self.gl.front_face(gl_convert::front_face(state.front_face));
            self.gl.polygon_mode(glow::FRONT_AND_BACK, gl_convert::polygon_mode(state.polygon_mode));

            for cap in [glow::POLYGON_OFFSET_FILL, glow::POLYGON_OFFSET_LINE, glow::POLYGON_OFFSET_POINT] {
                self.gl.disable(cap);
            }
            if state.polygon_offset_enabled() {
                self.gl.enable(gl_convert::polygon_offset_cap(state.polygon_mode));
                self.gl.polygon_offset(state.depth_bias_slope, state.depth_bias);
            }
        }
        self.set_capability(glow::DEPTH_CLAMP, state.depth_clamp);
        self.set_capability(glow::SCISSOR_TEST, state.scissor_test);
    }

    fn apply_depth_stencil(&self, state: &DepthStencilState) {
        self.set_capability(glow::DEPTH_TEST, state.depth_test_enable);
        self.set_capability(glow::STENCIL_TEST, state.stencil_test_enable);
        unsafe {
            self.gl.depth_mask(state.depth_write_enable);
            self.gl.depth_func(gl_convert::compare_op(state.depth_compare_op));

            for (face, ops) in [(glow::FRONT, &state.front), (glow::BACK, &state.back)] {
                self.gl.stencil_func_separate(
                    face,
                    gl_convert::compare_op(ops.compare_op),
                    ops.reference as i32,
                    ops.compare_mask,
                );
                self.gl.stencil_op_separate(
                    face,
                    gl_convert::stencil_op(ops.fail_op),
                    gl_convert::stencil_op(ops.depth_fail_op),
                    gl_convert::stencil_op(ops.pass_op),
                );
                self.gl.stencil_mask_separate(face, ops.write_mask);
            }
        }
    }

    fn apply_blend(&self, state: &BlendState, attachment_count: u32) {
        let count = (attachment_count as usize).min(MAX_BLEND_ATTACHMENTS);
        unsafe {
            for (index, attachment) in state.attachments.iter().take(count).enumerate() {
                let draw_buffer = index as u32;
                if attachment.enabled {
                    self.gl.enable_draw_buffer(glow::BLEND, draw_buffer);
                    self.gl.blend_func_separate_draw_buffer(
                        draw_buffer,
                        gl_convert::blend_factor(attachment.src_color),
                        gl_convert::blend_factor(attachment.dst_color),
                        gl_convert::blend_factor(attachment.src_alpha),
                        gl_convert::blend_factor(attachment.dst_alpha),
                    );
                    self.gl.blend_equation_separate_draw_buffer(
                        draw_buffer,
                        gl_convert::blend_op(attachment.color_op),
                        gl_convert::blend_op(attachment.alpha_op),
                    );
                } else {
                    self.gl.disable_draw_buffer(glow::BLEND, draw_buffer);
                }
                let mask = attachment.write_mask;
                self.gl.color_mask_draw_buffer(
                    draw_buffer,
                    mask.contains(ColorWriteMask::R),
                    mask.contains(ColorWriteMask::G),
                    mask.contains(ColorWriteMask::B),
                    mask.contains(ColorWriteMask::A),
                );
            }

            let constants = state.blend_constants;
            self.gl.blend_color(constants.x, constants.y, constants.z, constants.w);
        }
    }

    // ===== DRAW =====

    fn draw_arrays(&self, topology: PrimitiveTopology, first: u32, count: u32) {
        unsafe {
            self.gl.draw_arrays(gl_convert::topology(topology), first as i32, count as i32);
        }
    }

    fn draw_elements(&self, topology: PrimitiveTopology, count: u32, byte_offset: u64, base_vertex: i32) {
        let Ok(offset) = i32::try_from(byte_offset) else {
            gfx_error!(SOURCE, "Index offset {} exceeds the GL limit, draw skipped", byte_offset);
            return;
        };
        unsafe {
            self.gl.draw_elements_base_vertex(
                gl_convert::topology(topology),
                count as i32,
                glow::UNSIGNED_INT,
                offset,
                base_vertex,
            );
        }
    }
}
