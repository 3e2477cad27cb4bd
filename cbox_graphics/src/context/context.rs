/// Render context - the one live owner of a device and its configuration
///
/// At most one context exists per process. Building a second one while the
/// first is alive fails; dropping a context frees the slot. Components never
/// look the context up: they receive the device handle explicitly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use crate::command::{CommandBuffer, ValidationMode};
use crate::device::{GraphicsDevice, RenderApi};
use crate::error::{ErrorKind, Result};
use crate::shader::{CompileOptions, ShaderModule, ShaderModuleBuilder};
use crate::{gfx_fail, gfx_info};

// ===== INTERNAL STATE =====

/// Set while a RenderContext is alive
static CONTEXT_ACTIVE: AtomicBool = AtomicBool::new(false);

// ===== CONFIGURATION =====

/// Context configuration
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Requested graphics API
    pub api: RenderApi,
    /// Synchronize presentation with the display refresh
    pub vsync: bool,
    /// Samples per pixel of the window surface (0 = no multisampling)
    pub msaa_samples: u32,
    /// Policy for command buffers created by the context
    pub validation: ValidationMode,
    /// Options for shader modules created by the context
    pub compile_options: CompileOptions,
}

impl ContextConfig {
    /// Defaults for `api`: vsync on, no multisampling
    pub fn new(api: RenderApi) -> Self {
        Self {
            api,
            vsync: true,
            msaa_samples: 0,
            validation: ValidationMode::default(),
            compile_options: CompileOptions::default(),
        }
    }
}

// ===== RENDER CONTEXT =====

/// Owned render context
pub struct RenderContext {
    device: Arc<dyn GraphicsDevice>,
    config: ContextConfig,
}

impl RenderContext {
    /// Start configuring a context for `api`
    pub fn builder(api: RenderApi) -> RenderContextBuilder {
        RenderContextBuilder { config: ContextConfig::new(api) }
    }

    /// True while some context is alive
    pub fn is_active() -> bool {
        CONTEXT_ACTIVE.load(Ordering::Acquire)
    }

    pub fn device(&self) -> &Arc<dyn GraphicsDevice> {
        &self.device
    }

    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    pub fn compile_options(&self) -> &CompileOptions {
        &self.config.compile_options
    }

    /// New idle command buffer using the configured validation mode
    pub fn command_buffer(&self) -> CommandBuffer {
        CommandBuffer::new(&self.device, self.config.validation)
    }

    /// Shader module builder using the configured compile options
    pub fn shader_builder(&self) -> ShaderModuleBuilder {
        ShaderModule::builder(&self.device).options(self.config.compile_options.clone())
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        CONTEXT_ACTIVE.store(false, Ordering::Release);
        gfx_info!("cbox::context", "Render context released");
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext").field("config", &self.config).finish()
    }
}

/// Builder for [`RenderContext`]
pub struct RenderContextBuilder {
    config: ContextConfig,
}

impl RenderContextBuilder {
    pub fn vsync(mut self, enabled: bool) -> Self {
        self.config.vsync = enabled;
        self
    }

    /// Surface samples: 0 (off), 1, 2, 4, 8 or 16
    pub fn msaa_samples(mut self, samples: u32) -> Self {
        self.config.msaa_samples = samples;
        self
    }

    pub fn validation(mut self, mode: ValidationMode) -> Self {
        self.config.validation = mode;
        self
    }

    pub fn compile_options(mut self, options: CompileOptions) -> Self {
        self.config.compile_options = options;
        self
    }

    /// Create the context over an initialized device
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the API is not OpenGL
    /// - `InvalidState` if the device implements another API
    /// - `InvalidState` for an unsupported sample count
    /// - `InvalidState` while another context is alive
    pub fn build(self, device: &Arc<dyn GraphicsDevice>) -> Result<RenderContext> {
        let config = self.config;

        // ========== VALIDATION ==========
        if config.api != RenderApi::OpenGL {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::context",
                "Only OpenGL is currently supported (requested {})", config.api));
        }
        if device.api() != config.api {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::context",
                "Device implements {} but {} was requested", device.api(), config.api));
        }
        if !matches!(config.msaa_samples, 0 | 1 | 2 | 4 | 8 | 16) {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::context",
                "Unsupported MSAA sample count {}", config.msaa_samples));
        }

        // ========== CLAIM SLOT ==========
        if CONTEXT_ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::context",
                "A render context is already active"));
        }

        gfx_info!("cbox::context", "Render context created ({}, vsync={}, msaa={}, validation={:?})",
            config.api, config.vsync, config.msaa_samples, config.validation);

        Ok(RenderContext { device: device.clone(), config })
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
