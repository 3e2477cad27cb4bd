/// Linked shader programs
///
/// A [`ShaderModule`] owns one linked program. Building it runs every stage
/// through compile (GLSL to SPIR-V), transpile (SPIR-V to native GLSL), native
/// compile and, when requested, reflection. Stage objects only live until the
/// link completes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use crate::device::{GraphicsDevice, ProgramHandle, ShaderHandle, UniformValue};
use crate::error::{ErrorKind, Result};
use crate::shader::{
    compiler, reflection, transpiler, CompileOptions, ShaderParser, ShaderReflection, ShaderStage,
};
use crate::{gfx_debug, gfx_fail, gfx_info};

// ===== BUILD INPUTS =====

enum StageInput {
    Source(ShaderStage, String),
    Spirv(ShaderStage, Vec<u32>),
    File(ShaderStage, PathBuf),
    Combined(String),
}

/// One stage on its way to the linker
struct CompiledStage {
    stage: ShaderStage,
    spirv: Vec<u32>,
    native: Option<String>,
    reflection: Option<ShaderReflection>,
}

// ===== SHADER MODULE =====

#[derive(Default)]
struct UniformCache {
    program: Option<ProgramHandle>,
    locations: FxHashMap<String, i32>,
}

/// Linked shader program plus per-stage reflection
pub struct ShaderModule {
    device: Arc<dyn GraphicsDevice>,
    program: ProgramHandle,
    stages: Vec<ShaderStage>,
    reflections: FxHashMap<ShaderStage, ShaderReflection>,
    empty_reflection: ShaderReflection,
    uniform_cache: Mutex<UniformCache>,
}

impl ShaderModule {
    /// Start building a shader module with default compile options
    pub fn builder(device: &Arc<dyn GraphicsDevice>) -> ShaderModuleBuilder {
        ShaderModuleBuilder {
            device: device.clone(),
            options: CompileOptions::default(),
            inputs: Vec::new(),
            reflect: false,
        }
    }

    /// Make this program current
    pub fn bind(&self) {
        self.device.use_program(Some(self.program));
    }

    /// Clear the current program
    pub fn unbind(&self) {
        self.device.use_program(None);
    }

    /// Location of uniform `name`, -1 when the program has no such uniform
    ///
    /// Results (including -1) are cached per program.
    pub fn uniform_location(&self, name: &str) -> i32 {
        let mut cache = self.lock_cache();
        if cache.program != Some(self.program) {
            cache.locations.clear();
            cache.program = Some(self.program);
        }
        if let Some(&location) = cache.locations.get(name) {
            return location;
        }

        let location = self.device.uniform_location(self.program, name);
        if location < 0 {
            gfx_debug!("cbox::shader", "Uniform '{}' not found in program {}", name, self.program);
        }
        cache.locations.insert(name.to_string(), location);
        location
    }

    /// Write uniform `name` of this program, which must be current
    ///
    /// Returns false (and writes nothing) when the program has no such uniform.
    pub fn set_uniform(&self, name: &str, value: &UniformValue) -> bool {
        let location = self.uniform_location(name);
        if location < 0 {
            return false;
        }
        self.device.set_uniform(location, value);
        true
    }

    /// Location of vertex attribute `name`, -1 when unknown
    ///
    /// Asks the device first and falls back to vertex reflection.
    pub fn attribute_location(&self, name: &str) -> i32 {
        let location = self.device.attribute_location(self.program, name);
        if location >= 0 {
            return location;
        }
        self.reflection(ShaderStage::Vertex)
            .attribute_locations()
            .get(name)
            .map_or(-1, |&l| l as i32)
    }

    /// Reflection data for `stage` (empty when not reflected)
    pub fn reflection(&self, stage: ShaderStage) -> &ShaderReflection {
        self.reflections.get(&stage).unwrap_or(&self.empty_reflection)
    }

    /// Linked stages in the order they were added
    pub fn stages(&self) -> &[ShaderStage] {
        &self.stages
    }

    pub fn has_stage(&self, stage: ShaderStage) -> bool {
        self.stages.contains(&stage)
    }

    pub fn program(&self) -> ProgramHandle {
        self.program
    }

    fn lock_cache(&self) -> MutexGuard<'_, UniformCache> {
        self.uniform_cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for ShaderModule {
    fn drop(&mut self) {
        self.device.delete_program(self.program);
    }
}

impl std::fmt::Debug for ShaderModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderModule")
            .field("program", &self.program)
            .field("stages", &self.stages)
            .finish()
    }
}

// ===== BUILDER =====

/// Builder for [`ShaderModule`]
///
/// Adding stages never fails; every error surfaces from [`build`](Self::build).
pub struct ShaderModuleBuilder {
    device: Arc<dyn GraphicsDevice>,
    options: CompileOptions,
    inputs: Vec<StageInput>,
    reflect: bool,
}

impl ShaderModuleBuilder {
    /// Compile options used for every GLSL stage
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Add a GLSL 450 stage
    pub fn add_stage(mut self, stage: ShaderStage, source: impl Into<String>) -> Self {
        self.inputs.push(StageInput::Source(stage, source.into()));
        self
    }

    /// Add a stage from precompiled SPIR-V
    pub fn add_stage_spirv(mut self, stage: ShaderStage, words: impl Into<Vec<u32>>) -> Self {
        self.inputs.push(StageInput::Spirv(stage, words.into()));
        self
    }

    /// Add a GLSL 450 stage read from `path`
    pub fn add_stage_file(mut self, stage: ShaderStage, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(StageInput::File(stage, path.into()));
        self
    }

    /// Add every stage of a `#type`-sectioned source
    pub fn add_source(mut self, source: impl Into<String>) -> Self {
        self.inputs.push(StageInput::Combined(source.into()));
        self
    }

    /// Keep reflection data for every stage
    pub fn reflect(mut self, enabled: bool) -> Self {
        self.reflect = enabled;
        self
    }

    /// Compile, link and reflect all stages
    ///
    /// Either a linked module comes back or nothing does: stage objects
    /// compiled before a failure are deleted.
    ///
    /// # Errors
    ///
    /// - `InvalidState` with no stages or a stage added twice
    /// - `InvalidFormat` from compilation, transpilation or native compilation
    /// - `NotFound` / `AccessDenied` / `ReadError` for unreadable stage files
    /// - the device's error if linking fails
    pub fn build(self) -> Result<ShaderModule> {
        let sources = expand_inputs(self.inputs)?;

        if sources.is_empty() {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::shader",
                "Cannot build a shader module without stages"));
        }
        for (i, (stage, _)) in sources.iter().enumerate() {
            if sources[..i].iter().any(|(s, _)| s == stage) {
                return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::shader",
                    "Shader module has more than one {} stage", stage));
            }
        }

        // ========== COMPILE STAGES ==========
        let mut handles: Vec<ShaderHandle> = Vec::with_capacity(sources.len());
        let mut compiled: Vec<CompiledStage> = Vec::with_capacity(sources.len());

        for (stage, source) in sources {
            match compile_stage(&self.device, stage, source, &self.options, self.reflect) {
                Ok((handle, stage_data)) => {
                    handles.push(handle);
                    compiled.push(stage_data);
                }
                Err(err) => {
                    delete_shaders(&self.device, &handles);
                    crate::gfx_error!("cbox::shader", "Shader module build failed at {} stage: {}", stage, err);
                    return Err(err);
                }
            }
        }

        // ========== LINK ==========
        let linked = self.device.link_program(&handles);
        delete_shaders(&self.device, &handles);
        let program = linked.inspect_err(|err| {
            crate::gfx_error!("cbox::shader", "Shader program link failed: {}", err);
        })?;

        for c in &compiled {
            gfx_debug!("cbox::shader", "  {} stage: {} SPIR-V words, {} bytes native source",
                c.stage, c.spirv.len(), c.native.as_ref().map_or(0, String::len));
        }

        let stages: Vec<ShaderStage> = compiled.iter().map(|c| c.stage).collect();
        let reflections: FxHashMap<ShaderStage, ShaderReflection> = compiled
            .into_iter()
            .filter_map(|c| c.reflection.map(|r| (c.stage, r)))
            .collect();

        gfx_info!("cbox::shader", "Linked shader program {} ({})", program,
            stages.iter().map(|s| s.name()).collect::<Vec<_>>().join(", "));

        Ok(ShaderModule {
            device: self.device,
            program,
            stages,
            reflections,
            empty_reflection: ShaderReflection::default(),
            uniform_cache: Mutex::new(UniformCache::default()),
        })
    }
}

/// Stage source before SPIR-V generation
enum StageSource {
    Glsl(String),
    Spirv(Vec<u32>),
}

fn expand_inputs(inputs: Vec<StageInput>) -> Result<Vec<(ShaderStage, StageSource)>> {
    let mut sources = Vec::with_capacity(inputs.len());
    for input in inputs {
        match input {
            StageInput::Source(stage, glsl) => sources.push((stage, StageSource::Glsl(glsl))),
            StageInput::Spirv(stage, words) => sources.push((stage, StageSource::Spirv(words))),
            StageInput::File(stage, path) => {
                sources.push((stage, StageSource::Glsl(compiler::read_source(&path)?)));
            }
            StageInput::Combined(text) => {
                for section in ShaderParser::parse(&text)? {
                    sources.push((section.stage, StageSource::Glsl(section.source)));
                }
            }
        }
    }
    Ok(sources)
}

fn compile_stage(
    device: &Arc<dyn GraphicsDevice>,
    stage: ShaderStage,
    source: StageSource,
    options: &CompileOptions,
    reflect: bool,
) -> Result<(ShaderHandle, CompiledStage)> {
    let spirv = match source {
        StageSource::Glsl(glsl) => compiler::compile(&glsl, stage, options)?,
        StageSource::Spirv(words) => words,
    };

    let native = transpiler::transpile(&spirv, stage)?;
    let reflection = if reflect { Some(reflection::reflect(&spirv, stage)?) } else { None };
    let handle = device.compile_shader(stage, &native)?;

    Ok((handle, CompiledStage { stage, spirv, native: Some(native), reflection }))
}

fn delete_shaders(device: &Arc<dyn GraphicsDevice>, handles: &[ShaderHandle]) {
    for &handle in handles {
        device.delete_shader(handle);
    }
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
