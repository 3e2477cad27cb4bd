/// GLSL 450 to SPIR-V compilation
///
/// Front end, validation and SPIR-V emission all go through naga. Only stages
/// naga can express (vertex, fragment, compute) compile; the others fail with
/// `InvalidFormat`.

use std::path::Path;
use naga::back::spv;
use naga::AddressSpace;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use crate::error::{Error, ErrorKind, Result};
use crate::shader::ShaderStage;
use crate::{gfx_debug, gfx_fail, gfx_warn};

/// Options for [`compile`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Drop unreachable functions and types before emission
    pub optimize: bool,
    /// Embed the GLSL source in the SPIR-V (names are always kept)
    pub debug_info: bool,
    /// Treat warnings (unused resource declarations) as errors
    pub warnings_as_errors: bool,
    /// Entry point to emit
    pub entry_point: String,
    /// Preprocessor definitions, as if `#define NAME VALUE`
    pub defines: Vec<(String, String)>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            optimize: true,
            debug_info: false,
            warnings_as_errors: false,
            entry_point: "main".to_string(),
            defines: Vec::new(),
        }
    }
}

impl CompileOptions {
    /// Add a preprocessor definition
    pub fn define(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.defines.push((name.into(), value.into()));
        self
    }
}

/// Compile GLSL source for `stage` into SPIR-V words
///
/// # Errors
///
/// `InvalidFormat` for empty source, unsupported stages, parse or validation
/// errors (the diagnostic text is included), and a missing entry point.
pub fn compile(source: &str, stage: ShaderStage, options: &CompileOptions) -> Result<Vec<u32>> {
    if source.trim().is_empty() {
        return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot compile empty {} shader source", stage));
    }

    let naga_stage = stage.to_naga().ok_or_else(|| {
        gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "{} stage not supported by the shader compiler", stage)
    })?;

    let mut defines = naga::FastHashMap::default();
    for (name, value) in &options.defines {
        defines.insert(name.clone(), value.clone());
    }

    let mut frontend = naga::front::glsl::Frontend::default();
    let mut module = frontend
        .parse(&naga::front::glsl::Options { stage: naga_stage, defines }, source)
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "{} shader compilation failed:\n{}", stage, e.emit_to_string(source)))?;

    if !module.entry_points.iter().any(|ep| ep.stage == naga_stage && ep.name == options.entry_point) {
        return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "{} shader has no entry point '{}'", stage, options.entry_point));
    }

    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::all());
    let mut info = validator
        .validate(&module)
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "{} shader validation failed:\n{}", stage, e.emit_to_string(source)))?;

    let ep_index = module
        .entry_points
        .iter()
        .position(|ep| ep.stage == naga_stage && ep.name == options.entry_point)
        .unwrap_or_default();
    let unused = unused_resources(&module, info.get_entry_point(ep_index));
    if !unused.is_empty() {
        if options.warnings_as_errors {
            return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
                "{} shader declares unused resources: {}", stage, unused.join(", ")));
        }
        gfx_warn!("cbox::shader", "{} shader declares unused resources: {}", stage, unused.join(", "));
    }

    // Compaction requires a valid module and invalidates the module info
    if options.optimize {
        naga::compact::compact(&mut module, naga::compact::KeepUnused::No);
        info = validator
            .validate(&module)
            .map_err(|e| gfx_fail!(ErrorKind::BackendError, "cbox::shader",
                "{} shader invalid after compaction: {}", stage, e))?;
    }

    let debug_info = options.debug_info.then(|| spv::DebugInfo {
        source_code: source,
        file_name: "shader.glsl".into(),
        language: spv::SourceLanguage::GLSL,
    });
    let spv_options = spv::Options {
        // Names feed reflection, so they are emitted even without debug info
        flags: spv::WriterFlags::DEBUG | spv::WriterFlags::LABEL_VARYINGS,
        debug_info,
        ..spv::Options::default()
    };
    let pipeline_options = spv::PipelineOptions {
        shader_stage: naga_stage,
        entry_point: options.entry_point.clone(),
    };

    let words = spv::write_vec(&module, &info, &spv_options, Some(&pipeline_options))
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "{} shader SPIR-V emission failed: {}", stage, e))?;

    gfx_debug!("cbox::shader", "Compiled {} shader ({} words)", stage, words.len());
    Ok(words)
}

/// Names of resource globals the entry point never touches
fn unused_resources(module: &naga::Module, entry: &naga::valid::FunctionInfo) -> Vec<String> {
    module
        .global_variables
        .iter()
        .filter(|(_, var)| !matches!(var.space, AddressSpace::Private | AddressSpace::WorkGroup))
        .filter(|(handle, _)| entry[*handle].is_empty())
        .map(|(handle, var)| var.name.clone().unwrap_or_else(|| format!("global{}", handle.index())))
        .collect()
}

/// Read `path` and [`compile`] it
///
/// # Errors
///
/// `NotFound`, `AccessDenied` or `ReadError` when the file cannot be read,
/// otherwise as [`compile`].
pub fn compile_file(path: impl AsRef<Path>, stage: ShaderStage, options: &CompileOptions) -> Result<Vec<u32>> {
    let source = read_source(path.as_ref())?;
    compile(&source, stage, options)
}

/// Read a shader source file, mapping I/O failures to error kinds
pub(crate) fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        let err = Error::from_io(&e, path);
        crate::gfx_error!("cbox::shader", "{}", err);
        err
    })
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
