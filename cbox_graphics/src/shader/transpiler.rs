/// SPIR-V to GLSL 420 core transpilation for the OpenGL backend
///
/// Resource bindings map one to one onto GL binding points. Compute shaders
/// need GLSL 430 and are emitted at that version.

use naga::back::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use crate::error::{ErrorKind, Result};
use crate::shader::{spirv, ShaderStage};
use crate::{gfx_debug, gfx_fail};

/// GLSL version for graphics stages
pub const GLSL_VERSION: u16 = 420;

/// Translate SPIR-V into GLSL source for `stage`
///
/// Output is deterministic for a given input.
///
/// # Errors
///
/// `InvalidFormat` if the bytecode is empty, is not valid SPIR-V, has no entry
/// point for `stage`, or cannot be expressed in GLSL.
pub fn transpile(bytecode: &[u32], stage: ShaderStage) -> Result<String> {
    let (module, naga_stage) = spirv::parse(bytecode, stage, "transpile")?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot transpile {} bytecode: {}", stage, e))?;

    let entry = spirv::entry_point(&module, naga_stage).ok_or_else(|| {
        gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot transpile {} bytecode: no {} entry point", stage, stage)
    })?;

    let binding_map: glsl::BindingMap = module
        .global_variables
        .iter()
        .filter_map(|(_, var)| var.binding.clone())
        .filter_map(|rb| u8::try_from(rb.binding).ok().map(|slot| (rb, slot)))
        .collect();

    let version = match stage {
        ShaderStage::Compute => glsl::Version::Desktop(430),
        _ => glsl::Version::Desktop(GLSL_VERSION),
    };
    let options = glsl::Options {
        version,
        writer_flags: glsl::WriterFlags::empty(),
        binding_map,
        zero_initialize_workgroup_memory: true,
    };
    let pipeline_options = glsl::PipelineOptions {
        shader_stage: naga_stage,
        entry_point: entry.name.clone(),
        multiview: None,
    };

    let mut source = String::new();
    {
        let mut writer = glsl::Writer::new(
            &mut source,
            &module,
            &info,
            &options,
            &pipeline_options,
            naga::proc::BoundsCheckPolicies::default(),
        )
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot transpile {} bytecode: {}", stage, e))?;

        writer
            .write()
            .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
                "Cannot transpile {} bytecode: {}", stage, e))?;
    }

    gfx_debug!("cbox::shader", "Transpiled {} shader to GLSL ({} bytes)", stage, source.len());
    Ok(source)
}

#[cfg(test)]
#[path = "transpiler_tests.rs"]
mod tests;
