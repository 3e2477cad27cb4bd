/// SPIR-V loading shared by the transpiler and reflection

use naga::front::spv;
use crate::error::{ErrorKind, Result};
use crate::gfx_fail;
use crate::shader::ShaderStage;

/// Parse SPIR-V words into a naga module
///
/// The coordinate space is kept as written. `action` names the caller in
/// error messages ("transpile", "reflect").
pub(crate) fn parse(bytecode: &[u32], stage: ShaderStage, action: &str) -> Result<(naga::Module, naga::ShaderStage)> {
    if bytecode.is_empty() {
        return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot {} empty {} bytecode", action, stage));
    }

    let naga_stage = stage.to_naga().ok_or_else(|| {
        gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot {} {} bytecode: stage not supported", action, stage)
    })?;

    let options = spv::Options {
        adjust_coordinate_space: false,
        strict_capabilities: false,
        block_ctx_dump_prefix: None,
    };
    let module = spv::Frontend::new(bytecode.iter().cloned(), &options)
        .parse()
        .map_err(|e| gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
            "Cannot {} {} bytecode: invalid SPIR-V ({})", action, stage, e))?;

    Ok((module, naga_stage))
}

/// Find the entry point for `stage`
pub(crate) fn entry_point(module: &naga::Module, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
    module.entry_points.iter().find(|ep| ep.stage == stage)
}
