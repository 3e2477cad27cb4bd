/// Shader reflection: vertex inputs, uniform members and samplers read back from SPIR-V

use rustc_hash::FxHashMap;
use naga::{AddressSpace, Binding, ImageClass, ImageDimension, ScalarKind, TypeInner, VectorSize};
use crate::error::{ErrorKind, Result};
use crate::shader::{spirv, ShaderStage};
use crate::{gfx_debug, gfx_fail};

/// Closed set of reflected types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UniformType {
    /// Shape with no mapping (arrays, non-square matrices, 1D images...)
    #[default]
    None,
    Float,
    Int,
    Vec2,
    Vec3,
    Vec4,
    IVec2,
    IVec3,
    IVec4,
    Mat3,
    Mat4,
    Bool,
    Sampler2D,
    SamplerCube,
    Sampler3D,
}

impl UniformType {
    /// Byte size of one value (0 for samplers and `None`)
    pub fn size(self) -> u32 {
        match self {
            UniformType::Float | UniformType::Int | UniformType::Bool => 4,
            UniformType::Vec2 | UniformType::IVec2 => 8,
            UniformType::Vec3 | UniformType::IVec3 => 12,
            UniformType::Vec4 | UniformType::IVec4 => 16,
            UniformType::Mat3 => 36,
            UniformType::Mat4 => 64,
            UniformType::None
            | UniformType::Sampler2D
            | UniformType::SamplerCube
            | UniformType::Sampler3D => 0,
        }
    }

    pub fn is_sampler(self) -> bool {
        matches!(self, UniformType::Sampler2D | UniformType::SamplerCube | UniformType::Sampler3D)
    }
}

/// Vertex stage input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub location: u32,
    pub name: String,
    pub ty: UniformType,
    /// Always 0; offsets belong to the vertex layout
    pub offset: u32,
}

/// Member of a uniform block or push-constant block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformInfo {
    /// Block binding, `None` for push constants
    pub binding: Option<u32>,
    /// Member index inside the block
    pub location: u32,
    pub name: String,
    pub ty: UniformType,
    pub size: u32,
}

/// Sampled image binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerInfo {
    pub binding: u32,
    pub name: String,
    pub ty: UniformType,
}

/// Reflection data for one stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderReflection {
    attributes: Vec<AttributeInfo>,
    uniforms: Vec<UniformInfo>,
    samplers: Vec<SamplerInfo>,
    uniform_locations: FxHashMap<String, u32>,
    sampler_bindings: FxHashMap<String, u32>,
    attribute_locations: FxHashMap<String, u32>,
}

impl ShaderReflection {
    /// Vertex inputs ordered by location (empty for non-vertex stages)
    pub fn attributes(&self) -> &[AttributeInfo] {
        &self.attributes
    }

    /// Uniform members in block order
    pub fn uniforms(&self) -> &[UniformInfo] {
        &self.uniforms
    }

    /// Samplers ordered by binding
    pub fn samplers(&self) -> &[SamplerInfo] {
        &self.samplers
    }

    pub fn uniform_locations(&self) -> &FxHashMap<String, u32> {
        &self.uniform_locations
    }

    pub fn sampler_bindings(&self) -> &FxHashMap<String, u32> {
        &self.sampler_bindings
    }

    pub fn attribute_locations(&self) -> &FxHashMap<String, u32> {
        &self.attribute_locations
    }

    pub fn uniform(&self, name: &str) -> Option<&UniformInfo> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    pub fn sampler(&self, name: &str) -> Option<&SamplerInfo> {
        self.samplers.iter().find(|s| s.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// True when nothing was reflected
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.uniforms.is_empty() && self.samplers.is_empty()
    }

    fn push_attribute(&mut self, location: u32, name: String, ty: UniformType) {
        self.attribute_locations.insert(name.clone(), location);
        self.attributes.push(AttributeInfo { location, name, ty, offset: 0 });
    }

    fn push_uniform(&mut self, binding: Option<u32>, location: u32, name: String, ty: UniformType) {
        self.uniform_locations.insert(name.clone(), location);
        self.uniforms.push(UniformInfo { binding, location, name, ty, size: ty.size() });
    }

    fn push_sampler(&mut self, binding: u32, name: String, ty: UniformType) {
        self.sampler_bindings.insert(name.clone(), binding);
        self.samplers.push(SamplerInfo { binding, name, ty });
    }
}

/// Extract reflection data from SPIR-V for `stage`
///
/// # Errors
///
/// - `InvalidFormat` on empty or unparseable bytecode
/// - `BackendError` when the module has no entry point for `stage`
pub fn reflect(bytecode: &[u32], stage: ShaderStage) -> Result<ShaderReflection> {
    let (module, naga_stage) = spirv::parse(bytecode, stage, "reflect")?;
    let entry = spirv::entry_point(&module, naga_stage).ok_or_else(|| {
        gfx_fail!(ErrorKind::BackendError, "cbox::shader",
            "Reflection failed: no {} entry point in module", stage)
    })?;

    let mut reflection = ShaderReflection::default();

    // ========== VERTEX INPUTS ==========
    if stage == ShaderStage::Vertex {
        let mut inputs = Vec::new();
        for (index, arg) in entry.function.arguments.iter().enumerate() {
            match arg.binding {
                Some(Binding::Location { location, .. }) => {
                    let name = arg.name.clone().unwrap_or_else(|| format!("input{}", index));
                    inputs.push((location, name, map_type(&module, arg.ty)));
                }
                Some(Binding::BuiltIn(_)) => {}
                None => {
                    if let TypeInner::Struct { ref members, .. } = module.types[arg.ty].inner {
                        for member in members {
                            if let Some(Binding::Location { location, .. }) = member.binding {
                                let name = member.name.clone().unwrap_or_else(|| format!("input{}", location));
                                inputs.push((location, name, map_type(&module, member.ty)));
                            }
                        }
                    }
                }
            }
        }
        inputs.sort_by_key(|(location, _, _)| *location);
        for (location, name, ty) in inputs {
            reflection.push_attribute(location, name, ty);
        }
    }

    // ========== UNIFORM BLOCKS AND PUSH CONSTANTS ==========
    for (_, var) in module.global_variables.iter() {
        let binding = match var.space {
            AddressSpace::Uniform => var.binding.as_ref().map(|rb| rb.binding),
            AddressSpace::PushConstant => None,
            _ => continue,
        };

        let block_ty = unwrap_block(&module, var.ty);
        match module.types[block_ty].inner {
            TypeInner::Struct { ref members, .. } => {
                for (index, member) in members.iter().enumerate() {
                    let name = member.name.clone().unwrap_or_else(|| format!("member{}", index));
                    reflection.push_uniform(binding, index as u32, name, map_type(&module, member.ty));
                }
            }
            _ => {
                let name = var.name.clone().unwrap_or_default();
                reflection.push_uniform(binding, 0, name, map_type(&module, block_ty));
            }
        }
    }

    // ========== SAMPLED IMAGES ==========
    let mut samplers = Vec::new();
    for (_, var) in module.global_variables.iter() {
        if var.space != AddressSpace::Handle {
            continue;
        }
        let Some(ref rb) = var.binding else { continue };
        if let TypeInner::Image { class: ImageClass::Sampled { .. } | ImageClass::Depth { .. }, .. } =
            module.types[var.ty].inner
        {
            let name = var.name.clone().unwrap_or_else(|| format!("binding{}", rb.binding));
            samplers.push((rb.binding, name, map_type(&module, var.ty)));
        }
    }
    samplers.sort_by_key(|(binding, _, _)| *binding);
    for (binding, name, ty) in samplers {
        reflection.push_sampler(binding, name, ty);
    }

    gfx_debug!("cbox::shader", "Reflected {} shader: {} attributes, {} uniforms, {} samplers",
        stage, reflection.attributes.len(), reflection.uniforms.len(), reflection.samplers.len());
    Ok(reflection)
}

/// Strip the single-member wrapper struct SPIR-V emission puts around block globals
///
/// The wrapper's only member is unnamed; a block whose one member is a named
/// struct is left as written.
fn unwrap_block(module: &naga::Module, ty: naga::Handle<naga::Type>) -> naga::Handle<naga::Type> {
    match module.types[ty].inner {
        TypeInner::Struct { ref members, .. } if members.len() == 1 && members[0].name.is_none() => {
            members[0].ty
        }
        _ => ty,
    }
}

fn map_type(module: &naga::Module, ty: naga::Handle<naga::Type>) -> UniformType {
    match module.types[ty].inner {
        TypeInner::Scalar(scalar) => match scalar.kind {
            ScalarKind::Float => UniformType::Float,
            ScalarKind::Sint | ScalarKind::Uint => UniformType::Int,
            ScalarKind::Bool => UniformType::Bool,
            _ => UniformType::None,
        },
        TypeInner::Vector { size, scalar } => match (scalar.kind, size) {
            (ScalarKind::Float, VectorSize::Bi) => UniformType::Vec2,
            (ScalarKind::Float, VectorSize::Tri) => UniformType::Vec3,
            (ScalarKind::Float, VectorSize::Quad) => UniformType::Vec4,
            (ScalarKind::Sint | ScalarKind::Uint, VectorSize::Bi) => UniformType::IVec2,
            (ScalarKind::Sint | ScalarKind::Uint, VectorSize::Tri) => UniformType::IVec3,
            (ScalarKind::Sint | ScalarKind::Uint, VectorSize::Quad) => UniformType::IVec4,
            _ => UniformType::None,
        },
        TypeInner::Matrix { columns, rows, .. } => match (columns, rows) {
            (VectorSize::Tri, VectorSize::Tri) => UniformType::Mat3,
            (VectorSize::Quad, VectorSize::Quad) => UniformType::Mat4,
            _ => UniformType::None,
        },
        TypeInner::Image { dim, arrayed: false, .. } => match dim {
            ImageDimension::D2 => UniformType::Sampler2D,
            ImageDimension::Cube => UniformType::SamplerCube,
            ImageDimension::D3 => UniformType::Sampler3D,
            ImageDimension::D1 => UniformType::None,
        },
        _ => UniformType::None,
    }
}

#[cfg(test)]
#[path = "reflection_tests.rs"]
mod tests;
