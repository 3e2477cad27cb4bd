/// Material: a shader plus the uniform values, textures and samplers it is drawn with
///
/// Applying a material binds its shader, writes every uniform the program
/// actually has, then binds textures and samplers in ascending slot order.

use std::collections::BTreeMap;
use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::device::UniformValue;
use crate::error::{ErrorKind, Result};
use crate::gfx_fail;
use crate::resource::{Sampler, Texture2D};
use crate::shader::ShaderModule;

/// Surface description bound before drawing
pub struct Material {
    shader: Arc<ShaderModule>,
    uniforms: Vec<(String, UniformValue)>,
    uniform_names: FxHashMap<String, usize>,
    textures: BTreeMap<u32, Arc<Texture2D>>,
    samplers: BTreeMap<u32, Arc<Sampler>>,
}

impl Material {
    pub fn builder() -> MaterialBuilder {
        MaterialBuilder {
            shader: None,
            uniforms: Vec::new(),
            textures: BTreeMap::new(),
            samplers: BTreeMap::new(),
        }
    }

    /// Bind the shader and every resource of this material
    ///
    /// Uniforms the program does not have are skipped.
    pub fn apply(&self) {
        self.shader.bind();
        for (name, value) in &self.uniforms {
            self.shader.set_uniform(name, value);
        }
        for (&slot, texture) in &self.textures {
            texture.bind(slot);
        }
        for (&slot, sampler) in &self.samplers {
            sampler.bind(slot);
        }
    }

    // ===== GETTERS =====

    pub fn shader(&self) -> &Arc<ShaderModule> {
        &self.shader
    }

    /// Stored value of uniform `name`
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniform_names.get(name).map(|&i| &self.uniforms[i].1)
    }

    pub fn uniform_count(&self) -> usize {
        self.uniforms.len()
    }

    pub fn texture(&self, slot: u32) -> Option<&Arc<Texture2D>> {
        self.textures.get(&slot)
    }

    pub fn sampler(&self, slot: u32) -> Option<&Arc<Sampler>> {
        self.samplers.get(&slot)
    }

    // ===== SETTERS =====

    pub fn set_shader(&mut self, shader: Arc<ShaderModule>) {
        self.shader = shader;
    }

    /// Set or replace uniform `name`
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.uniform_names.get(name) {
            Some(&i) => self.uniforms[i].1 = value,
            None => {
                self.uniform_names.insert(name.to_string(), self.uniforms.len());
                self.uniforms.push((name.to_string(), value));
            }
        }
    }

    pub fn set_texture(&mut self, slot: u32, texture: Arc<Texture2D>) {
        self.textures.insert(slot, texture);
    }

    pub fn set_sampler(&mut self, slot: u32, sampler: Arc<Sampler>) {
        self.samplers.insert(slot, sampler);
    }

    pub fn remove_texture(&mut self, slot: u32) -> Option<Arc<Texture2D>> {
        self.textures.remove(&slot)
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Material")
            .field("program", &self.shader.program())
            .field("uniforms", &self.uniforms.len())
            .field("texture_slots", &self.textures.keys().collect::<Vec<_>>())
            .field("sampler_slots", &self.samplers.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Material`]
pub struct MaterialBuilder {
    shader: Option<Arc<ShaderModule>>,
    uniforms: Vec<(String, UniformValue)>,
    textures: BTreeMap<u32, Arc<Texture2D>>,
    samplers: BTreeMap<u32, Arc<Sampler>>,
}

impl MaterialBuilder {
    pub fn shader(mut self, shader: Arc<ShaderModule>) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Named uniform value (`f32`, `i32` or a glam vector/matrix)
    ///
    /// Setting the same name twice keeps the last value.
    pub fn uniform(mut self, name: &str, value: impl Into<UniformValue>) -> Self {
        self.uniforms.push((name.to_string(), value.into()));
        self
    }

    pub fn texture(mut self, slot: u32, texture: Arc<Texture2D>) -> Self {
        self.textures.insert(slot, texture);
        self
    }

    pub fn sampler(mut self, slot: u32, sampler: Arc<Sampler>) -> Self {
        self.samplers.insert(slot, sampler);
        self
    }

    /// Build the material
    ///
    /// # Errors
    ///
    /// `NullValue` if no shader was set
    pub fn build(self) -> Result<Material> {
        let Some(shader) = self.shader else {
            return Err(gfx_fail!(ErrorKind::NullValue, "cbox::material", "Shader is null"));
        };

        let mut material = Material {
            shader,
            uniforms: Vec::with_capacity(self.uniforms.len()),
            uniform_names: FxHashMap::default(),
            textures: self.textures,
            samplers: self.samplers,
        };
        for (name, value) in self.uniforms {
            material.set_uniform(&name, value);
        }
        Ok(material)
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
