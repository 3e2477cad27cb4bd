//! GLSL 450 sources shared by the shader unit tests

/// One input, writes it straight to gl_Position
pub(crate) const PASSTHROUGH_VS: &str = r#"#version 450
layout(location = 0) in vec3 a_position;

void main() {
    gl_Position = vec4(a_position, 1.0);
}
"#;

/// Constant color output
pub(crate) const SOLID_FS: &str = r#"#version 450
layout(location = 0) out vec4 o_color;

void main() {
    o_color = vec4(1.0, 0.5, 0.25, 1.0);
}
"#;

/// Two inputs plus a push-constant block
pub(crate) const TEXTURED_VS: &str = r#"#version 450
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
layout(location = 0) out vec2 v_uv;

layout(push_constant) uniform PushConstants {
    mat4 u_mvp;
    float u_time;
} pc;

void main() {
    v_uv = a_uv + vec2(pc.u_time);
    gl_Position = pc.u_mvp * vec4(a_position, 1.0);
}
"#;

/// Uniform block plus one sampled texture
pub(crate) const TEXTURED_FS: &str = r#"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 o_color;

layout(set = 0, binding = 0) uniform Material {
    vec4 u_color;
    vec3 u_light_dir;
    int u_mode;
} material;

layout(set = 0, binding = 1) uniform texture2D u_albedo;
layout(set = 0, binding = 2) uniform sampler u_sampler;

void main() {
    vec4 texel = texture(sampler2D(u_albedo, u_sampler), v_uv);
    o_color = texel * material.u_color + vec4(material.u_light_dir * float(material.u_mode), 0.0);
}
"#;

/// Fails to parse: undeclared identifier
pub(crate) const BROKEN_FS: &str = r#"#version 450
layout(location = 0) out vec4 o_color;

void main() {
    o_color = undeclared_value;
}
"#;

/// Both pass-through stages in one `#type`-sectioned source
pub(crate) fn combined_source() -> String {
    format!("#name passthrough\n#type vertex\n{}#type fragment\n{}", PASSTHROUGH_VS, SOLID_FS)
}

/// Linked pass-through program on `device`, with reflection
pub(crate) fn passthrough_module(
    device: &std::sync::Arc<dyn crate::device::GraphicsDevice>,
) -> std::sync::Arc<crate::shader::ShaderModule> {
    let module = crate::shader::ShaderModule::builder(device)
        .add_stage(crate::shader::ShaderStage::Vertex, PASSTHROUGH_VS)
        .add_stage(crate::shader::ShaderStage::Fragment, SOLID_FS)
        .reflect(true)
        .build()
        .unwrap();
    std::sync::Arc::new(module)
}
