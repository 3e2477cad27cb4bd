/// Shader stage kinds and their string names

use std::fmt;
use std::str::FromStr;
use crate::error::Error;

/// Pipeline stage a shader runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment (pixel) shader
    Fragment,
    /// Geometry shader
    Geometry,
    /// Compute shader
    Compute,
    /// Tessellation control shader
    TessControl,
    /// Tessellation evaluation shader
    TessEvaluation,
}

impl ShaderStage {
    /// All stages, in pipeline order
    pub const ALL: [ShaderStage; 6] = [
        ShaderStage::Vertex,
        ShaderStage::TessControl,
        ShaderStage::TessEvaluation,
        ShaderStage::Geometry,
        ShaderStage::Fragment,
        ShaderStage::Compute,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
            ShaderStage::Geometry => "geometry",
            ShaderStage::Compute => "compute",
            ShaderStage::TessControl => "tess_control",
            ShaderStage::TessEvaluation => "tess_evaluation",
        }
    }

    /// Map to naga's stage, `None` for stages naga cannot compile
    pub(crate) fn to_naga(self) -> Option<naga::ShaderStage> {
        match self {
            ShaderStage::Vertex => Some(naga::ShaderStage::Vertex),
            ShaderStage::Fragment => Some(naga::ShaderStage::Fragment),
            ShaderStage::Compute => Some(naga::ShaderStage::Compute),
            ShaderStage::Geometry | ShaderStage::TessControl | ShaderStage::TessEvaluation => None,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShaderStage {
    type Err = Error;

    /// Parse a stage name (case-insensitive)
    ///
    /// Accepts the canonical names plus the usual short forms
    /// (`vert`, `frag`, `pixel`, `comp`, `tesc`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" | "vert" | "vs" => Ok(ShaderStage::Vertex),
            "fragment" | "frag" | "pixel" | "fs" | "ps" => Ok(ShaderStage::Fragment),
            "geometry" | "geom" | "gs" => Ok(ShaderStage::Geometry),
            "compute" | "comp" | "cs" => Ok(ShaderStage::Compute),
            "tess_control" | "tesc" => Ok(ShaderStage::TessControl),
            "tess_evaluation" | "tese" => Ok(ShaderStage::TessEvaluation),
            other => Err(Error::InvalidFormat(format!("Unknown shader stage: '{}'", other))),
        }
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
