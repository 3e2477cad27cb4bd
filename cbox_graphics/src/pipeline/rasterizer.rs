/// Rasterization fixed-function state

use crate::device::GraphicsDevice;

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    /// No culling
    None,
    /// Cull front faces
    Front,
    /// Cull back faces
    Back,
    /// Cull both faces (only points and lines survive)
    FrontAndBack,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontFace {
    /// Counter-clockwise vertices define front face
    CounterClockwise,
    /// Clockwise vertices define front face
    Clockwise,
}

/// Polygon rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonMode {
    /// Fill polygons
    Fill,
    /// Draw edges only (wireframe)
    Line,
    /// Draw vertices only
    Point,
}

/// Rasterizer state applied when a pipeline binds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterizerState {
    /// Face culling mode
    pub cull_mode: CullMode,
    /// Polygon rendering mode
    pub polygon_mode: PolygonMode,
    /// Front face winding order
    pub front_face: FrontFace,
    /// Constant depth offset
    pub depth_bias: f32,
    /// Slope-scaled depth offset
    pub depth_bias_slope: f32,
    /// Clamp depth instead of clipping
    pub depth_clamp: bool,
    /// Enable the scissor test
    pub scissor_test: bool,
}

impl Default for RasterizerState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            polygon_mode: PolygonMode::Fill,
            front_face: FrontFace::CounterClockwise,
            depth_bias: 0.0,
            depth_bias_slope: 0.0,
            depth_clamp: false,
            scissor_test: false,
        }
    }
}

impl RasterizerState {
    /// Default state with culling disabled
    pub fn no_cull() -> Self {
        Self { cull_mode: CullMode::None, ..Self::default() }
    }

    /// Default state drawn as wireframe
    pub fn wireframe() -> Self {
        Self { polygon_mode: PolygonMode::Line, ..Self::default() }
    }

    /// Polygon offset is on when either bias term is non-zero
    pub fn polygon_offset_enabled(&self) -> bool {
        self.depth_bias != 0.0 || self.depth_bias_slope != 0.0
    }

    /// Push this state to the device
    pub fn apply(&self, device: &dyn GraphicsDevice) {
        device.apply_rasterizer(self);
    }
}

#[cfg(test)]
#[path = "rasterizer_tests.rs"]
mod tests;
