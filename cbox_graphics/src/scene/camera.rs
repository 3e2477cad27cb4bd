/// Camera - look-at view with a perspective or orthographic projection.
///
/// The view and projection matrices are recomputed lazily: setters only mark
/// them stale, and the next getter rebuilds what changed. Projections follow
/// the OpenGL clip-space convention (right-handed, depth in [-1, 1]).

use std::cell::Cell;
use glam::{Mat3, Mat4, Vec3};
use crate::error::{ErrorKind, Result};
use crate::gfx_fail;

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field of view in degrees
    Perspective { fov: f32, aspect: f32, near: f32, far: f32 },
    Orthographic { left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32 },
}

impl Projection {
    fn matrix(&self) -> Mat4 {
        match *self {
            Projection::Perspective { fov, aspect, near, far } => {
                Mat4::perspective_rh_gl(fov.to_radians(), aspect, near, far)
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                Mat4::orthographic_rh_gl(left, right, bottom, top, near, far)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let problem = match *self {
            Projection::Perspective { fov, aspect, near, far } => {
                if !(fov > 0.0 && fov < 180.0) {
                    Some(format!("field of view {} must be in (0, 180) degrees", fov))
                } else if aspect <= 0.0 {
                    Some(format!("aspect ratio {} must be positive", aspect))
                } else if near <= 0.0 || far <= near {
                    Some(format!("planes near={} far={} need 0 < near < far", near, far))
                } else {
                    None
                }
            }
            Projection::Orthographic { left, right, bottom, top, near, far } => {
                if left == right || bottom == top || near == far {
                    Some("orthographic volume has zero extent".to_string())
                } else {
                    None
                }
            }
        };
        match problem {
            Some(message) => Err(gfx_fail!(ErrorKind::InvalidState, "cbox::camera", "Invalid projection: {}", message)),
            None => Ok(()),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Projection::Perspective { fov: 45.0, aspect: 16.0 / 9.0, near: 0.1, far: 1000.0 }
    }
}

/// Look-at camera with lazily computed matrices.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Projection,
    position: Vec3,
    target: Vec3,
    up: Vec3,
    view_matrix: Cell<Option<Mat4>>,
    projection_matrix: Cell<Option<Mat4>>,
}

impl Camera {
    /// Start building a camera.
    ///
    /// Defaults: perspective 45 degrees, 16:9, planes 0.1 / 1000, at (0, 0, 3)
    /// looking at the origin with +Y up.
    pub fn builder() -> CameraBuilder {
        CameraBuilder {
            projection: Projection::default(),
            position: Vec3::new(0.0, 0.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    // ===== GETTERS =====

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        if let Some(view) = self.view_matrix.get() {
            return view;
        }
        let view = Mat4::look_at_rh(self.position, self.target, self.up);
        self.view_matrix.set(Some(view));
        view
    }

    /// View-to-clip matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        if let Some(projection) = self.projection_matrix.get() {
            return projection;
        }
        let projection = self.projection.matrix();
        self.projection_matrix.set(Some(projection));
        projection
    }

    /// Combined view-projection matrix (projection * view).
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Unit vector from position to target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Unit vector to the right of the view direction.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or_zero()
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.view_matrix.set(None);
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.view_matrix.set(None);
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.view_matrix.set(None);
    }

    /// Switch to a perspective projection (`fov` in degrees).
    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Result<()> {
        self.set_projection(Projection::Perspective { fov, aspect, near, far })
    }

    /// Switch to an orthographic projection.
    pub fn set_orthographic(&mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Result<()> {
        self.set_projection(Projection::Orthographic { left, right, bottom, top, near, far })
    }

    /// Replace the projection. Rejected projections leave the camera unchanged.
    pub fn set_projection(&mut self, projection: Projection) -> Result<()> {
        projection.validate()?;
        self.projection = projection;
        self.projection_matrix.set(None);
        Ok(())
    }

    /// Update the aspect ratio of a perspective projection (no-op for orthographic).
    pub fn set_aspect(&mut self, aspect: f32) -> Result<()> {
        match self.projection {
            Projection::Perspective { fov, near, far, .. } => self.set_perspective(fov, aspect, near, far),
            Projection::Orthographic { .. } => Ok(()),
        }
    }

    // ===== MOVEMENT =====

    /// Move position and target together.
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.target += delta;
        self.view_matrix.set(None);
    }

    /// Rotate the position around the target, keeping the distance.
    ///
    /// `yaw` turns around world Y, `pitch` around X; both in radians.
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }
        let rotation = Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(pitch);
        self.position = self.target + (rotation * offset).normalize() * radius;
        self.view_matrix.set(None);
    }
}

impl Default for Camera {
    fn default() -> Self {
        let builder = Camera::builder();
        Camera {
            projection: builder.projection,
            position: builder.position,
            target: builder.target,
            up: builder.up,
            view_matrix: Cell::new(None),
            projection_matrix: Cell::new(None),
        }
    }
}

/// Builder for [`Camera`].
pub struct CameraBuilder {
    projection: Projection,
    position: Vec3,
    target: Vec3,
    up: Vec3,
}

impl CameraBuilder {
    /// Perspective projection, `fov` in degrees.
    pub fn perspective(mut self, fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::Perspective { fov, aspect, near, far };
        self
    }

    pub fn orthographic(mut self, left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        self.projection = Projection::Orthographic { left, right, bottom, top, near, far };
        self
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Build the camera.
    ///
    /// # Errors
    ///
    /// `InvalidState` for a degenerate projection, or when position and
    /// target coincide.
    pub fn build(self) -> Result<Camera> {
        self.projection.validate()?;
        if self.position == self.target {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::camera",
                "Camera position and target are both {:?}", self.position));
        }

        Ok(Camera {
            projection: self.projection,
            position: self.position,
            target: self.target,
            up: self.up,
            view_matrix: Cell::new(None),
            projection_matrix: Cell::new(None),
        })
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
