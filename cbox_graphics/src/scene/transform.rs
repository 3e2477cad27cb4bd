/// Transform - position, euler rotation and scale of an object
///
/// The model matrix is translation * rotation * scale and is rebuilt lazily
/// after any change.

use std::cell::Cell;
use glam::{Mat4, Quat, Vec3};

/// Object transform (rotation in radians, applied X then Y then Z)
#[derive(Debug, Clone)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    matrix: Cell<Option<Mat4>>,
}

impl Transform {
    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { position, rotation, scale, matrix: Cell::new(None) }
    }

    pub fn identity() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO, Vec3::ONE)
    }

    // ===== GETTERS =====

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Euler angles in radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Model matrix (translation * rotation * scale)
    pub fn matrix(&self) -> Mat4 {
        if let Some(matrix) = self.matrix.get() {
            return matrix;
        }
        let matrix = Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position);
        self.matrix.set(Some(matrix));
        matrix
    }

    /// Local -Z in world space
    pub fn forward(&self) -> Vec3 {
        (-self.matrix().z_axis.truncate()).normalize_or_zero()
    }

    /// Local +X in world space
    pub fn right(&self) -> Vec3 {
        self.matrix().x_axis.truncate().normalize_or_zero()
    }

    /// Local +Y in world space
    pub fn up(&self) -> Vec3 {
        self.matrix().y_axis.truncate().normalize_or_zero()
    }

    // ===== SETTERS =====

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.matrix.set(None);
    }

    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.matrix.set(None);
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.matrix.set(None);
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.matrix.set(None);
    }

    /// Add `delta` radians to each euler angle
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
        self.matrix.set(None);
    }

    /// Multiply the scale component-wise
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.matrix.set(None);
    }

    fn quat(&self) -> Quat {
        Quat::from_rotation_z(self.rotation.z)
            * Quat::from_rotation_y(self.rotation.y)
            * Quat::from_rotation_x(self.rotation.x)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
