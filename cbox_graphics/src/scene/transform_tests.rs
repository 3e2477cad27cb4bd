use std::f32::consts::FRAC_PI_2;
use super::*;

fn approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < 1e-5
}

// ============================================================================
// Matrix
// ============================================================================

#[test]
fn test_identity() {
    let transform = Transform::default();
    assert_eq!(transform.matrix(), Mat4::IDENTITY);
    assert_eq!(transform.scale(), Vec3::ONE);
}

#[test]
fn test_matrix_is_translation_rotation_scale() {
    let transform = Transform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, FRAC_PI_2, 0.0), Vec3::splat(2.0));

    let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
        * Mat4::from_rotation_y(FRAC_PI_2)
        * Mat4::from_scale(Vec3::splat(2.0));
    assert!(transform.matrix().abs_diff_eq(expected, 1e-5));
}

#[test]
fn test_rotation_applies_x_before_z() {
    let transform = Transform::new(Vec3::ZERO, Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2), Vec3::ONE);

    // X maps +Y to +Z, then Z leaves +Z alone
    let moved = transform.matrix().transform_vector3(Vec3::Y);
    assert!(approx(moved, Vec3::Z));
}

#[test]
fn test_matrix_recomputed_after_change() {
    let mut transform = Transform::identity();
    let _ = transform.matrix();

    transform.translate(Vec3::new(0.0, 0.0, -5.0));
    transform.translate(Vec3::new(1.0, 0.0, 0.0));

    assert_eq!(transform.position(), Vec3::new(1.0, 0.0, -5.0));
    assert_eq!(transform.matrix().w_axis.truncate(), Vec3::new(1.0, 0.0, -5.0));
}

#[test]
fn test_scale_by_multiplies() {
    let mut transform = Transform::identity();
    transform.set_scale(Vec3::new(2.0, 3.0, 4.0));
    transform.scale_by(Vec3::splat(0.5));

    assert_eq!(transform.scale(), Vec3::new(1.0, 1.5, 2.0));
    assert_eq!(transform.matrix(), Mat4::from_scale(Vec3::new(1.0, 1.5, 2.0)));
}

// ============================================================================
// Axes
// ============================================================================

#[test]
fn test_identity_axes() {
    let transform = Transform::identity();
    assert!(approx(transform.forward(), Vec3::NEG_Z));
    assert!(approx(transform.right(), Vec3::X));
    assert!(approx(transform.up(), Vec3::Y));
}

#[test]
fn test_axes_follow_rotation_not_scale() {
    let mut transform = Transform::identity();
    transform.set_scale(Vec3::splat(3.0));
    transform.rotate(Vec3::new(0.0, FRAC_PI_2, 0.0));

    assert!(approx(transform.forward(), Vec3::NEG_X));
    assert!(approx(transform.right(), Vec3::NEG_Z));
    assert!(approx(transform.up(), Vec3::Y));
}
