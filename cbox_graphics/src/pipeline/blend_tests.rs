use super::*;
use crate::device::MockDevice;

// ============================================================================
// PRESETS
// ============================================================================

#[test]
fn test_disabled_has_all_attachments_off() {
    let state = BlendState::disabled();
    assert!(state.attachments.iter().all(|a| !a.enabled));
    assert!(state.attachments.iter().all(|a| a.write_mask == ColorWriteMask::ALL));
    assert_eq!(state.blend_constants, Vec4::ZERO);
    assert_eq!(BlendState::default(), state);
}

#[test]
fn test_alpha_blend_only_touches_first_attachment() {
    let state = BlendState::alpha_blend();
    let first = state.attachments[0];
    assert!(first.enabled);
    assert_eq!(first.src_color, BlendFactor::SrcAlpha);
    assert_eq!(first.dst_color, BlendFactor::OneMinusSrcAlpha);
    assert_eq!(first.src_alpha, BlendFactor::One);
    assert_eq!(first.dst_alpha, BlendFactor::Zero);
    assert!(state.attachments[1..].iter().all(|a| !a.enabled));
}

#[test]
fn test_additive_factors() {
    let first = BlendState::additive().attachments[0];
    assert!(first.enabled);
    assert_eq!(first.src_color, BlendFactor::One);
    assert_eq!(first.dst_color, BlendFactor::One);
    assert_eq!(first.color_op, BlendOp::Add);
}

#[test]
fn test_rgb_write_mask_leaves_alpha_untouched() {
    let mask = ColorWriteMask::RGB;
    assert!(mask.contains(ColorWriteMask::R | ColorWriteMask::G | ColorWriteMask::B));
    assert!(!mask.contains(ColorWriteMask::A));
    assert_eq!(mask | ColorWriteMask::A, ColorWriteMask::ALL);
    assert_eq!(ColorWriteMask::default(), ColorWriteMask::ALL);
}

// ============================================================================
// APPLY
// ============================================================================

#[test]
fn test_apply_passes_attachment_count() {
    let device = MockDevice::new();
    BlendState::alpha_blend().apply(&device, 2);
    assert_eq!(device.calls(), vec!["apply_blend attachments=2"]);
}

#[test]
fn test_apply_clamps_attachment_count() {
    let device = MockDevice::new();
    BlendState::disabled().apply(&device, 32);
    assert_eq!(device.calls(), vec!["apply_blend attachments=8"]);
}
