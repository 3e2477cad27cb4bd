use super::*;
use crate::device::MockDevice;

fn device() -> (Arc<MockDevice>, Arc<dyn GraphicsDevice>) {
    let mock = Arc::new(MockDevice::new());
    let device: Arc<dyn GraphicsDevice> = mock.clone();
    (mock, device)
}

#[test]
fn test_defaults() {
    let desc = SamplerDesc::default();
    assert_eq!(desc.min_filter, Filter::Linear);
    assert_eq!(desc.mag_filter, Filter::Linear);
    assert_eq!(desc.mipmap_mode, MipmapMode::Linear);
    assert_eq!(desc.wrap_u, WrapMode::Repeat);
    assert_eq!(desc.wrap_w, WrapMode::Repeat);
    assert_eq!(desc.anisotropy, 1.0);
    assert_eq!(desc.border_color, Vec4::new(0.0, 0.0, 0.0, 1.0));
}

#[test]
fn test_anisotropy_applied_only_above_one() {
    let mut desc = SamplerDesc::default();
    assert_eq!(desc.effective_anisotropy(), None);
    desc.anisotropy = 0.5;
    assert_eq!(desc.effective_anisotropy(), None);
    desc.anisotropy = 8.0;
    assert_eq!(desc.effective_anisotropy(), Some(8.0));
}

#[test]
fn test_wrap_sets_all_axes_then_override() {
    let (_mock, device) = device();
    let sampler = Sampler::builder(&device)
        .wrap(WrapMode::ClampToEdge)
        .wrap_v(WrapMode::MirroredRepeat)
        .build()
        .unwrap();

    assert_eq!(sampler.desc().wrap_u, WrapMode::ClampToEdge);
    assert_eq!(sampler.desc().wrap_v, WrapMode::MirroredRepeat);
    assert_eq!(sampler.desc().wrap_w, WrapMode::ClampToEdge);
}

#[test]
fn test_builder_settings_are_kept() {
    let (_mock, device) = device();
    let sampler = Sampler::builder(&device)
        .filter(Filter::Nearest, Filter::Linear)
        .mipmap(MipmapMode::Nearest)
        .anisotropy(4.0)
        .border_color(Vec4::ONE)
        .build()
        .unwrap();

    let desc = sampler.desc();
    assert_eq!(desc.min_filter, Filter::Nearest);
    assert_eq!(desc.mag_filter, Filter::Linear);
    assert_eq!(desc.mipmap_mode, MipmapMode::Nearest);
    assert_eq!(desc.effective_anisotropy(), Some(4.0));
    assert_eq!(desc.border_color, Vec4::ONE);
}

#[test]
fn test_bind_and_drop_go_through_device() {
    let (mock, device) = device();
    let sampler = Sampler::builder(&device).build().unwrap();
    let id = sampler.handle().raw();

    sampler.bind(2);
    drop(sampler);

    assert_eq!(mock.calls_matching("bind_sampler"), vec![format!("bind_sampler 2 {}", id)]);
    assert_eq!(mock.calls_matching("delete_sampler"), vec![format!("delete_sampler {}", id)]);
}
