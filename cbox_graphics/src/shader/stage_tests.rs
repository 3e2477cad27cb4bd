use super::*;
use crate::error::ErrorKind;

// ============================================================================
// PARSING
// ============================================================================

#[test]
fn test_parse_canonical_names() {
    for stage in ShaderStage::ALL {
        assert_eq!(stage.name().parse::<ShaderStage>().unwrap(), stage);
    }
}

#[test]
fn test_parse_short_forms() {
    assert_eq!("vert".parse::<ShaderStage>().unwrap(), ShaderStage::Vertex);
    assert_eq!("pixel".parse::<ShaderStage>().unwrap(), ShaderStage::Fragment);
    assert_eq!("PS".parse::<ShaderStage>().unwrap(), ShaderStage::Fragment);
    assert_eq!("comp".parse::<ShaderStage>().unwrap(), ShaderStage::Compute);
    assert_eq!("tesc".parse::<ShaderStage>().unwrap(), ShaderStage::TessControl);
    assert_eq!(" tese ".parse::<ShaderStage>().unwrap(), ShaderStage::TessEvaluation);
}

#[test]
fn test_parse_unknown_names_offending_token() {
    let err = "hull".parse::<ShaderStage>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(format!("{}", err).contains("hull"));
}

// ============================================================================
// NAGA MAPPING
// ============================================================================

#[test]
fn test_naga_supported_stages() {
    assert_eq!(ShaderStage::Vertex.to_naga(), Some(naga::ShaderStage::Vertex));
    assert_eq!(ShaderStage::Fragment.to_naga(), Some(naga::ShaderStage::Fragment));
    assert_eq!(ShaderStage::Compute.to_naga(), Some(naga::ShaderStage::Compute));
}

#[test]
fn test_naga_unsupported_stages() {
    assert!(ShaderStage::Geometry.to_naga().is_none());
    assert!(ShaderStage::TessControl.to_naga().is_none());
    assert!(ShaderStage::TessEvaluation.to_naga().is_none());
}

#[test]
fn test_display_uses_canonical_name() {
    assert_eq!(format!("{}", ShaderStage::TessControl), "tess_control");
}
