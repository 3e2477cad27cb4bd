use super::*;
use crate::error::ErrorKind;
use crate::shader::test_shaders::combined_source;

#[test]
fn test_splits_stages_in_order() {
    let sections = ShaderParser::parse(&combined_source()).unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].stage, ShaderStage::Vertex);
    assert_eq!(sections[1].stage, ShaderStage::Fragment);
    assert!(sections[0].source.starts_with("#version 450\n"));
    assert!(sections[0].source.contains("gl_Position"));
    assert!(!sections[0].source.contains("o_color"));
    assert!(sections[1].source.contains("o_color"));
}

#[test]
fn test_name_before_first_type_applies_to_all() {
    let sections = ShaderParser::parse(&combined_source()).unwrap();
    assert!(sections.iter().all(|s| s.name.as_deref() == Some("passthrough")));
}

#[test]
fn test_name_inside_section_names_that_section() {
    let source = "#type vs\nvoid a() {}\n#name shadow\n#type ps\nvoid b() {}\n";
    let sections = ShaderParser::parse(source).unwrap();

    assert_eq!(sections[0].name.as_deref(), Some("shadow"));
    assert_eq!(sections[1].name, None);
    assert_eq!(sections[0].source, "void a() {}\n");
}

#[test]
fn test_lines_before_first_type_ignored() {
    let source = "// header comment\n#type frag\nvoid main() {}\n";
    let sections = ShaderParser::parse(source).unwrap();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].source, "void main() {}\n");
}

#[test]
fn test_later_duplicate_stage_wins() {
    let source = "#type vertex\nfirst\n#type fragment\nfrag\n#type vert\nsecond\n";
    let sections = ShaderParser::parse(source).unwrap();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].stage, ShaderStage::Vertex);
    assert_eq!(sections[0].source, "second\n");
}

#[test]
fn test_empty_source_is_invalid_state() {
    assert_eq!(ShaderParser::parse("").unwrap_err().kind(), ErrorKind::InvalidState);
}

#[test]
fn test_unknown_stage_names_token() {
    let err = ShaderParser::parse("#type hull\nvoid main() {}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(err.to_string().contains("hull"));
}

#[test]
fn test_no_type_directive() {
    let err = ShaderParser::parse("#version 450\nvoid main() {}\n").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert!(err.to_string().contains("No shader stages found in source"));
}

#[test]
fn test_parse_file_uses_stem_as_name() {
    let path = std::env::temp_dir().join(format!("cbox_parser_{}_sprite.glsl", std::process::id()));
    std::fs::write(&path, "#type vertex\nvoid main() {}\n").unwrap();

    let sections = ShaderParser::parse_file(&path).unwrap();

    std::fs::remove_file(&path).ok();
    let expected = format!("cbox_parser_{}_sprite", std::process::id());
    assert_eq!(sections[0].name.as_deref(), Some(expected.as_str()));
}

#[test]
fn test_parse_file_missing() {
    let err = ShaderParser::parse_file("/nonexistent/cbox/shader.glsl").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
