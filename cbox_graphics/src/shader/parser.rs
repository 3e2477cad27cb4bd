/// Multi-stage shader source files
///
/// A single file holds several stages, each introduced by a directive line:
///
/// ```glsl
/// #name textured
/// #type vertex
/// #version 450
/// ...
/// #type fragment
/// #version 450
/// ...
/// ```
///
/// Lines before the first `#type` are ignored. A `#name` line names the
/// section it appears in; before any `#type` it sets the name every section
/// starts with.

use std::path::Path;
use crate::error::{ErrorKind, Result};
use crate::shader::{compiler, ShaderStage};
use crate::{gfx_fail, gfx_info};

const TYPE_TOKEN: &str = "#type";
const NAME_TOKEN: &str = "#name";

/// Source text for one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub name: Option<String>,
    pub source: String,
}

/// Splitter for `#type`-sectioned shader sources
pub struct ShaderParser;

impl ShaderParser {
    /// Split `source` into per-stage sources, in order of first appearance
    ///
    /// A stage declared twice keeps the later section.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if `source` is empty
    /// - `InvalidFormat` on an unknown stage name or when no `#type` line exists
    pub fn parse(source: &str) -> Result<Vec<ShaderSource>> {
        Self::parse_named(source, None)
    }

    /// Read and [`parse`](Self::parse) a file; sections default to the file stem as name
    ///
    /// # Errors
    ///
    /// `NotFound`, `AccessDenied` or `ReadError` when the file cannot be read,
    /// otherwise as [`parse`](Self::parse).
    pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<ShaderSource>> {
        let path = path.as_ref();
        let source = compiler::read_source(path)?;
        let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned());
        Self::parse_named(&source, stem)
    }

    fn parse_named(source: &str, mut default_name: Option<String>) -> Result<Vec<ShaderSource>> {
        if source.is_empty() {
            return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::shader", "Shader source is empty"));
        }

        let mut sections: Vec<ShaderSource> = Vec::new();
        let mut current: Option<ShaderSource> = None;

        for line in source.lines() {
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix(TYPE_TOKEN) {
                if let Some(done) = current.take() {
                    push_section(&mut sections, done);
                }
                let stage = rest.trim().parse::<ShaderStage>().map_err(|_| {
                    gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
                        "Unknown shader stage: {}", rest.trim())
                })?;
                current = Some(ShaderSource { stage, name: default_name.clone(), source: String::new() });
            } else if let Some(rest) = trimmed.strip_prefix(NAME_TOKEN) {
                let name = rest.trim().to_string();
                match current {
                    Some(ref mut section) => section.name = Some(name),
                    None => default_name = Some(name),
                }
            } else if let Some(ref mut section) = current {
                section.source.push_str(line);
                section.source.push('\n');
            }
        }

        if let Some(done) = current.take() {
            push_section(&mut sections, done);
        }

        if sections.is_empty() {
            return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::shader",
                "No shader stages found in source"));
        }

        gfx_info!("cbox::shader", "Parsed shader '{}' with {} stage(s)",
            default_name.as_deref().unwrap_or("<unnamed>"), sections.len());
        Ok(sections)
    }
}

fn push_section(sections: &mut Vec<ShaderSource>, section: ShaderSource) {
    match sections.iter_mut().find(|s| s.stage == section.stage) {
        Some(existing) => *existing = section,
        None => sections.push(section),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
