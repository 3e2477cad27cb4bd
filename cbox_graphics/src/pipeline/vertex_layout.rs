/// Vertex input layout: attribute formats, offsets and stride

use crate::error::Result;
use crate::error::ErrorKind;
use crate::gfx_fail;

/// Format of one vertex attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    Float1,
    Float2,
    Float3,
    Float4,
    Int1,
    Int2,
    Int3,
    Int4,
    UInt1,
    UInt2,
    UInt3,
    UInt4,
}

/// Scalar type behind a [`VertexFormat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexScalar {
    Float,
    Int,
    UInt,
}

impl VertexFormat {
    /// Size in bytes of one attribute value
    pub fn size(self) -> u32 {
        self.component_count() * 4
    }

    /// Number of components (1 to 4)
    pub fn component_count(self) -> u32 {
        match self {
            VertexFormat::Float1 | VertexFormat::Int1 | VertexFormat::UInt1 => 1,
            VertexFormat::Float2 | VertexFormat::Int2 | VertexFormat::UInt2 => 2,
            VertexFormat::Float3 | VertexFormat::Int3 | VertexFormat::UInt3 => 3,
            VertexFormat::Float4 | VertexFormat::Int4 | VertexFormat::UInt4 => 4,
        }
    }

    /// Component scalar type
    pub fn scalar(self) -> VertexScalar {
        match self {
            VertexFormat::Float1 | VertexFormat::Float2 | VertexFormat::Float3 | VertexFormat::Float4 => {
                VertexScalar::Float
            }
            VertexFormat::Int1 | VertexFormat::Int2 | VertexFormat::Int3 | VertexFormat::Int4 => {
                VertexScalar::Int
            }
            VertexFormat::UInt1 | VertexFormat::UInt2 | VertexFormat::UInt3 | VertexFormat::UInt4 => {
                VertexScalar::UInt
            }
        }
    }
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Data type and component count
    pub format: VertexFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
    /// Normalize integer data to [0, 1] / [-1, 1]
    pub normalized: bool,
}

impl VertexAttribute {
    /// Byte just past this attribute
    pub fn end(&self) -> u32 {
        self.offset + self.format.size()
    }
}

/// Interleaved vertex layout (single buffer)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexLayout {
    /// Start building a layout
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    /// Attributes in declaration order
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Bytes between consecutive vertices
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// True when no attribute is declared
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// Builder for [`VertexLayout`]
#[derive(Debug, Clone, Default)]
pub struct VertexLayoutBuilder {
    attributes: Vec<VertexAttribute>,
    stride: Option<u32>,
}

impl VertexLayoutBuilder {
    /// Append an attribute
    pub fn attribute(mut self, location: u32, format: VertexFormat, offset: u32, normalized: bool) -> Self {
        self.attributes.push(VertexAttribute { location, format, offset, normalized });
        self
    }

    /// Set the stride explicitly
    pub fn stride(mut self, stride: u32) -> Self {
        self.stride = Some(stride);
        self
    }

    /// Build the layout
    ///
    /// Without an explicit stride, the stride is the end of the furthest attribute.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if two attributes share a location
    /// - `InvalidState` if an explicit stride is smaller than an attribute's end
    pub fn build(self) -> Result<VertexLayout> {
        for (i, attr) in self.attributes.iter().enumerate() {
            if self.attributes[..i].iter().any(|a| a.location == attr.location) {
                return Err(gfx_fail!(ErrorKind::InvalidFormat, "cbox::pipeline",
                    "Vertex attribute location {} declared twice", attr.location));
            }
        }

        let packed = self.attributes.iter().map(VertexAttribute::end).max().unwrap_or(0);
        let stride = match self.stride {
            Some(stride) if stride < packed => {
                return Err(gfx_fail!(ErrorKind::InvalidState, "cbox::pipeline",
                    "Vertex stride {} is smaller than attribute end {}", stride, packed));
            }
            Some(stride) => stride,
            None => packed,
        };

        Ok(VertexLayout { attributes: self.attributes, stride })
    }
}

#[cfg(test)]
#[path = "vertex_layout_tests.rs"]
mod tests;
