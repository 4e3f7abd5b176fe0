use anyhow::Result;
use glam::Mat4;

use crate::paint::Color;
use crate::render::Vertex;

/// Color buffer format of a render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ColorFormat {
    /// 8 bits per channel RGBA.
    Rgba8,
}

/// Depth/stencil buffer format of a render target.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DepthFormat {
    /// 24-bit depth with 8-bit stencil.
    Depth24Stencil8,
}

/// Render target creation parameters, in physical framebuffer pixels.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TargetDesc {
    pub width: u32,
    pub height: u32,
    pub color: ColorFormat,
    pub depth: DepthFormat,
}

/// Handle to a vertex-shader uniform slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct UniformLocation(pub u32);

/// Component type of a vertex attribute.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttributeKind {
    Float,
}

impl AttributeKind {
    #[inline]
    pub const fn size_bytes(self) -> u32 {
        match self {
            AttributeKind::Float => 4,
        }
    }
}

/// One attribute loader: `components` values of `kind` read into input `slot`.
///
/// Attributes are packed in declaration order with no padding.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub slot: u32,
    pub kind: AttributeKind,
    pub components: u32,
}

impl VertexAttribute {
    #[inline]
    pub const fn size_bytes(self) -> u32 {
        self.kind.size_bytes() * self.components
    }
}

/// The graphics platform as seen by `BatchRenderer`.
///
/// Setup calls (`create_target`, `uniform_location`,
/// `configure_vertex_attributes`) run once at renderer construction and may
/// fail; a failure there is fatal for the renderer. Per-frame calls are
/// infallible and synchronous: when `draw_triangles` returns, the device no
/// longer reads from the slice it was given.
pub trait Device {
    /// Render target handle.
    type Target: Copy + std::fmt::Debug;

    fn create_target(&mut self, desc: &TargetDesc) -> Result<Self::Target>;

    /// Resolves a named vertex-shader uniform of the bound program.
    fn uniform_location(&self, name: &str) -> Result<UniformLocation>;

    fn configure_vertex_attributes(&mut self, attributes: &[VertexAttribute]) -> Result<()>;

    fn begin_frame(&mut self);

    /// Clears color to `color` and depth/stencil to `depth` (24-bit value).
    fn clear_target(&mut self, target: Self::Target, color: Color, depth: u32);

    fn set_draw_target(&mut self, target: Self::Target);

    /// Uploads a 4x4 matrix to a vertex-shader uniform slot.
    fn upload_matrix(&mut self, location: UniformLocation, matrix: &Mat4);

    /// Draws `vertices` as a triangle list using the current uniforms.
    ///
    /// A trailing partial triangle is ignored by primitive assembly.
    fn draw_triangles(&mut self, vertices: &[Vertex]);

    fn end_frame(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_sizes() {
        let a = VertexAttribute { slot: 1, kind: AttributeKind::Float, components: 4 };
        assert_eq!(a.size_bytes(), 16);
    }
}
