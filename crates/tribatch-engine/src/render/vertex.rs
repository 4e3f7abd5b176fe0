use bytemuck::{Pod, Zeroable};

use crate::device::{AttributeKind, VertexAttribute};
use crate::paint::Color;

/// Default depth for vertices built from 2D positions.
pub const DEFAULT_Z: f32 = 0.5;

/// A shaded point as laid out in the batch buffer.
///
/// Layout matches [`Vertex::ATTRIBUTES`]: position, normalized color, normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4], // channel / 255
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [VertexAttribute; 3] = [
        VertexAttribute { slot: 0, kind: AttributeKind::Float, components: 3 }, // position
        VertexAttribute { slot: 1, kind: AttributeKind::Float, components: 4 }, // color
        VertexAttribute { slot: 2, kind: AttributeKind::Float, components: 3 }, // normal
    ];

    pub const STRIDE: usize = std::mem::size_of::<Vertex>();

    #[inline]
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32, color: Color) -> Self {
        Self {
            position: [x, y, z],
            color: color.to_normalized(),
            normal: [nx, ny, nz],
        }
    }

    /// 3D position, zero normal.
    #[inline]
    pub fn from_xyz(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self::new(x, y, z, 0.0, 0.0, 0.0, color)
    }

    /// 2D position at [`DEFAULT_Z`], zero normal.
    #[inline]
    pub fn from_xy(x: f32, y: f32, color: Color) -> Self {
        Self::from_xyz(x, y, DEFAULT_Z, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_attributes() {
        let total: u32 = Vertex::ATTRIBUTES.iter().map(|a| a.size_bytes()).sum();
        assert_eq!(total as usize, Vertex::STRIDE);
        assert_eq!(Vertex::STRIDE, 40);
    }

    #[test]
    fn shorthand_defaults() {
        let c = Color::rgb(10, 20, 30);
        let v = Vertex::from_xy(1.0, 2.0, c);
        assert_eq!(v.position, [1.0, 2.0, 0.5]);
        assert_eq!(v.normal, [0.0; 3]);
        assert_eq!(v, Vertex::new(1.0, 2.0, 0.5, 0.0, 0.0, 0.0, c));
    }

    #[test]
    fn every_channel_value_normalizes() {
        for c in 0..=255u8 {
            let v = Vertex::from_xyz(0.0, 0.0, 0.0, Color::new(c, c, c, c));
            let expected = c as f32 / 255.0;
            assert_eq!(v.color, [expected; 4]);
        }
    }

    #[test]
    fn channels_land_in_their_own_slot() {
        let v = Vertex::from_xy(0.0, 0.0, Color::new(255, 0, 51, 0));
        assert_eq!(v.color, [1.0, 0.0, 0.2, 0.0]);
    }
}
