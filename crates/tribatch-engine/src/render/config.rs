use glam::Mat4;

use crate::device::{ColorFormat, DepthFormat, TargetDesc};
use crate::math;
use crate::paint::Color;

/// Smallest buffer that can always take a triangle after a flush.
///
/// The capacity check keeps one slot free, so three vertices need four slots.
pub const MIN_CAPACITY: usize = 4;

/// Construction parameters for [`BatchRenderer`](super::BatchRenderer).
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Logical (landscape) target width in pixels.
    pub width: u32,

    /// Logical (landscape) target height in pixels.
    pub height: u32,

    pub color_format: ColorFormat,
    pub depth_format: DepthFormat,

    /// Batch buffer capacity in vertices.
    pub capacity: usize,

    pub clear_color: Color,

    /// Depth range of the default projection.
    pub near: f32,
    pub far: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 240,
            color_format: ColorFormat::Rgba8,
            depth_format: DepthFormat::Depth24Stencil8,
            capacity: 3 * 500,
            clear_color: Color::BLACK,
            near: 0.0,
            far: 1.0,
        }
    }
}

impl RendererConfig {
    pub(crate) fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.width > 0 && self.height > 0,
            "target size must be non-zero (got {}x{})",
            self.width,
            self.height
        );
        anyhow::ensure!(
            self.capacity >= MIN_CAPACITY,
            "batch capacity must be at least {MIN_CAPACITY} vertices (got {})",
            self.capacity
        );
        anyhow::ensure!(
            self.near.is_finite() && self.far.is_finite() && self.near != self.far,
            "invalid depth range {}..{}",
            self.near,
            self.far
        );
        Ok(())
    }

    /// Physical framebuffer description.
    ///
    /// The framebuffer is portrait; the tilted projection rotates the
    /// landscape logical space onto it, so width and height swap here.
    pub fn target_desc(&self) -> TargetDesc {
        TargetDesc {
            width: self.height,
            height: self.width,
            color: self.color_format,
            depth: self.depth_format,
        }
    }

    /// Default projection covering the logical target.
    pub fn projection(&self) -> Mat4 {
        math::ortho_tilt(
            0.0,
            self.width as f32,
            0.0,
            self.height as f32,
            self.near,
            self.far,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_setup() {
        let c = RendererConfig::default();
        assert_eq!((c.width, c.height), (400, 240));
        assert_eq!(c.capacity, 1500);
        assert_eq!(c.clear_color, Color::new(0, 0, 0, 255));
        assert!(c.validate().is_ok());
    }

    #[test]
    fn target_is_portrait() {
        let d = RendererConfig::default().target_desc();
        assert_eq!((d.width, d.height), (240, 400));
        assert_eq!(d.color, ColorFormat::Rgba8);
        assert_eq!(d.depth, DepthFormat::Depth24Stencil8);
    }

    #[test]
    fn rejects_tiny_capacity() {
        let c = RendererConfig { capacity: 3, ..Default::default() };
        assert!(c.validate().is_err());
        let c = RendererConfig { capacity: MIN_CAPACITY, ..Default::default() };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_empty_target_and_depth_range() {
        assert!(RendererConfig { width: 0, ..Default::default() }.validate().is_err());
        assert!(RendererConfig { near: 1.0, far: 1.0, ..Default::default() }.validate().is_err());
    }
}
