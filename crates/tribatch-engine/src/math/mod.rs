//! Matrix helpers for the batch renderer's transform uniforms.
//!
//! Conventions:
//! - matrices multiply column vectors (`clip = projection * model * p`)
//! - clip-space z lands in `[-1, 0]` for `near..far`, the fixed-function
//!   depth convention; backends with a `[0, 1]` depth range negate z

use glam::Mat4;

#[inline]
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// Left-handed orthographic projection rotated a quarter turn.
///
/// Maps the landscape rectangle `[left, right] x [bottom, top]` onto a portrait
/// framebuffer: logical x runs down the physical rows and logical y across the
/// physical columns. `(left, bottom)` ends up at NDC `(-1, 1)`.
pub fn ortho_tilt(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rows = [
        [0.0, 2.0 / (top - bottom), 0.0, (bottom + top) / (bottom - top)],
        [2.0 / (left - right), 0.0, 0.0, (left + right) / (right - left)],
        [0.0, 0.0, 1.0 / (far - near), 0.5 * (near + far) / (near - far) - 0.5],
        [0.0, 0.0, 0.0, 1.0],
    ];
    // glam is column-major; build from rows and transpose.
    Mat4::from_cols_array_2d(&rows).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn approx(a: Vec4, b: Vec4) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn tilt_maps_corners_to_rotated_ndc() {
        let p = ortho_tilt(0.0, 400.0, 0.0, 240.0, 0.0, 1.0);

        let bl = p * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let tr = p * Vec4::new(400.0, 240.0, 0.0, 1.0);
        let br = p * Vec4::new(400.0, 0.0, 0.0, 1.0);

        assert!(approx(bl, Vec4::new(-1.0, 1.0, -1.0, 1.0)), "{bl:?}");
        assert!(approx(tr, Vec4::new(1.0, -1.0, -1.0, 1.0)), "{tr:?}");
        assert!(approx(br, Vec4::new(-1.0, -1.0, -1.0, 1.0)), "{br:?}");
    }

    #[test]
    fn tilt_depth_range() {
        let p = ortho_tilt(0.0, 400.0, 0.0, 240.0, 0.0, 1.0);
        let near = p * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let mid = p * Vec4::new(0.0, 0.0, 0.5, 1.0);
        let far = p * Vec4::new(0.0, 0.0, 1.0, 1.0);
        assert!((near.z + 1.0).abs() < 1e-6);
        assert!((mid.z + 0.5).abs() < 1e-6);
        assert!(far.z.abs() < 1e-6);
    }

    #[test]
    fn identity_is_glam_identity() {
        assert_eq!(identity(), Mat4::IDENTITY);
    }
}
