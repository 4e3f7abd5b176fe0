/// 8-bit straight-alpha RGBA color.
///
/// The packed form is `r << 24 | g << 16 | b << 8 | a` (`0xRRGGBBAA`), which is
/// also what render targets are cleared with.
///
/// Only the bit pattern matters when decoding: a signed value should be passed
/// as `value as u32`, which decodes identically to the unsigned pattern.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color (alpha 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Decodes a packed `0xRRGGBBAA` value.
    #[inline]
    pub const fn from_u32(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_be_bytes();
        Self { r, g, b, a }
    }

    /// Encodes into `0xRRGGBBAA`. Exact inverse of [`from_u32`](Self::from_u32).
    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// Channels divided by 255, in `[0, 1]`.
    #[inline]
    pub fn to_normalized(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl From<u32> for Color {
    #[inline]
    fn from(packed: u32) -> Self {
        Self::from_u32(packed)
    }
}

impl From<Color> for u32 {
    #[inline]
    fn from(c: Color) -> Self {
        c.to_u32()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── packing ───────────────────────────────────────────────────────────

    #[test]
    fn channel_layout_is_rgba_msb_first() {
        let c = Color::from_u32(0x1122_3344);
        assert_eq!(c, Color::new(0x11, 0x22, 0x33, 0x44));
        assert_eq!(c.to_u32(), 0x1122_3344);
    }

    #[test]
    fn round_trips_edge_patterns() {
        for x in [0u32, 1, 0xFF, 0xFF00, 0x8000_0000, 0x7FFF_FFFF, u32::MAX] {
            assert_eq!(Color::from_u32(x).to_u32(), x);
        }
    }

    #[test]
    fn round_trips_strided_sweep() {
        // Odd stride so every byte position sees varied values.
        let mut x: u32 = 0;
        for _ in 0..100_000 {
            assert_eq!(u32::from(Color::from(x)), x);
            x = x.wrapping_add(0x0001_A3C5);
        }
    }

    #[test]
    fn signed_input_decodes_by_bit_pattern() {
        for s in [-1i32, i32::MIN, -16_777_216, 0x0102_0304, -2] {
            let c = Color::from_u32(s as u32);
            assert_eq!(c.to_u32() as i32, s);
        }
        assert_eq!(Color::from_u32(-1i32 as u32), Color::new(255, 255, 255, 255));
    }

    // ── constructors ──────────────────────────────────────────────────────

    #[test]
    fn rgb_defaults_alpha_to_opaque() {
        assert_eq!(Color::rgb(1, 2, 3).a, 255);
        assert_eq!(Color::default(), Color::BLACK);
        assert_eq!(Color::BLACK.to_u32(), 0x0000_00FF);
    }

    #[test]
    fn normalized_channels() {
        let n = Color::new(0, 51, 255, 102).to_normalized();
        assert_eq!(n, [0.0, 51.0 / 255.0, 1.0, 102.0 / 255.0]);
    }
}
