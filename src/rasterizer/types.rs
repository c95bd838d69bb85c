//! Core types for the rasterizer

use serde::{Serialize, Deserialize};
use super::math::Vec3;

/// RGBA color (0-255 per channel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };
    pub const YELLOW: Color = Color { r: 255, g: 255, b: 0, a: 255 };
    pub const CYAN: Color = Color { r: 0, g: 255, b: 255, a: 255 };
    pub const MAGENTA: Color = Color { r: 255, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// From normalized floats. Inputs are clamped to [0, 1] first.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
        Self {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
            a: to_byte(a),
        }
    }

    /// Back to normalized floats (GPU vertex colors)
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }

    /// Alpha-over compositing of `fg` onto `bg`. The result is always opaque.
    pub fn blend(fg: Color, bg: Color) -> Color {
        let alpha = fg.a as f32 / 255.0;
        let inv = 1.0 - alpha;
        let mix = |f: u8, b: u8| (f as f32 * alpha + b as f32 * inv) as u8;
        Color {
            r: mix(fg.r, bg.r),
            g: mix(fg.g, bg.g),
            b: mix(fg.b, bg.b),
            a: 255,
        }
    }

    /// Apply shading (multiply by intensity 0.0-1.0)
    pub fn shade(self, intensity: f32) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * i) as u8,
            g: (self.g as f32 * i) as u8,
            b: (self.b as f32 * i) as u8,
            a: self.a,
        }
    }

    /// Integer average of three colors, alpha forced opaque
    pub fn average(a: Color, b: Color, c: Color) -> Color {
        let avg = |x: u8, y: u8, z: u8| ((x as u32 + y as u32 + z as u32) / 3) as u8;
        Color {
            r: avg(a.r, b.r, c.r),
            g: avg(a.g, b.g, c.g),
            b: avg(a.b, b.b, c.b),
            a: 255,
        }
    }

    /// Pack as R | G << 8 | B << 16 | A << 24 (R in the least significant byte)
    pub fn to_u32(self) -> u32 {
        (self.r as u32) | ((self.g as u32) << 8) | ((self.b as u32) << 16) | ((self.a as u32) << 24)
    }

    pub fn from_u32(packed: u32) -> Self {
        let [r, g, b, a] = packed.to_le_bytes();
        Self { r, g, b, a }
    }

    /// Convert to [u8; 4] for texture upload
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with position, normal, and color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Color,
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            normal: Vec3::UP,
            color: Color::WHITE,
        }
    }
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, color: Color) -> Self {
        Self { position, normal, color }
    }

    pub fn from_pos(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Default::default()
        }
    }
}

/// Rasterizer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterSettings {
    /// Backface culling
    pub backface_cull: bool,
    /// Direction *towards* the light, world space (normalized on use)
    pub light_dir: Vec3,
    /// Ambient light intensity (0.0-1.0)
    pub ambient: f32,
    /// Fill color for `clear_all` at the start of a frame
    pub clear_color: Color,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            backface_cull: true,
            light_dir: Vec3::new(0.3, 0.8, 0.5).normalize(),
            ambient: 0.3,
            clear_color: Color::BLACK,
        }
    }
}

impl RasterSettings {
    /// Flat Lambert term for a world-space face normal:
    /// ambient + (1 - ambient) * max(0, n·l), clamped to [0, 1]
    pub fn shade_intensity(&self, normal: Vec3) -> f32 {
        let diffuse = normal.dot(self.light_dir.normalize()).max(0.0);
        (self.ambient + (1.0 - self.ambient) * diffuse).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_opaque_black() {
        assert_eq!(Color::default(), Color::with_alpha(0, 0, 0, 255));
    }

    #[test]
    fn test_from_f32_clamps() {
        let c = Color::from_f32(-0.5, 0.5, 2.0, 1.0);
        assert_eq!(c, Color::with_alpha(0, 127, 255, 255));
    }

    #[test]
    fn test_blend_half_red_over_black() {
        let c = Color::blend(Color::with_alpha(255, 0, 0, 128), Color::BLACK);
        assert!((c.r as i32 - 127).abs() <= 1, "r = {}", c.r);
        assert_eq!((c.g, c.b, c.a), (0, 0, 255));
    }

    #[test]
    fn test_blend_extremes() {
        let fg = Color::with_alpha(10, 20, 30, 255);
        let bg = Color::with_alpha(200, 100, 50, 7);
        assert_eq!(Color::blend(fg, bg), Color::new(10, 20, 30));
        let clear = Color::with_alpha(10, 20, 30, 0);
        assert_eq!(Color::blend(clear, bg), Color::new(200, 100, 50));
    }

    #[test]
    fn test_pack_byte_order() {
        let c = Color::with_alpha(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.to_u32(), 0x4433_2211);
        assert_eq!(Color::from_u32(0x4433_2211), c);
        assert_eq!(c.to_bytes(), [0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn test_shade_and_average() {
        assert_eq!(Color::WHITE.shade(0.5), Color::new(127, 127, 127));
        assert_eq!(Color::WHITE.shade(3.0), Color::WHITE);
        let avg = Color::average(Color::RED, Color::GREEN, Color::with_alpha(0, 0, 255, 0));
        assert_eq!(avg, Color::new(85, 85, 85));
    }

    #[test]
    fn test_to_rgba_f32() {
        let [r, g, b, a] = Color::with_alpha(255, 0, 51, 255).to_rgba_f32();
        assert_relative_eq!(r, 1.0);
        assert_relative_eq!(g, 0.0);
        assert_relative_eq!(b, 0.2);
        assert_relative_eq!(a, 1.0);
    }

    #[test]
    fn test_vertex_defaults() {
        let v = Vertex::default();
        assert_eq!(v.normal, Vec3::UP);
        assert_eq!(v.color, Color::WHITE);
        assert_eq!(Vertex::from_pos(1.0, 2.0, 3.0).position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_shade_intensity_range() {
        let s = RasterSettings::default();
        assert_relative_eq!(s.shade_intensity(s.light_dir), 1.0, epsilon = 1e-5);
        assert_relative_eq!(s.shade_intensity(-s.light_dir), s.ambient);
        assert_relative_eq!(s.shade_intensity(Vec3::ZERO), s.ambient);
    }
}
