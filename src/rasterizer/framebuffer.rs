//! Color + depth buffer pair
//!
//! Both grids are row-major (`index = y * width + x`). Every pixel access is
//! bounds-checked: writes outside the buffer are dropped, reads return
//! black / +infinity.

use super::types::Color;

/// Framebuffer for software rendering
#[derive(Debug, Clone)]
pub struct Framebuffer {
    pixels: Vec<Color>,
    depth: Vec<f32>,
    width: usize,
    height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK; width * height],
            depth: vec![f32::INFINITY; width * height],
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate for a new resolution; contents reset like a fresh buffer
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::new(width, height);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y * self.width + x)
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(idx) = self.index(x, y) {
            self.pixels[idx] = color;
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Color {
        match self.index(x, y) {
            Some(idx) => self.pixels[idx],
            None => Color::BLACK,
        }
    }

    pub fn get_depth(&self, x: i32, y: i32) -> f32 {
        match self.index(x, y) {
            Some(idx) => self.depth[idx],
            None => f32::INFINITY,
        }
    }

    /// True when `depth` is strictly closer than what is stored. Ties lose.
    pub fn depth_test(&self, x: i32, y: i32, depth: f32) -> bool {
        match self.index(x, y) {
            Some(idx) => depth < self.depth[idx],
            None => false,
        }
    }

    /// Depth-tested write: color and depth are stored only if `depth` is
    /// strictly less than the stored depth. Returns whether it wrote.
    pub fn set_pixel_depth(&mut self, x: i32, y: i32, depth: f32, color: Color) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.pixels[idx] = color;
            return true;
        }
        false
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn clear_depth(&mut self) {
        self.depth.fill(f32::INFINITY);
    }

    /// Start-of-frame reset: color to `color`, depth to +infinity
    pub fn clear_all(&mut self, color: Color) {
        self.clear(color);
        self.clear_depth();
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    /// Packed pixels (R in the low byte), row-major, for presentation layers
    pub fn to_u32_buffer(&self) -> Vec<u32> {
        self.pixels.iter().map(|c| c.to_u32()).collect()
    }

    /// RGBA byte stream, 4 bytes per pixel (texture upload / PNG export)
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| c.to_bytes()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_state() {
        let fb = Framebuffer::new(4, 3);
        assert_eq!(fb.pixels().len(), 12);
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
        assert!(fb.depth_buffer().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn test_row_major_layout() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(1, 2, Color::RED);
        assert_eq!(fb.pixels()[2 * 4 + 1], Color::RED);
        assert_eq!(fb.get_pixel(1, 2), Color::RED);
    }

    #[test]
    fn test_out_of_bounds_is_silent() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(-1, 0, Color::RED);
        fb.set_pixel(4, 0, Color::RED);
        fb.set_pixel(0, 3, Color::RED);
        assert!(!fb.set_pixel_depth(10, 10, 0.0, Color::RED));
        assert!(fb.pixels().iter().all(|&c| c == Color::BLACK));
        assert_eq!(fb.get_pixel(-5, 1), Color::BLACK);
        assert_eq!(fb.get_depth(0, 99), f32::INFINITY);
        assert!(!fb.depth_test(-1, -1, -100.0));
    }

    #[test]
    fn test_depth_keeps_nearest() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(fb.set_pixel_depth(0, 0, 0.5, Color::RED));
        assert!(fb.set_pixel_depth(0, 0, 0.25, Color::GREEN));
        assert_eq!(fb.get_depth(0, 0), 0.25);
        assert_eq!(fb.get_pixel(0, 0), Color::GREEN);

        assert!(!fb.set_pixel_depth(0, 0, 0.75, Color::BLUE));
        assert_eq!(fb.get_depth(0, 0), 0.25);
        assert_eq!(fb.get_pixel(0, 0), Color::GREEN);
    }

    #[test]
    fn test_depth_tie_keeps_existing() {
        let mut fb = Framebuffer::new(2, 2);
        fb.set_pixel_depth(1, 1, 0.3, Color::RED);
        assert!(!fb.depth_test(1, 1, 0.3));
        assert!(!fb.set_pixel_depth(1, 1, 0.3, Color::BLUE));
        assert_eq!(fb.get_pixel(1, 1), Color::RED);
    }

    #[test]
    fn test_clear_all_resets_both() {
        let mut fb = Framebuffer::new(3, 3);
        fb.set_pixel_depth(1, 1, -0.5, Color::RED);
        fb.clear_all(Color::BLUE);
        assert!(fb.pixels().iter().all(|&c| c == Color::BLUE));
        assert_eq!(fb.get_depth(1, 1), f32::INFINITY);
    }

    #[test]
    fn test_export_buffers() {
        let mut fb = Framebuffer::new(2, 1);
        fb.set_pixel(1, 0, Color::with_alpha(1, 2, 3, 4));
        assert_eq!(fb.to_u32_buffer(), vec![0xFF00_0000, 0x0403_0201]);
        assert_eq!(fb.to_rgba_bytes(), vec![0, 0, 0, 255, 1, 2, 3, 4]);
    }

    #[test]
    fn test_resize() {
        let mut fb = Framebuffer::new(2, 2);
        fb.resize(5, 4);
        assert_eq!((fb.width(), fb.height()), (5, 4));
        assert_eq!(fb.pixels().len(), 20);
    }
}
