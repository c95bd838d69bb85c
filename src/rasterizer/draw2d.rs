//! 2D primitives: lines, circles, filled triangles, polygon outlines
//!
//! All drawing goes through [`PixelTarget`], so the same routines work on a
//! [`Framebuffer`], on a [`Renderer`], or on a recording test double.

use super::font;
use super::framebuffer::Framebuffer;
use super::math::{barycentric, Vec2};
use super::types::Color;

/// A destination exposing a single pixel write.
///
/// Implementations must tolerate any coordinate, including negative and
/// out-of-range ones.
pub trait PixelTarget {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
}

impl PixelTarget for Framebuffer {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        Framebuffer::set_pixel(self, x, y, color);
    }
}

impl<T: PixelTarget + ?Sized> PixelTarget for &mut T {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        (**self).set_pixel(x, y, color);
    }
}

/// Bresenham line, endpoints inclusive, integer arithmetic only.
///
/// Steps once per pixel along the major axis, so callers with a bounded
/// target should clip first (see [`Renderer::draw_line`]).
pub fn draw_line<T: PixelTarget + ?Sized>(target: &mut T, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    // i64 so spans across the whole i32 range cannot overflow
    let dx = (x1 as i64 - x0 as i64).abs();
    let dy = (y1 as i64 - y0 as i64).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        target.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

/// Midpoint circle outline with 8-way symmetry
pub fn draw_circle<T: PixelTarget + ?Sized>(target: &mut T, cx: i32, cy: i32, radius: i32, color: Color) {
    let mut x = 0;
    let mut y = radius;
    let mut d = 1 - radius;

    while x <= y {
        for (px, py) in [(x, y), (-x, y), (x, -y), (-x, -y), (y, x), (-y, x), (y, -x), (-y, -x)] {
            target.set_pixel(cx + px, cy + py, color);
        }
        if d < 0 {
            d += 2 * x + 3;
        } else {
            d += 2 * (x - y) + 5;
            y -= 1;
        }
        x += 1;
    }
}

/// Filled circle: the midpoint walk, emitting horizontal spans
pub fn draw_filled_circle<T: PixelTarget + ?Sized>(target: &mut T, cx: i32, cy: i32, radius: i32, color: Color) {
    let mut span = |x1: i32, x2: i32, y: i32| {
        for x in x1.min(x2)..=x1.max(x2) {
            target.set_pixel(x, y, color);
        }
    };

    let mut x = 0;
    let mut y = radius;
    let mut d = 1 - radius;

    while x <= y {
        span(cx - x, cx + x, cy + y);
        span(cx - x, cx + x, cy - y);
        span(cx - y, cx + y, cy + x);
        span(cx - y, cx + y, cy - x);
        if d < 0 {
            d += 2 * x + 3;
        } else {
            d += 2 * (x - y) + 5;
            y -= 1;
        }
        x += 1;
    }
}

/// Filled 2D triangle (no depth), sampled at pixel centers. Either winding
/// is accepted; zero-area triangles draw nothing.
pub fn draw_triangle<T: PixelTarget + ?Sized>(target: &mut T, v0: Vec2, v1: Vec2, v2: Vec2, color: Color) {
    fill_triangle(target, v0, v1, v2, color, None);
}

/// Triangle fill with the scan box optionally limited to `clip`
/// (`width`, `height`).
fn fill_triangle<T: PixelTarget + ?Sized>(
    target: &mut T,
    v0: Vec2,
    v1: Vec2,
    v2: Vec2,
    color: Color,
    clip: Option<(usize, usize)>,
) {
    if barycentric(v0, v0, v1, v2).is_none() {
        return;
    }

    let (mut min_x, mut max_x) = (v0.x.min(v1.x).min(v2.x).floor(), v0.x.max(v1.x).max(v2.x).floor());
    let (mut min_y, mut max_y) = (v0.y.min(v1.y).min(v2.y).floor(), v0.y.max(v1.y).max(v2.y).floor());
    if let Some((width, height)) = clip {
        min_x = min_x.max(0.0);
        min_y = min_y.max(0.0);
        max_x = max_x.min(width as f32 - 1.0);
        max_y = max_y.min(height as f32 - 1.0);
    }
    if !(min_x <= max_x && min_y <= max_y) {
        return;
    }

    for y in min_y as i32..=max_y as i32 {
        for x in min_x as i32..=max_x as i32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            if let Some((w0, w1, w2)) = barycentric(p, v0, v1, v2) {
                if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                    target.set_pixel(x, y, color);
                }
            }
        }
    }
}

/// Closed outline through `vertices`. Fewer than two vertices draws nothing.
pub fn draw_polygon<T: PixelTarget + ?Sized>(target: &mut T, vertices: &[Vec2], color: Color) {
    if vertices.len() < 2 {
        return;
    }
    for (i, p0) in vertices.iter().enumerate() {
        let p1 = vertices[(i + 1) % vertices.len()];
        draw_line(target, p0.x as i32, p0.y as i32, p1.x as i32, p1.y as i32, color);
    }
}

/// Liang-Barsky clip of a segment to `[0, max_x] x [0, max_y]`.
///
/// The parameter runs from the endpoint nearer the origin, which keeps the
/// crossings accurate when the other end is far off screen. Results are
/// clamped to the rectangle.
fn clip_segment(p0: (f64, f64), p1: (f64, f64), max_x: f64, max_y: f64) -> Option<((f64, f64), (f64, f64))> {
    let reach = |p: (f64, f64)| p.0.abs().max(p.1.abs());
    let (p0, p1) = if reach(p1) < reach(p0) { (p1, p0) } else { (p0, p1) };
    let (dx, dy) = (p1.0 - p0.0, p1.1 - p0.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    for (p, q) in [(-dx, p0.0), (dx, max_x - p0.0), (-dy, p0.1), (dy, max_y - p0.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let at = |t: f64| ((p0.0 + t * dx).clamp(0.0, max_x), (p0.1 + t * dy).clamp(0.0, max_y));
    Some((at(t0), at(t1)))
}

/// 2D drawing front-end over an owned framebuffer
#[derive(Debug, Clone)]
pub struct Renderer {
    fb: Framebuffer,
}

impl Renderer {
    pub fn new(fb: Framebuffer) -> Self {
        Self { fb }
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        &mut self.fb
    }

    pub fn into_framebuffer(self) -> Framebuffer {
        self.fb
    }

    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.fb.set_pixel(x, y, color);
    }

    fn contains(&self, x: f64, y: f64) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.fb.width() as f64 - 1.0 && y <= self.fb.height() as f64 - 1.0
    }

    /// Lines leaving the framebuffer are clipped to it before stepping
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (p0, p1) = ((x0 as f64, y0 as f64), (x1 as f64, y1 as f64));
        if self.contains(p0.0, p0.1) && self.contains(p1.0, p1.1) {
            draw_line(&mut self.fb, x0, y0, x1, y1, color);
            return;
        }
        if let Some((a, b)) = self.clip(p0, p1) {
            let (a, b) = ((a.0.round(), a.1.round()), (b.0.round(), b.1.round()));
            draw_line(&mut self.fb, a.0 as i32, a.1 as i32, b.0 as i32, b.1 as i32, color);
        }
    }

    /// Float endpoints are truncated toward zero. Segments with a NaN or
    /// infinite endpoint are dropped.
    pub fn draw_line_v(&mut self, p0: Vec2, p1: Vec2, color: Color) {
        if ![p0.x, p0.y, p1.x, p1.y].iter().all(|c| c.is_finite()) {
            return;
        }
        let (a, b) = ((p0.x.trunc() as f64, p0.y.trunc() as f64), (p1.x.trunc() as f64, p1.y.trunc() as f64));
        if self.contains(a.0, a.1) && self.contains(b.0, b.1) {
            draw_line(&mut self.fb, a.0 as i32, a.1 as i32, b.0 as i32, b.1 as i32, color);
            return;
        }
        if let Some((a, b)) = self.clip(a, b) {
            let (a, b) = ((a.0.round(), a.1.round()), (b.0.round(), b.1.round()));
            draw_line(&mut self.fb, a.0 as i32, a.1 as i32, b.0 as i32, b.1 as i32, color);
        }
    }

    fn clip(&self, p0: (f64, f64), p1: (f64, f64)) -> Option<((f64, f64), (f64, f64))> {
        let (w, h) = (self.fb.width(), self.fb.height());
        if w == 0 || h == 0 {
            return None;
        }
        clip_segment(p0, p1, w as f64 - 1.0, h as f64 - 1.0)
    }

    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        draw_circle(&mut self.fb, cx, cy, radius, color);
    }

    pub fn draw_filled_circle(&mut self, cx: i32, cy: i32, radius: i32, color: Color) {
        draw_filled_circle(&mut self.fb, cx, cy, radius, color);
    }

    /// Scans only the part of the bounding box inside the framebuffer
    pub fn draw_triangle(&mut self, v0: Vec2, v1: Vec2, v2: Vec2, color: Color) {
        let clip = (self.fb.width(), self.fb.height());
        fill_triangle(&mut self.fb, v0, v1, v2, color, Some(clip));
    }

    pub fn draw_polygon(&mut self, vertices: &[Vec2], color: Color) {
        if vertices.len() < 2 {
            return;
        }
        for (i, &p0) in vertices.iter().enumerate() {
            self.draw_line_v(p0, vertices[(i + 1) % vertices.len()], color);
        }
    }

    pub fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color, scale: i32, spacing: i32) {
        font::draw_string(&mut self.fb, text, x, y, color, scale, spacing);
    }

    pub fn text_width(&self, text: &str, scale: i32, spacing: i32) -> i32 {
        font::string_width(text, scale, spacing)
    }
}

impl PixelTarget for Renderer {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.draw_pixel(x, y, color);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::BTreeSet;

    /// Records every write, including out-of-range ones
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub pixels: Vec<(i32, i32)>,
    }

    impl Recorder {
        pub fn set(&self) -> BTreeSet<(i32, i32)> {
            self.pixels.iter().copied().collect()
        }
    }

    impl PixelTarget for Recorder {
        fn set_pixel(&mut self, x: i32, y: i32, _color: Color) {
            self.pixels.push((x, y));
        }
    }

    #[test]
    fn test_horizontal_line_exact() {
        let mut rec = Recorder::default();
        draw_line(&mut rec, 0, 0, 5, 0, Color::WHITE);
        assert_eq!(rec.pixels, (0..=5).map(|x| (x, 0)).collect::<Vec<_>>());
    }

    #[test]
    fn test_line_is_symmetric_and_connected() {
        let mut a = Recorder::default();
        draw_line(&mut a, 1, 1, 8, 4, Color::WHITE);
        assert_eq!(a.pixels.first(), Some(&(1, 1)));
        assert_eq!(a.pixels.last(), Some(&(8, 4)));
        // One pixel per major-axis step
        assert_eq!(a.pixels.len(), 8);
        for w in a.pixels.windows(2) {
            assert!((w[1].0 - w[0].0).abs() <= 1 && (w[1].1 - w[0].1).abs() <= 1);
        }
    }

    #[test]
    fn test_line_classic_pixel_set() {
        // Reference output of the classic err = dx - dy formulation
        let mut rec = Recorder::default();
        draw_line(&mut rec, 0, 0, 6, 2, Color::WHITE);
        assert_eq!(
            rec.pixels,
            vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 1), (5, 2), (6, 2)]
        );
    }

    #[test]
    fn test_vertical_and_reverse_lines() {
        let mut rec = Recorder::default();
        draw_line(&mut rec, 3, 4, 3, 0, Color::WHITE);
        assert_eq!(rec.pixels, vec![(3, 4), (3, 3), (3, 2), (3, 1), (3, 0)]);

        let mut rec = Recorder::default();
        draw_line(&mut rec, 2, 2, 2, 2, Color::WHITE);
        assert_eq!(rec.pixels, vec![(2, 2)]);
    }

    #[test]
    fn test_circle_symmetric_points() {
        let mut rec = Recorder::default();
        draw_circle(&mut rec, 10, 10, 5, Color::WHITE);
        let set = rec.set();
        for p in [(15, 10), (5, 10), (10, 15), (10, 5)] {
            assert!(set.contains(&p), "missing {:?}", p);
        }
        for &(x, y) in &set {
            assert!(set.contains(&(20 - x, y)));
            assert!(set.contains(&(x, 20 - y)));
            assert!(set.contains(&(y, x)));
            let d2 = (x - 10).pow(2) + (y - 10).pow(2);
            assert!((16..=36).contains(&d2), "({}, {}) off the ring", x, y);
        }
    }

    #[test]
    fn test_circle_midpoint_pixel_set() {
        // d starts at 1 - r = -4: (0,5) (1,5) then two inside steps
        let mut rec = Recorder::default();
        draw_circle(&mut rec, 0, 0, 5, Color::WHITE);
        let set = rec.set();
        let octant: Vec<_> = set.iter().copied().filter(|&(x, y)| 0 <= x && x <= y).collect();
        assert_eq!(octant, vec![(0, 5), (1, 5), (2, 5), (3, 4)]);
        assert_eq!(set.len(), 28);
    }

    #[test]
    fn test_circle_radius_zero_is_single_point() {
        let mut rec = Recorder::default();
        draw_circle(&mut rec, 3, 3, 0, Color::WHITE);
        assert_eq!(rec.set().into_iter().collect::<Vec<_>>(), vec![(3, 3)]);
    }

    #[test]
    fn test_filled_circle_covers_interior() {
        let mut rec = Recorder::default();
        draw_filled_circle(&mut rec, 0, 0, 4, Color::WHITE);
        let set = rec.set();
        for x in -3..=3 {
            assert!(set.contains(&(x, 0)));
        }
        for &(x, y) in &set {
            assert!(x * x + y * y <= 25);
        }
    }

    #[test]
    fn test_triangle_fill_either_winding() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(8.0, 0.0);
        let c = Vec2::new(0.0, 8.0);

        let mut cw = Recorder::default();
        draw_triangle(&mut cw, a, b, c, Color::WHITE);
        let mut ccw = Recorder::default();
        draw_triangle(&mut ccw, a, c, b, Color::WHITE);

        assert_eq!(cw.set(), ccw.set());
        assert!(cw.set().contains(&(2, 2)));
        assert!(!cw.set().contains(&(7, 7)));
        // Centers (x + 0.5, y + 0.5) with x + y <= 7: 8 + 7 + ... + 1
        assert_eq!(cw.set().len(), 36);
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut rec = Recorder::default();
        draw_triangle(
            &mut rec,
            Vec2::new(0.0, 0.0),
            Vec2::new(4.0, 4.0),
            Vec2::new(8.0, 8.0),
            Color::WHITE,
        );
        assert!(rec.pixels.is_empty());
    }

    #[test]
    fn test_polygon_closes_loop() {
        let mut rec = Recorder::default();
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(3.0, 0.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(0.0, 3.0),
        ];
        draw_polygon(&mut rec, &square, Color::WHITE);
        let set = rec.set();
        assert_eq!(set.len(), 12);
        assert!(set.contains(&(0, 2)));

        let mut none = Recorder::default();
        draw_polygon(&mut none, &square[..1], Color::WHITE);
        assert!(none.pixels.is_empty());
    }

    #[test]
    fn test_renderer_draws_into_framebuffer() {
        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_line_v(Vec2::new(0.9, 1.0), Vec2::new(3.7, 1.0), Color::RED);
        let fb = r.framebuffer();
        assert_eq!(fb.get_pixel(0, 1), Color::RED);
        assert_eq!(fb.get_pixel(3, 1), Color::RED);
        assert_eq!(fb.get_pixel(4, 1), Color::BLACK);
    }

    #[test]
    fn test_renderer_clips_lines_to_framebuffer() {
        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_line(i32::MIN, 3, i32::MAX, 3, Color::RED);
        let fb = r.framebuffer();
        for x in 0..8 {
            assert_eq!(fb.get_pixel(x, 3), Color::RED);
            assert_eq!(fb.get_pixel(x, 2), Color::BLACK);
        }

        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_line_v(Vec2::new(-1.0e6, -1.0e6), Vec2::new(1.0e6, 1.0e6), Color::GREEN);
        assert_eq!(r.framebuffer().get_pixel(0, 0), Color::GREEN);
        assert_eq!(r.framebuffer().get_pixel(7, 7), Color::GREEN);

        // One end far past the edge: the visible part still starts at the near end
        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_line_v(Vec2::new(2.0, 4.0), Vec2::new(-3.0e31, 4.0), Color::GREEN);
        assert_eq!(r.framebuffer().get_pixel(2, 4), Color::GREEN);
        assert_eq!(r.framebuffer().get_pixel(0, 4), Color::GREEN);
        assert_eq!(r.framebuffer().get_pixel(3, 4), Color::BLACK);
    }

    #[test]
    fn test_renderer_drops_non_finite_lines() {
        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_line_v(Vec2::new(f32::NAN, 1.0), Vec2::new(3.0, 3.0), Color::RED);
        r.draw_line_v(Vec2::new(1.0, 1.0), Vec2::new(f32::INFINITY, 3.0), Color::RED);
        assert!(r.framebuffer().pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_renderer_triangle_clamped_to_framebuffer() {
        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_triangle(
            Vec2::new(-1.0e6, -1.0e6),
            Vec2::new(1.0e6, -1.0e6),
            Vec2::new(0.0, 1.0e6),
            Color::BLUE,
        );
        assert!(r.framebuffer().pixels().iter().all(|&c| c == Color::BLUE));

        let mut r = Renderer::new(Framebuffer::new(8, 8));
        r.draw_triangle(
            Vec2::new(100.0, 100.0),
            Vec2::new(200.0, 100.0),
            Vec2::new(100.0, 200.0),
            Color::BLUE,
        );
        assert!(r.framebuffer().pixels().iter().all(|&c| c == Color::BLACK));
    }
}
