//! 3D pipeline
//!
//! Per triangle: model-view-projection, trivial reject behind the camera,
//! perspective divide, viewport map, backface cull, flat Lambert shading,
//! then a depth-tested bounding-box fill (or three lines in wireframe mode).
//!
//! There is no frustum clipping. Triangles that are only partly behind the
//! camera are divided as-is and can smear across the screen.

use super::camera::Camera;
use super::draw2d::Renderer;
use super::framebuffer::Framebuffer;
use super::math::{barycentric, Vec2, Vec3, Vec4, DEGENERATE_AREA};
use super::matrix::Mat4;
use super::types::{Color, RasterSettings};
use crate::world::Mesh;

/// Per-call triangle accounting for `Renderer3D::draw_mesh`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub submitted: usize,
    /// Index triple pointed outside the vertex list
    pub invalid: usize,
    pub behind_camera: usize,
    pub culled: usize,
    pub degenerate: usize,
    pub drawn: usize,
    pub pixels_written: usize,
}

impl DrawStats {
    pub fn merge(&mut self, other: DrawStats) {
        self.submitted += other.submitted;
        self.invalid += other.invalid;
        self.behind_camera += other.behind_camera;
        self.culled += other.culled;
        self.degenerate += other.degenerate;
        self.drawn += other.drawn;
        self.pixels_written += other.pixels_written;
    }
}

/// Projected triangle ready for rasterization
struct ScreenTriangle {
    v0: Vec2,
    v1: Vec2,
    v2: Vec2,
    /// NDC z per vertex
    z: [f32; 3],
    color: Color,
}

/// 3D renderer layered on top of the 2D primitive renderer
#[derive(Debug, Clone)]
pub struct Renderer3D {
    renderer: Renderer,
    settings: RasterSettings,
}

impl Renderer3D {
    pub fn new(width: usize, height: usize) -> Self {
        Self::from_renderer(Renderer::new(Framebuffer::new(width, height)))
    }

    pub fn from_renderer(renderer: Renderer) -> Self {
        Self {
            renderer,
            settings: RasterSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: RasterSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &RasterSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut RasterSettings {
        &mut self.settings
    }

    pub fn renderer2d(&self) -> &Renderer {
        &self.renderer
    }

    pub fn renderer2d_mut(&mut self) -> &mut Renderer {
        &mut self.renderer
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.renderer.framebuffer()
    }

    pub fn framebuffer_mut(&mut self) -> &mut Framebuffer {
        self.renderer.framebuffer_mut()
    }

    /// Start-of-frame reset to the configured clear color
    pub fn clear(&mut self) {
        let color = self.settings.clear_color;
        self.framebuffer_mut().clear_all(color);
    }

    /// Render every triangle of `mesh` placed by `model` as seen by `camera`
    pub fn draw_mesh(&mut self, mesh: &Mesh, model: &Mat4, camera: &Camera, wireframe: bool) -> DrawStats {
        let mvp = camera.projection_matrix() * camera.view_matrix() * *model;
        let width = self.framebuffer().width() as f32;
        let height = self.framebuffer().height() as f32;

        let mut stats = DrawStats::default();

        for i in 0..mesh.triangle_count() {
            stats.submitted += 1;
            let Some([a, b, c]) = mesh.triangle(i) else {
                stats.invalid += 1;
                continue;
            };

            let clip = [
                mvp * Vec4::point(a.position),
                mvp * Vec4::point(b.position),
                mvp * Vec4::point(c.position),
            ];
            if clip.iter().all(|v| v.w <= 0.0) {
                stats.behind_camera += 1;
                continue;
            }

            let ndc = clip.map(Vec4::to_vec3);
            let screen = ndc.map(|n| Vec2::new((n.x + 1.0) * 0.5 * width, (1.0 - n.y) * 0.5 * height));

            // Signed area with Y pointing up again, so CCW as seen is positive
            let area = -(screen[1] - screen[0]).cross(screen[2] - screen[0]);
            if self.settings.backface_cull && area <= 0.0 {
                stats.culled += 1;
                continue;
            }
            if area.abs() < DEGENERATE_AREA {
                stats.degenerate += 1;
                continue;
            }

            let edge1 = b.position - a.position;
            let edge2 = c.position - a.position;
            let normal = model.transform_direction(edge1.cross(edge2)).normalize();
            let brightness = self.settings.shade_intensity(normal);
            let color = Color::average(a.color, b.color, c.color).shade(brightness);

            stats.drawn += 1;
            if wireframe {
                self.renderer.draw_line_v(screen[0], screen[1], color);
                self.renderer.draw_line_v(screen[1], screen[2], color);
                self.renderer.draw_line_v(screen[2], screen[0], color);
            } else {
                let tri = ScreenTriangle {
                    v0: screen[0],
                    v1: screen[1],
                    v2: screen[2],
                    z: [ndc[0].z, ndc[1].z, ndc[2].z],
                    color,
                };
                stats.pixels_written += rasterize_triangle(self.renderer.framebuffer_mut(), &tri);
            }
        }

        tracing::trace!(
            submitted = stats.submitted,
            invalid = stats.invalid,
            behind_camera = stats.behind_camera,
            culled = stats.culled,
            degenerate = stats.degenerate,
            drawn = stats.drawn,
            pixels = stats.pixels_written,
            "draw_mesh"
        );
        stats
    }

    /// Project one world point with this renderer's viewport
    pub fn project(&self, camera: &Camera, world: Vec3) -> Vec3 {
        camera.world_to_screen(world, self.framebuffer().width(), self.framebuffer().height())
    }
}

/// Bounding-box fill sampled at pixel centers. Returns pixels that passed
/// the depth test.
fn rasterize_triangle(fb: &mut Framebuffer, tri: &ScreenTriangle) -> usize {
    let min_x = tri.v0.x.min(tri.v1.x).min(tri.v2.x).floor().max(0.0) as i32;
    let max_x = tri.v0.x.max(tri.v1.x).max(tri.v2.x).ceil().min(fb.width() as f32 - 1.0) as i32;
    let min_y = tri.v0.y.min(tri.v1.y).min(tri.v2.y).floor().max(0.0) as i32;
    let max_y = tri.v0.y.max(tri.v1.y).max(tri.v2.y).ceil().min(fb.height() as f32 - 1.0) as i32;

    let mut written = 0;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let Some((w0, w1, w2)) = barycentric(p, tri.v0, tri.v1, tri.v2) else {
                continue;
            };
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let depth = w0 * tri.z[0] + w1 * tri.z[1] + w2 * tri.z[2];
            if fb.set_pixel_depth(x, y, depth, tri.color) {
                written += 1;
            }
        }
    }
    written
}
