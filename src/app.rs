//! Demo scene state
//!
//! A spinning letter N made of three scaled cubes, sitting in a room corner
//! (floor slab plus two walls) with a small sphere marking the light.
//! Window handling lives in main.rs; everything here is deterministic so it
//! can be driven from tests.

use crate::rasterizer::{Camera, Color, DrawStats, Mat4, Renderer3D, Vec3};
use crate::world::{create_cube, create_sphere, Mesh, SceneConfig};

/// Seconds between FPS readouts
pub const FPS_WINDOW: f32 = 0.5;

/// Letter spin, radians per second
const LETTER_SPIN: f32 = 0.6;

const LETTER_COLOR: Color = Color { r: 40, g: 190, b: 255, a: 255 };
const FLOOR_COLOR: Color = Color { r: 160, g: 160, b: 160, a: 255 };
const WALL_COLOR: Color = Color { r: 190, g: 190, b: 190, a: 255 };
const LIGHT_COLOR: Color = Color { r: 255, g: 255, b: 200, a: 255 };
const FPS_COLOR: Color = Color::WHITE;

/// Per-frame movement intents, each in [-1, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub forward: f32,
    pub right: f32,
    pub up: f32,
    /// Positive turns right
    pub yaw: f32,
    /// Positive looks up
    pub pitch: f32,
}

impl FrameInput {
    pub fn is_idle(&self) -> bool {
        *self == FrameInput::default()
    }
}

/// Frame-rate estimate averaged over `FPS_WINDOW` seconds
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame. Returns the new reading when a window closes.
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < FPS_WINDOW {
            return None;
        }
        self.fps = self.frames as f32 / self.elapsed;
        self.frames = 0;
        self.elapsed = 0.0;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// One draw call: which mesh, placed where
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prop {
    LetterBar,
    Floor,
    Wall,
    LightMarker,
}

pub struct Demo {
    pub camera: Camera,
    pub wireframe: bool,
    move_speed: f32,
    rotate_speed: f32,
    light_dir: Vec3,
    time: f32,
    fps: FpsCounter,

    letter_bar: Mesh,
    floor: Mesh,
    wall: Mesh,
    light_marker: Mesh,
}

impl Demo {
    pub fn new(width: usize, height: usize, config: &SceneConfig) -> Self {
        let mut camera = config.camera();
        camera.set_aspect_ratio(width as f32 / height.max(1) as f32);

        let mut floor = create_cube(1.0, FLOOR_COLOR);
        let mut wall = create_cube(1.0, WALL_COLOR);
        // Opaque from every viewing angle
        floor.make_double_sided();
        wall.make_double_sided();

        let demo = Self {
            camera,
            wireframe: config.wireframe,
            move_speed: config.move_speed,
            rotate_speed: config.rotate_speed,
            light_dir: config.raster.light_dir.normalize(),
            time: 0.0,
            fps: FpsCounter::new(),
            letter_bar: create_cube(1.0, LETTER_COLOR),
            floor,
            wall,
            light_marker: create_sphere(0.3, 10, 10, LIGHT_COLOR),
        };

        tracing::info!(
            letter_bar = demo.letter_bar.triangle_count(),
            floor = demo.floor.triangle_count(),
            wall = demo.wall.triangle_count(),
            light_marker = demo.light_marker.triangle_count(),
            "demo scene ready"
        );
        demo
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn fps(&self) -> f32 {
        self.fps.fps()
    }

    pub fn toggle_wireframe(&mut self) {
        self.wireframe = !self.wireframe;
    }

    pub fn mesh(&self, prop: Prop) -> &Mesh {
        match prop {
            Prop::LetterBar => &self.letter_bar,
            Prop::Floor => &self.floor,
            Prop::Wall => &self.wall,
            Prop::LightMarker => &self.light_marker,
        }
    }

    /// Apply one frame of input and advance the clock
    pub fn update(&mut self, input: FrameInput, dt: f32) {
        let step = self.move_speed * dt;
        let turn = self.rotate_speed * dt;

        if input.forward != 0.0 {
            self.camera.move_forward(input.forward * step);
        }
        if input.right != 0.0 {
            self.camera.move_right(input.right * step);
        }
        if input.up != 0.0 {
            self.camera.move_up(input.up * step);
        }
        if input.yaw != 0.0 {
            self.camera.rotate_yaw(input.yaw * turn);
        }
        if input.pitch != 0.0 {
            self.camera.rotate_pitch(input.pitch * turn);
        }

        self.time += dt;
        if let Some(fps) = self.fps.tick(dt) {
            tracing::debug!(fps, "frame rate");
        }
    }

    /// Every draw call for the current time, back to front
    pub fn draw_list(&self) -> Vec<(Prop, Mat4)> {
        let mut list = Vec::with_capacity(7);

        // Room corner, turned so it sits behind the letter
        let turn = Mat4::rotate_y(std::f32::consts::PI);
        list.push((Prop::Floor, Mat4::translate_xyz(1.5, -0.7, 1.5) * turn * Mat4::scale_xyz(6.0, 0.2, 6.0)));
        list.push((Prop::Wall, Mat4::translate_xyz(4.5, 0.7, 1.5) * turn * Mat4::scale_xyz(0.2, 3.0, 6.0)));
        list.push((Prop::Wall, Mat4::translate_xyz(1.5, 0.7, 4.5) * turn * Mat4::scale_xyz(6.0, 3.0, 0.2)));

        let root = Mat4::translate_xyz(1.5, 1.0, 1.5)
            * Mat4::rotate_y(self.time * LETTER_SPIN)
            * Mat4::rotate_x(0.35);
        for segment in letter_segments() {
            list.push((Prop::LetterBar, root * segment));
        }

        let light_pos = self.light_dir * 15.0;
        list.push((Prop::LightMarker, Mat4::translate(light_pos) * Mat4::scale_uniform(0.5)));

        list
    }

    /// Clear, draw the scene, then overlay the FPS readout top-right
    pub fn render(&self, renderer: &mut Renderer3D) -> DrawStats {
        renderer.clear();

        let mut stats = DrawStats::default();
        for (prop, model) in self.draw_list() {
            stats.merge(renderer.draw_mesh(self.mesh(prop), &model, &self.camera, self.wireframe));
        }

        let text = format!("{}", self.fps.fps().round() as u32);
        let (scale, spacing) = (2, 2);
        let width = renderer.framebuffer().width() as i32;
        let r2d = renderer.renderer2d_mut();
        let x = width - r2d.text_width(&text, scale, spacing) - 10;
        r2d.draw_text(&text, x, 10, FPS_COLOR, scale, spacing);

        stats
    }
}

/// Local transforms for the three bars of the N: left leg, right leg and
/// the diagonal joining them
fn letter_segments() -> [Mat4; 3] {
    const LEG_HEIGHT: f32 = 2.75;
    const LEG_THICKNESS: f32 = 0.4;
    const LEG_DEPTH: f32 = 0.6;
    const LEG_OFFSET_X: f32 = 0.85;

    let inner_span = 2.0 * (LEG_OFFSET_X - LEG_THICKNESS * 0.5);
    let diagonal_length = (inner_span * inner_span + LEG_HEIGHT * LEG_HEIGHT).sqrt() + LEG_THICKNESS;
    let diagonal_angle = -inner_span.atan2(LEG_HEIGHT);

    [
        Mat4::translate_xyz(-LEG_OFFSET_X, 0.0, 0.0) * Mat4::scale_xyz(LEG_THICKNESS, LEG_HEIGHT, LEG_DEPTH),
        Mat4::translate_xyz(LEG_OFFSET_X, 0.0, 0.0) * Mat4::scale_xyz(LEG_THICKNESS, LEG_HEIGHT, LEG_DEPTH),
        Mat4::rotate_z(diagonal_angle) * Mat4::scale_xyz(LEG_THICKNESS, diagonal_length, LEG_DEPTH),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn demo() -> Demo {
        Demo::new(160, 120, &SceneConfig::default())
    }

    #[test]
    fn test_fps_counter_window() {
        let mut fps = FpsCounter::new();
        assert_eq!(fps.tick(0.25), None);
        assert_eq!(fps.tick(0.25), Some(4.0));
        assert_eq!(fps.fps(), 4.0);
        assert_eq!(fps.tick(0.1), None);
        assert_eq!(fps.fps(), 4.0);
    }

    #[test]
    fn test_scene_contents() {
        let d = demo();
        let list = d.draw_list();
        assert_eq!(list.len(), 7);
        assert_eq!(list.iter().filter(|(p, _)| *p == Prop::LetterBar).count(), 3);
        assert_eq!(d.mesh(Prop::LetterBar).triangle_count(), 12);
        assert_eq!(d.mesh(Prop::Floor).triangle_count(), 24);
        assert_eq!(d.mesh(Prop::Wall).vertices.len(), 48);
        assert_abs_diff_eq!(d.camera.aspect(), 160.0 / 120.0);
    }

    #[test]
    fn test_update_moves_camera() {
        let mut d = demo();
        let start = d.camera.position();
        let forward = d.camera.forward();
        d.update(FrameInput { forward: 1.0, ..Default::default() }, 0.5);

        let moved = d.camera.position() - start;
        assert_abs_diff_eq!(moved.length(), 1.5, epsilon = 1e-4);
        assert_abs_diff_eq!(moved.normalize().dot(forward), 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(d.time(), 0.5);
    }

    #[test]
    fn test_update_rotates_camera() {
        let mut d = demo();
        let yaw = d.camera.yaw();
        d.update(FrameInput { yaw: 1.0, ..Default::default() }, 0.1);
        let expected = SceneConfig::default().rotate_speed * 0.1;
        // Looking down +Z starts at yaw = PI, so the turn wraps
        let turned = (d.camera.yaw() - yaw).rem_euclid(std::f32::consts::TAU);
        assert_abs_diff_eq!(turned, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_idle_input_keeps_camera() {
        let mut d = demo();
        let view = d.camera.view_matrix();
        assert!(FrameInput::default().is_idle());
        d.update(FrameInput::default(), 1.0 / 60.0);
        assert!(!d.camera.is_view_dirty());
        assert_eq!(d.camera.view_matrix(), view);
    }

    #[test]
    fn test_letter_spins_with_time() {
        let mut d = demo();
        let before = d.draw_list()[3].1;
        d.update(FrameInput::default(), 1.0);
        let after = d.draw_list()[3].1;
        assert_ne!(before, after);
        // The room does not move
        assert_eq!(d.draw_list()[0].1, demo().draw_list()[0].1);
    }

    #[test]
    fn test_render_draws_scene_and_fps() {
        let mut d = demo();
        for _ in 0..40 {
            d.update(FrameInput::default(), 1.0 / 60.0);
        }
        let mut r = Renderer3D::new(160, 120);
        let stats = d.render(&mut r);
        assert!(stats.drawn > 0);
        assert!(stats.pixels_written > 0);

        let fb = r.framebuffer();
        let corner_has_text = (0..24).any(|y| (100..160).any(|x| fb.get_pixel(x, y) == FPS_COLOR));
        assert!(corner_has_text);
    }

    #[test]
    fn test_wireframe_toggle() {
        let mut d = demo();
        assert!(!d.wireframe);
        d.toggle_wireframe();
        let mut r = Renderer3D::new(160, 120);
        let stats = d.render(&mut r);
        assert!(stats.drawn > 0);
        assert_eq!(stats.pixels_written, 0);
    }
}
