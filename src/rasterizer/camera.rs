//! Camera state
//!
//! Position/target/up plus explicit yaw/pitch for drift-free first-person
//! rotation. View and projection matrices are derived lazily: every mutation
//! bumps a generation counter, and a [`Memo`] recomputes its matrix only when
//! the counter it was built from no longer matches.

use std::cell::Cell;
use std::f32::consts::{PI, TAU};

use super::math::{Vec3, Vec4};
use super::matrix::Mat4;

/// Highest pitch the first-person controls allow (89 degrees)
pub const MAX_PITCH: f32 = 89.0 * PI / 180.0;

/// Polar-angle margin that keeps orbiting off the poles
pub const ORBIT_POLE_MARGIN: f32 = 0.1;

/// A derived value remembered together with the source generation it came from.
///
/// Reads go through [`Memo::get`], which recomputes when the caller's current
/// generation differs from the stored one. Uses `Cell`, so it is cheap to read
/// through `&self` but not shareable across threads.
#[derive(Debug, Clone)]
pub struct Memo<T: Copy> {
    value: Cell<Option<(u64, T)>>,
    computations: Cell<u64>,
}

impl<T: Copy> Default for Memo<T> {
    fn default() -> Self {
        Self {
            value: Cell::new(None),
            computations: Cell::new(0),
        }
    }
}

impl<T: Copy> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_stale(&self, generation: u64) -> bool {
        !matches!(self.value.get(), Some((g, _)) if g == generation)
    }

    pub fn get(&self, generation: u64, compute: impl FnOnce() -> T) -> T {
        if let Some((g, v)) = self.value.get() {
            if g == generation {
                return v;
            }
        }
        let v = compute();
        self.value.set(Some((generation, v)));
        self.computations.set(self.computations.get() + 1);
        v
    }

    /// How many times the value has been (re)built
    pub fn computations(&self) -> u64 {
        self.computations.get()
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    target: Vec3,
    up: Vec3,

    /// Radians, 0 = looking down -Z, wrapped to [-PI, PI]
    yaw: f32,
    /// Radians, clamped to +-MAX_PITCH
    pitch: f32,

    /// Vertical field of view, radians
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,

    view_generation: u64,
    projection_generation: u64,
    view: Memo<Mat4>,
    projection: Memo<Mat4>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::UP, 60.0, 16.0 / 9.0, 0.1, 100.0)
    }
}

impl Camera {
    pub fn new(
        position: Vec3,
        target: Vec3,
        up: Vec3,
        fov_degrees: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Self {
        let mut cam = Self {
            position,
            target,
            up,
            yaw: 0.0,
            pitch: 0.0,
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
            view_generation: 0,
            projection_generation: 0,
            view: Memo::new(),
            projection: Memo::new(),
        };
        cam.sync_orientation();
        cam
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn clip_planes(&self) -> (f32, f32) {
        (self.near, self.far)
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize()
    }

    /// Camera-local up, re-orthogonalized against forward
    pub fn up_vector(&self) -> Vec3 {
        self.right().cross(self.forward()).normalize()
    }

    /// True when the next `view_matrix` call will rebuild
    pub fn is_view_dirty(&self) -> bool {
        self.view.is_stale(self.view_generation)
    }

    pub fn is_projection_dirty(&self) -> bool {
        self.projection.is_stale(self.projection_generation)
    }

    pub fn view_rebuilds(&self) -> u64 {
        self.view.computations()
    }

    pub fn projection_rebuilds(&self) -> u64 {
        self.projection.computations()
    }

    fn touch_view(&mut self) {
        self.view_generation = self.view_generation.wrapping_add(1);
    }

    fn touch_projection(&mut self) {
        self.projection_generation = self.projection_generation.wrapping_add(1);
    }

    /// Re-derive yaw/pitch from the current look direction
    fn sync_orientation(&mut self) {
        let dir = self.forward();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.x.atan2(-dir.z);
        self.pitch = dir.y.clamp(-1.0, 1.0).asin();
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.sync_orientation();
        self.touch_view();
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        self.sync_orientation();
        self.touch_view();
    }

    pub fn set_up(&mut self, up: Vec3) {
        self.up = up;
        self.touch_view();
    }

    pub fn set_fov(&mut self, fov_degrees: f32) {
        self.fov = fov_degrees.to_radians();
        self.touch_projection();
    }

    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.touch_projection();
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        self.near = near;
        self.far = far;
        self.touch_projection();
    }

    /// Move along the view direction (negative = backwards)
    pub fn move_forward(&mut self, distance: f32) {
        let step = self.forward() * distance;
        self.position += step;
        self.target += step;
        self.touch_view();
    }

    /// Strafe along the camera's right axis
    pub fn move_right(&mut self, distance: f32) {
        let step = self.right() * distance;
        self.position += step;
        self.target += step;
        self.touch_view();
    }

    /// Move along the stored (world) up vector
    pub fn move_up(&mut self, distance: f32) {
        let step = self.up * distance;
        self.position += step;
        self.target += step;
        self.touch_view();
    }

    /// Orbit the position around the target on a sphere of fixed radius.
    /// The polar angle stays inside (0.1, PI - 0.1).
    pub fn orbit_around_target(&mut self, yaw: f32, pitch: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }

        let theta = offset.x.atan2(offset.z) + yaw;
        let phi = ((offset.y / radius).clamp(-1.0, 1.0).acos() + pitch)
            .clamp(ORBIT_POLE_MARGIN, PI - ORBIT_POLE_MARGIN);

        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        self.position = self.target + offset;
        self.sync_orientation();
        self.touch_view();
    }

    /// Rotate the forward vector by rotateY(yaw) * rotateX(pitch) and look
    /// one unit ahead of the position.
    pub fn look_around(&mut self, yaw: f32, pitch: f32) {
        let rotation = Mat4::rotate_y(yaw) * Mat4::rotate_x(pitch);
        let forward = rotation.transform_direction(self.forward());
        self.target = self.position + forward;
        self.sync_orientation();
        self.touch_view();
    }

    /// First-person yaw; positive turns right. Wrapped to [-PI, PI].
    pub fn rotate_yaw(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.yaw = wrap_angle(self.yaw + delta);
        self.update_target_from_orientation();
    }

    /// First-person pitch; positive looks up. Clamped to +-89 degrees.
    pub fn rotate_pitch(&mut self, delta: f32) {
        self.pitch = (self.pitch + delta).clamp(-MAX_PITCH, MAX_PITCH);
        self.update_target_from_orientation();
    }

    fn update_target_from_orientation(&mut self) {
        self.target = self.position + direction_from_angles(self.yaw, self.pitch);
        self.touch_view();
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view.get(self.view_generation, || {
            Mat4::look_at(self.position, self.target, self.up)
        })
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.get(self.projection_generation, || {
            Mat4::perspective(self.fov, self.aspect, self.near, self.far)
        })
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World point to (screen x, screen y, NDC z) with the pipeline's
    /// viewport mapping (Y flipped, origin top-left)
    pub fn world_to_screen(&self, world: Vec3, width: usize, height: usize) -> Vec3 {
        let ndc = (self.view_projection() * Vec4::point(world)).to_vec3();
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * width as f32,
            (1.0 - ndc.y) * 0.5 * height as f32,
            ndc.z,
        )
    }
}

/// Unit look direction for yaw/pitch: (cos p sin y, sin p, -cos p cos y)
pub fn direction_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(
        pitch.cos() * yaw.sin(),
        pitch.sin(),
        -pitch.cos() * yaw.cos(),
    )
}

/// Wrap an angle into [-PI, PI)
fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-4);
        assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-4);
        assert_abs_diff_eq!(a.z, b.z, epsilon = 1e-4);
    }

    #[test]
    fn test_defaults() {
        let cam = Camera::default();
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_abs_diff_eq!(cam.fov_degrees(), 60.0, epsilon = 1e-4);
        assert_abs_diff_eq!(cam.yaw(), 0.0);
        assert_abs_diff_eq!(cam.pitch(), 0.0);
        assert!(cam.is_view_dirty());
        assert!(cam.is_projection_dirty());
    }

    #[test]
    fn test_view_is_built_once_until_mutated() {
        let cam = Camera::default();
        let a = cam.view_matrix();
        let b = cam.view_matrix();
        assert_eq!(a, b);
        assert_eq!(cam.view_rebuilds(), 1);
        assert!(!cam.is_view_dirty());
    }

    #[test]
    fn test_read_after_write_consistency() {
        let mut cam = Camera::default();
        let _ = cam.view_matrix();
        let _ = cam.projection_matrix();

        cam.set_position(Vec3::new(1.0, 2.0, 3.0));
        cam.set_target(Vec3::new(0.0, 1.0, 0.0));
        assert!(cam.is_view_dirty());
        assert!(!cam.is_projection_dirty());
        assert_eq!(cam.view_matrix(), Mat4::look_at(cam.position(), cam.target(), cam.up()));
        assert_eq!(cam.view_rebuilds(), 2);

        cam.set_fov(90.0);
        cam.set_aspect_ratio(1.0);
        assert_eq!(
            cam.projection_matrix(),
            Mat4::perspective(90.0_f32.to_radians(), 1.0, 0.1, 100.0)
        );
        assert_eq!(cam.projection_rebuilds(), 2);
        assert_eq!(cam.view_rebuilds(), 2);
    }

    #[test]
    fn test_forward_at_zero_angles_is_minus_z() {
        let mut cam = Camera::default();
        cam.rotate_yaw(0.0);
        assert_vec_eq(cam.forward(), Vec3::FORWARD);
        assert_vec_eq(direction_from_angles(0.0, 0.0), Vec3::FORWARD);
        assert_vec_eq(direction_from_angles(FRAC_PI_2, 0.0), Vec3::UNIT_X);
    }

    #[test]
    fn test_yaw_wraps() {
        let mut cam = Camera::default();
        for _ in 0..10 {
            cam.rotate_yaw(1.0);
            assert!(cam.yaw() >= -PI && cam.yaw() <= PI);
        }
        assert_abs_diff_eq!(cam.yaw(), 10.0 - 4.0 * PI, epsilon = 1e-4);
    }

    #[test]
    fn test_yaw_wraps_huge_and_non_finite_deltas() {
        let mut cam = Camera::default();
        cam.rotate_yaw(1.0e9);
        assert!(cam.yaw() >= -PI && cam.yaw() <= PI);
        assert!(cam.forward().length() > 0.99);

        let before = cam.yaw();
        cam.rotate_yaw(f32::INFINITY);
        cam.rotate_yaw(f32::NAN);
        assert_eq!(cam.yaw(), before);
        assert!(cam.target().x.is_finite());
    }

    #[test]
    fn test_pitch_clamps() {
        let mut cam = Camera::default();
        cam.rotate_pitch(10.0);
        assert_abs_diff_eq!(cam.pitch(), MAX_PITCH);
        cam.rotate_pitch(-20.0);
        assert_abs_diff_eq!(cam.pitch(), -MAX_PITCH);
        assert!(cam.forward().y < 0.0);
    }

    #[test]
    fn test_initial_angles_from_direction() {
        let cam = Camera::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::UP, 60.0, 1.0, 0.1, 10.0);
        assert_abs_diff_eq!(cam.yaw(), FRAC_PI_2, epsilon = 1e-5);
        let mut cam = cam;
        cam.rotate_yaw(0.0);
        assert_vec_eq(cam.forward(), Vec3::UNIT_X);
    }

    #[test]
    fn test_movement_carries_target() {
        let mut cam = Camera::default();
        cam.move_forward(2.0);
        assert_vec_eq(cam.position(), Vec3::new(0.0, 0.0, 3.0));
        assert_vec_eq(cam.target(), Vec3::new(0.0, 0.0, -2.0));
        cam.move_right(1.0);
        assert_vec_eq(cam.position(), Vec3::new(1.0, 0.0, 3.0));
        cam.move_up(0.5);
        assert_vec_eq(cam.position(), Vec3::new(1.0, 0.5, 3.0));
        assert_vec_eq(cam.forward(), Vec3::FORWARD);
    }

    #[test]
    fn test_orbit_keeps_radius_and_clamps_poles() {
        let mut cam = Camera::default();
        cam.orbit_around_target(0.7, 0.0);
        assert_abs_diff_eq!((cam.position() - cam.target()).length(), 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!(cam.position().y, 0.0, epsilon = 1e-4);

        cam.orbit_around_target(0.0, -10.0);
        let offset = cam.position() - cam.target();
        assert_abs_diff_eq!(offset.length(), 5.0, epsilon = 1e-4);
        assert_abs_diff_eq!((offset.y / 5.0).acos(), ORBIT_POLE_MARGIN, epsilon = 1e-4);
    }

    #[test]
    fn test_look_around_turns_forward() {
        let mut cam = Camera::default();
        cam.look_around(FRAC_PI_2, 0.0);
        // rotateY(+90) takes -Z to -X
        assert_vec_eq(cam.forward(), Vec3::new(-1.0, 0.0, 0.0));
        assert_abs_diff_eq!(cam.yaw(), -FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn test_world_to_screen_centers_target() {
        let cam = Camera::default();
        let s = cam.world_to_screen(Vec3::ZERO, 800, 600);
        assert_abs_diff_eq!(s.x, 400.0, epsilon = 1e-3);
        assert_abs_diff_eq!(s.y, 300.0, epsilon = 1e-3);
        assert!(s.z > -1.0 && s.z < 1.0);

        let above = cam.world_to_screen(Vec3::new(0.0, 1.0, 0.0), 800, 600);
        assert!(above.y < 300.0);
    }
}
