//! 4x4 transform matrix
//!
//! Column-major storage: element (row `i`, column `j`) lives at `m[j * 4 + i]`,
//! the layout GPU APIs expect. `a * b` applies `b` first, so a full vertex
//! transform reads `projection * view * model`.

use std::ops::Mul;
use serde::{Serialize, Deserialize};
use super::math::{Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    const ZERO: Mat4 = Mat4 { m: [0.0; 16] };

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Build from 16 floats already in column-major order
    pub fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    pub fn transpose(&self) -> Mat4 {
        let mut result = Mat4::ZERO;
        for j in 0..4 {
            for i in 0..4 {
                result.m[i * 4 + j] = self.m[j * 4 + i];
            }
        }
        result
    }

    /// Transform a position (w = 1) including the perspective divide
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        (*self * Vec4::point(p)).to_vec3()
    }

    /// Transform a direction (w = 0): translation has no effect
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * Vec4::direction(d)).xyz()
    }

    pub fn translate(t: Vec3) -> Mat4 {
        let mut result = Mat4::IDENTITY;
        result.m[12] = t.x;
        result.m[13] = t.y;
        result.m[14] = t.z;
        result
    }

    pub fn translate_xyz(x: f32, y: f32, z: f32) -> Mat4 {
        Self::translate(Vec3::new(x, y, z))
    }

    pub fn scale(s: Vec3) -> Mat4 {
        let mut result = Mat4::IDENTITY;
        result.m[0] = s.x;
        result.m[5] = s.y;
        result.m[10] = s.z;
        result
    }

    pub fn scale_xyz(x: f32, y: f32, z: f32) -> Mat4 {
        Self::scale(Vec3::new(x, y, z))
    }

    pub fn scale_uniform(s: f32) -> Mat4 {
        Self::scale(Vec3::splat(s))
    }

    /// Rotation about +X (pitch), right-handed
    pub fn rotate_x(radians: f32) -> Mat4 {
        let (s, c) = radians.sin_cos();
        let mut result = Mat4::IDENTITY;
        result.m[5] = c;
        result.m[6] = s;
        result.m[9] = -s;
        result.m[10] = c;
        result
    }

    /// Rotation about +Y (yaw), right-handed
    pub fn rotate_y(radians: f32) -> Mat4 {
        let (s, c) = radians.sin_cos();
        let mut result = Mat4::IDENTITY;
        result.m[0] = c;
        result.m[2] = -s;
        result.m[8] = s;
        result.m[10] = c;
        result
    }

    /// Rotation about +Z (roll), right-handed
    pub fn rotate_z(radians: f32) -> Mat4 {
        let (s, c) = radians.sin_cos();
        let mut result = Mat4::IDENTITY;
        result.m[0] = c;
        result.m[1] = s;
        result.m[4] = -s;
        result.m[5] = c;
        result
    }

    /// View matrix for a camera at `eye` looking at `target`.
    ///
    /// The basis is re-orthogonalized, so `up` only has to be roughly
    /// upward. The camera looks down its local -Z.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let camera_up = right.cross(forward);

        let mut result = Mat4::IDENTITY;
        result.m[0] = right.x;
        result.m[4] = right.y;
        result.m[8] = right.z;

        result.m[1] = camera_up.x;
        result.m[5] = camera_up.y;
        result.m[9] = camera_up.z;

        result.m[2] = -forward.x;
        result.m[6] = -forward.y;
        result.m[10] = -forward.z;

        result.m[12] = -right.dot(eye);
        result.m[13] = -camera_up.dot(eye);
        result.m[14] = forward.dot(eye);
        result
    }

    /// OpenGL-style perspective projection; NDC z lands in [-1, 1]
    pub fn perspective(fov_y_radians: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let tan_half_fov = (fov_y_radians / 2.0).tan();

        let mut result = Mat4::ZERO;
        result.m[0] = 1.0 / (aspect * tan_half_fov);
        result.m[5] = 1.0 / tan_half_fov;
        result.m[10] = -(far + near) / (far - near);
        // Copies -z_view into w for the divide
        result.m[11] = -1.0;
        result.m[14] = -(2.0 * far * near) / (far - near);
        result
    }

    /// Box [left,right]x[bottom,top]x[-near,-far] to the [-1,1] cube. w stays 1.
    pub fn ortho(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        let mut result = Mat4::ZERO;
        result.m[0] = 2.0 / (right - left);
        result.m[5] = 2.0 / (top - bottom);
        result.m[10] = -2.0 / (far - near);
        result.m[12] = -(right + left) / (right - left);
        result.m[13] = -(top + bottom) / (top - bottom);
        result.m[14] = -(far + near) / (far - near);
        result.m[15] = 1.0;
        result
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, other: Mat4) -> Mat4 {
        let mut result = Mat4::ZERO;
        for j in 0..4 {
            for i in 0..4 {
                let mut sum = 0.0;
                for k in 0..4 {
                    sum += self.m[k * 4 + i] * other.m[j * 4 + k];
                }
                result.m[j * 4 + i] = sum;
            }
        }
        result
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let m = &self.m;
        Vec4::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        )
    }
}
