//! Indexed triangle meshes and primitive generators
//!
//! Every generator emits outward-facing, counter-clockwise triangles, so
//! `(v1 - v0) x (v2 - v0)` points out of the surface and matches the stored
//! vertex normals.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Color, Vec3, Vertex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    IndexCountNotMultipleOfThree(usize),
    IndexOutOfRange { position: usize, index: u32, vertex_count: usize },
}

impl std::fmt::Display for MeshError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshError::IndexCountNotMultipleOfThree(n) => {
                write!(f, "Index count {} is not a multiple of three", n)
            }
            MeshError::IndexOutOfRange { position, index, vertex_count } => write!(
                f,
                "Index {} at position {} is out of range ({} vertices)",
                index, position, vertex_count
            ),
        }
    }
}

/// Triangle mesh: vertices plus index triples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The three vertices of triangle `i`, or None if any index is bad
    pub fn triangle(&self, i: usize) -> Option<[Vertex; 3]> {
        let tri = self.indices.get(i * 3..i * 3 + 3)?;
        Some([
            *self.vertices.get(tri[0] as usize)?,
            *self.vertices.get(tri[1] as usize)?,
            *self.vertices.get(tri[2] as usize)?,
        ])
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(self.indices.len()));
        }
        let vertex_count = self.vertices.len();
        for (position, &index) in self.indices.iter().enumerate() {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange { position, index, vertex_count });
            }
        }
        Ok(())
    }

    /// Append a back side: vertex copies with inverted normals and every
    /// triangle re-emitted with its last two indices swapped.
    pub fn make_double_sided(&mut self) {
        let offset = self.vertices.len() as u32;
        let flipped: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| Vertex { normal: -v.normal, ..*v })
            .collect();
        self.vertices.extend(flipped);

        let back: Vec<u32> = self
            .indices
            .chunks_exact(3)
            .flat_map(|t| [t[0] + offset, t[2] + offset, t[1] + offset])
            .collect();
        self.indices.extend(back);
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3, color: Color) -> u32 {
        let idx = self.vertices.len() as u32;
        self.vertices.push(Vertex::new(position, normal, color));
        idx
    }

    /// Quad given counter-clockwise as seen from the side `normal` points to
    fn push_quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Color) {
        let base = self.vertices.len() as u32;
        for c in corners {
            self.push_vertex(c, normal, color);
        }
        self.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    /// Same quad from both sides
    fn push_double_quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Color) {
        let [a, b, c, d] = corners;
        self.push_quad([a, b, c, d], normal, color);
        self.push_quad([a, d, c, b], -normal, color);
    }

    /// Axis-aligned box, 4 vertices per face so each face keeps its own normal
    fn push_box(&mut self, center: Vec3, extents: Vec3, color: Color) {
        let h = extents * 0.5;
        let p = |x: f32, y: f32, z: f32| center + Vec3::new(x * h.x, y * h.y, z * h.z);

        // Front (+Z)
        self.push_quad([p(-1.0, -1.0, 1.0), p(1.0, -1.0, 1.0), p(1.0, 1.0, 1.0), p(-1.0, 1.0, 1.0)], Vec3::UNIT_Z, color);
        // Back (-Z)
        self.push_quad([p(-1.0, -1.0, -1.0), p(-1.0, 1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, -1.0, -1.0)], -Vec3::UNIT_Z, color);
        // Top (+Y)
        self.push_quad([p(-1.0, 1.0, -1.0), p(-1.0, 1.0, 1.0), p(1.0, 1.0, 1.0), p(1.0, 1.0, -1.0)], Vec3::UNIT_Y, color);
        // Bottom (-Y)
        self.push_quad([p(-1.0, -1.0, -1.0), p(1.0, -1.0, -1.0), p(1.0, -1.0, 1.0), p(-1.0, -1.0, 1.0)], -Vec3::UNIT_Y, color);
        // Right (+X)
        self.push_quad([p(1.0, -1.0, -1.0), p(1.0, 1.0, -1.0), p(1.0, 1.0, 1.0), p(1.0, -1.0, 1.0)], Vec3::UNIT_X, color);
        // Left (-X)
        self.push_quad([p(-1.0, -1.0, -1.0), p(-1.0, -1.0, 1.0), p(-1.0, 1.0, 1.0), p(-1.0, 1.0, -1.0)], -Vec3::UNIT_X, color);
    }

    fn logged(self, shape: &str) -> Self {
        tracing::debug!(
            shape,
            vertices = self.vertices.len(),
            triangles = self.triangle_count(),
            "mesh generated"
        );
        self
    }
}

/// Cube centered on the origin: 24 vertices, 12 triangles
pub fn create_cube(size: f32, color: Color) -> Mesh {
    let mut mesh = Mesh::default();
    mesh.push_box(Vec3::ZERO, Vec3::splat(size), color);
    mesh.logged("cube")
}

/// Square pyramid, base at y = -size/2, apex at y = +size/2
pub fn create_pyramid(size: f32, color: Color) -> Mesh {
    let half = size * 0.5;
    let apex = Vec3::new(0.0, half, 0.0);
    let base = [
        Vec3::new(-half, -half, -half),
        Vec3::new(half, -half, -half),
        Vec3::new(half, -half, half),
        Vec3::new(-half, -half, half),
    ];

    let mut mesh = Mesh::default();
    mesh.push_quad(base, -Vec3::UNIT_Y, color);

    for i in 0..4 {
        let a = base[(i + 1) % 4];
        let b = base[i];
        let normal = (b - a).cross(apex - a).normalize();
        let first = mesh.push_vertex(a, normal, color);
        mesh.push_vertex(b, normal, color);
        mesh.push_vertex(apex, normal, color);
        mesh.indices.extend([first, first + 1, first + 2]);
    }

    mesh.logged("pyramid")
}

/// UV sphere. The seam column is duplicated, giving
/// `(rings + 1) * (segments + 1)` vertices. At least 3 segments and 2 rings.
pub fn create_sphere(radius: f32, segments: u32, rings: u32, color: Color) -> Mesh {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut mesh = Mesh::default();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = radius * phi.cos();
        let ring_radius = radius * phi.sin();

        for seg in 0..=segments {
            let theta = 2.0 * PI * seg as f32 / segments as f32;
            let position = Vec3::new(ring_radius * theta.cos(), y, ring_radius * theta.sin());
            mesh.push_vertex(position, position.normalize(), color);
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            mesh.indices.extend([current, current + 1, next]);
            mesh.indices.extend([current + 1, next + 1, next]);
        }
    }

    mesh.logged("sphere")
}

/// Room corner: a floor at y = 0, a back wall at z = 0 and a left wall at
/// x = 0, each double-sided. 24 vertices, 12 triangles.
pub fn create_corner_cube(size: f32, color: Color) -> Mesh {
    let half = size * 0.5;
    let mut mesh = Mesh::default();

    mesh.push_double_quad(
        [
            Vec3::new(-half, 0.0, -half),
            Vec3::new(-half, 0.0, half),
            Vec3::new(half, 0.0, half),
            Vec3::new(half, 0.0, -half),
        ],
        Vec3::UNIT_Y,
        color,
    );
    mesh.push_double_quad(
        [
            Vec3::new(-half, 0.0, 0.0),
            Vec3::new(half, 0.0, 0.0),
            Vec3::new(half, size, 0.0),
            Vec3::new(-half, size, 0.0),
        ],
        Vec3::UNIT_Z,
        color,
    );
    mesh.push_double_quad(
        [
            Vec3::new(0.0, 0.0, -half),
            Vec3::new(0.0, size, -half),
            Vec3::new(0.0, size, half),
            Vec3::new(0.0, 0.0, half),
        ],
        Vec3::UNIT_X,
        color,
    );

    mesh.logged("corner_cube")
}

/// Letter N centered on the origin: two upright bars and a square tube
/// running from the top of the left bar to the bottom of the right bar.
/// 60 vertices, 40 triangles. The tube ends are left open; they sit inside
/// the bars.
pub fn create_letter_n(height: f32, width: f32, thickness: f32, color: Color) -> Mesh {
    let mut mesh = Mesh::default();
    let bar = Vec3::new(thickness, height, thickness);
    let bar_x = width * 0.5 - thickness * 0.5;
    mesh.push_box(Vec3::new(-bar_x, 0.0, 0.0), bar, color);
    mesh.push_box(Vec3::new(bar_x, 0.0, 0.0), bar, color);

    let start = Vec3::new(-bar_x, height * 0.5, 0.0);
    let end = Vec3::new(bar_x, -height * 0.5, 0.0);
    let dir = (end - start).normalize();
    // (side, depth, dir) is right-handed, so walking the ring side -> depth
    // is counter-clockwise when seen from the tube's outside
    let side = Vec3::new(-dir.y, dir.x, 0.0);
    let depth = Vec3::UNIT_Z;
    let half = thickness * 0.5;
    let ring = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let base = mesh.vertices.len() as u32;
    for step in 0..3 {
        let center = Vec3::lerp(start, end, step as f32 * 0.5);
        for (s, d) in ring {
            let offset = side * (s * half) + depth * (d * half);
            mesh.push_vertex(center + offset, offset.normalize(), color);
        }
    }

    for section in 0..2u32 {
        let a = base + section * 4;
        let b = a + 4;
        for i in 0..4 {
            let next = (i + 1) % 4;
            mesh.indices.extend([a + i, a + next, b + next]);
            mesh.indices.extend([a + i, b + next, b + i]);
        }
    }

    mesh.logged("letter_n")
}
