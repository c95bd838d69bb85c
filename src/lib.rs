//! rasterlab: minimal 3D rendering pipeline
//!
//! - Vector/matrix math with column-major 4x4 transforms
//! - Camera with lazily cached view and projection matrices
//! - Indexed triangle meshes with primitive generators
//! - Color + depth framebuffer, 2D primitives and a flat-shaded 3D pipeline

pub mod rasterizer;
pub mod world;
pub mod app;
