//! Software rasterizer
//!
//! Features:
//! - Column-major matrix math with OpenGL-style clip space
//! - Lazily cached camera matrices with first-person and orbit controls
//! - Bresenham lines, midpoint circles, barycentric triangle fills
//! - Flat Lambert shading with a depth buffer (strict less-than test)

mod math;
mod matrix;
mod types;
mod framebuffer;
pub mod draw2d;
mod camera;
mod render;
pub mod font;

pub use math::*;
pub use matrix::*;
pub use types::*;
pub use framebuffer::*;
pub use draw2d::{PixelTarget, Renderer};
pub use camera::*;
pub use render::*;

/// Default demo resolution
pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;
