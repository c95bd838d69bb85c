//! World module - meshes and scene setup
//!
//! - Indexed triangle meshes with primitive generators
//! - RON scene configuration
//! - PNG export of rendered frames

mod mesh;
mod scene;
mod export;

pub use mesh::*;
pub use scene::*;
pub use export::*;
