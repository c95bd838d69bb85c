//! Scene configuration loading and saving
//!
//! Uses RON (Rusty Object Notation). Every field has a default, so a config
//! file only needs the values it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::rasterizer::{Camera, RasterSettings, Vec3};

/// Error type for scene config and export
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ImageError(image::ImageError),
    InvalidDimensions { width: usize, height: usize },
    InvalidCamera { fov: f32, near: f32, far: f32 },
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl From<image::ImageError> for SceneError {
    fn from(e: image::ImageError) -> Self {
        SceneError::ImageError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SceneError::ImageError(e) => write!(f, "Image error: {}", e),
            SceneError::InvalidDimensions { width, height } => {
                write!(f, "Invalid framebuffer size {}x{}", width, height)
            }
            SceneError::InvalidCamera { fov, near, far } => {
                write!(f, "Invalid camera (fov {}, near {}, far {})", fov, near, far)
            }
        }
    }
}

/// Demo scene setup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window_width: u32,
    pub window_height: u32,
    /// Software framebuffer resolution (scaled to the window when presented)
    pub framebuffer_width: usize,
    pub framebuffer_height: usize,

    pub camera_position: Vec3,
    pub camera_target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// World units per second
    pub move_speed: f32,
    /// Radians per second
    pub rotate_speed: f32,

    pub wireframe: bool,
    pub raster: RasterSettings,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_width: 800,
            window_height: 600,
            framebuffer_width: 800,
            framebuffer_height: 600,
            camera_position: Vec3::new(0.0, 2.0, -8.0),
            camera_target: Vec3::ZERO,
            fov: 90.0,
            near: 0.1,
            far: 100.0,
            move_speed: 3.0,
            // 2 degrees per frame at 60 fps
            rotate_speed: 2.0_f32.to_radians() * 60.0,
            wireframe: false,
            raster: RasterSettings::default(),
        }
    }
}

/// Largest framebuffer side the window texture upload accepts
pub const MAX_FRAMEBUFFER_SIDE: usize = u16::MAX as usize;

impl SceneConfig {
    pub fn aspect(&self) -> f32 {
        self.framebuffer_width as f32 / self.framebuffer_height as f32
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let side_ok = |n: usize| (1..=MAX_FRAMEBUFFER_SIDE).contains(&n);
        if !side_ok(self.framebuffer_width) || !side_ok(self.framebuffer_height) {
            return Err(SceneError::InvalidDimensions {
                width: self.framebuffer_width,
                height: self.framebuffer_height,
            });
        }
        let fov_ok = self.fov > 0.0 && self.fov < 180.0;
        if !fov_ok || self.near <= 0.0 || self.far <= self.near {
            return Err(SceneError::InvalidCamera {
                fov: self.fov,
                near: self.near,
                far: self.far,
            });
        }
        Ok(())
    }

    /// Camera matching this config's placement and projection
    pub fn camera(&self) -> Camera {
        Camera::new(
            self.camera_position,
            self.camera_target,
            Vec3::UP,
            self.fov,
            self.aspect(),
            self.near,
            self.far,
        )
    }
}

/// Load a scene config from a RON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SceneConfig, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config = load_config_from_str(&contents)?;
    tracing::info!(path = %path.display(), "loaded scene config");
    Ok(config)
}

/// Load a scene config from a RON string (embedded configs or testing)
pub fn load_config_from_str(s: &str) -> Result<SceneConfig, SceneError> {
    let config: SceneConfig = ron::from_str(s)?;
    config.validate()?;
    Ok(config)
}

/// Save a scene config to a RON file
pub fn save_config<P: AsRef<Path>>(config: &SceneConfig, path: P) -> Result<(), SceneError> {
    let pretty = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(config, pretty)?;
    fs::write(path.as_ref(), contents)?;
    tracing::info!(path = %path.as_ref().display(), "saved scene config");
    Ok(())
}
