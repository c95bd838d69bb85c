//! rasterlab: CPU 3D rendering demo
//!
//! Renders the demo scene with the software rasterizer and presents the
//! framebuffer through a macroquad window.
//!
//! Controls:
//! - W/A/S/D: move forward/left/back/right
//! - Q/E: move up/down
//! - Arrow keys: look around
//! - Tab: toggle wireframe
//! - P: save a PNG screenshot
//! - Esc: quit

use std::path::Path;

use macroquad::prelude::*;
use rasterlab::app::{Demo, FrameInput};
use rasterlab::rasterizer::Renderer3D;
use rasterlab::world::{load_config, save_png, SceneConfig};

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Optional config file in the working directory
const CONFIG_PATH: &str = "rasterlab.ron";

fn window_conf(config: &SceneConfig) -> Conf {
    Conf {
        window_title: format!("rasterlab v{}", VERSION),
        window_width: config.window_width as i32,
        window_height: config.window_height as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn scene_config() -> SceneConfig {
    if !Path::new(CONFIG_PATH).exists() {
        tracing::info!("no {} found, using defaults", CONFIG_PATH);
        return SceneConfig::default();
    }
    match load_config(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}, using defaults", CONFIG_PATH, e);
            SceneConfig::default()
        }
    }
}

fn read_input() -> FrameInput {
    let axis = |pos: KeyCode, neg: KeyCode| {
        let mut v = 0.0;
        if is_key_down(pos) {
            v += 1.0;
        }
        if is_key_down(neg) {
            v -= 1.0;
        }
        v
    };

    FrameInput {
        forward: axis(KeyCode::W, KeyCode::S),
        right: axis(KeyCode::D, KeyCode::A),
        up: axis(KeyCode::Q, KeyCode::E),
        yaw: axis(KeyCode::Right, KeyCode::Left),
        pitch: axis(KeyCode::Up, KeyCode::Down),
    }
}

fn present(renderer: &Renderer3D) {
    let fb = renderer.framebuffer();
    let (Ok(width), Ok(height)) = (u16::try_from(fb.width()), u16::try_from(fb.height())) else {
        tracing::warn!(width = fb.width(), height = fb.height(), "framebuffer too large to upload");
        return;
    };
    let texture = Texture2D::from_rgba8(width, height, &fb.to_rgba_bytes());
    texture.set_filter(FilterMode::Nearest);

    draw_texture_ex(
        &texture,
        0.0,
        0.0,
        WHITE,
        DrawTextureParams {
            dest_size: Some(Vec2::new(screen_width(), screen_height())),
            ..Default::default()
        },
    );
}

async fn run(config: SceneConfig) {
    let (width, height) = (config.framebuffer_width, config.framebuffer_height);
    let mut renderer = Renderer3D::new(width, height).with_settings(config.raster.clone());
    let mut demo = Demo::new(width, height, &config);
    let mut screenshots = 0u32;

    tracing::info!(width, height, "=== rasterlab ===");

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::Tab) {
            demo.toggle_wireframe();
            tracing::info!(wireframe = demo.wireframe, "render mode");
        }

        demo.update(read_input(), get_frame_time());
        let stats = demo.render(&mut renderer);
        tracing::trace!(drawn = stats.drawn, culled = stats.culled, "frame");

        if is_key_pressed(KeyCode::P) {
            screenshots += 1;
            let path = format!("rasterlab-{:03}.png", screenshots);
            if let Err(e) = save_png(renderer.framebuffer(), &path) {
                tracing::error!("Screenshot failed: {}", e);
            }
        }

        clear_background(BLACK);
        present(&renderer);
        next_frame().await;
    }

    tracing::info!("shutting down");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = scene_config();
    macroquad::Window::from_config(window_conf(&config), run(config));
}
