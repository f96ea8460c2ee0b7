//! texquad viewer
//!
//! Renders a quad scene with the software rasterizer and shows the
//! framebuffer scaled up in a window.
//!
//! Usage: `texquad [scene.ron]`
//!
//! Keys:
//! - Tab: toggle fixed-point / float arithmetic
//! - Arrows: nudge the top-right corner
//! - R: reload the scene file
//! - S: write the framebuffer to `out.png`

use macroquad::prelude::*;
use std::path::{Path, PathBuf};
use texquad::logging::{init_logging, LoggingConfig};
use texquad::rasterizer::Color as Rgba;
use texquad::rasterizer::{Framebuffer, Texture, HEIGHT, WIDTH};
use texquad::scene::{draw_scene, load_scene, save_png, QuadScene};
use texquad::VERSION;

const NUDGE: f32 = 0.25;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("texquad v{}", VERSION),
        window_width: WIDTH as i32 * 3,
        window_height: HEIGHT as i32 * 3,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

/// Scene plus the texture it was loaded with
struct Viewer {
    path: Option<PathBuf>,
    scene: QuadScene,
    texture: Texture,
    fb: Framebuffer,
    written: usize,
    status: String,
}

impl Viewer {
    fn open(path: Option<PathBuf>) -> Self {
        let scene = match path.as_deref().map(load_scene) {
            Some(Ok(scene)) => scene,
            Some(Err(e)) => {
                log::warn!("Failed to load scene: {}, using demo scene", e);
                QuadScene::demo()
            }
            None => QuadScene::demo(),
        };
        let texture = scene.texture.load().unwrap_or_else(|e| {
            log::warn!("{}, using fallback texture", e);
            Texture::checkerboard(16, 16, Rgba::WHITE, Rgba::BLACK)
        });
        let fb = Framebuffer::new(scene.width, scene.height);
        let mut viewer = Self { path, scene, texture, fb, written: 0, status: String::new() };
        viewer.redraw();
        viewer
    }

    fn reload(&mut self) {
        *self = Self::open(self.path.clone());
        self.status = "Reloaded".to_string();
    }

    fn redraw(&mut self) {
        match draw_scene(&self.scene, &self.texture, &mut self.fb) {
            Ok(written) => self.written = written,
            Err(e) => {
                log::error!("Draw failed: {}", e);
                self.status = format!("Draw failed: {}", e);
            }
        }
    }

    fn save(&mut self, path: &Path) {
        self.status = match save_png(&self.fb, path) {
            Ok(()) => format!("Saved {}", path.display()),
            Err(e) => format!("Save failed: {}", e),
        };
        log::info!("{}", self.status);
    }

    fn handle_input(&mut self) {
        let mut dirty = false;

        if is_key_pressed(KeyCode::Tab) {
            self.scene.numeric = self.scene.numeric.toggled();
            dirty = true;
        }

        let mut dx = 0.0;
        let mut dy = 0.0;
        if is_key_down(KeyCode::Left) { dx -= NUDGE; }
        if is_key_down(KeyCode::Right) { dx += NUDGE; }
        if is_key_down(KeyCode::Up) { dy -= NUDGE; }
        if is_key_down(KeyCode::Down) { dy += NUDGE; }
        if dx != 0.0 || dy != 0.0 {
            if let Some(corner) = self.scene.corners.get_mut(1) {
                corner.pos.x += dx;
                corner.pos.y += dy;
                dirty = true;
            }
        }

        if is_key_pressed(KeyCode::R) {
            self.reload();
            return;
        }
        if is_key_pressed(KeyCode::S) {
            self.save(Path::new("out.png"));
        }

        if dirty {
            self.redraw();
        }
    }

    fn draw(&self) {
        let screen_w = screen_width();
        let screen_h = screen_height();

        // Fit the framebuffer into the window, keeping its aspect ratio
        let scale = (screen_w / self.fb.width as f32).min(screen_h / self.fb.height as f32);
        let draw_w = self.fb.width as f32 * scale;
        let draw_h = self.fb.height as f32 * scale;
        let draw_x = (screen_w - draw_w) * 0.5;
        let draw_y = (screen_h - draw_h) * 0.5;

        let texture = Texture2D::from_rgba8(self.fb.width as u16, self.fb.height as u16, &self.fb.pixels);
        texture.set_filter(FilterMode::Nearest);

        draw_texture_ex(
            &texture,
            draw_x,
            draw_y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(draw_w, draw_h)),
                ..Default::default()
            },
        );

        let tr = self.scene.corners.get(1).map(|c| c.pos).unwrap_or_default();
        draw_text(
            &format!(
                "{} | {} px | TR ({:.2}, {:.2}) | {}",
                self.scene.numeric.label(),
                self.written,
                tr.x,
                tr.y,
                self.status
            ),
            10.0,
            20.0,
            20.0,
            Color::from_rgba(220, 220, 220, 255),
        );
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging(LoggingConfig::default());
    log::info!("=== texquad v{} ===", VERSION);

    let mut viewer = Viewer::open(std::env::args().nth(1).map(PathBuf::from));

    loop {
        viewer.handle_input();

        clear_background(Color::from_rgba(30, 30, 35, 255));
        viewer.draw();

        next_frame().await;
    }
}
