//! Quad scene loading, saving and rendering
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. A scene
//! is one destination buffer, one texture and the four corners of the quad
//! drawn with it.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::rasterizer::{
    draw_textured_quad_with, Color, Framebuffer, NumericKind, RasterSettings, Texture,
    TextureError, Vec2, DEFAULT_SEAM_FUDGE, HEIGHT, QUAD_ARG_COUNT, WIDTH,
};

/// Error type for scene loading and rendering
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("serialize error: {0}")]
    Serialize(#[from] ron::Error),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error("image encode error: {0}")]
    Encode(#[from] image::ImageError),
    #[error("invalid scene: {0}")]
    Invalid(String),
}

/// Where a scene's texture comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextureSource {
    /// Image file; relative paths resolve against the scene file's directory
    File(PathBuf),
    Checkerboard {
        width: usize,
        height: usize,
        a: Color,
        b: Color,
    },
}

impl TextureSource {
    pub fn load(&self) -> Result<Texture, TextureError> {
        match self {
            TextureSource::File(path) => Texture::from_file(path),
            TextureSource::Checkerboard { width, height, a, b } => {
                Ok(Texture::checkerboard(*width, *height, *a, *b))
            }
        }
    }
}

/// One quad corner in native units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub pos: Vec2,
    pub uv: Vec2,
}

impl Corner {
    pub fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self {
            pos: Vec2 { x, y },
            uv: Vec2 { x: u, y: v },
        }
    }
}

fn default_clear() -> Color {
    Color::BLACK
}

fn default_seam_fudge() -> f32 {
    DEFAULT_SEAM_FUDGE
}

/// A single textured quad draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadScene {
    pub width: usize,
    pub height: usize,
    #[serde(default = "default_clear")]
    pub clear: Color,
    pub texture: TextureSource,
    #[serde(default)]
    pub numeric: NumericKind,
    #[serde(default = "default_seam_fudge")]
    pub seam_fudge: f32,
    /// Top-left, top-right, bottom-right, bottom-left
    pub corners: Vec<Corner>,
}

impl QuadScene {
    /// Built-in scene: a tilted quad repeating a checkerboard twice each way
    pub fn demo() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            clear: Color::new(30, 30, 35),
            texture: TextureSource::Checkerboard {
                width: 32,
                height: 32,
                a: Color::new(220, 180, 90),
                b: Color::new(70, 40, 110),
            },
            numeric: NumericKind::Fixed8,
            seam_fudge: DEFAULT_SEAM_FUDGE,
            corners: vec![
                Corner::new(60.0, 30.0, 0.0, 0.0),
                Corner::new(270.0, 60.0, 2.0, 0.0),
                Corner::new(250.0, 215.0, 2.0, 2.0),
                Corner::new(40.0, 190.0, 0.0, 2.0),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::Invalid(format!(
                "destination size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.corners.len() != 4 {
            return Err(SceneError::Invalid(format!(
                "expected 4 corners, found {}",
                self.corners.len()
            )));
        }
        Ok(())
    }

    /// Flat `(x, y, u, v)` argument list for the quad entry point
    pub fn args(&self) -> Result<[f32; QUAD_ARG_COUNT], SceneError> {
        self.validate()?;
        let mut args = [0.0; QUAD_ARG_COUNT];
        for (group, c) in args.chunks_exact_mut(4).zip(&self.corners) {
            group.copy_from_slice(&[c.pos.x, c.pos.y, c.uv.x, c.uv.y]);
        }
        Ok(args)
    }

    pub fn settings(&self) -> RasterSettings {
        RasterSettings {
            seam_fudge: self.seam_fudge,
        }
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let TextureSource::File(path) = &mut self.texture {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<QuadScene, SceneError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut scene = load_scene_from_str(&contents)?;
    if let Some(base) = path.parent() {
        scene.resolve_paths(base);
    }
    log::info!("Loaded scene {}", path.display());
    Ok(scene)
}

/// Parse a scene from a RON string (embedded scenes, tests)
pub fn load_scene_from_str(s: &str) -> Result<QuadScene, SceneError> {
    let scene: QuadScene = ron::from_str(s)?;
    scene.validate()?;
    Ok(scene)
}

/// Save a scene to a RON file
pub fn save_scene<P: AsRef<Path>>(scene: &QuadScene, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(scene, config)?;
    fs::write(path, contents)?;
    Ok(())
}

/// Clear `fb` and draw the scene's quad into it. Returns pixels written.
pub fn draw_scene(scene: &QuadScene, texture: &Texture, fb: &mut Framebuffer) -> Result<usize, SceneError> {
    let args = scene.args()?;
    fb.clear(scene.clear);
    Ok(draw_textured_quad_with(scene.numeric, fb, texture, &args, &scene.settings()))
}

/// Load the scene's texture and render it into a fresh framebuffer
pub fn render_scene(scene: &QuadScene) -> Result<Framebuffer, SceneError> {
    scene.validate()?;
    let texture = scene.texture.load()?;
    let mut fb = Framebuffer::new(scene.width, scene.height);
    let written = draw_scene(scene, &texture, &mut fb)?;
    log::info!(
        "Rendered {}x{} scene ({}): {} pixels written",
        scene.width,
        scene.height,
        scene.numeric.label(),
        written
    );
    Ok(fb)
}

/// Write a framebuffer out as PNG
pub fn save_png<P: AsRef<Path>>(fb: &Framebuffer, path: P) -> Result<(), SceneError> {
    let img = image::RgbaImage::from_raw(fb.width as u32, fb.height as u32, fb.pixels.clone())
        .ok_or_else(|| SceneError::Invalid("framebuffer size does not match its pixels".to_string()))?;
    img.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENE_RON: &str = r#"(
        width: 4,
        height: 4,
        texture: Checkerboard(
            width: 8,
            height: 8,
            a: (r: 255, g: 0, b: 0, a: 255),
            b: (r: 0, g: 0, b: 255, a: 255),
        ),
        numeric: Float,
        corners: [
            (pos: (x: 0.0, y: 0.0), uv: (x: 0.0, y: 0.0)),
            (pos: (x: 4.0, y: 0.0), uv: (x: 1.0, y: 0.0)),
            (pos: (x: 4.0, y: 4.0), uv: (x: 1.0, y: 1.0)),
            (pos: (x: 0.0, y: 4.0), uv: (x: 0.0, y: 1.0)),
        ],
    )"#;

    #[test]
    fn test_parse_scene_with_defaults() {
        let scene = load_scene_from_str(SCENE_RON).unwrap();
        assert_eq!(scene.numeric, NumericKind::Float);
        assert_eq!(scene.clear, Color::BLACK);
        assert_eq!(scene.seam_fudge, DEFAULT_SEAM_FUDGE);
        assert_eq!(scene.args().unwrap()[4..8], [4.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_render_scene() {
        let scene = load_scene_from_str(SCENE_RON).unwrap();
        let fb = render_scene(&scene).unwrap();
        // 8x8 checkerboard squeezed to 4x4: every other texel pair
        assert_eq!(fb.color_at(0, 0), Color::RED);
        assert_eq!(fb.color_at(2, 0), Color::BLUE);
        assert_eq!(fb.color_at(2, 2), Color::RED);
    }

    #[test]
    fn test_wrong_corner_count_is_rejected() {
        let mut scene = QuadScene::demo();
        scene.corners.pop();
        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));
        assert!(render_scene(&scene).is_err());
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(load_scene_from_str("(width: 4"), Err(SceneError::Parse(_))));
    }

    #[test]
    fn test_missing_texture_file() {
        let mut scene = QuadScene::demo();
        scene.texture = TextureSource::File(PathBuf::from("does/not/exist.png"));
        assert!(matches!(render_scene(&scene), Err(SceneError::Texture(_))));
    }

    #[test]
    fn test_demo_scene_survives_ron() {
        let scene = QuadScene::demo();
        let text = ron::ser::to_string_pretty(&scene, ron::ser::PrettyConfig::new()).unwrap();
        assert_eq!(load_scene_from_str(&text).unwrap(), scene);
    }

    #[test]
    fn test_shipped_demo_file_matches_builtin() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/demo.ron");
        assert_eq!(load_scene(path).unwrap(), QuadScene::demo());
    }

    #[test]
    fn test_demo_scene_draws_in_both_strategies() {
        let mut scene = QuadScene::demo();
        for kind in NumericKind::ALL {
            scene.numeric = kind;
            let fb = render_scene(&scene).unwrap();
            assert_eq!(fb.color_at(0, 0), scene.clear);
            assert_ne!(fb.color_at(150, 120), scene.clear);
        }
    }

    #[test]
    fn test_save_scene_and_png() {
        let dir = std::env::temp_dir().join(format!("texquad-test-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let scene = QuadScene::demo();
        let scene_path = dir.join("demo.ron");
        save_scene(&scene, &scene_path).unwrap();
        let loaded = load_scene(&scene_path).unwrap();
        assert_eq!(loaded, scene);

        let fb = render_scene(&loaded).unwrap();
        let png_path = dir.join("demo.png");
        save_png(&fb, &png_path).unwrap();
        let back = Texture::from_file(&png_path).unwrap();
        assert_eq!((back.width, back.height), (fb.width, fb.height));
        assert_eq!(back.color_at(150, 120), fb.color_at(150, 120));

        let _ = fs::remove_dir_all(&dir);
    }
}
