//! Core types for the rasterizer

use std::path::Path;
use serde::{Serialize, Deserialize};
use super::math::{clamp, max3, min3, Vec2};
use super::numeric::{Numeric, ScalarOps};

/// RGBA color (0-255 per channel)
///
/// Packs to the opaque `u32` the `Image` trait traffics in. A packed value of
/// `0` (all channels zero) is the transparency sentinel and is never written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255, a: 255 };
    pub const RED: Color = Color { r: 255, g: 0, b: 0, a: 255 };
    pub const GREEN: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    pub const BLUE: Color = Color { r: 0, g: 0, b: 255, a: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn with_alpha(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to u32 (RGBA, red in the high byte)
    pub fn to_u32(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | (self.a as u32)
    }

    pub fn from_u32(v: u32) -> Self {
        Self {
            r: (v >> 24) as u8,
            g: (v >> 16) as u8,
            b: (v >> 8) as u8,
            a: v as u8,
        }
    }

    pub fn is_transparent(self) -> bool {
        self.to_u32() == 0
    }

    /// Convert to [u8; 4] for framebuffer
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// A vertex with screen position and texture coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex<S> {
    pub pos: Vec2<S>,
    pub uv: Vec2<S>,
}

impl<S: ScalarOps> Vertex<S> {
    pub fn new(pos: Vec2<S>, uv: Vec2<S>) -> Self {
        Self { pos, uv }
    }
}

/// Three vertices in winding order, borrowed from a vertex array
#[derive(Debug, Clone, Copy)]
pub struct Triangle<'a, S> {
    pub v0: &'a Vertex<S>,
    pub v1: &'a Vertex<S>,
    pub v2: &'a Vertex<S>,
}

impl<'a, S> Triangle<'a, S> {
    pub fn new(v0: &'a Vertex<S>, v1: &'a Vertex<S>, v2: &'a Vertex<S>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Pick three vertices out of `verts` in the given index order.
    /// Panics if an index is out of range.
    pub fn from_indices(verts: &'a [Vertex<S>], indices: [usize; 3]) -> Self {
        Self {
            v0: &verts[indices[0]],
            v1: &verts[indices[1]],
            v2: &verts[indices[2]],
        }
    }
}

/// Axis-aligned pixel rectangle in scalar units, edges inclusive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<S> {
    pub left: S,
    pub top: S,
    pub right: S,
    pub bottom: S,
}

impl<S: ScalarOps> Bounds<S> {
    /// Bounding box of three points clamped to `[0, width] x [0, height]`
    pub fn clamped<N: Numeric<Scalar = S>>(
        num: &N,
        p0: Vec2<S>,
        p1: Vec2<S>,
        p2: Vec2<S>,
        width: usize,
        height: usize,
    ) -> Self {
        let w = num.to_fixed_unit(width as i32);
        let h = num.to_fixed_unit(height as i32);
        Self {
            left: clamp(min3(p0.x, p1.x, p2.x), N::ZERO, w),
            top: clamp(min3(p0.y, p1.y, p2.y), N::ZERO, h),
            right: clamp(max3(p0.x, p1.x, p2.x), N::ZERO, w),
            bottom: clamp(max3(p0.y, p1.y, p2.y), N::ZERO, h),
        }
    }
}

/// Pixel storage the rasterizer reads from and writes to.
///
/// Colors are opaque packed integers; `0` means fully transparent.
/// Implementations must tolerate out-of-range coordinates: reads return `0`
/// and writes are ignored.
pub trait Image {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn get_pixel(&self, x: i32, y: i32) -> u32;
    fn set_pixel(&mut self, x: i32, y: i32, color: u32);
}

/// Error type for texture loading
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("pixel count {got} does not match {width}x{height}")]
    Size { width: usize, height: usize, got: usize },
}

/// Simple texture (array of colors)
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
    pub name: String,
}

impl Texture {
    /// Build from row-major pixels
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, TextureError> {
        if pixels.len() != width * height {
            return Err(TextureError::Size { width, height, got: pixels.len() });
        }
        Ok(Self { width, height, pixels, name: String::new() })
    }

    /// Load texture from an image file (PNG, JPEG or BMP)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| TextureError::Load {
            path: path.display().to_string(),
            source,
        })?;

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let tex = Self::from_dynamic(img, name);
        log::info!("Loaded texture: {} ({}x{})", tex.name, tex.width, tex.height);
        Ok(tex)
    }

    /// Load texture from raw encoded bytes
    pub fn from_bytes(bytes: &[u8], name: String) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(img, name))
    }

    fn from_dynamic(img: image::DynamicImage, name: String) -> Self {
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let pixels: Vec<Color> = rgba
            .pixels()
            .map(|p| Color::with_alpha(p[0], p[1], p[2], p[3]))
            .collect();

        Self {
            width: width as usize,
            height: height as usize,
            pixels,
            name,
        }
    }

    /// Create a checkerboard test texture (4x4 pixel cells)
    pub fn checkerboard(width: usize, height: usize, color1: Color, color2: Color) -> Self {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let checker = ((x / 4) + (y / 4)) % 2 == 0;
                pixels.push(if checker { color1 } else { color2 });
            }
        }
        Self { width, height, pixels, name: "checkerboard".to_string() }
    }

    /// Get pixel at x,y coordinates
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            Color::TRANSPARENT
        }
    }
}

impl Image for Texture {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get_pixel(&self, x: i32, y: i32) -> u32 {
        if x < 0 || y < 0 {
            return 0;
        }
        self.color_at(x as usize, y as usize).to_u32()
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.pixels[y as usize * self.width + x as usize] = Color::from_u32(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::numeric::Fixed8;

    #[test]
    fn test_color_packing() {
        let c = Color::with_alpha(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_u32(), 0x1234_5678);
        assert_eq!(Color::from_u32(0x1234_5678), c);
        assert!(Color::TRANSPARENT.is_transparent());
        assert!(!Color::BLACK.is_transparent());
    }

    #[test]
    fn test_texture_out_of_range_reads_transparent() {
        let tex = Texture::checkerboard(8, 8, Color::RED, Color::BLUE);
        assert_eq!(tex.get_pixel(0, 0), Color::RED.to_u32());
        assert_eq!(tex.get_pixel(4, 0), Color::BLUE.to_u32());
        assert_eq!(tex.get_pixel(-1, 0), 0);
        assert_eq!(tex.get_pixel(8, 0), 0);
        assert_eq!(tex.get_pixel(0, 8), 0);
    }

    #[test]
    fn test_texture_from_pixels_checks_size() {
        assert!(Texture::from_pixels(2, 2, vec![Color::RED; 3]).is_err());
        let tex = Texture::from_pixels(2, 1, vec![Color::RED, Color::GREEN]).unwrap();
        assert_eq!(tex.color_at(1, 0), Color::GREEN);
    }

    #[test]
    fn test_texture_from_bytes_rejects_garbage() {
        assert!(Texture::from_bytes(b"not an image", "junk".to_string()).is_err());
    }

    #[test]
    fn test_bounds_clamped_to_destination() {
        let fx = Fixed8;
        let p0 = Vec2::new(-3.0f32, 1.5).to_scalar(&fx);
        let p1 = Vec2::new(40.0f32, 2.0).to_scalar(&fx);
        let p2 = Vec2::new(5.0f32, 100.0).to_scalar(&fx);
        let b = Bounds::clamped(&fx, p0, p1, p2, 16, 8);
        assert_eq!(b.left, 0);
        assert_eq!(b.top, 384);
        assert_eq!(b.right, 16 * 256);
        assert_eq!(b.bottom, 8 * 256);
    }

    #[test]
    fn test_triangle_from_indices() {
        let verts: Vec<Vertex<i32>> = (0..4)
            .map(|i| Vertex::new(Vec2::new(i, i), Vec2::new(0, 0)))
            .collect();
        let tri = Triangle::from_indices(&verts, [0, 3, 2]);
        assert_eq!(tri.v1.pos.x, 3);
        assert_eq!(tri.v2.pos.x, 2);
    }
}
