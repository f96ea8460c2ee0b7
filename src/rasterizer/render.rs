//! Core rendering functions
//! Edge-function triangle rasterization into an `Image`

use super::math::{edge, Vec2};
use super::numeric::Numeric;
use super::types::{Bounds, Color, Image, Triangle};

/// Framebuffer for software rendering
pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        let bytes = color.to_bytes();
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&bytes);
        }
    }

    pub fn set_color(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    pub fn color_at(&self, x: usize, y: usize) -> Color {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Color::with_alpha(
                self.pixels[idx],
                self.pixels[idx + 1],
                self.pixels[idx + 2],
                self.pixels[idx + 3],
            )
        } else {
            Color::TRANSPARENT
        }
    }
}

impl Image for Framebuffer {
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
        if x >= 0 && y >= 0 {
            self.set_color(x as usize, y as usize, Color::from_u32(color));
        }
    }
}

/// Default tolerance on the shared-diagonal edge test, in native pixel² units
pub const DEFAULT_SEAM_FUDGE: f32 = -60.0 / 256.0;

/// Rasterizer settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// Lower bound for `w1` (the edge opposite the second vertex). Quads put
    /// their shared diagonal on this edge, so a small negative value hides the
    /// gap between the two halves. Tuned for 8 fractional bits.
    pub seam_fudge: f32,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            seam_fudge: DEFAULT_SEAM_FUDGE,
        }
    }
}

/// Edge-function weights for one pixel, plus the triangle's area.
/// `w0 + w1 + w2 == area` up to rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric<S> {
    pub w0: S,
    pub w1: S,
    pub w2: S,
    pub area: S,
}

/// Rasterize a single triangle.
///
/// `shader` is called for each covered pixel and returns a packed color;
/// `0` skips the write. Triangles with non-positive area (back-facing or
/// degenerate) are dropped before anything else happens, which also keeps
/// `area` non-zero for every shader call. So are triangles with a vertex the
/// strategy cannot rasterize without overflow (see `Numeric::in_range`).
///
/// Returns the number of pixels written.
pub fn rasterize_triangle<N, I, F>(
    num: &N,
    tri: &Triangle<'_, N::Scalar>,
    dst: &mut I,
    settings: &RasterSettings,
    mut shader: F,
) -> usize
where
    N: Numeric,
    I: Image + ?Sized,
    F: FnMut(Barycentric<N::Scalar>) -> u32,
{
    let p0 = tri.v0.pos;
    let p1 = tri.v1.pos;
    let p2 = tri.v2.pos;

    if ![p0, p1, p2].iter().all(|p| num.in_range(p.x) && num.in_range(p.y)) {
        log::trace!("culled triangle outside the representable range: {:?} {:?} {:?}", p0, p1, p2);
        return 0;
    }

    let area = edge(num, p0, p1, p2);
    // Also rejects NaN under the float strategy
    if !(area > N::ZERO) {
        log::trace!("culled triangle with area {:?}", area);
        return 0;
    }

    let dst_width = dst.width() as i32;
    let dst_height = dst.height() as i32;
    let bounds = Bounds::clamped(num, p0, p1, p2, dst.width(), dst.height());
    let fudge = num.seam_fudge(settings.seam_fudge);

    // Per-pixel increments of each edge function
    let a01 = p1.y - p0.y;
    let b01 = p0.x - p1.x;
    let a12 = p2.y - p1.y;
    let b12 = p1.x - p2.x;
    let a20 = p0.y - p2.y;
    let b20 = p2.x - p0.x;

    let start = Vec2 { x: bounds.left, y: bounds.top };
    let mut w0_row = edge(num, p1, p2, start);
    let mut w1_row = edge(num, p2, p0, start);
    let mut w2_row = edge(num, p0, p1, start);

    let mut written = 0;
    let mut py = bounds.top;
    while py <= bounds.bottom {
        let y = num.to_int_pixel(py);
        let mut w0 = w0_row;
        let mut w1 = w1_row;
        let mut w2 = w2_row;

        let mut px = bounds.left;
        while px <= bounds.right {
            if w0 >= N::ZERO && w1 >= fudge && w2 >= N::ZERO {
                let x = num.to_int_pixel(px);
                // The right/bottom bound may sit exactly on width/height
                if x < dst_width && y < dst_height {
                    let color = shader(Barycentric { w0, w1, w2, area });
                    if color != 0 {
                        dst.set_pixel(x, y, color);
                        written += 1;
                    }
                }
            }
            w0 += a12;
            w1 += a20;
            w2 += a01;
            px += N::ONE;
        }

        w0_row += b12;
        w1_row += b20;
        w2_row += b01;
        py += N::ONE;
    }

    written
}
