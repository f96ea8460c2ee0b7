//! Textured quad drawing
//!
//! Quad layout (wound clockwise on screen)
//!
//! ```text
//! (i:0, uv:0,0)   (i:1, uv:1,0)
//!   +------------+
//!   |\__         |
//!   |   \__      |
//!   |      \__   |
//!   |         \__|
//!   +------------+
//! (i:3, uv:0,1)   (i:2, uv:1,1)
//! ```
//!
//! The two halves share the 0-2 diagonal, which lands on each triangle's `w1`
//! edge; that is where `RasterSettings::seam_fudge` applies.

use super::math::Vec2;
use super::numeric::{Fixed8, Float, Numeric, NumericKind};
use super::render::{rasterize_triangle, RasterSettings};
use super::sampler::TextureSampler;
use super::types::{Image, Triangle, Vertex};

/// Number of values in a flat quad argument list: 4 x (x, y, u, v)
pub const QUAD_ARG_COUNT: usize = 16;

/// Lower-left half
pub const TRI0_INDICES: [usize; 3] = [0, 3, 2];
/// Upper-right half
pub const TRI1_INDICES: [usize; 3] = [2, 1, 0];

/// Four corners in top-left, top-right, bottom-right, bottom-left order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad<S> {
    pub verts: [Vertex<S>; 4],
}

impl<S: Copy> Quad<S> {
    /// Decode four `(x, y, u, v)` groups of native numbers
    pub fn from_args<N: Numeric<Scalar = S>>(num: &N, args: &[f32; QUAD_ARG_COUNT]) -> Self {
        Self::decode(args, |v| num.from_native(v))
    }

    /// Decode four `(x, y, u, v)` groups already in 24.8 fixed point
    pub fn from_raw_fx8<N: Numeric<Scalar = S>>(num: &N, args: &[i32; QUAD_ARG_COUNT]) -> Self {
        Self::decode(args, |v| num.from_raw_fx8(v))
    }

    fn decode<T: Copy>(args: &[T; QUAD_ARG_COUNT], lift: impl Fn(T) -> S) -> Self {
        let corner = |i: usize| {
            let g = &args[i * 4..i * 4 + 4];
            Vertex {
                pos: Vec2 { x: lift(g[0]), y: lift(g[1]) },
                uv: Vec2 { x: lift(g[2]), y: lift(g[3]) },
            }
        };
        Self {
            verts: [corner(0), corner(1), corner(2), corner(3)],
        }
    }

    /// The two halves, in draw order
    pub fn triangles(&self) -> [Triangle<'_, S>; 2] {
        [
            Triangle::from_indices(&self.verts, TRI0_INDICES),
            Triangle::from_indices(&self.verts, TRI1_INDICES),
        ]
    }
}

/// Draw a decoded quad. Returns the number of pixel writes.
pub fn draw_quad<N, D, T>(
    num: &N,
    quad: &Quad<N::Scalar>,
    dst: &mut D,
    texture: &T,
    settings: &RasterSettings,
) -> usize
where
    N: Numeric,
    D: Image + ?Sized,
    T: Image + ?Sized,
{
    let mut written = 0;
    for tri in &quad.triangles() {
        let sampler = TextureSampler::new(num, tri, texture);
        written += rasterize_triangle(num, tri, &mut *dst, settings, |b| sampler.shade(b));
    }
    written
}

/// Draw `texture` onto `dst` through the quad described by 16 native numbers:
/// four `(x, y, u, v)` corners, positions in destination pixels and UVs
/// normalised so `1.0` spans the texture once.
pub fn draw_textured_quad<N, D, T>(
    num: &N,
    dst: &mut D,
    texture: &T,
    args: &[f32; QUAD_ARG_COUNT],
    settings: &RasterSettings,
) -> usize
where
    N: Numeric,
    D: Image + ?Sized,
    T: Image + ?Sized,
{
    let quad = Quad::from_args(num, args);
    let written = draw_quad(num, &quad, dst, texture, settings);
    log::debug!("textured quad: {} pixels written", written);
    written
}

/// `draw_textured_quad` with the strategy picked at runtime
pub fn draw_textured_quad_with<D, T>(
    kind: NumericKind,
    dst: &mut D,
    texture: &T,
    args: &[f32; QUAD_ARG_COUNT],
    settings: &RasterSettings,
) -> usize
where
    D: Image + ?Sized,
    T: Image + ?Sized,
{
    match kind {
        NumericKind::Fixed8 => draw_textured_quad(&Fixed8, dst, texture, args, settings),
        NumericKind::Float => draw_textured_quad(&Float, dst, texture, args, settings),
    }
}

/// Flat argument list for an axis-aligned quad with straight UVs
pub fn rect_args(x: f32, y: f32, w: f32, h: f32) -> [f32; QUAD_ARG_COUNT] {
    [
        x, y, 0.0, 0.0,
        x + w, y, 1.0, 0.0,
        x + w, y + h, 1.0, 1.0,
        x, y + h, 0.0, 1.0,
    ]
}
