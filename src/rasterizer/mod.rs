//! Software rasterizer for texture-mapped quads
//!
//! Features:
//! - Edge-function triangle scan conversion over a clamped bounding box
//! - Affine texture mapping with repeat wrapping
//! - Interchangeable 24.8 fixed-point and `f32` arithmetic
//! - Back-face and degenerate triangle culling

mod math;
mod numeric;
mod types;
mod render;
mod sampler;
mod quad;

pub use math::*;
pub use numeric::*;
pub use types::*;
pub use render::*;
pub use sampler::*;
pub use quad::*;

/// Default viewer framebuffer size (PS1-style low resolution)
pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
