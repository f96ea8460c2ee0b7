//! Texture sampling from barycentric weights
//!
//! Affine interpolation only: UVs are blended linearly in screen space, then
//! wrapped so textures repeat.

use super::math::Vec2;
use super::numeric::Numeric;
use super::render::Barycentric;
use super::types::{Image, Triangle};

/// Wrap one unwrapped texture coordinate into `[0, one]`.
///
/// A coordinate that lands exactly on a whole number is mapped to `one` when
/// it came from the positive side, so the last texel of a repeat stays put
/// instead of jumping back to the first one.
pub fn wrap<N: Numeric>(unwrapped: N::Scalar) -> N::Scalar {
    let mut t = unwrapped % N::ONE;
    if t < N::ZERO {
        t += N::ONE;
    }
    if t == N::ZERO && unwrapped > N::ZERO {
        t = N::ONE;
    }
    t
}

/// Looks up texels for one triangle
pub struct TextureSampler<'a, N: Numeric, T: Image + ?Sized> {
    num: &'a N,
    uv0: Vec2<N::Scalar>,
    uv1: Vec2<N::Scalar>,
    uv2: Vec2<N::Scalar>,
    texture: &'a T,
    tex_width: N::Scalar,
    tex_height: N::Scalar,
}

impl<'a, N: Numeric, T: Image + ?Sized> TextureSampler<'a, N, T> {
    pub fn new(num: &'a N, tri: &Triangle<'_, N::Scalar>, texture: &'a T) -> Self {
        Self {
            num,
            uv0: tri.v0.uv,
            uv1: tri.v1.uv,
            uv2: tri.v2.uv,
            texture,
            tex_width: num.to_fixed_unit(texture.width() as i32),
            tex_height: num.to_fixed_unit(texture.height() as i32),
        }
    }

    /// Interpolated, still unwrapped UV at a pixel
    pub fn uv_at(&self, b: Barycentric<N::Scalar>) -> Vec2<N::Scalar> {
        let w = [b.w0, b.w1, b.w2];
        Vec2 {
            x: self.num.blend([self.uv0.x, self.uv1.x, self.uv2.x], w, b.area),
            y: self.num.blend([self.uv0.y, self.uv1.y, self.uv2.y], w, b.area),
        }
    }

    /// Integer texel coordinates for an unwrapped UV.
    /// Clamped to the last row/column so a wrapped `1.0` selects the edge texel.
    pub fn texel_at(&self, uv: Vec2<N::Scalar>) -> (i32, i32) {
        let num = self.num;
        let u = wrap::<N>(uv.x);
        let v = wrap::<N>(uv.y);
        let x = num.to_int_pixel(num.mul(u, self.tex_width));
        let y = num.to_int_pixel(num.mul(v, self.tex_height));
        (
            x.min(self.texture.width() as i32 - 1),
            y.min(self.texture.height() as i32 - 1),
        )
    }

    /// Packed texel color for a pixel; `0` means transparent
    pub fn shade(&self, b: Barycentric<N::Scalar>) -> u32 {
        let (x, y) = self.texel_at(self.uv_at(b));
        self.texture.get_pixel(x, y)
    }
}
