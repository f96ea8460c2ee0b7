//! Vector math for 2D rasterization
//!
//! Everything here is generic over the scalar representation; operations that
//! change scale take the active `Numeric` strategy explicitly.

use serde::{Serialize, Deserialize};
use super::numeric::{Numeric, ScalarOps};

/// 2D Vector (positions and texture coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2<S = f32> {
    pub x: S,
    pub y: S,
}

impl<S: ScalarOps> Vec2<S> {
    pub fn new(x: S, y: S) -> Self {
        Self { x, y }
    }
}

impl Vec2<f32> {
    /// Convert a native vector into the strategy's representation
    pub fn to_scalar<N: Numeric>(self, num: &N) -> Vec2<N::Scalar> {
        Vec2 {
            x: num.from_native(self.x),
            y: num.from_native(self.y),
        }
    }
}

/// Edge function: twice the signed area of triangle (a, b, c).
/// Positive when `c` lies on the inner side of the directed edge a -> b
/// for the rasterizer's winding.
pub fn edge<N: Numeric>(num: &N, a: Vec2<N::Scalar>, b: Vec2<N::Scalar>, c: Vec2<N::Scalar>) -> N::Scalar {
    num.mul(b.y - a.y, c.x - a.x) - num.mul(b.x - a.x, c.y - a.y)
}

pub fn min2<S: PartialOrd>(a: S, b: S) -> S {
    if b < a { b } else { a }
}

pub fn max2<S: PartialOrd>(a: S, b: S) -> S {
    if b > a { b } else { a }
}

pub fn min3<S: PartialOrd>(a: S, b: S, c: S) -> S {
    min2(min2(a, b), c)
}

pub fn max3<S: PartialOrd>(a: S, b: S, c: S) -> S {
    max2(max2(a, b), c)
}

pub fn clamp<S: PartialOrd>(v: S, min: S, max: S) -> S {
    min2(max, max2(v, min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rasterizer::numeric::{Fixed8, Float};

    #[test]
    fn test_edge_sign_follows_winding() {
        let f = Float;
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(0.0, 4.0);
        let c = Vec2::new(4.0, 4.0);
        assert_eq!(edge(&f, a, b, c), 16.0);
        assert_eq!(edge(&f, a, c, b), -16.0);
        assert_eq!(edge(&f, a, b, Vec2::new(0.0, 2.0)), 0.0);
    }

    #[test]
    fn test_edge_fixed_matches_float() {
        let fx = Fixed8;
        let pts = [Vec2::new(1.5f32, -2.0), Vec2::new(7.25, 3.0), Vec2::new(-3.0, 9.5)];
        let [a, b, c] = pts.map(|p| p.to_scalar(&fx));
        let fixed = fx.to_native(edge(&fx, a, b, c));
        let float = edge(&Float, pts[0], pts[1], pts[2]);
        assert!((fixed - float).abs() < 0.01);
    }

    #[test]
    fn test_edge_fixed_large_extent() {
        let fx = Fixed8;
        let a = Vec2::new(-1.0e7f32, -1.0e7).to_scalar(&fx);
        let b = Vec2::new(-1.0e7f32, 1.0e7).to_scalar(&fx);
        let c = Vec2::new(1.0e7f32, 1.0e7).to_scalar(&fx);
        // (2e7)^2 px^2, still in 24.8
        assert_eq!(edge(&fx, a, b, c), 400_000_000_000_000i64 * 256);
        assert_eq!(edge(&fx, a, c, b), -400_000_000_000_000i64 * 256);
    }

    #[test]
    fn test_clamp_and_extrema() {
        assert_eq!(min3(3, -1, 2), -1);
        assert_eq!(max3(3, -1, 2), 3);
        assert_eq!(clamp(-5, 0, 10), 0);
        assert_eq!(clamp(15, 0, 10), 10);
        assert_eq!(clamp(7.5, 0.0, 10.0), 7.5);
    }
}
