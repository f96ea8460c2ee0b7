//! Numeric strategies for the rasterizer
//!
//! Every real-valued quantity the pipeline touches (positions, UVs, edge
//! values) goes through a `Numeric` implementation, so the same triangle can be
//! drawn in 24.8 fixed point or in `f32` and the results compared.

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Rem, Sub};
use serde::{Serialize, Deserialize};

/// Number of fractional bits in the fixed-point representation
pub const FX_SHIFT: u32 = 8;

/// Fixed-point scale factor (1.0 == 256)
pub const FX_ONE: i32 = 1 << FX_SHIFT;

/// Arithmetic the rasterizer needs directly on a scalar.
/// Anything that would change the scale (multiply, divide, conversions)
/// goes through `Numeric` instead.
pub trait ScalarOps:
    Copy + PartialOrd + Debug + Add<Output = Self> + Sub<Output = Self> + AddAssign + Rem<Output = Self>
{
}

impl<T> ScalarOps for T where
    T: Copy + PartialOrd + Debug + Add<Output = T> + Sub<Output = T> + AddAssign + Rem<Output = T>
{
}

/// How scalars are represented and combined.
pub trait Numeric {
    type Scalar: ScalarOps;

    const ZERO: Self::Scalar;
    const ONE: Self::Scalar;

    /// Lift a native real number into the scalar representation.
    fn from_native(&self, v: f32) -> Self::Scalar;

    /// Accept a value that is already in 24.8 fixed-point form.
    fn from_raw_fx8(&self, raw: i32) -> Self::Scalar;

    /// Convert an integer (image dimension, pixel count) into scalar units.
    fn to_fixed_unit(&self, v: i32) -> Self::Scalar;

    /// Truncate a scalar back to an integer pixel index.
    fn to_int_pixel(&self, v: Self::Scalar) -> i32;

    fn mul(&self, a: Self::Scalar, b: Self::Scalar) -> Self::Scalar;

    /// `b` must be non-zero.
    fn div(&self, a: Self::Scalar, b: Self::Scalar) -> Self::Scalar;

    fn to_native(&self, v: Self::Scalar) -> f32;

    /// Tolerance applied to the shared-diagonal edge test, see `RasterSettings`.
    fn seam_fudge(&self, native: f32) -> Self::Scalar {
        self.from_native(native)
    }

    /// Weighted blend `(v0·w0 + v1·w1 + v2·w2) / area`. `area` must be non-zero.
    fn blend(&self, v: [Self::Scalar; 3], w: [Self::Scalar; 3], area: Self::Scalar) -> Self::Scalar {
        let sum = self.mul(v[0], w[0]) + self.mul(v[1], w[1]) + self.mul(v[2], w[2]);
        self.div(sum, area)
    }

    /// Whether a vertex coordinate is small enough for the edge arithmetic.
    fn in_range(&self, _v: Self::Scalar) -> bool {
        true
    }
}

/// Largest vertex coordinate `Fixed8` rasterizes, in raw 24.8 units (±2^25 px).
/// Edge values of triangles inside this range fit in `i64`.
pub const FX_MAX_COORD: i64 = 1 << 33;

fn narrow(v: i128) -> i64 {
    v.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// 24.8 fixed point stored in `i64`. Products and quotients are widened to
/// `i128` before renormalising and saturate when narrowed back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fixed8;

impl Numeric for Fixed8 {
    type Scalar = i64;

    const ZERO: i64 = 0;
    const ONE: i64 = FX_ONE as i64;

    fn from_native(&self, v: f32) -> i64 {
        (v * FX_ONE as f32) as i64
    }

    fn from_raw_fx8(&self, raw: i32) -> i64 {
        raw as i64
    }

    fn to_fixed_unit(&self, v: i32) -> i64 {
        (v as i64) << FX_SHIFT
    }

    fn to_int_pixel(&self, v: i64) -> i32 {
        (v >> FX_SHIFT) as i32
    }

    fn mul(&self, a: i64, b: i64) -> i64 {
        narrow((a as i128 * b as i128) >> FX_SHIFT)
    }

    fn div(&self, a: i64, b: i64) -> i64 {
        narrow(((a as i128) << FX_SHIFT) / b as i128)
    }

    fn to_native(&self, v: i64) -> f32 {
        v as f32 / FX_ONE as f32
    }

    // Same rounding as the default, without narrowing the partial sums
    fn blend(&self, v: [i64; 3], w: [i64; 3], area: i64) -> i64 {
        let sum: i128 = v
            .iter()
            .zip(&w)
            .map(|(&v, &w)| (v as i128 * w as i128) >> FX_SHIFT)
            .sum();
        narrow((sum << FX_SHIFT) / area as i128)
    }

    fn in_range(&self, v: i64) -> bool {
        (-FX_MAX_COORD..=FX_MAX_COORD).contains(&v)
    }
}

/// Native `f32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Float;

impl Numeric for Float {
    type Scalar = f32;

    const ZERO: f32 = 0.0;
    const ONE: f32 = 1.0;

    fn from_native(&self, v: f32) -> f32 {
        v
    }

    fn from_raw_fx8(&self, raw: i32) -> f32 {
        raw as f32 / FX_ONE as f32
    }

    fn to_fixed_unit(&self, v: i32) -> f32 {
        v as f32
    }

    fn to_int_pixel(&self, v: f32) -> i32 {
        v as i32
    }

    fn mul(&self, a: f32, b: f32) -> f32 {
        a * b
    }

    fn div(&self, a: f32, b: f32) -> f32 {
        a / b
    }

    fn to_native(&self, v: f32) -> f32 {
        v
    }
}

/// Selects one of the two strategies at runtime (scene files, viewer toggle)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    #[default]
    Fixed8,
    Float,
}

impl NumericKind {
    pub const ALL: [NumericKind; 2] = [NumericKind::Fixed8, NumericKind::Float];

    pub fn label(&self) -> &'static str {
        match self {
            NumericKind::Fixed8 => "fixed 24.8",
            NumericKind::Float => "float",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            NumericKind::Fixed8 => NumericKind::Float,
            NumericKind::Float => NumericKind::Fixed8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_from_native_truncates_toward_zero() {
        assert_eq!(Fixed8.from_native(1.0), 256);
        assert_eq!(Fixed8.from_native(0.5), 128);
        assert_eq!(Fixed8.from_native(1.999), 511);
        assert_eq!(Fixed8.from_native(-1.999), -511);
        assert_eq!(Fixed8.from_native(-60.0 / 256.0), -60);
    }

    #[test]
    fn test_fixed_to_int_pixel_shifts_arithmetically() {
        assert_eq!(Fixed8.to_int_pixel(256 * 3 + 255), 3);
        assert_eq!(Fixed8.to_int_pixel(-1), -1);
        assert_eq!(Fixed8.to_int_pixel(Fixed8.to_fixed_unit(17)), 17);
    }

    #[test]
    fn test_fixed_mul_div_renormalise() {
        let f = Fixed8;
        let a = f.from_native(2.5);
        let b = f.from_native(4.0);
        assert_eq!(f.mul(a, b), f.from_native(10.0));
        assert_eq!(f.div(a, b), f.from_native(0.625));
        assert_eq!(f.div(f.from_native(1.0), f.from_native(3.0)), 85);
    }

    #[test]
    fn test_fixed_mul_does_not_overflow_intermediate() {
        let f = Fixed8;
        let a = f.to_fixed_unit(1000);
        assert_eq!(f.mul(a, a), f.to_fixed_unit(1_000_000));

        // Edge-sized product of a 2e7 px span
        let span = f.from_native(2.0e7);
        assert_eq!(f.mul(span, span), 400_000_000_000_000i64 * 256);
        assert_eq!(f.mul(i64::MAX, i64::MAX), i64::MAX);
    }

    #[test]
    fn test_blend_matches_across_strategies() {
        let fx = Fixed8;
        let v = [fx.from_native(0.0), fx.from_native(1.0), fx.from_native(3.0)];
        let w = [fx.from_native(2.0), fx.from_native(1.0), fx.from_native(1.0)];
        let area = fx.from_native(4.0);
        assert_eq!(fx.blend(v, w, area), fx.from_native(1.0));
        assert_eq!(Float.blend([0.0, 1.0, 3.0], [2.0, 1.0, 1.0], 4.0), 1.0);
    }

    #[test]
    fn test_blend_keeps_large_weights_exact() {
        let fx = Fixed8;
        // Weighted sum of a 2e7 px triangle with tiled UVs exceeds i64
        let area = fx.mul(fx.from_native(2.0e7), fx.from_native(2.0e7));
        let half = area / 2;
        let v = [fx.from_native(0.0), fx.from_native(0.0), fx.from_native(200.0)];
        assert_eq!(fx.blend(v, [half, 0, half], area), fx.from_native(100.0));
    }

    #[test]
    fn test_fixed_coordinate_range() {
        let fx = Fixed8;
        assert!(fx.in_range(fx.from_native(1.0e7)));
        assert!(fx.in_range(fx.from_native(-1.0e7)));
        assert!(!fx.in_range(fx.from_native(1.0e8)));
        assert!(!fx.in_range(fx.from_native(f32::NEG_INFINITY)));
        assert!(Float.in_range(1.0e30));
    }

    #[test]
    fn test_float_passthrough() {
        let f = Float;
        assert_eq!(f.from_native(0.25), 0.25);
        assert_eq!(f.from_raw_fx8(64), 0.25);
        assert_eq!(f.to_fixed_unit(12), 12.0);
        assert_eq!(f.to_int_pixel(3.99), 3);
        assert_eq!(f.mul(1.5, 2.0), 3.0);
        assert_eq!(f.div(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_raw_fx8_agrees_across_strategies() {
        for raw in [-512, -60, 0, 1, 128, 256, 1000] {
            assert_eq!(Fixed8.to_native(Fixed8.from_raw_fx8(raw)), Float.from_raw_fx8(raw));
        }
    }

    #[test]
    fn test_seam_fudge_constant() {
        assert_eq!(Fixed8.seam_fudge(-60.0 / 256.0), -60);
        assert!((Float.seam_fudge(-60.0 / 256.0) + 0.234375).abs() < 1e-6);
    }

    #[test]
    fn test_kind_toggle() {
        assert_eq!(NumericKind::default(), NumericKind::Fixed8);
        assert_eq!(NumericKind::Fixed8.toggled(), NumericKind::Float);
        assert_eq!(NumericKind::Float.toggled().toggled(), NumericKind::Float);
    }
}
