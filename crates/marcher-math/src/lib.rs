//! Marcher Math - vector kernel shared by the scene evaluator and the marcher
//!
//! `Vec3` is [`glam::Vec3`]; addition, subtraction, scaling, dot product and
//! length come from glam. This crate adds the two pieces glam does not give us
//! in the shape the renderer needs:
//!
//! - a normalize that never produces NaN ([`normalize_or_up`])
//! - a bit-trick reciprocal square root for hot loops ([`fast_inv_sqrt`])
//!
//! # Example
//!
//! ```rust
//! use marcher_math::{normalize_or_up, Vec3};
//!
//! let n = normalize_or_up(Vec3::new(3.0, 0.0, 4.0));
//! assert!((n.length() - 1.0).abs() < 1e-6);
//!
//! // Degenerate input falls back to +Y
//! assert_eq!(normalize_or_up(Vec3::ZERO), Vec3::Y);
//! ```

use serde::{Deserialize, Serialize};

pub use glam::Vec3;

/// Squared length below which a vector is treated as degenerate.
///
/// Central-difference gradients are tiny (on the order of 2 * eps), so the
/// threshold has to sit well below them.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// Magic constant for the initial guess of [`fast_inv_sqrt`].
const INV_SQRT_MAGIC: u32 = 0x5f37_5a86;

/// Direction returned when a vector is too short to normalize.
pub const FALLBACK_DIRECTION: Vec3 = Vec3::Y;

/// How reciprocal square roots are computed on hot paths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvSqrt {
    /// `1.0 / x.sqrt()`
    #[default]
    Exact,
    /// [`fast_inv_sqrt`], about 0.2% relative error
    Fast,
}

impl InvSqrt {
    /// Evaluate `1 / sqrt(x)` with this strategy
    #[inline]
    pub fn eval(self, x: f32) -> f32 {
        match self {
            Self::Exact => 1.0 / x.sqrt(),
            Self::Fast => fast_inv_sqrt(x),
        }
    }
}

/// Approximate `1 / sqrt(x)` for positive `x`.
///
/// Integer-reinterpretation initial guess followed by one Newton-Raphson step:
/// `y * (1.5 - 0.5 * x * y^2)`.
#[inline]
pub fn fast_inv_sqrt(x: f32) -> f32 {
    let half = 0.5 * x;
    let y = f32::from_bits(INV_SQRT_MAGIC.wrapping_sub(x.to_bits() >> 1));
    y * (1.5 - half * y * y)
}

/// Normalize `v`, returning [`FALLBACK_DIRECTION`] when it is degenerate
#[inline]
pub fn normalize_or_up(v: Vec3) -> Vec3 {
    normalize_or_up_with(v, InvSqrt::Exact)
}

/// Normalize `v` using the given reciprocal square root strategy.
///
/// Vectors with squared length at or below [`DEGENERATE_LENGTH_SQUARED`]
/// (including NaN lengths) map to [`FALLBACK_DIRECTION`].
#[inline]
pub fn normalize_or_up_with(v: Vec3, mode: InvSqrt) -> Vec3 {
    let len_sq = v.length_squared();
    if len_sq > DEGENERATE_LENGTH_SQUARED {
        v * mode.eval(len_sq)
    } else {
        FALLBACK_DIRECTION
    }
}
