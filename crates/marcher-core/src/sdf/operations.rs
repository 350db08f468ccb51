//! SDF combination operations

use super::Sdf;
use glam::Vec3;

/// Polynomial smooth minimum of two distances.
///
/// Surfaces closer than `k` to each other are joined by a fillet instead of a
/// crease. The result is never greater than `min(a, b)`; it drops by at most
/// `k / 4` where the inputs are equal.
///
/// A blend radius at or below `f32::EPSILON` degenerates to a hard `min`.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
    if k <= f32::EPSILON {
        return a.min(b);
    }
    let h = (k - (a - b).abs()).max(0.0) / k;
    a.min(b) - h * h * k * 0.25
}

// ============================================================================
// Boolean Operations
// ============================================================================

/// Union of two SDFs (combine shapes)
#[derive(Debug, Clone, Copy)]
pub struct Union<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
}

impl<A: Sdf, B: Sdf> Union<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: Sdf, B: Sdf> Sdf for Union<A, B> {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        self.a.distance(p).min(self.b.distance(p))
    }
}

/// Smooth union with polynomial blending
#[derive(Debug, Clone, Copy)]
pub struct SmoothUnion<A: Sdf, B: Sdf> {
    pub a: A,
    pub b: B,
    pub k: f32,
}

impl<A: Sdf, B: Sdf> SmoothUnion<A, B> {
    pub fn new(a: A, b: B, k: f32) -> Self {
        Self { a, b, k }
    }
}

impl<A: Sdf, B: Sdf> Sdf for SmoothUnion<A, B> {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        smooth_min(self.a.distance(p), self.b.distance(p), self.k)
    }
}

// ============================================================================
// Tests
// ============================================================================
