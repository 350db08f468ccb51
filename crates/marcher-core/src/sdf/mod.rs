//! Signed Distance Functions (SDF) for 3D shape definition
//!
//! SDFs represent shapes as functions that return the distance from any point
//! in space to the nearest surface. Negative values are inside, positive values
//! are outside, and zero is exactly on the surface.
//!
//! ## Example
//!
//! ```rust
//! use marcher_core::prelude::*;
//!
//! let blob = Sphere::new(Vec3::ZERO, 1.0)
//!     .smooth_union(Box3::new(Vec3::new(2.0, 0.0, 0.0), Vec3::splat(0.4)), 0.3)
//!     .union(Plane::new(-1.5));
//!
//! assert!(blob.distance(Vec3::ZERO) < 0.0);
//! ```
//!
//! Composition is static: every combinator is a plain generic struct, so a
//! composed scene evaluates without allocation or dynamic dispatch.

pub mod operations;
pub mod primitives;

use glam::Vec3;

/// The core SDF trait - any type that can compute distance from a point
pub trait Sdf: Send + Sync {
    /// Calculate the signed distance from point `p` to the surface.
    ///
    /// - Returns negative values for points inside the shape
    /// - Returns positive values for points outside the shape
    /// - Returns zero for points exactly on the surface
    fn distance(&self, p: Vec3) -> f32;
}

impl<S: Sdf + ?Sized> Sdf for &S {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        (**self).distance(p)
    }
}

/// Extension trait providing chainable operations on SDFs
pub trait SdfExt: Sdf + Sized {
    /// Union: combine two shapes (hard minimum)
    fn union<S: Sdf>(self, other: S) -> operations::Union<Self, S> {
        operations::Union::new(self, other)
    }

    /// Smooth union with blend radius `k`
    fn smooth_union<S: Sdf>(self, other: S, k: f32) -> operations::SmoothUnion<Self, S> {
        operations::SmoothUnion::new(self, other, k)
    }
}

impl<T: Sdf> SdfExt for T {}

// Re-exports
pub use operations::*;
pub use primitives::*;
