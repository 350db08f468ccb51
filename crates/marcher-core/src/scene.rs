//! The fixed demo scene and surface normal estimation
//!
//! A unit sphere at the origin is blended into a small box to its right, and
//! the pair sits above an infinite ground plane:
//!
//! ```text
//! min(smooth_min(sphere, box, 0.3), ground)
//! ```

use crate::sdf::{Sdf, box_distance, plane_distance, smooth_min, sphere_distance};
use glam::Vec3;
use marcher_math::{InvSqrt, normalize_or_up_with};
use serde::{Deserialize, Serialize};

/// Center of the sphere
pub const SPHERE_CENTER: Vec3 = Vec3::ZERO;
/// Radius of the sphere
pub const SPHERE_RADIUS: f32 = 1.0;
/// Center of the box
pub const BOX_CENTER: Vec3 = Vec3::new(2.0, 0.0, 0.0);
/// Half-extents of the box
pub const BOX_HALF_EXTENTS: Vec3 = Vec3::splat(0.4);
/// Height of the ground plane
pub const GROUND_HEIGHT: f32 = -1.5;
/// Blend radius between sphere and box
pub const BLEND_RADIUS: f32 = 0.3;

/// Signed distance from `p` to the demo scene
#[inline]
pub fn scene_distance(p: Vec3) -> f32 {
    let d_sphere = sphere_distance(p, SPHERE_CENTER, SPHERE_RADIUS);
    let d_box = box_distance(p, BOX_CENTER, BOX_HALF_EXTENTS);
    let d_shapes = smooth_min(d_sphere, d_box, BLEND_RADIUS);
    d_shapes.min(plane_distance(p, GROUND_HEIGHT))
}

/// The demo scene as an [`Sdf`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoScene;

impl Sdf for DemoScene {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        scene_distance(p)
    }
}

/// Finite-difference scheme used to recover surface normals from an SDF
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalEstimator {
    /// `f(p + e) - f(p - e)` per axis. Six evaluations, smooth shading.
    #[default]
    CentralDifference,
    /// `f(p + e) - f(p)` per axis. Four evaluations, visibly noisier on curved
    /// surfaces because the error is first order in `eps`.
    ForwardDifference,
}

impl NormalEstimator {
    /// Number of SDF evaluations one estimate costs
    pub fn evaluations(self) -> u32 {
        match self {
            Self::CentralDifference => 6,
            Self::ForwardDifference => 4,
        }
    }

    /// Estimate the unit surface normal of `sdf` at `p`
    #[inline]
    pub fn estimate<S: Sdf + ?Sized>(self, sdf: &S, p: Vec3, eps: f32) -> Vec3 {
        self.estimate_with(sdf, p, eps, InvSqrt::Exact)
    }

    /// Estimate the normal, normalizing with the given reciprocal square root
    #[inline]
    pub fn estimate_with<S: Sdf + ?Sized>(self, sdf: &S, p: Vec3, eps: f32, mode: InvSqrt) -> Vec3 {
        let ex = Vec3::new(eps, 0.0, 0.0);
        let ey = Vec3::new(0.0, eps, 0.0);
        let ez = Vec3::new(0.0, 0.0, eps);

        let gradient = match self {
            Self::CentralDifference => Vec3::new(
                sdf.distance(p + ex) - sdf.distance(p - ex),
                sdf.distance(p + ey) - sdf.distance(p - ey),
                sdf.distance(p + ez) - sdf.distance(p - ez),
            ),
            Self::ForwardDifference => {
                let d = sdf.distance(p);
                Vec3::new(
                    sdf.distance(p + ex) - d,
                    sdf.distance(p + ey) - d,
                    sdf.distance(p + ez) - d,
                )
            }
        };

        normalize_or_up_with(gradient, mode)
    }
}
