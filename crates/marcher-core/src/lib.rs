//! # Marcher Core
//!
//! Scene evaluation for the Marcher CPU ray marcher.
//!
//! The renderer asks one question of the world: how far is point `p` from the
//! nearest surface? This crate answers it with Signed Distance Functions and
//! provides the buffer view the renderer writes shaded pixels into.
//!
//! ## Quick Start
//!
//! ```rust
//! use marcher_core::prelude::*;
//!
//! // Inside the unit sphere at the origin
//! assert!(scene_distance(Vec3::new(0.0, 0.0, 0.2)) < 0.0);
//!
//! // Surface normal on top of the sphere points up
//! let n = NormalEstimator::default().estimate(&DemoScene, Vec3::new(0.0, 1.0, 0.0), 0.001);
//! assert!(n.y > 0.99);
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: Arbitrary world units
//! - **Precision**: `f32` throughout
//! - **Coordinate system**: Right-handed, Y-up, camera looks down -Z at zero yaw

pub mod buffer;
pub mod scene;
pub mod sdf;

mod error;

pub use buffer::PixelView;
pub use error::{Error, Result};
pub use scene::{DemoScene, NormalEstimator, scene_distance};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::sdf::{
        Sdf, SdfExt, box_distance, plane_distance, primitives::*, smooth_min,
        sphere_distance,
    };

    pub use crate::scene::{DemoScene, NormalEstimator, scene_distance};

    pub use crate::buffer::PixelView;

    pub use marcher_math::{InvSqrt, Vec3, normalize_or_up};

    pub use crate::{Error, Result};
}
