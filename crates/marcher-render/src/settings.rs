//! Ray marching parameters
//!
//! The defaults are tuned for the demo scene. Other geometry (thin features,
//! larger extents) needs its own relaxation factor and step budget.

use marcher_core::{Error, NormalEstimator, Result};
use marcher_math::InvSqrt;
use serde::{Deserialize, Serialize};

/// Parameters for sphere tracing, normal estimation, and work splitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum sphere-tracing iterations per ray
    pub max_steps: u32,
    /// Distance below which a ray counts as a hit
    pub surface_epsilon: f32,
    /// Marched distance beyond which a ray counts as a miss
    pub max_distance: f32,
    /// Step multiplier; values above 1.0 converge faster but can step over
    /// thin features
    pub relaxation: f32,
    /// Offset used by the finite-difference normal estimate
    pub normal_epsilon: f32,
    /// Finite-difference scheme for normals
    pub normals: NormalEstimator,
    /// Reciprocal square root used when normalizing rays and normals
    pub inv_sqrt: InvSqrt,
    /// Rows handed to a worker as one task
    pub rows_per_task: usize,
    /// Worker threads; `None` uses rayon's global pool
    pub threads: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_steps: 48,
            surface_epsilon: 0.002,
            max_distance: 40.0,
            relaxation: 1.2,
            normal_epsilon: 0.001,
            normals: NormalEstimator::CentralDifference,
            inv_sqrt: InvSqrt::Exact,
            rows_per_task: 4,
            threads: None,
        }
    }
}

impl RenderSettings {
    /// Check that every parameter is usable
    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(invalid("max_steps must be at least 1"));
        }
        if !is_positive(self.surface_epsilon) {
            return Err(invalid("surface_epsilon must be positive"));
        }
        if !is_positive(self.max_distance) {
            return Err(invalid("max_distance must be positive"));
        }
        if !is_positive(self.relaxation) {
            return Err(invalid("relaxation must be positive"));
        }
        if !is_positive(self.normal_epsilon) {
            return Err(invalid("normal_epsilon must be positive"));
        }
        if self.rows_per_task == 0 {
            return Err(invalid("rows_per_task must be at least 1"));
        }
        if self.threads == Some(0) {
            return Err(invalid("threads must be at least 1"));
        }
        Ok(())
    }

    /// Use a dedicated pool of `threads` workers
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Choose the reciprocal square root strategy
    pub fn with_inv_sqrt(mut self, mode: InvSqrt) -> Self {
        self.inv_sqrt = mode;
        self
    }

    /// Choose the normal estimator
    pub fn with_normals(mut self, normals: NormalEstimator) -> Self {
        self.normals = normals;
        self
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}

fn invalid(msg: &str) -> Error {
    Error::InvalidParameter(msg.to_string())
}
