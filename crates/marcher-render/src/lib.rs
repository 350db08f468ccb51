//! Marcher Render - CPU sphere-tracing renderer
//!
//! This crate turns a camera pose into a shaded RGBA frame by marching one ray
//! per pixel through a signed distance field.
//!
//! ## Features
//!
//! - Sphere tracing with over-relaxation
//! - Central or forward difference normals
//! - Lambert shading with an ambient floor, gradient background on miss
//! - Row-parallel dispatch on rayon, bit-identical for any thread count
//! - Renders into caller-owned buffers with arbitrary row stride
//!
//! ## Example
//!
//! ```rust
//! use marcher_render::{CameraPose, Renderer, RenderSettings};
//!
//! let renderer = Renderer::new(RenderSettings::default())?;
//! let img = renderer.render_image(64, 48, &CameraPose::default())?;
//! assert_eq!(img.dimensions(), (64, 48));
//! # Ok::<(), marcher_core::Error>(())
//! ```

pub mod camera;
pub mod environment;
pub mod raymarcher;
pub mod settings;

pub use camera::{CameraBasis, CameraPose};
pub use environment::Environment;
pub use raymarcher::{FrameStats, MarchResult, Renderer, march, render, render_raw};
pub use settings::RenderSettings;

// Re-export core types callers need to drive a render
pub use marcher_core::{DemoScene, NormalEstimator, PixelView};
pub use marcher_math::InvSqrt;
