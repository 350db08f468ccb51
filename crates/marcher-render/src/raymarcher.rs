//! CPU sphere-tracing renderer for SDFs
//!
//! Every pixel is independent: a ray leaves the camera, steps along the field
//! until it lands on a surface or gives up, and the result is shaded in place.
//! Rows are split into chunks and spread over a rayon pool; each chunk owns a
//! disjoint slice of the output, so no synchronization happens between tasks.

use crate::camera::{CameraBasis, CameraPose};
use crate::environment::{Environment, Lighting};
use crate::settings::RenderSettings;
use glam::Vec3;
use marcher_core::buffer::BYTES_PER_PIXEL;
use marcher_core::sdf::Sdf;
use marcher_core::{DemoScene, PixelView, Result};
use rayon::prelude::*;
use std::ops::AddAssign;
use std::path::Path;

/// Outcome of tracing a single ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarchResult {
    /// Whether the ray reached a surface
    pub hit: bool,
    /// Distance marched along the ray
    pub distance: f32,
    /// Field evaluations spent
    pub steps: u32,
    /// Last sampled point (the hit point when `hit` is true)
    pub point: Vec3,
}

/// Sphere-trace `scene` from `origin` along unit direction `dir`.
///
/// Each step advances by the field value times `settings.relaxation`. The ray
/// hits when the field drops below `surface_epsilon` and misses once it has
/// travelled past `max_distance` or used up `max_steps`.
#[inline]
pub fn march<S: Sdf + ?Sized>(
    scene: &S,
    origin: Vec3,
    dir: Vec3,
    settings: &RenderSettings,
) -> MarchResult {
    let mut depth = 0.0;
    let mut point = origin;

    for step in 1..=settings.max_steps {
        point = origin + dir * depth;
        let dist = scene.distance(point);

        if dist < settings.surface_epsilon {
            return MarchResult {
                hit: true,
                distance: depth,
                steps: step,
                point,
            };
        }

        depth += dist * settings.relaxation;
        if depth > settings.max_distance {
            return MarchResult {
                hit: false,
                distance: depth,
                steps: step,
                point,
            };
        }
    }

    MarchResult {
        hit: false,
        distance: depth,
        steps: settings.max_steps,
        point,
    }
}

/// Per-frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Pixels written
    pub pixels: u64,
    /// Pixels whose ray reached a surface
    pub hits: u64,
    /// Field evaluations spent marching
    pub march_steps: u64,
    /// Field evaluations spent estimating normals at hits
    pub normal_evaluations: u64,
}

impl FrameStats {
    /// Fraction of pixels that hit geometry
    pub fn hit_ratio(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.hits as f64 / self.pixels as f64
        }
    }

    /// Average march steps per pixel
    pub fn mean_steps(&self) -> f64 {
        if self.pixels == 0 {
            0.0
        } else {
            self.march_steps as f64 / self.pixels as f64
        }
    }

    /// Every scene evaluation of the frame, marching and normals together
    pub fn field_evaluations(&self) -> u64 {
        self.march_steps + self.normal_evaluations
    }
}

impl AddAssign for FrameStats {
    fn add_assign(&mut self, other: Self) {
        self.pixels += other.pixels;
        self.hits += other.hits;
        self.march_steps += other.march_steps;
        self.normal_evaluations += other.normal_evaluations;
    }
}

/// Everything a row task needs, computed once per frame
struct Frame {
    width: usize,
    height: usize,
    stride: usize,
    aspect: f32,
    inv_width: f32,
    inv_height: f32,
    origin: Vec3,
    basis: CameraBasis,
    lighting: Lighting,
}

/// CPU ray marcher over a scene
pub struct Renderer<S: Sdf = DemoScene> {
    scene: S,
    settings: RenderSettings,
    environment: Environment,
    pool: Option<rayon::ThreadPool>,
}

impl Renderer<DemoScene> {
    /// Create a renderer for the demo scene
    pub fn new(settings: RenderSettings) -> Result<Self> {
        Self::with_scene(DemoScene, settings, Environment::default())
    }
}

impl<S: Sdf> Renderer<S> {
    /// Create a renderer for an arbitrary scene and environment
    pub fn with_scene(scene: S, settings: RenderSettings, environment: Environment) -> Result<Self> {
        settings.validate()?;

        let pool = match settings.threads {
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("marcher-worker-{i}"))
                    .build()
                    .map_err(|e| marcher_core::Error::InvalidParameter(e.to_string()))?,
            ),
            None => None,
        };

        Ok(Self {
            scene,
            settings,
            environment,
            pool,
        })
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Update environment settings
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Render a frame into `view`, overwriting every pixel.
    ///
    /// Blocks until all rows are written. Bytes past `width * 4` in each row
    /// are left untouched.
    pub fn render(&self, view: &mut PixelView<'_>, pose: &CameraPose) -> FrameStats {
        let frame = Frame {
            width: view.width(),
            height: view.height(),
            stride: view.stride(),
            aspect: view.aspect(),
            inv_width: 1.0 / view.width() as f32,
            inv_height: 1.0 / view.height() as f32,
            origin: pose.position,
            basis: pose.basis(),
            lighting: Lighting::from(&self.environment),
        };

        let rows = view.rows_mut();
        let stats = match &self.pool {
            Some(pool) => pool.install(|| self.dispatch(rows, &frame)),
            None => self.dispatch(rows, &frame),
        };

        tracing::debug!(
            "Rendered {}x{} frame: {} hits, {:.1} steps/pixel",
            frame.width,
            frame.height,
            stats.hits,
            stats.mean_steps()
        );

        stats
    }

    /// Render into a freshly allocated image
    pub fn render_image(&self, width: u32, height: u32, pose: &CameraPose) -> Result<image::RgbaImage> {
        let mut img = image::RgbaImage::new(width, height);
        {
            let mut view = PixelView::from_image(&mut img)?;
            self.render(&mut view, pose);
        }
        Ok(img)
    }

    /// Render a frame and write it to `path`; the format follows the extension
    pub fn render_to_file(
        &self,
        path: &Path,
        width: u32,
        height: u32,
        pose: &CameraPose,
    ) -> Result<FrameStats> {
        let mut img = image::RgbaImage::new(width, height);
        let stats = {
            let mut view = PixelView::from_image(&mut img)?;
            self.render(&mut view, pose)
        };

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        img.save(path)?;
        Ok(stats)
    }

    /// Split `rows` into tasks of `rows_per_task` rows and shade them in parallel
    fn dispatch(&self, rows: &mut [u8], frame: &Frame) -> FrameStats {
        let rows_per_task = self.settings.rows_per_task;
        // Oversized chunks just mean one task for the whole frame
        let chunk = frame.stride.saturating_mul(rows_per_task);

        rows.par_chunks_mut(chunk)
            .enumerate()
            .map(|(task, bytes)| {
                let mut stats = FrameStats::default();
                for (i, row) in bytes.chunks_mut(frame.stride).enumerate() {
                    stats += self.shade_row(row, task * rows_per_task + i, frame);
                }
                stats
            })
            .reduce(FrameStats::default, |mut a, b| {
                a += b;
                a
            })
    }

    /// Trace and shade one row. `row` starts at the row's first byte.
    fn shade_row(&self, row: &mut [u8], py: usize, frame: &Frame) -> FrameStats {
        let settings = &self.settings;
        let mode = settings.inv_sqrt;

        let v = 1.0 - py as f32 * frame.inv_height * 2.0;
        let (ry, rz) = frame.basis.pitch_row(v);

        let mut stats = FrameStats::default();
        let pixels = row[..frame.width * BYTES_PER_PIXEL].chunks_exact_mut(BYTES_PER_PIXEL);

        for (px, out) in pixels.enumerate() {
            let u = (px as f32 * frame.inv_width * 2.0 - 1.0) * frame.aspect;
            let dir = frame.basis.yaw_ray(u, ry, rz, mode);

            let result = march(&self.scene, frame.origin, dir, settings);

            let rgba = if result.hit {
                stats.hits += 1;
                stats.normal_evaluations += u64::from(settings.normals.evaluations());
                let normal = settings.normals.estimate_with(
                    &self.scene,
                    result.point,
                    settings.normal_epsilon,
                    mode,
                );
                frame.lighting.surface(normal)
            } else {
                frame.lighting.background(v)
            };

            out.copy_from_slice(&rgba);
            stats.march_steps += u64::from(result.steps);
        }

        stats.pixels = frame.width as u64;
        stats
    }
}

/// Render the demo scene into `view` with default settings on the global pool
pub fn render(view: &mut PixelView<'_>, pose: &CameraPose) {
    // Default settings always validate and never build a private pool
    let renderer = Renderer {
        scene: DemoScene,
        settings: RenderSettings::default(),
        environment: Environment::default(),
        pool: None,
    };
    renderer.render(view, pose);
}

/// Flat entry point for hosts that hand over a raw buffer.
///
/// Renders the demo scene into `buffer`, a `width` x `height` RGBA8 image with
/// rows `stride` bytes apart, from a camera at `(x, y, z)` with the given yaw
/// and pitch. Invalid dimensions, a short stride, or a short buffer make this
/// a no-op: the buffer is left untouched.
pub fn render_raw(
    buffer: &mut [u8],
    width: i32,
    height: i32,
    stride: usize,
    x: f32,
    y: f32,
    z: f32,
    yaw: f32,
    pitch: f32,
) {
    let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
        tracing::debug!("Skipping render: invalid dimensions {}x{}", width, height);
        return;
    };

    match PixelView::new(buffer, w, h, stride) {
        Ok(mut view) => render(&mut view, &CameraPose::new(Vec3::new(x, y, z), yaw, pitch)),
        Err(e) => tracing::debug!("Skipping render: {}", e),
    }
}
