//! Marcher CLI - render the demo SDF scene from the command line

mod config;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::Config;
use glam::Vec3;
use marcher_render::{
    CameraPose, FrameStats, InvSqrt, NormalEstimator, PixelView, RenderSettings, Renderer,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(name = "marcher")]
#[command(about = "CPU sphere tracing of a signed distance field scene", long_about = None)]
#[command(version)]
struct Cli {
    /// TOML file with [render] and [environment] tables
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render one frame to an image file
    Render {
        /// Output image file (.png)
        #[arg(short, long, default_value = "render.png")]
        output: PathBuf,

        /// Camera position as x,y,z
        #[arg(long, default_value = "0,0,5", value_parser = parse_vec3, allow_hyphen_values = true)]
        position: Vec3,

        /// Camera yaw in radians
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        yaw: f32,

        /// Camera pitch in radians
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        pitch: f32,

        #[command(flatten)]
        frame: FrameArgs,
    },

    /// Orbit the camera around the scene and write one image per frame
    Turntable {
        /// Directory for the numbered frames
        #[arg(short, long, default_value = "turntable")]
        output_dir: PathBuf,

        /// Number of frames in a full turn
        #[arg(short = 'n', long, default_value = "36")]
        frames: u32,

        /// Horizontal distance from the orbit center
        #[arg(long, default_value = "6")]
        radius: f32,

        /// Camera height above the orbit center
        #[arg(long, default_value = "1.5", allow_negative_numbers = true)]
        elevation: f32,

        /// Point the camera orbits and looks at, as x,y,z
        #[arg(long, default_value = "1,0,0", value_parser = parse_vec3, allow_hyphen_values = true)]
        target: Vec3,

        #[command(flatten)]
        frame: FrameArgs,
    },

    /// Render frames in memory and report timing
    Bench {
        /// Frames to time
        #[arg(short = 'n', long, default_value = "60")]
        frames: u32,

        /// Untimed frames rendered first
        #[arg(long, default_value = "3")]
        warmup: u32,

        #[command(flatten)]
        frame: FrameArgs,
    },
}

/// Options shared by every subcommand that renders
#[derive(Args)]
struct FrameArgs {
    /// Image width
    #[arg(long, default_value = "800")]
    width: u32,

    /// Image height
    #[arg(long, default_value = "600")]
    height: u32,

    /// Worker threads (defaults to the config file, then all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Use the bit-trick reciprocal square root
    #[arg(long)]
    fast_inv_sqrt: bool,

    /// Use forward-difference normals (4 field evaluations instead of 6)
    #[arg(long)]
    forward_normals: bool,
}

impl FrameArgs {
    /// Apply command-line overrides on top of the loaded settings
    fn settings(&self, mut settings: RenderSettings) -> RenderSettings {
        if let Some(threads) = self.threads {
            settings = settings.with_threads(threads);
        }
        if self.fast_inv_sqrt {
            settings = settings.with_inv_sqrt(InvSqrt::Fast);
        }
        if self.forward_normals {
            settings = settings.with_normals(NormalEstimator::ForwardDifference);
        }
        settings
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            output,
            position,
            yaw,
            pitch,
            frame,
        } => {
            let pose = CameraPose::new(position, yaw, pitch);
            run_render(&config, &frame, &output, &pose)?;
        }
        Commands::Turntable {
            output_dir,
            frames,
            radius,
            elevation,
            target,
            frame,
        } => {
            run_turntable(&config, &frame, &output_dir, frames, radius, elevation, target)?;
        }
        Commands::Bench {
            frames,
            warmup,
            frame,
        } => {
            run_bench(&config, &frame, frames, warmup)?;
        }
    }

    Ok(())
}

fn build_renderer(config: &Config, frame: &FrameArgs) -> Result<Renderer> {
    let mut renderer = Renderer::new(frame.settings(config.render.clone()))
        .context("Invalid render settings")?;
    renderer.set_environment(config.environment.clone());
    Ok(renderer)
}

fn run_render(config: &Config, frame: &FrameArgs, output: &Path, pose: &CameraPose) -> Result<()> {
    let renderer = build_renderer(config, frame)?;

    tracing::info!(
        "Rendering {}x{} to {}",
        frame.width,
        frame.height,
        output.display()
    );

    let start = Instant::now();
    let stats = renderer
        .render_to_file(output, frame.width, frame.height, pose)
        .with_context(|| format!("Failed to render {}", output.display()))?;

    log_stats(&stats, start.elapsed().as_secs_f64());
    tracing::info!("Saved to: {}", output.display());
    Ok(())
}

fn run_turntable(
    config: &Config,
    frame: &FrameArgs,
    output_dir: &Path,
    frames: u32,
    radius: f32,
    elevation: f32,
    target: Vec3,
) -> Result<()> {
    anyhow::ensure!(frames > 0, "frames must be at least 1");
    let renderer = build_renderer(config, frame)?;

    tracing::info!(
        "Rendering {} turntable frames ({}x{}) into {}",
        frames,
        frame.width,
        frame.height,
        output_dir.display()
    );

    let start = Instant::now();
    let mut total = FrameStats::default();

    for i in 0..frames {
        let angle = std::f32::consts::TAU * i as f32 / frames as f32;
        let pose = CameraPose::orbit(target, radius, elevation, angle);
        let path = output_dir.join(format!("frame_{i:04}.png"));

        total += renderer
            .render_to_file(&path, frame.width, frame.height, &pose)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        tracing::debug!("Wrote {}", path.display());
    }

    let seconds = start.elapsed().as_secs_f64();
    tracing::info!(
        "Done in {:.2}s ({:.1} ms/frame), hit ratio {:.1}%",
        seconds,
        seconds * 1000.0 / f64::from(frames),
        total.hit_ratio() * 100.0
    );
    Ok(())
}

fn run_bench(config: &Config, frame: &FrameArgs, frames: u32, warmup: u32) -> Result<()> {
    anyhow::ensure!(frames > 0, "frames must be at least 1");
    let renderer = build_renderer(config, frame)?;

    let (width, height) = (frame.width as usize, frame.height as usize);
    let mut buffer = vec![0u8; width * height * 4];
    let mut view = PixelView::packed(&mut buffer, width, height)?;

    tracing::info!(
        "Benchmarking {}x{}, {} frames, threads: {}, inv sqrt: {:?}, normals: {:?}",
        width,
        height,
        frames,
        renderer
            .settings()
            .threads
            .map_or_else(|| format!("{} (global)", available_threads()), |t| t.to_string()),
        renderer.settings().inv_sqrt,
        renderer.settings().normals
    );

    // Turn slowly like the interactive viewer so frames do not repeat exactly
    let mut pose = CameraPose::default();
    for _ in 0..warmup {
        pose.turn(0.01, 0.0);
        renderer.render(&mut view, &pose);
    }

    let mut total = FrameStats::default();
    let start = Instant::now();
    for _ in 0..frames {
        pose.turn(0.01, 0.0);
        total += renderer.render(&mut view, &pose);
    }
    let seconds = start.elapsed().as_secs_f64();

    let ms_per_frame = seconds * 1000.0 / f64::from(frames);
    tracing::info!(
        "{:.2} ms/frame, {:.1} fps",
        ms_per_frame,
        f64::from(frames) / seconds
    );
    tracing::info!(
        "Hit ratio {:.1}%, {:.1} march steps/pixel, {:.1} field evaluations/pixel",
        total.hit_ratio() * 100.0,
        total.mean_steps(),
        total.field_evaluations() as f64 / total.pixels.max(1) as f64
    );
    Ok(())
}

fn log_stats(stats: &FrameStats, seconds: f64) {
    tracing::info!(
        "Rendered {} pixels in {:.1} ms: hit ratio {:.1}%, {:.1} march steps/pixel",
        stats.pixels,
        seconds * 1000.0,
        stats.hit_ratio() * 100.0,
        stats.mean_steps()
    );
}

fn available_threads() -> usize {
    std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
}

/// Parse "x,y,z" into a vector
fn parse_vec3(s: &str) -> std::result::Result<Vec3, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in '{s}': {e}"))?;

    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected x,y,z but got '{s}'")),
    }
}
