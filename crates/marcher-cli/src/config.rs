//! TOML configuration for the command-line renderer

use anyhow::{Context, Result};
use marcher_render::{Environment, RenderSettings};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings file contents. Missing tables and keys fall back to defaults.
///
/// ```toml
/// [render]
/// max_steps = 64
/// normals = "forward_difference"
///
/// [environment]
/// albedo = [200.0, 200.0, 210.0]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderSettings,
    pub environment: Environment,
}

impl Config {
    /// Load from `path`, or defaults when no file was given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse TOML text
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.render.validate()?;
        Ok(config)
    }
}
