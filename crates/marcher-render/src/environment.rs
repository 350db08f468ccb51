//! Lighting, material, and background settings for the CPU renderer

use glam::Vec3;
use marcher_math::normalize_or_up;
use serde::{Deserialize, Serialize};

/// Environment settings that control the appearance of the scene.
///
/// Colors are in 8-bit channel units (0-255) so the defaults read the same as
/// the values written into the pixel buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    // Lighting
    /// Directional light, pointing from the surface toward the light
    /// (normalized before use)
    pub light_direction: [f32; 3],
    /// Intensity floor applied to every lit surface
    pub ambient: f32,

    // Material
    /// Surface color at full intensity
    pub albedo: [f32; 3],

    // Background
    /// Background color at the bottom edge of the image
    pub background_bottom: [f32; 3],
    /// Background color at the top edge of the image
    pub background_top: [f32; 3],
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            // normalize(0.5, 0.8, 0.3)
            light_direction: [0.50508, 0.80812, 0.30305],
            ambient: 0.15,

            // Warm terracotta
            albedo: [220.0, 120.0, 80.0],

            // Dark blue gradient
            background_bottom: [25.0, 25.0, 40.0],
            background_top: [40.0, 45.0, 70.0],
        }
    }
}

/// Environment resolved for one frame: normalized light, precomputed ramps
#[derive(Debug, Clone, Copy)]
pub(crate) struct Lighting {
    light: Vec3,
    ambient: f32,
    albedo: Vec3,
    bottom: Vec3,
    ramp: Vec3,
}

impl From<&Environment> for Lighting {
    fn from(env: &Environment) -> Self {
        let bottom = Vec3::from_array(env.background_bottom);
        Self {
            light: normalize_or_up(Vec3::from_array(env.light_direction)),
            ambient: env.ambient,
            albedo: Vec3::from_array(env.albedo),
            bottom,
            ramp: Vec3::from_array(env.background_top) - bottom,
        }
    }
}

impl Lighting {
    /// Lambert shade for a surface with unit `normal`
    #[inline]
    pub(crate) fn surface(&self, normal: Vec3) -> [u8; 4] {
        let diffuse = normal.dot(self.light).max(0.0);
        let intensity = self.ambient + diffuse * (1.0 - self.ambient);
        to_rgba(self.albedo * intensity)
    }

    /// Background gradient at vertical screen coordinate `v` in [-1, 1]
    #[inline]
    pub(crate) fn background(&self, v: f32) -> [u8; 4] {
        let t = (v + 1.0) * 0.5;
        to_rgba(self.bottom + self.ramp * t)
    }
}

/// Truncate channel values to bytes; alpha is always opaque
#[inline]
fn to_rgba(c: Vec3) -> [u8; 4] {
    // `as u8` saturates, and maps NaN to 0
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_gradient_endpoints() {
        let lighting = Lighting::from(&Environment::default());
        assert_eq!(lighting.background(-1.0), [25, 25, 40, 255]);
        assert_eq!(lighting.background(1.0), [40, 45, 70, 255]);
        assert_eq!(lighting.background(0.0), [32, 35, 55, 255]);
    }

    #[test]
    fn surface_facing_away_gets_ambient_only() {
        let lighting = Lighting::from(&Environment::default());
        let back = -Vec3::new(0.50508, 0.80812, 0.30305);
        // 220 * 0.15 = 33, 120 * 0.15 = 18, 80 * 0.15 = 12
        assert_eq!(lighting.surface(back), [33, 18, 12, 255]);
    }

    #[test]
    fn surface_facing_light_is_full_albedo() {
        let lighting = Lighting::from(&Environment::default());
        let [r, g, b, a] = lighting.surface(normalize_or_up(Vec3::new(0.5, 0.8, 0.3)));
        assert!(r >= 219 && g >= 119 && b >= 79);
        assert_eq!(a, 255);
    }

    #[test]
    fn zero_light_direction_falls_back_to_up() {
        let env = Environment {
            light_direction: [0.0, 0.0, 0.0],
            ..Default::default()
        };
        let lighting = Lighting::from(&env);
        assert!(lighting.surface(Vec3::Y)[0] >= 219);
    }
}
