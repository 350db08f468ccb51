//! Yaw/pitch camera for the renderer

use glam::Vec3;
use marcher_math::{InvSqrt, normalize_or_up_with};
use std::f32::consts::FRAC_PI_2;

/// Pitch is kept this far away from straight up/down
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Camera position and orientation for one frame.
///
/// At zero yaw and pitch the camera looks down -Z with +Y up. Positive yaw
/// turns left (counter-clockwise seen from above), positive pitch looks up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Vec3,
    /// Rotation around the vertical axis, in radians
    pub yaw: f32,
    /// Rotation around the horizontal axis, in radians
    pub pitch: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }

    /// Place the camera on a circle around `target` and aim it at the target.
    ///
    /// - `distance`: horizontal distance from the target
    /// - `height`: elevation above the target
    /// - `angle`: position on the circle; 0 puts the camera on +Z
    pub fn orbit(target: Vec3, distance: f32, height: f32, angle: f32) -> Self {
        let position = target + Vec3::new(distance * angle.sin(), height, distance * angle.cos());
        Self {
            position,
            yaw: angle,
            pitch: (-height).atan2(distance).clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }

    /// Turn the camera (mouse look). Pitch is clamped short of vertical.
    pub fn turn(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Direction through the center of the image
    pub fn forward(&self) -> Vec3 {
        self.basis().ray_direction(0.0, 0.0, InvSqrt::Exact)
    }

    /// Precompute the trigonometry shared by every ray of a frame
    pub fn basis(&self) -> CameraBasis {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        CameraBasis {
            sin_yaw,
            cos_yaw,
            sin_pitch,
            cos_pitch,
        }
    }
}

/// Sines and cosines of a pose's yaw and pitch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    sin_yaw: f32,
    cos_yaw: f32,
    sin_pitch: f32,
    cos_pitch: f32,
}

impl CameraBasis {
    /// Unit ray direction for screen coordinates `u` (right) and `v` (up)
    #[inline]
    pub fn ray_direction(&self, u: f32, v: f32, mode: InvSqrt) -> Vec3 {
        let (ry, rz) = self.pitch_row(v);
        self.yaw_ray(u, ry, rz, mode)
    }

    /// Pitch rotation of `(_, v, -1)`; constant along a row
    #[inline]
    pub(crate) fn pitch_row(&self, v: f32) -> (f32, f32) {
        (
            v * self.cos_pitch + self.sin_pitch,
            v * self.sin_pitch - self.cos_pitch,
        )
    }

    /// Yaw rotation of `(u, ry, rz)`, then normalize
    #[inline]
    pub(crate) fn yaw_ray(&self, u: f32, ry: f32, rz: f32, mode: InvSqrt) -> Vec3 {
        normalize_or_up_with(
            Vec3::new(
                u * self.cos_yaw + rz * self.sin_yaw,
                ry,
                -u * self.sin_yaw + rz * self.cos_yaw,
            ),
            mode,
        )
    }
}
