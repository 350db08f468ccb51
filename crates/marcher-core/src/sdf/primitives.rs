//! SDF primitive shapes
//!
//! Each primitive carries its own placement so the demo scene can be written
//! down without a transform layer.

use super::Sdf;
use glam::Vec3;

// ============================================================================
// Distance functions
// ============================================================================

/// Distance from `p` to a sphere
#[inline]
pub fn sphere_distance(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// Distance from `p` to an axis-aligned box.
///
/// Outside term: length of the positive part of `|p - c| - h`.
/// Inside term: the largest (least negative) component, clamped to `<= 0`.
#[inline]
pub fn box_distance(p: Vec3, center: Vec3, half_extents: Vec3) -> f32 {
    let q = (p - center).abs() - half_extents;
    q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Distance from `p` to the horizontal plane `y = height`
#[inline]
pub fn plane_distance(p: Vec3, height: f32) -> f32 {
    p.y - height
}

// ============================================================================
// Primitive Structs
// ============================================================================

/// Sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}

impl Sdf for Sphere {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        sphere_distance(p, self.center, self.radius)
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Box3 {
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            center,
            half_extents,
        }
    }
}

impl Sdf for Box3 {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        box_distance(p, self.center, self.half_extents)
    }
}

/// Infinite horizontal ground plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub height: f32,
}

impl Plane {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl Sdf for Plane {
    #[inline]
    fn distance(&self, p: Vec3) -> f32 {
        plane_distance(p, self.height)
    }
}
