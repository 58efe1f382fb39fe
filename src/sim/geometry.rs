//! Plane and reflection helpers shared by the collision code
//!
//! Vectors are plain `glam::Vec3` values. Anything that normalizes goes
//! through `normalize_or_zero`, so zero-length input yields the zero vector.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Alignment below which a push-out along the reflected velocity is unreliable
const MIN_ALIGNMENT: f32 = 1e-3;

/// An infinite plane through `point` with unit `normal`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub normal: Vec3,
    pub point: Vec3,
}

impl Plane {
    pub fn new(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            point,
        }
    }

    /// Signed distance (positive on the normal's side)
    #[inline]
    pub fn signed_distance(&self, p: Vec3) -> f32 {
        (p - self.point).dot(self.normal)
    }

    /// Unsigned distance from `p` to the plane
    #[inline]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.signed_distance(p).abs()
    }

    /// Closest point on the plane to `p`
    #[inline]
    pub fn project(&self, p: Vec3) -> Vec3 {
        p - self.signed_distance(p) * self.normal
    }

    /// Reflect a vector across the plane's normal
    #[inline]
    pub fn bounce(&self, v: Vec3) -> Vec3 {
        reflect(v, self.normal)
    }
}

/// Reflect `v` across a unit axis: v' = v - 2(v·n)n
///
/// A zero axis leaves `v` unchanged.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Displacement that moves a sphere out of a contact
///
/// The sphere leaves along the reflected velocity, scaled so the component
/// along `contact_dir` equals `depth`. When the reflected velocity is zero or
/// nearly tangent to the contact, it leaves straight along `contact_dir`.
pub fn push_out(reflected: Vec3, contact_dir: Vec3, depth: f32) -> Vec3 {
    let dir = reflected.normalize_or_zero();
    let alignment = contact_dir.dot(dir);
    if alignment.abs() < MIN_ALIGNMENT {
        return contact_dir * depth;
    }
    dir * depth * (1.0 / alignment)
}

/// Unit normal of the triangle (a, b, c), zero if degenerate
#[inline]
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}
