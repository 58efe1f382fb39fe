//! Spheres: rolling balls with derived mass
//!
//! Movement goes through [`Sphere::move_by`] so the visual orientation
//! follows rolling-without-slipping on the current floor.

use std::f32::consts::PI;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::render::{
    AXIS_FLOOR_COLOR, AXIS_ROLL_COLOR, AXIS_VELOCITY_COLOR, Canvas, Color, DebugConfig,
};

/// Below this squared length the floor normal counts as "no floor"
const NO_FLOOR_EPSILON: f32 = 0.01;
/// Below this squared length the rolling axis is degenerate
const DEGENERATE_AXIS_EPSILON: f32 = 1e-5;

/// A ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub position: Vec3,
    pub velocity: Vec3,
    radius: f32,
    density: f32,
    /// Accumulated rolling orientation
    pub rotation: Quat,
    /// Normal of the floor the ball rests on (zero when airborne)
    pub floor_normal: Vec3,
    pub color: Color,
}

impl Default for Sphere {
    fn default() -> Self {
        Self::new(Vec3::ZERO, BALL_RADIUS)
    }
}

impl Sphere {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius: radius.max(MIN_RADIUS),
            density: BALL_DENSITY,
            rotation: Quat::IDENTITY,
            floor_normal: Vec3::ZERO,
            color: [1.0, 1.0, 1.0],
        }
    }

    pub fn with_density(mut self, density: f32) -> Self {
        self.density = density;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius.max(MIN_RADIUS);
    }

    #[inline]
    pub fn density(&self) -> f32 {
        self.density
    }

    /// Mass of a solid ball: 4/3·π·r³·density
    #[inline]
    pub fn mass(&self) -> f32 {
        4.0 / 3.0 * PI * self.radius.powi(3) * self.density
    }

    /// Translate by `displacement`, rolling on the current floor
    pub fn move_by(&mut self, displacement: Vec3) {
        if displacement.length_squared() == 0.0 {
            return;
        }
        if self.floor_normal.length_squared() < NO_FLOOR_EPSILON {
            self.position += displacement;
            return;
        }

        let axis = displacement.normalize().cross(self.floor_normal);
        if axis.length_squared() < DEGENERATE_AXIS_EPSILON {
            self.position += displacement;
            return;
        }
        let axis = axis.normalize();

        // Arc length over circumference, in degrees
        let angle = -360.0 * displacement.length() / (2.0 * PI * self.radius);
        let roll = Quat::from_axis_angle(axis, angle.to_radians());
        self.rotation = (roll * self.rotation).normalize();
        self.position += displacement;
    }

    /// Roll to `target`
    pub fn move_to(&mut self, target: Vec3) {
        self.move_by(target - self.position);
    }

    /// Teleport without rolling
    pub fn place(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Elastic bounce against another ball, then separate the two
    pub fn bounce(&mut self, other: &mut Sphere) {
        let m1 = self.mass();
        let m2 = other.mass();
        let total = m1 + m2;
        let v1 = self.velocity;
        let v2 = other.velocity;

        // Coincident centers: pick +X as the line of centers
        let axis = match (self.position - other.position).try_normalize() {
            Some(axis) => axis,
            None => Vec3::X,
        };

        // p1 - coll and p2 - coll both lie on the line of centers, so
        // (x·d)/|d|²·d collapses to (x·axis)·axis
        let v1f = v1 - 2.0 * m2 / total * (v1 - v2).dot(axis) * axis;
        let v2f = v2 - 2.0 * m1 / total * (v2 - v1).dot(axis) * axis;
        self.velocity = v1f;
        other.velocity = v2f;

        let target = (self.radius + other.radius) * SEPARATION_FACTOR;
        let current = self.position.distance(other.position);
        let correction = axis * (target - current) * 0.5;
        self.move_by(correction);
        other.move_by(-correction);
    }

    /// Whether this ball overlaps another
    #[inline]
    pub fn overlaps(&self, other: &Sphere) -> bool {
        self.position.distance(other.position) < self.radius + other.radius
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, debug: &DebugConfig) {
        canvas.sphere(self.position, self.radius, self.rotation, self.color);

        if debug.show_axis {
            let reach = self.radius * 2.0;
            let velocity = self.velocity.normalize_or_zero() * reach;
            let floor = self.floor_normal.normalize_or_zero() * reach;
            let roll_axis = self.floor_normal.cross(self.velocity).normalize_or_zero() * reach;
            canvas.line(self.position, self.position + velocity, AXIS_VELOCITY_COLOR);
            canvas.line(self.position, self.position + floor, AXIS_FLOOR_COLOR);
            canvas.line(self.position, self.position + roll_axis, AXIS_ROLL_COLOR);
        }
    }
}
