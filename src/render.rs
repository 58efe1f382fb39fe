//! Rendering contract
//!
//! The simulation never talks to a graphics API. Drawable types emit
//! primitives into a [`Canvas`]; a frontend implements the trait, or reads a
//! recorded [`DrawList`] from a snapshot.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Linear RGB color, components in 0..=1
pub type Color = [f32; 3];

pub const WALL_COLOR: Color = [0.8, 0.4, 0.2];
pub const GROUND_COLOR: Color = [0.5, 0.5, 0.5];
pub const HOLE_COLOR: Color = [0.05, 0.05, 0.05];
pub const AXIS_VELOCITY_COLOR: Color = [1.0, 0.0, 0.0];
pub const AXIS_FLOOR_COLOR: Color = [0.0, 1.0, 0.0];
pub const AXIS_ROLL_COLOR: Color = [0.0, 0.0, 1.0];

/// Debug visualization toggles passed to draw calls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Draw velocity, floor normal and rolling axis lines on every ball
    #[serde(default)]
    pub show_axis: bool,
}

/// Sink for world-space drawing primitives
pub trait Canvas {
    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Color);
    fn triangle(&mut self, corners: [Vec3; 3], normal: Vec3, color: Color);
    fn sphere(&mut self, center: Vec3, radius: f32, rotation: Quat, color: Color);
    fn line(&mut self, from: Vec3, to: Vec3, color: Color);
}

/// A single recorded primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Quad {
        corners: [Vec3; 4],
        normal: Vec3,
        color: Color,
    },
    Triangle {
        corners: [Vec3; 3],
        normal: Vec3,
        color: Color,
    },
    Sphere {
        center: Vec3,
        radius: f32,
        rotation: Quat,
        color: Color,
    },
    Line {
        from: Vec3,
        to: Vec3,
        color: Color,
    },
}

/// Canvas that records everything it is given
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    pub primitives: Vec<Primitive>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn spheres(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Sphere { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &Primitive> {
        self.primitives
            .iter()
            .filter(|p| matches!(p, Primitive::Line { .. }))
    }
}

impl Canvas for DrawList {
    fn quad(&mut self, corners: [Vec3; 4], normal: Vec3, color: Color) {
        self.primitives.push(Primitive::Quad {
            corners,
            normal,
            color,
        });
    }

    fn triangle(&mut self, corners: [Vec3; 3], normal: Vec3, color: Color) {
        self.primitives.push(Primitive::Triangle {
            corners,
            normal,
            color,
        });
    }

    fn sphere(&mut self, center: Vec3, radius: f32, rotation: Quat, color: Color) {
        self.primitives.push(Primitive::Sphere {
            center,
            radius,
            rotation,
            color,
        });
    }

    fn line(&mut self, from: Vec3, to: Vec3, color: Color) {
        self.primitives.push(Primitive::Line { from, to, color });
    }
}
