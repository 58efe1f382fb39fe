//! Per-participant state: one ball, stroke count and cumulative score

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::sphere::Sphere;
use crate::render::Color;

/// Ball colors handed out by player order
pub const PLAYER_COLORS: [Color; 4] = [
    [1.0, 1.0, 1.0],
    [1.0, 0.85, 0.2],
    [0.3, 0.6, 1.0],
    [1.0, 0.35, 0.35],
];

/// A player in the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub ball: Sphere,
    /// Strokes on the current hole
    pub strokes: u32,
    /// Sum of strokes over completed holes
    pub score: u32,
    pub finished_hole: bool,
    pub started_hole: bool,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ball: Sphere::default(),
            strokes: 0,
            score: 0,
            finished_hole: false,
            started_hole: false,
        }
    }

    pub fn with_ball(mut self, ball: Sphere) -> Self {
        self.ball = ball;
        self
    }

    /// Still eligible to act on this hole
    #[inline]
    pub fn in_game(&self) -> bool {
        !self.finished_hole
    }

    /// Start a new hole from `start`
    pub fn reset(&mut self, start: Vec3) {
        self.strokes = 0;
        self.finished_hole = false;
        self.started_hole = false;
        self.ball.place(start);
        self.ball.velocity = Vec3::ZERO;
        self.ball.floor_normal = Vec3::ZERO;
    }

    /// Start a new game session from `start`
    pub fn reset_all(&mut self, start: Vec3) {
        self.reset(start);
        self.score = 0;
    }
}
