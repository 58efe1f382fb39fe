//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by player index, then scene child order)
//! - No rendering backend or platform dependencies

pub mod course;
pub mod courses;
pub mod game;
pub mod geometry;
pub mod player;
pub mod scene;
pub mod scoring;
pub mod sphere;
pub mod tick;
pub mod wall;

pub use course::{Course, HoleCompletion};
pub use courses::{CourseBuilder, default_catalog};
pub use game::{Game, GameEvent, MAX_PENDING_EVENTS, PlayerView, ShotState, Snapshot};
pub use geometry::{Plane, reflect};
pub use player::{PLAYER_COLORS, Player};
pub use scene::{FloorContact, NodeKind, Oscillation, SceneNode};
pub use scoring::{GameSummary, ScoreTerm, Standing};
pub use sphere::Sphere;
pub use tick::{TickInput, step};
pub use wall::{ContactKind, GroundTile, Wall, WallBox, WallContact};
