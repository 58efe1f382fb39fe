//! Minigolf - a turn-based rolling-ball simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, turn state machine)
//! - `render`: Rendering contract (canvas trait, recorded draw lists)
//! - `runner`: Fixed-rate simulation thread with a shared snapshot
//! - `settings`: Data-driven physics and rule tuning
//! - `autoplay`: Scripted input collaborator for headless sessions

pub mod autoplay;
pub mod render;
pub mod runner;
pub mod settings;
pub mod sim;

pub use autoplay::AutoPlayer;
pub use render::{Canvas, DebugConfig, DrawList};
pub use runner::SimulationHandle;
pub use settings::{PhysicsSettings, RuleSettings, Settings, SettingsError};

/// Simulation configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Height of walls raised from ground coordinates
    pub const WALL_HEIGHT: f32 = 2.0;
    /// Extra push-out distance after a wall contact so the next step doesn't re-penetrate
    pub const COLLISION_EPSILON: f32 = 0.001;
    /// Tolerance for the edge segment and face plane tests
    pub const CONTACT_TOLERANCE: f32 = 0.01;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.2;
    pub const BALL_DENSITY: f32 = 1.0;
    /// Smallest radius a sphere may have
    pub const MIN_RADIUS: f32 = 1e-4;

    /// Balls end up this factor apart (relative to summed radii) after a bounce
    pub const SEPARATION_FACTOR: f32 = 1.001;

    /// Where sunk balls are parked
    pub const OFF_SCENE: Vec3 = Vec3::new(1.0e4, 1.0e4, 1.0e4);
}
