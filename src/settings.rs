//! Simulation settings
//!
//! Physics tuning, turn rules and debug toggles. Persisted as JSON; missing
//! fields fall back to defaults so partial files work.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::SIM_DT;
use crate::render::DebugConfig;

/// Errors from loading or saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Physics tuning for the driving loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Gravitational acceleration (units/s²)
    pub gravity: f32,
    /// Tilt of gravity away from -Y about the Z axis, in degrees
    pub gravity_direction_deg: f32,
    /// Multiplier applied to every timestep
    pub time_scale: f32,
    /// Fraction of speed lost per second while on a floor
    pub rolling_resistance: f32,
    /// How far below the floor surface still counts as touching it
    pub floor_snap: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            gravity: 9.81,
            gravity_direction_deg: 0.0,
            time_scale: 1.0,
            rolling_resistance: 0.8,
            floor_snap: 0.01,
        }
    }
}

impl PhysicsSettings {
    /// Wall-clock seconds per tick
    pub fn delta_time(&self) -> f32 {
        if self.tick_rate == 0 {
            SIM_DT
        } else {
            1.0 / self.tick_rate as f32
        }
    }
}

/// Turn state machine thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    /// Consecutive still ticks after which the ball counts as stopped
    pub stall_ticks: u32,
    /// Per-tick displacement below which the ball counts as still
    pub stall_distance: f32,
    /// Balls below this height are out of bounds
    pub out_of_bounds_y: f32,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            stall_ticks: 120,
            stall_distance: 0.01,
            out_of_bounds_y: -10.0,
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsSettings,
    pub rules: RuleSettings,
    pub debug: DebugConfig,
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut settings = Settings::default();
        settings.physics.gravity = 3.7;
        settings.rules.stall_ticks = 30;
        settings.debug.show_axis = true;

        let json = settings.to_json().expect("serialize");
        assert_eq!(Settings::from_json(&json).expect("parse"), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "physics": { "time_scale": 2.0 } }"#).expect("parse");
        assert_eq!(settings.physics.time_scale, 2.0);
        assert_eq!(settings.physics.tick_rate, 60);
        assert_eq!(settings.rules, RuleSettings::default());
        assert!(!settings.debug.show_axis);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            Settings::from_json("{ nope"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = Settings::load("/definitely/not/here.json").expect_err("missing file");
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("minigolf-settings-{}.json", std::process::id()));
        let settings = Settings::default();
        settings.save(&path).expect("save");
        assert_eq!(Settings::load(&path).expect("load"), settings);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_delta_time() {
        assert!((PhysicsSettings::default().delta_time() - 1.0 / 60.0).abs() < 1e-7);
        let zero = PhysicsSettings {
            tick_rate: 0,
            ..Default::default()
        };
        assert_eq!(zero.delta_time(), SIM_DT);
    }
}
