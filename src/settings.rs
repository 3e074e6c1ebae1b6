//! Simulation settings and tuning
//!
//! Loaded from JSON. Every field has a default, so a partial file only
//! overrides what it names.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};

/// Tunable simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed (None = host picks one)
    pub seed: Option<u64>,

    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Player ===
    /// Invincibility window after a hit (ms)
    pub invincibility_ms: f64,
    /// Blink toggle period while invincible (ms)
    pub blink_interval_ms: f64,
    /// Radius within which items are pulled toward the player
    pub magnet_range: f32,

    // === Bosses ===
    /// Seconds between boss encounters (measured before the warning)
    pub boss_interval_secs: f64,
    /// Warning shown before a boss enters (ms)
    pub boss_warning_ms: f64,

    // === Ambient visuals ===
    /// Background stars
    pub star_count: usize,
    /// Explosion particles on/off
    pub particles: bool,
    /// Cap on simultaneously live particles
    pub max_particles: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,

            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,

            invincibility_ms: INVINCIBILITY_MS,
            blink_interval_ms: BLINK_INTERVAL_MS,
            magnet_range: MAGNET_RANGE,

            boss_interval_secs: BOSS_INTERVAL_SECS,
            boss_warning_ms: BOSS_WARNING_MS,

            star_count: STAR_COUNT,
            particles: true,
            max_particles: MAX_PARTICLES,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        // Bosses are 200 px wide and must be able to hover
        if !(self.arena_width > 200.0) {
            return Err(invalid("arena_width", format!("{} must exceed 200", self.arena_width)));
        }
        if !(self.arena_height > PLAYER_BOTTOM_OFFSET + PLAYER_HEIGHT) {
            return Err(invalid(
                "arena_height",
                format!(
                    "{} must exceed {}",
                    self.arena_height,
                    PLAYER_BOTTOM_OFFSET + PLAYER_HEIGHT
                ),
            ));
        }
        if !(self.invincibility_ms > 0.0) {
            return Err(invalid("invincibility_ms", "must be positive".into()));
        }
        if !(self.blink_interval_ms > 0.0) {
            return Err(invalid("blink_interval_ms", "must be positive".into()));
        }
        if !(self.magnet_range >= 0.0) {
            return Err(invalid("magnet_range", "must not be negative".into()));
        }
        if !(self.boss_interval_secs >= 0.0) {
            return Err(invalid("boss_interval_secs", "must not be negative".into()));
        }
        if !(self.boss_warning_ms >= 0.0) {
            return Err(invalid("boss_warning_ms", "must not be negative".into()));
        }
        Ok(())
    }

    /// Effective particle cap (0 when particles are off)
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.max_particles
        }
    }

    /// Where the player ship starts (top-left corner)
    pub fn player_spawn(&self) -> (f32, f32) {
        (
            self.arena_width / 2.0 - PLAYER_WIDTH / 2.0,
            self.arena_height - PLAYER_BOTTOM_OFFSET,
        )
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidSetting { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_classic_arena() {
        let settings = Settings::default();
        assert_eq!(settings.player_spawn(), (280.0, 750.0));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 7, "particles": false }"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.max_particles(), 0);
        assert_eq!(settings.arena_width, ARENA_WIDTH);
        assert_eq!(settings.boss_interval_secs, BOSS_INTERVAL_SECS);
    }

    #[test]
    fn test_rejects_tiny_arena() {
        let err = Settings::from_json(r#"{ "arena_width": 100.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidSetting {
                field: "arena_width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = Settings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Settings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
