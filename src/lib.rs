//! Space Shooter - a vertical arcade shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, enemy AI, collisions, progression)
//! - `settings`: Data-driven tuning loaded from JSON
//! - `error`: Errors for the fallible edges (configuration loading)
//!
//! Rendering, input capture and UI screens live outside this crate. A host
//! feeds [`sim::TickInput`] plus a wall-clock timestamp into [`sim::tick`] and
//! draws the [`sim::RenderSnapshot`] it gets back.

pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Length of one nominal frame (60 Hz) in milliseconds
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Frame deltas above this are treated as a suspend/resume jump
    pub const MAX_FRAME_DELTA: f32 = 5.0;

    /// Arena dimensions (pixels, origin top-left, y grows downward)
    pub const ARENA_WIDTH: f32 = 600.0;
    pub const ARENA_HEIGHT: f32 = 800.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    /// Pixels per frame
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_MAX_HEALTH: u8 = 3;
    /// The damage-taking hitbox is a small circle at the sprite center
    pub const PLAYER_HITBOX_RADIUS: f32 = 6.0;
    /// Distance of the spawn point from the bottom edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 50.0;

    /// Invincibility after taking a hit
    pub const INVINCIBILITY_MS: f64 = 1500.0;
    pub const BLINK_INTERVAL_MS: f64 = 100.0;

    /// Player weapon
    pub const BASE_SHOT_COOLDOWN_MS: f64 = 500.0;
    pub const SHOT_COOLDOWN_STEP_MS: f64 = 45.0;
    pub const MIN_SHOT_COOLDOWN_MS: f64 = 50.0;
    pub const MIN_ATTACK_LEVEL: u8 = 1;
    pub const MAX_ATTACK_LEVEL: u8 = 10;
    pub const MAX_BULLET_COUNT: u8 = 5;
    pub const PLAYER_BULLET_SPACING: f32 = 10.0;
    pub const PLAYER_BULLET_WIDTH: f32 = 4.0;
    pub const PLAYER_BULLET_HEIGHT: f32 = 10.0;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;

    /// Items
    pub const ITEM_SIZE: f32 = 24.0;
    pub const ITEM_FALL_SPEED: f32 = 2.0;
    pub const MAGNET_RANGE: f32 = 100.0;
    pub const MAGNET_SPEED: f32 = 8.0;
    pub const SCORE_ITEM_POINTS: u64 = 10;

    /// Bosses
    pub const BOSS_INTERVAL_SECS: f64 = 58.0;
    pub const BOSS_WARNING_MS: f64 = 2000.0;
    pub const BOSS_TARGET_Y: f32 = 100.0;
    pub const BOSS_PATTERN_MS: f64 = 3000.0;
    pub const BOSS_PATTERN_COUNT: u8 = 6;
    pub const GIANT_LASER_CHARGE_MS: f64 = 2000.0;
    pub const GIANT_LASER_WIDTH: f32 = 80.0;

    /// Homing bursts
    pub const HOMING_BURST_COUNT: u8 = 3;
    pub const HOMING_BURST_SPACING_MS: f64 = 300.0;

    /// Enemy bullets are culled this far outside the arena
    pub const BULLET_CULL_MARGIN: f32 = 10.0;

    /// Ambient visuals
    pub const STAR_COUNT: usize = 100;
    pub const EXPLOSION_PARTICLES: usize = 10;
    pub const PARTICLE_LIFE: f32 = 30.0;
    pub const MAX_PARTICLES: usize = 512;
    pub const NOTIFICATION_HOLD_MS: f64 = 1000.0;
    pub const NOTIFICATION_FADE_MS: f64 = 500.0;
    pub const NOTIFICATION_RISE_SPEED: f32 = 1.5;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `angle` (radians, y down)
#[inline]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
