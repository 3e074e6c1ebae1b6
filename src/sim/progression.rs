//! Progression and meta state
//!
//! Score, weapon upgrades, kill statistics and the boss schedule.

use serde::{Deserialize, Serialize};

use super::templates::BossKind;
use crate::consts::*;

/// Fire cooldown for an attack level: 500ms at level 1, -45ms per level, floor 50ms.
pub fn shot_cooldown_for_level(level: u8) -> f64 {
    let steps = f64::from(level.saturating_sub(1));
    (BASE_SHOT_COOLDOWN_MS - steps * SHOT_COOLDOWN_STEP_MS).max(MIN_SHOT_COOLDOWN_MS)
}

/// Attack level after taking a hit: roughly halved, never below 1.
pub fn reduced_attack_level(level: u8) -> u8 {
    match level {
        0 | 1 => level.max(MIN_ATTACK_LEVEL),
        3 => 1,
        5 => 2,
        7 => 3,
        9 => 4,
        _ => (level / 2).max(MIN_ATTACK_LEVEL),
    }
}

/// What a power item did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerUp {
    ExtraBullet,
    ExtraDamage,
}

/// Player-facing progression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    /// 1..=10
    pub attack_level: u8,
    /// 1..=5 parallel shots
    pub bullet_count: u8,
    pub bullet_damage: i32,
    /// Derived from `attack_level`; refreshed whenever it changes
    pub shot_cooldown_ms: f64,
    pub enemies_killed: u32,
    /// Clock time when level 10 was first reached
    pub max_level_reached_ms: Option<f64>,
    pub max_attack_level_secs: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    pub fn new() -> Self {
        Self {
            score: 0,
            attack_level: MIN_ATTACK_LEVEL,
            bullet_count: 1,
            bullet_damage: 1,
            shot_cooldown_ms: shot_cooldown_for_level(MIN_ATTACK_LEVEL),
            enemies_killed: 0,
            max_level_reached_ms: None,
            max_attack_level_secs: 0.0,
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Raise the attack level by one. Returns false if already maxed.
    pub fn raise_attack_level(&mut self, now_ms: f64) -> bool {
        if self.attack_level >= MAX_ATTACK_LEVEL {
            return false;
        }
        self.attack_level += 1;
        self.shot_cooldown_ms = shot_cooldown_for_level(self.attack_level);
        if self.attack_level == MAX_ATTACK_LEVEL && self.max_level_reached_ms.is_none() {
            self.max_level_reached_ms = Some(now_ms);
        }
        true
    }

    /// Roll the attack level back after a hit
    pub fn apply_damage_rollback(&mut self) {
        let before = self.attack_level;
        self.attack_level = reduced_attack_level(before);
        self.shot_cooldown_ms = shot_cooldown_for_level(self.attack_level);
        if before != self.attack_level {
            log::debug!("Attack level {} -> {}", before, self.attack_level);
        }
    }

    /// Power item: another parallel bullet, or more damage once at five
    pub fn apply_power(&mut self) -> PowerUp {
        if self.bullet_count < MAX_BULLET_COUNT {
            self.bullet_count += 1;
            PowerUp::ExtraBullet
        } else {
            self.bullet_damage = self.bullet_damage.saturating_add(1);
            PowerUp::ExtraDamage
        }
    }

    /// Refresh the time-at-max-level statistic
    pub fn track_max_level_time(&mut self, now_ms: f64) {
        if self.attack_level == MAX_ATTACK_LEVEL {
            if let Some(start) = self.max_level_reached_ms {
                self.max_attack_level_secs = (now_ms - start) / 1000.0;
            }
        }
    }
}

/// Boss schedule and scaling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossDirector {
    /// A boss is alive in the arena
    pub active: bool,
    pub warning_started_ms: Option<f64>,
    pub last_spawn_ms: Option<f64>,
    pub next_kind: BossKind,
    pub kill_count: u32,
    /// 2^kill_count
    pub health_multiplier: i32,
}

impl Default for BossDirector {
    fn default() -> Self {
        Self::new()
    }
}

impl BossDirector {
    pub fn new() -> Self {
        Self {
            active: false,
            warning_started_ms: None,
            last_spawn_ms: None,
            next_kind: BossKind::Commander,
            kill_count: 0,
            health_multiplier: 1,
        }
    }

    pub fn warning_active(&self) -> bool {
        self.warning_started_ms.is_some()
    }

    /// Boss or warning in progress; regular spawns are held back
    pub fn pending(&self) -> bool {
        self.active || self.warning_active()
    }

    /// Should the warning start now? `interval_ms` is measured both from
    /// game start and from the last boss spawn.
    pub fn should_warn(&self, now_ms: f64, interval_ms: f64) -> bool {
        if self.pending() || now_ms < interval_ms {
            return false;
        }
        self.last_spawn_ms.is_none_or(|t| now_ms - t >= interval_ms)
    }

    pub fn begin_warning(&mut self, now_ms: f64) {
        self.warning_started_ms = Some(now_ms);
    }

    pub fn warning_elapsed(&self, now_ms: f64, warning_ms: f64) -> bool {
        self.warning_started_ms
            .is_some_and(|t| now_ms - t >= warning_ms)
    }

    /// Record a spawn; returns the kind to spawn and queues the other one next
    pub fn on_spawn(&mut self, now_ms: f64) -> BossKind {
        let kind = self.next_kind;
        self.active = true;
        self.warning_started_ms = None;
        self.last_spawn_ms = Some(now_ms);
        self.next_kind = kind.next();
        kind
    }

    pub fn on_defeat(&mut self) {
        self.active = false;
        self.kill_count += 1;
        self.health_multiplier = self.health_multiplier.saturating_mul(2);
    }

    /// Health for the next boss built from `base`
    pub fn scaled_health(&self, base: i32) -> i32 {
        base.saturating_mul(self.health_multiplier)
    }
}
