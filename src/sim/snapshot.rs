//! Read-only render view
//!
//! What a presentation layer needs to draw one frame, borrowed straight from
//! the state. Serializable so headless hosts can stream frames as JSON.

use serde::Serialize;

use super::state::{
    Enemy, EnemyBullet, GamePhase, GameState, Item, Notification, Particle, Player, PlayerBullet,
    Star,
};
use super::templates::BossKind;

/// Scalar HUD fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub phase: GamePhase,
    pub score: u64,
    pub attack_level: u8,
    pub bullet_count: u8,
    pub bullet_damage: i32,
    pub health: u8,
    pub boss_warning_active: bool,
    pub next_boss: BossKind,
    pub play_time_secs: f64,
}

/// Giant-laser warning column to draw while a boss charges
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaserWarning {
    pub column_x: f32,
    pub width: f32,
    /// 0..1 charge progress
    pub progress: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot<'a> {
    pub hud: Hud,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub player_bullets: &'a [PlayerBullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub items: &'a [Item],
    pub particles: &'a [Particle],
    pub notifications: &'a [Notification],
    pub stars: &'a [Star],
    pub laser_warnings: Vec<LaserWarning>,
}

impl GameState {
    pub fn hud(&self) -> Hud {
        Hud {
            phase: self.phase,
            score: self.progression.score,
            attack_level: self.progression.attack_level,
            bullet_count: self.progression.bullet_count,
            bullet_damage: self.progression.bullet_damage,
            health: self.player.health,
            boss_warning_active: self.bosses.warning_active(),
            next_boss: self.bosses.next_kind,
            play_time_secs: self.game_time,
        }
    }

    /// Borrow everything the renderer draws this frame
    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        let laser_warnings = self
            .enemies
            .iter()
            .filter_map(|e| e.boss.as_ref()?.giant_laser)
            .map(|charge| LaserWarning {
                column_x: charge.warning_x,
                width: crate::consts::GIANT_LASER_WIDTH,
                progress: ((self.clock_ms - charge.started_ms)
                    / crate::consts::GIANT_LASER_CHARGE_MS)
                    .clamp(0.0, 1.0) as f32,
            })
            .collect();

        RenderSnapshot {
            hud: self.hud(),
            player: &self.player,
            enemies: &self.enemies,
            player_bullets: &self.player_bullets,
            enemy_bullets: &self.enemy_bullets,
            items: &self.items,
            particles: &self.particles,
            notifications: &self.notifications,
            stars: &self.stars,
            laser_warnings,
        }
    }
}
