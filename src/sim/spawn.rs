//! Entity factories
//!
//! Build enemies, bosses, shots, drops, particles and notifications from
//! templates and push them into the state.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::difficulty;
use super::state::{
    BossBrain, BossPattern, Enemy, EnemyState, GameEvent, GameState, Item, ItemKind, Notification,
    NotificationKind, Particle, PlayerBullet,
};
use super::templates::{BossKind, EnemyKind};
use crate::consts::*;

/// Horizontal margin kept free when picking a spawn column
const SPAWN_MARGIN: f32 = 50.0;

/// A fresh enemy at full template health
pub fn make_enemy(id: u32, kind: EnemyKind, pos: Vec2) -> Enemy {
    let t = kind.template();
    Enemy {
        id,
        kind,
        pos,
        size: Vec2::new(t.width, t.height),
        health: t.health,
        max_health: t.health,
        state: EnemyState::Moving,
        last_shot_ms: None,
        boss: None,
        spawned_by_boss: false,
        dead: false,
    }
}

/// A boss above the arena, entering toward its hover line
pub fn make_boss(id: u32, kind: BossKind, arena_width: f32, health: i32, now_ms: f64) -> Enemy {
    let kind = kind.enemy_kind();
    let t = kind.template();
    let pos = Vec2::new((arena_width - t.width) / 2.0, -t.height);
    Enemy {
        health,
        max_health: health,
        state: EnemyState::Entering,
        boss: Some(BossBrain {
            target_y: BOSS_TARGET_Y,
            arrived: false,
            move_dir: 1.0,
            pattern: BossPattern::Circular,
            last_pattern_change_ms: now_ms,
            giant_laser: None,
        }),
        ..make_enemy(id, kind, pos)
    }
}

/// Spawn one regular wave (1-3 enemies depending on game time)
pub fn spawn_regular_wave(state: &mut GameState) {
    let count = difficulty::spawn_count(state.game_time, &mut state.rng);
    let max_x = (state.settings.arena_width - SPAWN_MARGIN).max(0.0);
    for _ in 0..count {
        let x = state.rng.random::<f32>() * max_x;
        let kind = EnemyKind::from_spawn_roll(state.rng.random::<f32>() * 100.0);
        let id = state.next_entity_id();
        state.enemies.push(make_enemy(id, kind, Vec2::new(x, 0.0)));
    }
}

/// Spawn the scheduled boss with health scaled by past kills
pub fn spawn_boss(state: &mut GameState) -> BossKind {
    let kind = state.bosses.on_spawn(state.clock_ms);
    let health = state
        .bosses
        .scaled_health(kind.enemy_kind().template().health);
    let id = state.next_entity_id();
    let boss = make_boss(id, kind, state.settings.arena_width, health, state.clock_ms);
    state.enemies.push(boss);
    log::info!("Boss {:?} spawned with {} health", kind, health);
    state.emit(GameEvent::BossSpawned { kind });
    kind
}

/// Four drones flanking a boss; positions outside the arena are skipped
pub fn spawn_boss_drones(state: &mut GameState, boss_pos: Vec2, boss_size: Vec2) {
    let drone = EnemyKind::Drone.template();
    let y = boss_pos.y + boss_size.y / 2.0;
    let right = boss_pos.x + boss_size.x;
    let columns = [boss_pos.x - 60.0, boss_pos.x - 120.0, right + 60.0, right + 120.0];
    let max_x = state.settings.arena_width - drone.width;

    for x in columns {
        if x < 0.0 || x > max_x {
            continue;
        }
        let id = state.next_entity_id();
        let mut enemy = make_enemy(id, EnemyKind::Drone, Vec2::new(x, y));
        enemy.spawned_by_boss = true;
        state.enemies.push(enemy);
    }
}

/// The player's volley: `bullet_count` parallel shots around the centerline
pub fn fire_player_volley(state: &mut GameState) {
    let count = state.progression.bullet_count;
    let damage = state.progression.bullet_damage;
    let total_width = f32::from(count.saturating_sub(1)) * PLAYER_BULLET_SPACING;
    let start_x = state.player.center().x - total_width / 2.0;
    let y = state.player.pos.y;

    for i in 0..count {
        let x = start_x + f32::from(i) * PLAYER_BULLET_SPACING - PLAYER_BULLET_WIDTH / 2.0;
        state.player_bullets.push(PlayerBullet {
            pos: Vec2::new(x, y),
            size: Vec2::new(PLAYER_BULLET_WIDTH, PLAYER_BULLET_HEIGHT),
            speed: PLAYER_BULLET_SPEED,
            damage,
        });
    }
}

/// Drop an item with its top-left at `pos`
pub fn spawn_item(state: &mut GameState, pos: Vec2, kind: ItemKind) {
    state.items.push(Item {
        kind,
        pos,
        size: Vec2::splat(ITEM_SIZE),
        speed: ITEM_FALL_SPEED,
        collected: false,
    });
}

/// Burst of explosion particles (respects the particle cap)
pub fn spawn_explosion(state: &mut GameState, at: Vec2) {
    let cap = state.settings.max_particles();
    for _ in 0..EXPLOSION_PARTICLES {
        if state.particles.len() >= cap {
            break;
        }
        let angle = state.rng.random::<f32>() * TAU;
        let speed = state.rng.random::<f32>() * 2.0 + 1.0;
        let radius = 2.0 + state.rng.random::<f32>() * 3.0;
        let hue = state.rng.random::<f32>() * 360.0;
        state.particles.push(Particle {
            pos: at,
            vel: crate::direction_from_angle(angle) * speed,
            radius,
            life: PARTICLE_LIFE,
            hue,
        });
    }
}

/// Floating text above the player
pub fn push_notification(state: &mut GameState, kind: NotificationKind) {
    let pos = Vec2::new(state.player.center().x, state.player.pos.y - 20.0);
    state.notifications.push(Notification {
        kind,
        pos,
        alpha: 1.0,
        created_ms: state.clock_ms,
    });
}
