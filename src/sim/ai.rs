//! Enemy behaviour
//!
//! Per-enemy state machines (generic descent, drone laser lock, boss entry
//! and hover) plus the dispatch that decides what a shooter fires when the
//! global enemy-shoot timer comes due.

use glam::Vec2;
use rand::Rng;

use super::patterns::{self, Shooter};
use super::spawn;
use super::state::{
    BossPattern, Enemy, EnemyBullet, EnemyState, GameState, GiantLaserCharge, HomingBurst,
};
use super::templates::AttackKind;
use crate::consts::*;

/// What an enemy can see of the world during its update
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub now_ms: f64,
    /// Frame-normalized delta (1.0 = one 60 Hz frame)
    pub dt: f32,
    /// Player top-left corner
    pub player_pos: Vec2,
    pub player_center: Vec2,
    pub arena_width: f32,
    pub arena_height: f32,
}

impl AiContext {
    pub fn from_state(state: &GameState, dt: f32) -> Self {
        Self {
            now_ms: state.clock_ms,
            dt,
            player_pos: state.player.pos,
            player_center: state.player.center(),
            arena_width: state.settings.arena_width,
            arena_height: state.settings.arena_height,
        }
    }
}

/// Advance one enemy by its state machine. Beams it fires go into `bullets`.
pub fn update_enemy(enemy: &mut Enemy, ctx: &AiContext, bullets: &mut Vec<EnemyBullet>) {
    if enemy.boss.is_some() {
        update_boss(enemy, ctx, bullets);
        return;
    }
    match enemy.template().attack {
        AttackKind::Laser {
            stop_distance,
            charge_ms,
            fire_delay_ms,
        } => update_drone(enemy, ctx, bullets, stop_distance, charge_ms, charge_ms + fire_delay_ms),
        _ => descend(enemy, ctx.dt),
    }
}

#[inline]
fn descend(enemy: &mut Enemy, dt: f32) {
    enemy.pos.y += enemy.template().speed * dt;
}

/// moving -> tracking -> locked -> (fire) -> moving
fn update_drone(
    enemy: &mut Enemy,
    ctx: &AiContext,
    bullets: &mut Vec<EnemyBullet>,
    stop_distance: f32,
    charge_ms: f64,
    fire_at_ms: f64,
) {
    let now = ctx.now_ms;

    if enemy.state == EnemyState::Moving && (enemy.pos.y - ctx.player_pos.y).abs() < stop_distance {
        enemy.state = EnemyState::Tracking {
            charge_started_ms: now,
            target: ctx.player_center,
        };
    }

    if let EnemyState::Tracking {
        charge_started_ms,
        target,
    } = enemy.state
    {
        enemy.state = if now - charge_started_ms < charge_ms {
            EnemyState::Tracking {
                charge_started_ms,
                target: ctx.player_center,
            }
        } else {
            // Aim freezes at the last tracked point
            EnemyState::Locked {
                charge_started_ms,
                target,
            }
        };
    }

    if let EnemyState::Locked {
        charge_started_ms,
        target,
    } = enemy.state
    {
        if now - charge_started_ms >= fire_at_ms {
            log::debug!("Drone {} fires at ({:.0}, {:.0})", enemy.id, target.x, target.y);
            patterns::fire_drone_laser(bullets, enemy.center(), target, ctx.arena_height);
            enemy.state = EnemyState::Moving;
        }
    }

    if enemy.state == EnemyState::Moving {
        descend(enemy, ctx.dt);
    }
}

/// entering -> hovering, plus pattern rotation and giant-laser resolution
fn update_boss(enemy: &mut Enemy, ctx: &AiContext, bullets: &mut Vec<EnemyBullet>) {
    let speed = enemy.template().speed;
    let max_x = ctx.arena_width - enemy.size.x;
    let Some(brain) = enemy.boss.as_mut() else {
        return;
    };

    match enemy.state {
        EnemyState::Entering => {
            enemy.pos.y += speed * 2.0 * ctx.dt;
            if enemy.pos.y >= brain.target_y {
                enemy.pos.y = brain.target_y;
                enemy.state = EnemyState::Hovering;
                brain.arrived = true;
            }
        }
        EnemyState::Hovering => {
            enemy.pos.x += brain.move_dir * speed * ctx.dt;
            if enemy.pos.x <= 0.0 {
                enemy.pos.x = 0.0;
                brain.move_dir = 1.0;
            } else if enemy.pos.x >= max_x {
                enemy.pos.x = max_x;
                brain.move_dir = -1.0;
            }

            if ctx.now_ms - brain.last_pattern_change_ms >= BOSS_PATTERN_MS {
                brain.pattern = brain.pattern.next();
                brain.last_pattern_change_ms = ctx.now_ms;
            }
        }
        _ => {}
    }

    if let Some(charge) = brain.giant_laser {
        if ctx.now_ms - charge.started_ms >= GIANT_LASER_CHARGE_MS {
            let top = enemy.pos.y + enemy.size.y;
            log::debug!("Boss {} fires giant laser at x={:.0}", enemy.id, charge.warning_x);
            patterns::fire_giant_laser(
                bullets,
                charge.warning_x,
                top,
                GIANT_LASER_WIDTH,
                ctx.arena_height,
            );
            brain.giant_laser = None;
        }
    }
}

/// Start charging the giant laser. Returns false (and does nothing) if a
/// charge is already running or the enemy is not a boss.
pub fn begin_giant_laser(enemy: &mut Enemy, now_ms: f64, warning_x: f32) -> bool {
    let Some(brain) = enemy.boss.as_mut() else {
        return false;
    };
    if brain.giant_laser.is_some() {
        return false;
    }
    brain.giant_laser = Some(GiantLaserCharge {
        started_ms: now_ms,
        warning_x,
    });
    true
}

/// The global enemy-shoot action: one random live enemy fires.
///
/// Silently does nothing if there are no enemies or the player is not
/// below the chosen shooter.
pub fn enemy_shoot(state: &mut GameState) {
    if state.enemies.is_empty() {
        return;
    }
    let idx = state.rng.random_range(0..state.enemies.len());
    let shooter = Shooter::of(&state.enemies[idx]);
    let player_center = state.player.center();
    let muzzle = shooter.muzzle();

    let dy = player_center.y - muzzle.y;
    if dy <= 0.0 {
        return;
    }
    let angle = dy.atan2(player_center.x - muzzle.x);

    state.enemies[idx].last_shot_ms = Some(state.clock_ms);
    let pattern = state.enemies[idx].boss.as_ref().map(|b| b.pattern);
    match pattern {
        Some(pattern) => fire_boss_pattern(state, idx, &shooter, pattern),
        None => fire_by_attack(state, &shooter, angle),
    }
}

/// Type-based attack for regular shooters
pub fn fire_by_attack(state: &mut GameState, shooter: &Shooter, angle: f32) {
    match shooter.kind.template().attack {
        AttackKind::Single => patterns::fire_single(&mut state.enemy_bullets, shooter, angle),
        AttackKind::Spread { count, step } => {
            patterns::fire_spread(&mut state.enemy_bullets, shooter, angle, count, step)
        }
        AttackKind::Circular { count } => {
            patterns::fire_circular(&mut state.enemy_bullets, shooter, count)
        }
        AttackKind::Homing { count } => {
            start_homing_burst(state, shooter);
            if state.rng.random::<f64>() < 0.5 {
                patterns::fire_circular(&mut state.enemy_bullets, shooter, count);
            }
        }
        // Drones only fire through their lock-on sequence
        AttackKind::Laser { .. } => {}
    }
}

/// Boss attack chosen by its current pattern
fn fire_boss_pattern(state: &mut GameState, idx: usize, shooter: &Shooter, pattern: BossPattern) {
    let now = state.clock_ms;
    match pattern {
        BossPattern::Circular => {
            patterns::fire_circular(&mut state.enemy_bullets, shooter, shooter.kind.ring_count())
        }
        BossPattern::Spiral => patterns::fire_spiral(&mut state.enemy_bullets, shooter, now),
        BossPattern::Wave => patterns::fire_wave(&mut state.enemy_bullets, shooter),
        BossPattern::Concentrated => {
            let target = state.player.center();
            patterns::fire_concentrated(&mut state.enemy_bullets, shooter, target)
        }
        BossPattern::GiantLaser => {
            let column = state.player.center().x;
            if begin_giant_laser(&mut state.enemies[idx], now, column) {
                log::debug!("Boss {} charging giant laser at x={:.0}", shooter.id, column);
            }
        }
        BossPattern::DroneSummon => spawn::spawn_boss_drones(state, shooter.pos, shooter.size),
    }
}

/// Fire the first missile of a burst now and schedule the rest
pub fn start_homing_burst(state: &mut GameState, shooter: &Shooter) {
    patterns::fire_homing(&mut state.enemy_bullets, shooter);
    if HOMING_BURST_COUNT > 1 {
        state.homing_bursts.push(HomingBurst {
            shooter_id: shooter.id,
            remaining: HOMING_BURST_COUNT - 1,
            next_fire_ms: state.clock_ms + HOMING_BURST_SPACING_MS,
        });
    }
}

/// Fire scheduled burst missiles that are due. Bursts whose shooter is gone are dropped.
pub fn update_homing_bursts(state: &mut GameState) {
    let now = state.clock_ms;
    let mut bursts = std::mem::take(&mut state.homing_bursts);
    bursts.retain_mut(|burst| {
        let Some(shooter) = state
            .enemies
            .iter()
            .find(|e| e.id == burst.shooter_id)
            .map(Shooter::of)
        else {
            return false;
        };
        while burst.remaining > 0 && now >= burst.next_fire_ms {
            patterns::fire_homing(&mut state.enemy_bullets, &shooter);
            burst.remaining -= 1;
            burst.next_fire_ms += HOMING_BURST_SPACING_MS;
        }
        burst.remaining > 0
    });
    state.homing_bursts = bursts;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::spawn::{make_boss, make_enemy};
    use crate::sim::state::EnemyBulletKind;
    use crate::sim::templates::{BossKind, EnemyKind};

    fn ctx(now_ms: f64, player_pos: Vec2) -> AiContext {
        AiContext {
            now_ms,
            dt: 1.0,
            player_pos,
            player_center: player_pos + Vec2::splat(20.0),
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
        }
    }

    #[test]
    fn test_generic_enemy_descends() {
        let mut bee = make_enemy(1, EnemyKind::Bee, Vec2::new(100.0, 0.0));
        let mut bullets = Vec::new();
        let c = AiContext {
            dt: 2.5,
            ..ctx(0.0, Vec2::new(280.0, 750.0))
        };
        update_enemy(&mut bee, &c, &mut bullets);
        assert_eq!(bee.pos.y, 5.0);
        assert_eq!(bee.state, EnemyState::Moving);
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_drone_does_not_track_when_far() {
        let mut drone = make_enemy(1, EnemyKind::Drone, Vec2::new(100.0, 0.0));
        let mut bullets = Vec::new();
        update_enemy(&mut drone, &ctx(0.0, Vec2::new(280.0, 750.0)), &mut bullets);
        assert_eq!(drone.state, EnemyState::Moving);
        assert_eq!(drone.pos.y, 2.5);
    }

    #[test]
    fn test_drone_tracks_then_locks_then_fires() {
        let player = Vec2::new(280.0, 750.0);
        let mut drone = make_enemy(1, EnemyKind::Drone, Vec2::new(100.0, 301.0));
        let mut bullets = Vec::new();

        // 449 px away: starts tracking and stops
        update_enemy(&mut drone, &ctx(1000.0, player), &mut bullets);
        assert!(matches!(
            drone.state,
            EnemyState::Tracking { charge_started_ms, .. } if charge_started_ms == 1000.0
        ));
        assert_eq!(drone.pos.y, 301.0);

        // Target follows the player while tracking
        let moved = Vec2::new(100.0, 750.0);
        update_enemy(&mut drone, &ctx(2999.0, moved), &mut bullets);
        assert_eq!(drone.laser_target(), Some(moved + Vec2::splat(20.0)));

        // Charge complete: locked at the last tracked point
        update_enemy(&mut drone, &ctx(3000.0, player), &mut bullets);
        assert!(matches!(drone.state, EnemyState::Locked { .. }));
        assert_eq!(drone.laser_target(), Some(moved + Vec2::splat(20.0)));
        assert!(bullets.is_empty());

        update_enemy(&mut drone, &ctx(3999.0, player), &mut bullets);
        assert!(bullets.is_empty());

        // Fire delay elapsed: beam out, back to moving
        update_enemy(&mut drone, &ctx(4000.0, player), &mut bullets);
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].is_laser());
        assert_eq!(bullets[0].pos, drone.center() - Vec2::new(0.0, 2.5));
        assert_eq!(drone.state, EnemyState::Moving);
        assert_eq!(drone.laser_target(), None);
        assert_eq!(drone.pos.y, 303.5);
    }

    #[test]
    fn test_drone_long_frame_locks_and_fires_together() {
        let player = Vec2::new(280.0, 750.0);
        let mut drone = make_enemy(1, EnemyKind::Drone, Vec2::new(100.0, 301.0));
        let mut bullets = Vec::new();
        update_enemy(&mut drone, &ctx(1000.0, player), &mut bullets);
        assert!(matches!(drone.state, EnemyState::Tracking { .. }));

        // One update past both the charge and the fire delay
        update_enemy(&mut drone, &ctx(5000.0, Vec2::new(100.0, 750.0)), &mut bullets);
        assert_eq!(bullets.len(), 1);
        assert!(bullets[0].is_laser());
        assert_eq!(drone.state, EnemyState::Moving);
    }

    #[test]
    fn test_boss_enters_then_hovers_and_bounces() {
        let mut boss = make_boss(1, BossKind::Commander, ARENA_WIDTH, 100, 0.0);
        let mut bullets = Vec::new();
        let player = Vec2::new(280.0, 750.0);

        let mut frames = 0;
        while boss.state == EnemyState::Entering {
            update_enemy(&mut boss, &ctx(0.0, player), &mut bullets);
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(boss.pos.y, BOSS_TARGET_Y);
        assert!(boss.boss.as_ref().unwrap().arrived);
        // 300 px at 2 px/frame
        assert_eq!(frames, 150);

        // Sweep right until the edge flips direction
        for _ in 0..300 {
            update_enemy(&mut boss, &ctx(0.0, player), &mut bullets);
        }
        assert!(boss.pos.x <= ARENA_WIDTH - boss.size.x);
        assert_eq!(boss.boss.as_ref().unwrap().move_dir, -1.0);
    }

    #[test]
    fn test_boss_pattern_advances_every_three_seconds() {
        let mut boss = make_boss(1, BossKind::Flagship, ARENA_WIDTH, 300, 0.0);
        boss.state = EnemyState::Hovering;
        boss.pos.y = BOSS_TARGET_Y;
        let mut bullets = Vec::new();
        let player = Vec2::new(280.0, 750.0);

        update_enemy(&mut boss, &ctx(2999.0, player), &mut bullets);
        assert_eq!(boss.boss.as_ref().unwrap().pattern, BossPattern::Circular);
        update_enemy(&mut boss, &ctx(3000.0, player), &mut bullets);
        assert_eq!(boss.boss.as_ref().unwrap().pattern, BossPattern::Spiral);
        update_enemy(&mut boss, &ctx(5999.0, player), &mut bullets);
        assert_eq!(boss.boss.as_ref().unwrap().pattern, BossPattern::Spiral);
        update_enemy(&mut boss, &ctx(6000.0, player), &mut bullets);
        assert_eq!(boss.boss.as_ref().unwrap().pattern, BossPattern::Wave);
    }

    #[test]
    fn test_giant_laser_charge_is_idempotent() {
        let mut boss = make_boss(1, BossKind::Commander, ARENA_WIDTH, 100, 0.0);
        boss.state = EnemyState::Hovering;
        boss.pos = Vec2::new(200.0, 100.0);
        assert!(begin_giant_laser(&mut boss, 1000.0, 300.0));
        assert!(!begin_giant_laser(&mut boss, 1500.0, 50.0));
        let charge = boss.boss.as_ref().unwrap().giant_laser.unwrap();
        assert_eq!(charge.started_ms, 1000.0);
        assert_eq!(charge.warning_x, 300.0);

        let mut bullets = Vec::new();
        let player = Vec2::new(280.0, 750.0);
        update_enemy(&mut boss, &ctx(2999.0, player), &mut bullets);
        assert!(bullets.is_empty());
        update_enemy(&mut boss, &ctx(3000.0, player), &mut bullets);
        assert_eq!(bullets.len(), 1);
        let EnemyBulletKind::Laser(beam) = bullets[0].kind else {
            panic!("expected laser");
        };
        assert!(beam.giant);
        assert_eq!(bullets[0].pos.x, 300.0);
        assert!(boss.boss.as_ref().unwrap().giant_laser.is_none());

        // Regular enemies cannot charge
        let mut bee = make_enemy(2, EnemyKind::Bee, Vec2::ZERO);
        assert!(!begin_giant_laser(&mut bee, 0.0, 0.0));
    }

    #[test]
    fn test_enemy_shoot_without_enemies_is_noop() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        enemy_shoot(&mut state);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_enemy_shoot_requires_player_below() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        let id = state.next_entity_id();
        state
            .enemies
            .push(make_enemy(id, EnemyKind::Bee, Vec2::new(280.0, 760.0)));
        enemy_shoot(&mut state);
        assert!(state.enemy_bullets.is_empty());

        state.enemies[0].pos.y = 100.0;
        enemy_shoot(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.enemies[0].last_shot_ms, Some(0.0));
    }

    #[test]
    fn test_butterfly_fires_spread() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        let id = state.next_entity_id();
        state
            .enemies
            .push(make_enemy(id, EnemyKind::Butterfly, Vec2::new(100.0, 100.0)));
        enemy_shoot(&mut state);
        assert_eq!(state.enemy_bullets.len(), 3);
        assert!(
            state
                .enemy_bullets
                .iter()
                .all(|b| matches!(b.kind, EnemyBulletKind::Spread { .. }))
        );
    }

    #[test]
    fn test_boss_pattern_dispatch() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        let id = state.next_entity_id();
        let mut boss = make_boss(id, BossKind::Flagship, ARENA_WIDTH, 300, 0.0);
        boss.pos = Vec2::new(200.0, 100.0);
        boss.state = EnemyState::Hovering;
        state.enemies.push(boss);

        enemy_shoot(&mut state);
        assert_eq!(state.enemy_bullets.len(), 12);

        state.enemy_bullets.clear();
        state.enemies[0].boss.as_mut().unwrap().pattern = BossPattern::DroneSummon;
        enemy_shoot(&mut state);
        // Only one enemy before this shot, so the boss fired
        assert_eq!(state.enemies.len(), 5);
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_homing_burst_is_staggered() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        let id = state.next_entity_id();
        state
            .enemies
            .push(make_enemy(id, EnemyKind::Flagship, Vec2::new(200.0, 100.0)));
        let shooter = Shooter::of(&state.enemies[0]);
        start_homing_burst(&mut state, &shooter);
        assert_eq!(state.enemy_bullets.len(), 1);

        state.clock_ms = 299.0;
        update_homing_bursts(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        state.clock_ms = 300.0;
        update_homing_bursts(&mut state);
        assert_eq!(state.enemy_bullets.len(), 2);
        state.clock_ms = 600.0;
        update_homing_bursts(&mut state);
        assert_eq!(state.enemy_bullets.len(), 3);
        assert!(state.homing_bursts.is_empty());
    }

    #[test]
    fn test_homing_burst_dropped_with_shooter() {
        let mut state = GameState::new(Settings::default(), 5);
        state.start(0.0);
        let id = state.next_entity_id();
        state
            .enemies
            .push(make_enemy(id, EnemyKind::Flagship, Vec2::new(200.0, 100.0)));
        let shooter = Shooter::of(&state.enemies[0]);
        start_homing_burst(&mut state, &shooter);
        state.enemies.clear();
        state.clock_ms = 1000.0;
        update_homing_bursts(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert!(state.homing_bursts.is_empty());
    }
}
