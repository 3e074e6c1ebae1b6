//! Simulation step
//!
//! Advances the game by one host frame. The host passes its wall-clock
//! timestamp; the step converts it into a frame-normalized delta and drives
//! every system from the simulation's own clock.

use glam::Vec2;
use rand::Rng;

use super::ai::{self, AiContext};
use super::collision::{beam_hits_circle, circle_rect_overlap, rects_overlap};
use super::difficulty;
use super::spawn;
use super::state::{
    Cadence, Enemy, EnemyBullet, EnemyBulletKind, GameEvent, GameOverStats, GamePhase, GameState,
    ItemKind, NotificationKind,
};
use super::progression::PowerUp;
use super::templates::GuaranteedDrop;
use crate::consts::*;
use crate::{angle_between, direction_from_angle, normalize_angle};

/// Input intent for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Held fire
    pub fire: bool,
    /// Pause toggle (edge-triggered, like the command)
    pub toggle_pause: bool,
    /// Demo mode - the built-in pilot flies the ship
    pub autopilot: bool,
}

/// Frame-normalized delta between two host timestamps.
///
/// 1.0 is one 60 Hz frame. Negative deltas become 0 and deltas above
/// [`MAX_FRAME_DELTA`] (tab suspend, debugger pause) collapse to a single frame.
pub fn frame_delta(last_ms: Option<f64>, now_ms: f64) -> f32 {
    let Some(last_ms) = last_ms else {
        return 1.0;
    };
    let frames = ((now_ms - last_ms) / 1000.0 * 60.0) as f32;
    if !frames.is_finite() || frames < 0.0 {
        log::warn!("Frame delta {:.2} out of range, treating as 0", frames);
        0.0
    } else if frames > MAX_FRAME_DELTA {
        log::warn!("Frame delta {:.2} too large, clamping to one frame", frames);
        1.0
    } else {
        frames
    }
}

/// Advance the game by one host frame at wall-clock `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    if input.toggle_pause {
        state.toggle_pause();
    }

    let dt = frame_delta(state.last_frame_ms, now_ms);
    state.last_frame_ms = Some(now_ms);

    // Paused, title and game over are full freezes
    if !state.is_playing() {
        return;
    }

    state.clock_ms += f64::from(dt) * FRAME_MS;
    let now = state.clock_ms;

    let mut input = input.clone();
    if input.autopilot {
        steer_autopilot(state, &mut input);
    }

    // Ambient systems
    update_stars(state, dt);
    update_particles(state, dt);
    update_items(state, dt);
    update_notifications(state, dt);
    let blink = state.settings.blink_interval_ms;
    state.player.update_invincibility(now, blink);

    // Frame-counted game time drives difficulty
    state.game_time += 1.0 / 60.0;
    state.progression.track_max_level_time(now);

    update_spawning(state);

    let shoot_interval = difficulty::shoot_interval(state.game_time);
    if Cadence::due(state.cadence.last_enemy_shot_ms, now, shoot_interval) {
        state.cadence.last_enemy_shot_ms = Some(now);
        ai::enemy_shoot(state);
    }
    ai::update_homing_bursts(state);

    move_player(state, &input, dt);

    if input.fire
        && Cadence::due(
            state.cadence.last_player_shot_ms,
            now,
            state.progression.shot_cooldown_ms,
        )
    {
        state.cadence.last_player_shot_ms = Some(now);
        spawn::fire_player_volley(state);
    }

    advance_bullets(state, dt);

    update_enemies(state, dt);
    resolve_enemy_contact(state);
    resolve_player_shots(state);
    resolve_enemy_shots(state);

    prune(state);

    // A lethal hit is final; items overlapping the wreck stay uncollected
    if state.player.health == 0 {
        end_game(state);
        return;
    }
    collect_items(state);
}

/// Boss warning/spawn schedule, otherwise regular waves
fn update_spawning(state: &mut GameState) {
    let now = state.clock_ms;
    let interval_ms = state.settings.boss_interval_secs * 1000.0;

    if state.bosses.should_warn(now, interval_ms) {
        state.bosses.begin_warning(now);
        let kind = state.bosses.next_kind;
        log::info!("Boss warning: {:?} incoming", kind);
        state.emit(GameEvent::BossWarning { kind });
    } else if state
        .bosses
        .warning_elapsed(now, state.settings.boss_warning_ms)
    {
        spawn::spawn_boss(state);
    } else if !state.bosses.pending() {
        let interval = difficulty::spawn_interval(state.game_time);
        if Cadence::due(state.cadence.last_enemy_spawn_ms, now, interval) {
            state.cadence.last_enemy_spawn_ms = Some(now);
            spawn::spawn_regular_wave(state);
        }
    }
}

fn update_stars(state: &mut GameState, dt: f32) {
    let width = state.settings.arena_width;
    let height = state.settings.arena_height;
    for star in &mut state.stars {
        star.pos.y += star.speed * dt;
        if star.pos.y > height {
            star.pos.y = 0.0;
            star.pos.x = state.rng.random::<f32>() * width;
        }
    }
}

fn update_particles(state: &mut GameState, dt: f32) {
    for p in &mut state.particles {
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    state.particles.retain(|p| p.life > 0.0);
}

/// Free fall, or pulled toward the player inside the magnet range
fn update_items(state: &mut GameState, dt: f32) {
    let target = state.player.center();
    let range = state.settings.magnet_range;
    for item in &mut state.items {
        let distance = item.center().distance(target);
        if distance < range && distance > 0.0 {
            let angle = angle_between(item.center(), target);
            item.pos += direction_from_angle(angle) * MAGNET_SPEED * dt;
        } else {
            item.pos.y += item.speed * dt;
        }
    }
}

fn update_notifications(state: &mut GameState, dt: f32) {
    let now = state.clock_ms;
    for n in &mut state.notifications {
        n.pos.y -= NOTIFICATION_RISE_SPEED * dt;
        let age = now - n.created_ms;
        if age > NOTIFICATION_HOLD_MS {
            let faded = (age - NOTIFICATION_HOLD_MS) / NOTIFICATION_FADE_MS;
            n.alpha = (1.0 - faded).clamp(0.0, 1.0) as f32;
        }
    }
    state
        .notifications
        .retain(|n| now - n.created_ms < NOTIFICATION_HOLD_MS + NOTIFICATION_FADE_MS);
}

/// Axis-independent movement clamped to the arena; diagonals are not normalized
fn move_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let max_x = state.settings.arena_width - state.player.size.x;
    let max_y = state.settings.arena_height - state.player.size.y;
    let step = state.player.speed * dt;
    let pos = &mut state.player.pos;

    if input.move_left {
        pos.x = (pos.x - step).max(0.0);
    }
    if input.move_right {
        pos.x = (pos.x + step).min(max_x);
    }
    if input.move_up {
        pos.y = (pos.y - step).max(0.0);
    }
    if input.move_down {
        pos.y = (pos.y + step).min(max_y);
    }
}

fn advance_bullets(state: &mut GameState, dt: f32) {
    for b in &mut state.player_bullets {
        b.pos.y -= b.speed * dt;
    }
    let target = state.player.center();
    for b in &mut state.enemy_bullets {
        advance_enemy_bullet(b, target, dt);
    }
}

/// Move a projectile, steer a missile, or grow and fade a beam
pub fn advance_enemy_bullet(b: &mut EnemyBullet, target: Vec2, dt: f32) {
    match &mut b.kind {
        EnemyBulletKind::Aimed { vel }
        | EnemyBulletKind::Spread { vel }
        | EnemyBulletKind::Orb { vel, .. } => b.pos += *vel * dt,
        EnemyBulletKind::Homing {
            vel,
            speed,
            turn_rate,
        } => {
            let current = vel.y.atan2(vel.x);
            let desired = angle_between(b.pos, target);
            let angle = current + normalize_angle(desired - current) * *turn_rate;
            *vel = direction_from_angle(angle) * *speed;
            b.pos += *vel * dt;
        }
        EnemyBulletKind::Laser(beam) => {
            beam.lifetime += dt;
            if beam.length < beam.max_length {
                beam.length = (beam.length + beam.expand_speed * dt).min(beam.max_length);
            }
            if beam.lifetime > beam.max_lifetime - 20.0 {
                beam.alpha -= 0.05 * dt;
            }
            if beam.lifetime > beam.max_lifetime || beam.alpha <= 0.0 {
                b.dead = true;
            }
        }
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let ctx = AiContext::from_state(state, dt);
    for enemy in &mut state.enemies {
        ai::update_enemy(enemy, &ctx, &mut state.enemy_bullets);
    }
}

/// Take a hit: lose health, lose attack level, go invincible.
/// The explosion goes off at `impact`.
fn damage_player(state: &mut GameState, impact: Vec2) {
    let now = state.clock_ms;
    let duration = state.settings.invincibility_ms;
    state.player.health = state.player.health.saturating_sub(1);
    state.progression.apply_damage_rollback();
    state.player.start_invincibility(now, duration);
    spawn::spawn_explosion(state, impact);
    let health = state.player.health;
    log::debug!("Player hit, health {}", health);
    state.emit(GameEvent::PlayerHit { health });
}

/// Ramming: regular enemies die on contact, bosses stay
fn resolve_enemy_contact(state: &mut GameState) {
    if state.player.invincible {
        return;
    }
    let center = state.player.center();
    let Some(enemy) = state
        .enemies
        .iter_mut()
        .find(|e| !e.dead && circle_rect_overlap(center, PLAYER_HITBOX_RADIUS, &e.hitbox()))
    else {
        return;
    };
    if !enemy.is_boss() {
        enemy.dead = true;
    }
    let impact = enemy.center();
    damage_player(state, impact);
}

/// Player bullets against enemies; at most one bullet lands per enemy per tick
fn resolve_player_shots(state: &mut GameState) {
    let mut killed = Vec::new();
    for enemy in state.enemies.iter_mut().filter(|e| !e.dead) {
        let target = enemy.hitbox();
        let Some(hit) = state
            .player_bullets
            .iter()
            .position(|b| rects_overlap(&b.hitbox(), &target))
        else {
            continue;
        };
        let bullet = state.player_bullets.remove(hit);
        enemy.health -= bullet.damage;
        if enemy.health <= 0 {
            enemy.dead = true;
            killed.push(enemy.clone());
        }
    }
    state.enemies.retain(|e| !e.dead);
    for enemy in &killed {
        on_enemy_killed(state, enemy);
    }
}

fn on_enemy_killed(state: &mut GameState, enemy: &Enemy) {
    let template = enemy.template();
    state.progression.add_score(template.score);
    state.progression.enemies_killed += 1;
    state.emit(GameEvent::EnemyKilled { kind: enemy.kind });
    state.emit(GameEvent::ScoreChanged {
        score: state.progression.score,
    });
    spawn::spawn_explosion(state, enemy.center());

    let drop_at = Vec2::new(enemy.center().x - ITEM_SIZE / 2.0, enemy.pos.y);
    if let Some(kind) = enemy.boss.as_ref().and(enemy.kind.boss_kind()) {
        state.bosses.on_defeat();
        log::info!(
            "Boss {:?} defeated (kills: {}, next health x{})",
            kind,
            state.bosses.kill_count,
            state.bosses.health_multiplier
        );
        state.emit(GameEvent::BossDefeated { kind });
        spawn::spawn_item(state, drop_at, ItemKind::Power);
        return;
    }

    let drop = match template.guaranteed_drop {
        Some(GuaranteedDrop::Health) => Some(ItemKind::Health),
        None => {
            let roll = state.rng.random::<f64>();
            drop_for_roll(roll, state.player.health)
        }
    };
    log::debug!("{} killed, drop {:?}", template.name, drop);
    if let Some(kind) = drop {
        spawn::spawn_item(state, drop_at, kind);
    }
}

/// Regular drop policy for one uniform roll in [0, 1).
///
/// Health and score share the draw: health below 0.1 (only when hurt),
/// otherwise score below 0.5.
pub fn drop_for_roll(roll: f64, player_health: u8) -> Option<ItemKind> {
    if roll < 0.1 && player_health < PLAYER_MAX_HEALTH {
        Some(ItemKind::Health)
    } else if roll < 0.5 {
        Some(ItemKind::Score)
    } else {
        None
    }
}

/// Enemy bullets against the player's small hit circle.
/// Beams use the segment test and are not consumed by a hit.
fn resolve_enemy_shots(state: &mut GameState) {
    let center = state.player.center();
    for i in 0..state.enemy_bullets.len() {
        if state.player.invincible {
            break;
        }
        let b = &mut state.enemy_bullets[i];
        if b.dead {
            continue;
        }
        let hit = match b.beam_segment() {
            Some((start, end)) => {
                beam_hits_circle(start, end, b.size.x, center, PLAYER_HITBOX_RADIUS)
            }
            None => circle_rect_overlap(center, PLAYER_HITBOX_RADIUS, &b.hitbox()),
        };
        if !hit {
            continue;
        }
        if !b.is_laser() {
            b.dead = true;
        }
        damage_player(state, center);
    }
}

fn prune(state: &mut GameState) {
    let width = state.settings.arena_width;
    let height = state.settings.arena_height;
    let m = BULLET_CULL_MARGIN;

    state.player_bullets.retain(|b| b.pos.y > 0.0);
    state.enemy_bullets.retain(|b| {
        !b.dead
            && (b.is_laser()
                || (b.pos.x > -m && b.pos.x < width + m && b.pos.y > -m && b.pos.y < height + m))
    });
    state
        .enemies
        .retain(|e| !e.dead && (e.is_boss() || e.pos.y < height));
    state.items.retain(|i| !i.collected && i.pos.y < height);
}

fn collect_items(state: &mut GameState) {
    let catcher = state.player.hitbox();
    for i in 0..state.items.len() {
        if state.items[i].collected || !rects_overlap(&catcher, &state.items[i].hitbox()) {
            continue;
        }
        state.items[i].collected = true;
        let kind = state.items[i].kind;
        apply_item(state, kind);
    }
    state.items.retain(|i| !i.collected);
}

fn apply_item(state: &mut GameState, kind: ItemKind) {
    let now = state.clock_ms;
    match kind {
        ItemKind::Score => {
            state.progression.add_score(SCORE_ITEM_POINTS);
            state.emit(GameEvent::ScoreChanged {
                score: state.progression.score,
            });
            if state.progression.raise_attack_level(now) {
                let level = state.progression.attack_level;
                log::debug!("Attack level up: {}", level);
                state.emit(GameEvent::LevelUp { level });
                spawn::push_notification(state, NotificationKind::LevelUp);
            }
        }
        ItemKind::Health => {
            if state.player.health < PLAYER_MAX_HEALTH {
                state.player.health += 1;
                spawn::push_notification(state, NotificationKind::HealthUp);
            }
        }
        ItemKind::Power => {
            let note = match state.progression.apply_power() {
                PowerUp::ExtraBullet => NotificationKind::BulletUp,
                PowerUp::ExtraDamage => NotificationKind::DamageUp,
            };
            spawn::push_notification(state, note);
        }
    }
    state.emit(GameEvent::ItemCollected { kind });
}

fn end_game(state: &mut GameState) {
    let stats = GameOverStats {
        score: state.progression.score,
        enemies_killed: state.progression.enemies_killed,
        play_time_secs: state.game_time,
        max_attack_level_time_secs: state.progression.max_attack_level_secs,
    };
    state.phase = GamePhase::GameOver;
    state.game_over = Some(stats);
    log::info!(
        "Game over: score {}, {} kills, {:.1}s",
        stats.score,
        stats.enemies_killed,
        stats.play_time_secs
    );
    state.emit(GameEvent::GameOver(stats));
}

/// Demo pilot: keep firing, sidestep incoming fire, otherwise chase
/// items and then enemy columns.
fn steer_autopilot(state: &GameState, input: &mut TickInput) {
    const DODGE_WIDTH: f32 = 40.0;
    const LOOKAHEAD: f32 = 200.0;
    const DODGE_STEP: f32 = 60.0;

    input.fire = true;
    input.move_left = false;
    input.move_right = false;
    input.move_up = false;
    input.move_down = false;

    let center = state.player.center();
    let width = state.settings.arena_width;

    let bullet_threats = state
        .enemy_bullets
        .iter()
        .filter(|b| !b.dead && !b.is_laser())
        .map(|b| b.hitbox().center());
    let beam_threats = state
        .enemies
        .iter()
        .filter_map(Enemy::laser_target)
        .chain(
            state
                .enemies
                .iter()
                .filter_map(|e| e.boss.as_ref()?.giant_laser)
                .map(|c| Vec2::new(c.warning_x, center.y)),
        );
    let threat = bullet_threats
        .chain(beam_threats)
        .filter(|p| {
            (p.x - center.x).abs() < DODGE_WIDTH
                && p.y <= center.y + 10.0
                && center.y - p.y < LOOKAHEAD
        });
    let threat = nearest(threat, center);

    let target_x = if let Some(p) = threat {
        let away = if p.x >= center.x { -DODGE_STEP } else { DODGE_STEP };
        let dodge = center.x + away;
        if dodge < 0.0 || dodge > width {
            center.x - away
        } else {
            dodge
        }
    } else if let Some(item) = nearest(state.items.iter().map(|i| i.center()), center) {
        item.x
    } else if let Some(enemy) = nearest(state.enemies.iter().map(Enemy::center), center) {
        enemy.x
    } else {
        width / 2.0
    };

    let dx = target_x - center.x;
    let deadzone = state.player.speed / 2.0;
    if dx < -deadzone {
        input.move_left = true;
    } else if dx > deadzone {
        input.move_right = true;
    }

    // Drift back down to the spawn line after chasing an item
    let (_, spawn_y) = state.settings.player_spawn();
    if state.player.pos.y < spawn_y {
        input.move_down = true;
    }
}

fn nearest(points: impl Iterator<Item = Vec2>, to: Vec2) -> Option<Vec2> {
    points.min_by(|a, b| {
        a.distance_squared(to)
            .partial_cmp(&b.distance_squared(to))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
}
