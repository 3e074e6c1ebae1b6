//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one [`GameState`] aggregate.
//! Hosts own it, feed it input through [`super::tick`] and read it back via
//! [`GameState::snapshot`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Hitbox;
use super::progression::{BossDirector, Progression};
use super::templates::{BossKind, EnemyKind, EnemyTemplate};
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Home screen, nothing simulated yet
    Title,
    /// Active gameplay
    Playing,
    /// Full freeze; no timers advance
    Paused,
    /// Player died; terminal until restart/home
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame
    pub speed: f32,
    /// 0..=3
    pub health: u8,
    pub invincible: bool,
    pub invincible_until_ms: f64,
    /// Blink state while invincible (renderer hides the ship when false)
    pub blink_visible: bool,
    pub last_blink_ms: f64,
}

impl Player {
    pub fn new(spawn: Vec2) -> Self {
        Self {
            pos: spawn,
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            health: PLAYER_MAX_HEALTH,
            invincible: false,
            invincible_until_ms: 0.0,
            blink_visible: true,
            last_blink_ms: 0.0,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Full sprite rectangle (used for item pickup)
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.size)
    }

    /// Begin the post-hit invincibility window
    pub fn start_invincibility(&mut self, now_ms: f64, duration_ms: f64) {
        self.invincible = true;
        self.invincible_until_ms = now_ms + duration_ms;
        self.last_blink_ms = now_ms;
        self.blink_visible = true;
    }

    /// Expire invincibility or advance the blink
    pub fn update_invincibility(&mut self, now_ms: f64, blink_interval_ms: f64) {
        if !self.invincible {
            return;
        }
        if now_ms >= self.invincible_until_ms {
            self.invincible = false;
            self.blink_visible = true;
        } else if now_ms - self.last_blink_ms >= blink_interval_ms {
            self.blink_visible = !self.blink_visible;
            self.last_blink_ms = now_ms;
        }
    }
}

/// Per-enemy behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Descending toward the bottom of the arena
    Moving,
    /// Drone: stopped, re-aiming at the player every tick
    Tracking { charge_started_ms: f64, target: Vec2 },
    /// Drone: stopped, aim frozen, waiting to fire
    Locked { charge_started_ms: f64, target: Vec2 },
    /// Boss: descending to its hover line
    Entering,
    /// Boss: sweeping side to side and attacking
    Hovering,
}

/// Boss attack rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPattern {
    Circular,
    Spiral,
    Wave,
    Concentrated,
    GiantLaser,
    DroneSummon,
}

impl BossPattern {
    pub fn from_index(index: u8) -> BossPattern {
        match index % BOSS_PATTERN_COUNT {
            0 => BossPattern::Circular,
            1 => BossPattern::Spiral,
            2 => BossPattern::Wave,
            3 => BossPattern::Concentrated,
            4 => BossPattern::GiantLaser,
            _ => BossPattern::DroneSummon,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            BossPattern::Circular => 0,
            BossPattern::Spiral => 1,
            BossPattern::Wave => 2,
            BossPattern::Concentrated => 3,
            BossPattern::GiantLaser => 4,
            BossPattern::DroneSummon => 5,
        }
    }

    pub fn next(self) -> BossPattern {
        BossPattern::from_index(self.index() + 1)
    }
}

/// A giant-laser charge in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GiantLaserCharge {
    pub started_ms: f64,
    /// Column (beam centerline x) picked when charging began
    pub warning_x: f32,
}

/// Boss-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossBrain {
    pub target_y: f32,
    pub arrived: bool,
    /// +1 right, -1 left
    pub move_dir: f32,
    pub pattern: BossPattern,
    pub last_pattern_change_ms: f64,
    pub giant_laser: Option<GiantLaserCharge>,
}

/// An enemy instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub health: i32,
    pub max_health: i32,
    pub state: EnemyState,
    pub last_shot_ms: Option<f64>,
    pub boss: Option<BossBrain>,
    pub spawned_by_boss: bool,
    /// Marked for removal (rammed the player)
    pub dead: bool,
}

impl Enemy {
    #[inline]
    pub fn template(&self) -> &'static EnemyTemplate {
        self.kind.template()
    }

    #[inline]
    pub fn is_boss(&self) -> bool {
        self.template().is_boss
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision rectangle, inflated by the template's hitbox scale
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::scaled(self.pos, self.size, self.template().hitbox_scale)
    }

    /// Where a drone is aiming, if it is charging
    pub fn laser_target(&self) -> Option<Vec2> {
        match self.state {
            EnemyState::Tracking { target, .. } | EnemyState::Locked { target, .. } => Some(target),
            _ => None,
        }
    }
}

/// A player shot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerBullet {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward pixels per frame
    pub speed: f32,
    pub damage: i32,
}

impl PlayerBullet {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.size)
    }
}

/// Visual family of ring-shaped boss bullets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbStyle {
    Ring,
    Spiral,
    Wave,
    Concentrated,
}

/// A beam that grows from a fixed origin instead of moving
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaserBeam {
    pub angle: f32,
    pub length: f32,
    pub max_length: f32,
    /// Length gained per frame
    pub expand_speed: f32,
    /// Frames alive
    pub lifetime: f32,
    pub max_lifetime: f32,
    pub alpha: f32,
    pub giant: bool,
}

/// Enemy projectile variants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyBulletKind {
    Aimed { vel: Vec2 },
    Spread { vel: Vec2 },
    Orb { vel: Vec2, style: OrbStyle },
    Homing { vel: Vec2, speed: f32, turn_rate: f32 },
    Laser(LaserBeam),
}

/// An enemy projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyBullet {
    /// Top-left corner; for lasers, the beam origin on its centerline
    pub pos: Vec2,
    /// For lasers, `size.x` is the beam width
    pub size: Vec2,
    pub damage: i32,
    pub kind: EnemyBulletKind,
    pub dead: bool,
}

impl EnemyBullet {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.size)
    }

    pub fn is_laser(&self) -> bool {
        matches!(self.kind, EnemyBulletKind::Laser(_))
    }

    /// Beam centerline (start, end) for lasers
    pub fn beam_segment(&self) -> Option<(Vec2, Vec2)> {
        match self.kind {
            EnemyBulletKind::Laser(beam) => {
                let end = self.pos + crate::direction_from_angle(beam.angle) * beam.length;
                Some((self.pos, end))
            }
            _ => None,
        }
    }
}

/// Drop types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// +10 score and +1 attack level
    Score,
    /// +1 health
    Health,
    /// +1 bullet, or +1 damage once bullets are maxed
    Power,
}

/// A pickup falling through the arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Free-fall pixels per frame
    pub speed: f32,
    pub collected: bool,
}

impl Item {
    pub fn hitbox(&self) -> Hitbox {
        Hitbox::new(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Frames left
    pub life: f32,
    /// Hue in degrees for the renderer
    pub hue: f32,
}

/// Floating pickup feedback text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    LevelUp,
    HealthUp,
    BulletUp,
    DamageUp,
}

impl NotificationKind {
    pub fn text(self) -> &'static str {
        match self {
            NotificationKind::LevelUp => "LEVEL UP!",
            NotificationKind::HealthUp => "HEALTH UP!",
            NotificationKind::BulletUp => "BULLET +1!",
            NotificationKind::DamageUp => "DAMAGE +1!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub pos: Vec2,
    pub alpha: f32,
    pub created_ms: f64,
}

/// Background star
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Homing missiles still owed by a burst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomingBurst {
    pub shooter_id: u32,
    pub remaining: u8,
    pub next_fire_ms: f64,
}

/// Final statistics reported at game over
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameOverStats {
    pub score: u64,
    pub enemies_killed: u32,
    pub play_time_secs: f64,
    pub max_attack_level_time_secs: f64,
}

/// Discrete notifications for the host (sound, UI, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ScoreChanged { score: u64 },
    ItemCollected { kind: ItemKind },
    LevelUp { level: u8 },
    EnemyKilled { kind: EnemyKind },
    PlayerHit { health: u8 },
    BossWarning { kind: BossKind },
    BossSpawned { kind: BossKind },
    BossDefeated { kind: BossKind },
    PauseChanged { paused: bool },
    GameOver(GameOverStats),
}

/// Timestamps of the last periodic actions (None = never, i.e. due now)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    pub last_enemy_spawn_ms: Option<f64>,
    pub last_enemy_shot_ms: Option<f64>,
    pub last_player_shot_ms: Option<f64>,
}

impl Cadence {
    /// Has `interval_ms` elapsed since `last`?
    #[inline]
    pub fn due(last: Option<f64>, now_ms: f64, interval_ms: f64) -> bool {
        last.is_none_or(|t| now_ms - t >= interval_ms)
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation clock (ms since start); only advances while playing
    pub clock_ms: f64,
    /// Host timestamp of the previous tick
    pub last_frame_ms: Option<f64>,
    /// Frame-counted game time in seconds (drives difficulty)
    pub game_time: f64,
    pub player: Player,
    pub player_bullets: Vec<PlayerBullet>,
    pub enemies: Vec<Enemy>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub items: Vec<Item>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub notifications: Vec<Notification>,
    pub stars: Vec<Star>,
    pub homing_bursts: Vec<HomingBurst>,
    pub progression: Progression,
    pub bosses: BossDirector,
    pub cadence: Cadence,
    pub game_over: Option<GameOverStats>,
    events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a session on the title screen
    pub fn new(settings: Settings, seed: u64) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        Self::with_rng(settings, seed, rng)
    }

    fn with_rng(settings: Settings, seed: u64, mut rng: Pcg32) -> Self {
        let (x, y) = settings.player_spawn();
        let stars = (0..settings.star_count)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * settings.arena_width,
                    rng.random::<f32>() * settings.arena_height,
                ),
                size: rng.random::<f32>() * 1.5 + 0.3,
                speed: rng.random::<f32>() * 3.0 + 1.0,
            })
            .collect();

        Self {
            settings,
            seed,
            rng,
            phase: GamePhase::Title,
            clock_ms: 0.0,
            last_frame_ms: None,
            game_time: 0.0,
            player: Player::new(Vec2::new(x, y)),
            player_bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            notifications: Vec::new(),
            stars,
            homing_bursts: Vec::new(),
            progression: Progression::new(),
            bosses: BossDirector::new(),
            cadence: Cadence::default(),
            game_over: None,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Queue an event for the host
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events queued but not yet drained
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Leave the title screen and begin play
    pub fn start(&mut self, now_ms: f64) {
        if self.phase != GamePhase::Title {
            return;
        }
        self.phase = GamePhase::Playing;
        self.last_frame_ms = Some(now_ms);
        log::info!("Game started (seed {})", self.seed);
    }

    /// Discard the session and immediately play a fresh one
    pub fn restart(&mut self, now_ms: f64) {
        self.reset();
        self.phase = GamePhase::Playing;
        self.last_frame_ms = Some(now_ms);
        log::info!("Game restarted");
    }

    /// Discard the session and go back to the title screen
    pub fn return_home(&mut self) {
        self.reset();
        log::info!("Returned to title");
    }

    /// Freeze or unfreeze play. No-op outside Playing/Paused.
    pub fn toggle_pause(&mut self) {
        let paused = match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                true
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                false
            }
            _ => return,
        };
        self.emit(GameEvent::PauseChanged { paused });
    }

    /// Reinitialise everything except settings, seed and the RNG stream
    fn reset(&mut self) {
        let settings = self.settings.clone();
        let rng = self.rng.clone();
        *self = Self::with_rng(settings, self.seed, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_title() {
        let state = GameState::new(Settings::default(), 1);
        assert_eq!(state.phase, GamePhase::Title);
        assert_eq!(state.player.pos, Vec2::new(280.0, 750.0));
        assert_eq!(state.player.health, 3);
        assert_eq!(state.stars.len(), STAR_COUNT);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_pause_toggle_only_while_playing() {
        let mut state = GameState::new(Settings::default(), 1);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Title);

        state.start(0.0);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::PauseChanged { paused: true },
                GameEvent::PauseChanged { paused: false }
            ]
        );
    }

    #[test]
    fn test_invincibility_blinks_then_expires() {
        let mut player = Player::new(Vec2::ZERO);
        player.start_invincibility(1000.0, 1500.0);
        player.update_invincibility(1050.0, 100.0);
        assert!(player.blink_visible);
        player.update_invincibility(1100.0, 100.0);
        assert!(!player.blink_visible);
        player.update_invincibility(2500.0, 100.0);
        assert!(!player.invincible);
        assert!(player.blink_visible);
    }

    #[test]
    fn test_boss_pattern_cycle() {
        let mut pattern = BossPattern::Circular;
        for expected in 1..=6u8 {
            pattern = pattern.next();
            assert_eq!(pattern.index(), expected % 6);
        }
        assert_eq!(pattern, BossPattern::Circular);
    }

    #[test]
    fn test_cadence_due() {
        assert!(Cadence::due(None, 0.0, 500.0));
        assert!(!Cadence::due(Some(100.0), 599.0, 500.0));
        assert!(Cadence::due(Some(100.0), 600.0, 500.0));
    }
}
