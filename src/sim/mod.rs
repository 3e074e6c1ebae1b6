//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes only from the host timestamp passed to [`tick`]
//! - Seeded RNG only
//! - Stable iteration order (insertion order of each collection)
//! - No rendering or platform dependencies

pub mod ai;
pub mod collision;
pub mod difficulty;
pub mod patterns;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod templates;
pub mod tick;

pub use collision::{Hitbox, beam_hits_circle, circle_rect_overlap, rects_overlap};
pub use progression::{BossDirector, PowerUp, Progression};
pub use snapshot::{Hud, LaserWarning, RenderSnapshot};
pub use state::{
    BossPattern, Enemy, EnemyBullet, EnemyBulletKind, EnemyState, GameEvent, GameOverStats,
    GamePhase, GameState, Item, ItemKind, NotificationKind, Player,
};
pub use templates::{AttackKind, BossKind, EnemyKind, EnemyTemplate};
pub use tick::{TickInput, frame_delta, tick};
