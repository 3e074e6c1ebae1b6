//! Enemy type registry
//!
//! Templates are immutable process-wide data. Instances refer to them by
//! [`EnemyKind`] and look them up with [`EnemyKind::template`].

use serde::{Deserialize, Serialize};

/// Every enemy type in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Bee,
    Butterfly,
    Moth,
    Drone,
    Commander,
    Flagship,
}

/// The two bosses, alternating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossKind {
    Commander,
    Flagship,
}

impl BossKind {
    pub fn enemy_kind(self) -> EnemyKind {
        match self {
            BossKind::Commander => EnemyKind::Commander,
            BossKind::Flagship => EnemyKind::Flagship,
        }
    }

    /// The boss that follows this one
    pub fn next(self) -> BossKind {
        match self {
            BossKind::Commander => BossKind::Flagship,
            BossKind::Flagship => BossKind::Commander,
        }
    }
}

/// Attack behaviour, with the parameters each one needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AttackKind {
    /// One aimed bullet
    Single,
    /// A fan of `count` aimed bullets, `step` radians apart
    Spread { count: u32, step: f32 },
    /// A ring of `count` bullets
    Circular { count: u32 },
    /// Stops near the player, tracks, locks, then fires a beam
    Laser {
        stop_distance: f32,
        charge_ms: f64,
        fire_delay_ms: f64,
    },
    /// Homing missiles plus an occasional ring of `count`
    Homing { count: u32 },
}

/// Drop an enemy always leaves behind, bypassing the random roll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuaranteedDrop {
    Health,
}

/// Immutable enemy descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub name: &'static str,
    pub width: f32,
    pub height: f32,
    pub hitbox_scale: f32,
    pub health: i32,
    pub score: u64,
    /// Pixels per frame
    pub speed: f32,
    pub attack: AttackKind,
    pub is_boss: bool,
    pub is_final_boss: bool,
    pub guaranteed_drop: Option<GuaranteedDrop>,
}

pub static BEE: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Bee,
    name: "Bee",
    width: 30.0,
    height: 30.0,
    hitbox_scale: 1.3,
    health: 1,
    score: 50,
    speed: 2.0,
    attack: AttackKind::Single,
    is_boss: false,
    is_final_boss: false,
    guaranteed_drop: None,
};

pub static BUTTERFLY: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Butterfly,
    name: "Butterfly",
    width: 35.0,
    height: 35.0,
    hitbox_scale: 1.3,
    health: 2,
    score: 100,
    speed: 1.5,
    attack: AttackKind::Spread {
        count: 3,
        step: std::f32::consts::FRAC_PI_6,
    },
    is_boss: false,
    is_final_boss: false,
    guaranteed_drop: None,
};

pub static MOTH: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Moth,
    name: "Moth",
    width: 40.0,
    height: 40.0,
    hitbox_scale: 1.3,
    health: 2,
    score: 150,
    speed: 1.8,
    attack: AttackKind::Single,
    is_boss: false,
    is_final_boss: false,
    guaranteed_drop: Some(GuaranteedDrop::Health),
};

pub static DRONE: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Drone,
    name: "Drone",
    width: 25.0,
    height: 25.0,
    hitbox_scale: 1.4,
    health: 3,
    score: 80,
    speed: 2.5,
    attack: AttackKind::Laser {
        stop_distance: 450.0,
        charge_ms: 2000.0,
        fire_delay_ms: 1000.0,
    },
    is_boss: false,
    is_final_boss: false,
    guaranteed_drop: None,
};

pub static COMMANDER: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Commander,
    name: "Commander",
    width: 200.0,
    height: 200.0,
    hitbox_scale: 1.0,
    health: 100,
    score: 500,
    speed: 1.0,
    attack: AttackKind::Circular { count: 8 },
    is_boss: true,
    is_final_boss: false,
    guaranteed_drop: None,
};

pub static FLAGSHIP: EnemyTemplate = EnemyTemplate {
    kind: EnemyKind::Flagship,
    name: "Flagship",
    width: 200.0,
    height: 200.0,
    hitbox_scale: 1.0,
    health: 300,
    score: 2000,
    speed: 0.5,
    attack: AttackKind::Homing { count: 12 },
    is_boss: true,
    is_final_boss: true,
    guaranteed_drop: None,
};

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Bee,
        EnemyKind::Butterfly,
        EnemyKind::Moth,
        EnemyKind::Drone,
        EnemyKind::Commander,
        EnemyKind::Flagship,
    ];

    #[inline]
    pub fn template(self) -> &'static EnemyTemplate {
        match self {
            EnemyKind::Bee => &BEE,
            EnemyKind::Butterfly => &BUTTERFLY,
            EnemyKind::Moth => &MOTH,
            EnemyKind::Drone => &DRONE,
            EnemyKind::Commander => &COMMANDER,
            EnemyKind::Flagship => &FLAGSHIP,
        }
    }

    /// Weighted pick for regular spawns from a roll in [0, 100):
    /// Bee 50%, Butterfly 25%, Moth 15%, Drone 10%.
    pub fn from_spawn_roll(roll: f32) -> EnemyKind {
        if roll < 50.0 {
            EnemyKind::Bee
        } else if roll < 75.0 {
            EnemyKind::Butterfly
        } else if roll < 90.0 {
            EnemyKind::Moth
        } else {
            EnemyKind::Drone
        }
    }

    pub fn boss_kind(self) -> Option<BossKind> {
        match self {
            EnemyKind::Commander => Some(BossKind::Commander),
            EnemyKind::Flagship => Some(BossKind::Flagship),
            _ => None,
        }
    }

    /// Ring size used by circular patterns
    pub fn ring_count(self) -> u32 {
        match self.template().attack {
            AttackKind::Circular { count } | AttackKind::Homing { count } => count,
            _ => 8,
        }
    }
}
