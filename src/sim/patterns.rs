//! Enemy attack patterns
//!
//! Each function appends bullets to the enemy-bullet collection. Angles are
//! measured from the shooter's center with y growing downward, so `PI / 2`
//! points straight at the bottom of the arena.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;

use super::state::{Enemy, EnemyBullet, EnemyBulletKind, LaserBeam, OrbStyle};
use super::templates::EnemyKind;
use crate::{angle_between, direction_from_angle};

const AIMED_SPEED: f32 = 4.0;
const RING_SPEED: f32 = 3.0;
const WAVE_SPEED: f32 = 4.0;
const CONCENTRATED_SPEED: f32 = 5.0;
const SPIRAL_COUNT: u32 = 12;
const WAVE_COUNT: u32 = 16;
const CONCENTRATED_STEP: f32 = PI / 24.0;

const HOMING_SPEED: f32 = 3.0;
const HOMING_LAUNCH_SPEED: f32 = 2.0;
const HOMING_TURN_RATE: f32 = 0.05;

const DRONE_LASER_WIDTH: f32 = 8.0;
const DRONE_LASER_EXPAND: f32 = 30.0;
const GIANT_LASER_EXPAND: f32 = 50.0;
/// Frames a beam stays up (about one second)
const LASER_LIFETIME: f32 = 60.0;

/// Position and size of whoever is firing, copied out of the enemy list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shooter {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Shooter {
    pub fn of(enemy: &Enemy) -> Self {
        Self {
            id: enemy.id,
            kind: enemy.kind,
            pos: enemy.pos,
            size: enemy.size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Middle of the bottom edge, where aimed shots leave the hull
    #[inline]
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

fn orb(center: Vec2, size: f32, angle: f32, speed: f32, style: OrbStyle) -> EnemyBullet {
    EnemyBullet {
        pos: center - Vec2::splat(size / 2.0),
        size: Vec2::splat(size),
        damage: 1,
        kind: EnemyBulletKind::Orb {
            vel: direction_from_angle(angle) * speed,
            style,
        },
        dead: false,
    }
}

/// Evenly spaced ring of `count` bullets starting at `offset`
fn ring(
    out: &mut Vec<EnemyBullet>,
    center: Vec2,
    count: u32,
    offset: f32,
    size: f32,
    speed: f32,
    style: OrbStyle,
) {
    for i in 0..count {
        let angle = TAU / count as f32 * i as f32 + offset;
        out.push(orb(center, size, angle, speed, style));
    }
}

/// One bullet along `angle`
pub fn fire_single(out: &mut Vec<EnemyBullet>, shooter: &Shooter, angle: f32) {
    let muzzle = shooter.muzzle();
    out.push(EnemyBullet {
        pos: Vec2::new(muzzle.x - 4.0, muzzle.y),
        size: Vec2::new(8.0, 14.0),
        damage: 1,
        kind: EnemyBulletKind::Aimed {
            vel: direction_from_angle(angle) * AIMED_SPEED,
        },
        dead: false,
    });
}

/// Fan of `count` bullets centered on `angle`, `step` radians apart
pub fn fire_spread(
    out: &mut Vec<EnemyBullet>,
    shooter: &Shooter,
    angle: f32,
    count: u32,
    step: f32,
) {
    let muzzle = shooter.muzzle();
    let half = (count / 2) as f32;
    for i in 0..count {
        let a = angle + (i as f32 - half) * step;
        out.push(EnemyBullet {
            pos: Vec2::new(muzzle.x - 4.0, muzzle.y),
            size: Vec2::new(8.0, 14.0),
            damage: 1,
            kind: EnemyBulletKind::Spread {
                vel: direction_from_angle(a) * AIMED_SPEED,
            },
            dead: false,
        });
    }
}

/// Ring of `count` bullets over the full circle
pub fn fire_circular(out: &mut Vec<EnemyBullet>, shooter: &Shooter, count: u32) {
    ring(out, shooter.center(), count, 0.0, 10.0, RING_SPEED, OrbStyle::Ring);
}

/// Ring of 12 whose phase rotates with the clock
pub fn fire_spiral(out: &mut Vec<EnemyBullet>, shooter: &Shooter, now_ms: f64) {
    let offset = ((now_ms / 50.0) % std::f64::consts::TAU) as f32;
    ring(out, shooter.center(), SPIRAL_COUNT, offset, 10.0, RING_SPEED, OrbStyle::Spiral);
}

/// Dense, faster ring of 16 larger bullets
pub fn fire_wave(out: &mut Vec<EnemyBullet>, shooter: &Shooter) {
    ring(out, shooter.center(), WAVE_COUNT, 0.0, 12.0, WAVE_SPEED, OrbStyle::Wave);
}

/// Five fast bullets in a tight fan at the player
pub fn fire_concentrated(out: &mut Vec<EnemyBullet>, shooter: &Shooter, player_center: Vec2) {
    let center = shooter.center();
    let aim = angle_between(center, player_center);
    for i in -2..=2 {
        let angle = aim + i as f32 * CONCENTRATED_STEP;
        out.push(orb(center, 10.0, angle, CONCENTRATED_SPEED, OrbStyle::Concentrated));
    }
}

/// A slow missile that steers toward the player every tick
pub fn fire_homing(out: &mut Vec<EnemyBullet>, shooter: &Shooter) {
    let muzzle = shooter.muzzle();
    out.push(EnemyBullet {
        pos: Vec2::new(muzzle.x - 5.0, muzzle.y),
        size: Vec2::new(10.0, 15.0),
        damage: 1,
        kind: EnemyBulletKind::Homing {
            vel: Vec2::new(0.0, HOMING_LAUNCH_SPEED),
            speed: HOMING_SPEED,
            turn_rate: HOMING_TURN_RATE,
        },
        dead: false,
    });
}

fn beam(
    origin: Vec2,
    width: f32,
    damage: i32,
    angle: f32,
    max_length: f32,
    expand_speed: f32,
    giant: bool,
) -> EnemyBullet {
    EnemyBullet {
        pos: origin,
        size: Vec2::new(width, 0.0),
        damage,
        kind: EnemyBulletKind::Laser(LaserBeam {
            angle,
            length: 0.0,
            max_length,
            expand_speed,
            lifetime: 0.0,
            max_lifetime: LASER_LIFETIME,
            alpha: 1.0,
            giant,
        }),
        dead: false,
    }
}

/// Drone beam from `origin` through the locked `target`, at least as long as the arena is tall
pub fn fire_drone_laser(out: &mut Vec<EnemyBullet>, origin: Vec2, target: Vec2, arena_height: f32) {
    let angle = angle_between(origin, target);
    let max_length = origin.distance(target).max(arena_height);
    out.push(beam(origin, DRONE_LASER_WIDTH, 1, angle, max_length, DRONE_LASER_EXPAND, false));
}

/// Boss beam straight down the warning column
pub fn fire_giant_laser(
    out: &mut Vec<EnemyBullet>,
    column_x: f32,
    top_y: f32,
    width: f32,
    arena_height: f32,
) {
    let origin = Vec2::new(column_x, top_y);
    out.push(beam(origin, width, 2, FRAC_PI_2, arena_height, GIANT_LASER_EXPAND, true));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shooter() -> Shooter {
        Shooter {
            id: 1,
            kind: EnemyKind::Commander,
            pos: Vec2::new(200.0, 100.0),
            size: Vec2::new(200.0, 200.0),
        }
    }

    fn vel(b: &EnemyBullet) -> Vec2 {
        match b.kind {
            EnemyBulletKind::Aimed { vel }
            | EnemyBulletKind::Spread { vel }
            | EnemyBulletKind::Orb { vel, .. }
            | EnemyBulletKind::Homing { vel, .. } => vel,
            EnemyBulletKind::Laser(_) => Vec2::ZERO,
        }
    }

    #[test]
    fn test_circular_is_evenly_spaced_from_center() {
        let mut out = Vec::new();
        fire_circular(&mut out, &shooter(), 8);
        assert_eq!(out.len(), 8);
        let sum: Vec2 = out.iter().map(vel).sum();
        assert!(sum.length() < 1e-3, "ring should cancel out: {sum}");
        for b in &out {
            assert_eq!(b.pos + b.size / 2.0, Vec2::new(300.0, 200.0));
            assert!((vel(b).length() - RING_SPEED).abs() < 1e-4);
        }
        let a0 = vel(&out[0]).y.atan2(vel(&out[0]).x);
        let a1 = vel(&out[1]).y.atan2(vel(&out[1]).x);
        assert!((a1 - a0 - TAU / 8.0).abs() < 1e-4);
    }

    #[test]
    fn test_spread_centers_on_aim() {
        let mut out = Vec::new();
        fire_spread(&mut out, &shooter(), FRAC_PI_2, 3, PI / 6.0);
        assert_eq!(out.len(), 3);
        let middle = vel(&out[1]);
        assert!(middle.x.abs() < 1e-4 && middle.y > 0.0);
        let left = vel(&out[0]);
        let right = vel(&out[2]);
        assert!((left.x + right.x).abs() < 1e-4);
    }

    #[test]
    fn test_concentrated_aims_at_player() {
        let mut out = Vec::new();
        fire_concentrated(&mut out, &shooter(), Vec2::new(300.0, 700.0));
        assert_eq!(out.len(), 5);
        let middle = vel(&out[2]);
        assert!(middle.x.abs() < 1e-4);
        assert!((middle.y - CONCENTRATED_SPEED).abs() < 1e-4);
    }

    #[test]
    fn test_spiral_rotates_with_clock() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        fire_spiral(&mut a, &shooter(), 0.0);
        fire_spiral(&mut b, &shooter(), 25.0);
        assert_eq!(a.len(), 12);
        assert_ne!(vel(&a[0]), vel(&b[0]));
    }

    #[test]
    fn test_lasers_start_with_zero_length() {
        let mut out = Vec::new();
        fire_drone_laser(&mut out, Vec2::new(100.0, 100.0), Vec2::new(100.0, 300.0), 800.0);
        fire_giant_laser(&mut out, 300.0, 300.0, 80.0, 800.0);
        for b in &out {
            let EnemyBulletKind::Laser(beam) = b.kind else {
                panic!("expected laser");
            };
            assert_eq!(beam.length, 0.0);
            assert!((beam.angle - FRAC_PI_2).abs() < 1e-4);
            assert_eq!(beam.max_length, 800.0);
        }
        assert_eq!(out[0].damage, 1);
        assert_eq!(out[1].damage, 2);
        assert_eq!(out[1].size.x, 80.0);
    }

    #[test]
    fn test_homing_launches_downward() {
        let mut out = Vec::new();
        fire_homing(&mut out, &shooter());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, Vec2::new(295.0, 300.0));
        assert_eq!(vel(&out[0]), Vec2::new(0.0, 2.0));
    }
}
