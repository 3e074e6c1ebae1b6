//! Difficulty curve
//!
//! Pure functions of elapsed game time `t` (seconds, never negative).

use rand::Rng;

/// Milliseconds between regular enemy spawns.
pub fn spawn_interval(t: f64) -> f64 {
    (2000.0 - (t * 8.0).min(1400.0)).max(600.0)
}

/// Milliseconds between enemy shots.
pub fn shoot_interval(t: f64) -> f64 {
    (1500.0 - (t * 10.0).min(1000.0)).max(500.0)
}

/// How many enemies a spawn wave contains.
///
/// | t (s)   | 1   | 2   | 3   |
/// |---------|-----|-----|-----|
/// | < 30    | 100%| -   | -   |
/// | 30..60  | 70% | 30% | -   |
/// | 60..90  | 50% | 50% | -   |
/// | >= 90   | 21% | 70% | 9%  |
///
/// The last row takes two draws: 70% for two, then 30% of the rest for three.
pub fn spawn_count(t: f64, rng: &mut impl Rng) -> u32 {
    if t < 30.0 {
        return 1;
    }
    if t < 60.0 {
        return if rng.random::<f64>() < 0.3 { 2 } else { 1 };
    }
    if t < 90.0 {
        return if rng.random::<f64>() < 0.5 { 2 } else { 1 };
    }
    if rng.random::<f64>() < 0.7 {
        2
    } else if rng.random::<f64>() < 0.3 {
        3
    } else {
        1
    }
}
