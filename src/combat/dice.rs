//! Random rolls
//!
//! Every roll takes the random source explicitly so a battle seeded with a
//! fixed value replays the same way.

use rand::Rng;

/// Spread around effective power for a plain attack roll
pub const ATTACK_SPREAD: i32 = 5;

/// An inclusive integer range rolled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageRange {
    /// Lowest possible result
    pub min: i32,
    /// Highest possible result
    pub max: i32,
}

impl DamageRange {
    /// Create a new range
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Range centered on `center`, `spread` wide in each direction
    pub const fn around(center: i32, spread: i32) -> Self {
        Self {
            min: center - spread,
            max: center + spread,
        }
    }

    /// Range offset from a base value, e.g. power + 5 ..= power + 20
    pub const fn offset(base: i32, low: i32, high: i32) -> Self {
        Self {
            min: base + low,
            max: base + high,
        }
    }

    /// Roll the range
    pub fn roll<R: Rng>(&self, rng: &mut R) -> i32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

impl std::fmt::Display for DamageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Roll an independent chance. Values outside [0, 1] saturate.
pub fn roll_chance<R: Rng>(rng: &mut R, chance: f64) -> bool {
    if chance <= 0.0 {
        false
    } else if chance >= 1.0 {
        true
    } else {
        rng.random_bool(chance)
    }
}

/// Roll plain attack damage for the given effective power.
/// Negative rolls (possible at very low power) count as zero.
pub fn attack_roll<R: Rng>(rng: &mut R, effective_power: i32) -> i32 {
    DamageRange::around(effective_power, ATTACK_SPREAD)
        .roll(rng)
        .max(0)
}

/// Scale a damage value, truncating toward zero
pub fn scale(amount: i32, multiplier: f64) -> i32 {
    (amount as f64 * multiplier) as i32
}
