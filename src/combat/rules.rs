//! Tunable combat constants
//!
//! Loaded as part of the application config; defaults reproduce the
//! standard encounter.

use serde::{Deserialize, Serialize};

/// Relative weights for the adversary's action categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub attack: f64,
    pub skill: f64,
    pub item: f64,
}

impl CategoryWeights {
    pub const fn new(attack: f64, skill: f64, item: f64) -> Self {
        Self {
            attack,
            skill,
            item,
        }
    }

    /// All weights finite, non-negative, and attack + skill positive
    pub fn is_valid(&self) -> bool {
        let all = [self.attack, self.skill, self.item];
        all.iter().all(|w| w.is_finite() && *w >= 0.0) && self.attack + self.skill > 0.0
    }
}

/// Combat rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Chance that a venom-style attack turns into a poison strike
    pub venom_chance: f64,
    /// Chance that a mending-style attack turns into a heal
    pub mending_chance: f64,
    /// Adversary enters phase two at or below this HP fraction
    pub phase_threshold: f64,
    /// Power multiplier applied once on entering phase two
    pub phase_power_multiplier: f64,
    /// Per-target stun chance of the stomp skill
    pub stomp_stun_chance: f64,
    pub phase_one_weights: CategoryWeights,
    pub phase_two_weights: CategoryWeights,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            venom_chance: 0.6,
            mending_chance: 0.7,
            phase_threshold: 0.5,
            phase_power_multiplier: 1.3,
            stomp_stun_chance: 0.4,
            phase_one_weights: CategoryWeights::new(0.5, 0.3, 0.2),
            phase_two_weights: CategoryWeights::new(0.4, 0.5, 0.1),
        }
    }
}

impl CombatRules {
    /// Check ranges, returning a description of the first problem
    pub fn validate(&self) -> Result<(), String> {
        let chances = [
            ("venom_chance", self.venom_chance),
            ("mending_chance", self.mending_chance),
            ("phase_threshold", self.phase_threshold),
            ("stomp_stun_chance", self.stomp_stun_chance),
        ];
        for (name, value) in chances {
            if !(0.0..=1.0).contains(&value) {
                return Err(format!("{} must be between 0 and 1, got {}", name, value));
            }
        }
        if !self.phase_power_multiplier.is_finite() || self.phase_power_multiplier <= 0.0 {
            return Err(format!(
                "phase_power_multiplier must be positive, got {}",
                self.phase_power_multiplier
            ));
        }
        if !self.phase_one_weights.is_valid() || !self.phase_two_weights.is_valid() {
            return Err("category weights must be non-negative with attack + skill > 0".into());
        }
        Ok(())
    }
}
