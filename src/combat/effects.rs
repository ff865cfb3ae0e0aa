//! Status effects system
//!
//! Timed modifiers attached to a single unit:
//! - Poison and regeneration tick once per round
//! - Shields absorb incoming damage until spent
//! - Strength buffs raise effective power while active
//! - Stun costs the unit its turn
//!
//! Effects of the same type stack independently; each instance keeps its own
//! countdown and payload.

use serde::{Deserialize, Serialize};

/// Types of status effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    /// Takes damage every round
    Poison,
    /// Absorbs incoming damage
    Shield,
    /// Increased power
    StrengthBuff,
    /// Heals every round
    Regeneration,
    /// Cannot act
    Stun,
}

impl std::fmt::Display for EffectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            EffectType::Poison => "poison",
            EffectType::Shield => "shield",
            EffectType::StrengthBuff => "strength",
            EffectType::Regeneration => "regeneration",
            EffectType::Stun => "stun",
        };
        write!(f, "{}", s)
    }
}

/// Effect payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    Poison { damage_per_turn: i32 },
    Shield { capacity: i32, remaining: i32 },
    StrengthBuff { power_bonus: i32 },
    Regeneration { heal_per_turn: i32 },
    Stun,
}

/// A status effect instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Payload
    pub effect: Effect,
    /// Remaining duration in rounds
    pub remaining_rounds: u32,
}

impl StatusEffect {
    /// Create a new status effect. Duration is at least one round.
    pub fn new(effect: Effect, duration: u32) -> Self {
        Self {
            effect,
            remaining_rounds: duration.max(1),
        }
    }

    /// Damage over time
    pub fn poison(duration: u32, damage_per_turn: i32) -> Self {
        Self::new(Effect::Poison { damage_per_turn }, duration)
    }

    /// Damage absorption, starts full
    pub fn shield(duration: u32, capacity: i32) -> Self {
        Self::new(
            Effect::Shield {
                capacity,
                remaining: capacity,
            },
            duration,
        )
    }

    pub fn strength(duration: u32, power_bonus: i32) -> Self {
        Self::new(Effect::StrengthBuff { power_bonus }, duration)
    }

    pub fn regeneration(duration: u32, heal_per_turn: i32) -> Self {
        Self::new(Effect::Regeneration { heal_per_turn }, duration)
    }

    pub fn stun(duration: u32) -> Self {
        Self::new(Effect::Stun, duration)
    }

    /// Type tag of this effect
    pub fn effect_type(&self) -> EffectType {
        match self.effect {
            Effect::Poison { .. } => EffectType::Poison,
            Effect::Shield { .. } => EffectType::Shield,
            Effect::StrengthBuff { .. } => EffectType::StrengthBuff,
            Effect::Regeneration { .. } => EffectType::Regeneration,
            Effect::Stun => EffectType::Stun,
        }
    }

    /// Power contributed while active
    pub fn power_bonus(&self) -> i32 {
        match self.effect {
            Effect::StrengthBuff { power_bonus } => power_bonus,
            _ => 0,
        }
    }

    /// Shield points left (0 for non-shields)
    pub fn remaining_shield(&self) -> i32 {
        match self.effect {
            Effect::Shield { remaining, .. } => remaining.max(0),
            _ => 0,
        }
    }

    /// Absorb damage, returning the amount absorbed
    pub fn absorb(&mut self, damage: i32) -> i32 {
        match &mut self.effect {
            Effect::Shield { remaining, .. } if damage > 0 && *remaining > 0 => {
                let absorbed = damage.min(*remaining);
                *remaining -= absorbed;
                absorbed
            }
            _ => 0,
        }
    }

    /// Count down one round. Returns true once the effect has run out.
    pub fn countdown(&mut self) -> bool {
        self.remaining_rounds = self.remaining_rounds.saturating_sub(1);
        self.is_expired()
    }

    /// Check if effect has expired
    pub fn is_expired(&self) -> bool {
        self.remaining_rounds == 0
    }
}

impl std::fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.effect_type(), self.remaining_rounds)
    }
}

/// What one effect did during a round tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectTick {
    pub effect_type: EffectType,
    /// HP lost (poison) or healed (regeneration)
    pub amount: i32,
    /// Whether the effect ran out and was removed
    pub expired: bool,
}

impl EffectTick {
    pub fn applied(effect_type: EffectType, amount: i32) -> Self {
        Self {
            effect_type,
            amount,
            expired: false,
        }
    }

    pub fn expired(effect_type: EffectType) -> Self {
        Self {
            effect_type,
            amount: 0,
            expired: true,
        }
    }
}

/// Active effects on a single unit, in application order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectList {
    effects: Vec<StatusEffect>,
}

impl EffectList {
    /// Create new empty effects
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect; instances of the same type stack
    pub fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&StatusEffect> {
        self.effects.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut StatusEffect> {
        self.effects.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Remove the effect at `index`
    pub fn remove_at(&mut self, index: usize) -> StatusEffect {
        self.effects.remove(index)
    }

    /// Check if a specific effect is present
    pub fn has(&self, effect_type: EffectType) -> bool {
        self.effects.iter().any(|e| e.effect_type() == effect_type)
    }

    /// Number of stacked instances of a type
    pub fn count(&self, effect_type: EffectType) -> usize {
        self.effects
            .iter()
            .filter(|e| e.effect_type() == effect_type)
            .count()
    }

    /// Sum of active strength bonuses
    pub fn power_bonus(&self) -> i32 {
        self.effects.iter().map(StatusEffect::power_bonus).sum()
    }

    /// Total shield points left across all shields
    pub fn shield_points(&self) -> i32 {
        self.effects.iter().map(StatusEffect::remaining_shield).sum()
    }

    /// Let shields absorb damage in list order; returns the total absorbed
    pub fn absorb(&mut self, damage: i32) -> i32 {
        let mut left = damage;
        for effect in &mut self.effects {
            if left <= 0 {
                break;
            }
            left -= effect.absorb(left);
        }
        damage - left.max(0)
    }

    /// Remove every effect of the given types, returning what was removed
    pub fn remove_types(&mut self, types: &[EffectType]) -> Vec<StatusEffect> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .effects
            .drain(..)
            .partition(|e| types.contains(&e.effect_type()));
        self.effects = kept;
        removed
    }
}
