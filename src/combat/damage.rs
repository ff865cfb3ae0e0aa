//! Damage and healing arithmetic
//!
//! All HP changes go through here:
//! - Shields absorb in list order before HP is touched
//! - HP is clamped at 0 and at max
//! - Dead units take no damage and receive no healing

use serde::Serialize;

use super::unit::Unit;

/// Result of applying damage to a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DamageResult {
    /// Damage before shields
    pub raw: i32,
    /// Amount soaked by shields
    pub absorbed: i32,
    /// HP actually lost
    pub hp_lost: i32,
}

/// Apply raw damage to a unit.
///
/// Each shield absorbs `min(raw, remaining)` in order; the residual comes off HP.
pub fn apply_damage(unit: &mut Unit, raw: i32) -> DamageResult {
    if !unit.is_alive() || raw <= 0 {
        return DamageResult {
            raw: raw.max(0),
            ..DamageResult::default()
        };
    }

    let absorbed = unit.effects_mut().absorb(raw);
    let residual = raw - absorbed;

    let before = unit.hp();
    unit.set_hp(before - residual);

    DamageResult {
        raw,
        absorbed,
        hp_lost: before - unit.hp(),
    }
}

/// Heal a unit up to max HP, returning the amount actually healed
pub fn apply_heal(unit: &mut Unit, amount: i32) -> i32 {
    if !unit.is_alive() || amount <= 0 {
        return 0;
    }
    let before = unit.hp();
    unit.set_hp(before.saturating_add(amount));
    unit.hp() - before
}
