//! Combat units
//!
//! A unit is any participant: party member or adversary. Vitals are private
//! and every mutator clamps them, so `0 <= hp <= max_hp` and
//! `0 <= resource <= max_resource` hold at all times.

use serde::{Deserialize, Serialize};

use super::actions::ActionError;
use super::damage;
use super::effects::{Effect, EffectList, EffectTick, EffectType, StatusEffect};
use super::inventory::{Inventory, Item};
use super::skills::Skill;

/// Default agility for units that don't set one
pub const DEFAULT_AGILITY: i32 = 10;

/// Role tag. Behavior hangs off capabilities, not the tag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Warrior,
    Mage,
    Archer,
    Healer,
    Boss,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Warrior => "Warrior",
            Role::Mage => "Mage",
            Role::Archer => "Archer",
            Role::Healer => "Healer",
            Role::Boss => "Boss",
        };
        write!(f, "{}", s)
    }
}

/// A bounded resource pool (mana-like)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    current: i32,
    max: i32,
}

impl Pool {
    /// Create a full pool
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    /// Set the current value, clamped into [0, max]
    pub fn set(&mut self, value: i32) {
        self.current = value.clamp(0, self.max);
    }

    /// Refill by up to `amount`, returning how much was actually restored
    pub fn restore(&mut self, amount: i32) -> i32 {
        let before = self.current;
        self.set(self.current.saturating_add(amount.max(0)));
        self.current - before
    }
}

/// Critical hit capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CritChance {
    /// Probability of a critical hit per attack
    pub chance: f64,
    /// Damage multiplier on a critical hit
    pub multiplier: f64,
}

/// How a unit's plain attack behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStyle {
    /// Damage roll around effective power
    #[default]
    Standard,
    /// Sometimes spends resource to poison and hit harder
    Venom,
    /// Sometimes spends resource to heal an ally instead of attacking
    Mending,
}

/// A combat participant
#[derive(Debug, Clone)]
pub struct Unit {
    name: String,
    role: Role,
    hp: i32,
    max_hp: i32,
    resource: Option<Pool>,
    base_power: i32,
    agility: i32,
    crit: Option<CritChance>,
    attack_style: AttackStyle,
    skill: Option<Skill>,
    effects: EffectList,
    inventory: Inventory,
    /// Cannot act for the rest of the current round
    stunned: bool,
}

impl Unit {
    /// Create a unit at full health with no resource pool
    pub fn new(name: impl Into<String>, role: Role, max_hp: i32, base_power: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            role,
            hp: max_hp,
            max_hp,
            resource: None,
            base_power: base_power.max(0),
            agility: DEFAULT_AGILITY,
            crit: None,
            attack_style: AttackStyle::Standard,
            skill: None,
            effects: EffectList::new(),
            inventory: Inventory::new(),
            stunned: false,
        }
    }

    /// Give the unit a full resource pool
    pub fn with_resource(mut self, max: i32) -> Self {
        self.resource = Some(Pool::new(max));
        self
    }

    pub fn with_agility(mut self, agility: i32) -> Self {
        self.agility = agility;
        self
    }

    pub fn with_crit(mut self, chance: f64, multiplier: f64) -> Self {
        self.crit = Some(CritChance { chance, multiplier });
        self
    }

    pub fn with_attack_style(mut self, style: AttackStyle) -> Self {
        self.attack_style = style;
        self
    }

    pub fn with_skill(mut self, skill: Skill) -> Self {
        self.skill = Some(skill);
        self
    }

    pub fn with_item(mut self, item: Item, quantity: u32) -> Self {
        self.inventory.add(item, quantity);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Current hp as a fraction of max
    pub fn hp_fraction(&self) -> f64 {
        self.hp as f64 / self.max_hp as f64
    }

    /// Set hp, clamped into [0, max_hp]
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Current resource, if the unit has a pool
    pub fn resource(&self) -> Option<i32> {
        self.resource.map(|p| p.current())
    }

    pub fn max_resource(&self) -> Option<i32> {
        self.resource.map(|p| p.max())
    }

    /// Set resource, clamped; no-op for units without a pool
    pub fn set_resource(&mut self, value: i32) {
        if let Some(pool) = self.resource.as_mut() {
            pool.set(value);
        }
    }

    /// Check that `cost` can be paid without paying it
    pub fn check_resource(&self, cost: i32) -> Result<(), ActionError> {
        let pool = self.resource.ok_or(ActionError::NoResourcePool)?;
        if pool.current() < cost {
            return Err(ActionError::InsufficientResource {
                needed: cost,
                available: pool.current(),
            });
        }
        Ok(())
    }

    /// Pay `cost` from the pool
    pub fn spend_resource(&mut self, cost: i32) -> Result<(), ActionError> {
        self.check_resource(cost)?;
        if let Some(pool) = self.resource.as_mut() {
            pool.set(pool.current() - cost);
        }
        Ok(())
    }

    /// Restore resource, returning the amount actually restored
    pub fn restore_resource(&mut self, amount: i32) -> Result<i32, ActionError> {
        let pool = self.resource.as_mut().ok_or(ActionError::NoResourcePool)?;
        Ok(pool.restore(amount))
    }

    pub fn base_power(&self) -> i32 {
        self.base_power
    }

    /// Base power plus active strength buffs, at least 1
    pub fn effective_power(&self) -> i32 {
        (self.base_power + self.effects.power_bonus()).max(1)
    }

    /// Permanently scale base power, truncating. Returns the new value.
    pub fn scale_power(&mut self, multiplier: f64) -> i32 {
        self.base_power = super::dice::scale(self.base_power, multiplier).max(0);
        self.base_power
    }

    pub fn agility(&self) -> i32 {
        self.agility
    }

    pub fn crit(&self) -> Option<CritChance> {
        self.crit
    }

    pub fn attack_style(&self) -> AttackStyle {
        self.attack_style
    }

    pub fn skill(&self) -> Option<Skill> {
        self.skill
    }

    pub fn effects(&self) -> &EffectList {
        &self.effects
    }

    pub(crate) fn effects_mut(&mut self) -> &mut EffectList {
        &mut self.effects
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    /// Whether the unit loses its turn this round
    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    /// Reset per-round flags
    pub(crate) fn begin_round(&mut self) {
        self.stunned = false;
    }

    /// Attach an effect and run its on-apply behavior
    pub fn apply_effect(&mut self, mut effect: StatusEffect) {
        match &mut effect.effect {
            Effect::Shield {
                capacity,
                remaining,
            } => *remaining = *capacity,
            Effect::Stun => self.stunned = true,
            _ => {}
        }
        self.effects.push(effect);
    }

    /// Run one round of effects: count down, expire, then on-turn behavior.
    ///
    /// A dead unit is skipped entirely so its effects keep their last state.
    pub fn tick_effects(&mut self) -> Vec<EffectTick> {
        let mut ticks = Vec::new();
        if !self.is_alive() {
            return ticks;
        }

        let mut index = 0;
        while index < self.effects.len() {
            let Some(status) = self.effects.get_mut(index) else {
                break;
            };
            if status.countdown() {
                let removed = self.effects.remove_at(index);
                if removed.effect_type() == EffectType::Stun && !self.effects.has(EffectType::Stun)
                {
                    self.stunned = false;
                }
                ticks.push(EffectTick::expired(removed.effect_type()));
                continue;
            }
            let effect = status.effect;
            index += 1;

            // Remaining effects still count down after death, but do nothing
            if !self.is_alive() {
                continue;
            }

            match effect {
                Effect::Poison { damage_per_turn } => {
                    let result = damage::apply_damage(self, damage_per_turn);
                    ticks.push(EffectTick::applied(EffectType::Poison, result.hp_lost));
                }
                Effect::Regeneration { heal_per_turn } => {
                    let healed = damage::apply_heal(self, heal_per_turn);
                    ticks.push(EffectTick::applied(EffectType::Regeneration, healed));
                }
                Effect::Stun => {
                    self.stunned = true;
                    ticks.push(EffectTick::applied(EffectType::Stun, 0));
                }
                Effect::Shield { .. } | Effect::StrengthBuff { .. } => {}
            }
        }

        ticks
    }

    /// Force-remove every effect of the given types
    pub fn cleanse(&mut self, types: &[EffectType]) -> Vec<StatusEffect> {
        let removed = self.effects.remove_types(types);
        if !self.effects.has(EffectType::Stun) {
            self.stunned = false;
        }
        removed
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.is_alive() { "alive" } else { "dead" };
        write!(
            f,
            "{} {}: {} HP {}/{}",
            self.role, self.name, status, self.hp, self.max_hp
        )?;
        if let Some(pool) = self.resource {
            write!(f, " MP {}/{}", pool.current(), pool.max())?;
        }
        if !self.effects.is_empty() {
            let effects: Vec<String> = self.effects.iter().map(ToString::to_string).collect();
            write!(f, " | effects: {}", effects.join(", "))?;
        }
        Ok(())
    }
}
