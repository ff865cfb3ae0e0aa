//! Combat system module
//!
//! Turn-based party-versus-adversary battles:
//! - Units with clamped vitals, optional resource pools and capabilities
//! - Status effects (poison, shield, strength, regeneration, stun)
//! - Attack, skill and item resolution
//! - Agility-based turn order
//! - A two-phase weighted adversary policy
//! - The round-by-round battle state machine

mod actions;
mod damage;
mod dice;
mod effects;
mod events;
mod inventory;
mod policy;
mod roster;
mod rules;
mod shared;
mod skills;
mod state;
mod turns;
mod unit;

pub use actions::{ActionError, ActionOutcome, ActionRequest, OutcomeKind};
pub use damage::{apply_damage, apply_heal, DamageResult};
pub use dice::{roll_chance, DamageRange};
pub use effects::{Effect, EffectList, EffectTick, EffectType, StatusEffect};
pub use events::{BattleEvent, BattleReport};
pub use inventory::{
    Inventory, Item, ItemEffect, ItemStack, HEALTH_POTION, MANA_POTION, POISON_DART, RAGE_POTION,
};
pub use policy::{AdversaryPolicy, BossSkill, Phase};
pub use roster::{Roster, UnitId};
pub use rules::{CategoryWeights, CombatRules};
pub use shared::SharedBattle;
pub use skills::Skill;
pub use state::{Battle, Outcome, Step};
pub use turns::TurnOrder;
pub use unit::{AttackStyle, CritChance, Pool, Role, Unit};
