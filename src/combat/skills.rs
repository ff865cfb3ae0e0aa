//! Party skills
//!
//! One skill per hero role, gated on the unit's resource pool:
//! - Rally: strength buff for the whole party
//! - Poison bolt: poison plus direct damage on the adversary
//! - Power shot: a heavy hit scaled from effective power
//! - Mass heal: heals, regenerates and cleanses every living ally

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::actions::{living_actor, unit_mut, ActionError, ActionOutcome, OutcomeKind};
use super::damage::{apply_damage, apply_heal};
use super::dice::DamageRange;
use super::effects::{EffectType, StatusEffect};
use super::roster::{Roster, UnitId};
use super::unit::Role;

const POISON_BOLT_DAMAGE: DamageRange = DamageRange::new(25, 35);
const MASS_HEAL_AMOUNT: DamageRange = DamageRange::new(20, 35);

/// Effects removed from every ally by mass heal
const CLEANSED: [EffectType; 2] = [EffectType::Poison, EffectType::Stun];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    Rally,
    PoisonBolt,
    PowerShot,
    MassHeal,
}

impl Skill {
    /// Resource cost
    pub fn cost(&self) -> i32 {
        match self {
            Skill::Rally => 25,
            Skill::PoisonBolt => 20,
            Skill::PowerShot => 25,
            Skill::MassHeal => 25,
        }
    }

    /// The skill a hero role starts with
    pub fn for_role(role: Role) -> Option<Skill> {
        match role {
            Role::Warrior => Some(Skill::Rally),
            Role::Mage => Some(Skill::PoisonBolt),
            Role::Archer => Some(Skill::PowerShot),
            Role::Healer => Some(Skill::MassHeal),
            Role::Boss => None,
        }
    }

    /// Whether the skill needs a living opponent
    pub fn needs_opponent(&self) -> bool {
        matches!(self, Skill::PoisonBolt | Skill::PowerShot)
    }
}

impl std::fmt::Display for Skill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Skill::Rally => "rally",
            Skill::PoisonBolt => "poison bolt",
            Skill::PowerShot => "power shot",
            Skill::MassHeal => "mass heal",
        };
        write!(f, "{}", s)
    }
}

/// Use the actor's skill
pub fn use_skill<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let caster = living_actor(roster, actor)?;
    let skill = caster.skill().ok_or(ActionError::NoSkill)?;
    caster.check_resource(skill.cost())?;

    let opponent = roster.pick_opponent(actor, rng);
    let allies = roster.allies_of(actor);
    if skill.needs_opponent() && opponent.is_none() {
        return Err(ActionError::NoValidTarget);
    }
    if allies.is_empty() {
        return Err(ActionError::NoValidTarget);
    }

    let caster = unit_mut(roster, actor)?;
    caster.spend_resource(skill.cost())?;
    let caster_name = caster.name().to_string();
    debug!(caster = %caster_name, %skill, "Using skill");

    match skill {
        Skill::Rally => {
            for id in &allies {
                unit_mut(roster, *id)?.apply_effect(StatusEffect::strength(3, 10));
            }
            Ok(ActionOutcome::new(
                actor,
                allies,
                OutcomeKind::Buff,
                10,
                format!("{} rallies the party: +10 power for 3 rounds", caster_name),
            ))
        }
        Skill::PoisonBolt => {
            let target = opponent.ok_or(ActionError::NoValidTarget)?;
            let raw = POISON_BOLT_DAMAGE.roll(rng);
            let victim = unit_mut(roster, target)?;
            victim.apply_effect(StatusEffect::poison(3, 10));
            let result = apply_damage(victim, raw);
            Ok(ActionOutcome::new(
                actor,
                vec![target],
                OutcomeKind::Damage,
                result.hp_lost,
                format!(
                    "{} casts poison bolt at {}: {} damage and poison",
                    caster_name,
                    victim.name(),
                    result.hp_lost
                ),
            ))
        }
        Skill::PowerShot => {
            let target = opponent.ok_or(ActionError::NoValidTarget)?;
            let power = unit_mut(roster, actor)?.effective_power();
            let raw = DamageRange::offset(power, 5, 20).roll(rng);
            let victim = unit_mut(roster, target)?;
            let result = apply_damage(victim, raw);
            Ok(ActionOutcome::new(
                actor,
                vec![target],
                OutcomeKind::Damage,
                result.hp_lost,
                format!(
                    "{} fires a power shot at {} for {} damage",
                    caster_name,
                    victim.name(),
                    result.hp_lost
                ),
            ))
        }
        Skill::MassHeal => {
            let mut total = 0;
            let mut cleansed = 0;
            for id in &allies {
                let amount = MASS_HEAL_AMOUNT.roll(rng);
                let ally = unit_mut(roster, *id)?;
                let healed = apply_heal(ally, amount);
                if healed > 0 {
                    ally.apply_effect(StatusEffect::regeneration(2, 6));
                }
                cleansed += ally.cleanse(&CLEANSED).len();
                total += healed;
            }
            let summary = if total > 0 || cleansed > 0 {
                format!(
                    "{} casts mass heal: {} HP restored, {} effects cleansed",
                    caster_name, total, cleansed
                )
            } else {
                format!("{} casts mass heal, but nobody needed it", caster_name)
            };
            Ok(ActionOutcome::new(
                actor,
                allies,
                OutcomeKind::Heal,
                total,
                summary,
            ))
        }
    }
}
