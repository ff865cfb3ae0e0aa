//! Adversary decision policy
//!
//! Two phases. Phase two starts the first time the adversary drops to the
//! phase threshold, scales its power once and shifts the category weights
//! towards skills. It never reverts.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::actions::{self, unit_mut, ActionError, ActionOutcome, OutcomeKind};
use super::damage::apply_damage;
use super::dice::{roll_chance, DamageRange};
use super::effects::StatusEffect;
use super::roster::{Roster, UnitId};
use super::rules::{CategoryWeights, CombatRules};
use super::unit::Unit;

const STOMP_DAMAGE: DamageRange = DamageRange::new(35, 50);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    One,
    Two,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::One => write!(f, "1"),
            Phase::Two => write!(f, "2"),
        }
    }
}

/// Adversary action category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Attack,
    Skill,
    Item,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossSkill {
    /// Poison every living party member
    PoisonBreath,
    /// Shield self
    ShieldWall,
    /// Damage every living party member with a chance to stun
    Stomp,
}

impl BossSkill {
    pub const ALL: [BossSkill; 3] = [BossSkill::PoisonBreath, BossSkill::ShieldWall, BossSkill::Stomp];

    pub fn cost(&self) -> i32 {
        match self {
            BossSkill::PoisonBreath => 40,
            BossSkill::ShieldWall => 30,
            BossSkill::Stomp => 0,
        }
    }
}

impl std::fmt::Display for BossSkill {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BossSkill::PoisonBreath => "poison breath",
            BossSkill::ShieldWall => "shield wall",
            BossSkill::Stomp => "stomp",
        };
        write!(f, "{}", s)
    }
}

/// Phase tracking and action selection for the adversary
#[derive(Debug, Clone)]
pub struct AdversaryPolicy {
    phase: Phase,
}

impl Default for AdversaryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl AdversaryPolicy {
    pub fn new() -> Self {
        Self { phase: Phase::One }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Enter phase two if the adversary is at or below the threshold.
    /// Returns the new base power when the phase changed.
    pub fn check_phase(&mut self, adversary: &mut Unit, rules: &CombatRules) -> Option<i32> {
        if self.phase == Phase::Two || !adversary.is_alive() {
            return None;
        }
        if adversary.hp_fraction() > rules.phase_threshold {
            return None;
        }

        self.phase = Phase::Two;
        let power = adversary.scale_power(rules.phase_power_multiplier);
        info!(adversary = %adversary.name(), power, "Adversary enters phase 2");
        Some(power)
    }

    fn weights<'a>(&self, rules: &'a CombatRules) -> &'a CategoryWeights {
        match self.phase {
            Phase::One => &rules.phase_one_weights,
            Phase::Two => &rules.phase_two_weights,
        }
    }

    /// Sample an action category. Items are left out once the inventory is empty.
    pub fn choose_category<R: Rng>(
        &self,
        adversary: &Unit,
        rules: &CombatRules,
        rng: &mut R,
    ) -> Category {
        let w = self.weights(rules);
        let mut options = vec![(Category::Attack, w.attack), (Category::Skill, w.skill)];
        if !adversary.inventory().is_empty() {
            options.push((Category::Item, w.item));
        }

        match WeightedIndex::new(options.iter().map(|(_, weight)| *weight)) {
            Ok(dist) => options[dist.sample(rng)].0,
            Err(_) => Category::Attack,
        }
    }

    /// Choose and resolve the adversary's action for this turn.
    ///
    /// A skill or item that can't be paid for yields a `CouldNotAct` outcome:
    /// the turn is spent and nothing else changes.
    pub fn take_turn<R: Rng>(
        &self,
        roster: &mut Roster,
        rules: &CombatRules,
        rng: &mut R,
    ) -> Result<ActionOutcome, ActionError> {
        let category = self.choose_category(roster.adversary(), rules, rng);
        debug!(?category, phase = %self.phase, "Adversary choosing action");

        let result = match category {
            Category::Attack => actions::attack(roster, UnitId::Adversary, rules, rng),
            Category::Skill => {
                let skill = BossSkill::ALL
                    .choose(rng)
                    .copied()
                    .unwrap_or(BossSkill::Stomp);
                cast(roster, skill, rules, rng)
            }
            Category::Item => {
                let name = roster
                    .adversary()
                    .inventory()
                    .names()
                    .choose(rng)
                    .map(|n| n.to_string());
                match name {
                    Some(name) => actions::use_item(roster, UnitId::Adversary, &name, rng),
                    None => actions::attack(roster, UnitId::Adversary, rules, rng),
                }
            }
        };

        match result {
            Err(
                err @ (ActionError::InsufficientResource { .. }
                | ActionError::NoResourcePool
                | ActionError::ItemNotFound(_)
                | ActionError::ItemExhausted(_)),
            ) => {
                let name = roster.adversary().name().to_string();
                debug!(adversary = %name, error = %err, "Adversary could not act");
                Ok(ActionOutcome::idle(
                    UnitId::Adversary,
                    OutcomeKind::CouldNotAct,
                    format!("{} tries to act but fails: {}", name, err),
                ))
            }
            other => other,
        }
    }
}

/// Resolve one of the adversary's skills
pub fn cast<R: Rng>(
    roster: &mut Roster,
    skill: BossSkill,
    rules: &CombatRules,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let actor = UnitId::Adversary;
    actions::living_actor(roster, actor)?.check_resource(skill.cost())?;
    let targets = roster.living_party();
    if skill != BossSkill::ShieldWall && targets.is_empty() {
        return Err(ActionError::NoValidTarget);
    }

    let boss = roster.adversary_mut();
    boss.spend_resource(skill.cost())?;
    let boss_name = boss.name().to_string();

    let outcome = match skill {
        BossSkill::PoisonBreath => {
            for id in &targets {
                unit_mut(roster, *id)?.apply_effect(StatusEffect::poison(4, 15));
            }
            ActionOutcome::new(
                actor,
                targets,
                OutcomeKind::Debuff,
                15,
                format!("{} breathes poison over the party", boss_name),
            )
        }
        BossSkill::ShieldWall => {
            roster
                .adversary_mut()
                .apply_effect(StatusEffect::shield(3, 60));
            ActionOutcome::new(
                actor,
                vec![actor],
                OutcomeKind::Shield,
                60,
                format!("{} raises a shield wall", boss_name),
            )
        }
        BossSkill::Stomp => {
            let mut total = 0;
            let mut stunned = Vec::new();
            for id in &targets {
                let raw = STOMP_DAMAGE.roll(rng);
                let hero = unit_mut(roster, *id)?;
                total += apply_damage(hero, raw).hp_lost;
                if roll_chance(rng, rules.stomp_stun_chance) && hero.is_alive() {
                    hero.apply_effect(StatusEffect::stun(1));
                    stunned.push(hero.name().to_string());
                }
            }
            let mut summary = format!("{} stomps for {} total damage", boss_name, total);
            if !stunned.is_empty() {
                summary.push_str(&format!(", stunning {}", stunned.join(", ")));
            }
            ActionOutcome::new(actor, targets, OutcomeKind::Damage, total, summary)
        }
    };

    Ok(outcome)
}
