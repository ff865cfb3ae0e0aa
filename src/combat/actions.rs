//! Action resolution
//!
//! Resolves attacks, skills and items against the roster. Every resolver
//! checks all of its preconditions before touching resources or state, so a
//! returned `ActionError` always means nothing changed.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::damage::{apply_damage, apply_heal};
use super::dice::{attack_roll, roll_chance, scale, DamageRange};
use super::effects::StatusEffect;
use super::inventory::ItemEffect;
use super::roster::{Roster, UnitId};
use super::rules::CombatRules;
use super::skills;
use super::unit::{AttackStyle, Unit};

/// Resource cost of a venom strike
pub const VENOM_COST: i32 = 15;
/// Resource cost of a mending strike
pub const MENDING_COST: i32 = 20;

const VENOM_DAMAGE: DamageRange = DamageRange::new(20, 30);
const MENDING_HEAL: DamageRange = DamageRange::new(25, 40);

/// A decision submitted for a participant's turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "item", rename_all = "snake_case")]
pub enum ActionRequest {
    Attack,
    UseSkill,
    UseItem(String),
    Skip,
}

impl std::fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionRequest::Attack => write!(f, "attack"),
            ActionRequest::UseSkill => write!(f, "skill"),
            ActionRequest::UseItem(name) => write!(f, "item {}", name),
            ActionRequest::Skip => write!(f, "skip"),
        }
    }
}

/// What kind of change an action made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Damage,
    Heal,
    Buff,
    Restore,
    Debuff,
    Shield,
    Skipped,
    /// The adversary picked something it couldn't pay for
    CouldNotAct,
}

/// Result of a resolved action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub actor: UnitId,
    pub targets: Vec<UnitId>,
    pub kind: OutcomeKind,
    /// HP lost, HP healed, resource restored or power granted, depending on kind
    pub amount: i32,
    pub critical: bool,
    pub summary: String,
}

impl ActionOutcome {
    pub fn new(
        actor: UnitId,
        targets: Vec<UnitId>,
        kind: OutcomeKind,
        amount: i32,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            targets,
            kind,
            amount,
            critical: false,
            summary: summary.into(),
        }
    }

    /// Outcome with no targets and no amount
    pub fn idle(actor: UnitId, kind: OutcomeKind, summary: impl Into<String>) -> Self {
        Self::new(actor, Vec::new(), kind, 0, summary)
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}

/// Recoverable action failures. None of them mutate state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not enough resource: need {needed}, have {available}")]
    InsufficientResource { needed: i32, available: i32 },

    #[error("unit has no resource pool")]
    NoResourcePool,

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("no {0} left")]
    ItemExhausted(String),

    #[error("no valid target")]
    NoValidTarget,

    #[error("unit has no skill")]
    NoSkill,

    #[error("unknown unit: {0}")]
    UnknownUnit(UnitId),

    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),
}

/// Look up a unit for reading
pub(crate) fn unit(roster: &Roster, id: UnitId) -> Result<&Unit, ActionError> {
    roster.get(id).ok_or(ActionError::UnknownUnit(id))
}

/// Look up a unit for writing
pub(crate) fn unit_mut(roster: &mut Roster, id: UnitId) -> Result<&mut Unit, ActionError> {
    roster.get_mut(id).ok_or(ActionError::UnknownUnit(id))
}

/// Look up a living actor
pub(crate) fn living_actor(roster: &Roster, id: UnitId) -> Result<&Unit, ActionError> {
    let actor = unit(roster, id)?;
    if !actor.is_alive() {
        return Err(ActionError::InvalidStateTransition(format!(
            "{} is dead",
            actor.name()
        )));
    }
    Ok(actor)
}

/// Resolve a request for `actor`
pub fn resolve<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    request: &ActionRequest,
    rules: &CombatRules,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    match request {
        ActionRequest::Attack => attack(roster, actor, rules, rng),
        ActionRequest::UseSkill => skills::use_skill(roster, actor, rng),
        ActionRequest::UseItem(name) => use_item(roster, actor, name, rng),
        ActionRequest::Skip => {
            let name = living_actor(roster, actor)?.name().to_string();
            Ok(ActionOutcome::idle(
                actor,
                OutcomeKind::Skipped,
                format!("{} skips the turn", name),
            ))
        }
    }
}

/// Plain attack, with the actor's attack style and crit capability applied.
///
/// Style overrides are rolled fresh on every call; when they don't trigger
/// (too little resource or a failed roll) the default attack is used.
pub fn attack<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    rules: &CombatRules,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let attacker = living_actor(roster, actor)?;
    let style = attacker.attack_style();

    match style {
        AttackStyle::Venom
            if attacker.check_resource(VENOM_COST).is_ok()
                && roll_chance(rng, rules.venom_chance) =>
        {
            if let Some(target) = roster.pick_opponent(actor, rng) {
                return venom_strike(roster, actor, target, rng);
            }
        }
        AttackStyle::Mending
            if attacker.check_resource(MENDING_COST).is_ok()
                && roll_chance(rng, rules.mending_chance) =>
        {
            if let Some(target) = roster.pick_heal_target(actor, rng) {
                return mending_strike(roster, actor, target, rng);
            }
        }
        _ => {}
    }

    let target = roster
        .pick_opponent(actor, rng)
        .ok_or(ActionError::NoValidTarget)?;
    default_attack(roster, actor, target, rng)
}

fn default_attack<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    target: UnitId,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let attacker = unit(roster, actor)?;
    let attacker_name = attacker.name().to_string();
    let mut raw = attack_roll(rng, attacker.effective_power());
    let mut critical = false;
    if let Some(crit) = attacker.crit() {
        if roll_chance(rng, crit.chance) {
            raw = scale(raw, crit.multiplier);
            critical = true;
        }
    }

    let defender = unit_mut(roster, target)?;
    let result = apply_damage(defender, raw);
    let summary = format!(
        "{} attacks {} for {} damage{}",
        attacker_name,
        defender.name(),
        result.hp_lost,
        if critical { " (critical)" } else { "" }
    );

    Ok(ActionOutcome::new(
        actor,
        vec![target],
        OutcomeKind::Damage,
        result.hp_lost,
        summary,
    )
    .with_critical(critical))
}

fn venom_strike<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    target: UnitId,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let attacker = unit_mut(roster, actor)?;
    attacker.spend_resource(VENOM_COST)?;
    let attacker_name = attacker.name().to_string();

    let raw = VENOM_DAMAGE.roll(rng);
    let defender = unit_mut(roster, target)?;
    defender.apply_effect(StatusEffect::poison(3, 8));
    let result = apply_damage(defender, raw);

    Ok(ActionOutcome::new(
        actor,
        vec![target],
        OutcomeKind::Damage,
        result.hp_lost,
        format!(
            "{} hurls a venom orb at {}: {} damage and poison",
            attacker_name,
            defender.name(),
            result.hp_lost
        ),
    ))
}

fn mending_strike<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    target: UnitId,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let healer = unit_mut(roster, actor)?;
    healer.spend_resource(MENDING_COST)?;
    let healer_name = healer.name().to_string();

    let amount = MENDING_HEAL.roll(rng);
    let patient = unit_mut(roster, target)?;
    let healed = apply_heal(patient, amount);

    Ok(ActionOutcome::new(
        actor,
        vec![target],
        OutcomeKind::Heal,
        healed,
        format!("{} heals {} for {} HP", healer_name, patient.name(), healed),
    ))
}

/// Use one of the named item from the actor's inventory.
///
/// All-or-nothing: the item is only consumed once it is known to apply.
pub fn use_item<R: Rng>(
    roster: &mut Roster,
    actor: UnitId,
    name: &str,
    rng: &mut R,
) -> Result<ActionOutcome, ActionError> {
    let user = living_actor(roster, actor)?;
    let item = user.inventory().check(name)?.clone();

    let opponent = match item.effect {
        ItemEffect::RestoreResource { .. } if user.resource().is_none() => {
            return Err(ActionError::NoResourcePool)
        }
        ItemEffect::PoisonOpponent { .. } => Some(
            roster
                .pick_opponent(actor, rng)
                .ok_or(ActionError::NoValidTarget)?,
        ),
        _ => None,
    };

    let user = unit_mut(roster, actor)?;
    user.inventory_mut().take(name)?;
    let user_name = user.name().to_string();

    let outcome = match item.effect {
        ItemEffect::Heal { amount } => {
            let healed = apply_heal(user, amount);
            ActionOutcome::new(
                actor,
                vec![actor],
                OutcomeKind::Heal,
                healed,
                format!("{} drinks a {} and recovers {} HP", user_name, item.name, healed),
            )
        }
        ItemEffect::RestoreResource { amount } => {
            let restored = user.restore_resource(amount)?;
            ActionOutcome::new(
                actor,
                vec![actor],
                OutcomeKind::Restore,
                restored,
                format!("{} drinks a {} and restores {} MP", user_name, item.name, restored),
            )
        }
        ItemEffect::Strength {
            power_bonus,
            duration,
        } => {
            user.apply_effect(StatusEffect::strength(duration, power_bonus));
            ActionOutcome::new(
                actor,
                vec![actor],
                OutcomeKind::Buff,
                power_bonus,
                format!(
                    "{} drinks a {}: +{} power for {} rounds",
                    user_name, item.name, power_bonus, duration
                ),
            )
        }
        ItemEffect::PoisonOpponent {
            damage_per_turn,
            duration,
        } => {
            let target = opponent.ok_or(ActionError::NoValidTarget)?;
            let victim = unit_mut(roster, target)?;
            victim.apply_effect(StatusEffect::poison(duration, damage_per_turn));
            ActionOutcome::new(
                actor,
                vec![target],
                OutcomeKind::Debuff,
                damage_per_turn,
                format!("{} throws a {} at {}", user_name, item.name, victim.name()),
            )
        }
    };

    Ok(outcome)
}
