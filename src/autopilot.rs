//! Headless party decisions
//!
//! A simple rule-based stand-in for a player, used by the binary and the
//! integration tests to drive battles to completion.

use rand::Rng;
use tracing::{debug, warn};

use crate::combat::{
    ActionError, ActionRequest, Battle, EffectType, Outcome, Skill, Step, Unit, UnitId,
    HEALTH_POTION, MANA_POTION,
};

/// Heal allies once anyone drops below this HP fraction
const HURT_THRESHOLD: f64 = 0.7;
/// Drink a health potion below this HP fraction
const POTION_THRESHOLD: f64 = 0.35;

/// Pick an action for a party member
pub fn decide<R: Rng>(battle: &Battle<R>, id: UnitId) -> ActionRequest {
    let roster = battle.roster();
    let Some(unit) = roster.get(id) else {
        return ActionRequest::Skip;
    };

    if unit.hp_fraction() < POTION_THRESHOLD && unit.inventory().has(HEALTH_POTION) {
        return ActionRequest::UseItem(HEALTH_POTION.to_string());
    }

    if let Some(skill) = unit.skill() {
        let affordable = unit.check_resource(skill.cost()).is_ok();
        let worthwhile = match skill {
            Skill::MassHeal => roster
                .party()
                .iter()
                .any(|ally| ally.is_alive() && ally.hp_fraction() < HURT_THRESHOLD),
            Skill::Rally => !unit.effects().has(EffectType::StrengthBuff),
            Skill::PoisonBolt => !roster.adversary().effects().has(EffectType::Poison),
            Skill::PowerShot => true,
        };

        if worthwhile && affordable {
            return ActionRequest::UseSkill;
        }
        if worthwhile && low_on_resource(unit) && unit.inventory().has(MANA_POTION) {
            return ActionRequest::UseItem(MANA_POTION.to_string());
        }
    }

    ActionRequest::Attack
}

fn low_on_resource(unit: &Unit) -> bool {
    match (unit.resource(), unit.max_resource()) {
        (Some(current), Some(max)) => current * 3 < max,
        _ => false,
    }
}

/// Drive a battle until it is decided or `max_rounds` have been played.
///
/// Returns `Outcome::Undecided` if the round cap was hit.
pub fn run_battle<R: Rng>(battle: &mut Battle<R>, max_rounds: u32) -> Result<Outcome, ActionError> {
    loop {
        match battle.advance()? {
            Step::Decided(outcome) => return Ok(outcome),
            Step::AwaitingAction(_) if battle.round() > max_rounds => {
                warn!(max_rounds, "Round cap reached, stopping battle");
                return Ok(Outcome::Undecided);
            }
            Step::AwaitingAction(id) => {
                let request = decide(battle, id);
                play(battle, id, request)?;
            }
        }
    }
}

/// Submit a decision, falling back to attack and then skip
fn play<R: Rng>(battle: &mut Battle<R>, id: UnitId, request: ActionRequest) -> Result<(), ActionError> {
    let first = match battle.submit_action(id, request.clone()) {
        Ok(outcome) => {
            debug!(summary = %outcome.summary, "Autopilot action");
            return Ok(());
        }
        Err(err) => err,
    };
    debug!(%request, error = %first, "Autopilot falling back to attack");

    if request != ActionRequest::Attack && battle.submit_action(id, ActionRequest::Attack).is_ok() {
        return Ok(());
    }
    battle.submit_action(id, ActionRequest::Skip).map(|_| ())
}
