//! Battle state machine
//!
//! Drives one round at a time:
//! - Round start: bump the counter, clear per-round flags
//! - Effect tick: every living party member, then the adversary
//! - Dispatch: walk the turn order, pausing for party decisions
//!
//! The outcome is re-checked after every action and every effect tick, and
//! latches once decided.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::actions::{self, ActionError, ActionOutcome, ActionRequest};
use super::effects::EffectTick;
use super::events::{BattleEvent, BattleReport, REPORT_PARTY_SLOTS};
use super::policy::{AdversaryPolicy, Phase};
use super::roster::{Roster, UnitId};
use super::rules::CombatRules;
use super::turns::TurnOrder;

/// How the battle ended, if it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "undecided")]
    Undecided,
    #[serde(rename = "victory")]
    PartyVictory,
    #[serde(rename = "defeat")]
    PartyDefeat,
}

impl Outcome {
    /// Tag stored with battle results
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Undecided => "undecided",
            Outcome::PartyVictory => "victory",
            Outcome::PartyDefeat => "defeat",
        }
    }

    pub fn is_decided(&self) -> bool {
        !matches!(self, Outcome::Undecided)
    }
}

impl std::str::FromStr for Outcome {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "undecided" => Ok(Outcome::Undecided),
            "victory" => Ok(Outcome::PartyVictory),
            "defeat" => Ok(Outcome::PartyDefeat),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where `advance` stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Waiting for `submit_action` for this party member
    AwaitingAction(UnitId),
    Decided(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    RoundStart,
    EffectTick,
    Dispatch,
    AdversaryTurn,
    Awaiting(UnitId),
    Decided,
}

/// A party-versus-adversary battle
pub struct Battle<R = StdRng> {
    roster: Roster,
    rules: CombatRules,
    policy: AdversaryPolicy,
    rng: R,
    round: u32,
    outcome: Outcome,
    stage: Stage,
    order: TurnOrder,
    /// Participants that have acted this round
    acted: Vec<UnitId>,
    events: Vec<BattleEvent>,
    report_taken: bool,
}

impl Battle<StdRng> {
    /// Create a battle with a seeded random source
    pub fn new(roster: Roster, rules: CombatRules, seed: u64) -> Self {
        Self::with_rng(roster, rules, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Battle<R> {
    pub fn with_rng(roster: Roster, rules: CombatRules, rng: R) -> Self {
        Self {
            roster,
            rules,
            policy: AdversaryPolicy::new(),
            rng,
            round: 0,
            outcome: Outcome::Undecided,
            stage: Stage::RoundStart,
            order: TurnOrder::default(),
            acted: Vec::new(),
            events: Vec::new(),
            report_taken: false,
        }
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn rules(&self) -> &CombatRules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.policy.phase()
    }

    /// The party member the battle is waiting on, if any
    pub fn pending(&self) -> Option<UnitId> {
        match self.stage {
            Stage::Awaiting(id) => Some(id),
            _ => None,
        }
    }

    /// Participants still to act this round
    pub fn remaining_turns(&self) -> &[UnitId] {
        self.order.remaining()
    }

    pub fn acted(&self) -> &[UnitId] {
        &self.acted
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Take the events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Adversary HP as a percentage of max
    pub fn adversary_hp_percent(&self) -> f64 {
        self.roster.adversary().hp_fraction() * 100.0
    }

    /// Run the battle forward until it needs a party decision or is decided
    pub fn advance(&mut self) -> Result<Step, ActionError> {
        loop {
            match self.stage {
                Stage::Decided => return Ok(Step::Decided(self.outcome)),
                Stage::Awaiting(id) => return Ok(Step::AwaitingAction(id)),
                Stage::RoundStart => self.start_round(),
                Stage::EffectTick => self.advance_effects()?,
                Stage::AdversaryTurn => {
                    self.adversary_take_turn()?;
                }
                Stage::Dispatch => self.dispatch_next(),
            }
        }
    }

    fn start_round(&mut self) {
        self.round += 1;
        self.acted.clear();
        for id in self.roster.ids() {
            if let Some(unit) = self.roster.get_mut(id) {
                unit.begin_round();
            }
        }
        debug!(round = self.round, "Round started");
        self.events.push(BattleEvent::RoundStarted { round: self.round });
        self.stage = Stage::EffectTick;
    }

    /// Tick effects on every living participant, party first, then build
    /// this round's turn order
    pub fn advance_effects(&mut self) -> Result<(), ActionError> {
        if self.stage != Stage::EffectTick {
            return Err(self.reject("effects already ticked this round"));
        }

        for id in self.roster.ids() {
            let ticks = match self.roster.get_mut(id) {
                Some(unit) if unit.is_alive() => unit.tick_effects(),
                _ => continue,
            };
            self.record_ticks(id, ticks);

            self.check_decided();
            if self.outcome.is_decided() {
                return Ok(());
            }
            self.check_phase();
        }

        self.order = self.next_turn_order();
        debug!(round = self.round, order = ?self.order.as_slice(), "Turn order");
        self.stage = Stage::Dispatch;
        Ok(())
    }

    fn record_ticks(&mut self, unit: UnitId, ticks: Vec<EffectTick>) {
        for tick in ticks {
            let event = if tick.expired {
                BattleEvent::EffectExpired {
                    unit,
                    effect: tick.effect_type,
                }
            } else {
                BattleEvent::EffectTicked {
                    unit,
                    effect: tick.effect_type,
                    amount: tick.amount,
                }
            };
            self.events.push(event);
        }
    }

    /// Turn order for the living participants as they stand now
    pub fn next_turn_order(&self) -> TurnOrder {
        TurnOrder::new(&self.roster.living_participants())
    }

    fn dispatch_next(&mut self) {
        let Some(id) = self.order.next() else {
            // Round over
            self.stage = Stage::RoundStart;
            return;
        };

        let Some(unit) = self.roster.get(id) else {
            return;
        };
        if !unit.is_alive() {
            return;
        }
        if unit.is_stunned() {
            debug!(unit = %unit.name(), "Stunned, turn skipped");
            self.acted.push(id);
            self.events.push(BattleEvent::TurnSkipped { unit: id });
            return;
        }

        self.stage = match id {
            UnitId::Party(_) => Stage::Awaiting(id),
            UnitId::Adversary => Stage::AdversaryTurn,
        };
    }

    /// Resolve the decision for the party member the battle is waiting on.
    ///
    /// A failed action leaves the battle waiting on the same participant.
    pub fn submit_action(
        &mut self,
        unit: UnitId,
        request: ActionRequest,
    ) -> Result<ActionOutcome, ActionError> {
        if self.stage != Stage::Awaiting(unit) {
            return Err(self.reject(&format!("not waiting on {}", unit)));
        }

        let outcome = actions::resolve(&mut self.roster, unit, &request, &self.rules, &mut self.rng)?;
        debug!(%unit, %request, summary = %outcome.summary, "Party action");
        self.finish_turn(unit, outcome.clone());
        Ok(outcome)
    }

    /// Let the adversary act. Only valid when it's the adversary's turn.
    ///
    /// Errors the policy does not turn into `CouldNotAct` are returned as is
    /// and the battle stays on the adversary's turn.
    pub fn adversary_take_turn(&mut self) -> Result<ActionOutcome, ActionError> {
        if self.stage != Stage::AdversaryTurn {
            return Err(self.reject("not the adversary's turn"));
        }

        let outcome = self
            .policy
            .take_turn(&mut self.roster, &self.rules, &mut self.rng)
            .inspect_err(|err| warn!(error = %err, "Adversary action failed"))?;
        debug!(summary = %outcome.summary, "Adversary action");
        self.finish_turn(UnitId::Adversary, outcome.clone());
        Ok(outcome)
    }

    fn finish_turn(&mut self, unit: UnitId, outcome: ActionOutcome) {
        self.acted.push(unit);
        self.events.push(BattleEvent::ActionResolved { outcome });

        self.check_decided();
        if self.outcome.is_decided() {
            return;
        }
        self.check_phase();
        self.stage = Stage::Dispatch;
    }

    fn check_decided(&mut self) {
        if self.outcome.is_decided() {
            return;
        }

        let outcome = if !self.roster.adversary().is_alive() {
            Outcome::PartyVictory
        } else if self.roster.all_party_dead() {
            Outcome::PartyDefeat
        } else {
            return;
        };

        info!(%outcome, round = self.round, "Battle decided");
        self.outcome = outcome;
        self.stage = Stage::Decided;
        self.events.push(BattleEvent::BattleDecided {
            outcome,
            round: self.round,
        });
    }

    fn check_phase(&mut self) {
        if let Some(power) = self
            .policy
            .check_phase(self.roster.adversary_mut(), &self.rules)
        {
            self.events.push(BattleEvent::PhaseChanged {
                phase: self.policy.phase(),
                power,
            });
        }
    }

    fn reject(&self, reason: &str) -> ActionError {
        if self.outcome.is_decided() {
            ActionError::InvalidStateTransition(format!("battle already {}", self.outcome))
        } else {
            ActionError::InvalidStateTransition(reason.to_string())
        }
    }

    /// The final report. Yields exactly once, after the battle is decided.
    pub fn take_report(&mut self) -> Option<BattleReport> {
        if !self.outcome.is_decided() || self.report_taken {
            return None;
        }
        self.report_taken = true;

        Some(BattleReport {
            outcome: self.outcome,
            adversary: self.roster.adversary().name().to_string(),
            rounds: self.round,
            party: self
                .roster
                .party()
                .iter()
                .take(REPORT_PARTY_SLOTS)
                .map(|u| (u.name().to_string(), u.hp()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::effects::{EffectType, StatusEffect};
    use crate::combat::rules::CategoryWeights;
    use crate::combat::skills::Skill;
    use crate::combat::unit::{Role, Unit};

    /// Rules where the adversary only ever attacks
    fn attack_only() -> CombatRules {
        CombatRules {
            phase_one_weights: CategoryWeights::new(1.0, 0.0, 0.0),
            phase_two_weights: CategoryWeights::new(1.0, 0.0, 0.0),
            ..CombatRules::default()
        }
    }

    fn hero(name: &str, agility: i32) -> Unit {
        Unit::new(name, Role::Warrior, 150, 30)
            .with_resource(50)
            .with_agility(agility)
            .with_skill(Skill::Rally)
    }

    fn boss(hp: i32, agility: i32) -> Unit {
        let mut unit = Unit::new("Dragon", Role::Boss, 1000, 20)
            .with_resource(200)
            .with_agility(agility);
        unit.set_hp(hp);
        unit
    }

    #[test]
    fn test_first_step_awaits_fastest_hero() {
        let roster = Roster::new(vec![hero("Slow", 5), hero("Fast", 30)], boss(1000, 10));
        let mut battle = Battle::new(roster, attack_only(), 1);

        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(1)));
        assert_eq!(battle.round(), 1);
        assert_eq!(battle.pending(), Some(UnitId::Party(1)));
        // Idempotent while waiting
        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(1)));
    }

    #[test]
    fn test_adversary_acts_between_heroes() {
        let roster = Roster::new(vec![hero("A", 25), hero("B", 12)], boss(1000, 15));
        let mut battle = Battle::new(roster, attack_only(), 2);

        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(0)));
        battle.submit_action(UnitId::Party(0), ActionRequest::Skip).unwrap();

        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(1)));
        assert_eq!(battle.acted(), &[UnitId::Party(0), UnitId::Adversary]);

        let adversary_acted = battle.events().iter().any(|e| {
            matches!(e, BattleEvent::ActionResolved { outcome } if outcome.actor == UnitId::Adversary)
        });
        assert!(adversary_acted);

        battle.submit_action(UnitId::Party(1), ActionRequest::Skip).unwrap();
        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(0)));
        assert_eq!(battle.round(), 2);
    }

    #[test]
    fn test_submit_for_wrong_unit_rejected() {
        let roster = Roster::new(vec![hero("A", 25), hero("B", 12)], boss(1000, 15));
        let mut battle = Battle::new(roster, attack_only(), 3);
        battle.advance().unwrap();

        let err = battle
            .submit_action(UnitId::Party(1), ActionRequest::Attack)
            .unwrap_err();
        assert!(matches!(err, ActionError::InvalidStateTransition(_)));
        assert_eq!(battle.pending(), Some(UnitId::Party(0)));
    }

    #[test]
    fn test_adversary_turn_out_of_order_rejected() {
        let roster = Roster::new(vec![hero("A", 25)], boss(1000, 15));
        let mut battle = Battle::new(roster, attack_only(), 3);
        battle.advance().unwrap();

        assert!(matches!(
            battle.adversary_take_turn(),
            Err(ActionError::InvalidStateTransition(_))
        ));
        assert!(matches!(
            battle.advance_effects(),
            Err(ActionError::InvalidStateTransition(_))
        ));
    }

    #[test]
    fn test_failed_action_keeps_turn() {
        let mut caster = hero("A", 25);
        caster.set_resource(10);
        let roster = Roster::new(vec![caster], boss(1000, 15));
        let mut battle = Battle::new(roster, attack_only(), 4);
        battle.advance().unwrap();

        let err = battle
            .submit_action(UnitId::Party(0), ActionRequest::UseSkill)
            .unwrap_err();
        assert_eq!(
            err,
            ActionError::InsufficientResource {
                needed: 25,
                available: 10
            }
        );
        assert_eq!(battle.pending(), Some(UnitId::Party(0)));
        assert!(battle.acted().is_empty());

        battle.submit_action(UnitId::Party(0), ActionRequest::Skip).unwrap();
        assert_eq!(battle.acted(), &[UnitId::Party(0)]);
    }

    #[test]
    fn test_stunned_hero_skipped() {
        let mut stunned = hero("Dazed", 30);
        stunned.apply_effect(StatusEffect::stun(2));
        let roster = Roster::new(vec![stunned, hero("Steady", 20)], boss(1000, 10));
        let mut battle = Battle::new(roster, attack_only(), 5);

        assert_eq!(battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(1)));
        assert!(battle
            .events()
            .contains(&BattleEvent::TurnSkipped { unit: UnitId::Party(0) }));
    }

    #[test]
    fn test_victory_from_poison_tick_is_latched() {
        let mut dragon = boss(5, 10);
        dragon.apply_effect(StatusEffect::poison(3, 10));
        let roster = Roster::new(vec![hero("A", 20)], dragon);
        let mut battle = Battle::new(roster, attack_only(), 6);

        assert_eq!(battle.advance().unwrap(), Step::Decided(Outcome::PartyVictory));
        assert_eq!(battle.round(), 1);

        assert!(battle.advance_effects().is_err());
        assert!(battle
            .submit_action(UnitId::Party(0), ActionRequest::Attack)
            .is_err());
        assert_eq!(battle.advance().unwrap(), Step::Decided(Outcome::PartyVictory));
        assert_eq!(battle.outcome(), Outcome::PartyVictory);
    }

    #[test]
    fn test_defeat_from_poison() {
        let mut a = hero("A", 20);
        a.set_hp(5);
        a.apply_effect(StatusEffect::poison(2, 10));
        let roster = Roster::new(vec![a], boss(1000, 10));
        let mut battle = Battle::new(roster, attack_only(), 7);

        assert_eq!(battle.advance().unwrap(), Step::Decided(Outcome::PartyDefeat));
        let decided = battle
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::BattleDecided { .. }))
            .count();
        assert_eq!(decided, 1);
    }

    #[test]
    fn test_phase_change_after_big_hit() {
        let striker = Unit::new("Titan", Role::Warrior, 150, 200).with_agility(30);
        let roster = Roster::new(vec![striker], boss(600, 10));
        let mut battle = Battle::new(roster, attack_only(), 8);

        battle.advance().unwrap();
        battle.submit_action(UnitId::Party(0), ActionRequest::Attack).unwrap();

        assert_eq!(battle.phase(), Phase::Two);
        assert_eq!(battle.roster().adversary().base_power(), 26);
        let phase_events: Vec<_> = battle
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::PhaseChanged { .. }))
            .collect();
        assert_eq!(phase_events.len(), 1);
    }

    #[test]
    fn test_turn_order_excludes_dead() {
        let mut fallen = hero("Fallen", 50);
        fallen.set_hp(0);
        let roster = Roster::new(vec![fallen, hero("B", 10)], boss(1000, 15));
        let battle = Battle::new(roster, attack_only(), 9);

        let order: Vec<UnitId> = battle.next_turn_order().collect();
        assert_eq!(order, vec![UnitId::Adversary, UnitId::Party(1)]);
    }

    #[test]
    fn test_report_taken_once() {
        let mut dragon = boss(1, 10);
        dragon.apply_effect(StatusEffect::poison(1, 10));
        let party = vec![
            hero("A", 1),
            hero("B", 2),
            hero("C", 3),
            hero("D", 4),
            hero("E", 5),
        ];
        let mut battle = Battle::new(Roster::new(party, dragon), attack_only(), 10);
        assert!(battle.take_report().is_none());

        // Poison(1) expires on its first tick without hitting, so fight it out
        loop {
            match battle.advance().unwrap() {
                Step::AwaitingAction(id) => {
                    battle.submit_action(id, ActionRequest::Attack).unwrap();
                }
                Step::Decided(_) => break,
            }
        }

        let report = battle.take_report().unwrap();
        assert_eq!(report.outcome, Outcome::PartyVictory);
        assert_eq!(report.adversary, "Dragon");
        assert_eq!(report.party.len(), 4);
        assert_eq!(report.party[0].0, "A");
        assert!(battle.take_report().is_none());
        assert!(!battle.roster().adversary().effects().has(EffectType::Poison));
    }
}
