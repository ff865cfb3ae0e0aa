//! Test harness for driving battles step by step

use bossfight::autopilot;
use bossfight::combat::{
    ActionOutcome, ActionRequest, Battle, BattleEvent, CategoryWeights, CombatRules, Outcome,
    Roster, Step, Unit, UnitId,
};
use bossfight::roles;

/// A seeded battle with helpers for scripted play
pub struct BattleTest {
    pub battle: Battle,
}

impl BattleTest {
    pub fn new(party: Vec<Unit>, boss: Unit, rules: CombatRules, seed: u64) -> Self {
        Self {
            battle: Battle::new(Roster::new(party, boss), rules, seed),
        }
    }

    /// The default four-hero party against the standard boss
    pub fn standard(seed: u64) -> Self {
        let roster = roles::build_roster(&roles::default_party(), "Dragon");
        Self {
            battle: Battle::new(roster, CombatRules::default(), seed),
        }
    }

    /// Advance to the next party turn; panics if the battle ends first
    pub fn expect_turn(&mut self) -> UnitId {
        match self.battle.advance().expect("advance failed") {
            Step::AwaitingAction(id) => id,
            Step::Decided(outcome) => panic!("battle ended early: {}", outcome),
        }
    }

    /// Advance and act for whoever is up
    pub fn act(&mut self, request: ActionRequest) -> ActionOutcome {
        let id = self.expect_turn();
        self.battle
            .submit_action(id, request)
            .expect("action rejected")
    }

    /// Let the autopilot finish the battle
    pub fn play_out(&mut self, max_rounds: u32) -> Outcome {
        autopilot::run_battle(&mut self.battle, max_rounds).expect("autopilot failed")
    }

    pub fn count_events(&self, pred: impl Fn(&BattleEvent) -> bool) -> usize {
        self.battle.events().iter().filter(|e| pred(e)).count()
    }
}

/// Rules where the adversary never uses skills or items
pub fn attack_only_rules() -> CombatRules {
    CombatRules {
        phase_one_weights: CategoryWeights::new(1.0, 0.0, 0.0),
        phase_two_weights: CategoryWeights::new(1.0, 0.0, 0.0),
        ..CombatRules::default()
    }
}
