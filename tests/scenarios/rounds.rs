//! Turn order, stun skips and out-of-turn submissions

use bossfight::combat::{
    ActionError, ActionRequest, BattleEvent, Outcome, Role, StatusEffect, Step, Unit, UnitId,
};

use crate::harness::{attack_only_rules, BattleTest};

fn sturdy(name: &str, agility: i32) -> Unit {
    Unit::new(name, Role::Warrior, 1000, 10).with_agility(agility)
}

fn training_dummy(agility: i32) -> Unit {
    Unit::new("Dummy", Role::Boss, 100_000, 1).with_agility(agility)
}

fn resolved_actors(events: &[BattleEvent]) -> Vec<UnitId> {
    events
        .iter()
        .filter_map(|e| match e {
            BattleEvent::ActionResolved { outcome } => Some(outcome.actor),
            _ => None,
        })
        .collect()
}

#[test]
fn test_round_follows_agility_order() {
    let party = vec![
        sturdy("A", 25),
        sturdy("B", 15),
        sturdy("C", 12),
        sturdy("D", 14),
    ];
    let mut test = BattleTest::new(party, training_dummy(15), attack_only_rules(), 3);

    for _ in 0..4 {
        test.act(ActionRequest::Skip);
    }

    assert_eq!(test.battle.round(), 1);
    assert_eq!(
        resolved_actors(test.battle.events()),
        vec![
            UnitId::Party(0),
            UnitId::Party(1),
            UnitId::Adversary,
            UnitId::Party(3),
            UnitId::Party(2),
        ]
    );
}

#[test]
fn test_stunned_member_loses_one_turn() {
    let mut stunned = sturdy("Stunned", 20);
    stunned.apply_effect(StatusEffect::stun(2));
    let party = vec![sturdy("Ready", 30), stunned];
    let mut test = BattleTest::new(party, training_dummy(10), attack_only_rules(), 5);

    // Round 1: the stunned member is skipped
    assert_eq!(test.expect_turn(), UnitId::Party(0));
    test.battle
        .submit_action(UnitId::Party(0), ActionRequest::Skip)
        .unwrap();
    assert_eq!(test.expect_turn(), UnitId::Party(0));
    assert_eq!(test.battle.round(), 2);
    assert_eq!(
        test.count_events(|e| matches!(e, BattleEvent::TurnSkipped { unit } if *unit == UnitId::Party(1))),
        1
    );

    // Round 2: the stun has run out
    test.battle
        .submit_action(UnitId::Party(0), ActionRequest::Skip)
        .unwrap();
    assert_eq!(test.expect_turn(), UnitId::Party(1));
    assert!(!test.battle.roster().party()[1].is_stunned());
}

#[test]
fn test_out_of_turn_submission_rejected() {
    let party = vec![sturdy("First", 30), sturdy("Second", 20)];
    let mut test = BattleTest::new(party, training_dummy(10), attack_only_rules(), 9);

    assert_eq!(test.expect_turn(), UnitId::Party(0));

    let err = test
        .battle
        .submit_action(UnitId::Party(1), ActionRequest::Attack)
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidStateTransition(_)));

    let err = test.battle.adversary_take_turn().unwrap_err();
    assert!(matches!(err, ActionError::InvalidStateTransition(_)));

    // Still waiting on the first member
    assert_eq!(test.battle.pending(), Some(UnitId::Party(0)));
    assert_eq!(test.battle.advance().unwrap(), Step::AwaitingAction(UnitId::Party(0)));
}

#[test]
fn test_decided_battle_rejects_actions() {
    let hero = Unit::new("Slayer", Role::Warrior, 500, 100).with_agility(50);
    let boss = Unit::new("Whelp", Role::Boss, 50, 5).with_agility(1);
    let mut test = BattleTest::new(vec![hero], boss, attack_only_rules(), 11);

    test.act(ActionRequest::Attack);
    assert_eq!(
        test.battle.advance().unwrap(),
        Step::Decided(Outcome::PartyVictory)
    );
    assert_eq!(test.battle.outcome(), Outcome::PartyVictory);

    let err = test
        .battle
        .submit_action(UnitId::Party(0), ActionRequest::Attack)
        .unwrap_err();
    assert!(matches!(err, ActionError::InvalidStateTransition(_)));

    // Advancing a decided battle is a no-op
    let events = test.battle.events().len();
    assert_eq!(
        test.battle.advance().unwrap(),
        Step::Decided(Outcome::PartyVictory)
    );
    assert_eq!(test.battle.events().len(), events);
}

#[test]
fn test_dead_member_leaves_turn_order() {
    let mut fallen = sturdy("Fallen", 40);
    fallen.set_hp(0);
    let party = vec![fallen, sturdy("Standing", 20)];
    let mut test = BattleTest::new(party, training_dummy(10), attack_only_rules(), 13);

    assert_eq!(test.expect_turn(), UnitId::Party(1));
    assert!(!test.battle.remaining_turns().contains(&UnitId::Party(0)));
}
