//! Effect ticks during rounds and the adversary phase change

use bossfight::combat::{
    ActionRequest, BattleEvent, EffectType, Outcome, Phase, Role, Skill, StatusEffect, Step,
    Unit, UnitId,
};
use bossfight::roles;

use crate::harness::{attack_only_rules, BattleTest};

fn dummy() -> Unit {
    Unit::new("Dummy", Role::Boss, 100_000, 1).with_agility(1)
}

#[test]
fn test_poison_ticks_then_expires() {
    let mut hero = Unit::new("Wolf", Role::Warrior, 100, 10).with_agility(50);
    hero.set_hp(40);
    hero.apply_effect(StatusEffect::poison(2, 10));
    let mut test = BattleTest::new(vec![hero], dummy(), attack_only_rules(), 21);

    // Round 1: one tick, one round left
    assert_eq!(test.expect_turn(), UnitId::Party(0));
    let unit = &test.battle.roster().party()[0];
    assert_eq!(unit.hp(), 30);
    assert_eq!(unit.effects().len(), 1);
    assert_eq!(unit.effects().get(0).map(|e| e.remaining_rounds), Some(1));
    test.battle
        .submit_action(UnitId::Party(0), ActionRequest::Skip)
        .unwrap();

    // Round 2: removed without ticking again
    assert_eq!(test.expect_turn(), UnitId::Party(0));
    assert!(!test.battle.roster().party()[0].effects().has(EffectType::Poison));

    let ticks = test.count_events(|e| {
        matches!(e, BattleEvent::EffectTicked { unit: UnitId::Party(0), effect: EffectType::Poison, .. })
    });
    let expiries = test.count_events(|e| {
        matches!(e, BattleEvent::EffectExpired { unit: UnitId::Party(0), effect: EffectType::Poison })
    });
    assert_eq!(ticks, 1);
    assert_eq!(expiries, 1);
}

#[test]
fn test_poison_tick_can_decide_battle() {
    let hero = Unit::new("Wolf", Role::Warrior, 100, 10).with_agility(50);
    let mut boss = Unit::new("Ogre", Role::Boss, 500, 5).with_agility(1);
    boss.set_hp(5);
    boss.apply_effect(StatusEffect::poison(3, 10));
    let mut test = BattleTest::new(vec![hero], boss, attack_only_rules(), 23);

    assert_eq!(
        test.battle.advance().unwrap(),
        Step::Decided(Outcome::PartyVictory)
    );
    assert_eq!(test.battle.round(), 1);
    assert!(test.battle.acted().is_empty());
}

#[test]
fn test_rally_raises_party_power() {
    let warrior = Unit::new("Wolf", Role::Warrior, 200, 20)
        .with_resource(50)
        .with_skill(Skill::Rally)
        .with_agility(50);
    let archer = Unit::new("Steve", Role::Archer, 200, 15).with_agility(40);
    let mut test = BattleTest::new(vec![warrior, archer], dummy(), attack_only_rules(), 25);

    test.act(ActionRequest::UseSkill);

    let party = test.battle.roster().party();
    assert_eq!(party[0].resource(), Some(50 - Skill::Rally.cost()));
    assert_eq!(party[0].effective_power(), 30);
    assert_eq!(party[1].effective_power(), 25);
}

#[test]
fn test_phase_two_happens_once() {
    let mut boss = roles::boss("Dragon");
    boss.set_hp(1020);
    let base_power = boss.base_power();
    let titan = Unit::new("Titan", Role::Warrior, 100_000, 400).with_agility(50);
    let mut test = BattleTest::new(vec![titan], boss, attack_only_rules(), 27);

    assert_eq!(test.battle.phase(), Phase::One);
    let outcome = loop {
        match test.battle.advance().unwrap() {
            Step::AwaitingAction(id) => {
                test.battle.submit_action(id, ActionRequest::Attack).unwrap();
            }
            Step::Decided(outcome) => break outcome,
        }
    };

    assert_eq!(outcome, Outcome::PartyVictory);
    assert_eq!(test.battle.phase(), Phase::Two);

    let changes: Vec<_> = test
        .battle
        .events()
        .iter()
        .filter_map(|e| match e {
            BattleEvent::PhaseChanged { phase, power } => Some((*phase, *power)),
            _ => None,
        })
        .collect();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].0, Phase::Two);
    assert!(changes[0].1 > base_power);
}
