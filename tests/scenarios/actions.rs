//! Resource gating and item use inside a running battle

use bossfight::combat::{
    ActionError, ActionRequest, Item, OutcomeKind, Role, Skill, Unit, UnitId, HEALTH_POTION,
};

use crate::harness::{attack_only_rules, BattleTest};

fn dummy() -> Unit {
    Unit::new("Dummy", Role::Boss, 100_000, 1).with_agility(1)
}

#[test]
fn test_mage_without_mana_keeps_turn() {
    let mut mage = Unit::new("Steve", Role::Mage, 100, 20)
        .with_resource(100)
        .with_skill(Skill::PoisonBolt)
        .with_agility(50);
    mage.set_resource(10);
    let mut test = BattleTest::new(vec![mage], dummy(), attack_only_rules(), 31);

    let id = test.expect_turn();
    let err = test
        .battle
        .submit_action(id, ActionRequest::UseSkill)
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::InsufficientResource {
            needed: 20,
            available: 10
        }
    );

    let roster = test.battle.roster();
    assert_eq!(roster.party()[0].resource(), Some(10));
    assert!(roster.adversary().effects().is_empty());
    assert_eq!(roster.adversary().hp(), 100_000);

    // The mage is still up and can act differently
    assert_eq!(test.battle.pending(), Some(id));
    let outcome = test.battle.submit_action(id, ActionRequest::Attack).unwrap();
    assert_eq!(outcome.actor, id);
}

#[test]
fn test_potion_heals_then_runs_out() {
    let mut hero = Unit::new("Pudge", Role::Warrior, 100, 10)
        .with_agility(50)
        .with_item(Item::health_potion(), 1);
    hero.set_hp(10);
    let mut test = BattleTest::new(vec![hero], dummy(), attack_only_rules(), 33);

    let outcome = test.act(ActionRequest::UseItem(HEALTH_POTION.to_string()));
    assert_eq!(outcome.kind, OutcomeKind::Heal);
    assert_eq!(outcome.amount, 50);
    assert_eq!(test.battle.roster().party()[0].hp(), 60);

    let id = test.expect_turn();
    let err = test
        .battle
        .submit_action(id, ActionRequest::UseItem(HEALTH_POTION.to_string()))
        .unwrap_err();
    assert_eq!(err, ActionError::ItemExhausted(HEALTH_POTION.to_string()));
    assert_eq!(test.battle.pending(), Some(id));
}

#[test]
fn test_unknown_item_rejected() {
    let hero = Unit::new("Wolf", Role::Warrior, 100, 10).with_agility(50);
    let mut test = BattleTest::new(vec![hero], dummy(), attack_only_rules(), 35);

    let id = test.expect_turn();
    let err = test
        .battle
        .submit_action(id, ActionRequest::UseItem("Elixir".to_string()))
        .unwrap_err();
    assert_eq!(err, ActionError::ItemNotFound("Elixir".to_string()));
    assert_eq!(test.battle.pending(), Some(UnitId::Party(0)));
}

#[test]
fn test_skill_without_one_rejected() {
    let hero = Unit::new("Plain", Role::Warrior, 100, 10).with_agility(50);
    let mut test = BattleTest::new(vec![hero], dummy(), attack_only_rules(), 37);

    let id = test.expect_turn();
    let err = test
        .battle
        .submit_action(id, ActionRequest::UseSkill)
        .unwrap_err();
    assert_eq!(err, ActionError::NoSkill);
}
