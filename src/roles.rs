//! Unit templates
//!
//! Stat blocks, capabilities and starting inventories for each role.

use serde::{Deserialize, Serialize};

use crate::combat::{AttackStyle, Item, Role, Roster, Skill, Unit};

/// Maximum party size
pub const MAX_PARTY: usize = 4;

/// A party slot as it appears in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroSpec {
    pub name: String,
    pub role: Role,
}

impl HeroSpec {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}

/// The standard four-hero party
pub fn default_party() -> Vec<HeroSpec> {
    vec![
        HeroSpec::new("Wolf", Role::Warrior),
        HeroSpec::new("Pudge", Role::Mage),
        HeroSpec::new("Steve", Role::Archer),
        HeroSpec::new("Cleric", Role::Healer),
    ]
}

/// Build a hero from its role template. `Role::Boss` yields the adversary.
pub fn hero(name: &str, role: Role) -> Unit {
    let unit = match role {
        Role::Warrior => Unit::new(name, role, 150, 30)
            .with_resource(50)
            .with_agility(12)
            .with_crit(0.25, 2.0),
        Role::Mage => Unit::new(name, role, 80, 40)
            .with_resource(100)
            .with_agility(15)
            .with_attack_style(AttackStyle::Venom),
        Role::Archer => Unit::new(name, role, 100, 28)
            .with_resource(40)
            .with_agility(25)
            .with_crit(0.35, 2.2),
        Role::Healer => Unit::new(name, role, 90, 15)
            .with_resource(80)
            .with_agility(14)
            .with_attack_style(AttackStyle::Mending),
        Role::Boss => return boss(name),
    };

    let unit = match Skill::for_role(role) {
        Some(skill) => unit.with_skill(skill),
        None => unit,
    };

    unit.with_item(Item::health_potion(), 2)
        .with_item(Item::mana_potion(), 1)
        .with_item(Item::rage_potion(), 1)
}

/// Build the adversary
pub fn boss(name: &str) -> Unit {
    Unit::new(name, Role::Boss, 1700, 70)
        .with_resource(200)
        .with_agility(15)
        .with_item(Item::health_potion(), 3)
}

/// Assemble a roster from party specs, keeping at most `MAX_PARTY` heroes
pub fn build_roster(party: &[HeroSpec], boss_name: &str) -> Roster {
    let heroes = party
        .iter()
        .take(MAX_PARTY)
        .map(|spec| hero(&spec.name, spec.role))
        .collect();
    Roster::new(heroes, boss(boss_name))
}
