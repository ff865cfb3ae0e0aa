//! Consumable items
//!
//! An inventory is an ordered list of item stacks. A stack that runs out is
//! removed, but its name is remembered so a later use reports
//! `ItemExhausted` rather than `ItemNotFound`.

use serde::{Deserialize, Serialize};

use super::actions::ActionError;

pub const HEALTH_POTION: &str = "Health Potion";
pub const MANA_POTION: &str = "Mana Potion";
pub const RAGE_POTION: &str = "Rage Potion";
pub const POISON_DART: &str = "Poison Dart";

/// What an item does when used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    /// Heal the user
    Heal { amount: i32 },
    /// Refill the user's resource pool
    RestoreResource { amount: i32 },
    /// Strength buff on the user
    Strength { power_bonus: i32, duration: u32 },
    /// Poison the opponent
    PoisonOpponent { damage_per_turn: i32, duration: u32 },
}

/// Item definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub description: String,
    pub effect: ItemEffect,
}

impl Item {
    pub fn new(name: impl Into<String>, description: impl Into<String>, effect: ItemEffect) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            effect,
        }
    }

    pub fn health_potion() -> Self {
        Self::new(
            HEALTH_POTION,
            "Restores 50 HP",
            ItemEffect::Heal { amount: 50 },
        )
    }

    pub fn mana_potion() -> Self {
        Self::new(
            MANA_POTION,
            "Restores 30 MP",
            ItemEffect::RestoreResource { amount: 30 },
        )
    }

    pub fn rage_potion() -> Self {
        Self::new(
            RAGE_POTION,
            "+15 power for 3 rounds",
            ItemEffect::Strength {
                power_bonus: 15,
                duration: 3,
            },
        )
    }

    pub fn poison_dart() -> Self {
        Self::new(
            POISON_DART,
            "Poisons the enemy for 3 rounds",
            ItemEffect::PoisonOpponent {
                damage_per_turn: 8,
                duration: 3,
            },
        )
    }
}

/// An item and how many are left
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: Item,
    pub quantity: u32,
}

/// Quantity-tracked item collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    stacks: Vec<ItemStack>,
    exhausted: Vec<String>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add items, merging into an existing stack of the same name
    pub fn add(&mut self, item: Item, quantity: u32) {
        if quantity == 0 {
            return;
        }
        self.exhausted.retain(|name| name != &item.name);
        match self.stacks.iter_mut().find(|s| s.item.name == item.name) {
            Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
            None => self.stacks.push(ItemStack { item, quantity }),
        }
    }

    /// Quantity held of the named item
    pub fn quantity(&self, name: &str) -> u32 {
        self.stacks
            .iter()
            .find(|s| s.item.name == name)
            .map(|s| s.quantity)
            .unwrap_or(0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.quantity(name) > 0
    }

    /// Look up a usable item without consuming it
    pub fn check(&self, name: &str) -> Result<&Item, ActionError> {
        if let Some(stack) = self.stacks.iter().find(|s| s.item.name == name) {
            return Ok(&stack.item);
        }
        if self.exhausted.iter().any(|n| n == name) {
            Err(ActionError::ItemExhausted(name.to_string()))
        } else {
            Err(ActionError::ItemNotFound(name.to_string()))
        }
    }

    /// Consume one of the named item
    pub fn take(&mut self, name: &str) -> Result<Item, ActionError> {
        let item = self.check(name)?.clone();
        if let Some(pos) = self.stacks.iter().position(|s| s.item.name == name) {
            self.stacks[pos].quantity -= 1;
            if self.stacks[pos].quantity == 0 {
                self.stacks.remove(pos);
                self.exhausted.push(name.to_string());
            }
        }
        Ok(item)
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    /// Names of held items, in insertion order
    pub fn names(&self) -> Vec<&str> {
        self.stacks.iter().map(|s| s.item.name.as_str()).collect()
    }
}
