//! Participant addressing
//!
//! Units never hold references to each other. Everything is addressed by
//! `UnitId` through the roster the battle owns.

use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::unit::Unit;

/// Identifies a participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitId {
    /// Party member by position
    Party(usize),
    Adversary,
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitId::Party(i) => write!(f, "party[{}]", i),
            UnitId::Adversary => write!(f, "adversary"),
        }
    }
}

/// The party and their adversary
#[derive(Debug, Clone)]
pub struct Roster {
    party: Vec<Unit>,
    adversary: Unit,
}

impl Roster {
    pub fn new(party: Vec<Unit>, adversary: Unit) -> Self {
        Self { party, adversary }
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        match id {
            UnitId::Party(i) => self.party.get(i),
            UnitId::Adversary => Some(&self.adversary),
        }
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        match id {
            UnitId::Party(i) => self.party.get_mut(i),
            UnitId::Adversary => Some(&mut self.adversary),
        }
    }

    pub fn party(&self) -> &[Unit] {
        &self.party
    }

    pub fn adversary(&self) -> &Unit {
        &self.adversary
    }

    pub fn adversary_mut(&mut self) -> &mut Unit {
        &mut self.adversary
    }

    /// Ids of living party members, in party order
    pub fn living_party(&self) -> Vec<UnitId> {
        self.party
            .iter()
            .enumerate()
            .filter(|(_, u)| u.is_alive())
            .map(|(i, _)| UnitId::Party(i))
            .collect()
    }

    /// Every participant: party in order, adversary last
    pub fn ids(&self) -> Vec<UnitId> {
        (0..self.party.len())
            .map(UnitId::Party)
            .chain(std::iter::once(UnitId::Adversary))
            .collect()
    }

    /// Living participants with their agility, party first
    pub fn living_participants(&self) -> Vec<(UnitId, i32)> {
        self.ids()
            .into_iter()
            .filter_map(|id| self.get(id).filter(|u| u.is_alive()).map(|u| (id, u.agility())))
            .collect()
    }

    pub fn all_party_dead(&self) -> bool {
        self.party.iter().all(|u| !u.is_alive())
    }

    /// Living allies of `actor`, including the actor itself
    pub fn allies_of(&self, actor: UnitId) -> Vec<UnitId> {
        match actor {
            UnitId::Party(_) => self.living_party(),
            UnitId::Adversary if self.adversary.is_alive() => vec![UnitId::Adversary],
            UnitId::Adversary => Vec::new(),
        }
    }

    /// Pick a living opponent of `actor`. Party members always face the
    /// adversary; the adversary picks a living party member at random.
    pub fn pick_opponent<R: Rng>(&self, actor: UnitId, rng: &mut R) -> Option<UnitId> {
        match actor {
            UnitId::Party(_) => self.adversary.is_alive().then_some(UnitId::Adversary),
            UnitId::Adversary => self.living_party().choose(rng).copied(),
        }
    }

    /// Pick a living ally to heal. Excludes the actor unless it's the only one.
    pub fn pick_heal_target<R: Rng>(&self, actor: UnitId, rng: &mut R) -> Option<UnitId> {
        let allies = self.allies_of(actor);
        let others: Vec<UnitId> = allies.iter().copied().filter(|id| *id != actor).collect();
        if others.is_empty() {
            allies.choose(rng).copied()
        } else {
            others.choose(rng).copied()
        }
    }
}
