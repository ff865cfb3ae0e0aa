//! Initiative order
//!
//! Built once per round from the living participants, after effects tick.

use super::roster::UnitId;

/// One round's turn order. Consumed as an iterator.
#[derive(Debug, Clone, Default)]
pub struct TurnOrder {
    order: Vec<UnitId>,
    next: usize,
}

impl TurnOrder {
    /// Sort by agility, highest first. The sort is stable, so ties keep the
    /// input order (party order, adversary last).
    pub fn new(participants: &[(UnitId, i32)]) -> Self {
        let mut sorted = participants.to_vec();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        Self {
            order: sorted.into_iter().map(|(id, _)| id).collect(),
            next: 0,
        }
    }

    /// Participants not yet handed out
    pub fn remaining(&self) -> &[UnitId] {
        &self.order[self.next..]
    }

    /// The whole order for this round
    pub fn as_slice(&self) -> &[UnitId] {
        &self.order
    }

    pub fn is_exhausted(&self) -> bool {
        self.next >= self.order.len()
    }
}

impl Iterator for TurnOrder {
    type Item = UnitId;

    fn next(&mut self) -> Option<UnitId> {
        let id = self.order.get(self.next).copied()?;
        self.next += 1;
        Some(id)
    }
}
