//! Thread-safe battle handle
//!
//! The engine is single-threaded. `SharedBattle` serializes calls from
//! several threads behind one mutex; each call holds the lock for one step.

use parking_lot::Mutex;
use std::sync::Arc;

use super::actions::{ActionError, ActionOutcome, ActionRequest};
use super::events::{BattleEvent, BattleReport};
use super::roster::UnitId;
use super::state::{Battle, Outcome, Step};

/// Cloneable handle to a battle
#[derive(Clone)]
pub struct SharedBattle {
    inner: Arc<Mutex<Battle>>,
}

impl SharedBattle {
    pub fn new(battle: Battle) -> Self {
        Self {
            inner: Arc::new(Mutex::new(battle)),
        }
    }

    pub fn advance(&self) -> Result<Step, ActionError> {
        self.inner.lock().advance()
    }

    pub fn submit_action(
        &self,
        unit: UnitId,
        request: ActionRequest,
    ) -> Result<ActionOutcome, ActionError> {
        self.inner.lock().submit_action(unit, request)
    }

    pub fn outcome(&self) -> Outcome {
        self.inner.lock().outcome()
    }

    pub fn round(&self) -> u32 {
        self.inner.lock().round()
    }

    pub fn drain_events(&self) -> Vec<BattleEvent> {
        self.inner.lock().drain_events()
    }

    pub fn take_report(&self) -> Option<BattleReport> {
        self.inner.lock().take_report()
    }

    /// Run a closure with read access to the battle
    pub fn with<T>(&self, f: impl FnOnce(&Battle) -> T) -> T {
        f(&self.inner.lock())
    }
}
